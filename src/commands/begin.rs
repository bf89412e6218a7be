use crate::commands::summary;
use crate::track::tracker::Tracker;
use anyhow::Result;

pub fn run(tracker: &Tracker, name: &str) -> Result<()> {
    let project = tracker.begin_project(name)?;
    println!("      started project: {project:>12}");
    summary::run(tracker)
}
