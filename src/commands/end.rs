use crate::commands::summary;
use crate::track::tracker::Tracker;
use anyhow::Result;

pub fn run(tracker: &Tracker) -> Result<()> {
    tracker.end_project()?;
    println!("empty record written");
    summary::run(tracker)
}
