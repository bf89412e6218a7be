use crate::commands::summary;
use crate::track::record::TIME_FORMAT;
use crate::track::tracker::Tracker;
use anyhow::Result;

pub fn run(tracker: &Tracker) -> Result<()> {
    let removed = tracker.delete_last()?;
    println!(
        "deleted record project='{}' started at {}",
        removed.project,
        removed.started.format(TIME_FORMAT)
    );
    summary::run(tracker)
}
