use crate::track::tracker::Tracker;
use anyhow::Result;
use std::collections::BTreeMap;

/// Per-project billed hours of the newest week, one weekday column each.
pub fn run(tracker: &Tracker) -> Result<()> {
    tracker.recalculate()?;
    let listing = tracker.weekly_listing();
    let Some(report) = listing.last() else {
        println!("no billed work yet");
        return Ok(());
    };

    let mut matrix: BTreeMap<String, [f64; 7]> = BTreeMap::new();
    for (day, bucket) in report.days.iter().enumerate() {
        for entry in bucket {
            matrix.entry(entry.project.clone()).or_default()[day] = entry.billed;
        }
    }

    println!("                 Mon  Tue  Wed  Thu  Fri  Sat  Sun");
    for (project, hours) in &matrix {
        print!("{project:>15}");
        for value in hours {
            if *value > 0.0 {
                print!("{value:5.1}");
            } else {
                print!("     ");
            }
        }
        println!();
    }
    Ok(())
}
