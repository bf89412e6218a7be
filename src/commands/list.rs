use crate::track::tracker::Tracker;
use anyhow::Result;

pub fn run(tracker: &Tracker) -> Result<()> {
    tracker.recalculate()?;
    for report in tracker.weekly_listing().iter().rev() {
        println!("Week {}/{:02}", report.year, report.week);
        for day in &report.days {
            let Some(first) = day.first() else {
                continue;
            };
            println!("   {}", first.started.format("%A %Y-%m-%d"));
            for entry in day {
                println!("{:>15}: {:5.1}", entry.project, entry.billed);
            }
        }
    }
    Ok(())
}
