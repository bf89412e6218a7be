use crate::track::tracker::Tracker;
use anyhow::Result;

pub fn run(tracker: &Tracker) -> Result<()> {
    println!("--- list of projects ---");
    for (i, project) in tracker.project_names().iter().enumerate() {
        print!("{project:>15} ");
        if (i + 1) % 3 == 0 {
            println!();
        }
    }
    println!();
    Ok(())
}
