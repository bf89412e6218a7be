use crate::track::tracker::Tracker;
use anyhow::Result;

pub fn run(tracker: &Tracker) -> Result<()> {
    tracker.recalculate()?;
    let Some(summary) = tracker.current_summary() else {
        println!("no records yet");
        return Ok(());
    };

    println!("      ----- Summary -----");
    println!(
        "    current year/week: {:9}/{:02}",
        summary.year, summary.week
    );
    if let Some(project) = &summary.project {
        println!("      current project: {project:>12}");
    }
    println!(
        " registered work days: {:12}",
        summary.registered_work_days
    );
    println!("        worked so far: {:12.1}", summary.billed_hours);
    println!("      work more hours: {:12.1}", summary.owed_hours);
    println!(
        "           work until: {:>12}",
        summary.work_until.format("%H:%M:%S")
    );
    Ok(())
}
