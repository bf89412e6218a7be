use crate::track::ledger::Ledger;
use crate::track::recalc::{SCALE_UP, WeeklyBill};
use chrono::{DateTime, Duration, Local};

/// Snapshot of the current week, handed to the reporting layer as plain data.
#[derive(Debug, Clone)]
pub struct CurrentSummary {
    /// The running project, if the newest record is not an end marker.
    pub project: Option<String>,
    pub year: i32,
    pub week: u32,
    /// Weekday buckets of the newest bill that hold entries, counting today
    /// as well when a project is running but nothing is billed for it yet.
    pub registered_work_days: usize,
    pub billed_hours: f64,
    /// Hours still owed to reach the daily target across the registered days.
    pub owed_hours: f64,
    /// Projected clock time at which the owed time is worked off, obtained by
    /// inverting the scale factor against the outstanding deficit.
    pub work_until: DateTime<Local>,
}

pub fn current_summary(
    ledger: &Ledger,
    bills: &[WeeklyBill],
    daily_target_hours: f64,
    now: DateTime<Local>,
) -> Option<CurrentSummary> {
    let last = ledger.last()?;
    let empty_days: [Vec<usize>; 7] = Default::default();
    let days = bills.last().map(|bill| &bill.days).unwrap_or(&empty_days);

    let active = !last.is_end_marker();
    let today = active.then(|| last.weekday.num_days_from_monday() as usize);

    let mut registered_work_days = 0;
    let mut billed_hours = 0.0;
    for (day, bucket) in days.iter().enumerate() {
        if !bucket.is_empty() {
            registered_work_days += 1;
        } else if Some(day) == today {
            registered_work_days += 1;
        }
        for &pos in bucket {
            billed_hours += ledger.records()[pos].billed;
        }
    }

    let owed_hours = registered_work_days as f64 * daily_target_hours - billed_hours;
    let deficit_secs = (owed_hours + last.billed) * 3600.0 - last.remaining;
    let work_until = now + Duration::milliseconds((deficit_secs / SCALE_UP * 1000.0).round() as i64);

    Some(CurrentSummary {
        project: active.then(|| last.project.clone()),
        year: last.year,
        week: last.week,
        registered_work_days,
        billed_hours,
        owed_hours,
        work_until,
    })
}
