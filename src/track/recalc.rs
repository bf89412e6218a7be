use crate::track::ledger::Ledger;
use crate::track::record::TimeRecord;
use chrono::{DateTime, Local};

/// Fixed multiplier applied to raw elapsed seconds before billing.
pub const SCALE_UP: f64 = 16.0 / 15.0;
/// Quantization step for billed time, in seconds.
pub const HALF_HOUR_SECS: f64 = 1800.0;
/// Records without an earlier same-project record are only billed when they
/// started within this horizon.
pub const BILLING_HORIZON_HOURS: f64 = 168.0;

/// Billed records of one ISO week, bucketed per weekday (Monday first).
/// Buckets hold positions into the ledger's record sequence. The whole
/// aggregate is disposable and rebuilt on every recalculation.
#[derive(Debug, Clone, Default)]
pub struct WeeklyBill {
    pub year: i32,
    pub week: u32,
    pub days: [Vec<usize>; 7],
}

fn elapsed_secs(from: DateTime<Local>, to: DateTime<Local>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

/// Runs the three passes over the full sequence and returns the fresh weekly
/// aggregates. Pure computation: no I/O, cannot fail on a loaded ledger.
pub fn recalculate(ledger: &mut Ledger, now: DateTime<Local>) -> Vec<WeeklyBill> {
    recompute_worked(ledger.records_mut(), now);
    recompute_billing(ledger.records_mut(), now);
    aggregate_weekly(ledger.records())
}

/// Worked-time pass, newest to oldest: each record's worked time is the
/// ceiled, scaled distance to the start of the next record ("now" closes the
/// last one). Calendar fields are refreshed along the way.
fn recompute_worked(records: &mut [TimeRecord], now: DateTime<Local>) {
    let mut ended = now;
    for record in records.iter_mut().rev() {
        let secs = elapsed_secs(record.started, ended);
        record.worked = (secs * SCALE_UP).ceil().max(0.0);
        record.refresh_calendar();
        ended = record.started;
    }
}

/// Billing pass, oldest to newest. End markers are pure boundaries and carry
/// nothing. A same-day resumption folds the earlier session's billed amount
/// back into the carry instead of counting it twice, so the earlier record's
/// billed value is reset before the carry formula reads it.
fn recompute_billing(records: &mut [TimeRecord], now: DateTime<Local>) {
    for pos in 0..records.len() {
        if records[pos].is_end_marker() {
            records[pos].billed = 0.0;
            records[pos].remaining = 0.0;
            continue;
        }

        let remaining = match records[pos].previous {
            Some(prev) => {
                if records[prev].year_day == records[pos].year_day {
                    records[prev].billed = 0.0;
                }
                records[prev].remaining - records[prev].billed * 3600.0 + records[pos].worked
            }
            None => {
                let age_hours = elapsed_secs(records[pos].started, now) / 3600.0;
                if age_hours < BILLING_HORIZON_HOURS {
                    records[pos].worked
                } else {
                    // a stale orphan is outside the billing horizon
                    0.0
                }
            }
        };

        records[pos].remaining = remaining;
        records[pos].billed = if remaining > 0.0 {
            (remaining / HALF_HOUR_SECS).ceil() / 2.0
        } else {
            0.0
        };
    }
}

/// Weekly aggregation pass, oldest to newest: a new bill starts whenever the
/// (ISO year, week) pair changes from the previous billed record.
fn aggregate_weekly(records: &[TimeRecord]) -> Vec<WeeklyBill> {
    let mut bills: Vec<WeeklyBill> = Vec::new();
    for (pos, record) in records.iter().enumerate() {
        if record.billed <= 0.0 {
            continue;
        }
        let fresh = bills
            .last()
            .is_none_or(|b| b.year != record.year || b.week != record.week);
        if fresh {
            bills.push(WeeklyBill {
                year: record.year,
                week: record.week,
                days: Default::default(),
            });
        }
        if let Some(bill) = bills.last_mut() {
            let bucket = record.weekday.num_days_from_monday() as usize;
            bill.days[bucket].push(pos);
        }
    }
    bills
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn ledger_of(records: Vec<TimeRecord>) -> Ledger {
        let mut ledger = Ledger::new();
        ledger.replace_all(records);
        ledger
    }

    #[test]
    fn three_hour_session_bills_three_and_a_half_hours() {
        let mut ledger = ledger_of(vec![
            TimeRecord::begun("alpha", local(2024, 1, 1, 9, 0, 0)),
            TimeRecord::end_marker(local(2024, 1, 1, 12, 0, 0)),
        ]);
        let now = local(2024, 1, 1, 12, 0, 0);

        let bills = recalculate(&mut ledger, now);

        let alpha = &ledger.records()[0];
        assert_eq!(alpha.worked, 11520.0);
        assert_eq!(alpha.remaining, 11520.0);
        assert_eq!(alpha.billed, 3.5);

        let marker = &ledger.records()[1];
        assert_eq!(marker.remaining, 0.0);
        assert_eq!(marker.billed, 0.0);

        // 2024-01-01 is a Monday of ISO week 1.
        assert_eq!(bills.len(), 1);
        assert_eq!((bills[0].year, bills[0].week), (2024, 1));
        assert_eq!(bills[0].days[0], vec![0]);
    }

    #[test]
    fn worked_time_uses_the_next_record_in_the_full_sequence() {
        let mut ledger = ledger_of(vec![
            TimeRecord::begun("alpha", local(2024, 1, 1, 9, 0, 0)),
            TimeRecord::begun("beta", local(2024, 1, 1, 10, 0, 0)),
        ]);
        let now = local(2024, 1, 1, 11, 30, 0);

        recalculate(&mut ledger, now);

        // alpha ends when beta starts, not at "now".
        assert_eq!(ledger.records()[0].worked, (3600.0_f64 * SCALE_UP).ceil());
        assert_eq!(ledger.records()[1].worked, (5400.0_f64 * SCALE_UP).ceil());
    }

    #[test]
    fn quantization_rounds_up_to_half_hours() {
        let mut ledger = ledger_of(vec![
            TimeRecord::begun("alpha", local(2024, 1, 1, 9, 0, 0)),
            TimeRecord::end_marker(local(2024, 1, 1, 9, 1, 0)),
        ]);
        let now = local(2024, 1, 1, 9, 1, 0);

        recalculate(&mut ledger, now);

        // one minute of work still bills half an hour
        let alpha = &ledger.records()[0];
        assert_eq!(alpha.billed, 0.5);
        assert!(alpha.billed * 3600.0 >= alpha.remaining);
        assert!((alpha.billed - 0.5) * 3600.0 < alpha.remaining);
    }

    #[test]
    fn same_day_resumption_absorbs_the_earlier_bill() {
        let mut ledger = ledger_of(vec![
            TimeRecord::begun("alpha", local(2024, 1, 1, 9, 0, 0)),
            TimeRecord::end_marker(local(2024, 1, 1, 10, 0, 0)),
            TimeRecord::begun("alpha", local(2024, 1, 1, 13, 0, 0)),
            TimeRecord::end_marker(local(2024, 1, 1, 14, 0, 0)),
        ]);
        let now = local(2024, 1, 1, 14, 0, 0);

        recalculate(&mut ledger, now);

        let first = &ledger.records()[0];
        let second = &ledger.records()[2];
        assert_eq!(first.billed, 0.0);
        // the full first-session remainder is carried into the second session
        assert_eq!(second.remaining, first.remaining + second.worked);
        assert_eq!(second.billed, (second.remaining / 1800.0).ceil() / 2.0);
    }

    #[test]
    fn next_day_resumption_keeps_the_earlier_bill_and_carries_the_rest() {
        let mut ledger = ledger_of(vec![
            TimeRecord::begun("alpha", local(2024, 1, 1, 9, 0, 0)),
            TimeRecord::end_marker(local(2024, 1, 1, 10, 0, 0)),
            TimeRecord::begun("alpha", local(2024, 1, 2, 9, 0, 0)),
            TimeRecord::end_marker(local(2024, 1, 2, 10, 0, 0)),
        ]);
        let now = local(2024, 1, 2, 10, 0, 0);

        recalculate(&mut ledger, now);

        let first = &ledger.records()[0];
        let second = &ledger.records()[2];
        assert_eq!(first.billed, 1.5);
        assert_eq!(
            second.remaining,
            first.remaining - first.billed * 3600.0 + second.worked
        );
    }

    #[test]
    fn stale_orphan_outside_the_horizon_is_not_billed() {
        let mut first = TimeRecord::begun("alpha", local(2024, 1, 1, 9, 0, 0));
        first.remaining = 5000.0;
        let mut ledger = ledger_of(vec![
            first,
            TimeRecord::end_marker(local(2024, 1, 1, 12, 0, 0)),
        ]);
        // more than 168 hours later
        let now = local(2024, 2, 1, 12, 0, 0);

        recalculate(&mut ledger, now);

        let alpha = &ledger.records()[0];
        assert_eq!(alpha.remaining, 0.0);
        assert_eq!(alpha.billed, 0.0);
    }

    #[test]
    fn weekly_aggregation_partitions_billed_records() {
        let mut ledger = ledger_of(vec![
            TimeRecord::begun("alpha", local(2024, 1, 1, 9, 0, 0)),
            TimeRecord::begun("beta", local(2024, 1, 2, 9, 0, 0)),
            TimeRecord::begun("alpha", local(2024, 1, 8, 9, 0, 0)),
            TimeRecord::end_marker(local(2024, 1, 8, 10, 0, 0)),
        ]);
        let now = local(2024, 1, 8, 10, 0, 0);

        let bills = recalculate(&mut ledger, now);

        assert_eq!(bills.len(), 2);
        assert_eq!((bills[0].year, bills[0].week), (2024, 1));
        assert_eq!((bills[1].year, bills[1].week), (2024, 2));

        let mut seen = Vec::new();
        for bill in &bills {
            for (day, bucket) in bill.days.iter().enumerate() {
                for &pos in bucket {
                    let record = &ledger.records()[pos];
                    assert!(record.billed > 0.0);
                    assert_eq!((record.year, record.week), (bill.year, bill.week));
                    assert_eq!(record.weekday.num_days_from_monday() as usize, day);
                    seen.push(pos);
                }
            }
        }
        seen.sort_unstable();
        let billed_positions = ledger
            .records()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.billed > 0.0)
            .map(|(pos, _)| pos)
            .collect::<Vec<_>>();
        assert_eq!(seen, billed_positions);
    }

    #[test]
    fn aggregates_are_rebuilt_wholesale() {
        let mut ledger = ledger_of(vec![
            TimeRecord::begun("alpha", local(2024, 1, 1, 9, 0, 0)),
            TimeRecord::end_marker(local(2024, 1, 1, 12, 0, 0)),
        ]);
        let now = local(2024, 1, 1, 12, 0, 0);

        let first = recalculate(&mut ledger, now);
        let second = recalculate(&mut ledger, now);
        assert_eq!(first.len(), second.len());
        assert_eq!(second[0].days[0], vec![0]);
    }
}
