use crate::track::audit;
use crate::track::config::TrackConfig;
use crate::track::ledger::Ledger;
use crate::track::messages::MessageQueue;
use crate::track::paths::TrackPaths;
use crate::track::recalc::{self, WeeklyBill};
use crate::track::record::TimeRecord;
use crate::track::saver::Saver;
use crate::track::store::HoursStore;
use crate::track::summary::{self, CurrentSummary};
use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Owned view of one billed record, handed to the reporting layer.
#[derive(Debug, Clone)]
pub struct BilledEntry {
    pub started: DateTime<Local>,
    pub project: String,
    pub billed: f64,
}

/// Owned view of one WeeklyBill with Monday-first weekday buckets.
#[derive(Debug, Clone)]
pub struct WeekReport {
    pub year: i32,
    pub week: u32,
    pub days: [Vec<BilledEntry>; 7],
}

struct Shared {
    ledger: Ledger,
    store: HoursStore,
    bills: Vec<WeeklyBill>,
}

/// The context object every operation goes through: the ledger and its
/// derived aggregates behind one lock, shared with the debounced saver.
/// Mutations and recalculation take the write lock (recalculation rewrites
/// derived fields in place); report extraction takes the read lock.
pub struct Tracker {
    shared: Arc<RwLock<Shared>>,
    config: TrackConfig,
    paths: TrackPaths,
    messages: MessageQueue,
    saver: Saver,
}

fn persist(shared: &RwLock<Shared>, paths: &TrackPaths, messages: &MessageQueue) -> Result<()> {
    let mut guard = shared.write().expect("ledger lock poisoned");
    let state = &mut *guard;
    let count = state.store.save(&state.ledger)?;
    drop(guard);
    messages.push(format!("{count} records saved"));
    audit::append_event(paths, "save", "ok", &format!("{count} records"))?;
    Ok(())
}

fn reload_if_changed(state: &mut Shared, messages: &MessageQueue) -> Result<()> {
    if state.store.changed_since_load() {
        let outcome = state.store.load(&mut state.ledger)?;
        messages.push(format!(
            "hours file changed on disk, {}",
            outcome.describe()
        ));
    }
    Ok(())
}

impl Tracker {
    /// Loads the ledger from disk and starts the background saver.
    pub fn open(paths: TrackPaths, config: TrackConfig) -> Result<Self> {
        let messages = MessageQueue::new();
        let mut store = HoursStore::new(paths.hours_file.clone());
        let mut ledger = Ledger::new();
        let outcome = store.load(&mut ledger)?;
        messages.push(outcome.describe());
        audit::append_event(&paths, "load", "ok", &outcome.describe())?;

        let shared = Arc::new(RwLock::new(Shared {
            ledger,
            store,
            bills: Vec::new(),
        }));
        let saver = {
            let shared = Arc::clone(&shared);
            let paths = paths.clone();
            let messages = messages.clone();
            Saver::spawn(move || {
                if let Err(err) = persist(&shared, &paths, &messages) {
                    // billing data could not be made durable
                    eprintln!("error: {err:#}");
                    std::process::exit(2);
                }
            })
        };

        Ok(Self {
            shared,
            config,
            paths,
            messages,
            saver,
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared> {
        self.shared.write().expect("ledger lock poisoned")
    }

    fn read(&self) -> RwLockReadGuard<'_, Shared> {
        self.shared.read().expect("ledger lock poisoned")
    }

    /// Starts work on a project now. Whitespace in the name becomes `_`
    /// because the durable format is space-delimited. Returns the name as
    /// recorded.
    pub fn begin_project(&self, name: &str) -> Result<String> {
        let project = name.replace([' ', '\t'], "_");
        if project.is_empty() {
            bail!("project name is empty");
        }
        {
            let mut guard = self.write();
            reload_if_changed(&mut guard, &self.messages)?;
            guard
                .ledger
                .append(TimeRecord::begun(project.clone(), Local::now()));
        }
        audit::append_event(&self.paths, "begin", "ok", &project)?;
        self.saver.mark_dirty();
        Ok(project)
    }

    /// Ends the current work with an empty boundary record.
    pub fn end_project(&self) -> Result<()> {
        {
            let mut guard = self.write();
            reload_if_changed(&mut guard, &self.messages)?;
            guard.ledger.append(TimeRecord::end_marker(Local::now()));
        }
        audit::append_event(&self.paths, "end", "ok", "end marker written")?;
        self.saver.mark_dirty();
        Ok(())
    }

    /// Removes the most recently logged record and returns it.
    pub fn delete_last(&self) -> Result<TimeRecord> {
        let removed = {
            let mut guard = self.write();
            reload_if_changed(&mut guard, &self.messages)?;
            guard.ledger.remove_last()?
        };
        audit::append_event(
            &self.paths,
            "delete",
            "ok",
            &format!(
                "{} {}",
                removed.started.format(crate::track::record::TIME_FORMAT),
                removed.project
            ),
        )?;
        self.saver.mark_dirty();
        Ok(removed)
    }

    pub fn last_record(&self) -> Option<TimeRecord> {
        self.read().ledger.last().cloned()
    }

    /// Runs the three-pass engine over the full ledger. Must be called before
    /// any report is accurate. The refreshed derived fields are persisted, so
    /// this also arms the saver.
    pub fn recalculate(&self) -> Result<()> {
        {
            let mut guard = self.write();
            reload_if_changed(&mut guard, &self.messages)?;
            let state = &mut *guard;
            state.bills = recalc::recalculate(&mut state.ledger, Local::now());
        }
        self.saver.mark_dirty();
        Ok(())
    }

    pub fn current_summary(&self) -> Option<CurrentSummary> {
        let guard = self.read();
        summary::current_summary(
            &guard.ledger,
            &guard.bills,
            self.config.report.daily_target_hours,
            Local::now(),
        )
    }

    pub fn weekly_listing(&self) -> Vec<WeekReport> {
        let guard = self.read();
        guard
            .bills
            .iter()
            .map(|bill| {
                let mut days: [Vec<BilledEntry>; 7] = Default::default();
                for (day, bucket) in bill.days.iter().enumerate() {
                    for &pos in bucket {
                        let record = &guard.ledger.records()[pos];
                        days[day].push(BilledEntry {
                            started: record.started,
                            project: record.project.clone(),
                            billed: record.billed,
                        });
                    }
                }
                WeekReport {
                    year: bill.year,
                    week: bill.week,
                    days,
                }
            })
            .collect()
    }

    pub fn project_names(&self) -> Vec<String> {
        self.read().ledger.project_names()
    }

    /// Handle for draining queued informational messages at safe points.
    pub fn messages(&self) -> MessageQueue {
        self.messages.clone()
    }

    /// Flushes any pending save and joins the background saver. Must run
    /// before the process exits.
    pub fn shutdown(self) {
        self.saver.shutdown();
    }
}
