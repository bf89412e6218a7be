use crate::track::ledger::Ledger;
use crate::track::record::TimeRecord;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Adapter for the durable hours file: one record per line, `#` comments,
/// cosmetic blank lines between ISO-week groups, atomic replace on save and
/// mtime-based detection of external edits.
#[derive(Debug)]
pub struct HoursStore {
    path: PathBuf,
    loaded_mtime: Option<SystemTime>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOutcome {
    pub lines: usize,
    pub records: usize,
    pub comments: usize,
    pub blanks: usize,
    pub duplicates: usize,
}

impl LoadOutcome {
    pub fn describe(&self) -> String {
        format!(
            "read {} lines, {} records, {} comments, {} blank, {} duplicates",
            self.lines, self.records, self.comments, self.blanks, self.duplicates
        )
    }
}

fn current_mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then(|meta| meta.modified().ok())
}

impl HoursStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            loaded_mtime: None,
        }
    }

    /// Rebuilds the ledger from the hours file. A missing file is an empty
    /// ledger, not an error. A line whose project equals the previously
    /// accepted line's project is dropped as an accidental double entry.
    pub fn load(&mut self, ledger: &mut Ledger) -> Result<LoadOutcome> {
        let mut outcome = LoadOutcome::default();
        if !self.path.exists() {
            ledger.replace_all(Vec::new());
            self.loaded_mtime = None;
            return Ok(outcome);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let read_mtime = current_mtime(&self.path);

        let mut records = Vec::new();
        let mut prev_project: Option<String> = None;
        for (idx, line) in raw.lines().enumerate() {
            outcome.lines += 1;
            let text = line.trim_matches([' ', '\t']);
            if text.is_empty() {
                outcome.blanks += 1;
                continue;
            }
            if text.starts_with('#') {
                outcome.comments += 1;
                continue;
            }
            let record = TimeRecord::parse_line(text, idx + 1)?;
            if prev_project.as_deref() == Some(record.project.as_str()) {
                outcome.duplicates += 1;
                continue;
            }
            prev_project = Some(record.project.clone());
            records.push(record);
            outcome.records += 1;
        }

        // only a fully parsed file counts as loaded; a failed load must keep
        // looking changed so the next reload is not skipped
        ledger.replace_all(records);
        self.loaded_mtime = read_mtime;
        Ok(outcome)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("timewatch-hours.txt"));
        name.push(".new");
        self.path.with_file_name(name)
    }

    /// Writes every record to a sibling temp file, flushes it, and renames it
    /// over the destination. A failed rename is retried exactly once after
    /// removing the destination; a second failure is fatal.
    pub fn save(&mut self, ledger: &Ledger) -> Result<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let mut out = String::new();
        let mut prev_week: Option<(i32, u32)> = None;
        for record in ledger.records() {
            let week = (record.year, record.week);
            if prev_week.is_some_and(|p| p != week) {
                out.push('\n');
            }
            out.push_str(&record.to_line());
            out.push('\n');
            prev_week = Some(week);
        }

        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)
                .with_context(|| format!("failed to create {}", temp.display()))?;
            file.write_all(out.as_bytes())
                .with_context(|| format!("failed to write {}", temp.display()))?;
            file.sync_all()
                .with_context(|| format!("failed to flush {}", temp.display()))?;
        }

        if let Err(rename_err) = fs::rename(&temp, &self.path) {
            fs::remove_file(&self.path).with_context(|| {
                format!(
                    "rename to {} failed ({rename_err}) and the destination could not be removed",
                    self.path.display()
                )
            })?;
            fs::rename(&temp, &self.path).with_context(|| {
                format!("failed to replace {} after retry", self.path.display())
            })?;
        }

        self.loaded_mtime = current_mtime(&self.path);
        Ok(ledger.len())
    }

    /// True when the on-disk file no longer matches the state last loaded or
    /// saved, including the file having appeared or disappeared. Callers must
    /// reload before mutating or reporting.
    pub fn changed_since_load(&self) -> bool {
        current_mtime(&self.path) != self.loaded_mtime
    }
}
