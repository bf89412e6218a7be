use crate::error::TrackError;
use chrono::{DateTime, Datelike, Local, NaiveDateTime, Weekday};

/// Timestamp format of the durable hours file, sortable and in local time.
pub const TIME_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// One logged event. The persisted fields are `started`, `project`,
/// `remaining` and `billed`; everything else is derived and recomputed on
/// every recalculation pass. An empty `project` is the end-of-work sentinel.
#[derive(Debug, Clone)]
pub struct TimeRecord {
    pub started: DateTime<Local>,
    pub project: String,
    /// Elapsed seconds until the next record's start, already scaled by 16/15.
    pub worked: f64,
    /// Unbilled seconds carried forward for this project.
    pub remaining: f64,
    /// Quantized hours billed for this record, in steps of 0.5.
    pub billed: f64,
    /// Position of the most recent earlier record for the same project.
    pub previous: Option<usize>,
    pub year: i32,
    pub week: u32,
    pub year_day: u32,
    pub weekday: Weekday,
}

impl TimeRecord {
    pub fn begun(project: impl Into<String>, started: DateTime<Local>) -> Self {
        let iso = started.iso_week();
        Self {
            started,
            project: project.into(),
            worked: 0.0,
            remaining: 0.0,
            billed: 0.0,
            previous: None,
            year: iso.year(),
            week: iso.week(),
            year_day: started.ordinal(),
            weekday: started.weekday(),
        }
    }

    pub fn end_marker(started: DateTime<Local>) -> Self {
        Self::begun("", started)
    }

    pub fn is_end_marker(&self) -> bool {
        self.project.is_empty()
    }

    pub fn refresh_calendar(&mut self) {
        let iso = self.started.iso_week();
        self.year = iso.year();
        self.week = iso.week();
        self.year_day = self.started.ordinal();
        self.weekday = self.started.weekday();
    }

    /// Parses one hours-file line: `<started> <project> <remaining> <billed>`.
    ///
    /// Fields are separated by single spaces so that the empty-project end
    /// marker round-trips. Missing trailing fields default to empty/zero;
    /// malformed numerics are fatal because billing history cannot be guessed.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self, TrackError> {
        let parts = line.split(' ').collect::<Vec<_>>();
        let time_str = parts.first().copied().unwrap_or_default();
        let naive = NaiveDateTime::parse_from_str(time_str, TIME_FORMAT).map_err(|_| {
            TrackError::MalformedTimestamp {
                line: line_no,
                text: time_str.to_string(),
            }
        })?;
        let started = naive.and_local_timezone(Local).earliest().ok_or_else(|| {
            TrackError::MalformedTimestamp {
                line: line_no,
                text: time_str.to_string(),
            }
        })?;

        let project = parts
            .get(1)
            .map(|p| p.trim_matches([' ', '\t']))
            .unwrap_or_default();
        let mut record = Self::begun(project, started);

        if let Some(raw) = parts.get(2) {
            record.remaining =
                raw.parse::<f64>()
                    .map_err(|_| TrackError::MalformedNumber {
                        line: line_no,
                        field: "remaining",
                        text: raw.to_string(),
                    })?;
        }
        if let Some(raw) = parts.get(3) {
            record.billed = raw.parse::<f64>().map_err(|_| TrackError::MalformedNumber {
                line: line_no,
                field: "billed",
                text: raw.to_string(),
            })?;
        }

        Ok(record)
    }

    /// Renders the durable line form: 0 decimals for remaining, 1 for billed.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {:.0} {:.1}",
            self.started.format(TIME_FORMAT),
            self.project,
            self.remaining,
            self.billed
        )
    }
}
