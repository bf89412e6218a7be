use crate::track::paths::TrackPaths;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Reporting-side tunables. The billing constants (16/15 scale, half-hour
/// quantization, debounce timing) are fixed properties of the domain and
/// deliberately have no configuration surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub daily_target_hours: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            daily_target_hours: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackConfig {
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialTrackConfig {
    report: Option<ReportConfig>,
}

fn env_or_f64(var: &str, fallback: f64) -> f64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<f64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn validate(cfg: &TrackConfig) -> Result<()> {
    let target = cfg.report.daily_target_hours;
    if !(target > 0.0 && target <= 24.0) {
        return Err(anyhow!(
            "invalid daily target hours: require 0 < target <= 24"
        ));
    }
    Ok(())
}

fn resolve_config_path(paths: &TrackPaths) -> Option<PathBuf> {
    if let Ok(custom) = env::var("TIMEWATCH_CONFIG_PATH") {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    Some(paths.home.join("timewatch.toml"))
}

fn merge_file_config(paths: &TrackPaths, base: &mut TrackConfig) -> Result<()> {
    let Some(path) = resolve_config_path(paths) else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    let parsed: PartialTrackConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse config {}: {err}", path.display()))?;
    if let Some(report) = parsed.report {
        base.report = report;
    }
    Ok(())
}

pub fn load_config(paths: &TrackPaths) -> Result<TrackConfig> {
    let mut cfg = TrackConfig::default();
    merge_file_config(paths, &mut cfg)?;

    cfg.report.daily_target_hours = env_or_f64(
        "TIMEWATCH_DAILY_TARGET_HOURS",
        cfg.report.daily_target_hours,
    );

    validate(&cfg)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = TrackConfig::default();
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.report.daily_target_hours, 8.0);
    }

    #[test]
    fn validate_rejects_non_positive_target() {
        let mut cfg = TrackConfig::default();
        cfg.report.daily_target_hours = 0.0;
        assert!(validate(&cfg).is_err());
        cfg.report.daily_target_hours = 25.0;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn partial_file_overrides_report_section() {
        let parsed: PartialTrackConfig = toml::from_str(
            "[report]\ndaily_target_hours = 6.5\n",
        )
        .expect("parse");
        let mut cfg = TrackConfig::default();
        if let Some(report) = parsed.report {
            cfg.report = report;
        }
        assert_eq!(cfg.report.daily_target_hours, 6.5);
    }
}
