use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct TrackPaths {
    pub home: PathBuf,
    pub hours_file: PathBuf,
    pub logs_dir: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<TrackPaths> {
    let user_home = required_home_dir()?;
    let home = env_or_default_path("TIMEWATCH_HOME", user_home.join(".timewatch"));

    let hours_file = env_or_default_path("TIMEWATCH_HOURS_FILE", home.join("timewatch-hours.txt"));
    let logs_dir = env_or_default_path("TIMEWATCH_LOGS_DIR", home.join("logs"));

    Ok(TrackPaths {
        home,
        hours_file,
        logs_dir,
    })
}
