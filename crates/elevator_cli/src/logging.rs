//! Logger installation and session-file housekeeping.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use log::LevelFilter;

const SESSION_PREFIX: &str = "elevator_system_";
const SESSION_SUFFIX: &str = ".log";

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: LevelFilter,
    /// Session files go here; `None` logs to stderr.
    pub dir: Option<PathBuf>,
    pub keep: usize,
    pub max_age: Duration,
}

/// Installs `env_logger`. `RUST_LOG` still overrides the level when set.
/// Returns the session file path when logging to a file.
pub fn init(settings: &LogSettings) -> anyhow::Result<Option<PathBuf>> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(settings.level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        });

    let mut session = None;
    if let Some(dir) = &settings.dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
        let now = SystemTime::now();
        let removed = prune_session_logs(dir, settings.keep, settings.max_age, now)?;
        let path = session_log_path(dir, now);
        let file = File::create(&path)
            .with_context(|| format!("creating session log {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
        builder.try_init()?;
        log::info!("=== Starting New Elevator System Session ===");
        if !removed.is_empty() {
            log::debug!("pruned {} old session logs", removed.len());
        }
        session = Some(path);
    } else {
        builder.try_init()?;
    }
    Ok(session)
}

pub fn session_log_path(dir: &Path, now: SystemTime) -> PathBuf {
    let secs = now
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    dir.join(format!("{SESSION_PREFIX}{secs}{SESSION_SUFFIX}"))
}

/// Start time encoded in a session file name.
fn session_started(path: &Path) -> Option<u64> {
    path.file_name()?
        .to_str()?
        .strip_prefix(SESSION_PREFIX)?
        .strip_suffix(SESSION_SUFFIX)?
        .parse()
        .ok()
}

/// Keeps the newest `keep` session files and drops any older than `max_age`.
/// Other files in `dir` are left alone. Returns the removed paths.
pub fn prune_session_logs(
    dir: &Path,
    keep: usize,
    max_age: Duration,
    now: SystemTime,
) -> io::Result<Vec<PathBuf>> {
    let now_secs = now
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();

    let mut sessions: Vec<(u64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(started) = session_started(&path) {
            sessions.push((started, path));
        }
    }
    sessions.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = Vec::new();
    for (index, (started, path)) in sessions.into_iter().enumerate() {
        let expired = now_secs.saturating_sub(started) > max_age.as_secs();
        if index >= keep || expired {
            fs::remove_file(&path)?;
            removed.push(path);
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 24 * 60 * 60;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).expect("create");
    }

    #[test]
    fn session_path_uses_unix_seconds() {
        let now = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let path = session_log_path(Path::new("logs"), now);
        assert_eq!(path, Path::new("logs/elevator_system_1700000000.log"));
        assert_eq!(session_started(&path), Some(1_700_000_000));
        assert_eq!(session_started(Path::new("logs/other.log")), None);
    }

    #[test]
    fn prunes_by_count_and_age() {
        let dir = tempfile::tempdir().expect("tempdir");
        let now_secs = 100 * DAY;
        for age_days in [0, 1, 2, 3, 10] {
            touch(
                dir.path(),
                &format!("elevator_system_{}.log", now_secs - age_days * DAY),
            );
        }
        touch(dir.path(), "notes.txt");

        let now = UNIX_EPOCH + Duration::from_secs(now_secs);
        let removed =
            prune_session_logs(dir.path(), 3, Duration::from_secs(7 * DAY), now).expect("prune");
        assert_eq!(removed.len(), 2);

        let mut left: Vec<String> = fs::read_dir(dir.path())
            .expect("read_dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left.len(), 4);
        assert!(left.contains(&"notes.txt".to_string()));
        assert!(!left.contains(&format!("elevator_system_{}.log", now_secs - 10 * DAY)));
        assert!(!left.contains(&format!("elevator_system_{}.log", now_secs - 3 * DAY)));
    }
}
