//! Log sink bootstrap
//!
//! Each system name gets one file sink (`<LOGS_DIR>/<name>.log`) and one
//! console sink, attached at most once per process. The first handle built is
//! installed as the global default subscriber if nothing else claimed it.

use serde_json::Value;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{debug, info, Dispatch};
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, reload, Registry};

use crate::config::{ensure_dir, Config};
use crate::types::{AcdefError, Result};

const LOG_TARGET: &str = "acdef";

/// Attached loggers, keyed by system name
static LOGGERS: OnceLock<Mutex<HashMap<String, LoggerHandle>>> = OnceLock::new();

/// Destination of an attached sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    File(PathBuf),
    Console,
}

/// Named logger returned by [`configure`]
#[derive(Clone)]
pub struct LoggerHandle {
    name: String,
    dispatch: Dispatch,
    level: reload::Handle<LevelFilter, Registry>,
    sinks: Vec<SinkKind>,
    global: bool,
}

impl std::fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("sinks", &self.sinks)
            .field("global", &self.global)
            .finish()
    }
}

impl LoggerHandle {
    /// System name this logger was configured for
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current severity threshold
    pub fn level(&self) -> LevelFilter {
        self.level.clone_current().unwrap_or(LevelFilter::OFF)
    }

    /// Sinks attached for this system name
    pub fn sinks(&self) -> &[SinkKind] {
        &self.sinks
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Path of the file sink
    pub fn log_file(&self) -> Option<&Path> {
        self.sinks.iter().find_map(|sink| match sink {
            SinkKind::File(path) => Some(path.as_path()),
            SinkKind::Console => None,
        })
    }

    /// Run `f` with this logger as the current subscriber
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    fn set_level(&self, level: LevelFilter) {
        if let Err(e) = self.level.modify(|filter| *filter = level) {
            debug!("Could not update log level for {}: {}", self.name, e);
        }
    }
}

/// Resolve a severity name (case-insensitive) to a threshold
pub fn resolve_level(name: &str) -> Result<LevelFilter> {
    match name.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Ok(LevelFilter::TRACE),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARN" | "WARNING" => Ok(LevelFilter::WARN),
        // tracing has no level above ERROR
        "ERROR" | "CRITICAL" => Ok(LevelFilter::ERROR),
        _ => Err(AcdefError::InvalidLogLevel(name.to_string())),
    }
}

/// Configure logging for the system described by `config`.
///
/// Repeated calls for the same system name reuse the sinks attached by the
/// first call and only update the threshold. Every call emits one record
/// announcing the system name, version and configuration snapshot.
pub fn configure(config: &Config) -> Result<LoggerHandle> {
    let level = resolve_level(&config.system().log_level)?;
    ensure_dir(&config.paths().logs_dir)?;

    let name = config.system().name.clone();
    let handle = {
        let mut loggers = LOGGERS
            .get_or_init(Default::default)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match loggers.get(&name) {
            Some(existing) => {
                existing.set_level(level);
                existing.clone()
            }
            None => {
                let handle = attach(config, level)?;
                loggers.insert(name.clone(), handle.clone());
                handle
            }
        }
    };

    let version = &config.system().version;
    let snapshot = Value::Object(config.to_mapping());
    handle.in_scope(|| {
        info!(
            target: LOG_TARGET,
            system = %name,
            version = %version,
            config = %snapshot,
            "{} v{} initialized",
            name,
            version
        );
    });

    Ok(handle)
}

/// Number of sinks attached for a system name (0 if never configured)
pub fn attached_sinks(system_name: &str) -> usize {
    LOGGERS
        .get()
        .map(|loggers| {
            loggers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(system_name)
                .map_or(0, LoggerHandle::sink_count)
        })
        .unwrap_or(0)
}

fn attach(config: &Config, level: LevelFilter) -> Result<LoggerHandle> {
    let log_file = config.log_file_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|source| AcdefError::LogSink {
            path: log_file.clone(),
            source,
        })?;

    let (filter, level_handle) = reload::Layer::new(level);
    let subscriber = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true));

    let dispatch = Dispatch::new(subscriber);
    let global = tracing::dispatcher::set_global_default(dispatch.clone()).is_ok();
    if !global {
        debug!(
            "Global subscriber already set; logger for {} is scoped only",
            config.system().name
        );
    }

    Ok(LoggerHandle {
        name: config.system().name.clone(),
        dispatch,
        level: level_handle,
        sinks: vec![SinkKind::File(log_file), SinkKind::Console],
        global,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path, system_name: &str, level: &str) -> Config {
        Config::from_overrides([
            ("SYSTEM_NAME", system_name),
            ("LOG_LEVEL", level),
            ("LOGS_DIR", dir.join("logs").to_str().unwrap()),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_standard_level_names() {
        assert_eq!(resolve_level("DEBUG").unwrap(), LevelFilter::DEBUG);
        assert_eq!(resolve_level("info").unwrap(), LevelFilter::INFO);
        assert_eq!(resolve_level("WARNING").unwrap(), LevelFilter::WARN);
        assert_eq!(resolve_level("Error").unwrap(), LevelFilter::ERROR);
        assert_eq!(resolve_level("CRITICAL").unwrap(), LevelFilter::ERROR);
    }

    #[test]
    fn test_unknown_level_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "BAD_LEVEL_SYSTEM", "VERBOSE");

        match configure(&config) {
            Err(AcdefError::InvalidLogLevel(level)) => assert_eq!(level, "VERBOSE"),
            other => panic!("expected InvalidLogLevel, got {other:?}"),
        }
        assert_eq!(attached_sinks("BAD_LEVEL_SYSTEM"), 0);
    }

    fn announcements(log_file: &Path, name: &str) -> usize {
        let marker = format!("{name} v1.0.0 initialized");
        std::fs::read_to_string(log_file)
            .unwrap()
            .lines()
            .filter(|line| line.contains(&marker))
            .count()
    }

    #[test]
    fn test_configure_twice_does_not_duplicate_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "Twice", "INFO");
        let log_file = dir.path().join("logs/twice.log");

        let first = configure(&config).unwrap();
        assert_eq!(announcements(&log_file, "Twice"), 1);

        let second = configure(&config).unwrap();
        // a duplicated file layer would write each record twice
        assert_eq!(announcements(&log_file, "Twice"), 2);

        second.in_scope(|| info!(target: LOG_TARGET, "Twice v1.0.0 initialized manually"));
        assert_eq!(announcements(&log_file, "Twice"), 3);

        assert_eq!(first.sink_count(), 2);
        assert_eq!(attached_sinks("Twice"), 2);
        assert_eq!(
            second.sinks(),
            &[SinkKind::File(log_file.clone()), SinkKind::Console]
        );
    }

    #[test]
    fn test_configure_writes_announcement_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "Announcer", "INFO");

        let handle = configure(&config).unwrap();
        let log_file = handle.log_file().unwrap().to_path_buf();
        assert_eq!(log_file, dir.path().join("logs/announcer.log"));

        let contents = std::fs::read_to_string(&log_file).unwrap();
        let records: Vec<&str> = contents
            .lines()
            .filter(|line| line.contains("initialized"))
            .collect();
        assert_eq!(records.len(), 1, "{contents}");
        assert!(records[0].contains("Announcer v1.0.0 initialized"), "{contents}");
        assert!(records[0].contains("version=1.0.0"), "{contents}");
        assert!(records[0].contains("EVOLUTION_POPULATION_SIZE"), "{contents}");
    }

    #[test]
    fn test_repeated_configure_updates_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let handle = configure(&config_in(dir.path(), "Rethreshold", "DEBUG")).unwrap();
        assert_eq!(handle.level(), LevelFilter::DEBUG);

        configure(&config_in(dir.path(), "Rethreshold", "ERROR")).unwrap();
        assert_eq!(handle.level(), LevelFilter::ERROR);
        assert_eq!(attached_sinks("Rethreshold"), 2);
    }

    #[test]
    fn test_concurrent_first_configuration_attaches_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "Concurrent", "INFO");

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let config = config.clone();
                std::thread::spawn(move || configure(&config).map(|h| h.sink_count()))
            })
            .collect();

        for thread in threads {
            assert_eq!(thread.join().unwrap().unwrap(), 2);
        }
        assert_eq!(attached_sinks("Concurrent"), 2);
    }
}
