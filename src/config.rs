//! Configuration for ACDEF
//!
//! Compiled-in defaults, overridable through named key/value pairs (the CLI
//! and `.env` feed the same path). A `Config` only exists once every field has
//! passed validation, and its sections are handed out by shared reference so
//! the record stays read-only for the rest of the process.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::types::{AcdefError, Result};

/// Smallest population the evolutionary engine can work with
pub const MIN_POPULATION_SIZE: usize = 10;

/// Every key accepted by [`Config::from_overrides`], in mapping order
pub const CONFIG_KEYS: [&str; 24] = [
    "SYSTEM_NAME",
    "VERSION",
    "LOG_LEVEL",
    "STORE_CREDENTIALS_PATH",
    "STORE_PROJECT_ID",
    "STORE_COLLECTION_PREFIX",
    "RL_EXPLORATION_RATE",
    "RL_LEARNING_RATE",
    "RL_DISCOUNT_FACTOR",
    "EVOLUTION_POPULATION_SIZE",
    "EVOLUTION_MUTATION_RATE",
    "EVOLUTION_CROSSOVER_RATE",
    "EVOLUTION_ELITISM_COUNT",
    "DOMAIN_SYNC_INTERVAL_SECONDS",
    "MAX_DOMAIN_CONNECTIONS",
    "MONITORING_ENABLED",
    "PERFORMANCE_WINDOW_SIZE",
    "DECISION_THRESHOLD",
    "MAX_RETRIES",
    "RETRY_DELAY_SECONDS",
    "TIMEOUT_SECONDS",
    "DATA_DIR",
    "LOGS_DIR",
    "MODELS_DIR",
];

/// System identity and log threshold
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub name: String,
    pub version: String,
    /// Severity name, resolved by [`crate::logging::resolve_level`]
    pub log_level: String,
}

/// Document store identity
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Path to the JSON credentials file
    pub credentials_path: Option<PathBuf>,
    /// Database used when the credentials file does not name one
    pub project_id: String,
    /// Prepended to every collection name written through the store
    pub collection_prefix: String,
}

/// Reinforcement-learning rates (all in [0, 1])
#[derive(Debug, Clone, PartialEq)]
pub struct LearningConfig {
    pub exploration_rate: f64,
    pub learning_rate: f64,
    pub discount_factor: f64,
}

/// Evolutionary population parameters
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elitism_count: usize,
}

/// Cross-domain integration
#[derive(Debug, Clone, PartialEq)]
pub struct DomainConfig {
    pub sync_interval_secs: u64,
    pub max_connections: usize,
}

/// Performance monitoring
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub window_size: usize,
    pub decision_threshold: f64,
}

/// Connection retry and timeout settings
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    /// Retry ceiling: total connection attempts before giving up
    pub max_retries: u32,
    pub retry_delay_secs: f64,
    pub timeout_secs: f64,
}

impl NetworkConfig {
    /// Delay a caller should wait between connection attempts
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay_secs)
    }

    /// Timeout applied to server selection and connect
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }
}

/// Working directories
#[derive(Debug, Clone, PartialEq)]
pub struct PathConfig {
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub models_dir: PathBuf,
}

impl PathConfig {
    /// All directories created by [`Config::ensure_directories`]
    pub fn directories(&self) -> [&Path; 3] {
        [&self.data_dir, &self.logs_dir, &self.models_dir]
    }
}

/// Validated configuration record for the whole process
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    system: SystemConfig,
    store: StoreConfig,
    learning: LearningConfig,
    evolution: EvolutionConfig,
    domain: DomainConfig,
    monitoring: MonitoringConfig,
    network: NetworkConfig,
    paths: PathConfig,
    // Bookkeeping only, never part of the mapping view.
    overridden: BTreeSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system: SystemConfig {
                name: "ACDEF".to_string(),
                version: "1.0.0".to_string(),
                log_level: "INFO".to_string(),
            },
            store: StoreConfig {
                credentials_path: None,
                project_id: "acdef-evolution".to_string(),
                collection_prefix: "acdef_".to_string(),
            },
            learning: LearningConfig {
                exploration_rate: 0.3,
                learning_rate: 0.01,
                discount_factor: 0.95,
            },
            evolution: EvolutionConfig {
                population_size: 50,
                mutation_rate: 0.1,
                crossover_rate: 0.7,
                elitism_count: 5,
            },
            domain: DomainConfig {
                sync_interval_secs: 60,
                max_connections: 10,
            },
            monitoring: MonitoringConfig {
                enabled: true,
                window_size: 100,
                decision_threshold: 0.7,
            },
            network: NetworkConfig {
                max_retries: 3,
                retry_delay_secs: 1.0,
                timeout_secs: 30.0,
            },
            paths: PathConfig {
                data_dir: PathBuf::from("./data"),
                logs_dir: PathBuf::from("./logs"),
                models_dir: PathBuf::from("./models"),
            },
            overridden: BTreeSet::new(),
        }
    }
}

impl Config {
    /// Build a configuration from defaults plus named overrides.
    ///
    /// Keys are matched case-insensitively against [`CONFIG_KEYS`]. Values are
    /// parsed into the field's type. The result is validated as a whole, so a
    /// record that violates any constraint never escapes this function.
    pub fn from_overrides<I, K, V>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in overrides {
            config.apply(key.as_ref(), value.as_ref())?;
        }
        config.validate()?;
        debug!(overrides = config.overridden.len(), "Configuration validated");
        Ok(config)
    }

    fn apply(&mut self, key: &str, raw: &str) -> Result<()> {
        let key = key.trim().to_ascii_uppercase();
        let k = key.as_str();
        match k {
            "SYSTEM_NAME" => self.system.name = raw.to_string(),
            "VERSION" => self.system.version = raw.to_string(),
            "LOG_LEVEL" => self.system.log_level = raw.trim().to_string(),
            "STORE_CREDENTIALS_PATH" => {
                let trimmed = raw.trim();
                self.store.credentials_path =
                    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
            }
            "STORE_PROJECT_ID" => self.store.project_id = raw.to_string(),
            "STORE_COLLECTION_PREFIX" => self.store.collection_prefix = raw.to_string(),
            "RL_EXPLORATION_RATE" => self.learning.exploration_rate = parse_number(k, raw)?,
            "RL_LEARNING_RATE" => self.learning.learning_rate = parse_number(k, raw)?,
            "RL_DISCOUNT_FACTOR" => self.learning.discount_factor = parse_number(k, raw)?,
            "EVOLUTION_POPULATION_SIZE" => self.evolution.population_size = parse_number(k, raw)?,
            "EVOLUTION_MUTATION_RATE" => self.evolution.mutation_rate = parse_number(k, raw)?,
            "EVOLUTION_CROSSOVER_RATE" => self.evolution.crossover_rate = parse_number(k, raw)?,
            "EVOLUTION_ELITISM_COUNT" => self.evolution.elitism_count = parse_number(k, raw)?,
            "DOMAIN_SYNC_INTERVAL_SECONDS" => self.domain.sync_interval_secs = parse_number(k, raw)?,
            "MAX_DOMAIN_CONNECTIONS" => self.domain.max_connections = parse_number(k, raw)?,
            "MONITORING_ENABLED" => self.monitoring.enabled = parse_bool(k, raw)?,
            "PERFORMANCE_WINDOW_SIZE" => self.monitoring.window_size = parse_number(k, raw)?,
            "DECISION_THRESHOLD" => self.monitoring.decision_threshold = parse_number(k, raw)?,
            "MAX_RETRIES" => self.network.max_retries = parse_number(k, raw)?,
            "RETRY_DELAY_SECONDS" => self.network.retry_delay_secs = parse_number(k, raw)?,
            "TIMEOUT_SECONDS" => self.network.timeout_secs = parse_number(k, raw)?,
            "DATA_DIR" => self.paths.data_dir = PathBuf::from(raw),
            "LOGS_DIR" => self.paths.logs_dir = PathBuf::from(raw),
            "MODELS_DIR" => self.paths.models_dir = PathBuf::from(raw),
            _ => {
                return Err(AcdefError::invalid_config(
                    key.clone(),
                    raw,
                    "unknown configuration key",
                ))
            }
        }
        self.overridden.insert(key);
        Ok(())
    }

    /// Validate every field and cross-field constraint
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("RL_EXPLORATION_RATE", self.learning.exploration_rate)?;
        check_unit_interval("EVOLUTION_MUTATION_RATE", self.evolution.mutation_rate)?;

        if self.evolution.population_size < MIN_POPULATION_SIZE {
            return Err(AcdefError::invalid_config(
                "EVOLUTION_POPULATION_SIZE",
                self.evolution.population_size,
                format!("must be at least {}", MIN_POPULATION_SIZE),
            ));
        }

        check_unit_interval("RL_LEARNING_RATE", self.learning.learning_rate)?;
        check_unit_interval("RL_DISCOUNT_FACTOR", self.learning.discount_factor)?;
        check_unit_interval("EVOLUTION_CROSSOVER_RATE", self.evolution.crossover_rate)?;
        check_unit_interval("DECISION_THRESHOLD", self.monitoring.decision_threshold)?;

        if self.evolution.elitism_count > self.evolution.population_size {
            return Err(AcdefError::invalid_config(
                "EVOLUTION_ELITISM_COUNT",
                self.evolution.elitism_count,
                format!(
                    "must not exceed EVOLUTION_POPULATION_SIZE ({})",
                    self.evolution.population_size
                ),
            ));
        }

        check_non_empty("SYSTEM_NAME", &self.system.name)?;
        check_non_empty("STORE_PROJECT_ID", &self.store.project_id)?;
        check_at_least_one("MAX_DOMAIN_CONNECTIONS", self.domain.max_connections as u64)?;
        check_at_least_one("PERFORMANCE_WINDOW_SIZE", self.monitoring.window_size as u64)?;
        check_at_least_one("MAX_RETRIES", u64::from(self.network.max_retries))?;
        check_seconds("RETRY_DELAY_SECONDS", self.network.retry_delay_secs)?;
        check_seconds("TIMEOUT_SECONDS", self.network.timeout_secs)?;

        Ok(())
    }

    /// Snapshot of every public field, keyed as in [`CONFIG_KEYS`].
    ///
    /// Absent optional values map to `null`.
    pub fn to_mapping(&self) -> Map<String, Value> {
        let mut map = Map::new();
        let mut put = |key: &str, value: Value| {
            map.insert(key.to_string(), value);
        };

        put("SYSTEM_NAME", self.system.name.clone().into());
        put("VERSION", self.system.version.clone().into());
        put("LOG_LEVEL", self.system.log_level.clone().into());
        put(
            "STORE_CREDENTIALS_PATH",
            self.store
                .credentials_path
                .as_deref()
                .map(path_value)
                .unwrap_or(Value::Null),
        );
        put("STORE_PROJECT_ID", self.store.project_id.clone().into());
        put("STORE_COLLECTION_PREFIX", self.store.collection_prefix.clone().into());
        put("RL_EXPLORATION_RATE", self.learning.exploration_rate.into());
        put("RL_LEARNING_RATE", self.learning.learning_rate.into());
        put("RL_DISCOUNT_FACTOR", self.learning.discount_factor.into());
        put("EVOLUTION_POPULATION_SIZE", self.evolution.population_size.into());
        put("EVOLUTION_MUTATION_RATE", self.evolution.mutation_rate.into());
        put("EVOLUTION_CROSSOVER_RATE", self.evolution.crossover_rate.into());
        put("EVOLUTION_ELITISM_COUNT", self.evolution.elitism_count.into());
        put("DOMAIN_SYNC_INTERVAL_SECONDS", self.domain.sync_interval_secs.into());
        put("MAX_DOMAIN_CONNECTIONS", self.domain.max_connections.into());
        put("MONITORING_ENABLED", self.monitoring.enabled.into());
        put("PERFORMANCE_WINDOW_SIZE", self.monitoring.window_size.into());
        put("DECISION_THRESHOLD", self.monitoring.decision_threshold.into());
        put("MAX_RETRIES", self.network.max_retries.into());
        put("RETRY_DELAY_SECONDS", self.network.retry_delay_secs.into());
        put("TIMEOUT_SECONDS", self.network.timeout_secs.into());
        put("DATA_DIR", path_value(&self.paths.data_dir));
        put("LOGS_DIR", path_value(&self.paths.logs_dir));
        put("MODELS_DIR", path_value(&self.paths.models_dir));

        map
    }

    /// Create the data, logs and models directories (and missing ancestors)
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in self.paths.directories() {
            ensure_dir(dir)?;
        }
        Ok(())
    }

    /// Log file path: `<LOGS_DIR>/<system_name_lowercase>.log`
    pub fn log_file_path(&self) -> PathBuf {
        self.paths
            .logs_dir
            .join(format!("{}.log", self.system.name.to_lowercase()))
    }

    pub fn system(&self) -> &SystemConfig {
        &self.system
    }

    pub fn store(&self) -> &StoreConfig {
        &self.store
    }

    pub fn learning(&self) -> &LearningConfig {
        &self.learning
    }

    pub fn evolution(&self) -> &EvolutionConfig {
        &self.evolution
    }

    pub fn domain(&self) -> &DomainConfig {
        &self.domain
    }

    pub fn monitoring(&self) -> &MonitoringConfig {
        &self.monitoring
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn paths(&self) -> &PathConfig {
        &self.paths
    }

    /// Keys explicitly supplied at construction
    pub fn overridden_keys(&self) -> impl Iterator<Item = &str> {
        self.overridden.iter().map(String::as_str)
    }
}

/// Create a directory and its ancestors, wrapping the filesystem error
pub(crate) fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| AcdefError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })
}

fn path_value(path: &Path) -> Value {
    Value::String(path.display().to_string())
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AcdefError::invalid_config(key, raw, "not a valid number"))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AcdefError::invalid_config(key, raw, "not a valid boolean")),
    }
}

fn check_unit_interval(key: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AcdefError::invalid_config(key, value, "must be between 0 and 1"))
    }
}

fn check_at_least_one(key: &str, value: u64) -> Result<()> {
    if value >= 1 {
        Ok(())
    } else {
        Err(AcdefError::invalid_config(key, value, "must be at least 1"))
    }
}

fn check_seconds(key: &str, value: f64) -> Result<()> {
    // Must also fit in a `Duration`; the accessors convert without checking
    match Duration::try_from_secs_f64(value) {
        Ok(_) => Ok(()),
        Err(_) => Err(AcdefError::invalid_config(
            key,
            value,
            "must be a finite, non-negative number of seconds within Duration range",
        )),
    }
}

fn check_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AcdefError::invalid_config(key, "\"\"", "must not be empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: AcdefError) -> (String, String, String) {
        match err {
            AcdefError::InvalidConfiguration {
                field,
                value,
                constraint,
            } => (field, value, constraint),
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.system().name, "ACDEF");
        assert_eq!(config.evolution().population_size, 50);
        assert_eq!(config.network().max_retries, 3);
        assert_eq!(config.network().retry_delay(), Duration::from_secs(1));
        assert_eq!(config.overridden_keys().count(), 0);
    }

    #[test]
    fn test_mapping_reflects_overrides_and_defaults() {
        let config = Config::from_overrides([
            ("RL_EXPLORATION_RATE", "0.5"),
            ("evolution_population_size", "20"),
            ("MONITORING_ENABLED", "false"),
            ("STORE_CREDENTIALS_PATH", "/etc/acdef/creds.json"),
        ])
        .unwrap();

        let mapping = config.to_mapping();
        assert_eq!(mapping.len(), CONFIG_KEYS.len());
        for key in CONFIG_KEYS {
            assert!(mapping.contains_key(key), "missing {key}");
        }

        assert_eq!(mapping["RL_EXPLORATION_RATE"], Value::from(0.5));
        assert_eq!(mapping["EVOLUTION_POPULATION_SIZE"], Value::from(20));
        assert_eq!(mapping["MONITORING_ENABLED"], Value::from(false));
        assert_eq!(
            mapping["STORE_CREDENTIALS_PATH"],
            Value::from("/etc/acdef/creds.json")
        );
        // untouched defaults
        assert_eq!(mapping["EVOLUTION_MUTATION_RATE"], Value::from(0.1));
        assert_eq!(mapping["SYSTEM_NAME"], Value::from("ACDEF"));
        assert_eq!(mapping["DATA_DIR"], Value::from("./data"));

        let overridden: Vec<&str> = config.overridden_keys().collect();
        assert_eq!(overridden.len(), 4);
        assert!(overridden.contains(&"EVOLUTION_POPULATION_SIZE"));
    }

    #[test]
    fn test_mapping_excludes_internal_fields() {
        let config = Config::from_overrides([("VERSION", "2.0.0")]).unwrap();
        let mapping = config.to_mapping();
        assert!(mapping.keys().all(|k| CONFIG_KEYS.contains(&k.as_str())));
        assert!(!mapping.contains_key("overridden"));
        assert_eq!(mapping["STORE_CREDENTIALS_PATH"], Value::Null);
    }

    #[test]
    fn test_population_below_minimum_rejected() {
        let err = Config::from_overrides([("EVOLUTION_POPULATION_SIZE", "5")]).unwrap_err();
        let (field, value, constraint) = field_of(err);
        assert_eq!(field, "EVOLUTION_POPULATION_SIZE");
        assert_eq!(value, "5");
        assert!(constraint.contains("10"), "constraint: {constraint}");
    }

    #[test]
    fn test_rates_outside_unit_interval_rejected() {
        for (key, value) in [
            ("RL_EXPLORATION_RATE", "1.5"),
            ("RL_EXPLORATION_RATE", "-0.1"),
            ("EVOLUTION_MUTATION_RATE", "2"),
            ("EVOLUTION_MUTATION_RATE", "NaN"),
            ("DECISION_THRESHOLD", "1.01"),
        ] {
            let err = Config::from_overrides([(key, value)]).unwrap_err();
            let (field, _, constraint) = field_of(err);
            assert_eq!(field, key);
            assert!(constraint.contains("between 0 and 1"));
        }
    }

    #[test]
    fn test_boundary_rates_accepted() {
        let config = Config::from_overrides([
            ("RL_EXPLORATION_RATE", "0"),
            ("EVOLUTION_MUTATION_RATE", "1"),
            ("EVOLUTION_POPULATION_SIZE", "10"),
        ])
        .unwrap();
        assert_eq!(config.learning().exploration_rate, 0.0);
        assert_eq!(config.evolution().mutation_rate, 1.0);
    }

    #[test]
    fn test_elitism_cannot_exceed_population() {
        let err = Config::from_overrides([
            ("EVOLUTION_POPULATION_SIZE", "12"),
            ("EVOLUTION_ELITISM_COUNT", "13"),
        ])
        .unwrap_err();
        let (field, _, _) = field_of(err);
        assert_eq!(field, "EVOLUTION_ELITISM_COUNT");
    }

    #[test]
    fn test_unknown_key_and_bad_values_rejected() {
        let (field, _, constraint) =
            field_of(Config::from_overrides([("NOT_A_KEY", "1")]).unwrap_err());
        assert_eq!(field, "NOT_A_KEY");
        assert_eq!(constraint, "unknown configuration key");

        let (field, value, _) =
            field_of(Config::from_overrides([("MAX_RETRIES", "three")]).unwrap_err());
        assert_eq!(field, "MAX_RETRIES");
        assert_eq!(value, "three");

        let (field, _, _) =
            field_of(Config::from_overrides([("MONITORING_ENABLED", "maybe")]).unwrap_err());
        assert_eq!(field, "MONITORING_ENABLED");

        let (field, _, _) =
            field_of(Config::from_overrides([("RETRY_DELAY_SECONDS", "-1")]).unwrap_err());
        assert_eq!(field, "RETRY_DELAY_SECONDS");

        let (field, _, _) = field_of(Config::from_overrides([("MAX_RETRIES", "0")]).unwrap_err());
        assert_eq!(field, "MAX_RETRIES");
    }

    #[test]
    fn test_seconds_outside_duration_range_rejected() {
        for (key, value) in [
            ("RETRY_DELAY_SECONDS", "1e20"),
            ("TIMEOUT_SECONDS", "1e20"),
            ("TIMEOUT_SECONDS", "inf"),
            ("TIMEOUT_SECONDS", "NaN"),
        ] {
            let (field, _, constraint) = field_of(Config::from_overrides([(key, value)]).unwrap_err());
            assert_eq!(field, key);
            assert!(constraint.contains("seconds"), "constraint: {constraint}");
        }

        let config = Config::from_overrides([
            ("RETRY_DELAY_SECONDS", "0.25"),
            ("TIMEOUT_SECONDS", "86400"),
        ])
        .unwrap();
        assert_eq!(config.network().retry_delay(), Duration::from_millis(250));
        assert_eq!(config.network().timeout(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_empty_credentials_path_is_absent() {
        let config = Config::from_overrides([("STORE_CREDENTIALS_PATH", "  ")]).unwrap();
        assert!(config.store().credentials_path.is_none());
    }

    #[test]
    fn test_log_file_path_uses_lowercase_system_name() {
        let config =
            Config::from_overrides([("SYSTEM_NAME", "Fabric"), ("LOGS_DIR", "/var/log/acdef")])
                .unwrap();
        assert_eq!(
            config.log_file_path(),
            PathBuf::from("/var/log/acdef/fabric.log")
        );
    }

    #[test]
    fn test_ensure_directories_creates_all_and_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data");
        let logs = root.path().join("nested/logs");
        let models = root.path().join("models");
        let config = Config::from_overrides([
            ("DATA_DIR", data.to_str().unwrap()),
            ("LOGS_DIR", logs.to_str().unwrap()),
            ("MODELS_DIR", models.to_str().unwrap()),
        ])
        .unwrap();

        config.ensure_directories().unwrap();
        config.ensure_directories().unwrap();

        assert!(data.is_dir());
        assert!(logs.is_dir());
        assert!(models.is_dir());
    }

    #[test]
    fn test_ensure_directories_wraps_filesystem_error() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let config =
            Config::from_overrides([("DATA_DIR", blocker.join("data").to_str().unwrap())]).unwrap();

        match config.ensure_directories() {
            Err(AcdefError::DirectoryCreation { path, .. }) => {
                assert_eq!(path, blocker.join("data"));
            }
            other => panic!("expected DirectoryCreation, got {other:?}"),
        }
    }
}
