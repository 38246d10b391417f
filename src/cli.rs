//! Command-line interface for the `acdef` binary
//!
//! Every option ends up as a configuration override, so the CLI, `.env` and
//! programmatic construction all go through [`Config::from_overrides`].
//!
//! [`Config::from_overrides`]: crate::config::Config::from_overrides

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ACDEF - Autonomous Cross-Domain Evolutionary Fabric
#[derive(Parser, Debug, Clone)]
#[command(name = "acdef")]
#[command(about = "Validate ACDEF configuration and bootstrap the document store")]
pub struct Args {
    /// Configuration override, repeatable (e.g. --set EVOLUTION_POPULATION_SIZE=100)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,

    /// Log level (DEBUG, INFO, WARNING, ERROR, CRITICAL)
    #[arg(long, env = "ACDEF_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Document store credentials file (takes precedence over STORE_CREDENTIALS_PATH)
    #[arg(long, env = "ACDEF_CREDENTIALS_PATH")]
    pub credentials: Option<PathBuf>,

    /// Base directory for data/, logs/ and models/
    #[arg(long, env = "ACDEF_HOME")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the validated configuration as JSON
    Show,
    /// Create the data, logs and models directories
    InitDirs,
    /// Connect to the document store and record a startup status document
    Connect {
        /// Note stored with the status document
        #[arg(long)]
        note: Option<String>,
    },
}

impl Args {
    /// Overrides in application order: `--home`, `--log-level`, then `--set`
    /// pairs, so an explicit `--set` always wins.
    pub fn config_overrides(&self) -> Vec<(String, String)> {
        let mut overrides = Vec::new();

        if let Some(home) = &self.home {
            for (key, dir) in [
                ("DATA_DIR", "data"),
                ("LOGS_DIR", "logs"),
                ("MODELS_DIR", "models"),
            ] {
                overrides.push((key.to_string(), home.join(dir).display().to_string()));
            }
        }

        if let Some(level) = &self.log_level {
            overrides.push(("LOG_LEVEL".to_string(), level.clone()));
        }

        overrides.extend(self.overrides.iter().cloned());
        overrides
    }

    /// Subcommand to run, `show` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Show)
    }
}

/// Parse a `KEY=VALUE` pair
pub fn parse_override(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }

    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("MAX_RETRIES=5").unwrap(),
            ("MAX_RETRIES".to_string(), "5".to_string())
        );
        // only the first '=' splits
        assert_eq!(
            parse_override("STORE_COLLECTION_PREFIX=a=b").unwrap().1,
            "a=b"
        );
        assert!(parse_override("MAX_RETRIES").is_err());
        assert!(parse_override("=5").is_err());
    }

    #[test]
    fn test_overrides_order_and_defaults() {
        let args = Args::try_parse_from([
            "acdef",
            "--home",
            "/srv/acdef",
            "--set",
            "LOGS_DIR=/var/log/acdef",
            "--set",
            "MAX_RETRIES=5",
            "connect",
            "--note",
            "nightly",
        ])
        .unwrap();

        let overrides = args.config_overrides();
        assert_eq!(overrides[0], ("DATA_DIR".to_string(), "/srv/acdef/data".to_string()));
        let logs: Vec<_> = overrides
            .iter()
            .filter(|(key, _)| key == "LOGS_DIR")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(logs, vec!["/srv/acdef/logs", "/var/log/acdef"]);
        assert_eq!(
            args.command(),
            Command::Connect {
                note: Some("nightly".to_string())
            }
        );
    }

    #[test]
    fn test_command_defaults_to_show() {
        let args = Args::try_parse_from(["acdef"]).unwrap();
        assert_eq!(args.command(), Command::Show);
        assert!(args.overrides.is_empty());
    }

    #[test]
    fn test_malformed_set_is_rejected() {
        assert!(Args::try_parse_from(["acdef", "--set", "NOVALUE"]).is_err());
    }
}
