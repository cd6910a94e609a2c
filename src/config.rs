use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::pipeline::FailurePolicy;
use crate::report::DEFAULT_THRESHOLD;

/// Lowest threshold the CLI accepts; anything below flags nearly every pair.
pub const MIN_CLI_THRESHOLD: f64 = 50.0;
pub const MAX_CLI_THRESHOLD: f64 = 100.0;

/// Defaults loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Command
/// line flags override anything set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Similarity percentage a pair must exceed to be reported (COPYCATCH_THRESHOLD)
    pub threshold: f64,
    /// What to do with unreadable documents (COPYCATCH_ON_UNREADABLE: abort | skip)
    pub on_unreadable: FailurePolicy,
    /// Where `--export-all` writes its artifacts (COPYCATCH_OUTPUT_DIR)
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            on_unreadable: FailurePolicy::Abort,
            output_dir: PathBuf::from("./output"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables. Unset variables fall
    /// back to the defaults; malformed ones are an error.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; `load` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let threshold = match lookup("COPYCATCH_THRESHOLD") {
            Some(raw) => parse_threshold(&raw)
                .with_context(|| format!("COPYCATCH_THRESHOLD is invalid: '{raw}'"))?,
            None => defaults.threshold,
        };

        let on_unreadable = match lookup("COPYCATCH_ON_UNREADABLE") {
            Some(raw) => raw
                .parse::<FailurePolicy>()
                .map_err(anyhow::Error::msg)
                .context("COPYCATCH_ON_UNREADABLE is invalid")?,
            None => defaults.on_unreadable,
        };

        let output_dir = lookup("COPYCATCH_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);

        Ok(Self {
            threshold,
            on_unreadable,
            output_dir,
        })
    }
}

/// Parse a threshold for the command line, which accepts 50..=100.
pub fn parse_threshold(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("'{raw}' is not a number"))?;
    if !(MIN_CLI_THRESHOLD..=MAX_CLI_THRESHOLD).contains(&value) {
        anyhow::bail!(
            "threshold must be between {MIN_CLI_THRESHOLD} and {MAX_CLI_THRESHOLD}, got {value}"
        );
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_parse_threshold_range() {
        assert_eq!(parse_threshold("70").unwrap(), 70.0);
        assert_eq!(parse_threshold(" 50 ").unwrap(), 50.0);
        assert_eq!(parse_threshold("100").unwrap(), 100.0);
        assert!(parse_threshold("49.9").is_err());
        assert!(parse_threshold("101").is_err());
        assert!(parse_threshold("seventy").is_err());
        assert!(parse_threshold("NaN").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.threshold, 70.0);
        assert_eq!(config.on_unreadable, FailurePolicy::Abort);
        assert_eq!(config.output_dir, PathBuf::from("./output"));
    }

    #[test]
    fn test_unset_variables_use_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.on_unreadable, FailurePolicy::Abort);
        assert_eq!(config.output_dir, PathBuf::from("./output"));
    }

    #[test]
    fn test_every_variable_is_read() {
        let config = config_from(&[
            ("COPYCATCH_THRESHOLD", "82.5"),
            ("COPYCATCH_ON_UNREADABLE", "skip"),
            ("COPYCATCH_OUTPUT_DIR", "/tmp/reports"),
        ])
        .unwrap();
        assert_eq!(config.threshold, 82.5);
        assert_eq!(config.on_unreadable, FailurePolicy::Skip);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
    }

    #[test]
    fn test_malformed_threshold_is_an_error() {
        let err = config_from(&[("COPYCATCH_THRESHOLD", "high")]).unwrap_err();
        assert!(format!("{err:#}").contains("COPYCATCH_THRESHOLD"));

        let err = config_from(&[("COPYCATCH_THRESHOLD", "30")]).unwrap_err();
        assert!(format!("{err:#}").contains("between 50 and 100"));
    }

    #[test]
    fn test_malformed_policy_is_an_error() {
        let err = config_from(&[("COPYCATCH_ON_UNREADABLE", "ignore")]).unwrap_err();
        assert!(format!("{err:#}").contains("COPYCATCH_ON_UNREADABLE"));
    }
}
