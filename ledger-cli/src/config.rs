use anyhow::{Context, Result};
use ledger_core::Frequency;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional, read-only session defaults. Rules and goals found here are
/// applied at startup and never written back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputSection,
    pub report: ReportSection,
    /// Applied in file order, so earlier entries win on shared keywords
    pub rules: Vec<RuleEntry>,
    /// Category -> target amount per period
    pub goals: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    pub frequency: Frequency,
    pub period_index: usize,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            frequency: Frequency::Biweekly,
            period_index: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub category: String,
    pub keywords: Vec<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".ledger").join("config.toml"))
}

/// Load `explicit` if given (it must exist), else the default path if
/// present, else built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };
    parse_config_file(&path)
}

fn parse_config_file(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Split a `KEY=VALUE` command-line pair.
pub fn split_pair(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let (k, v) = (k.trim(), v.trim());
    if k.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((k.to_string(), v.to_string()))
}

/// Parse `CATEGORY=AMOUNT`.
pub fn parse_goal(s: &str) -> Result<(String, f64), String> {
    let (category, amount) = split_pair(s)?;
    let amount = ledger_core::parse_amount(&amount)?;
    Ok((category, amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[input]
csv = "transactions.csv"

[report]
frequency = "M"
period_index = 2

[[rules]]
category = "Housing"
keywords = ["cheque", "rent"]

[[rules]]
category = "Tax"
keywords = ["tax"]

[goals]
housing = 500000.0
tax = 200000
"#;
        let cfg: Config = toml::from_str(toml).unwrap();
        assert_eq!(cfg.input.csv, Some(PathBuf::from("transactions.csv")));
        assert_eq!(cfg.report.frequency, Frequency::Monthly);
        assert_eq!(cfg.report.period_index, 2);
        assert_eq!(cfg.rules.len(), 2);
        assert_eq!(cfg.rules[0].keywords, vec!["cheque", "rent"]);
        assert_eq!(cfg.goals["tax"], 200000.0);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.report.frequency, Frequency::Biweekly);
        assert_eq!(cfg.report.period_index, 1);
    }

    #[test]
    fn test_bad_frequency_rejected() {
        assert!(toml::from_str::<Config>("[report]\nfrequency = \"fortnight-ish\"\n").is_err());
    }

    #[test]
    fn test_explicit_missing_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("ledger.toml");
        fs::write(&p, "[goals]\nhousing = 10.5\n").unwrap();
        let cfg = load_config(Some(&p)).unwrap();
        assert_eq!(cfg.goals["housing"], 10.5);
    }

    #[test]
    fn test_split_pairs() {
        assert_eq!(
            split_pair("Housing=cheque").unwrap(),
            ("Housing".to_string(), "cheque".to_string())
        );
        assert!(split_pair("Housing").is_err());
        assert!(split_pair("=x").is_err());
        assert_eq!(parse_goal("tax=1,500.25").unwrap().1, 1500.25);
        assert!(parse_goal("tax=lots").is_err());
    }
}
