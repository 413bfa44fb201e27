//! Startup configuration.
//!
//! Values come from the command line (or the matching environment
//! variables) through [`Cli`], are validated into a [`Config`], and are then
//! installed process-wide with [`install`]. The bubbletea runtime builds the
//! [`App`](crate::app::App) through an argument-less `init`, so the app reads
//! its settings back with [`current`].

use crate::duration::DEFAULT_PRESETS;
use crate::error::{Error, Result};
use crate::session::DEFAULT_DURATION_SECONDS;
use clap::Parser;
use once_cell::sync::OnceCell;
use std::path::PathBuf;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Command-line arguments of the `meditate` binary.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "meditate")]
#[command(about = "A quiet countdown for meditation sessions")]
#[command(version)]
#[command(after_help = r#"KEYS:
    ←/→ or 1-9    choose a duration
    enter         begin
    space         halt / resume
    q             quit the session (or the program when idle)
    ?             more help

DURATIONS:
    10s, 5m, 1m30s, 1h, or a bare number of seconds
"#)]
pub struct Cli {
    /// Initially selected duration
    #[arg(short, long, env = "MEDITATE_DURATION")]
    pub duration: Option<String>,

    /// Comma-separated durations offered on the start screen
    #[arg(short, long, value_delimiter = ',', env = "MEDITATE_PRESETS")]
    pub presets: Vec<String>,

    /// Append debug logs to this file
    #[arg(long, env = "MEDITATE_LOG")]
    pub log_file: Option<PathBuf>,

    /// Draw inline instead of switching to the alternate screen
    #[arg(long)]
    pub no_alt_screen: bool,
}

/// Validated settings used to build the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Duration selected when the program starts, in seconds.
    pub initial_duration_seconds: u32,
    /// Durations offered by the selector, in seconds.
    pub presets: Vec<u32>,
    /// Where to write logs, if anywhere.
    pub log_file: Option<PathBuf>,
    /// Whether to take over the whole terminal.
    pub alt_screen: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_duration_seconds: DEFAULT_DURATION_SECONDS,
            presets: DEFAULT_PRESETS.to_vec(),
            log_file: None,
            alt_screen: true,
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = Error;

    fn try_from(cli: Cli) -> Result<Self> {
        let defaults = Config::default();

        let presets = if cli.presets.is_empty() {
            defaults.presets
        } else {
            let parsed = cli
                .presets
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(parse_duration)
                .collect::<Result<Vec<u32>>>()?;
            if parsed.is_empty() {
                return Err(Error::EmptyPresets);
            }
            parsed
        };

        let initial_duration_seconds = match cli.duration.as_deref() {
            Some(d) => parse_duration(d)?,
            None if presets.contains(&defaults.initial_duration_seconds) => {
                defaults.initial_duration_seconds
            }
            None => presets.iter().copied().min().unwrap_or(DEFAULT_DURATION_SECONDS),
        };

        Ok(Self {
            initial_duration_seconds,
            presets,
            log_file: cli.log_file,
            alt_screen: !cli.no_alt_screen,
        })
    }
}

/// Parses a duration such as `10s`, `5m`, `1m30s`, `1h` or `90` into seconds.
///
/// A bare number is taken as seconds. Units may be combined in any order but
/// each component needs a number in front of it. Zero is rejected.
pub fn parse_duration(input: &str) -> Result<u32> {
    let text = input.trim();
    let invalid = |reason| Error::InvalidDuration {
        input: input.to_string(),
        reason,
    };

    if text.is_empty() {
        return Err(invalid("empty"));
    }

    let mut total: u64 = 0;
    let mut number = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            number.push(c);
            continue;
        }
        let scale = match c.to_ascii_lowercase() {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => return Err(invalid("unknown unit")),
        };
        if number.is_empty() {
            return Err(invalid("unit without a number"));
        }
        let value: u64 = number.parse().map_err(|_| invalid("number too large"))?;
        total = value
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(|| invalid("number too large"))?;
        number.clear();
    }
    if !number.is_empty() {
        let value: u64 = number.parse().map_err(|_| invalid("number too large"))?;
        total = total
            .checked_add(value)
            .ok_or_else(|| invalid("number too large"))?;
    }

    let seconds = u32::try_from(total).map_err(|_| invalid("number too large"))?;
    if seconds == 0 {
        return Err(Error::ZeroDuration(input.to_string()));
    }
    Ok(seconds)
}

/// Makes `config` the process-wide configuration. Can only succeed once.
pub fn install(config: Config) -> Result<()> {
    CONFIG.set(config).map_err(|_| Error::AlreadyConfigured)
}

/// The installed configuration, or the defaults when none was installed.
pub fn current() -> Config {
    CONFIG.get().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration("10s").unwrap(), 10);
        assert_eq!(parse_duration("5m").unwrap(), 300);
        assert_eq!(parse_duration("1m30s").unwrap(), 90);
        assert_eq!(parse_duration("1h").unwrap(), 3600);
        assert_eq!(parse_duration("90").unwrap(), 90);
        assert_eq!(parse_duration(" 15M ").unwrap(), 900);
        assert_eq!(parse_duration("1m5").unwrap(), 65);
    }

    #[test]
    fn test_parse_duration_rejects() {
        assert!(matches!(
            parse_duration(""),
            Err(Error::InvalidDuration { reason: "empty", .. })
        ));
        assert!(matches!(
            parse_duration("5x"),
            Err(Error::InvalidDuration { reason: "unknown unit", .. })
        ));
        assert!(matches!(
            parse_duration("m"),
            Err(Error::InvalidDuration { .. })
        ));
        assert!(matches!(parse_duration("-5"), Err(Error::InvalidDuration { .. })));
        assert!(matches!(parse_duration("0m"), Err(Error::ZeroDuration(_))));
        assert!(matches!(
            parse_duration("99999999999h"),
            Err(Error::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_config_from_empty_cli_is_default() {
        let config = Config::try_from(Cli::default()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.initial_duration_seconds, 600);
    }

    #[test]
    fn test_config_from_cli() {
        let cli = Cli::parse_from([
            "meditate",
            "--duration",
            "2m",
            "--presets",
            "1m,2m,20m",
            "--no-alt-screen",
        ]);
        let config = Config::try_from(cli).unwrap();
        assert_eq!(config.initial_duration_seconds, 120);
        assert_eq!(config.presets, vec![60, 120, 1200]);
        assert!(!config.alt_screen);
    }

    #[test]
    fn test_presets_without_default_pick_shortest() {
        let cli = Cli {
            presets: vec!["20m".into(), "3m".into()],
            ..Cli::default()
        };
        let config = Config::try_from(cli).unwrap();
        assert_eq!(config.initial_duration_seconds, 180);
    }

    #[test]
    fn test_blank_presets_are_rejected() {
        let cli = Cli {
            presets: vec![" ".into(), "".into()],
            ..Cli::default()
        };
        assert!(matches!(Config::try_from(cli), Err(Error::EmptyPresets)));
    }

    #[test]
    fn test_bad_preset_is_reported() {
        let cli = Cli {
            presets: vec!["5m".into(), "soon".into()],
            ..Cli::default()
        };
        assert!(Config::try_from(cli).is_err());
    }
}
