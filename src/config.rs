use log::LevelFilter;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "EAZICALC_DATA_DIR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tui,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub data_dir: PathBuf,
    pub persist: bool,
    pub log_level: LevelFilter,
    pub show_help: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: if cfg!(feature = "tui") { Mode::Tui } else { Mode::Line },
            data_dir: default_data_dir(),
            persist: true,
            log_level: LevelFilter::Warn,
            show_help: false,
        }
    }
}

impl Config {
    /// Builds the config from command line arguments, program name excluded.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Config::default();

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--line" => config.mode = Mode::Line,
                "--tui" => config.mode = Mode::Tui,
                "--no-persist" => config.persist = false,
                "--quiet" | "-q" => config.log_level = LevelFilter::Off,
                "--help" | "-h" => config.show_help = true,
                _ => {
                    if let Some(dir) = arg.strip_prefix("--data-dir=") {
                        config.data_dir = PathBuf::from(dir);
                    } else if let Some(level) = arg.strip_prefix("--log-level=") {
                        if let Ok(level) = level.parse() {
                            config.log_level = level;
                        }
                    }
                }
            }
        }
        config
    }
}

fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".eazicalc"))
        .unwrap_or_else(|_| std::env::temp_dir().join("eazicalc"))
}

pub fn usage() -> &'static str {
    "eazicalc - chat style calculator

USAGE:
    eazicalc [OPTIONS]

OPTIONS:
    --tui                    Full screen interface (default)
    --line                   Plain line interface
    --data-dir=PATH          Where history is kept (env: EAZICALC_DATA_DIR)
    --no-persist             Do not load or save history
    --log-level=LEVEL        off/error/warn/info/debug/trace (env: EAZICALC_LOG)
    --quiet, -q              Disable logging
    --help, -h               Show this help"
}
