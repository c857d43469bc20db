use crate::config::{Config, Mode};
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::sync::Once;

pub const LOG_ENV: &str = "EAZICALC_LOG";
pub const LOG_FILE: &str = "eazicalc.log";

/// Sets up `env_logger` once. The full screen interface owns the terminal,
/// so in that mode records go to a file in the data directory.
pub fn init(config: &Config) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let mut builder = Builder::new();
        builder.filter_level(config.log_level);
        builder.parse_env(Env::new().filter(LOG_ENV));
        builder.format_timestamp_secs();

        if config.mode == Mode::Tui {
            let path = config.data_dir.join(LOG_FILE);
            let file = fs::create_dir_all(&config.data_dir).and_then(|_| {
                OpenOptions::new().create(true).append(true).open(&path)
            });
            match file {
                Ok(file) => {
                    builder.target(Target::Pipe(Box::new(file)));
                }
                // nowhere safe to write
                Err(_) => return,
            }
        }

        builder.try_init().ok();
    });
}
