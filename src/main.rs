#[cfg(feature = "line")]
mod line_mode;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::Result;
use eazicalc::config::{self, Config, Mode};
use eazicalc::{logging, HistoryStore, Session};
use log::info;

fn main() -> Result<()> {
    let config = Config::from_args(std::env::args().skip(1));
    if config.show_help {
        println!("{}", config::usage());
        return Ok(());
    }

    logging::init(&config);

    let store = config.persist.then(|| HistoryStore::new(&config.data_dir));
    let session = match &store {
        Some(store) => {
            info!("restoring history from {}", store.dir().display());
            Session::restore(store.load_history(), store.load_last_result())
        }
        None => Session::new(),
    };

    match config.mode {
        #[cfg(feature = "tui")]
        Mode::Tui => tui_mode::run_tui(session, store),
        #[cfg(feature = "line")]
        Mode::Line => line_mode::run_line(session, store),
        #[allow(unreachable_patterns)]
        mode => anyhow::bail!("{mode:?} interface is not compiled in"),
    }
}
