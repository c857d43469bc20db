pub mod calc_engine;
pub mod config;
pub mod format;
pub mod help;
pub mod logging;
pub mod session;
pub mod storage;

pub use calc_engine::{calculate, evaluate, perform_operation, preprocess, validate_charset, EvalError};
pub use format::format_result;
pub use session::{HistoryEntry, Outcome, Session};
pub use storage::HistoryStore;
