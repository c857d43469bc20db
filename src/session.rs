use crate::calc_engine::{calculate, EvaluationTrace, Step, PLACEHOLDER};
use crate::format::{format_result, format_with_spaces};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Shown for every failed calculation.
pub const ERROR_MESSAGE: &str = "Invalid expression";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub input: String,
    pub expression: String,
    pub result: Result<f64, String>,
    #[serde(default)]
    pub detailed_mode: bool,
    #[serde(skip)]
    pub detailed_steps: Vec<Step>,
    #[serde(skip)]
    pub duration: Duration,
}

impl HistoryEntry {
    /// `"<expression> = <result>"` for successes, the raw input otherwise.
    pub fn display_line(&self) -> String {
        match &self.result {
            Ok(value) => format!("{} = {}", self.expression, format_result(*value)),
            Err(_) => self.expression.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ignored,
    Quit,
    Cleared,
    Help,
    Evaluated { index: usize },
}

#[derive(Debug, Default)]
pub struct Session {
    last_result: Option<f64>,
    history: Vec<HistoryEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restore(history: Vec<HistoryEntry>, last_result: Option<f64>) -> Self {
        Session {
            last_result,
            history,
        }
    }

    pub fn last_result(&self) -> Option<f64> {
        self.last_result
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn submit(&mut self, raw: &str) -> Outcome {
        let input = raw.trim();
        if input.is_empty() {
            return Outcome::Ignored;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" | "q" => return Outcome::Quit,
            "clear" | "reset" => {
                self.clear();
                return Outcome::Cleared;
            }
            "help" => return Outcome::Help,
            _ => {}
        }

        let (detailed_mode, expr) = split_details(input);
        if expr.is_empty() {
            self.history.push(HistoryEntry {
                input: input.to_string(),
                expression: input.to_string(),
                result: Err("Please enter a valid expression after 'details'".to_string()),
                detailed_mode: false,
                detailed_steps: Vec::new(),
                duration: Duration::ZERO,
            });
            return Outcome::Evaluated {
                index: self.history.len() - 1,
            };
        }

        let start_time = Instant::now();
        let mut trace = EvaluationTrace::new(detailed_mode);
        let result = calculate(expr, self.last_result, &mut trace);
        let duration = start_time.elapsed();

        let entry = match result {
            Ok(value) => {
                debug!("{:?} = {} in {:?}", expr, value, duration);
                let entry = HistoryEntry {
                    input: expr.to_string(),
                    expression: self.display_expression(expr),
                    result: Ok(value),
                    detailed_mode,
                    detailed_steps: trace.steps,
                    duration,
                };
                self.last_result = Some(value);
                entry
            }
            Err(e) => {
                debug!("{:?} rejected: {}", expr, e);
                HistoryEntry {
                    input: expr.to_string(),
                    expression: expr.to_string(),
                    result: Err(ERROR_MESSAGE.to_string()),
                    detailed_mode,
                    detailed_steps: Vec::new(),
                    duration,
                }
            }
        };

        self.history.push(entry);
        Outcome::Evaluated {
            index: self.history.len() - 1,
        }
    }

    pub fn clear(&mut self) {
        info!("clearing {} history entries", self.history.len());
        self.history.clear();
        self.last_result = None;
    }

    /// Input of a successful entry, for editing it again.
    pub fn recall(&self, index: usize) -> Option<&str> {
        self.history
            .get(index)
            .filter(|entry| entry.result.is_ok())
            .map(|entry| entry.input.as_str())
    }

    /// Expression as evaluated against the current last result.
    fn display_expression(&self, expr: &str) -> String {
        let mut shown = expr.trim().to_string();
        if let Some(last) = self.last_result {
            if shown.starts_with(['+', '-', '*', '/', '×', '÷', ':']) {
                shown.insert(0, PLACEHOLDER);
            }
            shown = shown.replace(PLACEHOLDER, &last.to_string());
        }
        format_with_spaces(&shown)
    }
}

fn split_details(input: &str) -> (bool, &str) {
    const PREFIX: &str = "details ";
    const SUFFIX: &str = " details";

    if input.eq_ignore_ascii_case("details") {
        return (true, "");
    }
    if let Some(head) = input.get(..PREFIX.len()) {
        if head.eq_ignore_ascii_case(PREFIX) {
            return (true, input[PREFIX.len()..].trim());
        }
    }
    if let Some(cut) = input.len().checked_sub(SUFFIX.len()) {
        if let Some(tail) = input.get(cut..) {
            if tail.eq_ignore_ascii_case(SUFFIX) {
                return (true, input[..cut].trim());
            }
        }
    }
    (false, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn success_updates_last_result() {
        let mut session = Session::new();
        assert_eq!(session.submit("2+3"), Outcome::Evaluated { index: 0 });
        assert_eq!(session.last_result(), Some(5.0));
        session.submit("x*2");
        assert_eq!(session.last_result(), Some(10.0));
        assert_eq!(session.history()[1].display_line(), "5 * 2 = 10");
    }

    #[test]
    fn leading_operator_is_shown_with_previous_result() {
        let mut session = Session::restore(Vec::new(), Some(5.0));
        session.submit("+3");
        assert_eq!(session.history()[0].display_line(), "5 + 3 = 8");
        assert_eq!(session.last_result(), Some(8.0));
    }

    #[test]
    fn shown_expression_uses_unrounded_previous_result() {
        let mut session = Session::restore(Vec::new(), Some(1.0 / 3.0));
        session.submit("x*3");
        assert_eq!(
            session.history()[0].display_line(),
            "0.3333333333333333 * 3 = 1"
        );
    }

    #[test]
    fn failure_keeps_last_result() {
        let mut session = Session::restore(Vec::new(), Some(5.0));
        session.submit("3/0");
        assert_eq!(session.last_result(), Some(5.0));
        let entry = &session.history()[0];
        assert_eq!(entry.result, Err(ERROR_MESSAGE.to_string()));
        assert_eq!(entry.display_line(), "3/0");
    }

    #[test]
    fn commands_are_not_evaluated() {
        let mut session = Session::new();
        assert_eq!(session.submit("  "), Outcome::Ignored);
        assert_eq!(session.submit("QUIT"), Outcome::Quit);
        assert_eq!(session.submit("help"), Outcome::Help);
        assert!(session.history().is_empty());
    }

    #[test]
    fn clear_drops_history_and_last_result() {
        let mut session = Session::new();
        session.submit("1+1");
        assert_eq!(session.submit("clear"), Outcome::Cleared);
        assert!(session.history().is_empty());
        assert_eq!(session.last_result(), None);
        session.submit("x+1");
        assert!(session.history()[0].result.is_err());
    }

    #[test]
    fn details_records_steps() {
        let mut session = Session::new();
        session.submit("details 2+3*4");
        let entry = &session.history()[0];
        assert!(entry.detailed_mode);
        assert_eq!(entry.detailed_steps.len(), 2);
        assert_eq!(entry.result, Ok(14.0));

        session.submit("details");
        assert!(session.history()[1].result.is_err());
    }

    #[test]
    fn recall_only_returns_successes() {
        let mut session = Session::new();
        session.submit("2*(3+4)");
        session.submit("2*");
        assert_eq!(session.recall(0), Some("2*(3+4)"));
        assert_eq!(session.recall(1), None);
        assert_eq!(session.recall(9), None);
    }
}
