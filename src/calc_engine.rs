use log::{debug, trace};
use thiserror::Error;

/// Stands for the result of the previous successful calculation.
pub const PLACEHOLDER: char = 'x';

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    EmptyInput,
    #[error("'x' used but there is no previous result")]
    UnresolvedPlaceholder,
    #[error("invalid character: '{0}'")]
    InvalidCharacter(char),
    #[error("operator without operand")]
    MalformedOperatorPlacement,
    #[error("unmatched parenthesis")]
    UnmatchedParenthesis,
    #[error("division by zero")]
    DivisionByZero,
    #[error("incomplete expression")]
    IncompleteExpression,
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),
    #[error("result is too large")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
        }
    }

    pub fn apply(self, a: f64, b: f64) -> Result<f64, EvalError> {
        match self {
            Operator::Add => Ok(a + b),
            Operator::Sub => Ok(a - b),
            Operator::Mul => Ok(a * b),
            Operator::Div if b == 0.0 => Err(EvalError::DivisionByZero),
            Operator::Div => Ok(a / b),
        }
    }
}

/// Entry of the operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    Op(Operator),
    LParen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Start,
    Operand,
    Operator,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub operation: String,
    pub result: f64,
}

pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: f64) {
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

/// Evaluates raw user input against the previous result.
pub fn calculate(
    raw: &str,
    last_result: Option<f64>,
    trace: &mut EvaluationTrace,
) -> Result<f64, EvalError> {
    if raw.trim().is_empty() {
        return Err(EvalError::EmptyInput);
    }
    let normalized = preprocess(raw, last_result)?;
    debug!("normalized {:?} to {:?}", raw, normalized);
    evaluate_traced(&normalized, trace)
}

/// Normalizes operator glyphs, drops whitespace and substitutes the placeholder.
pub fn preprocess(raw: &str, last_result: Option<f64>) -> Result<String, EvalError> {
    let mut expr: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '×' => '*',
            '÷' | ':' => '/',
            _ => c,
        })
        .collect();

    if expr.is_empty() {
        return Err(EvalError::EmptyInput);
    }

    if let Some(last) = last_result {
        if expr.starts_with(['+', '-', '*', '/']) {
            expr.insert(0, PLACEHOLDER);
        }
        if expr.contains(PLACEHOLDER) {
            expr = expr.replace(PLACEHOLDER, &last.to_string());
        }
    } else if expr.contains(PLACEHOLDER) {
        return Err(EvalError::UnresolvedPlaceholder);
    }

    validate_charset(&expr)?;
    Ok(expr)
}

pub fn validate_charset(expr: &str) -> Result<(), EvalError> {
    match expr.chars().find(|&c| !is_expression_char(c)) {
        Some(c) => Err(EvalError::InvalidCharacter(c)),
        None => Ok(()),
    }
}

fn is_expression_char(c: char) -> bool {
    matches!(c, '0'..='9' | '+' | '-' | '*' | '/' | '.' | '(' | ')')
}

pub fn evaluate(normalized: &str) -> Result<f64, EvalError> {
    evaluate_traced(normalized, &mut EvaluationTrace::new(false))
}

pub fn evaluate_traced(normalized: &str, trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
    let mut operands: Vec<f64> = Vec::new();
    let mut operators: Vec<StackOp> = Vec::new();
    let mut numeral = String::new();
    let mut last = Token::Start;

    for c in normalized.chars() {
        match c {
            '0'..='9' | '.' => {
                numeral.push(c);
                last = Token::Operand;
            }
            '(' => {
                if numeral == "-" {
                    numeral.clear();
                    operands.push(-1.0);
                    operators.push(StackOp::Op(Operator::Mul));
                } else if !numeral.is_empty() {
                    flush_numeral(&mut numeral, &mut operands)?;
                    operators.push(StackOp::Op(Operator::Mul));
                }
                operators.push(StackOp::LParen);
                last = Token::LParen;
            }
            ')' => {
                flush_numeral(&mut numeral, &mut operands)?;
                loop {
                    match operators.last() {
                        None => return Err(EvalError::UnmatchedParenthesis),
                        Some(StackOp::LParen) => break,
                        Some(StackOp::Op(_)) => {
                            perform_operation(&mut operands, &mut operators, trace)?;
                        }
                    }
                }
                operators.pop();
                last = Token::RParen;
            }
            _ => {
                let op = Operator::from_char(c).ok_or(EvalError::InvalidCharacter(c))?;
                if numeral.is_empty() {
                    match last {
                        Token::Start | Token::Operator | Token::LParen if op == Operator::Sub => {
                            numeral.push('-');
                            continue;
                        }
                        Token::RParen => {}
                        _ => return Err(EvalError::MalformedOperatorPlacement),
                    }
                } else {
                    flush_numeral(&mut numeral, &mut operands)?;
                }

                while let Some(&StackOp::Op(top)) = operators.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    perform_operation(&mut operands, &mut operators, trace)?;
                }
                operators.push(StackOp::Op(op));
                last = Token::Operator;
            }
        }
    }

    flush_numeral(&mut numeral, &mut operands)?;
    while !operators.is_empty() {
        perform_operation(&mut operands, &mut operators, trace)?;
    }

    match operands.as_slice() {
        [value] if value.is_finite() => Ok(*value),
        [_] => Err(EvalError::Overflow),
        _ => Err(EvalError::IncompleteExpression),
    }
}

fn flush_numeral(numeral: &mut String, operands: &mut Vec<f64>) -> Result<(), EvalError> {
    if numeral.is_empty() {
        return Ok(());
    }
    if numeral == "-" {
        return Err(EvalError::MalformedOperatorPlacement);
    }
    let value = numeral
        .parse::<f64>()
        .map_err(|_| EvalError::InvalidNumber(numeral.clone()))?;
    operands.push(value);
    numeral.clear();
    Ok(())
}

/// Pops two operands and one operator, pushes `a <op> b` back.
pub fn perform_operation(
    operands: &mut Vec<f64>,
    operators: &mut Vec<StackOp>,
    trace: &mut EvaluationTrace,
) -> Result<f64, EvalError> {
    let op = match operators.last() {
        None => return Err(EvalError::IncompleteExpression),
        Some(StackOp::LParen) => return Err(EvalError::UnmatchedParenthesis),
        Some(&StackOp::Op(op)) => op,
    };
    if operands.len() < 2 {
        return Err(EvalError::MalformedOperatorPlacement);
    }

    operators.pop();
    let (b, a) = match (operands.pop(), operands.pop()) {
        (Some(b), Some(a)) => (b, a),
        _ => return Err(EvalError::MalformedOperatorPlacement),
    };
    let result = op.apply(a, b)?;
    trace!("reduce {} {} {} = {}", a, op.symbol(), b, result);
    trace.add_step(format!("{} {} {}", a, op.symbol(), b), result);
    operands.push(result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn calc(input: &str, last: Option<f64>) -> Result<f64, EvalError> {
        calculate(input, last, &mut EvaluationTrace::new(false))
    }

    #[rstest]
    #[case("2+3*4", 14.0)]
    #[case("(10-5)*(3+2)", 25.0)]
    #[case("10/(2+3)-1", 1.0)]
    #[case("3+-2", 1.0)]
    #[case("10*-2", -20.0)]
    #[case("2(3+4)", 14.0)]
    #[case("-(2+3)", -5.0)]
    #[case("10-4-3", 3.0)]
    #[case("64/4/2", 8.0)]
    #[case("-3*-3", 9.0)]
    #[case("((1+2))*3", 9.0)]
    #[case("(2+3)-1", 4.0)]
    #[case("2*(-3+1)", -4.0)]
    #[case("2.5*4", 10.0)]
    #[case(".5+.5", 1.0)]
    #[case("7", 7.0)]
    fn evaluates(#[case] input: &str, #[case] expected: f64) {
        let value = evaluate(input).unwrap();
        assert!((value - expected).abs() < 1e-10, "{input} gave {value}");
    }

    #[rstest]
    #[case("3/0", EvalError::DivisionByZero)]
    #[case("3/(1-1)", EvalError::DivisionByZero)]
    #[case("(2+3", EvalError::UnmatchedParenthesis)]
    #[case("2+3)", EvalError::UnmatchedParenthesis)]
    #[case(")", EvalError::UnmatchedParenthesis)]
    #[case("*3", EvalError::MalformedOperatorPlacement)]
    #[case("3*/2", EvalError::MalformedOperatorPlacement)]
    #[case("--3", EvalError::MalformedOperatorPlacement)]
    #[case("2+", EvalError::MalformedOperatorPlacement)]
    #[case("-", EvalError::MalformedOperatorPlacement)]
    #[case("()", EvalError::IncompleteExpression)]
    #[case("(2)3", EvalError::IncompleteExpression)]
    #[case("1.2.3", EvalError::InvalidNumber("1.2.3".into()))]
    #[case("2a", EvalError::InvalidCharacter('a'))]
    fn rejects(#[case] input: &str, #[case] expected: EvalError) {
        assert_eq!(evaluate(input), Err(expected));
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(calc("", None), Err(EvalError::EmptyInput));
        assert_eq!(calc("   ", None), Err(EvalError::EmptyInput));
        assert_eq!(calc(" \t ", Some(1.0)), Err(EvalError::EmptyInput));
    }

    #[test]
    fn substitutes_last_result() {
        assert_eq!(calc("x+1", Some(5.0)), Ok(6.0));
        assert_eq!(calc("x*x", Some(-3.0)), Ok(9.0));
        assert_eq!(calc("2-x", Some(-3.0)), Ok(5.0));
    }

    #[test]
    fn leading_operator_continues_from_last_result() {
        assert_eq!(calc("+3", Some(5.0)), Ok(8.0));
        assert_eq!(calc("*2", Some(5.0)), Ok(10.0));
        assert_eq!(calc("-3", Some(5.0)), Ok(2.0));
        assert_eq!(calc("-3", None), Ok(-3.0));
        assert_eq!(calc("+3", None), Err(EvalError::MalformedOperatorPlacement));
    }

    #[test]
    fn placeholder_without_last_result_fails() {
        assert_eq!(calc("x+1", None), Err(EvalError::UnresolvedPlaceholder));
    }

    #[test]
    fn normalizes_glyphs_and_whitespace() {
        assert_eq!(preprocess(" 6 × 2 ÷ 3 ", None).unwrap(), "6*2/3");
        assert_eq!(preprocess("8:2", None).unwrap(), "8/2");
        assert_eq!(calc("6 × 2 ÷ 3", None), Ok(4.0));
    }

    #[test]
    fn charset_pass_names_offending_character() {
        assert_eq!(validate_charset("1+(2*3)/4.5-6"), Ok(()));
        assert_eq!(validate_charset("1^2"), Err(EvalError::InvalidCharacter('^')));
        assert_eq!(preprocess("inf", Some(1.0)), Err(EvalError::InvalidCharacter('i')));
    }

    #[test]
    fn overflow_is_reported() {
        let big = format!("{}*10", f64::MAX);
        assert_eq!(evaluate(&big), Err(EvalError::Overflow));
    }

    #[test]
    fn perform_operation_pops_in_order() {
        let mut operands = vec![10.0, 4.0];
        let mut operators = vec![StackOp::Op(Operator::Sub)];
        let mut trace = EvaluationTrace::new(true);
        let result = perform_operation(&mut operands, &mut operators, &mut trace);
        assert_eq!(result, Ok(6.0));
        assert_eq!(operands, vec![6.0]);
        assert!(operators.is_empty());
        assert_eq!(trace.steps[0].operation, "10 - 4");
    }

    #[test]
    fn perform_operation_checks_stacks() {
        let mut trace = EvaluationTrace::new(false);
        let mut operands = vec![1.0];
        let mut operators = vec![StackOp::Op(Operator::Add)];
        assert_eq!(
            perform_operation(&mut operands, &mut operators, &mut trace),
            Err(EvalError::MalformedOperatorPlacement)
        );
        assert_eq!(operands, vec![1.0]);

        let mut operands = vec![1.0, 2.0];
        let mut operators = Vec::new();
        assert_eq!(
            perform_operation(&mut operands, &mut operators, &mut trace),
            Err(EvalError::IncompleteExpression)
        );

        let mut operators = vec![StackOp::LParen];
        assert_eq!(
            perform_operation(&mut operands, &mut operators, &mut trace),
            Err(EvalError::UnmatchedParenthesis)
        );
    }

    #[test]
    fn trace_records_reductions_in_order() {
        let mut trace = EvaluationTrace::new(true);
        let value = calculate("2+3*4", None, &mut trace).unwrap();
        assert_eq!(value, 14.0);
        let ops: Vec<_> = trace.steps.iter().map(|s| s.operation.as_str()).collect();
        assert_eq!(ops, vec!["3 * 4", "2 + 12"]);
    }

    #[test]
    fn trace_is_empty_when_not_detailed() {
        let mut trace = EvaluationTrace::new(false);
        calculate("1+2", None, &mut trace).unwrap();
        assert!(trace.steps.is_empty());
    }
}
