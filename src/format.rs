/// Decimal places kept when displaying a result.
const DISPLAY_PRECISION: usize = 12;

/// Renders a result as the shortest numeral after rounding to 12 decimals,
/// so `0.1 + 0.2` shows up as `0.3`.
pub fn format_result(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let rounded: f64 = format!("{:.*}", DISPLAY_PRECISION, x)
        .parse()
        .unwrap_or(x);
    if rounded == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    rounded.to_string()
}

/// Puts single spaces around binary operators. A minus that starts a
/// negative number stays attached to it.
pub fn format_with_spaces(expr: &str) -> String {
    let mut result = String::new();
    let mut prev: Option<char> = None;

    for c in expr.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '+' | '-' | '*' | '/' | '×' | '÷' | ':' => {
                let unary = c == '-'
                    && matches!(prev, None | Some('(') | Some('+' | '-' | '*' | '/' | '×' | '÷' | ':'));
                if unary {
                    if prev.is_some() && prev != Some('(') {
                        result.push(' ');
                    }
                    result.push(c);
                } else {
                    if prev.is_some() {
                        result.push(' ');
                    }
                    result.push(c);
                    result.push(' ');
                }
            }
            _ => result.push(c),
        }
        prev = Some(c);
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.1 + 0.2, "0.3")]
    #[case(14.0, "14")]
    #[case(-5.0, "-5")]
    #[case(2.5, "2.5")]
    #[case(1.0 / 3.0, "0.333333333333")]
    #[case(-0.0, "0")]
    #[case(1e-13, "0")]
    #[case(1e21, "1000000000000000000000")]
    fn formats_result(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_result(value), expected);
    }

    #[test]
    fn formatting_is_idempotent() {
        let once = format_result(0.1 + 0.2);
        let twice = format_result(once.parse().unwrap());
        assert_eq!(once, twice);
    }

    #[rstest]
    #[case("2+3*4", "2 + 3 * 4")]
    #[case("3+-2", "3 + -2")]
    #[case("-(2+3)", "-(2 + 3)")]
    #[case("10*-2", "10 * -2")]
    #[case("(1-2)-3", "(1 - 2) - 3")]
    #[case(" 6 ×2 ", "6 × 2")]
    #[case("+3", "+ 3")]
    fn spaces_operators(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_with_spaces(input), expected);
    }
}
