/// Calculator help shown by the `help` command, as (heading, lines).
pub const HELP_SECTIONS: &[(&str, &[&str])] = &[
    (
        "Operations",
        &[
            "  + : Addition        (e.g., 5 + 3 = 8)",
            "  - : Subtraction     (e.g., 10 - 4 = 6)",
            "  * : Multiplication  (also ×, e.g., 6 × 7 = 42)",
            "  / : Division        (also ÷ and :, e.g., 15 : 3 = 5)",
            "  ( ) : Grouping      (e.g., (10 - 5) * (3 + 2) = 25)",
            "  2(3 + 4) multiplies, -(2 + 3) negates",
        ],
    ),
    (
        "Last Result",
        &[
            "  x : Previous result (e.g., x * 2)",
            "  Starting with an operator continues from it (e.g., + 3)",
        ],
    ),
    (
        "Commands",
        &[
            "  details <expression> : Show step-by-step evaluation with time",
            "  clear : Clear history and previous result",
            "  help : Show this help",
            "  quit : Exit the calculator",
        ],
    ),
];

/// Help as plain text lines.
pub fn help_lines() -> Vec<String> {
    let mut lines = Vec::new();
    for (heading, body) in HELP_SECTIONS {
        lines.push(format!("{}:", heading));
        lines.extend(body.iter().map(|line| line.to_string()));
        lines.push(String::new());
    }
    lines
}
