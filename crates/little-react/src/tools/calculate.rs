use little_react_core::tool::{Error as ToolError, Tool, ToolResult};
use meval::{Context, Expr};

use super::format_number;

/// Maximum allowed length of an expression.
const MAX_EXPRESSION_LENGTH: usize = 1000;

/// Evaluates an arithmetic expression.
///
/// Only numeric literals, `+ - * /`, unary minus and parentheses are
/// accepted. There are no variables, constants or functions.
pub fn calculate(expression: &str) -> Result<f64, ToolError> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(ToolError::invalid_input().with_reason("empty expression"));
    }
    if expression.len() > MAX_EXPRESSION_LENGTH {
        return Err(ToolError::invalid_input().with_reason(format!(
            "expression too long ({} chars, max {MAX_EXPRESSION_LENGTH})",
            expression.len()
        )));
    }
    if let Some(ch) = expression.chars().find(|ch| !is_allowed(*ch)) {
        return Err(ToolError::invalid_input()
            .with_reason(format!("unsupported character {ch:?}")));
    }

    let expr: Expr = expression.parse().map_err(|err| {
        ToolError::invalid_input().with_reason(format!("syntax error: {err}"))
    })?;
    let value = expr.eval_with_context(Context::empty()).map_err(|err| {
        ToolError::invalid_input().with_reason(format!("syntax error: {err}"))
    })?;

    if !value.is_finite() {
        return Err(ToolError::execution_error()
            .with_reason("result is not finite (division by zero?)"));
    }
    Ok(value)
}

#[inline]
fn is_allowed(ch: char) -> bool {
    ch.is_ascii_digit()
        || ch.is_ascii_whitespace()
        || matches!(ch, '.' | 'e' | 'E' | '+' | '-' | '*' | '/' | '(' | ')')
}

/// A tool for running arithmetic calculations.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalculateTool;

impl Tool for CalculateTool {
    fn name(&self) -> &str {
        "calculate"
    }

    fn description(&self) -> &str {
        r#"
Runs a calculation and returns the number.
Supports + - * /, parentheses and scientific notation like 5.972e24."#
    }

    fn example(&self) -> &str {
        "4 * 7 / 3"
    }

    fn execute(&self, argument: &str) -> ToolResult {
        calculate(argument).map(format_number)
    }
}

#[cfg(test)]
mod tests {
    use little_react_core::tool::ErrorKind;

    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(calculate("2+2").unwrap(), 4.0);
        assert!((calculate("4 * 7 / 3").unwrap() - 9.3333).abs() < 1e-3);
        assert_eq!(calculate("-(1.5 + 0.5) * 3").unwrap(), -6.0);
    }

    #[test]
    fn test_scientific_notation() {
        let value = calculate("(5.972e24 + 5.683e26) * 2").unwrap();
        let expected = 2.0 * (5.972e24 + 5.683e26);
        assert!((value - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_tool_output() {
        assert_eq!(CalculateTool.execute("2+2").unwrap(), "4");
        assert_eq!(
            CalculateTool.execute("4 * 7 / 3").unwrap(),
            "9.333333333333334"
        );
        assert_eq!(CalculateTool.execute("5.972e24 * 2").unwrap(), "1.1944e25");
    }

    #[test]
    fn test_rejects_code() {
        for input in ["__import__('os')", "sqrt(4)", "2 ^ 3", "x + 1", "pi"] {
            let err = calculate(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{input}");
        }
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(calculate("  ").unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(calculate("2 +").unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(calculate("(1").unwrap_err().kind(), ErrorKind::InvalidInput);

        let long = "1+".repeat(600) + "1";
        let err = calculate(&long).unwrap_err();
        assert!(err.reason().contains("too long"));
    }

    #[test]
    fn test_division_by_zero() {
        let err = calculate("1 / 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecutionError);
    }
}
