use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Tools that stay usable while the lock overlay is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Calculator,
    /// Free-text scratchpad.
    Notes,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Calculator, Tool::Notes];

    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Calculator => "calculator",
            Tool::Notes => "notes",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calculator" | "calc" => Ok(Tool::Calculator),
            "notes" | "note" | "scratchpad" => Ok(Tool::Notes),
            other => Err(ValidationError::InvalidValue {
                field: "tool".into(),
                message: format!(
                    "unknown tool '{other}', expected one of: {}",
                    Tool::ALL.map(Tool::as_str).join(", ")
                ),
            }),
        }
    }
}

/// Evaluate a single binary expression such as `12 x 45` or `3.5/7`.
///
/// Supported operators: `+`, `-`, `*` (also `x`), `/`.
pub fn calculate(expr: &str) -> Result<f64, ValidationError> {
    let invalid = |message: String| ValidationError::InvalidValue {
        field: "expression".into(),
        message,
    };

    let expr = expr.trim();
    // Skip the first char so a leading sign stays with the left operand.
    // A sign right after `e`/`E` belongs to an exponent.
    let op_at = expr
        .char_indices()
        .skip(1)
        .find(|&(i, c)| match c {
            '+' | '-' => !expr[..i].ends_with(|p: char| matches!(p, 'e' | 'E')),
            '*' | '/' | 'x' | 'X' => true,
            _ => false,
        })
        .map(|(i, _)| i)
        .ok_or_else(|| invalid(format!("no operator in '{expr}'")))?;

    let (lhs, rest) = expr.split_at(op_at);
    let mut rest_chars = rest.chars();
    let op = rest_chars.next().unwrap_or('+');
    let rhs = rest_chars.as_str();

    let parse = |side: &str| {
        side.trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{}' is not a number", side.trim())))
    };
    let (a, b) = (parse(lhs)?, parse(rhs)?);

    match op {
        '+' => Ok(a + b),
        '-' => Ok(a - b),
        '*' | 'x' | 'X' => Ok(a * b),
        '/' if b == 0.0 => Err(invalid("division by zero".into())),
        '/' => Ok(a / b),
        other => Err(invalid(format!("unsupported operator '{other}'"))),
    }
}
