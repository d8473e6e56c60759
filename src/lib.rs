//! Arithmetic expression evaluator.
//!
//! Takes a text expression built from numbers, `+ - * /`, parentheses, the
//! constants `pi` and `e`, and a fixed set of unary math functions, and
//! computes a double-precision result:
//!
//! ```
//! assert_eq!(mathexpr::evaluate("2+3*4").unwrap(), 14.0);
//! assert_eq!(mathexpr::evaluate("sqrt(16)+1").unwrap(), 5.0);
//! ```
//!
//! Expression string → [`Lexer`] → tokens → [`Parser`] → tree →
//! [`Evaluator`] → `f64`. Every call re-parses from scratch; nothing is
//! cached and nothing is shared, so [`evaluate`] is safe to call from any
//! number of threads at once.

pub mod error;
pub mod eval;
pub mod format;
pub mod functions;
pub mod lex;
pub mod parse;

#[cfg(test)]
mod tests;

pub use error::EvalError;
pub use eval::Evaluator;
pub use format::format_value;
pub use lex::{Lexer, Token, TokenKind};
pub use parse::{MAX_DEPTH, Op, Parser, TokenTree};

/// Evaluates one expression to a finite double.
///
/// Leading and trailing whitespace is ignored. A result that is NaN or
/// infinite (such as `sqrt(-1)` or `ln(0)`) is reported as
/// [`EvalError::InvalidResult`] instead of being handed to the caller raw.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(EvalError::EmptyExpression);
    }

    let tree = Parser::new(expression).parse()?;
    let value = Evaluator::new(expression).eval(&tree)?;

    if !value.is_finite() {
        return Err(EvalError::InvalidResult { value });
    }
    Ok(value)
}
