use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Everything that can go wrong while evaluating one expression.
///
/// The set is closed: callers can match on the kind to decide presentation.
/// Lexing and parsing variants carry the expression text and a span pointing
/// at the offending piece; evaluation variants have no position to point at.
#[derive(Error, Debug, Diagnostic)]
pub enum EvalError {
    #[error("empty expression")]
    #[diagnostic(help("type an expression such as `2+3*4` or `sqrt(16)`"))]
    EmptyExpression,

    #[error("unexpected character '{token}'")]
    #[diagnostic(help("remove or correct the character `{token}`"))]
    InvalidCharacter {
        #[source_code]
        src: NamedSource<String>,

        #[label("this character")]
        at: SourceSpan,

        token: char,
    },

    #[error("`{literal}` is not a valid number")]
    #[diagnostic(help("a number has at most one decimal point, like `3.14`"))]
    InvalidNumber {
        #[source_code]
        src: NamedSource<String>,

        #[label("this numeric literal")]
        at: SourceSpan,

        literal: String,
    },

    #[error("mismatched parenthesis")]
    #[diagnostic(help("every `(` needs a matching `)`"))]
    MismatchedParens {
        #[source_code]
        src: NamedSource<String>,

        #[label("unmatched here")]
        at: SourceSpan,
    },

    #[error("unknown function or constant `{name}`")]
    #[diagnostic(help("supported names are pi, e and the functions listed by `mathexpr functions`"))]
    UnknownFunction {
        #[source_code]
        src: NamedSource<String>,

        #[label("this name")]
        at: SourceSpan,

        name: String,
    },

    #[error("function `{name}` is missing its argument")]
    #[diagnostic(help("call it like `{name}(value)`"))]
    MissingArgument {
        #[source_code]
        src: NamedSource<String>,

        #[label("needs an argument")]
        at: SourceSpan,

        name: String,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("malformed expression: {detail}")]
    MalformedExpression {
        #[source_code]
        src: NamedSource<String>,

        #[label("here")]
        at: SourceSpan,

        detail: String,
    },

    #[error("expression has no finite value")]
    #[diagnostic(help("the result was NaN or infinite, e.g. from sqrt of a negative number"))]
    InvalidResult { value: f64 },
}

/// Wraps an expression as miette source code for labeled reports.
pub(crate) fn source(expression: &str) -> NamedSource<String> {
    NamedSource::new("expression", expression.to_string())
}
