use miette::SourceSpan;

use crate::error::{EvalError, source};
use crate::functions;
use crate::parse::{Op, TokenTree};

/// Walks a parsed tree and computes its value in IEEE-754 double precision.
///
/// The evaluator holds only a borrow of the expression text, for error
/// labels; it has no other state, so concurrent evaluations never interfere.
pub struct Evaluator<'de> {
    whole: &'de str,
}

impl<'de> Evaluator<'de> {
    pub fn new(whole: &'de str) -> Self {
        Evaluator { whole }
    }

    pub fn eval(&self, tree: &TokenTree<'de>) -> Result<f64, EvalError> {
        Ok(match tree {
            TokenTree::Atom(n) => *n,

            TokenTree::Cons(op, rest) => {
                let values = rest
                    .iter()
                    .map(|tree| self.eval(tree))
                    .collect::<Result<Vec<_>, _>>()?;

                match op {
                    Op::Minus => match values.as_slice() {
                        [value] => -value,
                        [lhs, rhs] => lhs - rhs,
                        _ => unreachable!("minus is unary or binary"),
                    },
                    Op::Plus => match values.as_slice() {
                        [lhs, rhs] => lhs + rhs,
                        _ => unreachable!("plus is binary"),
                    },
                    Op::Star => match values.as_slice() {
                        [lhs, rhs] => lhs * rhs,
                        _ => unreachable!("star is binary"),
                    },
                    Op::Slash => match values.as_slice() {
                        [lhs, rhs] => {
                            // Exact comparison: only a divisor of literally
                            // zero is rejected, tiny values divide normally.
                            if *rhs == 0.0 {
                                return Err(EvalError::DivisionByZero);
                            }
                            lhs / rhs
                        }
                        _ => unreachable!("slash is binary"),
                    },
                }
            }

            TokenTree::Call { name, offset, arg } => {
                // Trees can be constructed directly, not only by the parser,
                // so the name is checked here too.
                let Some(f) = functions::lookup(name) else {
                    return Err(EvalError::UnknownFunction {
                        src: source(self.whole),
                        at: SourceSpan::from(*offset..*offset + name.len()),
                        name: name.to_string(),
                    });
                };
                f(self.eval(arg)?)
            }
        })
    }
}
