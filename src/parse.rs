use std::fmt::Display;

use miette::SourceSpan;

use crate::error::{EvalError, source};
use crate::functions;
use crate::lex::{Lexer, Token, TokenKind};

/// Upper bound on nested groups, function calls and unary minus chains.
/// Inputs nesting deeper than this are rejected instead of risking the
/// native call stack.
pub const MAX_DEPTH: usize = 200;

/// The transient expression tree. It lives only for the duration of one
/// evaluation; function names borrow from the input string.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenTree<'de> {
    Atom(f64),
    Cons(Op, Vec<TokenTree<'de>>),
    Call {
        name: &'de str,
        offset: usize,
        arg: Box<TokenTree<'de>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
}

pub struct Parser<'de> {
    whole: &'de str,
    lexer: Lexer<'de>,
}

impl<'de> Parser<'de> {
    pub fn new(whole: &'de str) -> Self {
        Parser {
            whole,
            lexer: Lexer::new(whole),
        }
    }

    pub fn parse(mut self) -> Result<TokenTree<'de>, EvalError> {
        let tree = self.parse_within(0, 0)?;
        match self.lexer.next() {
            None => Ok(tree),
            Some(Err(e)) => Err(e),
            Some(Ok(Token {
                kind: TokenKind::RightParen,
                offset,
                ..
            })) => Err(EvalError::MismatchedParens {
                src: source(self.whole),
                at: SourceSpan::from(offset..offset + 1),
            }),
            Some(Ok(token)) => {
                Err(self.malformed(token.offset, token.literal.len(), "expected an operator"))
            }
        }
    }

    fn parse_within(&mut self, min_bp: u8, depth: usize) -> Result<TokenTree<'de>, EvalError> {
        let lhs = match self.lexer.next() {
            Some(Ok(token)) => token,
            Some(Err(e)) => return Err(e),
            None => return Err(self.malformed_at_end("expected an operand")),
        };

        let mut lhs = match lhs {
            Token {
                kind: TokenKind::Number(n),
                ..
            } => TokenTree::Atom(n),

            Token {
                kind: TokenKind::LeftParen,
                offset,
                ..
            } => {
                self.check_depth(depth, offset)?;
                let group = self.parse_within(0, depth + 1)?;
                self.lexer.expect_closing_paren(offset)?;
                group
            }

            Token {
                kind: TokenKind::Ident,
                literal,
                offset,
            } => self.parse_ident(literal, offset, depth)?,

            Token {
                kind: TokenKind::Minus,
                offset,
                ..
            } => {
                self.check_depth(depth, offset)?;
                let ((), r_bp) = prefix_binding_power(Op::Minus);
                let rhs = self.parse_within(r_bp, depth + 1)?;
                TokenTree::Cons(Op::Minus, vec![rhs])
            }

            Token {
                kind: TokenKind::RightParen,
                offset,
                ..
            } => {
                // Inside a group the parens do match and the operand is what
                // is missing; at the top level the `)` itself has no partner.
                return Err(if depth == 0 {
                    EvalError::MismatchedParens {
                        src: source(self.whole),
                        at: SourceSpan::from(offset..offset + 1),
                    }
                } else {
                    self.malformed(offset, 1, "expected an operand")
                });
            }

            Token {
                literal, offset, ..
            } => {
                return Err(self.malformed(offset, literal.len(), "expected an operand"));
            }
        };

        loop {
            let op = match self.lexer.peek() {
                None => break,
                Some(Err(_)) => {
                    let Some(Err(e)) = self.lexer.next() else {
                        unreachable!("peeked an error")
                    };
                    return Err(e);
                }
                Some(Ok(token)) => *token,
            };

            let op = match op.kind {
                TokenKind::Plus => Op::Plus,
                TokenKind::Minus => Op::Minus,
                TokenKind::Star => Op::Star,
                TokenKind::Slash => Op::Slash,
                TokenKind::RightParen => break,
                TokenKind::Number(_) | TokenKind::Ident | TokenKind::LeftParen => {
                    return Err(self.malformed(op.offset, op.literal.len(), "expected an operator"));
                }
            };

            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.lexer.next();

            let rhs = self.parse_within(r_bp, depth)?;
            lhs = TokenTree::Cons(op, vec![lhs, rhs]);
        }

        Ok(lhs)
    }

    /// An identifier in operand position: the constants `pi` and `e`, or a
    /// function call `name(arg)`.
    fn parse_ident(
        &mut self,
        name: &'de str,
        offset: usize,
        depth: usize,
    ) -> Result<TokenTree<'de>, EvalError> {
        match name {
            "pi" => return Ok(TokenTree::Atom(std::f64::consts::PI)),
            "e" => return Ok(TokenTree::Atom(std::f64::consts::E)),
            _ => {}
        }

        let next_is_paren = match self.lexer.peek() {
            Some(Err(_)) => {
                let Some(Err(e)) = self.lexer.next() else {
                    unreachable!("peeked an error")
                };
                return Err(e);
            }
            Some(Ok(Token {
                kind: TokenKind::LeftParen,
                ..
            })) => true,
            _ => false,
        };

        if functions::lookup(name).is_none() {
            return Err(EvalError::UnknownFunction {
                src: source(self.whole),
                at: SourceSpan::from(offset..offset + name.len()),
                name: name.to_string(),
            });
        }

        if !next_is_paren {
            return Err(self.missing_argument(name, offset));
        }

        let Some(Ok(open)) = self.lexer.next() else {
            unreachable!("peeked a left paren")
        };
        self.check_depth(depth, open.offset)?;

        if let Some(Ok(Token {
            kind: TokenKind::RightParen,
            ..
        })) = self.lexer.peek()
        {
            return Err(self.missing_argument(name, offset));
        }

        let arg = self.parse_within(0, depth + 1)?;
        self.lexer.expect_closing_paren(open.offset)?;

        Ok(TokenTree::Call {
            name,
            offset,
            arg: Box::new(arg),
        })
    }

    fn missing_argument(&self, name: &str, offset: usize) -> EvalError {
        EvalError::MissingArgument {
            src: source(self.whole),
            at: SourceSpan::from(offset..offset + name.len()),
            name: name.to_string(),
        }
    }

    fn check_depth(&self, depth: usize, offset: usize) -> Result<(), EvalError> {
        if depth >= MAX_DEPTH {
            return Err(self.malformed(offset, 1, "expression nests too deeply"));
        }
        Ok(())
    }

    fn malformed(&self, offset: usize, len: usize, detail: &str) -> EvalError {
        EvalError::MalformedExpression {
            src: source(self.whole),
            at: SourceSpan::from(offset..offset + len),
            detail: detail.to_string(),
        }
    }

    fn malformed_at_end(&self, detail: &str) -> EvalError {
        let end = self.whole.len();
        EvalError::MalformedExpression {
            src: source(self.whole),
            at: SourceSpan::from(end.saturating_sub(1)..end),
            detail: detail.to_string(),
        }
    }
}

fn prefix_binding_power(op: Op) -> ((), u8) {
    match op {
        Op::Minus => ((), 5),
        _ => unreachable!("{op:?} is not a prefix operator"),
    }
}

fn infix_binding_power(op: Op) -> (u8, u8) {
    match op {
        Op::Plus | Op::Minus => (1, 2),
        Op::Star | Op::Slash => (3, 4),
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Plus => write!(f, "+"),
            Op::Minus => write!(f, "-"),
            Op::Star => write!(f, "*"),
            Op::Slash => write!(f, "/"),
        }
    }
}

impl Display for TokenTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenTree::Atom(n) => write!(f, "{n}"),
            TokenTree::Cons(op, rest) => {
                write!(f, "({op}")?;
                for tree in rest {
                    write!(f, " {tree}")?;
                }
                write!(f, ")")
            }
            TokenTree::Call { name, arg, .. } => write!(f, "({name} {arg})"),
        }
    }
}
