//! Recursive descent parser.
//!
//! ```text
//! expression       := term (('+' | '-') term)*
//! term             := factor (('*' | '/') factor)*
//! factor           := '-'? implicit_mul
//! implicit_mul     := exponent implicit_mul?
//! exponent         := factorial_factor ('^' exponent)?
//! factorial_factor := primary '!'?
//! primary          := identifier | number | '(' expression ')'
//! call             := identifier '(' (expression (',' expression)*)? ')'
//! ```
//!
//! Identifiers are resolved against the [`Context`] as they are parsed.
use super::{
    ast, lex,
    position::WithSpan,
    symbol::{Context, Entry},
    token::{self, Token},
};

/// Tokens a primary expression may begin with.
static PRIMARY_TOKENS: &[token::Kind] = &[
    token::Kind::Number,
    token::Kind::Identifier,
    token::Kind::ParenLeft,
];

struct Parser<'a, C: ?Sized> {
    lexer: lex::Lexer,
    ctx: &'a C,
}

impl<'a, C> Parser<'a, C>
where
    C: Context + ?Sized,
{
    pub fn new(src: impl AsRef<str>, ctx: &'a C) -> Self {
        Self {
            lexer: lex::Lexer::new(src),
            ctx,
        }
    }

    pub fn peek(&mut self) -> Result<Token, WithSpan<error::Kind>> {
        self.lexer.peek().map_err(|err| err.map(error::Kind::from))
    }

    pub fn next(&mut self) -> Result<Token, WithSpan<error::Kind>> {
        self.lexer.read_next().map_err(|err| err.map(error::Kind::from))
    }

    /// Consume the next token if it is of the given kind.
    pub fn next_if(&mut self, kind: token::Kind) -> Result<Option<Token>, WithSpan<error::Kind>> {
        if self.peek()?.is(kind) {
            self.next().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Consume the next token, which must be of the given kind.
    pub fn expect(&mut self, kind: token::Kind) -> Result<Token, WithSpan<error::Kind>> {
        let next = self.next()?;
        if next.is(kind) {
            Ok(next)
        } else {
            Err(WithSpan {
                value: error::Kind::UnexpectedToken {
                    expected: vec![kind],
                    found: next.kind,
                },
                span: next.span(),
            })
        }
    }

    /// Ensure an operand follows `operator`, without consuming it.
    /// `signed` allows the operand to begin with a `-`.
    pub fn expect_operand(
        &mut self,
        operator: &Token,
        signed: bool,
    ) -> Result<(), WithSpan<error::Kind>> {
        let next = self.peek()?;
        if next.kind.starts_primary() || (signed && next.is(token::Kind::Minus)) {
            Ok(())
        } else {
            Err(WithSpan {
                value: error::Kind::MissingOperand {
                    operator: operator.kind,
                    found: next.kind,
                },
                span: next.span(),
            })
        }
    }
}

/// Parse an expression.
/// Identifiers must be defined in `ctx`, and function calls must match the function's arity.
#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all, fields(src = %src.as_ref())))]
pub fn parse<C>(src: impl AsRef<str>, ctx: &C) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    let mut parser = Parser::new(src, ctx);
    let expr = parse_expression(&mut parser)?;
    let next = parser.next()?;
    if next.is(token::Kind::EndOfInput) {
        Ok(expr)
    } else {
        Err(WithSpan {
            value: error::Kind::TrailingInput {
                text: next.text().to_string(),
            },
            span: next.span(),
        })
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
fn parse_expression<C>(parser: &mut Parser<'_, C>) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    let mut expr = parse_term(parser)?;
    loop {
        let next = parser.peek()?;
        let op = match next.kind {
            token::Kind::Plus | token::Kind::Minus => ast::OpBinary::from_token(&next.kind),
            _ => None,
        };
        let Some(op) = op else {
            break;
        };

        let op_token = parser.next()?;
        parser.expect_operand(&op_token, true)?;
        let rhs = parse_term(parser)?;
        expr = ast::Expr::binary(op, expr, rhs);
    }
    Ok(expr)
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
fn parse_term<C>(parser: &mut Parser<'_, C>) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    let mut expr = parse_factor(parser)?;
    loop {
        let next = parser.peek()?;
        let op = match next.kind {
            token::Kind::Star | token::Kind::SlashForward => {
                ast::OpBinary::from_token(&next.kind)
            }
            _ => None,
        };
        let Some(op) = op else {
            break;
        };

        let op_token = parser.next()?;
        parser.expect_operand(&op_token, true)?;
        let rhs = parse_factor(parser)?;
        expr = ast::Expr::binary(op, expr, rhs);
    }
    Ok(expr)
}

/// Unary minus applies to the entire implicit multiplication.
/// e.g. `-2x` is `-(2 * x)`, `-5!` is `-(5!)`.
fn parse_factor<C>(parser: &mut Parser<'_, C>) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    let Some(minus) = parser.next_if(token::Kind::Minus)? else {
        return parse_implicit_mul(parser);
    };

    parser.expect_operand(&minus, false)?;
    let expr = parse_implicit_mul(parser)?;
    Ok(ast::Expr::unary(ast::OpUnary::Negate, expr))
}

/// Adjacent operands are multiplied, grouping to the right.
/// e.g. `2x(1 + 2)` is `2 * (x * (1 + 2))`.
fn parse_implicit_mul<C>(parser: &mut Parser<'_, C>) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    let lhs = parse_exponent(parser)?;
    if !parser.peek()?.kind.starts_primary() {
        return Ok(lhs);
    }

    let rhs = parse_implicit_mul(parser)?;
    Ok(ast::Expr::binary(ast::OpBinary::Multiply, lhs, rhs))
}

/// Exponents are right associative.
/// e.g. `2^3^2` is `2^(3^2)`.
fn parse_exponent<C>(parser: &mut Parser<'_, C>) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    let lhs = parse_factorial(parser)?;
    let Some(caret) = parser.next_if(token::Kind::Caret)? else {
        return Ok(lhs);
    };

    parser.expect_operand(&caret, false)?;
    let rhs = parse_exponent(parser)?;
    Ok(ast::Expr::binary(ast::OpBinary::Exp, lhs, rhs))
}

fn parse_factorial<C>(parser: &mut Parser<'_, C>) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    let expr = parse_primary(parser)?;
    if parser.next_if(token::Kind::Bang)?.is_some() {
        Ok(ast::Expr::unary(ast::OpUnary::Factorial, expr))
    } else {
        Ok(expr)
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
fn parse_primary<C>(parser: &mut Parser<'_, C>) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    let next = parser.next()?;
    #[cfg(feature = "tracing")]
    tracing::debug!(?next);

    match next.kind {
        token::Kind::Number => parse_number(next),
        token::Kind::Identifier => parse_identifier(parser, next),
        token::Kind::ParenLeft => {
            let expr = parse_expression(parser)?;
            parser.expect(token::Kind::ParenRight)?;
            Ok(expr)
        }
        token::Kind::EndOfInput => Err(WithSpan {
            value: error::Kind::UnexpectedEndOfInput,
            span: next.span(),
        }),
        found => Err(WithSpan {
            value: error::Kind::UnexpectedToken {
                expected: PRIMARY_TOKENS.to_vec(),
                found,
            },
            span: next.span(),
        }),
    }
}

fn parse_number(token: Token) -> Result<ast::Expr, WithSpan<error::Kind>> {
    let span = token.span();
    let text = token.text.unwrap_or_default();
    match text.parse::<f64>() {
        Ok(value) => Ok(ast::Expr::number(value)),
        Err(_) => Err(WithSpan {
            value: lex::error::Kind::MalformedNumber { text }.into(),
            span,
        }),
    }
}

fn parse_identifier<C>(
    parser: &mut Parser<'_, C>,
    token: Token,
) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    let name = token.text().to_string();
    let ctx = parser.ctx;
    match ctx.lookup(&name) {
        None => Err(WithSpan {
            value: error::Kind::UndefinedIdentifier { name },
            span: token.span(),
        }),
        Some(Entry::Variable(_)) => Ok(ast::ExprVariable { name }.into()),
        Some(Entry::Function(function)) => parse_call(parser, token, function.arity()),
    }
}

fn parse_call<C>(
    parser: &mut Parser<'_, C>,
    name: Token,
    arity: usize,
) -> Result<ast::Expr, WithSpan<error::Kind>>
where
    C: Context + ?Sized,
{
    parser.expect(token::Kind::ParenLeft)?;
    let mut args = vec![];
    let close = match parser.next_if(token::Kind::ParenRight)? {
        Some(close) => close,
        None => loop {
            args.push(parse_expression(parser)?);
            let next = parser.next()?;
            match next.kind {
                token::Kind::Comma => continue,
                token::Kind::ParenRight => break next,
                found => {
                    return Err(WithSpan {
                        value: error::Kind::UnexpectedToken {
                            expected: vec![token::Kind::Comma, token::Kind::ParenRight],
                            found,
                        },
                        span: next.span(),
                    });
                }
            }
        },
    };

    let name_text = name.text().to_string();
    if args.len() != arity {
        return Err(WithSpan::new(
            error::Kind::ArityMismatch {
                name: name_text,
                expected: arity,
                found: args.len(),
            },
            name.pos,
            close.end(),
        ));
    }

    Ok(ast::ExprCall {
        name: name_text,
        args,
    }
    .into())
}

pub mod error {
    use super::{lex, token};
    use std::fmt;

    #[derive(Debug, Clone, PartialEq, derive_more::From)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// The input could not be tokenized.
        #[from]
        Tokenize(lex::error::Kind),

        /// The input ended where an operand was expected.
        UnexpectedEndOfInput,

        /// An unexpected kind of token was found.
        UnexpectedToken {
            expected: Vec<token::Kind>,
            found: token::Kind,
        },

        /// An operator is not followed by an operand.
        /// e.g. `1 +`, `2 ^ -1`
        MissingOperand {
            operator: token::Kind,
            found: token::Kind,
        },

        /// The identifier is neither a variable nor a function.
        UndefinedIdentifier { name: String },

        /// A function was called with the wrong number of arguments.
        ArityMismatch {
            name: String,
            expected: usize,
            found: usize,
        },

        /// Input remained after a complete expression.
        TrailingInput { text: String },
    }

    impl fmt::Display for Kind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Tokenize(kind) => write!(f, "{kind}"),
                Self::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
                Self::UnexpectedToken { expected, found } => {
                    let expected = expected
                        .iter()
                        .map(|kind| kind.to_string())
                        .collect::<Vec<_>>()
                        .join(" or ");
                    write!(f, "expected {expected}, found {found}")
                }
                Self::MissingOperand { operator, found } => {
                    write!(f, "expected an operand after {operator}, found {found}")
                }
                Self::UndefinedIdentifier { name } => write!(f, "undefined identifier `{name}`"),
                Self::ArityMismatch {
                    name,
                    expected,
                    found,
                } => write!(
                    f,
                    "function `{name}` takes {expected} argument(s), {found} given"
                ),
                Self::TrailingInput { text } => write!(f, "unexpected `{text}` after expression"),
            }
        }
    }

    impl std::error::Error for Kind {}
}
