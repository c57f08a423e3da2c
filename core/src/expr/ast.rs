use super::token;

#[derive(Debug, Clone, derive_more::From, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    Number(ExprNumber),
    Variable(ExprVariable),
    Call(ExprCall),
    Unary(ExprUnary),
    Binary(ExprBinary),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprNumber {
    pub value: f64,
}

/// Reference to a variable.
/// The name was defined when the expression was parsed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprVariable {
    pub name: String,
}

/// Function call.
/// The argument count matched the function's arity when the expression was parsed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprCall {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprUnary {
    pub op: OpUnary,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpUnary {
    /// `-x`
    Negate,
    /// `x!`
    Factorial,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprBinary {
    pub op: OpBinary,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpBinary {
    Add,
    Subtract,
    Multiply,
    Divide,
    Exp,
}

impl OpBinary {
    pub fn from_token(token: &token::Kind) -> Option<Self> {
        match token {
            token::Kind::Plus => Some(Self::Add),
            token::Kind::Minus => Some(Self::Subtract),
            token::Kind::Star => Some(Self::Multiply),
            token::Kind::SlashForward => Some(Self::Divide),
            token::Kind::Caret => Some(Self::Exp),
            _ => None,
        }
    }
}

impl Expr {
    pub fn number(value: f64) -> Self {
        ExprNumber { value }.into()
    }

    pub fn unary(op: OpUnary, expr: Expr) -> Self {
        ExprUnary {
            op,
            expr: Box::new(expr),
        }
        .into()
    }

    pub fn binary(op: OpBinary, left: Expr, right: Expr) -> Self {
        ExprBinary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
        .into()
    }
}
