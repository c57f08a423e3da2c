//! Arithmetic expressions.
//!
//! Text is scanned and tokenized on demand, parsed into an [`ast::Expr`]
//! while resolving identifiers against a [`Context`], then evaluated.
//!
//! # Inspiration
//! + [Crafting Interpreters](https://craftinginterpreters.com)
//! + [Lox in Rust](https://github.com/Darksecond/lox)
pub mod ast;
mod eval;
pub mod lex;
mod parse;
pub mod position;
pub mod scan;
mod symbol;
pub mod token;

pub use position::{CharPos, Span, WithSpan};
pub use symbol::{Context, Entry, EntryKind, Function, FunctionSet, NumericFn, SymbolTable};

pub mod error {
    pub use super::eval::error::Kind as Eval;
    pub use super::lex::error::Kind as Tokenize;
    pub use super::parse::error::Kind as Parse;
    pub use super::symbol::error::Kind as Symbol;
}

#[derive(Debug, Clone, PartialEq, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    /// Invalid characters or numbers.
    #[display("{_0}")]
    Tokenize(WithSpan<error::Tokenize>),
    /// Invalid expression.
    #[display("{_0}")]
    Parse(WithSpan<error::Parse>),
    /// Could not evaluate the expression.
    #[display("{_0}")]
    Eval(error::Eval),
    /// Could not bind a variable or register a function.
    #[display("{_0}")]
    Symbol(error::Symbol),
}

impl std::error::Error for Error {}

impl From<WithSpan<error::Parse>> for Error {
    fn from(err: WithSpan<error::Parse>) -> Self {
        let WithSpan { value, span } = err;
        match value {
            error::Parse::Tokenize(value) => Self::Tokenize(WithSpan { value, span }),
            value => Self::Parse(WithSpan { value, span }),
        }
    }
}

impl From<WithSpan<error::Tokenize>> for Error {
    fn from(err: WithSpan<error::Tokenize>) -> Self {
        Self::Tokenize(err)
    }
}

impl From<error::Eval> for Error {
    fn from(err: error::Eval) -> Self {
        Self::Eval(err)
    }
}

impl From<error::Symbol> for Error {
    fn from(err: error::Symbol) -> Self {
        Self::Symbol(err)
    }
}

/// Evaluate an expression without any variables or functions.
pub fn eval(input: impl AsRef<str>) -> Result<f64, Error> {
    let ast = parse(input, &SymbolTable::new())?;
    Ok(eval_ast(&ast, &SymbolTable::new())?)
}

/// Parse an expression, resolving identifiers against `ctx`.
pub fn parse<C>(input: impl AsRef<str>, ctx: &C) -> Result<ast::Expr, Error>
where
    C: Context + ?Sized,
{
    Ok(parse::parse(input, ctx)?)
}

/// Evaluate a parsed expression.
/// Identifiers are looked up again, so `ctx` may differ from the one used to parse.
pub fn eval_ast<C>(expr: &ast::Expr, ctx: &C) -> Result<f64, error::Eval>
where
    C: Context + ?Sized,
{
    eval::eval(expr, ctx)
}

/// Evaluates expressions against a long lived [`SymbolTable`].
///
/// # Examples
/// ```
/// # use reckon_core::expr::{Engine, Function};
/// let mut engine = Engine::new();
/// engine.register_function("f", Function::new(|a: f64| 5.0 * a)).unwrap();
/// assert_eq!(engine.evaluate("f(5)").unwrap(), 25.0);
/// assert_eq!(engine.evaluate_with("2x + y", [("x", 5), ("y", 10)]).unwrap(), 20.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    symbols: SymbolTable,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(symbols: SymbolTable) -> Self {
        Self { symbols }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }
}

impl Engine {
    /// Scan, parse, and evaluate the expression.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all, fields(input = %input.as_ref())))]
    pub fn evaluate(&self, input: impl AsRef<str>) -> Result<f64, Error> {
        let ast = self.parse(input)?;
        let value = eval_ast(&ast, &self.symbols)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(?value);

        Ok(value)
    }

    /// Bind the variables, then evaluate the expression.
    /// Bindings remain in the symbol table afterwards.
    pub fn evaluate_with<I, K, V>(
        &mut self,
        input: impl AsRef<str>,
        variables: I,
    ) -> Result<f64, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<f64>,
    {
        self.symbols.bind_variables(variables)?;
        self.evaluate(input)
    }

    /// Parse the expression against the symbol table.
    pub fn parse(&self, input: impl AsRef<str>) -> Result<ast::Expr, Error> {
        parse(input, &self.symbols)
    }

    pub fn bind_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<f64>,
    ) -> Result<(), Error> {
        Ok(self.symbols.bind_variable(name, value)?)
    }

    pub fn bind_variables<I, K, V>(&mut self, variables: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<f64>,
    {
        Ok(self.symbols.bind_variables(variables)?)
    }

    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        function: Function,
    ) -> Result<(), Error> {
        Ok(self.symbols.register_function(name, function)?)
    }

    pub fn register_functions<I, K>(&mut self, functions: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, Function)>,
        K: Into<String>,
    {
        Ok(self.symbols.register_functions(functions)?)
    }

    pub fn register_set<T>(&mut self) -> Result<(), Error>
    where
        T: FunctionSet,
    {
        Ok(self.symbols.register_set::<T>()?)
    }
}
