use super::{
    ast,
    symbol::{Context, Entry},
};

/// Evaluate an expression.
pub fn eval<C>(expr: &ast::Expr, ctx: &C) -> Result<f64, error::Kind>
where
    C: Context + ?Sized,
{
    match expr {
        ast::Expr::Number(value) => Ok(value.value),
        ast::Expr::Variable(value) => eval_variable(value, ctx),
        ast::Expr::Call(value) => eval_call(value, ctx),
        ast::Expr::Unary(value) => eval_unary(value, ctx),
        ast::Expr::Binary(value) => eval_binary(value, ctx),
    }
}

fn eval_variable<C>(expr: &ast::ExprVariable, ctx: &C) -> Result<f64, error::Kind>
where
    C: Context + ?Sized,
{
    match ctx.lookup(&expr.name) {
        Some(Entry::Variable(value)) => Ok(*value),
        _ => Err(error::Kind::UndefinedVariable {
            name: expr.name.clone(),
        }),
    }
}

fn eval_call<C>(expr: &ast::ExprCall, ctx: &C) -> Result<f64, error::Kind>
where
    C: Context + ?Sized,
{
    let Some(Entry::Function(function)) = ctx.lookup(&expr.name) else {
        return Err(error::Kind::UndefinedFunction {
            name: expr.name.clone(),
        });
    };

    let args = expr
        .args
        .iter()
        .map(|arg| eval(arg, ctx))
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(name = ?expr.name, ?args, "call");

    function.call(&args).ok_or_else(|| error::Kind::ArityMismatch {
        name: expr.name.clone(),
        expected: function.arity(),
        found: args.len(),
    })
}

fn eval_unary<C>(expr: &ast::ExprUnary, ctx: &C) -> Result<f64, error::Kind>
where
    C: Context + ?Sized,
{
    let value = eval(&expr.expr, ctx)?;
    match expr.op {
        ast::OpUnary::Negate => Ok(-value),
        ast::OpUnary::Factorial => factorial(value),
    }
}

fn eval_binary<C>(expr: &ast::ExprBinary, ctx: &C) -> Result<f64, error::Kind>
where
    C: Context + ?Sized,
{
    let left = eval(&expr.left, ctx)?;
    let right = eval(&expr.right, ctx)?;
    let value = match expr.op {
        ast::OpBinary::Add => left + right,
        ast::OpBinary::Subtract => left - right,
        ast::OpBinary::Multiply => left * right,
        ast::OpBinary::Divide => left / right,
        ast::OpBinary::Exp => left.powf(right),
    };
    Ok(value)
}

/// `n!` for a non-negative integer `n`.
/// Overflows to infinity for `n > 170`.
fn factorial(value: f64) -> Result<f64, error::Kind> {
    if value.fract() != 0.0 {
        return Err(error::Kind::NonIntegerFactorial { value });
    }
    if value < 0.0 {
        return Err(error::Kind::NegativeFactorial { value });
    }

    let mut product: f64 = 1.0;
    let mut k: f64 = 2.0;
    while k <= value && product.is_finite() {
        product *= k;
        k += 1.0;
    }
    Ok(product)
}

pub mod error {
    #[derive(Debug, Clone, PartialEq, derive_more::Display)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// The variable is no longer defined.
        #[display("undefined variable `{name}`")]
        UndefinedVariable { name: String },

        /// The function is no longer defined.
        #[display("undefined function `{name}`")]
        UndefinedFunction { name: String },

        /// The function was redefined with a different arity.
        #[display("function `{name}` takes {expected} argument(s), {found} given")]
        ArityMismatch {
            name: String,
            expected: usize,
            found: usize,
        },

        /// Factorial of a negative number.
        #[display("factorial of negative number {value}")]
        NegativeFactorial { value: f64 },

        /// Factorial of a fractional or non-finite number.
        #[display("factorial of non-integer {value}")]
        NonIntegerFactorial { value: f64 },
    }

    impl std::error::Error for Kind {}
}
