//! Variables and functions available to an expression.
use std::{collections::HashMap, fmt, rc::Rc};

/// Provides the identifiers to parse and evaluate an expression with.
pub trait Context {
    /// Entry for the identifier.
    /// Identifiers are case insensitive.
    /// `None` if the identifier is not defined.
    fn lookup(&self, name: &str) -> Option<&Entry>;
}

/// Callable with a fixed number of `f64` arguments returning an `f64`.
///
/// Implemented for `Fn(f64, ..) -> f64` with up to 4 arguments.
/// `Args` is `[f64; N]` where `N` is the arity.
pub trait NumericFn<Args>: 'static {
    const ARITY: usize;

    /// Invoke the function.
    /// `args` must have exactly [`Self::ARITY`] elements.
    fn invoke(&self, args: &[f64]) -> f64;
}

macro_rules! numeric_fn {
    (@ty $arg:ident) => { f64 };
    ($arity:literal => $($arg:ident)*) => {
        impl<F> NumericFn<[f64; $arity]> for F
        where
            F: Fn($(numeric_fn!(@ty $arg)),*) -> f64 + 'static,
        {
            const ARITY: usize = $arity;

            fn invoke(&self, args: &[f64]) -> f64 {
                // arity is checked by `Function::call`
                let &[$($arg),*] = args else {
                    return f64::NAN;
                };
                self($($arg),*)
            }
        }
    };
}

numeric_fn!(0 =>);
numeric_fn!(1 => a);
numeric_fn!(2 => a b);
numeric_fn!(3 => a b c);
numeric_fn!(4 => a b c d);

/// A function callable from an expression.
#[derive(Clone)]
pub struct Function {
    arity: usize,
    body: Rc<dyn Fn(&[f64]) -> f64>,
}

impl Function {
    /// Create a function from a closure or function item.
    /// The arity is taken from the signature.
    ///
    /// # Examples
    /// ```
    /// # use reckon_core::expr::Function;
    /// let add = Function::new(|a: f64, b: f64| a + b);
    /// assert_eq!(add.arity(), 2);
    /// assert_eq!(add.call(&[2.0, 3.0]), Some(5.0));
    /// ```
    pub fn new<F, A>(f: F) -> Self
    where
        F: NumericFn<A>,
    {
        Self {
            arity: F::ARITY,
            body: Rc::new(move |args| f.invoke(args)),
        }
    }

    /// Create a function taking its arguments as a slice.
    pub fn from_slice(arity: usize, f: impl Fn(&[f64]) -> f64 + 'static) -> Self {
        Self {
            arity,
            body: Rc::new(f),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invoke the function.
    /// `None` if the number of arguments does not match the arity.
    pub fn call(&self, args: &[f64]) -> Option<f64> {
        if args.len() != self.arity {
            return None;
        }
        Some((self.body)(args))
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// A type exposing a set of functions to register together.
pub trait FunctionSet {
    fn functions() -> Vec<(&'static str, Function)>;
}

#[derive(Debug, Clone, derive_more::From)]
pub enum Entry {
    Variable(f64),
    Function(Function),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Variable(_) => EntryKind::Variable,
            Self::Function(_) => EntryKind::Function,
        }
    }

    pub fn as_variable(&self) -> Option<f64> {
        if let Self::Variable(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        if let Self::Function(function) = self {
            Some(function)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryKind {
    #[display("variable")]
    Variable,
    #[display("function")]
    Function,
}

#[derive(Debug, Clone)]
struct Symbol {
    /// Name as registered.
    name: String,
    entry: Entry,
}

/// Registry of variables and functions.
/// Names are case insensitive.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Keyed by lowercase name.
    entries: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.entries.contains_key(&key(name.as_ref()))
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<&Entry> {
        self.entries
            .get(&key(name.as_ref()))
            .map(|symbol| &symbol.entry)
    }

    /// Iterate over `(name, entry)` pairs, with names as they were registered.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries
            .values()
            .map(|symbol| (symbol.name.as_str(), &symbol.entry))
    }
}

impl SymbolTable {
    /// Insert a variable or update its value.
    ///
    /// # Errors
    /// + [`error::Kind::TypeMismatch`] if the name is a function.
    pub fn bind_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<f64>,
    ) -> Result<(), error::Kind> {
        let name = name.into();
        let value = value.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(?name, ?value, "bind variable");

        match self.entries.get_mut(&key(&name)) {
            None => {
                self.entries.insert(
                    key(&name),
                    Symbol {
                        name,
                        entry: Entry::Variable(value),
                    },
                );
                Ok(())
            }
            Some(Symbol {
                entry: Entry::Variable(current),
                ..
            }) => {
                *current = value;
                Ok(())
            }
            Some(Symbol { entry, .. }) => Err(error::Kind::TypeMismatch {
                name,
                expected: EntryKind::Variable,
                found: entry.kind(),
            }),
        }
    }

    /// Bind each `(name, value)` pair.
    /// Stops at the first failure, bindings made before it are kept.
    pub fn bind_variables<I, K, V>(&mut self, variables: I) -> Result<(), error::Kind>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<f64>,
    {
        for (name, value) in variables {
            self.bind_variable(name, value)?;
        }
        Ok(())
    }

    /// Insert a function or replace an existing one.
    ///
    /// # Errors
    /// + [`error::Kind::TypeMismatch`] if the name is a variable.
    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        function: Function,
    ) -> Result<(), error::Kind> {
        let name = name.into();
        #[cfg(feature = "tracing")]
        tracing::debug!(?name, arity = function.arity(), "register function");

        if let Some(Symbol {
            entry: Entry::Variable(_),
            ..
        }) = self.entries.get(&key(&name))
        {
            return Err(error::Kind::TypeMismatch {
                name,
                expected: EntryKind::Function,
                found: EntryKind::Variable,
            });
        }

        self.entries.insert(
            key(&name),
            Symbol {
                name,
                entry: Entry::Function(function),
            },
        );
        Ok(())
    }

    /// Register each `(name, function)` pair.
    /// Stops at the first failure, registrations made before it are kept.
    pub fn register_functions<I, K>(&mut self, functions: I) -> Result<(), error::Kind>
    where
        I: IntoIterator<Item = (K, Function)>,
        K: Into<String>,
    {
        for (name, function) in functions {
            self.register_function(name, function)?;
        }
        Ok(())
    }

    /// Register all functions of a [`FunctionSet`].
    pub fn register_set<T>(&mut self) -> Result<(), error::Kind>
    where
        T: FunctionSet,
    {
        self.register_functions(T::functions())
    }
}

impl Context for SymbolTable {
    fn lookup(&self, name: &str) -> Option<&Entry> {
        self.get(name)
    }
}

impl<T> Context for &T
where
    T: Context + ?Sized,
{
    fn lookup(&self, name: &str) -> Option<&Entry> {
        (**self).lookup(name)
    }
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

pub mod error {
    use super::EntryKind;

    #[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub enum Kind {
        /// The name is already bound to a different kind of entry.
        #[display("`{name}` is a {found}, not a {expected}")]
        TypeMismatch {
            name: String,
            expected: EntryKind,
            found: EntryKind,
        },
    }

    impl std::error::Error for Kind {}
}
