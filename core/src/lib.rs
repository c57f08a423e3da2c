//! Evaluate arithmetic expressions with variables and functions.
//!
//! ```
//! # use reckon_core::expr;
//! assert_eq!(expr::eval("2^3^2").unwrap(), 512.0);
//! ```
pub mod expr;
