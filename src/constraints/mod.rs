//! Constraint model: comparison operators and unary/binary date constraints.

pub mod comparison;
pub mod constraint;
pub mod error;

pub use comparison::Comparison;
pub use constraint::{BinaryConstraint, Constraint, UnaryConstraint};
pub use error::ParseComparisonError;
