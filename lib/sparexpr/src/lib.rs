#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod eval;
mod expression;
mod geo;
mod row;
mod serializer;
mod term;
pub mod vocab;

pub use crate::eval::{Clock, ExpressionEvaluator};
pub use crate::expression::{
    BinaryOperator, Expression, GeneratorFunction, QueryConstructionError, UnaryFunction,
};
pub use crate::row::{BindingRow, VariableBindings};
pub use crate::serializer::Namespace;
pub use crate::term::{ExpressionTerm, ParseRationalError, Rational};
