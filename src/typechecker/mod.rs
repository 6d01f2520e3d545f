//! Type inference for Eligian actions
//!
//! - literal inference: lattice type of an argument expression
//! - constraint collection: how each action parameter is used in the body
//! - unification: one type per parameter, or a conflict
//!
//! None of this caches anything; results depend on the current AST and are
//! recomputed on every validation pass.

mod constraints;
mod literal;
mod unify;

pub use constraints::{collect_parameter_constraints, TypeConstraint};
pub use literal::infer_literal_type;
pub use unify::{infer_parameter_types, unify_constraints, ParameterTypeMap, TypeError};
