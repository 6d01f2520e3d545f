//! Eligian compiler front-end
//!
//! Eligian is a timeline and animation DSL compiled to a JSON configuration
//! for a runtime animation engine. This crate takes parsed Eligian documents
//! and validates every call against the operation registry, infers the types
//! of action parameters and maps positional calls to the engine's named
//! operation data.

pub mod ast;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod mapper;
pub mod registry;
pub mod structural;
pub mod typechecker;
pub mod validator;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ast::*;
    pub use crate::compiler::{CompiledProgram, Compiler};
    pub use crate::diagnostics::{Diagnostic, DiagnosticBag, Severity, Span};
    pub use crate::registry::{EligianType, OperationRegistry};
}
