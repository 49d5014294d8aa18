//! Semantic analysis: the symbol table and the type resolver.
//!
//! - `symbol_table` - arena registry of packages and declarations, import matching
//! - `resolve` - raw type expressions to `TypeRef`s, embedding flattened
//! - `types` - the resolved model handed to the emitter

pub mod resolve;
pub mod symbol_table;
pub mod types;
mod well_known;

#[cfg(test)]
mod resolve_tests;
#[cfg(test)]
mod symbol_table_tests;

pub use resolve::resolve;
pub use symbol_table::{DeclId, DeclKind, Declaration, PackageId, SourcePackage, SymbolTable};
pub use types::{
    DeclBody, KeyKind, Primitive, ResolvedDecl, ResolvedField, ResolvedMethod, ResolvedModel,
    ResolvedParam, TypeRef,
};
