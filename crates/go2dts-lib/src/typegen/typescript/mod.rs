//! TypeScript declaration (`.d.ts`) emission.
//!
//! Two layouts share one renderer:
//! - merged: every declaration in one file, colliding names package-qualified
//! - tree: one `index.d.ts` per package, cross-package references imported

mod emitter;
mod layout;
mod naming;
mod render;


pub use emitter::{Emitter, HEADER};
pub use layout::TreeLayout;

use crate::Config;
use crate::analyze::ResolvedModel;

/// Render every declaration into one merged file.
pub fn emit_merged(model: &ResolvedModel, config: &Config) -> String {
    Emitter::new(model, config).emit_merged()
}

/// Render one module per package that declares anything.
///
/// Returns `(relative file path, contents)` in package order.
pub fn emit_tree(model: &ResolvedModel, layout: &TreeLayout, config: &Config) -> Vec<(String, String)> {
    model
        .packages
        .iter()
        .filter(|pkg| !model.package_decls(pkg.id).is_empty())
        .map(|pkg| {
            let text = Emitter::new(model, config).emit_package(pkg.id, layout);
            (layout.file(pkg.id), text)
        })
        .collect()
}
