//! Core emitter struct and main emit logic.

use std::collections::{BTreeSet, HashMap};

use go2dts_core::Colors;

use super::TreeLayout;
use crate::Config;
use crate::analyze::{DeclId, PackageId, ResolvedModel};

/// First line of every emitted file.
pub const HEADER: &str = "// Code generated by go2dts. DO NOT EDIT.";

/// A foreign declaration imported into a tree-mode module.
#[derive(Clone, Debug)]
pub(super) struct ImportBinding {
    pub decl: DeclId,
    /// Name used inside the importing module.
    pub local: String,
}

/// TypeScript emitter over a resolved model.
pub struct Emitter<'a> {
    pub(super) model: &'a ResolvedModel,
    pub(super) config: &'a Config,
    pub(super) colors: Colors,

    /// DeclId -> name used at reference sites
    pub(super) type_names: HashMap<DeclId, String>,
    /// Names already used (for collision avoidance)
    pub(super) used_names: BTreeSet<String>,
    /// Output buffer
    pub(super) output: String,
}

impl<'a> Emitter<'a> {
    pub fn new(model: &'a ResolvedModel, config: &'a Config) -> Self {
        Self {
            model,
            config,
            colors: config.colors,
            type_names: HashMap::new(),
            used_names: BTreeSet::new(),
            output: String::new(),
        }
    }

    pub(super) fn c(&self) -> Colors {
        self.colors
    }

    /// Emit every declaration of the run into one file.
    pub fn emit_merged(mut self) -> String {
        self.assign_merged_names();
        self.emit_header();
        for id in self.model.emission_order() {
            self.emit_decl(id);
        }
        self.finish()
    }

    /// Emit the module for one package in tree layout.
    pub fn emit_package(mut self, package: PackageId, layout: &TreeLayout) -> String {
        let decls = self.model.package_decls(package);
        let imports = self.assign_package_names(package, &decls);

        self.emit_header();
        self.emit_imports(package, &imports, layout);
        for id in decls {
            self.emit_decl(id);
        }
        self.finish()
    }

    fn finish(mut self) -> String {
        // Ensure exactly one trailing newline
        self.output.truncate(self.output.trim_end().len());
        self.output.push('\n');
        self.output
    }
}
