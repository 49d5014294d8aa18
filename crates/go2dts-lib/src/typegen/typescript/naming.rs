//! Final names for declarations at reference sites.

use std::collections::{BTreeSet, HashMap};

use go2dts_core::utils::ident_prefix;

use super::Emitter;
use super::emitter::ImportBinding;
use crate::analyze::{DeclBody, DeclId, PackageId, ResolvedMethod, TypeRef};

impl Emitter<'_> {
    /// Merged mode: bare names unless the same name is declared by two
    /// packages, in which case every claimant becomes `<pkg>_<Name>`.
    pub(super) fn assign_merged_names(&mut self) {
        let model = self.model;

        let mut owners: HashMap<&str, BTreeSet<PackageId>> = HashMap::new();
        for decl in &model.decls {
            owners
                .entry(decl.name.as_str())
                .or_default()
                .insert(decl.package);
        }

        // Reserve uncontested names first so renamed ones cannot take them
        for decl in &model.decls {
            if owners.get(decl.name.as_str()).is_some_and(|o| o.len() == 1) {
                self.used_names.insert(decl.name.clone());
                self.type_names.insert(decl.id, decl.name.clone());
            }
        }

        for id in model.emission_order() {
            if self.type_names.contains_key(&id) {
                continue;
            }
            let decl = model.decl(id);
            let base = qualified_base(&model.package(decl.package).name, &decl.name);
            let name = self.unique_name(&base);
            tracing::trace!(from = %decl.name, to = %name, "renamed colliding declaration");
            self.type_names.insert(id, name);
        }
    }

    /// Tree mode: local declarations keep their names; referenced foreign
    /// declarations are imported, aliased when the name is taken.
    pub(super) fn assign_package_names(
        &mut self,
        package: PackageId,
        decls: &[DeclId],
    ) -> Vec<ImportBinding> {
        let model = self.model;

        for &id in decls {
            let name = model.decl(id).name.clone();
            self.used_names.insert(name.clone());
            self.type_names.insert(id, name);
        }

        let mut foreign = BTreeSet::new();
        for &id in decls {
            collect_body_refs(&model.decl(id).body, &mut foreign);
        }
        let mut foreign: Vec<DeclId> = foreign
            .into_iter()
            .filter(|&id| model.decl(id).package != package)
            .collect();
        foreign.sort_by(|&a, &b| {
            let (a, b) = (model.decl(a), model.decl(b));
            model
                .package(a.package)
                .display_path
                .cmp(&model.package(b.package).display_path)
                .then(a.package.cmp(&b.package))
                .then(a.name.cmp(&b.name))
        });

        foreign
            .into_iter()
            .map(|id| {
                let decl = model.decl(id);
                let local = if self.used_names.insert(decl.name.clone()) {
                    decl.name.clone()
                } else {
                    let base = qualified_base(&model.package(decl.package).name, &decl.name);
                    self.unique_name(&base)
                };
                self.type_names.insert(id, local.clone());
                ImportBinding { decl: id, local }
            })
            .collect()
    }

    pub(super) fn unique_name(&mut self, base: &str) -> String {
        if self.used_names.insert(base.to_string()) {
            return base.to_string();
        }

        let mut counter = 2;
        loop {
            let name = format!("{}{}", base, counter);
            if self.used_names.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }
}

fn qualified_base(package_name: &str, name: &str) -> String {
    format!("{}_{}", ident_prefix(package_name), name)
}

fn collect_body_refs(body: &DeclBody, out: &mut BTreeSet<DeclId>) {
    match body {
        DeclBody::Interface(fields) => {
            for field in fields {
                collect_refs(&field.ty, out);
            }
        }
        DeclBody::Alias(ty) => collect_refs(ty, out),
        DeclBody::Union(_) => {}
        DeclBody::Contract(methods) => {
            for ResolvedMethod {
                params, results, ..
            } in methods
            {
                for param in params {
                    collect_refs(&param.ty, out);
                }
                for result in results {
                    collect_refs(result, out);
                }
            }
        }
    }
}

fn collect_refs(ty: &TypeRef, out: &mut BTreeSet<DeclId>) {
    match ty {
        TypeRef::Named(id) => {
            out.insert(*id);
        }
        TypeRef::Optional(inner) | TypeRef::Repeated(inner) => collect_refs(inner, out),
        TypeRef::Keyed { value, .. } => collect_refs(value, out),
        TypeRef::Object(fields) => {
            for field in fields {
                collect_refs(&field.ty, out);
            }
        }
        TypeRef::Primitive(_) | TypeRef::Verbatim(_) => {}
    }
}
