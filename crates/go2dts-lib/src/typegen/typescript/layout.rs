//! Output paths for tree mode.

use crate::analyze::{PackageId, ResolvedModel};
use crate::scan::slash_path;

/// Module file name written into every package directory.
pub const MODULE_FILE: &str = "index.d.ts";

/// Per-package output directories, relative to the output root.
///
/// With one input root a package lands at its root-relative directory; with
/// several, each root gets its own top-level directory named by its label.
#[derive(Clone, Debug, Default)]
pub struct TreeLayout {
    dirs: Vec<String>,
}

impl TreeLayout {
    pub fn new(model: &ResolvedModel, root_labels: &[String]) -> Self {
        let multi_root = root_labels.len() > 1;
        let dirs = model
            .packages
            .iter()
            .map(|pkg| {
                let rel = slash_path(&pkg.rel_dir);
                let label = root_labels.get(pkg.root).filter(|_| multi_root);
                match (label, rel.is_empty()) {
                    (Some(label), true) => label.clone(),
                    (Some(label), false) => format!("{label}/{rel}"),
                    (None, _) => rel,
                }
            })
            .collect();
        Self { dirs }
    }

    /// Slash-separated directory; empty for the output root.
    pub fn dir(&self, package: PackageId) -> &str {
        self.dirs
            .get(package.index())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn file(&self, package: PackageId) -> String {
        match self.dir(package) {
            "" => MODULE_FILE.to_string(),
            dir => format!("{dir}/{MODULE_FILE}"),
        }
    }

    /// Relative module specifier for importing `to` from `from`'s module.
    pub fn import_specifier(&self, from: PackageId, to: PackageId) -> String {
        let from: Vec<&str> = segments(self.dir(from));
        let to: Vec<&str> = segments(self.dir(to));
        let common = from
            .iter()
            .zip(&to)
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = vec![".."; from.len() - common];
        parts.extend(&to[common..]);
        match parts.first() {
            None => ".".to_string(),
            Some(&"..") => parts.join("/"),
            Some(_) => format!("./{}", parts.join("/")),
        }
    }
}

fn segments(dir: &str) -> Vec<&str> {
    dir.split('/').filter(|s| !s.is_empty()).collect()
}
