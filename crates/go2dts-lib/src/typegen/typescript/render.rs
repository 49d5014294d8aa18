//! Output rendering methods.

use go2dts_core::utils::{is_ts_reserved, ts_property_key};

use super::emitter::{Emitter, HEADER, ImportBinding};
use super::TreeLayout;
use crate::analyze::{
    DeclBody, DeclId, KeyKind, PackageId, Primitive, ResolvedField, ResolvedMethod, TypeRef,
};
use crate::config::NullStyle;

impl Emitter<'_> {
    pub(super) fn emit_header(&mut self) {
        let c = self.c();
        self.output
            .push_str(&format!("{}{}{}\n\n", c.dim, HEADER, c.reset));
    }

    pub(super) fn emit_imports(
        &mut self,
        package: PackageId,
        imports: &[ImportBinding],
        layout: &TreeLayout,
    ) {
        if imports.is_empty() {
            return;
        }
        let c = self.c();
        let model = self.model;

        // Bindings arrive sorted by target package, so groups are contiguous
        for group in imports.chunk_by(|a, b| model.decl(a.decl).package == model.decl(b.decl).package) {
            let target = model.decl(group[0].decl).package;
            let names = group
                .iter()
                .map(|binding| {
                    let name = &model.decl(binding.decl).name;
                    if *name == binding.local {
                        format!("{}{}{}", c.blue, name, c.reset)
                    } else {
                        format!(
                            "{}{}{} {}as{} {}{}{}",
                            c.blue, name, c.reset, c.dim, c.reset, c.blue, binding.local, c.reset
                        )
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            self.output.push_str(&format!(
                "{}import type{} {{ {} }} {}from{} {}\"{}\"{};\n",
                c.dim,
                c.reset,
                names,
                c.dim,
                c.reset,
                c.green,
                layout.import_specifier(package, target),
                c.reset,
            ));
        }
        self.output.push('\n');
    }

    pub(super) fn emit_decl(&mut self, id: DeclId) {
        let model = self.model;
        let decl = model.decl(id);
        let name = self.type_name(id);

        if self.config.include_docs {
            self.emit_doc(decl.doc.as_deref(), "");
        }

        match &decl.body {
            DeclBody::Interface(fields) => self.emit_interface(&name, fields),
            DeclBody::Alias(ty) => {
                let body = self.type_to_ts(ty);
                self.emit_type_decl(&name, &body);
            }
            DeclBody::Union(values) => {
                let c = self.c();
                let body = values
                    .iter()
                    .map(|v| format!("{}{}{}", c.green, string_literal(v), c.reset))
                    .collect::<Vec<_>>()
                    .join(&format!(" {}|{} ", c.dim, c.reset));
                self.emit_type_decl(&name, &body);
            }
            DeclBody::Contract(methods) => self.emit_contract(&name, methods),
        }
    }

    /// Emit `export type Name = Body;` with proper coloring.
    fn emit_type_decl(&mut self, name: &str, body: &str) {
        let c = self.c();
        self.emit_export();
        self.output.push_str(&format!(
            "{}type{} {}{}{} {}={} {}{};{}\n\n",
            c.dim, c.reset, c.blue, name, c.reset, c.dim, c.reset, body, c.dim, c.reset
        ));
    }

    fn emit_interface(&mut self, name: &str, fields: &[ResolvedField]) {
        let c = self.c();

        self.emit_export();
        self.output.push_str(&format!(
            "{}interface{} {}{}{} {}{{{}",
            c.dim, c.reset, c.blue, name, c.reset, c.dim, c.reset
        ));
        if fields.is_empty() {
            self.output.push_str(&format!("{}}}{}\n\n", c.dim, c.reset));
            return;
        }
        self.output.push('\n');

        for field in fields {
            if self.config.include_docs {
                self.emit_doc(field.doc.as_deref(), "  ");
            }
            let member = self.field_member(field);
            self.output
                .push_str(&format!("  {}{};{}\n", member, c.dim, c.reset));
        }

        self.output.push_str(&format!("{}}}{}\n\n", c.dim, c.reset));
    }

    fn emit_contract(&mut self, name: &str, methods: &[ResolvedMethod]) {
        let c = self.c();

        self.emit_export();
        self.output.push_str(&format!(
            "{}interface{} {}{}{} {}{{{}\n",
            c.dim, c.reset, c.blue, name, c.reset, c.dim, c.reset
        ));

        for method in methods {
            if self.config.include_docs {
                self.emit_doc(method.doc.as_deref(), "  ");
            }
            let params = method
                .params
                .iter()
                .enumerate()
                .map(|(idx, param)| {
                    let name = param_name(param.name.as_deref(), idx);
                    if param.variadic {
                        format!(
                            "{}...{}{}{}:{} {}{}[]{}",
                            c.dim,
                            c.reset,
                            name,
                            c.dim,
                            c.reset,
                            self.element_to_ts(&param.ty),
                            c.dim,
                            c.reset
                        )
                    } else {
                        format!("{}{}:{} {}", name, c.dim, c.reset, self.type_to_ts(&param.ty))
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            let result = match method.results.as_slice() {
                [] => "void".to_string(),
                [single] => self.type_to_ts(single),
                many => format!(
                    "[{}]",
                    many.iter()
                        .map(|ty| self.type_to_ts(ty))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            };
            self.output.push_str(&format!(
                "  {}({}){}:{} {}{};{}\n",
                method.name, params, c.dim, c.reset, result, c.dim, c.reset
            ));
        }

        self.output.push_str(&format!("{}}}{}\n\n", c.dim, c.reset));
    }

    fn emit_export(&mut self) {
        if self.config.export {
            let c = self.c();
            self.output
                .push_str(&format!("{}export{} ", c.dim, c.reset));
        }
    }

    fn emit_doc(&mut self, doc: Option<&str>, indent: &str) {
        let Some(doc) = doc.map(str::trim).filter(|d| !d.is_empty()) else {
            return;
        };
        let c = self.c();
        let doc = doc.replace("*/", "*\\/");
        let lines: Vec<&str> = doc.lines().map(str::trim_end).collect();

        self.output.push_str(c.dim);
        if let [line] = lines.as_slice() {
            self.output.push_str(&format!("{indent}/** {line} */\n"));
        } else {
            self.output.push_str(&format!("{indent}/**\n"));
            for line in lines {
                if line.is_empty() {
                    self.output.push_str(&format!("{indent} *\n"));
                } else {
                    self.output.push_str(&format!("{indent} * {line}\n"));
                }
            }
            self.output.push_str(&format!("{indent} */\n"));
        }
        self.output.push_str(c.reset);
    }

    /// `name?: T` / `name: T | null` for one field.
    fn field_member(&self, field: &ResolvedField) -> String {
        let c = self.c();
        let (optional, ty) = match &field.ty {
            TypeRef::Optional(inner) if field.omit_empty => (true, self.type_to_ts(inner)),
            TypeRef::Optional(_) => (
                self.config.null_style == NullStyle::OptionalUnion,
                self.type_to_ts(&field.ty),
            ),
            ty => (field.omit_empty, self.type_to_ts(ty)),
        };
        let marker = if optional { "?" } else { "" };
        format!(
            "{}{}{}:{} {}",
            ts_property_key(&field.name),
            c.dim,
            marker,
            c.reset,
            ty
        )
    }

    pub(super) fn type_to_ts(&self, ty: &TypeRef) -> String {
        let c = self.c();
        match ty {
            TypeRef::Primitive(prim) => primitive_to_ts(*prim).to_string(),
            TypeRef::Named(id) => format!("{}{}{}", c.blue, self.type_name(*id), c.reset),
            TypeRef::Verbatim(ts) => ts.clone(),
            TypeRef::Optional(inner) => {
                format!("{} {}|{} null", self.type_to_ts(inner), c.dim, c.reset)
            }
            TypeRef::Repeated(inner) => format!("{}{}[]{}", self.element_to_ts(inner), c.dim, c.reset),
            TypeRef::Keyed { key, value } => {
                let key = match key {
                    KeyKind::String => "string",
                    KeyKind::Number => "number",
                };
                format!(
                    "{}{{{} [key{}:{} {}]{}:{} {} {}}}{}",
                    c.dim,
                    c.reset,
                    c.dim,
                    c.reset,
                    key,
                    c.dim,
                    c.reset,
                    self.type_to_ts(value),
                    c.dim,
                    c.reset
                )
            }
            TypeRef::Object(fields) if fields.is_empty() => format!("{}{{}}{}", c.dim, c.reset),
            TypeRef::Object(fields) => {
                let members = fields
                    .iter()
                    .map(|field| self.field_member(field))
                    .collect::<Vec<_>>()
                    .join(&format!("{};{} ", c.dim, c.reset));
                format!("{}{{{} {} {}}}{}", c.dim, c.reset, members, c.dim, c.reset)
            }
        }
    }

    /// Array element position: unions need parentheses.
    fn element_to_ts(&self, ty: &TypeRef) -> String {
        let rendered = self.type_to_ts(ty);
        let needs_parens = match ty {
            TypeRef::Optional(_) => true,
            TypeRef::Verbatim(ts) => ts.contains(['|', '&']) || ts.contains("=>"),
            _ => false,
        };
        if needs_parens {
            format!("({rendered})")
        } else {
            rendered
        }
    }

    fn type_name(&self, id: DeclId) -> String {
        self.type_names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| self.model.decl(id).name.clone())
    }
}

fn primitive_to_ts(prim: Primitive) -> &'static str {
    match prim {
        Primitive::Boolean => "boolean",
        Primitive::Number => "number",
        Primitive::String | Primitive::Bytes | Primitive::Temporal => "string",
        Primitive::Any => "any",
    }
}

/// Double-quoted TypeScript string literal.
fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Unnamed and blank parameters get positional names; reserved words get a
/// trailing underscore.
fn param_name(name: Option<&str>, idx: usize) -> String {
    match name {
        None | Some("_") => format!("arg{idx}"),
        Some(name) if is_ts_reserved(name) => format!("{name}_"),
        Some(name) => name.to_string(),
    }
}
