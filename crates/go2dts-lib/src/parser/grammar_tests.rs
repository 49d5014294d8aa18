use std::fmt::Write;

use indoc::indoc;

use super::ast::{InterfaceElem, SourceFile, TypeExpr};
use super::{ParseResult, is_generated, parse};
use crate::source_map::SourceId;

fn parse_ok(source: &str) -> SourceFile {
    let ParseResult { file, diagnostics } = parse(source, SourceId::default());
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    file.expect("file should parse")
}

fn dump(source: &str) -> String {
    let file = parse_ok(source);
    let mut out = String::new();
    writeln!(out, "package {}", file.package.text).unwrap();
    for import in &file.imports {
        match &import.alias {
            Some(alias) => writeln!(out, "import {alias} {:?}", import.path).unwrap(),
            None => writeln!(out, "import {:?}", import.path).unwrap(),
        }
    }
    for spec in &file.types {
        if let Some(doc) = &spec.doc {
            writeln!(out, "// {}", doc.replace('\n', "\n// ")).unwrap();
        }
        let eq = if spec.is_alias { " =" } else { "" };
        writeln!(out, "type {}{eq} {}", spec.name.text, spec.ty).unwrap();
    }
    for c in &file.consts {
        writeln!(out, "const {} {} = {:?}", c.name.text, c.type_name, c.value).unwrap();
    }
    out
}

#[test]
fn package_and_imports() {
    let input = indoc! {r#"
    // Package app holds models.
    package app

    import "time"

    import (
        db "github.com/acme/db"
        _ "github.com/lib/pq"
        . "github.com/acme/shared"
        `strings`
    )
    "#};

    insta::assert_snapshot!(dump(input), @r#"
    package app
    import "time"
    import db "github.com/acme/db"
    import _ "github.com/lib/pq"
    import . "github.com/acme/shared"
    import "strings"
    "#);
}

#[test]
fn type_declarations() {
    let input = indoc! {r#"
    package app

    // User is a person.
    // It has a name.
    type User struct {
        ID   int
        Name string
    }

    type (
        // IDs are opaque.
        ID string
        Alias = User
        Lookup map[string][]*User
        Buf [16]byte
        Callback func(ctx context.Context, a, b int) (string, error)
    )

    type Stream <-chan []byte
    "#};

    insta::assert_snapshot!(dump(input), @r"
    package app
    // User is a person.
    // It has a name.
    type User struct{ ID int; Name string }
    // IDs are opaque.
    type ID string
    type Alias = User
    type Lookup map[string][]*User
    type Buf [16]byte
    type Callback func(ctx context.Context, a int, b int) (string, error)
    type Stream <-chan []byte
    ");
}

#[test]
fn skips_functions_and_vars() {
    let input = indoc! {r#"
    package app

    var defaults = map[string]int{
        "a": 1,
    }

    func (u *User) Greet(prefix string) string {
        if u == nil {
            return "}"
        }
        return prefix + u.Name
    }

    type User struct{ Name string }

    func init() { _ = '{' }
    "#};

    insta::assert_snapshot!(dump(input), @r"
    package app
    type User struct{ Name string }
    ");
}

#[test]
fn typed_string_constants() {
    let input = indoc! {r#"
    package app

    type Role string

    const (
        RoleAdmin Role = "admin"
        RoleUser  Role = "user" // trailing
        RoleNone       = ""
        maxUsers       = 10
    )

    const Fallback Role = `guest`
    const Count int = 3
    "#};

    insta::assert_snapshot!(dump(input), @r#"
    package app
    type Role string
    const RoleAdmin Role = "admin"
    const RoleUser Role = "user"
    const Fallback Role = "guest"
    "#);
}

#[test]
fn converted_string_constants() {
    let input = indoc! {r#"
    package app

    type Role string

    const (
        RoleAdmin Role = "admin"
        RoleUser       = Role("user")
        RoleGuest      = Role(`guest`) // trailing
        RoleSplit      = Role("a" + "b")
        RoleBare       = string("bare")
    )

    const Owner = Role("owner")
    "#};

    insta::assert_snapshot!(dump(input), @r#"
    package app
    type Role string
    const RoleAdmin Role = "admin"
    const RoleUser Role = "user"
    const RoleGuest Role = "guest"
    const RoleBare string = "bare"
    const Owner Role = "owner"
    "#);
}

#[test]
fn struct_fields_tags_and_docs() {
    let input = indoc! {r#"
    package app

    type Account struct {
        // Owner of the account.
        *User
        base.Model `json:"model"`

        First, Last string `json:"first,omitempty"`
        Nested struct {
            Inner bool
        } // not a doc
        secret string
    }
    "#};

    let file = parse_ok(input);
    let TypeExpr::Struct(fields) = &file.types[0].ty else {
        panic!("expected struct");
    };

    assert_eq!(fields.len(), 5);
    assert!(fields[0].is_embedded());
    assert_eq!(fields[0].ty.to_string(), "*User");
    assert_eq!(fields[0].doc.as_deref(), Some("Owner of the account."));
    assert!(fields[1].is_embedded());
    assert_eq!(fields[1].ty.to_string(), "base.Model");
    assert_eq!(fields[1].tag.as_deref(), Some(r#"json:"model""#));
    assert_eq!(fields[1].doc, None);
    let names: Vec<&str> = fields[2].names.iter().map(|n| n.text.as_str()).collect();
    assert_eq!(names, ["First", "Last"]);
    assert_eq!(fields[2].tag.as_deref(), Some(r#"json:"first,omitempty""#));
    assert_eq!(fields[3].ty.to_string(), "struct{ Inner bool }");
    assert_eq!(fields[4].names[0].text, "secret");
    assert_eq!(fields[4].doc, None);
}

#[test]
fn interface_elements() {
    let input = indoc! {r#"
    package app

    type Store interface {
        io.Closer
        // Get loads one user.
        Get(ctx context.Context, id string) (*User, error)
        List() []User
        Ping()
        ~int | ~string
    }
    "#};

    let file = parse_ok(input);
    let TypeExpr::Interface(elems) = &file.types[0].ty else {
        panic!("expected interface");
    };

    assert!(matches!(&elems[0], InterfaceElem::Embedded(t) if t.to_string() == "io.Closer"));
    let InterfaceElem::Method {
        name,
        signature,
        doc,
    } = &elems[1]
    else {
        panic!("expected method");
    };
    assert_eq!(name.text, "Get");
    assert_eq!(doc.as_deref(), Some("Get loads one user."));
    assert_eq!(
        signature.to_string(),
        "(ctx context.Context, id string) (*User, error)"
    );
    assert!(matches!(&elems[4], InterfaceElem::TypeSet(terms) if terms.len() == 2));
}

#[test]
fn unnamed_params() {
    let input = indoc! {r#"
    package app

    type Handler func(string, ...int) error
    type Pair func(a, b string)
    type Many func(xs ...string)
    "#};

    insta::assert_snapshot!(dump(input), @r"
    package app
    type Handler func(string, ...int) error
    type Pair func(a string, b string)
    type Many func(xs ...string)
    ");
}

#[test]
fn generic_declaration_is_skipped_with_warning() {
    let input = indoc! {r#"
    package app

    type Page[T any] struct {
        Items []T
    }

    type Grid [Size]int

    type After struct{}
    "#};

    let res = parse(input, SourceId::default());
    let file = res.file.expect("file should parse");
    let names: Vec<&str> = file.types.iter().map(|t| t.name.text.as_str()).collect();
    assert_eq!(names, ["Grid", "After"]);
    assert_eq!(res.diagnostics.len(), 1);
    let diag = res.diagnostics.iter().next().unwrap();
    insta::assert_snapshot!(diag.message(), @"unsupported syntax; declaration skipped: generic type `Page`");
}

#[test]
fn array_length_expressions_are_not_generics() {
    let input = indoc! {r#"
    package app

    type Buf [Size*2]byte
    type Half [Size / 2]int
    type Pair[K comparable, V any] struct{}
    "#};

    let res = parse(input, SourceId::default());
    let file = res.file.expect("file should parse");
    let types: Vec<String> = file
        .types
        .iter()
        .map(|t| format!("type {} {}", t.name.text, t.ty))
        .collect();
    assert_eq!(types, ["type Buf [Size*2]byte", "type Half [Size / 2]int"]);
    assert_eq!(res.diagnostics.len(), 1);
    let diag = res.diagnostics.iter().next().unwrap();
    insta::assert_snapshot!(diag.message(), @"unsupported syntax; declaration skipped: generic type `Pair`");
}

#[test]
fn generic_instantiation_in_field() {
    let input = indoc! {r#"
    package app

    type Feed struct {
        Page paging.Page[Item, int]
    }
    "#};

    insta::assert_snapshot!(dump(input), @r"
    package app
    type Feed struct{ Page paging.Page[Item, int] }
    ");
}

#[test]
fn syntax_error_abandons_file() {
    let input = indoc! {r#"
    package app

    type Broken struct {
        Name string string string
    }
    "#};

    let res = parse(input, SourceId::default());
    assert!(res.file.is_none());
    assert_eq!(res.diagnostics.len(), 1);
    let diag = res.diagnostics.iter().next().unwrap();
    insta::assert_snapshot!(diag.message(), @"syntax error: expected end of field, found `string`");
}

#[test]
fn missing_package_clause_warns_and_continues() {
    let input = indoc! {r#"
    // Code generated by protoc-gen-go. DO NOT EDIT.

    type UserResp struct {
        Id string
    }
    "#};

    let res = parse(input, SourceId::default());
    let file = res.file.expect("file should parse");
    assert_eq!(file.package.text, "");
    let names: Vec<&str> = file.types.iter().map(|t| t.name.text.as_str()).collect();
    assert_eq!(names, ["UserResp"]);

    assert_eq!(res.diagnostics.len(), 1);
    let diag = res.diagnostics.iter().next().unwrap();
    insta::assert_snapshot!(diag.message(), @"file has no `package` clause; package name inferred");
}

#[test]
fn deeply_nested_type_is_rejected() {
    let input = format!("package app\n\ntype Deep {}int\n", "*".repeat(300));

    let res = parse(&input, SourceId::default());
    assert!(res.file.is_none());
}

#[test]
fn generated_marker() {
    assert!(is_generated(
        "// Code generated by protoc-gen-go. DO NOT EDIT.\n\npackage pb\n"
    ));
    assert!(!is_generated(
        "package pb\n\n// Code generated by hand. DO NOT EDIT.\n"
    ));
    assert!(!is_generated("// Code written by hand.\npackage pb\n"));
}
