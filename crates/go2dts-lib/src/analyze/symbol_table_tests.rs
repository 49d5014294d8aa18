use indoc::indoc;

use super::symbol_table::DeclKind;
use crate::diagnostics::{DiagnosticKind, Severity};
use crate::test_utils::analyze_str;

#[test]
fn registers_declarations_by_identity() {
    let analyzed = analyze_str(&[
        (
            "models/user.go",
            indoc! {r#"
            package models

            type User struct {
                Name string
            }

            type Role string

            type Store interface {
                Get(id string) (*User, error)
            }
            "#},
        ),
        ("api/item.go", "package api\n\ntype User struct{}\n"),
    ]);

    assert!(analyzed.diagnostics.is_empty());
    let table = &analyzed.table;
    assert_eq!(table.len(), 4);

    let displays: Vec<&str> = table
        .packages()
        .iter()
        .map(|p| p.display_path.as_str())
        .collect();
    assert_eq!(displays, ["app/api", "app/models"]);

    let models = table.packages()[1].id;
    let user = table.lookup(models, "User").unwrap();
    assert_eq!(table.decl(user).kind, DeclKind::Composite);
    let role = table.lookup(models, "Role").unwrap();
    assert_eq!(table.decl(role).kind, DeclKind::Alias);
    let store = table.lookup(models, "Store").unwrap();
    assert_eq!(table.decl(store).kind, DeclKind::Contract);

    let api = table.packages()[0].id;
    assert_ne!(table.lookup(api, "User"), Some(user));
    assert!(table.lookup(api, "Role").is_none());
}

#[test]
fn duplicate_identity_is_fatal() {
    let analyzed = analyze_str(&[
        ("models/a.go", "package models\n\ntype User struct{}\n"),
        ("models/b.go", "package models\n\ntype User string\n"),
    ]);

    let diags = &analyzed.diagnostics;
    assert_eq!(diags.len(), 1);
    let diag = diags.iter().next().unwrap();
    assert_eq!(diag.kind(), DiagnosticKind::DuplicateType);
    assert_eq!(diag.severity(), Severity::Error);
    insta::assert_snapshot!(diag.message(), @"duplicate type `User` in package `app/models`: app/models/a.go:3:6 and app/models/b.go:3:6");
}

#[test]
fn same_name_in_distinct_packages_is_allowed() {
    let analyzed = analyze_str(&[
        ("pkga/item.go", "package pkga\n\ntype Item struct{}\n"),
        ("pkgb/item.go", "package pkgb\n\ntype Item struct{}\n"),
    ]);

    assert!(!analyzed.diagnostics.has_errors());
    assert_eq!(analyzed.table.len(), 2);
}

#[test]
fn matches_imports_by_directory_suffix() {
    let analyzed = analyze_str(&[
        (
            "api/handler.go",
            indoc! {r#"
            package api

            import (
                "time"
                m "github.com/acme/app/models"
            )

            type Response struct {
                User m.User
                At   time.Time
            }
            "#},
        ),
        ("models/user.go", "package models\n\ntype User struct{}\n"),
    ]);

    let table = &analyzed.table;
    let api = &table.packages()[0];
    let models = &table.packages()[1];
    assert_eq!(api.imports.iter().copied().collect::<Vec<_>>(), [models.id]);

    let decl = table.decl(table.lookup(api.id, "Response").unwrap());
    let scope = table.file(decl.file);
    let names: Vec<(&str, bool)> = scope
        .imports
        .iter()
        .map(|i| (i.name.as_str(), i.package.is_some()))
        .collect();
    assert_eq!(names, [("time", false), ("m", true)]);
}

#[test]
fn collects_typed_string_constants() {
    let analyzed = analyze_str(&[
        (
            "models/role.go",
            indoc! {r#"
            package models

            type Role string

            const (
                Admin  Role = "admin"
                Member Role = "member"
                Limit       = 10
            )
            "#},
        ),
        (
            "models/more.go",
            "package models\n\nconst Guest Role = \"guest\"\n",
        ),
    ]);

    let models = &analyzed.table.packages()[0];
    assert_eq!(models.consts["Role"], ["guest", "admin", "member"]);
}

#[test]
fn mismatched_package_clause_warns() {
    let analyzed = analyze_str(&[
        ("models/a.go", "package models\n"),
        ("models/b.go", "package other\n"),
    ]);

    let diags = &analyzed.diagnostics;
    assert_eq!(diags.count_of(DiagnosticKind::PackageNameMismatch), 1);
    assert!(!diags.has_errors());
    assert_eq!(analyzed.table.packages()[0].name, "models");
}

#[test]
fn file_without_package_clause_joins_its_directory() {
    let analyzed = analyze_str(&[
        (
            "pb/user.pb.go",
            indoc! {r#"
            // Code generated by protoc-gen-go. DO NOT EDIT.

            type UserResp struct {
                Id string
            }
            "#},
        ),
        ("pb/extra.go", "package pb\n\ntype Extra struct{}\n"),
        ("orphan/orphan.go", "type Lone struct{}\n"),
    ]);

    let diags = &analyzed.diagnostics;
    assert_eq!(diags.count_of(DiagnosticKind::MissingPackage), 2);
    assert_eq!(diags.count_of(DiagnosticKind::PackageNameMismatch), 0);
    assert!(!diags.has_errors());

    let names: Vec<&str> = analyzed.table.decls().iter().map(|d| d.name.as_str()).collect();
    assert!(names.contains(&"UserResp"));
    assert!(names.contains(&"Lone"));

    let packages: Vec<&str> = analyzed
        .table
        .packages()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(packages, ["orphan", "pb"]);
}
