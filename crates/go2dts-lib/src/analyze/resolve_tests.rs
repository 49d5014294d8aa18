use indoc::indoc;

use super::types::{DeclBody, KeyKind, Primitive, ResolvedDecl, ResolvedField, TypeRef};
use crate::Config;
use crate::diagnostics::DiagnosticKind;
use crate::test_utils::{Analyzed, analyze_str, analyze_with};

fn decl<'a>(analyzed: &'a Analyzed, name: &str) -> &'a ResolvedDecl {
    analyzed
        .model
        .decls
        .iter()
        .find(|d| d.name == name)
        .unwrap_or_else(|| panic!("no declaration `{name}`"))
}

fn fields<'a>(analyzed: &'a Analyzed, name: &str) -> &'a [ResolvedField] {
    match &decl(analyzed, name).body {
        DeclBody::Interface(fields) => fields,
        body => panic!("`{name}` is not a struct: {body:?}"),
    }
}

fn field_names(analyzed: &Analyzed, name: &str) -> Vec<String> {
    fields(analyzed, name).iter().map(|f| f.name.clone()).collect()
}

fn method_names(analyzed: &Analyzed, name: &str) -> Vec<String> {
    match &decl(analyzed, name).body {
        DeclBody::Contract(methods) => methods.iter().map(|m| m.name.clone()).collect(),
        body => panic!("`{name}` is not a contract: {body:?}"),
    }
}

fn named(analyzed: &Analyzed, name: &str) -> TypeRef {
    TypeRef::Named(decl(analyzed, name).id)
}

const STRING: TypeRef = TypeRef::Primitive(Primitive::String);
const NUMBER: TypeRef = TypeRef::Primitive(Primitive::Number);

#[test]
fn self_reference_is_named() {
    let analyzed = analyze_str(&[(
        "models/user.go",
        indoc! {r#"
        package models

        type User struct {
            ID      int64
            Name    string
            Tags    []string
            Manager *User
        }
        "#},
    )]);

    assert!(analyzed.diagnostics.is_empty());
    let user = named(&analyzed, "User");
    let types: Vec<&TypeRef> = fields(&analyzed, "User").iter().map(|f| &f.ty).collect();
    assert_eq!(
        types,
        [
            &NUMBER,
            &STRING,
            &TypeRef::Repeated(Box::new(STRING)),
            &TypeRef::Optional(Box::new(user)),
        ]
    );
}

#[test]
fn mutual_references_terminate() {
    let analyzed = analyze_str(&[(
        "graph/graph.go",
        indoc! {r#"
        package graph

        type Node struct {
            Edges []*Edge
        }

        type Edge struct {
            From, To *Node
            Meta     Meta
        }

        type Meta struct {
            Owner *Node
        }
        "#},
    )]);

    assert!(analyzed.diagnostics.is_empty());
    let node = named(&analyzed, "Node");
    let edge = fields(&analyzed, "Edge");
    assert_eq!(edge.len(), 3);
    assert_eq!(edge[0].ty, TypeRef::Optional(Box::new(node.clone())));
    assert_eq!(edge[1].name, "To");
    assert_eq!(edge[2].ty, named(&analyzed, "Meta"));
}

#[test]
fn bytes_maps_and_wrappers() {
    let analyzed = analyze_str(&[(
        "models/blob.go",
        indoc! {r#"
        package models

        import "time"

        type Role string

        type Level int8

        type Blob struct {
            Data     []byte
            Grid     [3][]float64
            ByRole   map[Role]int
            ByLevel  map[Level]*Blob
            ByID     map[uint64]string
            Seen     time.Time
            Timeout  time.Duration
            PP       **string
            Events   chan string
            Callback func(int) error
            Extra    interface{}
            Inline   struct{ X, y int }
        }
        "#},
    )]);

    assert!(analyzed.diagnostics.is_empty());
    let blob = named(&analyzed, "Blob");
    let types: Vec<TypeRef> = fields(&analyzed, "Blob").iter().map(|f| f.ty.clone()).collect();
    assert_eq!(types[0], TypeRef::Primitive(Primitive::Bytes));
    assert_eq!(
        types[1],
        TypeRef::Repeated(Box::new(TypeRef::Repeated(Box::new(NUMBER))))
    );
    assert_eq!(
        types[2],
        TypeRef::Keyed {
            key: KeyKind::String,
            value: Box::new(NUMBER)
        }
    );
    assert_eq!(
        types[3],
        TypeRef::Keyed {
            key: KeyKind::Number,
            value: Box::new(TypeRef::Optional(Box::new(blob)))
        }
    );
    assert_eq!(
        types[4],
        TypeRef::Keyed {
            key: KeyKind::Number,
            value: Box::new(STRING)
        }
    );
    assert_eq!(types[5], TypeRef::Primitive(Primitive::Temporal));
    assert_eq!(types[6], NUMBER);
    assert_eq!(types[7], TypeRef::Optional(Box::new(STRING)));
    assert_eq!(types[8], TypeRef::ANY);
    assert_eq!(types[9], TypeRef::ANY);
    assert_eq!(types[10], TypeRef::ANY);
    let TypeRef::Object(inline) = &types[11] else {
        panic!("expected inline object, got {:?}", types[11]);
    };
    let inline: Vec<&str> = inline.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(inline, ["X"]);
}

#[test]
fn unsupported_map_key_degrades_field() {
    let analyzed = analyze_str(&[(
        "models/grid.go",
        indoc! {r#"
        package models

        type Point struct{ X, Y int }

        type Grid struct {
            Cells map[Point]string
            Flags map[bool]string
            Names map[string]string
        }
        "#},
    )]);

    let diags = &analyzed.diagnostics;
    assert_eq!(diags.count_of(DiagnosticKind::UnsupportedKeyType), 2);
    assert!(!diags.has_errors());
    let messages: Vec<&str> = diags.iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        [
            "map key type `Point` is not supported; field emitted as `any`",
            "map key type `bool` is not supported; field emitted as `any`",
        ]
    );

    let grid = fields(&analyzed, "Grid");
    assert_eq!(grid[0].ty, TypeRef::ANY);
    assert_eq!(grid[1].ty, TypeRef::ANY);
    assert!(matches!(grid[2].ty, TypeRef::Keyed { .. }));
}

#[test]
fn unscanned_package_yields_one_warning() {
    let analyzed = analyze_str(&[(
        "billing/invoice.go",
        indoc! {r#"
        package billing

        import "github.com/shopspring/decimal"

        type Invoice struct {
            Total decimal.Decimal
            Note  string
        }
        "#},
    )]);

    let diags = &analyzed.diagnostics;
    assert_eq!(diags.len(), 1);
    let diag = diags.iter().next().unwrap();
    assert_eq!(diag.kind(), DiagnosticKind::UnresolvedReference);
    assert!(diag.is_warning());
    insta::assert_snapshot!(diag.to_string(), @"warning at 89..104: `decimal.Decimal` cannot be resolved; emitted as `any` (hint: package `github.com/shopspring/decimal` was not scanned)");
    assert_eq!(fields(&analyzed, "Invoice")[0].ty, TypeRef::ANY);
}

#[test]
fn unknown_local_name_warns() {
    let analyzed = analyze_str(&[(
        "models/a.go",
        "package models\n\ntype A struct {\n\tB Missing\n}\n",
    )]);

    let diags = &analyzed.diagnostics;
    assert_eq!(diags.count_of(DiagnosticKind::UnresolvedReference), 1);
    assert_eq!(fields(&analyzed, "A")[0].ty, TypeRef::ANY);
}

#[test]
fn json_tags_shape_fields() {
    let analyzed = analyze_str(&[(
        "models/account.go",
        indoc! {r#"
        package models

        type Account struct {
            ID       int64   `json:"id,string"`
            Email    string  `json:"email,omitempty"`
            Password string  `json:"-"`
            Dash     string  `json:"-,"`
            Nick     *string `json:",omitempty"`
            Score    *int    `json:"score,string"`
            internal string
            Plain    bool    `db:"plain"`
        }
        "#},
    )]);

    assert_eq!(
        field_names(&analyzed, "Account"),
        ["id", "email", "-", "Nick", "score", "Plain"]
    );
    let account = fields(&analyzed, "Account");
    assert_eq!(account[0].ty, STRING);
    assert!(account[1].omit_empty);
    assert!(!account[2].omit_empty);
    assert!(account[3].omit_empty);
    assert_eq!(account[4].ty, TypeRef::Optional(Box::new(STRING)));
    assert_eq!(account[5].ty, TypeRef::Primitive(Primitive::Boolean));
}

#[test]
fn embedding_flattens_with_shadowing() {
    let analyzed = analyze_str(&[(
        "models/models.go",
        indoc! {r#"
        package models

        type Base struct {
            ID        string
            CreatedAt string
            Note      string
        }

        type Audit struct {
            Note    int
            Creator string
        }

        type Named struct {
            Base
        }

        type Doc struct {
            *Named
            Audit
            ID    int
            Title string
        }

        type Tagged struct {
            Base `json:"base"`
        }

        type hidden struct {
            Secret string
        }

        type WithHidden struct {
            hidden
            Visible string
        }
        "#},
    )]);

    assert!(analyzed.diagnostics.is_empty());
    // ID shadowed by the owner; Note from Audit (depth 1) beats Base (depth 2)
    assert_eq!(
        field_names(&analyzed, "Doc"),
        ["CreatedAt", "Note", "Creator", "ID", "Title"]
    );
    let doc = fields(&analyzed, "Doc");
    assert_eq!(doc[1].ty, NUMBER);
    assert_eq!(doc[3].ty, NUMBER);

    assert_eq!(field_names(&analyzed, "Tagged"), ["base"]);
    assert_eq!(fields(&analyzed, "Tagged")[0].ty, named(&analyzed, "Base"));

    assert_eq!(field_names(&analyzed, "WithHidden"), ["Secret", "Visible"]);
}

#[test]
fn ambiguous_promotion_keeps_first() {
    let analyzed = analyze_str(&[(
        "models/models.go",
        indoc! {r#"
        package models

        type A struct{ Name string }

        type B struct{ Name int }

        type C struct {
            A
            B
        }
        "#},
    )]);

    let c = fields(&analyzed, "C");
    assert_eq!(c.len(), 1);
    assert_eq!(c[0].ty, STRING);
}

#[test]
fn embedding_cycle_is_cut() {
    let analyzed = analyze_str(&[(
        "models/models.go",
        indoc! {r#"
        package models

        type A struct {
            *B
            X string
        }

        type B struct {
            *A
            Y string
        }
        "#},
    )]);

    assert!(analyzed.diagnostics.is_empty());
    assert_eq!(field_names(&analyzed, "A"), ["Y", "X"]);
    assert_eq!(field_names(&analyzed, "B"), ["X", "Y"]);
}

#[test]
fn contract_embedding_cycle_keeps_both_sides() {
    let analyzed = analyze_str(&[(
        "models/models.go",
        indoc! {r#"
        package models

        type Reader interface {
            Writer
            Read() string
        }

        type Writer interface {
            Reader
            Write(s string)
        }
        "#},
    )]);

    assert!(analyzed.diagnostics.is_empty());
    assert_eq!(method_names(&analyzed, "Reader"), ["Write", "Read"]);
    assert_eq!(method_names(&analyzed, "Writer"), ["Read", "Write"]);
}

#[test]
fn embedded_non_struct_becomes_field() {
    let analyzed = analyze_str(&[(
        "models/models.go",
        indoc! {r#"
        package models

        import "time"

        type Labels map[string]string

        type Event struct {
            Labels
            time.Time
        }
        "#},
    )]);

    assert!(analyzed.diagnostics.is_empty());
    assert_eq!(field_names(&analyzed, "Event"), ["Labels", "Time"]);
    let event = fields(&analyzed, "Event");
    assert_eq!(event[0].ty, named(&analyzed, "Labels"));
    assert_eq!(event[1].ty, TypeRef::Primitive(Primitive::Temporal));
}

#[test]
fn const_unions() {
    let source = indoc! {r#"
    package models

    type Status string

    const (
        Active   Status = "active"
        Disabled Status = "disabled"
        Legacy   Status = "active"
    )

    type Kind string
    "#};

    let analyzed = analyze_str(&[("models/status.go", source)]);
    assert_eq!(
        decl(&analyzed, "Status").body,
        DeclBody::Union(vec!["active".to_string(), "disabled".to_string()])
    );
    assert_eq!(decl(&analyzed, "Kind").body, DeclBody::Alias(STRING));

    let analyzed = analyze_with(
        &[("models/status.go", source)],
        &Config::new().const_unions(false),
    );
    assert_eq!(decl(&analyzed, "Status").body, DeclBody::Alias(STRING));
}

#[test]
fn converted_constants_join_unions() {
    let analyzed = analyze_str(&[(
        "models/state.go",
        indoc! {r#"
        package models

        type State string

        const (
            Open   State = "open"
            Closed       = State("closed")
        )
        "#},
    )]);

    assert!(analyzed.diagnostics.is_empty());
    assert_eq!(
        decl(&analyzed, "State").body,
        DeclBody::Union(vec!["open".to_string(), "closed".to_string()])
    );
}

#[test]
fn contracts_flatten_embedded_interfaces() {
    let analyzed = analyze_str(&[(
        "store/store.go",
        indoc! {r#"
        package store

        type Reader interface {
            Get(id string) ([]byte, error)
            close()
        }

        type Store interface {
            Reader
            error
            Put(key string, values ...int) error
        }

        type Empty interface{}
        "#},
    )]);

    assert!(analyzed.diagnostics.is_empty());
    let DeclBody::Contract(methods) = &decl(&analyzed, "Store").body else {
        panic!("Store should be a contract");
    };
    let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Get", "Error", "Put"]);
    assert_eq!(
        methods[0].results,
        [TypeRef::Primitive(Primitive::Bytes), TypeRef::ANY]
    );
    assert!(methods[2].params[1].variadic);
    assert_eq!(methods[2].params[1].ty, NUMBER);

    assert_eq!(decl(&analyzed, "Empty").body, DeclBody::Alias(TypeRef::ANY));
}

#[test]
fn cross_package_and_overrides() {
    let files = [
        (
            "api/api.go",
            indoc! {r#"
            package api

            import (
                "github.com/acme/app/models"
                "github.com/shopspring/decimal"
            )

            type Order struct {
                Buyer models.User
                Total decimal.Decimal
            }
            "#},
        ),
        ("models/user.go", "package models\n\ntype User struct{}\n"),
    ];

    let config = Config::new().type_override("github.com/shopspring/decimal.Decimal", "string");
    let analyzed = analyze_with(&files, &config);

    assert!(analyzed.diagnostics.is_empty());
    let order = fields(&analyzed, "Order");
    assert_eq!(order[0].ty, named(&analyzed, "User"));
    assert_eq!(order[1].ty, TypeRef::Verbatim("string".to_string()));
}

#[test]
fn dot_imports_are_searched() {
    let analyzed = analyze_str(&[
        (
            "api/api.go",
            indoc! {r#"
            package api

            import . "github.com/acme/app/models"

            type Page struct {
                Items []User
            }
            "#},
        ),
        ("models/user.go", "package models\n\ntype User struct{}\n"),
    ]);

    assert!(analyzed.diagnostics.is_empty());
    assert_eq!(
        fields(&analyzed, "Page")[0].ty,
        TypeRef::Repeated(Box::new(named(&analyzed, "User")))
    );
}
