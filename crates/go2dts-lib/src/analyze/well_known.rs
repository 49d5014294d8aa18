//! Built-in mappings for Go types outside the scanned tree.

use super::types::Primitive;

/// Predeclared Go type names.
pub fn primitive(name: &str) -> Option<Primitive> {
    let prim = match name {
        "bool" => Primitive::Boolean,
        "string" => Primitive::String,
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" | "uintptr" | "byte" | "rune" | "float32" | "float64" => Primitive::Number,
        "any" | "error" | "complex64" | "complex128" => Primitive::Any,
        _ => return None,
    };
    Some(prim)
}

/// Integer kinds, valid as JSON object keys.
pub fn is_integer(name: &str) -> bool {
    matches!(
        name,
        "int"
            | "int8"
            | "int16"
            | "int32"
            | "int64"
            | "uint"
            | "uint8"
            | "uint16"
            | "uint32"
            | "uint64"
            | "uintptr"
            | "byte"
            | "rune"
    )
}

/// Types from well-known packages, keyed by import path and name.
pub fn external(path: &str, name: &str) -> Option<Primitive> {
    let prim = match (path, name) {
        ("time", "Time") => Primitive::Temporal,
        ("time", "Duration") => Primitive::Number,
        ("encoding/json", "RawMessage") => Primitive::Any,
        ("encoding/json", "Number") => Primitive::String,
        ("math/big", "Int" | "Float") => Primitive::Number,
        ("net", "IP") => Primitive::String,
        ("google.golang.org/protobuf/types/known/timestamppb", "Timestamp")
        | ("github.com/golang/protobuf/ptypes/timestamp", "Timestamp") => Primitive::Temporal,
        ("google.golang.org/protobuf/types/known/structpb", "Struct" | "Value") => {
            Primitive::Any
        }
        ("github.com/google/uuid", "UUID")
        | ("github.com/satori/go.uuid", "UUID")
        | ("github.com/gofrs/uuid", "UUID") => Primitive::String,
        _ => return None,
    };
    Some(prim)
}
