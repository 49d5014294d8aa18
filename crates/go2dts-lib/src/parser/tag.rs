//! Struct tag decoding following the `reflect.StructTag` conventions and the
//! `encoding/json` option set.

use super::lexer::unquote;

/// Looks up `key` in a conventional `key:"value" key2:"value2"` tag string.
///
/// Scanning stops at the first malformed pair, matching `reflect.StructTag.Lookup`.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        let name_len = rest
            .bytes()
            .take_while(|&b| b > b' ' && b != b':' && b != b'"' && b != 0x7f)
            .count();
        let bytes = rest.as_bytes();
        if name_len == 0
            || name_len + 1 >= bytes.len()
            || bytes[name_len] != b':'
            || bytes[name_len + 1] != b'"'
        {
            return None;
        }
        let name = &rest[..name_len];
        rest = &rest[name_len + 1..];

        let bytes = rest.as_bytes();
        let mut i = 1;
        while i < bytes.len() && bytes[i] != b'"' {
            if bytes[i] == b'\\' {
                i += 1;
            }
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        let quoted = &rest[..=i];
        rest = &rest[i + 1..];

        if name == key {
            return unquote(quoted);
        }
    }
}

/// The parsed `json` key of a struct tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonTag {
    /// Wire name override; `None` keeps the Go field name.
    pub name: Option<String>,
    /// `json:"-"`
    pub skip: bool,
    pub omitempty: bool,
    /// `,string` encodes numbers and booleans as JSON strings.
    pub as_string: bool,
}

impl JsonTag {
    /// Decodes the `json` entry of a raw tag. Missing tags yield the default.
    pub fn from_tag(tag: Option<&str>) -> Self {
        let Some(value) = tag.and_then(|t| lookup(t, "json")) else {
            return Self::default();
        };
        Self::parse(&value)
    }

    pub fn parse(value: &str) -> Self {
        if value == "-" {
            return Self {
                skip: true,
                ..Self::default()
            };
        }

        let mut parts = value.split(',');
        let name = parts
            .next()
            .filter(|n| !n.is_empty() && is_valid_name(n))
            .map(str::to_owned);
        let mut tag = Self {
            name,
            ..Self::default()
        };
        for option in parts {
            match option {
                "omitempty" | "omitzero" => tag.omitempty = true,
                "string" => tag.as_string = true,
                _ => {}
            }
        }
        tag
    }
}

fn is_valid_name(name: &str) -> bool {
    name.chars().all(|c| {
        c.is_alphanumeric() || "!#$%&()*+-./:;<=>?@[]^_{|}~ ".contains(c)
    })
}
