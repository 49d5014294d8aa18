/// Whether a Go identifier is exported (starts with an uppercase letter).
///
/// # Examples
/// ```
/// use go2dts_core::utils::is_exported;
/// assert!(is_exported("Name"));
/// assert!(!is_exported("name"));
/// assert!(!is_exported("_Name"));
/// ```
pub fn is_exported(ident: &str) -> bool {
    ident.chars().next().is_some_and(char::is_uppercase)
}

/// Default package name Go assigns to an import path when no alias is given.
///
/// Takes the last path segment, skipping a trailing major-version segment
/// (`/v2`), and strips the conventional `go-`/`go.` prefixes and
/// `-go`/`.go`/`.vN` suffixes.
///
/// # Examples
/// ```
/// use go2dts_core::utils::default_import_name;
/// assert_eq!(default_import_name("time"), "time");
/// assert_eq!(default_import_name("github.com/satori/go.uuid"), "uuid");
/// assert_eq!(default_import_name("gopkg.in/yaml.v2"), "yaml");
/// assert_eq!(default_import_name("github.com/jackc/pgx/v5"), "pgx");
/// ```
pub fn default_import_name(path: &str) -> String {
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let mut last = segments.next().unwrap_or(path);
    if is_major_version(last)
        && let Some(prev) = segments.next()
    {
        last = prev;
    }

    let mut name = last;
    for prefix in ["go-", "go."] {
        if let Some(rest) = name.strip_prefix(prefix)
            && !rest.is_empty()
        {
            name = rest;
        }
    }
    for suffix in ["-go", ".go"] {
        if let Some(rest) = name.strip_suffix(suffix)
            && !rest.is_empty()
        {
            name = rest;
        }
    }
    if let Some((base, version)) = name.rsplit_once('.')
        && is_major_version(version)
    {
        name = base;
    }

    name.replace(['-', '.'], "_")
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Whether `name` can be written as a bare TypeScript property or type name.
pub fn is_ts_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Words TypeScript rejects as parameter names in a declaration file.
const TS_RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Whether `name` is a reserved word that cannot name a TypeScript binding.
///
/// # Examples
/// ```
/// use go2dts_core::utils::is_ts_reserved;
/// assert!(is_ts_reserved("new"));
/// assert!(!is_ts_reserved("ctx"));
/// ```
pub fn is_ts_reserved(name: &str) -> bool {
    TS_RESERVED.contains(&name)
}

/// Render a property key, quoting it when it is not a plain identifier.
///
/// # Examples
/// ```
/// use go2dts_core::utils::ts_property_key;
/// assert_eq!(ts_property_key("id"), "id");
/// assert_eq!(ts_property_key("created-at"), "\"created-at\"");
/// ```
pub fn ts_property_key(name: &str) -> String {
    if is_ts_identifier(name) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Turn an arbitrary package identifier into a prefix usable in a type name.
///
/// # Examples
/// ```
/// use go2dts_core::utils::ident_prefix;
/// assert_eq!(ident_prefix("pkgA"), "pkgA");
/// assert_eq!(ident_prefix("http-utils"), "http_utils");
/// ```
pub fn ident_prefix(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
