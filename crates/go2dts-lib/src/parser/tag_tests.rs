use super::tag::{JsonTag, lookup};

#[test]
fn lookup_finds_key_among_many() {
    let tag = r#"db:"user_id" json:"id,omitempty" yaml:"id""#;

    assert_eq!(lookup(tag, "json").as_deref(), Some("id,omitempty"));
    assert_eq!(lookup(tag, "yaml").as_deref(), Some("id"));
    assert_eq!(lookup(tag, "xml"), None);
}

#[test]
fn lookup_stops_at_malformed_pair() {
    assert_eq!(lookup(r#"json:id yaml:"x""#, "yaml"), None);
    assert_eq!(lookup(r#"json:"unterminated"#, "json"), None);
}

#[test]
fn json_tag_options() {
    let tag = JsonTag::from_tag(Some(r#"json:"created_at,omitempty,string""#));

    assert_eq!(tag.name.as_deref(), Some("created_at"));
    assert!(tag.omitempty);
    assert!(tag.as_string);
    assert!(!tag.skip);
}

#[test]
fn json_tag_dash() {
    assert!(JsonTag::parse("-").skip);

    let dash_name = JsonTag::parse("-,");
    assert!(!dash_name.skip);
    assert_eq!(dash_name.name.as_deref(), Some("-"));
}

#[test]
fn json_tag_empty_name_keeps_field_name() {
    let tag = JsonTag::parse(",omitempty");

    assert_eq!(tag.name, None);
    assert!(tag.omitempty);
}

#[test]
fn json_tag_missing() {
    assert_eq!(JsonTag::from_tag(None), JsonTag::default());
    assert_eq!(JsonTag::from_tag(Some(r#"db:"x""#)), JsonTag::default());
}
