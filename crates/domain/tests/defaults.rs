use tc_domain::config::ChatDefaults;
use tc_domain::search::SearchType;

#[test]
fn default_persona_is_zero() {
    let defaults = ChatDefaults::default();
    assert_eq!(defaults.default_persona_id, 0);
}

#[test]
fn default_search_type_is_hybrid() {
    let defaults = ChatDefaults::default();
    assert_eq!(defaults.default_search_type, SearchType::Hybrid);
}

#[test]
fn empty_toml_parses_to_defaults() {
    let defaults: ChatDefaults = toml::from_str("").unwrap();
    assert_eq!(defaults.default_persona_id, 0);
    assert_eq!(defaults.snapshot_file, "sessions.json");
}

#[test]
fn explicit_overrides_parse() {
    let toml_str = r#"
default_persona_id = 3
default_search_type = "keyword"
generated_name_max_chars = 40
"#;
    let defaults: ChatDefaults = toml::from_str(toml_str).unwrap();
    assert_eq!(defaults.default_persona_id, 3);
    assert_eq!(defaults.default_search_type, SearchType::Keyword);
    assert_eq!(defaults.generated_name_max_chars, 40);
    assert!(defaults.validate().is_empty());
}
