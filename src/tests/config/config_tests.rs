use super::*;

use std::io::Write;

#[test]
fn loads_a_full_config() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(
        file,
        r#"{{"base_url":"https://store.example","token":"tok","root_id":"rec-1","cache_ttl_secs":5}}"#
    )
    .expect("write");

    let cfg = Config::load(file.path()).expect("load");
    assert_eq!(cfg.base_url, "https://store.example");
    assert_eq!(cfg.root_id.as_deref(), Some("rec-1"));
    assert_eq!(cfg.cache_ttl(), Duration::from_secs(5));
}

#[test]
fn ttl_defaults_when_absent() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, r#"{{"base_url":"https://store.example","token":"tok"}}"#).expect("write");

    let cfg = Config::load(file.path()).expect("load");
    assert_eq!(cfg.root_id, None);
    assert_eq!(cfg.cache_ttl(), Duration::from_secs(DEFAULT_CACHE_TTL_SECS));
}

#[test]
fn missing_file_and_empty_base_url_are_errors() {
    assert!(Config::load(std::path::Path::new("/no/such/config.json")).is_err());

    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, r#"{{"base_url":"","token":"tok"}}"#).expect("write");
    assert!(Config::load(file.path()).is_err());
}
