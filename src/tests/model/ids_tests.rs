use super::*;

#[test]
fn slugify_normalizes_titles() {
    assert_eq!(slugify("Home"), "home");
    assert_eq!(slugify("Meeting Notes (Q3)"), "meeting-notes-q3");
    assert_eq!(slugify("  spaced   out  "), "spaced-out");
    assert_eq!(slugify("Grüße & Co"), "gr-e-co");
}

#[test]
fn slugify_never_returns_empty() {
    assert_eq!(slugify(""), "untitled");
    assert_eq!(slugify("!!!"), "untitled");
    assert_eq!(slugify("---"), "untitled");
}

#[test]
fn fingerprint_is_short_and_deterministic() {
    let id = RecordId("rec-0001".to_string());
    let fp = fingerprint(&id);
    assert_eq!(fp.len(), 8);
    assert_eq!(fp, fingerprint(&id));
    assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));

    let other = RecordId("rec-0002".to_string());
    assert_ne!(fp, fingerprint(&other));
}
