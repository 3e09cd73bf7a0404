#![allow(clippy::unwrap_used)]

use super::*;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_flag_value() {
    let a = args(&["--client", "Construtora X", "--amount", "45000"]);
    assert_eq!(flag_value(&a, "--client"), Some("Construtora X"));
    assert_eq!(flag_value(&a, "--amount"), Some("45000"));
    assert_eq!(flag_value(&a, "--missing"), None);
}

#[test]
fn test_flag_values_repeatable() {
    let a = args(&["--attach", "a.pdf", "--yes", "--attach", "b.pdf"]);
    assert_eq!(flag_values(&a, "--attach"), vec!["a.pdf", "b.pdf"]);
    assert!(flag_values(&a, "--client").is_empty());
}

#[test]
fn test_has_flag() {
    let a = args(&["--yes", "--attach", "a.pdf"]);
    assert!(has_flag(&a, "--yes"));
    assert!(!has_flag(&a, "--extract"));
}

#[test]
fn test_parse_bool() {
    assert!(parse_bool("true").unwrap());
    assert!(parse_bool("ON").unwrap());
    assert!(!parse_bool("0").unwrap());
    assert!(parse_bool("talvez").is_err());
}
