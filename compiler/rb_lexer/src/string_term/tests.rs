use pretty_assertions::assert_eq;

use super::*;

// === Function flags ===

#[test]
fn literal_kinds() {
    assert!(StrFunc::REGEXP_LIT.contains(StrFunc::EXPAND | StrFunc::ESCAPE));
    assert!(!StrFunc::SQUOTE.contains(StrFunc::EXPAND));
    assert!(StrFunc::DWORD.contains(StrFunc::QWORDS));
    assert!(StrFunc::DSYM.contains(StrFunc::SYMBOL | StrFunc::EXPAND));
}

// === Indentation ===

#[test]
fn indent_width_counts_tabs_to_stops() {
    assert_eq!(indent_width(b"  x"), Some(2));
    assert_eq!(indent_width(b"\tx"), Some(8));
    assert_eq!(indent_width(b"  \tx"), Some(8));
    assert_eq!(indent_width(b"x"), Some(0));
}

#[test]
fn blank_lines_have_no_width() {
    assert_eq!(indent_width(b""), None);
    assert_eq!(indent_width(b"    "), None);
    assert_eq!(indent_width(b"  \n"), None);
}

#[test]
fn dedent_strips_spaces() {
    let mut line = b"    hi\n".to_vec();
    assert_eq!(dedent_string(&mut line, 2), 2);
    assert_eq!(line, b"  hi\n");
}

#[test]
fn dedent_keeps_tab_crossing_width() {
    let mut line = b"  \thi".to_vec();
    assert_eq!(dedent_string(&mut line, 4), 2);
    assert_eq!(line, b"\thi");
}

#[test]
fn dedent_stops_at_content() {
    let mut line = b" hi".to_vec();
    assert_eq!(dedent_string(&mut line, 4), 1);
    assert_eq!(line, b"hi");
}
