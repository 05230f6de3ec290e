use pretty_assertions::assert_eq;

use super::*;

// === Predicates ===

#[test]
fn beg_includes_mid_and_class() {
    assert!(LexState::BEG.is_beg());
    assert!(LexState::MID.is_beg());
    assert!(LexState::CLASS.is_beg());
    assert!(!LexState::END.is_beg());
}

#[test]
fn arg_after_label_counts_as_beg() {
    assert!((LexState::ARG | LexState::LABELED).is_beg());
    assert!(!LexState::ARG.is_beg());
    assert!(!(LexState::CMDARG | LexState::LABELED).is_beg());
}

#[test]
fn end_and_arg_groups() {
    assert!(LexState::ENDFN.is_end());
    assert!(LexState::ENDARG.is_end());
    assert!(LexState::CMDARG.is_arg());
    assert!(!LexState::END.is_arg());
}

#[test]
fn after_operator() {
    assert!(LexState::FNAME.is_after_operator());
    assert!(LexState::DOT.is_after_operator());
    assert!(!LexState::BEG.is_after_operator());
}

#[test]
fn label_possible_depends_on_command_state() {
    let state = LexState::BEG | LexState::LABEL;
    assert!(state.is_label_possible(false));
    assert!(!state.is_label_possible(true));
    assert!(LexState::CMDARG.is_label_possible(true));
    assert!(!LexState::END.is_label_possible(false));
}

#[test]
fn describe_joins_names() {
    assert_eq!((LexState::BEG | LexState::LABEL).describe(), "EXPR_BEG|EXPR_LABEL");
    assert_eq!(LexState::empty().describe(), "EXPR_NONE");
}

// === StackState ===

#[test]
fn push_pop_tracks_top() {
    let mut stack = StackState::new();
    stack.push(true);
    stack.push(false);
    assert!(!stack.is_in_state());
    assert!(!stack.pop());
    assert!(stack.is_in_state());
    assert!(stack.pop());
    assert_eq!(stack.depth(), 0);
}

#[test]
fn lexpop_keeps_set_bit() {
    let mut stack = StackState::new();
    stack.push(false);
    stack.push(true);
    stack.lexpop();
    assert!(stack.is_in_state());
    assert_eq!(stack.depth(), 1);
}

#[test]
fn stop_and_restart_bracket_a_context() {
    let mut stack = StackState::new();
    stack.push(true);
    stack.stop();
    assert!(!stack.is_in_state());
    stack.restart();
    assert!(stack.is_in_state());
}

#[test]
fn reset_clears_everything() {
    let mut stack = StackState::new();
    stack.push(true);
    stack.reset();
    assert_eq!(stack, StackState::default());
}
