//! Lexer mode bits and the one-bit context stacks.
//!
//! The mode is a plain bitmask rather than an enum: the grammar combines
//! flags freely (`ARG | LABELED`, `BEG | LABEL`, ...) and the scanning rules
//! test them with the predicates below.

use bitflags::bitflags;

bitflags! {
    /// What kind of token the grammar expects next.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LexState: u16 {
        /// Beginning of an expression.
        const BEG = 1;
        /// End of an expression: literals, variables, closing keywords.
        const END = 1 << 1;
        /// Closing `)` or `]` of an argument list.
        const ENDARG = 1 << 2;
        /// End of a method name or of a `->` lambda.
        const ENDFN = 1 << 3;
        /// After a method name, before its arguments.
        const ARG = 1 << 4;
        /// After the method name of a command call.
        const CMDARG = 1 << 5;
        /// After `return`, `break`, `next` and `rescue`.
        const MID = 1 << 6;
        /// After `def`, `alias`, `undef` and `:`.
        const FNAME = 1 << 7;
        /// After `.` or `&.`.
        const DOT = 1 << 8;
        /// After `class`.
        const CLASS = 1 << 9;
        /// A label may follow.
        const LABEL = 1 << 10;
        /// A label was just scanned.
        const LABELED = 1 << 11;
        /// A method-name item of `alias` or `undef`.
        const FITEM = 1 << 12;

        const VALUE = Self::BEG.bits();
        const BEG_ANY = Self::BEG.bits() | Self::MID.bits() | Self::CLASS.bits();
        const ARG_ANY = Self::ARG.bits() | Self::CMDARG.bits();
        const END_ANY = Self::END.bits() | Self::ENDARG.bits() | Self::ENDFN.bits();
    }
}

impl LexState {
    /// Beginning of an expression, including right after a label.
    #[inline]
    pub fn is_beg(self) -> bool {
        self.intersects(Self::BEG_ANY) || self.contains(Self::ARG | Self::LABELED)
    }

    #[inline]
    pub fn is_end(self) -> bool {
        self.intersects(Self::END_ANY)
    }

    #[inline]
    pub fn is_arg(self) -> bool {
        self.intersects(Self::ARG_ANY)
    }

    /// After `def`/`alias`/`undef` or a method-call dot: operators are
    /// method names here.
    #[inline]
    pub fn is_after_operator(self) -> bool {
        self.intersects(Self::FNAME | Self::DOT)
    }

    /// Can `name:` be a label in this state?
    #[inline]
    pub fn is_label_possible(self, command_state: bool) -> bool {
        (self.intersects(Self::LABEL | Self::ENDFN) && !command_state) || self.is_arg()
    }

    /// MRI-style name, e.g. `EXPR_BEG|EXPR_LABEL`.
    pub fn describe(self) -> String {
        const NAMES: [(LexState, &str); 13] = [
            (LexState::BEG, "EXPR_BEG"),
            (LexState::END, "EXPR_END"),
            (LexState::ENDARG, "EXPR_ENDARG"),
            (LexState::ENDFN, "EXPR_ENDFN"),
            (LexState::ARG, "EXPR_ARG"),
            (LexState::CMDARG, "EXPR_CMDARG"),
            (LexState::MID, "EXPR_MID"),
            (LexState::FNAME, "EXPR_FNAME"),
            (LexState::DOT, "EXPR_DOT"),
            (LexState::CLASS, "EXPR_CLASS"),
            (LexState::LABEL, "EXPR_LABEL"),
            (LexState::LABELED, "EXPR_LABELED"),
            (LexState::FITEM, "EXPR_FITEM"),
        ];
        if self.is_empty() {
            return "EXPR_NONE".to_owned();
        }
        NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// A stack of booleans packed into one word.
///
/// Used for the "inside a loop condition" and "inside command arguments"
/// contexts. Only the top bit is ever queried; nesting deeper than 64
/// levels shifts the oldest entries out, which matches the reference
/// interpreter's fixed-width stack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StackState {
    bits: u64,
    depth: usize,
}

impl StackState {
    pub fn new() -> Self {
        StackState::default()
    }

    pub fn push(&mut self, value: bool) {
        self.bits = (self.bits << 1) | u64::from(value);
        self.depth += 1;
    }

    /// Pop the top entry, returning it.
    pub fn pop(&mut self) -> bool {
        debug_assert!(self.depth > 0, "popped an empty context stack");
        let top = self.is_in_state();
        self.bits >>= 1;
        self.depth = self.depth.saturating_sub(1);
        top
    }

    /// Pop, folding the popped bit into the new top.
    ///
    /// Closing brackets call this, so unbalanced input can reach it with an
    /// empty stack; that leaves the stack empty.
    pub fn lexpop(&mut self) {
        self.bits = (self.bits >> 1) | (self.bits & 1);
        self.depth = self.depth.saturating_sub(1);
    }

    /// Open a bracket: a fresh context with the flag clear.
    #[inline]
    pub fn stop(&mut self) {
        self.push(false);
    }

    /// Close a bracket opened with [`stop`](Self::stop).
    #[inline]
    pub fn restart(&mut self) {
        self.lexpop();
    }

    /// Is the top entry set?
    #[inline]
    pub fn is_in_state(&self) -> bool {
        self.bits & 1 == 1
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn reset(&mut self) {
        *self = StackState::default();
    }
}

#[cfg(test)]
mod tests;
