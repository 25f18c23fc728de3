//! Consumption combinators built on [`Scanner::advance`].
//!
//! `consume_*` and [`walk`](Scanner::walk) move the scanner itself.
//! `look_*` and `find*` run on a clone and never touch the receiver; the
//! result of a lookahead can be committed with [`Scanner::restore`].
//!
//! Predicates receive the scanner positioned at the candidate character, so
//! they can inspect context, depth and flags as well as the character.

use std::ops::ControlFlow;

use crate::{ScanError, Scanner};

/// Result of a non-mutating lookahead.
#[derive(Clone, Debug)]
pub struct Lookahead<'a> {
    /// Text crossed by the lookahead.
    pub matched: &'a str,
    /// The clone, stopped where the predicate gave out.
    pub scanner: Scanner<'a>,
}

impl<'a> Scanner<'a> {
    /// Advance while `pred` holds; returns the consumed text.
    pub fn consume_while(
        &mut self,
        mut pred: impl FnMut(&Scanner<'a>) -> bool,
    ) -> Result<&'a str, ScanError> {
        let start = self.position();
        while self.is_avail() && pred(self) {
            self.advance()?;
        }
        Ok(self.consumed_since(start))
    }

    /// Advance until `pred` holds; returns the consumed text.
    pub fn consume_until(
        &mut self,
        mut pred: impl FnMut(&Scanner<'a>) -> bool,
    ) -> Result<&'a str, ScanError> {
        self.consume_while(|s| !pred(s))
    }

    /// If inside a comment, advance until it closes.
    pub fn consume_comment(&mut self) -> Result<&'a str, ScanError> {
        self.consume_while(|s| s.is_comment())
    }

    /// Advance up to, not including, the next `\n`.
    pub fn consume_line(&mut self) -> Result<&'a str, ScanError> {
        self.consume_until(|s| s.is_eol())
    }

    /// Advance over ASCII whitespace, line breaks included.
    pub fn consume_whitespace(&mut self) -> Result<&'a str, ScanError> {
        self.consume_while(|s| s.is_whitespace())
    }

    /// Advance over spaces and tabs.
    pub fn consume_inline_whitespace(&mut self) -> Result<&'a str, ScanError> {
        self.consume_while(|s| s.is_inline_whitespace())
    }

    /// Consume `literal` if the text at the cursor starts with it.
    ///
    /// Returns whether anything was consumed. The literal must fit before
    /// the end bound. With comment exclusion enabled, a comment directly
    /// after the literal is skipped by the final advance, so the cursor may
    /// end up past `position + literal.len()`.
    pub fn consume_optional(&mut self, literal: &str) -> Result<bool, ScanError> {
        if literal.is_empty() || !self.rest().starts_with(literal) {
            return Ok(false);
        }
        let target = self.position() as usize + literal.len();
        while (self.position() as usize) < target && self.is_avail() {
            self.advance()?;
        }
        Ok(true)
    }

    /// Call `visit` repeatedly until it breaks, input runs out, or the
    /// scanner is stopped.
    ///
    /// When `visit` leaves the position unchanged the scanner is advanced
    /// once, so every iteration makes progress.
    pub fn walk(
        &mut self,
        mut visit: impl FnMut(&mut Scanner<'a>) -> Result<ControlFlow<()>, ScanError>,
    ) -> Result<(), ScanError> {
        while self.is_avail() && !self.is_locked() {
            let before = self.position();
            if visit(self)?.is_break() {
                break;
            }
            if self.position() == before && !self.is_locked() {
                self.advance()?;
            }
        }
        Ok(())
    }

    /// Non-mutating [`consume_while`](Self::consume_while).
    pub fn look_while(&self, mut pred: impl FnMut(&Scanner<'a>) -> bool) -> Lookahead<'a> {
        let mut scanner = self.clone();
        let start = scanner.position();
        while scanner.is_avail() && pred(&scanner) {
            scanner.step();
            scanner.skip_excluded();
        }
        Lookahead {
            matched: scanner.consumed_since(start),
            scanner,
        }
    }

    /// Non-mutating [`consume_until`](Self::consume_until).
    pub fn look_until(&self, mut pred: impl FnMut(&Scanner<'a>) -> bool) -> Lookahead<'a> {
        self.look_while(|s| !pred(s))
    }

    /// First character in `[position, end)` satisfying `pred`.
    pub fn find(&self, pred: impl FnMut(&Scanner<'a>) -> bool) -> Option<char> {
        self.search(pred, self.end()).and_then(|s| s.current())
    }

    /// Offset of the first character in `[position, end)` satisfying `pred`.
    pub fn find_index(&self, pred: impl FnMut(&Scanner<'a>) -> bool) -> Option<u32> {
        self.search(pred, self.end()).map(|s| s.position())
    }

    /// Like [`find`](Self::find) but bounded by `end`.
    ///
    /// `None` stands for a bound that was itself not found (typically the
    /// result of an earlier [`find_index`](Self::find_index)) and yields
    /// "not found" immediately.
    pub fn find_until(
        &self,
        pred: impl FnMut(&Scanner<'a>) -> bool,
        end: Option<u32>,
    ) -> Option<char> {
        self.search(pred, end?).and_then(|s| s.current())
    }

    /// Like [`find_index`](Self::find_index) but bounded by `end`; `None`
    /// yields "not found" immediately.
    pub fn find_index_until(
        &self,
        pred: impl FnMut(&Scanner<'a>) -> bool,
        end: Option<u32>,
    ) -> Option<u32> {
        self.search(pred, end?).map(|s| s.position())
    }

    /// Clone-based forward search; the returned clone sits on the match.
    fn search(&self, mut pred: impl FnMut(&Scanner<'a>) -> bool, end: u32) -> Option<Scanner<'a>> {
        let end = end.min(self.end());
        let mut scanner = self.clone();
        while scanner.position() < end {
            if pred(&scanner) {
                return Some(scanner);
            }
            scanner.step();
            scanner.skip_excluded();
        }
        None
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
