//! Snapshot, resume and position seeking.
//!
//! Cloning a [`Scanner`] copies its [`CursorState`](crate::CursorState);
//! [`Scanner::restore`] assigns a snapshot back into an existing handle so
//! callers holding `&mut Scanner` keep the same handle across lookahead.
//!
//! Seeking is forward-only once a profile is attached: the lexical context
//! at an arbitrary offset is only known by replaying from the start.

use tracing::debug;

use crate::scanner::is_inline_whitespace;
use crate::source::{char_count, ends_with_escape, line_breaks, line_start};
use crate::state::{Context, Depth};
use crate::{JumpRejection, ScanError, Scanner};

impl<'a> Scanner<'a> {
    /// Overwrite this scanner with `snapshot`, in place.
    pub fn restore(&mut self, snapshot: &Scanner<'a>) {
        debug!(
            from = self.state.position,
            to = snapshot.state.position,
            "restore"
        );
        self.source = snapshot.source;
        self.profile = snapshot.profile;
        self.exclude_comments = snapshot.exclude_comments;
        self.state = snapshot.state;
    }

    /// Move to the end bound and lock the scanner; further `advance()` calls
    /// fail with [`ScanError::LockedAdvance`].
    pub fn stop(&mut self) {
        debug!(at = self.state.position, end = self.state.end, "stop");
        self.relocate(self.state.end);
        self.state.locked = true;
    }

    /// Return to offset 0 with fresh depth counters, context `Code` and the
    /// lock released. The end bound is kept.
    pub fn reset(&mut self) {
        debug!(at = self.state.position, "reset");
        self.state = crate::CursorState::start(self.state.end);
        self.enter();
    }

    /// Move to byte offset `to`.
    ///
    /// Without a profile any in-range target is allowed and the position
    /// bookkeeping is recomputed from the text. With a profile only forward
    /// jumps are allowed, performed by advancing; the scanner then stops at
    /// the first position at or past `to`.
    pub fn jump(&mut self, to: u32) -> Result<(), ScanError> {
        let from = self.state.position;
        self.check_target(to)?;
        debug!(from, to, "jump");

        if self.profile.is_none() {
            self.relocate(to);
            self.state.depth = depth_before(&self.source.text()[..to as usize]);
            self.state.context = Context::Code;
            return Ok(());
        }

        if to < from {
            return Err(ScanError::InvalidJump {
                from,
                to,
                reason: JumpRejection::Backward,
            });
        }
        while self.state.position < to && self.is_avail() {
            self.advance()?;
        }
        Ok(())
    }

    /// Move to `to` and trust the caller's `line` and `col`.
    ///
    /// The context becomes `Code` and depth counters are left untouched.
    /// Nothing verifies that `line`/`col` match the text; passing wrong
    /// values desynchronizes every location reported afterwards.
    pub fn jump_unchecked(&mut self, to: u32, line: u32, col: u32) -> Result<(), ScanError> {
        self.check_target(to)?;
        debug!(from = self.state.position, to, line, col, "unchecked jump");
        let before = &self.source.text()[..to as usize];
        let sol = line_start(before.as_bytes());

        let state = &mut self.state;
        state.position = to;
        state.line = line;
        state.col = col;
        state.sol_index = offset_u32(sol);
        state.at_sol = before[sol..].chars().all(is_inline_whitespace);
        state.escaped = ends_with_escape(before.as_bytes());
        state.context = Context::Code;
        Ok(())
    }

    fn check_target(&self, to: u32) -> Result<(), ScanError> {
        let reason = if to > self.state.end {
            JumpRejection::PastEnd
        } else if !self.source.is_boundary(to) {
            JumpRejection::NotCharBoundary
        } else {
            return Ok(());
        };
        Err(ScanError::InvalidJump {
            from: self.state.position,
            to,
            reason,
        })
    }

    /// Set the position and recompute line, column, start-of-line and the
    /// escape flag from the text, with the same line rules as `step`.
    /// Context and depth are left alone.
    fn relocate(&mut self, to: u32) {
        let before = self.source.text().get(..to as usize).unwrap_or_default();
        let sol = line_start(before.as_bytes());
        let line_text = &before[sol..];

        let state = &mut self.state;
        state.position = to;
        state.line = line_breaks(before.as_bytes()).saturating_add(1);
        state.col = char_count(line_text).saturating_add(1);
        state.sol_index = offset_u32(sol);
        state.at_sol = line_text.chars().all(is_inline_whitespace);
        state.escaped = ends_with_escape(before.as_bytes());
    }
}

/// Depth of `text` when every character is code.
fn depth_before(text: &str) -> Depth {
    let mut depth = Depth::default();
    for c in text.chars() {
        depth.track(c);
    }
    depth
}

fn offset_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
