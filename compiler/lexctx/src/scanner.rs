//! The scanner handle and its single-step advance engine.
//!
//! [`Scanner::advance`] moves exactly one character forward and performs,
//! in this order:
//!
//! 1. close-pattern scan on the character being left (if inside a literal
//!    and that character is not escaped),
//! 2. depth update (only if that character was code),
//! 3. position bookkeeping (line, column, start-of-line, escape flag; only
//!    an unescaped `\n` starts a new line),
//! 4. line comment close when the new character is an unescaped `\n`,
//! 5. open-pattern scan on the new character (string, then line comment,
//!    then block comment, then regex; first match wins),
//! 6. with comment exclusion enabled, repeat until out of the comment.
//!
//! Derived flags (current character, whitespace, end-of-line, ...) are
//! computed from the state on demand, so they can never go stale.

use bitflags::bitflags;
use tracing::trace;

use crate::profile::{Language, LanguageProfile};
use crate::source::{Location, SourceBuffer};
use crate::state::{ClosePattern, CommentKind, Context, CursorState, Depth};
use crate::ScanError;

/// Which profile a scanner uses: a built-in preset or a caller-owned one.
#[derive(Clone, Copy, Debug)]
pub enum LanguageSpec<'a> {
    Preset(Language),
    Custom(&'a LanguageProfile),
}

impl<'a> LanguageSpec<'a> {
    pub fn profile(self) -> &'a LanguageProfile {
        match self {
            LanguageSpec::Preset(lang) => lang.profile(),
            LanguageSpec::Custom(profile) => profile,
        }
    }
}

impl From<Language> for LanguageSpec<'_> {
    fn from(lang: Language) -> Self {
        LanguageSpec::Preset(lang)
    }
}

impl<'a> From<&'a LanguageProfile> for LanguageSpec<'a> {
    fn from(profile: &'a LanguageProfile) -> Self {
        LanguageSpec::Custom(profile)
    }
}

/// Scanner construction options.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanOptions<'a> {
    /// Exclusive end bound; defaults to the buffer length.
    pub end: Option<u32>,
    /// Literal tracking profile; `None` treats everything as code.
    pub language: Option<LanguageSpec<'a>>,
    /// Step over comments transparently so callers never observe a
    /// comment context.
    pub exclude_comments: bool,
}

impl<'a> ScanOptions<'a> {
    #[must_use]
    pub fn with_end(mut self, end: u32) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<LanguageSpec<'a>>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Resolve a preset by name.
    pub fn with_preset(self, name: &str) -> Result<Self, ScanError> {
        let lang: Language = name.parse()?;
        Ok(self.with_language(lang))
    }

    #[must_use]
    pub fn excluding_comments(mut self) -> Self {
        self.exclude_comments = true;
        self
    }
}

bitflags! {
    /// ASCII classification of the character at the cursor plus the
    /// cursor's own flags.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct CharFlags: u16 {
        /// ASCII whitespace (space, tab, `\n`, `\r`, form feed, vertical tab).
        const WHITESPACE = 1 << 0;
        /// Space or tab.
        const INLINE_WHITESPACE = 1 << 1;
        /// The current character is `\n`.
        const EOL = 1 << 2;
        /// ASCII alphanumeric or `_`.
        const WORD = 1 << 3;
        /// Preceded by an unescaped backslash.
        const ESCAPED = 1 << 4;
        /// Only inline whitespace precedes the cursor on its line.
        const AT_SOL = 1 << 5;
        /// Not inside any literal.
        const CODE = 1 << 6;
        /// Data remains before the end bound.
        const AVAIL = 1 << 7;
    }
}

#[inline]
pub(crate) fn is_inline_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[inline]
pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

#[inline]
pub(crate) fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Context-aware cursor over a [`SourceBuffer`].
///
/// The buffer and profile are shared by reference; the [`CursorState`] is
/// owned. Cloning is cheap and yields a fully independent cursor.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    pub(crate) source: &'a SourceBuffer,
    pub(crate) profile: Option<&'a LanguageProfile>,
    pub(crate) exclude_comments: bool,
    pub(crate) state: CursorState,
}

impl<'a> Scanner<'a> {
    /// Create a scanner at offset 0.
    ///
    /// If a literal opens at offset 0 the scanner starts inside it (or, with
    /// comment exclusion, past it).
    pub fn new(source: &'a SourceBuffer, opts: ScanOptions<'a>) -> Result<Self, ScanError> {
        let end = match opts.end {
            Some(end) if end > source.len() || !source.is_boundary(end) => {
                return Err(ScanError::OutOfRangeEnd {
                    end,
                    len: source.len(),
                });
            }
            Some(end) => end,
            None => source.len(),
        };
        let mut scanner = Self {
            source,
            profile: opts.language.map(LanguageSpec::profile),
            exclude_comments: opts.exclude_comments,
            state: CursorState::start(end),
        };
        scanner.enter();
        Ok(scanner)
    }

    /// Scanner over the whole buffer without literal tracking.
    pub fn plain(source: &'a SourceBuffer) -> Self {
        let mut scanner = Self {
            source,
            profile: None,
            exclude_comments: false,
            state: CursorState::start(source.len()),
        };
        scanner.enter();
        scanner
    }

    /// Continue scanning `source` from a state taken from another scanner.
    ///
    /// The state is checked against the buffer (bounds and character
    /// boundaries) but its line, column and context are trusted. With
    /// `exclude_comments`, a state sitting inside a comment is moved past it.
    pub fn resume(
        source: &'a SourceBuffer,
        profile: Option<&'a LanguageProfile>,
        exclude_comments: bool,
        state: CursorState,
    ) -> Result<Self, ScanError> {
        let fits = state.end <= source.len()
            && state.position <= state.end
            && source.is_boundary(state.end)
            && source.is_boundary(state.position);
        if !fits {
            return Err(ScanError::InvalidStateInput {
                position: state.position,
                end: state.end,
                len: source.len(),
            });
        }
        let mut scanner = Self {
            source,
            profile,
            exclude_comments,
            state,
        };
        scanner.skip_excluded();
        Ok(scanner)
    }

    // ─── Accessors ─────────────────────────────────────────────

    pub fn source(&self) -> &'a SourceBuffer {
        self.source
    }

    pub fn profile(&self) -> Option<&'a LanguageProfile> {
        self.profile
    }

    pub fn excludes_comments(&self) -> bool {
        self.exclude_comments
    }

    /// Snapshot of the cursor state.
    pub fn state(&self) -> CursorState {
        self.state
    }

    #[inline]
    pub fn position(&self) -> u32 {
        self.state.position
    }

    #[inline]
    pub fn end(&self) -> u32 {
        self.state.end
    }

    pub fn line(&self) -> u32 {
        self.state.line
    }

    pub fn col(&self) -> u32 {
        self.state.col
    }

    pub fn location(&self) -> Location {
        Location::new(self.state.line, self.state.col)
    }

    /// Line and column in the outermost parent buffer.
    pub fn absolute_location(&self) -> Location {
        self.source.absolute_location(self.state.position)
    }

    pub fn at_sol(&self) -> bool {
        self.state.at_sol
    }

    pub fn sol_index(&self) -> u32 {
        self.state.sol_index
    }

    pub fn depth(&self) -> Depth {
        self.state.depth
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    pub fn context(&self) -> Context {
        self.state.context
    }

    // ─── Derived flags ─────────────────────────────────────────

    /// Text from the cursor to the end bound.
    #[inline]
    pub fn rest(&self) -> &'a str {
        self.source
            .text()
            .get(self.state.position as usize..self.state.end as usize)
            .unwrap_or_default()
    }

    /// The character at the cursor, or `None` at the end bound.
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character after the current one.
    pub fn next_char(&self) -> Option<char> {
        self.peek(1)
    }

    /// The `n`th character from the cursor (`peek(0) == current()`).
    pub fn peek(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// The character before the cursor.
    pub fn prev_char(&self) -> Option<char> {
        self.source
            .text()
            .get(..self.state.position as usize)
            .and_then(|before| before.chars().next_back())
    }

    /// Returns `true` if data remains before the end bound.
    #[inline]
    pub fn is_avail(&self) -> bool {
        self.state.position < self.state.end
    }

    #[inline]
    pub fn no_avail(&self) -> bool {
        !self.is_avail()
    }

    pub fn is_code(&self) -> bool {
        self.state.context.is_code()
    }

    pub fn is_str(&self) -> bool {
        self.state.context.is_string()
    }

    pub fn is_comment(&self) -> bool {
        self.state.context.is_comment()
    }

    pub fn is_regex(&self) -> bool {
        self.state.context.is_regex()
    }

    pub fn is_escaped(&self) -> bool {
        self.state.escaped
    }

    pub fn is_not_escaped(&self) -> bool {
        !self.state.escaped
    }

    pub fn is_whitespace(&self) -> bool {
        self.current().is_some_and(is_whitespace)
    }

    pub fn is_inline_whitespace(&self) -> bool {
        self.current().is_some_and(is_inline_whitespace)
    }

    /// Returns `true` if the current character is `\n`.
    pub fn is_eol(&self) -> bool {
        self.current() == Some('\n')
    }

    /// Returns `true` if the current character is an unescaped `\n`.
    pub fn is_line_break(&self) -> bool {
        self.is_eol() && !self.state.escaped
    }

    pub fn is_word(&self) -> bool {
        self.current().is_some_and(is_word)
    }

    /// All flags at once.
    pub fn flags(&self) -> CharFlags {
        let mut flags = CharFlags::empty();
        if let Some(c) = self.current() {
            flags.set(CharFlags::WHITESPACE, is_whitespace(c));
            flags.set(CharFlags::INLINE_WHITESPACE, is_inline_whitespace(c));
            flags.set(CharFlags::EOL, c == '\n');
            flags.set(CharFlags::WORD, is_word(c));
            flags.insert(CharFlags::AVAIL);
        }
        flags.set(CharFlags::ESCAPED, self.state.escaped);
        flags.set(CharFlags::AT_SOL, self.state.at_sol);
        flags.set(CharFlags::CODE, self.is_code());
        flags
    }

    /// Text in `start..end`, or `None` if the range is out of bounds or
    /// splits a character.
    pub fn slice(&self, start: u32, end: u32) -> Option<&'a str> {
        self.source.text().get(start as usize..end as usize)
    }

    /// Text from `start` up to the cursor.
    pub fn consumed_since(&self, start: u32) -> &'a str {
        self.slice(start, self.state.position).unwrap_or_default()
    }

    // ─── Advance engine ────────────────────────────────────────

    /// Move one character forward.
    ///
    /// A no-op at the end bound. With comment exclusion enabled, a comment
    /// entered by this step is skipped entirely.
    pub fn advance(&mut self) -> Result<(), ScanError> {
        if self.state.locked {
            return Err(ScanError::LockedAdvance {
                position: self.state.position,
            });
        }
        self.step();
        self.skip_excluded();
        Ok(())
    }

    /// Advance `n` characters, stopping early at the end bound.
    pub fn advance_n(&mut self, n: usize) -> Result<(), ScanError> {
        for _ in 0..n {
            if self.no_avail() {
                break;
            }
            self.advance()?;
        }
        Ok(())
    }

    /// Run the open-pattern scan at the current position. Used on a fresh
    /// state, where no step has led onto the first character.
    pub(crate) fn enter(&mut self) {
        self.open_literal();
        self.skip_excluded();
    }

    pub(crate) fn skip_excluded(&mut self) {
        if !self.exclude_comments {
            return;
        }
        while self.state.context.is_comment() && self.is_avail() {
            self.step();
        }
    }

    /// One unconditional step of the state machine. Ignores the lock.
    pub(crate) fn step(&mut self) {
        let Some(c) = self.current() else {
            return;
        };
        let at = self.state.position;
        let next = at + len_u32(c);
        let was_code = self.state.context.is_code();
        let escaped = self.state.escaped;

        if !was_code && !escaped {
            self.close_literal(c, at);
        }

        if was_code {
            self.state.depth.track(c);
        }

        let state = &mut self.state;
        state.escaped = c == '\\' && !escaped;
        state.position = next;
        // A backslash-newline continues the current line.
        if c == '\n' && !escaped {
            state.line += 1;
            state.col = 1;
            state.sol_index = next;
            state.at_sol = true;
        } else {
            state.col += 1;
            if !is_inline_whitespace(c) {
                state.at_sol = false;
            }
        }

        if self.state.context == Context::Comment(CommentKind::Line)
            && self.is_line_break()
        {
            trace!(offset = self.state.position, "line comment closed");
            self.state.context = Context::Code;
        }

        self.open_literal();
    }

    /// Close-pattern scan on `c`, the unescaped character at `at` being left.
    fn close_literal(&mut self, c: char, at: u32) {
        let closed = match &mut self.state.context {
            Context::Code | Context::Comment(CommentKind::Line) => false,
            Context::String {
                delimiter,
                opened_at,
            } => c == *delimiter && at > *opened_at,
            Context::Comment(CommentKind::Block(pattern)) => {
                let close = self
                    .profile
                    .and_then(|p| p.block_comments().get(pattern.pair as usize))
                    .map_or("", |pair| pair.close());
                feed_body(pattern, c, at, close)
            }
            Context::Regex(pattern) => {
                let close = self
                    .profile
                    .and_then(|p| p.regexes().get(pattern.pair as usize))
                    .map_or("", |pair| pair.close());
                feed_body(pattern, c, at, close)
            }
        };
        if closed {
            trace!(offset = at, context = %self.state.context, "literal closed");
            self.state.context = Context::Code;
        }
    }

    /// Open-pattern scan at the current position.
    fn open_literal(&mut self) {
        let Some(profile) = self.profile else {
            return;
        };
        if !self.state.context.is_code() || self.state.escaped {
            return;
        }
        let rest = self.rest();
        let Some(c) = rest.chars().next() else {
            return;
        };
        let at = self.state.position;
        let opened = if profile.is_string_delimiter(c) {
            Some(Context::String {
                delimiter: c,
                opened_at: at,
            })
        } else if profile.matches_line_comment(rest, self.state.at_sol) {
            Some(Context::Comment(CommentKind::Line))
        } else if let Some(pair) = profile.match_block_comment(c, rest) {
            let open = profile.block_comments()[pair].open();
            Some(Context::Comment(CommentKind::Block(ClosePattern::new(
                pair,
                at + len_u32_str(open),
            ))))
        } else if let Some(pair) = profile.match_regex(c, rest) {
            let open = profile.regexes()[pair].open();
            Some(Context::Regex(ClosePattern::new(pair, at + len_u32_str(open))))
        } else {
            None
        };
        if let Some(context) = opened {
            trace!(offset = at, %context, "literal opened");
            self.state.context = context;
        }
    }
}

/// Feed a block comment or regex body character; the opener itself is
/// never matched against the close pattern.
fn feed_body(pattern: &mut ClosePattern, c: char, at: u32, close: &str) -> bool {
    if at < pattern.body_start {
        return false;
    }
    pattern.feed(c, close)
}

#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "a char encodes to at most 4 bytes"
)]
fn len_u32(c: char) -> u32 {
    c.len_utf8() as u32
}

fn len_u32_str(s: &str) -> u32 {
    u32::try_from(s.len()).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
