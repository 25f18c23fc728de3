//! Cursor state: the plain-value position record driving a scan.
//!
//! [`CursorState`] is [`Copy`]. Cloning a scanner copies it, restoring a
//! scanner assigns it back field by field, and nothing inside it aliases
//! another state. Close-pattern progress lives in the [`Context`] payload
//! and references the profile's delimiter pair by index.

use std::fmt;

/// Lexical context of the character at the cursor.
///
/// Exactly one variant is active. Delimiters belong to the literal they
/// open or close: the opening quote of a string is already `String`, and
/// the character after the closing quote is `Code` again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Context {
    /// Not inside any literal.
    #[default]
    Code,
    /// Inside a string literal opened by `delimiter` at byte `opened_at`.
    String { delimiter: char, opened_at: u32 },
    /// Inside a line or block comment.
    Comment(CommentKind),
    /// Inside a regex literal.
    Regex(ClosePattern),
}

impl Context {
    #[inline]
    pub fn is_code(self) -> bool {
        matches!(self, Context::Code)
    }

    #[inline]
    pub fn is_string(self) -> bool {
        matches!(self, Context::String { .. })
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, Context::Comment(_))
    }

    #[inline]
    pub fn is_regex(self) -> bool {
        matches!(self, Context::Regex(_))
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Code => f.write_str("code"),
            Context::String { delimiter, .. } => write!(f, "string {delimiter}"),
            Context::Comment(CommentKind::Line) => f.write_str("line comment"),
            Context::Comment(CommentKind::Block(_)) => f.write_str("block comment"),
            Context::Regex(_) => f.write_str("regex"),
        }
    }
}

/// Kind of comment the cursor is inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommentKind {
    /// Runs up to, not including, the next unescaped `\n`.
    Line,
    /// Runs through the pair's close pattern.
    Block(ClosePattern),
}

/// Incremental match state for a multi-character close pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClosePattern {
    /// Index of the delimiter pair in the profile's block or regex list.
    pub pair: u16,
    /// Bytes of the close pattern matched so far.
    pub progress: u16,
    /// First offset after the opener. Close matching starts here so an
    /// opener never closes itself (`/*/` stays open).
    pub body_start: u32,
}

impl ClosePattern {
    pub(crate) fn new(pair: usize, body_start: u32) -> Self {
        Self {
            pair: u16::try_from(pair).unwrap_or(u16::MAX),
            progress: 0,
            body_start,
        }
    }

    /// Feed one character of the literal body; returns `true` once the whole
    /// close pattern has been seen.
    pub(crate) fn feed(&mut self, c: char, close: &str) -> bool {
        let matched = self.progress as usize;
        if close.get(matched..).is_some_and(|rest| rest.starts_with(c)) {
            self.progress = saturating_u16(matched + c.len_utf8());
            return self.progress as usize >= close.len();
        }
        self.progress = if close.starts_with(c) {
            saturating_u16(c.len_utf8())
        } else {
            0
        };
        false
    }
}

fn saturating_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Running tally of bracket-like characters seen in code.
///
/// Counters are signed and never clamped: unbalanced input drives them
/// negative rather than being rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Depth {
    pub paren: i32,
    pub bracket: i32,
    pub brace: i32,
    pub angle: i32,
}

impl Depth {
    /// Adjust the counter matching `c`, if any.
    #[inline]
    pub(crate) fn track(&mut self, c: char) {
        match c {
            '(' => self.paren += 1,
            ')' => self.paren -= 1,
            '[' => self.bracket += 1,
            ']' => self.bracket -= 1,
            '{' => self.brace += 1,
            '}' => self.brace -= 1,
            '<' => self.angle += 1,
            '>' => self.angle -= 1,
            _ => {}
        }
    }

    /// Returns `true` if every counter is zero.
    pub fn is_balanced(&self) -> bool {
        *self == Depth::default()
    }
}

/// Position-and-context record of one scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorState {
    pub(crate) position: u32,
    pub(crate) end: u32,
    pub(crate) line: u32,
    pub(crate) col: u32,
    pub(crate) at_sol: bool,
    pub(crate) sol_index: u32,
    pub(crate) depth: Depth,
    pub(crate) escaped: bool,
    pub(crate) locked: bool,
    pub(crate) context: Context,
}

impl CursorState {
    /// Fresh state at offset 0 with the given end bound.
    pub(crate) fn start(end: u32) -> Self {
        Self {
            position: 0,
            end,
            line: 1,
            col: 1,
            at_sol: true,
            sol_index: 0,
            depth: Depth::default(),
            escaped: false,
            locked: false,
            context: Context::Code,
        }
    }

    /// Byte offset of the current character.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Exclusive end bound of the scan.
    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    /// `true` while only inline whitespace precedes the cursor on its line.
    pub fn at_sol(&self) -> bool {
        self.at_sol
    }

    /// Byte offset where the current line starts.
    pub fn sol_index(&self) -> u32 {
        self.sol_index
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// `true` if the current character follows an unescaped backslash.
    pub fn escaped(&self) -> bool {
        self.escaped
    }

    /// `true` after [`Scanner::stop`](crate::Scanner::stop).
    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn context(&self) -> Context {
        self.context
    }
}

impl fmt::Display for CursorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Depth {
            paren,
            bracket,
            brace,
            angle,
        } = self.depth;
        write!(
            f,
            "{}:{} @{}/{} {} depth ({paren}) [{bracket}] {{{brace}}} <{angle}>",
            self.line, self.col, self.position, self.end, self.context
        )?;
        if self.locked {
            f.write_str(" locked")?;
        }
        Ok(())
    }
}
