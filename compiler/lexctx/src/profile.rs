//! Language profiles: per-language tables of literal delimiters.
//!
//! A profile declares which characters open string literals, how line and
//! block comments open (and close), and which delimiter pairs enclose regex
//! literals. The first characters of every block and regex opener are
//! precomputed into sets so the advance engine can reject most characters
//! with a single lookup before attempting a sticky match.
//!
//! Built-in presets live in a process-wide registry that is initialized on
//! first use and never mutated afterwards.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::ScanError;

/// An `(open, close)` delimiter pair for block comments or regex literals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelimiterPair {
    open: Box<str>,
    close: Box<str>,
}

impl DelimiterPair {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// The opening pattern.
    pub fn open(&self) -> &str {
        &self.open
    }

    /// The closing pattern.
    pub fn close(&self) -> &str {
        &self.close
    }
}

/// Line comment declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineComment {
    opener: Box<str>,
    /// Only recognize the opener when nothing but inline whitespace precedes
    /// it on the current line.
    sol_only: bool,
}

impl LineComment {
    pub fn opener(&self) -> &str {
        &self.opener
    }

    pub fn sol_only(&self) -> bool {
        self.sol_only
    }
}

/// Immutable delimiter table for one language.
///
/// Profiles are `Send + Sync` and are shared by reference between any number
/// of scanners.
#[derive(Clone, Debug, Default)]
pub struct LanguageProfile {
    name: Option<Box<str>>,
    strings: FxHashSet<char>,
    line_comment: Option<LineComment>,
    block_comments: SmallVec<[DelimiterPair; 2]>,
    block_first: FxHashSet<char>,
    regexes: SmallVec<[DelimiterPair; 1]>,
    regex_first: FxHashSet<char>,
}

impl LanguageProfile {
    /// Start assembling a custom profile.
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder::default()
    }

    /// Look up a built-in preset by name (see [`Language`] for accepted names).
    pub fn preset(name: &str) -> Result<&'static LanguageProfile, ScanError> {
        name.parse::<Language>().map(Language::profile)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` if `c` opens (and closes) a string literal.
    #[inline]
    pub fn is_string_delimiter(&self, c: char) -> bool {
        self.strings.contains(&c)
    }

    /// String delimiters in unspecified order.
    pub fn string_delimiters(&self) -> impl Iterator<Item = char> + '_ {
        self.strings.iter().copied()
    }

    pub fn line_comment(&self) -> Option<&LineComment> {
        self.line_comment.as_ref()
    }

    pub fn block_comments(&self) -> &[DelimiterPair] {
        &self.block_comments
    }

    pub fn regexes(&self) -> &[DelimiterPair] {
        &self.regexes
    }

    /// Returns `true` if the profile declares no literal patterns at all.
    ///
    /// A scanner with such a profile tracks only depth and position.
    pub fn is_plain(&self) -> bool {
        self.strings.is_empty()
            && self.line_comment.is_none()
            && self.block_comments.is_empty()
            && self.regexes.is_empty()
    }

    /// Sticky match of the line comment opener at the start of `rest`.
    pub(crate) fn matches_line_comment(&self, rest: &str, at_sol: bool) -> bool {
        self.line_comment
            .as_ref()
            .is_some_and(|lc| (at_sol || !lc.sol_only) && rest.starts_with(&*lc.opener))
    }

    /// Sticky match of a block comment opener; returns the pair index.
    pub(crate) fn match_block_comment(&self, first: char, rest: &str) -> Option<usize> {
        match_pair(&self.block_first, &self.block_comments, first, rest)
    }

    /// Sticky match of a regex opener; returns the pair index.
    pub(crate) fn match_regex(&self, first: char, rest: &str) -> Option<usize> {
        match_pair(&self.regex_first, &self.regexes, first, rest)
    }
}

fn match_pair(
    first_chars: &FxHashSet<char>,
    pairs: &[DelimiterPair],
    first: char,
    rest: &str,
) -> Option<usize> {
    if !first_chars.contains(&first) {
        return None;
    }
    pairs.iter().position(|pair| rest.starts_with(pair.open()))
}

fn first_chars(pairs: &[DelimiterPair]) -> FxHashSet<char> {
    pairs.iter().filter_map(|p| p.open().chars().next()).collect()
}

/// Builder for custom [`LanguageProfile`]s.
///
/// Pairs with an empty opener or closer are ignored, since they could never
/// be matched sensibly.
#[derive(Clone, Debug, Default)]
pub struct ProfileBuilder {
    name: Option<Box<str>>,
    strings: FxHashSet<char>,
    line_comment: Option<LineComment>,
    block_comments: SmallVec<[DelimiterPair; 2]>,
    regexes: SmallVec<[DelimiterPair; 1]>,
}

impl ProfileBuilder {
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn strings(mut self, delimiters: impl IntoIterator<Item = char>) -> Self {
        self.strings.extend(delimiters);
        self
    }

    /// Line comment recognized anywhere in code.
    #[must_use]
    pub fn line_comment(self, opener: &str) -> Self {
        self.set_line_comment(opener, false)
    }

    /// Line comment recognized only at the start of a line (after optional
    /// indentation).
    #[must_use]
    pub fn line_comment_at_sol(self, opener: &str) -> Self {
        self.set_line_comment(opener, true)
    }

    fn set_line_comment(mut self, opener: &str, sol_only: bool) -> Self {
        self.line_comment = (!opener.is_empty()).then(|| LineComment {
            opener: opener.into(),
            sol_only,
        });
        self
    }

    #[must_use]
    pub fn block_comment(mut self, open: &str, close: &str) -> Self {
        if !open.is_empty() && !close.is_empty() {
            self.block_comments.push(DelimiterPair::new(open, close));
        }
        self
    }

    #[must_use]
    pub fn regex(mut self, open: &str, close: &str) -> Self {
        if !open.is_empty() && !close.is_empty() {
            self.regexes.push(DelimiterPair::new(open, close));
        }
        self
    }

    pub fn build(self) -> LanguageProfile {
        LanguageProfile {
            block_first: first_chars(&self.block_comments),
            regex_first: first_chars(&self.regexes),
            name: self.name,
            strings: self.strings,
            line_comment: self.line_comment,
            block_comments: self.block_comments,
            regexes: self.regexes,
        }
    }
}

// ─── Presets ───────────────────────────────────────────────────

/// Built-in language presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Js,
    Ts,
    Css,
    Html,
    Xml,
    Json,
    Json5,
    Jsonc,
    Yaml,
    Md,
    Python,
    C,
    Cpp,
    Java,
    Php,
    Ruby,
    Go,
    Rust,
    Swift,
    Kotlin,
    Shell,
    Bash,
}

impl Language {
    /// Every preset, in registry order.
    pub const ALL: [Language; 22] = [
        Language::Js,
        Language::Ts,
        Language::Css,
        Language::Html,
        Language::Xml,
        Language::Json,
        Language::Json5,
        Language::Jsonc,
        Language::Yaml,
        Language::Md,
        Language::Python,
        Language::C,
        Language::Cpp,
        Language::Java,
        Language::Php,
        Language::Ruby,
        Language::Go,
        Language::Rust,
        Language::Swift,
        Language::Kotlin,
        Language::Shell,
        Language::Bash,
    ];

    /// Canonical preset name.
    pub fn name(self) -> &'static str {
        match self {
            Language::Js => "js",
            Language::Ts => "ts",
            Language::Css => "css",
            Language::Html => "html",
            Language::Xml => "xml",
            Language::Json => "json",
            Language::Json5 => "json5",
            Language::Jsonc => "jsonc",
            Language::Yaml => "yaml",
            Language::Md => "md",
            Language::Python => "python",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Shell => "shell",
            Language::Bash => "bash",
        }
    }

    /// The preset's profile from the shared registry.
    pub fn profile(self) -> &'static LanguageProfile {
        &registry()[self as usize]
    }

    fn build_profile(self) -> LanguageProfile {
        let builder = LanguageProfile::builder().name(self.name());
        match self {
            Language::Js | Language::Ts => builder
                .strings(['\'', '"', '`'])
                .line_comment("//")
                .block_comment("/*", "*/")
                .regex("/", "/"),
            Language::Css => builder.strings(['\'', '"']).block_comment("/*", "*/"),
            Language::Html | Language::Xml => {
                builder.strings(['\'', '"']).block_comment("<!--", "-->")
            }
            Language::Json => builder.strings(['"']),
            Language::Json5 | Language::Jsonc => builder
                .strings(['"'])
                .line_comment("//")
                .block_comment("/*", "*/"),
            Language::Yaml => builder.strings(['"']).line_comment("#"),
            Language::Md => builder.strings(['"']).line_comment("<!--"),
            Language::Python => builder
                .strings(['\'', '"', '`'])
                .line_comment("#")
                .block_comment("'''", "'''")
                .block_comment("\"\"\"", "\"\"\""),
            Language::C | Language::Cpp | Language::Java => builder
                .strings(['\'', '"'])
                .line_comment("//")
                .block_comment("/*", "*/"),
            Language::Php
            | Language::Go
            | Language::Rust
            | Language::Swift
            | Language::Kotlin => builder
                .strings(['\'', '"', '`'])
                .line_comment("//")
                .block_comment("/*", "*/"),
            Language::Ruby => builder
                .strings(['\'', '"', '`'])
                .line_comment("#")
                .block_comment("=begin", "=end"),
            Language::Shell | Language::Bash => builder.strings(['\'', '"']).line_comment("#"),
        }
        .build()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ScanError;

    /// Parse a preset name, case-insensitively, accepting common aliases.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = name.trim().to_ascii_lowercase();
        names()
            .get(key.as_str())
            .copied()
            .ok_or_else(|| ScanError::InvalidLanguage {
                name: name.to_owned(),
            })
    }
}

/// Preset profiles, indexed by `Language` discriminant.
fn registry() -> &'static [LanguageProfile; Language::ALL.len()] {
    static PRESETS: OnceLock<[LanguageProfile; Language::ALL.len()]> = OnceLock::new();
    PRESETS.get_or_init(|| Language::ALL.map(Language::build_profile))
}

/// Name and alias lookup table.
fn names() -> &'static FxHashMap<&'static str, Language> {
    static NAMES: OnceLock<FxHashMap<&'static str, Language>> = OnceLock::new();
    NAMES.get_or_init(|| {
        let mut map: FxHashMap<&'static str, Language> =
            Language::ALL.iter().map(|&lang| (lang.name(), lang)).collect();
        let aliases = [
            ("javascript", Language::Js),
            ("typescript", Language::Ts),
            ("py", Language::Python),
            ("rb", Language::Ruby),
            ("rs", Language::Rust),
            ("sh", Language::Shell),
            ("yml", Language::Yaml),
            ("markdown", Language::Md),
            ("c++", Language::Cpp),
        ];
        map.extend(aliases);
        map
    })
}
