//! Context-aware source scanning.
//!
//! `lexctx` walks a text buffer one character at a time while tracking
//! which lexical context the cursor sits in (plain code, a string literal,
//! a line or block comment, or a regex literal), the nesting depth of
//! `()`, `[]`, `{}` and `<>`, and the line/column position.
//!
//! The crate never builds a syntax tree and never rejects malformed input:
//! an unterminated literal simply leaves its context open through the end
//! of the buffer, and unbalanced brackets drive the depth counters negative.
//!
//! # Layers
//!
//! - [`LanguageProfile`]: immutable delimiter table, either one of the
//!   built-in [`Language`] presets or assembled with [`ProfileBuilder`].
//! - [`SourceBuffer`]: the text being scanned, optionally nested inside a
//!   larger parent buffer.
//! - [`CursorState`]: the `Copy` position record, including the
//!   [`Context`] tag.
//! - [`Scanner`]: the public handle combining the three and exposing the
//!   advance engine, the consumption combinators and seeking.

mod combinators;
mod error;
mod lines;
mod profile;
mod scanner;
mod seek;
mod source;
mod state;

pub use combinators::Lookahead;
pub use error::{JumpRejection, ScanError};
pub use lines::split_lines;
pub use profile::{DelimiterPair, Language, LanguageProfile, LineComment, ProfileBuilder};
pub use scanner::{CharFlags, LanguageSpec, ScanOptions, Scanner};
pub use source::{Location, SourceBuffer};
pub use state::{ClosePattern, CommentKind, Context, CursorState, Depth};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=lexctx=debug` or `RUST_LOG=lexctx=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // An embedding application may already own the global subscriber.
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init()
                .ok();
        }
    });
}
