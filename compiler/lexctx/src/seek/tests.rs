use pretty_assertions::assert_eq;

use super::*;
use crate::{Language, Location, ScanOptions, SourceBuffer};

fn js(source: &SourceBuffer) -> Scanner<'_> {
    Scanner::new(source, ScanOptions::default().with_language(Language::Js)).unwrap()
}

// === Snapshots ===

#[test]
fn clone_is_isolated() {
    let buf = SourceBuffer::new("abcdef");
    let mut original = Scanner::plain(&buf);
    original.advance_n(2).unwrap();
    let mut copy = original.clone();
    copy.advance_n(3).unwrap();
    assert_eq!(original.position(), 2);
    assert_eq!(copy.position(), 5);
}

#[test]
fn restore_commits_a_lookahead() {
    let buf = SourceBuffer::new("a \"b\" c");
    let mut scanner = js(&buf);
    let mut probe = scanner.clone();
    probe.advance_n(3).unwrap();
    assert!(probe.is_str());

    scanner.restore(&probe);
    assert_eq!(scanner.state(), probe.state());
    assert!(scanner.is_str());
    scanner.advance_n(2).unwrap();
    assert!(scanner.is_code());
}

#[test]
fn resume_continues_from_a_state() {
    let buf = SourceBuffer::new("x = '(' + (y)");
    let mut first = js(&buf);
    first.advance_n(5).unwrap();
    let state = first.state();

    let js_profile = Some(Language::Js.profile());
    let mut resumed = Scanner::resume(&buf, js_profile, false, state).unwrap();
    assert!(resumed.is_str());
    resumed.jump(12).unwrap();
    assert_eq!(resumed.depth().paren, 1);
}

#[test]
fn resume_keeps_comment_exclusion() {
    let buf = SourceBuffer::new("a /* b */ c");
    let mut first = js(&buf);
    first.advance_n(4).unwrap();
    assert!(first.is_comment());

    let js_profile = Some(Language::Js.profile());
    let resumed = Scanner::resume(&buf, js_profile, true, first.state()).unwrap();
    assert!(resumed.excludes_comments());
    assert!(resumed.is_code());
    assert_eq!(resumed.position(), 9);

    let visible = Scanner::resume(&buf, js_profile, false, first.state()).unwrap();
    assert!(visible.is_comment());
    assert_eq!(visible.position(), 4);
}

#[test]
fn resume_rejects_foreign_state() {
    let long = SourceBuffer::new("a much longer buffer");
    let short = SourceBuffer::new("tiny");
    let mut scanner = Scanner::plain(&long);
    scanner.advance_n(10).unwrap();

    let err = Scanner::resume(&short, None, false, scanner.state()).unwrap_err();
    assert_eq!(
        err,
        ScanError::InvalidStateInput {
            position: 10,
            end: 20,
            len: 4
        }
    );
}

// === Stop / reset ===

#[test]
fn stop_moves_to_end_and_locks() {
    let buf = SourceBuffer::new("ab\ncd");
    let mut scanner = Scanner::plain(&buf);
    scanner.stop();
    assert_eq!(scanner.position(), 5);
    assert_eq!(scanner.location(), Location::new(2, 3));
    assert_eq!(scanner.sol_index(), 3);
    assert!(scanner.is_locked());
    assert!(scanner.no_avail());
    assert_eq!(
        scanner.advance(),
        Err(ScanError::LockedAdvance { position: 5 })
    );
}

#[test]
fn reset_returns_to_a_fresh_start() {
    let buf = SourceBuffer::new("// c\n(x");
    let mut scanner = Scanner::new(
        &buf,
        ScanOptions::default()
            .with_language(Language::Js)
            .with_end(6),
    )
    .unwrap();
    scanner.advance_n(6).unwrap();
    assert_eq!(scanner.depth().paren, 1);
    scanner.stop();

    scanner.reset();
    assert_eq!(scanner.position(), 0);
    assert_eq!(scanner.end(), 6);
    assert_eq!(scanner.location(), Location::START);
    assert!(scanner.depth().is_balanced());
    assert!(!scanner.is_locked());
    // A comment at offset 0 is re-entered.
    assert!(scanner.is_comment());
}

// === Jumps without a profile ===

#[test]
fn plain_jump_recomputes_position() {
    let buf = SourceBuffer::new("one\ntwo\nthree");
    let mut scanner = Scanner::plain(&buf);
    scanner.jump(10).unwrap();
    assert_eq!(scanner.location(), Location::new(3, 3));
    assert_eq!(scanner.sol_index(), 8);
    assert!(!scanner.at_sol());
    assert_eq!(scanner.current(), Some('r'));

    scanner.jump(4).unwrap();
    assert_eq!(scanner.location(), Location::new(2, 1));
    assert!(scanner.at_sol());
}

#[test]
fn plain_jump_recomputes_depth() {
    let buf = SourceBuffer::new("((a");
    let mut scanner = Scanner::plain(&buf);
    scanner.jump(2).unwrap();
    assert_eq!(scanner.depth().paren, 2);
    scanner.jump(0).unwrap();
    assert!(scanner.depth().is_balanced());
}

#[test]
fn plain_jump_recomputes_escape() {
    let buf = SourceBuffer::new(r"a\\\b");
    let mut scanner = Scanner::plain(&buf);
    scanner.jump(4).unwrap();
    assert!(scanner.is_escaped());
    scanner.jump(3).unwrap();
    assert!(!scanner.is_escaped());
}

#[test]
fn plain_jump_honors_line_continuation() {
    let buf = SourceBuffer::new("x = 1 \\\n  + 2\ny");
    let mut scanner = Scanner::plain(&buf);
    scanner.jump(10).unwrap();
    assert_eq!(scanner.current(), Some('+'));
    assert_eq!(scanner.location(), Location::new(1, 11));
    assert_eq!(scanner.sol_index(), 0);
    assert!(!scanner.at_sol());

    scanner.stop();
    assert_eq!(scanner.location(), Location::new(2, 2));
    assert_eq!(scanner.sol_index(), 14);
}

#[test]
fn jump_to_end_is_allowed() {
    let buf = SourceBuffer::new("abc");
    let mut scanner = Scanner::plain(&buf);
    scanner.jump(3).unwrap();
    assert!(scanner.no_avail());
}

#[test]
fn jump_past_end_is_rejected() {
    let buf = SourceBuffer::new("abc");
    let mut scanner = Scanner::plain(&buf);
    assert_eq!(
        scanner.jump(4),
        Err(ScanError::InvalidJump {
            from: 0,
            to: 4,
            reason: JumpRejection::PastEnd
        })
    );
    assert_eq!(scanner.position(), 0);
}

#[test]
fn jump_inside_character_is_rejected() {
    let buf = SourceBuffer::new("\u{e9}x");
    let mut scanner = Scanner::plain(&buf);
    assert_eq!(
        scanner.jump(1),
        Err(ScanError::InvalidJump {
            from: 0,
            to: 1,
            reason: JumpRejection::NotCharBoundary
        })
    );
}

// === Jumps with a profile ===

#[test]
fn profile_jump_replays_context() {
    let buf = SourceBuffer::new("a = \"(x)\"; (");
    let mut scanner = js(&buf);
    scanner.jump(6).unwrap();
    assert!(scanner.is_str());
    assert!(scanner.depth().is_balanced());

    scanner.jump(12).unwrap();
    assert!(scanner.is_code());
    assert_eq!(scanner.depth().paren, 1);
}

#[test]
fn profile_jump_backward_is_rejected() {
    let buf = SourceBuffer::new("abcdef");
    let mut scanner = js(&buf);
    scanner.jump(4).unwrap();
    assert_eq!(
        scanner.jump(1),
        Err(ScanError::InvalidJump {
            from: 4,
            to: 1,
            reason: JumpRejection::Backward
        })
    );
    assert_eq!(scanner.position(), 4);
}

#[test]
fn profile_jump_over_skipped_comment_lands_past_target() {
    let buf = SourceBuffer::new("a /* c */ b");
    let mut scanner = Scanner::new(
        &buf,
        ScanOptions::default()
            .with_language(Language::Js)
            .excluding_comments(),
    )
    .unwrap();
    scanner.jump(4).unwrap();
    assert_eq!(scanner.position(), 9);
    assert!(scanner.is_code());
}

// === Unchecked jumps ===

#[test]
fn unchecked_jump_trusts_caller() {
    let buf = SourceBuffer::new("ab\n  cd");
    let mut scanner = js(&buf);
    scanner.jump_unchecked(5, 40, 3).unwrap();
    assert_eq!(scanner.position(), 5);
    assert_eq!(scanner.location(), Location::new(40, 3));
    assert_eq!(scanner.sol_index(), 3);
    assert!(scanner.at_sol());
    assert!(scanner.is_code());
}

#[test]
fn unchecked_jump_keeps_depth() {
    let buf = SourceBuffer::new("(((x");
    let mut scanner = js(&buf);
    scanner.advance_n(2).unwrap();
    scanner.jump_unchecked(0, 1, 1).unwrap();
    assert_eq!(scanner.depth().paren, 2);
}

#[test]
fn unchecked_jump_still_checks_bounds() {
    let buf = SourceBuffer::new("ab");
    let mut scanner = js(&buf);
    assert!(scanner.jump_unchecked(3, 1, 4).is_err());
}
