#![no_main]

extern crate arbitrary;
extern crate libfuzzer_sys;
extern crate rs_hand_history;

use rs_hand_history::batch::parse_hands;
use rs_hand_history::hand_history::{
    parse_hand,
    test_util::{
        assert_valid_hand_record, ANTES_DEAD_BLIND_SHOWDOWN, HEADS_UP_ALL_IN,
        HEADS_UP_PREFLOP_RERAISE, THREE_HANDED_RIVER_FOLD,
    },
};

use libfuzzer_sys::fuzz_target;

const FIXTURES: [&str; 4] = [
    THREE_HANDED_RIVER_FOLD,
    ANTES_DEAD_BLIND_SHOWDOWN,
    HEADS_UP_PREFLOP_RERAISE,
    HEADS_UP_ALL_IN,
];

#[derive(Debug, Clone, arbitrary::Arbitrary)]
enum LineEdit {
    Drop(u8),
    Replace(u8, String),
    Insert(u8, String),
    Swap(u8, u8),
}

#[derive(Debug, Clone, arbitrary::Arbitrary)]
struct HandInput {
    fixture: u8,
    edits: Vec<LineEdit>,
    /// Raw text parsed as a whole file as well.
    raw: String,
}

/// Apply line level edits to a known good hand so the fuzzer spends its
/// time near real hand histories.
fn edited(input: &HandInput) -> String {
    let base = FIXTURES[input.fixture as usize % FIXTURES.len()];
    let mut lines: Vec<String> = base.lines().map(str::to_string).collect();
    for edit in &input.edits {
        if lines.is_empty() {
            break;
        }
        let at = |idx: &u8| *idx as usize % lines.len();
        match edit {
            LineEdit::Drop(idx) => {
                let idx = at(idx);
                lines.remove(idx);
            }
            LineEdit::Replace(idx, line) => {
                let idx = at(idx);
                lines[idx] = line.clone();
            }
            LineEdit::Insert(idx, line) => {
                let idx = at(idx);
                lines.insert(idx, line.clone());
            }
            LineEdit::Swap(a, b) => {
                let (a, b) = (at(a), at(b));
                lines.swap(a, b);
            }
        }
    }
    lines.join("\n")
}

fuzz_target!(|input: HandInput| {
    if let Ok(hand) = parse_hand(&edited(&input)) {
        assert_valid_hand_record(&hand);
    }
    for hand in parse_hands(&input.raw).hands {
        assert_valid_hand_record(&hand);
    }
});
