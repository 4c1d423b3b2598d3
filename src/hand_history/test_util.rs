//! Hand fixtures and an invariant checker shared by the unit tests, the
//! benches and the fuzz target.
use std::collections::BTreeSet;

use approx::{assert_abs_diff_eq, relative_eq};

use super::{HandRecord, Position, Street};

/// Three handed, raised preflop, bet and called on the flop, checked
/// through the turn and the river bet goes uncalled.
pub const THREE_HANDED_RIVER_FOLD: &str = "\
PokerStars Hand #100000000001:  Hold'em No Limit ($1/$2 USD) - 2021/05/12 14:33:02 ET
Table 'Alpha II' 6-max Seat #1 is the button
Seat 1: Carol ($200 in chips)
Seat 2: Alice ($200 in chips)
Seat 3: Bob ($200 in chips)
Alice: posts small blind $1
Bob: posts big blind $2
*** HOLE CARDS ***
Dealt to Carol [Ah Kd]
Carol: raises $4 to $6
Alice: folds
Bob: calls $4
*** FLOP *** [2c 7d Th]
Bob: bets $10
Carol: calls $10
*** TURN *** [2c 7d Th] [Js]
Bob: checks
Carol: checks
*** RIVER *** [2c 7d Th Js] [3s]
Bob: bets $20
Carol: folds
Uncalled bet ($20) returned to Bob
Bob collected $33 from pot
Bob: doesn't show hand
*** SUMMARY ***
Total pot $33 | Rake $0
Board [2c 7d Th Js 3s]
Seat 1: Carol (button) folded on the River
Seat 2: Alice (small blind) folded before Flop
Seat 3: Bob (big blind) collected ($33)
";

/// Four players on a nine seat table with antes, a dead blind posted by
/// a returning player and a showdown with rake.
pub const ANTES_DEAD_BLIND_SHOWDOWN: &str = "\
PokerStars Hand #200000000002:  Hold'em No Limit ($0.05/$0.10 USD) - 2021/07/03 22:10:45 CET [2021/07/03 16:10:45 ET]
Table 'Beta' 9-max Seat #5 is the button
Seat 1: Dan ($10 in chips)
Seat 3: Eve ($10.50 in chips)
Seat 5: Finn ($8 in chips)
Seat 6: Gus ($12 in chips)
Dan: posts the ante $0.01
Eve: posts the ante $0.01
Finn: posts the ante $0.01
Gus: posts the ante $0.01
Gus: posts small blind $0.05
Dan: posts big blind $0.10
Eve: posts small & big blinds $0.15
*** HOLE CARDS ***
Dealt to Finn [Qs Qh]
Eve: checks
Finn: raises $0.30 to $0.40
Gus: folds
Dan: calls $0.30
Eve: calls $0.30
*** FLOP *** [Qd 8c 3h]
Dan: checks
Eve: bets $0.60
Finn: raises $1.20 to $1.80
Dan: folds
Eve: calls $1.20
*** TURN *** [Qd 8c 3h] [9s]
Eve: checks
Finn: checks
*** RIVER *** [Qd 8c 3h 9s] [2d]
Eve: checks
Finn: bets $2
Eve: calls $2
*** SHOW DOWN ***
Finn: shows [Qs Qh] (three of a kind, Queens)
Eve: mucks hand
Finn collected $8.50 from pot
*** SUMMARY ***
Total pot $8.94 | Rake $0.44
Board [Qd 8c 3h 9s 2d]
Seat 1: Dan (big blind) folded on the Flop
Seat 3: Eve mucked [Ac Kc]
Seat 5: Finn (button) showed [Qs Qh] and won ($8.50) with three of a kind, Queens
Seat 6: Gus (small blind) folded before Flop
";

/// Heads up, a reraise preflop and a fold.
pub const HEADS_UP_PREFLOP_RERAISE: &str = "\
PokerStars Hand #300000000003:  Hold'em No Limit ($0.01/$0.02 USD) - 2022/01/30 9:02:11 ET
Table 'Gamma' 2-max Seat #2 is the button
Seat 1: Hank ($2 in chips)
Seat 2: Ivy ($1.37 in chips)
Ivy: posts small blind $0.01
Hank: posts big blind $0.02
*** HOLE CARDS ***
Ivy: raises $0.04 to $0.06
Hank: raises $0.12 to $0.18
Ivy: folds
Uncalled bet ($0.12) returned to Hank
Hank collected $0.12 from pot
Hank: doesn't show hand
*** SUMMARY ***
Total pot $0.12 | Rake $0
Seat 1: Hank (big blind) collected ($0.12)
Seat 2: Ivy (button) (small blind) folded before Flop
";

/// Heads up all in preflop. The uncalled part of the shove comes back and
/// the board runs out with no more betting.
pub const HEADS_UP_ALL_IN: &str = "\
PokerStars Hand #400000000004:  Hold'em No Limit ($0.01/$0.02 USD) - 2022/01/30 9:05:40 ET
Table 'Gamma' 2-max Seat #1 is the button
Seat 1: Hank ($2.10 in chips)
Seat 2: Ivy ($1 in chips)
Hank: posts small blind $0.01
Ivy: posts big blind $0.02
*** HOLE CARDS ***
Hank: raises $2.08 to $2.10 and is all-in
Ivy: calls $0.98 and is all-in
Uncalled bet ($1.10) returned to Hank
*** FLOP *** [4h 4d 9c]
*** TURN *** [4h 4d 9c] [Kh]
*** RIVER *** [4h 4d 9c Kh] [7s]
*** SHOW DOWN ***
Hank: shows [As Ad] (two pair, Aces and Fours)
Ivy: shows [Jc Tc] (a pair of Fours)
Hank collected $1.90 from pot
*** SUMMARY ***
Total pot $2 | Rake $0.10
Board [4h 4d 9c Kh 7s]
Seat 1: Hank (button) (small blind) showed [As Ad] and won ($1.90) with two pair, Aces and Fours
Seat 2: Ivy (big blind) showed [Jc Tc] and lost with a pair of Fours
";

/// Every fixture above, in one multi hand file with the blank lines the
/// site puts between hands.
pub fn fixture_file() -> String {
    [
        THREE_HANDED_RIVER_FOLD,
        ANTES_DEAD_BLIND_SHOWDOWN,
        HEADS_UP_PREFLOP_RERAISE,
        HEADS_UP_ALL_IN,
    ]
    .join("\n\n\n")
}

/// Assert that a hand record is internally consistent.
///
/// This checks the money invariants (investment adds up to the pot,
/// winnings add up to the pot without rake), that seats, positions and
/// posts cover the same players, that the board is long enough for the
/// streets played and that the actions only reference seated players.
pub fn assert_valid_hand_record(hand: &HandRecord) {
    let seated: BTreeSet<&str> = hand.seats.values().map(String::as_str).collect();
    assert_eq!(
        seated.len(),
        hand.seats.len(),
        "Hand {} seats a player twice",
        hand.hand_no
    );
    let stacked: BTreeSet<&str> = hand.stacks.keys().map(String::as_str).collect();
    assert_eq!(seated, stacked, "Hand {} stacks don't match seats", hand.hand_no);

    let positioned: BTreeSet<&str> = hand.positions.keys().map(String::as_str).collect();
    assert_eq!(
        seated, positioned,
        "Hand {} positions don't match seats",
        hand.hand_no
    );
    let labels: BTreeSet<Position> = hand.positions.values().copied().collect();
    assert_eq!(
        labels.len(),
        hand.positions.len(),
        "Hand {} repeats a position",
        hand.hand_no
    );
    let posted: BTreeSet<&str> = hand.posts.keys().map(String::as_str).collect();
    assert_eq!(seated, posted, "Hand {} posts don't match seats", hand.hand_no);

    for ante in hand.antes.values() {
        assert_abs_diff_eq!(*ante, hand.ante, epsilon = 1e-9);
    }

    let invested: f64 = hand.total_investment.values().sum();
    assert_abs_diff_eq!(invested, hand.total_pot, epsilon = 1e-6);
    let won: f64 = hand.winners.iter().map(|w| w.amount).sum();
    assert_abs_diff_eq!(won, hand.total_pot_no_rake, epsilon = 1e-6);
    assert_abs_diff_eq!(hand.total_pot - hand.rake, hand.total_pot_no_rake, epsilon = 1e-9);
    let raked: f64 = hand.rake_contribution.values().sum();
    if hand.total_pot_no_rake > 0.0 {
        assert!(relative_eq!(raked, hand.rake, epsilon = 1e-6, max_relative = 1e-9));
    }

    if let Some(street) = hand.streets.keys().next_back() {
        assert!(hand.board.len() >= street.min_board_len());
    }
    if hand.last_street != Street::Showdown {
        assert_eq!(hand.streets.keys().next_back(), Some(&hand.last_street));
    }

    for record in hand.streets.values() {
        for action in &record.actions {
            assert!(
                seated.contains(action.player.as_str()),
                "Hand {} has an action by {} who isn't seated",
                hand.hand_no,
                action.player
            );
        }
        for name in record.investment.keys() {
            assert!(seated.contains(name.as_str()));
        }
    }
    for name in hand.hole_cards.keys() {
        assert!(seated.contains(name.as_str()));
    }

    assert!(hand.board_mask().is_ok());
    for name in hand.hole_cards.keys() {
        assert!(matches!(hand.hole_card_mask(name), Some(Ok(_))));
    }
}
