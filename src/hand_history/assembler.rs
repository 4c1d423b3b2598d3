use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::core::CardMask;

use super::{
    assign_positions, classify, parse_header, replay_hand, summary::card_codes, HandParseError,
    HandRecord, LineKind, Marker, Markers, PostLedger, SeatRegistry, Summary,
};

/// Parse the text of one hand into a [`HandRecord`].
///
/// The text should start at the `PokerStars Hand #` line and run up to,
/// but not including, the next hand. Every line is classified first, then
/// the seating, positions and posts are read from the body of the hand,
/// the betting is replayed street by street and finally the summary is
/// reconciled against the replay.
///
/// A record is only returned when everything adds up. Run it twice hands,
/// cancelled hands and hands without a summary are rejected before any
/// parsing happens.
#[instrument(level = "trace", skip_all)]
pub fn parse_hand(text: &str) -> Result<HandRecord, HandParseError> {
    let lines: Vec<LineKind<'_>> = text.lines().map(classify).collect();
    let markers = Markers::locate(&lines);

    if markers.get(Marker::FirstShowDown).is_some() || markers.get(Marker::SecondShowDown).is_some()
    {
        return Err(HandParseError::RunItTwiceUnsupported);
    }
    let summary_at = markers
        .get(Marker::Summary)
        .ok_or(HandParseError::IncompleteHand)?;
    if lines.iter().any(|line| matches!(line, LineKind::Cancelled)) {
        return Err(HandParseError::HandCancelled);
    }

    let header_line = lines
        .iter()
        .find_map(|line| match line {
            LineKind::Header(header) => Some(*header),
            _ => None,
        })
        .ok_or(HandParseError::IncompleteHeader("hand number"))?;
    let header = parse_header(header_line)?;

    let (body, summary_lines) = lines.split_at(summary_at);
    let registry = SeatRegistry::from_lines(body)?;
    let positions = assign_positions(&registry, summary_lines)?;
    let posts = PostLedger::from_lines(body, &registry, &positions, header.stakes.small_blind)?;

    let mut hero = None;
    let mut hole_cards = BTreeMap::new();
    if let Some((name, cards)) = body.iter().find_map(|line| match line {
        LineKind::Dealt { name, cards } => Some((*name, *cards)),
        _ => None,
    }) {
        if !registry.is_seated(name) {
            return Err(HandParseError::UnknownPlayer(name.to_string()));
        }
        hero = Some(name.to_string());
        hole_cards.insert(name.to_string(), card_codes(cards));
    }

    let replay = replay_hand(&lines, &markers, &posts)?;
    let acting = replay
        .streets
        .values()
        .flat_map(|record| record.actions.iter().map(|a| a.player.as_str()))
        .chain(replay.investors())
        .chain(replay.uncalled_bet.iter().map(|bet| bet.player.as_str()));
    for name in acting {
        if !registry.is_seated(name) {
            return Err(HandParseError::UnknownPlayer(name.to_string()));
        }
    }
    let total_investment = replay.total_investment(registry.names());

    let summary = Summary::from_lines(summary_lines, &registry)?;
    summary.reconcile(header.hand_no, &replay.streets, &total_investment)?;

    for (name, cards) in &summary.reveals {
        hole_cards.insert(name.clone(), cards.clone());
    }
    summary.board.parse::<CardMask>()?;
    for cards in hole_cards.values() {
        cards.parse::<CardMask>()?;
    }

    let rake_contribution = summary.rake_contribution();
    let total_pot_no_rake = summary.total_pot_no_rake();
    debug!(
        hand_no = header.hand_no,
        players = registry.num_seated(),
        last_street = %replay.last_street,
        total_pot = summary.total_pot,
        "Parsed hand"
    );

    Ok(HandRecord {
        hand_no: header.hand_no,
        game: header.game,
        stakes: header.stakes,
        timestamp: header.timestamp,
        table_name: registry.table_name,
        button_seat: registry.button_seat,
        seats: registry.seats,
        stacks: registry.stacks,
        positions,
        ante: posts.ante,
        antes: posts.antes,
        extra_antes: posts.extra_antes,
        posts: posts.posts,
        hero,
        hole_cards,
        streets: replay.streets,
        uncalled_bet: replay.uncalled_bet,
        total_investment,
        total_pot: summary.total_pot,
        rake: summary.rake,
        total_pot_no_rake,
        winners: summary.winners,
        rake_contribution,
        board: summary.board,
        last_street: replay.last_street,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{Offset, Timelike};

    use super::*;
    use crate::core::CardError;
    use crate::hand_history::test_util::*;
    use crate::hand_history::{ActionKind, Position, Street, UncalledBet};

    #[test_log::test]
    fn test_three_handed_river_fold() {
        let hand = parse_hand(THREE_HANDED_RIVER_FOLD).unwrap();
        assert_valid_hand_record(&hand);

        assert_eq!(hand.hand_no, 100000000001);
        assert_eq!(hand.game, "Hold'em No Limit");
        assert_eq!(hand.stakes.currency, "USD");
        assert_eq!(hand.table_name, "Alpha II");
        assert_eq!(hand.hero.as_deref(), Some("Carol"));
        assert_eq!(hand.hole_cards["Carol"], "AhKd");
        assert_eq!(hand.positions["Carol"], Position::Button);
        assert_eq!(hand.positions["Alice"], Position::SmallBlind);
        assert_eq!(hand.positions["Bob"], Position::BigBlind);

        let preflop = hand.street(Street::Preflop).unwrap();
        assert_abs_diff_eq!(preflop.actions.last().unwrap().pot_after, 13.0);
        let flop = hand.street(Street::Flop).unwrap();
        assert_abs_diff_eq!(flop.actions.last().unwrap().pot_after, 33.0);
        let river = hand.street(Street::River).unwrap();
        assert_eq!(river.actions[0].kind, ActionKind::Bet);
        assert_abs_diff_eq!(river.actions[0].pot_after, 53.0);
        assert_abs_diff_eq!(river.investment["Bob"], 0.0);

        assert_eq!(
            hand.uncalled_bet,
            Some(UncalledBet {
                amount: 20.0,
                player: "Bob".to_string()
            })
        );
        assert_abs_diff_eq!(hand.total_investment["Carol"], 16.0);
        assert_abs_diff_eq!(hand.total_investment["Alice"], 1.0);
        assert_abs_diff_eq!(hand.total_investment["Bob"], 16.0);
        assert_eq!(hand.board, "2c7dThJs3s");
        assert_eq!(hand.last_street, Street::River);
        assert_abs_diff_eq!(hand.amount_won("Bob"), 33.0);
        assert_abs_diff_eq!(hand.rake_contribution["Bob"], 0.0);
    }

    #[test_log::test]
    fn test_antes_dead_blind_showdown() {
        let hand = parse_hand(ANTES_DEAD_BLIND_SHOWDOWN).unwrap();
        assert_valid_hand_record(&hand);

        assert_eq!(hand.positions["Eve"], Position::BeforeButton(1));
        assert_abs_diff_eq!(hand.ante, 0.01, epsilon = 1e-9);
        assert_abs_diff_eq!(hand.extra_antes["Eve"], 0.05, epsilon = 1e-9);
        assert_abs_diff_eq!(hand.total_investment["Dan"], 0.41, epsilon = 1e-9);
        assert_abs_diff_eq!(hand.total_investment["Eve"], 4.26, epsilon = 1e-9);
        assert_abs_diff_eq!(hand.total_investment["Finn"], 4.21, epsilon = 1e-9);
        assert_abs_diff_eq!(hand.total_investment["Gus"], 0.06, epsilon = 1e-9);
        assert_abs_diff_eq!(hand.rake_contribution["Finn"], 0.44, epsilon = 1e-9);
        assert_eq!(hand.hole_cards["Eve"], "AcKc");
        assert_eq!(hand.hole_cards["Finn"], "QsQh");
        assert_eq!(hand.last_street, Street::Showdown);
        assert!(hand.uncalled_bet.is_none());

        // The bracketed ET time is the one that counts.
        assert_eq!(hand.timestamp.hour(), 16);
        assert_eq!(hand.timestamp.offset().fix().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_heads_up_reraise() {
        let hand = parse_hand(HEADS_UP_PREFLOP_RERAISE).unwrap();
        assert_valid_hand_record(&hand);
        assert_eq!(hand.positions.len(), 2);
        assert_eq!(hand.positions["Ivy"], Position::SmallBlind);
        assert_eq!(hand.positions["Hank"], Position::BigBlind);
        assert!(!hand.positions.values().any(|p| *p == Position::Button));
        let preflop = hand.street(Street::Preflop).unwrap();
        assert_abs_diff_eq!(preflop.investment["Hank"], 0.06, epsilon = 1e-9);
        assert_abs_diff_eq!(preflop.investment["Ivy"], 0.06, epsilon = 1e-9);
        assert_eq!(hand.last_street, Street::Preflop);
        assert!(hand.hero.is_none());
        assert!(hand.hole_cards.is_empty());
    }

    #[test]
    fn test_all_in_uncalled_backdates_to_preflop() {
        let hand = parse_hand(HEADS_UP_ALL_IN).unwrap();
        assert_valid_hand_record(&hand);
        assert_abs_diff_eq!(hand.total_investment["Hank"], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hand.total_investment["Ivy"], 1.0, epsilon = 1e-9);
        for street in [Street::Flop, Street::Turn, Street::River] {
            let record = hand.street(street).unwrap();
            assert!(record.actions.is_empty());
            assert!(record.investment.is_empty());
        }
        assert_eq!(hand.last_street, Street::Showdown);
        assert_abs_diff_eq!(hand.rake_contribution["Hank"], 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_parsing_is_idempotent() {
        for text in [
            THREE_HANDED_RIVER_FOLD,
            ANTES_DEAD_BLIND_SHOWDOWN,
            HEADS_UP_PREFLOP_RERAISE,
            HEADS_UP_ALL_IN,
        ] {
            assert_eq!(parse_hand(text).unwrap(), parse_hand(text).unwrap());
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialized_bytes_are_stable() {
        let first = serde_json::to_string(&parse_hand(ANTES_DEAD_BLIND_SHOWDOWN).unwrap()).unwrap();
        let second =
            serde_json::to_string(&parse_hand(ANTES_DEAD_BLIND_SHOWDOWN).unwrap()).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"BTN+1\""));
        assert!(first.contains("\"preflop\""));
    }

    #[test_log::test]
    fn test_pot_mismatch_discards_hand() {
        let text = THREE_HANDED_RIVER_FOLD
            .replace("Total pot $33", "Total pot $35")
            .replace("collected ($33)", "collected ($35)");
        assert_eq!(
            parse_hand(&text),
            Err(HandParseError::PotMismatch {
                hand_no: 100000000001,
                total_pot: 35.0,
                invested: 33.0
            })
        );
    }

    #[test]
    fn test_short_board_with_turn() {
        let text = THREE_HANDED_RIVER_FOLD.replace("Board [2c 7d Th Js 3s]", "Board [2c 7d Th]");
        assert_eq!(
            parse_hand(&text),
            Err(HandParseError::BoardTooShort {
                street: Street::River,
                board_len: 6
            })
        );
    }

    #[test]
    fn test_early_rejects() {
        let cancelled = THREE_HANDED_RIVER_FOLD.replace("Bob: checks\n", "Hand cancelled\n");
        assert_eq!(parse_hand(&cancelled), Err(HandParseError::HandCancelled));

        let twice = HEADS_UP_ALL_IN.replace("*** SHOW DOWN ***", "*** FIRST SHOW DOWN ***");
        assert_eq!(parse_hand(&twice), Err(HandParseError::RunItTwiceUnsupported));

        let truncated = THREE_HANDED_RIVER_FOLD
            .split("*** SUMMARY ***")
            .next()
            .unwrap();
        assert_eq!(parse_hand(truncated), Err(HandParseError::IncompleteHand));
    }

    #[test]
    fn test_action_by_stranger() {
        let text = THREE_HANDED_RIVER_FOLD.replace("Alice: folds", "Zed: folds");
        assert_eq!(
            parse_hand(&text),
            Err(HandParseError::UnknownPlayer("Zed".to_string()))
        );
    }

    #[test]
    fn test_unknown_wager_verb() {
        let text = THREE_HANDED_RIVER_FOLD.replace("Bob: bets $10", "Bob: wagers $10");
        assert_eq!(
            parse_hand(&text),
            Err(HandParseError::UnexpectedAction("wagers".to_string()))
        );
    }

    #[test]
    fn test_invalid_board_card() {
        let text = THREE_HANDED_RIVER_FOLD.replace("Board [2c 7d Th Js 3s]", "Board [2c 7d Th Js 3x]");
        assert_eq!(
            parse_hand(&text),
            Err(HandParseError::InvalidCards(CardError::UnexpectedSuitChar))
        );
    }
}
