//! Line classification.
//!
//! Every line of a hand history falls into exactly one [`LineKind`]. The
//! classifier never looks at anything but the line itself, so callers can
//! classify a whole hand up front and then walk the result however they
//! need to.
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// The `*** ... ***` section markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    HoleCards,
    Flop,
    Turn,
    River,
    ShowDown,
    FirstShowDown,
    SecondShowDown,
    Summary,
}

const MARKERS: [(&str, Marker); 8] = [
    ("*** HOLE CARDS ***", Marker::HoleCards),
    ("*** FLOP ***", Marker::Flop),
    ("*** TURN ***", Marker::Turn),
    ("*** RIVER ***", Marker::River),
    ("*** SHOW DOWN ***", Marker::ShowDown),
    ("*** FIRST SHOW DOWN ***", Marker::FirstShowDown),
    ("*** SECOND SHOW DOWN ***", Marker::SecondShowDown),
    ("*** SUMMARY ***", Marker::Summary),
];

/// What a `posts` line is paying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostKind {
    Ante,
    SmallBlind,
    BigBlind,
    /// A returning player paying both blinds. The small blind part is dead.
    SmallAndBigBlinds,
}

/// The blind marker printed next to a seat in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlindMarker {
    Small,
    Big,
}

/// The verb of an action line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb<'a> {
    Bet,
    Call,
    Raise,
    Check,
    Fold,
    /// Some other verb that moved money. The replay can't account for it.
    Other(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionLine<'a> {
    pub name: &'a str,
    pub verb: Verb<'a>,
    /// The first amount on the line. For raises this is the raise size.
    pub amount: Option<f64>,
    /// The `to <amount>` part of a raise.
    pub raise_to: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummarySeatLine<'a> {
    pub seat: u8,
    pub blind: Option<BlindMarker>,
    /// The first parenthesized money amount, i.e. what the seat won.
    pub amount: Option<f64>,
    /// The last bracketed card group, i.e. what the seat showed or mucked.
    pub cards: Option<&'a str>,
}

/// One classified line. Payloads borrow from the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind<'a> {
    Header(&'a str),
    Table {
        name: &'a str,
        button_seat: Option<u8>,
    },
    Seat {
        seat: u8,
        name: &'a str,
        stack: f64,
    },
    Post {
        name: &'a str,
        kind: PostKind,
        amount: f64,
    },
    Dealt {
        name: &'a str,
        cards: &'a str,
    },
    Street(Marker),
    Action(ActionLine<'a>),
    UncalledBet {
        amount: f64,
        name: &'a str,
    },
    TotalPot {
        pot: f64,
        rake: f64,
    },
    Board(&'a str),
    SummarySeat(SummarySeatLine<'a>),
    Cancelled,
    /// Lines that are understood but carry no state: chat, table traffic,
    /// duplicate pot collection lines and showdown chatter.
    Noise,
    /// Lines that match no known shape.
    Unrecognized,
}

static TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Table '(.*)'(?:.*Seat #(\d+) is the button)?").expect("table regex")
});
static SEAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Seat (\d+): (.+) \([$€£]?(\d+(?:\.\d+)?) in chips").expect("seat regex")
});
static SUMMARY_SEAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Seat (\d+): (.*)$").expect("summary seat regex"));
static PAREN_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([$€£](\d+(?:\.\d+)?)\)").expect("amount regex"));
static BRACKET_CARDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([0-9a-zA-Z ]+)\]").expect("cards regex"));
static UNCALLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Uncalled bet \([$€£]?(\d+(?:\.\d+)?)\) returned to (.+)$").expect("uncalled regex")
});
static TOTAL_POT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Total pot [$€£]?(\d+(?:\.\d+)?).*\| Rake [$€£]?(\d+(?:\.\d+)?)")
        .expect("total pot regex")
});
static BOARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Board \[([^\]]*)\]").expect("board regex"));
static DEALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Dealt to (.+?) \[([^\]]+)\]").expect("dealt regex"));
static POST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.+): posts (the ante|ante|small & big blinds|small blind|big blind) [$€£]?(\d+(?:\.\d+)?)",
    )
    .expect("post regex")
});
static ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.+): (bets|calls|raises|checks|folds)(?: [$€£]?(\d+(?:\.\d+)?))?(?: to [$€£]?(\d+(?:\.\d+)?))?(?:\s.*)?$",
    )
    .expect("action regex")
});
static OTHER_WAGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+): ([a-z]+) [$€£]?(\d+(?:\.\d+)?)").expect("wager regex")
});
static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.+ (?:joins the table at seat #\d+\s*|collected .+ from (?:side |main )?pot.*)$")
        .expect("noise regex")
});

/// Substrings that mark a line as noise wherever they appear.
const NOISE_FRAGMENTS: [&str; 10] = [
    " said, \"",
    "removed from the table",
    "doesn't show hand",
    "has timed out",
    "is sitting out",
    "will be allowed to play after the button",
    "has returned",
    ": sits out",
    ": shows [",
    ": mucks hand",
];

/// Endings that mark a line as noise.
const NOISE_SUFFIXES: [&str; 3] = ["is disconnected", "is connected", "leaves the table"];

fn amount(caps: &Captures<'_>, idx: usize) -> Option<f64> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

fn seat_no(caps: &Captures<'_>, idx: usize) -> Option<u8> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

fn text<'a>(caps: &Captures<'a>, idx: usize) -> Option<&'a str> {
    caps.get(idx).map(|m| m.as_str())
}

/// Classify a single line of hand history text.
///
/// # Examples
///
/// ```
/// use rs_hand_history::hand_history::{classify, LineKind, Verb};
///
/// match classify("Carol: raises $4 to $6") {
///     LineKind::Action(action) => {
///         assert_eq!(action.name, "Carol");
///         assert_eq!(action.verb, Verb::Raise);
///         assert_eq!(action.raise_to, Some(6.0));
///     }
///     other => panic!("expected an action, got {other:?}"),
/// }
/// assert_eq!(classify("Bob: doesn't show hand"), LineKind::Noise);
/// ```
pub fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim_end().trim_start_matches('\u{feff}');

    if line.starts_with("PokerStars Hand #") {
        return LineKind::Header(line);
    }
    if line.trim_start() == "Hand cancelled" {
        return LineKind::Cancelled;
    }
    if line.starts_with("*** ") {
        return MARKERS
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix))
            .map(|(_, marker)| LineKind::Street(*marker))
            .unwrap_or(LineKind::Unrecognized);
    }

    classify_table_line(line)
        .or_else(|| classify_summary_line(line))
        .or_else(|| classify_player_line(line))
        .unwrap_or(LineKind::Unrecognized)
}

/// Lines printed by the table itself rather than about a player's action.
fn classify_table_line(line: &str) -> Option<LineKind<'_>> {
    if let Some(caps) = TABLE.captures(line) {
        return Some(LineKind::Table {
            name: text(&caps, 1)?,
            button_seat: seat_no(&caps, 2),
        });
    }
    if let Some(caps) = SEAT.captures(line) {
        return Some(LineKind::Seat {
            seat: seat_no(&caps, 1)?,
            name: text(&caps, 2)?,
            stack: amount(&caps, 3)?,
        });
    }
    if let Some(caps) = UNCALLED.captures(line) {
        return Some(LineKind::UncalledBet {
            amount: amount(&caps, 1)?,
            name: text(&caps, 2)?,
        });
    }
    if line.starts_with("Dealt to ") {
        return Some(match DEALT.captures(line) {
            Some(caps) => LineKind::Dealt {
                name: text(&caps, 1)?,
                cards: text(&caps, 2)?,
            },
            None => LineKind::Noise,
        });
    }
    None
}

fn classify_summary_line(line: &str) -> Option<LineKind<'_>> {
    if let Some(caps) = TOTAL_POT.captures(line) {
        return Some(LineKind::TotalPot {
            pot: amount(&caps, 1)?,
            rake: amount(&caps, 2)?,
        });
    }
    if let Some(caps) = BOARD.captures(line) {
        return Some(LineKind::Board(text(&caps, 1)?));
    }
    if let Some(caps) = SUMMARY_SEAT.captures(line) {
        let seat = seat_no(&caps, 1)?;
        let detail = text(&caps, 2)?;
        let blind = if detail.contains("(small blind)") {
            Some(BlindMarker::Small)
        } else if detail.contains("(big blind)") {
            Some(BlindMarker::Big)
        } else {
            None
        };
        let won = PAREN_AMOUNT
            .captures(detail)
            .and_then(|caps| amount(&caps, 1));
        let cards = BRACKET_CARDS
            .captures_iter(detail)
            .last()
            .and_then(|caps| text(&caps, 1));
        return Some(LineKind::SummarySeat(SummarySeatLine {
            seat,
            blind,
            amount: won,
            cards,
        }));
    }
    None
}

fn classify_player_line(line: &str) -> Option<LineKind<'_>> {
    if NOISE_FRAGMENTS.iter().any(|f| line.contains(f))
        || NOISE_SUFFIXES.iter().any(|s| line.ends_with(s))
        || NOISE.is_match(line)
    {
        return Some(LineKind::Noise);
    }
    if let Some(caps) = POST.captures(line) {
        let kind = match text(&caps, 2)? {
            "the ante" | "ante" => PostKind::Ante,
            "small & big blinds" => PostKind::SmallAndBigBlinds,
            "small blind" => PostKind::SmallBlind,
            _ => PostKind::BigBlind,
        };
        return Some(LineKind::Post {
            name: text(&caps, 1)?,
            kind,
            amount: amount(&caps, 3)?,
        });
    }
    if let Some(caps) = ACTION.captures(line) {
        let verb = match text(&caps, 2)? {
            "bets" => Verb::Bet,
            "calls" => Verb::Call,
            "raises" => Verb::Raise,
            "checks" => Verb::Check,
            _ => Verb::Fold,
        };
        return Some(LineKind::Action(ActionLine {
            name: text(&caps, 1)?,
            verb,
            amount: amount(&caps, 3),
            raise_to: amount(&caps, 4),
        }));
    }
    if let Some(caps) = OTHER_WAGER.captures(line) {
        return Some(LineKind::Action(ActionLine {
            name: text(&caps, 1)?,
            verb: Verb::Other(text(&caps, 2)?),
            amount: amount(&caps, 3),
            raise_to: None,
        }));
    }
    None
}
