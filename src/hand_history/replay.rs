//! Street by street replay of the betting.
//!
//! Hand histories never print the size of the pot or how much a player
//! needed to call. Both are recovered here by keeping, for every street,
//! how much each player has put in (their minimum investment) and the
//! largest of those amounts (the highwater mark).
use std::collections::BTreeMap;

use tracing::{debug, instrument, trace};

use super::{
    Action, ActionKind, ActionLine, HandParseError, LineKind, Marker, PostLedger, Street,
    StreetRecord, UncalledBet, Verb,
};

/// Where each street starts and which marker ends it.
const STREET_BOUNDS: [(Street, Marker, Marker); 4] = [
    (Street::Preflop, Marker::HoleCards, Marker::Flop),
    (Street::Flop, Marker::Flop, Marker::Turn),
    (Street::Turn, Marker::Turn, Marker::River),
    (Street::River, Marker::River, Marker::ShowDown),
];

/// The index of the first line carrying each section marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    found: BTreeMap<Marker, usize>,
}

impl Markers {
    pub fn locate(lines: &[LineKind<'_>]) -> Self {
        let mut found = BTreeMap::new();
        for (idx, line) in lines.iter().enumerate() {
            if let LineKind::Street(marker) = line {
                found.entry(*marker).or_insert(idx);
            }
        }
        Self { found }
    }

    pub fn get(&self, marker: Marker) -> Option<usize> {
        self.found.get(&marker).copied()
    }
}

/// Betting state for a single street.
///
/// Each street owns its ledger outright. The preflop ledger starts from
/// the blinds, later streets start empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreetLedger {
    pub investment: BTreeMap<String, f64>,
    pub highwater: f64,
}

impl StreetLedger {
    /// Seed preflop from the posted blinds. Antes and dead blinds don't
    /// count towards calling so they are held back.
    pub fn preflop(posts: &PostLedger, implied_antes: &BTreeMap<String, f64>) -> Self {
        let investment: BTreeMap<String, f64> = posts
            .posts
            .iter()
            .map(|(name, posted)| {
                let held_back = implied_antes.get(name).copied().unwrap_or(0.0);
                (name.clone(), posted - held_back)
            })
            .collect();
        let highwater = investment.values().copied().fold(0.0, f64::max);
        Self {
            investment,
            highwater,
        }
    }

    pub fn invested(&self, name: &str) -> f64 {
        self.investment.get(name).copied().unwrap_or(0.0)
    }

    /// Apply one action line, moving money into `pot`.
    fn apply(&mut self, line: &ActionLine<'_>, pot: &mut f64) -> Result<Action, HandParseError> {
        let malformed = || HandParseError::MalformedAction {
            player: line.name.to_string(),
            verb: format!("{:?}", line.verb).to_lowercase(),
        };

        let kind = match line.verb {
            Verb::Check => ActionKind::Check,
            Verb::Fold => ActionKind::Fold,
            Verb::Other(verb) => return Err(HandParseError::UnexpectedAction(verb.to_string())),
            Verb::Bet => {
                let amount = line.amount.ok_or_else(malformed)?;
                self.highwater = amount;
                *pot += amount;
                *self.entry(line.name) += amount;
                ActionKind::Bet
            }
            Verb::Call => {
                let amount = line.amount.ok_or_else(malformed)?;
                *pot += amount;
                *self.entry(line.name) += amount;
                ActionKind::Call
            }
            Verb::Raise => {
                let amount = line.amount.ok_or_else(malformed)?;
                let raise_to = line.raise_to.ok_or_else(malformed)?;
                // The part of the raise that just calls may already be in.
                let to_call = self.highwater - self.invested(line.name);
                *pot += amount + to_call;
                self.highwater = raise_to;
                *self.entry(line.name) = raise_to;
                ActionKind::Raise
            }
        };

        Ok(Action {
            player: line.name.to_string(),
            kind,
            amount: match kind {
                ActionKind::Check | ActionKind::Fold => None,
                _ => line.amount,
            },
            pot_after: *pot,
            highwater_after: self.highwater,
        })
    }

    fn entry(&mut self, name: &str) -> &mut f64 {
        self.investment.entry(name.to_string()).or_insert(0.0)
    }
}

/// What came out of replaying one street.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetOutcome {
    pub ledger: StreetLedger,
    pub actions: Vec<Action>,
    pub uncalled: Option<UncalledBet>,
    /// The pot after the last action of the street.
    pub pot: f64,
}

/// Replay the lines of one street, starting from `ledger` and `pot`.
///
/// An uncalled bet line ends the street. Nothing after it is looked at.
#[instrument(level = "trace", skip(lines, ledger))]
pub fn replay_street(
    street: Street,
    lines: &[LineKind<'_>],
    mut ledger: StreetLedger,
    mut pot: f64,
) -> Result<StreetOutcome, HandParseError> {
    let mut actions = Vec::new();
    let mut uncalled = None;

    for line in lines {
        match line {
            LineKind::Action(action_line) => {
                let action = ledger.apply(action_line, &mut pot)?;
                trace!(?action, "Replayed action");
                actions.push(action);
            }
            LineKind::UncalledBet { amount, name } => {
                uncalled = Some(UncalledBet {
                    amount: *amount,
                    player: name.to_string(),
                });
                break;
            }
            LineKind::Unrecognized => trace!(?street, "Skipping unrecognized line"),
            _ => {}
        }
    }

    Ok(StreetOutcome {
        ledger,
        actions,
        uncalled,
        pot,
    })
}

/// The replay of a whole hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandReplay {
    pub streets: BTreeMap<Street, StreetRecord>,
    pub uncalled_bet: Option<UncalledBet>,
    pub last_street: Street,
    pub pot: f64,
}

impl HandReplay {
    /// Sum each player's investment over every street.
    pub fn total_investment<'a>(
        &self,
        names: impl Iterator<Item = &'a str>,
    ) -> BTreeMap<String, f64> {
        names
            .map(|name| {
                let total: f64 = self
                    .streets
                    .values()
                    .filter_map(|record| record.investment.get(name))
                    .sum();
                (name.to_string(), total)
            })
            .collect()
    }

    /// Every name that put money in on some street.
    pub fn investors(&self) -> impl Iterator<Item = &str> {
        self.streets
            .values()
            .flat_map(|record| record.investment.keys())
            .map(String::as_str)
    }
}

/// Replay every street that was reached.
///
/// A street is replayed when its opening marker exists. When the marker
/// that would close it is missing the street runs to the summary and the
/// hand stops there. A hand whose river is closed by a showdown marker
/// ends on `Showdown`.
pub fn replay_hand(
    lines: &[LineKind<'_>],
    markers: &Markers,
    posts: &PostLedger,
) -> Result<HandReplay, HandParseError> {
    let summary = markers
        .get(Marker::Summary)
        .ok_or(HandParseError::IncompleteHand)?;
    let implied_antes = posts.implied_antes();

    let mut pot = posts.total_posted();
    let mut streets = BTreeMap::new();
    let mut uncalled_bet: Option<UncalledBet> = None;
    let mut last_street = Street::Showdown;

    for (street, open, close) in STREET_BOUNDS {
        let start = markers.get(open).ok_or(HandParseError::IncompleteHand)?;
        let (end, is_last) = match markers.get(close) {
            Some(end) => (end, false),
            None => (summary, true),
        };
        let section = lines.get(start + 1..end).unwrap_or(&[]);

        let ledger = match street {
            Street::Preflop => StreetLedger::preflop(posts, &implied_antes),
            _ => StreetLedger::default(),
        };
        let mut outcome = replay_street(street, section, ledger, pot)?;

        if street == Street::Preflop {
            for (name, invested) in outcome.ledger.investment.iter_mut() {
                *invested += implied_antes.get(name).copied().unwrap_or(0.0);
            }
        }
        // The first uncalled bet wins. A later street can't have one if an
        // earlier street already ended the betting.
        if uncalled_bet.is_none() {
            uncalled_bet = outcome.uncalled;
        }
        pot = outcome.pot;
        debug!(%street, actions = outcome.actions.len(), pot, "Replayed street");
        streets.insert(
            street,
            StreetRecord {
                actions: outcome.actions,
                investment: outcome.ledger.investment,
            },
        );

        if is_last {
            last_street = street;
            break;
        }
    }

    if let Some(bet) = &uncalled_bet {
        // Returned money was never invested. Take it back from the latest
        // street the player put money in.
        for street in Street::BETTING.iter().rev() {
            let invested = streets
                .get_mut(street)
                .and_then(|record| record.investment.get_mut(&bet.player));
            if let Some(invested) = invested {
                *invested -= bet.amount;
                break;
            }
        }
    }

    Ok(HandReplay {
        streets,
        uncalled_bet,
        last_street,
        pot,
    })
}
