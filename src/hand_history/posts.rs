use std::collections::BTreeMap;

use approx::abs_diff_eq;
use tracing::trace;

use super::{HandParseError, LineKind, Position, PostKind, SeatRegistry};

/// Forced money put in before the cards are dealt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostLedger {
    /// The single ante every player paid. Zero when there were no antes.
    pub ante: f64,
    pub antes: BTreeMap<String, f64>,
    /// Dead blind money from players posting out of position.
    pub extra_antes: BTreeMap<String, f64>,
    /// Everything each player posted: antes and blinds.
    pub posts: BTreeMap<String, f64>,
}

impl PostLedger {
    /// Build the ledger from the `posts` lines of a hand.
    ///
    /// Every seated player gets an entry in each map, zero if they posted
    /// nothing.
    pub fn from_lines(
        lines: &[LineKind<'_>],
        registry: &SeatRegistry,
        positions: &BTreeMap<String, Position>,
        small_blind: f64,
    ) -> Result<Self, HandParseError> {
        let zeroed: BTreeMap<String, f64> = registry.names().map(|n| (n.to_string(), 0.0)).collect();
        let mut antes = zeroed.clone();
        let mut extra_antes = zeroed.clone();
        let mut posts = zeroed;

        for line in lines {
            let LineKind::Post { name, kind, amount } = line else {
                continue;
            };
            let total = posts
                .get_mut(*name)
                .ok_or_else(|| HandParseError::UnknownPlayer(name.to_string()))?;
            *total += amount;
            trace!(name, ?kind, amount, "Post");

            match kind {
                PostKind::Ante => {
                    antes.insert(name.to_string(), *amount);
                }
                PostKind::SmallBlind | PostKind::SmallAndBigBlinds => {
                    let is_blind = matches!(
                        positions.get(*name),
                        Some(Position::SmallBlind | Position::BigBlind)
                    );
                    if !is_blind {
                        extra_antes.insert(name.to_string(), small_blind);
                    }
                }
                PostKind::BigBlind => {}
            }
        }

        let mut values = antes.values();
        let ante = values.next().copied().unwrap_or(0.0);
        if values.any(|a| !abs_diff_eq!(*a, ante)) {
            return Err(HandParseError::NonUniformAnte);
        }

        Ok(Self {
            ante,
            antes,
            extra_antes,
            posts,
        })
    }

    /// Ante plus dead blind money. This part of a post doesn't count
    /// towards what a player has to call.
    pub fn implied_antes(&self) -> BTreeMap<String, f64> {
        self.antes
            .iter()
            .map(|(name, ante)| {
                let extra = self.extra_antes.get(name).copied().unwrap_or(0.0);
                (name.clone(), ante + extra)
            })
            .collect()
    }

    /// Everything posted, which is where the pot starts.
    pub fn total_posted(&self) -> f64 {
        self.posts.values().sum()
    }
}
