//! Swiss-system round pairing
//!
//! Players are seeded by score then rating, one bye is detached from the
//! bottom of the seed order when the field is odd, and the rest are paired
//! by an exhaustive best-first search that minimizes the total penalty of
//! the whole round rather than of each table in isolation.
//!
//! The search has no memoization. It visits every perfect matching of the
//! residual field in the worst case, which is fine for club-sized rounds but
//! grows as (n-1)!! with the number of players.

use crate::config::PairingOptions;
use crate::error::{EngineError, Result};
use crate::pairing::penalty::{build_candidate, Candidate};
use crate::types::{Pairing, PairingResult, Player};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Generate one round of pairings for `roster`.
///
/// The roster is only read. Ineligible players are skipped, and an odd field
/// yields exactly one bye.
pub fn generate_pairings(roster: &[Player], options: &PairingOptions) -> Result<PairingResult> {
    options.validate()?;
    validate_roster(roster)?;

    let seeded = seed_order(roster);
    debug!(
        roster = roster.len(),
        eligible = seeded.len(),
        "Generating Swiss pairings"
    );

    if seeded.is_empty() {
        return Ok(PairingResult::empty());
    }

    let (arena, bye) = detach_bye(seeded);
    if let Some(player) = bye {
        debug!(player_id = %player.id, "Assigned bye");
    }

    let remaining: Vec<usize> = (0..arena.len()).collect();
    let best = search(&arena, &remaining, options);

    let pairings = best
        .pairings
        .iter()
        .enumerate()
        .map(|(index, candidate)| Pairing {
            table: index as u32 + 1,
            black: arena[candidate.black].id.clone(),
            white: arena[candidate.white].id.clone(),
            float: candidate.float,
        })
        .collect();

    let result = PairingResult {
        pairings,
        bye: bye.map(|player| player.id.clone()),
        floated: best
            .floated
            .iter()
            .map(|&index| arena[index].id.clone())
            .collect(),
        penalty: best.penalty,
    };

    debug!(
        tables = result.pairings.len(),
        penalty = result.penalty,
        floated = result.floated.len(),
        "Swiss pairings generated"
    );

    Ok(result)
}

/// Reject rosters with duplicate ids or non-numeric standings
fn validate_roster(roster: &[Player]) -> Result<()> {
    let mut seen = HashSet::with_capacity(roster.len());
    for player in roster {
        if !seen.insert(player.id.as_str()) {
            return Err(
                EngineError::invalid_roster(format!("duplicate player id: {}", player.id)).into(),
            );
        }
        if !player.score.is_finite() || !player.rating.is_finite() {
            return Err(EngineError::invalid_roster(format!(
                "player {} has a non-finite score or rating",
                player.id
            ))
            .into());
        }
    }
    Ok(())
}

/// Eligible players, best first: score descending, then rating descending.
///
/// The sort is stable, so equal standings keep roster order.
pub(crate) fn seed_order(roster: &[Player]) -> Vec<&Player> {
    let mut seeded: Vec<&Player> = roster.iter().filter(|player| player.eligible).collect();
    seeded.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.rating.total_cmp(&a.rating))
    });
    seeded
}

/// Split off the bye for an odd field.
///
/// The lowest seed who has never had a bye gets it; when everyone has, the
/// lowest seed gets a second one.
pub(crate) fn detach_bye(mut seeded: Vec<&Player>) -> (Vec<&Player>, Option<&Player>) {
    if seeded.len() % 2 == 0 {
        return (seeded, None);
    }

    let index = seeded
        .iter()
        .rposition(|player| !player.has_had_bye())
        .unwrap_or(seeded.len() - 1);
    let bye = seeded.remove(index);
    (seeded, Some(bye))
}

#[derive(Debug, Clone)]
struct SearchResult {
    pairings: Vec<Candidate>,
    penalty: f64,
    floated: Vec<usize>,
}

impl SearchResult {
    fn unsolved() -> Self {
        Self {
            pairings: Vec::new(),
            penalty: f64::INFINITY,
            floated: Vec::new(),
        }
    }
}

/// Best complete pairing of `remaining` (arena indices, seed order).
///
/// The lead is always the first remaining index. If every opponent of the
/// lead is a rematch, this branch alone is retried with rematches allowed.
fn search(arena: &[&Player], remaining: &[usize], options: &PairingOptions) -> SearchResult {
    let Some((&lead, rest)) = remaining.split_first() else {
        return SearchResult {
            pairings: Vec::new(),
            penalty: 0.0,
            floated: Vec::new(),
        };
    };

    let mut best = best_over_candidates(arena, lead, rest, options, false);

    if !best.penalty.is_finite() {
        trace!(lead = %arena[lead].id, "No rematch-free opponent, relaxing branch");
        best = best_over_candidates(arena, lead, rest, options, true);
    }

    best
}

fn best_over_candidates(
    arena: &[&Player],
    lead: usize,
    rest: &[usize],
    options: &PairingOptions,
    relaxed: bool,
) -> SearchResult {
    let mut candidates: Vec<Candidate> = rest
        .iter()
        .map(|&other| build_candidate(arena, lead, other, options, relaxed))
        .collect();
    candidates.sort_by(|a, b| a.penalty.total_cmp(&b.penalty));

    let mut best = SearchResult::unsolved();
    let mut residual = Vec::with_capacity(rest.len().saturating_sub(1));

    for candidate in candidates {
        if !candidate.penalty.is_finite() {
            // Sorted ascending, so only infeasible candidates follow
            break;
        }

        let partner = if candidate.black == lead {
            candidate.white
        } else {
            candidate.black
        };
        residual.clear();
        residual.extend(rest.iter().copied().filter(|&index| index != partner));

        let sub = search(arena, &residual, options);
        let total = candidate.penalty + sub.penalty;
        if total < best.penalty {
            let mut floated = Vec::with_capacity(sub.floated.len() + 1);
            floated.extend(candidate.float_player);
            floated.extend(sub.floated.iter().copied());

            let mut pairings = Vec::with_capacity(sub.pairings.len() + 1);
            pairings.push(candidate);
            pairings.extend(sub.pairings);

            best = SearchResult {
                pairings,
                penalty: total,
                floated,
            };
        }
    }

    best
}
