//! Applying a finished round to the roster and to ratings

use crate::error::{EngineError, Result};
use crate::rating::RatingCalculator;
use crate::types::{
    OpponentResult, Outcome, PairingResult, Player, PlayerId, Rating, RatingUpdate, StoneColor,
    BYE_SENTINEL,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Result of one table, recorded from black's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub table: u32,
    pub black: PlayerId,
    pub white: PlayerId,
    pub black_outcome: Outcome,
}

impl GameResult {
    pub fn new(
        table: u32,
        black: impl Into<PlayerId>,
        white: impl Into<PlayerId>,
        black_outcome: Outcome,
    ) -> Self {
        Self {
            table,
            black: black.into(),
            white: white.into(),
            black_outcome,
        }
    }
}

/// Tournament points awarded per game outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundScoring {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
    pub bye: f64,
}

impl Default for RoundScoring {
    fn default() -> Self {
        Self {
            win: 1.0,
            draw: 0.5,
            loss: 0.0,
            bye: 1.0,
        }
    }
}

impl RoundScoring {
    pub fn points(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Win => self.win,
            Outcome::Draw => self.draw,
            Outcome::Loss => self.loss,
        }
    }
}

/// Check that `results` covers every table of `pairing` exactly once
fn validate_results(pairing: &PairingResult, results: &[GameResult]) -> Result<()> {
    let mut reported = HashSet::with_capacity(results.len());

    for result in results {
        let table = pairing
            .pairings
            .iter()
            .find(|p| p.table == result.table)
            .ok_or_else(|| {
                EngineError::invalid_roster(format!("result for unknown table {}", result.table))
            })?;

        if table.black != result.black || table.white != result.white {
            return Err(EngineError::invalid_roster(format!(
                "result for table {} names {} vs {}, pairing was {} vs {}",
                result.table, result.black, result.white, table.black, table.white
            ))
            .into());
        }

        if !reported.insert(result.table) {
            return Err(EngineError::invalid_roster(format!(
                "table {} reported twice",
                result.table
            ))
            .into());
        }
    }

    if let Some(missing) = pairing
        .pairings
        .iter()
        .find(|p| !reported.contains(&p.table))
    {
        return Err(
            EngineError::invalid_roster(format!("no result for table {}", missing.table)).into(),
        );
    }

    Ok(())
}

/// Build the roster for the next round.
///
/// Scores, opponent sets and color histories of everyone who played or had
/// the bye are updated; everyone else is copied unchanged. The input roster
/// is not modified.
pub fn apply_round(
    roster: &[Player],
    pairing: &PairingResult,
    results: &[GameResult],
    scoring: &RoundScoring,
) -> Result<Vec<Player>> {
    validate_results(pairing, results)?;

    let mut next: Vec<Player> = roster.to_vec();
    let index: HashMap<&str, usize> = roster
        .iter()
        .enumerate()
        .map(|(i, player)| (player.id.as_str(), i))
        .collect();

    let position = |id: &str| -> Result<usize> {
        index
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::invalid_roster(format!("unknown player: {}", id)).into())
    };

    for result in results {
        let black = position(&result.black)?;
        let white = position(&result.white)?;

        let player = &mut next[black];
        player.score += scoring.points(result.black_outcome);
        player.opponents.insert(result.white.clone());
        player.color_history.push(StoneColor::Black);

        let player = &mut next[white];
        player.score += scoring.points(result.black_outcome.reversed());
        player.opponents.insert(result.black.clone());
        player.color_history.push(StoneColor::White);
    }

    if let Some(bye) = &pairing.bye {
        let player = &mut next[position(bye)?];
        player.score += scoring.bye;
        player.opponents.insert(BYE_SENTINEL.to_string());
    }

    debug!(
        games = results.len(),
        bye = pairing.bye.is_some(),
        "Applied round results to roster"
    );

    Ok(next)
}

/// Each player's games for one rating period, keyed by player id.
///
/// Opponent ratings are the snapshots in `ratings`, i.e. as of the start of
/// the period.
pub fn rating_period_inputs(
    ratings: &HashMap<PlayerId, Rating>,
    results: &[GameResult],
) -> Result<BTreeMap<PlayerId, Vec<OpponentResult>>> {
    let lookup = |id: &str| -> Result<Rating> {
        ratings
            .get(id)
            .copied()
            .ok_or_else(|| EngineError::invalid_rating(format!("no rating for player {}", id)).into())
    };

    let mut inputs: BTreeMap<PlayerId, Vec<OpponentResult>> = BTreeMap::new();
    for result in results {
        let black = lookup(&result.black)?;
        let white = lookup(&result.white)?;

        inputs
            .entry(result.black.clone())
            .or_default()
            .push(OpponentResult::new(white, result.black_outcome));
        inputs
            .entry(result.white.clone())
            .or_default()
            .push(OpponentResult::new(black, result.black_outcome.reversed()));
    }

    Ok(inputs)
}

/// Rate every player in `ratings` for one period.
///
/// Players without games in `results` still get an update, in which only
/// their deviation grows.
pub fn close_rating_period(
    calculator: &dyn RatingCalculator,
    ratings: &HashMap<PlayerId, Rating>,
    results: &[GameResult],
) -> Result<BTreeMap<PlayerId, RatingUpdate>> {
    let inputs = rating_period_inputs(ratings, results)?;

    let mut updates = BTreeMap::new();
    for (player_id, current) in ratings {
        let games = inputs.get(player_id).map(Vec::as_slice).unwrap_or(&[]);
        let update = calculator.rate_player(current, games)?;
        updates.insert(player_id.clone(), update);
    }

    debug!(players = updates.len(), "Closed rating period");
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PairingOptions;
    use crate::pairing::generate_pairings;
    use crate::rating::Glicko2Calculator;
    use crate::types::Pairing;

    fn pairing_of(tables: &[(&str, &str)], bye: Option<&str>) -> PairingResult {
        PairingResult {
            pairings: tables
                .iter()
                .enumerate()
                .map(|(i, (black, white))| Pairing {
                    table: i as u32 + 1,
                    black: black.to_string(),
                    white: white.to_string(),
                    float: None,
                })
                .collect(),
            bye: bye.map(str::to_string),
            floated: Vec::new(),
            penalty: 0.0,
        }
    }

    fn roster() -> Vec<Player> {
        vec![
            Player::new("a", 0.0, 1600.0),
            Player::new("b", 0.0, 1550.0),
            Player::new("c", 0.0, 1500.0),
            Player::new("d", 0.0, 1450.0),
            Player::new("e", 0.0, 1400.0),
        ]
    }

    #[test]
    fn test_apply_round_updates_history() {
        let roster = roster();
        let pairing = pairing_of(&[("a", "b"), ("c", "d")], Some("e"));
        let results = vec![
            GameResult::new(1, "a", "b", Outcome::Win),
            GameResult::new(2, "c", "d", Outcome::Draw),
        ];

        let next = apply_round(&roster, &pairing, &results, &RoundScoring::default()).unwrap();

        assert_eq!(next[0].score, 1.0);
        assert_eq!(next[1].score, 0.0);
        assert_eq!(next[2].score, 0.5);
        assert_eq!(next[3].score, 0.5);
        assert_eq!(next[4].score, 1.0);

        assert!(next[0].has_played("b"));
        assert!(next[1].has_played("a"));
        assert_eq!(next[0].color_history, vec![StoneColor::Black]);
        assert_eq!(next[1].color_history, vec![StoneColor::White]);
        assert!(next[4].has_had_bye());
        assert!(next[4].color_history.is_empty());

        // Input untouched
        assert_eq!(roster[0].score, 0.0);
        assert!(roster[4].opponents.is_empty());
    }

    #[test]
    fn test_apply_round_rejects_missing_result() {
        let pairing = pairing_of(&[("a", "b"), ("c", "d")], None);
        let results = vec![GameResult::new(1, "a", "b", Outcome::Win)];
        let err = apply_round(&roster(), &pairing, &results, &RoundScoring::default())
            .unwrap_err();
        assert!(err.to_string().contains("no result for table 2"));
    }

    #[test]
    fn test_apply_round_rejects_unknown_table_and_mismatch() {
        let pairing = pairing_of(&[("a", "b")], None);

        let unknown = vec![GameResult::new(3, "a", "b", Outcome::Win)];
        assert!(apply_round(&roster(), &pairing, &unknown, &RoundScoring::default()).is_err());

        let swapped = vec![GameResult::new(1, "b", "a", Outcome::Win)];
        assert!(apply_round(&roster(), &pairing, &swapped, &RoundScoring::default()).is_err());

        let twice = vec![
            GameResult::new(1, "a", "b", Outcome::Win),
            GameResult::new(1, "a", "b", Outcome::Loss),
        ];
        assert!(apply_round(&roster(), &pairing, &twice, &RoundScoring::default()).is_err());
    }

    #[test]
    fn test_apply_round_rejects_unknown_player() {
        let pairing = pairing_of(&[("a", "zed")], None);
        let results = vec![GameResult::new(1, "a", "zed", Outcome::Win)];
        let err =
            apply_round(&roster(), &pairing, &results, &RoundScoring::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::InvalidRoster { .. })
        ));
    }

    #[test]
    fn test_custom_scoring() {
        let scoring = RoundScoring {
            win: 2.0,
            draw: 1.0,
            loss: 0.0,
            bye: 1.0,
        };
        let pairing = pairing_of(&[("a", "b")], None);
        let results = vec![GameResult::new(1, "a", "b", Outcome::Loss)];
        let next = apply_round(&roster(), &pairing, &results, &scoring).unwrap();
        assert_eq!(next[0].score, 0.0);
        assert_eq!(next[1].score, 2.0);
    }

    #[test]
    fn test_second_round_avoids_rematches() {
        let roster: Vec<Player> = (0..6)
            .map(|i| Player::new(format!("p{}", i), 0.0, 1700.0 - i as f64 * 50.0))
            .collect();
        let options = PairingOptions::default();

        let round_one = generate_pairings(&roster, &options).unwrap();
        let results: Vec<GameResult> = round_one
            .pairings
            .iter()
            .map(|p| GameResult::new(p.table, p.black.clone(), p.white.clone(), Outcome::Win))
            .collect();
        let next = apply_round(&roster, &round_one, &results, &RoundScoring::default()).unwrap();

        let round_two = generate_pairings(&next, &options).unwrap();
        assert_eq!(round_two.pairings.len(), 3);
        assert!(round_two.penalty < options.rematch_penalty);
        for pairing in &round_two.pairings {
            let black = next.iter().find(|p| p.id == pairing.black).unwrap();
            assert!(!black.has_played(&pairing.white));
        }
    }

    #[test]
    fn test_rating_period_inputs() {
        let mut ratings = HashMap::new();
        ratings.insert("a".to_string(), Rating::new(1600.0, 100.0, 0.06));
        ratings.insert("b".to_string(), Rating::new(1500.0, 200.0, 0.06));
        let results = vec![GameResult::new(1, "a", "b", Outcome::Win)];

        let inputs = rating_period_inputs(&ratings, &results).unwrap();
        assert_eq!(inputs["a"].len(), 1);
        assert_eq!(inputs["a"][0].opponent.rating, 1500.0);
        assert_eq!(inputs["a"][0].score, Outcome::Win);
        assert_eq!(inputs["b"][0].opponent.rating, 1600.0);
        assert_eq!(inputs["b"][0].score, Outcome::Loss);

        let missing = vec![GameResult::new(1, "a", "nobody", Outcome::Win)];
        assert!(rating_period_inputs(&ratings, &missing).is_err());
    }

    #[test]
    fn test_close_rating_period() {
        let calculator = Glicko2Calculator::default();
        let mut ratings = HashMap::new();
        ratings.insert("a".to_string(), Rating::new(1500.0, 200.0, 0.06));
        ratings.insert("b".to_string(), Rating::new(1500.0, 200.0, 0.06));
        ratings.insert("idle".to_string(), Rating::new(1500.0, 200.0, 0.06));
        let results = vec![GameResult::new(1, "a", "b", Outcome::Win)];

        let updates = close_rating_period(&calculator, &ratings, &results).unwrap();
        assert_eq!(updates.len(), 3);
        assert!(updates["a"].rating_delta > 0.0);
        assert!(updates["b"].rating_delta < 0.0);
        assert_eq!(updates["idle"].rating_delta, 0.0);
        assert!(updates["idle"].deviation_delta > 0.0);
    }
}
