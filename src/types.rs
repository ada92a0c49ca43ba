//! Common types used throughout the tournament engines

use serde::{Deserialize, Serialize};
use skillratings::glicko2::Glicko2Rating;
use std::collections::BTreeSet;

/// Unique identifier for players within a roster
pub type PlayerId = String;

/// Opponent id recorded in a player's history when they received a bye
pub const BYE_SENTINEL: &str = "BYE";

/// Stone color a player held in a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoneColor {
    Black,
    White,
}

impl StoneColor {
    pub fn opposite(self) -> Self {
        match self {
            StoneColor::Black => StoneColor::White,
            StoneColor::White => StoneColor::Black,
        }
    }
}

impl std::fmt::Display for StoneColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoneColor::Black => write!(f, "black"),
            StoneColor::White => write!(f, "white"),
        }
    }
}

/// Direction a player moved across a score group boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatDirection {
    Up,
    Down,
}

fn default_eligible() -> bool {
    true
}

/// Roster entry handed to the pairing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub score: f64,
    pub rating: f64,
    /// Ids of everyone this player has already faced, including [`BYE_SENTINEL`]
    #[serde(default)]
    pub opponents: BTreeSet<PlayerId>,
    /// Colors played so far, most recent last
    #[serde(default)]
    pub color_history: Vec<StoneColor>,
    /// `false` when the player sits this round out
    #[serde(default = "default_eligible", alias = "canPlay")]
    pub eligible: bool,
}

impl Player {
    /// Create an eligible player with no history
    pub fn new(id: impl Into<PlayerId>, score: f64, rating: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            score,
            rating,
            opponents: BTreeSet::new(),
            color_history: Vec::new(),
            eligible: true,
        }
    }

    pub fn has_played(&self, opponent: &str) -> bool {
        self.opponents.contains(opponent)
    }

    pub fn has_had_bye(&self) -> bool {
        self.has_played(BYE_SENTINEL)
    }
}

/// One table of a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    /// 1-based, contiguous within a round
    pub table: u32,
    pub black: PlayerId,
    pub white: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float: Option<FloatDirection>,
}

impl Pairing {
    pub fn involves(&self, player_id: &str) -> bool {
        self.black == player_id || self.white == player_id
    }

    pub fn color_of(&self, player_id: &str) -> Option<StoneColor> {
        if self.black == player_id {
            Some(StoneColor::Black)
        } else if self.white == player_id {
            Some(StoneColor::White)
        } else {
            None
        }
    }
}

/// Complete output of one round's pairing step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingResult {
    pub pairings: Vec<Pairing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bye: Option<PlayerId>,
    pub floated: Vec<PlayerId>,
    /// Sum of all candidate penalties; diagnostic only
    pub penalty: f64,
}

impl PairingResult {
    pub fn empty() -> Self {
        Self {
            pairings: Vec::new(),
            bye: None,
            floated: Vec::new(),
            penalty: 0.0,
        }
    }
}

/// Glicko-2 rating record on the external (1500-centered) scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rating: f64,
    pub deviation: f64,
    pub volatility: f64,
}

impl Rating {
    pub fn new(rating: f64, deviation: f64, volatility: f64) -> Self {
        Self {
            rating,
            deviation,
            volatility,
        }
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self {
            rating: 1500.0,
            deviation: 350.0,
            volatility: 0.06,
        }
    }
}

impl From<Glicko2Rating> for Rating {
    fn from(rating: Glicko2Rating) -> Self {
        Self {
            rating: rating.rating,
            deviation: rating.deviation,
            volatility: rating.volatility,
        }
    }
}

impl From<Rating> for Glicko2Rating {
    fn from(rating: Rating) -> Self {
        Self {
            rating: rating.rating,
            deviation: rating.deviation,
            volatility: rating.volatility,
        }
    }
}

/// Outcome of a single game from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Outcome {
    Loss,
    Draw,
    Win,
}

impl Outcome {
    pub fn score(self) -> f64 {
        match self {
            Outcome::Loss => 0.0,
            Outcome::Draw => 0.5,
            Outcome::Win => 1.0,
        }
    }

    /// The same game seen from the other side of the board
    pub fn reversed(self) -> Self {
        match self {
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
            Outcome::Win => Outcome::Loss,
        }
    }
}

impl TryFrom<f64> for Outcome {
    type Error = String;

    fn try_from(score: f64) -> std::result::Result<Self, Self::Error> {
        if score == 0.0 {
            Ok(Outcome::Loss)
        } else if score == 0.5 {
            Ok(Outcome::Draw)
        } else if score == 1.0 {
            Ok(Outcome::Win)
        } else {
            Err(format!("outcome score must be 0, 0.5 or 1, got {}", score))
        }
    }
}

impl From<Outcome> for f64 {
    fn from(outcome: Outcome) -> Self {
        outcome.score()
    }
}

fn default_weight() -> f64 {
    1.0
}

/// One game of a rating period, as seen by the player being rated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpponentResult {
    /// Opponent's rating at the time the game was played
    pub opponent: Rating,
    pub score: Outcome,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl OpponentResult {
    pub fn new(opponent: Rating, score: Outcome) -> Self {
        Self {
            opponent,
            score,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// New rating after a rating period plus the signed change from the input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingUpdate {
    #[serde(flatten)]
    pub rating: Rating,
    pub rating_delta: f64,
    pub deviation_delta: f64,
    pub volatility_delta: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_defaults_from_json() {
        let player: Player =
            serde_json::from_str(r#"{"id":"p1","score":1.5,"rating":1620}"#).unwrap();
        assert!(player.eligible);
        assert!(player.opponents.is_empty());
        assert!(player.color_history.is_empty());
        assert_eq!(player.name, None);
    }

    #[test]
    fn test_player_can_play_alias() {
        let player: Player = serde_json::from_str(
            r#"{"id":"p1","score":0,"rating":1500,"canPlay":false,"colorHistory":["black","white"],"opponents":["BYE"]}"#,
        )
        .unwrap();
        assert!(!player.eligible);
        assert!(player.has_had_bye());
        assert_eq!(
            player.color_history,
            vec![StoneColor::Black, StoneColor::White]
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let result: OpponentResult = serde_json::from_str(
            r#"{"opponent":{"rating":1400,"deviation":30,"volatility":0.06},"score":0.5}"#,
        )
        .unwrap();
        assert_eq!(result.score, Outcome::Draw);
        assert_eq!(result.weight, 1.0);

        let bad = serde_json::from_str::<OpponentResult>(
            r#"{"opponent":{"rating":1400,"deviation":30,"volatility":0.06},"score":0.7}"#,
        );
        assert!(bad.is_err());

        assert_eq!(serde_json::to_string(&Outcome::Win).unwrap(), "1.0");
    }

    #[test]
    fn test_outcome_reversed() {
        assert_eq!(Outcome::Win.reversed(), Outcome::Loss);
        assert_eq!(Outcome::Draw.reversed(), Outcome::Draw);
        assert_eq!(Outcome::Loss.reversed().score(), 1.0);
    }

    #[test]
    fn test_rating_update_flattens_rating() {
        let update = RatingUpdate {
            rating: Rating::new(1510.0, 190.0, 0.06),
            rating_delta: 10.0,
            deviation_delta: -10.0,
            volatility_delta: 0.0,
        };
        let json = serde_json::to_value(update).unwrap();
        assert_eq!(json["rating"], 1510.0);
        assert_eq!(json["ratingDelta"], 10.0);
        assert_eq!(json["deviationDelta"], -10.0);
    }

    #[test]
    fn test_glicko2_rating_conversion() {
        let rating = Rating::new(1600.0, 120.0, 0.05);
        let converted: Glicko2Rating = rating.into();
        assert_eq!(converted.rating, 1600.0);
        assert_eq!(Rating::from(converted), rating);
    }

    #[test]
    fn test_pairing_color_lookup() {
        let pairing = Pairing {
            table: 1,
            black: "a".to_string(),
            white: "b".to_string(),
            float: None,
        };
        assert_eq!(pairing.color_of("a"), Some(StoneColor::Black));
        assert_eq!(pairing.color_of("b"), Some(StoneColor::White));
        assert_eq!(pairing.color_of("c"), None);
        assert!(pairing.involves("b"));
        assert_eq!(StoneColor::Black.opposite(), StoneColor::White);
    }
}
