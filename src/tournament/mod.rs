//! Round close-out between the two engines
//!
//! Helpers that turn a round's pairings and game results into the next
//! round's roster and into one rating period's inputs. Nothing here keeps
//! state; the caller persists what comes back.

pub mod round;

pub use round::{
    apply_round, close_rating_period, rating_period_inputs, GameResult, RoundScoring,
};
