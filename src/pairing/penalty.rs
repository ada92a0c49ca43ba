//! Candidate scoring for Swiss pairings
//!
//! Every possible pair is scored as the sum of a rematch term, a color term,
//! a score-gap term and a rating-gap term. Lower is better; an unrelaxed
//! rematch is infinitely expensive.

use crate::config::PairingOptions;
use crate::types::{FloatDirection, Player, StoneColor};

/// A scored, color-assigned pair of arena indices
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub black: usize,
    pub white: usize,
    pub penalty: f64,
    pub float: Option<FloatDirection>,
    pub float_player: Option<usize>,
}

/// Score pairing arena entries `a` (the lead) and `b`.
///
/// With `relaxed` unset, players who already met produce an infeasible
/// candidate. With it set, the rematch is allowed at the configured cost.
pub(crate) fn build_candidate(
    arena: &[&Player],
    a: usize,
    b: usize,
    options: &PairingOptions,
    relaxed: bool,
) -> Candidate {
    let (pa, pb) = (arena[a], arena[b]);

    let already_played = pa.has_played(&pb.id) || pb.has_played(&pa.id);
    if already_played && !relaxed {
        return Candidate {
            black: a,
            white: b,
            penalty: f64::INFINITY,
            float: None,
            float_player: None,
        };
    }
    let rematch = if already_played {
        options.rematch_penalty
    } else {
        0.0
    };

    let (a_is_black, color) = assign_colors(pa, pb, options);
    let score_gap = (pa.score - pb.score).abs() * options.score_gap_weight;
    let rating_gap = (pa.rating - pb.rating).abs() * options.rating_gap_weight;

    let float = float_direction(pa.score, pb.score);
    let float_player = float.map(|_| a);

    let (black, white) = if a_is_black { (a, b) } else { (b, a) };
    Candidate {
        black,
        white,
        penalty: rematch + color + score_gap + rating_gap,
        float,
        float_player,
    }
}

/// Pick the cheaper color assignment; ties give the first player black.
///
/// Returns whether `a` takes black and the combined color cost.
pub fn assign_colors(a: &Player, b: &Player, options: &PairingOptions) -> (bool, f64) {
    let a_black = color_penalty(&a.color_history, StoneColor::Black, options)
        + color_penalty(&b.color_history, StoneColor::White, options);
    let a_white = color_penalty(&a.color_history, StoneColor::White, options)
        + color_penalty(&b.color_history, StoneColor::Black, options);

    if a_black <= a_white {
        (true, a_black)
    } else {
        (false, a_white)
    }
}

/// Cost for a player with `history` to take `color` next.
pub fn color_penalty(history: &[StoneColor], color: StoneColor, options: &PairingOptions) -> f64 {
    if history.is_empty() {
        return 0.0;
    }

    let streak = trailing_streak(history, color);
    let blacks = history.iter().filter(|c| **c == StoneColor::Black).count() as f64;
    let bias = blacks - (history.len() as f64 - blacks);

    let mut penalty = if streak >= 2 {
        options.color_repeat_penalty * streak as f64
    } else {
        0.0
    };

    // Only the direction that widens the imbalance costs anything
    match color {
        StoneColor::Black if bias > 0.0 => penalty += bias,
        StoneColor::White if bias < 0.0 => penalty += bias.abs(),
        _ => {}
    }

    penalty
}

/// Number of games at the end of `history` played with `color`.
pub fn trailing_streak(history: &[StoneColor], color: StoneColor) -> usize {
    history.iter().rev().take_while(|c| **c == color).count()
}

/// Float recorded for the lead when the score gap exceeds half a point.
pub fn float_direction(lead_score: f64, other_score: f64) -> Option<FloatDirection> {
    if lead_score > other_score + 0.5 {
        Some(FloatDirection::Down)
    } else if other_score > lead_score + 0.5 {
        Some(FloatDirection::Up)
    } else {
        None
    }
}
