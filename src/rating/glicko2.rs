//! Glicko-2 rating period update
//!
//! Ratings are moved onto the internal scale (offset from the default rating
//! and divided by [`SCALE`]), updated once for the whole batch of games in
//! the period, and moved back. All games in one call are simultaneous.

use crate::config::Glicko2Config;
use crate::error::{EngineError, Result};
use crate::types::{OpponentResult, Rating, RatingUpdate};
use std::f64::consts::{LN_10, PI};
use tracing::trace;

/// Conversion factor between the external and internal scales
pub const SCALE: f64 = 173.7178;

/// Stop refining the volatility once the bracket is narrower than this
pub const CONVERGENCE_TOLERANCE: f64 = 1e-6;

/// Upper bound on bracketing steps and on refinement steps, each
pub const MAX_SOLVER_ITERATIONS: usize = 1000;

const Q: f64 = LN_10 / 400.0;

/// Rating used to center [`expected_score`], which only depends on the gap
const EXPECTED_SCORE_CENTER: f64 = 1500.0;

fn g(phi: f64) -> f64 {
    1.0 / (1.0 + (3.0 * Q.powi(2) * phi.powi(2)) / PI.powi(2)).sqrt()
}

fn e(mu: f64, mu_j: f64, phi_j: f64) -> f64 {
    1.0 / (1.0 + (-g(phi_j) * (mu - mu_j)).exp())
}

fn to_mu(rating: f64, default_rating: f64) -> f64 {
    (rating - default_rating) / SCALE
}

fn to_phi(deviation: f64) -> f64 {
    deviation / SCALE
}

fn from_mu(mu: f64, default_rating: f64) -> f64 {
    mu * SCALE + default_rating
}

fn from_phi(phi: f64) -> f64 {
    phi * SCALE
}

fn validate_rating(rating: &Rating, who: &str) -> Result<()> {
    if !rating.rating.is_finite() {
        return Err(EngineError::invalid_rating(format!("{} rating must be finite", who)).into());
    }
    if !(rating.deviation.is_finite() && rating.deviation > 0.0) {
        return Err(EngineError::invalid_rating(format!(
            "{} deviation must be positive, got {}",
            who, rating.deviation
        ))
        .into());
    }
    if !(rating.volatility.is_finite() && rating.volatility > 0.0) {
        return Err(EngineError::invalid_rating(format!(
            "{} volatility must be positive, got {}",
            who, rating.volatility
        ))
        .into());
    }
    Ok(())
}

/// Per-game quantities on the internal scale
struct GameSummary {
    g_phi: f64,
    expected: f64,
    score: f64,
    weight: f64,
}

/// Update `current` with one rating period's worth of games.
///
/// With no games only the deviation grows, to `sqrt(φ² + σ²)` on the
/// internal scale.
pub fn rate_player(
    current: &Rating,
    opponents: &[OpponentResult],
    config: &Glicko2Config,
) -> Result<RatingUpdate> {
    config.validate()?;
    validate_rating(current, "player")?;

    let mu = to_mu(current.rating, config.default_rating);
    let phi = to_phi(current.deviation);
    let sigma = current.volatility;

    if opponents.is_empty() {
        let deviation = from_phi((phi.powi(2) + sigma.powi(2)).sqrt());
        return Ok(RatingUpdate {
            rating: Rating {
                rating: current.rating,
                deviation,
                volatility: sigma,
            },
            rating_delta: 0.0,
            deviation_delta: deviation - current.deviation,
            volatility_delta: 0.0,
        });
    }

    let mut summaries = Vec::with_capacity(opponents.len());
    for result in opponents {
        validate_rating(&result.opponent, "opponent")?;
        if !(result.weight.is_finite() && result.weight > 0.0) {
            return Err(EngineError::invalid_rating(format!(
                "game weight must be positive, got {}",
                result.weight
            ))
            .into());
        }

        let mu_j = to_mu(result.opponent.rating, config.default_rating);
        let phi_j = to_phi(result.opponent.deviation);
        summaries.push(GameSummary {
            g_phi: g(phi_j),
            expected: e(mu, mu_j, phi_j),
            score: result.score.score(),
            weight: result.weight,
        });
    }

    let v = 1.0
        / summaries
            .iter()
            .map(|s| s.weight * s.g_phi.powi(2) * s.expected * (1.0 - s.expected))
            .sum::<f64>();
    let improvement: f64 = summaries
        .iter()
        .map(|s| s.weight * s.g_phi * (s.score - s.expected))
        .sum();
    let delta = v * improvement;

    let sigma_prime = solve_volatility(phi, delta, v, sigma, config.tau, MAX_SOLVER_ITERATIONS)?;
    let phi_star = (phi.powi(2) + sigma_prime.powi(2)).sqrt();
    let phi_prime = 1.0 / (1.0 / phi_star.powi(2) + 1.0 / v).sqrt();
    let mu_prime = mu + phi_prime.powi(2) * improvement;

    let rating = from_mu(mu_prime, config.default_rating);
    let deviation = from_phi(phi_prime);

    trace!(
        games = opponents.len(),
        rating, deviation, volatility = sigma_prime, "Rated player"
    );

    Ok(RatingUpdate {
        rating: Rating {
            rating,
            deviation,
            volatility: sigma_prime,
        },
        rating_delta: rating - current.rating,
        deviation_delta: deviation - current.deviation,
        volatility_delta: sigma_prime - sigma,
    })
}

/// Objective whose root is the log of the new squared volatility
fn f(x: f64, delta: f64, phi: f64, v: f64, a: f64, tau: f64) -> f64 {
    let ex = x.exp();
    let numerator = ex * (delta.powi(2) - phi.powi(2) - v - ex);
    let denominator = 2.0 * (phi.powi(2) + v + ex).powi(2);
    numerator / denominator - (x - a) / tau.powi(2)
}

/// Find the new volatility σ′ by the Illinois variant of regula falsi.
pub(crate) fn solve_volatility(
    phi: f64,
    delta: f64,
    v: f64,
    sigma: f64,
    tau: f64,
    max_iterations: usize,
) -> Result<f64> {
    let a = sigma.powi(2).ln();
    let mut big_a = a;
    let mut big_b;

    let gap = delta.powi(2) - phi.powi(2) - v;
    if gap > 0.0 {
        big_b = gap.ln();
    } else {
        let mut k = 1.0;
        loop {
            big_b = a - k * tau;
            if f(big_b, delta, phi, v, a, tau) >= 0.0 {
                break;
            }
            if k as usize >= max_iterations {
                return Err(EngineError::NumericDivergence {
                    iterations: max_iterations,
                }
                .into());
            }
            k += 1.0;
        }
    }

    let mut f_a = f(big_a, delta, phi, v, a, tau);
    let mut f_b = f(big_b, delta, phi, v, a, tau);

    let mut iterations = 0;
    while (big_b - big_a).abs() > CONVERGENCE_TOLERANCE {
        if iterations >= max_iterations {
            return Err(EngineError::NumericDivergence { iterations }.into());
        }
        iterations += 1;

        let big_c = big_a + (big_a - big_b) * f_a / (f_b - f_a);
        let f_c = f(big_c, delta, phi, v, a, tau);
        if f_c * f_b <= 0.0 {
            big_a = big_b;
            f_a = f_b;
        } else {
            f_a /= 2.0;
        }
        big_b = big_c;
        f_b = f_c;
    }

    Ok((big_a / 2.0).exp())
}

/// Inflate the deviation for a period the player sat out.
///
/// The deviation grows on the external scale and `volatility` replaces the
/// stored volatility; pass `current.volatility` to keep it.
pub fn advance_rating_period(current: &Rating, volatility: f64) -> Result<Rating> {
    validate_rating(current, "player")?;
    if !(volatility.is_finite() && volatility > 0.0) {
        return Err(EngineError::invalid_rating(format!(
            "volatility must be positive, got {}",
            volatility
        ))
        .into());
    }

    Ok(Rating {
        rating: current.rating,
        deviation: (current.deviation.powi(2) + volatility.powi(2)).sqrt(),
        volatility,
    })
}

/// Probability-like expected score of `player` against `opponent`.
pub fn expected_score(player: &Rating, opponent: &Rating) -> f64 {
    let mu = to_mu(player.rating, EXPECTED_SCORE_CENTER);
    let mu_j = to_mu(opponent.rating, EXPECTED_SCORE_CENTER);
    e(mu, mu_j, to_phi(opponent.deviation))
}
