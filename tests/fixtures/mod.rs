//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use tournament_engine::types::{PairingResult, Player, StoneColor, BYE_SENTINEL};

/// Player with a given standing and no history
pub fn player(id: &str, score: f64, rating: f64) -> Player {
    Player::new(id, score, rating)
}

/// `count` fresh players with distinct, descending ratings
pub fn fresh_roster(count: usize) -> Vec<Player> {
    (0..count)
        .map(|i| player(&format!("p{}", i + 1), 0.0, 1800.0 - i as f64 * 25.0))
        .collect()
}

/// Record that `a` and `b` have already met
pub fn mark_played(roster: &mut [Player], a: &str, b: &str) {
    for p in roster.iter_mut() {
        if p.id == a {
            p.opponents.insert(b.to_string());
        } else if p.id == b {
            p.opponents.insert(a.to_string());
        }
    }
}

pub fn mark_bye(roster: &mut [Player], id: &str) {
    if let Some(p) = roster.iter_mut().find(|p| p.id == id) {
        p.opponents.insert(BYE_SENTINEL.to_string());
    }
}

pub fn set_colors(roster: &mut [Player], id: &str, colors: &[StoneColor]) {
    if let Some(p) = roster.iter_mut().find(|p| p.id == id) {
        p.color_history = colors.to_vec();
    }
}

/// Assert the structural invariants every pairing result must satisfy
pub fn assert_well_formed(roster: &[Player], result: &PairingResult) {
    let eligible: HashSet<&str> = roster
        .iter()
        .filter(|p| p.eligible)
        .map(|p| p.id.as_str())
        .collect();

    let mut seen = HashSet::new();
    for (index, pairing) in result.pairings.iter().enumerate() {
        assert_eq!(pairing.table as usize, index + 1, "tables must be contiguous");
        assert_ne!(pairing.black, pairing.white, "player paired with itself");
        assert!(seen.insert(pairing.black.clone()), "{} paired twice", pairing.black);
        assert!(seen.insert(pairing.white.clone()), "{} paired twice", pairing.white);
        assert!(eligible.contains(pairing.black.as_str()));
        assert!(eligible.contains(pairing.white.as_str()));
    }

    if let Some(bye) = &result.bye {
        assert!(seen.insert(bye.clone()), "bye player also paired");
        assert!(eligible.contains(bye.as_str()));
    }

    assert_eq!(seen.len(), eligible.len(), "every eligible player placed once");
    assert_eq!(result.bye.is_some(), eligible.len() % 2 == 1);
}
