//! End-of-reign assessment.

use serde::{Deserialize, Serialize};
use sim_core::{ReignState, ScoreThresholds, TierBound};

/// Final classification of a reign, worst first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Terrible,
    Mediocre,
    Good,
    Excellent,
}

impl Tier {
    /// One-line judgement shown to the ruler.
    pub fn verdict(self) -> &'static str {
        match self {
            Tier::Terrible => "Terrible: you were driven out of the city.",
            Tier::Mediocre => "Mediocre: your rule was harsh, but the city survived.",
            Tier::Good => "Good: you managed the city fairly well.",
            Tier::Excellent => "Excellent: outstanding rule!",
        }
    }
}

/// Scored outcome of a completed reign.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Mean of the per-year starved percentages (P).
    pub average_starved_percent: f64,
    /// Acres owned per citizen at the end (L).
    pub acres_per_citizen: f64,
    pub tier: Tier,
}

/// Score the reign: the first tier whose P and L conditions both hold wins.
pub fn assess(state: &ReignState, thresholds: &ScoreThresholds) -> Assessment {
    let average_starved_percent = if state.years_completed > 0 {
        state.starvation_percent_sum / f64::from(state.years_completed)
    } else {
        0.0
    };
    let acres_per_citizen = if state.population > 0 {
        state.land as f64 / state.population as f64
    } else {
        0.0
    };
    let reached = |bound: &TierBound| {
        average_starved_percent > bound.starved_percent_above as f64
            && acres_per_citizen < bound.acres_per_citizen_below as f64
    };
    let tier = if reached(&thresholds.terrible) {
        Tier::Terrible
    } else if reached(&thresholds.mediocre) {
        Tier::Mediocre
    } else if reached(&thresholds.good) {
        Tier::Good
    } else {
        Tier::Excellent
    };
    Assessment {
        average_starved_percent,
        acres_per_citizen,
        tier,
    }
}
