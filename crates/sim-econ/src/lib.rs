#![deny(warnings)]

//! Economic models for Throne: the per-year formulas behind harvest, rats,
//! famine, migration and plague, plus the dice that drive them and the
//! end-of-reign assessment.
//!
//! Everything here is pure given its inputs; randomness enters only through
//! [`Dice`].

pub mod dice;
pub mod score;

pub use dice::{Dice, ScriptedDice, SeededDice};
pub use score::{assess, Assessment, Tier};

/// Tolerance for comparisons between grain amounts and percentages.
pub const EPSILON: f64 = 1e-9;

/// Largest number of bushels rats may eat from `grain`: `floor(grain * fraction)`,
/// never negative.
pub fn rat_loss_cap(grain: f64, fraction: f64) -> i64 {
    let cap = (grain * fraction).floor();
    if cap.is_finite() && cap > 0.0 {
        cap as i64
    } else {
        0
    }
}

/// Famine figures for one year.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Famine {
    /// Citizens fully fed by the allotted grain.
    pub fed: i64,
    pub starved: i64,
    /// Starved share of the population, in percent.
    pub starved_percent: f64,
}

/// Who starves when `bushels_fed` is shared among `population` citizens who
/// each need `grain_per_person`. Only whole rations count.
pub fn famine(population: i64, bushels_fed: i64, grain_per_person: i64) -> Famine {
    let fed = if grain_per_person > 0 {
        bushels_fed / grain_per_person
    } else {
        0
    };
    let starved = (population - fed).max(0);
    let starved_percent = if population > 0 {
        100.0 * starved as f64 / population as f64
    } else {
        0.0
    };
    Famine {
        fed,
        starved,
        starved_percent,
    }
}

/// Whether `starved_percent` exceeds the overthrow fraction (given in `(0, 1]`).
pub fn overthrows(starved_percent: f64, loss_fraction: f64) -> bool {
    starved_percent > loss_fraction * 100.0 + EPSILON
}

/// Arrivals for the year, clamped into `[min, max]`.
///
/// Starvation draws half as many newcomers as it killed; poor yields with
/// grain left over draw more.
pub fn immigrants(starved: i64, yield_per_acre: i64, grain: f64, min: i64, max: i64) -> i64 {
    let raw = (starved as f64 / 2.0 + (5.0 - yield_per_acre as f64) * (grain / 600.0) + 1.0).floor();
    let raw = if raw.is_finite() { raw as i64 } else { min };
    raw.clamp(min, max)
}

/// Population left after an epidemic halves it.
pub fn plague_survivors(population: i64) -> i64 {
    population.div_euclid(2)
}
