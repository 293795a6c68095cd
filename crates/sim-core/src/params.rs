use serde::{Deserialize, Serialize};

use crate::kv::{parse_kv, KvMap};
use crate::{ensure, ValidationError};

/// One scoring tier: reached when the average starved percent is above
/// `starved_percent_above` and land per citizen is below
/// `acres_per_citizen_below`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBound {
    pub starved_percent_above: i64,
    pub acres_per_citizen_below: i64,
}

/// Final assessment thresholds, from the harshest tier to the mildest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    pub terrible: TierBound,
    pub mediocre: TierBound,
    pub good: TierBound,
}

/// Tunable constants for a reign. Immutable once validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReignParams {
    /// Citizens at the coronation (> 0).
    pub initial_population: i64,
    /// Bushels in storage at the coronation (>= 0).
    pub initial_grain: f64,
    /// Acres owned at the coronation (>= 0).
    pub initial_land: i64,
    /// Cheapest land price per acre (> 0).
    pub land_price_min: i64,
    /// Dearest land price per acre (>= min).
    pub land_price_max: i64,
    /// Bushels one citizen eats per year (> 0).
    pub grain_per_person: i64,
    /// Acres one citizen can work (> 0).
    pub acres_per_person: i64,
    /// Seed bushels needed per planted acre (> 0).
    pub seed_per_acre: f64,
    /// Worst harvest yield per acre (> 0).
    pub yield_min: i64,
    /// Best harvest yield per acre (>= min).
    pub yield_max: i64,
    /// Largest fraction of stored grain rats can eat, in [0, 1].
    pub rats_max_fraction: f64,
    /// Chance of an epidemic in any year, in [0, 1].
    pub plague_probability: f64,
    /// Fewest arrivals per year (>= 0).
    pub immigrants_min: i64,
    /// Most arrivals per year (>= min).
    pub immigrants_max: i64,
    /// Fraction of citizens starving in one year that ends the reign, in (0, 1].
    pub starvation_loss_fraction: f64,
    /// Length of the reign in years (> 0).
    pub total_years: u32,
    pub thresholds: ScoreThresholds,
}

impl ReignParams {
    /// Parse a rules file body and validate it.
    ///
    /// Every recognized key is required; unknown keys are ignored.
    pub fn from_rules_text(text: &str) -> Result<Self, ValidationError> {
        Self::from_kv(&parse_kv(text))
    }

    pub fn from_kv(kv: &KvMap) -> Result<Self, ValidationError> {
        let params = Self {
            initial_population: kv.int("initial_population")?,
            initial_grain: kv.decimal("initial_wheat")?,
            initial_land: kv.int("initial_city_size")?,
            land_price_min: kv.int("land_price_min")?,
            land_price_max: kv.int("land_price_max")?,
            grain_per_person: kv.int("resident_consumption")?,
            acres_per_person: kv.int("resident_efficiency")?,
            seed_per_acre: kv.decimal("seeds_consumption")?,
            yield_min: kv.int("land_efficiency_min")?,
            yield_max: kv.int("land_efficiency_max")?,
            rats_max_fraction: kv.decimal("rats_consumption_rate_max")?,
            plague_probability: kv.decimal("plague_probability")?,
            immigrants_min: kv.int("arrivals_number_min")?,
            immigrants_max: kv.int("arrivals_number_max")?,
            starvation_loss_fraction: kv.decimal("death_percentage_for_loss")?,
            total_years: kv.count("rounds_number")?,
            thresholds: ScoreThresholds {
                terrible: TierBound {
                    starved_percent_above: kv.int("dead_percentage_lower_limit_bad")?,
                    acres_per_citizen_below: kv.int("lands_per_resident_bad")?,
                },
                mediocre: TierBound {
                    starved_percent_above: kv.int("dead_percentage_lower_limit_ok")?,
                    acres_per_citizen_below: kv.int("lands_per_resident_ok")?,
                },
                good: TierBound {
                    starved_percent_above: kv.int("dead_percentage_lower_limit_good")?,
                    acres_per_citizen_below: kv.int("lands_per_resident_good")?,
                },
            },
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every field against its permitted range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let p = self;
        ensure(
            p.initial_population > 0,
            "initial_population",
            "> 0",
            p.initial_population,
        )?;
        ensure(
            p.initial_grain.is_finite() && p.initial_grain >= 0.0,
            "initial_wheat",
            "finite and >= 0",
            p.initial_grain,
        )?;
        ensure(p.initial_land >= 0, "initial_city_size", ">= 0", p.initial_land)?;
        ensure(p.land_price_min > 0, "land_price_min", "> 0", p.land_price_min)?;
        ensure(
            p.land_price_max >= p.land_price_min,
            "land_price_max",
            ">= land_price_min",
            p.land_price_max,
        )?;
        ensure(
            p.grain_per_person > 0,
            "resident_consumption",
            "> 0",
            p.grain_per_person,
        )?;
        ensure(
            p.acres_per_person > 0,
            "resident_efficiency",
            "> 0",
            p.acres_per_person,
        )?;
        ensure(
            p.seed_per_acre.is_finite() && p.seed_per_acre > 0.0,
            "seeds_consumption",
            "finite and > 0",
            p.seed_per_acre,
        )?;
        ensure(p.yield_min > 0, "land_efficiency_min", "> 0", p.yield_min)?;
        ensure(
            p.yield_max >= p.yield_min,
            "land_efficiency_max",
            ">= land_efficiency_min",
            p.yield_max,
        )?;
        ensure(
            (0.0..=1.0).contains(&p.rats_max_fraction),
            "rats_consumption_rate_max",
            "within [0, 1]",
            p.rats_max_fraction,
        )?;
        ensure(
            (0.0..=1.0).contains(&p.plague_probability),
            "plague_probability",
            "within [0, 1]",
            p.plague_probability,
        )?;
        ensure(
            p.immigrants_min >= 0,
            "arrivals_number_min",
            ">= 0",
            p.immigrants_min,
        )?;
        ensure(
            p.immigrants_max >= p.immigrants_min,
            "arrivals_number_max",
            ">= arrivals_number_min",
            p.immigrants_max,
        )?;
        ensure(
            p.starvation_loss_fraction > 0.0 && p.starvation_loss_fraction <= 1.0,
            "death_percentage_for_loss",
            "within (0, 1]",
            p.starvation_loss_fraction,
        )?;
        ensure(p.total_years > 0, "rounds_number", "> 0", p.total_years)?;
        let tiers = [
            ("terrible", p.thresholds.terrible),
            ("mediocre", p.thresholds.mediocre),
            ("good", p.thresholds.good),
        ];
        for (name, tier) in tiers {
            ensure(
                tier.starved_percent_above >= 0 && tier.acres_per_citizen_below >= 0,
                "score threshold",
                ">= 0",
                format!("{name} ({}, {})", tier.starved_percent_above, tier.acres_per_citizen_below),
            )?;
        }
        Ok(())
    }
}
