//! Year resolution: the land price draw, then harvest, rats, famine,
//! migration and plague once the ruler's orders are in.

use serde::{Deserialize, Serialize};
use sim_core::{ReignParams, ReignState, YearPhase, YearReport};
use sim_econ::{famine, immigrants, overthrows, plague_survivors, rat_loss_cap, Dice};
use tracing::{debug, info};

use crate::decisions::{apply_decisions, DecisionError, Decisions};

/// How a city can end up empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extinction {
    Starvation,
    Plague,
}

/// Result of settling one year.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum YearOutcome {
    /// The year was committed and `state.year` moved on.
    Continued,
    /// Too many starved; the ruler is driven out. Year and population are
    /// left as they were.
    Overthrown { starved_percent: f64 },
    Extinct(Extinction),
}

/// Draw this year's land price unless one is already on offer.
///
/// Returns `true` when a new price was drawn.
pub fn begin_year<D: Dice + ?Sized>(state: &mut ReignState, params: &ReignParams, dice: &mut D) -> bool {
    if state.phase.is_awaiting_decisions() {
        return false;
    }
    state.land_price = dice.roll(params.land_price_min, params.land_price_max);
    state.phase = YearPhase::AwaitingDecisions;
    debug!(year = state.year, price = state.land_price, "land price drawn");
    true
}

/// Let nature take its course after the orders were applied.
pub fn settle_year<D: Dice + ?Sized>(
    state: &mut ReignState,
    params: &ReignParams,
    decisions: &Decisions,
    dice: &mut D,
) -> YearOutcome {
    let yield_per_acre = dice.roll(params.yield_min, params.yield_max);
    let harvest = decisions.acres_planted.saturating_mul(yield_per_acre);
    state.grain += harvest as f64;

    let cap = rat_loss_cap(state.grain, params.rats_max_fraction);
    let rats_ate = if cap > 0 { dice.roll(0, cap) } else { 0 };
    state.grain = (state.grain - rats_ate as f64).max(0.0);

    let hunger = famine(state.population, decisions.bushels_fed, params.grain_per_person);
    let mut report = YearReport {
        starved: hunger.starved,
        immigrants: 0,
        plague: false,
        yield_per_acre,
        harvest,
        rats_ate,
    };
    if overthrows(hunger.starved_percent, params.starvation_loss_fraction) {
        state.last_year = report;
        info!(
            year = state.year,
            starved = hunger.starved,
            percent = hunger.starved_percent,
            "ruler overthrown"
        );
        return YearOutcome::Overthrown {
            starved_percent: hunger.starved_percent,
        };
    }

    state.population -= hunger.starved;
    if state.population <= 0 {
        state.population = 0;
        state.last_year = report;
        info!(year = state.year, "city starved out");
        return YearOutcome::Extinct(Extinction::Starvation);
    }

    report.immigrants = immigrants(
        hunger.starved,
        yield_per_acre,
        state.grain,
        params.immigrants_min,
        params.immigrants_max,
    );
    state.population += report.immigrants;

    if dice.chance(params.plague_probability) {
        report.plague = true;
        state.population = plague_survivors(state.population);
        if state.population <= 0 {
            state.population = 0;
            state.last_year = report;
            info!(year = state.year, "plague emptied the city");
            return YearOutcome::Extinct(Extinction::Plague);
        }
    }

    state.last_year = report;
    state.years_completed += 1;
    state.starvation_percent_sum += hunger.starved_percent;
    state.year += 1;
    info!(
        year = state.year - 1,
        population = state.population,
        grain = state.grain,
        land = state.land,
        "year committed"
    );
    YearOutcome::Continued
}

/// Play a whole year without a console: price, orders, outcome.
///
/// Rejected orders leave `state` untouched apart from a freshly drawn price.
pub fn resolve_year<D: Dice + ?Sized>(
    state: &mut ReignState,
    params: &ReignParams,
    decisions: &Decisions,
    dice: &mut D,
) -> Result<YearOutcome, DecisionError> {
    begin_year(state, params, dice);
    apply_decisions(state, params, decisions)?;
    Ok(settle_year(state, params, decisions, dice))
}
