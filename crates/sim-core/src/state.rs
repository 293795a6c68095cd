use serde::{Deserialize, Serialize};

use crate::{ensure, ReignParams, ValidationError};

/// Where the current year stands between its price draw and its resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearPhase {
    /// No land price has been drawn for `year` yet.
    #[default]
    PriceUnset,
    /// The price for `year` is drawn and shown; the ruler has not finished
    /// deciding. Resuming in this phase must not redraw the price.
    AwaitingDecisions,
}

impl YearPhase {
    pub fn is_awaiting_decisions(self) -> bool {
        self == YearPhase::AwaitingDecisions
    }
}

/// What happened in the last resolved year, for the next report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearReport {
    /// Citizens who died for lack of rations.
    pub starved: i64,
    /// Newcomers after clamping to the rules' bounds.
    pub immigrants: i64,
    /// Whether an epidemic halved the city.
    pub plague: bool,
    /// Bushels harvested per planted acre.
    pub yield_per_acre: i64,
    /// Total bushels harvested.
    pub harvest: i64,
    /// Bushels lost to rats.
    pub rats_ate: i64,
}

/// The whole progress of a reign. Copied wholesale on save and load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReignState {
    /// Year to be played next, starting at 1.
    pub year: u32,
    /// Living citizens; a resumable reign always has some.
    pub population: i64,
    /// Bushels in storage; fractional because seed cost is.
    pub grain: f64,
    /// Acres owned.
    pub land: i64,
    /// News of the last resolved year, shown in the next report.
    pub last_year: YearReport,
    /// Bushels per acre for `year`, valid once the phase left `PriceUnset`.
    pub land_price: i64,
    /// Whether the price for `year` has been drawn.
    pub phase: YearPhase,
    /// Years fully resolved so far; the divisor of the final average.
    pub years_completed: u32,
    /// Sum of each completed year's starved percentage.
    pub starvation_percent_sum: f64,
}

impl ReignState {
    /// Fresh reign at the coronation.
    pub fn new_game(params: &ReignParams) -> Self {
        Self {
            year: 1,
            population: params.initial_population,
            grain: params.initial_grain,
            land: params.initial_land,
            last_year: YearReport::default(),
            land_price: 0,
            phase: YearPhase::PriceUnset,
            years_completed: 0,
            starvation_percent_sum: 0.0,
        }
    }

    /// Whether this state may be resumed from a save.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure(self.year >= 1, "year", ">= 1", self.year)?;
        ensure(self.population > 0, "population", "> 0", self.population)?;
        ensure(self.land >= 0, "land", ">= 0", self.land)?;
        ensure(
            self.grain.is_finite() && self.grain >= 0.0,
            "grain",
            "finite and >= 0",
            self.grain,
        )?;
        Ok(())
    }
}
