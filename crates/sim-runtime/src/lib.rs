#![deny(warnings)]

//! Runtime for Throne: the console conversation, the ruler's orders, year
//! resolution and the reign loop that ties them to a save slot.
//!
//! Randomness comes in through [`sim_econ::Dice`] and persistence through
//! [`persistence::SaveSlot`], so a whole reign can be replayed headless.

pub mod console;
pub mod decisions;
pub mod reign;
pub mod report;
pub mod year;

pub use console::{Console, InputClosed, LineConsole};
pub use decisions::{apply_decisions, collect_decisions, DecisionError, Decisions};
pub use reign::{open_reign, run_reign, ReignEnd};
pub use report::{assessment_report, format_grain, year_report};
pub use year::{begin_year, resolve_year, settle_year, Extinction, YearOutcome};
