//! The reign loop: year after year until the throne is lost, left or served out.

use persistence::SaveSlot;
use serde::Serialize;
use sim_core::{ReignParams, ReignState};
use sim_econ::{assess, Assessment, Dice};
use tracing::{info, warn};

use crate::console::{Console, InputClosed};
use crate::decisions::collect_decisions;
use crate::report::{assessment_report, year_report};
use crate::year::{begin_year, settle_year, Extinction, YearOutcome};

/// How a reign finished.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReignEnd {
    /// Every year was played and the reign was scored.
    Completed(Assessment),
    /// The ruler left at a year start; the save is kept for later.
    SavedAndQuit,
    /// The ruler walked away without saving.
    Abandoned,
    Overthrown { starved_percent: f64 },
    Extinct { cause: Extinction },
}

/// What the ruler chose at the start of a year.
enum YearStart {
    Continue,
    SaveAndQuit,
    Abandon,
}

/// Resume the saved reign if there is one and the ruler wants it, otherwise
/// start afresh.
pub fn open_reign<C, S>(params: &ReignParams, console: &mut C, slot: &S) -> Result<ReignState, InputClosed>
where
    C: Console + ?Sized,
    S: SaveSlot + ?Sized,
{
    if let Some(saved) = slot.load() {
        if console.ask_yes_no("A saved game was found. Continue? (Y/N): ")? {
            info!(year = saved.year, "resuming saved reign");
            return Ok(saved);
        }
    }
    info!("new reign");
    Ok(ReignState::new_game(params))
}

fn offer_break<C: Console + ?Sized>(console: &mut C) -> Result<YearStart, InputClosed> {
    console.say("");
    console.say("At the start of the year you may quit and save your progress.");
    let answer = console.read_line("Save and quit? (Y/N, A = abandon, empty = N): ")?;
    match answer.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('y' | 's') => Ok(YearStart::SaveAndQuit),
        Some('a' | 'q') => {
            if console.ask_yes_no("Abandon this reign? It cannot be resumed. (Y/N): ")? {
                Ok(YearStart::Abandon)
            } else {
                Ok(YearStart::Continue)
            }
        }
        _ => Ok(YearStart::Continue),
    }
}

fn persist<S: SaveSlot + ?Sized>(slot: &mut S, state: &ReignState) {
    if let Err(e) = slot.store(state) {
        warn!(error = %e, "could not save progress");
    }
}

fn discard<S: SaveSlot + ?Sized>(slot: &mut S) {
    if let Err(e) = slot.clear() {
        warn!(error = %e, "could not remove save");
    }
}

fn say_all<C: Console + ?Sized>(console: &mut C, lines: &[String]) {
    for line in lines {
        console.say(line);
    }
}

/// Play `state` to the end.
///
/// Progress is saved after every fresh price draw and every completed year.
/// Only [`ReignEnd::SavedAndQuit`] leaves a save behind. When input ends the
/// slot keeps whatever was last saved.
pub fn run_reign<C, D, S>(
    state: &mut ReignState,
    params: &ReignParams,
    console: &mut C,
    dice: &mut D,
    slot: &mut S,
) -> Result<ReignEnd, InputClosed>
where
    C: Console + ?Sized,
    D: Dice + ?Sized,
    S: SaveSlot + ?Sized,
{
    while state.year <= params.total_years {
        if begin_year(state, params, dice) {
            persist(slot, state);
        }
        say_all(console, &year_report(state));

        match offer_break(console)? {
            YearStart::Continue => {}
            YearStart::SaveAndQuit => {
                persist(slot, state);
                console.say("Progress saved. See you!");
                info!(year = state.year, "saved and quit");
                return Ok(ReignEnd::SavedAndQuit);
            }
            YearStart::Abandon => {
                discard(slot);
                console.say("You leave the throne. The reign is over.");
                info!(year = state.year, "reign abandoned");
                return Ok(ReignEnd::Abandoned);
            }
        }

        let decisions = collect_decisions(console, state, params)?;
        match settle_year(state, params, &decisions, dice) {
            YearOutcome::Continued => persist(slot, state),
            YearOutcome::Overthrown { starved_percent } => {
                discard(slot);
                console.say("");
                console.say(&format!(
                    "{} people starved to death this year ({starved_percent:.1}% of the population).",
                    state.last_year.starved
                ));
                // Rounded: 0.29 * 100 is a hair below 29 in binary.
                console.say(&format!(
                    "More than {:.0}% of the population starved. You have been overthrown.",
                    params.starvation_loss_fraction * 100.0
                ));
                return Ok(ReignEnd::Overthrown { starved_percent });
            }
            YearOutcome::Extinct(cause) => {
                discard(slot);
                console.say("");
                console.say(match cause {
                    Extinction::Starvation => "All people have died. Game over.",
                    Extinction::Plague => "The plague wiped everyone out. Game over.",
                });
                return Ok(ReignEnd::Extinct { cause });
            }
        }
    }

    let assessment = assess(state, &params.thresholds);
    say_all(console, &assessment_report(&assessment));
    discard(slot);
    info!(tier = ?assessment.tier, "reign completed");
    Ok(ReignEnd::Completed(assessment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::LineConsole;
    use crate::testing::rules;
    use persistence::MemorySlot;
    use sim_core::YearPhase;
    use sim_econ::{ScriptedDice, Tier};
    use std::io::Cursor;

    fn console(input: &str) -> LineConsole<Cursor<Vec<u8>>, Vec<u8>> {
        LineConsole::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn fresh_slot_starts_a_new_reign_without_asking() {
        let params = rules();
        let mut c = console("");
        let state = open_reign(&params, &mut c, &MemorySlot::new()).unwrap();
        assert_eq!(state, ReignState::new_game(&params));
        assert!(c.into_output().is_empty());
    }

    #[test]
    fn declined_save_is_a_new_reign() {
        let params = rules();
        let mut saved = ReignState::new_game(&params);
        saved.year = 4;
        let mut slot = MemorySlot::new();
        slot.store(&saved).unwrap();

        let mut c = console("n\n");
        assert_eq!(open_reign(&params, &mut c, &slot).unwrap().year, 1);
        let mut c = console("y\n");
        assert_eq!(open_reign(&params, &mut c, &slot).unwrap(), saved);
    }

    #[test]
    fn abandoning_needs_confirmation() {
        let params = rules();
        let mut state = ReignState::new_game(&params);
        let mut slot = MemorySlot::new();
        let mut dice = ScriptedDice::new([20], []);
        // Change of heart, then play on until input ends at the first order.
        let mut c = console("a\nn\n");
        let end = run_reign(&mut state, &params, &mut c, &mut dice, &mut slot);
        assert_eq!(end, Err(InputClosed));
        assert!(slot.text().is_some());

        let mut c = console("q\ny\n");
        let end = run_reign(&mut state, &params, &mut c, &mut dice, &mut slot).unwrap();
        assert_eq!(end, ReignEnd::Abandoned);
        assert_eq!(slot.text(), None);
    }

    #[test]
    fn save_and_quit_keeps_the_offered_price() {
        let params = rules();
        let mut state = ReignState::new_game(&params);
        let mut slot = MemorySlot::new();
        let mut dice = ScriptedDice::new([23], []);
        let end = run_reign(&mut state, &params, &mut console("s\n"), &mut dice, &mut slot).unwrap();
        assert_eq!(end, ReignEnd::SavedAndQuit);
        let saved = slot.load().unwrap();
        assert_eq!(saved.phase, YearPhase::AwaitingDecisions);
        assert_eq!(saved.land_price, 23);
    }

    #[test]
    fn served_out_reign_is_scored() {
        let mut params = rules();
        params.total_years = 1;
        let mut state = ReignState::new_game(&params);
        let mut slot = MemorySlot::new();
        let mut dice = ScriptedDice::new([20, 3, 0], [false]);
        let mut c = console("\n0\n0\n2000\n0\n");
        let end = run_reign(&mut state, &params, &mut c, &mut dice, &mut slot).unwrap();
        match end {
            ReignEnd::Completed(a) => {
                assert_eq!(a.average_starved_percent, 0.0);
                assert_eq!(a.tier, Tier::Excellent);
            }
            other => panic!("unexpected end: {other:?}"),
        }
        assert_eq!(slot.text(), None);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("Summary of your rule"));
    }

    #[test]
    fn overthrow_names_the_rounded_limit() {
        let mut params = rules();
        params.starvation_loss_fraction = 0.29;
        let mut state = ReignState::new_game(&params);
        let mut slot = MemorySlot::new();
        let mut dice = ScriptedDice::new([20, 2, 0], []);
        let mut c = console("\n0\n0\n0\n0\n");
        let end = run_reign(&mut state, &params, &mut c, &mut dice, &mut slot).unwrap();
        assert!(matches!(end, ReignEnd::Overthrown { .. }));
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("More than 29% of the population starved. You have been overthrown."));
    }

    #[test]
    fn outcomes_serialize_with_a_tag() {
        let json = serde_json::to_string(&ReignEnd::Extinct {
            cause: Extinction::Plague,
        })
        .unwrap();
        assert_eq!(json, r#"{"outcome":"extinct","cause":"plague"}"#);
        let json = serde_json::to_string(&ReignEnd::SavedAndQuit).unwrap();
        assert_eq!(json, r#"{"outcome":"saved_and_quit"}"#);
    }
}
