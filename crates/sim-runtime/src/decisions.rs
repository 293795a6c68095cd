//! The ruler's yearly orders: land trade, rations and sowing.
//!
//! Each order is checked against the city as it stands after the previous
//! one, so selling land can pay for rations and rations compete with seed.

use serde::{Deserialize, Serialize};
use sim_core::{ReignParams, ReignState, YearPhase};
use sim_econ::EPSILON;
use thiserror::Error;
use tracing::debug;

use crate::console::{Console, InputClosed};
use crate::report::format_grain;

/// Orders for one year. Land is either bought or sold, never both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decisions {
    pub acres_bought: i64,
    pub acres_sold: i64,
    pub bushels_fed: i64,
    pub acres_planted: i64,
}

/// Why an order cannot be carried out. The message is shown before asking again.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecisionError {
    #[error("Not enough grain to buy that much land. Needed {}, in storage {}.", bushels(.needed), bushels(.available))]
    LandTooDear { needed: f64, available: f64 },
    #[error("The realm cannot hold that much land. You own {owned} acres.")]
    TooMuchLand { owned: i64 },
    #[error("You don't have that much land. You own {owned} acres.")]
    NotEnoughLandToSell { owned: i64 },
    #[error("You have only {} bushels in storage.", bushels(.available))]
    NotEnoughGrain { available: f64 },
    #[error("You have only {owned} acres.")]
    NotEnoughLandToPlant { owned: i64 },
    #[error("Your people can work at most {workable} acres.")]
    NotEnoughWorkers { workable: i64 },
    #[error("Not enough grain for seed. Needed {}, in storage {}.", bushels(.needed), bushels(.available))]
    NotEnoughSeed { needed: f64, available: f64 },
    #[error("Land can be bought or sold in a year, not both.")]
    BuyAndSell,
    #[error("Orders must be whole numbers >= 0.")]
    Negative,
}

fn bushels(amount: &f64) -> String {
    format_grain(*amount)
}

pub fn check_purchase(state: &ReignState, acres: i64) -> Result<(), DecisionError> {
    if state.land.checked_add(acres).is_none() {
        return Err(DecisionError::TooMuchLand { owned: state.land });
    }
    let needed = acres as f64 * state.land_price as f64;
    if needed <= state.grain + EPSILON {
        Ok(())
    } else {
        Err(DecisionError::LandTooDear {
            needed,
            available: state.grain,
        })
    }
}

pub fn check_sale(state: &ReignState, acres: i64) -> Result<(), DecisionError> {
    if acres <= state.land {
        Ok(())
    } else {
        Err(DecisionError::NotEnoughLandToSell { owned: state.land })
    }
}

pub fn check_rations(state: &ReignState, bushels: i64) -> Result<(), DecisionError> {
    if bushels as f64 <= state.grain + EPSILON {
        Ok(())
    } else {
        Err(DecisionError::NotEnoughGrain {
            available: state.grain,
        })
    }
}

/// Planting is limited by land, by hands to work it, and by seed.
pub fn check_planting(
    state: &ReignState,
    params: &ReignParams,
    acres: i64,
) -> Result<(), DecisionError> {
    if acres > state.land {
        return Err(DecisionError::NotEnoughLandToPlant { owned: state.land });
    }
    let workable = state.population.saturating_mul(params.acres_per_person);
    if acres > workable {
        return Err(DecisionError::NotEnoughWorkers { workable });
    }
    let needed = acres as f64 * params.seed_per_acre;
    if needed > state.grain + EPSILON {
        return Err(DecisionError::NotEnoughSeed {
            needed,
            available: state.grain,
        });
    }
    Ok(())
}

fn trade_land(state: &mut ReignState, bought: i64, sold: i64) {
    let price = state.land_price as f64;
    state.land += bought - sold;
    state.grain = (state.grain - bought as f64 * price + sold as f64 * price).max(0.0);
}

fn hand_out_rations(state: &mut ReignState, bushels: i64) {
    state.grain = (state.grain - bushels as f64).max(0.0);
}

fn sow(state: &mut ReignState, params: &ReignParams, acres: i64) {
    state.grain = (state.grain - acres as f64 * params.seed_per_acre).max(0.0);
}

/// Carry out a full set of orders, or nothing at all.
///
/// Checks run in the same order as the interactive prompts. On success the
/// year leaves [`YearPhase::AwaitingDecisions`].
pub fn apply_decisions(
    state: &mut ReignState,
    params: &ReignParams,
    d: &Decisions,
) -> Result<(), DecisionError> {
    if d.acres_bought < 0 || d.acres_sold < 0 || d.bushels_fed < 0 || d.acres_planted < 0 {
        return Err(DecisionError::Negative);
    }
    if d.acres_bought > 0 && d.acres_sold > 0 {
        return Err(DecisionError::BuyAndSell);
    }
    let mut next = state.clone();
    check_purchase(&next, d.acres_bought)?;
    check_sale(&next, d.acres_sold)?;
    trade_land(&mut next, d.acres_bought, d.acres_sold);
    check_rations(&next, d.bushels_fed)?;
    hand_out_rations(&mut next, d.bushels_fed);
    check_planting(&next, params, d.acres_planted)?;
    sow(&mut next, params, d.acres_planted);
    next.phase = YearPhase::PriceUnset;
    *state = next;
    debug!(?d, "orders applied");
    Ok(())
}

fn ask_until<C: Console + ?Sized>(
    console: &mut C,
    prompt: &str,
    check: impl Fn(i64) -> Result<(), DecisionError>,
) -> Result<i64, InputClosed> {
    loop {
        let n = console.ask_count(prompt)?;
        match check(n) {
            Ok(()) => return Ok(n),
            Err(e) => console.say(&e.to_string()),
        }
    }
}

/// Ask for this year's orders, applying each one as soon as it is accepted.
///
/// Selling is only offered when nothing was bought.
pub fn collect_decisions<C: Console + ?Sized>(
    console: &mut C,
    state: &mut ReignState,
    params: &ReignParams,
) -> Result<Decisions, InputClosed> {
    console.say("");
    console.say("What do you wish to do this year?");

    let acres_bought = ask_until(console, "How many acres do you wish to buy? ", |n| {
        check_purchase(state, n)
    })?;
    let acres_sold = if acres_bought == 0 {
        ask_until(console, "How many acres do you wish to sell? ", |n| {
            check_sale(state, n)
        })?
    } else {
        0
    };
    trade_land(state, acres_bought, acres_sold);

    let bushels_fed = ask_until(
        console,
        "How many bushels of grain do you wish to feed the people? ",
        |n| check_rations(state, n),
    )?;
    hand_out_rations(state, bushels_fed);

    let acres_planted = ask_until(console, "How many acres do you wish to plant? ", |n| {
        check_planting(state, params, n)
    })?;
    sow(state, params, acres_planted);

    state.phase = YearPhase::PriceUnset;
    let d = Decisions {
        acres_bought,
        acres_sold,
        bushels_fed,
        acres_planted,
    };
    debug!(?d, "orders accepted");
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::LineConsole;
    use crate::testing::rules;
    use std::io::Cursor;

    fn deciding(price: i64) -> ReignState {
        let mut s = ReignState::new_game(&rules());
        s.land_price = price;
        s.phase = YearPhase::AwaitingDecisions;
        s
    }

    fn console(input: &str) -> LineConsole<Cursor<Vec<u8>>, Vec<u8>> {
        LineConsole::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn unaffordable_purchase_is_asked_again() {
        let mut state = deciding(20);
        let mut c = console("200\n10\n2000\n0\n");
        let d = collect_decisions(&mut c, &mut state, &rules()).unwrap();
        assert_eq!(d.acres_bought, 10);
        assert_eq!(d.acres_sold, 0);
        assert_eq!(state.land, 1010);
        assert_eq!(state.grain, 2800.0 - 200.0 - 2000.0);
        assert_eq!(state.phase, YearPhase::PriceUnset);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("Not enough grain to buy that much land. Needed 4000, in storage 2800."));
        assert!(!out.contains("How many acres do you wish to sell?"));
    }

    #[test]
    fn selling_funds_rations() {
        let mut state = deciding(20);
        state.grain = 100.0;
        let mut c = console("0\n5000\n50\n1100\n0\n");
        let d = collect_decisions(&mut c, &mut state, &rules()).unwrap();
        assert_eq!(d.acres_sold, 50);
        assert_eq!(state.land, 950);
        assert_eq!(d.bushels_fed, 1100);
        assert_eq!(state.grain, 0.0);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("You don't have that much land. You own 1000 acres."));
    }

    #[test]
    fn planting_respects_land_hands_and_seed() {
        let mut state = deciding(20);
        state.population = 10;
        state.grain = 300.0;
        // 2000 > land, 200 > 10 citizens * 10 acres, then 100 acres need 50 seed
        // but rations left only 40.
        let mut c = console("0\n0\n260\n2000\n200\n100\n80\n");
        let d = collect_decisions(&mut c, &mut state, &rules()).unwrap();
        assert_eq!(d.acres_planted, 80);
        assert_eq!(state.grain, 0.0);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("You have only 1000 acres."));
        assert!(out.contains("Your people can work at most 100 acres."));
        assert!(out.contains("Not enough grain for seed. Needed 50, in storage 40."));
    }

    #[test]
    fn rejected_orders_change_nothing() {
        let mut state = deciding(20);
        let before = state.clone();
        let too_much = Decisions {
            bushels_fed: 2500,
            acres_planted: 1000,
            ..Decisions::default()
        };
        assert!(matches!(
            apply_decisions(&mut state, &rules(), &too_much),
            Err(DecisionError::NotEnoughSeed { .. })
        ));
        let both = Decisions {
            acres_bought: 1,
            acres_sold: 1,
            ..Decisions::default()
        };
        assert_eq!(apply_decisions(&mut state, &rules(), &both), Err(DecisionError::BuyAndSell));
        let negative = Decisions {
            bushels_fed: -1,
            ..Decisions::default()
        };
        assert_eq!(apply_decisions(&mut state, &rules(), &negative), Err(DecisionError::Negative));
        assert_eq!(state, before);
    }

    #[test]
    fn land_beyond_the_counter_is_refused() {
        let mut state = deciding(17);
        state.grain = 1e300;
        let before = state.clone();
        let huge = Decisions {
            acres_bought: i64::MAX - 10,
            ..Decisions::default()
        };
        assert_eq!(
            apply_decisions(&mut state, &rules(), &huge),
            Err(DecisionError::TooMuchLand { owned: 1000 })
        );
        assert_eq!(state, before);

        let mut c = console(&format!("{}\n10\n0\n0\n", i64::MAX - 10));
        let d = collect_decisions(&mut c, &mut state, &rules()).unwrap();
        assert_eq!(d.acres_bought, 10);
        assert_eq!(state.land, 1010);
        let out = String::from_utf8(c.into_output()).unwrap();
        assert!(out.contains("The realm cannot hold that much land. You own 1000 acres."));
    }

    #[test]
    fn accepted_orders_apply_in_sequence() {
        let mut state = deciding(25);
        let d = Decisions {
            acres_bought: 0,
            acres_sold: 100,
            bushels_fed: 2000,
            acres_planted: 900,
        };
        apply_decisions(&mut state, &rules(), &d).unwrap();
        assert_eq!(state.land, 900);
        assert_eq!(state.grain, 2800.0 + 2500.0 - 2000.0 - 450.0);
        assert_eq!(state.phase, YearPhase::PriceUnset);
    }

    #[test]
    fn input_end_mid_orders_is_reported() {
        let mut state = deciding(20);
        let mut c = console("0\n0\n");
        assert_eq!(collect_decisions(&mut c, &mut state, &rules()), Err(InputClosed));
        assert_eq!(state.phase, YearPhase::AwaitingDecisions);
    }
}
