#![deny(warnings)]

//! Console front end: load the rules, pick up or start a reign, play it.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use persistence::{default_rules_path, default_save_path, load_rules, FileSlot};
use serde::Serialize;
use sim_core::ReignState;
use sim_econ::SeededDice;
use sim_runtime::{open_reign, run_reign, Console, InputClosed, LineConsole, ReignEnd};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Args {
    rules: PathBuf,
    save: PathBuf,
    seed: Option<u64>,
    json: bool,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Args {
    let mut args = Args {
        rules: default_rules_path(),
        save: default_save_path(),
        seed: None,
        json: false,
    };
    let mut it = argv.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--rules" => {
                if let Some(p) = it.next() {
                    args.rules = p.into();
                }
            }
            "--save" => {
                if let Some(p) = it.next() {
                    args.save = p.into();
                }
            }
            "--seed" => {
                let raw = it.next().unwrap_or_default();
                args.seed = raw.parse().ok();
                if args.seed.is_none() {
                    warn!(value = %raw, "--seed is not a u64, playing with a random seed");
                }
            }
            "--json" => args.json = true,
            _ => {}
        }
    }
    args
}

#[derive(Serialize)]
struct Summary<'a> {
    end: &'a ReignEnd,
    state: &'a ReignState,
}

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the game text.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1));
    info!(?args, "starting throne");

    let params = load_rules(&args.rules)
        .with_context(|| format!("failed to load game rules from {}", args.rules.display()))?;

    let mut slot = FileSlot::new(&args.save);
    let mut dice = match args.seed {
        Some(seed) => SeededDice::new(seed),
        None => SeededDice::from_entropy(),
    };
    info!(seed = dice.seed(), "dice ready");

    let stdin = io::stdin();
    let mut console = LineConsole::new(stdin.lock(), io::stdout());

    let played = open_reign(&params, &mut console, &slot).and_then(|mut state| {
        let end = run_reign(&mut state, &params, &mut console, &mut dice, &mut slot)?;
        Ok((end, state))
    });
    let (end, state) = match played {
        Ok(done) => done,
        Err(InputClosed) => {
            console.say("");
            console.say("Input ended.");
            return Ok(());
        }
    };
    info!(?end, "reign over");

    if args.json {
        let summary = serde_json::to_string_pretty(&Summary {
            end: &end,
            state: &state,
        })
        .context("failed to encode summary")?;
        println!("{summary}");
    }
    Ok(())
}
