//! Text shown to the ruler at the start of each year and at the end.

use sim_core::ReignState;
use sim_econ::Assessment;

const RULE: &str = "----------------------------------------";
const BANNER: &str = "========================================";

/// Grain rounded to the nearest half bushel, without a trailing `.0`.
pub fn format_grain(bushels: f64) -> String {
    let rounded = (bushels * 2.0).round() / 2.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// The yearly address: last year's news followed by the city's holdings.
pub fn year_report(state: &ReignState) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        BANNER.to_string(),
        format!("Year {} of your rule", state.year),
        RULE.to_string(),
    ];
    let last = &state.last_year;
    if state.year == 1 {
        lines.push("You have just taken the throne.".to_string());
    } else {
        if last.starved > 0 {
            lines.push(format!("{} people starved to death last year.", last.starved));
        }
        if last.immigrants > 0 {
            lines.push(format!("{} people moved into the city.", last.immigrants));
        }
        if last.plague {
            lines.push("A plague killed half the population!".to_string());
        }
        if last.harvest > 0 {
            lines.push(format!(
                "We harvested {} bushels of grain ({} per acre).",
                last.harvest, last.yield_per_acre
            ));
        }
        if last.rats_ate > 0 {
            lines.push(format!("Rats destroyed {} bushels of grain.", last.rats_ate));
        }
    }
    lines.push(format!("Current population: {}", state.population));
    lines.push(format!("Grain in storage: {} bushels", format_grain(state.grain)));
    lines.push(format!("Land owned: {} acres", state.land));
    lines.push(format!(
        "Land price this year: {} bushels per acre",
        state.land_price
    ));
    lines
}

/// Closing summary of a completed reign.
pub fn assessment_report(a: &Assessment) -> Vec<String> {
    vec![
        String::new(),
        BANNER.to_string(),
        "Summary of your rule".to_string(),
        RULE.to_string(),
        format!(
            "Average percent starved per year (P): {:.2}%",
            a.average_starved_percent
        ),
        format!("Acres of land per citizen (L): {:.2}", a.acres_per_citizen),
        String::new(),
        a.tier.verdict().to_string(),
    ]
}
