//! Plain-text rendering for the terminal front-end.

use crate::state::PetState;
use crate::types::{Effect, PetEvent, PetTip};

const BAR_WIDTH: usize = 20;

/// How a stat reads at a glance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    Fair,
    High,
}

/// Below 30% is low, above 70% is high
pub fn level(value: i32, max: i32) -> Level {
    let percent = percentage(value, max);
    if percent < 30.0 {
        Level::Low
    } else if percent > 70.0 {
        Level::High
    } else {
        Level::Fair
    }
}

fn percentage(value: i32, max: i32) -> f64 {
    if max <= 0 {
        return 0.0;
    }
    (f64::from(value) / f64::from(max) * 100.0).clamp(0.0, 100.0)
}

/// `Hunger     [########............]  4/10 low`
pub fn stat_line(name: &str, value: i32, max: i32) -> String {
    let filled = (percentage(value, max) / 100.0 * BAR_WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)));
    let tag = match level(value, max) {
        Level::Low => " low",
        Level::Fair => "",
        Level::High => " great",
    };
    format!("{:<10} [{}] {:>2}/{}{}", name, bar, value, max, tag)
}

pub fn stats_block(state: &PetState, max: i32) -> String {
    [
        stat_line("Hunger", state.hunger, max),
        stat_line("Energy", state.energy, max),
        stat_line("Happiness", state.happiness, max),
    ]
    .join("\n")
}

/// `Hunger: +2, Happiness: -1`; empty when nothing changes
pub fn effect_summary(effect: &Effect) -> String {
    [
        ("Hunger", effect.hunger),
        ("Energy", effect.energy),
        ("Happiness", effect.happiness),
    ]
    .into_iter()
    .filter(|(_, delta)| *delta != 0)
    .map(|(name, delta)| format!("{}: {:+}", name, delta))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Event description followed by numbered options
pub fn event_block(event: &PetEvent) -> String {
    let mut text = format!("== {} ==\n{}\n\nWhat will you do?\n", event.title, event.description);
    for (i, option) in event.options.iter().enumerate() {
        let effects = effect_summary(&option.effect);
        if effects.is_empty() {
            text.push_str(&format!("  {}. {}\n", i + 1, option.text));
        } else {
            text.push_str(&format!("  {}. {} ({})\n", i + 1, option.text, effects));
        }
    }
    text
}

pub fn tip_block(tip: &PetTip) -> String {
    format!("Tip: {}\n{}", tip.tip_title, tip.tip_content)
}
