use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::Effect;

/// Inclusive range every pet stat is kept inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBounds {
    pub min: i32,
    pub max: i32,
}

impl StatBounds {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Bounds must be a non-empty range inside 0..=100
    pub fn is_valid(&self) -> bool {
        0 <= self.min && self.min < self.max && self.max <= 100
    }
}

impl Default for StatBounds {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// The pet's mood, derived from its stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Hungry,
    Tired,
    Sad,
    /// Only used to pick preview images
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Hungry => "hungry",
            Mood::Tired => "tired",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the owner does to the pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Feed,
    Play,
    Rest,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Feed, Action::Play, Action::Rest];

    /// Past-tense phrase used in the history log
    pub fn past_tense(&self) -> &'static str {
        match self {
            Action::Feed => "was fed",
            Action::Play => "was played with",
            Action::Rest => "rested",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Feed => "feed",
            Action::Play => "play",
            Action::Rest => "rest",
        })
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feed" | "f" => Ok(Action::Feed),
            "play" | "p" => Ok(Action::Play),
            "rest" | "r" | "sleep" => Ok(Action::Rest),
            other => Err(anyhow::anyhow!("Unknown action: {}", other)),
        }
    }
}

/// Tunables for how actions move the stats
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatRules {
    pub bounds: StatBounds,
    pub initial: i32,
    /// Any stat below this value sets the matching mood
    pub mood_threshold: i32,
    pub action_gain: i32,
    /// Hunger and energy spent by playing
    pub play_cost: i32,
    /// Minutes per decay tick, 0 disables decay
    pub decay_interval_minutes: i64,
}

impl Default for StatRules {
    fn default() -> Self {
        Self {
            bounds: StatBounds::default(),
            initial: 5,
            mood_threshold: 3,
            action_gain: 2,
            play_cost: 1,
            decay_interval_minutes: 60,
        }
    }
}

/// The three bounded scalars that make up a pet's condition.
///
/// `hunger` is a fullness meter: feeding raises it and a low value means
/// the pet is hungry. Mood is never stored, it is always derived with the
/// configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PetStateRecord")]
pub struct PetState {
    pub hunger: i32,
    pub energy: i32,
    pub happiness: i32,
}

impl PetState {
    pub fn new(hunger: i32, energy: i32, happiness: i32) -> Self {
        Self {
            hunger,
            energy,
            happiness,
        }
    }

    pub fn initial(rules: &StatRules) -> Self {
        let value = rules.bounds.clamp(rules.initial);
        Self::new(value, value, value)
    }

    pub fn clamped(self, bounds: StatBounds) -> Self {
        Self {
            hunger: bounds.clamp(self.hunger),
            energy: bounds.clamp(self.energy),
            happiness: bounds.clamp(self.happiness),
        }
    }

    /// True when any stat sits below `threshold`
    pub fn has_critical_stat(&self, threshold: i32) -> bool {
        self.hunger < threshold || self.energy < threshold || self.happiness < threshold
    }
}

impl Default for PetState {
    fn default() -> Self {
        Self::initial(&StatRules::default())
    }
}

/// On-disk shape of [`PetState`]. Older files also carry a `mood` key,
/// which serde skips as unknown.
#[derive(Debug, Clone, Deserialize)]
struct PetStateRecord {
    hunger: i32,
    energy: i32,
    happiness: i32,
}

impl From<PetStateRecord> for PetState {
    fn from(record: PetStateRecord) -> Self {
        PetState::new(record.hunger, record.energy, record.happiness).clamped(StatBounds::new(0, 100))
    }
}

/// Derive the mood from the stats; the first low stat wins
pub fn determine_mood(state: &PetState, threshold: i32) -> Mood {
    if state.hunger < threshold {
        Mood::Hungry
    } else if state.energy < threshold {
        Mood::Tired
    } else if state.happiness < threshold {
        Mood::Sad
    } else {
        Mood::Happy
    }
}

/// Apply an owner action and return the new state
pub fn apply_action(state: &PetState, action: Action, rules: &StatRules) -> PetState {
    let bounds = rules.bounds;
    let mut next = *state;

    match action {
        Action::Feed => {
            next.hunger = bounds.clamp(next.hunger.saturating_add(rules.action_gain));
        }
        Action::Play => {
            next.happiness = bounds.clamp(next.happiness.saturating_add(rules.action_gain));
            next.hunger = bounds.clamp(next.hunger.saturating_sub(rules.play_cost));
            next.energy = bounds.clamp(next.energy.saturating_sub(rules.play_cost));
        }
        Action::Rest => {
            next.energy = bounds.clamp(next.energy.saturating_add(rules.action_gain));
        }
    }

    next
}

/// Add event deltas to the stats, keeping each inside `bounds`
pub fn apply_effects(state: &PetState, effect: &Effect, bounds: StatBounds) -> PetState {
    PetState {
        hunger: bounds.clamp(state.hunger.saturating_add(effect.hunger)),
        energy: bounds.clamp(state.energy.saturating_add(effect.energy)),
        happiness: bounds.clamp(state.happiness.saturating_add(effect.happiness)),
    }
}

/// Lower every stat by one per elapsed tick
pub fn decay(state: &PetState, ticks: u32, bounds: StatBounds) -> PetState {
    if ticks == 0 {
        return *state;
    }
    let drop = i32::try_from(ticks).unwrap_or(i32::MAX);
    PetState {
        hunger: bounds.clamp(state.hunger.saturating_sub(drop)),
        energy: bounds.clamp(state.energy.saturating_sub(drop)),
        happiness: bounds.clamp(state.happiness.saturating_sub(drop)),
    }
}

/// Number of whole decay ticks in `elapsed_minutes`
pub fn decay_ticks(elapsed_minutes: i64, interval_minutes: i64) -> u32 {
    if interval_minutes <= 0 || elapsed_minutes <= 0 {
        return 0;
    }
    u32::try_from(elapsed_minutes / interval_minutes).unwrap_or(u32::MAX)
}
