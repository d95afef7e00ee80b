use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EventSettings;
use crate::state::PetState;

/// Decides after each interaction whether the LLM should narrate an event.
///
/// A cooldown counts down one interaction at a time; once it reaches zero the
/// trigger rolls against a base chance, raised while any stat is critical.
/// A successful roll starts a new cooldown.
pub struct EventTrigger {
    settings: EventSettings,
    rng: StdRng,
}

impl EventTrigger {
    pub fn new(settings: EventSettings) -> Self {
        Self {
            settings,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic trigger for tests and replays
    pub fn with_seed(settings: EventSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &EventSettings {
        &self.settings
    }

    /// Chance of an event for the given state
    pub fn chance_for(&self, state: &PetState) -> f64 {
        if state.has_critical_stat(self.settings.critical_threshold) {
            self.settings.chance_critical
        } else {
            self.settings.chance_normal
        }
    }

    /// Roll for an event, updating `cooldown` in place
    pub fn should_trigger(&mut self, state: &PetState, cooldown: &mut u32) -> bool {
        if self.settings.always_trigger {
            return true;
        }

        if *cooldown > 0 {
            *cooldown -= 1;
            log::debug!("Event on cooldown, {} interactions left", cooldown);
            return false;
        }

        let chance = self.chance_for(state);
        let triggered = self.rng.random::<f64>() < chance;

        if triggered {
            *cooldown = self
                .rng
                .random_range(self.settings.cooldown_min..=self.settings.cooldown_max);
            log::debug!("Event triggered (chance {:.2}), cooldown set to {}", chance, cooldown);
        } else {
            log::debug!("No event this time (chance {:.2})", chance);
        }

        triggered
    }
}
