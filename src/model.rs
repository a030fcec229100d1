use std::fmt;

pub const STAT_MIN: u8 = 0;
pub const STAT_MAX: u8 = 100;

pub const DEFAULT_NAME: &str = "Fluffy";
pub const DEFAULT_SLEEP_THRESHOLD: u8 = 95;

/// What the pet is visibly doing right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Activity {
    Idle,
    Eating,
    Playing,
    Sleeping,
    Celebrating,
}

impl Activity {
    pub const ALL: [Activity; 5] = [
        Activity::Idle,
        Activity::Eating,
        Activity::Playing,
        Activity::Sleeping,
        Activity::Celebrating,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Activity::Idle => "idle",
            Activity::Eating => "eating",
            Activity::Playing => "playing",
            Activity::Sleeping => "sleeping",
            Activity::Celebrating => "celebrating",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub hunger: u8,
    pub energy: u8,
    pub happiness: u8,
}

impl Stats {
    /// Builds a snapshot, clamping each value into `[0, 100]`.
    pub fn new(hunger: u8, energy: u8, happiness: u8) -> Self {
        Self {
            hunger: hunger.min(STAT_MAX),
            energy: energy.min(STAT_MAX),
            happiness: happiness.min(STAT_MAX),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            hunger: 50,
            energy: 50,
            happiness: 50,
        }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hunger: {} | Energy: {} | Happiness: {}",
            self.hunger, self.energy, self.happiness
        )
    }
}

/// Adds a signed delta to a meter and clamps the result into range.
pub(crate) fn clamp_add(value: u8, delta: i32) -> u8 {
    (value as i32 + delta).clamp(STAT_MIN as i32, STAT_MAX as i32) as u8
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Sleep is only accepted while energy is strictly below this.
    pub sleep_threshold: u8,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            sleep_threshold: DEFAULT_SLEEP_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    NotHungry,
    TooTired,
    NoSleepNeeded,
    NameTooLong,
    NameDisliked,
    NameEmpty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Result of a single action: the tag drives control flow, the message is for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionReport {
    pub outcome: Outcome,
    pub message: String,
}

impl ActionReport {
    pub(crate) fn applied(message: String) -> Self {
        Self {
            outcome: Outcome::Applied,
            message,
        }
    }

    pub(crate) fn rejected(reason: Rejection, message: String) -> Self {
        Self {
            outcome: Outcome::Rejected(reason),
            message,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PetState {
    pub(crate) name: String,
    pub(crate) stats: Stats,
    pub(crate) activity: Activity,
    pub(crate) rules: Rules,
}

impl PetState {
    pub fn new(name: impl Into<String>, rules: Rules) -> Self {
        Self {
            name: name.into(),
            stats: Stats::default(),
            activity: Activity::Idle,
            rules,
        }
    }

    pub fn with_stats(name: impl Into<String>, stats: Stats, rules: Rules) -> Self {
        Self {
            stats: Stats::new(stats.hunger, stats.energy, stats.happiness),
            ..Self::new(name, rules)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }
}

impl Default for PetState {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, Rules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_add_saturates_both_ends() {
        assert_eq!(clamp_add(95, 10), 100);
        assert_eq!(clamp_add(3, -10), 0);
        assert_eq!(clamp_add(40, 5), 45);
    }

    #[test]
    fn with_stats_clamps_out_of_range_input() {
        let pet = PetState::with_stats("Rex", Stats::new(200, 101, 7), Rules::default());
        assert_eq!(pet.stats, Stats { hunger: 100, energy: 100, happiness: 7 });
    }

    #[test]
    fn defaults_match_a_fresh_session() {
        let pet = PetState::default();
        assert_eq!(pet.name(), "Fluffy");
        assert_eq!(pet.stats, Stats { hunger: 50, energy: 50, happiness: 50 });
        assert_eq!(pet.activity(), Activity::Idle);
        assert_eq!(pet.rules().sleep_threshold, 95);
    }

    #[test]
    fn stats_display_lists_all_meters() {
        assert_eq!(
            Stats::default().to_string(),
            "Hunger: 50 | Energy: 50 | Happiness: 50"
        );
    }
}
