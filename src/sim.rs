use crate::model::{clamp_add, ActionReport, Activity, PetState, Rejection, Stats};

impl PetState {
    pub fn feed(&mut self) -> ActionReport {
        if self.stats.hunger == 0 {
            return ActionReport::rejected(
                Rejection::NotHungry,
                format!("{} isn't hungry right now.", self.name),
            );
        }
        self.stats.hunger = clamp_add(self.stats.hunger, -10);
        self.stats.happiness = clamp_add(self.stats.happiness, 5);
        self.activity = Activity::Eating;
        ActionReport::applied(format!("You fed {}!", self.name))
    }

    pub fn play(&mut self) -> ActionReport {
        if self.stats.energy <= 10 {
            return ActionReport::rejected(
                Rejection::TooTired,
                format!("{} is too tired to play.", self.name),
            );
        }
        self.stats.happiness = clamp_add(self.stats.happiness, 10);
        self.stats.energy = clamp_add(self.stats.energy, -15);
        self.stats.hunger = clamp_add(self.stats.hunger, 5);
        self.activity = Activity::Playing;
        ActionReport::applied(format!("You played with {}!", self.name))
    }

    pub fn sleep(&mut self) -> ActionReport {
        if self.stats.energy >= self.rules.sleep_threshold {
            return ActionReport::rejected(
                Rejection::NoSleepNeeded,
                format!("{} doesn't need to sleep right now.", self.name),
            );
        }
        self.stats.energy = clamp_add(self.stats.energy, 20);
        self.stats.hunger = clamp_add(self.stats.hunger, 10);
        self.activity = Activity::Sleeping;
        ActionReport::applied(format!("{} slept and got its energy back!", self.name))
    }

    /// Replaces the name unconditionally; validation happens in the controller.
    pub fn rename(&mut self, new_name: impl Into<String>) -> ActionReport {
        let old = std::mem::replace(&mut self.name, new_name.into());
        ActionReport::applied(format!("{} is now called {}!", old, self.name))
    }

    /// Passive decay, one step.
    pub fn tick(&mut self) {
        self.stats.hunger = clamp_add(self.stats.hunger, 1);
        self.stats.energy = clamp_add(self.stats.energy, -1);
        self.stats.happiness = clamp_add(self.stats.happiness, -1);
    }

    pub fn status(&self) -> Stats {
        self.stats
    }

    pub fn describe(&self) -> String {
        format!("{} - {}", self.name, self.stats)
    }

    /// Applies signed deltas to all three meters, clamped.
    pub fn adjust(&mut self, hunger: i32, energy: i32, happiness: i32) {
        self.stats.hunger = clamp_add(self.stats.hunger, hunger);
        self.stats.energy = clamp_add(self.stats.energy, energy);
        self.stats.happiness = clamp_add(self.stats.happiness, happiness);
    }

    pub(crate) fn set_activity(&mut self, activity: Activity) {
        self.activity = activity;
    }

    /// Drops back to idle once the current activity has played out.
    pub(crate) fn settle(&mut self) {
        self.activity = Activity::Idle;
    }
}
