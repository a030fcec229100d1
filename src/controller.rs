//! Turns user commands into pet mutations plus activity directives, and
//! owns the two timers the core cares about: the passive decay tick and the
//! countdown of whatever directive is currently showing.

use crate::directive::{ActivityDirective, ResolvedDirectives};
use crate::model::{ActionReport, Activity, PetState, Rejection};
use crate::timer::{Scheduler, TimerEvent, TimerId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Feed,
    Play,
    Sleep,
    Rename(String),
}

/// Extra checks a candidate name must pass before the pet accepts it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenamePolicy {
    /// Longest accepted name, in characters.
    pub max_len: usize,
    /// Chance the pet refuses an otherwise valid name.
    pub reject_chance: f64,
    /// (energy, happiness) deltas.
    pub too_long_penalty: (i32, i32),
    pub disliked_penalty: (i32, i32),
    pub accepted_bonus: i32,
}

impl Default for RenamePolicy {
    fn default() -> Self {
        Self {
            max_len: 6,
            reject_chance: 0.30,
            too_long_penalty: (-2, -5),
            disliked_penalty: (-4, -3),
            accepted_bonus: 7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandReport {
    pub report: ActionReport,
    /// Present only when the command was applied.
    pub directive: Option<ActivityDirective>,
    /// The caller should ask for another name.
    pub retry: bool,
}

pub struct ActionController<R: Rng = StdRng> {
    pet: PetState,
    directives: ResolvedDirectives,
    rename_policy: RenamePolicy,
    decay_interval: Duration,
    rng: R,
    current: ActivityDirective,
    directive_timer: Option<TimerId>,
    decay_timer: Option<TimerId>,
}

impl ActionController<StdRng> {
    pub fn seeded(
        pet: PetState,
        directives: ResolvedDirectives,
        rename_policy: RenamePolicy,
        decay_interval: Duration,
        seed: u64,
    ) -> Self {
        Self::new(
            pet,
            directives,
            rename_policy,
            decay_interval,
            StdRng::seed_from_u64(seed),
        )
    }
}

impl<R: Rng> ActionController<R> {
    pub fn new(
        pet: PetState,
        directives: ResolvedDirectives,
        rename_policy: RenamePolicy,
        decay_interval: Duration,
        rng: R,
    ) -> Self {
        Self {
            pet,
            directives,
            rename_policy,
            decay_interval,
            rng,
            current: ActivityDirective::idle(),
            directive_timer: None,
            decay_timer: None,
        }
    }

    pub fn pet(&self) -> &PetState {
        &self.pet
    }

    pub fn current_directive(&self) -> ActivityDirective {
        self.current
    }

    pub fn has_pending_directive(&self) -> bool {
        self.directive_timer.is_some()
    }

    /// Arms the decay tick. Calling it again restarts the cadence.
    pub fn start(&mut self, sched: &mut dyn Scheduler) -> ActivityDirective {
        if let Some(old) = self.decay_timer.take() {
            sched.cancel(old);
        }
        self.decay_timer = Some(sched.schedule(self.decay_interval, TimerEvent::Decay));
        info!(
            name = self.pet.name(),
            decay_ms = self.decay_interval.as_millis() as u64,
            "pet session started"
        );
        self.current
    }

    pub fn command(&mut self, command: Command, sched: &mut dyn Scheduler) -> CommandReport {
        debug!(?command, "command received");
        match command {
            Command::Feed => {
                let report = self.pet.feed();
                self.finish(report, sched)
            }
            Command::Play => {
                let report = self.pet.play();
                self.finish(report, sched)
            }
            Command::Sleep => {
                let report = self.pet.sleep();
                self.finish(report, sched)
            }
            Command::Rename(candidate) => self.rename(&candidate, sched),
        }
    }

    fn rename(&mut self, candidate: &str, sched: &mut dyn Scheduler) -> CommandReport {
        let policy = self.rename_policy;

        // the bound covers the name as typed, surrounding spaces included
        if candidate.chars().count() > policy.max_len {
            let (energy, happiness) = policy.too_long_penalty;
            self.pet.adjust(0, energy, happiness);
            info!(candidate, "rename rejected: too long");
            return Self::retry(ActionReport::rejected(
                Rejection::NameTooLong,
                format!(
                    "\"{}\" is too long, {} frowns. Pick at most {} letters.",
                    candidate,
                    self.pet.name(),
                    policy.max_len
                ),
            ));
        }

        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Self::retry(ActionReport::rejected(
                Rejection::NameEmpty,
                "A name can't be empty.".to_string(),
            ));
        }

        if self.rng.gen_bool(policy.reject_chance.clamp(0.0, 1.0)) {
            let (energy, happiness) = policy.disliked_penalty;
            self.pet.adjust(0, energy, happiness);
            info!(candidate, "rename rejected: disliked");
            return Self::retry(ActionReport::rejected(
                Rejection::NameDisliked,
                format!(
                    "{} doesn't like \"{}\". Try another one.",
                    self.pet.name(),
                    candidate
                ),
            ));
        }

        let report = self.pet.rename(candidate);
        self.pet.adjust(0, 0, policy.accepted_bonus);
        self.pet.set_activity(Activity::Celebrating);
        info!(name = self.pet.name(), "pet renamed");
        self.finish(report, sched)
    }

    fn retry(report: ActionReport) -> CommandReport {
        CommandReport {
            report,
            directive: None,
            retry: true,
        }
    }

    fn finish(&mut self, report: ActionReport, sched: &mut dyn Scheduler) -> CommandReport {
        if !report.outcome.is_applied() {
            debug!(outcome = ?report.outcome, "command rejected");
            return CommandReport {
                report,
                directive: None,
                retry: false,
            };
        }
        let directive = self.issue(self.pet.activity(), sched);
        CommandReport {
            report,
            directive: Some(directive),
            retry: false,
        }
    }

    /// Replaces the outstanding countdown, cancelling the old one first.
    fn issue(&mut self, activity: Activity, sched: &mut dyn Scheduler) -> ActivityDirective {
        if let Some(old) = self.directive_timer.take() {
            sched.cancel(old);
            debug!(?old, "previous directive cancelled");
        }
        let directive = self.directives.get(activity);
        if let Some(after) = directive.revert_after {
            self.directive_timer = Some(sched.schedule(after, TimerEvent::DirectiveExpired));
        }
        debug!(
            activity = activity.label(),
            revert_after = ?directive.revert_after,
            "directive issued"
        );
        self.current = directive;
        directive
    }

    /// Handles a fired timer. Returns a new directive when the display
    /// should change.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        event: TimerEvent,
        sched: &mut dyn Scheduler,
    ) -> Option<ActivityDirective> {
        match event {
            TimerEvent::Decay if self.decay_timer == Some(id) => {
                self.pet.tick();
                self.decay_timer = Some(sched.schedule(self.decay_interval, TimerEvent::Decay));
                debug!(stats = %self.pet.status(), "decay tick");
                None
            }
            TimerEvent::DirectiveExpired if self.directive_timer == Some(id) => {
                self.directive_timer = None;
                self.pet.settle();
                self.current = ActivityDirective::idle();
                debug!("directive played out, back to idle");
                Some(self.current)
            }
            _ => {
                debug!(?id, ?event, "ignoring timer not owned by the controller");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::DirectiveTable;
    use crate::frames::AsciiFrames;
    use crate::model::{Outcome, Rules, Stats};
    use crate::timer::TimerQueue;

    const FRAME: Duration = Duration::from_millis(500);
    const DECAY: Duration = Duration::from_millis(1000);

    /// Records every schedule/cancel so tests can count them.
    #[derive(Default)]
    struct RecordingScheduler {
        inner: TimerQueue,
        scheduled: Vec<(TimerId, TimerEvent)>,
        cancelled: Vec<TimerId>,
    }

    impl Scheduler for RecordingScheduler {
        fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerId {
            let id = self.inner.schedule(delay, event);
            self.scheduled.push((id, event));
            id
        }

        fn cancel(&mut self, id: TimerId) -> bool {
            self.cancelled.push(id);
            self.inner.cancel(id)
        }
    }

    fn controller(pet: PetState, reject_chance: f64) -> ActionController {
        let policy = RenamePolicy {
            reject_chance,
            ..RenamePolicy::default()
        };
        ActionController::seeded(
            pet,
            DirectiveTable::default().resolve(&AsciiFrames, FRAME),
            policy,
            DECAY,
            7,
        )
    }

    fn drive(
        c: &mut ActionController,
        sched: &mut RecordingScheduler,
        until: Duration,
    ) -> Vec<ActivityDirective> {
        let mut changes = Vec::new();
        while let Some((id, ev)) = sched.inner.pop_due(until) {
            changes.extend(c.on_timer(id, ev, sched));
        }
        changes
    }

    #[test]
    fn feed_issues_a_timed_eating_directive() {
        let mut sched = RecordingScheduler::default();
        let mut c = controller(PetState::default(), 0.0);
        c.start(&mut sched);

        let r = c.command(Command::Feed, &mut sched);
        assert_eq!(r.report.outcome, Outcome::Applied);
        let d = r.directive.expect("applied command yields a directive");
        assert_eq!(d.activity, Activity::Eating);
        assert_eq!(d.revert_after, Some(FRAME * 3));
        assert!(c.has_pending_directive());
    }

    #[test]
    fn rejected_command_leaves_the_countdown_alone() {
        let mut sched = RecordingScheduler::default();
        let pet = PetState::with_stats("Fluffy", Stats::new(10, 50, 50), Rules::default());
        let mut c = controller(pet, 0.0);

        c.command(Command::Feed, &mut sched);
        let r = c.command(Command::Feed, &mut sched);
        assert_eq!(r.report.outcome, Outcome::Rejected(Rejection::NotHungry));
        assert!(r.directive.is_none());
        assert!(!r.retry);
        assert!(sched.cancelled.is_empty());
        assert_eq!(c.current_directive().activity, Activity::Eating);
    }

    #[test]
    fn new_action_cancels_previous_countdown_exactly_once() {
        let mut sched = RecordingScheduler::default();
        let mut c = controller(PetState::default(), 0.0);
        c.start(&mut sched);

        c.command(Command::Feed, &mut sched);
        let (feed_timer, _) = *sched
            .scheduled
            .iter()
            .find(|(_, ev)| *ev == TimerEvent::DirectiveExpired)
            .expect("feed countdown");

        drive(&mut c, &mut sched, FRAME);
        c.command(Command::Play, &mut sched);

        assert_eq!(sched.cancelled, vec![feed_timer]);
        assert!(!sched.inner.is_pending(feed_timer));

        // Feed's countdown would have fired at 1.5s; play's runs until 2.0s.
        let changes = drive(&mut c, &mut sched, FRAME * 3);
        assert!(changes.is_empty());
        assert_eq!(c.pet().activity(), Activity::Playing);

        let changes = drive(&mut c, &mut sched, FRAME * 4);
        assert_eq!(changes, vec![ActivityDirective::idle()]);
        assert_eq!(c.pet().activity(), Activity::Idle);
        assert_eq!(sched.cancelled.len(), 1);
    }

    #[test]
    fn decay_keeps_running_across_activities() {
        let mut sched = RecordingScheduler::default();
        let mut c = controller(PetState::default(), 0.0);
        c.start(&mut sched);
        c.command(Command::Sleep, &mut sched);

        drive(&mut c, &mut sched, DECAY);
        drive(&mut c, &mut sched, DECAY * 2);
        drive(&mut c, &mut sched, DECAY * 3);

        // sleep: (60, 70, 50), then three decay steps
        assert_eq!(c.pet().status(), Stats::new(63, 67, 47));
    }

    #[test]
    fn stale_timer_ids_are_ignored() {
        let mut sched = RecordingScheduler::default();
        let mut c = controller(PetState::default(), 0.0);
        c.command(Command::Feed, &mut sched);
        let stale = sched.scheduled[0].0;
        c.command(Command::Play, &mut sched);

        assert_eq!(c.on_timer(stale, TimerEvent::DirectiveExpired, &mut sched), None);
        assert_eq!(c.pet().activity(), Activity::Playing);
    }

    #[test]
    fn long_name_is_rejected_with_penalty_whatever_the_dice_say() {
        for chance in [0.0, 1.0] {
            let mut sched = RecordingScheduler::default();
            let mut c = controller(PetState::default(), chance);
            let r = c.command(Command::Rename("Whiskers".into()), &mut sched);
            assert_eq!(r.report.outcome, Outcome::Rejected(Rejection::NameTooLong));
            assert!(r.retry);
            assert!(r.directive.is_none());
            assert_eq!(c.pet().name(), "Fluffy");
            assert_eq!(c.pet().status(), Stats::new(50, 48, 45));
        }
    }

    #[test]
    fn disliked_name_costs_happiness_and_energy() {
        let mut sched = RecordingScheduler::default();
        let mut c = controller(PetState::default(), 1.0);
        let r = c.command(Command::Rename("Tom".into()), &mut sched);
        assert_eq!(r.report.outcome, Outcome::Rejected(Rejection::NameDisliked));
        assert!(r.retry);
        assert_eq!(c.pet().name(), "Fluffy");
        assert_eq!(c.pet().status(), Stats::new(50, 46, 47));
    }

    #[test]
    fn repeated_rejections_clamp_at_zero() {
        let mut sched = RecordingScheduler::default();
        let pet = PetState::with_stats("Fluffy", Stats::new(50, 3, 4), Rules::default());
        let mut c = controller(pet, 1.0);
        for _ in 0..5 {
            c.command(Command::Rename("Bartholomew".into()), &mut sched);
            c.command(Command::Rename("Bo".into()), &mut sched);
        }
        assert_eq!(c.pet().status(), Stats::new(50, 0, 0));
    }

    #[test]
    fn blank_name_is_rejected_without_side_effects() {
        let mut sched = RecordingScheduler::default();
        let mut c = controller(PetState::default(), 0.0);
        let r = c.command(Command::Rename("   ".into()), &mut sched);
        assert_eq!(r.report.outcome, Outcome::Rejected(Rejection::NameEmpty));
        assert!(r.retry);
        assert_eq!(c.pet().status(), Stats::default());
        assert!(sched.scheduled.is_empty());
    }

    #[test]
    fn accepted_name_celebrates() {
        let mut sched = RecordingScheduler::default();
        let mut c = controller(PetState::default(), 0.0);
        let r = c.command(Command::Rename(" Mochi".into()), &mut sched);
        assert_eq!(r.report.outcome, Outcome::Applied);
        assert!(!r.retry);
        assert_eq!(c.pet().name(), "Mochi");
        assert_eq!(c.pet().status(), Stats::new(50, 50, 57));
        assert_eq!(c.pet().activity(), Activity::Celebrating);
        assert_eq!(r.directive.map(|d| d.activity), Some(Activity::Celebrating));
    }

    #[test]
    fn padding_counts_towards_the_length_limit() {
        for padded in ["  Bob   ", "        "] {
            let mut sched = RecordingScheduler::default();
            let mut c = controller(PetState::default(), 0.0);
            let r = c.command(Command::Rename(padded.into()), &mut sched);
            assert_eq!(r.report.outcome, Outcome::Rejected(Rejection::NameTooLong));
            assert_eq!(c.pet().name(), "Fluffy");
            assert_eq!(c.pet().status(), Stats::new(50, 48, 45));
        }
    }

    #[test]
    fn six_characters_is_still_short_enough() {
        let mut sched = RecordingScheduler::default();
        let mut c = controller(PetState::default(), 0.0);
        let r = c.command(Command::Rename("Pepper".into()), &mut sched);
        assert!(r.report.outcome.is_applied());

        // counted in characters, not bytes
        let r = c.command(Command::Rename("Zoë".into()), &mut sched);
        assert!(r.report.outcome.is_applied());
    }

    #[test]
    fn restarting_replaces_the_decay_timer() {
        let mut sched = RecordingScheduler::default();
        let mut c = controller(PetState::default(), 0.0);
        c.start(&mut sched);
        c.start(&mut sched);
        assert_eq!(sched.cancelled.len(), 1);
        assert_eq!(sched.inner.len(), 1);
    }
}
