//! Activity directives: the only thing the state machine tells the renderer.

use crate::frames::{Clip, FrameProvider};
use crate::model::Activity;
use std::collections::BTreeMap;
use std::time::Duration;

/// How long an activity's clip plays before the pet goes back to idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopPolicy {
    /// Play without looping for a fixed number of frame intervals.
    Once { frames: u32 },
    /// Repeat the whole clip, after its lead-in transition if it has one.
    Repeat { times: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivityDirective {
    pub activity: Activity,
    pub looping: bool,
    pub loop_count: u32,
    /// `None` means show until told otherwise.
    pub revert_after: Option<Duration>,
}

impl ActivityDirective {
    pub fn idle() -> Self {
        Self {
            activity: Activity::Idle,
            looping: true,
            loop_count: 0,
            revert_after: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DirectiveTable {
    entries: BTreeMap<Activity, LoopPolicy>,
}

impl Default for DirectiveTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(Activity::Eating, LoopPolicy::Once { frames: 3 });
        entries.insert(Activity::Playing, LoopPolicy::Once { frames: 3 });
        entries.insert(Activity::Sleeping, LoopPolicy::Repeat { times: 3 });
        entries.insert(Activity::Celebrating, LoopPolicy::Once { frames: 2 });
        Self { entries }
    }
}

impl DirectiveTable {
    pub fn set(&mut self, activity: Activity, policy: LoopPolicy) {
        if activity != Activity::Idle {
            self.entries.insert(activity, policy);
        }
    }

    pub fn policy(&self, activity: Activity) -> Option<LoopPolicy> {
        self.entries.get(&activity).copied()
    }

    /// Turns the policies into concrete directives for a given frame set and
    /// frame interval. Clips that turn out empty still last one interval.
    pub fn resolve(&self, frames: &dyn FrameProvider, frame_interval: Duration) -> ResolvedDirectives {
        let mut by_activity = BTreeMap::new();
        for (&activity, &policy) in &self.entries {
            let (looping, loop_count, intervals) = match policy {
                LoopPolicy::Once { frames: n } => (false, 1, n),
                LoopPolicy::Repeat { times } => {
                    let clip = frames.clip_len(Clip::for_activity(activity)) as u32;
                    let lead_in = Clip::lead_in(activity)
                        .map(|c| frames.clip_len(c) as u32)
                        .unwrap_or(0);
                    (true, times, lead_in + times.saturating_mul(clip))
                }
            };
            by_activity.insert(
                activity,
                ActivityDirective {
                    activity,
                    looping,
                    loop_count,
                    revert_after: Some(frame_interval * intervals.max(1)),
                },
            );
        }
        ResolvedDirectives { by_activity }
    }
}

/// Per-activity directives, computed once at startup.
#[derive(Clone, Debug)]
pub struct ResolvedDirectives {
    by_activity: BTreeMap<Activity, ActivityDirective>,
}

impl ResolvedDirectives {
    pub fn get(&self, activity: Activity) -> ActivityDirective {
        self.by_activity
            .get(&activity)
            .copied()
            .unwrap_or_else(ActivityDirective::idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::{AsciiFrames, Frame};

    struct Empty;

    impl FrameProvider for Empty {
        fn clip(&self, _clip: Clip) -> &[Frame] {
            &[]
        }
    }

    const STEP: Duration = Duration::from_millis(500);

    #[test]
    fn one_shot_activities_last_their_frame_count() {
        let d = DirectiveTable::default().resolve(&AsciiFrames, STEP);
        let eat = d.get(Activity::Eating);
        assert!(!eat.looping);
        assert_eq!(eat.revert_after, Some(STEP * 3));
        assert_eq!(d.get(Activity::Playing).revert_after, Some(STEP * 3));
        assert_eq!(d.get(Activity::Celebrating).revert_after, Some(STEP * 2));
    }

    #[test]
    fn sleep_loops_three_times_after_its_lead_in() {
        let d = DirectiveTable::default().resolve(&AsciiFrames, STEP);
        let sleep = d.get(Activity::Sleeping);
        assert!(sleep.looping);
        assert_eq!(sleep.loop_count, 3);
        let expected = AsciiFrames.clip_len(Clip::FallAsleep) + 3 * AsciiFrames.clip_len(Clip::Sleep);
        assert_eq!(sleep.revert_after, Some(STEP * expected as u32));
    }

    #[test]
    fn idle_is_never_timed() {
        let d = DirectiveTable::default().resolve(&AsciiFrames, STEP);
        assert_eq!(d.get(Activity::Idle), ActivityDirective::idle());

        let mut table = DirectiveTable::default();
        table.set(Activity::Idle, LoopPolicy::Once { frames: 1 });
        assert_eq!(table.policy(Activity::Idle), None);
    }

    #[test]
    fn empty_clips_still_take_one_interval() {
        let d = DirectiveTable::default().resolve(&Empty, STEP);
        assert_eq!(d.get(Activity::Sleeping).revert_after, Some(STEP));
    }
}
