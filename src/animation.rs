use crate::directive::ActivityDirective;
use crate::frames::{Clip, Frame, FrameProvider};
use crate::model::Activity;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Repeat {
    /// Play through once, then move on to the next segment.
    Once,
    /// Play through once and stay on the last frame.
    Hold,
    Forever,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    clip: Clip,
    repeat: Repeat,
}

/// Presentation-side frame cursor. Knows nothing about timing: the owner
/// calls [`Player::advance`] on every frame tick.
pub struct Player {
    segments: VecDeque<Segment>,
    frame: usize,
    showing: Activity,
}

impl Player {
    pub fn new() -> Self {
        let mut segments = VecDeque::new();
        segments.push_back(Segment {
            clip: Clip::Idle,
            repeat: Repeat::Forever,
        });
        Self {
            segments,
            frame: 0,
            showing: Activity::Idle,
        }
    }

    pub fn showing(&self) -> Activity {
        self.showing
    }

    pub fn clip(&self) -> Clip {
        self.segments.front().map_or(Clip::Idle, |s| s.clip)
    }

    /// Starts over with the clips a directive asks for.
    pub fn show(&mut self, directive: &ActivityDirective) {
        self.segments.clear();
        self.frame = 0;

        if directive.activity == Activity::Idle {
            if let Some(out) = Clip::lead_out(self.showing) {
                self.segments.push_back(Segment {
                    clip: out,
                    repeat: Repeat::Once,
                });
            }
        } else if let Some(lead) = Clip::lead_in(directive.activity) {
            self.segments.push_back(Segment {
                clip: lead,
                repeat: Repeat::Once,
            });
        }

        let repeat = if directive.looping {
            Repeat::Forever
        } else {
            Repeat::Hold
        };
        self.segments.push_back(Segment {
            clip: Clip::for_activity(directive.activity),
            repeat,
        });
        self.showing = directive.activity;
    }

    pub fn advance(&mut self, frames: &dyn FrameProvider) {
        let Some(seg) = self.segments.front().copied() else {
            return;
        };
        let len = frames.clip_len(seg.clip);
        if self.frame + 1 < len {
            self.frame += 1;
            return;
        }
        match seg.repeat {
            Repeat::Once if self.segments.len() > 1 => {
                self.segments.pop_front();
                self.frame = 0;
            }
            Repeat::Once | Repeat::Forever => self.frame = 0,
            Repeat::Hold => {}
        }
    }

    pub fn frame(&self, frames: &dyn FrameProvider) -> Option<Frame> {
        frames.clip(self.clip()).get(self.frame).copied()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::DirectiveTable;
    use crate::frames::AsciiFrames;
    use std::time::Duration;

    fn directive(activity: Activity) -> ActivityDirective {
        DirectiveTable::default()
            .resolve(&AsciiFrames, Duration::from_millis(500))
            .get(activity)
    }

    #[test]
    fn idle_loops_forever() {
        let mut p = Player::new();
        let first = p.frame(&AsciiFrames);
        for _ in 0..AsciiFrames.clip_len(Clip::Idle) {
            p.advance(&AsciiFrames);
        }
        assert_eq!(p.frame(&AsciiFrames), first);
        assert_eq!(p.clip(), Clip::Idle);
    }

    #[test]
    fn one_shot_clip_holds_its_last_frame() {
        let mut p = Player::new();
        p.show(&directive(Activity::Eating));
        for _ in 0..10 {
            p.advance(&AsciiFrames);
        }
        let eat = AsciiFrames.clip(Clip::Eat);
        assert_eq!(p.frame(&AsciiFrames), eat.last().copied());
    }

    #[test]
    fn sleep_plays_its_transitions() {
        let mut p = Player::new();
        p.show(&directive(Activity::Sleeping));
        assert_eq!(p.clip(), Clip::FallAsleep);
        for _ in 0..AsciiFrames.clip_len(Clip::FallAsleep) {
            p.advance(&AsciiFrames);
        }
        assert_eq!(p.clip(), Clip::Sleep);

        p.show(&ActivityDirective::idle());
        assert_eq!(p.clip(), Clip::WakeUp);
        for _ in 0..AsciiFrames.clip_len(Clip::WakeUp) {
            p.advance(&AsciiFrames);
        }
        assert_eq!(p.clip(), Clip::Idle);
        assert_eq!(p.showing(), Activity::Idle);
    }

    #[test]
    fn reverting_from_a_plain_activity_goes_straight_to_idle() {
        let mut p = Player::new();
        p.show(&directive(Activity::Playing));
        assert_eq!(p.clip(), Clip::Pet);
        p.show(&ActivityDirective::idle());
        assert_eq!(p.clip(), Clip::Idle);
    }
}
