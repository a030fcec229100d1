use crate::model::Activity;

/// One animation frame: rows of text, top to bottom.
pub type Frame = &'static [&'static str];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Clip {
    Idle,
    Eat,
    Pet,
    Sleep,
    FallAsleep,
    WakeUp,
    Cheer,
}

impl Clip {
    pub fn for_activity(activity: Activity) -> Clip {
        match activity {
            Activity::Idle => Clip::Idle,
            Activity::Eating => Clip::Eat,
            Activity::Playing => Clip::Pet,
            Activity::Sleeping => Clip::Sleep,
            Activity::Celebrating => Clip::Cheer,
        }
    }

    /// Transition played once before the activity's own clip.
    pub fn lead_in(activity: Activity) -> Option<Clip> {
        match activity {
            Activity::Sleeping => Some(Clip::FallAsleep),
            _ => None,
        }
    }

    /// Transition played once when the activity hands back to idle.
    pub fn lead_out(activity: Activity) -> Option<Clip> {
        match activity {
            Activity::Sleeping => Some(Clip::WakeUp),
            _ => None,
        }
    }
}

pub trait FrameProvider {
    fn clip(&self, clip: Clip) -> &[Frame];

    fn clip_len(&self, clip: Clip) -> usize {
        self.clip(clip).len()
    }
}

/// Built-in cat drawn in plain ASCII.
#[derive(Clone, Copy, Debug, Default)]
pub struct AsciiFrames;

const IDLE: &[Frame] = &[
    &[
        r"   /\_/\    ",
        r"  ( o.o )   ",
        r"   > ^ <    ",
        r"  /     \   ",
        r" (_|   |_)  ",
    ],
    &[
        r"   /\_/\    ",
        r"  ( -.- )   ",
        r"   > ^ <    ",
        r"  /     \   ",
        r" (_|   |_)  ",
    ],
];

const EAT: &[Frame] = &[
    &[
        r"   /\_/\    ",
        r"  ( o.o )   ",
        r"   > o <    ",
        r"  /     \   ",
        r" (_|   |_)U ",
    ],
    &[
        r"   /\_/\    ",
        r"  ( ^.^ )   ",
        r"   > O <    ",
        r"  /    \_   ",
        r" (_|   |_)U ",
    ],
    &[
        r"   /\_/\    ",
        r"  ( ^.^ )   ",
        r"   > ~ <    ",
        r"  /     \   ",
        r" (_|   |_)u ",
    ],
];

const PET: &[Frame] = &[
    &[
        r"   /\_/\  _ ",
        r"  ( ^.^ )/ )",
        r"   > w <  / ",
        r"  /     \   ",
        r" (_|   |_)  ",
    ],
    &[
        r"   /\_/\ __ ",
        r"  ( ^w^ )  )",
        r"   >   <  / ",
        r"  /     \   ",
        r" (_|   |_)  ",
    ],
    &[
        r"   /\_/\  _ ",
        r"  ( >w< )/ )",
        r"   > ~ <  / ",
        r"  /     \   ",
        r" (_|   |_)  ",
    ],
];

const SLEEP: &[Frame] = &[
    &[
        r"         z  ",
        r"   /\_/\    ",
        r"  ( -.- )   ",
        r" (  ___  )  ",
        r"  (_____)   ",
    ],
    &[
        r"       Z z  ",
        r"   /\_/\    ",
        r"  ( -.- )   ",
        r" (  ___  )  ",
        r"  (_____)   ",
    ],
];

const FALL_ASLEEP: &[Frame] = &[
    &[
        r"   /\_/\    ",
        r"  ( o.o )   ",
        r"   > o <    ",
        r"  /     \   ",
        r" (_|   |_)  ",
    ],
    &[
        r"            ",
        r"   /\_/\    ",
        r"  ( =.= )   ",
        r" (  ___  )  ",
        r"  (_____)   ",
    ],
];

const WAKE_UP: &[Frame] = &[
    &[
        r"            ",
        r"   /\_/\    ",
        r"  ( o.- )   ",
        r" (  ___  )  ",
        r"  (_____)   ",
    ],
    &[
        r"   /\_/\  * ",
        r"  ( O.O )   ",
        r"   > o <    ",
        r"  /     \   ",
        r" (_|   |_)  ",
    ],
];

const CHEER: &[Frame] = &[
    &[
        r" * /\_/\ *  ",
        r"  ( ^o^ )   ",
        r" \_> ^ <_/  ",
        r"   |   |    ",
        r"  _|   |_   ",
    ],
    &[
        r"   /\_/\  * ",
        r"* ( ^v^ )   ",
        r"  _> ^ <_   ",
        r" / |   | \  ",
        r"  _|   |_   ",
    ],
];

impl FrameProvider for AsciiFrames {
    fn clip(&self, clip: Clip) -> &[Frame] {
        match clip {
            Clip::Idle => IDLE,
            Clip::Eat => EAT,
            Clip::Pet => PET,
            Clip::Sleep => SLEEP,
            Clip::FallAsleep => FALL_ASLEEP,
            Clip::WakeUp => WAKE_UP,
            Clip::Cheer => CHEER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_activity_has_frames() {
        for activity in Activity::ALL {
            assert!(AsciiFrames.clip_len(Clip::for_activity(activity)) > 0);
        }
    }

    #[test]
    fn frames_within_a_clip_share_a_shape() {
        for clip in [
            Clip::Idle,
            Clip::Eat,
            Clip::Pet,
            Clip::Sleep,
            Clip::FallAsleep,
            Clip::WakeUp,
            Clip::Cheer,
        ] {
            let frames = AsciiFrames.clip(clip);
            let rows = frames[0].len();
            for frame in frames {
                assert_eq!(frame.len(), rows, "{clip:?}");
            }
        }
    }

    #[test]
    fn only_sleep_has_transitions() {
        assert_eq!(Clip::lead_in(Activity::Sleeping), Some(Clip::FallAsleep));
        assert_eq!(Clip::lead_out(Activity::Sleeping), Some(Clip::WakeUp));
        assert_eq!(Clip::lead_in(Activity::Eating), None);
        assert_eq!(Clip::lead_out(Activity::Playing), None);
    }
}
