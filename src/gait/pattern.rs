//! Gait patterns as data: start states and step sequencing.
//!
//! Each gait is one record here rather than conditionals scattered
//! through the state machine, so a new pattern is a new table row and
//! the match arms stay exhaustive.
use core::fmt::Display;

use crate::robot::config::LEG_COUNT;
use crate::robot::leg::Leg;

/// Phase of one leg within the active gait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegState {
    /// Parked at its current foothold.
    Stop,
    /// Moving straight at an explicitly commanded foothold.
    TargetSwing,
    /// Grounded, sliding opposite the body's travel.
    Stance,
    /// Airborne, repositioning for the next stride.
    Swing,
}

impl Display for LegState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LegState::Stop => f.write_str("stop"),
            LegState::TargetSwing => f.write_str("target-swing"),
            LegState::Stance => f.write_str("stance"),
            LegState::Swing => f.write_str("swing"),
        }
    }
}

/// A named leg-coordination pattern; exactly one is active robot-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    /// Single-leg positioning for calibration and manual placement.
    Target = 0,
    Tripod = 1,
    Wave = 2,
    Ripple = 3,
}

impl Display for Gait {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Gait::Target => f.write_str("target"),
            Gait::Tripod => f.write_str("tripod"),
            Gait::Wave => f.write_str("wave"),
            Gait::Ripple => f.write_str("ripple"),
        }
    }
}

/// Rejected gait selector from the command input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaitSelectError(pub u8);

impl TryFrom<u8> for Gait {
    type Error = GaitSelectError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Gait::Target),
            1 => Ok(Gait::Tripod),
            2 => Ok(Gait::Wave),
            3 => Ok(Gait::Ripple),
            other => Err(GaitSelectError(other)),
        }
    }
}

static TRIPOD_SEQUENCE: [&[Leg]; 2] = [
    &[Leg::FrontRight, Leg::MidLeft, Leg::BackRight],
    &[Leg::FrontLeft, Leg::MidRight, Leg::BackLeft],
];

static WAVE_SEQUENCE: [&[Leg]; 6] = [
    &[Leg::FrontRight],
    &[Leg::MidRight],
    &[Leg::BackRight],
    &[Leg::FrontLeft],
    &[Leg::MidLeft],
    &[Leg::BackLeft],
];

static RIPPLE_SEQUENCE: [&[Leg]; 6] = [
    &[Leg::FrontRight],
    &[Leg::BackLeft],
    &[Leg::MidRight],
    &[Leg::FrontLeft],
    &[Leg::BackRight],
    &[Leg::MidLeft],
];

impl Gait {
    /// Initial phase of every leg (fr..bl) when this gait is committed.
    pub fn start_states(self) -> [LegState; LEG_COUNT] {
        use LegState::*;
        match self {
            Gait::Target => [TargetSwing, Stop, Stop, Stop, Stop, Stop],
            Gait::Tripod => [Swing, Stance, Stance, Swing, Swing, Stance],
            Gait::Wave | Gait::Ripple => [Swing, Stance, Stance, Stance, Stance, Stance],
        }
    }

    /// Step groups in firing order; group 0 matches the swing legs of
    /// [`Gait::start_states`]. Empty for the positioning gait.
    pub fn step_sequence(self) -> &'static [&'static [Leg]] {
        match self {
            Gait::Target => &[],
            Gait::Tripod => &TRIPOD_SEQUENCE,
            Gait::Wave => &WAVE_SEQUENCE,
            Gait::Ripple => &RIPPLE_SEQUENCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_accepts_only_known_gaits() {
        assert_eq!(Gait::try_from(0), Ok(Gait::Target));
        assert_eq!(Gait::try_from(3), Ok(Gait::Ripple));
        assert_eq!(Gait::try_from(4), Err(GaitSelectError(4)));
        assert_eq!(Gait::try_from(255), Err(GaitSelectError(255)));
    }

    #[test]
    fn first_step_group_matches_start_state_swings() {
        for gait in [Gait::Tripod, Gait::Wave, Gait::Ripple] {
            let starts = gait.start_states();
            let first = gait.step_sequence()[0];
            for leg in Leg::ALL {
                let starts_swinging = starts[leg as usize] == LegState::Swing;
                assert_eq!(starts_swinging, first.contains(&leg), "{gait} {leg}");
            }
        }
    }

    #[test]
    fn step_sequences_cover_every_leg_once() {
        for gait in [Gait::Tripod, Gait::Wave, Gait::Ripple] {
            let mut seen = [0usize; LEG_COUNT];
            for group in gait.step_sequence() {
                for &leg in *group {
                    seen[leg as usize] += 1;
                }
            }
            assert_eq!(seen, [1; LEG_COUNT], "{gait}");
        }
    }

    #[test]
    fn positioning_gait_has_no_step_sequence() {
        assert!(Gait::Target.step_sequence().is_empty());
        assert_eq!(Gait::Target.start_states()[0], LegState::TargetSwing);
    }
}
