use core::fmt::Display;

use super::config::LEG_COUNT;

/// One of the six legs, in servo bus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    FrontRight = 0,
    FrontLeft = 1,
    MidRight = 2,
    MidLeft = 3,
    BackRight = 4,
    BackLeft = 5,
}

impl Leg {
    pub const ALL: [Leg; LEG_COUNT] = [
        Leg::FrontRight,
        Leg::FrontLeft,
        Leg::MidRight,
        Leg::MidLeft,
        Leg::BackRight,
        Leg::BackLeft,
    ];
}

impl Display for Leg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Leg::FrontRight => f.write_str("Front right"),
            Leg::FrontLeft => f.write_str("Front left"),
            Leg::MidRight => f.write_str("Mid right"),
            Leg::MidLeft => f.write_str("Mid left"),
            Leg::BackRight => f.write_str("Back right"),
            Leg::BackLeft => f.write_str("Back left"),
        }
    }
}

impl From<usize> for Leg {
    fn from(value: usize) -> Self {
        match value {
            0 => Leg::FrontRight,
            1 => Leg::FrontLeft,
            2 => Leg::MidRight,
            3 => Leg::MidLeft,
            4 => Leg::BackRight,
            5 => Leg::BackLeft,
            _ => unreachable!(),
        }
    }
}
