use serde::{Deserialize, Serialize};

/// Page rotation in quarter turns. Each step is 90° clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageOrientation {
    #[default]
    ZeroPi,
    HalfPi,
    OnePi,
    OneHalfPi,
}

impl PageOrientation {
    const ALL: [PageOrientation; 4] = [
        PageOrientation::ZeroPi,
        PageOrientation::HalfPi,
        PageOrientation::OnePi,
        PageOrientation::OneHalfPi,
    ];

    /// Normalize any step count into one of the four orientations.
    pub fn from_steps(steps: i64) -> Self {
        let mut normalized = steps % 4;
        while normalized < 0 {
            normalized += 4;
        }
        Self::ALL[normalized as usize]
    }

    pub fn steps(self) -> i64 {
        match self {
            PageOrientation::ZeroPi => 0,
            PageOrientation::HalfPi => 1,
            PageOrientation::OnePi => 2,
            PageOrientation::OneHalfPi => 3,
        }
    }

    pub fn clockwise(self) -> Self {
        Self::from_steps(self.steps() + 1)
    }

    pub fn counter_clockwise(self) -> Self {
        Self::from_steps(self.steps() - 1)
    }

    /// 90° or 270°: page width and height trade places on screen.
    pub fn is_quarter_turned(self) -> bool {
        self.steps() % 2 == 1
    }

    pub fn degrees(self) -> u16 {
        self.steps() as u16 * 90
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn last_orientation_wraps_to_zero() {
        assert_eq!(PageOrientation::OneHalfPi.clockwise(), PageOrientation::ZeroPi);
        assert_eq!(PageOrientation::ZeroPi.counter_clockwise(), PageOrientation::OneHalfPi);
    }

    #[test]
    fn negative_steps_normalize() {
        assert_eq!(PageOrientation::from_steps(-1), PageOrientation::OneHalfPi);
        assert_eq!(PageOrientation::from_steps(-6), PageOrientation::OnePi);
        assert_eq!(PageOrientation::from_steps(9), PageOrientation::HalfPi);
    }

    #[test]
    fn degrees_follow_steps() {
        assert_eq!(PageOrientation::ZeroPi.degrees(), 0);
        assert_eq!(PageOrientation::HalfPi.degrees(), 90);
        assert_eq!(PageOrientation::OnePi.degrees(), 180);
        assert_eq!(PageOrientation::OneHalfPi.degrees(), 270);
    }

    proptest! {
        #[test]
        fn from_steps_is_total_and_periodic(steps in -10_000i64..10_000) {
            let orientation = PageOrientation::from_steps(steps);
            prop_assert!((0..4).contains(&orientation.steps()));
            prop_assert_eq!(orientation, PageOrientation::from_steps(steps + 4));
        }

        #[test]
        fn four_clockwise_turns_are_identity(steps in 0i64..4) {
            let start = PageOrientation::from_steps(steps);
            let turned = start.clockwise().clockwise().clockwise().clockwise();
            prop_assert_eq!(start, turned);
        }
    }
}
