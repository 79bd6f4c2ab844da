//! Easing functions for animations

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

/// Overshoot used by the spring curves
const SPRING_OVERSHOOT: f32 = 1.70158;

/// An interpolation curve over the unit interval.
///
/// Named curves can be read from configuration (`"cubic_out"`, `"bounce_in"`,
/// ...). [`Easing::Custom`] wraps any function and is never serialized.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    SinIn,
    SinOut,
    SinInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    BounceIn,
    BounceOut,
    SpringIn,
    SpringOut,
    #[serde(skip)]
    Custom(fn(f32) -> f32),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SinIn => 1.0 - (t * FRAC_PI_2).cos(),
            Easing::SinOut => (t * FRAC_PI_2).sin(),
            Easing::SinInOut => -(PI * t).cos() / 2.0 + 0.5,
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => (t - 1.0).powi(3) + 1.0,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::BounceIn => 1.0 - bounce_out(1.0 - t),
            Easing::BounceOut => bounce_out(t),
            Easing::SpringIn => t * t * ((SPRING_OVERSHOOT + 1.0) * t - SPRING_OVERSHOOT),
            Easing::SpringOut => {
                let p = t - 1.0;
                p * p * ((SPRING_OVERSHOOT + 1.0) * p + SPRING_OVERSHOOT) + 1.0
            }
            Easing::Custom(f) => f(t),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}
