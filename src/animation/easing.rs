//! Easing curves.
//!
//! Every curve maps `t` in `[0, 1]` to progress with `f(0) = 0` and
//! `f(1) = 1`. Elastic and back curves leave `[0, 1]` on the way; clamping,
//! when wanted, happens on the positional output, never here.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Easing curve for a timed transition.
///
/// Deserializes from kebab-case names (`"linear"`, `"cubic-out"`) or, for
/// parameterized curves, a table (`{ elastic = { bounciness = 1.5 } }`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    Linear,
    QuadOut,
    CubicOut,
    ExpOut,
    /// Spring-like oscillation; bounciness 1 overshoots a little, once.
    Elastic { bounciness: f64 },
    /// Overshoots the target and settles back.
    Back { overshoot: f64 },
}

impl Easing {
    /// The bubble curve: elastic with the default bounciness.
    pub const BUBBLE: Self = Self::Elastic { bounciness: 1.0 };

    /// Apply the curve. `t` is clamped to `[0, 1]` first.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::ExpOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::Elastic { bounciness } => {
                let p = bounciness.max(0.0) * PI;
                1.0 - (t * PI / 2.0).cos().powi(3) * (t * p).cos()
            }
            Self::Back { overshoot } => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u.powi(3) + overshoot * u * u
            }
        }
    }
}
