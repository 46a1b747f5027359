//! Piecewise-linear curves over the unit domain

use serde::{Deserialize, Serialize};

/// A control point of a [`MultiplierCurve`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

/// A curve sampled by linear interpolation between keyframes
///
/// Inputs outside the first/last keyframe clamp to the end values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierCurve {
    keys: Vec<Keyframe>,
}

impl MultiplierCurve {
    /// Flat curve at 1 across [0, 1]
    pub fn flat() -> Self {
        Self::linear(0.0, 1.0, 1.0, 1.0)
    }

    /// Straight line between two points
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        Self {
            keys: vec![
                Keyframe { time: t0, value: v0 },
                Keyframe { time: t1, value: v1 },
            ],
        }
    }

    /// Spread values evenly across [0, 1] in input order
    ///
    /// With fewer than two values the curve is [`MultiplierCurve::flat`].
    pub fn from_values(values: &[f32]) -> Self {
        if values.len() < 2 {
            return Self::flat();
        }
        let last = (values.len() - 1) as f32;
        let keys = values
            .iter()
            .enumerate()
            .map(|(i, &value)| Keyframe {
                time: i as f32 / last,
                value,
            })
            .collect();
        Self { keys }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Sample the curve
    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 1.0,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.value;
                }
                return a.value + (b.value - a.value) * (t - a.time) / span;
            }
        }
        last.value
    }
}

impl Default for MultiplierCurve {
    fn default() -> Self {
        Self::flat()
    }
}
