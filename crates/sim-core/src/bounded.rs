//! Clamp-on-write numeric values.
//!
//! Every ranged field in the world state is one of these types, so a write can
//! never leave the declared range. Deserialization clamps as well.

use serde::{Deserialize, Serialize};

fn clamp_value(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return 0.0_f32.clamp(min, max);
    }
    value.clamp(min, max)
}

macro_rules! bounded_f32 {
    ($(#[$meta:meta])* $name:ident, $min:expr, $max:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
        #[serde(from = "f32", into = "f32")]
        pub struct $name(f32);

        impl $name {
            pub const MIN: f32 = $min;
            pub const MAX: f32 = $max;

            pub fn new(value: f32) -> Self {
                Self(clamp_value(value, Self::MIN, Self::MAX))
            }

            pub fn get(self) -> f32 {
                self.0
            }

            pub fn set(&mut self, value: f32) {
                self.0 = clamp_value(value, Self::MIN, Self::MAX);
            }

            pub fn add(&mut self, delta: f32) {
                self.set(self.0 + delta);
            }
        }

        impl From<f32> for $name {
            fn from(value: f32) -> Self {
                Self::new(value)
            }
        }

        impl From<$name> for f32 {
            fn from(value: $name) -> f32 {
                value.0
            }
        }
    };
}

bounded_f32!(
    /// Percentage in [0, 100]: approval, trust, autonomy, issue intensity.
    Percent,
    0.0,
    100.0
);

bounded_f32!(
    /// Market share ratio in [0, 1].
    Share,
    0.0,
    1.0
);

bounded_f32!(
    /// Non-negative resource amount: data, processing power, influence.
    Amount,
    0.0,
    f32::INFINITY
);
