//! Definitions of important types used throughout the project

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialOrd, PartialEq)]
pub struct Degrees(pub f64);

impl Display for Degrees {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("{:.2}deg", self.0))
    }
}

/// Absolute orientation reported by the fused sensor
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EulerAngles {
    pub heading: Degrees,
    pub roll: Degrees,
    pub pitch: Degrees,
}
