use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, ColorResult};

/// CIE 1931 xy chromaticity coordinate
#[derive(Copy, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct XY {
    pub x: f64,
    pub y: f64,
}

impl XY {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Fails if this point cannot be lifted to a tristimulus value
    /// (y is zero, subnormal or either coordinate is not finite).
    pub fn check(&self, what: &str) -> ColorResult<()> {
        if self.x.is_finite() && self.y.is_normal() {
            Ok(())
        } else {
            Err(ColorError::InvalidChromaticity {
                what: what.to_string(),
                x: self.x,
                y: self.y,
            })
        }
    }

    /// Tristimulus value of this chromaticity, normalized to Y = 1
    pub fn to_xyz(&self) -> ColorResult<XYZ> {
        self.check("chromaticity")?;

        Ok(XYZ {
            x: self.x / self.y,
            y: 1.0,
            z: (1.0 - self.x - self.y) / self.y,
        })
    }
}

impl From<[f64; 2]> for XY {
    fn from(value: [f64; 2]) -> Self {
        Self {
            x: value[0],
            y: value[1],
        }
    }
}

impl From<XY> for [f64; 2] {
    fn from(value: XY) -> Self {
        [value.x, value.y]
    }
}

impl Display for XY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.x, self.y)
    }
}

/// CIE XYZ tristimulus value
#[derive(Copy, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct XYZ {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl XYZ {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projects back onto the xy plane. Returns `None` for the black point.
    #[must_use]
    pub fn chromaticity(&self) -> Option<XY> {
        let sum = self.x + self.y + self.z;
        if sum.is_normal() {
            Some(XY::new(self.x / sum, self.y / sum))
        } else {
            None
        }
    }
}

impl From<[f64; 3]> for XYZ {
    fn from(value: [f64; 3]) -> Self {
        Self {
            x: value[0],
            y: value[1],
            z: value[2],
        }
    }
}

impl From<XYZ> for [f64; 3] {
    fn from(value: XYZ) -> Self {
        [value.x, value.y, value.z]
    }
}
