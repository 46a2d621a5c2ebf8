use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, ColorResult};

/// Pivots below this, relative to the largest entry of their row, are
/// treated as zero.
const PIVOT_EPSILON: f64 = 1e-12;

/// Row-major 3x3 matrix
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix3(pub [[f64; 3]; 3]);

impl Matrix3 {
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0], //
        [0.0, 1.0, 0.0], //
        [0.0, 0.0, 1.0], //
    ]);

    #[must_use]
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self(rows)
    }

    #[must_use]
    pub const fn from_columns(c: [[f64; 3]; 3]) -> Self {
        Self([
            [c[0][0], c[1][0], c[2][0]], //
            [c[0][1], c[1][1], c[2][1]], //
            [c[0][2], c[1][2], c[2][2]], //
        ])
    }

    #[must_use]
    pub const fn row(&self, index: usize) -> [f64; 3] {
        self.0[index]
    }

    #[must_use]
    pub const fn column(&self, index: usize) -> [f64; 3] {
        [self.0[0][index], self.0[1][index], self.0[2][index]]
    }

    #[must_use]
    pub const fn transposed(&self) -> Self {
        Self::from_columns(self.0)
    }

    /// Multiplies column `i` by `scale[i]`
    #[must_use]
    pub fn scale_columns(&self, scale: [f64; 3]) -> Self {
        Self(self.0.map(|row| [row[0] * scale[0], row[1] * scale[1], row[2] * scale[2]]))
    }

    #[allow(clippy::suboptimal_flops)]
    #[must_use]
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    #[must_use]
    pub fn is_singular(&self) -> bool {
        self.inverted().is_none()
    }

    /// Inverse by Gauss-Jordan elimination with row-scaled partial pivoting.
    #[must_use]
    pub fn inverted(&self) -> Option<Self> {
        let mut current = self.0;
        let mut inverse = Self::IDENTITY.0;

        // Scale every row to a largest entry of 1, so each pivot is judged
        // against the magnitude of its own row rather than the whole matrix
        for (row, inv_row) in current.iter_mut().zip(inverse.iter_mut()) {
            let scale = row.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()));
            if !scale.is_normal() {
                return None;
            }
            *row = row.map(|v| v / scale);
            *inv_row = inv_row.map(|v| v / scale);
        }

        for i in 0..3 {
            // Pick the row with the largest pivot in this column
            let pivot = (i..3)
                .max_by(|&a, &b| current[a][i].abs().total_cmp(&current[b][i].abs()))
                .unwrap_or(i);

            // Also catches NaN
            if !(current[pivot][i].abs() > PIVOT_EPSILON) {
                return None;
            }

            current.swap(i, pivot);
            inverse.swap(i, pivot);

            let inv = 1.0 / current[i][i];
            for c in 0..3 {
                current[i][c] *= inv;
                inverse[i][c] *= inv;
            }

            for r in 0..3 {
                if r == i {
                    continue;
                }
                let p = current[r][i];
                if p != 0.0 {
                    for c in 0..3 {
                        current[r][c] -= current[i][c] * p;
                        inverse[r][c] -= inverse[i][c] * p;
                    }
                }
            }
        }

        if inverse.iter().flatten().all(|v| v.is_finite()) {
            Some(Self(inverse))
        } else {
            None
        }
    }

    /// Like [`Matrix3::inverted`], but reports `what` failed to invert.
    pub fn try_inverted(&self, what: &str) -> ColorResult<Self> {
        self.inverted()
            .ok_or_else(|| ColorError::SingularMatrix(what.to_string()))
    }

    #[allow(clippy::suboptimal_flops)]
    #[must_use]
    pub fn mult(&self, d: [f64; 3]) -> [f64; 3] {
        self.0
            .map(|row| d[0] * row[0] + d[1] * row[1] + d[2] * row[2])
    }

    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.0
            .iter()
            .flatten()
            .zip(other.0.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Mul for Matrix3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let columns = [0, 1, 2].map(|c| self.mult(rhs.column(c)));
        Self::from_columns(columns)
    }
}

impl Mul<[f64; 3]> for Matrix3 {
    type Output = [f64; 3];

    fn mul(self, rhs: [f64; 3]) -> [f64; 3] {
        self.mult(rhs)
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
