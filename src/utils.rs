/*
    CubeSat EPS, power-constrained operating mode control
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::linalg::{Matrix3, Vector3};
use approx::abs_diff_eq;

/// Returns the tilde matrix from the provided Vector3.
pub fn tilde_matrix(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0,
        -v[(2, 0)],
        v[(1, 0)],
        v[(2, 0)],
        0.0,
        -v[(0, 0)],
        -v[(1, 0)],
        v[(0, 0)],
        0.0,
    )
}

/// Rotation about the third axis by `angle_rad`, applied to vector components.
///
/// This rotates a vector expressed in a frame spun by `angle_rad` back into the non-spun frame,
/// which is the direction needed to go from Earth fixed to inertial.
pub fn r3(angle_rad: f64) -> Matrix3<f64> {
    let (s_theta, c_theta) = angle_rad.sin_cos();
    Matrix3::new(c_theta, -s_theta, 0.0, s_theta, c_theta, 0.0, 0.0, 0.0, 1.0)
}

/// Returns whether `m * m^T` is the identity matrix to within `tolerance` on every entry.
pub fn is_orthonormal(m: &Matrix3<f64>, tolerance: f64) -> bool {
    let product = m * m.transpose();
    let identity = Matrix3::identity();
    for i in 0..3 {
        for j in 0..3 {
            if !abs_diff_eq!(product[(i, j)], identity[(i, j)], epsilon = tolerance) {
                return false;
            }
        }
    }
    true
}
