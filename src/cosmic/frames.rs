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

use super::nutation::{celestial_pole, FundamentalArguments, Iers2003Arguments};
use super::{AfterValidityCeilingSnafu, BeforeValidityFloorSnafu, FrameError};
use crate::linalg::{Matrix3, Vector3};
use crate::time::Epoch;
use crate::utils::{r3, tilde_matrix};
use snafu::ensure;
use std::f64::consts::TAU;

/// Julian date of the J2000 reference epoch.
pub const J2000_JD: f64 = 2_451_545.0;

/// Number of days in a Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Earth rotation rate about its polar axis, in radians per second.
pub const EARTH_ROTATION_RATE_RAD_S: f64 = 7.292_115_146_706_979e-5;

/// Returns the earliest epoch accepted by [`utc_to_julian_date`], i.e. 1900-03-01T00:00:00 UTC.
pub fn julian_date_validity_floor() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(1900, 3, 1)
}

/// Returns the first epoch rejected by [`utc_to_julian_date`], i.e. 2100-03-01T00:00:00 UTC.
pub fn julian_date_validity_ceiling() -> Epoch {
    Epoch::from_gregorian_utc_at_midnight(2100, 3, 1)
}

/// Converts a UTC epoch to a Julian date using the integer calendar formula.
///
/// The formula ignores the Gregorian century rule, so it is only valid between 1900-03-01 and
/// 2100-02-28 inclusive: earlier epochs return [`FrameError::BeforeValidityFloor`] and epochs from
/// 2100-03-01 onward return [`FrameError::AfterValidityCeiling`].
pub fn utc_to_julian_date(epoch: Epoch) -> Result<f64, FrameError> {
    ensure!(
        epoch >= julian_date_validity_floor(),
        BeforeValidityFloorSnafu { epoch }
    );
    ensure!(
        epoch < julian_date_validity_ceiling(),
        AfterValidityCeilingSnafu { epoch }
    );

    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
    let (year, month, day) = (i64::from(year), i64::from(month), i64::from(day));

    let julian_day = 367 * year - 7 * (year + (month + 9) / 12) / 4 + 275 * month / 9 + day;

    let day_fraction = (f64::from(hour)
        + f64::from(minute) / 60.0
        + (f64::from(second) + 1e-9 * f64::from(nanos)) / 3600.0)
        / 24.0;

    Ok(julian_day as f64 + 1_721_013.5 + day_fraction)
}

/// Returns the number of Julian centuries elapsed since J2000 for this UTC epoch.
pub fn julian_century(epoch: Epoch) -> Result<f64, FrameError> {
    Ok((utc_to_julian_date(epoch)? - J2000_JD) / DAYS_PER_JULIAN_CENTURY)
}

/// Earth rotation angle in radians (unwrapped) for the provided Julian century.
pub fn earth_rotation_angle(julian_century: f64) -> f64 {
    TAU * (0.779_057_273_264_0 + 1.002_737_811_911_354_48 * DAYS_PER_JULIAN_CENTURY * julian_century)
}

/// Builds the precession-nutation matrix from the celestial pole coordinates, in radians.
pub fn precession_nutation_matrix(pole_x: f64, pole_y: f64) -> Matrix3<f64> {
    let a = 0.5 + 0.125 * (pole_x * pole_x + pole_y * pole_y);
    Matrix3::new(
        1.0 - a * pole_x * pole_x,
        -a * pole_x * pole_y,
        pole_x,
        -a * pole_x * pole_y,
        1.0 - a * pole_y * pole_y,
        pole_y,
        -pole_x,
        -pole_y,
        1.0 - a * (pole_x * pole_x + pole_y * pole_y),
    )
}

/// Returns the ECEF to ECI direction cosine matrix for the provided Julian century,
/// using the IERS 2003 fundamental arguments.
///
/// Rotation is applied to the vector components: `r_eci = dcm * r_ecef`.
pub fn dcm_ecef_to_eci(julian_century: f64) -> Matrix3<f64> {
    dcm_ecef_to_eci_with(&Iers2003Arguments, julian_century)
}

/// Same as [`dcm_ecef_to_eci`] but with a caller supplied provider of the fundamental arguments.
pub fn dcm_ecef_to_eci_with<A: FundamentalArguments + ?Sized>(
    arguments: &A,
    julian_century: f64,
) -> Matrix3<f64> {
    let earth_matrix = r3(earth_rotation_angle(julian_century));
    let (pole_x, pole_y) = celestial_pole(arguments, julian_century);
    precession_nutation_matrix(pole_x, pole_y) * earth_matrix
}

/// Time derivative of the Earth rotation, such that `d(R3(θ))/dt = R3(θ) * Ω`.
pub fn earth_rotation_derivative() -> Matrix3<f64> {
    tilde_matrix(&Vector3::new(0.0, 0.0, EARTH_ROTATION_RATE_RAD_S))
}

/// Rotates an ECEF position into the ECI frame at the provided UTC epoch.
pub fn ecef_to_eci(position: &Vector3<f64>, epoch: Epoch) -> Result<Vector3<f64>, FrameError> {
    let dcm = dcm_ecef_to_eci(julian_century(epoch)?);
    Ok(dcm * position)
}

/// Rotates an ECEF position and velocity into the ECI frame at the provided UTC epoch.
///
/// The velocity includes the transport term due to the Earth's rotation, so a point at rest on the
/// ground has an inertial velocity of `ω⊕ × r`. Velocity units follow the position units per second.
pub fn ecef_to_eci_with_velocity(
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    epoch: Epoch,
) -> Result<(Vector3<f64>, Vector3<f64>), FrameError> {
    let dcm = dcm_ecef_to_eci(julian_century(epoch)?);
    let eci_position = dcm * position;
    let eci_velocity = dcm * velocity + (dcm * earth_rotation_derivative()) * position;
    Ok((eci_position, eci_velocity))
}

/// Rotates an ECI position back into the ECEF frame, the inverse of [`ecef_to_eci`].
pub fn eci_to_ecef(position: &Vector3<f64>, epoch: Epoch) -> Result<Vector3<f64>, FrameError> {
    let dcm = dcm_ecef_to_eci(julian_century(epoch)?);
    Ok(dcm.transpose() * position)
}
