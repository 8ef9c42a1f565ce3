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

use super::ARCSEC_TO_RAD;

/// Provider of the lunisolar fundamental arguments used by the nutation series.
///
/// All arguments are polynomials in the Julian century since J2000 and are returned in arcseconds.
pub trait FundamentalArguments {
    /// Mean elongation of the Moon from the Sun (D)
    fn moon_elongation(&self, julian_century: f64) -> f64;
    /// Mean anomaly of the Sun (l')
    fn sun_anomaly(&self, julian_century: f64) -> f64;
    /// Mean argument of latitude of the Moon (F)
    fn moon_latitude_argument(&self, julian_century: f64) -> f64;
    /// Mean longitude of the ascending node of the Moon (Ω)
    fn moon_ascending_node(&self, julian_century: f64) -> f64;
}

/// Fundamental arguments from the IERS Conventions (2003), eq. 5.43.
#[derive(Copy, Clone, Debug, Default)]
pub struct Iers2003Arguments;

impl FundamentalArguments for Iers2003Arguments {
    fn moon_elongation(&self, julian_century: f64) -> f64 {
        horner(
            &[
                1_072_260.703_692,
                1_602_961_601.209_0,
                -6.370_6,
                0.006_593,
                -0.000_031_69,
            ],
            julian_century,
        )
    }

    fn sun_anomaly(&self, julian_century: f64) -> f64 {
        horner(
            &[
                1_287_104.793_048,
                129_596_581.048_1,
                -0.553_2,
                0.000_136,
                -0.000_011_49,
            ],
            julian_century,
        )
    }

    fn moon_latitude_argument(&self, julian_century: f64) -> f64 {
        horner(
            &[
                335_779.526_232,
                1_739_527_262.847_8,
                -12.751_2,
                -0.001_037,
                0.000_004_17,
            ],
            julian_century,
        )
    }

    fn moon_ascending_node(&self, julian_century: f64) -> f64 {
        horner(
            &[
                450_160.398_036,
                -6_962_890.543_1,
                7.472_2,
                0.007_702,
                -0.000_059_39,
            ],
            julian_century,
        )
    }
}

/// Precession part of the X coordinate of the celestial pole, in arcseconds (IERS 2003, eq. 5.16).
pub fn precession_x(julian_century: f64) -> f64 {
    horner(
        &[
            -0.016_617,
            2_004.191_898,
            -0.429_782_9,
            -0.198_618_34,
            0.000_007_578,
            0.000_005_928_5,
        ],
        julian_century,
    )
}

/// Precession part of the Y coordinate of the celestial pole, in arcseconds (IERS 2003, eq. 5.16).
pub fn precession_y(julian_century: f64) -> f64 {
    horner(
        &[
            -0.006_951,
            -0.025_896,
            -22.407_274_7,
            0.001_900_59,
            0.001_112_526,
            0.000_000_135_8,
        ],
        julian_century,
    )
}

/// Computes the X and Y coordinates of the celestial pole in radians, including the largest nutation terms.
pub fn celestial_pole<A: FundamentalArguments + ?Sized>(
    arguments: &A,
    julian_century: f64,
) -> (f64, f64) {
    let t = julian_century;

    let omega = arguments.moon_ascending_node(t) * ARCSEC_TO_RAD;
    let d = arguments.moon_elongation(t) * ARCSEC_TO_RAD;
    let f = arguments.moon_latitude_argument(t) * ARCSEC_TO_RAD;
    let l_prime = arguments.sun_anomaly(t) * ARCSEC_TO_RAD;

    let f_omega_d = 2.0 * (f + omega - d);

    // Nutation coefficients are in micro-arcseconds
    let nutation_x = 1e-6
        * ((-6_844_318.44 * omega.sin() - 523_908.04 * f_omega_d.sin()
            - 90_552.22 * (2.0 * (f + omega)).sin()
            + 82_168.76 * (2.0 * omega).sin()
            + 58_707.02 * l_prime.sin())
            + t * (205_833.11 * omega.cos() + 12_814.01 * f_omega_d.cos()));

    let nutation_y = 1e-6
        * ((9_205_236.26 * omega.cos()
            + 573_033.42 * f_omega_d.cos()
            + 97_846.69 * (2.0 * (f + omega)).cos()
            - 89_618.24 * (2.0 * omega).cos()
            + 22_438.42 * (l_prime - f_omega_d).cos())
            + t * (153_041.79 * omega.sin() + 11_714.49 * f_omega_d.sin()));

    (
        (precession_x(t) + nutation_x) * ARCSEC_TO_RAD,
        (precession_y(t) + nutation_y) * ARCSEC_TO_RAD,
    )
}

/// Evaluates a polynomial whose coefficients are in increasing order of power.
fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}
