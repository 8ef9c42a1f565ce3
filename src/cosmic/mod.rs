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

use crate::time::Epoch;
use snafu::Snafu;

/// Earth fixed to inertial rotations, valid from March 1900 to February 2100.
pub mod frames;
pub use self::frames::*;

/// Precession and nutation of the celestial pole, and the fundamental lunisolar arguments driving it.
pub mod nutation;
pub use self::nutation::{FundamentalArguments, Iers2003Arguments};

/// The eclipse module computes the solar direction and whether a state is in the Earth's shadow.
pub mod eclipse;
pub use self::eclipse::CylindricalShadow;

mod solar;
pub use self::solar::*;

/// Astronomical unit, in kilometers, according to the [IAU](https://www.iau.org/public/themes/measuring/).
pub const AU: f64 = 149_597_870.700;

/// Earth equatorial radius in kilometers (IERS 2003).
pub const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6_378.1363;

/// Total solar irradiance at one astronomical unit, in W/m^2.
pub const SOLAR_CONSTANT_W_M2: f64 = 1_361.0;

/// Arcseconds to radians.
pub const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * 3600.0);

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FrameError {
    #[snafu(display(
        "{epoch} precedes 1900-03-01 UTC, the validity floor of the Julian date conversion"
    ))]
    BeforeValidityFloor { epoch: Epoch },
    #[snafu(display(
        "{epoch} is on or after 2100-03-01 UTC, past the validity ceiling of the Julian date conversion"
    ))]
    AfterValidityCeiling { epoch: Epoch },
}
