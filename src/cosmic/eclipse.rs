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

use super::solar::{Irradiance, IrradianceModel};
use super::{AU, EARTH_EQUATORIAL_RADIUS_KM, J2000_JD, SOLAR_CONSTANT_W_M2};
use crate::linalg::Vector3;
use crate::time::Epoch;
use serde::{Deserialize, Serialize};
use std::fmt;
use typed_builder::TypedBuilder;

/// Low precision geocentric position of the Sun, in kilometers, in the equatorial frame of date.
///
/// From the Astronomical Almanac algorithm, accurate to about 0.01 degree between 1950 and 2050,
/// which is plenty for shadow and flux estimates.
pub fn sun_position_km(julian_date: f64) -> Vector3<f64> {
    let n = julian_date - J2000_JD;
    let mean_longitude = (280.460 + 0.985_647_4 * n).to_radians();
    let mean_anomaly = (357.528 + 0.985_600_3 * n).to_radians();
    let ecliptic_longitude = mean_longitude
        + (1.915_f64.to_radians()) * mean_anomaly.sin()
        + (0.020_f64.to_radians()) * (2.0 * mean_anomaly).sin();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();
    let distance_au =
        1.000_14 - 0.016_71 * mean_anomaly.cos() - 0.000_14 * (2.0 * mean_anomaly).cos();

    let (sin_lambda, cos_lambda) = ecliptic_longitude.sin_cos();
    distance_au
        * AU
        * Vector3::new(
            cos_lambda,
            obliquity.cos() * sin_lambda,
            obliquity.sin() * sin_lambda,
        )
}

/// Irradiance model with a cylindrical Earth shadow: the spacecraft is either fully lit or in umbra.
///
/// The flux on the array is scaled with the inverse square of the Sun distance.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct CylindricalShadow {
    /// Area of the solar array facing the Sun, in m^2
    pub array_area_m2: f64,
    /// Solar flux at one astronomical unit, in W/m^2
    #[builder(default = SOLAR_CONSTANT_W_M2)]
    pub solar_flux_w_m2: f64,
    /// Radius of the shadow cylinder, in km
    #[builder(default = EARTH_EQUATORIAL_RADIUS_KM)]
    pub shadow_radius_km: f64,
}

impl CylindricalShadow {
    /// Returns true if the provided inertial position (in km) is behind the Earth as seen from the Sun.
    pub fn in_shadow(&self, eci_position_km: &Vector3<f64>, sun_km: &Vector3<f64>) -> bool {
        let sun_hat = sun_km.normalize();
        let along_sun = eci_position_km.dot(&sun_hat);
        if along_sun >= 0.0 {
            return false;
        }
        let perpendicular = eci_position_km - along_sun * sun_hat;
        perpendicular.norm() < self.shadow_radius_km
    }
}

impl IrradianceModel for CylindricalShadow {
    fn irradiance(&self, eci_position_km: &Vector3<f64>, epoch: Epoch) -> Irradiance {
        let sun_km = sun_position_km(epoch.to_jde_utc_days());
        let sun_distance_au = (sun_km - eci_position_km).norm() / AU;
        let eclipse_factor = if self.in_shadow(eci_position_km, &sun_km) {
            0.0
        } else {
            1.0
        };
        Irradiance {
            irradiance_w: self.solar_flux_w_m2 * self.array_area_m2 / sun_distance_au.powi(2),
            eclipse_factor,
        }
    }
}

impl fmt::Display for CylindricalShadow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "cylindrical shadow (R = {} km), {} m^2 array at {} W/m^2",
            self.shadow_radius_km, self.array_area_m2, self.solar_flux_w_m2
        )
    }
}
