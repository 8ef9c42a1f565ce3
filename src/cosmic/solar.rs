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

use super::frames::ecef_to_eci;
use super::FrameError;
use crate::io::GenerationSample;
use crate::linalg::Vector3;
use crate::time::Epoch;
use serde::{Deserialize, Serialize};

/// Solar irradiance available to the arrays and the fraction of it left after eclipses.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Irradiance {
    /// Solar power incident on the arrays, in Watts, before eclipse attenuation
    pub irradiance_w: f64,
    /// 0.0 in umbra, 1.0 in full visibility, somewhere in between in penumbra
    pub eclipse_factor: f64,
}

/// Anything which can tell how much sunlight reaches the spacecraft at an inertial position and time.
pub trait IrradianceModel {
    fn irradiance(&self, eci_position_km: &Vector3<f64>, epoch: Epoch) -> Irradiance;
}

impl<M: IrradianceModel + ?Sized> IrradianceModel for &M {
    fn irradiance(&self, eci_position_km: &Vector3<f64>, epoch: Epoch) -> Irradiance {
        (**self).irradiance(eci_position_km, epoch)
    }
}

/// Constant irradiance, never eclipsed.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FullSun {
    pub irradiance_w: f64,
}

impl IrradianceModel for FullSun {
    fn irradiance(&self, _: &Vector3<f64>, _: Epoch) -> Irradiance {
        Irradiance {
            irradiance_w: self.irradiance_w,
            eclipse_factor: 1.0,
        }
    }
}

/// Predicts the generated power, in Watts, for a spacecraft at the provided ECEF position (km).
///
/// `generated = panel_efficiency * irradiance * eclipse_factor`, where the eclipse factor returned by
/// the model is clamped to [0, 1].
pub fn predict_power<M: IrradianceModel + ?Sized>(
    ecef_position_km: &Vector3<f64>,
    epoch: Epoch,
    panel_efficiency: f64,
    model: &M,
) -> Result<f64, FrameError> {
    let eci_position_km = ecef_to_eci(ecef_position_km, epoch)?;
    let irradiance = model.irradiance(&eci_position_km, epoch);
    if !(0.0..=1.0).contains(&irradiance.eclipse_factor) {
        warn!(
            "eclipse factor {} outside of [0, 1] at {epoch}, clamping",
            irradiance.eclipse_factor
        );
    }
    let eclipse_factor = irradiance.eclipse_factor.clamp(0.0, 1.0);
    Ok(panel_efficiency * irradiance.irradiance_w * eclipse_factor)
}

/// Solar power predictor for a given array efficiency and irradiance model.
#[derive(Clone, Debug)]
pub struct SolarPowerPredictor<M: IrradianceModel> {
    pub panel_efficiency: f64,
    pub model: M,
}

impl<M: IrradianceModel> SolarPowerPredictor<M> {
    pub fn new(panel_efficiency: f64, model: M) -> Self {
        Self {
            panel_efficiency,
            model,
        }
    }

    /// Predicts the generated power in Watts, see [`predict_power`].
    pub fn predict(&self, ecef_position_km: &Vector3<f64>, epoch: Epoch) -> Result<f64, FrameError> {
        predict_power(ecef_position_km, epoch, self.panel_efficiency, &self.model)
    }

    /// Predicts the generated power and wraps it in a sample ready for ingestion.
    pub fn sample(
        &self,
        ecef_position_km: &Vector3<f64>,
        epoch: Epoch,
    ) -> Result<GenerationSample, FrameError> {
        Ok(GenerationSample {
            epoch,
            power_w: self.predict(ecef_position_km, epoch)?,
        })
    }
}
