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

use super::{Action, DutyCycleProfile, OperatingMode, Subsystem};
use crate::io::{
    ConfigError, ConfigRepr, InvalidBatterySnafu, InvalidDutyCycleSnafu, InvalidPowerDrawSnafu,
    MissingPowerSnafu, MissingProfileSnafu,
};
use serde::{Deserialize, Serialize};
use snafu::{ensure, OptionExt};
use std::collections::BTreeMap;

/// Static configuration of the electrical power subsystem.
///
/// Loaded once at start up, validated, then shared read-only with the power budget engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsConfig {
    /// Battery capacity in Watt-hours
    pub battery_capacity_wh: f64,
    /// Battery level at start up in Watt-hours, defaults to a full battery
    #[serde(default)]
    pub initial_level_wh: Option<f64>,
    /// Instantaneous power draw of each action, in Watts
    pub power_draw_w: BTreeMap<Action, f64>,
    /// Duty cycle profile of each operating mode
    pub profiles: BTreeMap<OperatingMode, DutyCycleProfile>,
}

impl ConfigRepr for EpsConfig {
    /// Loading an EPS configuration fails on the first [`EpsConfig::validate`] error.
    fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }
}

impl EpsConfig {
    /// Checks that the battery is physical, that every mode has a duty cycle profile, and that every
    /// action referenced by a profile has a valid power draw.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level_wh = self.initial_level_wh();
        ensure!(
            self.battery_capacity_wh.is_finite()
                && self.battery_capacity_wh > 0.0
                && level_wh.is_finite()
                && (0.0..=self.battery_capacity_wh).contains(&level_wh),
            InvalidBatterySnafu {
                capacity_wh: self.battery_capacity_wh,
                level_wh,
            }
        );

        for (action, watts) in &self.power_draw_w {
            ensure!(
                watts.is_finite() && *watts >= 0.0,
                InvalidPowerDrawSnafu {
                    action: *action,
                    watts: *watts
                }
            );
        }

        for mode in enum_iterator::all::<OperatingMode>() {
            let profile = self.profiles.get(&mode).context(MissingProfileSnafu { mode })?;

            for (action, value) in profile.table() {
                ensure!(
                    self.power_draw_w.contains_key(action),
                    MissingPowerSnafu {
                        mode,
                        action: *action
                    }
                );
                ensure!(
                    value.is_finite() && *value >= 0.0,
                    InvalidDutyCycleSnafu {
                        mode,
                        action: *action,
                        value: *value,
                        hint: "must be finite and non-negative",
                    }
                );
                ensure!(
                    !profile.is_percentage() || *value <= 100.0,
                    InvalidDutyCycleSnafu {
                        mode,
                        action: *action,
                        value: *value,
                        hint: "percentages cannot exceed 100",
                    }
                );
            }
        }

        Ok(())
    }

    /// Battery level at start up, in Watt-hours
    pub fn initial_level_wh(&self) -> f64 {
        self.initial_level_wh.unwrap_or(self.battery_capacity_wh)
    }

    /// Power draw of the action in Watts, zero if unknown
    pub fn power_w(&self, action: Action) -> f64 {
        self.power_draw_w.get(&action).copied().unwrap_or(0.0)
    }

    pub fn profile(&self, mode: OperatingMode) -> Option<&DutyCycleProfile> {
        self.profiles.get(&mode)
    }

    /// Action each subsystem is commanded to while in this mode, ordered by subsystem.
    ///
    /// When a profile schedules several actions of a subsystem, the one using the most energy wins,
    /// then the one active the longest, so a camera pass reports `CAM_CAPTURE` and detumbling
    /// reports `ADCS_IDLE`. Subsystems the profile does not activate are left out.
    pub fn commanded_actions(&self, mode: OperatingMode) -> Vec<Action> {
        let mut commanded: BTreeMap<Subsystem, (Action, f64, f64)> = BTreeMap::new();
        let Some(profile) = self.profile(mode) else {
            return Vec::new();
        };

        for action in profile.active_actions() {
            let value = profile.table()[&action];
            let energy = value * self.power_w(action);
            let best = commanded
                .entry(action.subsystem())
                .or_insert((action, energy, value));
            if (energy, value) > (best.1, best.2) {
                *best = (action, energy, value);
            }
        }

        commanded.into_values().map(|(action, ..)| action).collect()
    }

    /// Average consumption in Watts: the sum of the power draw of every configured action.
    pub fn average_consumption_w(&self) -> f64 {
        self.power_draw_w.values().sum()
    }

    /// Default tables of the reference 3U CubeSat, with a 40 Wh battery.
    pub fn cubesat() -> Self {
        use Action::*;

        let power_draw_w = BTreeMap::from([
            (ADCS_IDLE, 0.3044),
            (ADCS_ACTUATE, 2.0),
            (ADCS_OFF, 0.0),
            (CAM_CAPTURE, 0.726),
            (CAM_OFF, 0.0),
            (CENT_TEST, 0.2678),
            (CENT_OFF, 0.0),
            (COMMS_IDLE, 0.0005),
            (COMMS_RX, 0.0658),
            (COMMS_TX, 3.5632),
            (COMMS_TX_BEACON, 3.562),
            (COMMS_ANT_DEPLOY, 5.05),
            (EPS_IDLE, 0.075),
            (EPS_LOW_POWER, 0.043),
            (OBC_LOW_POWER, 0.6),
            (OBC_IDLE, 0.63),
        ]);

        let percentage =
            |table: &[(Action, f64)]| DutyCycleProfile::Percentage(table.iter().copied().collect());
        let absolute =
            |table: &[(Action, f64)]| DutyCycleProfile::Absolute(table.iter().copied().collect());

        let profiles = BTreeMap::from([
            (
                OperatingMode::InitialBoot,
                percentage(&[
                    (ADCS_OFF, 100.0),
                    (CAM_OFF, 100.0),
                    (CENT_OFF, 100.0),
                    (COMMS_IDLE, 100.0),
                    (EPS_IDLE, 100.0),
                    (OBC_IDLE, 100.0),
                ]),
            ),
            (
                OperatingMode::Idle,
                percentage(&[
                    (ADCS_IDLE, 79.65),
                    (ADCS_ACTUATE, 0.426),
                    (CAM_OFF, 100.0),
                    // 540 s of beacon per 5400 s orbit
                    (COMMS_TX_BEACON, 10.0),
                    (EPS_IDLE, 100.0),
                    (OBC_IDLE, 100.0),
                ]),
            ),
            (
                OperatingMode::Detumbling,
                percentage(&[
                    (ADCS_IDLE, 79.04),
                    (ADCS_ACTUATE, 0.962),
                    (CAM_OFF, 100.0),
                    (COMMS_TX, 100.0),
                    (EPS_IDLE, 100.0),
                    (OBC_IDLE, 100.0),
                ]),
            ),
            (
                OperatingMode::AntennaDeploy,
                absolute(&[
                    (ADCS_IDLE, 1.67),
                    (CAM_OFF, 100.0),
                    (COMMS_ANT_DEPLOY, 15.0),
                    (EPS_IDLE, 100.0),
                    (OBC_IDLE, 100.0),
                ]),
            ),
            (
                OperatingMode::DetumbledBeacon,
                percentage(&[
                    (ADCS_IDLE, 1.67),
                    (CAM_OFF, 100.0),
                    (COMMS_TX_BEACON, 100.0),
                    (EPS_IDLE, 100.0),
                    (OBC_IDLE, 100.0),
                ]),
            ),
            (
                OperatingMode::LowPower,
                percentage(&[
                    (ADCS_OFF, 100.0),
                    (CAM_OFF, 100.0),
                    (COMMS_IDLE, 100.0),
                    (EPS_LOW_POWER, 100.0),
                    (OBC_LOW_POWER, 100.0),
                ]),
            ),
            (
                OperatingMode::Camera,
                absolute(&[
                    (ADCS_IDLE, 4291.0),
                    (ADCS_ACTUATE, 23.0),
                    (CAM_CAPTURE, 60.0),
                    (CAM_OFF, 5340.0),
                    (EPS_IDLE, 60.0),
                    (OBC_IDLE, 540.0),
                ]),
            ),
            (
                OperatingMode::Centrifuge,
                absolute(&[
                    (ADCS_IDLE, 4291.0),
                    (ADCS_ACTUATE, 23.0),
                    (CAM_OFF, 5400.0),
                    (CENT_TEST, 300.0),
                    (EPS_IDLE, 300.0),
                    (OBC_IDLE, 540.0),
                ]),
            ),
            (
                OperatingMode::GroundPass,
                percentage(&[
                    (ADCS_IDLE, 100.0),
                    (CAM_OFF, 100.0),
                    (COMMS_RX, 50.0),
                    (COMMS_TX, 50.0),
                    (EPS_IDLE, 100.0),
                    (OBC_IDLE, 100.0),
                ]),
            ),
            (
                OperatingMode::Safe,
                percentage(&[
                    (ADCS_OFF, 100.0),
                    (CAM_OFF, 100.0),
                    (CENT_OFF, 100.0),
                    (COMMS_RX, 10.0),
                    (COMMS_TX_BEACON, 1.67),
                    (EPS_LOW_POWER, 100.0),
                    (OBC_LOW_POWER, 100.0),
                ]),
            ),
        ]);

        Self {
            battery_capacity_wh: 40.0,
            initial_level_wh: None,
            power_draw_w,
            profiles,
        }
    }
}
