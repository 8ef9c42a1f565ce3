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

use core::fmt;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use std::str::FromStr;

mod battery;
pub use self::battery::BatteryState;

mod budget;
pub use self::budget::*;

/// Configuration of the power tables, loaded once and shared by the engine.
pub mod config;
pub use self::config::EpsConfig;

mod mode;
pub use self::mode::{DutyCycleProfile, OperatingMode};

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PowerError {
    #[snafu(display("unknown action `{name}`"))]
    UnknownAction { name: String },
    #[snafu(display("unknown operating mode `{name}`"))]
    UnknownMode { name: String },
}

/// Subsystem categories of the spacecraft, in the order used for the subsystem slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize)]
pub enum Subsystem {
    Adcs,
    Camera,
    Centrifuge,
    Comms,
    Eps,
    Obc,
}

impl Subsystem {
    /// Number of subsystem categories
    pub const COUNT: usize = 6;

    /// Position of this subsystem in the slot array
    pub const fn index(self) -> usize {
        match self {
            Self::Adcs => 0,
            Self::Camera => 1,
            Self::Centrifuge => 2,
            Self::Comms => 3,
            Self::Eps => 4,
            Self::Obc => 5,
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Adcs => "ADCS",
            Self::Camera => "Camera",
            Self::Centrifuge => "Centrifuge",
            Self::Comms => "Comms",
            Self::Eps => "EPS",
            Self::Obc => "OBC",
        };
        write!(f, "{name}")
    }
}

/// Commands a subsystem can be in, each with a constant power draw set in the configuration.
#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize)]
pub enum Action {
    /// Attitude control on, magnetorquers idle
    ADCS_IDLE,
    /// Attitude control actuating the magnetorquers
    ADCS_ACTUATE,
    ADCS_OFF,
    /// Camera capturing an image
    CAM_CAPTURE,
    CAM_OFF,
    /// Centrifuge payload spinning
    CENT_TEST,
    CENT_OFF,
    COMMS_IDLE,
    /// Radio receiving
    COMMS_RX,
    /// Radio transmitting a downlink
    COMMS_TX,
    /// Radio transmitting the beacon
    COMMS_TX_BEACON,
    /// Burn wire deploying the antenna
    COMMS_ANT_DEPLOY,
    EPS_IDLE,
    EPS_LOW_POWER,
    OBC_LOW_POWER,
    OBC_IDLE,
}

impl Action {
    /// Returns the subsystem this action commands
    pub const fn subsystem(self) -> Subsystem {
        match self {
            Self::ADCS_IDLE | Self::ADCS_ACTUATE | Self::ADCS_OFF => Subsystem::Adcs,
            Self::CAM_CAPTURE | Self::CAM_OFF => Subsystem::Camera,
            Self::CENT_TEST | Self::CENT_OFF => Subsystem::Centrifuge,
            Self::COMMS_IDLE
            | Self::COMMS_RX
            | Self::COMMS_TX
            | Self::COMMS_TX_BEACON
            | Self::COMMS_ANT_DEPLOY => Subsystem::Comms,
            Self::EPS_IDLE | Self::EPS_LOW_POWER => Subsystem::Eps,
            Self::OBC_LOW_POWER | Self::OBC_IDLE => Subsystem::Obc,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for Action {
    type Err = PowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        enum_iterator::all::<Action>()
            .find(|action| format!("{action:?}").eq_ignore_ascii_case(name))
            .ok_or_else(|| PowerError::UnknownAction {
                name: name.to_string(),
            })
    }
}
