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

/*! # cubesat-eps

Power-constrained operating mode controller for a CubeSat.

A requested mode (imaging, detumbling, ground pass, ...) is only entered if the battery can pay for
its duty-cycle schedule and if the solar arrays currently generate at least the spacecraft's average
consumption. The generation estimate comes from rotating the Earth fixed position of the spacecraft
into the inertial frame and evaluating a pluggable irradiance model there.
*/

/// Coordinate frame transformations (ECEF to ECI) and solar power prediction.
pub mod cosmic;

/// Electrical power subsystem: actions, operating modes, duty cycles, battery ledger and the power budget engine.
pub mod power;

/// Operating mode state machine, subsystem state tracking and the reporting snapshot.
pub mod ops;

/// Configuration loading and telemetry ingestion.
pub mod io;

/// Utility functions shared by different modules.
pub mod utils;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

pub use self::cosmic::FrameError;
pub use self::io::{ConfigError, ConfigRepr, GenerationSample, TelemetryError};
pub use self::ops::{ModeController, ModeError, ModeEvent};
pub use self::power::{Action, EpsConfig, OperatingMode, PowerBudgetEngine, Subsystem};
