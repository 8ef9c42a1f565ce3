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

use crate::power::{Action, OperatingMode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::{ResultExt, Snafu};
use std::fmt::Debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Ingestion of solar power generation samples.
pub mod telemetry;
pub use self::telemetry::{CsvTelemetry, GenerationSample, TelemetryError, TelemetrySource};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("failed to read configuration file: {source}"))]
    ReadError { source: std::io::Error },

    #[snafu(display("failed to parse YAML configuration: {source}"))]
    ParseError { source: serde_yaml::Error },

    #[snafu(display("{mode} duty cycle references {action}, which has no power draw configured"))]
    MissingPower { mode: OperatingMode, action: Action },

    #[snafu(display("no duty cycle profile configured for {mode}"))]
    MissingProfile { mode: OperatingMode },

    #[snafu(display("{mode} duty cycle of {action} is invalid: {value} ({hint})"))]
    InvalidDutyCycle {
        mode: OperatingMode,
        action: Action,
        value: f64,
        hint: &'static str,
    },

    #[snafu(display("power draw of {action} must be a finite non-negative number of Watts, got {watts}"))]
    InvalidPowerDraw { action: Action, watts: f64 },

    #[snafu(display(
        "invalid battery: capacity {capacity_wh} Wh and initial level {level_wh} Wh (need 0 <= level <= capacity, capacity > 0)"
    ))]
    InvalidBattery { capacity_wh: f64, level_wh: f64 },
}

pub trait ConfigRepr: Debug + Sized + Serialize + DeserializeOwned {
    /// Checks the deserialized representation, called by every loader before returning it
    fn validated(self) -> Result<Self, ConfigError> {
        Ok(self)
    }

    /// Builds the configuration representation from the path to a yaml
    fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path).context(ReadSnafu)?;
        let reader = BufReader::new(file);

        let repr: Self = serde_yaml::from_reader(reader).context(ParseSnafu)?;
        repr.validated()
    }

    /// Builds the configuration representation from the yaml string
    fn loads(data: &str) -> Result<Self, ConfigError> {
        let repr: Self = serde_yaml::from_str(data).context(ParseSnafu)?;
        repr.validated()
    }

    /// Serializes this configuration into a yaml string
    fn dumps(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).context(ParseSnafu)
    }
}
