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

use super::{Action, PowerError};
use core::fmt;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Operating modes of the spacecraft.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Sequence, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    InitialBoot,
    Idle,
    Detumbling,
    AntennaDeploy,
    DetumbledBeacon,
    LowPower,
    Camera,
    Centrifuge,
    GroundPass,
    Safe,
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for OperatingMode {
    type Err = PowerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect();
        enum_iterator::all::<OperatingMode>()
            .find(|mode| format!("{mode:?}").eq_ignore_ascii_case(&name))
            .ok_or_else(|| PowerError::UnknownMode {
                name: s.trim().to_string(),
            })
    }
}

/// How long each action is active while the spacecraft is in a given mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "actions", rename_all = "snake_case")]
pub enum DutyCycleProfile {
    /// Percentage (0 to 100) of the requested mode duration during which each action is active
    Percentage(BTreeMap<Action, f64>),
    /// Fixed schedule: number of seconds each action is active, whatever the requested duration
    Absolute(BTreeMap<Action, f64>),
}

impl DutyCycleProfile {
    /// Returns the raw table of this profile
    pub fn table(&self) -> &BTreeMap<Action, f64> {
        match self {
            Self::Percentage(table) | Self::Absolute(table) => table,
        }
    }

    pub fn is_percentage(&self) -> bool {
        matches!(self, Self::Percentage(_))
    }

    /// Seconds each action is active for the requested mode duration (in seconds).
    /// Negative durations are treated as zero.
    pub fn active_seconds(&self, duration_s: f64) -> impl Iterator<Item = (Action, f64)> + '_ {
        let duration_s = duration_s.max(0.0);
        let percentage = self.is_percentage();
        self.table().iter().map(move |(action, value)| {
            if percentage {
                (*action, value / 100.0 * duration_s)
            } else {
                (*action, *value)
            }
        })
    }

    /// Actions with a non-zero activity in this profile, in table order
    pub fn active_actions(&self) -> Vec<Action> {
        self.table()
            .iter()
            .filter(|(_, value)| **value > 0.0)
            .map(|(action, _)| *action)
            .collect()
    }
}
