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

use crate::power::{Action, OperatingMode, PowerBudgetReport, Subsystem};
use serde::Serialize;
use std::fmt;

/// Read-only snapshot of the mode controller, for external display and logging.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub mode: OperatingMode,
    pub battery_level_wh: f64,
    pub battery_capacity_wh: f64,
    /// Between 0.0 and 1.0
    pub state_of_charge: f64,
    pub last_report: Option<PowerBudgetReport>,
    /// Last action of each subsystem, ordered as ADCS, Camera, Centrifuge, Comms, EPS, OBC
    pub subsystems: [Option<Action>; Subsystem::COUNT],
}

impl fmt::Display for ControllerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "mode {} -- battery {:.4} / {:.4} Wh ({:.1} %)",
            self.mode,
            self.battery_level_wh,
            self.battery_capacity_wh,
            100.0 * self.state_of_charge
        )?;
        for (subsystem, action) in enum_iterator::all::<Subsystem>().zip(self.subsystems.iter()) {
            match action {
                Some(action) => writeln!(f, "\t{subsystem}: {action}")?,
                None => writeln!(f, "\t{subsystem}: unset")?,
            }
        }
        if let Some(report) = &self.last_report {
            write!(f, "{report}")?;
        }
        Ok(())
    }
}
