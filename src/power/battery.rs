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
use serde::Serialize;

/// Battery ledger: a constant capacity and the energy currently stored, both in Watt-hours.
///
/// The level always stays within `[0, capacity]`. Only the power budget engine may draw from it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct BatteryState {
    capacity_wh: f64,
    level_wh: f64,
}

impl BatteryState {
    /// Initializes a battery, clamping the level into `[0, capacity]`.
    pub fn new(capacity_wh: f64, level_wh: f64) -> Self {
        let capacity_wh = capacity_wh.max(0.0);
        Self {
            capacity_wh,
            level_wh: level_wh.clamp(0.0, capacity_wh),
        }
    }

    /// Initializes a fully charged battery
    pub fn full(capacity_wh: f64) -> Self {
        Self::new(capacity_wh, capacity_wh)
    }

    pub fn capacity_wh(&self) -> f64 {
        self.capacity_wh
    }

    pub fn level_wh(&self) -> f64 {
        self.level_wh
    }

    /// State of charge, between 0.0 and 1.0
    pub fn state_of_charge(&self) -> f64 {
        if self.capacity_wh > 0.0 {
            self.level_wh / self.capacity_wh
        } else {
            0.0
        }
    }

    /// Draws the requested energy, never going below empty. Returns the energy actually drawn.
    pub(crate) fn discharge(&mut self, energy_wh: f64) -> f64 {
        let drawn = energy_wh.max(0.0).min(self.level_wh);
        self.level_wh -= drawn;
        drawn
    }
}

impl fmt::Display for BatteryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.4} / {:.4} Wh ({:.1} %)",
            self.level_wh,
            self.capacity_wh,
            100.0 * self.state_of_charge()
        )
    }
}
