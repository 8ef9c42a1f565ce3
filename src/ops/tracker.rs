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

use crate::power::{Action, Subsystem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last commanded action of each subsystem, for downstream telemetry.
///
/// This is a pure observer: it never influences feasibility nor transitions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemStateTracker {
    slots: [Option<Action>; Subsystem::COUNT],
}

impl SubsystemStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records each action in the slot of its subsystem. Within a batch, the last action of a
    /// subsystem wins.
    pub fn set_action(&mut self, actions: &[Action]) {
        for action in actions {
            self.slots[action.subsystem().index()] = Some(*action);
        }
    }

    /// Slots ordered as ADCS, Camera, Centrifuge, Comms, EPS, OBC; None if never set.
    pub fn state(&self) -> [Option<Action>; Subsystem::COUNT] {
        self.slots
    }

    /// Last action recorded for this subsystem
    pub fn get(&self, subsystem: Subsystem) -> Option<Action> {
        self.slots[subsystem.index()]
    }
}

impl fmt::Display for SubsystemStateTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<String> = enum_iterator::all::<Subsystem>()
            .map(|subsystem| match self.get(subsystem) {
                Some(action) => format!("{subsystem}: {action}"),
                None => format!("{subsystem}: unset"),
            })
            .collect();
        write!(f, "{}", slots.join(", "))
    }
}
