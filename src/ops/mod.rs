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

use crate::power::{OperatingMode, PowerBudgetReport};
use crate::time::Duration;
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use std::fmt;

mod fsm;
pub use self::fsm::{next_mode, ModeController};

/// Passive record of the last commanded action of each subsystem.
pub mod tracker;
pub use self::tracker::SubsystemStateTracker;

mod snapshot;
pub use self::snapshot::ControllerSnapshot;

/// Events which may trigger a change of operating mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeEvent {
    /// Post boot checks are done
    BootComplete,
    /// Ground commanded an attitude maneuver
    OrientationCommand,
    /// Ground commanded an image capture
    PictureCommand,
    /// Ground commanded a centrifuge run
    CentrifugeCommand,
    /// A ground station is in view and a downlink should start
    StartTransmission,
    /// The battery state of charge dropped below its critical threshold
    CriticalStateOfCharge,
    /// Any subsystem reported a fault
    Fault,
    CaptureComplete,
    ManeuverComplete,
    SpinComplete,
    PassComplete,
    /// The battery state of charge is back to nominal
    StateOfChargeNominal,
    /// Request to leave safe mode, only honored once the antenna is deployed and the fault cleared
    Recovered {
        antenna_deployed: bool,
        fault_cleared: bool,
    },
}

impl fmt::Display for ModeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recovered {
                antenna_deployed,
                fault_cleared,
            } => write!(
                f,
                "Recovered (antenna deployed: {antenna_deployed}, fault cleared: {fault_cleared})"
            ),
            _ => write!(f, "{self:?}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ModeError {
    #[snafu(display("{event} is not a valid event in {from} mode"))]
    InvalidTransition {
        from: OperatingMode,
        event: ModeEvent,
    },
    #[snafu(display("insufficient power to enter {}: {report}", report.mode))]
    InsufficientPower {
        report: Box<PowerBudgetReport>,
        /// Mode the spacecraft fell back to, if any
        demoted_to: Option<OperatingMode>,
    },
    #[snafu(display("requested duration {duration} is negative"))]
    NegativeDuration { duration: Duration },
}
