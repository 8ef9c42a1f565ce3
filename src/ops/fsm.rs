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

use super::{
    ControllerSnapshot, InvalidTransitionSnafu, ModeError, ModeEvent, NegativeDurationSnafu,
    SubsystemStateTracker,
};
use crate::io::{ConfigError, GenerationSample};
use crate::power::{EpsConfig, OperatingMode, PowerBudgetEngine, PowerBudgetReport};
use crate::time::Duration;
use snafu::{ensure, OptionExt};
use std::sync::Arc;

/// Transition table of the operating modes, without any power consideration.
///
/// Returns None if the event is not valid in the current mode.
pub fn next_mode(from: OperatingMode, event: ModeEvent) -> Option<OperatingMode> {
    use ModeEvent as E;
    use OperatingMode as M;

    match (from, event) {
        (M::InitialBoot, E::BootComplete) => Some(M::Safe),
        (M::Idle, E::OrientationCommand) => Some(M::Detumbling),
        (M::Idle, E::PictureCommand) => Some(M::Camera),
        (M::Idle, E::CentrifugeCommand) => Some(M::Centrifuge),
        (M::Idle, E::StartTransmission) => Some(M::GroundPass),
        (M::Idle, E::CriticalStateOfCharge) => Some(M::LowPower),
        (M::Camera, E::CaptureComplete) => Some(M::Idle),
        (M::Detumbling, E::ManeuverComplete) => Some(M::Idle),
        (M::Centrifuge, E::SpinComplete) => Some(M::Idle),
        (M::GroundPass, E::PassComplete) => Some(M::Idle),
        (M::LowPower, E::StateOfChargeNominal) => Some(M::Idle),
        (M::Idle | M::Camera | M::Detumbling | M::Centrifuge | M::GroundPass, E::Fault) => {
            Some(M::Safe)
        }
        (
            M::Safe,
            E::Recovered {
                antenna_deployed: true,
                fault_cleared: true,
            },
        ) => Some(M::Idle),
        _ => None,
    }
}

/// Operating mode state machine, where every transition is gated by the power budget.
///
/// The controller starts in [`OperatingMode::InitialBoot`] and only changes mode through [`ModeController::execute`].
#[derive(Clone, Debug)]
pub struct ModeController {
    mode: OperatingMode,
    engine: PowerBudgetEngine,
    tracker: SubsystemStateTracker,
    last_report: Option<PowerBudgetReport>,
}

impl ModeController {
    pub fn new(engine: PowerBudgetEngine) -> Self {
        Self {
            mode: OperatingMode::InitialBoot,
            engine,
            tracker: SubsystemStateTracker::new(),
            last_report: None,
        }
    }

    /// Validates the configuration, builds the power budget engine and the controller.
    pub fn from_config(config: Arc<EpsConfig>) -> Result<Self, ConfigError> {
        Ok(Self::new(PowerBudgetEngine::new(config)?))
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn engine(&self) -> &PowerBudgetEngine {
        &self.engine
    }

    pub fn tracker(&self) -> &SubsystemStateTracker {
        &self.tracker
    }

    pub fn last_report(&self) -> Option<&PowerBudgetReport> {
        self.last_report.as_ref()
    }

    /// Forwards a generation reading to the power budget engine.
    pub fn ingest(&mut self, sample: GenerationSample) {
        self.engine.ingest(sample);
    }

    /// Processes an event, staying in the target mode for the requested duration.
    ///
    /// Invalid events leave the controller untouched. If the target mode is not feasible, the mode
    /// is unchanged, except for the camera: an image which cannot be paid for demotes the spacecraft
    /// to low power. On success, the energy is drawn from the battery, the mode changes, and the
    /// actions of the new mode are reported to the subsystem tracker.
    pub fn execute(
        &mut self,
        event: ModeEvent,
        duration: Duration,
    ) -> Result<PowerBudgetReport, ModeError> {
        ensure!(duration >= Duration::ZERO, NegativeDurationSnafu { duration });

        let target = next_mode(self.mode, event).context(InvalidTransitionSnafu {
            from: self.mode,
            event,
        })?;

        let report = self.engine.apply(target, duration);
        self.last_report = Some(report.clone());

        if !report.feasible {
            let demoted_to = if target == OperatingMode::Camera {
                warn!(
                    "{} -> {target} on {event} infeasible, demoting to {}",
                    self.mode,
                    OperatingMode::LowPower
                );
                self.mode = OperatingMode::LowPower;
                Some(OperatingMode::LowPower)
            } else {
                warn!("{} -> {target} on {event} infeasible, staying in {}", self.mode, self.mode);
                None
            };

            return Err(ModeError::InsufficientPower {
                report: Box::new(report),
                demoted_to,
            });
        }

        info!(
            "{} -> {target} on {event}: {:.6} Wh drawn, battery {}",
            self.mode,
            report.energy_wh,
            self.engine.battery()
        );
        self.mode = target;

        self.tracker
            .set_action(&self.engine.config().commanded_actions(target));

        Ok(report)
    }

    /// Read-only view of the controller for display and logging.
    pub fn snapshot(&self) -> ControllerSnapshot {
        let battery = self.engine.battery();
        ControllerSnapshot {
            mode: self.mode,
            battery_level_wh: battery.level_wh(),
            battery_capacity_wh: battery.capacity_wh(),
            state_of_charge: battery.state_of_charge(),
            last_report: self.last_report.clone(),
            subsystems: self.tracker.state(),
        }
    }
}
