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

use super::{Action, BatteryState, EpsConfig, OperatingMode};
use crate::io::{ConfigError, GenerationSample};
use crate::time::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Time spent and energy drawn by one action over a mode.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionUsage {
    pub action: Action,
    /// Seconds during which the action is active
    pub active_s: f64,
    /// Power draw of the action in Watts
    pub power_w: f64,
    /// Energy drawn by the action in Watt-hours
    pub energy_wh: f64,
}

/// Outcome of one evaluation of the power budget for a mode and a duration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerBudgetReport {
    pub mode: OperatingMode,
    pub duration: Duration,
    /// Total energy needed by the mode, in Watt-hours
    pub energy_wh: f64,
    /// Per action breakdown, in the order of the duty cycle profile
    pub breakdown: Vec<ActionUsage>,
    /// Generated power used for the verdict, in Watts
    pub generation_w: f64,
    /// Average consumption of the spacecraft, in Watts
    pub average_consumption_w: f64,
    /// Whether the battery holds enough energy for the mode
    pub battery_ok: bool,
    /// Whether the generation covers the average consumption
    pub generation_ok: bool,
    pub feasible: bool,
    /// Battery level after this evaluation, in Watt-hours
    pub battery_level_wh: f64,
}

impl fmt::Display for PowerBudgetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} for {}: {:.6} Wh ({}) -- battery {} ({:.4} Wh left), generation {} ({:.3} W vs {:.3} W average)",
            self.mode,
            self.duration,
            self.energy_wh,
            if self.feasible { "feasible" } else { "infeasible" },
            if self.battery_ok { "ok" } else { "short" },
            self.battery_level_wh,
            if self.generation_ok { "ok" } else { "short" },
            self.generation_w,
            self.average_consumption_w,
        )?;
        for usage in &self.breakdown {
            writeln!(
                f,
                "\t{:<18} {:>10.3} s @ {:.4} W = {:.6} Wh",
                usage.action, usage.active_s, usage.power_w, usage.energy_wh
            )?;
        }
        Ok(())
    }
}

/// Power budget engine: owns the battery ledger and evaluates the energy cost of operating modes.
///
/// A mode is feasible only if both gates pass:
/// 1. the battery holds at least the energy needed by the mode for the requested duration;
/// 2. the most recent generated power is at least the average consumption of the spacecraft.
#[derive(Clone, Debug)]
pub struct PowerBudgetEngine {
    config: Arc<EpsConfig>,
    battery: BatteryState,
    average_consumption_w: f64,
    latest_generation: Option<GenerationSample>,
}

impl PowerBudgetEngine {
    /// Validates the configuration and initializes the battery from it.
    pub fn new(config: Arc<EpsConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        let battery = BatteryState::new(config.battery_capacity_wh, config.initial_level_wh());
        let average_consumption_w = config.average_consumption_w();
        info!(
            "power budget engine ready: battery {battery}, average consumption {average_consumption_w:.4} W"
        );
        Ok(Self {
            config,
            battery,
            average_consumption_w,
            latest_generation: None,
        })
    }

    pub fn config(&self) -> &EpsConfig {
        &self.config
    }

    pub fn battery(&self) -> BatteryState {
        self.battery
    }

    /// Battery state of charge, between 0.0 and 1.0
    pub fn state_of_charge(&self) -> f64 {
        self.battery.state_of_charge()
    }

    pub fn average_consumption_w(&self) -> f64 {
        self.average_consumption_w
    }

    pub fn latest_generation(&self) -> Option<GenerationSample> {
        self.latest_generation
    }

    /// Most recent generated power in Watts, zero until a sample has been ingested.
    pub fn generation_w(&self) -> f64 {
        self.latest_generation.map_or(0.0, |sample| sample.power_w)
    }

    /// Records a new generation reading, replacing the previous one.
    pub fn ingest(&mut self, sample: GenerationSample) {
        debug!("ingested generation sample {sample}");
        self.latest_generation = Some(sample);
    }

    /// Per action active time and energy for this mode and duration.
    pub fn breakdown(&self, mode: OperatingMode, duration: Duration) -> Vec<ActionUsage> {
        match self.config.profile(mode) {
            Some(profile) => profile
                .active_seconds(duration.to_seconds())
                .map(|(action, active_s)| {
                    let power_w = self.config.power_w(action);
                    ActionUsage {
                        action,
                        active_s,
                        power_w,
                        energy_wh: active_s * power_w / 3600.0,
                    }
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Energy in Watt-hours needed to stay in this mode for the requested duration.
    ///
    /// Modes with an absolute schedule ignore the duration. Negative durations count as zero.
    pub fn compute_energy_wh(&self, mode: OperatingMode, duration: Duration) -> f64 {
        let energy_wh = self
            .breakdown(mode, duration)
            .iter()
            .map(|usage| usage.energy_wh)
            .sum();
        debug!("{mode} for {duration} requires {energy_wh:.6} Wh");
        energy_wh
    }

    /// Returns whether the mode can be sustained for this duration with the provided generation.
    pub fn is_feasible(&self, mode: OperatingMode, duration: Duration, generation_w: f64) -> bool {
        self.compute_energy_wh(mode, duration) <= self.battery.level_wh()
            && generation_w >= self.average_consumption_w
    }

    /// Builds the report for this mode and duration using the latest generation, without touching the battery.
    pub fn evaluate(&self, mode: OperatingMode, duration: Duration) -> PowerBudgetReport {
        let breakdown = self.breakdown(mode, duration);
        let energy_wh: f64 = breakdown.iter().map(|usage| usage.energy_wh).sum();
        let generation_w = self.generation_w();
        let battery_ok = energy_wh <= self.battery.level_wh();
        let generation_ok = generation_w >= self.average_consumption_w;

        PowerBudgetReport {
            mode,
            duration,
            energy_wh,
            breakdown,
            generation_w,
            average_consumption_w: self.average_consumption_w,
            battery_ok,
            generation_ok,
            feasible: battery_ok && generation_ok,
            battery_level_wh: self.battery.level_wh(),
        }
    }

    /// Checks feasibility against the latest generation and, if feasible, draws the energy of the mode
    /// from the battery. The battery is left untouched otherwise.
    pub fn apply(&mut self, mode: OperatingMode, duration: Duration) -> PowerBudgetReport {
        let mut report = self.evaluate(mode, duration);
        if report.feasible {
            self.battery.discharge(report.energy_wh);
            report.battery_level_wh = self.battery.level_wh();
            debug!("{mode} drew {:.6} Wh, battery {}", report.energy_wh, self.battery);
        } else {
            warn!(
                "{mode} for {duration} is infeasible: {:.6} Wh needed, {:.6} Wh available, {:.3} W generated vs {:.3} W average",
                report.energy_wh,
                self.battery.level_wh(),
                report.generation_w,
                self.average_consumption_w
            );
        }
        report
    }
}
