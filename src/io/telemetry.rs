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

use crate::time::{Epoch, HifitimeError};
use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Default name of the time column in the generation exports.
pub const DEFAULT_TIME_COLUMN: &str = "Time (UTCG)";
/// Default name of the power column in the generation exports.
pub const DEFAULT_POWER_COLUMN: &str = "Power (W)";

/// Layout of the epochs in UTCG exports, e.g. `1 Jan 2024 00:00:00.000`.
const UTCG_FORMAT: &str = "%d %b %Y %H:%M:%S.%f";

/// A single reading of the instantaneous generated power.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSample {
    pub epoch: Epoch,
    /// Generated power in Watts
    pub power_w: f64,
}

impl fmt::Display for GenerationSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.4} W", self.epoch, self.power_w)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TelemetryError {
    #[snafu(display("could not open telemetry file: {source}"))]
    TelemetryFile { source: std::io::Error },
    #[snafu(display("telemetry CSV error: {source}"))]
    TelemetryCsv { source: csv::Error },
    #[snafu(display("telemetry has no column named `{column}`"))]
    MissingColumn { column: String },
    #[snafu(display("row {row}: could not parse `{value}` as an epoch: {source}"))]
    EpochParse {
        row: usize,
        value: String,
        source: HifitimeError,
    },
}

/// Producer of generation samples, one per call, in chronological order.
pub trait TelemetrySource {
    /// Returns the next sample, or None once the source is exhausted.
    fn next_sample(&mut self) -> Option<Result<GenerationSample, TelemetryError>>;
}

/// Reads generation samples from a CSV export with a time column and a power column.
///
/// Rows where the power is not a number are skipped, since exports often contain blank or
/// placeholder values during eclipse transitions.
pub struct CsvTelemetry<R: Read> {
    records: StringRecordsIntoIter<R>,
    time_idx: usize,
    power_idx: usize,
    row: usize,
}

impl CsvTelemetry<File> {
    /// Opens the CSV file at the provided path, using the default column names.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TelemetryError> {
        let file = File::open(path).context(TelemetryFileSnafu)?;
        Self::from_reader(file)
    }
}

impl<R: Read> CsvTelemetry<R> {
    /// Reads the CSV from the provided reader, using the default column names.
    pub fn from_reader(reader: R) -> Result<Self, TelemetryError> {
        Self::with_columns(reader, DEFAULT_TIME_COLUMN, DEFAULT_POWER_COLUMN)
    }

    /// Reads the CSV from the provided reader, with the given time and power column names.
    pub fn with_columns(
        reader: R,
        time_column: &str,
        power_column: &str,
    ) -> Result<Self, TelemetryError> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = rdr.headers().context(TelemetryCsvSnafu)?.clone();

        let find = |column: &str| {
            headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| TelemetryError::MissingColumn {
                    column: column.to_string(),
                })
        };

        let time_idx = find(time_column)?;
        let power_idx = find(power_column)?;

        Ok(Self {
            records: rdr.into_records(),
            time_idx,
            power_idx,
            row: 0,
        })
    }
}

impl<R: Read> TelemetrySource for CsvTelemetry<R> {
    fn next_sample(&mut self) -> Option<Result<GenerationSample, TelemetryError>> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(source) => return Some(Err(TelemetryError::TelemetryCsv { source })),
            };
            self.row += 1;

            let power_str = record.get(self.power_idx).unwrap_or_default();
            let power_w = match power_str.parse::<f64>() {
                Ok(power_w) if power_w.is_finite() => power_w,
                _ => {
                    warn!(
                        "telemetry row {}: skipping non-numeric power `{power_str}`",
                        self.row
                    );
                    continue;
                }
            };

            let time_str = record.get(self.time_idx).unwrap_or_default();
            let sample = parse_epoch(time_str)
                .context(EpochParseSnafu {
                    row: self.row,
                    value: time_str,
                })
                .map(|epoch| GenerationSample { epoch, power_w });

            return Some(sample);
        }
    }
}

/// Parses an epoch either as an ISO 8601 / hifitime string, or in the `1 Jan 2024 00:00:00.000`
/// layout used by UTCG exports. On failure, returns the error of the ISO 8601 attempt.
pub fn parse_epoch(value: &str) -> Result<Epoch, HifitimeError> {
    Epoch::from_str(value)
        .or_else(|iso_err| Epoch::from_format_str(value, UTCG_FORMAT).map_err(|_| iso_err))
}
