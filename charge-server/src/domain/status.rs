//! Operational status of a charging station.

use serde::{Deserialize, Serialize};

/// Station availability as reported by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationStatus {
    Available,
    Occupied,
    Unknown,
    OutOfService,
}

impl StationStatus {
    /// Derive a status from a directory status code.
    ///
    /// 50 is operational; 30 and 75 are temporarily unavailable or partly
    /// operational; 100, 150 and 200 are not operational, planned or removed.
    /// Anything else, including a missing code, is unknown.
    pub fn from_directory_code(code: Option<i64>) -> Self {
        match code {
            Some(50) => StationStatus::Available,
            Some(30 | 75) => StationStatus::Occupied,
            Some(100 | 150 | 200) => StationStatus::OutOfService,
            _ => StationStatus::Unknown,
        }
    }

    /// Sort rank for availability ordering: lower is better.
    pub fn availability_rank(self) -> u8 {
        match self {
            StationStatus::Available => 0,
            StationStatus::Unknown => 1,
            StationStatus::Occupied => 2,
            StationStatus::OutOfService => 3,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            StationStatus::Available => "Available",
            StationStatus::Occupied => "Occupied",
            StationStatus::Unknown => "Unknown",
            StationStatus::OutOfService => "Out of Service",
        }
    }
}
