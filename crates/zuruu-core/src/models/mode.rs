use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Which audience the UI is currently serving.
///
/// Switches menus and drives patient-field redaction. It does not gate
/// access to anything else.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Mode {
    #[default]
    Pharmacist,
    Patient,
    Student,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Pharmacist, Mode::Patient, Mode::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Pharmacist => "pharmacist",
            Mode::Patient => "patient",
            Mode::Student => "student",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidMode(s.to_string()))
    }
}
