//! The oracle's answer for a round.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CulpritError;

/// Whether the symptom showed up with the current active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The symptom did not reproduce.
    Pass,
    /// The symptom reproduced.
    Fail,
}

impl FromStr for Verdict {
    type Err = CulpritError;

    /// Accepts the words a person is likely to type when asked "does the
    /// problem still happen?".
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "pass" | "p" | "good" | "g" | "no" | "n" | "ok" => Ok(Verdict::Pass),
            "fail" | "f" | "bad" | "b" | "yes" | "y" => Ok(Verdict::Fail),
            _ => Err(CulpritError::UnknownVerdict {
                input: input.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("pass"),
            Verdict::Fail => f.write_str("fail"),
        }
    }
}
