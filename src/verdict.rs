//! Engine verdicts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SibylError;

/// Categorical verdict on a premise, as classified from engine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// Premise follows validly from the previous premises.
    True,
    /// Premise is inconsistent with the previous premises.
    False,
    /// Premise was previously possibly true.
    IndeterminateTrue,
    /// Premise was previously possibly false.
    IndeterminateFalse,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::False => "false",
            Verdict::IndeterminateTrue => "indeterminate-true",
            Verdict::IndeterminateFalse => "indeterminate-false",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = SibylError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => Ok(Verdict::True),
            "false" => Ok(Verdict::False),
            "indeterminate-true" => Ok(Verdict::IndeterminateTrue),
            "indeterminate-false" => Ok(Verdict::IndeterminateFalse),
            other => Err(SibylError::InvalidVerdict(other.to_string())),
        }
    }
}
