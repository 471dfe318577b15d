//! Decision policies - mapping verdicts to boolean acceptance.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SibylError};
use crate::verdict::Verdict;

/// Policy names accepted by [`PolicyKind::from_name`].
pub const POLICIES: &[&str] = &["skeptical", "credulous", "initial", "adapted"];

/// How indeterminate verdicts are resolved to booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Accept only definite truth.
    Skeptical,
    /// Accept anything not definitely false.
    Credulous,
    /// Accept what held in the engine's initially constructed model.
    Initial,
    /// Resolve indeterminacy with calibrated parameters.
    Adapted,
}

impl PolicyKind {
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::Skeptical => "skeptical",
            PolicyKind::Credulous => "credulous",
            PolicyKind::Initial => "initial",
            PolicyKind::Adapted => "adapted",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "skeptical" => Ok(PolicyKind::Skeptical),
            "credulous" => Ok(PolicyKind::Credulous),
            "initial" => Ok(PolicyKind::Initial),
            "adapted" => Ok(PolicyKind::Adapted),
            other => Err(SibylError::InvalidPolicy(other.to_string())),
        }
    }
}

/// Tunable parameters consulted by the adapted policy.
///
/// Batch calibration assigns values from {-1, 1}; online calibration
/// accumulates fractional updates. (0, 0) is the uncalibrated state, under
/// which adapted acceptance matches the sign conventions below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationParams {
    pub p_indet_true: f64,
    pub p_indet_false: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            p_indet_true: 0.0,
            p_indet_false: 0.0,
        }
    }
}

impl CalibrationParams {
    pub fn new(p_indet_true: f64, p_indet_false: f64) -> Self {
        Self {
            p_indet_true,
            p_indet_false,
        }
    }
}

/// Map a verdict to a boolean acceptance decision under the given policy.
///
/// Total over [`Verdict`]; definite verdicts decide identically under every
/// policy. `params` is only consulted by [`PolicyKind::Adapted`].
pub fn decide(verdict: Verdict, kind: PolicyKind, params: &CalibrationParams) -> bool {
    match verdict {
        Verdict::True => true,
        Verdict::False => false,
        Verdict::IndeterminateTrue => match kind {
            PolicyKind::Skeptical => false,
            PolicyKind::Credulous | PolicyKind::Initial => true,
            PolicyKind::Adapted => params.p_indet_true >= 0.0,
        },
        Verdict::IndeterminateFalse => match kind {
            PolicyKind::Skeptical | PolicyKind::Initial => false,
            PolicyKind::Credulous => true,
            PolicyKind::Adapted => params.p_indet_false > 0.0,
        },
    }
}
