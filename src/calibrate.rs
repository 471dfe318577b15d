//! Adaptive calibration of the indeterminacy parameters.
//!
//! Two strategies share one interface. [`BatchRefit`] re-derives the
//! parameters after every feedback by exhaustive search over the {-1, 1}
//! grid, scored against the entire accumulated history. It finds the
//! per-round global optimum and is the default. [`OnlineAccumulator`]
//! instead nudges running accumulators per feedback; it is recency-weighted
//! and path-dependent, with no re-scan of history.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SibylError};
use crate::policy::{decide, CalibrationParams, PolicyKind};
use crate::verdict::Verdict;

/// One feedback record: ground truth plus the verdicts observed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    /// A verification task: the premise chain was accepted iff every
    /// sub-verdict decided true.
    Verify { truth: bool, verdicts: Vec<Verdict> },
    /// A single-choice task: `target` is the index of the ground-truth
    /// candidate within the evaluated choice list, `verdicts` holds one
    /// verdict per candidate in order.
    SingleChoice { target: usize, verdicts: Vec<Verdict> },
}

/// Calibration strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalibratorKind {
    #[default]
    Batch,
    Online,
}

impl CalibratorKind {
    pub fn name(&self) -> &'static str {
        match self {
            CalibratorKind::Batch => "batch",
            CalibratorKind::Online => "online",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "batch" => Ok(CalibratorKind::Batch),
            "online" => Ok(CalibratorKind::Online),
            other => Err(SibylError::InvalidPolicy(format!(
                "unknown calibrator: {}",
                other
            ))),
        }
    }

    pub fn strategy(&self) -> Box<dyn CalibrationStrategy> {
        match self {
            CalibratorKind::Batch => Box::new(BatchRefit::new()),
            CalibratorKind::Online => Box::new(OnlineAccumulator::new()),
        }
    }
}

/// Common surface of the two calibration strategies.
pub trait CalibrationStrategy: Send {
    /// Record one feedback and update the parameters.
    fn observe(&mut self, entry: HistoryEntry);

    /// Current parameter estimate.
    fn params(&self) -> CalibrationParams;

    /// All feedback seen this session, in arrival order.
    fn history(&self) -> &[HistoryEntry];
}

/// Score one history entry under candidate parameters.
///
/// Verification entries contribute 1 when the ANDed decision matches the
/// ground truth. Single-choice entries contribute 1/|accepted| when the
/// ground-truth candidate is among the accepted set, reflecting that the
/// final answer is drawn uniformly from that set.
fn score_entry(entry: &HistoryEntry, params: &CalibrationParams) -> f64 {
    match entry {
        HistoryEntry::Verify { truth, verdicts } => {
            let all = verdicts
                .iter()
                .all(|v| decide(*v, PolicyKind::Adapted, params));
            if *truth == all {
                1.0
            } else {
                0.0
            }
        }
        HistoryEntry::SingleChoice { target, verdicts } => {
            let accepted: Vec<usize> = verdicts
                .iter()
                .enumerate()
                .filter(|(_, v)| decide(**v, PolicyKind::Adapted, params))
                .map(|(i, _)| i)
                .collect();
            if accepted.contains(target) {
                1.0 / accepted.len() as f64
            } else {
                0.0
            }
        }
    }
}

// =============================================================================
// Batch re-fit
// =============================================================================

/// Full grid-search re-fit over the accumulated history.
#[derive(Debug, Default)]
pub struct BatchRefit {
    history: Vec<HistoryEntry>,
    params: CalibrationParams,
}

impl BatchRefit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exhaustive search over the four {-1, 1} assignments. Strictly-greater
    /// comparison keeps the first assignment in enumeration order on ties
    /// (p_indet_true outer, p_indet_false inner).
    fn refit(&mut self) {
        let mut best_params = self.params;
        let mut best_score = -1.0;

        for p_indet_true in [-1.0, 1.0] {
            for p_indet_false in [-1.0, 1.0] {
                let candidate = CalibrationParams::new(p_indet_true, p_indet_false);
                let score: f64 = self
                    .history
                    .iter()
                    .map(|entry| score_entry(entry, &candidate))
                    .sum();
                if score > best_score {
                    best_score = score;
                    best_params = candidate;
                }
            }
        }

        self.params = best_params;
    }
}

impl CalibrationStrategy for BatchRefit {
    fn observe(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.refit();
    }

    fn params(&self) -> CalibrationParams {
        self.params
    }

    fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

// =============================================================================
// Online accumulation
// =============================================================================

/// Incremental accumulator updates, no re-scan of history.
#[derive(Debug, Default)]
pub struct OnlineAccumulator {
    history: Vec<HistoryEntry>,
    params: CalibrationParams,
}

impl OnlineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply(&mut self, entry: &HistoryEntry) {
        match entry {
            HistoryEntry::Verify { truth, verdicts } => {
                let delta = if *truth { 1.0 } else { -1.0 };
                for verdict in verdicts {
                    match verdict {
                        Verdict::IndeterminateTrue => self.params.p_indet_true += delta,
                        Verdict::IndeterminateFalse => self.params.p_indet_false += delta,
                        _ => {}
                    }
                }
            }
            HistoryEntry::SingleChoice { target, verdicts } => {
                // Fractional updates: push toward accepting the target's
                // verdict class, away from the competitors'.
                let delta = 1.0 / verdicts.len() as f64;
                for (idx, verdict) in verdicts.iter().enumerate() {
                    let signed = if idx == *target { delta } else { -delta };
                    match verdict {
                        Verdict::IndeterminateTrue => self.params.p_indet_true += signed,
                        Verdict::IndeterminateFalse => self.params.p_indet_false += signed,
                        _ => {}
                    }
                }
            }
        }
    }
}

impl CalibrationStrategy for OnlineAccumulator {
    fn observe(&mut self, entry: HistoryEntry) {
        self.apply(&entry);
        self.history.push(entry);
    }

    fn params(&self) -> CalibrationParams {
        self.params
    }

    fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}
