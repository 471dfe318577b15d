//! The reasoner model - prediction over tasks, feedback into calibration.
//!
//! Ties the engine session, decision policy and calibrator together into
//! the loop a decision-making client drives: predict, receive ground
//! truth, adapt.

use log::warn;

use crate::calibrate::{CalibrationStrategy, CalibratorKind, HistoryEntry};
use crate::config::EngineConfig;
use crate::engine::EngineSession;
use crate::error::{Result, SibylError};
use crate::normalize::normalize;
use crate::policy::{decide, CalibrationParams, PolicyKind};
use crate::premise::Premise;
use crate::verdict::Verdict;

/// Responses recorded by the most recent prediction, consumed by the next
/// feedback call.
#[derive(Debug, Clone)]
enum LastResponses {
    Verify { verdicts: Vec<Verdict> },
    SingleChoice { verdicts: Vec<Verdict> },
}

/// One item of a recorded dataset, replayable through [`ReasonerModel::pre_train`].
#[derive(Debug, Clone)]
pub enum TrainingItem {
    Verify {
        task: Vec<Premise>,
        choice: Vec<Premise>,
        truth: bool,
    },
    SingleChoice {
        task: Vec<Premise>,
        choices: Vec<Vec<Premise>>,
        target: usize,
    },
}

/// A spatial reasoner client over one engine session.
pub struct ReasonerModel {
    session: EngineSession,
    policy: PolicyKind,
    calibrator: Box<dyn CalibrationStrategy>,
    last_responses: Option<LastResponses>,
}

impl ReasonerModel {
    /// Start an engine session and wrap it in a model.
    pub fn start(
        config: &EngineConfig,
        policy: PolicyKind,
        calibrator: CalibratorKind,
    ) -> Result<Self> {
        let session = EngineSession::start(config)?;
        Ok(Self::new(session, policy, calibrator))
    }

    pub fn new(session: EngineSession, policy: PolicyKind, calibrator: CalibratorKind) -> Self {
        Self {
            session,
            policy,
            calibrator: calibrator.strategy(),
            last_responses: None,
        }
    }

    pub fn policy(&self) -> PolicyKind {
        self.policy
    }

    /// Current calibration parameters (for session reporting).
    pub fn calibration_params(&self) -> CalibrationParams {
        self.calibrator.params()
    }

    /// Verify a candidate premise chain against background facts.
    ///
    /// The chain is accepted iff every sub-verdict decides true under the
    /// active policy.
    pub fn predict_verify(&mut self, task: &[Premise], choice: &[Premise]) -> Result<bool> {
        let problem = normalize(task, choice)?;
        let verdicts = self.session.query(&problem, choice.len())?;

        let params = self.calibrator.params();
        let accepted = verdicts
            .iter()
            .all(|v| decide(*v, self.policy, &params));

        self.last_responses = Some(LastResponses::Verify { verdicts });
        Ok(accepted)
    }

    /// Evaluate each candidate independently and pick one.
    ///
    /// Returns the index of the chosen candidate: drawn uniformly from
    /// the accepted set, or uniformly from all candidates when nothing is
    /// accepted (a guess beats no answer).
    pub fn predict_single_choice(
        &mut self,
        task: &[Premise],
        choices: &[Vec<Premise>],
    ) -> Result<usize> {
        if choices.is_empty() {
            return Err(SibylError::Config(
                "single-choice prediction needs at least one candidate".to_string(),
            ));
        }

        let mut verdicts = Vec::with_capacity(choices.len());
        for choice in choices {
            let problem = normalize(task, choice)?;
            let response = self.session.query(&problem, 1)?;
            verdicts.push(response[0]);
        }

        let params = self.calibrator.params();
        let accepted: Vec<usize> = verdicts
            .iter()
            .enumerate()
            .filter(|(_, v)| decide(**v, self.policy, &params))
            .map(|(i, _)| i)
            .collect();

        self.last_responses = Some(LastResponses::SingleChoice { verdicts });

        let chosen = if accepted.is_empty() {
            fastrand::usize(..choices.len())
        } else {
            accepted[fastrand::usize(..accepted.len())]
        };
        Ok(chosen)
    }

    /// Report ground truth for the last verification prediction.
    ///
    /// Only the adapted policy learns; other policies ignore feedback.
    pub fn feedback_verify(&mut self, truth: bool) {
        if self.policy != PolicyKind::Adapted {
            return;
        }
        match self.last_responses.take() {
            Some(LastResponses::Verify { verdicts }) => {
                self.calibrator.observe(HistoryEntry::Verify { truth, verdicts });
            }
            other => {
                warn!("verify feedback without a matching prediction, ignored");
                self.last_responses = other;
            }
        }
    }

    /// Report the ground-truth candidate index for the last single-choice
    /// prediction.
    pub fn feedback_single_choice(&mut self, target: usize) {
        if self.policy != PolicyKind::Adapted {
            return;
        }
        match self.last_responses.take() {
            Some(LastResponses::SingleChoice { verdicts }) => {
                self.calibrator
                    .observe(HistoryEntry::SingleChoice { target, verdicts });
            }
            other => {
                warn!("single-choice feedback without a matching prediction, ignored");
                self.last_responses = other;
            }
        }
    }

    /// Replay a recorded dataset through the predict/feedback loop to
    /// warm-start calibration. No-op unless the policy is adapted.
    pub fn pre_train(&mut self, dataset: &[TrainingItem]) -> Result<()> {
        if self.policy != PolicyKind::Adapted {
            return Ok(());
        }
        for item in dataset {
            match item {
                TrainingItem::Verify { task, choice, truth } => {
                    self.predict_verify(task, choice)?;
                    self.feedback_verify(*truth);
                }
                TrainingItem::SingleChoice {
                    task,
                    choices,
                    target,
                } => {
                    self.predict_single_choice(task, choices)?;
                    self.feedback_single_choice(*target);
                }
            }
        }
        Ok(())
    }

    /// Shut the engine down via the termination handshake.
    pub fn terminate(self) -> Result<()> {
        self.session.terminate()
    }
}
