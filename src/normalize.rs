//! Premise normalization - entity anonymization and sentence templating.
//!
//! The engine parses fixed natural-language sentences over a small noun
//! vocabulary, so real entity names must be substituted with generic terms
//! before a problem is sent. Substitution is injective and assigned in
//! first-seen order across the combined task-plus-choice premise list.

use std::collections::HashMap;

use crate::error::{Result, SibylError};
use crate::premise::Premise;

/// Generic nouns the engine's grammar accepts, in assignment order.
pub const GENERIC_TERMS: &[&str] = &[
    "square", "triangle", "circle", "line", "cross", "ell", "vee", "star", "ess",
];

/// An ordered list of anonymized premise sentences, ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedProblem {
    sentences: Vec<String>,
}

impl NormalizedProblem {
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Build a [`NormalizedProblem`] from background premises plus one candidate.
///
/// Every distinct entity across `task` then `choice` is mapped to the next
/// unused term in [`GENERIC_TERMS`]. Fails when the premises mention more
/// than nine distinct entities.
pub fn normalize(task: &[Premise], choice: &[Premise]) -> Result<NormalizedProblem> {
    let combined: Vec<&Premise> = task.iter().chain(choice.iter()).collect();

    // First-seen entity order
    let mut entities: Vec<&str> = Vec::new();
    for premise in &combined {
        for term in [premise.subject.as_str(), premise.object.as_str()] {
            if !entities.contains(&term) {
                entities.push(term);
            }
        }
    }

    if entities.len() > GENERIC_TERMS.len() {
        return Err(SibylError::TooManyEntities(entities.len()));
    }

    // Injective by construction: distinct entities, distinct terms
    let replacements: HashMap<&str, &'static str> = entities
        .iter()
        .zip(GENERIC_TERMS.iter())
        .map(|(entity, term)| (*entity, *term))
        .collect();

    let sentences = combined
        .iter()
        .map(|premise| {
            format!(
                "the {} is {} the {}",
                replacements[premise.subject.as_str()],
                premise.relation.phrase(),
                replacements[premise.object.as_str()]
            )
        })
        .collect();

    Ok(NormalizedProblem { sentences })
}
