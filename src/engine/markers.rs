//! Marker table for classifying engine output lines.
//!
//! The line protocol's entire inbound surface is a handful of literal
//! strings, so they live in one named, versioned table. An engine upgrade
//! that changes its phrasing is a table edit, not a scattered string hunt.

use crate::verdict::Verdict;

/// What the reader should do with one inbound line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Session-end sentinel observed; stop the read loop.
    Terminate,
    /// Known recoverable engine error; send the pop directive and continue.
    Recover,
    /// A verdict line; emit onto the queue.
    Verdict(Verdict),
    /// Anything else; log and continue.
    Diagnostic,
}

/// One version of the engine's response vocabulary.
///
/// The double spacing inside the verdict lines is the engine's own
/// formatting and is matched exactly.
#[derive(Debug, Clone, Copy)]
pub struct MarkerTable {
    pub terminate_fragment: &'static str,
    pub recoverable_error: &'static str,
    pub valid: &'static str,
    pub inconsistent: &'static str,
    pub possibly_true: &'static str,
    pub possibly_false: &'static str,
}

impl MarkerTable {
    /// Vocabulary of the current engine release.
    pub const V1: MarkerTable = MarkerTable {
        terminate_fragment: "TERMINATE",
        recoverable_error: "> Error: The value NIL is not of the expected type ARRAY.",
        valid: "PREMISE  FOLLOWS  VALIDLY  FROM  PREVIOUS  PREMISES.",
        inconsistent: "PREMISE  IS  INCONSISTENT  WITH  PREVIOUS  PREMISES.",
        possibly_true: "PREMISE  WAS  PREVIOUSLY  POSSIBLY  TRUE.",
        possibly_false: "PREMISE  WAS  PREVIOUSLY  POSSIBLY  FALSE.",
    };

    /// Classify one whitespace-trimmed output line.
    ///
    /// The terminate sentinel is a containment match (the engine echoes it
    /// inside a print form); every other marker is exact.
    pub fn classify(&self, line: &str) -> Classification {
        if line.contains(self.terminate_fragment) {
            return Classification::Terminate;
        }
        if line == self.recoverable_error {
            return Classification::Recover;
        }
        if line == self.valid {
            return Classification::Verdict(Verdict::True);
        }
        if line == self.inconsistent {
            return Classification::Verdict(Verdict::False);
        }
        if line == self.possibly_true {
            return Classification::Verdict(Verdict::IndeterminateTrue);
        }
        if line == self.possibly_false {
            return Classification::Verdict(Verdict::IndeterminateFalse);
        }
        Classification::Diagnostic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: MarkerTable = MarkerTable::V1;

    #[test]
    fn test_classify_verdict_lines() {
        assert_eq!(
            TABLE.classify("PREMISE  FOLLOWS  VALIDLY  FROM  PREVIOUS  PREMISES."),
            Classification::Verdict(Verdict::True)
        );
        assert_eq!(
            TABLE.classify("PREMISE  IS  INCONSISTENT  WITH  PREVIOUS  PREMISES."),
            Classification::Verdict(Verdict::False)
        );
        assert_eq!(
            TABLE.classify("PREMISE  WAS  PREVIOUSLY  POSSIBLY  TRUE."),
            Classification::Verdict(Verdict::IndeterminateTrue)
        );
        assert_eq!(
            TABLE.classify("PREMISE  WAS  PREVIOUSLY  POSSIBLY  FALSE."),
            Classification::Verdict(Verdict::IndeterminateFalse)
        );
    }

    #[test]
    fn test_classify_terminate_is_containment() {
        assert_eq!(TABLE.classify("\"TERMINATE\""), Classification::Terminate);
        assert_eq!(TABLE.classify("TERMINATE"), Classification::Terminate);
    }

    #[test]
    fn test_classify_recoverable_error_is_exact() {
        assert_eq!(
            TABLE.classify("> Error: The value NIL is not of the expected type ARRAY."),
            Classification::Recover
        );
        // A different NIL error is just a diagnostic
        assert_eq!(
            TABLE.classify("> Error: The value NIL is not of the expected type LIST."),
            Classification::Diagnostic
        );
    }

    #[test]
    fn test_classify_non_markers_emit_nothing() {
        for line in [
            "",
            "Welcome to Clozure Common Lisp!",
            "PREMISE FOLLOWS VALIDLY FROM PREVIOUS PREMISES.",
            "premise  follows  validly  from  previous  premises.",
            "? ",
        ] {
            assert_eq!(TABLE.classify(line), Classification::Diagnostic, "{:?}", line);
        }
    }
}
