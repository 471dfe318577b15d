//! End-to-end tests against a scripted fake engine.
//!
//! The fake engine is a /bin/sh script that consumes directives on stdin
//! and replays canned marker lines on stdout, exercising the full
//! process/reader/session stack without a Lisp installation.

#![cfg(unix)]

use std::path::PathBuf;

use sibyl::config::EngineConfig;
use sibyl::{
    CalibratorKind, EngineSession, PolicyKind, Premise, ReasonerModel, Relation, SibylError,
    Verdict,
};
use tempfile::TempDir;

const VALID: &str = "PREMISE  FOLLOWS  VALIDLY  FROM  PREVIOUS  PREMISES.";
const INCONSISTENT: &str = "PREMISE  IS  INCONSISTENT  WITH  PREVIOUS  PREMISES.";
const POSSIBLY_TRUE: &str = "PREMISE  WAS  PREVIOUSLY  POSSIBLY  TRUE.";
const POSSIBLY_FALSE: &str = "PREMISE  WAS  PREVIOUSLY  POSSIBLY  FALSE.";

/// Tail that answers the termination handshake and exits.
const HANDSHAKE: &str = r#"
while read line; do
  case "$line" in
    *TERMINATE*) printf '%s\n' '"TERMINATE"'; exit 0 ;;
  esac
done
"#;

fn fake_engine(dir: &TempDir, body: &str) -> EngineConfig {
    let script = dir.path().join("engine.sh");
    std::fs::write(&script, body).unwrap();
    EngineConfig {
        executable: Some(PathBuf::from("/bin/sh")),
        args: vec![script.to_string_lossy().to_string()],
        query_timeout_secs: 5,
        ..Default::default()
    }
}

fn problem(task: &[Premise], choice: &[Premise]) -> sibyl::NormalizedProblem {
    sibyl::normalize(task, choice).unwrap()
}

#[test]
fn test_verdicts_return_in_send_order() {
    let dir = TempDir::new().unwrap();
    let script = format!(
        "read line\nprintf '%s\\n' '{VALID}'\nprintf '%s\\n' '{POSSIBLY_TRUE}'\nprintf '%s\\n' '{POSSIBLY_FALSE}'\n{HANDSHAKE}"
    );
    let config = fake_engine(&dir, &script);

    let task = vec![Premise::new(Relation::Left, "A", "B")];
    let choice = vec![
        Premise::new(Relation::Right, "B", "A"),
        Premise::new(Relation::Front, "A", "B"),
        Premise::new(Relation::Behind, "B", "A"),
    ];

    let mut session = EngineSession::start(&config).unwrap();
    let verdicts = session.query(&problem(&task, &choice), 3).unwrap();
    assert_eq!(
        verdicts,
        vec![
            Verdict::True,
            Verdict::IndeterminateTrue,
            Verdict::IndeterminateFalse,
        ]
    );
    session.terminate().unwrap();
}

#[test]
fn test_sequential_queries_stay_ordered() {
    let dir = TempDir::new().unwrap();
    let script = format!(
        "read line\nprintf '%s\\n' '{VALID}'\nread line\nprintf '%s\\n' '{POSSIBLY_TRUE}'\nread line\nprintf '%s\\n' '{POSSIBLY_FALSE}'\n{HANDSHAKE}"
    );
    let config = fake_engine(&dir, &script);

    let task = vec![Premise::new(Relation::Above, "x", "y")];
    let choice = vec![Premise::new(Relation::Below, "y", "x")];

    let mut session = EngineSession::start(&config).unwrap();
    let p = problem(&task, &choice);
    assert_eq!(session.query(&p, 1).unwrap(), vec![Verdict::True]);
    assert_eq!(
        session.query(&p, 1).unwrap(),
        vec![Verdict::IndeterminateTrue]
    );
    assert_eq!(
        session.query(&p, 1).unwrap(),
        vec![Verdict::IndeterminateFalse]
    );
    session.terminate().unwrap();
}

#[test]
fn test_false_short_circuits_the_drain() {
    let dir = TempDir::new().unwrap();
    // Second verdict is the inconsistency; the third must never be waited on
    let script = format!(
        "read line\nprintf '%s\\n' '{VALID}'\nprintf '%s\\n' '{INCONSISTENT}'\nprintf '%s\\n' '{VALID}'\n{HANDSHAKE}"
    );
    let config = fake_engine(&dir, &script);

    let task = vec![Premise::new(Relation::Left, "A", "B")];
    let choice = vec![
        Premise::new(Relation::Right, "B", "A"),
        Premise::new(Relation::Left, "B", "A"),
        Premise::new(Relation::Front, "A", "B"),
    ];

    let mut session = EngineSession::start(&config).unwrap();
    let verdicts = session.query(&problem(&task, &choice), 3).unwrap();
    assert_eq!(verdicts, vec![Verdict::False]);
    session.terminate().unwrap();
}

#[test]
fn test_protocol_recovery_is_invisible_to_caller() {
    let dir = TempDir::new().unwrap();
    // First response is the known engine error; after the pop directive
    // arrives, the real verdict follows.
    let script = format!(
        r#"read line
printf '%s\n' '> Error: The value NIL is not of the expected type ARRAY.'
read line
case "$line" in
  :POP) printf '%s\n' '{VALID}' ;;
esac
{HANDSHAKE}"#
    );
    let config = fake_engine(&dir, &script);

    let task = vec![Premise::new(Relation::North, "a", "b")];
    let choice = vec![Premise::new(Relation::South, "b", "a")];

    let mut session = EngineSession::start(&config).unwrap();
    let verdicts = session.query(&problem(&task, &choice), 1).unwrap();
    assert_eq!(verdicts, vec![Verdict::True]);
    session.terminate().unwrap();
}

#[test]
fn test_stalled_engine_times_out() {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig {
        query_timeout_secs: 1,
        ..fake_engine(&dir, "while read line; do :; done\n")
    };

    let task = vec![Premise::new(Relation::Left, "A", "B")];
    let choice = vec![Premise::new(Relation::Right, "B", "A")];

    let mut session = EngineSession::start(&config).unwrap();
    match session.query(&problem(&task, &choice), 1) {
        Err(SibylError::Timeout(_)) => {}
        other => panic!("expected timeout, got {:?}", other),
    }
    // Session dropped without handshake: the process is killed
}

#[test]
fn test_verify_scenario_normalizes_and_accepts() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("received.txt");
    let script = format!(
        "read line\nprintf '%s\\n' \"$line\" >> {}\nprintf '%s\\n' '{VALID}'\n{HANDSHAKE}",
        log.display()
    );
    let config = fake_engine(&dir, &script);

    let task = vec![Premise::new(Relation::Left, "A", "B")];
    let choice = vec![Premise::new(Relation::Right, "B", "A")];

    let mut model =
        ReasonerModel::start(&config, PolicyKind::Initial, CalibratorKind::Batch).unwrap();
    assert!(model.predict_verify(&task, &choice).unwrap());
    model.terminate().unwrap();

    let received = std::fs::read_to_string(&log).unwrap();
    assert_eq!(
        received.trim(),
        "(interpret '((the square is on the left of the triangle)\
(the triangle is on the right of the square)))"
    );
}

#[test]
fn test_single_choice_picks_among_accepted() {
    let dir = TempDir::new().unwrap();
    // One verdict per candidate query: False, IndeterminateTrue, True
    let script = format!(
        "read line\nprintf '%s\\n' '{INCONSISTENT}'\nread line\nprintf '%s\\n' '{POSSIBLY_TRUE}'\nread line\nprintf '%s\\n' '{VALID}'\n{HANDSHAKE}"
    );
    let config = fake_engine(&dir, &script);

    let task = vec![Premise::new(Relation::Left, "A", "B")];
    let choices = vec![
        vec![Premise::new(Relation::Left, "B", "A")],
        vec![Premise::new(Relation::Right, "B", "A")],
        vec![Premise::new(Relation::Front, "A", "B")],
    ];

    let mut model =
        ReasonerModel::start(&config, PolicyKind::Adapted, CalibratorKind::Batch).unwrap();
    let chosen = model.predict_single_choice(&task, &choices).unwrap();
    // Accepted set under uncalibrated adapted parameters is {1, 2}
    assert!(chosen == 1 || chosen == 2, "chose {}", chosen);

    // Ground truth was candidate 2: the grid fit excludes the
    // indeterminate-true candidate from the accepted set.
    model.feedback_single_choice(2);
    assert_eq!(model.calibration_params().p_indet_true, -1.0);

    model.terminate().unwrap();
}
