use overflow_shared::types::{Transition, VoteIntent, VoteState};
use thiserror::Error;

/// The recorded vote does not satisfy the precondition of the requested intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{intent} expects {expected:?} but the recorded vote is {actual:?}")]
pub struct StateMismatch {
    pub intent: &'static str,
    pub expected: VoteState,
    pub actual: VoteState,
}

/// Maps an intent onto a transition out of the recorded state.
///
/// | intent           | valid from | to   | delta |
/// |------------------|------------|------|-------|
/// | cast up          | none       | up   | +1    |
/// | cast down        | none       | down | -1    |
/// | retract up       | up         | none | -1    |
/// | retract down     | down       | none | +1    |
/// | switch to up     | down       | up   | +2    |
/// | switch to down   | up         | down | -2    |
///
/// # Errors
///
/// Returns `StateMismatch` when `current` is not the state the intent starts from.
pub fn plan(intent: VoteIntent, current: VoteState) -> Result<Transition, StateMismatch> {
    let expected = intent.expected_state();
    if current != expected {
        return Err(StateMismatch {
            intent: intent.name(),
            expected,
            actual: current,
        });
    }

    Ok(Transition {
        from: current,
        to: intent.target_state(),
    })
}
