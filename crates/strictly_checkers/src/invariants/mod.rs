//! First-class invariants for checkers positions.
//!
//! Invariants are properties every reachable [`GameState`] satisfies. The
//! transition checks them as postconditions in debug builds, and they can
//! be tested on their own.

use crate::state::GameState;

mod capture_accounting;
mod piece_budget;
mod playable_squares;

pub use capture_accounting::CaptureAccountingInvariant;
pub use piece_budget::PieceBudgetInvariant;
pub use playable_squares::PlayableSquaresInvariant;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Two consecutive states, for invariants over a transition.
#[derive(Debug, Clone, Copy)]
pub struct StatePair<'a> {
    /// State before the move.
    pub before: &'a GameState,
    /// State after the move.
    pub after: &'a GameState,
}

impl<'a> StatePair<'a> {
    /// Pairs two states.
    pub fn new(before: &'a GameState, after: &'a GameState) -> Self {
        Self { before, after }
    }
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
///
/// Implemented for tuples of invariants.
pub trait InvariantSet<S> {
    /// Checks every invariant, collecting all violations.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<_> = [
            (I1::holds(state), I1::description()),
            (I2::holds(state), I2::description()),
        ]
        .into_iter()
        .filter(|(holds, _)| !holds)
        .map(|(_, description)| InvariantViolation::new(description))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// All position invariants as a composable set.
pub type CheckersInvariants = (PlayableSquaresInvariant, PieceBudgetInvariant);

/// Invariants over a single state.
pub fn check_state(state: &GameState) -> Result<(), Vec<InvariantViolation>> {
    CheckersInvariants::check_all(state)
}

/// Violations a move introduced, as used by [`MoveContract`](crate::MoveContract).
///
/// A position built with [`GameState::from_parts`] may already break a
/// position invariant; only violations absent before the move count.
pub fn check_transition(before: &GameState, after: &GameState) -> Result<(), Vec<InvariantViolation>> {
    let existing = check_state(before).err().unwrap_or_default();
    let mut introduced: Vec<_> = check_state(after)
        .err()
        .unwrap_or_default()
        .into_iter()
        .filter(|violation| !existing.contains(violation))
        .collect();

    if !CaptureAccountingInvariant::holds(&StatePair::new(before, after)) {
        introduced.push(InvariantViolation::new(CaptureAccountingInvariant::description()));
    }

    if introduced.is_empty() {
        Ok(())
    } else {
        Err(introduced)
    }
}
