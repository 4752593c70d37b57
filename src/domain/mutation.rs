//! Explicit state machine for a single optimistic mutation.
//!
//! Each `toggle` on a collection drives one [`Mutation`] through
//! `Idle -> Pending -> {Committed, RolledBack}`. Making the phases explicit
//! lets tests assert the intermediate optimistic state deterministically
//! instead of racing against request settlement.

use super::id::WineId;

/// Phase of an optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    /// No request in flight.
    Idle,
    /// The local set has been flipped; the server call has not settled.
    /// `was_member` is the pre-mutation membership, kept for rollback.
    Pending { was_member: bool },
    /// The server confirmed; local state was already correct.
    Committed,
    /// The server call failed; local state was reverted to `was_member`.
    RolledBack,
}

/// One optimistic mutation of a membership set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    id: WineId,
    phase: MutationPhase,
}

impl Mutation {
    /// Begin a mutation: records the pre-mutation membership and enters
    /// `Pending`.
    #[must_use]
    pub fn begin(id: WineId, was_member: bool) -> Self {
        Self {
            id,
            phase: MutationPhase::Pending { was_member },
        }
    }

    #[must_use]
    pub fn id(&self) -> &WineId {
        &self.id
    }

    #[must_use]
    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// The membership value before the optimistic flip, while pending.
    #[must_use]
    pub fn original_membership(&self) -> Option<bool> {
        match self.phase {
            MutationPhase::Pending { was_member } => Some(was_member),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(
            self.phase,
            MutationPhase::Committed | MutationPhase::RolledBack
        )
    }

    /// The server call succeeded. Only legal from `Pending`.
    pub fn commit(&mut self) {
        debug_assert!(matches!(self.phase, MutationPhase::Pending { .. }));
        self.phase = MutationPhase::Committed;
    }

    /// The server call failed and the local flip was reverted. Only legal
    /// from `Pending`.
    pub fn roll_back(&mut self) {
        debug_assert!(matches!(self.phase, MutationPhase::Pending { .. }));
        self.phase = MutationPhase::RolledBack;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_enters_pending_with_original_value() {
        let mutation = Mutation::begin(WineId::from("wine-42"), true);
        assert_eq!(
            mutation.phase(),
            MutationPhase::Pending { was_member: true }
        );
        assert_eq!(mutation.original_membership(), Some(true));
        assert!(!mutation.is_settled());
    }

    #[test]
    fn commit_settles() {
        let mut mutation = Mutation::begin(WineId::from("wine-42"), false);
        mutation.commit();
        assert_eq!(mutation.phase(), MutationPhase::Committed);
        assert!(mutation.is_settled());
        assert_eq!(mutation.original_membership(), None);
    }

    #[test]
    fn roll_back_settles() {
        let mut mutation = Mutation::begin(WineId::from("wine-42"), false);
        mutation.roll_back();
        assert_eq!(mutation.phase(), MutationPhase::RolledBack);
        assert!(mutation.is_settled());
    }
}
