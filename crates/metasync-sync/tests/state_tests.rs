use metasync_sync::{allowed_transitions, validate_transition, SyncState};
use proptest::prelude::*;

fn any_state() -> impl Strategy<Value = SyncState> {
    prop_oneof![
        Just(SyncState::Initiated),
        Just(SyncState::BranchCreating),
        Just(SyncState::ContentFetching),
        Just(SyncState::Committing),
        Just(SyncState::ProposalOpening),
        Just(SyncState::MergeAttempting),
        Just(SyncState::Completed),
        Just(SyncState::CompletedWithPendingReview),
        Just(SyncState::Failed),
    ]
}

#[test]
fn test_initiated_transitions() {
    assert!(validate_transition(SyncState::Initiated, SyncState::BranchCreating).is_ok());

    // Invalid
    assert!(validate_transition(SyncState::Initiated, SyncState::Completed).is_err());
    assert!(validate_transition(SyncState::Initiated, SyncState::Failed).is_err());
}

#[test]
fn test_network_steps_can_fail() {
    assert!(validate_transition(SyncState::BranchCreating, SyncState::Failed).is_ok());
    assert!(validate_transition(SyncState::ContentFetching, SyncState::Failed).is_ok());
    assert!(validate_transition(SyncState::Committing, SyncState::Failed).is_ok());
    assert!(validate_transition(SyncState::ProposalOpening, SyncState::Failed).is_ok());
}

#[test]
fn test_merge_attempt_ends_in_partial_success_not_failure() {
    assert!(validate_transition(SyncState::MergeAttempting, SyncState::Completed).is_ok());
    assert!(
        validate_transition(SyncState::MergeAttempting, SyncState::CompletedWithPendingReview)
            .is_ok()
    );

    assert!(validate_transition(SyncState::MergeAttempting, SyncState::Failed).is_err());
}

proptest! {
    #[test]
    fn prop_validate_agrees_with_allowed(from in any_state(), to in any_state()) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            assert!(allowed.contains(&to));
        } else {
            assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_terminal_states_have_no_exits(state in any_state()) {
        if state.is_terminal() {
            assert!(allowed_transitions(state).is_empty());
        } else {
            assert!(!allowed_transitions(state).is_empty());
        }
    }
}
