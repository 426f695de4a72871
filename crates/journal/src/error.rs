//! Errors raised while undoing journal entries.
use primitives::{Address, B256};

/// Journal and store went out of sync.
///
/// None of these are expected at runtime. They mean an entry was appended or undone out of
/// order, or a checkpoint was used after it stopped being valid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JournalError {
    /// Undo referenced an account the store can not resolve.
    #[error("journal entry references unknown account {0}")]
    MissingAccount(Address),
    /// Undo of a log entry found no logs for the transaction.
    #[error("no logs recorded for transaction {0}")]
    MissingLogs(B256),
    /// Revert target is past the end of the journal.
    #[error("revert position {position} is beyond journal length {len}")]
    OutOfBounds {
        /// Requested position.
        position: usize,
        /// Journal length at the time of the revert.
        len: usize,
    },
    /// Checkpoint was invalidated by an earlier revert past it.
    #[error("checkpoint at position {0} was invalidated by an earlier revert")]
    StaleCheckpoint(usize),
}
