//! Errors returned by the state database.
use crate::RevisionId;
use journal::JournalError;
use primitives::{Address, U256};

/// Errors returned by [`crate::StateDb`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateDbError {
    /// Journal and store are out of sync. The scope has to be abandoned.
    #[error(transparent)]
    Journal(#[from] JournalError),
    /// Revision was never taken, or was discarded by a revert to an older one.
    #[error("revision {0} does not exist or was already reverted")]
    UnknownRevision(RevisionId),
    /// Balance is lower than the amount to subtract.
    #[error("insufficient balance of {address}: have {balance}, need {amount}")]
    InsufficientBalance {
        /// Account the amount was subtracted from.
        address: Address,
        /// Balance at the time.
        balance: U256,
        /// Amount to subtract.
        amount: U256,
    },
    /// Balance would overflow.
    #[error("balance of {0} overflows")]
    BalanceOverflow(Address),
    /// Refund counter is lower than the amount to subtract.
    #[error("refund counter below zero: have {refund}, need {amount}")]
    RefundUnderflow {
        /// Refund counter at the time.
        refund: u64,
        /// Amount to subtract.
        amount: u64,
    },
    /// Refund counter would overflow.
    #[error("refund counter overflows")]
    RefundOverflow,
}
