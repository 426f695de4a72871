//! This module contains the [`Journal`] of state changes and its [`JournalCheckpoint`].
use crate::{JournalEntry, JournalError, JournaledStore};
use std::vec::Vec;
use tracing::{error, trace};

/// Position in the journal that state can be reverted to.
///
/// Besides the position it remembers which entry sat right below it, so a checkpoint that was
/// reverted past and then overwritten by newer entries is detected instead of silently reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JournalCheckpoint {
    /// Journal length when the checkpoint was taken.
    pub journal_i: usize,
    /// Sequence number of the entry at `journal_i - 1`, zero for an empty journal.
    sequence: u64,
}

/// Ordered log of [`JournalEntry`]s for one execution scope.
///
/// The journal only grows by [`Journal::append`] and only shrinks by reverting. Dropping it
/// commits everything that is in it, as the store already holds the new values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Journal {
    entries: Vec<JournalEntry>,
    /// Append sequence number of each entry, parallel to `entries`.
    sequences: Vec<u64>,
    /// Never reset by reverts.
    next_sequence: u64,
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty journal with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            sequences: Vec::with_capacity(capacity),
            next_sequence: 1,
        }
    }

    /// Appends an entry at the end of the journal.
    #[inline]
    pub fn append(&mut self, entry: JournalEntry) {
        trace!(target: "journal", len = self.entries.len(), ?entry, "append");
        self.entries.push(entry);
        self.sequences.push(self.next_sequence);
        self.next_sequence += 1;
    }

    /// Makes a checkpoint that in case of revert can bring back state to this point.
    #[inline]
    pub fn mark(&self) -> JournalCheckpoint {
        JournalCheckpoint {
            journal_i: self.entries.len(),
            sequence: self.sequences.last().copied().unwrap_or_default(),
        }
    }

    /// Number of entries in the journal.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the journal has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in append order.
    #[inline]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Drops every entry without undoing it, keeping the store as it is.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.sequences.clear();
    }

    /// Reverts all changes to state until given checkpoint.
    ///
    /// A checkpoint past the end of the journal, or one invalidated by an earlier revert, is
    /// rejected before anything is undone.
    ///
    /// See [`Journal::revert_to_len`] for the behaviour when an entry fails to undo.
    pub fn revert_to_mark<S: JournaledStore + ?Sized>(
        &mut self,
        checkpoint: JournalCheckpoint,
        store: &mut S,
    ) -> Result<(), JournalError> {
        let position = checkpoint.journal_i;
        self.check_bounds(position)?;
        let below = match position {
            0 => 0,
            _ => self.sequences[position - 1],
        };
        if below != checkpoint.sequence {
            return Err(JournalError::StaleCheckpoint(position));
        }
        self.revert_tail(position, store)
    }

    /// Reverts every entry at index `len` and above, newest first, then truncates the journal
    /// to `len`.
    ///
    /// Only the upper bound of `len` can be checked here. Prefer [`Journal::revert_to_mark`].
    ///
    /// If an entry fails to undo, the remaining entries are still undone and the journal is
    /// truncated regardless; the first error is returned. The store is then only partially
    /// rolled back and the whole scope should be abandoned.
    pub fn revert_to_len<S: JournaledStore + ?Sized>(
        &mut self,
        len: usize,
        store: &mut S,
    ) -> Result<(), JournalError> {
        self.check_bounds(len)?;
        self.revert_tail(len, store)
    }

    #[inline]
    fn check_bounds(&self, position: usize) -> Result<(), JournalError> {
        if position > self.entries.len() {
            return Err(JournalError::OutOfBounds {
                position,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    fn revert_tail<S: JournaledStore + ?Sized>(
        &mut self,
        position: usize,
        store: &mut S,
    ) -> Result<(), JournalError> {
        trace!(target: "journal", from = self.entries.len(), to = position, "revert");
        let mut first_error = None;
        for entry in self.entries.drain(position..).rev() {
            let address = entry.address();
            if let Err(err) = entry.undo(store) {
                error!(target: "journal", ?address, %err, "journal entry failed to undo");
                first_error.get_or_insert(err);
            }
        }
        self.sequences.truncate(position);
        first_error.map_or(Ok(()), Err)
    }
}
