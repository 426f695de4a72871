//! Configuration of the [`crate::StateDb`].

/// Configuration for the state database.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StateDbCfg {
    /// Whether touched empty accounts are removed when the scope is finalised.
    ///
    /// See [EIP-161](https://eips.ethereum.org/EIPS/eip-161).
    pub delete_empty_objects: bool,
    /// Number of journal entries to preallocate for each scope.
    pub journal_capacity: usize,
}

impl Default for StateDbCfg {
    fn default() -> Self {
        Self {
            delete_empty_objects: true,
            journal_capacity: 0,
        }
    }
}

impl StateDbCfg {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether touched empty accounts are removed at finalisation.
    pub fn with_delete_empty_objects(mut self, delete_empty_objects: bool) -> Self {
        self.delete_empty_objects = delete_empty_objects;
        self
    }

    /// Sets the journal preallocation.
    pub fn with_journal_capacity(mut self, journal_capacity: usize) -> Self {
        self.journal_capacity = journal_capacity;
        self
    }
}
