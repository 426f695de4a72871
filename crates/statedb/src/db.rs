//! Module containing the [`StateDb`].
use crate::{ObjectStore, StateDbCfg, StateDbError};
use core::fmt;
use journal::{Journal, JournalCheckpoint, JournalEntry};
use primitives::{
    hash_map::Entry, keccak256, Address, Bytes, Log, StorageKey, StorageValue, B256, KECCAK_EMPTY,
    U256,
};
use state::StateObject;
use std::vec::Vec;
use tracing::debug;

/// Identifier of a snapshot taken with [`StateDb::snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RevisionId(pub u64);

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Revision {
    id: RevisionId,
    checkpoint: JournalCheckpoint,
}

/// Accounts handed out when a scope is finalised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinaliseOutput {
    /// Dirty accounts that are still alive, sorted.
    pub updated: Vec<Address>,
    /// Accounts removed because they were destructed, or touched and empty.
    pub deleted: Vec<Address>,
}

/// Account state database with journaled mutations.
///
/// Every mutation first appends a [`JournalEntry`] holding the value it overwrites, so the
/// database can go back to any live snapshot. [`StateDb::finalise`] ends the scope: it applies
/// pending deletions and drops the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateDb {
    /// Configuration.
    pub cfg: StateDbCfg,
    store: ObjectStore,
    journal: Journal,
    /// Live snapshots, ordered by id.
    valid_revisions: Vec<Revision>,
    next_revision_id: u64,
}

impl Default for StateDb {
    fn default() -> Self {
        Self::new(StateDbCfg::default())
    }
}

impl StateDb {
    /// Creates an empty state database.
    pub fn new(cfg: StateDbCfg) -> Self {
        Self::with_store(cfg, ObjectStore::default())
    }

    /// Creates a state database on top of existing objects.
    pub fn with_store(cfg: StateDbCfg, store: ObjectStore) -> Self {
        let journal = Journal::with_capacity(cfg.journal_capacity);
        Self {
            cfg,
            store,
            journal,
            valid_revisions: Vec::new(),
            next_revision_id: 0,
        }
    }

    /// Backing store.
    #[inline]
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// Journal of the current scope.
    #[inline]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Returns the object at `address`.
    #[inline]
    pub fn object(&self, address: &Address) -> Option<&StateObject> {
        self.store.objects.get(address)
    }

    /// Returns true if an object exists at `address`, destructed or not.
    pub fn exists(&self, address: &Address) -> bool {
        self.store.objects.contains_key(address)
    }

    /// Returns true if there is no object at `address` or it is empty as defined by EIP-161.
    pub fn is_empty(&self, address: &Address) -> bool {
        self.object(address).is_none_or(StateObject::is_empty)
    }

    /// Balance of the account, zero if it does not exist.
    pub fn balance(&self, address: &Address) -> U256 {
        self.object(address).map(|obj| obj.balance).unwrap_or_default()
    }

    /// Nonce of the account, zero if it does not exist.
    pub fn nonce(&self, address: &Address) -> u64 {
        self.object(address).map(|obj| obj.nonce).unwrap_or_default()
    }

    /// Coinage of the account, zero if it does not exist.
    pub fn coinage(&self, address: &Address) -> U256 {
        self.object(address).map(|obj| obj.coinage).unwrap_or_default()
    }

    /// Last reference block of the account, zero if it does not exist.
    pub fn last_reference_block(&self, address: &Address) -> u64 {
        self.object(address)
            .map(|obj| obj.last_reference_block)
            .unwrap_or_default()
    }

    /// Storage slot of the account, zero if either does not exist.
    pub fn state(&self, address: &Address, key: &StorageKey) -> StorageValue {
        self.object(address)
            .map(|obj| obj.state(key))
            .unwrap_or_default()
    }

    /// Code of the account, empty if it does not exist.
    pub fn code(&self, address: &Address) -> Bytes {
        self.object(address)
            .map(|obj| obj.code.clone())
            .unwrap_or_default()
    }

    /// Code hash of the account, [`B256::ZERO`] if it does not exist.
    pub fn code_hash(&self, address: &Address) -> B256 {
        self.object(address)
            .map(|obj| obj.code_hash)
            .unwrap_or_default()
    }

    /// Returns true if the account is marked for destruction.
    pub fn has_self_destructed(&self, address: &Address) -> bool {
        self.object(address).is_some_and(StateObject::is_destructed)
    }

    /// Logs recorded for a transaction.
    pub fn logs(&self, tx_hash: &B256) -> &[Log] {
        self.store
            .logs
            .get(tx_hash)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Preimage recorded for `hash`.
    pub fn preimage(&self, hash: &B256) -> Option<&Bytes> {
        self.store.preimages.get(hash)
    }

    /// Gas refund counter.
    #[inline]
    pub fn refund(&self) -> u64 {
        self.store.refund
    }

    /// Returns the object at `address` for writing, creating it if needed. Marks it dirty.
    fn object_for_update(&mut self, address: Address) -> (&mut StateObject, &mut Journal) {
        let Self { store, journal, .. } = self;
        store.dirty.insert(address);
        let obj = match store.objects.entry(address) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                journal.append(JournalEntry::object_created(address));
                entry.insert(StateObject::new(address))
            }
        };
        (obj, journal)
    }

    /// Creates a fresh account at `address`.
    ///
    /// An existing account is replaced, only its balance is carried over. A replaced destructed
    /// account leaves the destructed set, the new one is not scheduled for removal.
    pub fn create_account(&mut self, address: Address) {
        let mut obj = StateObject::new(address);
        match self.store.objects.get(&address) {
            Some(prev) => {
                obj.balance = prev.balance;
                if prev.is_destructed() {
                    self.store.destructed.remove(&address);
                }
                self.journal.append(JournalEntry::object_reset(prev.clone()));
            }
            None => self.journal.append(JournalEntry::object_created(address)),
        }
        self.store.objects.insert(address, obj);
        self.store.dirty.insert(address);
    }

    /// Marks the account as touched. Only the first touch is journaled.
    pub fn touch(&mut self, address: Address) {
        let was_dirty = self.store.dirty.contains(&address);
        let (obj, journal) = self.object_for_update(address);
        if !obj.is_touched() {
            journal.append(JournalEntry::touched(address, false, was_dirty));
            obj.set_touched(true);
        }
    }

    /// Sets the balance of the account.
    pub fn set_balance(&mut self, address: Address, balance: U256) {
        let (obj, journal) = self.object_for_update(address);
        journal.append(JournalEntry::balance_changed(address, obj.balance));
        obj.set_balance(balance);
    }

    /// Adds `amount` to the balance of the account.
    ///
    /// Adding zero to an empty account touches it.
    pub fn add_balance(&mut self, address: Address, amount: U256) -> Result<(), StateDbError> {
        if amount.is_zero() {
            if self.is_empty(&address) {
                self.touch(address);
            }
            return Ok(());
        }
        let balance = self
            .balance(&address)
            .checked_add(amount)
            .ok_or(StateDbError::BalanceOverflow(address))?;
        self.set_balance(address, balance);
        Ok(())
    }

    /// Subtracts `amount` from the balance of the account.
    pub fn sub_balance(&mut self, address: Address, amount: U256) -> Result<(), StateDbError> {
        if amount.is_zero() {
            return Ok(());
        }
        let balance = self.balance(&address);
        let Some(new_balance) = balance.checked_sub(amount) else {
            return Err(StateDbError::InsufficientBalance {
                address,
                balance,
                amount,
            });
        };
        self.set_balance(address, new_balance);
        Ok(())
    }

    /// Sets the coinage of the account.
    pub fn set_coinage(&mut self, address: Address, coinage: U256) {
        let (obj, journal) = self.object_for_update(address);
        journal.append(JournalEntry::coinage_changed(address, obj.coinage));
        obj.set_coinage(coinage);
    }

    /// Sets the last reference block of the account.
    pub fn set_last_reference_block(&mut self, address: Address, block: u64) {
        let (obj, journal) = self.object_for_update(address);
        journal.append(JournalEntry::last_reference_block_changed(
            address,
            obj.last_reference_block,
        ));
        obj.set_last_reference_block(block);
    }

    /// Sets the nonce of the account.
    pub fn set_nonce(&mut self, address: Address, nonce: u64) {
        let (obj, journal) = self.object_for_update(address);
        journal.append(JournalEntry::nonce_changed(address, obj.nonce));
        obj.set_nonce(nonce);
    }

    /// Writes a storage slot of the account.
    pub fn set_state(&mut self, address: Address, key: StorageKey, value: StorageValue) {
        let (obj, journal) = self.object_for_update(address);
        journal.append(JournalEntry::storage_changed(address, key, obj.state(&key)));
        obj.set_state(key, value);
    }

    /// Sets the code of the account. The hash is computed here.
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        let hash = if code.is_empty() {
            KECCAK_EMPTY
        } else {
            keccak256(&code)
        };
        let (obj, journal) = self.object_for_update(address);
        journal.append(JournalEntry::code_changed(
            address,
            obj.code.clone(),
            obj.code_hash,
        ));
        obj.set_code(code, hash);
    }

    /// Marks the account for destruction and clears its balance and coinage.
    ///
    /// The object stays readable until [`StateDb::finalise`]. Returns false if there is no
    /// account at `address`.
    pub fn self_destruct(&mut self, address: Address) -> bool {
        let Self { store, journal, .. } = self;
        let Some(obj) = store.objects.get_mut(&address) else {
            return false;
        };
        journal.append(JournalEntry::destructed(
            address,
            obj.is_destructed(),
            obj.balance,
            obj.coinage,
            obj.last_reference_block,
        ));
        obj.set_destructed(true);
        obj.set_balance(U256::ZERO);
        obj.set_coinage(U256::ZERO);
        obj.set_last_reference_block(0);
        store.destructed.insert(address);
        store.dirty.insert(address);
        true
    }

    /// Records a log emitted by transaction `tx_hash`.
    pub fn add_log(&mut self, tx_hash: B256, log: Log) {
        self.journal.append(JournalEntry::log_added(tx_hash));
        self.store.logs.entry(tx_hash).or_default().push(log);
    }

    /// Records the preimage of `hash`. Already known preimages are left alone.
    pub fn add_preimage(&mut self, hash: B256, preimage: Bytes) {
        if let Entry::Vacant(entry) = self.store.preimages.entry(hash) {
            self.journal.append(JournalEntry::preimage_added(hash));
            entry.insert(preimage);
        }
    }

    /// Adds gas to the refund counter.
    pub fn add_refund(&mut self, gas: u64) -> Result<(), StateDbError> {
        let refund = self
            .store
            .refund
            .checked_add(gas)
            .ok_or(StateDbError::RefundOverflow)?;
        self.journal
            .append(JournalEntry::refund_changed(self.store.refund));
        self.store.refund = refund;
        Ok(())
    }

    /// Removes gas from the refund counter.
    pub fn sub_refund(&mut self, gas: u64) -> Result<(), StateDbError> {
        let prev = self.store.refund;
        let refund = prev.checked_sub(gas).ok_or(StateDbError::RefundUnderflow {
            refund: prev,
            amount: gas,
        })?;
        self.journal.append(JournalEntry::refund_changed(prev));
        self.store.refund = refund;
        Ok(())
    }

    /// Takes a snapshot of the current state that can be restored with
    /// [`StateDb::revert_to_snapshot`].
    pub fn snapshot(&mut self) -> RevisionId {
        let id = RevisionId(self.next_revision_id);
        self.next_revision_id += 1;
        let checkpoint = self.journal.mark();
        debug!(target: "statedb", %id, journal_len = checkpoint.journal_i, "snapshot");
        self.valid_revisions.push(Revision { id, checkpoint });
        id
    }

    /// Reverts all changes made since the snapshot `id` was taken.
    ///
    /// The snapshot and every later one are discarded. On a journal error the store is only
    /// partially rolled back and the scope has to be abandoned.
    pub fn revert_to_snapshot(&mut self, id: RevisionId) -> Result<(), StateDbError> {
        let idx = self
            .valid_revisions
            .binary_search_by_key(&id, |revision| revision.id)
            .map_err(|_| StateDbError::UnknownRevision(id))?;
        let checkpoint = self.valid_revisions[idx].checkpoint;
        debug!(
            target: "statedb",
            %id,
            from = self.journal.len(),
            to = checkpoint.journal_i,
            "revert to snapshot"
        );
        self.valid_revisions.truncate(idx);
        self.journal.revert_to_mark(checkpoint, &mut self.store)?;
        Ok(())
    }

    /// Ends the scope.
    ///
    /// Removes destructed accounts and, if [`StateDbCfg::delete_empty_objects`] is set, touched
    /// empty ones. Clears the journal, snapshots and refund counter, and hands out the dirty
    /// accounts. Logs and preimages are kept.
    pub fn finalise(&mut self) -> FinaliseOutput {
        let mut output = FinaliseOutput::default();
        for address in core::mem::take(&mut self.store.dirty) {
            let Some(obj) = self.store.objects.get(&address) else {
                continue;
            };
            let delete = obj.is_destructed()
                || (self.cfg.delete_empty_objects && obj.is_touched() && obj.is_empty());
            if delete {
                self.store.objects.remove(&address);
                output.deleted.push(address);
            } else {
                output.updated.push(address);
            }
        }
        output.updated.sort_unstable();
        output.deleted.sort_unstable();

        for obj in self.store.objects.values_mut() {
            obj.set_touched(false);
        }
        self.store.destructed.clear();
        self.store.refund = 0;
        self.journal.clear();
        self.valid_revisions.clear();
        debug!(
            target: "statedb",
            updated = output.updated.len(),
            deleted = output.deleted.len(),
            "finalise"
        );
        output
    }
}
