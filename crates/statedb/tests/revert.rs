//! Snapshot and revert behaviour of the state database.
mod common;

use common::{init_tracing, ALICE, BOB, CAROL, TX1, TX2};
use primitives::{bytes, Bytes, Log, B256, KECCAK_EMPTY, RIPEMD_ADDRESS, U256};
use rstest::rstest;
use statejournal_statedb::{
    journal::JournalError, RevisionId, StateDb, StateDbCfg, StateDbError,
};

fn funded() -> StateDb {
    init_tracing();
    let mut db = StateDb::default();
    db.set_balance(ALICE, U256::from(10));
    db.finalise();
    db
}

fn log(data: Bytes) -> Log {
    Log::new_unchecked(ALICE, vec![], data)
}

#[test]
fn balance_changes_revert_in_reverse_order() {
    let mut db = funded();
    let snap = db.snapshot();
    db.set_balance(ALICE, U256::from(20));
    db.set_balance(ALICE, U256::from(30));

    db.revert_to_snapshot(snap).unwrap();

    assert_eq!(db.balance(&ALICE), U256::from(10));
    assert!(db.journal().is_empty());
}

#[test]
fn nested_snapshots() {
    let mut db = funded();
    let outer = db.snapshot();
    db.add_balance(ALICE, U256::from(5)).unwrap();
    let inner = db.snapshot();
    let inner_len = db.journal().len();
    db.set_nonce(ALICE, 1);

    db.revert_to_snapshot(inner).unwrap();
    assert_eq!(db.journal().len(), inner_len);
    assert_eq!(db.nonce(&ALICE), 0);
    assert_eq!(db.balance(&ALICE), U256::from(15));

    db.revert_to_snapshot(outer).unwrap();
    assert_eq!(db.balance(&ALICE), U256::from(10));
}

#[test]
fn discarded_snapshot_is_unknown() {
    let mut db = funded();
    let outer = db.snapshot();
    db.set_nonce(ALICE, 1);
    let inner = db.snapshot();
    db.set_nonce(ALICE, 2);
    db.revert_to_snapshot(outer).unwrap();

    assert_eq!(
        db.revert_to_snapshot(inner),
        Err(StateDbError::UnknownRevision(inner))
    );
    assert_eq!(
        db.revert_to_snapshot(RevisionId(99)),
        Err(StateDbError::UnknownRevision(RevisionId(99)))
    );
    assert_eq!(db.nonce(&ALICE), 0);
}

#[test]
fn scope_closes_without_revert() {
    let mut db = funded();
    db.snapshot();
    db.set_nonce(ALICE, 4);
    db.set_state(ALICE, B256::ZERO, B256::repeat_byte(1));

    let output = db.finalise();

    assert_eq!(output.updated, vec![ALICE]);
    assert_eq!(db.nonce(&ALICE), 4);
    assert_eq!(db.state(&ALICE, &B256::ZERO), B256::repeat_byte(1));
    assert!(db.journal().is_empty());
}

#[test]
fn finalise_invalidates_snapshots() {
    let mut db = funded();
    let snap = db.snapshot();
    db.set_nonce(ALICE, 1);
    db.finalise();

    assert_eq!(
        db.revert_to_snapshot(snap),
        Err(StateDbError::UnknownRevision(snap))
    );
}

#[test]
fn created_account_disappears() {
    let mut db = funded();
    let snap = db.snapshot();
    db.create_account(BOB);
    db.set_balance(BOB, U256::from(1));

    db.revert_to_snapshot(snap).unwrap();

    assert!(!db.exists(&BOB));
    assert!(!db.store().dirty.contains(&BOB));
}

#[test]
fn recreated_account_is_restored() {
    let mut db = funded();
    db.set_nonce(ALICE, 7);
    let before = db.object(&ALICE).cloned();
    let snap = db.snapshot();
    db.create_account(ALICE);
    assert_eq!(db.nonce(&ALICE), 0);

    db.revert_to_snapshot(snap).unwrap();

    assert_eq!(db.object(&ALICE).cloned(), before);
}

#[rstest]
#[case::storage(|db: &mut StateDb| db.set_state(ALICE, B256::ZERO, B256::repeat_byte(9)))]
#[case::nonce(|db: &mut StateDb| db.set_nonce(ALICE, 3))]
#[case::coinage(|db: &mut StateDb| db.set_coinage(ALICE, U256::from(77)))]
#[case::last_reference_block(|db: &mut StateDb| db.set_last_reference_block(ALICE, 1_000))]
#[case::code(|db: &mut StateDb| db.set_code(ALICE, bytes!("600160005260206000f3")))]
#[case::balance(|db: &mut StateDb| db.set_balance(ALICE, U256::MAX))]
#[case::touch(|db: &mut StateDb| db.touch(ALICE))]
#[case::self_destruct(|db: &mut StateDb| { db.self_destruct(ALICE); })]
fn every_mutation_round_trips(#[case] mutate: fn(&mut StateDb)) {
    let mut db = funded();
    db.set_coinage(ALICE, U256::from(3));
    db.set_last_reference_block(ALICE, 12);
    db.finalise();
    let before = db.object(&ALICE).cloned();

    let snap = db.snapshot();
    mutate(&mut db);
    assert_ne!(db.object(&ALICE).cloned(), before);
    db.revert_to_snapshot(snap).unwrap();

    assert_eq!(db.object(&ALICE).cloned(), before);
}

#[test]
fn code_and_hash_revert_together() {
    let mut db = funded();
    let snap = db.snapshot();
    db.set_code(ALICE, bytes!("6000"));
    assert_ne!(db.code_hash(&ALICE), KECCAK_EMPTY);

    db.revert_to_snapshot(snap).unwrap();

    assert_eq!(db.code(&ALICE), Bytes::new());
    assert_eq!(db.code_hash(&ALICE), KECCAK_EMPTY);
}

#[test]
fn self_destruct_leaves_destructed_set_on_revert() {
    let mut db = funded();
    db.set_coinage(ALICE, U256::from(3));
    let snap = db.snapshot();
    assert!(db.self_destruct(ALICE));
    assert!(db.has_self_destructed(&ALICE));
    assert!(db.store().destructed.contains(&ALICE));
    assert_eq!(db.balance(&ALICE), U256::ZERO);

    db.revert_to_snapshot(snap).unwrap();

    assert!(!db.has_self_destructed(&ALICE));
    assert!(!db.store().destructed.contains(&ALICE));
    assert_eq!(db.balance(&ALICE), U256::from(10));
    assert_eq!(db.coinage(&ALICE), U256::from(3));
}

#[test]
fn second_self_destruct_revert_keeps_first() {
    let mut db = funded();
    db.self_destruct(ALICE);
    let snap = db.snapshot();
    db.self_destruct(ALICE);

    db.revert_to_snapshot(snap).unwrap();

    assert!(db.has_self_destructed(&ALICE));
    assert!(db.store().destructed.contains(&ALICE));
}

#[test]
fn recreated_account_leaves_destructed_set() {
    init_tracing();
    let mut db = StateDb::default();
    db.create_account(CAROL);
    db.self_destruct(CAROL);
    db.create_account(CAROL);
    assert!(!db.has_self_destructed(&CAROL));
    assert!(!db.store().destructed.contains(&CAROL));

    let snap = db.snapshot();
    db.self_destruct(CAROL);
    assert!(db.store().destructed.contains(&CAROL));
    db.revert_to_snapshot(snap).unwrap();

    assert!(!db.has_self_destructed(&CAROL));
    assert!(!db.store().destructed.contains(&CAROL));
}

#[test]
fn revert_past_recreation_restores_destructed_account() {
    init_tracing();
    let mut db = StateDb::default();
    db.create_account(CAROL);
    db.self_destruct(CAROL);
    let snap = db.snapshot();
    db.create_account(CAROL);
    db.self_destruct(CAROL);
    db.revert_to_snapshot(snap).unwrap();

    assert!(db.has_self_destructed(&CAROL));
    assert!(db.store().destructed.contains(&CAROL));
}

#[test]
fn finalise_removes_self_destructed_account() {
    let mut db = funded();
    db.add_refund(100).unwrap();
    assert!(db.self_destruct(ALICE));

    let output = db.finalise();

    assert_eq!(output.deleted, vec![ALICE]);
    assert!(output.updated.is_empty());
    assert!(!db.exists(&ALICE));
    assert!(db.store().destructed.is_empty());
    assert_eq!(db.refund(), 0);
    assert!(db.journal().is_empty());
}

#[test]
fn touch_of_ripemd_survives_revert() {
    let mut db = funded();
    db.create_account(RIPEMD_ADDRESS);
    db.create_account(BOB);
    db.finalise();

    let snap = db.snapshot();
    db.add_balance(RIPEMD_ADDRESS, U256::ZERO).unwrap();
    db.add_balance(BOB, U256::ZERO).unwrap();
    db.revert_to_snapshot(snap).unwrap();

    assert!(db.object(&RIPEMD_ADDRESS).unwrap().is_touched());
    assert!(!db.object(&BOB).unwrap().is_touched());
    assert!(!db.store().dirty.contains(&BOB));

    // touched and empty, removed at the end of the scope
    let output = db.finalise();
    assert_eq!(output.deleted, vec![RIPEMD_ADDRESS]);
    assert!(!db.exists(&RIPEMD_ADDRESS));
    assert!(db.exists(&BOB));
}

#[test]
fn touched_empty_accounts_kept_without_state_clearing() {
    init_tracing();
    let mut db = StateDb::new(StateDbCfg::new().with_delete_empty_objects(false));
    db.touch(BOB);

    let output = db.finalise();

    assert_eq!(output.updated, vec![BOB]);
    assert!(db.exists(&BOB));
    assert!(!db.object(&BOB).unwrap().is_touched());
}

#[test]
fn logs_revert_one_at_a_time() {
    let mut db = funded();
    let first = db.snapshot();
    db.add_log(TX1, log(bytes!("01")));
    let second = db.snapshot();
    db.add_log(TX1, log(bytes!("02")));
    db.add_log(TX2, log(bytes!("03")));

    db.revert_to_snapshot(second).unwrap();
    assert_eq!(db.logs(&TX1), &[log(bytes!("01"))]);
    assert!(db.logs(&TX2).is_empty());

    db.revert_to_snapshot(first).unwrap();
    assert!(!db.store().logs.contains_key(&TX1));
}

#[test]
fn preimage_and_refund_revert() {
    let mut db = funded();
    db.add_refund(100).unwrap();
    let snap = db.snapshot();
    db.add_preimage(TX1, bytes!("cafe"));
    db.sub_refund(40).unwrap();
    db.add_refund(5).unwrap();
    assert_eq!(db.refund(), 65);

    db.revert_to_snapshot(snap).unwrap();

    assert_eq!(db.refund(), 100);
    assert_eq!(db.preimage(&TX1), None);
}

#[test]
fn failed_operations_do_not_journal() {
    let mut db = funded();
    let len = db.journal().len();

    assert_eq!(
        db.sub_balance(ALICE, U256::from(11)),
        Err(StateDbError::InsufficientBalance {
            address: ALICE,
            balance: U256::from(10),
            amount: U256::from(11),
        })
    );
    assert_eq!(
        db.sub_refund(1),
        Err(StateDbError::RefundUnderflow {
            refund: 0,
            amount: 1
        })
    );
    db.set_balance(BOB, U256::MAX);
    let len_after_bob = db.journal().len();
    assert_eq!(
        db.add_balance(BOB, U256::from(1)),
        Err(StateDbError::BalanceOverflow(BOB))
    );

    assert!(len_after_bob > len);
    assert_eq!(db.journal().len(), len_after_bob);
    assert_eq!(db.balance(&ALICE), U256::from(10));
}

#[test]
fn journal_errors_surface_through_statedb() {
    let err: StateDbError = JournalError::MissingAccount(ALICE).into();
    assert_eq!(
        err.to_string(),
        format!("journal entry references unknown account {ALICE}")
    );
}
