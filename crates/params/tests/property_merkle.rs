// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Property-based tests for the Merkle allocation engine.
//!
//! - The root does not depend on input order.
//! - Every committed entry's proof verifies against the root.
//! - A proof does not verify a different amount.
//! - A dumped tree loads back to the same commitment.

use alloy_primitives::{Address, U256};
use launchkit_params::{AllocationEntry, DuplicatePolicy, MerkleAllocationTree, merkle::verify};
use proptest::prelude::*;
use rstest::rstest;

fn entries_strategy() -> impl Strategy<Value = Vec<AllocationEntry>> {
    prop::collection::btree_map(any::<[u8; 20]>(), 1u64.., 1..32).prop_map(|map| {
        map.into_iter()
            .map(|(address, amount)| {
                AllocationEntry::new(Address::from(address), U256::from(amount))
            })
            .collect()
    })
}

fn shuffled_entries() -> impl Strategy<Value = (Vec<AllocationEntry>, Vec<AllocationEntry>)> {
    entries_strategy()
        .prop_flat_map(|entries| (Just(entries.clone()), Just(entries).prop_shuffle()))
}

proptest! {
    /// Property: Any permutation of the same allocation list commits to the same root.
    #[rstest]
    fn root_is_permutation_invariant((entries, shuffled) in shuffled_entries()) {
        let tree = MerkleAllocationTree::build(entries, DuplicatePolicy::Reject).unwrap();
        let other = MerkleAllocationTree::build(shuffled, DuplicatePolicy::Reject).unwrap();

        prop_assert_eq!(tree.root(), other.root());
    }

    /// Property: Every entry's proof verifies, and no proof verifies a tampered amount.
    #[rstest]
    fn proofs_are_sound(entries in entries_strategy()) {
        let tree = MerkleAllocationTree::build(entries.clone(), DuplicatePolicy::Reject).unwrap();
        let root = tree.root();
        prop_assert!(tree.verify_all().is_ok());

        for entry in &entries {
            let proofs = tree.proofs_for(&entry.beneficiary);
            prop_assert_eq!(proofs.len(), 1);
            prop_assert!(verify(&root, entry, &proofs[0].proof));

            let tampered = AllocationEntry::new(entry.beneficiary, entry.amount + U256::from(1));
            prop_assert!(!verify(&root, &tampered, &proofs[0].proof));
        }
    }

    /// Property: Dump then load reproduces the same root and entries.
    #[rstest]
    fn dump_load_preserves_commitment(entries in entries_strategy()) {
        let tree = MerkleAllocationTree::build(entries, DuplicatePolicy::Reject).unwrap();
        let loaded = MerkleAllocationTree::load(&tree.dump()).unwrap();

        prop_assert_eq!(loaded.root(), tree.root());
        prop_assert_eq!(loaded.total_amount(), tree.total_amount());
    }
}
