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

//! Merkle commitment over an allocation list.
//!
//! The hashing rules are fixed so proofs verify on-chain with OpenZeppelin's `MerkleProof`:
//!
//! - Leaf: `keccak256(keccak256(abi.encode(address beneficiary, uint256 amount)))`. The double
//!   hash keeps a 64-byte leaf preimage from ever colliding with an internal node preimage.
//! - Internal node: `keccak256(min(a, b) ++ max(a, b))`, so a verifier never needs to know
//!   whether a sibling sits on the left or the right.
//! - Layout: a complete binary tree stored as an array of `2n - 1` nodes. Leaves are sorted
//!   ascending by hash and stored at the tail in reverse order; node `i` has children
//!   `2i + 1` and `2i + 2`. Sorting by hash makes the root independent of input order.

use std::{collections::HashSet, str::FromStr};

use alloy_primitives::{Address, B256, U256, keccak256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConsistencyError, LaunchError, ValidationError, ValidationErrorKind},
    math::decimal_to_base_units,
};

/// Serialization format tag of [`MerkleTreeDump`].
pub const TREE_FORMAT: &str = "standard-v1";
/// Solidity types of each leaf value, in encoding order.
pub const LEAF_ENCODING: [&str; 2] = ["address", "uint256"];

/// A beneficiary and the amount (in base units) committed to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// Account entitled to claim.
    pub beneficiary: Address,
    /// Amount in base units.
    pub amount: U256,
}

impl AllocationEntry {
    /// Creates a new [`AllocationEntry`].
    #[must_use]
    pub const fn new(beneficiary: Address, amount: U256) -> Self {
        Self {
            beneficiary,
            amount,
        }
    }

    /// Builds an entry from a human-authored address string and decimal amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not parse or the amount cannot be scaled exactly.
    pub fn from_human(human: &HumanAllocation, decimals: u8) -> Result<Self, ValidationError> {
        let beneficiary =
            parse_address(&human.beneficiary).map_err(|e| e.within("beneficiary"))?;
        let amount = decimal_to_base_units(human.amount, decimals).map_err(|e| e.within("amount"))?;
        Ok(Self::new(beneficiary, amount))
    }

    /// Returns `abi.encode(beneficiary, amount)`.
    #[must_use]
    pub fn abi_encode(&self) -> [u8; 64] {
        let mut buf = [0u8; 64];
        buf[12..32].copy_from_slice(self.beneficiary.as_slice());
        buf[32..].copy_from_slice(&self.amount.to_be_bytes::<32>());
        buf
    }

    /// Returns the domain-separated leaf hash of this entry.
    #[must_use]
    pub fn leaf_hash(&self) -> B256 {
        keccak256(keccak256(self.abi_encode()))
    }
}

/// An allocation as written by a human: any-case hex address and a whole-token amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanAllocation {
    /// Beneficiary address string.
    pub beneficiary: String,
    /// Amount in whole tokens.
    pub amount: Decimal,
}

/// Parses an address string into its canonical form.
///
/// All-lowercase and all-uppercase hex is accepted as is; mixed case must carry a valid
/// EIP-55 checksum.
///
/// # Errors
///
/// Returns an error if the string is not a 20-byte hex address or its checksum is wrong.
pub fn parse_address(value: &str) -> Result<Address, ValidationError> {
    let invalid = |reason: String| {
        ValidationError::new(
            "",
            ValidationErrorKind::InvalidAddress {
                value: value.to_string(),
                reason,
            },
        )
    };

    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(format!("0x{digits}"), None)
            .map_err(|e| invalid(e.to_string()))
    } else {
        Address::from_str(digits).map_err(|e| invalid(e.to_string()))
    }
}

/// Hashes two nodes in sorted order.
#[must_use]
pub fn hash_pair(a: &B256, b: &B256) -> B256 {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(first.as_slice());
    buf[32..].copy_from_slice(second.as_slice());
    keccak256(buf)
}

/// Verifies that `entry` is committed under `root` using only the proof path.
#[must_use]
pub fn verify(root: &B256, entry: &AllocationEntry, proof: &[B256]) -> bool {
    let computed = proof
        .iter()
        .fold(entry.leaf_hash(), |node, sibling| hash_pair(&node, sibling));
    computed == *root
}

/// How repeated beneficiaries are treated when building a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Each beneficiary may appear once.
    #[default]
    Reject,
    /// A beneficiary may appear several times with distinct amounts (e.g. timing buckets).
    /// Identical entries are still rejected since they would share a leaf.
    AllowDistinctAmounts,
}

/// An entry together with its inclusion proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationProof {
    /// The committed entry.
    pub entry: AllocationEntry,
    /// Leaf hash of the entry.
    pub leaf: B256,
    /// Sibling hashes from the leaf up to (excluding) the root.
    pub proof: Vec<B256>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TreeValue {
    entry: AllocationEntry,
    tree_index: usize,
}

/// A built, immutable Merkle commitment over an allocation list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleAllocationTree {
    tree: Vec<B256>,
    values: Vec<TreeValue>,
}

impl MerkleAllocationTree {
    /// Builds the tree over `entries`.
    ///
    /// # Errors
    ///
    /// Returns an error if `entries` is empty or repeats a beneficiary against `policy`.
    pub fn build<I>(entries: I, policy: DuplicatePolicy) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = AllocationEntry>,
    {
        let entries: Vec<AllocationEntry> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(ValidationError::new(
                "",
                ValidationErrorKind::EmptyAllocationList,
            ));
        }
        check_duplicates(&entries, policy)?;

        let mut leaves: Vec<(B256, AllocationEntry)> = entries
            .into_iter()
            .map(|entry| (entry.leaf_hash(), entry))
            .collect();
        leaves.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let len = 2 * leaves.len() - 1;
        let mut tree = vec![B256::ZERO; len];
        let mut values = Vec::with_capacity(leaves.len());
        for (position, (leaf, entry)) in leaves.iter().enumerate() {
            let tree_index = len - 1 - position;
            tree[tree_index] = *leaf;
            values.push(TreeValue {
                entry: *entry,
                tree_index,
            });
        }
        for index in (0..len - leaves.len()).rev() {
            tree[index] = hash_pair(&tree[2 * index + 1], &tree[2 * index + 2]);
        }

        Ok(Self { tree, values })
    }

    /// Builds the tree from human-authored allocations, scaling amounts by `decimals`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first entry that fails to parse, or any [`Self::build`] error.
    pub fn from_human(
        allocations: &[HumanAllocation],
        decimals: u8,
        policy: DuplicatePolicy,
    ) -> Result<Self, ValidationError> {
        let entries = allocations
            .iter()
            .enumerate()
            .map(|(index, human)| {
                AllocationEntry::from_human(human, decimals)
                    .map_err(|e| e.within(&format!("[{index}]")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(entries, policy)
    }

    /// Returns the 32-byte root to publish on-chain.
    #[must_use]
    pub fn root(&self) -> B256 {
        self.tree[0]
    }

    /// Returns the number of committed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the tree commits no entries (never the case for a built tree).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the committed entries in leaf order.
    pub fn entries(&self) -> impl Iterator<Item = &AllocationEntry> {
        self.values.iter().map(|value| &value.entry)
    }

    /// Returns the sum of all committed amounts.
    #[must_use]
    pub fn total_amount(&self) -> U256 {
        self.entries()
            .fold(U256::ZERO, |acc, entry| acc.saturating_add(entry.amount))
    }

    fn proof_at(&self, tree_index: usize) -> Vec<B256> {
        let mut proof = Vec::new();
        let mut index = tree_index;
        while index > 0 {
            let sibling = if index % 2 == 1 { index + 1 } else { index - 1 };
            proof.push(self.tree[sibling]);
            index = (index - 1) / 2;
        }
        proof
    }

    /// Returns every committed entry for `account` with its proof; empty when there is none.
    #[must_use]
    pub fn proofs_for(&self, account: &Address) -> Vec<AllocationProof> {
        self.values
            .iter()
            .filter(|value| value.entry.beneficiary == *account)
            .map(|value| AllocationProof {
                entry: value.entry,
                leaf: self.tree[value.tree_index],
                proof: self.proof_at(value.tree_index),
            })
            .collect()
    }

    /// Re-verifies every entry's proof against the root.
    ///
    /// # Errors
    ///
    /// Returns an error for the first entry whose proof fails to verify.
    pub fn verify_all(&self) -> Result<(), ConsistencyError> {
        let root = self.root();
        for value in &self.values {
            if !verify(&root, &value.entry, &self.proof_at(value.tree_index)) {
                return Err(ConsistencyError::ProofVerificationFailed {
                    beneficiary: value.entry.beneficiary,
                    amount: value.entry.amount,
                });
            }
        }
        Ok(())
    }

    /// Serializes the full tree so another party can answer proof requests.
    #[must_use]
    pub fn dump(&self) -> MerkleTreeDump {
        MerkleTreeDump {
            format: TREE_FORMAT.to_string(),
            leaf_encoding: LEAF_ENCODING.iter().map(ToString::to_string).collect(),
            tree: self.tree.clone(),
            values: self
                .values
                .iter()
                .map(|value| DumpValue {
                    value: (value.entry.beneficiary, value.entry.amount.to_string()),
                    tree_index: value.tree_index,
                })
                .collect(),
        }
    }

    /// Restores a tree from a dump, recomputing every node.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unknown format or malformed value, and a consistency
    /// error if any recorded node disagrees with its recomputed hash.
    pub fn load(dump: &MerkleTreeDump) -> Result<Self, LaunchError> {
        if dump.format != TREE_FORMAT {
            return Err(ValidationError::new(
                "format",
                ValidationErrorKind::Invalid(format!("unsupported tree format '{}'", dump.format)),
            )
            .into());
        }
        if dump.leaf_encoding != LEAF_ENCODING {
            return Err(ValidationError::new(
                "leafEncoding",
                ValidationErrorKind::Invalid(format!(
                    "expected {LEAF_ENCODING:?}, was {:?}",
                    dump.leaf_encoding
                )),
            )
            .into());
        }
        if dump.values.is_empty() {
            return Err(
                ValidationError::new("values", ValidationErrorKind::EmptyAllocationList).into(),
            );
        }

        let len = dump.tree.len();
        let leaf_count = dump.values.len();
        if len != 2 * leaf_count - 1 {
            return Err(ConsistencyError::TreeIntegrity {
                index: len,
                reason: format!("{len} nodes cannot hold {leaf_count} leaves"),
            }
            .into());
        }

        let mut values = Vec::with_capacity(leaf_count);
        let mut seen_indices = HashSet::with_capacity(leaf_count);
        for (position, raw) in dump.values.iter().enumerate() {
            let field = format!("values[{position}]");
            let amount = U256::from_str(&raw.value.1).map_err(|e| {
                ValidationError::new(
                    format!("{field}.value"),
                    ValidationErrorKind::InvalidAmount {
                        value: raw.value.1.clone(),
                        reason: e.to_string(),
                    },
                )
            })?;
            let entry = AllocationEntry::new(raw.value.0, amount);
            let index = raw.tree_index;

            if index < len - leaf_count || index >= len || !seen_indices.insert(index) {
                return Err(ConsistencyError::TreeIntegrity {
                    index,
                    reason: format!("{field} has an invalid or repeated leaf index"),
                }
                .into());
            }
            if dump.tree[index] != entry.leaf_hash() {
                return Err(ConsistencyError::TreeIntegrity {
                    index,
                    reason: format!("{field} does not hash to the recorded leaf"),
                }
                .into());
            }
            values.push(TreeValue {
                entry,
                tree_index: index,
            });
        }

        check_duplicates(
            &values.iter().map(|v| v.entry).collect::<Vec<_>>(),
            DuplicatePolicy::AllowDistinctAmounts,
        )?;

        for index in 0..len - leaf_count {
            let expected = hash_pair(&dump.tree[2 * index + 1], &dump.tree[2 * index + 2]);
            if dump.tree[index] != expected {
                return Err(ConsistencyError::TreeIntegrity {
                    index,
                    reason: "internal node does not hash from its children".to_string(),
                }
                .into());
            }
        }

        Ok(Self {
            tree: dump.tree.clone(),
            values,
        })
    }
}

fn check_duplicates(
    entries: &[AllocationEntry],
    policy: DuplicatePolicy,
) -> Result<(), ValidationError> {
    let mut beneficiaries = HashSet::with_capacity(entries.len());
    let mut exact = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let repeated = match policy {
            DuplicatePolicy::Reject => !beneficiaries.insert(entry.beneficiary),
            DuplicatePolicy::AllowDistinctAmounts => !exact.insert(*entry),
        };
        if repeated {
            return Err(ValidationError::new(
                format!("[{index}].beneficiary"),
                ValidationErrorKind::DuplicateBeneficiary {
                    beneficiary: entry.beneficiary,
                },
            ));
        }
    }
    Ok(())
}

/// Interchange form of a tree, compatible with OpenZeppelin's `StandardMerkleTree.dump()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleTreeDump {
    /// Always [`TREE_FORMAT`].
    pub format: String,
    /// Always [`LEAF_ENCODING`].
    pub leaf_encoding: Vec<String>,
    /// All nodes in array layout, root first.
    pub tree: Vec<B256>,
    /// Committed values with the index of their leaf.
    pub values: Vec<DumpValue>,
}

/// One committed value of a [`MerkleTreeDump`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpValue {
    /// `[beneficiary, amount]` with the amount as a decimal string.
    pub value: (Address, String),
    /// Index of the value's leaf in the tree array.
    pub tree_index: usize,
}
