// Copyright © 2021-2023 HQS Quantum Simulations GmbH. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not use this file except
// in compliance with the License. You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software distributed under the
// License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either
// express or implied. See the License for the specific language governing permissions and
// limitations under the License.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tinyvec::TinyVec;

use crate::operators::SequenceSign;
use crate::OperatorId;

/// Backing storage of an operator string; inline for the short words that dominate dictionaries.
pub type SequenceStorage = TinyVec<[OperatorId; 8]>;

/// An immutable sequence of operators in its context's canonical form.
///
/// A sequence carries the ordered operator string, a sign tag (±1, ±i), a zero flag and the
/// precomputed shortlex hash. Sequences are only constructed through a [crate::Context], which
/// guarantees the canonical-form invariant: the stored string has all scenario rewrite rules
/// applied and the hash is consistent with the context's alphabet.
///
/// A zero sequence represents algebraic zero: its operator string is empty, its hash is 0, and
/// it compares equal to any other zero sequence regardless of sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorSequence {
    operators: SequenceStorage,
    hash: u64,
    sign: SequenceSign,
    zero: bool,
}

impl OperatorSequence {
    /// Constructs the sequence representing the algebraic identity.
    pub fn identity() -> Self {
        Self {
            operators: SequenceStorage::new(),
            hash: 1,
            sign: SequenceSign::Positive,
            zero: false,
        }
    }

    /// Constructs the sequence representing algebraic zero.
    pub fn zero() -> Self {
        Self {
            operators: SequenceStorage::new(),
            hash: 0,
            sign: SequenceSign::Positive,
            zero: true,
        }
    }

    /// Assembles a sequence from parts already known to be canonical.
    ///
    /// Callers are responsible for the canonical-form invariant; this is the constructor used
    /// by contexts and specialized sequence generators.
    pub fn from_raw_parts(operators: SequenceStorage, hash: u64, sign: SequenceSign) -> Self {
        Self {
            operators,
            hash,
            sign,
            zero: false,
        }
    }

    /// The canonical operator string.
    pub fn operators(&self) -> &[OperatorId] {
        &self.operators
    }

    /// The shortlex hash of the operator string (0 for the zero sequence).
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// The sign tag of the sequence.
    pub fn sign(&self) -> SequenceSign {
        self.sign
    }

    /// True if the sequence represents algebraic zero.
    pub fn is_zero(&self) -> bool {
        self.zero
    }

    /// True if the operator string is empty (identity, up to sign, unless zero).
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Number of operators in the string.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Returns a copy of the sequence carrying the given sign.
    pub fn with_sign(&self, sign: SequenceSign) -> Self {
        if self.zero {
            return Self::zero();
        }
        Self {
            operators: self.operators.clone(),
            hash: self.hash,
            sign,
            zero: false,
        }
    }

    /// Returns a copy of the sequence with the sign multiplied in.
    pub fn with_sign_multiplied(&self, sign: SequenceSign) -> Self {
        self.with_sign(self.sign * sign)
    }

    /// Replaces the sequence with algebraic zero.
    pub fn set_to_zero(&mut self) {
        *self = Self::zero();
    }
}

/// Implements the default function (Default trait) of OperatorSequence (the identity).
impl Default for OperatorSequence {
    fn default() -> Self {
        Self::identity()
    }
}

/// Zero sequences compare equal regardless of any sign they carried before annihilation.
impl PartialEq for OperatorSequence {
    fn eq(&self, other: &Self) -> bool {
        if self.zero || other.zero {
            return self.zero == other.zero;
        }
        self.hash == other.hash && self.sign == other.sign && self.operators == other.operators
    }
}

impl Eq for OperatorSequence {}

impl Hash for OperatorSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.zero {
            0u64.hash(state);
            return;
        }
        self.hash.hash(state);
        self.sign.hash(state);
    }
}

/// Implements Ord for OperatorSequence: zero first, then shortlex (via the hash), then sign.
impl Ord for OperatorSequence {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.zero, other.zero) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => (self.hash, self.sign).cmp(&(other.hash, other.sign)),
        }
    }
}

impl PartialOrd for OperatorSequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
