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

use serde::{Deserialize, Serialize};

use crate::OperatorId;

/// Content-addressed identity for operator strings: a shortlex hash over the context's alphabet.
///
/// For an alphabet of size n, the string (o₀, …, o₍ₖ₋₁₎) hashes to `1 + Σᵢ (1 + oᵢ)·nⁱ`. The
/// empty string hashes to 1; the hash value 0 is reserved for algebraic zero. The encoding is
/// injective within the representable range and orders strings first by length, then
/// lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortlexHasher {
    radix: u64,
    longest_hashable: usize,
}

impl ShortlexHasher {
    /// Creates a hasher for an alphabet of the given size.
    ///
    /// # Arguments
    ///
    /// * `alphabet_size` - The number of distinct operators in the context.
    pub fn new(alphabet_size: usize) -> Self {
        let radix = alphabet_size as u64;
        Self {
            radix,
            longest_hashable: Self::compute_longest_hashable(radix),
        }
    }

    /// The alphabet size the hasher was constructed with.
    pub fn radix(&self) -> u64 {
        self.radix
    }

    /// The longest string that can be hashed without overflowing the hash range.
    pub fn longest_hashable(&self) -> usize {
        self.longest_hashable
    }

    /// Hashes an operator string.
    ///
    /// # Arguments
    ///
    /// * `operators` - The string to hash; must not exceed [ShortlexHasher::longest_hashable].
    pub fn hash(&self, operators: &[OperatorId]) -> u64 {
        debug_assert!(operators.len() <= self.longest_hashable);
        let mut hash = 1u64;
        let mut multiplier = 1u64;
        for &oper in operators {
            hash += (oper as u64 + 1) * multiplier;
            multiplier = multiplier.wrapping_mul(self.radix);
        }
        hash
    }

    /// Hashes a single operator.
    pub fn hash_operator(&self, operator: OperatorId) -> u64 {
        operator as u64 + 2
    }

    fn compute_longest_hashable(radix: u64) -> usize {
        // Degenerate alphabets: radix 0 admits only the empty string, and radix 1 accumulates
        // additively; neither can overflow for any realistic length.
        if radix <= 1 {
            return usize::MAX >> 1;
        }

        let mut worst = 1u64;
        let mut multiplier = 1u64;
        let mut length = 0usize;
        loop {
            let term = match multiplier.checked_mul(radix) {
                Some(term) => term,
                None => return length,
            };
            worst = match worst.checked_add(term) {
                Some(worst) => worst,
                None => return length,
            };
            multiplier = term;
            length += 1;
        }
    }
}
