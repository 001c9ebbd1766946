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

use crate::operators::OperatorSequence;
use crate::symbols::Polynomial;

/// Index of a moment matrix: the word-length level of the underlying dictionary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct MomentMatrixIndex {
    /// Hierarchy level: entries are products of two words of up to this length.
    pub level: usize,
}

/// Index of a monomial localizing matrix: a level and the fixed inserted word.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocalizingMatrixIndex {
    /// Hierarchy level.
    pub level: usize,
    /// The word inserted between the dictionary words of each entry.
    pub word: OperatorSequence,
}

/// Index of a polynomial localizing matrix: a level and the localizing polynomial.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolynomialLocalizingMatrixIndex {
    /// Hierarchy level.
    pub level: usize,
    /// The localizing polynomial, in the factory's canonical order.
    pub polynomial: Polynomial,
}
