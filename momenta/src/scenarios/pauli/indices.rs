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

/// Partial hierarchy index restricting the dictionary to nearest neighbours.
///
/// `neighbours == 0` places no restriction and addresses the full dictionary of the level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct NearestNeighbourIndex {
    /// Hierarchy level of the moment matrix.
    pub moment_matrix_level: usize,
    /// Number of neighbours to consider, or 0 to include all.
    pub neighbours: usize,
    /// True if the last qubit is considered adjacent to qubit 0.
    pub wrapped: bool,
}

impl NearestNeighbourIndex {
    /// An unrestricted index for a hierarchy level.
    pub fn unrestricted(moment_matrix_level: usize) -> Self {
        Self {
            moment_matrix_level,
            neighbours: 0,
            wrapped: false,
        }
    }

    /// A restricted index.
    pub fn new(moment_matrix_level: usize, neighbours: usize, wrapped: bool) -> Self {
        Self {
            moment_matrix_level,
            neighbours,
            wrapped,
        }
    }
}

/// Index of a Pauli localizing matrix: a (possibly restricted) level and the inserted word.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PauliLocalizingMatrixIndex {
    /// The (possibly nearest-neighbour restricted) hierarchy index.
    pub index: NearestNeighbourIndex,
    /// The word inserted between the dictionary words of each entry.
    pub word: OperatorSequence,
}

/// Commutator and anti-commutator matrices share the localizing-matrix key shape.
pub type CommutatorMatrixIndex = PauliLocalizingMatrixIndex;

/// Index of a Pauli polynomial localizing matrix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PauliPolynomialLocalizingMatrixIndex {
    /// The (possibly nearest-neighbour restricted) hierarchy index.
    pub index: NearestNeighbourIndex,
    /// The localizing polynomial, in the factory's canonical order.
    pub polynomial: Polynomial,
}

/// Polynomial commutator and anti-commutator matrices share the polynomial key shape.
pub type PolynomialCommutatorMatrixIndex = PauliPolynomialLocalizingMatrixIndex;
