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

/// Reference to one inflated copy of an observable: the observable and its variant number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct OVIndex {
    /// Observable within the base network.
    pub observable: usize,
    /// Flat variant number within the observable's inflated copies.
    pub variant: usize,
}

impl OVIndex {
    /// Creates an observable/variant reference.
    pub fn new(observable: usize, variant: usize) -> Self {
        Self {
            observable,
            variant,
        }
    }
}

/// Reference to one outcome of an inflated observable copy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct OVOIndex {
    /// The observable and variant.
    pub observable_variant: OVIndex,
    /// The measurement outcome.
    pub outcome: usize,
}

impl OVOIndex {
    /// Creates an observable/variant/outcome reference.
    pub fn new(observable: usize, variant: usize, outcome: usize) -> Self {
        Self {
            observable_variant: OVIndex::new(observable, variant),
            outcome,
        }
    }
}
