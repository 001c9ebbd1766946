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

//! Module for the concrete scenarios: multi-party measurements, causal inflation, Pauli lattices.

pub mod inflation;
pub mod pauli;

mod measurement;
pub use measurement::*;

/// Names an index alphabetically: A, B, …, Z, AA, AB, …
pub(crate) fn alphabetic_name(index: usize) -> String {
    let mut index = index;
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        index /= 26;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    name.reverse();
    String::from_utf8(name).expect("Internal error: alphabetic name is always ASCII.")
}
