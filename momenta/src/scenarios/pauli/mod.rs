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

//! Module for chains and lattices of Pauli operators.

mod indices;
pub use indices::*;

mod context;
pub use context::*;

mod moment_simplifier;
pub(crate) use moment_simplifier::canonical_moment_sequence;

mod osg;

mod dictionary;
pub use dictionary::*;

mod matrix_system;
pub use matrix_system::*;
