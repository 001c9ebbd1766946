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

//! Module for causal-network inflation scenarios.

mod observable_variant;
pub use observable_variant::*;

mod causal_network;
pub use causal_network::*;

mod context;
pub use context::*;

mod osg;

mod factor_table;
pub use factor_table::*;

mod canonical_observables;
pub use canonical_observables::*;

mod extension_suggester;
pub use extension_suggester::*;

mod extended_matrix;
pub use extended_matrix::*;

mod matrix_system;
pub use matrix_system::*;
