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

//! Module for the symbol table and the symbolic polynomial algebra built on it.

mod symbol_table;
pub use symbol_table::*;

mod monomial;
pub use monomial::*;

mod polynomial;
pub use polynomial::*;

mod raw_polynomial;
pub use raw_polynomial::*;
