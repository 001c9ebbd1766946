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

//! Convenient re-exports of the commonly used types and traits.

pub use crate::dictionary::{OperatorSequenceGenerator, WordList};
pub use crate::matrices::{
    LocalizingMatrixIndex, MatrixProperties, MomentMatrixIndex, MonomialMatrix,
    PolynomialLocalizingMatrixIndex, PolynomialMatrix, SymbolicMatrix,
};
pub use crate::operators::{
    MultiOperatorIterator, OperatorSequence, SequenceSign, SequenceStorage, ShortlexHasher,
};
pub use crate::symbols::{
    Monomial, Polynomial, PolynomialFactory, RawPolynomial, Symbol, SymbolRow, SymbolTable,
};
pub use crate::system::{MatrixSystem, MultithreadPolicy};
pub use crate::{Context, MomentaError, OperatorId, SymbolId};
