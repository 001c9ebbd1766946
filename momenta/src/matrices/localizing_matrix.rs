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

use num_complex::Complex64;

use crate::dictionary::OperatorSequenceGenerator;
use crate::matrices::{build_monomial_matrix, LocalizingMatrixIndex, MonomialMatrix};
use crate::symbols::SymbolTable;
use crate::system::MultithreadPolicy;
use crate::Context;

/// Builds a monomial localizing matrix: entry (i, j) is the symbol of `gᵢ* · w · gⱼ`.
pub(crate) fn create_localizing_matrix<C: Context>(
    context: &C,
    symbols: &mut SymbolTable,
    labels: &OperatorSequenceGenerator,
    index: &LocalizingMatrixIndex,
    policy: MultithreadPolicy,
) -> MonomialMatrix {
    let word = index.word.clone();
    let description = format!(
        "Localizing matrix, level {}, word \"{}\"",
        index.level,
        context.format_sequence(&word)
    );
    build_monomial_matrix(
        context,
        symbols,
        labels,
        move |lhs, rhs| context.multiply(&context.multiply(lhs, &word), rhs),
        Complex64::new(1.0, 0.0),
        description,
        policy,
    )
}
