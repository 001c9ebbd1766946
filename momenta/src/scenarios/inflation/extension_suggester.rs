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

use std::collections::BTreeSet;

use crate::dictionary::OperatorSequenceGenerator;
use crate::matrices::MonomialMatrix;
use crate::scenarios::inflation::{FactorTable, InflationContext};
use crate::symbols::SymbolTable;
use crate::{Context, SymbolId};

/// At most this many extension candidates are examined per suggestion pass.
const MAX_EXTENSIONS: usize = 100;

/// Suggests scalar extensions for a moment matrix.
///
/// A symbol that factors non-trivially cannot be constrained by the plain moment matrix; adding
/// a row and column for one of its factors lets the factored moment appear as a product of
/// registered entries. The suggester greedily picks factors that close the most
/// non-fundamental symbols per added extension.
pub fn suggest_extensions(
    context: &InflationContext,
    symbols: &SymbolTable,
    factors: &FactorTable,
    matrix: &MonomialMatrix,
    generators: &OperatorSequenceGenerator,
) -> BTreeSet<SymbolId> {
    let mut output = BTreeSet::new();

    let mut necessary: BTreeSet<SymbolId> = matrix
        .properties()
        .real_basis_mask
        .iter()
        .copied()
        .filter(|&id| factors.get(id).map(|entry| !entry.fundamental()).unwrap_or(false))
        .collect();

    let mut tested: BTreeSet<SymbolId> = BTreeSet::new();
    let mut extension_count = 0;
    while extension_count < MAX_EXTENSIONS && !necessary.is_empty() {
        // 1. Choose an untested factor of some non-fundamental string.
        let nonfundamental = *necessary
            .iter()
            .next()
            .expect("Internal error: non-empty set has a first element.");
        let candidates = &factors
            .get(nonfundamental)
            .expect("Internal error: masked symbol has a factor entry.")
            .canonical_symbols;
        let Some(trial_factor) = candidates.iter().copied().find(|id| !tested.contains(id))
        else {
            // Every factor of this symbol has been examined; it cannot be closed.
            necessary.remove(&nonfundamental);
            continue;
        };
        tested.insert(trial_factor);

        // 2. See which symbols introducing this extension could close.
        for prefix in generators.iter() {
            let moment = context.simplify_as_moment(prefix);
            let Some((prefix_symbol, _)) = symbols.find(moment.hash()) else {
                continue;
            };
            let Some(prefix_entry) = factors.get(prefix_symbol) else {
                continue;
            };
            let joint = FactorTable::combine_factor_lists(
                &prefix_entry.canonical_symbols,
                &[trial_factor],
            );
            if let Some(closed) = factors.find_by_factors(&joint) {
                necessary.remove(&closed);
                output.insert(trial_factor);
            }
        }

        extension_count += 1;
    }

    output
}
