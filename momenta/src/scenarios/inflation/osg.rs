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

//! Specialized inflation sequence generator: commuting words, orthogonality pre-applied.

use itertools::Itertools;

use crate::dictionary::OperatorSequenceGenerator;
use crate::operators::{OperatorSequence, SequenceSign, SequenceStorage};
use crate::scenarios::inflation::InflationContext;
use crate::{Context, OperatorId};

/// True if a sorted word survives the scenario's rewrite rules untouched.
fn is_canonical(context: &InflationContext, word: &[OperatorId]) -> bool {
    for pair in word.windows(2) {
        let lhs = &context.operator_info()[pair[0] as usize];
        let rhs = &context.operator_info()[pair[1] as usize];
        // Distinct outcomes of one observable copy annihilate.
        if lhs.observable == rhs.observable && lhs.variant == rhs.variant && pair[0] != pair[1] {
            return false;
        }
        // Repeated projectors collapse.
        if lhs.projective && pair[0] == pair[1] {
            return false;
        }
    }
    true
}

/// Enumerates every canonical inflation word up to the requested length.
///
/// Operators commute, so only sorted index tuples are enumerated: strictly increasing when
/// every observable is projective, non-decreasing otherwise (generic moments may repeat).
pub(crate) fn inflation_generator(
    context: &InflationContext,
    word_length: usize,
) -> OperatorSequenceGenerator {
    let operator_count = context.operator_count();
    let completely_projective = context
        .observables()
        .iter()
        .all(|observable| observable.projective());

    let mut sequences = vec![OperatorSequence::identity()];
    for length in 1..=word_length {
        let tuples: Box<dyn Iterator<Item = Vec<usize>>> = if completely_projective {
            Box::new((0..operator_count).combinations(length))
        } else {
            Box::new((0..operator_count).combinations_with_replacement(length))
        };
        for tuple in tuples {
            let word: SequenceStorage =
                tuple.into_iter().map(|oper| oper as OperatorId).collect();
            if is_canonical(context, &word) {
                let hash = context.hasher().hash(&word);
                sequences.push(OperatorSequence::from_raw_parts(
                    word,
                    hash,
                    SequenceSign::Positive,
                ));
            }
        }
    }
    OperatorSequenceGenerator::from_sequences(word_length, sequences)
}
