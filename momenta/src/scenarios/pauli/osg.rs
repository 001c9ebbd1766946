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

//! Specialized Pauli sequence generators: full dictionaries and nearest-neighbour restrictions.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::dictionary::OperatorSequenceGenerator;
use crate::operators::{OperatorSequence, SequenceSign, SequenceStorage};
use crate::scenarios::pauli::{NearestNeighbourIndex, PauliContext};
use crate::{Context, MomentaError, OperatorId};

/// Appends all 3^k Pauli letter assignments over a fixed qubit set.
fn fill_qubit_set(
    context: &PauliContext,
    qubits: &[usize],
    sequences: &mut Vec<OperatorSequence>,
) {
    let mut sorted: Vec<usize> = qubits.to_vec();
    sorted.sort_unstable();
    debug_assert!(sorted.windows(2).all(|pair| pair[0] < pair[1]));

    let assignments = 3usize.pow(sorted.len() as u32);
    for assignment in 0..assignments {
        let mut remainder = assignment;
        let operators: SequenceStorage = sorted
            .iter()
            .map(|&qubit| {
                let letter = (remainder % 3) as OperatorId;
                remainder /= 3;
                (3 * qubit) as OperatorId + letter
            })
            .collect();
        let hash = context.hasher().hash(&operators);
        sequences.push(OperatorSequence::from_raw_parts(
            operators,
            hash,
            SequenceSign::Positive,
        ));
    }
}

fn push_single_operators(context: &PauliContext, sequences: &mut Vec<OperatorSequence>) {
    for operator in 0..context.operator_count() as OperatorId {
        let mut storage = SequenceStorage::new();
        storage.push(operator);
        sequences.push(OperatorSequence::from_raw_parts(
            storage,
            context.hasher().hash_operator(operator),
            SequenceSign::Positive,
        ));
    }
}

/// Enumerates every canonical Pauli word up to the requested length.
pub(crate) fn full_generator(
    context: &PauliContext,
    word_length: usize,
) -> OperatorSequenceGenerator {
    let qubit_count = context.qubit_count();
    let capped_length = word_length.min(qubit_count);

    let mut sequences = vec![OperatorSequence::identity()];
    if capped_length >= 1 {
        push_single_operators(context, &mut sequences);
    }
    for length in 2..=capped_length {
        for qubits in (0..qubit_count).combinations(length) {
            fill_qubit_set(context, &qubits, &mut sequences);
        }
    }
    OperatorSequenceGenerator::from_sequences(word_length, sequences)
}

/// Enumerates the canonical Pauli words whose occupied qubits satisfy a neighbour restriction.
///
/// # Returns
///
/// * `Ok(OperatorSequenceGenerator)` - The restricted dictionary.
/// * `Err(MomentaError::UnsupportedLatticeWords)` - Lattice words longer than pairs.
/// * `Err(MomentaError::UnsupportedLatticeNeighbours)` - A next-nearest restriction on a lattice.
pub(crate) fn nearest_neighbour_generator(
    context: &PauliContext,
    index: &NearestNeighbourIndex,
) -> Result<OperatorSequenceGenerator, MomentaError> {
    if index.neighbours == 0 {
        return Ok(full_generator(context, index.moment_matrix_level));
    }
    if context.is_lattice() && index.neighbours > 1 {
        return Err(MomentaError::UnsupportedLatticeNeighbours {
            neighbours: index.neighbours,
        });
    }

    let qubit_count = context.qubit_count();
    let word_length = index.moment_matrix_level.min(qubit_count);

    let mut sequences = vec![OperatorSequence::identity()];
    if word_length >= 1 {
        push_single_operators(context, &mut sequences);
    }
    if word_length >= 2 {
        if context.is_lattice() {
            if word_length > 2 {
                return Err(MomentaError::UnsupportedLatticeWords { word_length });
            }
            for (first, second) in lattice_neighbour_links(context) {
                fill_qubit_set(context, &[first, second], &mut sequences);
            }
        } else if index.neighbours == 1 {
            chain_neighbour_sequences(context, word_length, &mut sequences);
        } else {
            chain_next_neighbour_sequences(context, word_length, index.neighbours, &mut sequences);
        }
    }
    Ok(OperatorSequenceGenerator::from_sequences(
        index.moment_matrix_level,
        sequences,
    ))
}

/// Runs of consecutive qubits on a chain, cyclic when wrapped.
fn chain_neighbour_sequences(
    context: &PauliContext,
    word_length: usize,
    sequences: &mut Vec<OperatorSequence>,
) {
    let qubit_count = context.qubit_count();
    for length in 2..=word_length {
        if context.wrap() && length < qubit_count {
            for start in 0..qubit_count {
                let qubits: Vec<usize> =
                    (0..length).map(|step| (start + step) % qubit_count).collect();
                fill_qubit_set(context, &qubits, sequences);
            }
        } else {
            for start in 0..=(qubit_count - length) {
                let qubits: Vec<usize> = (start..start + length).collect();
                fill_qubit_set(context, &qubits, sequences);
            }
        }
    }
}

/// Chain words whose consecutive occupied qubits are at most `max_distance` apart.
fn chain_next_neighbour_sequences(
    context: &PauliContext,
    word_length: usize,
    max_distance: usize,
    sequences: &mut Vec<OperatorSequence>,
) {
    debug_assert!(max_distance > 1);
    let qubit_count = context.qubit_count();
    let wrapped = context.wrap();

    // Wrapped gap tuples can revisit the same qubit set from several starting points; the
    // support-set filter keeps the dictionary duplicate-free.
    let mut seen_supports: BTreeSet<Vec<usize>> = BTreeSet::new();

    for length in 2..=word_length {
        let final_start = if wrapped {
            qubit_count - 1
        } else {
            qubit_count - length
        };
        for start in 0..=final_start {
            let mut gaps = vec![1usize; length - 1];
            loop {
                let mut qubits = vec![start];
                let mut cumulative = 0usize;
                let mut valid = true;
                for &gap in &gaps {
                    cumulative += gap;
                    if wrapped {
                        if cumulative >= qubit_count {
                            valid = false;
                            break;
                        }
                        qubits.push((start + cumulative) % qubit_count);
                    } else {
                        if start + cumulative >= qubit_count {
                            valid = false;
                            break;
                        }
                        qubits.push(start + cumulative);
                    }
                }

                if valid {
                    let mut support = qubits.clone();
                    support.sort_unstable();
                    if seen_supports.insert(support) {
                        fill_qubit_set(context, &qubits, sequences);
                    }
                }

                // Advance the gap tuple like a base-`max_distance` counter over 1..=max_distance.
                let mut position = gaps.len();
                loop {
                    if position == 0 {
                        break;
                    }
                    position -= 1;
                    gaps[position] += 1;
                    if gaps[position] > max_distance {
                        gaps[position] = 1;
                    } else {
                        break;
                    }
                }
                if gaps.iter().all(|&gap| gap == 1) {
                    break;
                }
            }
        }
    }
}

/// Nearest-neighbour links of the lattice, vertical and horizontal, with wrap links.
fn lattice_neighbour_links(context: &PauliContext) -> Vec<(usize, usize)> {
    let height = context.column_height();
    let width = context.row_width();
    let wrap = context.wrap();

    let mut links = Vec::new();
    for col in 0..width {
        for row in 0..height {
            let qubit = col * height + row;
            if row + 1 < height {
                links.push((qubit, qubit + 1));
            } else if wrap && height > 2 {
                links.push((qubit, qubit + 1 - height));
            }
            if col + 1 < width {
                links.push((qubit, qubit + height));
            } else if wrap && width > 2 {
                links.push((qubit, row));
            }
        }
    }
    links
}
