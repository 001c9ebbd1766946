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

//! Translational moment simplification: shift a Pauli word to its canonical position.

use crate::operators::{OperatorSequence, SequenceStorage};
use crate::scenarios::pauli::PauliContext;
use crate::{Context, OperatorId};

/// Returns the canonical representative of a Pauli word under the context's shift symmetry.
///
/// On an aperiodic chain the word is shifted so its first occupied qubit is qubit 0; on a
/// periodic chain the lexicographic minimum over all cyclic rotations is taken. Lattices shift
/// (or cyclically rotate, when wrapped) rows and columns independently.
pub(crate) fn canonical_moment_sequence(
    context: &PauliContext,
    seq: &OperatorSequence,
) -> OperatorSequence {
    if seq.is_zero() || seq.is_empty() {
        return seq.clone();
    }

    let operators = if context.is_lattice() {
        lattice_minimum(context, seq.operators())
    } else {
        chain_minimum(context, seq.operators())
    };
    let hash = context.hasher().hash(&operators);
    OperatorSequence::from_raw_parts(operators, hash, seq.sign())
}

fn chain_minimum(context: &PauliContext, operators: &[OperatorId]) -> SequenceStorage {
    let qubit_count = context.qubit_count();

    if !context.wrap() {
        let offset = (operators[0] / 3) as usize;
        return operators
            .iter()
            .map(|&oper| oper - (3 * offset) as OperatorId)
            .collect();
    }

    // The minimum rotation necessarily moves some occupied qubit onto qubit 0, so only those
    // offsets compete.
    let mut best: Option<SequenceStorage> = None;
    for &candidate in operators {
        let offset = (candidate / 3) as usize;
        let mut shifted: SequenceStorage = operators
            .iter()
            .map(|&oper| {
                let qubit = (oper / 3) as usize;
                let letter = oper % 3;
                (3 * ((qubit + qubit_count - offset) % qubit_count)) as OperatorId + letter
            })
            .collect();
        shifted.sort_unstable();
        match &best {
            Some(current) if &current[..] <= &shifted[..] => {}
            _ => best = Some(shifted),
        }
    }
    best.expect("Internal error: non-empty word has at least one rotation.")
}

fn lattice_minimum(context: &PauliContext, operators: &[OperatorId]) -> SequenceStorage {
    let height = context.column_height();
    let width = context.row_width();

    let sites: Vec<(usize, usize, u32)> = operators
        .iter()
        .map(|&oper| {
            let qubit = (oper / 3) as usize;
            (qubit % height, qubit / height, oper % 3)
        })
        .collect();

    if !context.wrap() {
        let row_offset = sites.iter().map(|&(row, _, _)| row).min().unwrap_or(0);
        let col_offset = sites.iter().map(|&(_, col, _)| col).min().unwrap_or(0);
        let mut shifted: SequenceStorage = sites
            .iter()
            .map(|&(row, col, letter)| {
                (3 * ((col - col_offset) * height + (row - row_offset))) as OperatorId + letter
            })
            .collect();
        shifted.sort_unstable();
        return shifted;
    }

    let mut best: Option<SequenceStorage> = None;
    for &(row_offset, _, _) in &sites {
        for &(_, col_offset, _) in &sites {
            let mut shifted: SequenceStorage = sites
                .iter()
                .map(|&(row, col, letter)| {
                    let shifted_row = (row + height - row_offset) % height;
                    let shifted_col = (col + width - col_offset) % width;
                    (3 * (shifted_col * height + shifted_row)) as OperatorId + letter
                })
                .collect();
            shifted.sort_unstable();
            match &best {
                Some(current) if &current[..] <= &shifted[..] => {}
                _ => best = Some(shifted),
            }
        }
    }
    best.expect("Internal error: non-empty word has at least one lattice shift.")
}
