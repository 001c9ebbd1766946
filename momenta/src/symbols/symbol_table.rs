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

use indexmap::IndexMap;

use crate::operators::{OperatorSequence, SequenceSign};
use crate::{Context, SymbolId};

/// One interned symbol: a canonical sequence, its conjugate, and the basis bookkeeping.
///
/// Symbols always store the positive-signed representative of their sequence; sign factors
/// live in the [crate::symbols::Monomial]s that reference the symbol. Symbols registered
/// through a factor list whose moment product has no operator realization (the inflation
/// level holds no further independent source copies) carry no sequence; they are addressed
/// through the factor table instead of the hash index.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: SymbolId,
    sequence: Option<OperatorSequence>,
    conjugate: Option<OperatorSequence>,
    hermitian: bool,
    real_basis: Option<usize>,
    imaginary_basis: Option<usize>,
}

impl Symbol {
    /// The symbol's id.
    pub fn id(&self) -> SymbolId {
        self.id
    }

    /// The canonical sequence of the symbol, if it has an operator realization.
    pub fn sequence(&self) -> Option<&OperatorSequence> {
        self.sequence.as_ref()
    }

    /// The conjugate of the symbol's sequence, if it has an operator realization.
    pub fn conjugate_sequence(&self) -> Option<&OperatorSequence> {
        self.conjugate.as_ref()
    }

    /// True, if the symbol carries an operator sequence.
    pub fn has_sequence(&self) -> bool {
        self.sequence.is_some()
    }

    /// True, if the symbol equals its own conjugate.
    pub fn is_hermitian(&self) -> bool {
        self.hermitian
    }

    /// Index of the symbol within the dense real basis, if it has one.
    pub fn real_basis(&self) -> Option<usize> {
        self.real_basis
    }

    /// Index of the symbol within the dense imaginary basis, if it has one.
    pub fn imaginary_basis(&self) -> Option<usize> {
        self.imaginary_basis
    }
}

/// One row of the symbol table in export form, with context-formatted strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRow {
    /// The symbol's id.
    pub id: SymbolId,
    /// Formatted canonical sequence.
    pub sequence: String,
    /// Formatted conjugate sequence.
    pub conjugate: String,
    /// True, if the symbol equals its own conjugate.
    pub hermitian: bool,
    /// Real basis index, if assigned.
    pub real_basis: Option<usize>,
    /// Imaginary basis index, if assigned.
    pub imaginary_basis: Option<usize>,
}

/// Content-addressed store of unique operator sequences.
///
/// Every canonical sequence is indexed under both its own hash and the hash of its conjugate,
/// so a single lookup resolves either orientation. IDs 0 and 1 are reserved for algebraic zero
/// and the identity; real and imaginary basis indices form two dense enumerations used to size
/// SDP basis matrices downstream.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    hash_index: IndexMap<u64, (SymbolId, bool)>,
    real_basis_count: usize,
    imaginary_basis_count: usize,
}

impl SymbolTable {
    /// Creates a symbol table holding the two reserved symbols `0` and `1`.
    pub fn new() -> Self {
        let mut table = Self {
            symbols: Vec::new(),
            hash_index: IndexMap::new(),
            real_basis_count: 0,
            imaginary_basis_count: 0,
        };

        let zero = OperatorSequence::zero();
        table.symbols.push(Symbol {
            id: 0,
            sequence: Some(zero.clone()),
            conjugate: Some(zero),
            hermitian: true,
            real_basis: None,
            imaginary_basis: None,
        });
        table.hash_index.insert(0, (0, false));

        let identity = OperatorSequence::identity();
        table.symbols.push(Symbol {
            id: 1,
            sequence: Some(identity.clone()),
            conjugate: Some(identity),
            hermitian: true,
            real_basis: Some(0),
            imaginary_basis: None,
        });
        table.real_basis_count = 1;
        table.hash_index.insert(1, (1, false));

        table
    }

    /// Number of symbols in the table (including the two reserved entries).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if the table only holds the reserved entries.
    pub fn is_empty(&self) -> bool {
        self.symbols.len() <= 2
    }

    /// Number of assigned real basis indices.
    pub fn real_basis_count(&self) -> usize {
        self.real_basis_count
    }

    /// Number of assigned imaginary basis indices.
    pub fn imaginary_basis_count(&self) -> usize {
        self.imaginary_basis_count
    }

    /// Access one symbol by id.
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Iterator over all symbols, in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    /// Looks up a sequence hash.
    ///
    /// # Returns
    ///
    /// * `Some((id, conjugated))` - The symbol whose sequence (or whose conjugate, if the flag
    ///   is set) carries this hash.
    /// * `None` - No symbol with this hash exists.
    pub fn find(&self, hash: u64) -> Option<(SymbolId, bool)> {
        self.hash_index.get(&hash).copied()
    }

    /// Interns a canonical sequence, creating a symbol for it if it is unknown.
    ///
    /// The sign of the input is ignored: symbols store positive-signed representatives, and
    /// callers keep the sign in their coefficient. Both the sequence hash and the conjugate
    /// hash are registered, so later lookups resolve either orientation.
    ///
    /// # Returns
    ///
    /// * `(id, conjugated, was_new)` - The symbol id, whether the input matched the stored
    ///   conjugate rather than the stored sequence, and whether a new symbol was created.
    pub fn intern<C: Context>(
        &mut self,
        context: &C,
        sequence: &OperatorSequence,
    ) -> (SymbolId, bool, bool) {
        if sequence.is_zero() {
            return (0, false, false);
        }

        if let Some((id, conjugated)) = self.find(sequence.hash()) {
            return (id, conjugated, false);
        }

        let representative = sequence.with_sign(SequenceSign::Positive);
        let conjugate = context.conjugate(&representative);
        let hermitian = conjugate == representative;

        let id = self.symbols.len();
        self.hash_index.insert(representative.hash(), (id, false));
        if conjugate.hash() != representative.hash() {
            self.hash_index.insert(conjugate.hash(), (id, true));
        }

        let real_basis = Some(self.real_basis_count);
        self.real_basis_count += 1;
        let imaginary_basis = if hermitian {
            None
        } else {
            let basis = Some(self.imaginary_basis_count);
            self.imaginary_basis_count += 1;
            basis
        };

        self.symbols.push(Symbol {
            id,
            sequence: Some(representative),
            conjugate: Some(conjugate),
            hermitian,
            real_basis,
            imaginary_basis,
        });

        (id, false, true)
    }

    /// Creates a symbol with no operator-sequence realization.
    ///
    /// Such symbols arise when an extended matrix names a product of independent moments that
    /// cannot be expressed on the available source copies; they are reachable only through
    /// the factor table, never through the hash index.
    pub fn create_sequenceless(&mut self, hermitian: bool) -> SymbolId {
        let id = self.symbols.len();
        let real_basis = Some(self.real_basis_count);
        self.real_basis_count += 1;
        let imaginary_basis = if hermitian {
            None
        } else {
            let basis = Some(self.imaginary_basis_count);
            self.imaginary_basis_count += 1;
            basis
        };
        self.symbols.push(Symbol {
            id,
            sequence: None,
            conjugate: None,
            hermitian,
            real_basis,
            imaginary_basis,
        });
        id
    }

    /// Registers a pre-constructed sequence and returns its id, creating it if necessary.
    ///
    /// Used by the factor-table and extended-matrix code paths, which construct symbols for
    /// factor products outside the usual matrix-generation flow.
    pub fn merge_in<C: Context>(&mut self, context: &C, sequence: &OperatorSequence) -> SymbolId {
        self.intern(context, sequence).0
    }

    /// Export rows for the whole table, formatted through the owning context.
    ///
    /// Sequence-less symbols render as "?"; scenario layers substitute their factor strings.
    pub fn rows<C: Context>(&self, context: &C) -> Vec<SymbolRow> {
        self.symbols
            .iter()
            .map(|symbol| SymbolRow {
                id: symbol.id,
                sequence: symbol
                    .sequence
                    .as_ref()
                    .map_or_else(|| "?".to_string(), |seq| context.format_sequence(seq)),
                conjugate: symbol
                    .conjugate
                    .as_ref()
                    .map_or_else(|| "?".to_string(), |seq| context.format_sequence(seq)),
                hermitian: symbol.hermitian,
                real_basis: symbol.real_basis,
                imaginary_basis: symbol.imaginary_basis,
            })
            .collect()
    }
}

/// Implements the default function (Default trait) of SymbolTable.
impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Implements indexing of the symbol table by symbol id.
///
/// # Panics
///
/// * If the id does not exist in the table.
impl std::ops::Index<SymbolId> for SymbolTable {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id]
    }
}
