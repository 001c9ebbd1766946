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

use crate::operators::OperatorSequence;
use crate::scenarios::inflation::InflationContext;
use crate::symbols::SymbolTable;
use crate::utilities::IndexTree;
use crate::{Context, SymbolId};

/// Factorization record of one symbol.
#[derive(Debug, Clone)]
pub struct FactorEntry {
    /// Identity, aligned with the index in the symbol table.
    pub id: SymbolId,
    /// The factors as they appear in the symbol's sequence.
    pub raw_sequences: Vec<OperatorSequence>,
    /// The factors after source relabelling (their moment-canonical form).
    pub canonical_sequences: Vec<OperatorSequence>,
    /// Symbol ids of the canonical factors.
    pub canonical_symbols: Vec<SymbolId>,
    /// Number of times the symbol appears as a factor of another symbol.
    pub appearances: usize,
}

impl FactorEntry {
    /// True if the symbol does not factorize.
    pub fn fundamental(&self) -> bool {
        self.canonical_sequences.len() <= 1
    }

    /// Renders the canonical factors, each in angle braces.
    pub fn sequence_string(&self, context: &InflationContext) -> String {
        if self.canonical_sequences.len() == 1 {
            let only = &self.canonical_sequences[0];
            if only.is_zero() {
                return "0".to_string();
            }
            if only.is_empty() {
                return "1".to_string();
            }
        }
        self.canonical_sequences
            .iter()
            .map(|sequence| format!("<{}>", context.format_sequence(sequence)))
            .collect::<String>()
    }
}

/// Factorization mirror of the symbol table.
///
/// For every symbol the table records the source-disjoint factors of its sequence, the
/// canonical (relabelled) form of each factor, and the factors' own symbol ids, interning
/// factor symbols on sight. An [IndexTree] maps normalized factor-id lists back to the
/// composite symbol, which drives extended-matrix construction.
#[derive(Debug)]
pub struct FactorTable {
    entries: Vec<FactorEntry>,
    index_tree: IndexTree<SymbolId, SymbolId>,
}

impl FactorTable {
    /// Creates a factor table synchronized with the symbol table.
    pub fn new(context: &InflationContext, symbols: &mut SymbolTable) -> Self {
        let mut table = Self {
            entries: Vec::new(),
            index_tree: IndexTree::new(),
        };
        table.on_new_symbols_added(context, symbols);
        table
    }

    /// Number of entries (always equal to the symbol-table size after synchronization).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Access one entry by symbol id.
    pub fn get(&self, id: SymbolId) -> Option<&FactorEntry> {
        self.entries.get(id)
    }

    /// Iterator over all entries, in symbol order.
    pub fn iter(&self) -> std::slice::Iter<'_, FactorEntry> {
        self.entries.iter()
    }

    /// Attempts to find the composite symbol for a normalized factor list.
    pub fn find_by_factors(&self, factors: &[SymbolId]) -> Option<SymbolId> {
        self.index_tree.find(factors)
    }

    /// Merges two factor lists into normalized form: sorted, redundant identities removed.
    ///
    /// A zero factor absorbs the product; an empty merge yields the bare identity.
    pub fn combine_factor_lists(left: &[SymbolId], right: &[SymbolId]) -> Vec<SymbolId> {
        if left.contains(&0) || right.contains(&0) {
            return vec![0];
        }
        let mut combined: Vec<SymbolId> = left
            .iter()
            .chain(right.iter())
            .copied()
            .filter(|&id| id != 1)
            .collect();
        combined.sort_unstable();
        if combined.is_empty() {
            combined.push(1);
        }
        combined
    }

    /// Brings the factor table up to date after the symbol table has grown.
    ///
    /// # Returns
    ///
    /// * The number of entries added (including self-entries for newly interned factors).
    pub fn on_new_symbols_added(
        &mut self,
        context: &InflationContext,
        symbols: &mut SymbolTable,
    ) -> usize {
        let next_id = self.entries.len();
        let up_to_id = symbols.len();
        if next_id == up_to_id {
            return 0;
        }

        for id in next_id..up_to_id {
            let Some(sequence) = symbols[id].sequence().cloned() else {
                // Sequence-less symbols are registered through register_new; a bare one is
                // addressable only by its own id.
                self.push_entry(FactorEntry {
                    id,
                    raw_sequences: Vec::new(),
                    canonical_sequences: Vec::new(),
                    canonical_symbols: vec![id],
                    appearances: 0,
                });
                continue;
            };
            let raw_sequences = context.factorize(&sequence);

            let mut canonical_sequences = Vec::with_capacity(raw_sequences.len());
            let mut canonical_symbols = Vec::with_capacity(raw_sequences.len());
            for factor in &raw_sequences {
                let canonical = context.canonical_moment(factor);
                let factor_id = match symbols.find(canonical.hash()) {
                    Some((existing, _)) => existing,
                    None => symbols.merge_in(context, &canonical),
                };
                canonical_symbols.push(factor_id);
                canonical_sequences.push(canonical);
            }

            self.push_entry(FactorEntry {
                id,
                raw_sequences,
                canonical_sequences,
                canonical_symbols,
                appearances: 0,
            });
        }

        // Factors interned above are canonical single measurements: they factorize to
        // themselves.
        let extra_symbols = symbols.len();
        for id in up_to_id..extra_symbols {
            let sequence = symbols[id]
                .sequence()
                .cloned()
                .expect("Internal error: interned factors always carry sequences.");
            self.push_entry(FactorEntry {
                id,
                raw_sequences: vec![sequence.clone()],
                canonical_sequences: vec![sequence],
                canonical_symbols: vec![id],
                appearances: 0,
            });
        }

        // Appearance counts for the new composites, now that every factor has an entry.
        for id in next_id..extra_symbols {
            let factor_ids = self.entries[id].canonical_symbols.clone();
            if factor_ids.len() > 1 {
                for factor_id in factor_ids {
                    self.entries[factor_id].appearances += 1;
                }
            }
        }

        extra_symbols - next_id
    }

    /// Manually inserts the factor record of an externally created symbol.
    ///
    /// Used by the extended-matrix flush, which creates composite symbols directly from factor
    /// lists.
    pub fn register_new(
        &mut self,
        id: SymbolId,
        canonical_symbols: Vec<SymbolId>,
        canonical_sequences: Vec<OperatorSequence>,
    ) {
        debug_assert_eq!(id, self.entries.len());
        if canonical_symbols.len() > 1 {
            for &factor_id in &canonical_symbols {
                self.entries[factor_id].appearances += 1;
            }
        }
        self.push_entry(FactorEntry {
            id,
            raw_sequences: canonical_sequences.clone(),
            canonical_sequences,
            canonical_symbols,
            appearances: 0,
        });
    }

    fn push_entry(&mut self, entry: FactorEntry) {
        let key = Self::combine_factor_lists(&entry.canonical_symbols, &[]);
        self.index_tree.add_if_new(&key, entry.id);
        self.entries.push(entry);
    }
}
