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
use std::sync::Arc;

use parking_lot::RwLock;

use crate::dictionary::WordList;
use crate::matrices::{
    LocalizingMatrixIndex, PolynomialLocalizingMatrixIndex, SymbolicMatrix,
};
use crate::scenarios::inflation::{
    create_extended_matrix, suggest_extensions, CanonicalObservable, CanonicalObservables,
    ExtendedMatrixIndex, ExtendedMatrixIndexStorage, FactorTable, InflationContext, OVIndex,
};
use crate::symbols::{PolynomialFactory, SymbolRow, SymbolTable};
use crate::system::{
    ensure_localizing_matrix, ensure_moment_matrix, ensure_polynomial_localizing_matrix,
    MatrixIndices, MatrixSystemState, MultithreadPolicy,
};
use crate::{MomentaError, SymbolId};

#[derive(Debug)]
struct InflationSystemState {
    base: MatrixSystemState,
    factors: FactorTable,
    canonical_observables: CanonicalObservables,
    extended: MatrixIndices<ExtendedMatrixIndex, ExtendedMatrixIndexStorage>,
}

/// One row of the inflation symbol table in export form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflationSymbolRow {
    /// The scenario-independent fields.
    pub base: SymbolRow,
    /// Formatted canonical factor string.
    pub factor_sequence: String,
    /// Symbol ids of the canonical factors.
    pub factor_symbols: Vec<SymbolId>,
    /// True if the symbol does not factorize.
    pub fundamental: bool,
}

/// Concurrent matrix registry for an inflation scenario.
///
/// Beyond the standard moment and localizing matrices, the system maintains the factor table,
/// the canonical-observable table, the extension suggester and the registry of extended
/// matrices. The factor table is re-synchronized after every operation that can grow the
/// symbol table.
#[derive(Debug)]
pub struct InflationMatrixSystem {
    context: Arc<InflationContext>,
    word_list: WordList<InflationContext>,
    factory: PolynomialFactory,
    state: RwLock<InflationSystemState>,
}

impl InflationMatrixSystem {
    /// Wraps an inflation context into a matrix system.
    pub fn new(context: InflationContext, zero_tolerance: f64) -> Result<Self, MomentaError> {
        let context = Arc::new(context);
        let mut base = MatrixSystemState::new();
        let factors = FactorTable::new(context.as_ref(), &mut base.symbols);
        Ok(Self {
            word_list: WordList::new(Arc::clone(&context)),
            factory: PolynomialFactory::new(zero_tolerance)?,
            state: RwLock::new(InflationSystemState {
                base,
                factors,
                canonical_observables: CanonicalObservables::new(),
                extended: MatrixIndices::new(),
            }),
            context,
        })
    }

    /// The wrapped context.
    pub fn context(&self) -> &InflationContext {
        &self.context
    }

    /// The polynomial factory (and its zero tolerance).
    pub fn polynomial_factory(&self) -> &PolynomialFactory {
        &self.factory
    }

    /// The dictionary of the system.
    pub fn word_list(&self) -> &WordList<InflationContext> {
        &self.word_list
    }

    /// Runs a closure against the symbol table under the shared lock.
    pub fn with_symbols<R>(&self, f: impl FnOnce(&SymbolTable) -> R) -> R {
        f(&self.state.read().base.symbols)
    }

    /// Runs a closure against the factor table under the shared lock.
    pub fn with_factors<R>(&self, f: impl FnOnce(&FactorTable) -> R) -> R {
        f(&self.state.read().factors)
    }

    /// Number of registered matrices.
    pub fn matrix_count(&self) -> usize {
        self.state.read().base.matrices.len()
    }

    /// The matrix registered at an offset, if any.
    pub fn matrix(&self, offset: usize) -> Option<Arc<SymbolicMatrix>> {
        let state = self.state.read();
        state.base.matrices.get(offset).cloned()
    }

    /// Export rows of the symbol table, including factorization data.
    pub fn symbol_rows(&self) -> Vec<InflationSymbolRow> {
        let state = self.state.read();
        let base_rows = state.base.symbols.rows(self.context.as_ref());
        base_rows
            .into_iter()
            .map(|base| {
                let entry = state
                    .factors
                    .get(base.id)
                    .expect("Internal error: factor table out of sync with symbol table.");
                InflationSymbolRow {
                    factor_sequence: entry.sequence_string(self.context.as_ref()),
                    factor_symbols: entry.canonical_symbols.clone(),
                    fundamental: entry.fundamental(),
                    base,
                }
            })
            .collect()
    }

    /// Returns the moment matrix for a level, creating it on first request.
    pub fn moment_matrix(
        &self,
        level: usize,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        {
            let state = self.state.read();
            if let Some(offset) = state
                .base
                .moment
                .find(&crate::matrices::MomentMatrixIndex { level })
            {
                return Ok(state.base.matrix(offset));
            }
        }
        let mut guard = self.state.write();
        let state = &mut *guard;
        let offset = ensure_moment_matrix(
            self.context.as_ref(),
            &self.word_list,
            &mut state.base,
            level,
            policy,
        )?;
        state
            .factors
            .on_new_symbols_added(self.context.as_ref(), &mut state.base.symbols);
        Ok(state.base.matrix(offset))
    }

    /// Returns an already registered moment matrix.
    pub fn get_moment_matrix(&self, level: usize) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let state = self.state.read();
        match state
            .base
            .moment
            .find(&crate::matrices::MomentMatrixIndex { level })
        {
            Some(offset) => Ok(state.base.matrix(offset)),
            None => Err(MomentaError::NotFound {
                msg: format!("Could not find moment matrix of level {}.", level),
            }),
        }
    }

    /// Returns the localizing matrix for an index, creating it on first request.
    pub fn localizing_matrix(
        &self,
        index: &LocalizingMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        {
            let state = self.state.read();
            if let Some(offset) = state.base.localizing.find(index) {
                return Ok(state.base.matrix(offset));
            }
        }
        let mut guard = self.state.write();
        let state = &mut *guard;
        let offset = ensure_localizing_matrix(
            self.context.as_ref(),
            &self.word_list,
            &mut state.base,
            index,
            policy,
        )?;
        state
            .factors
            .on_new_symbols_added(self.context.as_ref(), &mut state.base.symbols);
        Ok(state.base.matrix(offset))
    }

    /// Returns the polynomial localizing matrix for an index, creating its monomial
    /// constituents first.
    pub fn polynomial_localizing_matrix(
        &self,
        index: &PolynomialLocalizingMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        {
            let state = self.state.read();
            if let Some(offset) = state.base.polynomial_localizing.find(index) {
                return Ok(state.base.matrix(offset));
            }
        }
        let mut guard = self.state.write();
        let state = &mut *guard;
        let offset = ensure_polynomial_localizing_matrix(
            self.context.as_ref(),
            &self.word_list,
            &self.factory,
            &mut state.base,
            index,
            policy,
        )?;
        state
            .factors
            .on_new_symbols_added(self.context.as_ref(), &mut state.base.symbols);
        Ok(state.base.matrix(offset))
    }

    /// Returns the extended matrix for an index, creating it (and its source moment matrix)
    /// on first request.
    pub fn extended_matrix(
        &self,
        index: &ExtendedMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        {
            let state = self.state.read();
            if let Some(offset) = state.extended.find(index) {
                return Ok(state.base.matrix(offset));
            }
        }

        let mut guard = self.state.write();
        let state = &mut *guard;
        if let Some(offset) = state.extended.find(index) {
            return Ok(state.base.matrix(offset));
        }

        // The source moment matrix is a prerequisite; create it under the same lock.
        let source_offset = ensure_moment_matrix(
            self.context.as_ref(),
            &self.word_list,
            &mut state.base,
            index.moment_matrix_level,
            policy,
        )?;
        state
            .factors
            .on_new_symbols_added(self.context.as_ref(), &mut state.base.symbols);

        let source = state.base.matrix(source_offset);
        let source_labels = self.word_list.level(index.moment_matrix_level);

        let matrix = create_extended_matrix(
            self.context.as_ref(),
            &mut state.base.symbols,
            &mut state.factors,
            source.as_monomial()?,
            &source_labels,
            index,
            policy,
        )?;
        let offset = state.base.push_matrix(SymbolicMatrix::Monomial(matrix));
        state.extended.insert(index.clone(), offset);
        Ok(state.base.matrix(offset))
    }

    /// Returns an already registered extended matrix.
    pub fn get_extended_matrix(
        &self,
        index: &ExtendedMatrixIndex,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let state = self.state.read();
        if let Some(offset) = state.extended.find(index) {
            return Ok(state.base.matrix(offset));
        }

        let has_moment_matrix = state
            .base
            .moment
            .contains(&crate::matrices::MomentMatrixIndex {
                level: index.moment_matrix_level,
            });
        let msg = if !has_moment_matrix {
            format!(
                "An extended matrix for moment matrix level {} was not found, because moment \
                 matrix level {} has not yet been generated.",
                index.moment_matrix_level, index.moment_matrix_level
            )
        } else if index.extension_list.is_empty() {
            format!(
                "Could not find extended matrix for moment matrix level {} with no extensions.",
                index.moment_matrix_level
            )
        } else {
            let listed: Vec<String> = index
                .extension_list
                .iter()
                .take(10)
                .map(|id| format!("#{}", id))
                .collect();
            let remainder = index.extension_list.len().saturating_sub(10);
            if remainder > 0 {
                format!(
                    "Could not find extended matrix for moment matrix level {} extended by \
                     symbols {}, and {} other symbols.",
                    index.moment_matrix_level,
                    listed.join(", "),
                    remainder
                )
            } else {
                format!(
                    "Could not find extended matrix for moment matrix level {} extended by \
                     symbols {}.",
                    index.moment_matrix_level,
                    listed.join(", ")
                )
            }
        };
        Err(MomentaError::NotFound { msg })
    }

    /// Scans a registered moment matrix for non-fundamental symbols and suggests scalar
    /// extensions that close them.
    pub fn suggest_extensions(&self, level: usize) -> Result<BTreeSet<SymbolId>, MomentaError> {
        let matrix = self.get_moment_matrix(level)?;
        let generators = self.word_list.level(level);
        let state = self.state.read();
        Ok(suggest_extensions(
            self.context.as_ref(),
            &state.base.symbols,
            &state.factors,
            matrix.as_monomial()?,
            &generators,
        ))
    }

    /// Generates the canonical-observable table up to the given string length.
    pub fn generate_canonical_observables(&self, level: usize) {
        let mut state = self.state.write();
        state
            .canonical_observables
            .generate_up_to_level(self.context.as_ref(), level);
    }

    /// Looks up the canonical class of an observable-variant string.
    ///
    /// # Returns
    ///
    /// * `Ok(CanonicalObservable)` - A copy of the class record.
    /// * `Err(MomentaError::MissingComponent)` - The table has not been generated this far.
    pub fn canonical_observable(
        &self,
        indices: &[OVIndex],
    ) -> Result<CanonicalObservable, MomentaError> {
        let state = self.state.read();
        state
            .canonical_observables
            .canonical(self.context.as_ref(), indices)
            .map(|observable| observable.clone())
    }
}
