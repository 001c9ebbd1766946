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

//! Module for the concurrent matrix registry wrapped around a context.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::dictionary::WordList;
use crate::matrices::{
    compose_polynomial_matrix, create_localizing_matrix, create_moment_matrix,
    LocalizingMatrixIndex, MomentMatrixIndex, PolynomialLocalizingMatrixIndex, SymbolicMatrix,
};
use crate::symbols::{PolynomialFactory, SymbolRow, SymbolTable};
use crate::{Context, MomentaError};

mod indices;
pub use indices::*;

/// Multi-threading policy for matrix construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultithreadPolicy {
    /// Always build serially.
    Never,
    /// Build in parallel when the matrix is large enough to amortize the fork.
    #[default]
    Optional,
    /// Always build in parallel.
    Always,
}

/// Matrices below this dimension are built serially under the `Optional` policy.
const PARALLEL_DIMENSION_THRESHOLD: usize = 64;

impl MultithreadPolicy {
    /// True if a matrix of the given dimension should be built on the thread pool.
    pub fn should_parallelize(self, dimension: usize) -> bool {
        match self {
            MultithreadPolicy::Never => false,
            MultithreadPolicy::Optional => dimension >= PARALLEL_DIMENSION_THRESHOLD,
            MultithreadPolicy::Always => true,
        }
    }
}

/// Lock-guarded interior of a matrix system: the symbol table, the append-only matrix vector
/// and the standard index registries.
#[derive(Debug, Default)]
pub struct MatrixSystemState {
    pub(crate) symbols: SymbolTable,
    pub(crate) matrices: Vec<Arc<SymbolicMatrix>>,
    pub(crate) moment: MatrixIndices<MomentMatrixIndex>,
    pub(crate) localizing: MatrixIndices<LocalizingMatrixIndex>,
    pub(crate) polynomial_localizing: MatrixIndices<PolynomialLocalizingMatrixIndex>,
}

impl MatrixSystemState {
    /// Creates a state holding only the reserved symbols.
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            matrices: Vec::new(),
            moment: MatrixIndices::new(),
            localizing: MatrixIndices::new(),
            polynomial_localizing: MatrixIndices::new(),
        }
    }

    /// Appends a matrix, returning its offset.
    pub(crate) fn push_matrix(&mut self, matrix: SymbolicMatrix) -> usize {
        self.matrices.push(Arc::new(matrix));
        self.matrices.len() - 1
    }

    /// The matrix at an offset.
    pub(crate) fn matrix(&self, offset: usize) -> Arc<SymbolicMatrix> {
        Arc::clone(&self.matrices[offset])
    }

    /// The symbol table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }
}

/// Ensures a moment matrix exists in the state, creating it on a miss.
///
/// Runs under the owning system's exclusive lock; returns the matrix offset.
pub(crate) fn ensure_moment_matrix<C: Context>(
    context: &C,
    word_list: &WordList<C>,
    state: &mut MatrixSystemState,
    level: usize,
    policy: MultithreadPolicy,
) -> Result<usize, MomentaError> {
    let index = MomentMatrixIndex { level };
    if let Some(offset) = state.moment.find(&index) {
        return Ok(offset);
    }
    check_word_length(context, 2 * level)?;

    let labels = word_list.level(level);
    let matrix = create_moment_matrix(context, &mut state.symbols, &labels, level, policy);
    let offset = state.push_matrix(SymbolicMatrix::Monomial(matrix));
    state.moment.insert(index, offset);
    Ok(offset)
}

/// Ensures a monomial localizing matrix exists in the state, creating it on a miss.
pub(crate) fn ensure_localizing_matrix<C: Context>(
    context: &C,
    word_list: &WordList<C>,
    state: &mut MatrixSystemState,
    index: &LocalizingMatrixIndex,
    policy: MultithreadPolicy,
) -> Result<usize, MomentaError> {
    if let Some(offset) = state.localizing.find(index) {
        return Ok(offset);
    }
    check_word_length(context, 2 * index.level + index.word.len())?;

    let labels = word_list.level(index.level);
    let matrix = create_localizing_matrix(context, &mut state.symbols, &labels, index, policy);
    let offset = state.push_matrix(SymbolicMatrix::Monomial(matrix));
    state.localizing.insert(index.clone(), offset);
    Ok(offset)
}

/// Ensures a polynomial localizing matrix exists, recursively creating its monomial
/// constituents first so that dependents are always registered before the composite.
pub(crate) fn ensure_polynomial_localizing_matrix<C: Context>(
    context: &C,
    word_list: &WordList<C>,
    factory: &PolynomialFactory,
    state: &mut MatrixSystemState,
    index: &PolynomialLocalizingMatrixIndex,
    policy: MultithreadPolicy,
) -> Result<usize, MomentaError> {
    if let Some(offset) = state.polynomial_localizing.find(index) {
        return Ok(offset);
    }

    let mut parts = Vec::with_capacity(index.polynomial.len());
    for term in index.polynomial.iter() {
        let symbol = state
            .symbols
            .get(term.symbol)
            .ok_or(MomentaError::UnknownSymbol {
                symbol: term.symbol,
            })?;
        let word = if term.conjugated {
            symbol.conjugate_sequence()
        } else {
            symbol.sequence()
        }
        .ok_or(MomentaError::NoSequenceRealization {
            symbol: term.symbol,
        })?
        .clone();
        let constituent = LocalizingMatrixIndex {
            level: index.level,
            word,
        };
        let offset = ensure_localizing_matrix(context, word_list, state, &constituent, policy)?;
        let matrix = state.matrix(offset);
        parts.push((term.factor, matrix.as_monomial()?.clone()));
    }

    let description = format!(
        "Polynomial localizing matrix, level {}, polynomial {}",
        index.level, index.polynomial
    );
    let matrix =
        compose_polynomial_matrix(factory, &state.symbols, &parts, description)?;
    let offset = state.push_matrix(SymbolicMatrix::Polynomial(matrix));
    state.polynomial_localizing.insert(index.clone(), offset);
    Ok(offset)
}

/// Validates a worst-case word length against the context's hasher.
pub(crate) fn check_word_length<C: Context>(
    context: &C,
    length: usize,
) -> Result<(), MomentaError> {
    if length > context.hasher().longest_hashable() {
        return Err(MomentaError::SequenceTooLong {
            length,
            longest_hashable: context.hasher().longest_hashable(),
        });
    }
    Ok(())
}

/// Concurrent registry of matrices for a generic scenario.
///
/// The system exclusively owns its context, symbol table and every registered matrix. One
/// reader-writer lock guards the whole state: lookups share it, creation takes it exclusively
/// for the duration of the (possibly composite, recursively constructed) operation.
#[derive(Debug)]
pub struct MatrixSystem<C: Context> {
    context: Arc<C>,
    word_list: WordList<C>,
    factory: PolynomialFactory,
    state: RwLock<MatrixSystemState>,
}

impl<C: Context> MatrixSystem<C> {
    /// Wraps a context into a matrix system.
    ///
    /// # Arguments
    ///
    /// * `context` - The scenario.
    /// * `zero_tolerance` - Numeric zero tolerance for polynomial simplification.
    pub fn new(context: C, zero_tolerance: f64) -> Result<Self, MomentaError> {
        let context = Arc::new(context);
        Ok(Self {
            word_list: WordList::new(Arc::clone(&context)),
            factory: PolynomialFactory::new(zero_tolerance)?,
            context,
            state: RwLock::new(MatrixSystemState::new()),
        })
    }

    /// The wrapped context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// The polynomial factory (and its zero tolerance).
    pub fn polynomial_factory(&self) -> &PolynomialFactory {
        &self.factory
    }

    /// The dictionary of the system.
    pub fn word_list(&self) -> &WordList<C> {
        &self.word_list
    }

    /// Runs a closure against the symbol table under the shared lock.
    pub fn with_symbols<R>(&self, f: impl FnOnce(&SymbolTable) -> R) -> R {
        f(&self.state.read().symbols)
    }

    /// Export rows of the symbol table.
    pub fn symbol_rows(&self) -> Vec<SymbolRow> {
        self.state.read().symbols.rows(self.context.as_ref())
    }

    /// Returns the moment matrix for a level, creating it on first request.
    pub fn moment_matrix(
        &self,
        level: usize,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        {
            let state = self.state.read();
            if let Some(offset) = state.moment.find(&MomentMatrixIndex { level }) {
                return Ok(state.matrix(offset));
            }
        }
        let mut state = self.state.write();
        let offset =
            ensure_moment_matrix(self.context.as_ref(), &self.word_list, &mut state, level, policy)?;
        Ok(state.matrix(offset))
    }

    /// Returns an already registered moment matrix.
    ///
    /// # Returns
    ///
    /// * `Ok(matrix)` - The registered matrix.
    /// * `Err(MomentaError::NotFound)` - No matrix is registered for the level.
    pub fn get_moment_matrix(&self, level: usize) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let state = self.state.read();
        match state.moment.find(&MomentMatrixIndex { level }) {
            Some(offset) => Ok(state.matrix(offset)),
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
            if let Some(offset) = state.localizing.find(index) {
                return Ok(state.matrix(offset));
            }
        }
        let mut state = self.state.write();
        let offset = ensure_localizing_matrix(
            self.context.as_ref(),
            &self.word_list,
            &mut state,
            index,
            policy,
        )?;
        Ok(state.matrix(offset))
    }

    /// Returns an already registered localizing matrix.
    pub fn get_localizing_matrix(
        &self,
        index: &LocalizingMatrixIndex,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let state = self.state.read();
        match state.localizing.find(index) {
            Some(offset) => Ok(state.matrix(offset)),
            None => Err(MomentaError::NotFound {
                msg: format!(
                    "Could not find localizing matrix of level {} for word \"{}\".",
                    index.level,
                    self.context.format_sequence(&index.word)
                ),
            }),
        }
    }

    /// Returns the polynomial localizing matrix for an index, creating it (and its monomial
    /// constituents) on first request.
    pub fn polynomial_localizing_matrix(
        &self,
        index: &PolynomialLocalizingMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        {
            let state = self.state.read();
            if let Some(offset) = state.polynomial_localizing.find(index) {
                return Ok(state.matrix(offset));
            }
        }
        let mut state = self.state.write();
        let offset = ensure_polynomial_localizing_matrix(
            self.context.as_ref(),
            &self.word_list,
            &self.factory,
            &mut state,
            index,
            policy,
        )?;
        Ok(state.matrix(offset))
    }

    /// Returns an already registered polynomial localizing matrix.
    pub fn get_polynomial_localizing_matrix(
        &self,
        index: &PolynomialLocalizingMatrixIndex,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let state = self.state.read();
        match state.polynomial_localizing.find(index) {
            Some(offset) => Ok(state.matrix(offset)),
            None => Err(MomentaError::NotFound {
                msg: format!(
                    "Could not find polynomial localizing matrix of level {} for polynomial {}.",
                    index.level, index.polynomial
                ),
            }),
        }
    }

    /// Number of registered matrices.
    pub fn matrix_count(&self) -> usize {
        self.state.read().matrices.len()
    }

    /// The matrix registered at an offset, if any.
    pub fn matrix(&self, offset: usize) -> Option<Arc<SymbolicMatrix>> {
        let state = self.state.read();
        state.matrices.get(offset).cloned()
    }
}
