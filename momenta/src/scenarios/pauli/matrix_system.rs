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

use std::sync::Arc;

use num_complex::Complex64;
use parking_lot::RwLock;

use crate::matrices::{
    build_monomial_matrix, compose_polynomial_matrix, LocalizingMatrixIndex, MomentMatrixIndex,
    SymbolicMatrix,
};
use crate::operators::OperatorSequence;
use crate::scenarios::pauli::{
    CommutatorMatrixIndex, NearestNeighbourIndex, PauliContext, PauliDictionary,
    PauliLocalizingMatrixIndex, PauliPolynomialLocalizingMatrixIndex,
    PolynomialCommutatorMatrixIndex,
};
use crate::symbols::{PolynomialFactory, RawPolynomial, SymbolRow, SymbolTable};
use crate::system::{check_word_length, MatrixIndices, MatrixSystemState, MultithreadPolicy};
use crate::{Context, MomentaError};

#[derive(Debug, Default)]
struct PauliSystemState {
    base: MatrixSystemState,
    moment: MatrixIndices<NearestNeighbourIndex>,
    localizing: MatrixIndices<PauliLocalizingMatrixIndex>,
    polynomial_localizing: MatrixIndices<PauliPolynomialLocalizingMatrixIndex>,
    commutator: MatrixIndices<CommutatorMatrixIndex>,
    anticommutator: MatrixIndices<CommutatorMatrixIndex>,
    polynomial_commutator: MatrixIndices<PolynomialCommutatorMatrixIndex>,
    polynomial_anticommutator: MatrixIndices<PolynomialCommutatorMatrixIndex>,
}

/// Which of the two derived matrix families a creation call addresses.
#[derive(Clone, Copy, PartialEq, Eq)]
enum CommutatorKind {
    Commutator,
    Anticommutator,
}

impl CommutatorKind {
    fn name(self) -> &'static str {
        match self {
            CommutatorKind::Commutator => "Commutator",
            CommutatorKind::Anticommutator => "Anti-commutator",
        }
    }
}

fn neighbour_suffix(index: &NearestNeighbourIndex) -> String {
    if index.neighbours == 0 {
        String::new()
    } else if index.neighbours == 1 {
        ", 1 nearest neighbour".to_string()
    } else {
        format!(", {} nearest neighbours", index.neighbours)
    }
}

/// Concurrent matrix registry for a Pauli scenario.
///
/// Beyond moment and localizing matrices (optionally restricted to nearest neighbours), the
/// system produces commutator and anti-commutator matrices of a word or polynomial against the
/// moment-matrix body. Matrices with no neighbour restriction are cross-registered under the
/// plain moment/localizing indices.
#[derive(Debug)]
pub struct PauliMatrixSystem {
    context: Arc<PauliContext>,
    dictionary: PauliDictionary,
    factory: PolynomialFactory,
    state: RwLock<PauliSystemState>,
}

impl PauliMatrixSystem {
    /// Wraps a Pauli context into a matrix system.
    pub fn new(context: PauliContext, zero_tolerance: f64) -> Result<Self, MomentaError> {
        let context = Arc::new(context);
        Ok(Self {
            dictionary: PauliDictionary::new(Arc::clone(&context)),
            factory: PolynomialFactory::new(zero_tolerance)?,
            context,
            state: RwLock::new(PauliSystemState::default()),
        })
    }

    /// The wrapped context.
    pub fn context(&self) -> &PauliContext {
        &self.context
    }

    /// The dictionary of the system.
    pub fn dictionary(&self) -> &PauliDictionary {
        &self.dictionary
    }

    /// The polynomial factory (and its zero tolerance).
    pub fn polynomial_factory(&self) -> &PolynomialFactory {
        &self.factory
    }

    /// Runs a closure against the symbol table under the shared lock.
    pub fn with_symbols<R>(&self, f: impl FnOnce(&SymbolTable) -> R) -> R {
        f(&self.state.read().base.symbols)
    }

    /// Export rows of the symbol table.
    pub fn symbol_rows(&self) -> Vec<SymbolRow> {
        self.state.read().base.symbols.rows(self.context.as_ref())
    }

    /// Number of registered matrices.
    pub fn matrix_count(&self) -> usize {
        self.state.read().base.matrices.len()
    }

    /// Normalizes an index so that equivalent requests share one registry key.
    fn normalize(&self, mut index: NearestNeighbourIndex) -> NearestNeighbourIndex {
        if index.neighbours == 0 {
            index.wrapped = false;
        } else {
            index.wrapped = self.context.wrap();
        }
        index
    }

    /// Returns the moment matrix for a level, creating it on first request.
    pub fn moment_matrix(
        &self,
        level: usize,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.nearest_neighbour_moment_matrix(NearestNeighbourIndex::unrestricted(level), policy)
    }

    /// Returns the (possibly nearest-neighbour restricted) moment matrix, creating it on
    /// first request.
    pub fn nearest_neighbour_moment_matrix(
        &self,
        index: NearestNeighbourIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let index = self.normalize(index);
        {
            let state = self.state.read();
            if let Some(offset) = state.moment.find(&index) {
                return Ok(state.base.matrix(offset));
            }
        }
        let mut state = self.state.write();
        let offset = self.create_moment(&mut state, &index, policy)?;
        Ok(state.base.matrix(offset))
    }

    /// Returns an already registered moment matrix.
    pub fn get_moment_matrix(
        &self,
        index: NearestNeighbourIndex,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let index = self.normalize(index);
        let state = self.state.read();
        match state.moment.find(&index) {
            Some(offset) => Ok(state.base.matrix(offset)),
            None => Err(MomentaError::NotFound {
                msg: format!(
                    "Could not find moment matrix of level {}{}.",
                    index.moment_matrix_level,
                    neighbour_suffix(&index)
                ),
            }),
        }
    }

    fn create_moment(
        &self,
        state: &mut PauliSystemState,
        index: &NearestNeighbourIndex,
        policy: MultithreadPolicy,
    ) -> Result<usize, MomentaError> {
        if let Some(offset) = state.moment.find(index) {
            return Ok(offset);
        }
        check_word_length(self.context.as_ref(), 2 * index.moment_matrix_level)?;

        let labels = self.dictionary.nearest_neighbour(index)?;
        let context = self.context.as_ref();
        let description = format!(
            "Moment matrix, level {}{}",
            index.moment_matrix_level,
            neighbour_suffix(index)
        );
        let matrix = build_monomial_matrix(
            context,
            &mut state.base.symbols,
            &labels,
            |lhs, rhs| context.multiply(lhs, rhs),
            Complex64::new(1.0, 0.0),
            description,
            policy,
        );
        let offset = state.base.push_matrix(SymbolicMatrix::Monomial(matrix));
        state.moment.insert(*index, offset);
        if index.neighbours == 0 {
            state.base.moment.insert_alias(
                MomentMatrixIndex {
                    level: index.moment_matrix_level,
                },
                offset,
            );
        }
        Ok(offset)
    }

    /// Returns the localizing matrix for an index, creating it on first request.
    pub fn localizing_matrix(
        &self,
        index: PauliLocalizingMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let index = PauliLocalizingMatrixIndex {
            index: self.normalize(index.index),
            word: index.word,
        };
        {
            let state = self.state.read();
            if let Some(offset) = state.localizing.find(&index) {
                return Ok(state.base.matrix(offset));
            }
        }
        let mut state = self.state.write();
        let offset = self.create_localizing(&mut state, &index, policy)?;
        Ok(state.base.matrix(offset))
    }

    /// Returns an already registered localizing matrix.
    pub fn get_localizing_matrix(
        &self,
        index: &PauliLocalizingMatrixIndex,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let normalized = PauliLocalizingMatrixIndex {
            index: self.normalize(index.index),
            word: index.word.clone(),
        };
        let state = self.state.read();
        match state.localizing.find(&normalized) {
            Some(offset) => Ok(state.base.matrix(offset)),
            None => Err(MomentaError::NotFound {
                msg: format!(
                    "Could not find localizing matrix of level {}{} for word \"{}\".",
                    normalized.index.moment_matrix_level,
                    neighbour_suffix(&normalized.index),
                    self.context.format_sequence(&normalized.word)
                ),
            }),
        }
    }

    fn create_localizing(
        &self,
        state: &mut PauliSystemState,
        index: &PauliLocalizingMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<usize, MomentaError> {
        if let Some(offset) = state.localizing.find(index) {
            return Ok(offset);
        }
        check_word_length(
            self.context.as_ref(),
            2 * index.index.moment_matrix_level + index.word.len(),
        )?;

        let labels = self.dictionary.nearest_neighbour(&index.index)?;
        let context = self.context.as_ref();
        let word = index.word.clone();
        let description = format!(
            "Localizing matrix, level {}{}, word \"{}\"",
            index.index.moment_matrix_level,
            neighbour_suffix(&index.index),
            context.format_sequence(&word)
        );
        let matrix = build_monomial_matrix(
            context,
            &mut state.base.symbols,
            &labels,
            move |lhs, rhs| context.multiply(&context.multiply(lhs, &word), rhs),
            Complex64::new(1.0, 0.0),
            description,
            policy,
        );
        let offset = state.base.push_matrix(SymbolicMatrix::Monomial(matrix));
        state.localizing.insert(index.clone(), offset);
        if index.index.neighbours == 0 {
            state.base.localizing.insert_alias(
                LocalizingMatrixIndex {
                    level: index.index.moment_matrix_level,
                    word: index.word.clone(),
                },
                offset,
            );
        }
        Ok(offset)
    }

    /// Returns the commutator matrix `[M, w]` for an index, creating it on first request.
    pub fn commutator_matrix(
        &self,
        index: CommutatorMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.commutator_family_matrix(index, CommutatorKind::Commutator, policy)
    }

    /// Returns the anti-commutator matrix `{M, w}` for an index, creating it on first request.
    pub fn anticommutator_matrix(
        &self,
        index: CommutatorMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.commutator_family_matrix(index, CommutatorKind::Anticommutator, policy)
    }

    fn commutator_family_matrix(
        &self,
        index: CommutatorMatrixIndex,
        kind: CommutatorKind,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let index = CommutatorMatrixIndex {
            index: self.normalize(index.index),
            word: index.word,
        };
        {
            let state = self.state.read();
            let registry = match kind {
                CommutatorKind::Commutator => &state.commutator,
                CommutatorKind::Anticommutator => &state.anticommutator,
            };
            if let Some(offset) = registry.find(&index) {
                return Ok(state.base.matrix(offset));
            }
        }
        let mut state = self.state.write();
        let offset = self.create_commutator(&mut state, &index, kind, policy)?;
        Ok(state.base.matrix(offset))
    }

    /// Returns an already registered commutator matrix.
    pub fn get_commutator_matrix(
        &self,
        index: &CommutatorMatrixIndex,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.get_commutator_family(index, CommutatorKind::Commutator)
    }

    /// Returns an already registered anti-commutator matrix.
    pub fn get_anticommutator_matrix(
        &self,
        index: &CommutatorMatrixIndex,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.get_commutator_family(index, CommutatorKind::Anticommutator)
    }

    fn get_commutator_family(
        &self,
        index: &CommutatorMatrixIndex,
        kind: CommutatorKind,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let normalized = CommutatorMatrixIndex {
            index: self.normalize(index.index),
            word: index.word.clone(),
        };
        let state = self.state.read();
        let registry = match kind {
            CommutatorKind::Commutator => &state.commutator,
            CommutatorKind::Anticommutator => &state.anticommutator,
        };
        match registry.find(&normalized) {
            Some(offset) => Ok(state.base.matrix(offset)),
            None => Err(MomentaError::NotFound {
                msg: format!(
                    "Could not find {} matrix of level {}{} for word \"{}\".",
                    kind.name().to_lowercase(),
                    normalized.index.moment_matrix_level,
                    neighbour_suffix(&normalized.index),
                    self.context.format_sequence(&normalized.word)
                ),
            }),
        }
    }

    fn create_commutator(
        &self,
        state: &mut PauliSystemState,
        index: &CommutatorMatrixIndex,
        kind: CommutatorKind,
        policy: MultithreadPolicy,
    ) -> Result<usize, MomentaError> {
        let registry = match kind {
            CommutatorKind::Commutator => &state.commutator,
            CommutatorKind::Anticommutator => &state.anticommutator,
        };
        if let Some(offset) = registry.find(index) {
            return Ok(offset);
        }
        check_word_length(
            self.context.as_ref(),
            2 * index.index.moment_matrix_level + index.word.len(),
        )?;

        let labels = self.dictionary.nearest_neighbour(&index.index)?;
        let context = self.context.as_ref();
        let word = index.word.clone();
        let description = format!(
            "{} matrix, level {}{}, word \"{}\"",
            kind.name(),
            index.index.moment_matrix_level,
            neighbour_suffix(&index.index),
            context.format_sequence(&word)
        );
        let entry = move |lhs: &OperatorSequence, rhs: &OperatorSequence| {
            let body = context.multiply(lhs, rhs);
            match kind {
                CommutatorKind::Commutator => context.commutator(&body, &word),
                CommutatorKind::Anticommutator => context.anticommutator(&body, &word),
            }
        };
        let matrix = build_monomial_matrix(
            context,
            &mut state.base.symbols,
            &labels,
            entry,
            Complex64::new(2.0, 0.0),
            description,
            policy,
        );
        let offset = state.base.push_matrix(SymbolicMatrix::Monomial(matrix));
        match kind {
            CommutatorKind::Commutator => state.commutator.insert(index.clone(), offset),
            CommutatorKind::Anticommutator => state.anticommutator.insert(index.clone(), offset),
        };
        Ok(offset)
    }

    /// Returns the polynomial localizing matrix for an index, creating its monomial
    /// constituents first.
    pub fn polynomial_localizing_matrix(
        &self,
        index: PauliPolynomialLocalizingMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let index = PauliPolynomialLocalizingMatrixIndex {
            index: self.normalize(index.index),
            polynomial: index.polynomial,
        };
        {
            let state = self.state.read();
            if let Some(offset) = state.polynomial_localizing.find(&index) {
                return Ok(state.base.matrix(offset));
            }
        }
        let mut state = self.state.write();
        if let Some(offset) = state.polynomial_localizing.find(&index) {
            return Ok(state.base.matrix(offset));
        }

        let description = format!(
            "Polynomial localizing matrix, level {}{}, polynomial {}",
            index.index.moment_matrix_level,
            neighbour_suffix(&index.index),
            index.polynomial
        );
        let words = self.words_of_polynomial(&state.base, &index.polynomial)?;
        let mut parts = Vec::with_capacity(words.len());
        for (weight, word) in words {
            let constituent = PauliLocalizingMatrixIndex {
                index: index.index,
                word,
            };
            let offset = self.create_localizing(&mut state, &constituent, policy)?;
            parts.push((weight, state.base.matrix(offset).as_monomial()?.clone()));
        }
        let matrix =
            compose_polynomial_matrix(&self.factory, &state.base.symbols, &parts, description)?;
        let offset = state.base.push_matrix(SymbolicMatrix::Polynomial(matrix));
        state.polynomial_localizing.insert(index, offset);
        Ok(state.base.matrix(offset))
    }

    /// Returns the polynomial commutator matrix for an index, creating its monomial
    /// constituents first.
    pub fn polynomial_commutator_matrix(
        &self,
        index: PolynomialCommutatorMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.polynomial_commutator_family(index, CommutatorKind::Commutator, policy)
    }

    /// Returns the polynomial anti-commutator matrix for an index, creating its monomial
    /// constituents first.
    pub fn polynomial_anticommutator_matrix(
        &self,
        index: PolynomialCommutatorMatrixIndex,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.polynomial_commutator_family(index, CommutatorKind::Anticommutator, policy)
    }

    fn polynomial_commutator_family(
        &self,
        index: PolynomialCommutatorMatrixIndex,
        kind: CommutatorKind,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let index = PolynomialCommutatorMatrixIndex {
            index: self.normalize(index.index),
            polynomial: index.polynomial,
        };
        {
            let state = self.state.read();
            let registry = match kind {
                CommutatorKind::Commutator => &state.polynomial_commutator,
                CommutatorKind::Anticommutator => &state.polynomial_anticommutator,
            };
            if let Some(offset) = registry.find(&index) {
                return Ok(state.base.matrix(offset));
            }
        }
        let mut state = self.state.write();
        {
            let registry = match kind {
                CommutatorKind::Commutator => &state.polynomial_commutator,
                CommutatorKind::Anticommutator => &state.polynomial_anticommutator,
            };
            if let Some(offset) = registry.find(&index) {
                return Ok(state.base.matrix(offset));
            }
        }

        let description = format!(
            "Polynomial {} matrix, level {}{}, polynomial {}",
            kind.name().to_lowercase(),
            index.index.moment_matrix_level,
            neighbour_suffix(&index.index),
            index.polynomial
        );
        let words = self.words_of_polynomial(&state.base, &index.polynomial)?;
        let mut parts = Vec::with_capacity(words.len());
        for (weight, word) in words {
            let constituent = CommutatorMatrixIndex {
                index: index.index,
                word,
            };
            let offset = self.create_commutator(&mut state, &constituent, kind, policy)?;
            parts.push((weight, state.base.matrix(offset).as_monomial()?.clone()));
        }
        let matrix =
            compose_polynomial_matrix(&self.factory, &state.base.symbols, &parts, description)?;
        let offset = state.base.push_matrix(SymbolicMatrix::Polynomial(matrix));
        match kind {
            CommutatorKind::Commutator => state.polynomial_commutator.insert(index, offset),
            CommutatorKind::Anticommutator => {
                state.polynomial_anticommutator.insert(index, offset)
            }
        };
        Ok(state.base.matrix(offset))
    }

    /// Builds a polynomial localizing matrix from a raw polynomial word.
    ///
    /// Raw words may alias onto shared moment symbols; the resulting matrix is registered in
    /// the system but carries no polynomial index of its own.
    pub fn polynomial_localizing_matrix_from_raw(
        &self,
        index: NearestNeighbourIndex,
        raw: &RawPolynomial,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.raw_composite(index, raw, None, policy)
    }

    /// Builds a polynomial commutator matrix from a raw polynomial word.
    pub fn commutator_matrix_from_raw(
        &self,
        index: NearestNeighbourIndex,
        raw: &RawPolynomial,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.raw_composite(index, raw, Some(CommutatorKind::Commutator), policy)
    }

    /// Builds a polynomial anti-commutator matrix from a raw polynomial word.
    pub fn anticommutator_matrix_from_raw(
        &self,
        index: NearestNeighbourIndex,
        raw: &RawPolynomial,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        self.raw_composite(index, raw, Some(CommutatorKind::Anticommutator), policy)
    }

    fn raw_composite(
        &self,
        index: NearestNeighbourIndex,
        raw: &RawPolynomial,
        kind: Option<CommutatorKind>,
        policy: MultithreadPolicy,
    ) -> Result<Arc<SymbolicMatrix>, MomentaError> {
        let index = self.normalize(index);
        let mut state = self.state.write();

        let family = match kind {
            None => "localizing".to_string(),
            Some(k) => k.name().to_lowercase(),
        };
        let description = format!(
            "Polynomial {} matrix, level {}{}, polynomial {}",
            family,
            index.moment_matrix_level,
            neighbour_suffix(&index),
            raw.to_string(self.context.as_ref())
        );

        let mut parts = Vec::with_capacity(raw.len());
        for (sequence, weight) in raw.iter() {
            let constituent = PauliLocalizingMatrixIndex {
                index,
                word: sequence.clone(),
            };
            let offset = match kind {
                None => self.create_localizing(&mut state, &constituent, policy)?,
                Some(k) => self.create_commutator(&mut state, &constituent, k, policy)?,
            };
            parts.push((*weight, state.base.matrix(offset).as_monomial()?.clone()));
        }
        let matrix =
            compose_polynomial_matrix(&self.factory, &state.base.symbols, &parts, description)?;
        let offset = state.base.push_matrix(SymbolicMatrix::Polynomial(matrix));
        Ok(state.base.matrix(offset))
    }

    fn words_of_polynomial(
        &self,
        base: &MatrixSystemState,
        polynomial: &crate::symbols::Polynomial,
    ) -> Result<Vec<(Complex64, OperatorSequence)>, MomentaError> {
        polynomial
            .iter()
            .map(|term| {
                let symbol =
                    base.symbols
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
                Ok((term.factor, word))
            })
            .collect()
    }

    /// The matrix registered at an offset, if any.
    pub fn matrix(&self, offset: usize) -> Option<Arc<SymbolicMatrix>> {
        let state = self.state.read();
        state.base.matrices.get(offset).cloned()
    }
}
