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

use std::fmt;

use crate::operators::{SequenceSign, SequenceStorage, ShortlexHasher};
use crate::scenarios::alphabetic_name;
use crate::{Context, MomentaError, OperatorId};

/// One measurement of a party: a projective measurement with a fixed outcome count.
///
/// One operator is assigned per non-final outcome; the final outcome's projector is implied by
/// completeness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Number of outcomes of the measurement.
    pub outcomes: usize,
    operator_offset: usize,
}

impl Measurement {
    /// Number of operators assigned to this measurement.
    pub fn operators(&self) -> usize {
        self.outcomes - 1
    }
}

/// One party of a measurement scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    /// The measurements available to the party.
    pub measurements: Vec<Measurement>,
    operator_offset: usize,
    operator_count: usize,
}

impl Party {
    /// Global number of the party's first operator.
    pub fn operator_offset(&self) -> usize {
        self.operator_offset
    }

    /// Number of operators belonging to the party.
    pub fn operator_count(&self) -> usize {
        self.operator_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MeasurementOperator {
    party: usize,
    measurement: usize,
    outcome: usize,
}

/// Generic multi-party measurement scenario.
///
/// Operators are projectors onto measurement outcomes. Operators of distinct parties commute;
/// within a party, operators of the same measurement are orthogonal (distinct outcomes
/// annihilate) and idempotent, while operators of different measurements do not commute.
#[derive(Debug)]
pub struct MeasurementContext {
    parties: Vec<Party>,
    operator_info: Vec<MeasurementOperator>,
    hasher: ShortlexHasher,
}

impl MeasurementContext {
    /// Creates a measurement scenario.
    ///
    /// # Arguments
    ///
    /// * `outcomes_per_party` - For each party, the outcome count of each of its measurements.
    ///
    /// # Returns
    ///
    /// * `Ok(MeasurementContext)` - The new scenario.
    /// * `Err(MomentaError::ZeroOutcomeMeasurement)` - A measurement declared no outcomes.
    pub fn new(outcomes_per_party: &[Vec<usize>]) -> Result<Self, MomentaError> {
        let mut parties = Vec::with_capacity(outcomes_per_party.len());
        let mut operator_info = Vec::new();

        for (party_index, measurement_outcomes) in outcomes_per_party.iter().enumerate() {
            let party_offset = operator_info.len();
            let mut measurements = Vec::with_capacity(measurement_outcomes.len());
            for (mmt_index, &outcomes) in measurement_outcomes.iter().enumerate() {
                if outcomes == 0 {
                    return Err(MomentaError::ZeroOutcomeMeasurement {
                        party: party_index,
                        measurement: mmt_index,
                    });
                }
                measurements.push(Measurement {
                    outcomes,
                    operator_offset: operator_info.len(),
                });
                for outcome in 0..(outcomes - 1) {
                    operator_info.push(MeasurementOperator {
                        party: party_index,
                        measurement: mmt_index,
                        outcome,
                    });
                }
            }
            parties.push(Party {
                measurements,
                operator_offset: party_offset,
                operator_count: operator_info.len() - party_offset,
            });
        }

        let hasher = ShortlexHasher::new(operator_info.len());
        Ok(Self {
            parties,
            operator_info,
            hasher,
        })
    }

    /// The parties of the scenario.
    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    /// Global operator number of a party/measurement/outcome triple.
    ///
    /// # Panics
    ///
    /// * If the party, measurement or outcome is out of range.
    pub fn operator_number(&self, party: usize, measurement: usize, outcome: usize) -> OperatorId {
        let mmt = &self.parties[party].measurements[measurement];
        assert!(outcome < mmt.operators());
        (mmt.operator_offset + outcome) as OperatorId
    }
}

impl Context for MeasurementContext {
    fn operator_count(&self) -> usize {
        self.operator_info.len()
    }

    fn hasher(&self) -> &ShortlexHasher {
        &self.hasher
    }

    fn additional_simplification(
        &self,
        operators: &mut SequenceStorage,
        _sign: &mut SequenceSign,
    ) -> bool {
        if operators.is_empty() {
            return false;
        }

        // Operators of distinct parties commute; order within a party is preserved.
        operators.sort_by_key(|&oper| self.operator_info[oper as usize].party);

        let mut simplified = SequenceStorage::new();
        for &oper in operators.iter() {
            let info = self.operator_info[oper as usize];
            if let Some(&previous) = simplified.last() {
                let previous_info = self.operator_info[previous as usize];
                if previous_info.party == info.party
                    && previous_info.measurement == info.measurement
                {
                    if previous == oper {
                        // Idempotent projector.
                        continue;
                    }
                    // Distinct outcomes of the same measurement annihilate.
                    return true;
                }
            }
            simplified.push(oper);
        }
        *operators = simplified;
        false
    }

    fn format_raw_sequence(&self, operators: &[OperatorId]) -> String {
        if operators.is_empty() {
            return "1".to_string();
        }
        operators
            .iter()
            .map(|&oper| {
                let info = self.operator_info[oper as usize];
                format!("{}{}.{}", alphabetic_name(info.party), info.measurement, info.outcome)
            })
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Implements the format function (Display trait) of MeasurementContext.
impl fmt::Display for MeasurementContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Measurement scenario with {} {} and {} {}.",
            self.parties.len(),
            if self.parties.len() == 1 { "party" } else { "parties" },
            self.operator_info.len(),
            if self.operator_info.len() == 1 { "operator" } else { "operators" },
        )?;
        for (index, party) in self.parties.iter().enumerate() {
            write!(f, "Party {}:", alphabetic_name(index))?;
            for measurement in &party.measurements {
                write!(f, " [{}]", measurement.outcomes)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
