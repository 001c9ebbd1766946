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

use crate::operators::SequenceStorage;
use crate::OperatorId;

/// Iterator over all raw operator strings of a fixed length, in lexicographic order.
///
/// Enumerates strings over the operator range `[offset, offset + operator_count)` like a
/// base-`operator_count` counter; the strings are raw (no canonicalization applied).
#[derive(Debug, Clone)]
pub struct MultiOperatorIterator {
    length: usize,
    min_oper: OperatorId,
    max_oper: OperatorId,
    indices: SequenceStorage,
    started: bool,
    done: bool,
}

impl MultiOperatorIterator {
    /// Iterator over all length-`length` strings drawn from `operator_count` operators.
    pub fn new(operator_count: usize, length: usize) -> Self {
        Self::with_offset(operator_count, 0, length)
    }

    /// Iterator over all length-`length` strings drawn from operators
    /// `offset..offset + operator_count`.
    pub fn with_offset(operator_count: usize, offset: OperatorId, length: usize) -> Self {
        let min_oper = offset;
        let max_oper = offset + operator_count as OperatorId;
        let indices: SequenceStorage = std::iter::repeat(min_oper).take(length).collect();
        Self {
            length,
            min_oper,
            max_oper,
            indices,
            started: false,
            done: length == 0 || operator_count == 0,
        }
    }

    fn advance(&mut self) -> bool {
        let mut depth = self.length;
        loop {
            if depth == 0 {
                return false;
            }
            depth -= 1;
            self.indices[depth] += 1;
            if self.indices[depth] == self.max_oper {
                self.indices[depth] = self.min_oper;
            } else {
                return true;
            }
        }
    }
}

impl Iterator for MultiOperatorIterator {
    type Item = SequenceStorage;

    fn next(&mut self) -> Option<SequenceStorage> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }
        if self.advance() {
            Some(self.indices.clone())
        } else {
            self.done = true;
            None
        }
    }
}
