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

/// A trie over ordered key sequences, used as a sparse map from variable-length key lists
/// (factor lists, index tuples) to values.
///
/// Children are kept sorted by key and binary-searched on descent.
#[derive(Debug, Clone)]
pub struct IndexTree<K, V> {
    value: Option<V>,
    children: Vec<(K, IndexTree<K, V>)>,
}

impl<K, V> Default for IndexTree<K, V> {
    fn default() -> Self {
        Self {
            value: None,
            children: Vec::new(),
        }
    }
}

impl<K: Ord + Copy, V: Copy> IndexTree<K, V> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            value: None,
            children: Vec::new(),
        }
    }

    /// The value stored at this node, if any.
    pub fn value(&self) -> Option<V> {
        self.value
    }

    /// True, if the node has no children.
    pub fn leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Adds an entry to the tree, overwriting any previous value at the key sequence.
    pub fn add(&mut self, keys: &[K], value: V) {
        match keys.split_first() {
            None => self.value = Some(value),
            Some((&first, rest)) => self.child_mut(first).add(rest, value),
        }
    }

    /// Adds an entry to the tree only if the key sequence is vacant.
    ///
    /// # Returns
    ///
    /// * `(V, bool)` - The value now stored at the key sequence and whether it was inserted.
    pub fn add_if_new(&mut self, keys: &[K], value: V) -> (V, bool) {
        match keys.split_first() {
            None => match self.value {
                Some(existing) => (existing, false),
                None => {
                    self.value = Some(value);
                    (value, true)
                }
            },
            Some((&first, rest)) => self.child_mut(first).add_if_new(rest, value),
        }
    }

    /// Attempts to read an entry from the tree.
    pub fn find(&self, keys: &[K]) -> Option<V> {
        match keys.split_first() {
            None => self.value,
            Some((&first, rest)) => self.child(first)?.find(rest),
        }
    }

    /// Returns the child node for a single key, if present.
    pub fn find_node(&self, key: K) -> Option<&Self> {
        self.child(key)
    }

    /// Descends as far as the tree matches the key sequence.
    ///
    /// # Returns
    ///
    /// * `(&Self, &[K])` - The deepest matched node and the unmatched key suffix.
    pub fn find_node_or_suffix<'a>(&self, keys: &'a [K]) -> (&Self, &'a [K]) {
        match keys.split_first() {
            None => (self, keys),
            Some((&first, rest)) => match self.child(first) {
                Some(child) => child.find_node_or_suffix(rest),
                None => (self, keys),
            },
        }
    }

    /// Visits every stored entry depth-first, children in ascending key order.
    ///
    /// # Arguments
    ///
    /// * `visitor` - Called with the full key path and the value of each occupied node.
    pub fn visit<F: FnMut(&[K], V)>(&self, visitor: &mut F) {
        let mut path = Vec::new();
        self.visit_inner(&mut path, visitor);
    }

    fn visit_inner<F: FnMut(&[K], V)>(&self, path: &mut Vec<K>, visitor: &mut F) {
        if let Some(value) = self.value {
            visitor(path, value);
        }
        for (key, child) in &self.children {
            path.push(*key);
            child.visit_inner(path, visitor);
            path.pop();
        }
    }

    fn child(&self, key: K) -> Option<&Self> {
        match self.children.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(position) => Some(&self.children[position].1),
            Err(_) => None,
        }
    }

    fn child_mut(&mut self, key: K) -> &mut Self {
        match self.children.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(position) => &mut self.children[position].1,
            Err(position) => {
                self.children.insert(position, (key, IndexTree::new()));
                &mut self.children[position].1
            }
        }
    }
}
