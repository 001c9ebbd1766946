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

//! Integration test for public API of IndexTree

use momenta::utilities::IndexTree;

// Test the add and find functions of the IndexTree
#[test]
fn add_and_find() {
    let mut tree: IndexTree<usize, usize> = IndexTree::new();
    assert!(tree.leaf());
    assert_eq!(tree.find(&[1, 2, 3]), None);

    tree.add(&[1, 2, 3], 13);
    tree.add(&[1, 2], 12);
    tree.add(&[4], 40);

    assert_eq!(tree.find(&[1, 2, 3]), Some(13));
    assert_eq!(tree.find(&[1, 2]), Some(12));
    assert_eq!(tree.find(&[4]), Some(40));
    assert_eq!(tree.find(&[1]), None);
    assert_eq!(tree.find(&[1, 2, 3, 4]), None);
    assert!(!tree.leaf());
}

// Test that the root value addresses the empty key sequence
#[test]
fn empty_key() {
    let mut tree: IndexTree<usize, usize> = IndexTree::new();
    assert_eq!(tree.find(&[]), None);
    tree.add(&[], 7);
    assert_eq!(tree.find(&[]), Some(7));
}

// Test the add_if_new function of the IndexTree
#[test]
fn add_if_new_keeps_existing() {
    let mut tree: IndexTree<usize, usize> = IndexTree::new();
    let (value, inserted) = tree.add_if_new(&[5, 6], 100);
    assert_eq!(value, 100);
    assert!(inserted);

    let (value, inserted) = tree.add_if_new(&[5, 6], 200);
    assert_eq!(value, 100);
    assert!(!inserted);
    assert_eq!(tree.find(&[5, 6]), Some(100));
}

// Test the find_node_or_suffix function of the IndexTree
#[test]
fn find_node_or_suffix_returns_unmatched_tail() {
    let mut tree: IndexTree<usize, usize> = IndexTree::new();
    tree.add(&[1, 2, 3], 13);

    let (_, suffix) = tree.find_node_or_suffix(&[1, 2, 3]);
    assert!(suffix.is_empty());

    let (node, suffix) = tree.find_node_or_suffix(&[1, 2, 9, 9]);
    assert_eq!(suffix, &[9, 9]);
    assert_eq!(node.find(&[3]), Some(13));

    let (_, suffix) = tree.find_node_or_suffix(&[8]);
    assert_eq!(suffix, &[8]);
}

// Test that visit walks entries depth-first in ascending key order
#[test]
fn visit_in_canonical_order() {
    let mut tree: IndexTree<usize, usize> = IndexTree::new();
    tree.add(&[2], 2);
    tree.add(&[1, 3], 13);
    tree.add(&[1], 1);
    tree.add(&[1, 2], 12);

    let mut seen = Vec::new();
    tree.visit(&mut |path, value| seen.push((path.to_vec(), value)));
    assert_eq!(
        seen,
        vec![
            (vec![1], 1),
            (vec![1, 2], 12),
            (vec![1, 3], 13),
            (vec![2], 2),
        ]
    );
}
