// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Small ordered key sets for adjacency results.
//!
//! Co-boundaries and boundaries in a tetrahedral mesh are tiny (a face has at
//! most two tetrahedra, a tetrahedron exactly four faces), so a [`SimplexSet`]
//! is an insertion-ordered, duplicate-free inline vector rather than a hash
//! set. Set algebra preserves the order of the left operand.

use std::ops::{Add, BitOr, Index, Sub};

use smallvec::SmallVec;

/// An ordered, duplicate-free collection of simplex keys of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimplexSet<K: Copy + Eq> {
    keys: SmallVec<[K; 4]>,
}

impl<K: Copy + Eq> SimplexSet<K> {
    pub fn new() -> Self {
        Self {
            keys: SmallVec::new(),
        }
    }

    /// Adds `key` if it is not already present. Returns `true` if it was added.
    pub fn insert(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Removes `key`, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.keys.iter().position(|k| k == key) {
            Some(i) => {
                self.keys.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn first(&self) -> Option<K> {
        self.keys.first().copied()
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, K>> {
        self.keys.iter().copied()
    }

    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }

    /// Keys of `self` followed by keys of `other` not already in `self`.
    pub fn union(&self, other: &SimplexSet<K>) -> SimplexSet<K> {
        let mut out = self.clone();
        out.extend(other.iter());
        out
    }

    /// Keys of `self` that are not in `other`.
    pub fn difference(&self, other: &SimplexSet<K>) -> SimplexSet<K> {
        self.iter().filter(|k| !other.contains(k)).collect()
    }

    /// Keys of `self` other than `key`.
    pub fn without(&self, key: K) -> SimplexSet<K> {
        self.iter().filter(|k| *k != key).collect()
    }
}

impl<K: Copy + Eq> Default for SimplexSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> Extend<K> for SimplexSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Copy + Eq> FromIterator<K> for SimplexSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = SimplexSet::new();
        set.extend(iter);
        set
    }
}

impl<K: Copy + Eq, const N: usize> From<[K; N]> for SimplexSet<K> {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<K: Copy + Eq> IntoIterator for SimplexSet<K> {
    type Item = K;
    type IntoIter = smallvec::IntoIter<[K; 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a, K: Copy + Eq> IntoIterator for &'a SimplexSet<K> {
    type Item = K;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Copy + Eq> Index<usize> for SimplexSet<K> {
    type Output = K;

    fn index(&self, index: usize) -> &K {
        &self.keys[index]
    }
}

impl<K: Copy + Eq> BitOr for &SimplexSet<K> {
    type Output = SimplexSet<K>;

    fn bitor(self, rhs: Self) -> SimplexSet<K> {
        self.union(rhs)
    }
}

impl<K: Copy + Eq> Add for &SimplexSet<K> {
    type Output = SimplexSet<K>;

    fn add(self, rhs: Self) -> SimplexSet<K> {
        self.union(rhs)
    }
}

impl<K: Copy + Eq> Sub for &SimplexSet<K> {
    type Output = SimplexSet<K>;

    fn sub(self, rhs: Self) -> SimplexSet<K> {
        self.difference(rhs)
    }
}

impl<K: Copy + Eq> Sub<K> for &SimplexSet<K> {
    type Output = SimplexSet<K>;

    fn sub(self, rhs: K) -> SimplexSet<K> {
        self.without(rhs)
    }
}
