//! Disjoint-set forest over dense integer indices.

/// Union-find over `0..len`.
///
/// `find` compresses paths by halving; `merge` attaches the second root
/// under the first. No rank or size balancing.
///
/// # Example
///
/// ```
/// use gripper_voxel::DisjointSet;
///
/// let mut sets = DisjointSet::new(4);
/// sets.merge(0, 1);
/// sets.merge(2, 3);
/// assert_eq!(sets.find(1), sets.find(0));
/// assert_ne!(sets.find(1), sets.find(2));
/// assert_eq!(sets.component_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisjointSet {
    parent: Vec<usize>,
    components: usize,
}

impl DisjointSet {
    /// Create `len` singleton sets.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            components: len,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Check whether there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets.
    #[must_use]
    pub const fn component_count(&self) -> usize {
        self.components
    }

    /// Representative of the set containing `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            let grandparent = self.parent[self.parent[i]];
            self.parent[i] = grandparent;
            i = grandparent;
        }
        i
    }

    /// Union the sets containing `a` and `b`.
    ///
    /// Returns `false` if they were already the same set.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn merge(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        self.parent[rb] = ra;
        self.components -= 1;
        true
    }

    /// Check whether `a` and `b` are in the same set.
    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons() {
        let mut sets = DisjointSet::new(3);
        assert_eq!(sets.len(), 3);
        assert_eq!(sets.component_count(), 3);
        assert!((0..3).all(|i| sets.find(i) == i));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut sets = DisjointSet::new(3);
        assert!(sets.merge(0, 2));
        assert!(!sets.merge(2, 0));
        assert_eq!(sets.component_count(), 2);
        assert!(sets.same_set(0, 2));
    }

    #[test]
    fn long_chain_flattens() {
        let n = 1000;
        let mut sets = DisjointSet::new(n);
        for i in 1..n {
            sets.merge(i, i - 1);
        }
        assert_eq!(sets.component_count(), 1);
        let root = sets.find(0);
        assert!((0..n).all(|i| sets.find(i) == root));
    }

    #[test]
    fn empty_set() {
        let sets = DisjointSet::new(0);
        assert!(sets.is_empty());
        assert_eq!(sets.component_count(), 0);
    }
}
