//! Disjoint-set forest over dense integer ids.
//!
//! Adopted from [`petgraph`](https://github.com/petgraph/petgraph/blob/master/src/unionfind.rs)

use std::cmp::Ordering;

/// `UnionFind` tracks set membership of *n* elements indexed from *0* to *n - 1*.
///
/// Both the one-pass and two-pass labelers share this forest, so the merge
/// order (and with it the internal tree shape) is the same for both: on equal
/// ranks the root of the first argument is attached under the root of the second.
///
/// <http://en.wikipedia.org/wiki/Disjoint-set_data_structure>
#[derive(Debug, Clone)]
pub struct UnionFind {
    // For element at index *i*, store the index of its parent; the representative itself
    // stores its own index.
    parent: Vec<usize>,
    // Ranks are logarithmic in the size of the container -- a byte is more than enough.
    rank: Vec<u8>,
}

#[inline]
unsafe fn get_unchecked(xs: &[usize], index: usize) -> &usize {
    debug_assert!(index < xs.len());
    xs.get_unchecked(index)
}

#[inline]
unsafe fn get_unchecked_mut(xs: &mut [usize], index: usize) -> &mut usize {
    debug_assert!(index < xs.len());
    xs.get_unchecked_mut(index)
}

impl UnionFind {
    /// Create a new `UnionFind` of `n` singleton sets.
    pub fn new(n: usize) -> Self {
        let rank = vec![0; n];
        let parent = (0..n).collect::<Vec<usize>>();

        UnionFind { parent, rank }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Append a new singleton set and return its id.
    pub fn push(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        self.rank.push(0);
        id
    }

    /// Return the representative for `x`.
    ///
    /// Every visited node is re-pointed at its grandparent (path halving), so
    /// repeated lookups get cheaper.
    ///
    /// **Panics** if `x` is out of bounds.
    pub fn find(&mut self, x: usize) -> usize {
        assert!(
            x < self.parent.len(),
            "id {} out of range for {} sets",
            x,
            self.parent.len()
        );
        unsafe { self.find_halving(x) }
    }

    unsafe fn find_halving(&mut self, mut x: usize) -> usize {
        loop {
            let parent = *get_unchecked(&self.parent, x);
            if parent == x {
                return x;
            }
            let grandparent = *get_unchecked(&self.parent, parent);
            *get_unchecked_mut(&mut self.parent, x) = grandparent;
            x = grandparent;
        }
    }

    /// Unify the two sets containing `x` and `y`.
    ///
    /// Return `false` if the sets were already the same, `true` if they were unified.
    ///
    /// **Panics** if `x` or `y` is out of bounds.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let xrep = self.find(x);
        let yrep = self.find(y);

        if xrep == yrep {
            return false;
        }

        let xrank = self.rank[xrep];
        let yrank = self.rank[yrep];

        // The rank corresponds roughly to the depth of the treeset, so put the
        // smaller set below the larger
        match xrank.cmp(&yrank) {
            Ordering::Less => self.parent[xrep] = yrep,
            Ordering::Greater => self.parent[yrep] = xrep,
            Ordering::Equal => {
                self.parent[xrep] = yrep;
                self.rank[yrep] += 1;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut uf = UnionFind::new(4);
        assert_eq!(uf.len(), 4);
        for i in 0..4 {
            assert_eq!(uf.find(i), i);
        }
        assert_ne!(uf.find(0), uf.find(1));
    }

    #[test]
    fn test_tie_attaches_first_under_second() {
        let mut uf = UnionFind::new(3);
        assert!(uf.union(0, 1));
        assert_eq!(uf.find(0), 1);
        assert_eq!(uf.rank[1], 1);

        // lower rank goes under higher rank regardless of argument order
        assert!(uf.union(1, 2));
        assert_eq!(uf.find(2), 1);
        assert_eq!(uf.rank[1], 1);
    }

    #[test]
    fn test_union_same_set_is_noop() {
        let mut uf = UnionFind::new(3);
        uf.union(0, 1);
        let before = uf.parent.clone();
        assert!(!uf.union(1, 0));
        assert!(!uf.union(2, 2));
        assert_eq!(uf.parent, before);
    }

    #[test]
    fn test_transitive() {
        let mut uf = UnionFind::new(6);
        uf.union(0, 1);
        uf.union(2, 3);
        uf.union(1, 2);
        uf.union(4, 5);
        assert_eq!(uf.find(0), uf.find(3));
        assert_ne!(uf.find(3), uf.find(4));
        assert_eq!(uf.find(4), uf.find(5));
        assert_ne!(uf.find(0), uf.find(5));
    }

    #[test]
    fn test_find_halves_path() {
        let mut uf = UnionFind::new(5);
        // hand-built chain 0 -> 1 -> 2 -> 3 -> 4
        uf.parent = vec![1, 2, 3, 4, 4];
        assert_eq!(uf.find(0), 4);
        assert_eq!(uf.parent, vec![2, 2, 4, 4, 4]);
        assert_eq!(uf.find(0), 4);
        assert_eq!(uf.parent, vec![4, 2, 4, 4, 4]);
    }

    #[test]
    fn test_push() {
        let mut uf = UnionFind::new(1);
        assert_eq!(uf.push(), 1);
        assert!(uf.union(0, 1));
        assert_eq!(uf.len(), 2);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range() {
        let mut uf = UnionFind::new(2);
        uf.find(2);
    }
}
