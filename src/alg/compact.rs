use crate::UnionFind;
use bit_set::BitSet;

#[inline]
pub(crate) fn to_label(n: usize) -> u32 {
    u32::try_from(n).expect("label space exceeds u32")
}

/// Resolve every id in `used` to its root and number the distinct roots
/// `1..=K` in ascending root order.
///
/// Returns a table indexed by id (not by root) holding the final label of
/// each used id, and K.
pub(crate) fn compact_by_sorted_root(dsu: &mut UnionFind, used: &BitSet) -> (Vec<u32>, usize) {
    let mut roots = BitSet::with_capacity(dsu.len());
    for id in used.iter() {
        roots.insert(dsu.find(id));
    }

    // `BitSet` iterates in ascending order
    let mut root_label = vec![0u32; dsu.len()];
    let mut k = 0;
    for root in roots.iter() {
        k += 1;
        root_label[root] = to_label(k);
    }

    let mut table = vec![0u32; dsu.len()];
    for id in used.iter() {
        table[id] = root_label[dsu.find(id)];
    }
    (table, k)
}
