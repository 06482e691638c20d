//! Checks for the properties every labeling must satisfy.

use crate::{BinaryGrid, Connectivity, LabelGrid, Strategy, BACKGROUND};
use anyhow::{ensure, Result};
use bit_set::BitSet;
use itertools::Itertools;
use std::collections::HashMap;

/// Number of distinct nonzero labels.
pub fn component_count(labels: &LabelGrid) -> usize {
    labels
        .iter()
        .filter(|&&l| l > 0)
        .map(|&l| l as usize)
        .collect::<BitSet>()
        .len()
}

/// `labels` has `grid`'s shape, is 0 exactly on background, and uses every
/// label in `1..=K` for some K.
pub fn is_canonical(grid: &BinaryGrid, labels: &LabelGrid) -> bool {
    if grid.shape() != labels.shape() {
        return false;
    }
    if grid
        .iter()
        .zip(labels.iter())
        .any(|(&v, &l)| (v == BACKGROUND) != (l == 0))
    {
        return false;
    }
    let max = labels.iter().copied().max().unwrap_or(0) as usize;
    component_count(labels) == max
}

/// Both labelings split the foreground into the same components, up to renaming.
pub fn same_partition(a: &LabelGrid, b: &LabelGrid) -> bool {
    if a.shape() != b.shape() {
        return false;
    }
    let mut a_to_b: HashMap<u32, u32> = HashMap::new();
    let mut b_to_a: HashMap<u32, u32> = HashMap::new();
    for (&la, &lb) in a.iter().zip(b.iter()) {
        if (la == 0) != (lb == 0) {
            return false;
        }
        if la == 0 {
            continue;
        }
        if *a_to_b.entry(la).or_insert(lb) != lb || *b_to_a.entry(lb).or_insert(la) != la {
            return false;
        }
    }
    true
}

/// Run every strategy in `strategies` on `grid` and check that the outputs
/// are canonical and describe one partition.
///
/// Return the component count they agree on.
pub fn check_equivalence(
    grid: &BinaryGrid,
    connectivity: Connectivity,
    strategies: &[Strategy],
) -> Result<usize> {
    let outputs: Vec<(Strategy, LabelGrid)> = strategies
        .iter()
        .map(|&s| (s, s.label(grid, connectivity)))
        .collect();

    for (s, labels) in &outputs {
        ensure!(
            is_canonical(grid, labels),
            "{} produced a non-canonical labeling",
            s
        );
    }
    for ((s_a, a), (s_b, b)) in outputs.iter().tuple_windows() {
        ensure!(
            component_count(a) == component_count(b),
            "{} found {} components but {} found {}",
            s_a,
            component_count(a),
            s_b,
            component_count(b)
        );
        ensure!(
            same_partition(a, b),
            "{} and {} disagree on the partition",
            s_a,
            s_b
        );
    }

    Ok(outputs.first().map_or(0, |(_, l)| component_count(l)))
}
