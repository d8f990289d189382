//! N-way identifier set intersection (logical AND).

use std::collections::HashSet;

/// Intersect identifier sets.
///
/// With zero input sets the result is empty; "no constraints means match
/// all" is a caller decision, never inferred here. Otherwise the first
/// set is the candidate pool and survivors keep its order.
pub fn intersect(sets: Vec<Vec<String>>) -> Vec<String> {
    let mut iter = sets.into_iter();
    let Some(pool) = iter.next() else {
        return Vec::new();
    };
    let rest: Vec<HashSet<String>> = iter.map(|set| set.into_iter().collect()).collect();
    pool.into_iter()
        .filter(|id| rest.iter().all(|set| set.contains(id)))
        .collect()
}
