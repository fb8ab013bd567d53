//! Collision-avoiding random placement shared by sector and system population.

use std::collections::HashSet;
use std::hash::Hash;

/// Draw candidates until one is free, claiming it in `occupied`.
///
/// Returns `None` once `max_attempts` draws have all collided.
pub fn place_unique<P, F>(occupied: &mut HashSet<P>, max_attempts: u32, mut draw: F) -> Option<P>
where
    P: Eq + Hash + Copy,
    F: FnMut() -> P,
{
    for _ in 0..max_attempts {
        let candidate = draw();
        if occupied.insert(candidate) {
            return Some(candidate);
        }
    }
    None
}
