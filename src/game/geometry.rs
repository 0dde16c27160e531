use super::types::Point;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

pub fn in_bounds(point: Point, map_size: i32) -> bool {
    point.x >= 0 && point.x < map_size && point.y >= 0 && point.y < map_size
}

/// Every cell of the `map_size`² board not present in `occupied`, row-major.
pub fn free_cells<'a>(map_size: i32, occupied: impl IntoIterator<Item = &'a Point>) -> Vec<Point> {
    let taken: HashSet<Point> = occupied.into_iter().copied().collect();
    (0..map_size)
        .flat_map(|y| (0..map_size).map(move |x| Point { x, y }))
        .filter(|cell| !taken.contains(cell))
        .collect()
}

/// Uniformly samples one free cell, `None` once the board is saturated.
pub fn random_free_position<'a, R: Rng + ?Sized>(
    rng: &mut R,
    map_size: i32,
    occupied: impl IntoIterator<Item = &'a Point>,
) -> Option<Point> {
    free_cells(map_size, occupied).choose(rng).copied()
}
