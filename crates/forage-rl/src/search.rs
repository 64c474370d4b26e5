//! Bounded breadth-first searches over the wall grid
//!
//! Every search expands cells in FIFO order from the start cell using
//! `Grid::legal_neighbors`, so "first found" answers are deterministic.
//! A search that never reaches its target returns `None` instead of a
//! distance, keeping "not found" apart from "found at distance 0".

use std::collections::{HashSet, VecDeque};

use forage_core::{Ghost, Grid, Position};

/// Depth at which the capsule search gives up and reports the cap
pub const CAPSULE_SEARCH_DEPTH: usize = 5;

/// Default cap for `smallest_food_path`
pub const FOOD_PATH_CAP: usize = 5;

/// Generic BFS: distance to the first expanded cell satisfying `goal`
fn first_match<F>(start: Position, walls: &Grid, mut goal: F) -> Option<usize>
where
    F: FnMut(Position, usize) -> bool,
{
    let mut fringe = VecDeque::from([(start, 0usize)]);
    let mut expanded = HashSet::new();

    while let Some((pos, dist)) = fringe.pop_front() {
        if !expanded.insert(pos) {
            continue;
        }
        if goal(pos, dist) {
            return Some(dist);
        }
        fringe.extend(walls.legal_neighbors(pos).into_iter().map(|n| (n, dist + 1)));
    }

    None
}

/// Distance to the nearest food cell, unbounded
pub fn closest_food(start: Position, food: &Grid, walls: &Grid) -> Option<usize> {
    first_match(start, walls, |pos, _| food.get(pos))
}

/// Distance to the nearest capsule, capped at `CAPSULE_SEARCH_DEPTH`.
///
/// Reaching the cap returns the cap even when no capsule was seen; `None`
/// only when the reachable region is exhausted first.
pub fn closest_capsule(start: Position, capsules: &[Position], walls: &Grid) -> Option<usize> {
    first_match(start, walls, |pos, dist| {
        capsules.contains(&pos) || dist == CAPSULE_SEARCH_DEPTH
    })
}

/// The first adversary reached by the search and its distance.
///
/// When several adversaries share the first matching cell the earliest in
/// `ghosts` wins.
pub fn closest_ghost<'a>(
    start: Position,
    ghosts: &[&'a Ghost],
    walls: &Grid,
) -> Option<(&'a Ghost, usize)> {
    let mut found = None;
    let dist = first_match(start, walls, |pos, _| {
        found = ghosts.iter().copied().find(|g| g.position == pos);
        found.is_some()
    })?;
    found.map(|ghost| (ghost, dist))
}

/// Depth at which a chain of food starting at `start` runs out, up to `cap`.
///
/// Only food-bearing neighbours are expanded. The search stops at the first
/// food cell with no unexpanded food neighbours, or once depth reaches `cap`;
/// it returns `cap` if the frontier empties first.
pub fn smallest_food_path(start: Position, food: &Grid, walls: &Grid, cap: usize) -> usize {
    let mut fringe = VecDeque::from([(start, 0usize)]);
    let mut expanded = HashSet::new();

    while let Some((pos, dist)) = fringe.pop_front() {
        expanded.insert(pos);

        let mut with_food = 0;
        for nbr in walls.legal_neighbors(pos) {
            if !expanded.contains(&nbr) && food.get(nbr) {
                fringe.push_back((nbr, dist + 1));
                with_food += 1;
            }
        }

        if (with_food == 0 && food.get(pos)) || dist == cap {
            return dist;
        }
    }

    cap
}

#[cfg(test)]
mod tests {
    use super::*;
    use forage_core::GameState;

    fn open_grid(width: usize, height: usize) -> Grid {
        Grid::new(width, height)
    }

    #[test]
    fn test_closest_food_adjacent() {
        let walls = open_grid(5, 5);
        let food = Grid::from_positions(5, 5, [Position::new(3, 1)]).unwrap();
        assert_eq!(closest_food(Position::new(2, 1), &food, &walls), Some(1));
    }

    #[test]
    fn test_closest_food_on_start_cell() {
        let walls = open_grid(5, 5);
        let food = Grid::from_positions(5, 5, [Position::new(2, 2)]).unwrap();
        assert_eq!(closest_food(Position::new(2, 2), &food, &walls), Some(0));
    }

    #[test]
    fn test_closest_food_none_found() {
        let walls = open_grid(4, 4);
        let food = Grid::new(4, 4);
        assert_eq!(closest_food(Position::new(0, 0), &food, &walls), None);
    }

    #[test]
    fn test_closest_food_goes_around_walls() {
        let state = GameState::from_layout(
            "\
%%%%%
%P%.%
% % %
%   %
%%%%%",
            0,
        )
        .unwrap();
        // Down two, across two, up two
        assert_eq!(closest_food(state.agent, &state.food, &state.walls), Some(6));
    }

    #[test]
    fn test_closest_capsule_capped() {
        let walls = open_grid(10, 1);
        let capsules = [Position::new(8, 0)];
        assert_eq!(
            closest_capsule(Position::new(0, 0), &capsules, &walls),
            Some(CAPSULE_SEARCH_DEPTH)
        );
    }

    #[test]
    fn test_closest_capsule_within_cap() {
        let walls = open_grid(10, 1);
        let capsules = [Position::new(3, 0)];
        assert_eq!(closest_capsule(Position::new(0, 0), &capsules, &walls), Some(3));
    }

    #[test]
    fn test_closest_capsule_exhausted() {
        let walls = open_grid(3, 1);
        let capsules = [Position::new(9, 9)];
        assert_eq!(closest_capsule(Position::new(0, 0), &capsules, &walls), None);
    }

    #[test]
    fn test_closest_ghost_first_in_bfs_order() {
        let walls = open_grid(5, 5);
        let west = Ghost::scared(Position::new(1, 2), 5);
        let north = Ghost::scared(Position::new(2, 3), 9);
        let ghosts = [&west, &north];

        // North is expanded before West
        let (ghost, dist) = closest_ghost(Position::new(2, 2), &ghosts, &walls).unwrap();
        assert_eq!(ghost, &north);
        assert_eq!(dist, 1);
    }

    #[test]
    fn test_closest_ghost_unreachable() {
        let walls = Grid::from_positions(3, 1, [Position::new(1, 0)]).unwrap();
        let ghost = Ghost::scared(Position::new(2, 0), 5);
        assert!(closest_ghost(Position::new(0, 0), &[&ghost], &walls).is_none());
    }

    #[test]
    fn test_smallest_food_path_isolated_food() {
        let walls = open_grid(5, 5);
        let food = Grid::from_positions(5, 5, [Position::new(2, 2)]).unwrap();
        assert_eq!(smallest_food_path(Position::new(2, 2), &food, &walls, FOOD_PATH_CAP), 0);
    }

    #[test]
    fn test_smallest_food_path_chain() {
        let walls = open_grid(8, 1);
        let food = Grid::from_positions(
            8,
            1,
            [Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)],
        )
        .unwrap();
        assert_eq!(smallest_food_path(Position::new(0, 0), &food, &walls, FOOD_PATH_CAP), 2);
    }

    #[test]
    fn test_smallest_food_path_hits_cap() {
        let walls = open_grid(10, 1);
        let food = Grid::from_positions(10, 1, (0..10).map(|x| Position::new(x, 0))).unwrap();
        assert_eq!(smallest_food_path(Position::new(0, 0), &food, &walls, FOOD_PATH_CAP), 5);
        assert_eq!(smallest_food_path(Position::new(0, 0), &food, &walls, 3), 3);
    }

    #[test]
    fn test_smallest_food_path_no_food() {
        let walls = open_grid(4, 4);
        let food = Grid::new(4, 4);
        assert_eq!(
            smallest_food_path(Position::new(0, 0), &food, &walls, FOOD_PATH_CAP),
            FOOD_PATH_CAP
        );
    }
}
