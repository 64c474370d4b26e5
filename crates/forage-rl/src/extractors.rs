//! Feature extractor implementations

use forage_core::{Action, GameState};

use crate::features::{Feature, FeatureExtractor, FeatureVector};
use crate::search::{
    closest_capsule, closest_food, closest_ghost, smallest_food_path, CAPSULE_SEARCH_DEPTH,
    FOOD_PATH_CAP,
};

pub const GHOSTS_ONE_STEP_AWAY: &str = "#-of-ghosts-1-step-away";
pub const EATS_SCARED_GHOST: &str = "eats-scared-ghost";
pub const CLOSEST_SCARED_GHOST: &str = "closest-scared-ghost";
pub const EATS_FOOD: &str = "eats-food";
pub const EAT_SMALL_PATH_FOOD: &str = "eat-small-path-food";
pub const CLOSEST_FOOD: &str = "closest-food";
pub const CAPSULE_NEARBY: &str = "capsule-nearby";

// Feature scaling. Relative magnitudes matter to every learned weight.
const EATS_SCARED_GHOST_BONUS: f64 = 0.5;
const EATS_FOOD_BONUS: f64 = 0.1;
const CHASE_SCALE: f64 = 50.0;
const SMALL_PATH_SCALE: f64 = 50.0;
const CAPSULE_SCALE: f64 = 10.0;
const CHASE_DAMPING: f64 = 10.0;
const GLOBAL_SCALE: f64 = 10.0;

/// Features damped while a scared adversary is worth chasing
const FORAGING_FEATURES: [&str; 4] = [EATS_FOOD, CLOSEST_FOOD, CAPSULE_NEARBY, EAT_SMALL_PATH_FOOD];

/// One indicator per literal (state, action) pair.
///
/// Combined with the approximate agent this reduces to a lookup table.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityExtractor;

impl<S: Clone + PartialEq> FeatureExtractor<S> for IdentityExtractor {
    fn name(&self) -> &'static str {
        "IdentityExtractor"
    }

    fn features(&self, state: &S, action: Action) -> FeatureVector<S> {
        let mut features = FeatureVector::new();
        features.set(Feature::StateAction(state.clone(), action), 1.0);
        features
    }
}

/// Indicators for the state, the agent's coordinates and the action
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateExtractor;

impl FeatureExtractor<GameState> for CoordinateExtractor {
    fn name(&self) -> &'static str {
        "CoordinateExtractor"
    }

    fn features(&self, state: &GameState, action: Action) -> FeatureVector<GameState> {
        let mut features = FeatureVector::new();
        features.set(Feature::State(state.clone()), 1.0);
        features.set_named(&format!("x={}", state.agent.x), 1.0);
        features.set_named(&format!("y={}", state.agent.y), 1.0);
        features.set_named(&format!("action={action}"), 1.0);
        features
    }
}

/// Hand-built foraging features for the cell the action leads to
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleExtractor;

impl FeatureExtractor<GameState> for SimpleExtractor {
    fn name(&self) -> &'static str {
        "SimpleExtractor"
    }

    fn features(&self, state: &GameState, action: Action) -> FeatureVector<GameState> {
        let walls = &state.walls;
        let food = &state.food;
        let next = state.agent.step(action);
        let mut features = FeatureVector::new();

        let next_neighbors = walls.legal_neighbors(next);
        let threats = state
            .threatening_ghosts()
            .iter()
            .filter(|g| next_neighbors.contains(&g.position))
            .count();
        let safe = threats == 0;
        features.set_named(GHOSTS_ONE_STEP_AWAY, threats as f64);

        let mut eats_scared = 0.0;
        let mut chase = 0.0;
        let scared = state.scared_ghosts();
        if safe && !scared.is_empty() {
            if let Some((ghost, dist)) = closest_ghost(next, &scared, walls) {
                let dist = dist as f64;
                if dist < 1.0 {
                    eats_scared = EATS_SCARED_GHOST_BONUS;
                }
                let half_timer = f64::from(ghost.scared_timer) / 2.0;
                if ghost.scared_timer >= 2 && half_timer > dist {
                    chase = (half_timer - dist) / CHASE_SCALE;
                }
            }
        }
        features.set_named(EATS_SCARED_GHOST, eats_scared);
        features.set_named(CLOSEST_SCARED_GHOST, chase);

        let eats_food = if safe && food.get(next) {
            EATS_FOOD_BONUS
        } else {
            0.0
        };
        features.set_named(EATS_FOOD, eats_food);

        let small_path = if eats_food > 0.0 {
            let depth = smallest_food_path(next, food, walls, FOOD_PATH_CAP);
            (FOOD_PATH_CAP as f64 - depth as f64) / SMALL_PATH_SCALE
        } else {
            0.0
        };
        features.set_named(EAT_SMALL_PATH_FOOD, small_path);

        // Unreachable food reads as distance 0
        let food_dist = closest_food(next, food, walls).unwrap_or(0);
        features.set_named(CLOSEST_FOOD, food_dist as f64 / walls.area() as f64);

        let capsule = if safe && !state.capsules.is_empty() {
            let dist = closest_capsule(next, &state.capsules, walls).unwrap_or(0);
            (CAPSULE_SEARCH_DEPTH as f64 - dist as f64) / CAPSULE_SCALE
        } else {
            0.0
        };
        features.set_named(CAPSULE_NEARBY, capsule);

        if chase > 0.0 {
            for name in FORAGING_FEATURES {
                features.divide_named(name, CHASE_DAMPING);
            }
        }

        features.divide_all(GLOBAL_SCALE);
        features
    }
}
