//! Random obstacle layout.

use rand::Rng;

use crate::core::planet::GridCell;

/// Share of the grid covered by obstacles.
pub const OBSTACLE_DENSITY: f32 = 0.1;

/// Number of obstacles for a `segments x segments` grid at `density`.
pub fn obstacle_target(segments: u32, density: f32) -> usize {
    let cells = (segments as f32) * (segments as f32);
    (cells * density).floor() as usize
}

/// Draw `floor(segments^2 * density)` distinct cells, never `excluded`, without replacement.
///
/// Returns fewer cells only when the grid has fewer free cells than the target.
pub fn sample_obstacles<R: Rng>(
    segments: u32,
    density: f32,
    excluded: GridCell,
    rng: &mut R,
) -> Vec<GridCell> {
    let mut pool: Vec<GridCell> = (0..segments)
        .flat_map(|lat| (0..segments).map(move |lon| GridCell::new(lat, lon)))
        .filter(|cell| *cell != excluded)
        .collect();

    let target = obstacle_target(segments, density).min(pool.len());
    let mut chosen = Vec::with_capacity(target);
    while chosen.len() < target {
        let index = rng.random_range(0..pool.len());
        chosen.push(pool.swap_remove(index));
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_default_grid_gets_25_obstacles() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let excluded = GridCell::center(16);
        let obstacles = sample_obstacles(16, OBSTACLE_DENSITY, excluded, &mut rng);

        assert_eq!(obstacles.len(), 25);
        assert!(!obstacles.contains(&excluded));
        let unique: HashSet<_> = obstacles.iter().copied().collect();
        assert_eq!(unique.len(), obstacles.len());
        assert!(obstacles.iter().all(|c| c.lat_index < 16 && c.lon_index < 16));
    }

    #[test]
    fn test_exclusion_holds_across_many_draws() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for lat in 0..16 {
            let excluded = GridCell::new(lat, 15 - lat);
            let obstacles = sample_obstacles(16, OBSTACLE_DENSITY, excluded, &mut rng);
            assert_eq!(obstacles.len(), 25);
            assert!(!obstacles.contains(&excluded));
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let excluded = GridCell::center(16);
        let a = sample_obstacles(16, OBSTACLE_DENSITY, excluded, &mut ChaCha8Rng::seed_from_u64(5));
        let b = sample_obstacles(16, OBSTACLE_DENSITY, excluded, &mut ChaCha8Rng::seed_from_u64(5));
        let c = sample_obstacles(16, OBSTACLE_DENSITY, excluded, &mut ChaCha8Rng::seed_from_u64(6));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_pool_smaller_than_target() {
        // 2x2 grid, everything but the excluded cell
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let excluded = GridCell::new(0, 1);
        let obstacles = sample_obstacles(2, 1.0, excluded, &mut rng);
        assert_eq!(obstacles.len(), 3);
        assert!(!obstacles.contains(&excluded));
    }

    #[test]
    fn test_obstacle_target() {
        assert_eq!(obstacle_target(16, 0.1), 25);
        assert_eq!(obstacle_target(2, 0.1), 0);
        assert_eq!(obstacle_target(10, 0.0), 0);
    }
}
