//! Per-(seed, size) memoization for callers that observe the board on
//! every frame but only need a new grid when the inputs change.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::trace;

use crate::generator::TerrainGenerator;
use crate::terrain::TerrainGrid;

const DEFAULT_CAPACITY: usize = 16;

pub struct TerrainCache {
    generator: TerrainGenerator,
    grids: HashMap<(i64, usize), Arc<TerrainGrid>>,
    /// Insertion order, oldest first
    order: VecDeque<(i64, usize)>,
    capacity: usize,
}

impl TerrainCache {
    pub fn new(generator: TerrainGenerator) -> Self {
        Self::with_capacity(generator, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(generator: TerrainGenerator, capacity: usize) -> Self {
        TerrainCache {
            generator,
            grids: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Cached grid for the key, generating it on first request.
    pub fn get(&mut self, seed: i64, size: usize) -> Arc<TerrainGrid> {
        let key = (seed, size);
        if let Some(grid) = self.grids.get(&key) {
            trace!(seed, size, "terrain cache hit");
            return Arc::clone(grid);
        }

        trace!(seed, size, "terrain cache miss");
        let grid = Arc::new(self.generator.generate(seed, size));
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.grids.remove(&oldest);
            }
        }
        self.order.push_back(key);
        self.grids.insert(key, Arc::clone(&grid));
        grid
    }

    pub fn contains(&self, seed: i64, size: usize) -> bool {
        self.grids.contains_key(&(seed, size))
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    pub fn clear(&mut self) {
        self.grids.clear();
        self.order.clear();
    }
}

impl Default for TerrainCache {
    fn default() -> Self {
        Self::new(TerrainGenerator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_terrain;

    #[test]
    fn test_repeat_key_returns_same_grid() {
        let mut cache = TerrainCache::default();
        let a = cache.get(42, 6);
        let b = cache.get(42, 6);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, generate_terrain(42, 6));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_new_key_regenerates() {
        let mut cache = TerrainCache::default();
        let a = cache.get(42, 6);
        let b = cache.get(43, 6);
        let c = cache.get(42, 8);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(c.size(), 8);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_evicts_oldest() {
        let mut cache = TerrainCache::with_capacity(TerrainGenerator::default(), 2);
        cache.get(2, 6);
        cache.get(3, 6);
        cache.get(4, 6);
        assert!(!cache.contains(2, 6));
        assert!(cache.contains(3, 6));
        assert!(cache.contains(4, 6));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
