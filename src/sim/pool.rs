//! Fixed-capacity entity pool
//!
//! Slots are allocated once at fill time. "Spawning" revives a dead slot and
//! "despawning" kills it; no allocation happens during play.
//!
//! Dead slot indices live in a free list: revive pops, kill pushes.

use std::convert::Infallible;

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    item: T,
    alive: bool,
}

/// Arena of reusable entities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
}

impl<T> Pool<T> {
    /// Fill `capacity` dead slots, building each item with `make`
    pub fn fill(capacity: usize, mut make: impl FnMut() -> T) -> Self {
        match Self::try_fill(capacity, || Ok::<T, Infallible>(make())) {
            Ok(pool) => pool,
            Err(never) => match never {},
        }
    }

    /// Like `fill`, stopping at the first item `make` fails to build
    pub fn try_fill<E>(capacity: usize, mut make: impl FnMut() -> Result<T, E>) -> Result<Self, E> {
        let slots = (0..capacity)
            .map(|_| Ok(Slot { item: make()?, alive: false }))
            .collect::<Result<Vec<_>, E>>()?;
        // Reversed so sequential revives hand out slot 0 first
        let free = (0..capacity).rev().collect();
        Ok(Self { slots, free })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn count_dead(&self) -> usize {
        self.free.len()
    }

    pub fn count_alive(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_alive(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.alive)
    }

    /// Revive the next dead slot in free-list order
    pub fn revive_next(&mut self) -> Option<usize> {
        let index = self.free.pop()?;
        self.slots[index].alive = true;
        Some(index)
    }

    /// Revive a uniformly random dead slot. None when every slot is alive.
    pub fn revive_random(&mut self, rng: &mut impl Rng) -> Option<usize> {
        if self.free.is_empty() {
            return None;
        }
        let pick = rng.random_range(0..self.free.len());
        let index = self.free.swap_remove(pick);
        self.slots[index].alive = true;
        Some(index)
    }

    /// Kill a live slot. Returns false if it was already dead.
    pub fn kill(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.alive => {
                slot.alive = false;
                self.free.push(index);
                true
            }
            _ => false,
        }
    }

    /// Kill every live slot
    pub fn kill_all(&mut self) {
        for index in 0..self.slots.len() {
            self.kill(index);
        }
    }

    /// Access a slot regardless of liveness
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).map(|s| &s.item)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).map(|s| &mut s.item)
    }

    /// Live items with their slot index, in slot order
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.alive)
            .map(|(i, s)| (i, &s.item))
    }

    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.alive)
            .map(|(i, s)| (i, &mut s.item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_fill_starts_dead() {
        let pool = Pool::fill(40, || 0u32);
        assert_eq!(pool.capacity(), 40);
        assert_eq!(pool.count_dead(), 40);
        assert_eq!(pool.count_alive(), 0);
        assert_eq!(pool.iter_alive().count(), 0);
    }

    #[test]
    fn test_try_fill_propagates_error() {
        let mut built = 0;
        let result: Result<Pool<u32>, &str> = Pool::try_fill(5, || {
            built += 1;
            if built == 3 { Err("bad item") } else { Ok(built) }
        });
        assert_eq!(result.err(), Some("bad item"));
        assert_eq!(built, 3);
    }

    #[test]
    fn test_revive_next_in_order() {
        let mut pool = Pool::fill(3, || ());
        assert_eq!(pool.revive_next(), Some(0));
        assert_eq!(pool.revive_next(), Some(1));
        assert_eq!(pool.revive_next(), Some(2));
        assert_eq!(pool.revive_next(), None);
    }

    #[test]
    fn test_revive_random_exhausts_then_skips() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = Pool::fill(5, || ());
        let mut revived: Vec<usize> = (0..5).filter_map(|_| pool.revive_random(&mut rng)).collect();
        revived.sort_unstable();
        assert_eq!(revived, vec![0, 1, 2, 3, 4]);
        assert_eq!(pool.revive_random(&mut rng), None);
        assert_eq!(pool.count_alive(), 5);
    }

    #[test]
    fn test_single_dead_slot_is_always_chosen() {
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pool = Pool::fill(4, || ());
            for _ in 0..4 {
                pool.revive_next();
            }
            pool.kill(2);
            assert_eq!(pool.count_dead(), 1);
            assert_eq!(pool.revive_random(&mut rng), Some(2));
        }
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut pool = Pool::fill(2, || ());
        let i = pool.revive_next().unwrap();
        assert!(pool.kill(i));
        assert!(!pool.kill(i));
        assert!(!pool.kill(99));
        assert_eq!(pool.count_dead(), 2);
    }

    #[test]
    fn test_kill_all() {
        let mut pool = Pool::fill(3, || ());
        pool.revive_next();
        pool.revive_next();
        pool.kill_all();
        assert_eq!(pool.count_alive(), 0);
        assert_eq!(pool.count_dead(), 3);
    }
}
