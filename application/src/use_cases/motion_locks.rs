//! Per-motion serialisation
//!
//! Ballot acceptance, closing and consolidation of the same motion run one
//! at a time; different motions proceed in parallel.

use assembly_domain::MotionId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

#[derive(Debug, Clone, Default)]
pub struct MotionLocks {
    inner: Arc<Mutex<HashMap<MotionId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl MotionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `motion`; released when the guard drops.
    ///
    /// Slots nobody holds or waits on are pruned here, so the map only
    /// grows with the number of motions in flight.
    pub async fn lock(&self, motion: MotionId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.retain(|id, slot| *id == motion || Arc::strong_count(slot) > 1);
            map.entry(motion).or_default().clone()
        };
        slot.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.inner.lock().map(|map| map.len()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_motion_is_exclusive() {
        let locks = MotionLocks::new();
        let guard = locks.lock(MotionId::new(1)).await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _g = contender.lock(MotionId::new(1)).await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        drop(guard);
        waiting.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_motions_do_not_block() {
        let locks = MotionLocks::new();
        let _a = locks.lock(MotionId::new(1)).await;
        let b = tokio::time::timeout(Duration::from_secs(1), locks.lock(MotionId::new(2))).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_idle_slots_are_pruned() {
        let locks = MotionLocks::new();
        for id in 1..=5 {
            drop(locks.lock(MotionId::new(id)).await);
        }
        assert_eq!(locks.tracked(), 1);

        let held = locks.lock(MotionId::new(6)).await;
        let _other = locks.lock(MotionId::new(7)).await;
        assert_eq!(locks.tracked(), 2);
        drop(held);
    }
}
