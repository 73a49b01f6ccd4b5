//! Canonical point list shared between ingestion, rendering and export.
//!
//! Readers take a [`snapshot`](SceneStore::snapshot): an `Arc` of the list at
//! that moment. Writers never mutate a list a reader can see; when a snapshot
//! is outstanding the list is cloned before the change (copy-on-write).

use crate::types::{Point, PointSequence};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Receiver of ingested point batches.
pub trait PointSink: Send + Sync {
    /// Append `batch` in order as one mutation.
    fn append_points(&self, batch: Vec<Point>);
}

/// Thread-safe owner of the scene's points.
#[derive(Debug, Default)]
pub struct SceneStore {
    points: RwLock<Arc<PointSequence>>,
    revision: AtomicU64,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_points(points: PointSequence) -> Self {
        Self {
            points: RwLock::new(Arc::new(points)),
            revision: AtomicU64::new(0),
        }
    }

    /// Immutable view of the current list.
    pub fn snapshot(&self) -> Arc<PointSequence> {
        let guard = self.points.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Append points in order. An empty batch is not a mutation.
    pub fn append(&self, batch: &[Point]) {
        if batch.is_empty() {
            return;
        }
        let mut guard = self.points.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut guard).extend_from_slice(batch);
        let total = guard.len();
        drop(guard);
        self.bump();
        tracing::debug!(appended = batch.len(), total, "scene append");
    }

    pub fn replace_all(&self, points: PointSequence) {
        let mut guard = self.points.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(points);
        drop(guard);
        self.bump();
    }

    pub fn clear(&self) {
        self.replace_all(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.points
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of mutations so far; renderers compare it to skip redraws.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }
}

impl PointSink for SceneStore {
    fn append_points(&self, batch: Vec<Point>) {
        self.append(&batch);
    }
}

impl<T: PointSink + ?Sized> PointSink for Arc<T> {
    fn append_points(&self, batch: Vec<Point>) {
        (**self).append_points(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_append_preserves_order() {
        let store = SceneStore::new();
        store.append(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
        store.append(&[Point::new(1.0, 1.0)]);
        let snap = store.snapshot();
        assert_eq!(
            *snap,
            vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0), Point::new(1.0, 1.0)]
        );
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_writes() {
        let store = SceneStore::with_points(vec![Point::new(0.0, 0.0)]);
        let before = store.snapshot();
        store.append(&[Point::new(5.0, 5.0)]);
        store.clear();
        assert_eq!(before.len(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_append_is_noop() {
        let store = SceneStore::new();
        store.append(&[]);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_concurrent_readers_see_whole_batches() {
        let store = Arc::new(SceneStore::new());
        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..200 {
                    let batch = vec![Point::new(i as f64, 0.0); 10];
                    store.append_points(batch);
                }
            })
        };
        for _ in 0..200 {
            assert_eq!(store.snapshot().len() % 10, 0);
        }
        writer.join().unwrap();
        assert_eq!(store.len(), 2000);
    }
}
