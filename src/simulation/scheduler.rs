//! Step scheduling: partition a tick's work into chunks, dispatch them to
//! the worker pool, and merge the results back into the system
//!
//! Per tick the scheduler runs Idle → Dispatching → AwaitingResults →
//! Merging → Idle. Workers never see the system itself, only an immutable
//! per-tick snapshot shared behind an `Arc`; the merge applies their
//! returned values and is all-or-nothing — a failed chunk fails the whole
//! tick and leaves the body store untouched.

use std::ops::Range;
use std::sync::Arc;

use thiserror::Error;

use crate::simulation::forces::ForceError;
use crate::simulation::states::{InvalidIndex, NVec3, System};
use crate::simulation::worker::WorkerPool;

/// Read-only copy of the per-body arrays a worker needs for one tick
#[derive(Debug, Clone)]
pub struct TickSnapshot {
    pub masses: Vec<f64>,
    pub positions: Vec<NVec3>,
    pub velocities: Vec<NVec3>,
}

impl TickSnapshot {
    /// Copy the current system state
    pub fn capture(sys: &System) -> Self {
        Self {
            masses: sys.bodies.iter().map(|b| b.m).collect(),
            positions: sys.bodies.iter().map(|b| b.x).collect(),
            velocities: sys.bodies.iter().map(|b| b.v).collect(),
        }
    }
}

/// One unit of work: a contiguous index range over a shared tick snapshot
#[derive(Debug, Clone)]
pub struct ChunkJob {
    pub range: Range<usize>,
    pub snapshot: Arc<TickSnapshot>,
    pub dt: f64,
}

/// Updated state for one body, produced by a worker
#[derive(Debug, Clone, Copy)]
pub struct BodyUpdate {
    pub index: usize,
    pub x: NVec3,
    pub v: NVec3,
}

/// What a worker reports back for one chunk
pub type ChunkOutcome = Result<Vec<BodyUpdate>, ForceError>;

/// Everything that can fail a tick
#[derive(Debug, Error)]
pub enum TickError {
    #[error("force model failed: {0}")]
    Force(#[from] ForceError),

    #[error("merge failed: {0}")]
    Store(#[from] InvalidIndex),

    /// Every worker is gone; the reference behavior would stall forever here
    #[error("worker pool disconnected before the tick completed")]
    WorkerLost,
}

/// Split `0..body_count` into at most `chunk_count` contiguous ranges
///
/// The ranges partition the index set exactly: no gaps, no overlaps, every
/// index in exactly one range. The split is near-even (the first
/// `body_count % chunk_count` ranges are one element longer) and empty
/// ranges are never produced
pub fn partition(body_count: usize, chunk_count: usize) -> Vec<Range<usize>> {
    if body_count == 0 {
        return Vec::new();
    }
    let chunk_count = chunk_count.clamp(1, body_count);
    let base = body_count / chunk_count;
    let extra = body_count % chunk_count;

    let mut ranges = Vec::with_capacity(chunk_count);
    let mut start = 0;
    for i in 0..chunk_count {
        let len = base + usize::from(i < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Drives one tick: dispatch, result barrier, merge
#[derive(Debug, Clone)]
pub struct StepScheduler {
    chunk_count: usize,
}

impl StepScheduler {
    /// Scheduler dispatching up to `chunk_count` chunks per tick
    pub fn new(chunk_count: usize) -> Self {
        Self {
            chunk_count: chunk_count.max(1),
        }
    }

    /// Advance the system by one tick of width `dt`
    ///
    /// Dispatches one job per chunk, blocks until every dispatched chunk has
    /// reported back, then merges. There is no partial-result timeout: a
    /// stalled worker stalls the tick
    pub fn step(&self, sys: &mut System, pool: &WorkerPool, dt: f64) -> Result<(), TickError> {
        let ranges = partition(sys.len(), self.chunk_count);

        // Dispatching
        let snapshot = Arc::new(TickSnapshot::capture(sys));
        for range in &ranges {
            pool.submit(ChunkJob {
                range: range.clone(),
                snapshot: Arc::clone(&snapshot),
                dt,
            })?;
        }

        // AwaitingResults: exactly one outcome per dispatched chunk. Keep
        // draining after a failure so no stale result leaks into a later tick
        let mut updates: Vec<BodyUpdate> = Vec::with_capacity(sys.len());
        let mut failure: Option<ForceError> = None;
        for _ in 0..ranges.len() {
            match pool.collect()? {
                Ok(mut chunk) => updates.append(&mut chunk),
                Err(err) => failure = Some(err),
            }
        }
        if let Some(err) = failure {
            return Err(TickError::Force(err));
        }

        // Merging: chunk index sets are disjoint, so order is irrelevant
        for update in updates {
            sys.apply_update(update.index, update.x, update.v)?;
        }
        sys.t += dt;
        Ok(())
    }
}
