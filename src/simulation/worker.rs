//! Long-lived worker pool consuming chunk jobs and returning updated bodies
//!
//! Workers share one MPMC job receiver and one result sender. Each chunk is
//! computed from its read-only snapshot alone, so a worker holds no state
//! between jobs and every invocation is idempotent for the same descriptor.
//! A worker exits on its next queue poll after the job channel closes; a
//! chunk in flight always completes first.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::simulation::forces::MassFocusGravity;
use crate::simulation::integrator::{next_position, next_velocity};
use crate::simulation::scheduler::{BodyUpdate, ChunkJob, ChunkOutcome, TickError};

/// Compute one chunk: force model then integrator for every index in range
///
/// Stateless; the first force error aborts the chunk
pub fn compute_chunk(job: &ChunkJob, gravity: &MassFocusGravity) -> ChunkOutcome {
    let snap = &job.snapshot;
    let mut updates = Vec::with_capacity(job.range.len());
    for i in job.range.clone() {
        let a = gravity.acceleration(i, &snap.masses, &snap.positions)?;
        updates.push(BodyUpdate {
            index: i,
            x: next_position(snap.positions[i], snap.velocities[i], a, job.dt),
            v: next_velocity(snap.velocities[i], a, job.dt),
        });
    }
    Ok(updates)
}

fn worker_loop(
    id: usize,
    jobs: Receiver<ChunkJob>,
    results: Sender<ChunkOutcome>,
    gravity: MassFocusGravity,
) {
    log::debug!("worker {id} started");
    // recv fails once the coordinator closes the job queue
    while let Ok(job) = jobs.recv() {
        if results.send(compute_chunk(&job, &gravity)).is_err() {
            break; // coordinator is gone
        }
    }
    log::debug!("worker {id} exiting");
}

/// Fixed pool of worker threads connected by a job and a result queue
pub struct WorkerPool {
    job_tx: Sender<ChunkJob>,
    result_rx: Receiver<ChunkOutcome>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads computing with the given force model
    pub fn spawn(workers: usize, gravity: MassFocusGravity) -> io::Result<Self> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<ChunkJob>();
        let (result_tx, result_rx) = unbounded::<ChunkOutcome>();

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let gravity = gravity.clone();
            let handle = thread::Builder::new()
                .name(format!("sim-worker-{id}"))
                .spawn(move || worker_loop(id, jobs, results, gravity))?;
            handles.push(handle);
        }
        // result_tx is dropped here, so the result queue closes exactly when
        // the last worker does
        Ok(Self {
            job_tx,
            result_rx,
            handles,
        })
    }

    /// Number of worker threads
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Queue one chunk job
    pub fn submit(&self, job: ChunkJob) -> Result<(), TickError> {
        self.job_tx.send(job).map_err(|_| TickError::WorkerLost)
    }

    /// Block (cooperatively, no busy spin) for the next chunk outcome
    pub fn collect(&self) -> Result<ChunkOutcome, TickError> {
        self.result_rx.recv().map_err(|_| TickError::WorkerLost)
    }

    /// Close the job queue and join all workers
    pub fn shutdown(self) {
        drop(self.job_tx);
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}
