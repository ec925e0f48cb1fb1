//! Snapshot frames for the downstream renderer, and the control channel back
//!
//! One frame per tick: an `(x, y, z, radius)` row per body, everything
//! divided by the configured reference distance so the consumer receives
//! normalized rather than absolute coordinates. The consumer can stop the
//! run at any time with [`ControlMessage::Stop`]; the token is only honored
//! between ticks, never mid-tick.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::simulation::states::System;

/// Message from the snapshot consumer back to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Stop producing snapshots and shut down cleanly
    Stop,
}

/// One tick's worth of renderer input
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Simulation time the frame was taken at
    pub t: f64,
    /// Per body: x, y, z, radius, all divided by the reference distance
    pub bodies: Vec<[f64; 4]>,
}

/// Packages post-step state and watches for the termination token
pub struct SnapshotPublisher {
    frames: Sender<Frame>,
    control: Receiver<ControlMessage>,
    inv_scale: f64,
}

impl SnapshotPublisher {
    /// Publisher normalizing by `reference_distance` (positivity is enforced
    /// by configuration validation)
    pub fn new(
        frames: Sender<Frame>,
        control: Receiver<ControlMessage>,
        reference_distance: f64,
    ) -> Self {
        Self {
            frames,
            control,
            inv_scale: 1.0 / reference_distance,
        }
    }

    /// Non-blocking check for the termination token
    ///
    /// A disconnected consumer counts as a stop request: nobody is left to
    /// watch the frames
    pub fn stop_requested(&self) -> bool {
        match self.control.try_recv() {
            Ok(ControlMessage::Stop) => true,
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => true,
        }
    }

    /// Emit the current state; returns false once the consumer is gone
    pub fn publish(&self, sys: &System) -> bool {
        let bodies = sys
            .bodies
            .iter()
            .map(|b| {
                [
                    b.x.x * self.inv_scale,
                    b.x.y * self.inv_scale,
                    b.x.z * self.inv_scale,
                    b.radius * self.inv_scale,
                ]
            })
            .collect();
        self.frames.send(Frame { t: sys.t, bodies }).is_ok()
    }
}
