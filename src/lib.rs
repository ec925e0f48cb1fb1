pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Body, InvalidIndex, NVec3, NonPositiveMass, System};
pub use simulation::forces::{
    mass_focus, mass_focus_excluding, momentum, newton_force, total_mass, ForceError,
    MassFocusGravity, G_CONSTANT,
};
pub use simulation::integrator::{next_position, next_velocity};
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::scheduler::{
    partition, BodyUpdate, ChunkJob, ChunkOutcome, StepScheduler, TickError, TickSnapshot,
};
pub use simulation::worker::{compute_chunk, WorkerPool};
pub use simulation::snapshot::{ControlMessage, Frame, SnapshotPublisher};
pub use simulation::scenario::{Scenario, SimulationError};

pub use configuration::config::{
    BodyConfig, ConfigError, EngineConfig, GalaxyConfig, ParametersConfig, ScenarioConfig,
    SnapshotConfig,
};

pub use benchmark::benchmark::{bench_forces, bench_tick};
