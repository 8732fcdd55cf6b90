pub mod events;
pub mod snapshot;
pub mod tick;
pub mod world;

pub use events::SimulationEvent;
pub use snapshot::ColonySnapshot;
pub use tick::{run_simulation_tick, run_ticks};
pub use world::{Colony, PlacementReport};
