//! crew-control: role queues, dispatch loop and the gunner and loader
//! stations that act on parsed crew orders.

pub mod angles;

mod config;
pub use config::{load_crew_config, AmmoMultipliers, CrewConfig, GunnerConfig, LoaderConfig};

mod error;
pub use error::{CommandRejected, ControlError, Result};

mod types;
pub use types::{AmmoType, GunnerPhase, GunnerState, LoaderPhase, LoaderState, MuzzlePose};

mod traits;
pub use traits::{AmmoFeed, DesignationSource, DriveTrain, FireEffect, TurretRig};

mod gunner;
pub use gunner::GunnerController;

mod loader;
pub use loader::LoaderController;

mod queues;
pub use queues::{CommandIntake, RoleQueues};

mod metrics;
pub use metrics::CrewMetrics;

mod dispatcher;
pub use dispatcher::{Collaborators, DispatchOutcome, Dispatcher, TickReport};

#[cfg(feature = "mock")]
pub mod mock;

/// Initialize the crew control system
pub fn init() -> Result<()> {
    tracing::info!("Initializing crew control");
    crew_parser::init()?;
    Ok(())
}

/// Handles onto the simulated collaborators of a dispatcher built by
/// [`create_simulated_dispatcher`].
#[cfg(feature = "mock")]
#[derive(Clone)]
pub struct SimHandles {
    pub designation: mock::SharedDesignation,
    pub shots: mock::RecordingFireEffect,
}

/// Build a dispatcher wired to in-process collaborators: a kinematic turret
/// at the origin, a shared designation point, a recording fire effect and a
/// logging drive train.
#[cfg(feature = "mock")]
pub fn create_simulated_dispatcher(config: CrewConfig) -> Result<(Dispatcher, SimHandles)> {
    let designation = mock::SharedDesignation::new();
    let shots = mock::RecordingFireEffect::new();
    let dispatcher = Dispatcher::new(
        config,
        Collaborators {
            designation: Box::new(designation.clone()),
            rig: Box::new(mock::SimTurretRig::default()),
            fire_effect: Box::new(shots.clone()),
            drive: Box::new(mock::LoggingDriveTrain),
        },
    )?;
    Ok((dispatcher, SimHandles { designation, shots }))
}
