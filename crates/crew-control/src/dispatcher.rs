//! Per-tick dispatcher: drains at most one command per role, then advances
//! the gunner and loader.

use crate::config::CrewConfig;
use crate::error::{CommandRejected, Result};
use crate::gunner::GunnerController;
use crate::loader::LoaderController;
use crate::metrics::CrewMetrics;
use crate::queues::{CommandIntake, RoleQueues};
use crate::traits::{DesignationSource, DriveTrain, FireEffect, TurretRig};
use crate::types::{AmmoType, GunnerState, LoaderState};
use crew_parser::{
    CommandKind, CrewParser, CrewRole, GunnerCommand, LoaderCommand, ParsedCommand,
};
use std::sync::Arc;
use std::time::Duration;

/// World-facing collaborators the crew acts through
pub struct Collaborators {
    pub designation: Box<dyn DesignationSource>,
    pub rig: Box<dyn TurretRig>,
    pub fire_effect: Box<dyn FireEffect>,
    pub drive: Box<dyn DriveTrain>,
}

/// What happened to one dequeued command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchOutcome {
    pub role: CrewRole,
    pub command: ParsedCommand,
    pub result: std::result::Result<(), CommandRejected>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Executed commands in dispatch order
    pub outcomes: Vec<DispatchOutcome>,
    /// Set when a reload finished during this tick
    pub reload_completed: Option<AmmoType>,
}

pub struct Dispatcher {
    intake: CommandIntake,
    gunner: GunnerController,
    loader: LoaderController,
    drive: Box<dyn DriveTrain>,
    metrics: CrewMetrics,
}

impl Dispatcher {
    pub fn new(config: CrewConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;
        let CrewConfig {
            lexicon,
            gunner,
            loader,
        } = config;

        let metrics = CrewMetrics::new()?;
        let parser = Arc::new(CrewParser::new(lexicon)?);
        let intake = CommandIntake::new(parser, RoleQueues::new()).with_metrics(metrics.clone());

        let Collaborators {
            designation,
            rig,
            fire_effect,
            drive,
        } = collaborators;

        tracing::info!("Crew dispatcher ready");
        Ok(Self {
            intake,
            gunner: GunnerController::new(gunner, rig, designation, fire_effect)?,
            loader: LoaderController::new(loader),
            drive,
            metrics,
        })
    }

    /// Producer handle for transcripts arriving off the dispatch thread.
    pub fn intake(&self) -> CommandIntake {
        self.intake.clone()
    }

    pub fn queues(&self) -> &RoleQueues {
        self.intake.queues()
    }

    pub fn metrics(&self) -> &CrewMetrics {
        &self.metrics
    }

    pub fn enqueue_from_stt(&self, transcript: &str) -> usize {
        self.intake.enqueue_from_stt(transcript)
    }

    pub fn gunner(&self) -> &GunnerController {
        &self.gunner
    }

    pub fn gunner_mut(&mut self) -> &mut GunnerController {
        &mut self.gunner
    }

    pub fn loader(&self) -> &LoaderController {
        &self.loader
    }

    pub fn gunner_state(&self) -> GunnerState {
        self.gunner.state()
    }

    pub fn loader_state(&self) -> LoaderState {
        self.loader.state()
    }

    /// Pop and execute the head of each role queue, driver then loader then
    /// gunner.
    pub fn dispatch(&mut self) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::new();
        for role in CrewRole::DISPATCH_ORDER {
            let Some(command) = self.queues().pop(role) else {
                continue;
            };
            tracing::debug!("[Exec][{}] {}", role, command);

            let result = self.execute(command);
            match &result {
                Ok(()) => self.metrics.record_dispatched(role),
                Err(reason) => {
                    tracing::warn!("[{}] {} rejected: {}", role, command, reason);
                    self.metrics.record_rejected(role, reason.reason());
                }
            }
            outcomes.push(DispatchOutcome {
                role,
                command,
                result,
            });
        }
        outcomes
    }

    /// One frame: dispatch, then advance the loader and gunner by `dt`.
    pub fn tick(&mut self, dt: Duration) -> TickReport {
        let outcomes = self.dispatch();

        let reload_completed = self.loader.tick(dt);
        if reload_completed.is_some() {
            self.metrics.reloads_completed.inc();
        }
        self.gunner.tick(dt);

        for role in CrewRole::DISPATCH_ORDER {
            self.metrics.set_queue_depth(role, self.queues().len(role));
        }

        TickReport {
            outcomes,
            reload_completed,
        }
    }

    fn execute(&mut self, command: ParsedCommand) -> std::result::Result<(), CommandRejected> {
        match command.kind {
            CommandKind::Driver(order) => {
                self.drive.execute(order, command.intensity);
                Ok(())
            }
            CommandKind::Loader(order) => self.execute_loader(order),
            CommandKind::Gunner(order) => self.execute_gunner(order),
        }
    }

    fn execute_loader(&mut self, order: LoaderCommand) -> std::result::Result<(), CommandRejected> {
        match order {
            LoaderCommand::LoadAp => self.loader.load(AmmoType::Ap),
            LoaderCommand::LoadHe => self.loader.load(AmmoType::He),
            LoaderCommand::LoadDefault => self.loader.load_default(),
            LoaderCommand::CeaseAction => {
                self.loader.cease_action();
                Ok(())
            }
        }
    }

    fn execute_gunner(&mut self, order: GunnerCommand) -> std::result::Result<(), CommandRejected> {
        match order {
            GunnerCommand::SetRange { meters } => {
                self.gunner.set_range(meters);
                Ok(())
            }
            GunnerCommand::CeaseAction => {
                self.gunner.cease_action();
                Ok(())
            }
            GunnerCommand::AlignHull => {
                self.gunner.align_hull();
                Ok(())
            }
            GunnerCommand::AimAt => self.gunner.aim(),
            GunnerCommand::TrackTarget => Err(CommandRejected::Unhandled("TrackTarget")),
            GunnerCommand::Fire => {
                self.gunner.fire(&mut self.loader)?;
                self.metrics.rounds_fired.inc();
                Ok(())
            }
        }
    }
}
