//! Command types produced by the crew grammar

use serde::{Deserialize, Serialize};
use std::fmt;

/// Crew position addressed by a segment of a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewRole {
    Driver,
    Gunner,
    Loader,
}

impl CrewRole {
    /// All roles in dispatch order.
    pub const DISPATCH_ORDER: [CrewRole; 3] = [CrewRole::Driver, CrewRole::Loader, CrewRole::Gunner];

    pub fn as_str(&self) -> &'static str {
        match self {
            CrewRole::Driver => "driver",
            CrewRole::Gunner => "gunner",
            CrewRole::Loader => "loader",
        }
    }
}

impl fmt::Display for CrewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative modifier scaling a driver movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Small,
    #[default]
    Normal,
    Large,
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intensity::Small => write!(f, "Small"),
            Intensity::Normal => write!(f, "Normal"),
            Intensity::Large => write!(f, "Large"),
        }
    }
}

/// Driver orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverCommand {
    MoveForward,
    MoveBackward,
    Stop,
    TurnLeft,
    TurnRight,
    PivotLeft,
    PivotRight,
}

/// Gunner orders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GunnerCommand {
    /// Set the engagement range in meters
    SetRange { meters: f32 },
    CeaseAction,
    AlignHull,
    AimAt,
    TrackTarget,
    Fire,
}

/// Loader orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoaderCommand {
    LoadAp,
    LoadHe,
    LoadDefault,
    CeaseAction,
}

/// Tagged command kind, one variant per crew role
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
    Driver(DriverCommand),
    Gunner(GunnerCommand),
    Loader(LoaderCommand),
}

impl CommandKind {
    /// Role whose queue this command belongs to
    pub fn role(&self) -> CrewRole {
        match self {
            CommandKind::Driver(_) => CrewRole::Driver,
            CommandKind::Gunner(_) => CrewRole::Gunner,
            CommandKind::Loader(_) => CrewRole::Loader,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CommandKind::Driver(cmd) => match cmd {
                DriverCommand::MoveForward => "MoveForward",
                DriverCommand::MoveBackward => "MoveBackward",
                DriverCommand::Stop => "Stop",
                DriverCommand::TurnLeft => "TurnLeft",
                DriverCommand::TurnRight => "TurnRight",
                DriverCommand::PivotLeft => "PivotLeft",
                DriverCommand::PivotRight => "PivotRight",
            },
            CommandKind::Gunner(cmd) => match cmd {
                GunnerCommand::SetRange { .. } => "SetRange",
                GunnerCommand::CeaseAction => "CeaseAction",
                GunnerCommand::AlignHull => "AlignHull",
                GunnerCommand::AimAt => "AimAt",
                GunnerCommand::TrackTarget => "TrackTarget",
                GunnerCommand::Fire => "Fire",
            },
            CommandKind::Loader(cmd) => match cmd {
                LoaderCommand::LoadAp => "LoadAP",
                LoaderCommand::LoadHe => "LoadHE",
                LoaderCommand::LoadDefault => "LoadDefault",
                LoaderCommand::CeaseAction => "CeaseAction",
            },
        }
    }
}

/// A single command extracted from a transcript segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    #[serde(default)]
    pub intensity: Intensity,
}

impl ParsedCommand {
    pub fn new(kind: CommandKind, intensity: Intensity) -> Self {
        Self { kind, intensity }
    }

    pub fn driver(cmd: DriverCommand, intensity: Intensity) -> Self {
        Self::new(CommandKind::Driver(cmd), intensity)
    }

    pub fn gunner(cmd: GunnerCommand) -> Self {
        Self::new(CommandKind::Gunner(cmd), Intensity::Normal)
    }

    pub fn loader(cmd: LoaderCommand) -> Self {
        Self::new(CommandKind::Loader(cmd), Intensity::Normal)
    }

    pub fn role(&self) -> CrewRole {
        self.kind.role()
    }

    /// Numeric parameter carried by the command, if any (range in meters)
    pub fn parameter(&self) -> Option<f32> {
        match self.kind {
            CommandKind::Gunner(GunnerCommand::SetRange { meters }) => Some(meters),
            _ => None,
        }
    }
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(meters) = self.parameter() {
            return write!(f, "{}({:.0}m)", self.kind.name(), meters);
        }
        match self.intensity {
            Intensity::Normal => f.write_str(self.kind.name()),
            other => write!(f, "{}({})", self.kind.name(), other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_hides_normal_intensity() {
        let cmd = ParsedCommand::driver(DriverCommand::MoveForward, Intensity::Normal);
        assert_eq!(cmd.to_string(), "MoveForward");

        let cmd = ParsedCommand::driver(DriverCommand::TurnLeft, Intensity::Large);
        assert_eq!(cmd.to_string(), "TurnLeft(Large)");
    }

    #[test]
    fn test_range_parameter() {
        let cmd = ParsedCommand::gunner(GunnerCommand::SetRange { meters: 1200.0 });
        assert_eq!(cmd.parameter(), Some(1200.0));
        assert_eq!(cmd.to_string(), "SetRange(1200m)");
        assert_eq!(cmd.role(), CrewRole::Gunner);

        let fire = ParsedCommand::gunner(GunnerCommand::Fire);
        assert_eq!(fire.parameter(), None);
    }

    #[test]
    fn test_loader_names() {
        assert_eq!(ParsedCommand::loader(LoaderCommand::LoadAp).to_string(), "LoadAP");
        assert_eq!(ParsedCommand::loader(LoaderCommand::LoadHe).to_string(), "LoadHE");
    }
}
