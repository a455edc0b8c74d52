use crate::types::AmmoType;
use crew_parser::LexiconError;
use thiserror::Error;

/// Errors building the crew control stack
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("metrics init error: {0}")]
    Metrics(#[from] prometheus::Error),
}

/// Why a crew station declined a command. Rejections never change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandRejected {
    #[error("no designated point to aim at")]
    NoDesignatedPoint,

    #[error("gun is not loaded")]
    NotLoaded,

    #[error("reload in progress")]
    Reloading,

    #[error("{0} already in the breech")]
    AlreadyLoaded(AmmoType),

    #[error("no ammunition type selected")]
    NoAmmoSelected,

    #[error("{0} is not handled by this station")]
    Unhandled(&'static str),
}

impl CommandRejected {
    /// Stable label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoDesignatedPoint => "no_designated_point",
            Self::NotLoaded => "not_loaded",
            Self::Reloading => "reloading",
            Self::AlreadyLoaded(_) => "already_loaded",
            Self::NoAmmoSelected => "no_ammo_selected",
            Self::Unhandled(_) => "unhandled",
        }
    }
}

pub type Result<T, E = ControlError> = core::result::Result<T, E>;
