//! Loader station: timed reload of AP or HE rounds

use crate::config::LoaderConfig;
use crate::error::CommandRejected;
use crate::traits::AmmoFeed;
use crate::types::{AmmoType, LoaderPhase, LoaderState};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Breech {
    Idle,
    Loading {
        ammo: AmmoType,
        elapsed: f32,
        duration: f32,
    },
    Loaded(AmmoType),
}

#[derive(Debug, Clone)]
pub struct LoaderController {
    config: LoaderConfig,
    breech: Breech,
    last_selected: AmmoType,
    progress: f32,
}

impl LoaderController {
    pub fn new(config: LoaderConfig) -> Self {
        let last_selected = config.default_ammo;
        Self {
            config,
            breech: Breech::Idle,
            last_selected,
            progress: 0.0,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Start loading `ammo`. A reload already running is restarted with the
    /// new type; a loaded breech must be fired first.
    pub fn load(&mut self, ammo: AmmoType) -> Result<(), CommandRejected> {
        if ammo == AmmoType::None {
            return Err(CommandRejected::NoAmmoSelected);
        }
        self.last_selected = ammo;

        match self.breech {
            Breech::Loaded(current) => return Err(CommandRejected::AlreadyLoaded(current)),
            Breech::Loading { ammo: previous, .. } => {
                tracing::info!("[Loader] reload of {} cancelled, switching to {}", previous, ammo);
            }
            Breech::Idle => {}
        }

        let duration = self.config.reload_duration(ammo).max(0.0);
        self.breech = Breech::Loading {
            ammo,
            elapsed: 0.0,
            duration,
        };
        self.progress = 0.0;
        tracing::info!("[Loader] loading {} ({:.1}s)", ammo, duration);
        Ok(())
    }

    /// Load whatever type was selected last.
    pub fn load_default(&mut self) -> Result<(), CommandRejected> {
        self.load(self.last_selected)
    }

    /// Abort a reload in progress. A loaded round stays in the breech.
    pub fn cease_action(&mut self) {
        if let Breech::Loading { ammo, .. } = self.breech {
            self.breech = Breech::Idle;
            self.progress = 0.0;
            tracing::info!("[Loader] reload of {} ceased", ammo);
        }
    }

    /// Advance a reload. Returns the ammo type when the round seats.
    pub fn tick(&mut self, dt: Duration) -> Option<AmmoType> {
        let Breech::Loading {
            ammo,
            elapsed,
            duration,
        } = self.breech
        else {
            return None;
        };

        let elapsed = elapsed + dt.as_secs_f32();
        if elapsed >= duration {
            self.breech = Breech::Loaded(ammo);
            self.progress = 1.0;
            tracing::info!("[Loader] {} loaded", ammo);
            return Some(ammo);
        }

        self.breech = Breech::Loading {
            ammo,
            elapsed,
            duration,
        };
        self.progress = (elapsed / duration).clamp(self.progress, 1.0);
        None
    }

    pub fn phase(&self) -> LoaderPhase {
        match self.breech {
            Breech::Idle => LoaderPhase::Idle,
            Breech::Loading { .. } => LoaderPhase::Loading,
            Breech::Loaded(_) => LoaderPhase::Loaded,
        }
    }

    pub fn last_selected(&self) -> AmmoType {
        self.last_selected
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn state(&self) -> LoaderState {
        let (loaded_ammo, loading_ammo) = match self.breech {
            Breech::Idle => (AmmoType::None, AmmoType::None),
            Breech::Loading { ammo, .. } => (AmmoType::None, ammo),
            Breech::Loaded(ammo) => (ammo, AmmoType::None),
        };
        LoaderState {
            phase: self.phase(),
            loaded_ammo,
            loading_ammo,
            last_selected: self.last_selected,
            progress: self.progress,
        }
    }
}

impl AmmoFeed for LoaderController {
    fn is_loaded(&self) -> bool {
        matches!(self.breech, Breech::Loaded(_))
    }

    fn is_loading(&self) -> bool {
        matches!(self.breech, Breech::Loading { .. })
    }

    fn loaded_ammo(&self) -> AmmoType {
        match self.breech {
            Breech::Loaded(ammo) => ammo,
            _ => AmmoType::None,
        }
    }

    fn consume_round(&mut self) {
        if !self.is_loaded() {
            return;
        }
        self.breech = Breech::Idle;
        self.progress = 0.0;

        if self.config.auto_reload_after_fire {
            if let Err(e) = self.load_default() {
                tracing::warn!("[Loader] auto reload skipped: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    fn loaded(ammo: AmmoType) -> LoaderController {
        let mut loader = LoaderController::new(LoaderConfig::default());
        loader.load(ammo).unwrap();
        loader.tick(secs(10.0));
        loader
    }

    #[test]
    fn test_initial_state() {
        let loader = LoaderController::new(LoaderConfig::default());
        let state = loader.state();
        assert_eq!(state.phase, LoaderPhase::Idle);
        assert_eq!(state.loaded_ammo, AmmoType::None);
        assert_eq!(state.last_selected, AmmoType::Ap);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_reload_takes_configured_time() {
        let mut loader = LoaderController::new(LoaderConfig::default());
        loader.load(AmmoType::He).unwrap();
        assert!(loader.is_loading());

        assert_eq!(loader.tick(secs(4.0)), None);
        assert!((loader.progress() - 0.4).abs() < 1e-4);
        assert_eq!(loader.tick(secs(5.0)), None);
        assert!(loader.is_loading());

        assert_eq!(loader.tick(secs(1.5)), Some(AmmoType::He));
        assert_eq!(loader.state().loaded_ammo, AmmoType::He);
        assert_eq!(loader.progress(), 1.0);
    }

    #[test]
    fn test_multiplier_scales_duration() {
        let mut config = LoaderConfig::default();
        config.time_multiplier.he = 0.5;
        let mut loader = LoaderController::new(config);
        loader.load(AmmoType::He).unwrap();
        assert_eq!(loader.tick(secs(5.0)), Some(AmmoType::He));
    }

    #[test]
    fn test_zero_duration_seats_on_next_tick() {
        let config = LoaderConfig {
            reload_seconds: 0.0,
            ..LoaderConfig::default()
        };
        let mut loader = LoaderController::new(config);
        loader.load(AmmoType::Ap).unwrap();
        assert_eq!(loader.tick(Duration::ZERO), Some(AmmoType::Ap));
    }

    #[test]
    fn test_load_none_is_ignored() {
        let mut loader = LoaderController::new(LoaderConfig::default());
        assert_eq!(loader.load(AmmoType::None), Err(CommandRejected::NoAmmoSelected));
        assert_eq!(loader.phase(), LoaderPhase::Idle);
        assert_eq!(loader.last_selected(), AmmoType::Ap);
    }

    #[test]
    fn test_load_while_loaded_rejected_but_remembered() {
        let mut loader = loaded(AmmoType::Ap);
        assert_eq!(
            loader.load(AmmoType::He),
            Err(CommandRejected::AlreadyLoaded(AmmoType::Ap))
        );
        assert_eq!(loader.state().loaded_ammo, AmmoType::Ap);
        assert_eq!(loader.last_selected(), AmmoType::He);
    }

    #[test]
    fn test_load_while_loading_restarts() {
        let mut loader = LoaderController::new(LoaderConfig::default());
        loader.load(AmmoType::Ap).unwrap();
        loader.tick(secs(8.0));
        loader.load(AmmoType::He).unwrap();
        assert_eq!(loader.progress(), 0.0);
        assert_eq!(loader.state().loading_ammo, AmmoType::He);

        assert_eq!(loader.tick(secs(8.0)), None);
        assert_eq!(loader.tick(secs(2.0)), Some(AmmoType::He));
    }

    #[test]
    fn test_cease_action() {
        let mut loader = LoaderController::new(LoaderConfig::default());
        loader.load(AmmoType::Ap).unwrap();
        loader.tick(secs(3.0));
        loader.cease_action();
        assert_eq!(loader.phase(), LoaderPhase::Idle);
        assert_eq!(loader.progress(), 0.0);
        assert_eq!(loader.tick(secs(20.0)), None);

        let mut loader = loaded(AmmoType::He);
        loader.cease_action();
        assert_eq!(loader.state().loaded_ammo, AmmoType::He);
    }

    #[test]
    fn test_load_default_uses_last_selected() {
        let mut loader = LoaderController::new(LoaderConfig::default());
        loader.load(AmmoType::He).unwrap();
        loader.cease_action();
        loader.load_default().unwrap();
        assert_eq!(loader.state().loading_ammo, AmmoType::He);
    }

    #[test]
    fn test_consume_round_empties_breech() {
        let mut loader = loaded(AmmoType::Ap);
        loader.consume_round();
        assert_eq!(loader.phase(), LoaderPhase::Idle);
        assert_eq!(loader.loaded_ammo(), AmmoType::None);

        // nothing to consume
        loader.consume_round();
        assert_eq!(loader.phase(), LoaderPhase::Idle);
    }

    #[test]
    fn test_auto_reload_after_fire() {
        let config = LoaderConfig {
            auto_reload_after_fire: true,
            ..LoaderConfig::default()
        };
        let mut loader = LoaderController::new(config);
        loader.load(AmmoType::He).unwrap();
        loader.tick(secs(10.0));
        loader.consume_round();
        assert_eq!(loader.phase(), LoaderPhase::Loading);
        assert_eq!(loader.state().loading_ammo, AmmoType::He);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut loader = LoaderController::new(LoaderConfig::default());
        loader.load(AmmoType::Ap).unwrap();
        let mut last = 0.0;
        for _ in 0..40 {
            loader.tick(secs(0.3));
            let p = loader.progress();
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= last);
            last = p;
        }
        assert!(loader.is_loaded());
    }
}
