use crate::error::Result;
use crew_parser::CrewRole;
use prometheus::{
    Encoder, IntCounter, IntCounterVec, IntGaugeVec, Opts, Registry, TextEncoder,
};

/// Prometheus counters for the crew pipeline. Clones share the registry.
#[derive(Clone)]
pub struct CrewMetrics {
    pub registry: Registry,
    pub enqueued: IntCounterVec,
    pub dispatched: IntCounterVec,
    pub rejected: IntCounterVec,
    pub queue_depth: IntGaugeVec,
    pub rounds_fired: IntCounter,
    pub reloads_completed: IntCounter,
}

impl CrewMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let enqueued = IntCounterVec::new(
            Opts::new("crew_commands_enqueued", "Commands queued from transcripts"),
            &["role"],
        )?;
        let dispatched = IntCounterVec::new(
            Opts::new("crew_commands_dispatched", "Commands executed by a station"),
            &["role"],
        )?;
        let rejected = IntCounterVec::new(
            Opts::new("crew_commands_rejected", "Commands a station declined"),
            &["role", "reason"],
        )?;
        let queue_depth = IntGaugeVec::new(
            Opts::new("crew_queue_depth", "Commands waiting per role"),
            &["role"],
        )?;
        let rounds_fired = IntCounter::new("crew_rounds_fired", "Rounds fired by the gunner")?;
        let reloads_completed =
            IntCounter::new("crew_reloads_completed", "Rounds seated by the loader")?;

        registry.register(Box::new(enqueued.clone()))?;
        registry.register(Box::new(dispatched.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(queue_depth.clone()))?;
        registry.register(Box::new(rounds_fired.clone()))?;
        registry.register(Box::new(reloads_completed.clone()))?;

        Ok(Self {
            registry,
            enqueued,
            dispatched,
            rejected,
            queue_depth,
            rounds_fired,
            reloads_completed,
        })
    }

    pub fn record_enqueued(&self, role: CrewRole, count: usize) {
        self.enqueued
            .with_label_values(&[role.as_str()])
            .inc_by(count as u64);
    }

    pub fn record_dispatched(&self, role: CrewRole) {
        self.dispatched.with_label_values(&[role.as_str()]).inc();
    }

    pub fn record_rejected(&self, role: CrewRole, reason: &str) {
        self.rejected
            .with_label_values(&[role.as_str(), reason])
            .inc();
    }

    pub fn set_queue_depth(&self, role: CrewRole, depth: usize) {
        self.queue_depth
            .with_label_values(&[role.as_str()])
            .set(depth as i64);
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
