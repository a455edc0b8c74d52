//! Per-role FIFO command queues shared between transcript intake and the
//! dispatch loop.

use crate::metrics::CrewMetrics;
use crew_parser::{CrewParser, CrewRole, ParsedCommand};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

type Queue = Arc<Mutex<VecDeque<ParsedCommand>>>;

/// One FIFO per crew role. Clones share the same queues.
#[derive(Clone, Default)]
pub struct RoleQueues {
    driver: Queue,
    gunner: Queue,
    loader: Queue,
}

impl RoleQueues {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, role: CrewRole) -> &Queue {
        match role {
            CrewRole::Driver => &self.driver,
            CrewRole::Gunner => &self.gunner,
            CrewRole::Loader => &self.loader,
        }
    }

    /// Append commands to `role`'s queue as one batch.
    pub fn extend(&self, role: CrewRole, commands: impl IntoIterator<Item = ParsedCommand>) {
        self.queue(role).lock().extend(commands);
    }

    pub fn push(&self, command: ParsedCommand) {
        self.queue(command.role()).lock().push_back(command);
    }

    pub fn pop(&self, role: CrewRole) -> Option<ParsedCommand> {
        self.queue(role).lock().pop_front()
    }

    pub fn len(&self, role: CrewRole) -> usize {
        self.queue(role).lock().len()
    }

    /// True when every role's queue is empty.
    pub fn is_empty(&self) -> bool {
        CrewRole::DISPATCH_ORDER
            .iter()
            .all(|role| self.queue(*role).lock().is_empty())
    }

    /// Copy of `role`'s pending commands, head first.
    pub fn pending(&self, role: CrewRole) -> Vec<ParsedCommand> {
        self.queue(role).lock().iter().copied().collect()
    }

    pub fn clear(&self) {
        for role in CrewRole::DISPATCH_ORDER {
            self.queue(role).lock().clear();
        }
    }
}

/// Producer handle: parses transcripts and feeds the role queues. Cheap to
/// clone and safe to use from another thread than the dispatcher's.
#[derive(Clone)]
pub struct CommandIntake {
    parser: Arc<CrewParser>,
    queues: RoleQueues,
    metrics: Option<CrewMetrics>,
}

impl CommandIntake {
    pub fn new(parser: Arc<CrewParser>, queues: RoleQueues) -> Self {
        Self {
            parser,
            queues,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: CrewMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn queues(&self) -> &RoleQueues {
        &self.queues
    }

    /// Parse a recognizer transcript and queue its commands. Returns how many
    /// commands were queued.
    pub fn enqueue_from_stt(&self, transcript: &str) -> usize {
        let parsed = self.parser.parse(transcript);
        if parsed.is_empty() {
            tracing::debug!("[Parse] nothing actionable in {:?}", transcript);
            return 0;
        }

        let mut total = 0;
        for (role, commands) in parsed {
            let listing = commands
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            tracing::info!("[Parse] {} => {}", role, listing);

            let count = commands.len();
            self.queues.extend(role, commands);
            if let Some(metrics) = &self.metrics {
                metrics.record_enqueued(role, count);
            }
            total += count;
        }
        total
    }
}
