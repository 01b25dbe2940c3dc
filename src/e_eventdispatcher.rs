use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::e_aggregator::Aggregator;
use crate::e_types::Importance;

/// One build lifecycle event as delivered by the build engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BuildEvent {
    ProjectStarted {
        project: String,
    },
    ProjectFinished,
    Error {
        #[serde(default)]
        code: String,
        #[serde(default)]
        text: String,
        #[serde(default)]
        file: String,
        #[serde(default)]
        line: u32,
        #[serde(default)]
        column: u32,
    },
    Warning {
        #[serde(default)]
        code: String,
        #[serde(default)]
        text: String,
        #[serde(default)]
        file: String,
        #[serde(default)]
        line: u32,
        #[serde(default)]
        column: u32,
    },
    Message {
        #[serde(default)]
        text: String,
        importance: Importance,
    },
}

impl BuildEvent {
    /// Routes the event to the matching aggregator handler.
    pub fn apply(&self, aggregator: &mut Aggregator) {
        trace!("event: {:?}", self);
        match self {
            BuildEvent::ProjectStarted { project } => aggregator.on_project_started(project),
            BuildEvent::ProjectFinished => aggregator.on_project_finished(),
            BuildEvent::Error {
                code,
                text,
                file,
                line,
                column,
            } => aggregator.on_error(code, text, file, *line, *column),
            BuildEvent::Warning {
                code,
                text,
                file,
                line,
                column,
            } => aggregator.on_warning(code, text, file, *line, *column),
            BuildEvent::Message { text, importance } => aggregator.on_message(text, *importance),
        }
    }
}

/// Serializes events from any number of threads into a single aggregator.
#[derive(Clone, Debug)]
pub struct EventDispatcher {
    aggregator: Arc<Mutex<Aggregator>>,
}

impl EventDispatcher {
    pub fn new(aggregator: Aggregator) -> Self {
        EventDispatcher {
            aggregator: Arc::new(Mutex::new(aggregator)),
        }
    }

    /// Applies `event` while holding the aggregator lock.
    ///
    /// A poisoned lock is taken over: the panic that poisoned it already
    /// reported the broken event stream.
    pub fn dispatch(&self, event: &BuildEvent) {
        let mut aggregator = self
            .aggregator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        event.apply(&mut aggregator);
    }

    /// Dispatches every event received until all senders hang up.
    /// Returns the number of events handled.
    pub fn drain(&self, events: Receiver<BuildEvent>) -> usize {
        let mut handled = 0;
        for event in events {
            self.dispatch(&event);
            handled += 1;
        }
        handled
    }

    /// Recovers the aggregator, or gives the dispatcher back while other clones are alive.
    pub fn into_inner(self) -> Result<Aggregator, Self> {
        match Arc::try_unwrap(self.aggregator) {
            Ok(mutex) => Ok(mutex
                .into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner())),
            Err(aggregator) => Err(EventDispatcher { aggregator }),
        }
    }
}
