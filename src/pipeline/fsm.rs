use crate::{Error, Result};
use tracing::{debug, info, warn};

/// Per-request pipeline states.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Received,
    Extracting,
    Generating,
    Completed,
    Failed,
}

/// Events driving a request through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestEvent {
    StartExtraction,
    ExtractionSucceeded,
    GenerationSucceeded,
    StageFailed,
}

/// Strictly sequential request lifecycle: extraction runs before generation,
/// and a stage failure short-circuits straight to Failed. No retries from
/// any state.
pub struct RequestStateMachine {
    state: RequestState,
}

impl RequestStateMachine {
    pub fn new() -> Self {
        Self {
            state: RequestState::Received,
        }
    }

    pub fn current_state(&self) -> &RequestState {
        &self.state
    }

    pub fn transition(&mut self, event: RequestEvent) -> Result<()> {
        let old_state = self.state.clone();

        let new_state = match (&self.state, &event) {
            (RequestState::Received, RequestEvent::StartExtraction) => RequestState::Extracting,
            (RequestState::Extracting, RequestEvent::ExtractionSucceeded) => {
                RequestState::Generating
            }
            (RequestState::Generating, RequestEvent::GenerationSucceeded) => {
                RequestState::Completed
            }
            (RequestState::Extracting, RequestEvent::StageFailed) => RequestState::Failed,
            (RequestState::Generating, RequestEvent::StageFailed) => RequestState::Failed,
            _ => {
                warn!(
                    "Invalid pipeline transition from {:?} with event {:?}",
                    self.state, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{:?}", self.state),
                    requested: format!("{:?}", event),
                });
            }
        };

        if old_state != new_state {
            info!(
                "Pipeline state transition: {:?} -> {:?} (event: {:?})",
                old_state, new_state, event
            );
        } else {
            debug!(
                "Pipeline staying in state {:?} after event {:?}",
                old_state, event
            );
        }

        self.state = new_state;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, RequestState::Completed | RequestState::Failed)
    }
}

impl Default for RequestStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
