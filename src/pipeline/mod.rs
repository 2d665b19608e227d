mod fsm;
mod runner;

pub use fsm::{RequestEvent, RequestState, RequestStateMachine};
pub use runner::{Pipeline, PipelineResult};
