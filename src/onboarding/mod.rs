pub mod capabilities;
pub mod links;
pub mod orchestrator;
pub mod types;

pub use orchestrator::Orchestrator;
