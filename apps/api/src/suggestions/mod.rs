// Per-section suggestion generation: applicability, prompts, generators and fan-out.

pub mod applicability;
pub mod context;
pub mod generator;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod service;
pub mod tone;
pub mod types;
