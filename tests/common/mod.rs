/// Shared mock LLM, search and agent factory implementations.
pub mod mocks;
