pub mod client;
pub mod models;
pub mod prompt;

pub use client::{GeminiClient, InstructionSource, ProxyInstructionClient};
pub use prompt::build_prompt;
