pub mod anthropic;
pub mod client;
pub mod gemini;
pub mod prompts;
pub mod validation;

pub use anthropic::*;
pub use client::*;
pub use gemini::*;
pub use prompts::*;
pub use validation::*;
