pub mod client;
pub mod completion;
pub mod types;

pub use completion::{CompletionBackend, CompletionError, CompletionRequest, OpenAiCompletion};
