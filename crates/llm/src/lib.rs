pub mod fence;
pub mod generation;
pub mod prompts;
pub mod provider;
pub mod providers;

pub use fence::{detect_fence, fence_body, parse_quiz, strip_fence, FenceKind, ValidationError};
pub use generation::{Categories, Category, GenerationClient, DEFAULT_MAX_KEY_POINTS};
pub use provider::{LlmError, LlmProvider};
pub use providers::{create_provider, gemini::GeminiProvider};
