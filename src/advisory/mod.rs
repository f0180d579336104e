// file: src/advisory/mod.rs
// description: advisory report generation: prompt, llm call and pdf rendering
// reference: internal module structure

pub mod llm;
pub mod pdf;
pub mod prompt;

pub use llm::LlmClient;
pub use pdf::PdfRenderer;
pub use prompt::build_llm_prompt;
