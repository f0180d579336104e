// file: src/corpus/mod.rs
// description: unstructured market corpus: generation, discovery and chunking
// reference: internal module structure

pub mod chunker;
pub mod generator;
pub mod scanner;

pub use chunker::Chunker;
pub use generator::CorpusGenerator;
pub use scanner::CorpusScanner;
