// file: src/corpus/scanner.rs
// description: corpus directory walking and document loading
// reference: https://docs.rs/walkdir

use crate::error::{AdvisorError, Result};
use crate::models::SourceDocument;
use crate::parser::MarkdownParser;
use crate::utils::Validator;
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const CORPUS_EXTENSIONS: &[&str] = &["txt", "md", "pdf"];

pub struct CorpusScanner {
    parser: MarkdownParser,
}

impl CorpusScanner {
    pub fn new() -> Self {
        Self {
            parser: MarkdownParser::new(),
        }
    }

    pub fn scan_directory(&self, root: &Path) -> Result<Vec<SourceDocument>> {
        Validator::validate_directory(root)?;
        info!("Scanning corpus directory: {}", root.display());

        let mut documents = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !CORPUS_EXTENSIONS.contains(&extension) {
                debug!("Skipping non-corpus file: {}", path.display());
                continue;
            }

            let text = match extension {
                "pdf" => match extract_pdf_text(path) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Skipping unreadable PDF {}: {}", path.display(), e);
                        continue;
                    }
                },
                "md" => self.parser.to_plain_text(&read_text(path)?),
                _ => read_text(path)?.trim().to_string(),
            };

            if text.is_empty() {
                debug!("Skipping empty document: {}", path.display());
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            let city = city_from_path(relative).or_else(|| city_from_header(&text));

            debug!("Loaded {} (city: {:?})", relative.display(), city);
            documents.push(SourceDocument {
                city,
                source: relative.to_string_lossy().replace('\\', "/"),
                text,
            });
        }

        info!("Found {} corpus documents", documents.len());
        Ok(documents)
    }
}

impl Default for CorpusScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| AdvisorError::file(path, e))
}

/// Text layer only; scanned images yield an empty string.
fn extract_pdf_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| AdvisorError::file(path, e))?;
    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| AdvisorError::Pdf(format!("text extraction failed: {}", e)))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// First directory component of a nested relative path.
fn city_from_path(relative: &Path) -> Option<String> {
    let mut components = relative.components();
    let first = components.next()?;
    components.next()?;

    match first {
        Component::Normal(name) => Some(name.to_string_lossy().to_string()),
        _ => None,
    }
}

fn city_from_header(text: &str) -> Option<String> {
    text.lines()
        .take_while(|line| !line.trim().is_empty())
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case("city").then(|| value.trim().to_string())
        })
        .filter(|city| !city.is_empty())
}
