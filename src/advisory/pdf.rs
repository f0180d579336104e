// file: src/advisory/pdf.rs
// description: renders the advisory narrative to a US-letter PDF
// reference: https://docs.rs/printpdf

use crate::error::{AdvisorError, Result};
use lazy_static::lazy_static;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::info;

const PAGE_WIDTH: Mm = Mm(215.9);
const PAGE_HEIGHT: Mm = Mm(279.4);
const MARGIN_MM: f32 = 25.4;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const HEADING_LEADING_MM: f32 = 8.0;
const BODY_LEADING_MM: f32 = 5.5;
const SPACER_MM: f32 = 3.5;
/// Helvetica at 11pt across a 6.5in text column.
const WRAP_CHARS: usize = 88;
/// Helvetica-Bold at 14pt across the same column; longer headings wrap.
const HEADING_WRAP_CHARS: usize = 66;

lazy_static! {
    static ref NUMBERED_TITLE: Regex = Regex::new(r"^\d{1,2}[.)]\s+\S").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(Vec<String>),
    Body(Vec<String>),
    Space,
}

pub struct PdfRenderer {
    title: String,
}

impl PdfRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn render_to_file(&self, text: &str, path: &Path) -> Result<()> {
        let bytes = self.render(text)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AdvisorError::file(parent, e))?;
        }
        fs::write(path, bytes).map_err(|e| AdvisorError::file(path, e))?;

        info!("Wrote PDF report to {}", path.display());
        Ok(())
    }

    pub fn render(&self, text: &str) -> Result<Vec<u8>> {
        let (doc, page, layer) =
            PdfDocument::new(self.title.as_str(), PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        let regular = add_font(&doc, BuiltinFont::Helvetica)?;
        let bold = add_font(&doc, BuiltinFont::HelveticaBold)?;

        {
            let mut cursor = PageCursor {
                doc: &doc,
                layer: doc.get_page(page).get_layer(layer),
                y: PAGE_HEIGHT.0 - MARGIN_MM,
            };

            for block in layout(text) {
                match block {
                    Block::Heading(lines) => {
                        cursor.ensure_room(HEADING_LEADING_MM + BODY_LEADING_MM);
                        for line in lines {
                            cursor.ensure_room(HEADING_LEADING_MM);
                            cursor.write_line(&line, HEADING_SIZE, &bold, HEADING_LEADING_MM);
                        }
                    }
                    Block::Body(lines) => {
                        for line in lines {
                            cursor.ensure_room(BODY_LEADING_MM);
                            cursor.write_line(&line, BODY_SIZE, &regular, BODY_LEADING_MM);
                        }
                    }
                    Block::Space => cursor.y -= SPACER_MM,
                }
            }
        }

        doc.save_to_bytes()
            .map_err(|e| AdvisorError::Pdf(format!("Failed to serialize PDF: {}", e)))
    }
}

struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PageCursor<'_> {
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < MARGIN_MM {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT.0 - MARGIN_MM;
        }
    }

    fn write_line(&mut self, text: &str, size: f32, font: &IndirectFontRef, leading: f32) {
        self.y -= leading;
        self.layer.use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
    }
}

fn add_font(doc: &PdfDocumentReference, font: BuiltinFont) -> Result<IndirectFontRef> {
    doc.add_builtin_font(font)
        .map_err(|e| AdvisorError::Pdf(format!("Failed to load builtin font: {}", e)))
}

/// `#` lines, a short first line and short numbered titles become headings;
/// blank lines become spacing; everything else is body text. Both wrap.
pub fn layout(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut seen_content = false;

    for raw in text.lines() {
        let line = sanitize(raw.trim());

        if line.is_empty() {
            if seen_content && blocks.last() != Some(&Block::Space) {
                blocks.push(Block::Space);
            }
            continue;
        }

        if let Some(heading) = line.strip_prefix('#') {
            let heading = heading.trim_start_matches('#').trim();
            blocks.push(Block::Heading(wrap(heading, HEADING_WRAP_CHARS)));
        } else if (!seen_content && line.len() <= HEADING_WRAP_CHARS) || is_numbered_title(&line) {
            blocks.push(Block::Heading(vec![line]));
        } else {
            blocks.push(Block::Body(wrap(&line, WRAP_CHARS)));
        }
        seen_content = true;
    }

    if blocks.last() == Some(&Block::Space) {
        blocks.pop();
    }
    blocks
}

fn is_numbered_title(line: &str) -> bool {
    line.len() <= HEADING_WRAP_CHARS && NUMBERED_TITLE.is_match(line) && !line.ends_with('.')
}

/// Builtin PDF fonts only cover WinAnsi; keep the output plain ASCII.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₹' => out.push_str("Rs."),
            '–' | '—' | '−' => out.push('-'),
            '‘' | '’' => out.push('\''),
            '“' | '”' => out.push('"'),
            '…' => out.push_str("..."),
            '•' => out.push('*'),
            '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn wrap(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
