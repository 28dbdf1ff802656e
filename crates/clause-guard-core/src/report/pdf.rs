//! Paginated PDF assembly for [`Report`](super::Report) values, built
//! directly from `lopdf` document primitives.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;
use tracing::debug;

use super::{Block, Report};

// A4 in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;

const TITLE_SIZE: f32 = 18.0;
const SECTION_SIZE: f32 = 14.0;
const SUBHEADING_SIZE: f32 = 11.0;
const BODY_SIZE: f32 = 10.0;
const LINE_HEIGHT: f32 = 14.0;

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Rough Helvetica advance width as a fraction of the font size, used to
/// budget characters per line without embedding font metrics.
const CHAR_WIDTH_FACTOR: f32 = 0.5;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode page content: {0}")]
    Content(#[from] std::io::Error),
    #[error("failed to assemble PDF document: {0}")]
    Document(#[from] lopdf::Error),
}

/// Render the report as a paginated A4 PDF. Each section starts on a fresh
/// page; long blocks flow across page breaks.
pub fn render_pdf(report: &Report) -> Result<Vec<u8>, RenderError> {
    let mut layout = Layout::new();

    layout.write_line(BOLD_FONT, TITLE_SIZE, MARGIN, &report.title);
    layout.advance(LINE_HEIGHT);

    for (index, section) in report.sections.iter().enumerate() {
        if index > 0 {
            layout.break_page();
        }
        layout.write_line(BOLD_FONT, SECTION_SIZE, MARGIN, &section.title);
        layout.advance(LINE_HEIGHT / 2.0);
        for block in &section.blocks {
            layout.write_block(block);
        }
    }

    let pages = layout.finish();
    debug!(pages = pages.len(), "report laid out");
    assemble(pages)
}

struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.pages
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_room(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.break_page();
        }
    }

    fn advance(&mut self, height: f32) {
        self.y -= height;
    }

    fn write_block(&mut self, block: &Block) {
        match block {
            Block::Paragraph { text } => {
                self.write_wrapped(REGULAR_FONT, BODY_SIZE, MARGIN, text);
                self.advance(LINE_HEIGHT / 2.0);
            }
            Block::Subheading { text } => {
                self.advance(LINE_HEIGHT / 2.0);
                self.write_line(BOLD_FONT, SUBHEADING_SIZE, MARGIN, text);
            }
            Block::Bullets { items } => {
                for item in items {
                    self.write_wrapped(REGULAR_FONT, BODY_SIZE, MARGIN + 12.0, &format!("- {item}"));
                }
                self.advance(LINE_HEIGHT / 2.0);
            }
            Block::Table { header, rows } => {
                self.write_table(header, rows);
                self.advance(LINE_HEIGHT / 2.0);
            }
        }
    }

    fn write_table(&mut self, header: &[String], rows: &[Vec<String>]) {
        let columns = header.len().max(1);
        let usable = PAGE_WIDTH - 2.0 * MARGIN;
        let column_width = usable / columns as f32;
        let cell_chars = (column_width / (BODY_SIZE * CHAR_WIDTH_FACTOR)) as usize;

        self.write_row(BOLD_FONT, header, column_width, cell_chars);
        for row in rows {
            self.write_row(REGULAR_FONT, row, column_width, cell_chars);
        }
    }

    fn write_row(&mut self, font: &str, cells: &[String], column_width: f32, cell_chars: usize) {
        self.ensure_room(LINE_HEIGHT);
        for (i, cell) in cells.iter().enumerate() {
            let x = MARGIN + column_width * i as f32;
            self.put_text(font, BODY_SIZE, x, self.y, &clip(cell, cell_chars));
        }
        self.advance(LINE_HEIGHT);
    }

    fn write_line(&mut self, font: &str, size: f32, x: f32, text: &str) {
        let budget = line_budget(size, x);
        for line in wrap(text, budget) {
            self.ensure_room(size + 2.0);
            self.put_text(font, size, x, self.y, &line);
            self.advance(size + 4.0);
        }
    }

    fn write_wrapped(&mut self, font: &str, size: f32, x: f32, text: &str) {
        let budget = line_budget(size, x);
        for line in wrap(text, budget) {
            self.ensure_room(LINE_HEIGHT);
            self.put_text(font, size, x, self.y, &line);
            self.advance(LINE_HEIGHT);
        }
    }

    fn put_text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.current.push(Operation::new("BT", vec![]));
        self.current
            .push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.current
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        self.current.push(Operation::new(
            "Tj",
            vec![Object::string_literal(sanitize(text))],
        ));
        self.current.push(Operation::new("ET", vec![]));
    }
}

fn line_budget(size: f32, x: f32) -> usize {
    let usable = PAGE_WIDTH - MARGIN - x;
    ((usable / (size * CHAR_WIDTH_FACTOR)) as usize).max(16)
}

fn wrap(text: &str, budget: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > budget {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn clip(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(budget.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Helvetica is a Latin-1 face; anything outside it renders as '?'.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 256 { c } else { '?' })
        .collect()
}

fn assemble(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular,
            BOLD_FONT => bold,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in pages {
        let content = Content { operations };
        let stream = Stream::new(dictionary! {}, content.encode()?);
        let content_id = doc.add_object(stream);
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
