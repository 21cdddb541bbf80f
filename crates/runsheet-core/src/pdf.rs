//! Paginated PDF rendering of a [`RunOfShow`].
//!
//! Pages are A4 portrait by default with the standard Helvetica fonts.
//! Every day section starts on a fresh page; a section that runs past the
//! bottom margin continues on the next page under a "(continued)" heading.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, RunsheetError};
use crate::run_of_show::{NO_BLOCKS_MESSAGE, RunOfShow, SectionElement, ShowEntry, ShowSection};

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

/// Page geometry and type sizes, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub line_height: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            margin: 50.0,
            font_size: 10.0,
            line_height: 14.0,
        }
    }
}

impl PageConfig {
    pub fn validate(&self) -> Result<()> {
        let usable = self.height - 2.0 * self.margin;
        if self.width <= 2.0 * self.margin || usable < 8.0 * self.line_height {
            return Err(RunsheetError::RenderError(format!(
                "page {}x{} with margin {} leaves no room for content",
                self.width, self.height, self.margin
            )));
        }
        if self.font_size <= 0.0 || self.line_height < self.font_size {
            return Err(RunsheetError::RenderError(format!(
                "line height {} must be at least font size {}",
                self.line_height, self.font_size
            )));
        }
        Ok(())
    }
}

/// Finished document bytes.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Map text to single-byte WinAnsi, the encoding both fonts declare.
///
/// Latin-1 letters keep their code points; typographic quotes and the
/// ellipsis use their WinAnsi slots. Anything else becomes `?`.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2013}' | '\u{2014}' => b'-',
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2026}' => 0x85,
            // C1 controls have no glyph; WinAnsi reuses those bytes.
            c if ('\u{80}'..'\u{a0}').contains(&c) => b'?',
            c if (c as u32) < 0x100 => c as u8,
            _ => b'?',
        })
        .collect()
}

struct PageWriter {
    pdf: Pdf,
    config: PageConfig,
    catalog_id: Ref,
    pages_id: Ref,
    regular_id: Ref,
    bold_id: Ref,
    page_refs: Vec<Ref>,
    next_id: i32,
    title: String,

    content: Option<(Ref, Content)>,
    cursor: f32,
}

impl PageWriter {
    fn new(config: PageConfig, title: &str) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let regular_id = Ref::new(3);
        let bold_id = Ref::new(4);

        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            config,
            catalog_id,
            pages_id,
            regular_id,
            bold_id,
            page_refs: Vec::new(),
            next_id: 5,
            title: title.to_string(),
            content: None,
            cursor: 0.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn start_page(&mut self) {
        self.finish_page();

        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.config.width, self.config.height))
            .contents(content_id);
        let mut resources = page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(REGULAR, self.regular_id);
        fonts.pair(BOLD, self.bold_id);
        drop(fonts);
        drop(resources);
        drop(page);

        self.content = Some((content_id, Content::new()));
        self.cursor = self.config.height - self.config.margin;

        let title = self.title.clone();
        self.text(BOLD, self.config.font_size + 4.0, 0.0, &title);
        self.cursor -= self.config.line_height * 0.5;
    }

    fn finish_page(&mut self) {
        if let Some((id, mut content)) = self.content.take() {
            let footer = format!("Page {}", self.page_refs.len());
            content.begin_text();
            content.set_font(REGULAR, self.config.font_size - 2.0);
            content.set_text_matrix([
                1.0,
                0.0,
                0.0,
                1.0,
                self.config.width - self.config.margin - 40.0,
                self.config.margin * 0.5,
            ]);
            content.show(Str(&encode(&footer)));
            content.end_text();

            self.pdf.stream(id, &content.finish());
        }
    }

    /// Start a new page when fewer than `lines` lines are left.
    fn ensure_room(&mut self, lines: f32, continued: Option<&str>) {
        if self.cursor - lines * self.config.line_height < self.config.margin {
            self.start_page();
            if let Some(heading) = continued {
                let heading = format!("{heading} (continued)");
                self.text(BOLD, self.config.font_size + 2.0, 0.0, &heading);
            }
        }
    }

    fn text(&mut self, font: Name<'static>, size: f32, indent: f32, text: &str) {
        self.cursor -= self.config.line_height.max(size * 1.2);
        let x = self.config.margin + indent;
        let y = self.cursor;
        if let Some((_, content)) = self.content.as_mut() {
            content.begin_text();
            content.set_font(font, size);
            content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
            content.show(Str(&encode(text)));
            content.end_text();
        }
    }

    fn divider(&mut self, label: &str) {
        self.cursor -= self.config.line_height * 0.5;
        let y = self.cursor - self.config.line_height * 0.3;
        let (x0, x1) = (self.config.margin, self.config.width - self.config.margin);
        if let Some((_, content)) = self.content.as_mut() {
            content.save_state();
            content.set_stroke_rgb(0.75, 0.75, 0.75);
            content.move_to(x0, y);
            content.line_to(x1, y);
            content.stroke();
            content.restore_state();
        }
        self.text(BOLD, self.config.font_size, 0.0, label);
    }

    fn badge(&mut self, entry: &ShowEntry) {
        let (r, g, b) = entry.status.badge_rgb();
        let label = entry.status.label();
        let width = label.len() as f32 * self.config.font_size * 0.5 + 8.0;
        let x = self.config.width - self.config.margin - width;
        let y = self.cursor - 3.0;
        if let Some((_, content)) = self.content.as_mut() {
            content.save_state();
            content.set_fill_rgb(r, g, b);
            content.rect(x, y, width, self.config.line_height);
            content.fill_nonzero();
            content.restore_state();

            content.begin_text();
            content.set_font(REGULAR, self.config.font_size - 1.0);
            content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x + 4.0, y + 3.0]);
            content.show(Str(&encode(label)));
            content.end_text();
        }
    }

    fn entry(&mut self, entry: &ShowEntry) {
        let line = format!("{}   {}", entry.time_range, entry.title);
        self.text(BOLD, self.config.font_size, 12.0, &line);
        self.badge(entry);
        for detail in &entry.details {
            let line = format!("{}: {}", detail.label, detail.value);
            self.text(REGULAR, self.config.font_size - 1.0, 24.0, &line);
        }
    }

    fn finish(mut self) -> RenderedPdf {
        self.finish_page();

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.iter().copied());
        drop(pages);

        RenderedPdf {
            page_count: self.page_refs.len(),
            bytes: self.pdf.finish(),
        }
    }
}

/// Render `show` as a PDF document.
pub fn render_pdf(show: &RunOfShow, config: &PageConfig) -> Result<RenderedPdf> {
    config.validate()?;

    let mut writer = PageWriter::new(*config, &show.title);

    for section in &show.sections {
        writer.start_page();
        if let Some(location) = &show.location {
            writer.text(REGULAR, config.font_size, 0.0, location);
        }
        writer.text(REGULAR, config.font_size, 0.0, &show.date_range);

        match section {
            ShowSection::NoBlocks => {
                writer.cursor -= config.line_height;
                writer.text(REGULAR, config.font_size + 1.0, 0.0, NO_BLOCKS_MESSAGE);
            }
            ShowSection::Day(day) => {
                writer.cursor -= config.line_height * 0.5;
                writer.text(BOLD, config.font_size + 2.0, 0.0, &day.heading);
                writer.text(REGULAR, config.font_size, 0.0, &day.tally.to_string());

                for element in &day.elements {
                    match element {
                        SectionElement::HourDivider { label, .. } => {
                            writer.ensure_room(3.0, Some(&day.heading));
                            writer.divider(label);
                        }
                        SectionElement::Entry(entry) => {
                            let lines = 1.0 + entry.details.len() as f32;
                            writer.ensure_room(lines, Some(&day.heading));
                            writer.entry(entry);
                        }
                    }
                }
            }
        }
    }

    let rendered = writer.finish();
    debug!(pages = rendered.page_count, bytes = rendered.bytes.len(), "rendered pdf");
    Ok(rendered)
}
