//! PDF report renderer
//!
//! A4 portrait, laid out top-down in millimeters like the paper form it
//! replaces. The backend's coordinate origin is the bottom-left corner,
//! so [`Painter`] flips the y axis once and every layout constant below
//! reads as a distance from the top of the page.

use attest_config::{FontFamily, ReportSettings, TableTheme};
use attest_model::{overall_result, ProductEntry};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use printpdf::image_crate::{self, GenericImageView};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rect, Rgb,
};
use tracing::{debug, warn};

use crate::{RandomSource, RenderError, RenderResult, ReportNumber};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 14.0;

/// Vertical bound for flowing content; past this a new page starts.
const PAGE_BREAK_Y: f32 = 280.0;

const HEADER_BLUE: (u8, u8, u8) = (37, 99, 235);
const TEXT_DARK: (u8, u8, u8) = (50, 50, 50);
const TEXT_MUTED: (u8, u8, u8) = (150, 150, 150);
const LINE_GRAY: (u8, u8, u8) = (200, 200, 200);
const BOX_FILL: (u8, u8, u8) = (245, 245, 245);
const WHITE: (u8, u8, u8) = (255, 255, 255);
const BLACK: (u8, u8, u8) = (0, 0, 0);

const LOGO_SIZE_MM: f32 = 25.0;
const LOGO_DPI: f32 = 300.0;

/// Table column widths in mm; the body font is 7.5pt.
const COLUMN_WIDTHS: [f32; 9] = [15.0, 20.0, 35.0, 22.0, 25.0, 15.0, 15.0, 20.0, 15.0];
const COLUMN_TITLES: [&str; 9] = [
    "SL",
    "Test Date",
    "Product & Series",
    "Rating (PF)",
    "Timing",
    "Cycles",
    "Ops",
    "Total Ops",
    "Result",
];
const TABLE_FONT_PT: f32 = 7.5;
const CELL_PADDING: f32 = 2.0;
const CELL_LINE_HEIGHT: f32 = 3.5;

/// A rendered PDF artifact
pub struct PdfReport {
    pub file_name: String,
    pub report_number: ReportNumber,
    pub pages: usize,
    pub bytes: Vec<u8>,
}

/// Render the PDF report. The only non-deterministic input is the
/// report number suffix drawn from `rng`.
pub fn render_pdf(
    entries: &[ProductEntry],
    settings: &ReportSettings,
    rng: &mut dyn RandomSource,
) -> RenderResult<PdfReport> {
    if entries.is_empty() {
        return Err(RenderError::NoEntries);
    }

    let report_number = ReportNumber::generate(&settings.report_prefix, settings.report_date, rng);
    let mut painter = Painter::new("Product Test Report", settings.primary_font)?;

    draw_header(&painter, settings);
    draw_metadata(&painter, settings, &report_number);
    draw_summary(&painter, entries);

    let table_end_y = draw_table(&mut painter, entries, settings.table_theme);
    draw_remarks(&mut painter, entries, table_end_y);
    draw_signatures(&painter, settings);

    let pages = painter.page_count();
    draw_page_footers(&mut painter, settings, &report_number);

    let file_name = format!(
        "{}_Report_{}.pdf",
        attest_util::collapse_whitespace(&settings.company_name),
        report_number
    );

    let bytes = painter.finish()?;
    debug!(pages, file_name = %file_name, "PDF rendered");
    Ok(PdfReport {
        file_name,
        report_number,
        pages,
        bytes,
    })
}

fn draw_header(p: &Painter, settings: &ReportSettings) {
    p.set_fill(HEADER_BLUE);
    p.fill_rect(0.0, 0.0, PAGE_WIDTH, 45.0);

    // A configured logo left-aligns the header text; without one the
    // text is centered. Embedding failures are logged and skipped, the
    // render continues without the image.
    if let Some(data_uri) = &settings.logo_data {
        if let Err(e) = embed_logo(&p.layer(), data_uri) {
            warn!(error = %e, "Failed to embed logo, rendering without it");
        }
    }

    p.set_fill(WHITE);
    let company = settings.company_name.to_uppercase();
    let subtitle = "Quality Assurance - Product Test Report";
    if settings.logo_data.is_some() {
        p.text(&company, 22.0, 45.0, 22.0, true);
        p.text(subtitle, 14.0, 45.0, 32.0, false);
    } else {
        p.text_centered(&company, 22.0, PAGE_WIDTH / 2.0, 22.0, true);
        p.text_centered(subtitle, 14.0, PAGE_WIDTH / 2.0, 32.0, false);
    }
}

fn draw_metadata(p: &Painter, settings: &ReportSettings, report_number: &ReportNumber) {
    p.set_fill(TEXT_DARK);
    p.text("REPORT DETAILS", 10.0, MARGIN, 55.0, true);
    p.text(
        &format!("Report ID: {}", report_number),
        10.0,
        MARGIN,
        62.0,
        false,
    );
    p.text(
        &format!("Tester Name: {}", settings.tester_name),
        10.0,
        MARGIN,
        67.0,
        false,
    );

    // Day / month / year breakout boxes on the right.
    let x = PAGE_WIDTH - 70.0;
    let y = 55.0;
    p.set_fill(HEADER_BLUE);
    p.text("REPORT ISSUE DATE", 9.0, x, y, true);

    p.set_fill(BOX_FILL);
    p.fill_rect(x, y + 3.0, 15.0, 12.0);
    p.fill_rect(x + 17.0, y + 3.0, 25.0, 12.0);
    p.fill_rect(x + 44.0, y + 3.0, 15.0, 12.0);

    let parts = attest_util::date_parts(settings.report_date);
    p.set_fill(BLACK);
    p.text_centered(&parts.day, 10.0, x + 7.5, y + 8.0, false);
    p.text_centered(&parts.month, 10.0, x + 29.5, y + 8.0, false);
    p.text_centered(&parts.year, 10.0, x + 51.5, y + 8.0, false);

    p.set_fill(TEXT_MUTED);
    p.text_centered("DATE", 7.0, x + 7.5, y + 18.0, false);
    p.text_centered("MONTH", 7.0, x + 29.5, y + 18.0, false);
    p.text_centered("YEAR", 7.0, x + 51.5, y + 18.0, false);
}

fn draw_summary(p: &Painter, entries: &[ProductEntry]) {
    p.set_fill(TEXT_DARK);
    p.text_right(
        &format!("Total Products: {}", entries.len()),
        9.0,
        PAGE_WIDTH - MARGIN,
        78.0,
        false,
    );
    p.text_right(
        &format!("Overall Result: {}", overall_result(entries)),
        9.0,
        PAGE_WIDTH - MARGIN,
        83.0,
        false,
    );
}

/// The two-line cell texts for one table row.
fn row_cells(entry: &ProductEntry) -> [Vec<String>; 9] {
    [
        vec![entry.serial_number.clone()],
        vec![attest_util::format_iso(entry.test_date)],
        vec![
            entry.product_name.clone(),
            format!("({})", entry.series_name),
        ],
        vec![
            entry.rated_current.clone(),
            format!("({})", entry.power_factor),
        ],
        vec![
            format!("{} On", entry.on_time),
            format!("{} Off", entry.off_time),
        ],
        vec![entry.cycles.to_string()],
        vec![entry.operations.to_string()],
        vec![entry.total_operations.to_string()],
        vec![entry.result.label().to_string()],
    ]
}

fn column_x(index: usize) -> f32 {
    MARGIN + COLUMN_WIDTHS[..index].iter().sum::<f32>()
}

fn table_width() -> f32 {
    COLUMN_WIDTHS.iter().sum()
}

fn draw_table_header(p: &Painter, y: f32, theme: TableTheme) {
    let header_height = 8.0;
    if theme != TableTheme::Plain {
        p.set_fill(HEADER_BLUE);
        p.fill_rect(MARGIN, y, table_width(), header_height);
        p.set_fill(WHITE);
    } else {
        p.set_fill(BLACK);
    }

    for (i, title) in COLUMN_TITLES.iter().enumerate() {
        let center = column_x(i) + COLUMN_WIDTHS[i] / 2.0;
        p.text_centered(title, TABLE_FONT_PT, center, y + 5.0, true);
    }
}

/// Draw the entry table starting at y 90, breaking to fresh pages as
/// needed. Returns the y just below the last row.
fn draw_table(p: &mut Painter, entries: &[ProductEntry], theme: TableTheme) -> f32 {
    let mut y = 90.0;
    draw_table_header(p, y, theme);
    y += 8.0;

    // Per-column character budget for cell wrapping.
    let max_chars: Vec<usize> = COLUMN_WIDTHS
        .iter()
        .map(|w| p.chars_that_fit(w - 2.0 * CELL_PADDING, TABLE_FONT_PT))
        .collect();

    for (index, entry) in entries.iter().enumerate() {
        let cells: Vec<Vec<String>> = row_cells(entry)
            .iter()
            .enumerate()
            .map(|(i, lines)| {
                lines
                    .iter()
                    .flat_map(|l| attest_util::wrap_text(l, max_chars[i]))
                    .collect()
            })
            .collect();

        let line_count = cells.iter().map(Vec::len).max().unwrap_or(1);
        let row_height = line_count as f32 * CELL_LINE_HEIGHT + 2.0 * CELL_PADDING;

        if y + row_height > PAGE_BREAK_Y {
            p.add_page();
            y = 20.0;
            draw_table_header(p, y, theme);
            y += 8.0;
        }

        if theme == TableTheme::Striped && index % 2 == 1 {
            p.set_fill(BOX_FILL);
            p.fill_rect(MARGIN, y, table_width(), row_height);
        }

        p.set_fill(TEXT_DARK);
        for (col, lines) in cells.iter().enumerate() {
            let bold = col == 8;
            for (line_no, line) in lines.iter().enumerate() {
                let line_y = y + CELL_PADDING + (line_no as f32 + 1.0) * CELL_LINE_HEIGHT - 1.0;
                if col == 2 {
                    p.text(line, TABLE_FONT_PT, column_x(col) + CELL_PADDING, line_y, bold);
                } else {
                    let center = column_x(col) + COLUMN_WIDTHS[col] / 2.0;
                    p.text_centered(line, TABLE_FONT_PT, center, line_y, bold);
                }
            }
        }

        if theme == TableTheme::Grid {
            p.set_outline(LINE_GRAY, 0.3);
            for col in 0..COLUMN_WIDTHS.len() {
                p.stroke_rect(column_x(col), y, COLUMN_WIDTHS[col], row_height);
            }
        }

        y += row_height;
    }

    y
}

/// List `{serial}: {remarks}` for every entry that has remarks, wrapped
/// to the page width, continuing onto fresh pages as needed.
fn draw_remarks(p: &mut Painter, entries: &[ProductEntry], table_end_y: f32) {
    if !entries.iter().any(|e| e.has_remarks()) {
        return;
    }

    p.set_fill(BLACK);
    p.text("TEST REMARKS:", 11.0, MARGIN, table_end_y + 15.0, true);

    let max_chars = p.chars_that_fit(PAGE_WIDTH - 2.0 * MARGIN, 9.0);
    let mut y = table_end_y + 22.0;
    for entry in entries.iter().filter(|e| e.has_remarks()) {
        let text = format!("{}: {}", entry.serial_number, entry.remarks);
        let lines = attest_util::wrap_text(&text, max_chars);

        if y + lines.len() as f32 * 5.0 > PAGE_BREAK_Y {
            p.add_page();
            p.set_fill(BLACK);
            y = 20.0;
        }

        for line in &lines {
            p.text(line, 9.0, MARGIN, y, false);
            y += 5.0;
        }
        y += 3.0;
    }
}

/// Fixed two-signature block near the bottom of the last content page.
fn draw_signatures(p: &Painter, settings: &ReportSettings) {
    let y = PAGE_HEIGHT - 40.0;
    p.set_outline(LINE_GRAY, 0.3);
    p.hline(MARGIN, 70.0, y);
    p.hline(PAGE_WIDTH - 70.0, PAGE_WIDTH - MARGIN, y);

    p.set_fill(BLACK);
    p.text("Prepared By", 9.0, MARGIN, y + 5.0, false);
    p.text(&settings.tester_name, 9.0, MARGIN, y + 10.0, false);
    p.text("Approved By", 9.0, PAGE_WIDTH - 70.0, y + 5.0, false);
}

/// Page-number footers go on last, once the final page count is known.
fn draw_page_footers(p: &mut Painter, settings: &ReportSettings, report_number: &ReportNumber) {
    let pages = p.page_count();
    for page in 0..pages {
        p.goto_page(page);
        p.set_fill(TEXT_MUTED);
        p.text_centered(
            &format!(
                "Page {} of {} - Report ID: {} - {}",
                page + 1,
                pages,
                report_number,
                settings.company_name
            ),
            8.0,
            PAGE_WIDTH / 2.0,
            PAGE_HEIGHT - 10.0,
            false,
        );
    }
}

fn embed_logo(layer: &PdfLayerReference, data_uri: &str) -> Result<(), String> {
    let encoded = data_uri
        .split("base64,")
        .nth(1)
        .ok_or_else(|| "logo is not a base64 data URI".to_string())?;
    let bytes = BASE64.decode(encoded.trim()).map_err(|e| e.to_string())?;
    let decoded = image_crate::load_from_memory(&bytes).map_err(|e| e.to_string())?;

    let (width_px, height_px) = decoded.dimensions();
    let native_w_mm = width_px as f32 * 25.4 / LOGO_DPI;
    let native_h_mm = height_px as f32 * 25.4 / LOGO_DPI;

    let image = Image::from_dynamic_image(&decoded);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(Mm(PAGE_HEIGHT - 10.0 - LOGO_SIZE_MM)),
            scale_x: Some(LOGO_SIZE_MM / native_w_mm),
            scale_y: Some(LOGO_SIZE_MM / native_h_mm),
            dpi: Some(LOGO_DPI),
            ..Default::default()
        },
    );
    Ok(())
}

fn pdf_err(e: printpdf::Error) -> RenderError {
    RenderError::Pdf(e.to_string())
}

/// Drawing surface with top-down coordinates over the A4 document.
struct Painter {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    current: usize,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    char_factor: f32,
}

impl Painter {
    fn new(title: &str, family: FontFamily) -> RenderResult<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

        let (regular, bold, char_factor) = match family {
            FontFamily::Helvetica => (BuiltinFont::Helvetica, BuiltinFont::HelveticaBold, 0.52),
            FontFamily::Times => (BuiltinFont::TimesRoman, BuiltinFont::TimesBold, 0.50),
            FontFamily::Courier => (BuiltinFont::Courier, BuiltinFont::CourierBold, 0.60),
        };
        let regular = doc.add_builtin_font(regular).map_err(pdf_err)?;
        let bold = doc.add_builtin_font(bold).map_err(pdf_err)?;

        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            current: 0,
            regular,
            bold,
            char_factor,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.current];
        self.doc.get_page(page).get_layer(layer)
    }

    fn add_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.pages.push((page, layer));
        self.current = self.pages.len() - 1;
    }

    fn goto_page(&mut self, index: usize) {
        self.current = index;
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// How many characters of the given size fit into `width_mm`.
    fn chars_that_fit(&self, width_mm: f32, font_size_pt: f32) -> usize {
        (width_mm / (font_size_pt * self.char_factor * attest_util::PT_TO_MM)).floor() as usize
    }

    fn text_width(&self, text: &str, font_size_pt: f32) -> f32 {
        attest_util::approx_text_width_mm(text, font_size_pt, self.char_factor)
    }

    fn text(&self, text: &str, size_pt: f32, x: f32, y_top: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer()
            .use_text(text, size_pt, Mm(x), Mm(PAGE_HEIGHT - y_top), font);
    }

    fn text_centered(&self, text: &str, size_pt: f32, center_x: f32, y_top: f32, bold: bool) {
        let x = center_x - self.text_width(text, size_pt) / 2.0;
        self.text(text, size_pt, x, y_top, bold);
    }

    fn text_right(&self, text: &str, size_pt: f32, right_x: f32, y_top: f32, bold: bool) {
        let x = right_x - self.text_width(text, size_pt);
        self.text(text, size_pt, x, y_top, bold);
    }

    fn set_fill(&self, (r, g, b): (u8, u8, u8)) {
        self.layer().set_fill_color(Color::Rgb(Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        )));
    }

    fn set_outline(&self, (r, g, b): (u8, u8, u8), thickness: f32) {
        let layer = self.layer();
        layer.set_outline_color(Color::Rgb(Rgb::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            None,
        )));
        layer.set_outline_thickness(thickness);
    }

    fn fill_rect(&self, x: f32, y_top: f32, width: f32, height: f32) {
        let rect = Rect::new(
            Mm(x),
            Mm(PAGE_HEIGHT - y_top - height),
            Mm(x + width),
            Mm(PAGE_HEIGHT - y_top),
        )
        .with_mode(PaintMode::Fill);
        self.layer().add_rect(rect);
    }

    fn stroke_rect(&self, x: f32, y_top: f32, width: f32, height: f32) {
        let rect = Rect::new(
            Mm(x),
            Mm(PAGE_HEIGHT - y_top - height),
            Mm(x + width),
            Mm(PAGE_HEIGHT - y_top),
        )
        .with_mode(PaintMode::Stroke);
        self.layer().add_rect(rect);
    }

    fn hline(&self, x1: f32, x2: f32, y_top: f32) {
        let y = PAGE_HEIGHT - y_top;
        let line = Line {
            points: vec![
                (Point::new(Mm(x1), Mm(y)), false),
                (Point::new(Mm(x2), Mm(y)), false),
            ],
            is_closed: false,
        };
        self.layer().add_line(line);
    }

    fn finish(self) -> RenderResult<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_err)
    }
}
