// Minimal PDF writer for single-table reports
use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::Write as _;

const PAGE_WIDTH: f64 = 792.0;
const PAGE_HEIGHT: f64 = 612.0;
const MARGIN: f64 = 36.0;
const TITLE_SIZE: f64 = 14.0;
const SUBTITLE_SIZE: f64 = 9.0;
const CELL_SIZE: f64 = 8.0;
const ROW_HEIGHT: f64 = 14.0;
const LINE_HEIGHT: f64 = 10.0;
const CELL_PADDING: f64 = 3.0;
// Average Helvetica glyph width as a fraction of the font size
const AVG_GLYPH_WIDTH: f64 = 0.52;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PdfError {
    #[error("character {ch:?} in \"{text}\" cannot be encoded in the document font")]
    UnencodableText { text: String, ch: char },
    #[error("table row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        found: usize,
        expected: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Column {
    pub heading: String,
    /// Fraction of the printable width, all columns should sum to 1.0
    pub weight: f64,
}

impl Column {
    pub fn new(heading: impl Into<String>, weight: f64) -> Self {
        Self {
            heading: heading.into(),
            weight,
        }
    }
}

/// A titled table laid out over as many landscape letter pages as needed.
/// The heading row repeats on every page.
#[derive(Debug, Clone)]
pub struct TableDocument {
    pub title: String,
    pub subtitle: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

struct EncodedColumn {
    heading: Vec<u8>,
    x: f64,
    max_chars: usize,
}

/// Cell text broken into lines; the row is as tall as its longest cell
struct LaidOutRow {
    cells: Vec<Vec<Vec<u8>>>,
    height: f64,
}

impl TableDocument {
    pub fn render(&self) -> Result<Bytes, PdfError> {
        let columns = self.layout_columns()?;
        let title = encode_win_ansi(&self.title)?;
        let subtitle = encode_win_ansi(&self.subtitle)?;

        let mut rows = Vec::with_capacity(self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(PdfError::RowWidth {
                    row: index,
                    found: row.len(),
                    expected: columns.len(),
                });
            }
            let cells = row
                .iter()
                .zip(&columns)
                .map(|(cell, column)| Ok(wrap(&encode_win_ansi(cell)?, column.max_chars)))
                .collect::<Result<Vec<_>, PdfError>>()?;
            let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
            rows.push(LaidOutRow {
                cells,
                height: ROW_HEIGHT + (lines.saturating_sub(1)) as f64 * LINE_HEIGHT,
            });
        }

        let table_top = PAGE_HEIGHT - MARGIN - TITLE_SIZE - SUBTITLE_SIZE - 18.0;
        let pages = paginate(&rows, table_top - MARGIN - ROW_HEIGHT);

        let page_count = pages.len();
        let contents: Vec<Vec<u8>> = pages
            .iter()
            .enumerate()
            .map(|(index, page_rows)| {
                page_content(&title, &subtitle, &columns, page_rows, table_top, index + 1, page_count)
            })
            .collect();

        Ok(assemble(&title, &contents))
    }

    fn layout_columns(&self) -> Result<Vec<EncodedColumn>, PdfError> {
        let printable = PAGE_WIDTH - MARGIN * 2.0;
        let mut x = MARGIN;
        let mut columns = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let width = printable * column.weight;
            let max_chars = ((width - CELL_PADDING * 2.0) / (CELL_SIZE * AVG_GLYPH_WIDTH)).floor();
            columns.push(EncodedColumn {
                heading: encode_win_ansi(&column.heading)?,
                x,
                max_chars: max_chars.max(4.0) as usize,
            });
            x += width;
        }
        Ok(columns)
    }
}

/// Split rows into pages whose bodies fit in `body_height`. A row taller
/// than a whole page still gets a page of its own.
fn paginate(rows: &[LaidOutRow], body_height: f64) -> Vec<&[LaidOutRow]> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut used = 0.0;
    for (index, row) in rows.iter().enumerate() {
        if index > start && used + row.height > body_height {
            pages.push(&rows[start..index]);
            start = index;
            used = 0.0;
        }
        used += row.height;
    }
    pages.push(&rows[start..]);
    pages
}

fn page_content(
    title: &[u8],
    subtitle: &[u8],
    columns: &[EncodedColumn],
    rows: &[LaidOutRow],
    table_top: f64,
    page_number: usize,
    page_count: usize,
) -> Vec<u8> {
    let mut out = Vec::new();
    let title_y = PAGE_HEIGHT - MARGIN - TITLE_SIZE;
    show_text(&mut out, "F2", TITLE_SIZE, MARGIN, title_y, title);
    show_text(&mut out, "F1", SUBTITLE_SIZE, MARGIN, title_y - SUBTITLE_SIZE - 6.0, subtitle);

    let mut y = table_top;
    for column in columns {
        show_text(&mut out, "F2", CELL_SIZE, column.x + CELL_PADDING, y, &column.heading);
    }
    let rule_y = y - 4.0;
    let mut ops = String::new();
    let _ = writeln!(
        ops,
        "0.5 w {:.2} {:.2} m {:.2} {:.2} l S",
        MARGIN,
        rule_y,
        PAGE_WIDTH - MARGIN,
        rule_y
    );
    out.extend_from_slice(ops.as_bytes());

    for row in rows {
        for (lines, column) in row.cells.iter().zip(columns) {
            let mut line_y = y - ROW_HEIGHT;
            for line in lines {
                show_text(&mut out, "F1", CELL_SIZE, column.x + CELL_PADDING, line_y, line);
                line_y -= LINE_HEIGHT;
            }
        }
        y -= row.height;
    }

    let footer = format!("Page {} of {}", page_number, page_count);
    show_text(&mut out, "F1", CELL_SIZE, PAGE_WIDTH - MARGIN - 48.0, MARGIN / 2.0, footer.as_bytes());
    out
}

fn show_text(out: &mut Vec<u8>, font: &str, size: f64, x: f64, y: f64, text: &[u8]) {
    let header = format!("BT /{} {:.1} Tf {:.2} {:.2} Td (", font, size, x, y);
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(&escape_literal(text));
    out.extend_from_slice(b") Tj ET\n");
}

fn assemble(title: &[u8], contents: &[Vec<u8>]) -> Bytes {
    let page_count = contents.len();
    // 1 catalog, 2 pages, 3-4 fonts, 5 info, then a page/content pair per page
    let object_count = 5 + page_count * 2;
    let page_object = |index: usize| 6 + index * 2;

    let mut buf = BytesMut::with_capacity(2048 + contents.iter().map(Vec::len).sum::<usize>());
    let mut offsets = Vec::with_capacity(object_count);
    buf.put_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let kids = (0..page_count)
        .map(|i| format!("{} 0 R", page_object(i)))
        .collect::<Vec<_>>()
        .join(" ");

    let mut info = b"<< /Title (".to_vec();
    info.extend_from_slice(&escape_literal(title));
    info.extend_from_slice(b") /Producer (metro-pipeline-dashboard) >>");

    let fixed: [Vec<u8>; 5] = [
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, page_count).into_bytes(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_vec(),
        info,
    ];
    for (index, body) in fixed.iter().enumerate() {
        write_object(&mut buf, &mut offsets, index + 1, body);
    }

    for (index, content) in contents.iter().enumerate() {
        let page = format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            page_object(index) + 1
        );
        write_object(&mut buf, &mut offsets, page_object(index), page.as_bytes());

        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(content);
        stream.extend_from_slice(b"\nendstream");
        write_object(&mut buf, &mut offsets, page_object(index) + 1, &stream);
    }

    let xref_offset = buf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", object_count + 1);
    for offset in &offsets {
        let _ = write!(xref, "{:010} 00000 n \n", offset);
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {} /Root 1 0 R /Info 5 0 R >>\nstartxref\n{}\n%%EOF\n",
        object_count + 1,
        xref_offset
    );
    buf.put_slice(xref.as_bytes());

    buf.freeze()
}

fn write_object(buf: &mut BytesMut, offsets: &mut Vec<usize>, number: usize, body: &[u8]) {
    debug_assert_eq!(offsets.len() + 1, number);
    offsets.push(buf.len());
    buf.put_slice(format!("{} 0 obj\n", number).as_bytes());
    buf.put_slice(body);
    buf.put_slice(b"\nendobj\n");
}

/// Encode text for the standard fonts' WinAnsiEncoding
pub fn encode_win_ansi(text: &str) -> Result<Vec<u8>, PdfError> {
    text.chars()
        .map(|ch| {
            let code = ch as u32;
            let byte = match ch {
                c if c.is_ascii_whitespace() || c == '\u{0B}' => Some(b' '),
                '\u{20}'..='\u{7E}' => Some(code as u8),
                '\u{A0}'..='\u{FF}' => Some(code as u8),
                '\u{20AC}' => Some(0x80),
                '\u{2018}' => Some(0x91),
                '\u{2019}' => Some(0x92),
                '\u{201C}' => Some(0x93),
                '\u{201D}' => Some(0x94),
                '\u{2022}' => Some(0x95),
                '\u{2013}' => Some(0x96),
                '\u{2014}' => Some(0x97),
                '\u{2026}' => Some(0x85),
                _ => None,
            };
            byte.ok_or_else(|| PdfError::UnencodableText {
                text: text.to_string(),
                ch,
            })
        })
        .collect()
}

fn escape_literal(text: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for &byte in text {
        match byte {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(byte);
            }
            0x80..=0xFF => out.extend_from_slice(format!("\\{:03o}", byte).as_bytes()),
            _ => out.push(byte),
        }
    }
    out
}

/// Break text into lines of at most `max_chars`, at spaces where possible.
/// Words longer than a line are split.
fn wrap(text: &[u8], max_chars: usize) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    let mut line: Vec<u8> = Vec::new();
    for mut word in text.split(|b| *b == b' ').filter(|w| !w.is_empty()) {
        if !line.is_empty() && line.len() + 1 + word.len() <= max_chars {
            line.push(b' ');
            line.extend_from_slice(word);
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        while word.len() > max_chars {
            let (head, tail) = word.split_at(max_chars);
            lines.push(head.to_vec());
            word = tail;
        }
        line.extend_from_slice(word);
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}
