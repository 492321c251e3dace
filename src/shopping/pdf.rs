use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use super::aggregate::AggregatedLine;
use super::export::{format_line, EMPTY_PLACEHOLDER};

// A4 in points, layout mirrors the text export: a title, a dashed
// separator, then one numbered line per ingredient.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN_X: f32 = 100.0;
const TITLE_Y: f32 = 750.0;
const HEADER_GAP: f32 = 20.0;
const FONT_SIZE: f32 = 14.0;
const LINE_HEIGHT: f32 = 14.0;

const TITLE: &str = "Shopping list";
pub(super) const LINES_PER_PAGE: usize = 44;

/// Render the aggregated list as a PDF document. Every page repeats the
/// header; items flow across pages in order, `LINES_PER_PAGE` per page.
pub(super) fn render_pdf(lines: &[AggregatedLine]) -> Vec<u8> {
    let body: Vec<String> = if lines.is_empty() {
        vec![EMPTY_PLACEHOLDER.to_string()]
    } else {
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| format_line(i + 1, line))
            .collect()
    };

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let font_id = Ref::new(3);

    let chunks: Vec<&[String]> = body.chunks(LINES_PER_PAGE).collect();

    let mut next_id = 4;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };
    let page_refs: Vec<(Ref, Ref)> = chunks.iter().map(|_| (alloc(), alloc())).collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_refs.iter().map(|(page_id, _)| *page_id))
        .count(chunks.len() as i32);

    let separator = "-".repeat(50);

    for ((page_id, content_id), chunk) in page_refs.iter().zip(&chunks) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources().fonts().pair(Name(b"F1"), font_id);
        page.finish();

        let mut content = Content::new();
        content.begin_text();
        content.set_font(Name(b"F1"), FONT_SIZE);
        content.next_line(MARGIN_X, TITLE_Y);
        content.show(Str(&encode_win_ansi(TITLE)));
        content.next_line(0.0, -HEADER_GAP);
        content.show(Str(separator.as_bytes()));
        for item in chunk.iter() {
            content.next_line(0.0, -LINE_HEIGHT);
            content.show(Str(&encode_win_ansi(item)));
        }
        content.end_text();
        pdf.stream(*content_id, &content.finish());
    }

    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    pdf.finish()
}

/// Map a string into WinAnsi (CP-1252) bytes for the standard-14 font.
/// Characters outside the encoding are replaced with '?'.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if (c as u32) < 0x80 => c as u8,
            c if (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(name: &str, total: i64) -> AggregatedLine {
        AggregatedLine {
            name: name.to_string(),
            measurement_unit: "g".to_string(),
            total_amount: total,
        }
    }

    /// Each page object carries exactly one /Contents key.
    fn count_pages(buf: &[u8]) -> usize {
        let needle = b"/Contents";
        buf.windows(needle.len()).filter(|w| *w == needle).count()
    }

    #[test]
    fn test_output_is_a_pdf() {
        let buf = render_pdf(&[agg("Flour", 500)]);
        assert!(buf.starts_with(b"%PDF-"));
    }

    fn contains(buf: &[u8], needle: &[u8]) -> bool {
        buf.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_empty_list_renders_one_page() {
        let buf = render_pdf(&[]);
        assert!(buf.starts_with(b"%PDF-"));
        assert_eq!(count_pages(&buf), 1);
        // Streams are uncompressed, so the placeholder must appear
        // verbatim in the page content
        assert!(contains(&buf, &encode_win_ansi(EMPTY_PLACEHOLDER)));
    }

    #[test]
    fn test_full_page_does_not_spill() {
        let lines: Vec<AggregatedLine> = (0..LINES_PER_PAGE as i64)
            .map(|i| agg(&format!("Item{:03}", i), i + 1))
            .collect();
        assert_eq!(count_pages(&render_pdf(&lines)), 1);
    }

    #[test]
    fn test_long_list_paginates() {
        let lines: Vec<AggregatedLine> = (0..100)
            .map(|i| agg(&format!("Item{:03}", i), i + 1))
            .collect();
        // 100 items at 44 per page
        assert_eq!(count_pages(&render_pdf(&lines)), 3);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("\u{2014}"), vec![0x97]);
        // Outside CP-1252 falls back to '?'
        assert_eq!(encode_win_ansi("\u{0416}"), vec![b'?']);
    }
}
