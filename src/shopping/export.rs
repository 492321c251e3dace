use thiserror::Error;

use super::aggregate::AggregatedLine;
use super::{pdf, text};

/// Shown instead of an item list when the cart is empty. Both renderers
/// emit it explicitly so an empty cart still produces a well-formed
/// document in either format.
pub const EMPTY_PLACEHOLDER: &str = "No items in your shopping cart.";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// Supported shopping-list export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    PlainText,
    Pdf,
}

impl ExportFormat {
    /// Parse a format from its MIME name.
    pub fn parse(value: &str) -> Result<Self, ExportError> {
        match value {
            "text/plain" => Ok(ExportFormat::PlainText),
            "application/pdf" => Ok(ExportFormat::Pdf),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::PlainText => "text/plain; charset=utf-8",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            ExportFormat::PlainText => "txt",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Render one aggregated line as `"{index}. {name} ({unit}) — {total}"`.
/// The index is 1-based.
pub(super) fn format_line(index: usize, line: &AggregatedLine) -> String {
    format!(
        "{}. {} ({}) \u{2014} {}",
        index, line.name, line.measurement_unit, line.total_amount
    )
}

/// Render the aggregated list in the requested format. Pure: the output
/// depends only on `lines` and `format`.
pub fn render(lines: &[AggregatedLine], format: ExportFormat) -> Vec<u8> {
    match format {
        ExportFormat::PlainText => text::render_text(lines).into_bytes(),
        ExportFormat::Pdf => pdf::render_pdf(lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_formats() {
        assert_eq!(
            ExportFormat::parse("text/plain").unwrap(),
            ExportFormat::PlainText
        );
        assert_eq!(
            ExportFormat::parse("application/pdf").unwrap(),
            ExportFormat::Pdf
        );
    }

    #[test]
    fn test_parse_unsupported_format() {
        let err = ExportFormat::parse("application/xml").unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "application/xml"));
    }

    #[test]
    fn test_parse_is_exact_not_prefix() {
        assert!(ExportFormat::parse("text/plain; charset=utf-8").is_err());
        assert!(ExportFormat::parse("pdf").is_err());
    }

    #[test]
    fn test_format_line_is_one_based() {
        let line = AggregatedLine {
            name: "Flour".to_string(),
            measurement_unit: "g".to_string(),
            total_amount: 500,
        };
        assert_eq!(format_line(1, &line), "1. Flour (g) \u{2014} 500");
    }
}
