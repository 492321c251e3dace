use super::aggregate::AggregatedLine;
use super::export::{format_line, EMPTY_PLACEHOLDER};

/// Render the aggregated list as plain text, one numbered line per
/// ingredient, with a single trailing newline.
pub(super) fn render_text(lines: &[AggregatedLine]) -> String {
    if lines.is_empty() {
        return format!("{}\n", EMPTY_PLACEHOLDER);
    }

    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        out.push_str(&format_line(i + 1, line));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(name: &str, unit: &str, total: i64) -> AggregatedLine {
        AggregatedLine {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            total_amount: total,
        }
    }

    #[test]
    fn test_render_three_lines() {
        let lines = vec![agg("Egg", "pcs", 2), agg("Flour", "g", 500), agg("Milk", "ml", 100)];

        assert_eq!(
            render_text(&lines),
            "1. Egg (pcs) \u{2014} 2\n2. Flour (g) \u{2014} 500\n3. Milk (ml) \u{2014} 100\n"
        );
    }

    #[test]
    fn test_render_empty_list_is_explicit() {
        assert_eq!(render_text(&[]), "No items in your shopping cart.\n");
    }

    #[test]
    fn test_single_trailing_newline() {
        let rendered = render_text(&[agg("Salt", "g", 5)]);
        assert!(rendered.ends_with('\n'));
        assert!(!rendered.ends_with("\n\n"));
    }
}
