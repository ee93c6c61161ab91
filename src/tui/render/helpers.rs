use ratatui::style::Style;
use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `left` with spaces so `right` ends flush at `width`. `right` is
/// dropped when both do not fit.
pub(super) fn push_right_aligned<'a>(
    spans: &mut Vec<Span<'a>>,
    right: Vec<Span<'a>>,
    width: usize,
    fill: Style,
) {
    let used = spans_width(spans);
    let right_width = spans_width(&right);
    if used + right_width < width {
        spans.push(Span::styled(" ".repeat(width - used - right_width), fill));
        spans.extend(right);
    }
}

/// An input line of `width` cells showing `buf` with the cursor cell
/// inverted, scrolled so the cursor stays in view.
pub(super) fn edit_spans(
    buf: &str,
    cursor: usize,
    width: usize,
    text_style: Style,
    cursor_style: Style,
) -> Vec<Span<'static>> {
    if width == 0 {
        return Vec::new();
    }
    let cursor = cursor.min(buf.len());
    let start = unicode::scroll_start(buf, cursor, width);
    let mut spans = Vec::new();

    let before = &buf[start..cursor];
    if !before.is_empty() {
        spans.push(Span::styled(before.to_string(), text_style));
    }
    match unicode::next_grapheme_boundary(buf, cursor) {
        Some(next) => {
            spans.push(Span::styled(buf[cursor..next].to_string(), cursor_style));
            let room = width.saturating_sub(spans_width(&spans));
            let after = unicode::truncate_to_width(&buf[next..], room);
            if !after.is_empty() {
                spans.push(Span::styled(after, text_style));
            }
        }
        None => spans.push(Span::styled(" ", cursor_style)),
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(spans: &[Span]) -> Vec<String> {
        spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn cursor_at_end_is_a_blank_cell() {
        let spans = edit_spans("milk", 4, 20, Style::default(), Style::default());
        assert_eq!(text(&spans), vec!["milk", " "]);
    }

    #[test]
    fn cursor_in_middle_splits_buffer() {
        let spans = edit_spans("milk", 1, 20, Style::default(), Style::default());
        assert_eq!(text(&spans), vec!["m", "i", "lk"]);
    }

    #[test]
    fn long_buffer_scrolls_to_cursor() {
        let spans = edit_spans("abcdefghij", 10, 5, Style::default(), Style::default());
        assert_eq!(text(&spans), vec!["ghij", " "]);
        assert_eq!(spans_width(&spans), 5);
    }

    #[test]
    fn right_aligned_dropped_when_too_wide() {
        let mut spans = vec![Span::raw("pintask")];
        push_right_aligned(&mut spans, vec![Span::raw("pinned")], 10, Style::default());
        assert_eq!(text(&spans), vec!["pintask"]);
        push_right_aligned(&mut spans, vec![Span::raw("ok")], 12, Style::default());
        assert_eq!(text(&spans), vec!["pintask", "   ", "ok"]);
    }
}
