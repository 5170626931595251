//! Horizontal sub-tab bar used inside screens (the action picker).

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// Tab bar line with the active tab highlighted. When the labels do not
/// fit in `max_width` columns, a window around the active tab is shown with
/// `‹`/`›` markers for the hidden side.
pub fn render_sub_tabs<'a>(labels: &[&'a str], active_index: usize, max_width: u16) -> Line<'a> {
    let (start, end) = visible_window(labels, active_index, usize::from(max_width));
    let mut spans = Vec::with_capacity(labels.len() * 2 + 2);

    if start > 0 {
        spans.push(Span::styled("‹ ", theme::key_hint()));
    }
    for (i, label) in labels.iter().enumerate().take(end).skip(start) {
        if i > start {
            spans.push(Span::styled("  ", theme::key_hint()));
        }

        if i == active_index {
            spans.push(Span::styled(
                format!("[{label}]"),
                theme::tab_active().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(*label, theme::tab_inactive()));
        }
    }
    if end < labels.len() {
        spans.push(Span::styled(" ›", theme::key_hint()));
    }

    Line::from(spans)
}

/// Width of a label as drawn, brackets included for the active one.
fn drawn_width(label: &str, active: bool) -> usize {
    label.chars().count() + if active { 2 } else { 0 }
}

/// Half-open index range of the labels to draw. Grows outward from the
/// active tab until the width budget (markers reserved) runs out.
fn visible_window(labels: &[&str], active_index: usize, max_width: usize) -> (usize, usize) {
    if labels.is_empty() {
        return (0, 0);
    }
    let active = active_index.min(labels.len() - 1);
    let budget = max_width.saturating_sub(4);

    let mut start = active;
    let mut end = active + 1;
    let mut used = drawn_width(labels[active], true);

    loop {
        let mut grew = false;
        if end < labels.len() {
            let cost = drawn_width(labels[end], false) + 2;
            if used + cost <= budget {
                used += cost;
                end += 1;
                grew = true;
            }
        }
        if start > 0 {
            let cost = drawn_width(labels[start - 1], false) + 2;
            if used + cost <= budget {
                used += cost;
                start -= 1;
                grew = true;
            }
        }
        if !grew {
            break;
        }
    }

    (start, end)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn everything_fits() {
        let line = render_sub_tabs(&["Details", "Programs"], 1, 80);
        assert_eq!(text(&line), "Details  [Programs]");
    }

    #[test]
    fn narrow_width_windows_around_active_tab() {
        let labels = ["one", "two", "three", "four", "five", "six"];
        let line = render_sub_tabs(&labels, 5, 20);
        let rendered = text(&line);

        assert!(rendered.starts_with("‹ "));
        assert!(rendered.ends_with("[six]"));
        assert!(!rendered.contains("one"));
    }

    #[test]
    fn empty_labels_render_nothing() {
        assert!(render_sub_tabs(&[], 0, 40).spans.is_empty());
    }
}
