//! Request-count histogram panel for one bridge.

use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use hcdash_core::{HistogramBin, HistogramSpec, HistogramState};

use crate::theme;

/// Bins regrouped so the chart never has more bars than plot columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bars {
    pub start_ms: i64,
    pub end_ms: i64,
    /// Width of one bar: a whole number of bins.
    pub width_ms: i64,
    pub bars: Vec<HistogramBin>,
}

/// Group sorted bins into at most `columns` equal-width bars. Every bin lands
/// in exactly one bar and bar totals are saturating sums.
pub fn group_bins(bins: &[HistogramBin], bin_size_ms: i64, columns: usize) -> Bars {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Bars::default();
    };
    let bin_size_ms = bin_size_ms.max(1);
    let columns = i64::try_from(columns.max(1)).unwrap_or(i64::MAX);

    let span = last.start.saturating_add(bin_size_ms).saturating_sub(first.start);
    let slots = div_ceil(span, bin_size_ms).max(1);
    let width_ms = div_ceil(slots, columns).saturating_mul(bin_size_ms);

    let mut bars: Vec<HistogramBin> = Vec::new();
    for bin in bins {
        let slot = bin.start.saturating_sub(first.start) / width_ms;
        let start = first.start.saturating_add(slot.saturating_mul(width_ms));
        match bars.last_mut() {
            Some(bar) if bar.start == start => bar.total = bar.total.saturating_add(bin.total),
            _ => bars.push(HistogramBin {
                start,
                total: bin.total,
            }),
        }
    }

    Bars {
        start_ms: first.start,
        end_ms: first
            .start
            .saturating_add(div_ceil(span, width_ms).saturating_mul(width_ms)),
        width_ms,
        bars,
    }
}

/// Draw each bar as a flat-topped block for `GraphType::Bar`: several points
/// per bar so it fills its columns, x in epoch seconds. Empty slots get no
/// points.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn step_fill(bars: &Bars, columns: usize) -> Vec<(f64, f64)> {
    if bars.bars.is_empty() || bars.width_ms <= 0 {
        return Vec::new();
    }
    let slots = div_ceil(bars.end_ms.saturating_sub(bars.start_ms), bars.width_ms).max(1);
    // 3 points per column keeps float to cell rounding from leaving gaps
    let wanted = i64::try_from(columns.max(1).saturating_mul(3)).unwrap_or(i64::MAX);
    let per_bar = div_ceil(wanted, slots).max(1);
    let step = bars.width_ms as f64 / per_bar as f64;

    bars.bars
        .iter()
        .flat_map(|bar| {
            (0..per_bar).map(move |k| {
                let x_ms = bar.start as f64 + step * k as f64;
                (x_ms / 1000.0, bar.total as f64)
            })
        })
        .collect()
}

/// Ceiling division for a non-negative dividend and positive divisor.
fn div_ceil(value: i64, divisor: i64) -> i64 {
    value / divisor + i64::from(value % divisor != 0)
}

/// Local wall-clock label for an epoch-millisecond instant.
pub fn time_label(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(
        || ms.to_string(),
        |dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
    )
}

/// Headroom above the tallest bar, never below 1.
#[allow(clippy::cast_precision_loss)]
pub fn y_ceiling(bins: &[HistogramBin]) -> f64 {
    let max = bins.iter().map(|b| b.total).max().unwrap_or(0) as f64;
    (max * 1.2).max(1.0)
}

/// Render one bridge panel in whatever state its chart is in.
pub fn render_panel(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &HistogramState,
    color: Color,
    throbber: &ThrobberState,
) {
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    match state {
        HistogramState::Loading => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let throbber_widget = Throbber::default()
                .label("Loading request counts...")
                .style(Style::default().fg(theme::DIM_WHITE))
                .throbber_style(Style::default().fg(theme::NEON_CYAN));
            frame.render_stateful_widget(throbber_widget, inner, &mut throbber.clone());
        }
        HistogramState::Empty => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No requests recorded yet")
                    .style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
        }
        HistogramState::Failed(message) => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("  ✗ ", Style::default().fg(theme::ERROR_RED)),
                    Span::styled(message.as_str(), Style::default().fg(theme::DIM_WHITE)),
                ])),
                inner,
            );
        }
        HistogramState::Ready(spec) => render_chart(frame, area, block, spec, color),
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_chart(frame: &mut Frame, area: Rect, block: Block<'_>, spec: &HistogramSpec, color: Color) {
    // Plot area sits inside the border and the y labels
    let columns = usize::from(area.width.saturating_sub(10)).max(1);
    let bars = group_bins(&spec.bins(), spec.bin_size_ms, columns);
    if bars.bars.is_empty() {
        return;
    }
    let x_min_ms = bars.start_ms;
    let x_max_ms = bars.end_ms;

    let block = block.title_bottom(
        Line::from(Span::styled(
            format!(" {} requests ", spec.total_requests()),
            theme::key_hint(),
        ))
        .alignment(Alignment::Right),
    );

    let fill = step_fill(&bars, columns);
    let y_max = y_ceiling(&bars.bars);

    let dataset = Dataset::default()
        .marker(Marker::HalfBlock)
        .graph_type(GraphType::Bar)
        .style(Style::default().fg(color))
        .data(&fill);

    let label_style = Style::default().fg(theme::BORDER_GRAY);
    let x_labels = vec![
        Span::styled(time_label(x_min_ms), label_style),
        Span::styled(time_label(x_min_ms.saturating_add(x_max_ms.saturating_sub(x_min_ms) / 2)), label_style),
        Span::styled(time_label(x_max_ms), label_style),
    ];
    let y_labels = vec![
        Span::styled("0", label_style),
        Span::styled(format!("{:.0}", y_max / 2.0), label_style),
        Span::styled(format!("{y_max:.0}"), label_style),
    ];

    let x_title = spec.x_axis.title.clone().unwrap_or_default();
    let y_title = spec.y_axis.title.clone().unwrap_or_default();

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled(x_title, label_style))
                .bounds([x_min_ms as f64 / 1000.0, x_max_ms as f64 / 1000.0])
                .labels(x_labels)
                .style(label_style),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(y_title, label_style))
                .bounds([0.0, y_max])
                .labels(y_labels)
                .style(label_style),
        );

    frame.render_widget(chart, area);
}
