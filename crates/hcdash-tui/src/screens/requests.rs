//! Requests screen: one request-count histogram per bridge above the
//! captured traffic table. Enter opens the detail overlay.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use indexmap::IndexMap;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;

use hcdash_config::BridgeEntry;
use hcdash_core::{HistogramState, TrafficLog, TrafficRepository};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::histogram;

pub struct RequestsScreen {
    focused: bool,
    traffic: Arc<TrafficLog>,
    table_state: TableState,
    /// Panel title per bridge id, in display order.
    bridges: IndexMap<String, String>,
    histograms: IndexMap<String, HistogramState>,
    throbber_state: ThrobberState,
}

impl RequestsScreen {
    pub fn new(traffic: Arc<TrafficLog>, bridges: Vec<BridgeEntry>) -> Self {
        let mut table_state = TableState::default();
        if !traffic.is_empty() {
            table_state.select(Some(0));
        }
        let histograms = bridges
            .iter()
            .map(|b| (b.id.clone(), HistogramState::Loading))
            .collect();
        let bridges = bridges
            .into_iter()
            .map(|b| {
                let title = b.label.unwrap_or_else(|| b.id.clone());
                (b.id, title)
            })
            .collect();
        Self {
            focused: false,
            traffic,
            table_state,
            bridges,
            histograms,
            throbber_state: ThrobberState::default(),
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.traffic.len();
        if len == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.selected_index() as isize;
        #[allow(clippy::cast_possible_wrap)]
        let next = (current + delta).clamp(0, len as isize - 1);
        #[allow(clippy::cast_sign_loss)]
        self.table_state.select(Some(next as usize));
    }

    fn any_loading(&self) -> bool {
        self.histograms
            .values()
            .any(|s| matches!(s, HistogramState::Loading))
    }

    fn render_histograms(&self, frame: &mut Frame, area: Rect) {
        let count = u32::try_from(self.bridges.len()).unwrap_or(u32::MAX).max(1);
        let columns = Layout::horizontal(
            self.bridges
                .keys()
                .map(|_| Constraint::Ratio(1, count))
                .collect::<Vec<_>>(),
        )
        .split(area);

        for (i, ((id, title), column)) in self.bridges.iter().zip(columns.iter()).enumerate() {
            let state = self
                .histograms
                .get(id)
                .unwrap_or(&HistogramState::Loading);
            let color = theme::CHART_SERIES[i % theme::CHART_SERIES.len()];
            histogram::render_panel(frame, *column, title, state, color, &self.throbber_state);
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Requests ({}) ", self.traffic.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if self.traffic.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No captured requests loaded")
                    .style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }

        let header = Row::new(vec![
            Cell::from("Id").style(theme::table_header()),
            Cell::from("Time").style(theme::table_header()),
            Cell::from("Method").style(theme::table_header()),
            Cell::from("Status").style(theme::table_header()),
            Cell::from("URL").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .traffic
            .records()
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                let status = record.status();
                let row_style = if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };

                Row::new(vec![
                    Cell::from(format!("{prefix}{}", record.id)),
                    Cell::from(record.time.clone().unwrap_or_else(|| "—".into())),
                    Cell::from(record.method().to_owned())
                        .style(Style::default().fg(theme::NEON_CYAN)),
                    Cell::from(status.map_or_else(|| "—".into(), |s| s.to_string()))
                        .style(Style::default().fg(theme::status_color(status))),
                    Cell::from(record.url().to_owned()),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Length(8),
            Constraint::Length(20),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Min(20),
        ];

        let table = Table::new(rows, widths)
            .block(block)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl Component for RequestsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::Char('g') | KeyCode::Home => self.move_selection(isize::MIN / 2),
            KeyCode::Char('G') | KeyCode::End => self.move_selection(isize::MAX / 2),
            KeyCode::Char('r') => return Ok(Some(Action::ReloadHistograms)),
            KeyCode::Enter => {
                return Ok(self
                    .traffic
                    .records()
                    .get(self.selected_index())
                    .map(|record| Action::OpenRequestDetail(record.id.clone())));
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick if self.any_loading() => self.throbber_state.calc_next(),
            Action::ReloadHistograms => {
                for state in self.histograms.values_mut() {
                    *state = HistogramState::Loading;
                }
            }
            Action::HistogramLoaded { bridge_id, state } => {
                let Some(slot) = self.histograms.get_mut(bridge_id) else {
                    return Ok(None);
                };
                *slot = state.clone();
                if let HistogramState::Failed(reason) = state {
                    let title = self.bridges.get(bridge_id).map_or(bridge_id.as_str(), String::as_str);
                    return Ok(Some(Action::Notify(Notification::warning(format!("{title}: {reason}")))));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let chart_height = if self.bridges.is_empty() {
            Constraint::Length(0)
        } else {
            Constraint::Percentage(45)
        };
        let [charts_area, table_area, hints_area] =
            Layout::vertical([chart_height, Constraint::Min(3), Constraint::Length(1)])
                .areas(area);

        if !self.bridges.is_empty() {
            self.render_histograms(frame, charts_area);
        }
        self.render_table(frame, table_area);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("details  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("reload charts", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), hints_area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hcdash_core::{HistogramSample, HistogramSpec, RecordId};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    const LOG: &str = r#"[
        { "id": 1, "homeConnectRequest": { "method": "GET", "url": "https://api.home-connect.com/a" } },
        { "id": "2", "homeConnectRequest": { "method": "PUT", "url": "https://api.home-connect.com/b" },
          "homeConnectResponse": { "code": 204 } }
    ]"#;

    fn screen() -> RequestsScreen {
        RequestsScreen::new(
            Arc::new(TrafficLog::from_json(LOG).unwrap()),
            vec![
                BridgeEntry {
                    id: "bridge-a".into(),
                    label: Some("Kitchen".into()),
                },
                BridgeEntry {
                    id: "bridge-b".into(),
                    label: None,
                },
            ],
        )
    }

    fn screen_text(screen: &RequestsScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|frame| screen.render(frame, frame.area()))
            .unwrap();
        let buf = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn enter_opens_detail_for_selected_record() {
        let mut screen = screen();
        screen.handle_key_event(KeyEvent::from(KeyCode::Down)).unwrap();

        let action = screen.handle_key_event(KeyEvent::from(KeyCode::Enter)).unwrap();
        let Some(Action::OpenRequestDetail(id)) = action else {
            panic!("expected detail action");
        };
        assert_eq!(id, RecordId::from("2"));
    }

    #[test]
    fn histogram_results_land_in_their_panel() {
        let mut screen = screen();
        let spec = HistogramSpec::new(
            &[HistogramSample {
                time: 1_700_000_000_000,
                request_count: 4,
            }],
            1000,
        );
        screen
            .update(&Action::HistogramLoaded {
                bridge_id: "bridge-a".into(),
                state: HistogramState::Ready(spec),
            })
            .unwrap();
        screen
            .update(&Action::HistogramLoaded {
                bridge_id: "bridge-b".into(),
                state: HistogramState::Failed("backend returned HTTP 502".into()),
            })
            .unwrap();

        assert!(matches!(screen.histograms["bridge-a"], HistogramState::Ready(_)));
        let text = screen_text(&screen);
        assert!(text.contains("Kitchen"));
        assert!(text.contains("4 requests"));
        assert!(text.contains("backend returned HTTP 502"));
    }

    #[test]
    fn unknown_bridge_results_are_ignored() {
        let mut screen = screen();
        screen
            .update(&Action::HistogramLoaded {
                bridge_id: "elsewhere".into(),
                state: HistogramState::Empty,
            })
            .unwrap();
        assert_eq!(screen.histograms.len(), 2);
    }

    #[test]
    fn reload_resets_panels_to_loading() {
        let mut screen = screen();
        screen
            .update(&Action::HistogramLoaded {
                bridge_id: "bridge-b".into(),
                state: HistogramState::Empty,
            })
            .unwrap();
        let action = screen.handle_key_event(KeyEvent::from(KeyCode::Char('r'))).unwrap();
        assert!(matches!(action, Some(Action::ReloadHistograms)));

        screen.update(&Action::ReloadHistograms).unwrap();
        assert!(screen.any_loading());
        assert!(
            screen
                .histograms
                .values()
                .all(|s| matches!(s, HistogramState::Loading))
        );
    }

    #[test]
    fn table_lists_method_and_status() {
        let text = screen_text(&screen());
        assert!(text.contains("Requests (2)"));
        assert!(text.contains("PUT"));
        assert!(text.contains("204"));
    }

    #[test]
    fn failed_chart_asks_for_a_warning() {
        let mut screen = screen();

        let follow_up = screen
            .update(&Action::HistogramLoaded {
                bridge_id: "bridge-a".into(),
                state: HistogramState::Failed("missing `time` column".into()),
            })
            .unwrap();

        let Some(Action::Notify(notification)) = follow_up else {
            panic!("expected a warning notification");
        };
        assert_eq!(notification.message, "Kitchen: missing `time` column");

        let unknown = screen
            .update(&Action::HistogramLoaded {
                bridge_id: "bridge-z".into(),
                state: HistogramState::Failed("gone".into()),
            })
            .unwrap();
        assert!(unknown.is_none());
    }
}
