//! Appliances screen: configured appliances with an action picker.
//!
//! Enter runs the selected API action, `g` opens a raw GET and `p` a raw
//! PUT against the highlighted appliance.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use hcdash_config::{ActionEntry, ApplianceEntry, Profile};
use hcdash_core::{DialogContext, RawCallKind};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::sub_tabs;

pub struct AppliancesScreen {
    focused: bool,
    appliances: Vec<ApplianceEntry>,
    actions: Vec<ActionEntry>,
    table_state: TableState,
    action_idx: usize,
}

impl AppliancesScreen {
    pub fn new(profile: &Profile) -> Self {
        let mut table_state = TableState::default();
        if !profile.appliances.is_empty() {
            table_state.select(Some(0));
        }
        Self {
            focused: false,
            appliances: profile.appliances.clone(),
            actions: profile.actions.clone(),
            table_state,
            action_idx: 0,
        }
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn move_selection(&mut self, delta: isize) {
        if self.appliances.is_empty() {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.selected_index() as isize;
        #[allow(clippy::cast_possible_wrap)]
        let next = (current + delta).clamp(0, self.appliances.len() as isize - 1);
        #[allow(clippy::cast_sign_loss)]
        self.table_state.select(Some(next as usize));
    }

    fn cycle_action(&mut self, forward: bool) {
        let len = self.actions.len();
        if len == 0 {
            return;
        }
        self.action_idx = if forward {
            (self.action_idx + 1) % len
        } else {
            (self.action_idx + len - 1) % len
        };
    }

    /// Dialog context for the highlighted appliance.
    fn selected_context(&self) -> Option<DialogContext> {
        let entry = self.appliances.get(self.selected_index())?;
        let mut ctx = DialogContext::for_thing(&entry.thing_id);
        if let Some(ha_id) = &entry.ha_id {
            ctx = ctx.with_ha_id(ha_id);
        }
        if let Some(bridge_id) = &entry.bridge_id {
            ctx = ctx.with_bridge_id(bridge_id);
        }
        Some(ctx)
    }

    fn open_action(&self) -> Option<Action> {
        let mut ctx = self.selected_context()?;
        if let Some(entry) = self.actions.get(self.action_idx) {
            ctx = ctx.with_action(&entry.action);
            if let Some(title) = &entry.title {
                ctx = ctx.with_title(title);
            }
        }
        Some(Action::OpenApiAction(ctx))
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Appliances ({}) ", self.appliances.len()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if self.appliances.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No appliances configured for this profile")
                    .style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }

        let header = Row::new(vec![
            Cell::from("Appliance").style(theme::table_header()),
            Cell::from("Thing").style(theme::table_header()),
            Cell::from("HA id").style(theme::table_header()),
            Cell::from("Bridge").style(theme::table_header()),
        ]);

        let selected_idx = self.selected_index();
        let rows: Vec<Row> = self
            .appliances
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let is_selected = i == selected_idx;
                let prefix = if is_selected { "▸" } else { " " };
                let label = entry.label.as_deref().unwrap_or(&entry.thing_id);
                let row_style = if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                };

                Row::new(vec![
                    Cell::from(format!("{prefix}{label}")).style(
                        Style::default()
                            .fg(theme::NEON_CYAN)
                            .add_modifier(if is_selected {
                                Modifier::BOLD
                            } else {
                                Modifier::empty()
                            }),
                    ),
                    Cell::from(entry.thing_id.clone()),
                    Cell::from(entry.ha_id.clone().unwrap_or_else(|| "—".into()))
                        .style(Style::default().fg(theme::CORAL)),
                    Cell::from(entry.bridge_id.clone().unwrap_or_else(|| "—".into())),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Min(16),
            Constraint::Min(24),
            Constraint::Length(16),
            Constraint::Min(16),
        ];

        let table = Table::new(rows, widths)
            .block(block)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl Component for AppliancesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Home => self.move_selection(isize::MIN / 2),
            KeyCode::End => self.move_selection(isize::MAX / 2),
            KeyCode::Char('l') | KeyCode::Right => self.cycle_action(true),
            KeyCode::Char('h') | KeyCode::Left => self.cycle_action(false),
            KeyCode::Enter => return Ok(self.open_action()),
            KeyCode::Char('g') => {
                return Ok(self
                    .selected_context()
                    .map(|ctx| Action::OpenRawCall(RawCallKind::Get, ctx)));
            }
            KeyCode::Char('p') => {
                return Ok(self
                    .selected_context()
                    .map(|ctx| Action::OpenRawCall(RawCallKind::Put, ctx)));
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [tabs_area, table_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let labels: Vec<&str> = self
            .actions
            .iter()
            .map(|a| a.title.as_deref().unwrap_or(&a.action))
            .collect();
        let mut tabs = vec![Span::styled(" Action ", theme::key_hint())];
        tabs.extend(
            sub_tabs::render_sub_tabs(&labels, self.action_idx, tabs_area.width.saturating_sub(8))
                .spans,
        );
        frame.render_widget(Paragraph::new(Line::from(tabs)), tabs_area);

        self.render_table(frame, table_area);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("h/l ", theme::key_hint_key()),
            Span::styled("action  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("run  ", theme::key_hint()),
            Span::styled("g ", theme::key_hint_key()),
            Span::styled("raw GET  ", theme::key_hint()),
            Span::styled("p ", theme::key_hint_key()),
            Span::styled("raw PUT", theme::key_hint()),
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
    use pretty_assertions::assert_eq;

    use super::*;

    fn profile() -> Profile {
        let mut profile = Profile::for_backend("http://localhost:8080/homeconnect");
        profile.appliances = vec![
            ApplianceEntry {
                thing_id: "homeconnect:oven:bridge:X".into(),
                ha_id: Some("X".into()),
                label: Some("Oven".into()),
                bridge_id: Some("homeconnect:api_bridge:bridge".into()),
            },
            ApplianceEntry {
                thing_id: "homeconnect:washer:bridge:W".into(),
                ha_id: None,
                label: None,
                bridge_id: None,
            },
        ];
        profile.actions = vec![
            ActionEntry {
                action: "show-details".into(),
                title: Some("Details".into()),
            },
            ActionEntry {
                action: "get-programs".into(),
                title: None,
            },
        ];
        profile
    }

    fn press(screen: &mut AppliancesScreen, code: KeyCode) -> Option<Action> {
        screen.handle_key_event(KeyEvent::from(code)).unwrap()
    }

    #[test]
    fn enter_opens_selected_action_for_selected_appliance() {
        let mut screen = AppliancesScreen::new(&profile());

        let Some(Action::OpenApiAction(ctx)) = press(&mut screen, KeyCode::Enter) else {
            panic!("expected api action");
        };
        assert_eq!(
            ctx,
            DialogContext::for_thing("homeconnect:oven:bridge:X")
                .with_ha_id("X")
                .with_bridge_id("homeconnect:api_bridge:bridge")
                .with_action("show-details")
                .with_title("Details")
        );
    }

    #[test]
    fn action_picker_wraps_and_untitled_action_has_no_title() {
        let mut screen = AppliancesScreen::new(&profile());
        press(&mut screen, KeyCode::Char('h'));

        let Some(Action::OpenApiAction(ctx)) = press(&mut screen, KeyCode::Enter) else {
            panic!("expected api action");
        };
        assert_eq!(ctx.action.as_deref(), Some("get-programs"));
        assert_eq!(ctx.title, None);
    }

    #[test]
    fn raw_keys_open_raw_dialogs_for_selection() {
        let mut screen = AppliancesScreen::new(&profile());
        press(&mut screen, KeyCode::Char('j'));

        let Some(Action::OpenRawCall(kind, ctx)) = press(&mut screen, KeyCode::Char('p')) else {
            panic!("expected raw call");
        };
        assert_eq!(kind, RawCallKind::Put);
        assert_eq!(ctx, DialogContext::for_thing("homeconnect:washer:bridge:W"));
    }

    #[test]
    fn selection_clamps_at_ends() {
        let mut screen = AppliancesScreen::new(&profile());
        press(&mut screen, KeyCode::Char('k'));
        assert_eq!(screen.selected_index(), 0);
        press(&mut screen, KeyCode::End);
        assert_eq!(screen.selected_index(), 1);
    }

    #[test]
    fn no_appliances_means_no_dialogs() {
        let mut screen =
            AppliancesScreen::new(&Profile::for_backend("http://localhost:8080/homeconnect"));
        assert!(press(&mut screen, KeyCode::Enter).is_none());
        assert!(press(&mut screen, KeyCode::Char('g')).is_none());
    }
}
