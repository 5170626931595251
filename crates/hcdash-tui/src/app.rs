//! Application core: event loop, screen and dialog management, action
//! dispatch and background backend calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use hcdash_config::{BridgeEntry, Profile};
use hcdash_core::{
    Backend, RawCallKind, Submission, TrafficLog, execute, histogram,
};

use crate::action::{Action, DialogId, Notification, NotificationLevel};
use crate::component::Component;
use crate::dialogs::{ApiActionPopup, DetailPopup, RawCallPopup};
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// Everything the app needs from startup.
pub struct AppContext<B> {
    pub backend: Arc<B>,
    pub traffic: Arc<TrafficLog>,
    pub profile: Profile,
    /// Shown in the status bar.
    pub backend_label: String,
    pub bin_size_ms: i64,
}

/// Bridges to chart: the configured ones first, then any bridge an
/// appliance names that is not already listed.
pub fn bridges_for(profile: &Profile) -> Vec<BridgeEntry> {
    let mut bridges = profile.bridges.clone();
    for bridge_id in profile.appliances.iter().filter_map(|a| a.bridge_id.as_ref()) {
        if !bridges.iter().any(|b| &b.id == bridge_id) {
            bridges.push(BridgeEntry {
                id: bridge_id.clone(),
                label: None,
            });
        }
    }
    bridges
}

/// Top-level application state and event loop.
pub struct App<B> {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    api_action: ApiActionPopup,
    raw_get: RawCallPopup,
    raw_put: RawCallPopup,
    detail: DetailPopup,
    /// Overlay currently capturing keys.
    open_dialog: Option<DialogId>,
    running: bool,
    help_visible: bool,
    notification: Option<(Notification, Instant)>,
    backend: Arc<B>,
    backend_label: String,
    record_count: usize,
    bridges: Vec<BridgeEntry>,
    bin_size_ms: i64,
    /// Bumped on every histogram reload; late results from an older
    /// generation are dropped.
    histogram_generation: Arc<AtomicU64>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl<B: Backend + 'static> App<B> {
    pub fn new(ctx: AppContext<B>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let bridges = bridges_for(&ctx.profile);
        let screens = create_screens(&ctx.profile, Arc::clone(&ctx.traffic), bridges.clone())
            .into_iter()
            .collect();

        Self {
            active_screen: ScreenId::default(),
            screens,
            api_action: ApiActionPopup::new(),
            raw_get: RawCallPopup::new(RawCallKind::Get),
            raw_put: RawCallPopup::new(RawCallKind::Put),
            detail: DetailPopup::new(Arc::clone(&ctx.traffic)),
            open_dialog: None,
            running: true,
            help_visible: false,
            notification: None,
            backend: ctx.backend,
            backend_label: ctx.backend_label,
            record_count: ctx.traffic.len(),
            bridges,
            bin_size_ms: ctx.bin_size_ms,
            histogram_generation: Arc::new(AtomicU64::new(0)),
            action_tx,
            action_rx,
        }
    }

    fn init_components(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop until quit.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;
        self.init_components()?;
        self.action_tx.send(Action::ReloadHistograms)?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    fn dialog(&self, id: DialogId) -> &dyn Component {
        match id {
            DialogId::ApiAction => &self.api_action,
            DialogId::RawGet => &self.raw_get,
            DialogId::RawPut => &self.raw_put,
            DialogId::RequestDetail => &self.detail,
        }
    }

    fn dialog_mut(&mut self, id: DialogId) -> &mut dyn Component {
        match id {
            DialogId::ApiAction => &mut self.api_action,
            DialogId::RawGet => &mut self.raw_get,
            DialogId::RawPut => &mut self.raw_put,
            DialogId::RequestDetail => &mut self.detail,
        }
    }

    fn raw_popup(&mut self, kind: RawCallKind) -> &mut RawCallPopup {
        match kind {
            RawCallKind::Get => &mut self.raw_get,
            RawCallKind::Put => &mut self.raw_put,
        }
    }

    /// Global keys first, then the open dialog (which captures everything
    /// else), then the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if let Some(id) = self.open_dialog {
            return self.dialog_mut(id).handle_key_event(key);
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = u8::try_from(c).map_or(0, |b| b - b'0');
                if let Some(screen) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Esc) if self.notification.is_some() => {
                return Ok(Some(Action::DismissNotification));
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            _ => {}
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    /// Apply one action to app state and route it to components.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render => {}

            Action::Tick => {
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > Duration::from_secs(3) {
                        self.notification = None;
                    }
                }
                if let Some(id) = self.open_dialog {
                    let follow_up = self.dialog_mut(id).update(action)?;
                    self.dispatch(follow_up)?;
                }
                self.update_screen(self.active_screen, action)?;
            }

            Action::SwitchScreen(target) => {
                if *target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(false);
                    }
                    self.active_screen = *target;
                    if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                        screen.set_focused(true);
                    }
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // ── Dialogs ───────────────────────────────────────────
            Action::OpenApiAction(ctx) => {
                self.close_dialog();
                if let Some(submit) = self.api_action.open(ctx.clone()) {
                    self.action_tx.send(submit)?;
                }
                self.open_dialog = Some(DialogId::ApiAction);
            }

            Action::OpenRawCall(kind, ctx) => {
                self.close_dialog();
                self.raw_popup(*kind).open(ctx.clone());
                self.open_dialog = Some((*kind).into());
            }

            Action::OpenRequestDetail(id) => {
                self.close_dialog();
                self.detail.open(id);
                self.open_dialog = Some(DialogId::RequestDetail);
            }

            Action::CloseDialog => self.close_dialog(),

            Action::Submit(dialog, submission) => self.spawn_call(*dialog, submission.clone()),

            Action::CallCompleted { dialog, .. } => {
                let follow_up = self.dialog_mut(*dialog).update(action)?;
                self.dispatch(follow_up)?;
            }

            // ── Histograms ────────────────────────────────────────
            Action::ReloadHistograms => {
                self.load_histograms();
                self.update_screen(ScreenId::Requests, action)?;
            }

            Action::HistogramLoaded { .. } => self.update_screen(ScreenId::Requests, action)?,

            // ── Notifications ─────────────────────────────────────
            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),
            Action::DismissNotification => self.notification = None,
        }

        Ok(())
    }

    fn update_screen(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        let follow_up = match self.screens.get_mut(&id) {
            Some(screen) => screen.update(action)?,
            None => None,
        };
        self.dispatch(follow_up)
    }

    /// Queue a component's follow-up action behind the current one.
    fn dispatch(&self, follow_up: Option<Action>) -> Result<()> {
        if let Some(action) = follow_up {
            self.action_tx.send(action)?;
        }
        Ok(())
    }

    fn close_dialog(&mut self) {
        match self.open_dialog.take() {
            Some(DialogId::ApiAction) => self.api_action.close(),
            Some(DialogId::RawGet) => self.raw_get.close(),
            Some(DialogId::RawPut) => self.raw_put.close(),
            Some(DialogId::RequestDetail) => self.detail.close(),
            None => {}
        }
    }

    // ── Background work ───────────────────────────────────────────

    /// Run a dialog's backend call off the UI loop. The completion comes
    /// back as `CallCompleted`; a failure also raises a toast.
    fn spawn_call(&self, dialog: DialogId, submission: Submission) {
        let backend = Arc::clone(&self.backend);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let Submission { ticket, request } = submission;
            let result = execute(backend.as_ref(), &request).await;
            let toast = match &result {
                Err(failure) => Some(Notification::error(failure.banner())),
                Ok(_) if dialog == DialogId::RawPut => Some(Notification::success("PUT accepted")),
                Ok(_) => None,
            };
            if let Some(toast) = toast {
                let _ = tx.send(Action::Notify(toast));
            }
            let _ = tx.send(Action::CallCompleted {
                dialog,
                ticket,
                result,
            });
        });
    }

    /// Fetch every bridge's CSV concurrently. Results from a superseded
    /// reload are discarded.
    fn load_histograms(&self) {
        let generation = self.histogram_generation.fetch_add(1, Ordering::Relaxed) + 1;
        info!(generation, bridges = self.bridges.len(), "loading request histograms");
        if generation > 1 && !self.bridges.is_empty() {
            let _ = self
                .action_tx
                .send(Action::Notify(Notification::info("Reloading request histograms")));
        }

        for bridge in &self.bridges {
            let backend = Arc::clone(&self.backend);
            let tx = self.action_tx.clone();
            let gen_ref = Arc::clone(&self.histogram_generation);
            let bridge_id = bridge.id.clone();
            let bin_size_ms = self.bin_size_ms;

            tokio::spawn(async move {
                let state = histogram::load(backend.as_ref(), &bridge_id, bin_size_ms).await;
                if gen_ref.load(Ordering::Relaxed) != generation {
                    debug!(%bridge_id, generation, "dropping superseded histogram");
                    return;
                }
                let _ = tx.send(Action::HistogramLoaded { bridge_id, state });
            });
        }
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content_area, tab_area, status_area] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content_area);
        }
        self.render_tab_bar(frame, tab_area);
        self.render_status_bar(frame, status_area);

        if let Some(id) = self.open_dialog {
            self.dialog(id).render(frame, content_area);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled("● ", Style::default().fg(theme::SUCCESS_GREEN)),
            Span::styled(self.backend_label.as_str(), theme::tab_inactive()),
            Span::styled(
                format!(" │ {} captured requests", self.record_count),
                theme::key_hint(),
            ),
            Span::styled(" │ ? help  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 56u16.min(area.width.saturating_sub(4));
        let help_height = 20u16.min(area.height.saturating_sub(4));
        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let entry = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ])
        };
        let heading = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };

        let help_text = vec![
            Line::from(""),
            heading("Navigation"),
            entry("1-2", "Jump to screen"),
            entry("Tab", "Next screen"),
            entry("j/k ↑/↓", "Move up/down"),
            entry("Esc", "Close dialog"),
            Line::from(""),
            heading("Appliances"),
            entry("h/l", "Pick action"),
            entry("Enter", "Run action"),
            entry("g / p", "Raw GET / raw PUT"),
            Line::from(""),
            heading("Requests"),
            entry("Enter", "Request details"),
            entry("r", "Reload histograms"),
            Line::from(""),
            entry("q", "Quit"),
            Line::from(Span::styled(
                "                     Esc or ? to close",
                theme::key_hint(),
            )),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 60).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
            NotificationLevel::Error => (theme::ERROR_RED, "✗"),
            NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
            NotificationLevel::Info => (theme::NEON_CYAN, "·"),
        };

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hcdash_api::CsvDocument;
    use hcdash_config::ApplianceEntry;
    use hcdash_core::{BackendRequest, CoreError, DialogContext, HistogramState};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::{Value, json};

    use super::*;

    /// Echoes the request back; a PUT body of `fail` yields an HTTP 500.
    struct FakeBackend;

    impl Backend for FakeBackend {
        async fn call(&self, request: &BackendRequest) -> Result<Value, CoreError> {
            match request {
                BackendRequest::RawPut { body, .. } if body == "fail" => {
                    Err(CoreError::NetworkFailure {
                        message: "backend returned HTTP 500".into(),
                        status: Some(500),
                        body: Some(r#"{"error":"boom"}"#.into()),
                    })
                }
                _ => Ok(json!({ "action": request.action(), "thing": request.thing_id() })),
            }
        }

        async fn request_csv(&self, _bridge_id: &str) -> Result<CsvDocument, CoreError> {
            Ok(hcdash_api::csv::parse("time,requests\n1700000000000,3\n")?)
        }
    }

    fn profile() -> Profile {
        let mut profile = Profile::for_backend("http://localhost:8080/homeconnect");
        profile.bridges = vec![BridgeEntry {
            id: "bridge-a".into(),
            label: None,
        }];
        profile.appliances = vec![ApplianceEntry {
            thing_id: "homeconnect:oven:bridge-a:X".into(),
            ha_id: Some("X".into()),
            label: Some("Oven".into()),
            bridge_id: Some("bridge-a".into()),
        }];
        profile
    }

    fn app() -> App<FakeBackend> {
        App::new(AppContext {
            backend: Arc::new(FakeBackend),
            traffic: Arc::new(TrafficLog::default()),
            profile: profile(),
            backend_label: "http://localhost:8080/homeconnect".into(),
            bin_size_ms: 1000,
        })
    }

    fn press(app: &mut App<FakeBackend>, code: KeyCode) -> Option<Action> {
        app.handle_key_event(KeyEvent::from(code)).unwrap()
    }

    /// Let spawned tasks finish, then collect what they sent.
    async fn drain(app: &mut App<FakeBackend>) -> Vec<Action> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let mut out = Vec::new();
        while let Ok(action) = app.action_rx.try_recv() {
            out.push(action);
        }
        out
    }

    fn screen_text(app: &App<FakeBackend>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
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
    fn bridges_include_appliance_bridges_once() {
        let mut profile = profile();
        profile.appliances.push(ApplianceEntry {
            thing_id: "homeconnect:washer:bridge-b:W".into(),
            ha_id: None,
            label: None,
            bridge_id: Some("bridge-b".into()),
        });

        let ids: Vec<String> = bridges_for(&profile).into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["bridge-a", "bridge-b"]);
    }

    #[tokio::test]
    async fn raw_get_round_trip_renders_response() {
        let mut app = app();
        app.process_action(&Action::OpenRawCall(
            RawCallKind::Get,
            DialogContext::for_thing("homeconnect:oven:bridge-a:X").with_ha_id("X"),
        ))
        .unwrap();
        assert_eq!(app.open_dialog, Some(DialogId::RawGet));

        let submit = press(&mut app, KeyCode::Enter).unwrap();
        app.process_action(&submit).unwrap();

        for action in drain(&mut app).await {
            app.process_action(&action).unwrap();
        }
        let text = screen_text(&app);
        assert!(text.contains("Response"));
        assert!(text.contains(r#""action": "get-raw""#));
    }

    #[tokio::test]
    async fn open_dialog_captures_keys() {
        let mut app = app();
        app.process_action(&Action::OpenRawCall(
            RawCallKind::Put,
            DialogContext::for_thing("t"),
        ))
        .unwrap();

        assert!(press(&mut app, KeyCode::Char('q')).is_none());
        assert!(press(&mut app, KeyCode::Char('2')).is_none());
        assert!(app.running);

        let close = press(&mut app, KeyCode::Esc).unwrap();
        app.process_action(&close).unwrap();
        assert_eq!(app.open_dialog, None);
        assert!(matches!(press(&mut app, KeyCode::Char('q')), Some(Action::Quit)));
    }

    #[tokio::test]
    async fn failed_put_raises_error_toast() {
        let mut app = app();
        app.process_action(&Action::OpenRawCall(
            RawCallKind::Put,
            DialogContext::for_thing("t").with_ha_id("X"),
        ))
        .unwrap();
        press(&mut app, KeyCode::Tab);
        for c in "fail".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let submit = press(&mut app, KeyCode::Enter).unwrap();
        app.process_action(&submit).unwrap();

        let actions = drain(&mut app).await;
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::Notify(n) if n.level == NotificationLevel::Error
                && n.message == "Request failed (HTTP 500)"
        )));
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::CallCompleted { dialog: DialogId::RawPut, result: Err(_), .. }
        )));
    }

    #[tokio::test]
    async fn api_action_open_queues_its_submission() {
        let mut app = app();
        app.process_action(&Action::OpenApiAction(
            DialogContext::for_thing("t").with_action("get-door-state"),
        ))
        .unwrap();

        let Ok(Action::Submit(DialogId::ApiAction, submission)) = app.action_rx.try_recv() else {
            panic!("expected a queued submission");
        };
        assert_eq!(submission.request.action(), "get-door-state");
    }

    #[tokio::test]
    async fn superseded_histogram_reload_is_dropped() {
        let mut app = app();
        app.process_action(&Action::ReloadHistograms).unwrap();
        app.process_action(&Action::ReloadHistograms).unwrap();

        let loaded: Vec<_> = drain(&mut app)
            .await
            .into_iter()
            .filter_map(|a| match a {
                Action::HistogramLoaded { bridge_id, state } => Some((bridge_id, state)),
                _ => None,
            })
            .collect();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, "bridge-a");
        assert!(matches!(loaded[0].1, HistogramState::Ready(ref spec) if spec.total_requests() == 3));
    }

    #[tokio::test]
    async fn screen_follow_up_reaches_the_notification_bar() {
        let mut app = app();
        app.process_action(&Action::HistogramLoaded {
            bridge_id: "bridge-a".into(),
            state: HistogramState::Failed("Backend returned HTTP 503".into()),
        })
        .unwrap();

        let follow_up = app.action_rx.try_recv().unwrap();
        app.process_action(&follow_up).unwrap();

        let (notification, _) = app.notification.clone().unwrap();
        assert_eq!(notification.level, NotificationLevel::Warning);
        assert_eq!(notification.message, "bridge-a: Backend returned HTTP 503");
    }
}
