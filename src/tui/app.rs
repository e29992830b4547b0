use crate::access::{Page, Router, UserContext};
use crate::config::Config;
use crate::core::{
    DashboardState, DataSource, Dataset, LoadError, LoadOutcome, Notification, Notifications, RequestId,
};
use crate::services::{DataService, ExportService};
use crate::tui::components::{
    ColumnDialog, DataTable, FilterDialog, HelpOverlay, LoginForm, NavBar, RegionTabs, SettingsPage, StaticPage,
    StatusBar, TableSnapshot, Toolbar,
};
use crate::tui::{Action, Component, Focusable, KeyBindings, Modal, ModalOutcome, Theme};
use chrono::Utc;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Completion of a spawned load, delivered back to the UI loop
#[derive(Debug)]
pub struct LoadEvent {
    pub source: DataSource,
    pub request: RequestId,
    pub result: Result<Dataset, LoadError>,
}

/// Pages reachable without signing in, in navigation order
const PUBLIC_PAGES: [Page; 4] = [Page::Login, Page::Register, Page::Library, Page::Contact];

enum Overlay {
    Filter(FilterDialog),
    Columns(ColumnDialog),
}

/// Application state
///
/// Owns one [`DashboardState`] per data page, routes keys to the focused
/// component and spawns loads whose results come back as [`LoadEvent`]s.
pub struct App {
    config: Config,
    router: Router,
    user: Option<UserContext>,
    page: Page,

    dashboards: HashMap<DataSource, DashboardState>,
    services: HashMap<DataSource, DataService>,
    load_tx: UnboundedSender<LoadEvent>,
    cancel: CancellationToken,

    nav_bar: NavBar,
    region_tabs: RegionTabs,
    toolbar: Toolbar,
    data_table: DataTable,
    status_bar: StatusBar,
    login: LoginForm,
    overlay: Option<Overlay>,
    help: Option<HelpOverlay>,

    keybindings: KeyBindings,
    theme: Theme,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        user: Option<UserContext>,
        load_tx: UnboundedSender<LoadEvent>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let router = Router::new(config.base_path.clone(), config.tab_visibility.clone());

        let mut dashboards = HashMap::new();
        let mut services = HashMap::new();
        for source in DataSource::all() {
            dashboards.insert(
                source,
                DashboardState::new(source, config.page_size, Notifications::new(config.notification_ttl())),
            );
            if let Some(endpoint) = config.endpoint(source) {
                services.insert(source, DataService::new(endpoint, config.request_timeout())?);
            }
        }

        let keybindings = KeyBindings::with_overrides(&config.keybindings);
        for warning in keybindings.validate() {
            debug!("keybindings: {}", warning);
        }
        let theme = Theme::from_name(config.theme);

        Ok(Self {
            config,
            router,
            user,
            page: Page::Login,
            dashboards,
            services,
            load_tx,
            cancel,
            nav_bar: NavBar::new(),
            region_tabs: RegionTabs::new(),
            toolbar: Toolbar::new(),
            data_table: DataTable::new(),
            status_bar: StatusBar::new(),
            login: LoginForm::new(),
            overlay: None,
            help: None,
            keybindings,
            theme,
            should_quit: false,
        })
    }

    /// Resolve `path` for the current user and show the resulting page.
    ///
    /// A data page is loaded on its first visit.
    pub fn navigate(&mut self, path: &str) {
        let page = self.router.navigate(path, self.user.as_ref());
        if page != self.page {
            info!("navigate {} -> {:?}", path, page);
        }
        self.page = page;
        self.overlay = None;
        self.toolbar.set_focused(false);
        self.data_table.reset_cursor();

        if let Some(source) = page.data_source() {
            let requested = self.dashboards.get(&source).is_some_and(|d| d.has_requested());
            if !requested {
                self.refresh(source);
            }
        }
        self.sync_views();
    }

    /// Sign in as `email`; the role comes from the configuration
    pub fn sign_in(&mut self, email: &str) {
        let role = self.config.role_for(email);
        info!("signed in as {} ({})", email, role);
        self.user = Some(UserContext::new(email, role));
        self.login = LoginForm::new();
        self.navigate(&self.router.href(Page::MarketLines));
    }

    /// Spawn a load of `source`. Completion arrives through the load channel.
    pub fn refresh(&mut self, source: DataSource) {
        let Some(dashboard) = self.dashboards.get_mut(&source) else {
            return;
        };
        let Some(service) = self.services.get(&source).cloned() else {
            error!("no endpoint configured for {}", source);
            dashboard
                .notifications_mut()
                .push(Notification::error(format!("No endpoint configured for {}", source.title())));
            return;
        };

        let request = dashboard.begin_load();
        let tx = self.load_tx.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("{} load {} cancelled", source, request);
                }
                result = service.load() => {
                    if tx.send(LoadEvent { source, request, result }).is_err() {
                        debug!("{} load {} finished after shutdown", source, request);
                    }
                }
            }
        });
        self.sync_views();
    }

    pub fn handle_load_event(&mut self, event: LoadEvent) {
        let Some(dashboard) = self.dashboards.get_mut(&event.source) else {
            return;
        };
        let outcome = dashboard.complete_load(event.request, event.result);
        debug!("{} load {} -> {:?}", event.source, event.request, outcome);
        if outcome == LoadOutcome::Applied && self.page.data_source() == Some(event.source) {
            self.data_table.reset_cursor();
        }
        self.sync_views();
    }

    /// Periodic housekeeping: expire notifications, animate the spinner
    pub fn tick(&mut self) -> Result<()> {
        let now = Utc::now();
        for dashboard in self.dashboards.values_mut() {
            dashboard.notifications_mut().prune(now);
        }
        self.toolbar.update()?;
        self.sync_views();
        Ok(())
    }

    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        let action = self.keybindings.get_action(&key);

        // Ctrl-modified quit works even inside text inputs
        if action == Some(Action::Quit) && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        if let Some(help) = &mut self.help {
            match action {
                Some(Action::ToggleHelp | Action::Cancel) => self.help = None,
                Some(other) => {
                    help.handle_action(other)?;
                }
                None => {}
            }
            return Ok(());
        }

        if self.overlay.is_some() {
            return self.handle_overlay_key(key, action);
        }

        if self.page == Page::Login {
            return self.handle_login_key(key, action);
        }

        if self.toolbar.is_focused() {
            match key.code {
                KeyCode::Enter => {
                    self.toolbar.handle_action(Action::Confirm)?;
                }
                KeyCode::Esc => {
                    self.toolbar.handle_action(Action::Cancel)?;
                }
                _ => {
                    if self.toolbar.input(key) {
                        let term = self.toolbar.search_term();
                        if let Some(dashboard) = self.current_dashboard_mut() {
                            dashboard.set_search_term(term);
                        }
                        self.data_table.reset_cursor();
                        self.sync_views();
                    }
                }
            }
            return Ok(());
        }

        if let Some(action) = action {
            self.handle_action(action)?;
        }
        Ok(())
    }

    fn handle_overlay_key(&mut self, key: KeyEvent, action: Option<Action>) -> Result<()> {
        let Some(overlay) = &mut self.overlay else {
            return Ok(());
        };
        match overlay {
            Overlay::Filter(dialog) => match dialog.handle_key(key, action)? {
                ModalOutcome::Pending => {}
                ModalOutcome::Cancelled => self.overlay = None,
                ModalOutcome::Submitted(predicates) => {
                    self.overlay = None;
                    if let Some(dashboard) = self.current_dashboard_mut() {
                        dashboard.apply_filters(predicates);
                    }
                    self.data_table.reset_cursor();
                }
            },
            Overlay::Columns(dialog) => match dialog.handle_key(key, action)? {
                ModalOutcome::Pending => {}
                ModalOutcome::Cancelled => self.overlay = None,
                ModalOutcome::Submitted(columns) => {
                    self.overlay = None;
                    if let Some(dashboard) = self.current_dashboard_mut() {
                        dashboard.set_visible_columns(columns);
                    }
                }
            },
        }
        self.sync_views();
        Ok(())
    }

    fn handle_login_key(&mut self, key: KeyEvent, action: Option<Action>) -> Result<()> {
        match key.code {
            KeyCode::Tab => self.step_public_page(true),
            KeyCode::BackTab => self.step_public_page(false),
            _ => {
                if let ModalOutcome::Submitted(email) = self.login.handle_key(key, action)? {
                    self.sign_in(&email);
                }
            }
        }
        Ok(())
    }

    fn step_public_page(&mut self, forward: bool) {
        let len = PUBLIC_PAGES.len();
        let current = PUBLIC_PAGES.iter().position(|p| *p == self.page).unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.navigate(&self.router.href(PUBLIC_PAGES[next]));
    }

    /// Handle an action
    fn handle_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return Ok(());
            }
            Action::ToggleHelp => {
                self.help = Some(HelpOverlay::new(&self.keybindings));
                return Ok(());
            }
            Action::NextView | Action::PrevView => {
                let forward = action == Action::NextView;
                if self.user.is_some() {
                    if let Some(page) = self.nav_bar.neighbour(forward) {
                        self.navigate(&self.router.href(page));
                    }
                } else {
                    self.step_public_page(forward);
                }
                return Ok(());
            }
            Action::OpenSettings => {
                self.navigate(&self.router.href(Page::Settings));
                return Ok(());
            }
            _ => {}
        }

        let Some(source) = self.page.data_source() else {
            // Esc leaves the informational pages
            if action == Action::Cancel {
                let home = if self.user.is_some() { Page::MarketLines } else { Page::Login };
                self.navigate(&self.router.href(home));
            }
            return Ok(());
        };

        match action {
            Action::Refresh => self.refresh(source),
            Action::Search => {
                self.toolbar.handle_action(Action::Search)?;
            }
            Action::Filter => {
                if let Some(dashboard) = self.dashboards.get(&source) {
                    let dialog = FilterDialog::new(dashboard.all_columns(), dashboard.predicates());
                    self.overlay = Some(Overlay::Filter(dialog));
                }
            }
            Action::Columns => {
                if let Some(dashboard) = self.dashboards.get(&source) {
                    let dialog = ColumnDialog::new(dashboard.all_columns(), dashboard.visible_columns());
                    self.overlay = Some(Overlay::Columns(dialog));
                }
            }
            Action::Export => self.export(source),
            _ => {
                let table_action = self.apply_dashboard_action(source, action);
                if table_action {
                    self.data_table.handle_action(action)?;
                } else {
                    self.data_table.reset_cursor();
                }
            }
        }
        self.sync_views();
        Ok(())
    }

    /// Dashboard-level actions; returns true when the action belongs to the table instead
    fn apply_dashboard_action(&mut self, source: DataSource, action: Action) -> bool {
        let Some(dashboard) = self.dashboards.get_mut(&source) else {
            return true;
        };
        match action {
            Action::ClearFilters => {
                dashboard.set_search_term("");
                dashboard.clear_filters();
            }
            Action::ShowAllColumns => dashboard.show_all_columns(),
            Action::NextPage => dashboard.next_page(),
            Action::PrevPage => dashboard.prev_page(),
            Action::FirstPage => dashboard.first_page(),
            Action::LastPage => dashboard.last_page(),
            Action::CyclePageSize => dashboard.cycle_page_size(),
            Action::NextTab => dashboard.next_tab(),
            Action::PrevTab => dashboard.prev_tab(),
            Action::DismissNotification => {
                dashboard.notifications_mut().dismiss();
            }
            _ => return true,
        }
        false
    }

    /// Write the filtered rows of the active region, visible columns only
    fn export(&mut self, source: DataSource) {
        let export_dir = self.config.export_dir();
        let Some(dashboard) = self.dashboards.get_mut(&source) else {
            return;
        };
        let Some(tab) = dashboard.active_tab().map(str::to_string) else {
            dashboard
                .notifications_mut()
                .push(Notification::info("Export", "Nothing to export yet"));
            return;
        };

        let path = ExportService::default_export_path(&export_dir, source, &tab, Utc::now());
        let result = {
            let rows = dashboard.filtered_rows();
            ExportService::export_csv(&path, dashboard.visible_columns(), &rows)
        };
        let notification = match result {
            Ok(count) => {
                info!("exported {} rows to {}", count, path.display());
                Notification::success("Export complete", format!("{} rows written to {}", count, path.display()))
            }
            Err(e) => {
                error!("export to {} failed: {}", path.display(), e);
                Notification::error(format!("Export failed: {}", e))
            }
        };
        dashboard.notifications_mut().push(notification);
    }

    fn current_dashboard_mut(&mut self) -> Option<&mut DashboardState> {
        self.page.data_source().and_then(|s| self.dashboards.get_mut(&s))
    }

    /// Push the current state into the components
    fn sync_views(&mut self) {
        let entries = self.router.nav_entries(self.user.as_ref());
        self.nav_bar.set_entries(entries, self.page, self.user.clone());

        let Some(source) = self.page.data_source() else {
            self.status_bar.set_notification(None, 0);
            return;
        };
        let Some(dashboard) = self.dashboards.get(&source) else {
            return;
        };

        let names = dashboard
            .dataset()
            .region_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.region_tabs.set_regions(names, dashboard.active_tab());

        let page = dashboard.current_page();
        let mut pagination = *dashboard.pagination();
        pagination.clamp(page.total);
        let summary = format!(
            "{} | page {}/{} | {} per page",
            pagination.summary(page.total),
            page.page + 1,
            page.page_count,
            pagination.page_size()
        );
        let filters = dashboard.predicates().iter().map(|p| p.describe()).collect();
        self.toolbar.set_status(dashboard.is_loading(), summary, filters);
        self.toolbar.set_search_term(dashboard.search_term());

        let title = match dashboard.active_tab() {
            Some(tab) => format!("{} / {}", source.title(), tab),
            None => source.title().to_string(),
        };
        self.data_table.set_title(title);
        self.data_table.set_loading(dashboard.is_loading());
        self.data_table
            .set_snapshot(TableSnapshot::from_page(&page, dashboard.visible_columns()));

        let notifications = dashboard.notifications();
        self.status_bar.set_notification(
            notifications.current().cloned(),
            notifications.len().saturating_sub(1),
        );
    }

    /// Render the application
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let nav_height = if self.nav_bar.is_visible() { 1 } else { 0 };
        let status_height = self.status_bar.height(area.width);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(nav_height),
                Constraint::Min(3),
                Constraint::Length(status_height),
            ])
            .split(area);

        self.nav_bar.render(frame, outer[0], &self.theme);
        self.render_body(frame, outer[1]);
        self.status_bar.render(frame, outer[2], &self.theme);

        match &mut self.overlay {
            Some(Overlay::Filter(dialog)) => dialog.render(frame, area, &self.theme),
            Some(Overlay::Columns(dialog)) => dialog.render(frame, area, &self.theme),
            None => {}
        }
        if let Some(help) = &mut self.help {
            help.render(frame, area, &self.theme);
        }
    }

    fn render_body(&mut self, frame: &mut Frame, area: Rect) {
        match self.page {
            Page::Login => self.login.render(frame, area, &self.theme),
            Page::Settings => {
                SettingsPage::new(&self.config, &self.router).render(frame, area, &self.theme);
            }
            page if page.data_source().is_some() => {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(2), Constraint::Length(3), Constraint::Min(3)])
                    .split(area);
                self.region_tabs.render(frame, chunks[0], &self.theme);
                self.toolbar.render(frame, chunks[1], &self.theme);
                self.data_table.render(frame, chunks[2], &self.theme);
            }
            page => {
                if let Some(mut static_page) = StaticPage::for_page(page) {
                    static_page.render(frame, area, &self.theme);
                }
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn user(&self) -> Option<&UserContext> {
        self.user.as_ref()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn dashboard(&self, source: DataSource) -> Option<&DashboardState> {
        self.dashboards.get(&source)
    }

    pub fn data_table(&self) -> &DataTable {
        &self.data_table
    }

    pub fn is_help_visible(&self) -> bool {
        self.help.is_some()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn is_search_focused(&self) -> bool {
        self.toolbar.is_focused()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    /// Stop in-flight loads; used on shutdown
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    #[cfg(test)]
    fn current_notification(&self) -> Option<String> {
        self.page
            .data_source()
            .and_then(|s| self.dashboards.get(&s))
            .and_then(|d| d.notifications().current())
            .map(|n| n.description.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::core::Row;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn chars(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn config_without_endpoints() -> Config {
        let mut config = Config::default();
        config.sources = Default::default();
        config.admin_emails = vec!["admin@example.com".to_string()];
        config
    }

    fn app_with(config: Config, user: Option<UserContext>) -> (App, UnboundedReceiver<LoadEvent>) {
        let (tx, rx) = unbounded_channel();
        let app = App::new(config, user, tx, CancellationToken::new()).unwrap();
        (app, rx)
    }

    fn dataset() -> Dataset {
        let mut dataset = Dataset::new();
        dataset.insert(
            "GLOBAL",
            (0..30)
                .map(|i| Row::from_pairs([("publisher", format!("pub-{}", i)), ("cpm", i.to_string())]))
                .collect(),
        );
        dataset.insert("EMEA", vec![Row::from_pairs([("publisher", "ShowHeroes")])]);
        dataset
    }

    /// Pretend a load of Market Lines was issued and answered
    fn load_market_lines(app: &mut App, result: Result<Dataset, LoadError>) {
        let request = app
            .dashboards
            .get_mut(&DataSource::MarketLines)
            .unwrap()
            .begin_load();
        app.handle_load_event(LoadEvent {
            source: DataSource::MarketLines,
            request,
            result,
        });
    }

    #[test]
    fn test_anonymous_user_lands_on_login() {
        let (mut app, _rx) = app_with(config_without_endpoints(), None);
        app.navigate("/Test_/");

        assert_eq!(app.page(), Page::Login);
        assert!(!app.nav_bar.is_visible());
    }

    #[test]
    fn test_login_form_signs_in_with_configured_role() {
        let (mut app, _rx) = app_with(config_without_endpoints(), None);
        app.navigate("/Test_/login");

        chars(&mut app, "admin@example.com");
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.user(), Some(&UserContext::new("admin@example.com", Role::Admin)));
        assert_eq!(app.page(), Page::MarketLines);
        // No endpoint for Market Lines by default
        assert_eq!(
            app.current_notification(),
            Some("No endpoint configured for Market Lines".to_string())
        );
    }

    #[test]
    fn test_tab_cycles_public_pages_from_login() {
        let (mut app, _rx) = app_with(config_without_endpoints(), None);
        app.navigate("/login");

        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(app.page(), Page::Register);
        app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(app.page(), Page::Login);
    }

    #[test]
    fn test_settings_redirects_regular_user() {
        let user = UserContext::new("user@example.com", Role::User);
        let (mut app, _rx) = app_with(config_without_endpoints(), Some(user));
        app.navigate("/Test_/settings");
        assert_eq!(app.page(), Page::MarketLines);

        app.handle_action(Action::OpenSettings).unwrap();
        assert_eq!(app.page(), Page::MarketLines);
    }

    #[test]
    fn test_load_event_fills_table_and_pages() {
        let user = UserContext::new("admin@example.com", Role::Admin);
        let (mut app, _rx) = app_with(config_without_endpoints(), Some(user));
        app.navigate("/");
        load_market_lines(&mut app, Ok(dataset()));

        let snapshot = app.data_table().snapshot();
        assert_eq!(snapshot.columns, vec!["publisher".to_string(), "cpm".to_string()]);
        assert_eq!(snapshot.rows.len(), 25);

        app.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        let snapshot = app.data_table().snapshot();
        assert_eq!(snapshot.rows.len(), 5);
        assert_eq!(snapshot.first_row_number, 26);

        // Next region clears the page
        app.handle_key_event(key(KeyCode::Tab)).unwrap();
        let dashboard = app.dashboard(DataSource::MarketLines).unwrap();
        assert_eq!(dashboard.active_tab(), Some("EMEA"));
        assert_eq!(app.data_table().snapshot().first_row_number, 1);
    }

    #[test]
    fn test_stale_load_event_is_ignored() {
        let user = UserContext::new("admin@example.com", Role::Admin);
        let (mut app, _rx) = app_with(config_without_endpoints(), Some(user));
        app.navigate("/");

        let dashboard = app.dashboards.get_mut(&DataSource::MarketLines).unwrap();
        let old = dashboard.begin_load();
        let _newer = dashboard.begin_load();
        app.handle_load_event(LoadEvent {
            source: DataSource::MarketLines,
            request: old,
            result: Ok(dataset()),
        });

        let dashboard = app.dashboard(DataSource::MarketLines).unwrap();
        assert!(dashboard.dataset().is_empty());
        assert!(dashboard.is_loading());
    }

    #[test]
    fn test_search_box_takes_text_keys() {
        let user = UserContext::new("admin@example.com", Role::Admin);
        let (mut app, _rx) = app_with(config_without_endpoints(), Some(user));
        app.navigate("/");
        load_market_lines(&mut app, Ok(dataset()));

        app.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        assert!(app.is_search_focused());
        // "q" is text while searching
        chars(&mut app, "pub-2q");
        assert!(!app.should_quit());
        app.handle_key_event(key(KeyCode::Backspace)).unwrap();
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert!(!app.is_search_focused());
        let dashboard = app.dashboard(DataSource::MarketLines).unwrap();
        assert_eq!(dashboard.search_term(), "pub-2");
        // pub-2 and pub-20..pub-29
        assert_eq!(dashboard.filtered_rows().len(), 11);

        app.handle_key_event(key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.dashboard(DataSource::MarketLines).unwrap().search_term(), "");
    }

    #[test]
    fn test_network_failure_keeps_rows_and_notifies() {
        let user = UserContext::new("admin@example.com", Role::Admin);
        let (mut app, _rx) = app_with(config_without_endpoints(), Some(user));
        app.navigate("/");
        load_market_lines(&mut app, Ok(dataset()));
        load_market_lines(&mut app, Err(LoadError::Network("HTTP error! status: 500".into())));

        let dashboard = app.dashboard(DataSource::MarketLines).unwrap();
        assert_eq!(dashboard.dataset().total_records(), 31);
        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.notifications().len(), 2);

        // The missing endpoint notice from the first visit is in front
        app.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(
            app.current_notification(),
            Some("Failed to load Market Lines data. Please try again.".to_string())
        );
        app.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(app.current_notification(), None);
    }

    #[test]
    fn test_column_dialog_hides_column() {
        let user = UserContext::new("admin@example.com", Role::Admin);
        let (mut app, _rx) = app_with(config_without_endpoints(), Some(user));
        app.navigate("/");
        load_market_lines(&mut app, Ok(dataset()));

        app.handle_key_event(key(KeyCode::Char('c'))).unwrap();
        assert!(app.has_overlay());
        app.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        app.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert!(!app.has_overlay());
        assert_eq!(app.data_table().snapshot().columns, vec!["cpm".to_string()]);
    }

    #[test]
    fn test_export_writes_csv_under_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = config_without_endpoints();
        config.config.data_dir = temp_dir.path().to_path_buf();
        let user = UserContext::new("admin@example.com", Role::Admin);
        let (mut app, _rx) = app_with(config, Some(user));
        app.navigate("/");
        load_market_lines(&mut app, Ok(dataset()));

        app.handle_key_event(key(KeyCode::Char('e'))).unwrap();

        let exported: Vec<_> = std::fs::read_dir(temp_dir.path().join("exports"))
            .unwrap()
            .collect();
        assert_eq!(exported.len(), 1);
        let dashboard = app.dashboard(DataSource::MarketLines).unwrap();
        assert!(
            dashboard
                .notifications()
                .iter()
                .any(|n| n.title == "Export complete" && n.description.starts_with("30 rows written"))
        );
    }

    #[test]
    fn test_help_overlay_toggles() {
        let user = UserContext::new("user@example.com", Role::User);
        let (mut app, _rx) = app_with(config_without_endpoints(), Some(user));
        app.navigate("/");

        app.handle_key_event(key(KeyCode::Char('?'))).unwrap();
        assert!(app.is_help_visible());
        // Keys go to the overlay, not the app
        app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(!app.should_quit());
        app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!app.is_help_visible());

        app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn test_render_data_page() {
        let user = UserContext::new("admin@example.com", Role::Admin);
        let (mut app, _rx) = app_with(config_without_endpoints(), Some(user));
        app.navigate("/");
        load_market_lines(&mut app, Ok(dataset()));

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("admin@example.com"));
        assert!(text.contains("GLOBAL"));
        assert!(text.contains("Showing 1-25 of 30"));
    }

    #[tokio::test]
    async fn test_refresh_reports_unreachable_endpoint() {
        let mut config = config_without_endpoints();
        config.sources.market_lines = Some("http://127.0.0.1:9/unreachable".to_string());
        config.request_timeout_secs = 2;
        let user = UserContext::new("user@example.com", Role::User);
        let (mut app, mut rx) = app_with(config, Some(user));

        app.navigate("/");
        assert!(app.dashboard(DataSource::MarketLines).unwrap().is_loading());

        let event = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event.result, Err(LoadError::Network(_))));

        app.handle_load_event(event);
        let dashboard = app.dashboard(DataSource::MarketLines).unwrap();
        assert!(!dashboard.is_loading());
        assert_eq!(
            app.current_notification(),
            Some("Failed to load Market Lines data. Please try again.".to_string())
        );
    }
}
