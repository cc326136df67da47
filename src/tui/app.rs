use std::sync::Arc;

use tokio::sync::mpsc;

use super::mode::InputMode;
use super::theme::Theme;
use crate::api::{ApiError, FirstAidGuide, MediHelpApi};
use crate::app::{AppState, Config};
use crate::constants::SESSION_EXPIRED_MESSAGE;
use crate::fetch::{Debouncer, Ticket};
use crate::pages::{fetch_guides, Effect, Form, FormFocus, LanguageSelector, PageState};
use crate::router::{Navigator, Resolution, Route};
use crate::session::Session;

/// Answer to a background first aid search: (mount id, ticket, result)
type SearchAnswer = (u64, Ticket, Result<Vec<FirstAidGuide>, ApiError>);

/// Application state for the terminal UI
pub struct App {
    pub config: Config,
    pub session: Session,
    api: Arc<dyn MediHelpApi>,
    pub navigator: Navigator,
    /// View-model of the page on screen
    pub page: PageState,
    /// Focused field when the page has a form
    pub focus: FormFocus,
    pub mode: InputMode,
    /// Command line buffer (without the leading ':')
    pub command: String,
    /// Highlighted entry of the navigation menu
    pub menu_index: usize,
    /// Cursor for list pages that do not track their own
    pub cursor: usize,
    pub language: LanguageSelector,
    pub theme: Theme,
    pub status_message: Option<String>,
    pub show_sidebar: bool,
    pub show_help: bool,
    /// Set while a key is being handled so the status bar can say so
    pub busy: bool,
    pub running: bool,
    // Bumped on every page mount so answers for a previous page are dropped
    mount_id: u64,
    search: Option<Debouncer<String>>,
    search_tx: mpsc::UnboundedSender<SearchAnswer>,
    search_rx: mpsc::UnboundedReceiver<SearchAnswer>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let AppState {
            config,
            session,
            api,
        } = state;
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        let theme = Theme::by_name(&config.ui.theme);
        let page = PageState::for_route(&Route::Home, config.ui.page_size);

        Self {
            navigator: Navigator::new(session.clone()),
            config,
            session,
            api,
            page,
            focus: FormFocus::default(),
            mode: InputMode::Normal,
            command: String::new(),
            menu_index: 0,
            cursor: 0,
            language: LanguageSelector::new(),
            theme,
            status_message: None,
            show_sidebar: true,
            show_help: false,
            busy: false,
            running: true,
            mount_id: 0,
            search: None,
            search_tx,
            search_rx,
        }
    }

    pub fn current_route(&self) -> &Route {
        self.navigator.current()
    }

    /// Navigate through the route guard and mount the resulting page
    pub async fn open(&mut self, route: Route) {
        self.apply(Effect::Navigate(route)).await;
    }

    pub async fn open_path(&mut self, path: &str) {
        self.open(Route::parse(path)).await;
    }

    pub async fn back(&mut self) {
        if let Some(resolution) = self.navigator.back() {
            self.note_redirect(&resolution);
            let effect = self.mount_current().await;
            self.apply(effect).await;
        }
    }

    pub async fn logout(&mut self) {
        if let Err(e) = self.navigator.logout() {
            tracing::warn!(error = %e, "failed to clear session");
            self.set_status(format!("Failed to log out: {}", e));
            return;
        }
        self.set_status("Logged out");
        let effect = self.mount_current().await;
        self.apply(effect).await;
    }

    /// Mount the current page again ("Try again")
    pub async fn reload(&mut self) {
        let effect = self.mount_current().await;
        self.apply(effect).await;
    }

    /// Carry out whatever a page asked for, following chained navigations
    pub async fn apply(&mut self, mut effect: Effect) {
        loop {
            effect = match effect {
                Effect::Stay => return,
                Effect::Navigate(route) => {
                    let resolution = self.navigator.go(route);
                    self.note_redirect(&resolution);
                    self.mount_current().await
                }
                Effect::SessionExpired => match self.navigator.handle_unauthorized() {
                    Ok(true) => {
                        self.set_status(SESSION_EXPIRED_MESSAGE);
                        self.mount_current().await
                    }
                    Ok(false) => return,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to clear expired session");
                        self.set_status(format!("Failed to clear session: {}", e));
                        return;
                    }
                },
            };
        }
    }

    fn note_redirect(&mut self, resolution: &Resolution) {
        if let Resolution::Redirect { requested, .. } = resolution {
            self.set_status(format!("Please log in to open {}", requested.title()));
        }
    }

    async fn mount_current(&mut self) -> Effect {
        self.mount_id += 1;
        let route = self.navigator.current().clone();
        tracing::debug!(%route, "mounting page");

        self.page = PageState::for_route(&route, self.config.ui.page_size);
        self.focus = FormFocus::default();
        self.cursor = 0;
        self.mode = match self.page {
            PageState::Login(_) | PageState::Signup(_) => InputMode::Insert,
            _ => InputMode::Normal,
        };
        self.search = match self.page {
            PageState::FirstAid(_) => Some(Debouncer::new(self.config.ui.debounce())),
            _ => None,
        };

        self.page.mount(self.api.as_ref()).await
    }

    /// Called after every edit of a form field
    pub fn form_changed(&mut self) {
        if let (PageState::FirstAid(page), Some(search)) = (&self.page, &self.search) {
            search.push(page.query().to_string());
        }
    }

    /// Start any debounced search that has settled and apply finished ones
    pub async fn poll_background(&mut self) {
        let ready = self.search.as_mut().and_then(|search| search.try_next());
        if let Some(query) = ready {
            self.spawn_search(query);
        }

        let mut effects = Vec::new();
        while let Ok((mount_id, ticket, result)) = self.search_rx.try_recv() {
            if mount_id != self.mount_id {
                // The page is gone but a rejected token still ends the session
                if matches!(&result, Err(err) if err.is_unauthorized()) {
                    effects.push(Effect::SessionExpired);
                }
                continue;
            }
            if let PageState::FirstAid(page) = &mut self.page {
                effects.push(page.finish_search(ticket, result));
            }
        }
        for effect in effects {
            self.apply(effect).await;
        }
    }

    fn spawn_search(&mut self, query: String) {
        let PageState::FirstAid(page) = &mut self.page else {
            return;
        };
        let ticket = page.begin_search();
        let api = Arc::clone(&self.api);
        let tx = self.search_tx.clone();
        let mount_id = self.mount_id;
        tracing::debug!(%query, "first aid search");

        tokio::spawn(async move {
            let result = fetch_guides(api.as_ref(), &query).await;
            let _ = tx.send((mount_id, ticket, result));
        });
    }

    pub fn form(&self) -> Option<&dyn Form> {
        self.page.form()
    }

    /// Enter insert mode if the page has anything to edit
    pub fn start_editing(&mut self) {
        if self.page.form().is_some() {
            self.mode = InputMode::Insert;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let focus = self.focus;
        if let Some(form) = self.page.form_mut() {
            focus.insert(form, c);
            self.form_changed();
        }
    }

    pub fn delete_char(&mut self) {
        let focus = self.focus;
        if let Some(form) = self.page.form_mut() {
            focus.backspace(form);
            self.form_changed();
        }
    }

    pub fn next_field(&mut self) {
        if let Some(form) = self.page.form() {
            self.focus.next(form);
        }
    }

    pub fn previous_field(&mut self) {
        if let Some(form) = self.page.form() {
            self.focus.previous(form);
        }
    }

    /// Enter pressed inside a form
    pub async fn submit(&mut self) {
        let api = Arc::clone(&self.api);
        let api = api.as_ref();
        let session = self.session.clone();
        let focus = self.focus.index();

        let effect = match &mut self.page {
            PageState::Login(page) => page.submit(api, &session).await,
            PageState::Signup(page) => page.submit(api).await,
            PageState::SkinDiagnosis(page) => {
                page.select_from_input();
                page.submit(api, &session).await
            }
            PageState::SymptomChecker(page) if focus == 1 => page.ask_ai(api).await,
            PageState::FirstAid(page) => page.search(api).await,
            PageState::DoctorForm(page) => page.submit(api).await,
            PageState::AvailabilityForm(page) => page.submit(api).await,
            _ => {
                self.mode = InputMode::Normal;
                Effect::Stay
            }
        };
        self.apply(effect).await;
    }

    /// Enter pressed outside a form: open or toggle whatever is under the cursor
    pub async fn activate(&mut self) {
        let cursor = self.cursor;
        let effect = match &mut self.page {
            PageState::Articles(page) => {
                if let Some(id) = page.articles().get(cursor).map(|a| a.id) {
                    page.toggle(id);
                }
                Effect::Stay
            }
            PageState::SymptomChecker(page) => {
                page.toggle_at_cursor();
                Effect::Stay
            }
            PageState::Doctors(page) => navigate_to(page.open_selected()),
            PageState::Availability(page) => navigate_to(page.open_selected()),
            PageState::FindDoctor(page) => navigate_to(page.view_selected()),
            PageState::Static(Route::Home) => navigate_to(Some(Route::SymptomChecker)),
            _ => Effect::Stay,
        };
        self.apply(effect).await;
    }

    /// Cursor movement on list pages
    pub fn move_cursor(&mut self, down: bool) {
        let len = match &mut self.page {
            PageState::Doctors(page) => return page.move_cursor(down),
            PageState::Availability(page) => return page.move_cursor(down),
            PageState::FindDoctor(page) => return page.move_cursor(down),
            PageState::SymptomChecker(page) => return page.move_cursor(down),
            PageState::FirstAid(page) => {
                return if down {
                    page.select_next()
                } else {
                    page.select_previous()
                }
            }
            PageState::Articles(page) => page.articles().len(),
            PageState::Videos(page) => page.videos().len(),
            PageState::Education(page) => page.articles().len().max(page.videos().len()),
            PageState::Dashboard(page) => page.checks().len(),
            _ => 0,
        };
        if down {
            if self.cursor + 1 < len {
                self.cursor += 1;
            }
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    /// Previous or next page of a paginated listing
    pub async fn turn_page(&mut self, forward: bool) {
        let api = Arc::clone(&self.api);
        let api = api.as_ref();
        let effect = match &mut self.page {
            PageState::Doctors(page) if forward => page.next_page(api).await,
            PageState::Doctors(page) => page.previous_page(api).await,
            PageState::Availability(page) if forward => page.next_page(api).await,
            PageState::Availability(page) => page.previous_page(api).await,
            _ => Effect::Stay,
        };
        self.apply(effect).await;
    }

    /// Single-letter page actions in normal mode
    pub async fn page_key(&mut self, key: char) {
        let api = Arc::clone(&self.api);
        let api = api.as_ref();
        let effect = match (&mut self.page, key) {
            (PageState::DoctorDetail(page), 'd') => {
                page.request_delete();
                Effect::Stay
            }
            (PageState::DoctorDetail(page), 'y') => page.confirm_delete(api).await,
            (PageState::DoctorDetail(page), 'n') => {
                page.cancel_delete();
                Effect::Stay
            }
            (PageState::DoctorDetail(page), 'e') => navigate_to(page.edit_route()),
            (PageState::DoctorDetail(page), 'a') => navigate_to(Some(page.availability_route())),
            (PageState::AvailabilityDetail(page), 'd') => {
                page.request_delete();
                Effect::Stay
            }
            (PageState::AvailabilityDetail(page), 'y') => page.confirm_delete(api).await,
            (PageState::AvailabilityDetail(page), 'n') => {
                page.cancel_delete();
                Effect::Stay
            }
            (PageState::AvailabilityDetail(page), 'e') => navigate_to(Some(page.edit_route())),
            (PageState::Doctors(_), 'a') => navigate_to(Some(Route::DoctorNew)),
            (PageState::Availability(_), 'a') => navigate_to(Some(Route::AvailabilityNew)),
            (PageState::Education(page), 't') => {
                page.switch_tab();
                self.cursor = 0;
                Effect::Stay
            }
            (PageState::Dashboard(page), 't') => {
                page.next_tab();
                Effect::Stay
            }
            (PageState::FindDoctor(page), 'f') => {
                page.cycle_specialization();
                Effect::Stay
            }
            (PageState::FindDoctor(page), 'c') => {
                page.clear_filters();
                Effect::Stay
            }
            (PageState::FindDoctor(page), 'b') => navigate_to(page.book_selected()),
            (PageState::SymptomChecker(page), 's') => page.submit(api).await,
            (PageState::SymptomChecker(page), 'c') => {
                page.clear_all();
                Effect::Stay
            }
            (PageState::Static(Route::Home), 'l') if !self.session.is_authenticated() => {
                navigate_to(Some(Route::Login))
            }
            (PageState::Login(_), 's') => navigate_to(Some(Route::Signup)),
            _ => Effect::Stay,
        };
        self.apply(effect).await;
    }

    /// Run a `:` command line
    pub async fn run_command(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let argument = parts.next();

        match (command, argument) {
            ("q" | "quit", _) => self.quit(),
            ("go" | "open", Some(path)) => self.open_path(path).await,
            ("back", _) => self.back().await,
            ("reload" | "r", _) => self.reload().await,
            ("login", _) => self.open(Route::Login).await,
            ("signup", _) => self.open(Route::Signup).await,
            ("logout", _) => self.logout().await,
            ("theme", Some(name)) => self.theme = Theme::by_name(name),
            ("theme", None) => self.theme = self.theme.next(),
            ("lang", Some(code)) => match self.session.set_language(code) {
                Ok(()) => self.set_status(format!(
                    "Language: {}",
                    LanguageSelector::current_name(&self.session)
                )),
                Err(err) => self.set_status(err.to_string()),
            },
            ("lang", None) => {
                self.language.open(&self.session);
                self.mode = InputMode::Language;
            }
            ("credits", _) => {
                self.set_status(format!("Free credits left: {}", self.session.credits()))
            }
            ("sidebar" | "sb", _) => self.show_sidebar = !self.show_sidebar,
            ("help" | "h", _) => self.show_help = !self.show_help,
            ("", _) => {}
            _ => self.set_status(format!("Unknown command: {}", line)),
        }
    }

    /// Go to the highlighted menu entry
    pub async fn choose_menu_entry(&mut self) {
        let menu = Route::menu();
        if let Some(route) = menu.get(self.menu_index).cloned() {
            self.mode = InputMode::Normal;
            self.open(route).await;
        }
    }

    pub fn move_menu(&mut self, down: bool) {
        let len = Route::menu().len();
        self.menu_index = if down {
            (self.menu_index + 1) % len
        } else {
            (self.menu_index + len - 1) % len
        };
    }

    pub fn choose_language(&mut self) {
        match self.language.choose(&self.session) {
            Ok(name) => self.set_status(format!("Language: {}", name)),
            Err(err) => self.set_status(err.to_string()),
        }
        self.mode = InputMode::Normal;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

fn navigate_to(route: Option<Route>) -> Effect {
    route.map(Effect::Navigate).unwrap_or(Effect::Stay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AuthTokens, DoctorProfile, DoctorUser, LoginResponse, MockMediHelpApi, Page};
    use pretty_assertions::assert_eq;

    fn app_with(api: MockMediHelpApi, session: Session) -> App {
        App::new(AppState::new(Config::default(), session, Arc::new(api)))
    }

    fn doctor(id: i64) -> DoctorProfile {
        DoctorProfile {
            id,
            user: DoctorUser {
                first_name: "Hana".to_string(),
                last_name: "Tesfaye".to_string(),
                email: None,
                phone: None,
            },
            specialization: "Pediatrician".to_string(),
            license_number: String::new(),
            consultation_fee: 30.0,
            bio: String::new(),
            available: true,
        }
    }

    #[tokio::test]
    async fn test_protected_route_never_fetches_without_token() {
        // No expectations: any API call would panic
        let mut app = app_with(MockMediHelpApi::new(), Session::in_memory());

        app.open_path("/dashboard").await;

        assert_eq!(app.current_route(), &Route::Login);
        assert!(matches!(app.page, PageState::Login(_)));
        assert_eq!(app.mode, InputMode::Insert);
    }

    #[tokio::test]
    async fn test_login_flow_lands_on_home() {
        let mut api = MockMediHelpApi::new();
        api.expect_login().returning(|_| {
            Ok(LoginResponse {
                tokens: AuthTokens {
                    access: "T".to_string(),
                    refresh: None,
                },
            })
        });
        let session = Session::in_memory();
        let mut app = app_with(api, session.clone());
        app.open(Route::Login).await;

        for c in "a@b.com".chars() {
            app.insert_char(c);
        }
        app.next_field();
        app.insert_char('x');
        app.submit().await;

        assert_eq!(app.current_route(), &Route::Home);
        assert_eq!(session.token().as_deref(), Some("T"));
    }

    #[tokio::test]
    async fn test_401_clears_token_and_redirects_once() {
        let mut api = MockMediHelpApi::new();
        api.expect_doctor_profiles()
            .times(1)
            .returning(|_, _| Err(ApiError::Unauthorized { message: None }));
        let session = Session::in_memory();
        session.set_token("stale").unwrap();
        let mut app = app_with(api, session.clone());

        app.open(Route::Doctors).await;

        assert!(!session.is_authenticated());
        assert_eq!(app.current_route(), &Route::Login);
        assert_eq!(app.status_message.as_deref(), Some(SESSION_EXPIRED_MESSAGE));

        // A second late 401 must not redirect again
        let history = app.navigator.history().len();
        app.apply(Effect::SessionExpired).await;
        assert_eq!(app.navigator.history().len(), history);
        assert_eq!(app.current_route(), &Route::Login);
    }

    #[tokio::test]
    async fn test_open_doctor_from_listing() {
        let mut api = MockMediHelpApi::new();
        api.expect_doctor_profiles()
            .returning(|_, _| Ok(Page::from_items(vec![doctor(1), doctor(2)])));
        api.expect_doctor_profile().returning(|id| Ok(doctor(id)));
        let session = Session::in_memory();
        session.set_token("ok").unwrap();
        let mut app = app_with(api, session);

        app.open(Route::Doctors).await;
        app.move_cursor(true);
        app.activate().await;

        assert_eq!(app.current_route(), &Route::DoctorDetail(2));
        assert!(matches!(app.page, PageState::DoctorDetail(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_aid_typing_searches_once() {
        let mut api = MockMediHelpApi::new();
        api.expect_first_aid().returning(|| Ok(Page::default()));
        api.expect_search_first_aid()
            .withf(|q| q == "burn")
            .times(1)
            .returning(|_| Ok(Page::default()));
        let session = Session::in_memory();
        session.set_token("ok").unwrap();
        let mut app = app_with(api, session);
        app.open(Route::FirstAid).await;
        app.start_editing();

        for c in "burn".chars() {
            app.insert_char(c);
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            app.poll_background().await;
        }
        tokio::time::sleep(std::time::Duration::from_millis(600)).await;
        app.poll_background().await;
        // Let the spawned request finish and its answer be applied
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        app.poll_background().await;

        assert!(matches!(app.page, PageState::FirstAid(_)));
    }

    #[tokio::test]
    async fn test_search_401_after_remount_still_expires_session() {
        let mut api = MockMediHelpApi::new();
        api.expect_first_aid().returning(|| Ok(Page::default()));
        let session = Session::in_memory();
        session.set_token("stale").unwrap();
        let mut app = app_with(api, session.clone());
        app.open(Route::FirstAid).await;
        let old_mount = app.mount_id;
        app.reload().await;

        let ticket = crate::fetch::Resource::<Vec<FirstAidGuide>>::new().begin();
        app.search_tx
            .send((old_mount, ticket, Err(ApiError::Unauthorized { message: None })))
            .unwrap();
        app.poll_background().await;

        assert!(!session.is_authenticated());
        assert_eq!(app.current_route(), &Route::Login);
    }

    #[tokio::test]
    async fn test_commands() {
        let mut app = app_with(MockMediHelpApi::new(), Session::in_memory());
        app.run_command("lang am").await;
        assert_eq!(app.session.language(), "am");

        app.run_command("theme light").await;
        assert_eq!(app.theme.name, "light");

        app.run_command("bogus").await;
        assert_eq!(app.status_message.as_deref(), Some("Unknown command: bogus"));

        app.run_command("q").await;
        assert!(!app.running);
    }
}
