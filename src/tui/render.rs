use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::mode::InputMode;
use super::theme::Theme;
use super::widgets::{ConfirmDialog, MenuState, MenuWidget};
use crate::api::{Diagnosis, DoctorProfile, Video};
use crate::constants::LANGUAGES;
use crate::pages::{
    static_content, youtube_id, CheckSummary, DashboardPage, DashboardTab, EducationTab, Form,
    LanguageSelector, PageState,
};
use crate::router::Route;

const MARKER: &str = "▶ ";
const NO_MARKER: &str = "  ";

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints::<&[Constraint]>(
            [
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Page
                Constraint::Length(1), // Command line
                Constraint::Length(1), // Status bar
            ]
            .as_ref(),
        )
        .split(frame.area());

    render_header(frame, chunks[0], app);

    let content_chunks = if app.show_sidebar {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints::<&[Constraint]>([Constraint::Length(26), Constraint::Min(20)].as_ref())
            .split(chunks[1])
    } else {
        std::rc::Rc::new([Rect::default(), chunks[1]])
    };

    if app.show_sidebar {
        render_sidebar(frame, content_chunks[0], app);
    }
    render_page(frame, content_chunks[1], app);
    render_command_line(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    if app.mode == InputMode::Language {
        render_language_popup(frame, frame.area(), app);
    }
    if app.show_help {
        render_help(frame, frame.area(), &app.theme);
    }
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let auth = if app.session.is_authenticated() {
        Span::styled("Logged in", Style::default().fg(theme.success))
    } else {
        Span::styled("Guest", Style::default().fg(theme.muted))
    };

    let header_text = vec![Line::from(vec![
        Span::styled("MediHelp+", theme.title()),
        Span::raw(" | "),
        Span::styled(app.current_route().title(), Style::default().fg(theme.text)),
        Span::raw(" | "),
        auth,
        Span::raw(" | "),
        Span::styled(
            LanguageSelector::current_name(&app.session),
            Style::default().fg(theme.muted),
        ),
        Span::raw(" | "),
        Span::styled(
            format!("Credits: {}", app.session.credits()),
            Style::default().fg(theme.muted),
        ),
    ])];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let routes = Route::menu();
    let mut state = MenuState::new(app.menu_index);
    let menu = MenuWidget {
        routes: &routes,
        current: app.current_route(),
        authenticated: app.session.is_authenticated(),
        focused: app.mode == InputMode::Menu,
        theme: &app.theme,
    };
    frame.render_stateful_widget(menu, area, &mut state);
}

/// Page body, with the page's form underneath when it has one
fn render_page(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.form();
    let (body_area, form_area) = match form {
        Some(form) if area.height > form.len() as u16 + 6 => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(4), Constraint::Length(form.len() as u16 + 2)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        }
        _ => (area, None),
    };

    let lines = page_lines(app);
    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", app.current_route().title()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(body, body_area);

    if let (Some(form), Some(form_area)) = (form, form_area) {
        render_form(frame, form_area, app, form);
    }

    if let Some((title, message, busy)) = pending_delete(&app.page) {
        let dialog = ConfirmDialog {
            title,
            message,
            busy,
            theme: &app.theme,
        };
        frame.render_widget(dialog, body_area);
    }
}

fn pending_delete(page: &PageState) -> Option<(&'static str, &'static str, bool)> {
    match page {
        PageState::DoctorDetail(page) if page.is_confirming_delete() => Some((
            "Delete doctor",
            "Are you sure you want to delete this doctor profile?",
            page.is_loading(),
        )),
        PageState::AvailabilityDetail(page) if page.is_confirming_delete() => Some((
            "Delete availability",
            "Are you sure you want to delete this availability slot?",
            page.is_loading(),
        )),
        _ => None,
    }
}

fn render_form(frame: &mut Frame, area: Rect, app: &App, form: &dyn Form) {
    let theme = &app.theme;
    let editing = app.mode == InputMode::Insert;
    let focus = app.focus.index();
    let label_width = form.labels().iter().map(|l| l.len()).max().unwrap_or_default() + 2;

    let lines: Vec<Line> = form
        .labels()
        .iter()
        .enumerate()
        .map(|(index, label)| {
            let raw = form.field(index).unwrap_or_default();
            let value = if form.is_secret(index) {
                "*".repeat(raw.chars().count())
            } else {
                raw.to_string()
            };
            let style = if editing && index == focus {
                theme.selected()
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", format!("{}:", label), width = label_width),
                    Style::default().fg(theme.muted),
                ),
                Span::styled(value, style),
            ])
        })
        .collect();

    let border = if editing {
        theme.border_focused
    } else {
        theme.border
    };
    let block = Block::default()
        .title(" Form (i to edit) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    frame.render_widget(Paragraph::new(lines).block(block), area);

    if editing {
        let typed = form
            .field(focus)
            .map(|value| value.chars().count())
            .unwrap_or_default();
        let x = area.x + 1 + (label_width + typed) as u16;
        let x = x.min(area.x + area.width.saturating_sub(2));
        frame.set_cursor_position((x, area.y + 1 + focus as u16));
    }
}

fn render_command_line(frame: &mut Frame, area: Rect, app: &App) {
    let line = if app.mode == InputMode::Command {
        Line::from(vec![
            Span::styled(":", app.theme.title()),
            Span::raw(app.command.as_str()),
        ])
    } else {
        Line::from(Span::styled(
            app.mode.hints(),
            Style::default().fg(app.theme.muted),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);

    if app.mode == InputMode::Command {
        let x = area.x + 1 + app.command.chars().count() as u16;
        frame.set_cursor_position((x.min(area.x + area.width.saturating_sub(1)), area.y));
    }
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status_text = if app.busy {
        "Working...".to_string()
    } else if let Some(status) = &app.status_message {
        status.clone()
    } else {
        "Ready".to_string()
    };

    let spans = vec![
        Span::styled(
            format!(" {} ", app.mode.display_name()),
            Style::default()
                .bg(app.mode.color())
                .fg(ratatui::style::Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::raw(status_text),
        Span::raw(" | "),
        Span::styled(
            app.current_route().path(),
            Style::default().fg(app.theme.muted),
        ),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_language_popup(frame: &mut Frame, area: Rect, app: &App) {
    let popup = centered(area, 40, LANGUAGES.len() as u16 + 2);
    let lines: Vec<Line> = LANGUAGES
        .iter()
        .enumerate()
        .map(|(index, (_, name))| {
            if index == app.language.highlighted() {
                Line::from(Span::styled(format!("{}{}", MARKER, name), app.theme.selected()))
            } else {
                Line::from(format!("{}{}", NO_MARKER, name))
            }
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Language ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focused)),
        ),
        popup,
    );
}

fn render_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let commands = [
        (":go <path>", "Open a page, e.g. :go /doctors?page=2"),
        (":back", "Previous page"),
        (":reload", "Fetch the page again"),
        (":login / :signup", "Authentication pages"),
        (":logout", "Forget the stored token"),
        (":lang [code]", "Choose a language"),
        (":theme [name]", "dark, light or high-contrast"),
        (":credits", "Remaining skin diagnosis credits"),
        (":sidebar", "Toggle the menu"),
        (":q", "Quit"),
        ("g", "Open the menu"),
        ("h / l", "Previous / next page of a listing"),
        ("d y n", "Delete, confirm, cancel"),
        ("a e", "Add, edit"),
        ("t f c s b", "Tab, filter, clear, submit, book"),
    ];
    let popup = centered(area, 64, commands.len() as u16 + 2);
    let lines: Vec<Line> = commands
        .iter()
        .map(|(keys, description)| {
            Line::from(vec![
                Span::styled(format!("{:<20}", keys), theme.selected()),
                Span::styled(*description, Style::default().fg(theme.text)),
            ])
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Help (:help to close) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused)),
        ),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Loading and error placeholders shared by every fetching page
fn placeholder(theme: &Theme, loading: bool, error: Option<String>) -> Option<Vec<Line<'static>>> {
    if loading {
        return Some(vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(theme.muted),
        ))]);
    }
    error.map(|message| {
        vec![
            Line::from(Span::styled(message, Style::default().fg(theme.error))),
            Line::from(Span::styled(
                "Press r to try again",
                Style::default().fg(theme.muted),
            )),
        ]
    })
}

fn heading(theme: &Theme, text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), theme.title()))
}

fn muted(theme: &Theme, text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(theme.muted)))
}

fn error_line(theme: &Theme, text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(theme.error)))
}

fn list_row(theme: &Theme, selected: bool, text: String) -> Line<'static> {
    if selected {
        Line::from(Span::styled(format!("{}{}", MARKER, text), theme.selected()))
    } else {
        Line::from(format!("{}{}", NO_MARKER, text))
    }
}

fn diagnosis_lines(theme: &Theme, diagnosis: &Diagnosis) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::raw("Urgency: "),
        Span::styled(diagnosis.urgency.clone(), theme.urgency(&diagnosis.urgency)),
    ])];
    if let Some(confidence) = diagnosis.confidence_percent() {
        lines.push(Line::from(format!("Confidence: {}%", confidence)));
    }
    if !diagnosis.conditions.is_empty() {
        lines.push(Line::from(format!(
            "Possible conditions: {}",
            diagnosis.conditions.join(", ")
        )));
    }
    lines.extend(
        diagnosis
            .recommendations
            .iter()
            .map(|r| Line::from(format!("  - {}", r))),
    );
    lines
}

fn doctor_row(doctor: &DoctorProfile) -> String {
    let available = if doctor.available {
        "Available"
    } else {
        "Unavailable"
    };
    format!(
        "{} | {} | {} | {}",
        doctor.display_name(),
        doctor.specialization,
        doctor.fee_display(),
        available
    )
}

fn video_lines(theme: &Theme, video: &Video) -> Vec<Line<'static>> {
    let link = match youtube_id(&video.url) {
        Some(id) => format!("Watch: https://www.youtube.com/watch?v={}", id),
        None => "Invalid video URL".to_string(),
    };
    vec![
        heading(theme, video.title.clone()),
        Line::from(video.description.clone()),
        muted(theme, link),
        Line::from(""),
    ]
}

fn check_lines(summary: &CheckSummary) -> Vec<Line<'static>> {
    vec![
        Line::from(format!(
            "{} | Symptoms: {}",
            summary.check.created_at.format("%Y-%m-%d"),
            summary.symptom_names.join(", ")
        )),
        Line::from(format!(
            "  Conditions: {} | Severity: {}",
            summary.conditions(),
            summary.severity()
        )),
    ]
}

fn page_lines(app: &App) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut lines = Vec::new();

    match &app.page {
        PageState::Static(Route::NotFound(path)) => {
            lines.push(heading(theme, "Page not found"));
            lines.push(Line::from(format!("Nothing lives at {}", path)));
            lines.push(muted(theme, "Press g to open the menu"));
        }
        PageState::Static(route) => {
            for section in static_content(route).unwrap_or_default() {
                lines.push(heading(theme, section.heading));
                lines.extend(section.lines.iter().map(|l| Line::from(*l)));
                lines.push(Line::from(""));
            }
            if *route == Route::Home && !app.session.is_authenticated() {
                lines.push(muted(theme, "Press l to log in, or :signup to create an account"));
            }
        }
        PageState::Login(page) => {
            lines.push(Line::from("Log in with your email and password."));
            if page.is_loading() {
                lines.push(muted(theme, "Logging in..."));
            }
            if let Some(error) = page.error() {
                lines.push(error_line(theme, error));
            }
            lines.push(muted(theme, "No account? Press Esc then s to sign up"));
        }
        PageState::Signup(page) => {
            lines.push(Line::from("Create your MediHelp+ account."));
            if page.is_loading() {
                lines.push(muted(theme, "Creating account..."));
            }
            if let Some(error) = page.error() {
                lines.push(error_line(theme, error));
            }
        }
        PageState::Articles(page) => {
            if let Some(placeholder) = placeholder(theme, page.is_loading(), page.error()) {
                return placeholder;
            }
            if page.articles().is_empty() {
                lines.push(muted(theme, "No articles available."));
            }
            for (index, article) in page.articles().iter().enumerate() {
                lines.push(list_row(theme, index == app.cursor, article.title.clone()));
                if !article.summary.is_empty() {
                    lines.push(muted(theme, format!("  {}", article.summary)));
                }
                lines.push(Line::from(format!("  {}", page.body(article))));
                if !article.tags.is_empty() {
                    lines.push(muted(theme, format!("  Tags: {}", article.tags.join(", "))));
                }
                lines.push(Line::from(""));
            }
        }
        PageState::Videos(page) => {
            if let Some(placeholder) = placeholder(theme, page.is_loading(), page.error()) {
                return placeholder;
            }
            if page.videos().is_empty() {
                lines.push(muted(theme, "No videos available."));
            }
            for video in page.videos() {
                lines.extend(video_lines(theme, video));
            }
        }
        PageState::Education(page) => {
            if let Some(placeholder) = placeholder(theme, page.is_loading(), page.error()) {
                return placeholder;
            }
            let tabs = [EducationTab::Articles, EducationTab::Videos]
                .iter()
                .map(|tab| {
                    let label = match tab {
                        EducationTab::Articles => "Articles",
                        EducationTab::Videos => "Videos",
                    };
                    if *tab == page.tab {
                        Span::styled(format!("[{}] ", label), theme.selected())
                    } else {
                        Span::raw(format!(" {}  ", label))
                    }
                })
                .collect::<Vec<_>>();
            lines.push(Line::from(tabs));
            lines.push(Line::from(""));
            match page.tab {
                EducationTab::Articles => {
                    let articles = page.articles();
                    if articles.is_empty() {
                        lines.push(muted(theme, "No articles match your search."));
                    }
                    for (index, article) in articles.iter().enumerate() {
                        lines.push(list_row(theme, index == app.cursor, article.title.clone()));
                        lines.push(muted(theme, format!("  {}", article.summary)));
                    }
                }
                EducationTab::Videos => {
                    let videos = page.videos();
                    if videos.is_empty() {
                        lines.push(muted(theme, "No videos match your search."));
                    }
                    for video in videos {
                        lines.extend(video_lines(theme, video));
                    }
                }
            }
        }
        PageState::FirstAid(page) => {
            if let Some(placeholder) = placeholder(theme, page.is_loading(), page.error()) {
                return placeholder;
            }
            if page.guides().is_empty() {
                lines.push(muted(theme, "No first aid guides found."));
            }
            let selected = page.selected().map(|g| g.id);
            for guide in page.guides() {
                lines.push(list_row(
                    theme,
                    Some(guide.id) == selected,
                    format!(
                        "{} ({}) {}",
                        guide.title, guide.condition.name, guide.severity_level_display
                    ),
                ));
            }
            if let Some(guide) = page.selected() {
                lines.push(Line::from(""));
                lines.push(heading(theme, guide.title.clone()));
                lines.extend(
                    guide
                        .steps
                        .iter()
                        .enumerate()
                        .map(|(i, step)| Line::from(format!("{}. {}", i + 1, step))),
                );
            }
        }
        PageState::SymptomChecker(page) => {
            if let Some(placeholder) = placeholder(theme, false, page.error()) {
                lines.extend(placeholder);
            }
            if page.is_loading() {
                lines.push(muted(theme, "Loading..."));
            }
            for (index, symptom) in page.visible().iter().enumerate() {
                let check = if page.is_selected(symptom.id) {
                    "[x]"
                } else {
                    "[ ]"
                };
                lines.push(list_row(
                    theme,
                    index == page.cursor(),
                    format!("{} {}", check, symptom.name),
                ));
            }
            lines.push(Line::from(""));
            let names = page.selected_names();
            if !names.is_empty() {
                lines.push(Line::from(format!("Selected: {}", names.join(", "))));
                lines.push(muted(theme, "Press s to check, c to clear"));
            }
            if let Some(check) = page.diagnosis() {
                lines.push(heading(theme, "Diagnosis"));
                lines.extend(diagnosis_lines(theme, &check.diagnosis));
            }
            if let Some(advice) = page.advice() {
                lines.push(heading(theme, "AI advice"));
                lines.push(Line::from(vec![
                    Span::raw("Urgency: "),
                    Span::styled(advice.urgency.clone(), theme.urgency(&advice.urgency)),
                ]));
                if !advice.conditions.is_empty() {
                    lines.push(Line::from(format!(
                        "Possible conditions: {}",
                        advice.conditions.join(", ")
                    )));
                }
                lines.extend(
                    advice
                        .recommendations
                        .iter()
                        .map(|r| Line::from(format!("  - {}", r))),
                );
            }
        }
        PageState::SkinDiagnosis(page) => {
            lines.push(Line::from(format!(
                "Free credits left: {}",
                app.session.credits()
            )));
            match page.image() {
                Some(image) => lines.push(Line::from(format!("Selected: {}", image.file_name))),
                None => lines.push(muted(theme, "Type an image path and press Enter")),
            }
            if page.is_loading() {
                lines.push(muted(theme, "Analyzing image..."));
            }
            if let Some(error) = page.error() {
                lines.push(error_line(theme, error));
            }
            if let Some(result) = page.result() {
                lines.push(heading(theme, "Diagnosis"));
                lines.extend(diagnosis_lines(theme, &result.diagnosis));
            }
        }
        PageState::Dashboard(page) => {
            if let Some(placeholder) = placeholder(theme, page.is_loading(), page.error()) {
                return placeholder;
            }
            lines.extend(dashboard_lines(theme, page, app.cursor));
        }
        PageState::FindDoctor(page) => {
            if let Some(placeholder) = placeholder(theme, page.is_loading(), page.error()) {
                return placeholder;
            }
            lines.push(muted(
                theme,
                format!(
                    "Specialization: {} (f to change)",
                    page.specialization().unwrap_or("All")
                ),
            ));
            let doctors = page.filtered();
            if doctors.is_empty() {
                lines.push(muted(theme, "No doctors match your filters."));
            }
            for (index, doctor) in doctors.iter().enumerate() {
                lines.push(list_row(theme, index == page.cursor(), doctor_row(doctor)));
            }
            if page.has_filters() {
                lines.push(muted(theme, "Press c to clear filters"));
            }
        }
        PageState::Doctors(page) => {
            if let Some(placeholder) = placeholder(theme, page.is_loading(), page.error()) {
                return placeholder;
            }
            if page.doctors().is_empty() {
                lines.push(muted(theme, "No doctor profiles yet. Press a to add one."));
            }
            for (index, doctor) in page.doctors().iter().enumerate() {
                lines.push(list_row(theme, index == page.cursor(), doctor_row(doctor)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(page.listing().pagination.render()));
        }
        PageState::DoctorDetail(page) => {
            if let Some(placeholder) = placeholder(theme, false, page.error()) {
                lines.extend(placeholder);
            }
            if let Some(doctor) = page.doctor() {
                lines.push(heading(theme, doctor.display_name()));
                lines.push(Line::from(format!("Specialization: {}", doctor.specialization)));
                lines.push(Line::from(format!("License: {}", doctor.license_number)));
                lines.push(Line::from(format!("Fee: {}", doctor.fee_display())));
                if let Some(email) = &doctor.user.email {
                    lines.push(Line::from(format!("Email: {}", email)));
                }
                if let Some(phone) = &doctor.user.phone {
                    lines.push(Line::from(format!("Phone: {}", phone)));
                }
                lines.push(Line::from(doctor.bio.clone()));
                lines.push(Line::from(""));
                if page.is_manageable() {
                    lines.push(muted(theme, "e: edit | d: delete | a: availability"));
                } else {
                    lines.push(muted(theme, "a: availability | :go /appointments to book"));
                }
            } else if page.is_loading() {
                lines.push(muted(theme, "Loading..."));
            }
        }
        PageState::DoctorForm(page) => {
            let title = if page.id().is_some() {
                "Edit doctor profile"
            } else {
                "New doctor profile"
            };
            lines.push(heading(theme, title));
            lines.push(muted(theme, "Fee is a number, Available is yes or no"));
            if page.is_saving() {
                lines.push(muted(theme, "Saving..."));
            }
            if let Some(error) = page.error() {
                lines.push(error_line(theme, error));
            }
        }
        PageState::Availability(page) => {
            if let Some(placeholder) = placeholder(theme, page.is_loading(), page.error()) {
                return placeholder;
            }
            if let Some(doctor) = page.doctor() {
                lines.push(muted(theme, format!("Doctor #{}", doctor)));
            }
            if page.slots().is_empty() {
                lines.push(muted(theme, "No availability slots. Press a to add one."));
            }
            for (index, slot) in page.slots().iter().enumerate() {
                lines.push(list_row(
                    theme,
                    index == page.cursor(),
                    format!("{} | {}", slot.day_display(), slot.time_range()),
                ));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(page.listing().pagination.render()));
        }
        PageState::AvailabilityDetail(page) => {
            if let Some(placeholder) = placeholder(theme, false, page.error()) {
                lines.extend(placeholder);
            }
            if let Some(slot) = page.slot() {
                lines.push(heading(theme, slot.day_display()));
                lines.push(Line::from(slot.time_range()));
                lines.push(Line::from(format!("Doctor #{}", slot.doctor)));
                lines.push(Line::from(""));
                lines.push(muted(theme, "e: edit | d: delete"));
            } else if page.is_loading() {
                lines.push(muted(theme, "Loading..."));
            }
        }
        PageState::AvailabilityForm(page) => {
            let title = if page.id().is_some() {
                "Edit availability"
            } else {
                "New availability"
            };
            lines.push(heading(theme, title));
            lines.push(muted(theme, "Day as YYYY-MM-DD, times as HH:MM"));
            if page.is_saving() {
                lines.push(muted(theme, "Saving..."));
            }
            if let Some(error) = page.error() {
                lines.push(error_line(theme, error));
            }
        }
    }

    lines
}

fn dashboard_lines(theme: &Theme, page: &DashboardPage, cursor: usize) -> Vec<Line<'static>> {
    let tabs = DashboardTab::ALL
        .iter()
        .map(|tab| {
            if *tab == page.tab {
                Span::styled(format!("[{}] ", tab.label()), theme.selected())
            } else {
                Span::raw(format!(" {}  ", tab.label()))
            }
        })
        .collect::<Vec<_>>();
    let mut lines = vec![Line::from(tabs), Line::from("")];

    match page.tab {
        DashboardTab::Overview => {
            lines.push(heading(theme, "Recent health checks"));
            if page.recent().is_empty() {
                lines.push(muted(theme, "No health checks yet."));
            }
            for summary in page.recent() {
                lines.extend(check_lines(summary));
            }
            if page.has_more() {
                lines.push(muted(theme, "Press t for the full history"));
            }
            lines.push(Line::from(""));
            lines.push(heading(theme, "Quick actions"));
            for (label, route) in DashboardPage::quick_actions() {
                lines.push(Line::from(format!("{} (:go {})", label, route.path())));
            }
        }
        DashboardTab::HealthRecords => {
            if page.checks().is_empty() {
                lines.push(muted(theme, "No health checks yet."));
            }
            for (index, summary) in page.checks().iter().enumerate() {
                let mut rows = check_lines(summary);
                if index == cursor {
                    if let Some(first) = rows.first_mut() {
                        *first = first.clone().style(theme.selected());
                    }
                }
                lines.extend(rows);
            }
        }
        DashboardTab::Appointments => {
            lines.push(muted(theme, "No upcoming appointments."));
        }
    }
    lines
}
