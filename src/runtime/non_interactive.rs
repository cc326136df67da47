use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::{
    api::{ApiError, Diagnosis, SymptomCheckRequest},
    app::AppState,
    cli::{Commands, OutputFormat},
    constants::SESSION_EXPIRED_MESSAGE,
    pages::{
        fetch_guides, load_check_summaries, ArticlesPage, AvailabilityPage, DoctorDetailPage,
        DoctorsPage, Effect, LoginPage, SignupPage, SkinDiagnosisPage, VideosPage,
    },
    router::{guard, Resolution, Route},
};

/// Result of a one-shot command
#[derive(Debug, Serialize)]
pub struct NonInteractiveResult {
    /// Subcommand that was run
    pub command: String,
    /// Heading for human-readable output
    pub title: String,
    /// Human-readable body
    pub lines: Vec<String>,
    /// Typed payload for JSON output
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
    /// Any errors that occurred
    pub errors: Vec<String>,
    pub metadata: ExecutionMetadata,
}

#[derive(Debug, Serialize)]
pub struct ExecutionMetadata {
    pub base_url: String,
    /// Page controls for paginated listings, e.g. "< 1 [2] 3 >"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<String>,
    /// Whether a token is stored after the command ran
    pub authenticated: bool,
    /// Execution time in milliseconds
    pub duration_ms: u128,
}

impl NonInteractiveResult {
    fn new(command: &str, title: impl Into<String>, base_url: &str) -> Self {
        Self {
            command: command.to_string(),
            title: title.into(),
            lines: Vec::new(),
            data: Value::Null,
            errors: Vec::new(),
            metadata: ExecutionMetadata {
                base_url: base_url.to_string(),
                pagination: None,
                authenticated: false,
                duration_ms: 0,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs one subcommand against the backend and reports the outcome
pub struct NonInteractiveRunner {
    state: AppState,
}

impl NonInteractiveRunner {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Execute a single subcommand and return the result
    pub async fn execute(&self, command: &Commands) -> Result<NonInteractiveResult> {
        let start_time = std::time::Instant::now();
        let (name, route) = describe(command);
        let mut result =
            NonInteractiveResult::new(name, route.title(), &self.state.config.api.base_url);

        // Same guard as the terminal UI: no token, no request
        match guard(route, &self.state.session) {
            Resolution::Redirect { .. } => {
                result
                    .errors
                    .push("Please log in first (medihelp login)".to_string());
            }
            Resolution::Render(_) => self.run(command, &mut result).await?,
        }

        result.metadata.authenticated = self.state.session.is_authenticated();
        result.metadata.duration_ms = start_time.elapsed().as_millis();
        tracing::debug!(
            command = name,
            errors = result.errors.len(),
            duration_ms = result.metadata.duration_ms as u64,
            "command finished"
        );
        Ok(result)
    }

    async fn run(&self, command: &Commands, result: &mut NonInteractiveResult) -> Result<()> {
        let api = self.state.api.as_ref();
        let session = &self.state.session;
        let page_size = self.state.config.ui.page_size;

        match command {
            Commands::Login { email, password } => {
                let mut page = LoginPage::new();
                page.email = email.clone();
                page.password = password.clone();
                match page.submit(api, session).await {
                    Effect::Navigate(_) => result.lines.push("Logged in.".to_string()),
                    _ => result.errors.extend(page.error().map(str::to_string)),
                }
            }
            Commands::Register {
                email,
                first_name,
                last_name,
                phone,
                date_of_birth,
                password,
            } => {
                let mut page = SignupPage::new();
                page.form.email = email.clone();
                page.form.first_name = first_name.clone();
                page.form.last_name = last_name.clone();
                page.form.phone = phone.clone();
                page.form.date_of_birth = date_of_birth.clone();
                page.form.password = password.clone();
                page.form.confirm_password = password.clone();
                match page.submit(api).await {
                    Effect::Navigate(_) => result
                        .lines
                        .push("Account created. Run `medihelp login` to sign in.".to_string()),
                    _ => result.errors.extend(page.error().map(str::to_string)),
                }
            }
            Commands::Symptoms => match api.symptoms().await {
                Ok(page) => {
                    result.lines = page
                        .results
                        .iter()
                        .map(|s| format!("{:>4}  {}", s.id, s.name))
                        .collect();
                    result.data = serde_json::to_value(&page.results)?;
                }
                Err(err) => self.fail(result, err, "Failed to fetch symptoms"),
            },
            Commands::Check { symptoms } => {
                let request = SymptomCheckRequest {
                    symptoms: symptoms.clone(),
                };
                match api.check_symptoms(&request).await {
                    Ok(check) => {
                        result.lines = diagnosis_lines(&check.diagnosis);
                        result.data = serde_json::to_value(&check)?;
                    }
                    Err(err) => self.fail(result, err, "Failed to check symptoms"),
                }
            }
            Commands::History => match load_check_summaries(api).await {
                Ok(summaries) => {
                    if summaries.is_empty() {
                        result.lines.push("No health checks yet.".to_string());
                    }
                    for summary in &summaries {
                        result.lines.push(format!(
                            "{}  symptoms: {}  conditions: {}  severity: {}",
                            summary.check.created_at.format("%Y-%m-%d"),
                            summary.symptom_names.join(", "),
                            summary.conditions(),
                            summary.severity()
                        ));
                    }
                    let checks: Vec<_> = summaries.iter().map(|s| &s.check).collect();
                    result.data = serde_json::to_value(checks)?;
                }
                Err(err) => self.fail(result, err, "Failed to load your health checks"),
            },
            Commands::FirstAid { query } => {
                match fetch_guides(api, query.as_deref().unwrap_or_default()).await {
                    Ok(guides) => {
                        if guides.is_empty() {
                            result.lines.push("No first aid guides found.".to_string());
                        }
                        for guide in &guides {
                            result.lines.push(format!(
                                "{} ({}, {})",
                                guide.title, guide.condition.name, guide.severity_level_display
                            ));
                            result.lines.extend(
                                guide
                                    .steps
                                    .iter()
                                    .enumerate()
                                    .map(|(i, step)| format!("  {}. {}", i + 1, step)),
                            );
                        }
                        result.data = serde_json::to_value(&guides)?;
                    }
                    Err(err) => self.fail(result, err, "Failed to fetch first aid guides"),
                }
            }
            Commands::Articles => {
                let mut page = ArticlesPage::new();
                let effect = page.mount(api).await;
                if self.settle(result, effect, page.error()) {
                    for article in page.articles() {
                        result.lines.push(article.title.clone());
                        result.lines.push(format!("  {}", page.body(article)));
                    }
                    result.data = serde_json::to_value(page.articles())?;
                }
            }
            Commands::Videos => {
                let mut page = VideosPage::new();
                let effect = page.mount(api).await;
                if self.settle(result, effect, page.error()) {
                    for video in page.videos() {
                        result.lines.push(format!("{}  {}", video.title, video.url));
                    }
                    result.data = serde_json::to_value(page.videos())?;
                }
            }
            Commands::Chat { message } => {
                if message.trim().is_empty() {
                    result
                        .errors
                        .push("Please enter a message about your symptoms.".to_string());
                    return Ok(());
                }
                match api.chat(message).await {
                    Ok(reply) => {
                        let advice = &reply.response;
                        result.lines.push(format!("Urgency: {}", advice.urgency));
                        if !advice.conditions.is_empty() {
                            result.lines.push(format!(
                                "Possible conditions: {}",
                                advice.conditions.join(", ")
                            ));
                        }
                        result
                            .lines
                            .extend(advice.recommendations.iter().map(|r| format!("- {}", r)));
                        result.data = serde_json::to_value(&reply)?;
                    }
                    Err(err) => self.fail(result, err, "Failed to get AI response"),
                }
            }
            Commands::Skin { image } => {
                let mut page = SkinDiagnosisPage::new();
                page.path_input = image.display().to_string();
                page.select_from_input();
                let effect = if page.image().is_some() {
                    page.submit(api, session).await
                } else {
                    Effect::Stay
                };
                match page.result() {
                    Some(diagnosis) => {
                        result.lines = diagnosis_lines(&diagnosis.diagnosis);
                        result
                            .lines
                            .push(format!("Free credits left: {}", session.credits()));
                        result.data = serde_json::to_value(diagnosis)?;
                    }
                    None => {
                        self.settle(result, effect, page.error().map(str::to_string));
                    }
                }
            }
            Commands::Doctors { page: number } => {
                let mut page = DoctorsPage::new(page_size);
                let effect = page.go_to(api, *number).await;
                if self.settle(result, effect, page.error()) {
                    for doctor in page.doctors() {
                        result.lines.push(format!(
                            "{:>4}  {} | {} | {}",
                            doctor.id,
                            doctor.display_name(),
                            doctor.specialization,
                            doctor.fee_display()
                        ));
                    }
                    result.metadata.pagination = Some(page.listing().pagination.render());
                    result.data = serde_json::to_value(page.doctors())?;
                }
            }
            Commands::Doctor { id } => {
                let mut page = DoctorDetailPage::managed(*id);
                let effect = page.mount(api).await;
                if self.settle(result, effect, page.error()) {
                    if let Some(doctor) = page.doctor() {
                        result.title = doctor.display_name();
                        result.lines = vec![
                            format!("Specialization: {}", doctor.specialization),
                            format!("License: {}", doctor.license_number),
                            format!("Fee: {}", doctor.fee_display()),
                            format!("Available: {}", if doctor.available { "yes" } else { "no" }),
                            doctor.bio.clone(),
                        ];
                        result.data = serde_json::to_value(doctor)?;
                    }
                }
            }
            Commands::DeleteDoctor { id, yes } => {
                if !yes {
                    result
                        .errors
                        .push("Refusing to delete without --yes".to_string());
                    return Ok(());
                }
                let mut page = DoctorDetailPage::managed(*id);
                let effect = page.mount(api).await;
                if !self.settle(result, effect, page.error()) {
                    return Ok(());
                }
                page.request_delete();
                match page.confirm_delete(api).await {
                    Effect::Navigate(_) => {
                        result.lines.push(format!("Deleted doctor profile {}.", id))
                    }
                    effect => {
                        self.settle(result, effect, page.error());
                    }
                }
            }
            Commands::Availability {
                page: number,
                doctor,
            } => {
                let mut page = AvailabilityPage::new(*doctor, page_size);
                let effect = page.go_to(api, *number).await;
                if self.settle(result, effect, page.error()) {
                    for slot in page.slots() {
                        result.lines.push(format!(
                            "{:>4}  {} | {} | doctor #{}",
                            slot.id,
                            slot.day_display(),
                            slot.time_range(),
                            slot.doctor
                        ));
                    }
                    result.metadata.pagination = Some(page.listing().pagination.render());
                    result.data = serde_json::to_value(page.slots())?;
                }
            }
            Commands::Init | Commands::Status | Commands::Logout | Commands::Ui { .. } => {}
        }

        Ok(())
    }

    /// Record a page's outcome; returns `true` when there is data to show
    fn settle(
        &self,
        result: &mut NonInteractiveResult,
        effect: Effect,
        error: Option<String>,
    ) -> bool {
        if effect == Effect::SessionExpired {
            if let Err(e) = self.state.session.clear_token() {
                result.errors.push(format!("Failed to clear session: {}", e));
            }
            result.errors.push(SESSION_EXPIRED_MESSAGE.to_string());
            return false;
        }
        match error {
            Some(message) => {
                result.errors.push(message);
                false
            }
            None => true,
        }
    }

    fn fail(&self, result: &mut NonInteractiveResult, err: ApiError, fallback: &str) {
        tracing::debug!(error = %err, "request failed");
        let effect = Effect::from_error(&err);
        self.settle(result, effect, Some(err.user_message(fallback)));
    }
}

/// Subcommand name and the route whose guard it is subject to
fn describe(command: &Commands) -> (&'static str, Route) {
    match command {
        Commands::Init => ("init", Route::Home),
        Commands::Status => ("status", Route::Home),
        Commands::Logout => ("logout", Route::Home),
        Commands::Ui { .. } => ("ui", Route::Home),
        Commands::Login { .. } => ("login", Route::Login),
        Commands::Register { .. } => ("register", Route::Signup),
        Commands::Symptoms => ("symptoms", Route::SymptomChecker),
        Commands::Check { .. } => ("check", Route::SymptomChecker),
        Commands::Chat { .. } => ("chat", Route::SymptomChecker),
        Commands::History => ("history", Route::Dashboard),
        Commands::FirstAid { .. } => ("first-aid", Route::FirstAid),
        Commands::Articles => ("articles", Route::Articles),
        Commands::Videos => ("videos", Route::Videos),
        Commands::Skin { .. } => ("skin", Route::SkinDiagnosis),
        Commands::Doctors { .. } => ("doctors", Route::Doctors),
        Commands::Doctor { id } => ("doctor", Route::DoctorDetail(*id)),
        Commands::DeleteDoctor { id, .. } => ("delete-doctor", Route::DoctorDetail(*id)),
        Commands::Availability { doctor, .. } => (
            "availability",
            Route::Availability { doctor: *doctor },
        ),
    }
}

fn diagnosis_lines(diagnosis: &Diagnosis) -> Vec<String> {
    let mut lines = vec![format!("Urgency: {}", diagnosis.urgency)];
    if let Some(confidence) = diagnosis.confidence_percent() {
        lines.push(format!("Confidence: {}%", confidence));
    }
    if !diagnosis.conditions.is_empty() {
        lines.push(format!(
            "Possible conditions: {}",
            diagnosis.conditions.join(", ")
        ));
    }
    lines.extend(diagnosis.recommendations.iter().map(|r| format!("- {}", r)));
    lines
}

/// Format a result as text, JSON or Markdown
pub fn format_result(result: &NonInteractiveResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize result: {}\"}}", e)),
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str(&result.title);
            output.push('\n');
            for line in &result.lines {
                output.push_str(line);
                output.push('\n');
            }
            if let Some(pagination) = &result.metadata.pagination {
                output.push_str(&format!("\n{}\n", pagination));
            }

            if !result.errors.is_empty() {
                output.push_str("\n--- Errors ---\n");
                for error in &result.errors {
                    output.push_str(&format!("- {}\n", error));
                }
            }

            output
        }
        OutputFormat::Markdown => {
            let mut output = String::new();

            output.push_str(&format!("## {}\n\n", result.title));
            for line in &result.lines {
                output.push_str(&format!("- {}\n", line.trim_start()));
            }
            output.push('\n');

            if let Some(pagination) = &result.metadata.pagination {
                output.push_str(&format!("`{}`\n\n", pagination));
            }

            if !result.errors.is_empty() {
                output.push_str("## Errors\n\n");
                for error in &result.errors {
                    output.push_str(&format!("- {}\n", error));
                }
                output.push('\n');
            }

            output.push_str("---\n");
            output.push_str(&format!(
                "*Backend: {} | Duration: {}ms*\n",
                result.metadata.base_url, result.metadata.duration_ms
            ));

            output
        }
    }
}
