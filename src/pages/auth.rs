use once_cell::sync::Lazy;
use regex::Regex;

use super::{Effect, Form};
use crate::api::{ApiError, LoginRequest, MediHelpApi, RegisterRequest};
use crate::router::Route;
use crate::session::Session;

static DATE_OF_BIRTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

/// Email/password login form
#[derive(Debug, Clone, Default)]
pub struct LoginPage {
    pub email: String,
    pub password: String,
    error: Option<String>,
    loading: bool,
}

impl LoginPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Exchange the credentials for a token and go home on success
    pub async fn submit(&mut self, api: &dyn MediHelpApi, session: &Session) -> Effect {
        if self.loading {
            return Effect::Stay;
        }
        self.loading = true;
        self.error = None;

        let request = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };
        let result = api.login(&request).await;
        self.loading = false;

        match result {
            Ok(response) => {
                if let Err(err) = session.set_token(&response.tokens.access) {
                    self.error = Some(err.to_string());
                    return Effect::Stay;
                }
                tracing::info!("logged in");
                self.password.clear();
                Effect::Navigate(Route::Home)
            }
            Err(err) => {
                tracing::debug!(error = %err, "login rejected");
                self.error = Some(login_error(&err));
                Effect::Stay
            }
        }
    }
}

// A 401 here means bad credentials, not an expired session
fn login_error(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized {
            message: Some(message),
        } => message.clone(),
        ApiError::Unauthorized { message: None } => "Login failed".to_string(),
        other => other.user_message("Login failed"),
    }
}

/// Account registration form
#[derive(Debug, Clone, Default)]
pub struct SignupPage {
    pub form: RegisterRequest,
    error: Option<String>,
    loading: bool,
}

impl SignupPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Local checks run before anything is sent
    pub fn validate(&self) -> Result<(), String> {
        let dob = self.form.date_of_birth.trim();
        if dob.is_empty() {
            return Err("Date of birth is required".to_string());
        }
        if !DATE_OF_BIRTH.is_match(dob) {
            return Err("Date of birth must be in YYYY-MM-DD format".to_string());
        }
        if self.form.password != self.form.confirm_password {
            return Err("Passwords do not match".to_string());
        }
        Ok(())
    }

    pub async fn submit(&mut self, api: &dyn MediHelpApi) -> Effect {
        if self.loading {
            return Effect::Stay;
        }
        if let Err(message) = self.validate() {
            self.error = Some(message);
            return Effect::Stay;
        }
        self.loading = true;
        self.error = None;

        let mut request = self.form.clone();
        request.date_of_birth = request.date_of_birth.trim().to_string();
        let result = api.register(&request).await;
        self.loading = false;

        match result {
            Ok(()) => {
                tracing::info!(email = %request.email, "account registered");
                Effect::Navigate(Route::Login)
            }
            Err(err) => {
                self.error = Some(err.user_message("Signup failed"));
                Effect::Stay
            }
        }
    }
}

impl Form for LoginPage {
    fn labels(&self) -> &'static [&'static str] {
        &["Email", "Password"]
    }

    fn field(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.email),
            1 => Some(&self.password),
            _ => None,
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.email),
            1 => Some(&mut self.password),
            _ => None,
        }
    }

    fn is_secret(&self, index: usize) -> bool {
        index == 1
    }
}

impl Form for SignupPage {
    fn labels(&self) -> &'static [&'static str] {
        &[
            "Email",
            "First name",
            "Last name",
            "Phone",
            "Date of birth (YYYY-MM-DD)",
            "Password",
            "Confirm password",
        ]
    }

    fn field(&self, index: usize) -> Option<&str> {
        let form = &self.form;
        let value = match index {
            0 => &form.email,
            1 => &form.first_name,
            2 => &form.last_name,
            3 => &form.phone,
            4 => &form.date_of_birth,
            5 => &form.password,
            6 => &form.confirm_password,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        let form = &mut self.form;
        let value = match index {
            0 => &mut form.email,
            1 => &mut form.first_name,
            2 => &mut form.last_name,
            3 => &mut form.phone,
            4 => &mut form.date_of_birth,
            5 => &mut form.password,
            6 => &mut form.confirm_password,
            _ => return None,
        };
        Some(value)
    }

    fn is_secret(&self, index: usize) -> bool {
        index >= 5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AuthTokens, LoginResponse, MockMediHelpApi};
    use pretty_assertions::assert_eq;

    fn filled_signup() -> SignupPage {
        let mut page = SignupPage::new();
        page.form = RegisterRequest {
            email: "a@b.com".to_string(),
            first_name: "Abebe".to_string(),
            last_name: "Kebede".to_string(),
            phone: "0911".to_string(),
            date_of_birth: "1990-04-12".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
        };
        page
    }

    #[tokio::test]
    async fn test_login_stores_token_and_goes_home() {
        let mut api = MockMediHelpApi::new();
        api.expect_login()
            .withf(|req| req.email == "a@b.com" && req.password == "x")
            .times(1)
            .returning(|_| {
                Ok(LoginResponse {
                    tokens: AuthTokens {
                        access: "T".to_string(),
                        refresh: None,
                    },
                })
            });
        let session = Session::in_memory();
        let mut page = LoginPage::new();
        page.email = "a@b.com".to_string();
        page.password = "x".to_string();

        let effect = page.submit(&api, &session).await;

        assert_eq!(effect, Effect::Navigate(Route::Home));
        assert_eq!(session.token().as_deref(), Some("T"));
        assert!(page.error().is_none());
        assert!(!page.is_loading());
    }

    #[tokio::test]
    async fn test_login_failure_shows_server_error() {
        let mut api = MockMediHelpApi::new();
        api.expect_login().returning(|_| {
            Err(ApiError::Server {
                status: 400,
                message: Some("Invalid credentials".to_string()),
            })
        });
        let session = Session::in_memory();
        let mut page = LoginPage::new();

        let effect = page.submit(&api, &session).await;

        assert_eq!(effect, Effect::Stay);
        assert_eq!(page.error(), Some("Invalid credentials"));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_401_is_not_session_expiry() {
        let mut api = MockMediHelpApi::new();
        api.expect_login()
            .returning(|_| Err(ApiError::Unauthorized { message: None }));
        let mut page = LoginPage::new();

        let effect = page.submit(&api, &Session::in_memory()).await;

        assert_eq!(effect, Effect::Stay);
        assert_eq!(page.error(), Some("Login failed"));
    }

    #[test]
    fn test_signup_validation() {
        let mut page = filled_signup();
        assert_eq!(page.validate(), Ok(()));

        page.form.date_of_birth = "".to_string();
        assert_eq!(page.validate().unwrap_err(), "Date of birth is required");

        page.form.date_of_birth = "12/04/1990".to_string();
        assert_eq!(
            page.validate().unwrap_err(),
            "Date of birth must be in YYYY-MM-DD format"
        );

        page.form.date_of_birth = "1990-04-12".to_string();
        page.form.confirm_password = "other".to_string();
        assert_eq!(page.validate().unwrap_err(), "Passwords do not match");
    }

    #[tokio::test]
    async fn test_signup_invalid_form_sends_nothing() {
        let api = MockMediHelpApi::new();
        let mut page = filled_signup();
        page.form.confirm_password = "nope".to_string();

        assert_eq!(page.submit(&api).await, Effect::Stay);
        assert_eq!(page.error(), Some("Passwords do not match"));
    }

    #[tokio::test]
    async fn test_signup_success_goes_to_login() {
        let mut api = MockMediHelpApi::new();
        api.expect_register().times(1).returning(|_| Ok(()));
        let mut page = filled_signup();

        assert_eq!(page.submit(&api).await, Effect::Navigate(Route::Login));
    }

    #[tokio::test]
    async fn test_signup_shows_field_error() {
        let mut api = MockMediHelpApi::new();
        api.expect_register().returning(|_| {
            Err(ApiError::from_status(
                reqwest::StatusCode::BAD_REQUEST,
                r#"{"email": ["user with this email already exists."]}"#,
            ))
        });
        let mut page = filled_signup();

        page.submit(&api).await;
        assert_eq!(page.error(), Some("user with this email already exists."));
    }
}
