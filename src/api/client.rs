use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::ApiError;
use super::traits::MediHelpApi;
use super::types::{
    Article, Availability, AvailabilityInput, ChatReply, ChatRequest, DoctorProfile,
    DoctorProfileInput, FirstAidGuide, HealthCheck, Listing, LoginRequest, LoginResponse, Page,
    RegisterRequest, SkinDiagnosis, SkinImage, Symptom, SymptomCheckRequest, Video,
};
use crate::app::ApiConfig;
use crate::session::Session;

/// Whether an endpoint wants the bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Attach `Authorization: Bearer <token>` when a token is stored
    Bearer,
    /// Public endpoint, never send the token
    Anonymous,
}

/// HTTP implementation of [`MediHelpApi`]
///
/// One function per endpoint; no caching, no retries. A 401 comes back as
/// [`ApiError::Unauthorized`] and is left to the caller.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    /// Create a client for the configured backend, reading tokens from `session`
    pub fn new(config: &ApiConfig, session: Session) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request to `path` under the base URL
    pub fn request(&self, method: Method, path: &str, auth: Auth) -> RequestBuilder {
        tracing::debug!(method = method.as_str(), path, "api request");

        let mut request = self.http.request(method, self.url(path));

        if auth == Auth::Bearer {
            if let Some(token) = self.session.token() {
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
            }
        }

        request
    }

    /// Multipart upload request for the skin diagnosis endpoint
    pub fn skin_upload_request(&self, image: &SkinImage) -> Result<RequestBuilder, ApiError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type())?;
        let form = Form::new().part("image", part);

        Ok(self
            .request(Method::POST, "/api/skin-diagnosis/", Auth::Bearer)
            .multipart(form))
    }

    /// Send and decode the body as `T`
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(ApiError::from)
    }

    /// Send and discard the body
    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send_raw(request).await.map(|_| ())
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            let err = ApiError::from_status(status, &body);
            tracing::warn!(status = status.as_u16(), error = %err, "api call failed");
            Err(err)
        }
    }

    async fn get_listing<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Page<T>, ApiError> {
        let listing: Listing<T> = self.send(request).await?;
        Ok(listing.into())
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path, auth).json(body))
            .await
    }

    async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::PATCH, path, Auth::Bearer).json(body))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path, auth)).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_empty(self.request(Method::DELETE, path, Auth::Bearer))
            .await
    }

    fn page_query(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        vec![("page", page.to_string()), ("page_size", page_size.to_string())]
    }
}

#[async_trait]
impl MediHelpApi for ApiClient {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.send_empty(
            self.request(Method::POST, "/api/auth/register/", Auth::Anonymous)
                .json(request),
        )
        .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json("/api/auth/login/", Auth::Anonymous, request)
            .await
    }

    async fn check_symptoms(&self, request: &SymptomCheckRequest) -> Result<HealthCheck, ApiError> {
        self.post_json("/api/health/checks/", Auth::Bearer, request)
            .await
    }

    async fn health_checks(&self) -> Result<Page<HealthCheck>, ApiError> {
        self.get_listing(self.request(Method::GET, "/api/health/checks/", Auth::Bearer))
            .await
    }

    async fn health_check(&self, id: i64) -> Result<HealthCheck, ApiError> {
        self.get(&format!("/api/health/checks/{}/", id), Auth::Bearer)
            .await
    }

    async fn symptoms(&self) -> Result<Page<Symptom>, ApiError> {
        self.get_listing(self.request(Method::GET, "/api/health/symptoms/", Auth::Bearer))
            .await
    }

    async fn symptom(&self, id: i64) -> Result<Symptom, ApiError> {
        self.get(&format!("/api/health/symptoms/{}/", id), Auth::Bearer)
            .await
    }

    async fn first_aid(&self) -> Result<Page<FirstAidGuide>, ApiError> {
        self.get_listing(self.request(Method::GET, "/api/firstaid/", Auth::Bearer))
            .await
    }

    async fn search_first_aid(&self, query: &str) -> Result<Page<FirstAidGuide>, ApiError> {
        self.get_listing(
            self.request(Method::GET, "/api/firstaid/", Auth::Bearer)
                .query(&[("q", query)]),
        )
        .await
    }

    async fn articles(&self) -> Result<Page<Article>, ApiError> {
        self.get_listing(self.request(Method::GET, "/api/content/articles/", Auth::Anonymous))
            .await
    }

    async fn videos(&self) -> Result<Page<Video>, ApiError> {
        self.get_listing(self.request(Method::GET, "/api/content/videos/", Auth::Anonymous))
            .await
    }

    async fn chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        self.post_json("/api/chat/interact/", Auth::Bearer, &body)
            .await
    }

    async fn upload_skin_diagnosis(&self, image: &SkinImage) -> Result<SkinDiagnosis, ApiError> {
        let request = self.skin_upload_request(image)?;
        self.send(request).await
    }

    async fn doctor_profiles(&self, page: u32, page_size: u32) -> Result<Page<DoctorProfile>, ApiError> {
        self.get_listing(
            self.request(Method::GET, "/api/doctors/profiles/", Auth::Bearer)
                .query(&Self::page_query(page, page_size)),
        )
        .await
    }

    async fn doctor_profile(&self, id: i64) -> Result<DoctorProfile, ApiError> {
        self.get(&format!("/api/doctors/profiles/{}/", id), Auth::Bearer)
            .await
    }

    async fn create_doctor_profile(&self, input: &DoctorProfileInput) -> Result<DoctorProfile, ApiError> {
        self.post_json("/api/doctors/profiles/", Auth::Bearer, input)
            .await
    }

    async fn update_doctor_profile(&self, id: i64, input: &DoctorProfileInput) -> Result<DoctorProfile, ApiError> {
        self.patch_json(&format!("/api/doctors/profiles/{}/", id), input)
            .await
    }

    async fn delete_doctor_profile(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/doctors/profiles/{}/", id)).await
    }

    async fn availability(
        &self,
        page: u32,
        doctor: Option<i64>,
        page_size: u32,
    ) -> Result<Page<Availability>, ApiError> {
        let mut query = Self::page_query(page, page_size);
        if let Some(doctor) = doctor {
            query.push(("doctor", doctor.to_string()));
        }

        self.get_listing(
            self.request(Method::GET, "/api/doctors/availability/", Auth::Bearer)
                .query(&query),
        )
        .await
    }

    async fn availability_slot(&self, id: i64) -> Result<Availability, ApiError> {
        self.get(&format!("/api/doctors/availability/{}/", id), Auth::Bearer)
            .await
    }

    async fn create_availability(&self, input: &AvailabilityInput) -> Result<Availability, ApiError> {
        self.post_json("/api/doctors/availability/", Auth::Bearer, input)
            .await
    }

    async fn update_availability(&self, id: i64, input: &AvailabilityInput) -> Result<Availability, ApiError> {
        self.patch_json(&format!("/api/doctors/availability/{}/", id), input)
            .await
    }

    async fn delete_availability(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/doctors/availability/{}/", id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;

    fn client_with(session: Session) -> ApiClient {
        let config = ApiConfig {
            base_url: "http://api.medihelp.test/".to_string(),
            ..Default::default()
        };
        ApiClient::new(&config, session).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = client_with(Session::in_memory());
        let request = client
            .request(Method::GET, "/api/content/articles/", Auth::Anonymous)
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://api.medihelp.test/api/content/articles/"
        );
    }

    #[test]
    fn test_bearer_header_when_token_present() {
        let session = Session::in_memory();
        session.set_token("tok123").unwrap();
        let client = client_with(session);

        let request = client
            .request(Method::GET, "/api/health/symptoms/", Auth::Bearer)
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer tok123"
        );
    }

    #[test]
    fn test_no_header_without_token() {
        let client = client_with(Session::in_memory());
        let request = client
            .request(Method::GET, "/api/health/symptoms/", Auth::Bearer)
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_public_endpoint_never_sends_token() {
        let session = Session::in_memory();
        session.set_token("tok123").unwrap();
        let client = client_with(session);

        let request = client
            .request(Method::POST, "/api/auth/login/", Auth::Anonymous)
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_header_tracks_session_changes() {
        let session = Session::in_memory();
        let client = client_with(session.clone());

        session.set_token("first").unwrap();
        let request = client
            .request(Method::GET, "/api/firstaid/", Auth::Bearer)
            .build()
            .unwrap();
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer first");

        session.clear_token().unwrap();
        let request = client
            .request(Method::GET, "/api/firstaid/", Auth::Bearer)
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_search_query_is_encoded() {
        let client = client_with(Session::in_memory());
        let request = client
            .request(Method::GET, "/api/firstaid/", Auth::Bearer)
            .query(&[("q", "burn & cut")])
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("q=burn+%26+cut"));
    }

    #[test]
    fn test_page_query() {
        let client = client_with(Session::in_memory());
        let request = client
            .request(Method::GET, "/api/doctors/profiles/", Auth::Bearer)
            .query(&ApiClient::page_query(2, 10))
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("page=2&page_size=10"));
    }

    #[test]
    fn test_skin_upload_is_multipart() {
        let session = Session::in_memory();
        session.set_token("tok123").unwrap();
        let client = client_with(session);

        let image = SkinImage::new("rash.png", vec![0x89, 0x50, 0x4e, 0x47]);
        let request = client.skin_upload_request(&image).unwrap().build().unwrap();

        let content_type = request
            .headers()
            .get(CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer tok123"
        );
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let client = client_with(Session::in_memory());
        let body = LoginRequest {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
        };
        let request = client
            .request(Method::POST, "/api/auth/login/", Auth::Anonymous)
            .json(&body)
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: Some(2),
        };
        let client = ApiClient::new(&config, Session::in_memory()).unwrap();
        let err = client.articles().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
