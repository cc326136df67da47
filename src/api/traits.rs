use async_trait::async_trait;

use super::errors::ApiError;
use super::types::{
    Article, Availability, AvailabilityInput, ChatReply, DoctorProfile, DoctorProfileInput,
    FirstAidGuide, HealthCheck, LoginRequest, LoginResponse, Page, RegisterRequest, SkinDiagnosis,
    SkinImage, Symptom, SymptomCheckRequest, Video,
};

/// Every backend operation the client knows about
///
/// Pages are written against this trait rather than the HTTP client so they
/// can be driven by a mock in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediHelpApi: Send + Sync {
    // Auth
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    // Health checks
    async fn check_symptoms(&self, request: &SymptomCheckRequest) -> Result<HealthCheck, ApiError>;
    async fn health_checks(&self) -> Result<Page<HealthCheck>, ApiError>;
    async fn health_check(&self, id: i64) -> Result<HealthCheck, ApiError>;

    // Symptom catalog
    async fn symptoms(&self) -> Result<Page<Symptom>, ApiError>;
    async fn symptom(&self, id: i64) -> Result<Symptom, ApiError>;

    // First aid
    async fn first_aid(&self) -> Result<Page<FirstAidGuide>, ApiError>;
    async fn search_first_aid(&self, query: &str) -> Result<Page<FirstAidGuide>, ApiError>;

    // Educational content
    async fn articles(&self) -> Result<Page<Article>, ApiError>;
    async fn videos(&self) -> Result<Page<Video>, ApiError>;

    // Chat and skin diagnosis
    async fn chat(&self, message: &str) -> Result<ChatReply, ApiError>;
    async fn upload_skin_diagnosis(&self, image: &SkinImage) -> Result<SkinDiagnosis, ApiError>;

    // Doctor directory
    async fn doctor_profiles(&self, page: u32, page_size: u32) -> Result<Page<DoctorProfile>, ApiError>;
    async fn doctor_profile(&self, id: i64) -> Result<DoctorProfile, ApiError>;
    async fn create_doctor_profile(&self, input: &DoctorProfileInput) -> Result<DoctorProfile, ApiError>;
    async fn update_doctor_profile(&self, id: i64, input: &DoctorProfileInput) -> Result<DoctorProfile, ApiError>;
    async fn delete_doctor_profile(&self, id: i64) -> Result<(), ApiError>;

    // Availability
    async fn availability(
        &self,
        page: u32,
        doctor: Option<i64>,
        page_size: u32,
    ) -> Result<Page<Availability>, ApiError>;
    async fn availability_slot(&self, id: i64) -> Result<Availability, ApiError>;
    async fn create_availability(&self, input: &AvailabilityInput) -> Result<Availability, ApiError>;
    async fn update_availability(&self, id: i64, input: &AvailabilityInput) -> Result<Availability, ApiError>;
    async fn delete_availability(&self, id: i64) -> Result<(), ApiError>;
}
