// Gateway module for the backend API - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod client;
mod errors;
mod traits;
mod types;

// Public re-exports - the ONLY way to access API functionality
pub use client::{ApiClient, Auth};
pub use errors::{extract_server_message, ApiError};
pub use traits::MediHelpApi;
#[cfg(test)]
pub use traits::MockMediHelpApi;
pub use types::{
    format_clock, Article, AuthTokens, Availability, AvailabilityInput, ChatAdvice, ChatReply,
    ChatRequest, Condition, ConditionRef, Diagnosis, DoctorProfile, DoctorProfileInput, DoctorUser,
    FirstAidGuide, HealthCheck, LoginRequest, LoginResponse, Page, RegisterRequest, SkinDiagnosis,
    SkinImage, Symptom, SymptomCheckRequest, Video,
};
