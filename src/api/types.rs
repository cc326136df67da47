use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Paginated listing envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Page<T> {
    /// Single page holding every item
    pub fn from_items(results: Vec<T>) -> Self {
        Self {
            count: Some(results.len() as u64),
            results,
            next: None,
            previous: None,
        }
    }

    /// Total number of items across all pages
    pub fn total_count(&self) -> u64 {
        self.count.unwrap_or(self.results.len() as u64)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::from_items(Vec::new())
    }
}

/// Listing body that some endpoints send as a bare array and others as an envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Page(Page<T>),
    Items(Vec<T>),
}

impl<T> From<Listing<T>> for Page<T> {
    fn from(listing: Listing<T>) -> Self {
        match listing {
            Listing::Page(page) => page,
            Listing::Items(items) => Page::from_items(items),
        }
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

// ---------------------------------------------------------------------------
// Health checks and symptoms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symptom {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub severity: Option<i32>,
    #[serde(default)]
    pub severity_display: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Server verdict attached to health checks and skin diagnoses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    #[serde(default)]
    pub urgency: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Diagnosis {
    /// Confidence as a rounded percentage
    pub fn confidence_percent(&self) -> Option<u32> {
        self.confidence.map(|c| (c * 100.0).round().clamp(0.0, 100.0) as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomCheckRequest {
    pub symptoms: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub id: i64,
    #[serde(default)]
    pub symptoms: Vec<i64>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub diagnosis: Diagnosis,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// First aid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstAidGuide {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub condition: ConditionRef,
    #[serde(default)]
    pub severity_level_display: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Educational content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default, deserialize_with = "comma_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "name_list")]
    pub related_conditions: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "name_list")]
    pub related_symptoms: Vec<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Chat and skin diagnosis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: ChatAdvice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatAdvice {
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub urgency: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinDiagnosis {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
    pub diagnosis: Diagnosis,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Image picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SkinImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SkinImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read an image from disk
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { file_name, bytes })
    }

    /// MIME type guessed from the file extension
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .file_name
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "bmp" => "image/bmp",
            _ => "image/jpeg",
        }
    }
}

// ---------------------------------------------------------------------------
// Doctors and availability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorUser {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: i64,
    pub user: DoctorUser,
    pub specialization: String,
    #[serde(default)]
    pub license_number: String,
    #[serde(deserialize_with = "decimal")]
    pub consultation_fee: f64,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub available: bool,
}

impl DoctorProfile {
    /// "Dr. First Last"
    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.user.first_name, self.user.last_name)
    }

    pub fn initials(&self) -> String {
        self.user
            .first_name
            .chars()
            .take(1)
            .chain(self.user.last_name.chars().take(1))
            .collect()
    }

    /// Fee formatted with two decimals
    pub fn fee_display(&self) -> String {
        format!("${:.2}", self.consultation_fee)
    }
}

/// Body for creating (all fields) or patching (any subset) a doctor profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consultation_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub id: i64,
    pub doctor: i64,
    pub day: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}

impl Availability {
    /// "Monday, June 2, 2025"
    pub fn day_display(&self) -> String {
        self.day.format("%A, %B %-d, %Y").to_string()
    }

    /// "9:00 AM - 5:30 PM"
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            format_clock(&self.start_time),
            format_clock(&self.end_time)
        )
    }
}

/// Body for creating (all fields) or patching (any subset) an availability slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Render "14:05" / "14:05:00" as "2:05 PM"; anything unparseable is returned as is
pub fn format_clock(raw: &str) -> String {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

/// Decimal fields arrive as JSON strings ("150.00") or numbers
fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Tags arrive as a list or as one comma-separated string
fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::List(items) => items,
        Raw::Text(text) => text
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Raw::Null(()) => Vec::new(),
    })
}

/// Related entities arrive as plain names or as `{ "name": ... }` objects
fn name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Named {
        Name(String),
        Object { name: String },
    }

    let items: Option<Vec<Named>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(|item| match item {
            Named::Name(name) | Named::Object { name } => name,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_listing_accepts_array_and_envelope() {
        let bare: Listing<Symptom> =
            serde_json::from_value(json!([{"id": 1, "name": "Cough"}])).unwrap();
        let page = Page::from(bare);
        assert_eq!(page.total_count(), 1);

        let envelope: Listing<Symptom> = serde_json::from_value(json!({
            "count": 25,
            "results": [{"id": 1, "name": "Cough", "description": "dry"}]
        }))
        .unwrap();
        let page = Page::from(envelope);
        assert_eq!(page.total_count(), 25);
        assert_eq!(page.results[0].description, "dry");
    }

    #[test]
    fn test_doctor_fee_string_or_number() {
        let doctor: DoctorProfile = serde_json::from_value(json!({
            "id": 1,
            "user": {"first_name": "Selam", "last_name": "Tesfaye"},
            "specialization": "Cardiologist",
            "consultation_fee": "180.50",
            "available": true
        }))
        .unwrap();
        assert_eq!(doctor.consultation_fee, 180.5);
        assert_eq!(doctor.display_name(), "Dr. Selam Tesfaye");
        assert_eq!(doctor.initials(), "ST");
        assert_eq!(doctor.fee_display(), "$180.50");

        let doctor: DoctorProfile = serde_json::from_value(json!({
            "id": 2,
            "user": {"first_name": "Abebe", "last_name": "Kebede"},
            "specialization": "Pediatrician",
            "consultation_fee": 100
        }))
        .unwrap();
        assert_eq!(doctor.consultation_fee, 100.0);
        assert!(!doctor.available);
    }

    #[test]
    fn test_article_tags_and_related_conditions() {
        let article: Article = serde_json::from_value(json!({
            "id": 1,
            "title": "Hydration",
            "content": "Drink water",
            "tags": "health, water ,",
            "related_conditions": [{"name": "Dehydration"}, "Heat stroke"],
            "is_published": true
        }))
        .unwrap();
        assert_eq!(article.tags, vec!["health", "water"]);
        assert_eq!(article.related_conditions, vec!["Dehydration", "Heat stroke"]);

        let article: Article = serde_json::from_value(json!({
            "id": 2,
            "title": "Sleep",
            "tags": ["rest"],
            "related_conditions": null
        }))
        .unwrap();
        assert_eq!(article.tags, vec!["rest"]);
        assert!(article.related_conditions.is_empty());
        assert!(!article.is_published);
    }

    #[test]
    fn test_availability_display() {
        let slot: Availability = serde_json::from_value(json!({
            "id": 4,
            "doctor": 2,
            "day": "2025-06-02",
            "start_time": "09:00:00",
            "end_time": "17:30"
        }))
        .unwrap();
        assert_eq!(slot.day_display(), "Monday, June 2, 2025");
        assert_eq!(slot.time_range(), "9:00 AM - 5:30 PM");
        assert_eq!(format_clock("soon"), "soon");
    }

    #[test]
    fn test_patch_body_skips_unset_fields() {
        let body = serde_json::to_value(DoctorProfileInput {
            available: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, json!({"available": false}));
    }

    #[test]
    fn test_confidence_percent() {
        let diagnosis = Diagnosis {
            confidence: Some(0.876),
            ..Default::default()
        };
        assert_eq!(diagnosis.confidence_percent(), Some(88));
    }

    #[test]
    fn test_skin_image_mime() {
        assert_eq!(SkinImage::new("rash.PNG", vec![]).mime_type(), "image/png");
        assert_eq!(SkinImage::new("photo", vec![]).mime_type(), "image/jpeg");
    }
}
