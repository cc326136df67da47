use super::{Effect, Form};
use crate::api::{DoctorProfile, DoctorProfileInput, MediHelpApi};
use crate::fetch::{PagedResource, Resource};
use crate::router::Route;

/// Paginated doctor directory
#[derive(Debug, Clone)]
pub struct DoctorsPage {
    listing: PagedResource<DoctorProfile>,
    cursor: usize,
}

impl DoctorsPage {
    pub fn new(page_size: u32) -> Self {
        Self {
            listing: PagedResource::new(page_size),
            cursor: 0,
        }
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        self.go_to(api, 1).await
    }

    pub async fn go_to(&mut self, api: &dyn MediHelpApi, page: u32) -> Effect {
        self.cursor = 0;
        let result = self
            .listing
            .load_page(page, |page, size| api.doctor_profiles(page, size))
            .await;
        Effect::from_result(result)
    }

    pub async fn next_page(&mut self, api: &dyn MediHelpApi) -> Effect {
        match self.listing.pagination.next() {
            Some(page) => self.go_to(api, page).await,
            None => Effect::Stay,
        }
    }

    pub async fn previous_page(&mut self, api: &dyn MediHelpApi) -> Effect {
        match self.listing.pagination.previous() {
            Some(page) => self.go_to(api, page).await,
            None => Effect::Stay,
        }
    }

    pub fn doctors(&self) -> &[DoctorProfile] {
        self.listing.items()
    }

    pub fn listing(&self) -> &PagedResource<DoctorProfile> {
        &self.listing
    }

    pub fn is_loading(&self) -> bool {
        self.listing.resource.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.listing
            .resource
            .error_message("Failed to load doctor profiles")
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, down: bool) {
        if down {
            if self.cursor + 1 < self.doctors().len() {
                self.cursor += 1;
            }
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    /// Detail route for the doctor under the cursor
    pub fn open_selected(&self) -> Option<Route> {
        self.doctors()
            .get(self.cursor)
            .map(|d| Route::DoctorDetail(d.id))
    }
}

/// Single doctor profile, optionally with management actions
#[derive(Debug, Clone)]
pub struct DoctorDetailPage {
    id: i64,
    manageable: bool,
    doctor: Resource<DoctorProfile>,
    confirming_delete: bool,
    deleting: bool,
    error: Option<String>,
}

impl DoctorDetailPage {
    /// Detail page with edit and delete actions
    pub fn managed(id: i64) -> Self {
        Self::build(id, true)
    }

    /// Read-only detail page used by the doctor finder
    pub fn read_only(id: i64) -> Self {
        Self::build(id, false)
    }

    fn build(id: i64, manageable: bool) -> Self {
        Self {
            id,
            manageable,
            doctor: Resource::new(),
            confirming_delete: false,
            deleting: false,
            error: None,
        }
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let id = self.id;
        let result = self.doctor.load(|| api.doctor_profile(id)).await;
        Effect::from_result(result)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn doctor(&self) -> Option<&DoctorProfile> {
        self.doctor.data()
    }

    pub fn is_manageable(&self) -> bool {
        self.manageable
    }

    pub fn is_loading(&self) -> bool {
        self.doctor.is_loading() || self.deleting
    }

    pub fn error(&self) -> Option<String> {
        self.error.clone().or_else(|| {
            self.doctor.error_message("Failed to load doctor profile")
        })
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    /// Open the confirmation dialog; nothing is deleted yet
    pub fn request_delete(&mut self) {
        if self.manageable && self.doctor.data().is_some() {
            self.confirming_delete = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    /// Delete after the dialog was confirmed, then return to the directory
    pub async fn confirm_delete(&mut self, api: &dyn MediHelpApi) -> Effect {
        if !self.confirming_delete || self.deleting {
            return Effect::Stay;
        }
        self.deleting = true;
        let result = api.delete_doctor_profile(self.id).await;
        self.deleting = false;
        self.confirming_delete = false;

        match result {
            Ok(()) => {
                tracing::info!(doctor = self.id, "doctor profile deleted");
                Effect::Navigate(Route::Doctors)
            }
            Err(err) => {
                self.error = Some(err.user_message("Failed to delete doctor profile"));
                Effect::from_error(&err)
            }
        }
    }

    pub fn edit_route(&self) -> Option<Route> {
        self.manageable.then_some(Route::DoctorEdit(self.id))
    }

    pub fn availability_route(&self) -> Route {
        Route::Availability {
            doctor: Some(self.id),
        }
    }
}

/// Create or edit form for a doctor profile
#[derive(Debug, Clone, Default)]
pub struct DoctorForm {
    id: Option<i64>,
    pub specialization: String,
    pub license_number: String,
    pub consultation_fee: String,
    pub bio: String,
    pub available: String,
    error: Option<String>,
    saving: bool,
}

impl DoctorForm {
    pub fn create() -> Self {
        Self {
            available: "yes".to_string(),
            ..Self::default()
        }
    }

    pub fn edit(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::create()
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Prefill from the stored profile when editing
    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let Some(id) = self.id else {
            return Effect::Stay;
        };
        match api.doctor_profile(id).await {
            Ok(profile) => {
                self.specialization = profile.specialization;
                self.license_number = profile.license_number;
                self.consultation_fee = format!("{:.2}", profile.consultation_fee);
                self.bio = profile.bio;
                self.available = if profile.available { "yes" } else { "no" }.to_string();
                Effect::Stay
            }
            Err(err) => {
                self.error = Some(err.user_message("Failed to load doctor profile"));
                Effect::from_error(&err)
            }
        }
    }

    /// Parse the text fields into a request body
    pub fn to_input(&self) -> Result<DoctorProfileInput, String> {
        let specialization = self.specialization.trim();
        if specialization.is_empty() {
            return Err("Specialization is required".to_string());
        }
        let fee = self.consultation_fee.trim();
        let consultation_fee = if fee.is_empty() {
            None
        } else {
            let fee: f64 = fee
                .trim_start_matches('$')
                .parse()
                .map_err(|_| "Consultation fee must be a number".to_string())?;
            if fee < 0.0 {
                return Err("Consultation fee cannot be negative".to_string());
            }
            Some(fee)
        };
        let available = match self.available.trim().to_lowercase().as_str() {
            "" => None,
            "yes" | "y" | "true" => Some(true),
            "no" | "n" | "false" => Some(false),
            _ => return Err("Available must be yes or no".to_string()),
        };
        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };

        Ok(DoctorProfileInput {
            specialization: Some(specialization.to_string()),
            license_number: optional(&self.license_number),
            consultation_fee,
            bio: optional(&self.bio),
            available,
        })
    }

    pub async fn submit(&mut self, api: &dyn MediHelpApi) -> Effect {
        if self.saving {
            return Effect::Stay;
        }
        let input = match self.to_input() {
            Ok(input) => input,
            Err(message) => {
                self.error = Some(message);
                return Effect::Stay;
            }
        };
        self.saving = true;
        self.error = None;
        let (result, fallback) = match self.id {
            Some(id) => (
                api.update_doctor_profile(id, &input).await,
                "Failed to update doctor profile",
            ),
            None => (
                api.create_doctor_profile(&input).await,
                "Failed to create doctor profile",
            ),
        };
        self.saving = false;

        match result {
            Ok(profile) => Effect::Navigate(Route::DoctorDetail(profile.id)),
            Err(err) => {
                self.error = Some(err.user_message(fallback));
                Effect::from_error(&err)
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }
}

impl Form for DoctorForm {
    fn labels(&self) -> &'static [&'static str] {
        &[
            "Specialization",
            "License number",
            "Consultation fee",
            "Bio",
            "Available (yes/no)",
        ]
    }

    fn field(&self, index: usize) -> Option<&str> {
        let value = match index {
            0 => &self.specialization,
            1 => &self.license_number,
            2 => &self.consultation_fee,
            3 => &self.bio,
            4 => &self.available,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        let value = match index {
            0 => &mut self.specialization,
            1 => &mut self.license_number,
            2 => &mut self.consultation_fee,
            3 => &mut self.bio,
            4 => &mut self.available,
            _ => return None,
        };
        Some(value)
    }
}
