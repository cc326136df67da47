use chrono::{NaiveDate, NaiveTime};

use super::{Effect, Form};
use crate::api::{Availability, AvailabilityInput, MediHelpApi};
use crate::fetch::{PagedResource, Resource};
use crate::router::Route;

/// Paginated availability slots, optionally for one doctor
#[derive(Debug, Clone)]
pub struct AvailabilityPage {
    doctor: Option<i64>,
    listing: PagedResource<Availability>,
    cursor: usize,
}

impl AvailabilityPage {
    pub fn new(doctor: Option<i64>, page_size: u32) -> Self {
        Self {
            doctor,
            listing: PagedResource::new(page_size),
            cursor: 0,
        }
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        self.go_to(api, 1).await
    }

    pub async fn go_to(&mut self, api: &dyn MediHelpApi, page: u32) -> Effect {
        let doctor = self.doctor;
        self.cursor = 0;
        let result = self
            .listing
            .load_page(page, |page, size| api.availability(page, doctor, size))
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

    pub fn doctor(&self) -> Option<i64> {
        self.doctor
    }

    pub fn slots(&self) -> &[Availability] {
        self.listing.items()
    }

    pub fn listing(&self) -> &PagedResource<Availability> {
        &self.listing
    }

    pub fn is_loading(&self) -> bool {
        self.listing.resource.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.listing
            .resource
            .error_message("Failed to load availability data")
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, down: bool) {
        if down {
            if self.cursor + 1 < self.slots().len() {
                self.cursor += 1;
            }
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn open_selected(&self) -> Option<Route> {
        self.slots()
            .get(self.cursor)
            .map(|slot| Route::AvailabilityDetail(slot.id))
    }
}

/// One availability slot with edit and delete actions
#[derive(Debug, Clone)]
pub struct AvailabilityDetailPage {
    id: i64,
    slot: Resource<Availability>,
    confirming_delete: bool,
    error: Option<String>,
}

impl AvailabilityDetailPage {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            slot: Resource::new(),
            confirming_delete: false,
            error: None,
        }
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let id = self.id;
        let result = self.slot.load(|| api.availability_slot(id)).await;
        Effect::from_result(result)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn slot(&self) -> Option<&Availability> {
        self.slot.data()
    }

    pub fn is_loading(&self) -> bool {
        self.slot.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.error.clone().or_else(|| {
            self.slot.error_message("Failed to load availability")
        })
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    pub fn request_delete(&mut self) {
        if self.slot.data().is_some() {
            self.confirming_delete = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    pub async fn confirm_delete(&mut self, api: &dyn MediHelpApi) -> Effect {
        if !self.confirming_delete {
            return Effect::Stay;
        }
        self.confirming_delete = false;
        match api.delete_availability(self.id).await {
            Ok(()) => {
                tracing::info!(slot = self.id, "availability deleted");
                let doctor = self.slot.data().map(|slot| slot.doctor);
                Effect::Navigate(Route::Availability { doctor })
            }
            Err(err) => {
                self.error = Some(err.user_message("Failed to delete availability"));
                Effect::from_error(&err)
            }
        }
    }

    pub fn edit_route(&self) -> Route {
        Route::AvailabilityEdit(self.id)
    }
}

/// Create or edit form for an availability slot
#[derive(Debug, Clone, Default)]
pub struct AvailabilityForm {
    id: Option<i64>,
    pub doctor: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    error: Option<String>,
    saving: bool,
}

fn parse_clock(label: &str, raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|t| t.format("%H:%M:%S").to_string())
        .map_err(|_| format!("{} must be HH:MM", label))
}

impl AvailabilityForm {
    pub fn create(doctor: Option<i64>) -> Self {
        Self {
            doctor: doctor.map(|d| d.to_string()).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn edit(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let Some(id) = self.id else {
            return Effect::Stay;
        };
        match api.availability_slot(id).await {
            Ok(slot) => {
                self.doctor = slot.doctor.to_string();
                self.day = slot.day.format("%Y-%m-%d").to_string();
                self.start_time = slot.start_time.chars().take(5).collect();
                self.end_time = slot.end_time.chars().take(5).collect();
                Effect::Stay
            }
            Err(err) => {
                self.error = Some(err.user_message("Failed to load availability"));
                Effect::from_error(&err)
            }
        }
    }

    pub fn to_input(&self) -> Result<AvailabilityInput, String> {
        let doctor: i64 = self
            .doctor
            .trim()
            .parse()
            .map_err(|_| "Doctor must be a numeric id".to_string())?;
        let day = NaiveDate::parse_from_str(self.day.trim(), "%Y-%m-%d")
            .map_err(|_| "Day must be in YYYY-MM-DD format".to_string())?;
        let start_time = parse_clock("Start time", &self.start_time)?;
        let end_time = parse_clock("End time", &self.end_time)?;
        if end_time <= start_time {
            return Err("End time must be after start time".to_string());
        }
        Ok(AvailabilityInput {
            doctor: Some(doctor),
            day: Some(day),
            start_time: Some(start_time),
            end_time: Some(end_time),
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
                api.update_availability(id, &input).await,
                "Failed to update availability",
            ),
            None => (
                api.create_availability(&input).await,
                "Failed to create availability",
            ),
        };
        self.saving = false;

        match result {
            Ok(slot) => Effect::Navigate(Route::AvailabilityDetail(slot.id)),
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

impl Form for AvailabilityForm {
    fn labels(&self) -> &'static [&'static str] {
        &["Doctor id", "Day (YYYY-MM-DD)", "Start time (HH:MM)", "End time (HH:MM)"]
    }

    fn field(&self, index: usize) -> Option<&str> {
        let value = match index {
            0 => &self.doctor,
            1 => &self.day,
            2 => &self.start_time,
            3 => &self.end_time,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        let value = match index {
            0 => &mut self.doctor,
            1 => &mut self.day,
            2 => &mut self.start_time,
            3 => &mut self.end_time,
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockMediHelpApi, Page};
    use pretty_assertions::assert_eq;

    fn slot(id: i64, doctor: i64) -> Availability {
        Availability {
            id,
            doctor,
            day: NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
            start_time: "09:00:00".to_string(),
            end_time: "13:30:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_filters_by_doctor() {
        let mut api = MockMediHelpApi::new();
        api.expect_availability()
            .withf(|page, doctor, size| *page == 1 && *doctor == Some(2) && *size == 10)
            .times(1)
            .returning(|_, _, _| Ok(Page::from_items(vec![slot(1, 2)])));
        let mut page = AvailabilityPage::new(Some(2), 10);

        page.mount(&api).await;
        assert_eq!(page.slots().len(), 1);
        assert_eq!(page.slots()[0].time_range(), "9:00 AM - 1:30 PM");
        assert_eq!(page.open_selected(), Some(Route::AvailabilityDetail(1)));
    }

    #[tokio::test]
    async fn test_listing_error_message() {
        let mut api = MockMediHelpApi::new();
        api.expect_availability()
            .returning(|_, _, _| Err(ApiError::Network("down".to_string())));
        let mut page = AvailabilityPage::new(None, 10);

        page.mount(&api).await;
        assert_eq!(page.error().as_deref(), Some("Failed to load availability data"));
    }

    #[tokio::test]
    async fn test_listing_error_shows_server_detail() {
        let mut api = MockMediHelpApi::new();
        api.expect_availability().returning(|_, _, _| {
            Err(ApiError::from_status(
                reqwest::StatusCode::BAD_REQUEST,
                r#"{"detail": "Unknown doctor."}"#,
            ))
        });
        let mut page = AvailabilityPage::new(Some(99), 10);

        page.mount(&api).await;
        assert_eq!(page.error().as_deref(), Some("Unknown doctor."));
    }

    #[tokio::test]
    async fn test_delete_returns_to_doctor_listing() {
        let mut api = MockMediHelpApi::new();
        api.expect_availability_slot().returning(|id| Ok(slot(id, 3)));
        api.expect_delete_availability().times(1).returning(|_| Ok(()));
        let mut page = AvailabilityDetailPage::new(9);
        page.mount(&api).await;

        assert_eq!(page.confirm_delete(&api).await, Effect::Stay);
        page.request_delete();
        assert_eq!(
            page.confirm_delete(&api).await,
            Effect::Navigate(Route::Availability { doctor: Some(3) })
        );
    }

    #[test]
    fn test_form_validation() {
        let mut form = AvailabilityForm::create(Some(2));
        form.day = "06/05/2025".to_string();
        assert_eq!(form.to_input().unwrap_err(), "Day must be in YYYY-MM-DD format");

        form.day = "2025-05-06".to_string();
        form.start_time = "14:00".to_string();
        form.end_time = "9:00".to_string();
        assert_eq!(form.to_input().unwrap_err(), "End time must be after start time");

        form.end_time = "17:30".to_string();
        let input = form.to_input().unwrap();
        assert_eq!(input.doctor, Some(2));
        assert_eq!(input.start_time.as_deref(), Some("14:00:00"));
    }

    #[tokio::test]
    async fn test_edit_prefills_then_updates() {
        let mut api = MockMediHelpApi::new();
        api.expect_availability_slot().returning(|id| Ok(slot(id, 3)));
        api.expect_update_availability()
            .withf(|id, input| *id == 5 && input.end_time.as_deref() == Some("15:00:00"))
            .times(1)
            .returning(|id, _| Ok(slot(id, 3)));
        let mut form = AvailabilityForm::edit(5);
        form.mount(&api).await;
        assert_eq!(form.start_time, "09:00");
        assert_eq!(form.day, "2025-05-06");

        form.end_time = "15:00".to_string();
        assert_eq!(
            form.submit(&api).await,
            Effect::Navigate(Route::AvailabilityDetail(5))
        );
    }
}
