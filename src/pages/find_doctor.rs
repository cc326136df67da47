use super::{Effect, Form};
use crate::api::{DoctorProfile, MediHelpApi};
use crate::fetch::Resource;
use crate::router::Route;

// Large enough to hold the whole directory in one request
const DIRECTORY_PAGE_SIZE: u32 = 100;

/// Doctor finder with name search and a specialization filter
#[derive(Debug, Clone, Default)]
pub struct FindDoctorPage {
    doctors: Resource<Vec<DoctorProfile>>,
    pub query: String,
    specialization: Option<String>,
    cursor: usize,
}

impl FindDoctorPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let result = self
            .doctors
            .load(|| async {
                api.doctor_profiles(1, DIRECTORY_PAGE_SIZE)
                    .await
                    .map(|page| page.results)
            })
            .await;
        Effect::from_result(result)
    }

    /// Distinct specializations in the directory, sorted
    pub fn specializations(&self) -> Vec<&str> {
        let mut specs: Vec<&str> = self
            .doctors
            .data()
            .map(|all| all.iter().map(|d| d.specialization.as_str()).collect())
            .unwrap_or_default();
        specs.sort_unstable();
        specs.dedup();
        specs
    }

    pub fn specialization(&self) -> Option<&str> {
        self.specialization.as_deref()
    }

    pub fn set_specialization(&mut self, specialization: Option<String>) {
        self.specialization = specialization;
        self.cursor = 0;
    }

    /// Step through "all" and each specialization in turn
    pub fn cycle_specialization(&mut self) {
        let specs: Vec<String> = self.specializations().into_iter().map(String::from).collect();
        let next = match &self.specialization {
            None => specs.first().cloned(),
            Some(current) => specs
                .iter()
                .position(|s| s == current)
                .and_then(|i| specs.get(i + 1).cloned()),
        };
        self.set_specialization(next);
    }

    /// Doctors whose full name contains the query and who match the filter
    pub fn filtered(&self) -> Vec<&DoctorProfile> {
        let query = self.query.to_lowercase();
        self.doctors
            .data()
            .map(|all| {
                all.iter()
                    .filter(|d| {
                        let name = format!("{} {}", d.user.first_name, d.user.last_name);
                        name.to_lowercase().contains(&query)
                    })
                    .filter(|d| match &self.specialization {
                        Some(wanted) => d.specialization == *wanted,
                        None => true,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_filters(&self) -> bool {
        !self.query.is_empty() || self.specialization.is_some()
    }

    pub fn clear_filters(&mut self) {
        self.query.clear();
        self.specialization = None;
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, down: bool) {
        if down {
            if self.cursor + 1 < self.filtered().len() {
                self.cursor += 1;
            }
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn view_selected(&self) -> Option<Route> {
        self.filtered()
            .get(self.cursor)
            .map(|d| Route::FindDoctorDetail(d.id))
    }

    /// Booking is handled on the appointments page
    pub fn book_selected(&self) -> Option<Route> {
        self.filtered().get(self.cursor).map(|_| Route::Appointments)
    }

    pub fn is_loading(&self) -> bool {
        self.doctors.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.doctors.error_message("Failed to load doctor profiles")
    }
}

impl Form for FindDoctorPage {
    fn labels(&self) -> &'static [&'static str] {
        &["Search by name"]
    }

    fn field(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.query),
            _ => None,
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.query),
            _ => None,
        }
    }
}
