// Gateway module for page view-models - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod auth;
mod availability;
mod content;
mod dashboard;
mod doctors;
mod find_doctor;
mod first_aid;
mod form;
mod info;
mod language;
mod skin;
mod symptoms;

// Public re-exports - the ONLY way to access page functionality
pub use auth::{LoginPage, SignupPage};
pub use availability::{AvailabilityDetailPage, AvailabilityForm, AvailabilityPage};
pub use content::{
    truncate_preview, youtube_id, ArticlesPage, EducationPage, EducationTab, VideosPage,
};
pub use dashboard::{load_check_summaries, CheckSummary, DashboardPage, DashboardTab};
pub use doctors::{DoctorDetailPage, DoctorForm, DoctorsPage};
pub use find_doctor::FindDoctorPage;
pub use first_aid::{fetch_guides, FirstAidPage};
pub use form::{Form, FormFocus};
pub use info::{static_content, Section};
pub use language::LanguageSelector;
pub use skin::SkinDiagnosisPage;
pub use symptoms::SymptomCheckerPage;

use crate::api::{ApiError, MediHelpApi};
use crate::router::Route;

/// What the shell has to do after a page action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Stay,
    Navigate(Route),
    /// A call came back 401; the shell clears the token and redirects
    SessionExpired,
}

impl Effect {
    pub(crate) fn from_error(err: &ApiError) -> Self {
        if err.is_unauthorized() {
            Self::SessionExpired
        } else {
            Self::Stay
        }
    }

    pub(crate) fn from_result(result: Result<(), ApiError>) -> Self {
        match result {
            Ok(()) => Self::Stay,
            Err(err) => Self::from_error(&err),
        }
    }
}

/// View-model behind the route currently on screen
#[derive(Debug)]
pub enum PageState {
    /// Text-only routes and unknown paths
    Static(Route),
    Login(LoginPage),
    Signup(SignupPage),
    Articles(ArticlesPage),
    Videos(VideosPage),
    Education(EducationPage),
    FirstAid(FirstAidPage),
    SymptomChecker(SymptomCheckerPage),
    SkinDiagnosis(SkinDiagnosisPage),
    Dashboard(DashboardPage),
    FindDoctor(FindDoctorPage),
    Doctors(DoctorsPage),
    DoctorDetail(DoctorDetailPage),
    DoctorForm(DoctorForm),
    Availability(AvailabilityPage),
    AvailabilityDetail(AvailabilityDetailPage),
    AvailabilityForm(AvailabilityForm),
}

impl PageState {
    /// Fresh, unmounted page for `route`
    pub fn for_route(route: &Route, page_size: u32) -> Self {
        match route {
            Route::Login => Self::Login(LoginPage::new()),
            Route::Signup => Self::Signup(SignupPage::new()),
            Route::Articles => Self::Articles(ArticlesPage::new()),
            Route::Videos => Self::Videos(VideosPage::new()),
            Route::Education => Self::Education(EducationPage::new()),
            Route::FirstAid => Self::FirstAid(FirstAidPage::new()),
            Route::SymptomChecker => Self::SymptomChecker(SymptomCheckerPage::new()),
            Route::SkinDiagnosis => Self::SkinDiagnosis(SkinDiagnosisPage::new()),
            Route::Dashboard => Self::Dashboard(DashboardPage::new()),
            Route::FindDoctor => Self::FindDoctor(FindDoctorPage::new()),
            Route::FindDoctorDetail(id) => Self::DoctorDetail(DoctorDetailPage::read_only(*id)),
            Route::Doctors => Self::Doctors(DoctorsPage::new(page_size)),
            Route::DoctorNew => Self::DoctorForm(DoctorForm::create()),
            Route::DoctorDetail(id) => Self::DoctorDetail(DoctorDetailPage::managed(*id)),
            Route::DoctorEdit(id) => Self::DoctorForm(DoctorForm::edit(*id)),
            Route::Availability { doctor } => {
                Self::Availability(AvailabilityPage::new(*doctor, page_size))
            }
            Route::AvailabilityNew => Self::AvailabilityForm(AvailabilityForm::create(None)),
            Route::AvailabilityDetail(id) => {
                Self::AvailabilityDetail(AvailabilityDetailPage::new(*id))
            }
            Route::AvailabilityEdit(id) => Self::AvailabilityForm(AvailabilityForm::edit(*id)),
            Route::Home
            | Route::About
            | Route::Privacy
            | Route::Appointments
            | Route::FindClinic
            | Route::NotFound(_) => Self::Static(route.clone()),
        }
    }

    /// Run the page's initial data fetch
    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        match self {
            Self::Static(_) | Self::Login(_) | Self::Signup(_) | Self::SkinDiagnosis(_) => {
                Effect::Stay
            }
            Self::Articles(page) => page.mount(api).await,
            Self::Videos(page) => page.mount(api).await,
            Self::Education(page) => page.mount(api).await,
            Self::FirstAid(page) => page.mount(api).await,
            Self::SymptomChecker(page) => page.mount(api).await,
            Self::Dashboard(page) => page.mount(api).await,
            Self::FindDoctor(page) => page.mount(api).await,
            Self::Doctors(page) => page.mount(api).await,
            Self::DoctorDetail(page) => page.mount(api).await,
            Self::DoctorForm(page) => page.mount(api).await,
            Self::Availability(page) => page.mount(api).await,
            Self::AvailabilityDetail(page) => page.mount(api).await,
            Self::AvailabilityForm(page) => page.mount(api).await,
        }
    }

    /// Editable fields of the page, if it has any
    pub fn form(&self) -> Option<&dyn Form> {
        match self {
            Self::Login(page) => Some(page),
            Self::Signup(page) => Some(page),
            Self::Education(page) => Some(page),
            Self::FirstAid(page) => Some(page),
            Self::SymptomChecker(page) => Some(page),
            Self::SkinDiagnosis(page) => Some(page),
            Self::FindDoctor(page) => Some(page),
            Self::DoctorForm(page) => Some(page),
            Self::AvailabilityForm(page) => Some(page),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut dyn Form> {
        match self {
            Self::Login(page) => Some(page),
            Self::Signup(page) => Some(page),
            Self::Education(page) => Some(page),
            Self::FirstAid(page) => Some(page),
            Self::SymptomChecker(page) => Some(page),
            Self::SkinDiagnosis(page) => Some(page),
            Self::FindDoctor(page) => Some(page),
            Self::DoctorForm(page) => Some(page),
            Self::AvailabilityForm(page) => Some(page),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMediHelpApi;

    #[tokio::test]
    async fn test_static_pages_fetch_nothing() {
        let api = MockMediHelpApi::new();
        for route in [Route::Home, Route::About, Route::Login, Route::NotFound("/x".to_string())] {
            let mut page = PageState::for_route(&route, 10);
            assert_eq!(page.mount(&api).await, Effect::Stay);
        }
    }

    #[test]
    fn test_forms_exposed_for_input_pages() {
        assert!(PageState::for_route(&Route::Login, 10).form().is_some());
        assert!(PageState::for_route(&Route::DoctorEdit(1), 10).form().is_some());
        assert!(PageState::for_route(&Route::Doctors, 10).form().is_none());
    }
}
