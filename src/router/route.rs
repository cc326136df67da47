use std::fmt;

/// Every screen the client can show, parsed from a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    FindDoctor,
    FindDoctorDetail(i64),
    SymptomChecker,
    SkinDiagnosis,
    FirstAid,
    Education,
    Dashboard,
    Doctors,
    DoctorNew,
    DoctorDetail(i64),
    DoctorEdit(i64),
    Availability { doctor: Option<i64> },
    AvailabilityNew,
    AvailabilityDetail(i64),
    AvailabilityEdit(i64),
    Articles,
    Videos,
    About,
    Privacy,
    Appointments,
    FindClinic,
    NotFound(String),
}

impl Route {
    /// Parse a path such as `/doctors/4/edit` or `/availability?doctor=2`
    pub fn parse(path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["find-doctor"] => Self::FindDoctor,
            ["find-doctor", id] => id_route(id, Self::FindDoctorDetail, path),
            ["symptom-checker"] => Self::SymptomChecker,
            ["skin-diagnosis"] => Self::SkinDiagnosis,
            ["first-aid"] => Self::FirstAid,
            ["education"] => Self::Education,
            ["dashboard"] => Self::Dashboard,
            ["doctors"] => Self::Doctors,
            ["doctors", "new"] => Self::DoctorNew,
            ["doctors", id] => id_route(id, Self::DoctorDetail, path),
            ["doctors", id, "edit"] => id_route(id, Self::DoctorEdit, path),
            ["availability"] => Self::Availability {
                doctor: query.and_then(doctor_param),
            },
            ["availability", "new"] => Self::AvailabilityNew,
            ["availability", id] => id_route(id, Self::AvailabilityDetail, path),
            ["availability", id, "edit"] => id_route(id, Self::AvailabilityEdit, path),
            ["articles"] => Self::Articles,
            ["videos"] => Self::Videos,
            ["about"] => Self::About,
            ["privacy"] => Self::Privacy,
            ["appointments"] => Self::Appointments,
            ["find-clinic"] => Self::FindClinic,
            _ => Self::NotFound(path.to_string()),
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::FindDoctor => "/find-doctor".to_string(),
            Self::FindDoctorDetail(id) => format!("/find-doctor/{}", id),
            Self::SymptomChecker => "/symptom-checker".to_string(),
            Self::SkinDiagnosis => "/skin-diagnosis".to_string(),
            Self::FirstAid => "/first-aid".to_string(),
            Self::Education => "/education".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Doctors => "/doctors".to_string(),
            Self::DoctorNew => "/doctors/new".to_string(),
            Self::DoctorDetail(id) => format!("/doctors/{}", id),
            Self::DoctorEdit(id) => format!("/doctors/{}/edit", id),
            Self::Availability { doctor: None } => "/availability".to_string(),
            Self::Availability { doctor: Some(d) } => format!("/availability?doctor={}", d),
            Self::AvailabilityNew => "/availability/new".to_string(),
            Self::AvailabilityDetail(id) => format!("/availability/{}", id),
            Self::AvailabilityEdit(id) => format!("/availability/{}/edit", id),
            Self::Articles => "/articles".to_string(),
            Self::Videos => "/videos".to_string(),
            Self::About => "/about".to_string(),
            Self::Privacy => "/privacy".to_string(),
            Self::Appointments => "/appointments".to_string(),
            Self::FindClinic => "/find-clinic".to_string(),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Whether the route guard must see a session token before rendering
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::FindDoctor
                | Self::FindDoctorDetail(_)
                | Self::SymptomChecker
                | Self::SkinDiagnosis
                | Self::FirstAid
                | Self::Dashboard
                | Self::Doctors
                | Self::DoctorNew
                | Self::DoctorDetail(_)
                | Self::DoctorEdit(_)
                | Self::Availability { .. }
                | Self::AvailabilityNew
                | Self::AvailabilityDetail(_)
                | Self::AvailabilityEdit(_)
                | Self::Appointments
        )
    }

    /// Heading shown for the route
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Login => "Log In",
            Self::Signup => "Sign Up",
            Self::FindDoctor | Self::FindDoctorDetail(_) => "Find a Doctor",
            Self::SymptomChecker => "Symptom Checker",
            Self::SkinDiagnosis => "Skin Diagnosis",
            Self::FirstAid => "First Aid",
            Self::Education => "Health Education",
            Self::Dashboard => "Dashboard",
            Self::Doctors => "Doctors",
            Self::DoctorNew => "New Doctor",
            Self::DoctorDetail(_) => "Doctor Profile",
            Self::DoctorEdit(_) => "Edit Doctor",
            Self::Availability { .. } => "Doctor Availability",
            Self::AvailabilityNew => "New Availability",
            Self::AvailabilityDetail(_) => "Availability",
            Self::AvailabilityEdit(_) => "Edit Availability",
            Self::Articles => "Articles",
            Self::Videos => "Videos",
            Self::About => "About Us",
            Self::Privacy => "Privacy Policy",
            Self::Appointments => "Appointments",
            Self::FindClinic => "Find a Clinic",
            Self::NotFound(_) => "Not Found",
        }
    }

    /// Entries of the navigation menu, in display order
    pub fn menu() -> Vec<Route> {
        vec![
            Self::Home,
            Self::SymptomChecker,
            Self::FirstAid,
            Self::SkinDiagnosis,
            Self::FindDoctor,
            Self::Education,
            Self::Articles,
            Self::Videos,
            Self::Dashboard,
            Self::Doctors,
            Self::Availability { doctor: None },
            Self::Appointments,
            Self::FindClinic,
            Self::About,
            Self::Privacy,
        ]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn id_route(raw: &str, build: fn(i64) -> Route, path: &str) -> Route {
    match raw.parse() {
        Ok(id) => build(id),
        Err(_) => Route::NotFound(path.to_string()),
    }
}

fn doctor_param(query: &str) -> Option<i64> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "doctor")
        .and_then(|(_, value)| value.parse().ok())
}
