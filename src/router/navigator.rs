use super::route::Route;
use crate::session::Session;
use crate::utils::MediHelpError;

/// What the guard decided for a requested route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect { requested: Route, to: Route },
}

impl Resolution {
    /// Route that actually ends up on screen
    pub fn route(&self) -> &Route {
        match self {
            Self::Render(route) => route,
            Self::Redirect { to, .. } => to,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

/// Route guard: protected routes without a token go to the login page
///
/// Presence of a token is all that is checked. An expired token is only
/// discovered when the server answers 401.
pub fn guard(route: Route, session: &Session) -> Resolution {
    if route.requires_auth() && !session.is_authenticated() {
        tracing::debug!(path = %route, "route guard redirecting to login");
        Resolution::Redirect {
            requested: route,
            to: Route::Login,
        }
    } else {
        Resolution::Render(route)
    }
}

/// Owns the current route and the back stack
#[derive(Debug)]
pub struct Navigator {
    session: Session,
    current: Route,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            current: Route::Home,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Parse `path` and navigate to it
    pub fn navigate(&mut self, path: &str) -> Resolution {
        self.go(Route::parse(path))
    }

    /// Navigate to `route` through the guard
    pub fn go(&mut self, route: Route) -> Resolution {
        let resolution = guard(route, &self.session);
        let target = resolution.route().clone();
        if target != self.current {
            let previous = std::mem::replace(&mut self.current, target);
            self.history.push(previous);
        }
        resolution
    }

    /// Pop the back stack, re-checking the guard for the restored route
    pub fn back(&mut self) -> Option<Resolution> {
        let previous = self.history.pop()?;
        let resolution = guard(previous, &self.session);
        self.current = resolution.route().clone();
        Some(resolution)
    }

    /// React to a 401 from any API call
    ///
    /// Clears the token and redirects to the login page. When several calls
    /// fail at once only the one that actually removed the token redirects,
    /// so the method returns `true` at most once per session. If the token
    /// cannot be removed the error is returned and nothing navigates.
    pub fn handle_unauthorized(&mut self) -> Result<bool, MediHelpError> {
        if self.session.clear_token()?.is_none() {
            return Ok(false);
        }
        tracing::info!(from = %self.current, "session expired, redirecting to login");
        self.go(Route::Login);
        Ok(true)
    }

    /// Drop the token and go home
    pub fn logout(&mut self) -> Result<Resolution, MediHelpError> {
        self.session.clear_token()?;
        Ok(self.go(Route::Home))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Storage;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn protected_routes() -> Vec<Route> {
        vec![
            Route::FindDoctor,
            Route::FindDoctorDetail(1),
            Route::SymptomChecker,
            Route::SkinDiagnosis,
            Route::FirstAid,
            Route::Dashboard,
            Route::Doctors,
            Route::DoctorNew,
            Route::DoctorDetail(1),
            Route::DoctorEdit(1),
            Route::Availability { doctor: None },
            Route::AvailabilityNew,
            Route::AvailabilityDetail(1),
            Route::AvailabilityEdit(1),
            Route::Appointments,
        ]
    }

    #[test]
    fn test_guard_redirects_every_protected_route() {
        let session = Session::in_memory();
        for route in protected_routes() {
            let resolution = guard(route.clone(), &session);
            assert_eq!(
                resolution,
                Resolution::Redirect {
                    requested: route,
                    to: Route::Login
                }
            );
        }
    }

    #[test]
    fn test_guard_renders_with_token() {
        let session = Session::in_memory();
        session.set_token("abc").unwrap();
        for route in protected_routes() {
            assert_eq!(guard(route.clone(), &session), Resolution::Render(route));
        }
    }

    #[test]
    fn test_public_routes_never_redirect() {
        let session = Session::in_memory();
        for route in [Route::Home, Route::Login, Route::Signup, Route::Education, Route::About] {
            assert!(!guard(route, &session).is_redirect());
        }
    }

    #[test]
    fn test_navigate_dashboard_without_token() {
        let mut nav = Navigator::new(Session::in_memory());
        let resolution = nav.navigate("/dashboard");
        assert!(resolution.is_redirect());
        assert_eq!(nav.current(), &Route::Login);
        assert_eq!(nav.history(), &[Route::Home]);
    }

    #[test]
    fn test_back_rechecks_guard() {
        let session = Session::in_memory();
        session.set_token("abc").unwrap();
        let mut nav = Navigator::new(session.clone());
        nav.navigate("/dashboard");
        nav.navigate("/about");
        session.clear_token().unwrap();

        let resolution = nav.back().unwrap();
        assert!(resolution.is_redirect());
        assert_eq!(nav.current(), &Route::Login);
    }

    #[test]
    fn test_handle_unauthorized_redirects_once() {
        let session = Session::in_memory();
        session.set_token("stale").unwrap();
        let mut nav = Navigator::new(session.clone());
        nav.navigate("/dashboard");

        assert!(nav.handle_unauthorized().unwrap());
        assert!(!nav.handle_unauthorized().unwrap());
        assert_eq!(nav.current(), &Route::Login);
        assert!(!session.is_authenticated());
        assert_eq!(
            nav.history().iter().filter(|r| **r == Route::Dashboard).count(),
            1
        );
    }

    /// Storage that holds a token but can never be written
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get(&self, key: &str) -> Option<String> {
            (key == "token").then(|| "stale".to_string())
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), MediHelpError> {
            Err(MediHelpError::StorageError("read-only".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<Option<String>, MediHelpError> {
            Err(MediHelpError::StorageError("read-only".to_string()))
        }
    }

    #[test]
    fn test_unauthorized_surfaces_storage_failure() {
        let session = Session::new(Arc::new(ReadOnlyStorage), 3);
        let mut nav = Navigator::new(session);
        nav.navigate("/dashboard");

        assert!(nav.handle_unauthorized().is_err());
        assert_eq!(nav.current(), &Route::Dashboard);
        assert!(nav.logout().is_err());
    }

    #[test]
    fn test_logout_clears_token() {
        let session = Session::in_memory();
        session.set_token("abc").unwrap();
        let mut nav = Navigator::new(session.clone());
        nav.navigate("/dashboard");
        nav.logout().unwrap();
        assert_eq!(nav.current(), &Route::Home);
        assert!(!session.is_authenticated());
    }
}
