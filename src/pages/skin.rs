use std::path::Path;

use super::{Effect, Form};
use crate::api::{MediHelpApi, SkinDiagnosis, SkinImage};
use crate::session::Session;

/// Photo upload for skin condition triage, paid for with free credits
#[derive(Debug, Clone, Default)]
pub struct SkinDiagnosisPage {
    image: Option<SkinImage>,
    pub path_input: String,
    result: Option<SkinDiagnosis>,
    error: Option<String>,
    loading: bool,
}

impl SkinDiagnosisPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the image to upload, dropping any previous result
    pub fn select(&mut self, image: SkinImage) {
        self.image = Some(image);
        self.result = None;
        self.error = None;
    }

    /// Read the image at `path_input` from disk and select it
    pub fn select_from_input(&mut self) {
        let path = self.path_input.trim().to_string();
        if path.is_empty() {
            return;
        }
        match SkinImage::from_path(Path::new(&path)) {
            Ok(image) => self.select(image),
            Err(err) => {
                tracing::debug!(%path, error = %err, "could not read image");
                self.image = None;
                self.error = Some(format!("Could not read {}: {}", path, err));
            }
        }
    }

    pub fn image(&self) -> Option<&SkinImage> {
        self.image.as_ref()
    }

    pub async fn submit(&mut self, api: &dyn MediHelpApi, session: &Session) -> Effect {
        let Some(image) = self.image.clone() else {
            self.error = Some("Please select an image to upload.".to_string());
            return Effect::Stay;
        };
        if session.credits() == 0 {
            self.error = Some("You have used all your free credits.".to_string());
            return Effect::Stay;
        }

        self.loading = true;
        self.error = None;
        let result = api.upload_skin_diagnosis(&image).await;
        self.loading = false;

        match result {
            Ok(diagnosis) => {
                match session.consume_credit() {
                    Ok(left) => tracing::debug!(credits = left, "skin diagnosis credit used"),
                    Err(err) => tracing::warn!(error = %err, "could not record credit use"),
                }
                self.result = Some(diagnosis);
                Effect::Stay
            }
            Err(err) => {
                self.result = None;
                self.error = Some(err.user_message("Failed to upload image or get diagnosis"));
                Effect::from_error(&err)
            }
        }
    }

    pub fn result(&self) -> Option<&SkinDiagnosis> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

impl Form for SkinDiagnosisPage {
    fn labels(&self) -> &'static [&'static str] {
        &["Image path"]
    }

    fn field(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.path_input),
            _ => None,
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.path_input),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Diagnosis, MockMediHelpApi};
    use pretty_assertions::assert_eq;

    fn image() -> SkinImage {
        SkinImage::new("rash.jpg", vec![0xff, 0xd8, 0xff])
    }

    #[tokio::test]
    async fn test_requires_image() {
        let api = MockMediHelpApi::new();
        let session = Session::in_memory();
        let mut page = SkinDiagnosisPage::new();

        page.submit(&api, &session).await;
        assert_eq!(page.error(), Some("Please select an image to upload."));
        assert_eq!(session.credits(), 3);
    }

    #[tokio::test]
    async fn test_success_shows_panel_and_spends_credit() {
        let mut api = MockMediHelpApi::new();
        api.expect_upload_skin_diagnosis()
            .withf(|img| img.file_name == "rash.jpg")
            .times(1)
            .returning(|_| {
                Ok(SkinDiagnosis {
                    id: Some(1),
                    image: None,
                    diagnosis: Diagnosis {
                        urgency: "low".to_string(),
                        conditions: vec!["Eczema".to_string()],
                        ..Diagnosis::default()
                    },
                    created_at: None,
                    updated_at: None,
                })
            });
        let session = Session::in_memory();
        let mut page = SkinDiagnosisPage::new();
        page.select(image());

        page.submit(&api, &session).await;
        assert!(page.result().is_some());
        assert_eq!(session.credits(), 2);
    }

    #[tokio::test]
    async fn test_network_error_keeps_credits() {
        let mut api = MockMediHelpApi::new();
        api.expect_upload_skin_diagnosis()
            .returning(|_| Err(ApiError::Network("connection refused".to_string())));
        let session = Session::in_memory();
        let mut page = SkinDiagnosisPage::new();
        page.select(image());

        let effect = page.submit(&api, &session).await;

        assert_eq!(effect, Effect::Stay);
        assert!(page.result().is_none());
        assert_eq!(
            page.error(),
            Some("Failed to upload image or get diagnosis")
        );
        assert_eq!(session.credits(), 3);
    }

    #[tokio::test]
    async fn test_no_credits_sends_nothing() {
        let api = MockMediHelpApi::new();
        let session = Session::in_memory();
        session.set_credits(0).unwrap();
        let mut page = SkinDiagnosisPage::new();
        page.select(image());

        page.submit(&api, &session).await;
        assert_eq!(page.error(), Some("You have used all your free credits."));
    }

    #[test]
    fn test_select_missing_file_reports_error() {
        let mut page = SkinDiagnosisPage::new();
        page.path_input = "/definitely/not/here.png".to_string();
        page.select_from_input();
        assert!(page.image().is_none());
        assert!(page.error().unwrap().starts_with("Could not read"));
    }
}
