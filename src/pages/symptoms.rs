use super::{Effect, Form};
use crate::api::{ApiError, ChatAdvice, HealthCheck, MediHelpApi, Symptom, SymptomCheckRequest};
use crate::fetch::Resource;

/// Symptom picker plus free-text AI triage
#[derive(Debug, Clone, Default)]
pub struct SymptomCheckerPage {
    symptoms: Resource<Vec<Symptom>>,
    selected: Vec<i64>,
    pub search: String,
    pub message: String,
    cursor: usize,
    diagnosis: Option<HealthCheck>,
    advice: Option<ChatAdvice>,
    error: Option<String>,
    loading: bool,
}

impl SymptomCheckerPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let result = self
            .symptoms
            .load(|| async { api.symptoms().await.map(|page| page.results) })
            .await;
        Effect::from_result(result)
    }

    /// Symptoms matching the search on name or description, sorted by name
    pub fn visible(&self) -> Vec<&Symptom> {
        let term = self.search.to_lowercase();
        let mut visible: Vec<&Symptom> = self
            .symptoms
            .data()
            .map(|all| {
                all.iter()
                    .filter(|s| {
                        s.name.to_lowercase().contains(&term)
                            || s.description.to_lowercase().contains(&term)
                    })
                    .collect()
            })
            .unwrap_or_default();
        visible.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        visible
    }

    pub fn toggle(&mut self, id: i64) {
        match self.selected.iter().position(|s| *s == id) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(id),
        }
    }

    /// Toggle whichever visible symptom the cursor is on
    pub fn toggle_at_cursor(&mut self) {
        let id = self.visible().get(self.cursor).map(|s| s.id);
        if let Some(id) = id {
            self.toggle(id);
        }
    }

    pub fn move_cursor(&mut self, down: bool) {
        let len = self.visible().len();
        if down {
            if self.cursor + 1 < len {
                self.cursor += 1;
            }
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected(&self) -> &[i64] {
        &self.selected
    }

    /// Names of the selected symptoms in selection order
    pub fn selected_names(&self) -> Vec<String> {
        let all = self.symptoms.data().map(Vec::as_slice).unwrap_or_default();
        self.selected
            .iter()
            .filter_map(|id| all.iter().find(|s| s.id == *id))
            .map(|s| s.name.clone())
            .collect()
    }

    pub async fn submit(&mut self, api: &dyn MediHelpApi) -> Effect {
        if self.selected.is_empty() {
            self.error = Some("Please select at least one symptom.".to_string());
            return Effect::Stay;
        }
        self.loading = true;
        self.error = None;
        let request = SymptomCheckRequest {
            symptoms: self.selected.clone(),
        };
        let result = api.check_symptoms(&request).await;
        self.loading = false;

        match result {
            Ok(check) => {
                tracing::debug!(check = check.id, "symptom check complete");
                self.diagnosis = Some(check);
                Effect::Stay
            }
            Err(err) => {
                self.diagnosis = None;
                self.fail(err, "Failed to check symptoms")
            }
        }
    }

    pub async fn ask_ai(&mut self, api: &dyn MediHelpApi) -> Effect {
        if self.message.trim().is_empty() {
            self.error = Some("Please enter a message about your symptoms.".to_string());
            return Effect::Stay;
        }
        self.loading = true;
        self.error = None;
        let result = api.chat(&self.message).await;
        self.loading = false;

        match result {
            Ok(reply) => {
                self.advice = Some(reply.response);
                Effect::Stay
            }
            Err(err) => {
                self.advice = None;
                self.fail(err, "Failed to get AI response")
            }
        }
    }

    pub fn clear_all(&mut self) {
        self.diagnosis = None;
        self.advice = None;
        self.selected.clear();
        self.message.clear();
        self.error = None;
    }

    fn fail(&mut self, err: ApiError, fallback: &str) -> Effect {
        self.error = Some(err.user_message(fallback));
        Effect::from_error(&err)
    }

    pub fn diagnosis(&self) -> Option<&HealthCheck> {
        self.diagnosis.as_ref()
    }

    pub fn advice(&self) -> Option<&ChatAdvice> {
        self.advice.as_ref()
    }

    /// Inline error: action failures first, then the symptom catalog load
    pub fn error(&self) -> Option<String> {
        self.error
            .clone()
            .or_else(|| self.symptoms.error_message("Failed to fetch symptoms"))
    }

    pub fn is_loading(&self) -> bool {
        self.loading || self.symptoms.is_loading()
    }
}

impl Form for SymptomCheckerPage {
    fn labels(&self) -> &'static [&'static str] {
        &["Search symptoms", "Describe your symptoms"]
    }

    fn field(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(&self.search),
            1 => Some(&self.message),
            _ => None,
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.search),
            1 => Some(&mut self.message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatReply, Diagnosis, MockMediHelpApi, Page};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn symptom(id: i64, name: &str, description: &str) -> Symptom {
        Symptom {
            id,
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    fn catalog_api() -> MockMediHelpApi {
        let mut api = MockMediHelpApi::new();
        api.expect_symptoms().returning(|| {
            Ok(Page::from_items(vec![
                symptom(3, "Nausea", "Feeling sick"),
                symptom(1, "Cough", "Dry or wet"),
                symptom(2, "fever", "High temperature"),
            ]))
        });
        api
    }

    #[tokio::test]
    async fn test_visible_sorted_and_filtered() {
        let api = catalog_api();
        let mut page = SymptomCheckerPage::new();
        page.mount(&api).await;

        let names: Vec<_> = page.visible().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Cough", "fever", "Nausea"]);

        page.search = "temp".to_string();
        let names: Vec<_> = page.visible().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["fever"]);
    }

    #[tokio::test]
    async fn test_submit_requires_selection() {
        let api = MockMediHelpApi::new();
        let mut page = SymptomCheckerPage::new();

        assert_eq!(page.submit(&api).await, Effect::Stay);
        assert_eq!(
            page.error().as_deref(),
            Some("Please select at least one symptom.")
        );
    }

    #[tokio::test]
    async fn test_submit_sends_selection() {
        let mut api = catalog_api();
        api.expect_check_symptoms()
            .withf(|req| req.symptoms == vec![1, 3])
            .times(1)
            .returning(|req| {
                Ok(HealthCheck {
                    id: 50,
                    symptoms: req.symptoms.clone(),
                    conditions: Vec::new(),
                    diagnosis: Diagnosis {
                        urgency: "low".to_string(),
                        ..Diagnosis::default()
                    },
                    created_at: Utc::now(),
                })
            });
        let mut page = SymptomCheckerPage::new();
        page.mount(&api).await;
        page.toggle(1);
        page.toggle(3);
        page.toggle(2);
        page.toggle(2);

        page.submit(&api).await;
        assert_eq!(page.diagnosis().map(|d| d.id), Some(50));
        assert_eq!(page.selected_names(), vec!["Cough", "Nausea"]);
    }

    #[tokio::test]
    async fn test_ai_requires_message() {
        let api = MockMediHelpApi::new();
        let mut page = SymptomCheckerPage::new();
        page.message = "   ".to_string();

        page.ask_ai(&api).await;
        assert_eq!(
            page.error().as_deref(),
            Some("Please enter a message about your symptoms.")
        );
    }

    #[tokio::test]
    async fn test_ai_reply_and_clear_all() {
        let mut api = MockMediHelpApi::new();
        api.expect_chat().withf(|m| m == "headache").returning(|_| {
            Ok(ChatReply {
                response: ChatAdvice {
                    conditions: vec!["Migraine".to_string()],
                    urgency: "low".to_string(),
                    recommendations: vec!["Rest".to_string()],
                },
            })
        });
        let mut page = SymptomCheckerPage::new();
        page.message = "headache".to_string();
        page.toggle(4);

        page.ask_ai(&api).await;
        assert_eq!(page.advice().map(|a| a.urgency.as_str()), Some("low"));

        page.clear_all();
        assert!(page.advice().is_none());
        assert!(page.selected().is_empty());
        assert!(page.message.is_empty());
    }

    #[tokio::test]
    async fn test_check_401_expires_session() {
        let mut api = MockMediHelpApi::new();
        api.expect_check_symptoms()
            .returning(|_| Err(ApiError::Unauthorized { message: None }));
        let mut page = SymptomCheckerPage::new();
        page.toggle(1);

        assert_eq!(page.submit(&api).await, Effect::SessionExpired);
    }
}
