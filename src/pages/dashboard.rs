use std::collections::HashMap;

use futures::future::try_join_all;

use super::Effect;
use crate::api::{ApiError, HealthCheck, MediHelpApi};
use crate::fetch::Resource;
use crate::router::Route;

const RECENT_CHECKS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DashboardTab {
    #[default]
    Overview,
    HealthRecords,
    Appointments,
}

impl DashboardTab {
    pub const ALL: [DashboardTab; 3] = [Self::Overview, Self::HealthRecords, Self::Appointments];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::HealthRecords => "Health Records",
            Self::Appointments => "Appointments",
        }
    }
}

/// A past health check with its symptom ids resolved to names
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    pub check: HealthCheck,
    pub symptom_names: Vec<String>,
}

impl CheckSummary {
    pub fn conditions(&self) -> String {
        if self.check.conditions.is_empty() {
            "None".to_string()
        } else {
            self.check
                .conditions
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    pub fn severity(&self) -> String {
        let severities: Vec<&str> = self
            .check
            .conditions
            .iter()
            .filter_map(|c| c.severity_display.as_deref())
            .collect();
        if severities.is_empty() {
            "N/A".to_string()
        } else {
            severities.join(", ")
        }
    }
}

/// Fetch the user's health checks and resolve every symptom id once
pub async fn load_check_summaries(api: &dyn MediHelpApi) -> Result<Vec<CheckSummary>, ApiError> {
    let checks = api.health_checks().await?.results;

    let mut ids: Vec<i64> = checks.iter().flat_map(|c| c.symptoms.iter().copied()).collect();
    ids.sort_unstable();
    ids.dedup();

    let symptoms = try_join_all(ids.iter().map(|id| api.symptom(*id))).await?;
    let names: HashMap<i64, String> = symptoms.into_iter().map(|s| (s.id, s.name)).collect();

    Ok(checks
        .into_iter()
        .map(|check| {
            let symptom_names = check
                .symptoms
                .iter()
                .map(|id| names.get(id).cloned().unwrap_or_else(|| format!("#{}", id)))
                .collect();
            CheckSummary {
                check,
                symptom_names,
            }
        })
        .collect())
}

#[derive(Debug, Clone, Default)]
pub struct DashboardPage {
    checks: Resource<Vec<CheckSummary>>,
    pub tab: DashboardTab,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn mount(&mut self, api: &dyn MediHelpApi) -> Effect {
        let result = self.checks.load(|| load_check_summaries(api)).await;
        Effect::from_result(result)
    }

    pub fn next_tab(&mut self) {
        let index = DashboardTab::ALL
            .iter()
            .position(|t| *t == self.tab)
            .unwrap_or_default();
        self.tab = DashboardTab::ALL[(index + 1) % DashboardTab::ALL.len()];
    }

    pub fn checks(&self) -> &[CheckSummary] {
        self.checks.data().map(Vec::as_slice).unwrap_or_default()
    }

    /// Most recent checks shown on the overview tab
    pub fn recent(&self) -> &[CheckSummary] {
        let checks = self.checks();
        &checks[..checks.len().min(RECENT_CHECKS)]
    }

    /// Whether the overview should offer a link to the full history
    pub fn has_more(&self) -> bool {
        self.checks().len() > RECENT_CHECKS
    }

    pub fn is_loading(&self) -> bool {
        self.checks.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.checks
            .error_message("Failed to load your health checks")
    }

    /// Quick actions offered on the overview tab
    pub fn quick_actions() -> [(&'static str, Route); 3] {
        [
            ("Start Check", Route::SymptomChecker),
            ("View Guides", Route::FirstAid),
            ("Find Doctors", Route::Doctors),
        ]
    }
}
