use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleMetadata {
    pub project_name: String,
    pub project_description: String,
    /// Calendar date of day 0. Offsets map onto plain calendar days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_start_date: Option<NaiveDate>,
}

impl Default for ScheduleMetadata {
    fn default() -> Self {
        Self {
            project_name: "New Project".to_string(),
            project_description: "No description".to_string(),
            project_start_date: None,
        }
    }
}

impl ScheduleMetadata {
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.project_start_date = Some(date);
        self
    }

    /// Calendar day on which `offset_days` falls, if a start date is set.
    pub fn date_at(&self, offset_days: f64) -> Option<NaiveDate> {
        let start = self.project_start_date?;
        if !offset_days.is_finite() {
            return None;
        }
        start.checked_add_signed(Duration::days(offset_days.floor() as i64))
    }
}
