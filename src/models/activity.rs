use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "activity_type", rename_all = "lowercase")]
pub enum ActivityType {
    Running,
    Cycling,
    Swimming,
    Walking,
    Gym,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityType::Running => write!(f, "running"),
            ActivityType::Cycling => write!(f, "cycling"),
            ActivityType::Swimming => write!(f, "swimming"),
            ActivityType::Walking => write!(f, "walking"),
            ActivityType::Gym => write!(f, "gym"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct Activity {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub duration: f64,
    pub calories: Option<f64>,
    pub distance: Option<f64>,
    pub notes: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// The activity's logical date: the user-supplied date when present,
    /// the creation timestamp otherwise.
    pub fn logical_date(&self) -> DateTime<Utc> {
        self.date.unwrap_or(self.created_at)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActivityPayload {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub duration: f64,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl ActivityPayload {
    pub fn validate(&self) -> Result<(), String> {
        if !self.duration.is_finite() || self.duration < 1.0 {
            return Err("duration must be at least 1 minute".into());
        }
        if let Some(calories) = self.calories {
            if !calories.is_finite() || calories < 0.0 {
                return Err("calories must be a non-negative number".into());
            }
        }
        if let Some(distance) = self.distance {
            if !distance.is_finite() || distance < 0.0 {
                return Err("distance must be a non-negative number".into());
            }
        }
        if let Some(notes) = &self.notes {
            if notes.len() > 500 {
                return Err("notes must be at most 500 characters".into());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Week,
    Month,
    Year,
    All,
}

impl StatsPeriod {
    /// Number of days the period spans, `None` meaning unbounded.
    pub fn days(&self) -> Option<i64> {
        match self {
            StatsPeriod::Week => Some(7),
            StatsPeriod::Month => Some(30),
            StatsPeriod::Year => Some(365),
            StatsPeriod::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatsPeriod::Week => "week",
            StatsPeriod::Month => "month",
            StatsPeriod::Year => "year",
            StatsPeriod::All => "all",
        }
    }
}

impl Default for StatsPeriod {
    fn default() -> Self {
        StatsPeriod::All
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityStats {
    pub period: String,
    pub total_activities: usize,
    pub total_duration: f64,
    pub total_calories: f64,
    pub total_distance: f64,
    pub avg_duration: f64,
    pub by_type: HashMap<String, TypeBreakdown>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct TypeBreakdown {
    pub count: usize,
    pub total_duration: f64,
    pub total_calories: f64,
    pub total_distance: f64,
}
