use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "goal_type", rename_all = "snake_case")]
pub enum GoalType {
    Duration,
    Distance,
    Calories,
    ActivitiesCount,
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalType::Duration => write!(f, "duration"),
            GoalType::Distance => write!(f, "distance"),
            GoalType::Calories => write!(f, "calories"),
            GoalType::ActivitiesCount => write!(f, "activities_count"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "goal_status", rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Active => write!(f, "active"),
            GoalStatus::Completed => write!(f, "completed"),
            GoalStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_value: f64,
    pub current_value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    pub target_value: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl CreateGoalRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.is_empty() || self.title.len() > 255 {
            return Err("title must be between 1 and 255 characters".into());
        }
        if let Some(description) = &self.description {
            if description.len() > 1000 {
                return Err("description must be at most 1000 characters".into());
            }
        }
        if !self.target_value.is_finite() || self.target_value <= 0.0 {
            return Err("target_value must be a positive number".into());
        }
        if self.end_date <= self.start_date {
            return Err("end_date must be after start_date".into());
        }
        Ok(())
    }
}

/// Partial update for a goal. `current_value` and `status` are accepted as
/// manual overrides; the next activity mutation recomputes them.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GoalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<GoalType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<GoalStatus>,
}

impl GoalPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.goal_type.is_none()
            && self.target_value.is_none()
            && self.current_value.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("no valid fields to update".into());
        }
        if let Some(title) = &self.title {
            if title.is_empty() || title.len() > 255 {
                return Err("title must be between 1 and 255 characters".into());
            }
        }
        if let Some(target_value) = self.target_value {
            if !target_value.is_finite() || target_value <= 0.0 {
                return Err("target_value must be a positive number".into());
            }
        }
        if let Some(current_value) = self.current_value {
            if !current_value.is_finite() || current_value < 0.0 {
                return Err("current_value must be a non-negative number".into());
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end <= start {
                return Err("end_date must be after start_date".into());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct GoalListQuery {
    pub status: Option<GoalStatus>,
}
