//! 服务层请求/响应结构
//!
//! 对外（被排除的 Web API 层）的 JSON 契约，字段使用 camelCase。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{AwardRecord, BadgeDefinition, CompletionChanges, ProgressRecord};

/// 完成事件请求
///
/// score / timeSpentSeconds / completed 均可省略，省略表示"保持原值"。
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub learner_id: i64,
    pub content_unit_id: i64,
    /// 得分（0-100）
    #[validate(range(min = 0, max = 100, message = "得分必须在 0-100 之间"))]
    pub score: Option<i32>,
    /// 本次耗时（秒，非负）
    #[validate(range(min = 0, message = "耗时不允许为负"))]
    pub time_spent_seconds: Option<i32>,
    /// 是否完成
    pub completed: Option<bool>,
}

impl CompletionRequest {
    pub fn new(learner_id: i64, content_unit_id: i64) -> Self {
        Self {
            learner_id,
            content_unit_id,
            score: None,
            time_spent_seconds: None,
            completed: None,
        }
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_time_spent(mut self, seconds: i32) -> Self {
        self.time_spent_seconds = Some(seconds);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// 提取进度字段变更
    pub fn changes(&self) -> CompletionChanges {
        CompletionChanges {
            score: self.score,
            time_spent_seconds: self.time_spent_seconds,
            completed: self.completed,
        }
    }
}

/// 新发放徽章（响应中的展示载荷）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardedBadge {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub points: i64,
    pub category: Option<String>,
    pub awarded_at: DateTime<Utc>,
}

impl AwardedBadge {
    pub fn from_award(badge: &BadgeDefinition, record: &AwardRecord) -> Self {
        Self {
            id: badge.id,
            name: badge.name.clone(),
            description: badge.description.clone(),
            icon_url: badge.icon_url.clone(),
            points: badge.points,
            category: badge.category.clone(),
            awarded_at: record.awarded_at,
        }
    }
}

/// 完成事件响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub progress: ProgressRecord,
    pub newly_awarded_badges: Vec<AwardedBadge>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompletionChanges;
    use serde_json::json;

    #[test]
    fn test_request_builder_and_changes() {
        let request = CompletionRequest::new(1, 2)
            .with_score(95)
            .with_time_spent(120)
            .with_completed(true);

        assert!(request.validate().is_ok());
        let changes = request.changes();
        assert_eq!(changes.score, Some(95));
        assert_eq!(changes.time_spent_seconds, Some(120));
        assert_eq!(changes.completed, Some(true));
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let request = CompletionRequest::new(1, 2).with_score(101);
        assert!(request.validate().is_err());

        let request = CompletionRequest::new(1, 2).with_score(-1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_negative_time_rejected() {
        let request = CompletionRequest::new(1, 2).with_time_spent(-10);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_omitted_fields_are_valid() {
        // 全部省略仍是合法事件（仅更新 updated_at）
        let request = CompletionRequest::new(1, 2);
        assert!(request.validate().is_ok());
        assert_eq!(request.changes(), CompletionChanges::default());
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let request: CompletionRequest = serde_json::from_value(json!({
            "learnerId": 1,
            "contentUnitId": 2,
            "score": 88,
            "timeSpentSeconds": 60,
            "completed": true
        }))
        .unwrap();
        assert_eq!(request.learner_id, 1);
        assert_eq!(request.score, Some(88));
    }
}
