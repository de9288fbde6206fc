//! 徽章相关实体定义
//!
//! 徽章定义是部署期播种的只读目录数据，解锁条件以 JSONB 存储，
//! 解析为封闭的标签枚举。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProgressError, Result};
use crate::models::ContentKind;

/// 徽章解锁条件
///
/// 封闭的标签变体：未知标签在解析时报 `UnsupportedCriterion`，
/// 不会静默地被当作"永不满足"。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BadgeCriterion {
    /// 完成课程数达到阈值（可按内容类型过滤）
    #[serde(rename_all = "camelCase")]
    MinCompletedLessons {
        count: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_kind: Option<ContentKind>,
    },
    /// 任意一节已完成课程得分达到阈值（可按内容类型过滤）
    #[serde(rename_all = "camelCase")]
    MinScoreOnAnyLesson {
        threshold: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_kind: Option<ContentKind>,
    },
    /// 连续活跃天数
    ///
    /// 种子数据中存在此条件，但评估器尚未实现对应算法，
    /// 始终视为未达成（连续天数的日历边界和时区语义未定义）。
    #[serde(rename_all = "camelCase")]
    ConsecutiveActiveDays { days: i64 },
}

/// 徽章定义
///
/// 展示元数据 + 积分价值 + 解锁条件。目录数据不可在运行期变更。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDefinition {
    pub id: i64,
    /// 徽章名称
    pub name: String,
    /// 徽章描述
    #[sqlx(default)]
    pub description: Option<String>,
    /// 徽章图标 URL
    #[sqlx(default)]
    pub icon_url: Option<String>,
    /// 徽章分类（展示用）
    #[sqlx(default)]
    pub category: Option<String>,
    /// 获得此徽章时累计的积分
    pub points: i64,
    /// 解锁条件（JSONB 原文）
    pub criterion: Value,
    pub created_at: DateTime<Utc>,
}

impl BadgeDefinition {
    /// 解析解锁条件
    ///
    /// 单个徽章的条件数据损坏不应阻断整轮资格评估，
    /// 调用方按徽章隔离此错误。
    pub fn parse_criterion(&self) -> Result<BadgeCriterion> {
        serde_json::from_value(self.criterion.clone()).map_err(|e| {
            ProgressError::UnsupportedCriterion {
                badge_id: self.id,
                reason: e.to_string(),
            }
        })
    }
}

/// 徽章发放记录
///
/// (learner_id, badge_id) 自然键唯一，保证同一徽章对同一学习者至多发放一次。
/// 创建后不再更新或删除。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AwardRecord {
    pub learner_id: i64,
    pub badge_id: i64,
    pub awarded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn badge_with_criterion(criterion: Value) -> BadgeDefinition {
        BadgeDefinition {
            id: 1,
            name: "Perfect Score".to_string(),
            description: None,
            icon_url: None,
            category: Some("mastery".to_string()),
            points: 200,
            criterion,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_min_completed_lessons() {
        let badge = badge_with_criterion(json!({
            "type": "minCompletedLessons",
            "count": 5,
            "contentKind": "safety"
        }));
        assert_eq!(
            badge.parse_criterion().unwrap(),
            BadgeCriterion::MinCompletedLessons {
                count: 5,
                content_kind: Some(ContentKind::Safety)
            }
        );
    }

    #[test]
    fn test_parse_min_score_without_filter() {
        let badge = badge_with_criterion(json!({
            "type": "minScoreOnAnyLesson",
            "threshold": 100
        }));
        assert_eq!(
            badge.parse_criterion().unwrap(),
            BadgeCriterion::MinScoreOnAnyLesson {
                threshold: 100,
                content_kind: None
            }
        );
    }

    #[test]
    fn test_parse_consecutive_active_days() {
        let badge = badge_with_criterion(json!({
            "type": "consecutiveActiveDays",
            "days": 7
        }));
        assert_eq!(
            badge.parse_criterion().unwrap(),
            BadgeCriterion::ConsecutiveActiveDays { days: 7 }
        );
    }

    #[test]
    fn test_parse_unknown_tag_is_unsupported() {
        let badge = badge_with_criterion(json!({
            "type": "weeklyGoal",
            "lessons": 3
        }));
        let err = badge.parse_criterion().unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CRITERION");
        assert!(err.to_string().contains("badge_id=1"));
    }

    #[test]
    fn test_parse_malformed_payload_is_unsupported() {
        // 缺少必填字段 count
        let badge = badge_with_criterion(json!({ "type": "minCompletedLessons" }));
        assert!(badge.parse_criterion().is_err());
    }

    #[test]
    fn test_criterion_round_trip() {
        let criterion = BadgeCriterion::MinScoreOnAnyLesson {
            threshold: 90,
            content_kind: Some(ContentKind::Coding),
        };
        let json = serde_json::to_value(&criterion).unwrap();
        assert_eq!(json["type"], "minScoreOnAnyLesson");
        assert_eq!(json["contentKind"], "coding");
    }
}
