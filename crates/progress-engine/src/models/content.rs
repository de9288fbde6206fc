//! 内容单元实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 内容类型
///
/// 仅作为徽章条件的过滤维度使用，不影响进度记录本身的语义
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ContentKind {
    /// 打字练习
    Typing,
    /// 网络安全课程
    Safety,
    /// 编程课程
    Coding,
    /// 通用课程
    #[default]
    Lesson,
}

/// 内容单元
///
/// 学习者可完成的一节课程或游戏化活动。由内容管理子系统创建，
/// 本引擎只读（kind 作为条件过滤维度）。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentUnit {
    pub id: i64,
    /// 内容标题
    pub title: String,
    /// 内容类型
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
}
