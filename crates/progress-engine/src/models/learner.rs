//! 学习者实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 学习者（引擎视角的子集）
///
/// points 是学习者的累计积分，只允许通过积分账本的原子累加操作写入，
/// 其余组件一律只读。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Learner {
    pub id: i64,
    /// 展示名称
    pub display_name: String,
    /// 累计积分（非负）
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
