//! 积分账本
//!
//! 学习者累计积分的唯一写入口。课程完成积分与徽章积分都经由这里累计，
//! 任何调用方不得绕过账本直接改写 learners.points。

use std::sync::Arc;

use tracing::info;

use crate::error::{ProgressError, Result};
use crate::repository::LearnerRepositoryTrait;

/// 积分账本
pub struct PointsLedger<L>
where
    L: LearnerRepositoryTrait,
{
    learners: Arc<L>,
}

impl<L> PointsLedger<L>
where
    L: LearnerRepositoryTrait,
{
    pub fn new(learners: Arc<L>) -> Self {
        Self { learners }
    }

    /// 累计积分，返回累加后的总分
    ///
    /// points 允许为 0（照常走原子累加，同时校验学习者存在），
    /// 为负时拒绝——本引擎没有扣分路径。
    pub async fn accrue(&self, learner_id: i64, points: i64) -> Result<i64> {
        if points < 0 {
            return Err(ProgressError::Validation(format!(
                "积分不允许为负: {}",
                points
            )));
        }

        let total = self.learners.add_points(learner_id, points).await?;

        if points > 0 {
            info!(learner_id, points, total, "积分已累计");
        }

        Ok(total)
    }

    /// 当前积分余额
    pub async fn balance(&self, learner_id: i64) -> Result<i64> {
        let learner = self
            .learners
            .get_learner(learner_id)
            .await?
            .ok_or(ProgressError::LearnerNotFound(learner_id))?;

        Ok(learner.points)
    }
}
