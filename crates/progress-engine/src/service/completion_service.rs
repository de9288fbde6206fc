//! 完成事件编排服务
//!
//! 引擎入口。每个完成事件按固定流水线同步处理：
//!
//! 1. 参数校验 -> 2. 解析内容单元 -> 3. 确认学习者存在
//! -> 4. 进度 upsert -> 5. 课程积分累计（仅完成态翻转时）
//! -> 6. 资格评估 -> 7. 徽章发放 -> 8. 返回进度与新发放徽章
//!
//! 失败策略是"尽力而为的尾部"：某一阶段失败时，之前阶段的效果保留并
//! 把错误上抛，不做整体回滚。各阶段在重试下均幂等（进度 upsert 收敛、
//! 积分只在翻转时累计、发放至多一次），调用方可以安全地整体重试。

use std::sync::Arc;

use chrono::Utc;
use progress_shared::EngineConfig;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::error::{ProgressError, Result};
use crate::evaluator::EligibilityEvaluator;
use crate::ledger::PointsLedger;
use crate::repository::{
    AwardRepositoryTrait, ContentUnitRepositoryTrait, LearnerRepositoryTrait,
    ProgressRepositoryTrait,
};
use crate::service::award_service::AwardService;
use crate::service::dto::{AwardedBadge, CompletionRequest, CompletionResponse};

/// 完成事件编排服务
pub struct CompletionService<P, C, L, A>
where
    P: ProgressRepositoryTrait,
    C: ContentUnitRepositoryTrait,
    L: LearnerRepositoryTrait,
    A: AwardRepositoryTrait,
{
    progress: Arc<P>,
    contents: Arc<C>,
    ledger: Arc<PointsLedger<L>>,
    evaluator: Arc<EligibilityEvaluator<P, A>>,
    awards: Arc<AwardService<A, L>>,
    /// 每 1 分得分换算的积分数（策略常量，默认 10）
    points_per_score: i64,
}

impl<P, C, L, A> CompletionService<P, C, L, A>
where
    P: ProgressRepositoryTrait,
    C: ContentUnitRepositoryTrait,
    L: LearnerRepositoryTrait,
    A: AwardRepositoryTrait,
{
    pub fn new(
        progress: Arc<P>,
        contents: Arc<C>,
        ledger: Arc<PointsLedger<L>>,
        evaluator: Arc<EligibilityEvaluator<P, A>>,
        awards: Arc<AwardService<A, L>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            progress,
            contents,
            ledger,
            evaluator,
            awards,
            points_per_score: config.points_per_score,
        }
    }

    /// 记录一次完成事件
    #[instrument(skip(self, request), fields(learner_id = request.learner_id, content_unit_id = request.content_unit_id))]
    pub async fn record_completion(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        // 1. 参数校验，任何状态变更之前拒绝
        request
            .validate()
            .map_err(|e| ProgressError::Validation(e.to_string()))?;

        // 2. 内容单元必须存在（kind 标签归内容管理子系统所有）
        let content = self
            .contents
            .get_content_unit(request.content_unit_id)
            .await?
            .ok_or(ProgressError::ContentUnitNotFound(request.content_unit_id))?;

        // 3. 学习者必须存在，顺带取写入前的积分余额用于日志
        let points_before = self.ledger.balance(request.learner_id).await?;

        // 4. 进度 upsert
        let upsert = self
            .progress
            .upsert_completion(
                request.learner_id,
                request.content_unit_id,
                request.changes(),
                Utc::now(),
            )
            .await?;

        // 5. 课程积分：只在完成态翻转且记录有得分时累计一次。
        //    以合并后记录的得分为准（翻转调用可以省略 score，沿用此前的成绩）。
        if upsert.completed_transitioned
            && let Some(score) = upsert.record.score
        {
            let lesson_points = score as i64 * self.points_per_score;
            self.ledger
                .accrue(request.learner_id, lesson_points)
                .await?;
        }

        // 6. 资格评估
        let eligible = self.evaluator.evaluate(request.learner_id).await?;

        // 7. 逐个发放，单个失败记录警告后继续（不阻断其余徽章）
        let mut newly_awarded = Vec::with_capacity(eligible.len());
        for badge in &eligible {
            match self.awards.award(request.learner_id, badge.id).await {
                Ok(outcome) if outcome.newly_awarded => {
                    newly_awarded.push(AwardedBadge::from_award(badge, &outcome.record));
                }
                // 并发竞争中输掉的一方：对方已发放，不重复上报
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        learner_id = request.learner_id,
                        badge_id = badge.id,
                        error = %e,
                        "单个徽章发放失败，评估继续"
                    );
                }
            }
        }

        info!(
            learner_id = request.learner_id,
            content_unit_id = request.content_unit_id,
            content_kind = ?content.kind,
            completed = upsert.record.completed,
            completed_transitioned = upsert.completed_transitioned,
            points_before,
            newly_awarded = newly_awarded.len(),
            "完成事件已处理"
        );

        Ok(CompletionResponse {
            progress: upsert.record,
            newly_awarded_badges: newly_awarded,
        })
    }
}
