//! 引擎装配
//!
//! 将 Postgres 仓储、积分账本、徽章目录与各服务按依赖顺序组装为
//! 一个可直接使用的引擎实例。上层（Web API、定时任务等）只需持有
//! [`ProgressEngine`]，不必关心内部接线。

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use progress_shared::EngineConfig;

use crate::catalog::BadgeCatalog;
use crate::error::Result;
use crate::evaluator::EligibilityEvaluator;
use crate::ledger::PointsLedger;
use crate::repository::{
    AwardRepository, BadgeRepository, ContentUnitRepository, LearnerRepository, ProgressRepository,
};
use crate::service::{AwardService, CompletionService, ProgressQueryService};

/// Postgres 实现装配后的完成服务类型
pub type PgCompletionService =
    CompletionService<ProgressRepository, ContentUnitRepository, LearnerRepository, AwardRepository>;

/// Postgres 实现装配后的读侧查询服务类型
pub type PgQueryService =
    ProgressQueryService<ProgressRepository, LearnerRepository, AwardRepository>;

/// 装配完成的进度与成就引擎
pub struct ProgressEngine {
    pub completions: PgCompletionService,
    pub queries: PgQueryService,
    pub catalog: Arc<BadgeCatalog>,
}

impl ProgressEngine {
    /// 从连接池与引擎配置装配引擎
    ///
    /// 启动时载入徽章目录快照，目录为空视为部署问题但不阻止启动。
    pub async fn build(pool: PgPool, config: EngineConfig) -> Result<Self> {
        let learners = Arc::new(LearnerRepository::new(pool.clone()));
        let contents = Arc::new(ContentUnitRepository::new(pool.clone()));
        let progress = Arc::new(ProgressRepository::new(pool.clone()));
        let badges = BadgeRepository::new(pool.clone());
        let awards = Arc::new(AwardRepository::new(pool));

        let catalog = Arc::new(BadgeCatalog::load(&badges).await?);
        if catalog.is_empty() {
            tracing::warn!("徽章目录为空，完成事件将不会触发任何发放");
        }

        let ledger = Arc::new(PointsLedger::new(learners.clone()));
        let evaluator = Arc::new(EligibilityEvaluator::new(
            progress.clone(),
            awards.clone(),
            catalog.clone(),
        ));
        let award_service = Arc::new(AwardService::new(
            awards.clone(),
            ledger.clone(),
            catalog.clone(),
        ));

        let completions = CompletionService::new(
            progress.clone(),
            contents,
            ledger,
            evaluator,
            award_service,
            config,
        );
        let queries = ProgressQueryService::new(progress, learners, awards, catalog.clone());

        info!(badge_count = catalog.len(), "进度与成就引擎装配完成");
        Ok(Self {
            completions,
            queries,
            catalog,
        })
    }
}
