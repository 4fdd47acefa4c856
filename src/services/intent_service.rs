//! 意图解析服务
//!
//! 将意图翻译为权限查询，并交给 `PermissionEvaluator` 判定。

use crate::{
    error::{AppError, Result},
    models::{
        intent::{Intent, MetaOf, ScopedIntent},
        query::PermissionQuery,
    },
    services::permission_service::PermissionEvaluator,
};

pub struct IntentResolver<E> {
    evaluator: E,
}

impl<E: PermissionEvaluator> IntentResolver<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// 构建意图对应的权限查询（纯函数）
    pub fn query_for<I: ScopedIntent>(&self, _intent: I, meta: Option<MetaOf<I>>) -> PermissionQuery {
        I::query(meta)
    }

    /// 检查当前主体是否可以执行意图
    ///
    /// `meta` 的形状由意图的资源范围决定，错误形状在编译期被拒绝。
    pub fn check<I: ScopedIntent>(&self, intent: I, meta: Option<MetaOf<I>>) -> Result<bool> {
        let query = self.query_for(intent, meta);
        self.evaluate(I::INTENT, &query)
    }

    /// 运行时意图检查：`resource_id` 总是归属于意图自身的资源范围
    pub fn check_named(&self, intent: Intent, resource_id: Option<String>) -> Result<bool> {
        let query = intent.query(resource_id);
        self.evaluate(intent, &query)
    }

    /// 检查意图，如果无权限则返回错误
    pub fn require<I: ScopedIntent>(&self, intent: I, meta: Option<MetaOf<I>>) -> Result<()> {
        if !self.check(intent, meta)? {
            tracing::warn!(intent = %I::INTENT, "Intent denied");
            return Err(AppError::Forbidden);
        }
        Ok(())
    }

    fn evaluate(&self, intent: Intent, query: &PermissionQuery) -> Result<bool> {
        let allowed = self.evaluator.evaluate(query)?;

        metrics::counter!(
            "intent_checks_total",
            "intent" => intent.as_str(),
            "allowed" => if allowed { "true" } else { "false" }
        )
        .increment(1);

        tracing::debug!(
            intent = %intent,
            resource_type = %query.resource_type(),
            role = %query.role(),
            resource_id = query.resource_id().unwrap_or("-"),
            allowed,
            "Intent checked"
        );

        Ok(allowed)
    }
}
