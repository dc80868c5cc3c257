//! In-process `AuthZResolverClient` implementation.

use std::any::Any;

use async_trait::async_trait;
use authz_resolver_sdk::{AuthZResolverClient, AuthZResolverError};
use k5_security::SecurityContext;

use super::{DomainError, PolicyEvaluator};

fn log_and_convert(op: &str, e: DomainError) -> AuthZResolverError {
    tracing::error!(operation = op, error = ?e, "authz_resolver call failed");
    e.into()
}

#[async_trait]
impl AuthZResolverClient for PolicyEvaluator {
    async fn is_resource_owner(
        &self,
        ctx: &SecurityContext,
        resource_id: Option<i64>,
    ) -> Result<bool, AuthZResolverError> {
        PolicyEvaluator::is_resource_owner(self, ctx, resource_id)
            .await
            .map_err(|e| log_and_convert("is_resource_owner", e))
    }

    fn is_self(&self, target_account_id: Option<i64>, principal: &dyn Any) -> bool {
        PolicyEvaluator::is_self(target_account_id, principal)
    }

    async fn can_transition(
        &self,
        ctx: &SecurityContext,
        resource_id: Option<i64>,
        required_state: &str,
    ) -> Result<bool, AuthZResolverError> {
        PolicyEvaluator::can_transition(self, ctx, resource_id, required_state)
            .await
            .map_err(|e| log_and_convert("can_transition", e))
    }
}
