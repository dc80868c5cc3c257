//! Ownership and state-conditioned policy predicates.

use std::any::Any;
use std::sync::Arc;

use authz_resolver_sdk::{ResourceRecord, ResourceStore};
use k5_security::{IdentityNamespace, SecurityContext, account_id_of};
use tracing::debug;

use super::error::DomainError;

/// Policy predicates over a single resource type.
///
/// Holds no mutable state; one instance is shared by all requests.
pub struct PolicyEvaluator {
    resources: Arc<dyn ResourceStore>,
    owner_identity: IdentityNamespace,
}

impl PolicyEvaluator {
    #[must_use]
    pub fn new(resources: Arc<dyn ResourceStore>, owner_identity: IdentityNamespace) -> Self {
        Self {
            resources,
            owner_identity,
        }
    }

    #[must_use]
    pub fn resource_type(&self) -> &str {
        self.resources.resource_type()
    }

    /// `false` for anonymous callers, absent ids and missing resources.
    ///
    /// # Errors
    ///
    /// Resource store faults.
    #[tracing::instrument(skip_all, fields(resource_type = %self.resource_type(), resource_id = ?resource_id))]
    pub async fn is_resource_owner(
        &self,
        ctx: &SecurityContext,
        resource_id: Option<i64>,
    ) -> Result<bool, DomainError> {
        Ok(self.owned_resource(ctx, resource_id).await?.is_some())
    }

    /// `false` for absent targets and principal shapes without a numeric id.
    #[must_use]
    pub fn is_self(target_account_id: Option<i64>, principal: &dyn Any) -> bool {
        target_account_id
            .zip(account_id_of(principal))
            .is_some_and(|(target, caller)| target == caller)
    }

    /// Ownership AND current state; ownership alone is not enough.
    ///
    /// # Errors
    ///
    /// Resource store faults.
    #[tracing::instrument(skip_all, fields(
        resource_type = %self.resource_type(),
        resource_id = ?resource_id,
        required_state = %required_state,
    ))]
    pub async fn can_transition(
        &self,
        ctx: &SecurityContext,
        resource_id: Option<i64>,
        required_state: &str,
    ) -> Result<bool, DomainError> {
        let allowed = self
            .owned_resource(ctx, resource_id)
            .await?
            .is_some_and(|resource| resource.is_in_state(required_state));
        debug!(allowed, "transition check");
        Ok(allowed)
    }

    /// The resource, if it exists and belongs to the caller.
    async fn owned_resource(
        &self,
        ctx: &SecurityContext,
        resource_id: Option<i64>,
    ) -> Result<Option<ResourceRecord>, DomainError> {
        let Some(resource_id) = resource_id else {
            return Ok(None);
        };
        let Some(caller) = ctx
            .principal()
            .and_then(|p| p.identity(self.owner_identity))
        else {
            return Ok(None);
        };

        let resource = self
            .resources
            .find(resource_id)
            .await
            .map_err(|e| DomainError::from_store(self.resource_type(), e))?;

        Ok(resource.filter(|r| r.owner == caller))
    }
}
