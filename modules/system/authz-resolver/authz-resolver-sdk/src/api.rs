//! Public API trait for the `AuthZ` resolver.

use std::any::Any;

use async_trait::async_trait;
use k5_security::SecurityContext;

use crate::error::AuthZResolverError;

/// Ownership and state predicates over one resource type.
///
/// All predicates answer `Ok(false)` rather than failing when the caller is
/// anonymous, the id is absent, or the resource does not exist. Only storage
/// faults surface as errors. The predicates are independent; combine them
/// with role checks at the call site:
///
/// ```ignore
/// let can_cancel = ctx.has_role(ADMIN)
///     || orders.can_transition(&ctx, Some(id), "PENDING").await?;
/// ```
#[async_trait]
pub trait AuthZResolverClient: Send + Sync {
    /// True if the resource exists and its owner is the calling principal.
    ///
    /// # Errors
    ///
    /// `ServiceUnavailable`/`Internal` for resource store faults.
    async fn is_resource_owner(
        &self,
        ctx: &SecurityContext,
        resource_id: Option<i64>,
    ) -> Result<bool, AuthZResolverError>;

    /// True if `target_account_id` is the numeric id of `principal`.
    ///
    /// `principal` may be any principal shape; unrecognized shapes yield `false`.
    fn is_self(&self, target_account_id: Option<i64>, principal: &dyn Any) -> bool;

    /// True only if the resource exists, is owned by the caller, and is
    /// currently in `required_state`.
    ///
    /// # Errors
    ///
    /// `ServiceUnavailable`/`Internal` for resource store faults.
    async fn can_transition(
        &self,
        ctx: &SecurityContext,
        resource_id: Option<i64>,
        required_state: &str,
    ) -> Result<bool, AuthZResolverError>;
}
