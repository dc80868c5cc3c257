//! Resource storage contract consumed by the policy predicates.

use async_trait::async_trait;

use crate::error::AuthZResolverError;
use crate::models::ResourceRecord;

/// Read-only lookup of one resource type.
///
/// Implementations must be side-effect free; a missing resource is
/// `Ok(None)`, never an error.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Kind of resource served, used in logs (e.g. `"article"`).
    fn resource_type(&self) -> &str;

    /// Find a resource by id.
    ///
    /// # Errors
    ///
    /// `ServiceUnavailable`/`Internal` if the backing storage fails.
    async fn find(&self, id: i64) -> Result<Option<ResourceRecord>, AuthZResolverError>;
}
