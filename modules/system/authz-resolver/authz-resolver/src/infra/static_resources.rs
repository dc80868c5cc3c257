//! In-memory resource store backed by configuration.

use std::collections::HashMap;

use async_trait::async_trait;
use authz_resolver_sdk::{AuthZResolverError, ResourceRecord, ResourceStore};

/// Read-only resources of one type, keyed by id.
#[derive(Debug)]
pub struct StaticResourceStore {
    resource_type: String,
    by_id: HashMap<i64, ResourceRecord>,
}

impl StaticResourceStore {
    #[must_use]
    pub fn new(
        resource_type: impl Into<String>,
        resources: impl IntoIterator<Item = ResourceRecord>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            by_id: resources.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[async_trait]
impl ResourceStore for StaticResourceStore {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    async fn find(&self, id: i64) -> Result<Option<ResourceRecord>, AuthZResolverError> {
        Ok(self.by_id.get(&id).cloned())
    }
}
