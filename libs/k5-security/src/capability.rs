//! Type-erased access to the numeric account id of "some principal".
//!
//! Callers may hold a [`Principal`], a [`SecurityContext`] or an
//! `Option<Principal>`. Anything else has no numeric id and yields `None`;
//! an unrecognized shape is never an error.

use std::any::Any;

use crate::context::SecurityContext;
use crate::principal::Principal;

/// Extract the numeric account id if `subject` is a principal shape that carries one.
#[must_use]
pub fn account_id_of(subject: &dyn Any) -> Option<i64> {
    if let Some(principal) = subject.downcast_ref::<Principal>() {
        return Some(principal.id());
    }
    if let Some(ctx) = subject.downcast_ref::<SecurityContext>() {
        return ctx.principal().map(Principal::id);
    }
    if let Some(principal) = subject.downcast_ref::<Option<Principal>>() {
        return principal.as_ref().map(Principal::id);
    }
    None
}
