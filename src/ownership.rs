use crate::errors::RequestError;
use crate::models::{Blog, Comment, User};

/// A resource with a single user holding mutation rights over it.
pub trait Owned {
    fn owner_id(&self) -> i64;
}

impl Owned for Blog {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

impl Owned for Comment {
    fn owner_id(&self) -> i64 {
        self.commenter_id
    }
}

impl Owned for User {
    fn owner_id(&self) -> i64 {
        self.id
    }
}

pub fn can_modify<R: Owned + ?Sized>(actor: &User, resource: &R) -> bool {
    resource.owner_id() == actor.id
}

/// Callers must have looked the resource up already; absence is reported
/// before ownership.
pub fn ensure_can_modify<R: Owned + ?Sized>(
    actor: &User,
    resource: &R,
) -> Result<(), RequestError> {
    if can_modify(actor, resource) {
        Ok(())
    } else {
        tracing::debug!(actor = actor.id, owner = resource.owner_id(), "ownership check failed");
        Err(RequestError::Forbidden)
    }
}
