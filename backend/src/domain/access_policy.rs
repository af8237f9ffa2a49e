//! Who may act on whose records.

use tracing::warn;

use super::{Error, Principal, ResourceKind, UserId};

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied,
}

/// Single predicate over a principal and the resolved owner of a record.
///
/// Administrators are unrestricted; everyone else may only touch records
/// they transitively own.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessPolicy;

impl AccessPolicy {
    #[must_use]
    pub fn authorize(self, principal: &Principal, owner: UserId) -> AccessDecision {
        if principal.is_admin() || principal.id == owner {
            AccessDecision::Allowed
        } else {
            AccessDecision::Denied
        }
    }

    /// [`Self::authorize`], with a denial reported as `Forbidden`.
    pub fn ensure(
        self,
        principal: &Principal,
        owner: UserId,
        kind: ResourceKind,
    ) -> Result<(), Error> {
        match self.authorize(principal, owner) {
            AccessDecision::Allowed => Ok(()),
            AccessDecision::Denied => {
                warn!(principal = %principal.id, %owner, kind = %kind, "access denied");
                Err(Error::forbidden(format!(
                    "not permitted to access this {}",
                    kind.label()
                )))
            }
        }
    }
}
