//! Authorization evaluator
//!
//! Every protected operation runs through here before any mutation
//! begins. A request moves Unauthenticated → Authenticated (the codec
//! verifies the session token) → Authorized | Denied (this module). The
//! two outcomes are terminal: there are no retries inside the evaluator,
//! and a denial carries no partial effects.
//!
//! Predicates compose left-to-right with short-circuiting; the
//! [`OperationPolicy`] variants are the fixed compositions the platform's
//! operation classes use.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use haven_org::{ContactResource, ProfileStore};
use haven_rbac::Role;

use crate::claims::SessionClaims;
use crate::error::{AuthError, AuthResult};

/// Terminal outcome of an authorization evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Every predicate held
    Authorized,
    /// At least one predicate failed
    Denied,
}

impl Decision {
    /// `true` when the decision is [`Decision::Authorized`].
    pub fn is_authorized(&self) -> bool {
        matches!(self, Decision::Authorized)
    }

    /// Turn a denial into [`AuthError::Denied`].
    pub fn require(self) -> AuthResult<()> {
        match self {
            Decision::Authorized => Ok(()),
            Decision::Denied => Err(AuthError::Denied),
        }
    }
}

impl From<bool> for Decision {
    fn from(authorized: bool) -> Self {
        if authorized {
            Decision::Authorized
        } else {
            Decision::Denied
        }
    }
}

/// A composed policy for one operation class.
///
/// Each variant carries the object context its predicates need; the
/// evaluator supplies identity and role from the session claims.
pub enum OperationPolicy<'a> {
    /// View or edit one's own profile information or avatar.
    ///
    /// Requires the target to be the caller, holding at least one
    /// non-Resident profile.
    ManageOwnProfile {
        /// The identity being viewed or edited
        target_identity: Uuid,
    },

    /// Toggle safety, edit, or view an organization.
    ///
    /// Requires the caller to be an administrator or the organization's
    /// contact person.
    ManageOrganization {
        /// The organization being managed
        organization: &'a dyn ContactResource,
    },

    /// Manage a site under an organization.
    ///
    /// Requires an administrator, or a supervisor who is the parent
    /// organization's contact person.
    ManageSite {
        /// The site's parent organization
        parent_organization: &'a dyn ContactResource,
    },

    /// List or search global resources, or serve global search
    /// predictions. Administrators only.
    GlobalDirectory,

    /// Create or deactivate a member holding the given role.
    ///
    /// Requires the target role to sit strictly below the caller's rank.
    ManageSubordinate {
        /// The role being assigned or deactivated
        target_role: Role,
    },
}

/// Evaluates composed policies against session claims.
///
/// Holds the profile store for the one predicate that needs it
/// (self-management excludes identities holding only a Resident profile).
pub struct PolicyEvaluator {
    profiles: Arc<dyn ProfileStore>,
}

impl std::fmt::Debug for PolicyEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEvaluator").finish()
    }
}

impl PolicyEvaluator {
    /// Create an evaluator over the profile store.
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    /// Session credential present and not expired.
    pub fn is_authenticated(claims: &SessionClaims) -> bool {
        !claims.is_expired()
    }

    /// The pinned profile's role is in the allowed set.
    pub fn has_role(claims: &SessionClaims, allowed: &[Role]) -> bool {
        allowed.contains(&claims.role)
    }

    /// The pinned profile's role is at least as senior as `threshold`.
    pub fn has_minimum_rank(claims: &SessionClaims, threshold: Role) -> bool {
        claims.role.rank_at_least(threshold)
    }

    /// The caller is the resource's contact person.
    ///
    /// A resource with no contact person is owned by nobody.
    pub fn is_resource_owner(claims: &SessionClaims, resource: &dyn ContactResource) -> bool {
        match (claims.identity_id(), resource.contact_person()) {
            (Some(caller), Some(owner)) => caller == owner,
            _ => false,
        }
    }

    /// Administrator, or the resource's contact person.
    pub fn is_resource_owner_or_admin(
        claims: &SessionClaims,
        resource: &dyn ContactResource,
    ) -> bool {
        Self::has_role(claims, &[Role::Administrator])
            || Self::is_resource_owner(claims, resource)
    }

    /// The target is the caller, and the caller holds at least one
    /// profile whose role is not Resident.
    pub async fn is_self_and_not_resident(
        &self,
        claims: &SessionClaims,
        target_identity: Uuid,
    ) -> AuthResult<bool> {
        if claims.identity_id() != Some(target_identity) {
            return Ok(false);
        }
        let profiles = self.profiles.profiles_for_identity(target_identity).await?;
        Ok(profiles.iter().any(|profile| profile.role != Role::Resident))
    }

    /// Evaluate a composed policy to a terminal decision.
    ///
    /// Authorization is evaluated in full before the caller mutates
    /// anything, so there is no check-then-recheck window inside one
    /// request.
    pub async fn authorize(
        &self,
        claims: &SessionClaims,
        policy: OperationPolicy<'_>,
    ) -> AuthResult<Decision> {
        if !Self::is_authenticated(claims) {
            debug!(jti = %claims.jti, "denied: session expired");
            return Ok(Decision::Denied);
        }

        let authorized = match policy {
            OperationPolicy::ManageOwnProfile { target_identity } => {
                self.is_self_and_not_resident(claims, target_identity).await?
            }
            OperationPolicy::ManageOrganization { organization } => {
                Self::is_resource_owner_or_admin(claims, organization)
            }
            OperationPolicy::ManageSite {
                parent_organization,
            } => {
                Self::has_role(claims, &[Role::Administrator])
                    || (Self::has_role(claims, &[Role::Supervisor])
                        && Self::is_resource_owner(claims, parent_organization))
            }
            OperationPolicy::GlobalDirectory => Self::has_role(claims, &[Role::Administrator]),
            OperationPolicy::ManageSubordinate { target_role } => {
                claims.role.outranks(target_role)
            }
        };

        Ok(Decision::from(authorized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_org::{Identity, IdentityStore, MemoryDirectory, Organization, Profile};

    fn claims_for(identity_id: Uuid, role: Role) -> SessionClaims {
        SessionClaims::new(identity_id, Uuid::now_v7(), role, chrono::Duration::hours(1))
    }

    async fn evaluator_with_profile(role: Role) -> (Arc<MemoryDirectory>, PolicyEvaluator, Uuid) {
        let directory = Arc::new(MemoryDirectory::new());
        let identity = directory
            .insert_identity(Identity::new(format!("{}@example.com", role.as_str())))
            .await
            .unwrap();
        directory
            .insert_profile(Profile::new(identity.id, role))
            .await
            .unwrap();
        let evaluator = PolicyEvaluator::new(directory.clone());
        (directory, evaluator, identity.id)
    }

    #[tokio::test]
    async fn test_expired_session_is_denied_regardless_of_policy() {
        let (_, evaluator, identity_id) = evaluator_with_profile(Role::Administrator).await;
        let mut claims = claims_for(identity_id, Role::Administrator);
        claims.exp = chrono::Utc::now().timestamp() - 60;

        let decision = evaluator
            .authorize(&claims, OperationPolicy::GlobalDirectory)
            .await
            .unwrap();
        assert_eq!(decision, Decision::Denied);
    }

    #[tokio::test]
    async fn test_owner_may_manage_their_organization() {
        let (_, evaluator, identity_id) = evaluator_with_profile(Role::Supervisor).await;
        let mut org = Organization::new("Maple Commons", "VT", "12 Orchard Way");
        org.contact_person = Some(identity_id);

        let decision = evaluator
            .authorize(
                &claims_for(identity_id, Role::Supervisor),
                OperationPolicy::ManageOrganization { organization: &org },
            )
            .await
            .unwrap();
        assert!(decision.is_authorized());
    }

    #[tokio::test]
    async fn test_unbound_supervisor_is_denied() {
        let (_, evaluator, owner_id) = evaluator_with_profile(Role::Supervisor).await;
        let (_, _, other_id) = evaluator_with_profile(Role::Supervisor).await;

        let mut org = Organization::new("Maple Commons", "VT", "12 Orchard Way");
        org.contact_person = Some(owner_id);

        let decision = evaluator
            .authorize(
                &claims_for(other_id, Role::Supervisor),
                OperationPolicy::ManageOrganization { organization: &org },
            )
            .await
            .unwrap();
        assert_eq!(decision, Decision::Denied);
    }

    #[tokio::test]
    async fn test_admin_manages_any_organization() {
        let (_, evaluator, admin_id) = evaluator_with_profile(Role::Administrator).await;
        let org = Organization::new("Maple Commons", "VT", "12 Orchard Way");

        let decision = evaluator
            .authorize(
                &claims_for(admin_id, Role::Administrator),
                OperationPolicy::ManageOrganization { organization: &org },
            )
            .await
            .unwrap();
        assert!(decision.is_authorized());
    }

    #[tokio::test]
    async fn test_site_management_requires_supervising_the_parent() {
        let (_, evaluator, supervisor_id) = evaluator_with_profile(Role::Supervisor).await;

        let mut owned = Organization::new("Owned", "VT", "1 Way");
        owned.contact_person = Some(supervisor_id);
        let foreign = Organization::new("Foreign", "VT", "2 Way");

        let claims = claims_for(supervisor_id, Role::Supervisor);
        let allowed = evaluator
            .authorize(
                &claims,
                OperationPolicy::ManageSite {
                    parent_organization: &owned,
                },
            )
            .await
            .unwrap();
        let refused = evaluator
            .authorize(
                &claims,
                OperationPolicy::ManageSite {
                    parent_organization: &foreign,
                },
            )
            .await
            .unwrap();

        assert!(allowed.is_authorized());
        assert_eq!(refused, Decision::Denied);
    }

    #[tokio::test]
    async fn test_global_directory_is_admin_only() {
        for (role, expected) in [
            (Role::Administrator, true),
            (Role::Supervisor, false),
            (Role::Resident, false),
        ] {
            let (_, evaluator, identity_id) = evaluator_with_profile(role).await;
            let decision = evaluator
                .authorize(&claims_for(identity_id, role), OperationPolicy::GlobalDirectory)
                .await
                .unwrap();
            assert_eq!(decision.is_authorized(), expected, "{:?}", role);
        }
    }

    #[tokio::test]
    async fn test_subordinate_management_needs_strictly_lower_target() {
        let (_, evaluator, supervisor_id) = evaluator_with_profile(Role::Supervisor).await;
        let claims = claims_for(supervisor_id, Role::Supervisor);

        for (target, expected) in [
            (Role::Administrator, false),
            (Role::Supervisor, false),
            (Role::Coordinator, true),
            (Role::Observer, true),
            (Role::Resident, true),
        ] {
            let decision = evaluator
                .authorize(
                    &claims,
                    OperationPolicy::ManageSubordinate { target_role: target },
                )
                .await
                .unwrap();
            assert_eq!(decision.is_authorized(), expected, "{:?}", target);
        }
    }

    #[tokio::test]
    async fn test_self_management_excludes_resident_only_identities() {
        let (_, evaluator, staff_id) = evaluator_with_profile(Role::Observer).await;
        let (_, resident_eval, resident_id) = evaluator_with_profile(Role::Resident).await;

        let own = evaluator
            .authorize(
                &claims_for(staff_id, Role::Observer),
                OperationPolicy::ManageOwnProfile {
                    target_identity: staff_id,
                },
            )
            .await
            .unwrap();
        assert!(own.is_authorized());

        // A resident-only identity may not edit their profile.
        let resident = resident_eval
            .authorize(
                &claims_for(resident_id, Role::Resident),
                OperationPolicy::ManageOwnProfile {
                    target_identity: resident_id,
                },
            )
            .await
            .unwrap();
        assert_eq!(resident, Decision::Denied);

        // Nor may anyone edit somebody else's.
        let other = evaluator
            .authorize(
                &claims_for(staff_id, Role::Observer),
                OperationPolicy::ManageOwnProfile {
                    target_identity: resident_id,
                },
            )
            .await
            .unwrap();
        assert_eq!(other, Decision::Denied);
    }

    #[test]
    fn test_decision_require_maps_denial_to_error() {
        assert!(Decision::Authorized.require().is_ok());
        assert!(matches!(
            Decision::Denied.require(),
            Err(AuthError::Denied)
        ));
    }
}
