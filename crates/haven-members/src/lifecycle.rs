//! Member lifecycle manager
//!
//! Creation, activation, and deactivation of staff members, with the
//! contact-person bindings kept consistent through the resolver. Every
//! operation authorizes in full before its first mutation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use haven_auth::{
    hash_credential, validate_strength, AuthError, AuthResult, CredentialService, CredentialToken,
    OperationPolicy, PolicyEvaluator, SessionClaims,
};
use haven_org::{
    BindingResolver, Identity, IdentityStore, Organization, OrganizationStore, Profile,
    ProfileStore, ResourceSummary, StoreError,
};
use haven_rbac::Role;

/// Input for creating one member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    /// Unique sign-in email
    pub email: String,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Contact phone number
    pub phone_number: Option<String>,
    /// The role the new member will hold
    pub role: Role,
    /// The resource the member will be responsible for.
    ///
    /// Required when the role binds a resource kind (Supervisor,
    /// Coordinator); must be absent semantics-wise for the others.
    pub resource_id: Option<Uuid>,
}

impl NewMember {
    /// Create a minimal request for the given email and role.
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            last_name: None,
            phone_number: None,
            role,
            resource_id: None,
        }
    }

    /// Set first and last name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Set the contact phone number.
    pub fn with_phone_number(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }

    /// Set the resource the member will be responsible for.
    pub fn with_resource(mut self, resource_id: Uuid) -> Self {
        self.resource_id = Some(resource_id);
        self
    }
}

/// A minimal (id, full name) projection of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    /// The member's identity ID
    pub identity_id: Uuid,
    /// Display name, falling back to the email
    pub full_name: String,
}

/// The result of a successful member creation.
#[derive(Debug, Clone)]
pub struct CreatedMember {
    /// The new identity (inactive until confirmed)
    pub identity: Identity,
    /// The profile granting the requested role
    pub profile: Profile,
    /// The dispatched invitation token
    pub invitation: CredentialToken,
}

/// Editable own-profile details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileInfoEdit {
    /// New first name, if changing
    pub first_name: Option<String>,
    /// New last name, if changing
    pub last_name: Option<String>,
    /// New phone number, if changing
    pub phone_number: Option<String>,
}

/// Editable organization details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationEdit {
    /// New name, if changing
    pub name: Option<String>,
    /// New description, if changing
    pub description: Option<String>,
    /// New contact phone number, if changing
    pub phone_number: Option<String>,
}

/// Member lifecycle manager.
///
/// Holds the directory stores plus the three collaborators the lifecycle
/// drives: the policy evaluator, the binding resolver, and the credential
/// service.
pub struct MemberService {
    identities: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileStore>,
    organizations: Arc<dyn OrganizationStore>,
    evaluator: PolicyEvaluator,
    resolver: BindingResolver,
    credentials: CredentialService,
}

impl std::fmt::Debug for MemberService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberService").finish()
    }
}

impl MemberService {
    /// Create the lifecycle manager over its collaborators.
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        profiles: Arc<dyn ProfileStore>,
        organizations: Arc<dyn OrganizationStore>,
        evaluator: PolicyEvaluator,
        resolver: BindingResolver,
        credentials: CredentialService,
    ) -> Self {
        Self {
            identities,
            profiles,
            organizations,
            evaluator,
            resolver,
            credentials,
        }
    }

    /// Roles the actor may assign to subordinates.
    pub fn assignable_roles(&self, actor: &SessionClaims) -> Vec<Role> {
        actor.role.roles_below()
    }

    /// Resources of the kind bound by `role` that have no contact person.
    ///
    /// Staff from coordinator rank upward may list; `within_organization`
    /// narrows site listings.
    pub async fn unassigned_resources_for_role(
        &self,
        actor: &SessionClaims,
        role: Role,
        within_organization: Option<Uuid>,
    ) -> AuthResult<Vec<ResourceSummary>> {
        if !PolicyEvaluator::is_authenticated(actor)
            || !PolicyEvaluator::has_minimum_rank(actor, Role::Coordinator)
        {
            return Err(AuthError::Denied);
        }
        let kind = role
            .resource_kind()
            .ok_or_else(|| AuthError::validation("role does not bind a resource"))?;
        self.resolver
            .unassigned_resources(kind, within_organization)
            .await
            .map_err(AuthError::from)
    }

    /// Members holding the given role, as (id, full name) summaries.
    ///
    /// An actor may only list profiles for roles strictly below their own
    /// rank, the same bound that governs creation.
    pub async fn members_with_role(
        &self,
        actor: &SessionClaims,
        role: Role,
    ) -> AuthResult<Vec<MemberSummary>> {
        self.evaluator
            .authorize(actor, OperationPolicy::ManageSubordinate { target_role: role })
            .await?
            .require()?;

        let mut members = Vec::new();
        for profile in self.profiles.profiles_for_role(role).await? {
            if let Some(identity) = self.identities.identity_by_id(profile.identity_id).await? {
                members.push(MemberSummary {
                    identity_id: identity.id,
                    full_name: identity.full_name(),
                });
            }
        }
        Ok(members)
    }

    /// Create a member holding a role strictly below the actor's rank.
    ///
    /// Order of effects:
    /// 1. rank check and the resource-id contract, before any write;
    /// 2. identity + profile creation (the identity starts inactive);
    /// 3. invitation token issuance and out-of-band dispatch;
    /// 4. contact-person binding when the role binds a kind.
    ///
    /// Binding an occupied resource overwrites its contact person; a
    /// missing resource ID at this stage is a no-op by store contract.
    ///
    /// # Errors
    ///
    /// [`AuthError::Denied`] unless the target role is strictly below the
    /// actor's; [`AuthError::Validation`] when a binding role comes
    /// without a resource id; [`AuthError::Conflict`] when the email or
    /// the (identity, role) pair already exists.
    pub async fn create_member(
        &self,
        actor: &SessionClaims,
        new_member: NewMember,
    ) -> AuthResult<CreatedMember> {
        self.evaluator
            .authorize(
                actor,
                OperationPolicy::ManageSubordinate {
                    target_role: new_member.role,
                },
            )
            .await?
            .require()?;

        let kind = new_member.role.resource_kind();
        if let Some(kind) = kind {
            if new_member.resource_id.is_none() {
                return Err(AuthError::validation(format!(
                    "a {} id is required for the {} role",
                    kind.as_str(),
                    new_member.role.as_str()
                )));
            }
        }

        let mut identity = Identity::new(&new_member.email);
        identity.first_name = new_member.first_name.clone();
        identity.last_name = new_member.last_name.clone();
        identity.phone_number = new_member.phone_number.clone();

        let identity = self
            .identities
            .insert_identity(identity)
            .await
            .map_err(Self::conflict_on_duplicate)?;
        let profile = self
            .profiles
            .insert_profile(Profile::new(identity.id, new_member.role))
            .await
            .map_err(Self::conflict_on_duplicate)?;

        let invitation = self.credentials.send_invitation(&identity).await?;

        if let (Some(kind), Some(resource_id)) = (kind, new_member.resource_id) {
            self.resolver
                .bind_contact_person(kind, resource_id, identity.id)
                .await?;
        }

        info!(
            identity = %identity.id,
            role = new_member.role.as_str(),
            "member created"
        );

        Ok(CreatedMember {
            identity,
            profile,
            invitation,
        })
    }

    /// Create the administrative bootstrap account.
    ///
    /// Unlike invited members the administrator is active at once, has
    /// its credential set at creation, and receives no invitation.
    pub async fn bootstrap_administrator(
        &self,
        email: &str,
        password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> AuthResult<CreatedMember> {
        validate_strength(password)?;

        let mut identity = Identity::new(email)
            .with_credential_hash(hash_credential(password)?)
            .activated();
        identity.first_name = first_name.map(str::to_string);
        identity.last_name = last_name.map(str::to_string);

        let identity = self
            .identities
            .insert_identity(identity)
            .await
            .map_err(Self::conflict_on_duplicate)?;
        let profile = self
            .profiles
            .insert_profile(Profile::new(identity.id, Role::Administrator))
            .await
            .map_err(Self::conflict_on_duplicate)?;

        // No dispatch for bootstrap; the token still allows a first
        // password rotation through the common redemption path.
        let invitation = self
            .credentials
            .issue_invitation_quietly(&identity)
            .await?;

        info!(identity = %identity.id, "administrator bootstrapped");

        Ok(CreatedMember {
            identity,
            profile,
            invitation,
        })
    }

    /// Mark a member active again.
    ///
    /// Never rebinds resources; reassignment is a separate administrative
    /// action.
    pub async fn activate_member(&self, actor: &SessionClaims, identity_id: Uuid) -> AuthResult<()> {
        let mut identity = self.require_subordinate(actor, identity_id).await?;

        identity.is_active = true;
        identity.updated_at = chrono::Utc::now();
        self.identities.update_identity(&identity).await?;

        info!(identity = %identity_id, "member activated");
        Ok(())
    }

    /// Deactivate a member and clear every resource binding.
    ///
    /// Idempotent: deactivating an already-inactive member repeats the
    /// unbind, which is harmless, rather than erroring.
    pub async fn deactivate_member(
        &self,
        actor: &SessionClaims,
        identity_id: Uuid,
    ) -> AuthResult<()> {
        let mut identity = self.require_subordinate(actor, identity_id).await?;

        identity.is_active = false;
        identity.updated_at = chrono::Utc::now();
        self.identities.update_identity(&identity).await?;
        self.resolver.unbind_all(identity_id).await?;

        info!(identity = %identity_id, "member deactivated");
        Ok(())
    }

    /// Flip an organization's safety lock.
    ///
    /// Allowed for administrators and the organization's contact person.
    pub async fn toggle_organization_safety(
        &self,
        actor: &SessionClaims,
        organization_id: Uuid,
    ) -> AuthResult<bool> {
        let mut organization = self.require_managed_organization(actor, organization_id).await?;
        let engaged = organization.toggle_safety();
        self.organizations.update_organization(&organization).await?;
        Ok(engaged)
    }

    /// Edit an organization's details.
    ///
    /// Allowed for administrators and the organization's contact person.
    pub async fn edit_organization(
        &self,
        actor: &SessionClaims,
        organization_id: Uuid,
        edit: OrganizationEdit,
    ) -> AuthResult<Organization> {
        let mut organization = self.require_managed_organization(actor, organization_id).await?;

        if let Some(name) = edit.name {
            organization.name = name;
        }
        if let Some(description) = edit.description {
            organization.description = Some(description);
        }
        if let Some(phone) = edit.phone_number {
            organization.phone_number = Some(phone);
        }
        organization.updated_at = chrono::Utc::now();

        self.organizations.update_organization(&organization).await?;
        Ok(organization)
    }

    /// Edit one's own profile information.
    ///
    /// Allowed for the identity itself, provided it holds at least one
    /// non-resident profile.
    pub async fn update_own_profile(
        &self,
        actor: &SessionClaims,
        target_identity: Uuid,
        edit: ProfileInfoEdit,
    ) -> AuthResult<Identity> {
        let mut identity = self.require_own_profile(actor, target_identity).await?;

        if let Some(first) = edit.first_name {
            identity.first_name = Some(first);
        }
        if let Some(last) = edit.last_name {
            identity.last_name = Some(last);
        }
        if let Some(phone) = edit.phone_number {
            identity.phone_number = Some(phone);
        }
        identity.updated_at = chrono::Utc::now();

        self.identities.update_identity(&identity).await?;
        Ok(identity)
    }

    /// Change one's own password.
    ///
    /// Runs the same strength chain as token redemption; every violated
    /// rule is reported together with the mismatch check applied first.
    pub async fn change_password(
        &self,
        actor: &SessionClaims,
        target_identity: Uuid,
        new_password: &str,
        confirm_password: &str,
    ) -> AuthResult<()> {
        let mut identity = self.require_own_profile(actor, target_identity).await?;

        if new_password != confirm_password {
            return Err(AuthError::validation("passwords do not match"));
        }
        validate_strength(new_password)?;

        identity.credential_hash = Some(hash_credential(new_password)?);
        identity.updated_at = chrono::Utc::now();
        self.identities.update_identity(&identity).await?;

        info!(identity = %target_identity, "password changed");
        Ok(())
    }

    /// Replace one's own avatar reference and crop coordinates.
    pub async fn set_avatar(
        &self,
        actor: &SessionClaims,
        target_identity: Uuid,
        avatar_url: String,
        avatar_crop: Option<serde_json::Value>,
    ) -> AuthResult<Identity> {
        let mut identity = self.require_own_profile(actor, target_identity).await?;

        identity.avatar_url = Some(avatar_url);
        identity.avatar_crop = avatar_crop;
        identity.updated_at = chrono::Utc::now();

        self.identities.update_identity(&identity).await?;
        Ok(identity)
    }

    /// Remove one's own avatar.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] when there is no avatar to remove.
    pub async fn remove_avatar(
        &self,
        actor: &SessionClaims,
        target_identity: Uuid,
    ) -> AuthResult<()> {
        let mut identity = self.require_own_profile(actor, target_identity).await?;

        if identity.avatar_url.is_none() {
            return Err(AuthError::validation("there is no avatar"));
        }
        identity.avatar_url = None;
        identity.avatar_crop = None;
        identity.updated_at = chrono::Utc::now();

        self.identities.update_identity(&identity).await?;
        Ok(())
    }

    /// Load an identity and authorize self-management of it.
    async fn require_own_profile(
        &self,
        actor: &SessionClaims,
        target_identity: Uuid,
    ) -> AuthResult<Identity> {
        self.evaluator
            .authorize(
                actor,
                OperationPolicy::ManageOwnProfile { target_identity },
            )
            .await?
            .require()?;

        self.identities
            .identity_by_id(target_identity)
            .await?
            .ok_or_else(|| AuthError::NotFound("there is no such member".into()))
    }

    /// Load an organization and authorize management of it.
    async fn require_managed_organization(
        &self,
        actor: &SessionClaims,
        organization_id: Uuid,
    ) -> AuthResult<Organization> {
        let organization = self
            .organizations
            .organization_by_id(organization_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("there is no such organization".into()))?;

        self.evaluator
            .authorize(
                actor,
                OperationPolicy::ManageOrganization {
                    organization: &organization,
                },
            )
            .await?
            .require()?;

        Ok(organization)
    }

    /// Load a member and check the actor outranks their most senior role.
    async fn require_subordinate(
        &self,
        actor: &SessionClaims,
        identity_id: Uuid,
    ) -> AuthResult<Identity> {
        let identity = self
            .identities
            .identity_by_id(identity_id)
            .await?
            .ok_or_else(|| AuthError::NotFound("there is no such member".into()))?;

        let seniormost = self
            .profiles
            .profiles_for_identity(identity_id)
            .await?
            .into_iter()
            .map(|profile| profile.role)
            .min_by_key(Role::ordinal)
            .unwrap_or(Role::Resident);

        self.evaluator
            .authorize(
                actor,
                OperationPolicy::ManageSubordinate {
                    target_role: seniormost,
                },
            )
            .await?
            .require()?;

        Ok(identity)
    }

    fn conflict_on_duplicate(err: StoreError) -> AuthError {
        match err {
            StoreError::DuplicateEmail(_) | StoreError::DuplicateProfile { .. } => {
                AuthError::Conflict(err.to_string())
            }
            other => AuthError::Store(other),
        }
    }
}
