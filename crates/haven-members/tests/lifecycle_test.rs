//! End-to-end member lifecycle tests over the in-memory stores.
//!
//! These walk the full wiring (directory, resolver, credential service,
//! evaluator, lifecycle) the way the HTTP layer consumes it.

use std::sync::Arc;

use uuid::Uuid;

use haven_auth::{
    AuthError, CredentialService, JwtService, MemoryDispatcher, MemoryTokenStore, PolicyEvaluator,
    SessionClaims, Sessions,
};
use haven_members::{MemberService, NewMember, OrganizationEdit, ProfileInfoEdit};
use haven_org::{
    BindingResolver, IdentityStore, MemoryDirectory, Organization, OrganizationStore, Site,
    SiteStore,
};
use haven_rbac::Role;

struct Harness {
    directory: Arc<MemoryDirectory>,
    dispatcher: Arc<MemoryDispatcher>,
    credentials: CredentialService,
    sessions: Sessions,
    service: MemberService,
}

impl Harness {
    fn new() -> Self {
        let directory = Arc::new(MemoryDirectory::new());
        let tokens = Arc::new(MemoryTokenStore::new());
        let dispatcher = Arc::new(MemoryDispatcher::new());

        let credentials =
            CredentialService::new(directory.clone(), tokens.clone(), dispatcher.clone());
        let service = MemberService::new(
            directory.clone(),
            directory.clone(),
            directory.clone(),
            PolicyEvaluator::new(directory.clone()),
            BindingResolver::new(directory.clone(), directory.clone()),
            CredentialService::new(directory.clone(), tokens.clone(), dispatcher.clone()),
        );
        let sessions = Sessions::new(
            JwtService::with_secret("integration-test-secret-32-chars-min").unwrap(),
            directory.clone(),
            directory.clone(),
        );

        Self {
            directory,
            dispatcher,
            credentials,
            sessions,
            service,
        }
    }

    fn claims(&self, identity_id: Uuid, role: Role) -> SessionClaims {
        SessionClaims::new(identity_id, Uuid::now_v7(), role, chrono::Duration::hours(1))
    }

    async fn admin_claims(&self) -> SessionClaims {
        let created = self
            .service
            .bootstrap_administrator("root@example.com", "Sturdy#Pass1", Some("Root"), None)
            .await
            .unwrap();
        self.claims(created.identity.id, Role::Administrator)
    }

    async fn seed_organization(&self, name: &str) -> Organization {
        self.directory
            .insert_organization(Organization::new(name, "VT", "12 Orchard Way"))
            .await
            .unwrap()
    }

    async fn seed_site(&self, organization_id: Uuid, name: &str) -> Site {
        self.directory
            .insert_site(Site::new(organization_id, name, "VT", "14 Orchard Way"))
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn test_creating_a_peer_or_senior_role_is_denied() {
    let harness = Harness::new();
    let actor = harness.claims(Uuid::now_v7(), Role::Supervisor);

    for target in [Role::Administrator, Role::Supervisor] {
        let result = harness
            .service
            .create_member(&actor, NewMember::new("peer@example.com", target))
            .await;
        assert!(matches!(result, Err(AuthError::Denied)), "{:?}", target);
    }

    // Nothing was created along the way.
    assert!(harness
        .directory
        .identity_by_email("peer@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_administrator_creates_every_subordinate_role() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;
    let org = harness.seed_organization("Maple Commons").await;
    let site = harness.seed_site(org.id, "North Tower").await;

    for (role, resource) in [
        (Role::Supervisor, Some(org.id)),
        (Role::Coordinator, Some(site.id)),
        (Role::Observer, None),
        (Role::Resident, None),
    ] {
        let mut request = NewMember::new(format!("{}@example.com", role.as_str()), role);
        if let Some(id) = resource {
            request = request.with_resource(id);
        }
        let created = harness.service.create_member(&admin, request).await.unwrap();
        assert_eq!(created.profile.role, role);
        assert!(!created.identity.is_active);
    }

    // The binding landed on both resources.
    let org = harness
        .directory
        .organization_by_id(org.id)
        .await
        .unwrap()
        .unwrap();
    assert!(org.contact_person.is_some());
    let site = harness.directory.site_by_id(site.id).await.unwrap().unwrap();
    assert!(site.contact_person.is_some());
}

#[tokio::test]
async fn test_binding_roles_require_a_resource_id_before_any_write() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;

    let result = harness
        .service
        .create_member(&admin, NewMember::new("sup@example.com", Role::Supervisor))
        .await;
    assert!(matches!(result, Err(AuthError::Validation { .. })));

    // No partial creation: the identity must not exist.
    assert!(harness
        .directory
        .identity_by_email("sup@example.com")
        .await
        .unwrap()
        .is_none());
    // And no invitation went out.
    assert!(harness.dispatcher.sent().await.is_empty());
}

#[tokio::test]
async fn test_creating_a_member_dispatches_the_invitation() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;

    let created = harness
        .service
        .create_member(
            &admin,
            NewMember::new("obs@example.com", Role::Observer).with_name("Olive", "Berg"),
        )
        .await
        .unwrap();

    let sent = harness.dispatcher.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].destination, "obs@example.com");
    assert_eq!(sent[0].template, "invitation");
    assert_eq!(
        sent[0].context["token"].as_str().unwrap(),
        created.invitation.value
    );
}

#[tokio::test]
async fn test_duplicate_email_is_a_conflict() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;

    harness
        .service
        .create_member(&admin, NewMember::new("twin@example.com", Role::Observer))
        .await
        .unwrap();
    let result = harness
        .service
        .create_member(&admin, NewMember::new("twin@example.com", Role::Observer))
        .await;
    assert!(matches!(result, Err(AuthError::Conflict(_))));
}

#[tokio::test]
async fn test_binding_an_occupied_site_overwrites_the_contact_person() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;
    let org = harness.seed_organization("Maple Commons").await;
    let site = harness.seed_site(org.id, "North Tower").await;

    let first = harness
        .service
        .create_member(
            &admin,
            NewMember::new("coord1@example.com", Role::Coordinator).with_resource(site.id),
        )
        .await
        .unwrap();
    let stored = harness.directory.site_by_id(site.id).await.unwrap().unwrap();
    assert_eq!(stored.contact_person, Some(first.identity.id));

    // Creating a second coordinator for the same site succeeds and takes
    // the binding over; no conflict is raised.
    let second = harness
        .service
        .create_member(
            &admin,
            NewMember::new("coord2@example.com", Role::Coordinator).with_resource(site.id),
        )
        .await
        .unwrap();
    let stored = harness.directory.site_by_id(site.id).await.unwrap().unwrap();
    assert_eq!(stored.contact_person, Some(second.identity.id));
}

#[tokio::test]
async fn test_deactivation_is_idempotent_and_clears_every_binding() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;
    let org = harness.seed_organization("Maple Commons").await;
    let second_org = harness.seed_organization("Cedar Yards").await;

    let created = harness
        .service
        .create_member(
            &admin,
            NewMember::new("sup@example.com", Role::Supervisor).with_resource(org.id),
        )
        .await
        .unwrap();
    // Bind a second organization to the same identity directly.
    harness
        .directory
        .set_organization_contact(second_org.id, Some(created.identity.id))
        .await
        .unwrap();

    harness
        .service
        .deactivate_member(&admin, created.identity.id)
        .await
        .unwrap();
    harness
        .service
        .deactivate_member(&admin, created.identity.id)
        .await
        .unwrap();

    let identity = harness
        .directory
        .identity_by_id(created.identity.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!identity.is_active);
    for org_id in [org.id, second_org.id] {
        let org = harness
            .directory
            .organization_by_id(org_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(org.contact_person, None);
    }
}

#[tokio::test]
async fn test_activation_does_not_rebind_resources() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;
    let org = harness.seed_organization("Maple Commons").await;

    let created = harness
        .service
        .create_member(
            &admin,
            NewMember::new("sup@example.com", Role::Supervisor).with_resource(org.id),
        )
        .await
        .unwrap();

    harness
        .service
        .deactivate_member(&admin, created.identity.id)
        .await
        .unwrap();
    harness
        .service
        .activate_member(&admin, created.identity.id)
        .await
        .unwrap();

    let identity = harness
        .directory
        .identity_by_id(created.identity.id)
        .await
        .unwrap()
        .unwrap();
    assert!(identity.is_active);

    // Rebinding is a separate administrative action.
    let org = harness
        .directory
        .organization_by_id(org.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(org.contact_person, None);
}

#[tokio::test]
async fn test_invited_member_redeems_and_signs_in_once_activated() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;

    let created = harness
        .service
        .create_member(
            &admin,
            NewMember::new("obs@example.com", Role::Observer).with_name("Olive", "Berg"),
        )
        .await
        .unwrap();

    harness
        .credentials
        .redeem(&created.invitation.value, "NewPass1!", "NewPass1!")
        .await
        .unwrap();
    harness
        .service
        .activate_member(&admin, created.identity.id)
        .await
        .unwrap();

    let session = harness
        .sessions
        .sign_in("obs@example.com", "NewPass1!", None)
        .await
        .unwrap();
    assert_eq!(session.claims.role, Role::Observer);

    // The invitation was consumed by redemption.
    let again = harness
        .credentials
        .redeem(&created.invitation.value, "OtherPass1!", "OtherPass1!")
        .await;
    assert!(matches!(again, Err(AuthError::Validation { .. })));
}

#[tokio::test]
async fn test_unassigned_listings_follow_the_role_mapping() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;
    let org = harness.seed_organization("Maple Commons").await;
    harness.seed_site(org.id, "North Tower").await;
    harness.seed_site(org.id, "South Tower").await;

    let sites = harness
        .service
        .unassigned_resources_for_role(&admin, Role::Coordinator, Some(org.id))
        .await
        .unwrap();
    assert_eq!(sites.len(), 2);

    let orgs = harness
        .service
        .unassigned_resources_for_role(&admin, Role::Supervisor, None)
        .await
        .unwrap();
    assert_eq!(orgs.len(), 1);

    // Roles that bind nothing are a validation error.
    let result = harness
        .service
        .unassigned_resources_for_role(&admin, Role::Resident, None)
        .await;
    assert!(matches!(result, Err(AuthError::Validation { .. })));

    // Observers may not list at all.
    let observer = harness.claims(Uuid::now_v7(), Role::Observer);
    let result = harness
        .service
        .unassigned_resources_for_role(&observer, Role::Coordinator, None)
        .await;
    assert!(matches!(result, Err(AuthError::Denied)));
}

#[tokio::test]
async fn test_assignable_roles_are_the_roles_below_the_actor() {
    let harness = Harness::new();
    let coordinator = harness.claims(Uuid::now_v7(), Role::Coordinator);
    assert_eq!(
        harness.service.assignable_roles(&coordinator),
        vec![Role::Observer, Role::Resident]
    );
}

#[tokio::test]
async fn test_role_listings_stop_at_the_actors_rank() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;
    let org = harness.seed_organization("Maple Commons").await;

    harness
        .service
        .create_member(
            &admin,
            NewMember::new("sup@example.com", Role::Supervisor)
                .with_name("Ada", "Quinn")
                .with_resource(org.id),
        )
        .await
        .unwrap();

    let supervisors = harness
        .service
        .members_with_role(&admin, Role::Supervisor)
        .await
        .unwrap();
    assert_eq!(supervisors.len(), 1);
    assert_eq!(supervisors[0].full_name, "Ada Quinn");

    // A supervisor may list coordinators but not their own peers.
    let supervisor = harness.claims(supervisors[0].identity_id, Role::Supervisor);
    assert!(harness
        .service
        .members_with_role(&supervisor, Role::Coordinator)
        .await
        .is_ok());
    let peers = harness
        .service
        .members_with_role(&supervisor, Role::Supervisor)
        .await;
    assert!(matches!(peers, Err(AuthError::Denied)));
}

#[tokio::test]
async fn test_change_own_password_and_sign_back_in() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;
    let admin_id = admin.identity_id().unwrap();

    harness
        .service
        .change_password(&admin, admin_id, "Rotated#Pass2", "Rotated#Pass2")
        .await
        .unwrap();

    assert!(harness
        .sessions
        .sign_in("root@example.com", "Rotated#Pass2", None)
        .await
        .is_ok());
    assert!(harness
        .sessions
        .sign_in("root@example.com", "Sturdy#Pass1", None)
        .await
        .is_err());

    // Mismatched confirmation changes nothing.
    let result = harness
        .service
        .change_password(&admin, admin_id, "Another#Pass3", "Different#Pass3")
        .await;
    assert!(matches!(result, Err(AuthError::Validation { .. })));
    assert!(harness
        .sessions
        .sign_in("root@example.com", "Rotated#Pass2", None)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_safety_toggle_respects_ownership() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;
    let org = harness.seed_organization("Maple Commons").await;

    let owner = harness
        .service
        .create_member(
            &admin,
            NewMember::new("sup@example.com", Role::Supervisor).with_resource(org.id),
        )
        .await
        .unwrap();
    let owner_claims = harness.claims(owner.identity.id, Role::Supervisor);

    // The owner may toggle; the lock disengages.
    let engaged = harness
        .service
        .toggle_organization_safety(&owner_claims, org.id)
        .await
        .unwrap();
    assert!(!engaged);

    // A supervisor not bound to this organization may not.
    let stranger = harness.claims(Uuid::now_v7(), Role::Supervisor);
    let result = harness
        .service
        .toggle_organization_safety(&stranger, org.id)
        .await;
    assert!(matches!(result, Err(AuthError::Denied)));
}

#[tokio::test]
async fn test_staff_edit_their_own_profile_but_nobody_elses() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;

    let created = harness
        .service
        .create_member(
            &admin,
            NewMember::new("obs@example.com", Role::Observer).with_name("Olive", "Berg"),
        )
        .await
        .unwrap();
    let own_claims = harness.claims(created.identity.id, Role::Observer);

    let updated = harness
        .service
        .update_own_profile(
            &own_claims,
            created.identity.id,
            ProfileInfoEdit {
                phone_number: Some("+15550123".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.phone_number.as_deref(), Some("+15550123"));

    // The admin may not edit the observer's profile through this path.
    let result = harness
        .service
        .update_own_profile(&admin, created.identity.id, ProfileInfoEdit::default())
        .await;
    assert!(matches!(result, Err(AuthError::Denied)));
}

#[tokio::test]
async fn test_avatar_round_trip_and_empty_removal() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;

    let created = harness
        .service
        .create_member(&admin, NewMember::new("obs@example.com", Role::Observer))
        .await
        .unwrap();
    let own_claims = harness.claims(created.identity.id, Role::Observer);

    // Removing before setting is a validation error.
    let premature = harness
        .service
        .remove_avatar(&own_claims, created.identity.id)
        .await;
    assert!(matches!(premature, Err(AuthError::Validation { .. })));

    harness
        .service
        .set_avatar(
            &own_claims,
            created.identity.id,
            "media/avatars/olive.png".into(),
            None,
        )
        .await
        .unwrap();
    harness
        .service
        .remove_avatar(&own_claims, created.identity.id)
        .await
        .unwrap();

    let identity = harness
        .directory
        .identity_by_id(created.identity.id)
        .await
        .unwrap()
        .unwrap();
    assert!(identity.avatar_url.is_none());
}

#[tokio::test]
async fn test_organization_edits_require_ownership_or_admin() {
    let harness = Harness::new();
    let admin = harness.admin_claims().await;
    let org = harness.seed_organization("Maple Commons").await;

    let edited = harness
        .service
        .edit_organization(
            &admin,
            org.id,
            OrganizationEdit {
                description: Some("Riverside community".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.description.as_deref(), Some("Riverside community"));

    let resident = harness.claims(Uuid::now_v7(), Role::Resident);
    let result = harness
        .service
        .edit_organization(&resident, org.id, OrganizationEdit::default())
        .await;
    assert!(matches!(result, Err(AuthError::Denied)));
}
