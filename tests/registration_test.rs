//! Provisioning workflow against mocked collaborators.
//!
//! Each test states exactly which requests the identity service and the profile
//! store may see; `verify()` fails on anything else.

use bankify::clients::{IdentityClient, ProfileClient};
use bankify::framework::mock::{create_mock_client, MockClient};
use bankify::framework::{FrameworkError, ResourceRequest};
use bankify::identity_actor::{IdentityActionResult, IdentityError};
use bankify::model::{
    Identity, IdentityId, ProfileCreate, ProfileFilter, UserProfile, VerificationEmail,
};
use bankify::registration::{
    is_email_in_use, AccountNumberPolicy, NextStep, ProvisioningPolicy, RegistrationError,
    RegistrationForm, RegistrationService, ValidationError, VerificationDispatch,
};
use uuid::Uuid;

const UID: &str = "uid_new";

fn form() -> RegistrationForm {
    RegistrationForm {
        phone: "+15551234567".into(),
        email: "ama@example.com".into(),
        password: "s3cret-pass".into(),
        first_name: "Ama".into(),
        last_name: "Mensah".into(),
        date_of_birth: "3/14/1990".into(),
        request_id: None,
    }
}

fn existing_profile(phone: &str, request_id: Option<Uuid>) -> UserProfile {
    UserProfile::new(
        IdentityId::from("uid_existing"),
        ProfileCreate {
            display_phone: phone.into(),
            email: "someone@example.com".into(),
            first_name: "Kofi".into(),
            last_name: "Annan".into(),
            account_number: "51234567".into(),
            date_of_birth: "1/1/1980".into(),
            account_balance: 1000.0,
            request_id,
        },
    )
}

fn uid() -> IdentityId {
    IdentityId::from(UID)
}

fn policy(compensate: bool) -> ProvisioningPolicy {
    ProvisioningPolicy {
        compensate,
        ..Default::default()
    }
}

fn service(
    identities: &MockClient<Identity>,
    profiles: &MockClient<UserProfile>,
    policy: ProvisioningPolicy,
) -> RegistrationService {
    RegistrationService::new(
        IdentityClient::new(identities.client()),
        ProfileClient::new(profiles.client()),
        policy,
    )
}

/// Identity creation plus the display-name update that follows it.
fn expect_identity_created(identities: &mut MockClient<Identity>) {
    identities.expect_create().return_ok(uid());
    identities
        .expect_update(uid())
        .return_ok(Identity::new(uid(), "ama@example.com", "s3cret-pass").unwrap());
}

fn expect_verification_sent(identities: &mut MockClient<Identity>) {
    identities
        .expect_action(uid())
        .return_ok(IdentityActionResult::VerificationSent(VerificationEmail {
            to: "ama@example.com".into(),
            token: "tok".into(),
        }));
}

#[tokio::test]
async fn test_missing_field_makes_no_calls() {
    let identities = MockClient::<Identity>::new();
    let profiles = MockClient::<UserProfile>::new();
    let svc = service(&identities, &profiles, ProvisioningPolicy::default());

    let mut f = form();
    f.date_of_birth.clear();
    let err = svc.register(f).await.unwrap_err();
    assert!(matches!(err, RegistrationError::Validation(ValidationError::MissingFields)));
    assert_eq!(err.user_message(), "Please fill in all fields");

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_bad_phone_makes_no_calls() {
    let identities = MockClient::<Identity>::new();
    let profiles = MockClient::<UserProfile>::new();
    let svc = service(&identities, &profiles, ProvisioningPolicy::default());

    let phones = [
        "5551234567",
        "+1555",
        "+1-555-123-4567",
        "+05551234567",
        "+233٢٤١٢٣٤٥٦٧",
    ];
    for phone in phones {
        let mut f = form();
        f.phone = phone.into();
        let err = svc.register(f).await.unwrap_err();
        assert!(
            matches!(err, RegistrationError::Validation(ValidationError::InvalidPhone)),
            "{} accepted",
            phone
        );
    }

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_country_code_policy_rejects_before_any_call() {
    let identities = MockClient::<Identity>::new();
    let profiles = MockClient::<UserProfile>::new();
    let svc = service(
        &identities,
        &profiles,
        ProvisioningPolicy {
            account_numbers: AccountNumberPolicy::CountryCode,
            ..Default::default()
        },
    );

    let mut f = form();
    f.phone = "+9991234567890".into();
    let err = svc.register(f).await.unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::Validation(ValidationError::UnknownCountryCode(_))
    ));

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_existing_phone_is_rejected_without_identity_call() {
    let identities = MockClient::<Identity>::new();
    let mut profiles = MockClient::<UserProfile>::new();
    profiles
        .expect_query()
        .return_ok(vec![existing_profile("+15551234567", None)]);
    let svc = service(&identities, &profiles, ProvisioningPolicy::default());

    let err = svc.register(form()).await.unwrap_err();
    assert!(matches!(err, RegistrationError::DuplicatePhone(ref p) if p == "+15551234567"));
    assert_eq!(err.user_message(), "Phone number already exists");

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_profile_document_contents() {
    let mut identities = MockClient::<Identity>::new();
    expect_identity_created(&mut identities);
    expect_verification_sent(&mut identities);

    let (profile_client, mut requests) = create_mock_client::<UserProfile>(8);
    let svc = RegistrationService::new(
        IdentityClient::new(identities.client()),
        ProfileClient::new(profile_client),
        ProvisioningPolicy::default(),
    );

    let store = tokio::spawn(async move {
        match requests.recv().await {
            Some(ResourceRequest::Query {
                filter: ProfileFilter::DisplayPhone(phone),
                respond_to,
            }) => {
                assert_eq!(phone, "+15551234567");
                let _ = respond_to.send(Ok(vec![]));
            }
            other => panic!("expected phone query, got {:?}", other),
        }
        match requests.recv().await {
            Some(ResourceRequest::Insert { id, params, respond_to }) => {
                let _ = respond_to.send(Ok(id.clone()));
                (id, params)
            }
            other => panic!("expected profile insert, got {:?}", other),
        }
    });

    let provisioned = svc.register(form()).await.unwrap();
    let (written_id, written) = store.await.unwrap();

    assert_eq!(written_id, uid());
    assert_eq!(written.account_number, "51234567");
    assert_eq!(written.display_phone, "+15551234567");
    assert_eq!(written.email, "ama@example.com");
    assert_eq!(written.account_balance, 1000.0);
    assert_eq!(written.date_of_birth, "3/14/1990");

    assert_eq!(provisioned.profile.identity_id, uid());
    assert!(provisioned.profile.transactions.is_empty());
    assert_eq!(provisioned.next_step, NextStep::VerifyEmail);
    assert!(matches!(provisioned.verification, VerificationDispatch::Sent(_)));
    assert!(!provisioned.replayed);
    identities.verify();
}

#[tokio::test]
async fn test_email_in_use_writes_no_document() {
    let mut identities = MockClient::<Identity>::new();
    identities
        .expect_create()
        .return_err(FrameworkError::UniqueViolation("ama@example.com".into()));
    let mut profiles = MockClient::<UserProfile>::new();
    profiles.expect_query().return_ok(vec![]);
    let svc = service(&identities, &profiles, ProvisioningPolicy::default());

    let err = svc.register(form()).await.unwrap_err();
    assert!(is_email_in_use(&err));
    assert_eq!(err.provider_code(), Some("auth/email-already-in-use"));
    assert_eq!(err.user_message(), "Email already used");

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_identity_service_down_is_transient() {
    let mut identities = MockClient::<Identity>::new();
    identities.expect_create().return_err(FrameworkError::ActorClosed);
    let mut profiles = MockClient::<UserProfile>::new();
    profiles.expect_query().return_ok(vec![]);
    let svc = service(&identities, &profiles, ProvisioningPolicy::default());

    let err = svc.register(form()).await.unwrap_err();
    assert!(matches!(err, RegistrationError::Transient(_)));

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_profile_write_failure_leaves_identity_without_compensation() {
    let mut identities = MockClient::<Identity>::new();
    expect_identity_created(&mut identities);
    let mut profiles = MockClient::<UserProfile>::new();
    profiles.expect_query().return_ok(vec![]);
    profiles.expect_insert(uid()).return_err(FrameworkError::ActorDropped);
    let svc = service(&identities, &profiles, policy(false));

    let err = svc.register(form()).await.unwrap_err();
    match err {
        RegistrationError::ProfileWrite {
            identity_id,
            compensated,
            ..
        } => {
            assert_eq!(identity_id, uid());
            assert!(!compensated);
        }
        other => panic!("expected ProfileWrite, got {:?}", other),
    }

    // No delete, no verification mail
    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_profile_write_failure_deletes_identity() {
    let mut identities = MockClient::<Identity>::new();
    expect_identity_created(&mut identities);
    identities.expect_delete(uid()).return_ok(());
    let mut profiles = MockClient::<UserProfile>::new();
    profiles.expect_query().return_ok(vec![]);
    profiles.expect_insert(uid()).return_err(FrameworkError::ActorDropped);
    let svc = service(&identities, &profiles, policy(true));

    let err = svc.register(form()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::ProfileWrite { compensated: true, .. }
    ));

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_failed_compensation_is_reported() {
    let mut identities = MockClient::<Identity>::new();
    expect_identity_created(&mut identities);
    identities
        .expect_delete(uid())
        .return_err(FrameworkError::ActorClosed);
    let mut profiles = MockClient::<UserProfile>::new();
    profiles.expect_query().return_ok(vec![]);
    profiles.expect_insert(uid()).return_err(FrameworkError::ActorDropped);
    let svc = service(&identities, &profiles, policy(true));

    let err = svc.register(form()).await.unwrap_err();
    assert!(matches!(
        err,
        RegistrationError::ProfileWrite { compensated: false, .. }
    ));

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_unique_index_violation_becomes_duplicate_phone() {
    let mut identities = MockClient::<Identity>::new();
    expect_identity_created(&mut identities);
    identities.expect_delete(uid()).return_ok(());
    let mut profiles = MockClient::<UserProfile>::new();
    profiles.expect_query().return_ok(vec![]);
    profiles
        .expect_insert(uid())
        .return_err(FrameworkError::UniqueViolation("+15551234567".into()));
    let svc = service(&identities, &profiles, policy(true));

    let err = svc.register(form()).await.unwrap_err();
    assert!(matches!(err, RegistrationError::DuplicatePhone(_)));

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_verification_and_display_name_failures_do_not_fail_registration() {
    let mut identities = MockClient::<Identity>::new();
    identities.expect_create().return_ok(uid());
    identities
        .expect_update(uid())
        .return_err(FrameworkError::ActorDropped);
    identities
        .expect_action(uid())
        .return_err(FrameworkError::EntityError(Box::new(IdentityError::TooManyRequests)));
    let mut profiles = MockClient::<UserProfile>::new();
    profiles.expect_query().return_ok(vec![]);
    profiles.expect_insert(uid()).return_ok(uid());
    let svc = service(&identities, &profiles, ProvisioningPolicy::default());

    let provisioned = svc.register(form()).await.unwrap();
    assert!(matches!(provisioned.verification, VerificationDispatch::Failed(_)));
    assert_eq!(provisioned.next_step, NextStep::VerifyEmail);

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_resubmission_with_same_request_id_is_replayed() {
    let request_id = Uuid::new_v4();
    let identities = MockClient::<Identity>::new();
    let mut profiles = MockClient::<UserProfile>::new();
    profiles
        .expect_query()
        .return_ok(vec![existing_profile("+15551234567", Some(request_id))]);
    let svc = service(&identities, &profiles, ProvisioningPolicy::default());

    let mut f = form();
    f.request_id = Some(request_id);
    let provisioned = svc.register(f).await.unwrap();
    assert!(provisioned.replayed);
    assert_eq!(provisioned.verification, VerificationDispatch::Skipped);
    assert_eq!(provisioned.profile.identity_id, IdentityId::from("uid_existing"));

    identities.verify();
    profiles.verify();
}

#[tokio::test]
async fn test_different_request_id_is_still_a_duplicate() {
    let identities = MockClient::<Identity>::new();
    let mut profiles = MockClient::<UserProfile>::new();
    profiles
        .expect_query()
        .return_ok(vec![existing_profile("+15551234567", Some(Uuid::new_v4()))]);
    let svc = service(&identities, &profiles, ProvisioningPolicy::default());

    let mut f = form();
    f.request_id = Some(Uuid::new_v4());
    let err = svc.register(f).await.unwrap_err();
    assert!(matches!(err, RegistrationError::DuplicatePhone(_)));

    identities.verify();
    profiles.verify();
}
