//! Registration, login and password change against in-memory storage.

mod support;

use common::AppError;
use domain::Role;
use rating_service_lib::service::{PasswordChange, Registration};

use support::{admin, services, InMemoryStore};

fn registration(email: &str) -> Registration {
    Registration {
        name: "Registered Through The Form".to_string(),
        email: email.to_string(),
        address: Some("7 Elm Road".to_string()),
        password: "Secret!123".to_string(),
    }
}

#[tokio::test]
async fn test_register_login_and_verify_token() {
    let store = InMemoryStore::default();
    let services = services(&store);

    let user = services
        .credentials()
        .register(registration("reg@example.com"))
        .await
        .unwrap();
    assert_eq!(user.role, Role::NormalUser);

    let login = services
        .credentials()
        .login("reg@example.com", "Secret!123")
        .await
        .unwrap();
    assert_eq!(login.email, "reg@example.com");
    assert_eq!(login.role, Role::NormalUser);

    let header = format!("Bearer {}", login.token);
    let identity = services.guard().authenticate(Some(&header)).unwrap();
    assert_eq!(identity.id, user.id);
    assert_eq!(identity.role, Role::NormalUser);
}

#[tokio::test]
async fn test_duplicate_registration_is_conflict() {
    let store = InMemoryStore::default();
    let services = services(&store);

    services
        .credentials()
        .register(registration("dup@example.com"))
        .await
        .unwrap();
    let again = services
        .credentials()
        .register(registration("dup@example.com"))
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let store = InMemoryStore::default();
    let services = services(&store);
    services
        .credentials()
        .register(registration("known@example.com"))
        .await
        .unwrap();

    let wrong_password = services
        .credentials()
        .login("known@example.com", "Wrong!1234")
        .await
        .unwrap_err();
    let unknown_email = services
        .credentials()
        .login("unknown@example.com", "Secret!123")
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_email, AppError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_change_password() {
    let store = InMemoryStore::default();
    let services = services(&store);
    let credentials = services.credentials();
    credentials
        .register(registration("change@example.com"))
        .await
        .unwrap();

    let wrong_old = credentials
        .change_password(PasswordChange {
            email: "change@example.com".to_string(),
            old_password: "NotIt!1234".to_string(),
            new_password: "Fresh#Pass9".to_string(),
        })
        .await;
    assert!(matches!(wrong_old, Err(AppError::InvalidCredentials)));

    credentials
        .change_password(PasswordChange {
            email: "change@example.com".to_string(),
            old_password: "Secret!123".to_string(),
            new_password: "Fresh#Pass9".to_string(),
        })
        .await
        .unwrap();

    assert!(credentials.login("change@example.com", "Secret!123").await.is_err());
    assert!(credentials.login("change@example.com", "Fresh#Pass9").await.is_ok());
}

#[tokio::test]
async fn test_admin_lists_users_by_name() {
    let store = InMemoryStore::default();
    store.seed_user("Zed Is Last In The Listing", "zed@example.com", Role::NormalUser);
    store.seed_user("Amy Is First In The Listing", "amy@example.com", Role::StoreOwner);
    let services = services(&store);

    let users = services.credentials().list_users(&admin()).await.unwrap();
    let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Amy Is First In The Listing", "Zed Is Last In The Listing"]);
}
