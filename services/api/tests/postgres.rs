//! Repository tests against a live PostgreSQL instance
//!
//! Run with `cargo test -- --ignored` and `DATABASE_URL` pointing at a
//! scratch database. Migrations are applied before each test.

use std::sync::Arc;

use api::{
    models::{InvoiceChanges, InvoiceStatus, NewInvoice},
    repositories::{InvoiceRepository, PgInvoiceRepository},
};
use auth::{
    AuthError, CredentialService,
    jwt::{JwtConfig, JwtService},
    models::{NewUser, RegisterRequest},
    password::PasswordHasher,
    repositories::{PgUserRepository, UserRepository},
};
use chrono::NaiveDate;
use common::database::{DatabaseConfig, init_pool};
use sqlx::PgPool;
use uuid::Uuid;

async fn pool() -> PgPool {
    let config = DatabaseConfig::from_env().unwrap();
    let pool = init_pool(&config).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4().simple())
}

fn new_invoice(number: &str) -> NewInvoice {
    NewInvoice {
        invoice_number: number.to_string(),
        client_name: "Bob".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        amount: 100.0,
        status: InvoiceStatus::Pending,
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn pg_invoices_are_scoped_to_owner() {
    let repo = PgInvoiceRepository::new(pool().await);
    let alice = Uuid::new_v4();
    let mallory = Uuid::new_v4();

    let invoice = repo.create(alice, &new_invoice("A-1")).await.unwrap();
    assert_eq!(invoice.user_id, alice);

    let changes = InvoiceChanges {
        status: Some(InvoiceStatus::Paid),
        ..Default::default()
    };
    assert!(
        repo.update(mallory, invoice.id, &changes)
            .await
            .unwrap()
            .is_none()
    );
    assert!(repo.delete(mallory, invoice.id).await.unwrap().is_none());
    assert!(repo.list(mallory).await.unwrap().is_empty());

    let stored = repo.list(alice).await.unwrap();
    assert_eq!(stored, vec![invoice]);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn pg_partial_update_keeps_omitted_fields() {
    let repo = PgInvoiceRepository::new(pool().await);
    let owner = Uuid::new_v4();
    let invoice = repo.create(owner, &new_invoice("A-1")).await.unwrap();

    let changes = InvoiceChanges {
        amount: Some(250.5),
        ..Default::default()
    };
    let updated = repo
        .update(owner, invoice.id, &changes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.amount, 250.5);
    assert_eq!(updated.invoice_number, invoice.invoice_number);
    assert_eq!(updated.client_name, invoice.client_name);
    assert_eq!(updated.date, invoice.date);
    assert_eq!(updated.status, InvoiceStatus::Pending);
    assert_eq!(updated.created_at, invoice.created_at);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn pg_update_strictly_advances_modification_time() {
    let repo = PgInvoiceRepository::new(pool().await);
    let owner = Uuid::new_v4();
    let invoice = repo.create(owner, &new_invoice("A-1")).await.unwrap();

    let first = repo
        .update(owner, invoice.id, &InvoiceChanges::default())
        .await
        .unwrap()
        .unwrap();
    let second = repo
        .update(owner, invoice.id, &InvoiceChanges::default())
        .await
        .unwrap()
        .unwrap();

    assert!(first.updated_at > invoice.updated_at);
    assert!(second.updated_at > first.updated_at);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn pg_delete_returns_snapshot_once() {
    let repo = PgInvoiceRepository::new(pool().await);
    let owner = Uuid::new_v4();
    let invoice = repo.create(owner, &new_invoice("A-1")).await.unwrap();

    assert_eq!(
        repo.delete(owner, invoice.id).await.unwrap(),
        Some(invoice.clone())
    );
    assert!(repo.delete(owner, invoice.id).await.unwrap().is_none());
    assert!(
        repo.update(owner, invoice.id, &InvoiceChanges::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn pg_invoices_outlive_their_owner() {
    let pool = pool().await;
    let users = PgUserRepository::new(pool.clone());
    let invoices = PgInvoiceRepository::new(pool.clone());

    let user = users
        .create(&NewUser {
            name: "Alice".to_string(),
            email: unique_email(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();
    let invoice = invoices.create(user.id, &new_invoice("A-1")).await.unwrap();

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(users.find_by_id(user.id).await.unwrap().is_none());
    assert_eq!(invoices.list(user.id).await.unwrap(), vec![invoice]);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn pg_users_round_trip_and_reject_duplicate_email() {
    let users = PgUserRepository::new(pool().await);
    let new_user = NewUser {
        name: "Alice".to_string(),
        email: unique_email(),
        password_hash: "hash".to_string(),
    };

    let created = users.create(&new_user).await.unwrap();
    let by_email = users.find_by_email(&new_user.email).await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);
    assert_eq!(by_email.password_hash, "hash");
    let by_id = users.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, new_user.email);
    assert!(
        users
            .find_by_email(&new_user.email.to_uppercase())
            .await
            .unwrap()
            .is_none()
    );

    let err = users.create(&new_user).await.unwrap_err();
    assert!(err.is_unique_violation());
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn pg_duplicate_registration_is_duplicate_identity() {
    let credentials = CredentialService::new(
        Arc::new(PgUserRepository::new(pool().await)),
        JwtService::new(JwtConfig::with_secret("pg-secret")).unwrap(),
        PasswordHasher::with_params(8, 1, 1).unwrap(),
    );
    let request = || RegisterRequest {
        name: "Alice".to_string(),
        email: unique_email(),
        password: "pw123".to_string(),
    };

    let first = request();
    let email = first.email.clone();
    credentials.register(first).await.unwrap();

    let duplicate = RegisterRequest {
        email,
        ..request()
    };
    assert!(matches!(
        credentials.register(duplicate).await,
        Err(AuthError::DuplicateIdentity)
    ));
}
