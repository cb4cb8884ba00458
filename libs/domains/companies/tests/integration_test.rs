//! Integration tests for the companies domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - Migrations create the expected schema
//! - The users → companies foreign key is enforced
//! - Relations load in id order
//!
//! They need Docker: `cargo test -p domain_companies -- --ignored`

use domain_companies::models::{NewUser, UserChanges};
use domain_companies::*;
use migration::Migrator;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

struct Repos {
    _db: TestDatabase,
    companies: PgCompanyRepository,
    users: PgUserRepository,
}

async fn repos() -> Repos {
    let db = TestDatabase::new::<Migrator>().await;
    Repos {
        companies: PgCompanyRepository::new(db.connection()),
        users: PgUserRepository::new(db.connection()),
        _db: db,
    }
}

fn company_input(builder: &TestDataBuilder, suffix: &str) -> CreateCompany {
    CreateCompany {
        tax_id: builder.tax_id(),
        legal_name: builder.name("company", suffix),
        trade_name: format!("Trade {}", suffix),
    }
}

fn user_input(builder: &TestDataBuilder, company_id: i32, suffix: &str) -> NewUser {
    NewUser {
        name: builder.name("user", suffix),
        login: builder.login(suffix),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        company_id,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_and_get_company() {
    let repos = repos().await;
    let builder = TestDataBuilder::from_test_name("create_and_get_company");

    let created = repos
        .companies
        .create(company_input(&builder, "main"))
        .await
        .unwrap();
    assert!(created.id > 0);

    let fetched = repos.companies.get_by_id(created.id).await.unwrap();
    let fetched = assert_some(fetched, "company should exist");

    assert_eq!(fetched.company.tax_id, builder.tax_id());
    assert!(fetched.users.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_users_join_their_company() {
    let repos = repos().await;
    let builder = TestDataBuilder::from_test_name("users_join_company");

    let company = repos
        .companies
        .create(company_input(&builder, "main"))
        .await
        .unwrap();
    for suffix in ["b", "a"] {
        repos
            .users
            .create(user_input(&builder, company.id, suffix))
            .await
            .unwrap();
    }

    let listed = repos.users.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].user.id < listed[1].user.id);
    assert_eq!(listed[0].company_legal_name, company.legal_name);

    let with_users = repos.companies.list().await.unwrap();
    assert_eq!(with_users.len(), 1);
    assert_eq!(with_users[0].users.len(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_user_with_missing_company_is_rejected() {
    let repos = repos().await;
    let builder = TestDataBuilder::from_test_name("missing_company");

    let result = repos.users.create(user_input(&builder, 99, "orphan")).await;

    assert!(matches!(result, Err(UserError::CompanyNotFound(99))));
    assert!(!repos.users.company_exists(99).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_is_restricted_while_users_exist() {
    let repos = repos().await;
    let builder = TestDataBuilder::from_test_name("restricted_delete");

    let company = repos
        .companies
        .create(company_input(&builder, "main"))
        .await
        .unwrap();
    let user = repos
        .users
        .create(user_input(&builder, company.id, "main"))
        .await
        .unwrap();

    let result = repos.companies.delete(company.id).await;
    assert!(matches!(result, Err(CompanyError::HasUsers(_))));
    assert!(repos.companies.get_by_id(company.id).await.unwrap().is_some());

    assert!(repos.users.delete(user.user.id).await.unwrap());
    assert!(repos.companies.delete(company.id).await.unwrap());
    assert!(!repos.companies.delete(company.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_company_touches_timestamp() {
    let repos = repos().await;
    let builder = TestDataBuilder::from_test_name("update_company");

    let company = repos
        .companies
        .create(company_input(&builder, "main"))
        .await
        .unwrap();

    let updated = repos
        .companies
        .update(
            company.id,
            UpdateCompany {
                tax_id: company.tax_id.clone(),
                legal_name: "Renamed S/A".to_string(),
                trade_name: "Renamed".to_string(),
            },
        )
        .await
        .unwrap();
    let updated = assert_some(updated, "company should be updated");

    assert_eq!(updated.company.legal_name, "Renamed S/A");
    assert!(updated.company.updated_at >= company.updated_at);

    let missing = repos
        .companies
        .update(
            company.id + 1000,
            UpdateCompany {
                tax_id: company.tax_id,
                legal_name: "X".to_string(),
                trade_name: "Y".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_move_user_between_companies() {
    let repos = repos().await;
    let builder = TestDataBuilder::from_test_name("move_user");

    let first = repos
        .companies
        .create(company_input(&builder, "first"))
        .await
        .unwrap();
    let second = repos
        .companies
        .create(company_input(&builder, "second"))
        .await
        .unwrap();
    let user = repos
        .users
        .create(user_input(&builder, first.id, "main"))
        .await
        .unwrap();

    let changes = UserChanges {
        name: user.user.name.clone(),
        login: user.user.login.clone(),
        password_hash: user.user.password_hash.clone(),
        company_id: Some(second.id),
    };
    let moved = repos.users.update(user.user.id, changes.clone()).await.unwrap();
    let moved = assert_some(moved, "user should be updated");
    assert_eq!(moved.user.company_id, second.id);
    assert_eq!(moved.company_legal_name, second.legal_name);

    let result = repos
        .users
        .update(
            user.user.id,
            UserChanges {
                company_id: Some(second.id + 1000),
                ..changes
            },
        )
        .await;
    assert!(matches!(result, Err(UserError::CompanyNotFound(_))));
}
