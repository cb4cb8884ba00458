use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CompanyError, CompanyResult, UserError, UserResult};
use crate::models::{
    Company, CompanyWithUsers, CreateCompany, NewUser, UpdateCompany, User, UserChanges,
    UserWithCompany,
};

/// Repository trait for Company persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a company; the store assigns the id
    async fn create(&self, input: CreateCompany) -> CompanyResult<Company>;

    async fn get_by_id(&self, id: i32) -> CompanyResult<Option<CompanyWithUsers>>;

    /// All companies ordered by id
    async fn list(&self) -> CompanyResult<Vec<CompanyWithUsers>>;

    /// Overwrite every field; `None` when the id is unknown
    async fn update(&self, id: i32, input: UpdateCompany)
    -> CompanyResult<Option<CompanyWithUsers>>;

    /// Remove a company. Fails with [`CompanyError::HasUsers`] while it owns users.
    async fn delete(&self, id: i32) -> CompanyResult<bool>;
}

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with [`UserError::CompanyNotFound`] if the company is gone.
    async fn create(&self, input: NewUser) -> UserResult<UserWithCompany>;

    async fn get_by_id(&self, id: i32) -> UserResult<Option<UserWithCompany>>;

    /// All users ordered by id
    async fn list(&self) -> UserResult<Vec<UserWithCompany>>;

    async fn update(&self, id: i32, changes: UserChanges) -> UserResult<Option<UserWithCompany>>;

    async fn delete(&self, id: i32) -> UserResult<bool>;

    async fn company_exists(&self, company_id: i32) -> UserResult<bool>;
}

#[derive(Debug, Default)]
struct RegistryState {
    companies: BTreeMap<i32, Company>,
    users: BTreeMap<i32, User>,
    next_company_id: i32,
    next_user_id: i32,
}

impl RegistryState {
    fn users_of(&self, company_id: i32) -> Vec<User> {
        self.users
            .values()
            .filter(|u| u.company_id == company_id)
            .cloned()
            .collect()
    }

    fn with_users(&self, company: &Company) -> CompanyWithUsers {
        CompanyWithUsers {
            company: company.clone(),
            users: self.users_of(company.id),
        }
    }

    fn with_company(&self, user: &User) -> UserWithCompany {
        let company_legal_name = self
            .companies
            .get(&user.company_id)
            .map(|c| c.legal_name.clone())
            .unwrap_or_default();

        UserWithCompany {
            user: user.clone(),
            company_legal_name,
        }
    }
}

/// In-memory store implementing both repositories over shared state
/// (for development/testing).
///
/// Ids start at 1 and are never reused, like a serial column.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompanyRepository for InMemoryRegistry {
    async fn create(&self, input: CreateCompany) -> CompanyResult<Company> {
        let mut state = self.state.write().await;

        state.next_company_id += 1;
        let now = Utc::now();
        let company = Company {
            id: state.next_company_id,
            tax_id: input.tax_id,
            legal_name: input.legal_name,
            trade_name: input.trade_name,
            created_at: now,
            updated_at: now,
        };
        state.companies.insert(company.id, company.clone());

        tracing::info!(company_id = company.id, "Created company");
        Ok(company)
    }

    async fn get_by_id(&self, id: i32) -> CompanyResult<Option<CompanyWithUsers>> {
        let state = self.state.read().await;
        Ok(state.companies.get(&id).map(|c| state.with_users(c)))
    }

    async fn list(&self) -> CompanyResult<Vec<CompanyWithUsers>> {
        let state = self.state.read().await;
        Ok(state
            .companies
            .values()
            .map(|c| state.with_users(c))
            .collect())
    }

    async fn update(
        &self,
        id: i32,
        input: UpdateCompany,
    ) -> CompanyResult<Option<CompanyWithUsers>> {
        let mut state = self.state.write().await;

        let Some(company) = state.companies.get_mut(&id) else {
            return Ok(None);
        };
        company.tax_id = input.tax_id;
        company.legal_name = input.legal_name;
        company.trade_name = input.trade_name;
        company.updated_at = Utc::now();
        let company = company.clone();

        tracing::info!(company_id = id, "Updated company");
        Ok(Some(state.with_users(&company)))
    }

    async fn delete(&self, id: i32) -> CompanyResult<bool> {
        let mut state = self.state.write().await;

        if !state.companies.contains_key(&id) {
            return Ok(false);
        }
        if state.users.values().any(|u| u.company_id == id) {
            return Err(CompanyError::HasUsers(id));
        }

        state.companies.remove(&id);
        tracing::info!(company_id = id, "Deleted company");
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for InMemoryRegistry {
    async fn create(&self, input: NewUser) -> UserResult<UserWithCompany> {
        let mut state = self.state.write().await;

        if !state.companies.contains_key(&input.company_id) {
            return Err(UserError::CompanyNotFound(input.company_id));
        }

        state.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_user_id,
            name: input.name,
            login: input.login,
            password_hash: input.password_hash,
            company_id: input.company_id,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());

        tracing::info!(user_id = user.id, company_id = user.company_id, "Created user");
        Ok(state.with_company(&user))
    }

    async fn get_by_id(&self, id: i32) -> UserResult<Option<UserWithCompany>> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).map(|u| state.with_company(u)))
    }

    async fn list(&self) -> UserResult<Vec<UserWithCompany>> {
        let state = self.state.read().await;
        Ok(state.users.values().map(|u| state.with_company(u)).collect())
    }

    async fn update(&self, id: i32, changes: UserChanges) -> UserResult<Option<UserWithCompany>> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(company_id) = changes.company_id {
            if !state.companies.contains_key(&company_id) {
                return Err(UserError::CompanyNotFound(company_id));
            }
        }

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        user.name = changes.name;
        user.login = changes.login;
        user.password_hash = changes.password_hash;
        if let Some(company_id) = changes.company_id {
            user.company_id = company_id;
        }
        user.updated_at = Utc::now();
        let user = user.clone();

        tracing::info!(user_id = id, "Updated user");
        Ok(Some(state.with_company(&user)))
    }

    async fn delete(&self, id: i32) -> UserResult<bool> {
        let mut state = self.state.write().await;

        if state.users.remove(&id).is_some() {
            tracing::info!(user_id = id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn company_exists(&self, company_id: i32) -> UserResult<bool> {
        let state = self.state.read().await;
        Ok(state.companies.contains_key(&company_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magazine_luiza() -> CreateCompany {
        CreateCompany {
            tax_id: "47960950000121".to_string(),
            legal_name: "Magazine Luiza S/A".to_string(),
            trade_name: "Magazine Luiza".to_string(),
        }
    }

    fn new_user(company_id: i32) -> NewUser {
        NewUser {
            name: "João de Souza".to_string(),
            login: "joaosouza".to_string(),
            password_hash: "hash".to_string(),
            company_id,
        }
    }

    #[tokio::test]
    async fn test_ids_are_generated_and_never_zero() {
        let registry = InMemoryRegistry::new();

        let first = CompanyRepository::create(&registry, magazine_luiza())
            .await
            .unwrap();
        let second = CompanyRepository::create(&registry, magazine_luiza())
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_company_lists_its_users() {
        let registry = InMemoryRegistry::new();
        let company = CompanyRepository::create(&registry, magazine_luiza())
            .await
            .unwrap();

        let user = UserRepository::create(&registry, new_user(company.id))
            .await
            .unwrap();
        assert_eq!(user.company_legal_name, "Magazine Luiza S/A");

        let fetched = CompanyRepository::get_by_id(&registry, company.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.users.len(), 1);
        assert_eq!(fetched.users[0].login, "joaosouza");
    }

    #[tokio::test]
    async fn test_user_requires_existing_company() {
        let registry = InMemoryRegistry::new();

        let result = UserRepository::create(&registry, new_user(99)).await;

        assert!(matches!(result, Err(UserError::CompanyNotFound(99))));
        assert!(UserRepository::list(&registry).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_restricted_while_users_exist() {
        let registry = InMemoryRegistry::new();
        let company = CompanyRepository::create(&registry, magazine_luiza())
            .await
            .unwrap();
        let user = UserRepository::create(&registry, new_user(company.id))
            .await
            .unwrap();

        let result = CompanyRepository::delete(&registry, company.id).await;
        assert!(matches!(result, Err(CompanyError::HasUsers(_))));

        assert!(UserRepository::delete(&registry, user.user.id).await.unwrap());
        assert!(CompanyRepository::delete(&registry, company.id).await.unwrap());
        assert!(!CompanyRepository::delete(&registry, company.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_company_returns_none() {
        let registry = InMemoryRegistry::new();

        let result = CompanyRepository::update(
            &registry,
            5,
            UpdateCompany {
                tax_id: "47960950000121".to_string(),
                legal_name: "X".to_string(),
                trade_name: "Y".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(result.is_none());
        assert!(CompanyRepository::list(&registry).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_update_keeps_company_unless_given() {
        let registry = InMemoryRegistry::new();
        let first = CompanyRepository::create(&registry, magazine_luiza())
            .await
            .unwrap();
        let user = UserRepository::create(&registry, new_user(first.id))
            .await
            .unwrap();

        let changes = UserChanges {
            name: "João S.".to_string(),
            login: "joaos".to_string(),
            password_hash: "other".to_string(),
            company_id: None,
        };
        let updated = UserRepository::update(&registry, user.user.id, changes.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.user.company_id, first.id);
        assert_eq!(updated.user.name, "João S.");

        let moved = UserRepository::update(
            &registry,
            user.user.id,
            UserChanges {
                company_id: Some(42),
                ..changes
            },
        )
        .await;
        assert!(matches!(moved, Err(UserError::CompanyNotFound(42))));
    }
}
