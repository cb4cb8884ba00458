use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use validator::Validate;

use crate::error::{CompanyError, CompanyResult, UserError, UserResult};
use crate::models::{
    CompanyResponse, CompanyWithUsers, CreateCompany, CreateUser, NewUser, UpdateCompany,
    UpdateUser, UserChanges, UserResponse,
};
use crate::repository::{CompanyRepository, UserRepository};
use crate::verifier::TaxIdVerifier;

/// Service layer for Company business logic
#[derive(Clone)]
pub struct CompanyService<R: CompanyRepository> {
    repository: Arc<R>,
    verifier: Arc<dyn TaxIdVerifier>,
}

impl<R: CompanyRepository> CompanyService<R> {
    pub fn new(repository: R, verifier: Arc<dyn TaxIdVerifier>) -> Self {
        Self {
            repository: Arc::new(repository),
            verifier,
        }
    }

    pub async fn list_companies(&self) -> CompanyResult<Vec<CompanyResponse>> {
        let companies = self.repository.list().await?;
        Ok(companies.into_iter().map(CompanyResponse::from).collect())
    }

    pub async fn get_company(&self, id: i32) -> CompanyResult<CompanyResponse> {
        self.repository
            .get_by_id(id)
            .await?
            .map(CompanyResponse::from)
            .ok_or(CompanyError::NotFound(id))
    }

    /// Create a company once its tax ID has been confirmed by the verifier.
    ///
    /// The supplied names are stored as given; the registered name is only logged.
    pub async fn create_company(&self, input: CreateCompany) -> CompanyResult<CompanyResponse> {
        input
            .validate()
            .map_err(|e| CompanyError::Validation(e.to_string()))?;

        let record = self
            .verifier
            .verify(&input.tax_id)
            .await?
            .ok_or_else(|| CompanyError::InvalidTaxId(input.tax_id.clone()))?;

        if !record.active {
            tracing::warn!(
                tax_id = %record.tax_id,
                status = record.status_text.as_deref().unwrap_or("unknown"),
                "Registering company with inactive tax ID"
            );
        }
        tracing::debug!(
            tax_id = %record.tax_id,
            registered_name = %record.registered_name,
            "Tax ID verified"
        );

        let company = self.repository.create(input).await?;
        Ok(CompanyWithUsers {
            company,
            users: Vec::new(),
        }
        .into())
    }

    /// Replace every field of a company. The tax ID is not verified again.
    pub async fn update_company(
        &self,
        id: i32,
        input: UpdateCompany,
    ) -> CompanyResult<CompanyResponse> {
        input
            .validate()
            .map_err(|e| CompanyError::Validation(e.to_string()))?;

        self.repository
            .update(id, input)
            .await?
            .map(CompanyResponse::from)
            .ok_or(CompanyError::NotFound(id))
    }

    /// Delete a company that no longer owns users.
    pub async fn delete_company(&self, id: i32) -> CompanyResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CompanyError::NotFound(id));
        }
        Ok(())
    }
}

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_user(&self, id: i32) -> UserResult<UserResponse> {
        self.repository
            .get_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound(id))
    }

    /// Create a user tied to an existing company.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        self.ensure_company(input.company_id).await?;

        let password_hash = hash_password(&input.password)?;
        let created = self
            .repository
            .create(NewUser {
                name: input.name,
                login: input.login,
                password_hash,
                company_id: input.company_id,
            })
            .await?;

        Ok(created.into())
    }

    /// Replace name, login and password; move the user only when a company is given.
    pub async fn update_user(&self, id: i32, input: UpdateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        if self.repository.get_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id));
        }
        if let Some(company_id) = input.company_id {
            self.ensure_company(company_id).await?;
        }

        let password_hash = hash_password(&input.password)?;
        self.repository
            .update(
                id,
                UserChanges {
                    name: input.name,
                    login: input.login,
                    password_hash,
                    company_id: input.company_id,
                },
            )
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound(id))
    }

    pub async fn delete_user(&self, id: i32) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    async fn ensure_company(&self, company_id: i32) -> UserResult<()> {
        if !self.repository.company_exists(company_id).await? {
            return Err(UserError::CompanyNotFound(company_id));
        }
        Ok(())
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}
