use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// ===== Companies =====

/// A registered company ("razão social" / "nome fantasia").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Company {
    /// Generated identifier
    pub id: i32,
    /// Brazilian tax identifier (CNPJ), stored as supplied
    pub tax_id: String,
    /// Registered legal name
    pub legal_name: String,
    /// Trade name
    pub trade_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for company creation. The tax ID is verified externally.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompany {
    #[validate(length(min = 1, max = 32, message = "tax_id must be 1-32 characters"))]
    #[schema(example = "47960950000121")]
    pub tax_id: String,

    #[validate(length(min = 1, max = 255, message = "legal_name must be 1-255 characters"))]
    #[schema(example = "Magazine Luiza S/A")]
    pub legal_name: String,

    #[validate(length(min = 1, max = 255, message = "trade_name must be 1-255 characters"))]
    #[schema(example = "Magazine Luiza")]
    pub trade_name: String,
}

/// Full replacement of a company's fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompany {
    #[validate(length(min = 1, max = 32, message = "tax_id must be 1-32 characters"))]
    pub tax_id: String,

    #[validate(length(min = 1, max = 255, message = "legal_name must be 1-255 characters"))]
    pub legal_name: String,

    #[validate(length(min = 1, max = 255, message = "trade_name must be 1-255 characters"))]
    pub trade_name: String,
}

/// A company together with the users it owns.
#[derive(Debug, Clone)]
pub struct CompanyWithUsers {
    pub company: Company,
    pub users: Vec<User>,
}

/// User summary embedded in company responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyUser {
    pub id: i32,
    pub name: String,
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompanyResponse {
    pub id: i32,
    pub tax_id: String,
    pub legal_name: String,
    pub trade_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub users: Vec<CompanyUser>,
}

impl From<&User> for CompanyUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            login: user.login.clone(),
        }
    }
}

impl From<CompanyWithUsers> for CompanyResponse {
    fn from(value: CompanyWithUsers) -> Self {
        let CompanyWithUsers { company, users } = value;

        Self {
            id: company.id,
            tax_id: company.tax_id,
            legal_name: company.legal_name,
            trade_name: company.trade_name,
            created_at: company.created_at,
            updated_at: company.updated_at,
            users: users.iter().map(CompanyUser::from).collect(),
        }
    }
}

// ===== Users =====

/// A user account as stored. Never serialized: responses go through [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub login: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub company_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    #[schema(example = "João de Souza")]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "login must be 1-100 characters"))]
    #[schema(example = "joaosouza")]
    pub login: String,

    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "senha1234", format = Password)]
    pub password: String,

    pub company_id: i32,
}

/// Full replacement of name, login and password. The company moves only when
/// `company_id` is present.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "login must be 1-100 characters"))]
    pub login: String,

    #[validate(length(min = 1, message = "password is required"))]
    #[schema(format = Password)]
    pub password: String,

    #[serde(default)]
    pub company_id: Option<i32>,
}

/// Insert payload handed to the repository once the password is hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub login: String,
    pub password_hash: String,
    pub company_id: i32,
}

/// Replacement payload handed to the repository once the password is hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChanges {
    pub name: String,
    pub login: String,
    pub password_hash: String,
    pub company_id: Option<i32>,
}

/// A user joined with the legal name of its company.
#[derive(Debug, Clone)]
pub struct UserWithCompany {
    pub user: User,
    pub company_legal_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub login: String,
    pub company_id: i32,
    pub company_legal_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserWithCompany> for UserResponse {
    fn from(value: UserWithCompany) -> Self {
        let UserWithCompany {
            user,
            company_legal_name,
        } = value;

        Self {
            id: user.id,
            name: user.name,
            login: user.login,
            company_id: user.company_id,
            company_legal_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
