//! Companies Domain
//!
//! Registry of companies and the users that belong to them. A company is only
//! registered once its tax ID (CNPJ) has been confirmed by a [`TaxIdVerifier`];
//! a user is only created for a company that exists.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /companies, /users
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐      ┌───────────────┐
//! │  Services   │ ───▶ │ TaxIdVerifier │  ← CNPJá lookup
//! └──────┬──────┘      └───────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← traits + Postgres / in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← entities, request bodies, responses
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_companies::{
//!     handlers, CompanyService, InMemoryRegistry, StaticTaxIdVerifier, UserService,
//! };
//!
//! let registry = InMemoryRegistry::new();
//! let verifier = Arc::new(StaticTaxIdVerifier::well_formed());
//!
//! let companies = handlers::companies::router(CompanyService::new(registry.clone(), verifier));
//! let users = handlers::users::router(UserService::new(registry));
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod verifier;

// Re-export commonly used types
pub use error::{CompanyError, CompanyResult, UserError, UserResult};
pub use models::{
    Company, CompanyResponse, CompanyUser, CreateCompany, CreateUser, UpdateCompany, UpdateUser,
    UserResponse,
};
pub use postgres::{PgCompanyRepository, PgUserRepository};
pub use repository::{CompanyRepository, InMemoryRegistry, UserRepository};
pub use service::{CompanyService, UserService};
pub use verifier::{
    CnpjaClient, StaticTaxIdVerifier, TaxIdRecord, TaxIdVerifier, VerifierConfig, VerifierError,
    VerifierMode,
};
