//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestDatabase`: PostgreSQL container with migrations applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `postgres` (default): Enables PostgreSQL test infrastructure
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new::<migration::Migrator>().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let tax_id = builder.tax_id();
//!     let login = builder.login("main");
//! }
//! ```

// Conditionally compile database modules based on features
#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_company");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A 14-digit tax ID derived from the seed
    ///
    /// Only the shape is realistic; the check digits are not valid CNPJ digits.
    pub fn tax_id(&self) -> String {
        format!("{:014}", self.seed % 100_000_000_000_000)
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("company", "main");
    /// assert!(name.starts_with("test-company-"));
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A login that satisfies the login pattern (letters, digits, `.`, `_`, `-`)
    pub fn login(&self, suffix: &str) -> String {
        format!("user.{}.{}", self.seed % 1_000_000, suffix)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that a JSON body carries no password material
    pub fn assert_no_password(body: &str, password: &str) {
        assert!(
            !body.contains(password),
            "response leaked the plaintext password: {}",
            body
        );
        assert!(
            !body.contains("$argon2"),
            "response leaked a password hash: {}",
            body
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.tax_id(), builder2.tax_id());
        assert_eq!(
            builder1.name("company", "test"),
            builder2.name("company", "test")
        );
    }

    #[test]
    fn test_tax_id_is_fourteen_digits() {
        for seed in [0, 7, u64::MAX] {
            let tax_id = TestDataBuilder::new(seed).tax_id();
            assert_eq!(tax_id.len(), 14);
            assert!(tax_id.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        // Different test names should generate different data
        assert_ne!(builder1.name("x", "y"), builder2.name("x", "y"));
    }

    #[test]
    fn test_assert_no_password_accepts_clean_body() {
        assertions::assert_no_password(r#"{"login":"joaosouza"}"#, "senha1234");
    }

    #[test]
    #[should_panic(expected = "leaked the plaintext password")]
    fn test_assert_no_password_catches_leak() {
        assertions::assert_no_password(r#"{"password":"senha1234"}"#, "senha1234");
    }
}
