//! Shared application state.
//!
//! Cloned into every handler; the connection pool and the verifier are both
//! reference counted, so clones are cheap.

use domain_companies::{
    CnpjaClient, StaticTaxIdVerifier, TaxIdVerifier, VerifierConfig, VerifierError, VerifierMode,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
    /// Tax ID verifier selected by `VERIFIER_MODE`
    pub verifier: Arc<dyn TaxIdVerifier>,
}

/// Builds the tax ID verifier for the configured mode.
pub fn build_verifier(config: &VerifierConfig) -> Result<Arc<dyn TaxIdVerifier>, VerifierError> {
    match config.mode {
        VerifierMode::Cnpja => {
            info!(base_url = %config.base_url, timeout = ?config.timeout, "Using CNPJá tax ID verifier");
            Ok(Arc::new(CnpjaClient::new(config)?))
        }
        VerifierMode::Static => {
            warn!("Using static tax ID verifier: any 14-digit tax ID is accepted");
            Ok(Arc::new(StaticTaxIdVerifier::well_formed()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_mode_accepts_well_formed_tax_ids() {
        let config = VerifierConfig {
            mode: VerifierMode::Static,
            ..Default::default()
        };

        let verifier = build_verifier(&config).unwrap();

        assert!(verifier.verify("47960950000121").await.unwrap().is_some());
        assert!(verifier.verify("47.960.950/0001-21").await.unwrap().is_none());
    }

    #[test]
    fn test_cnpja_mode_rejects_bad_base_url() {
        let config = VerifierConfig {
            mode: VerifierMode::Cnpja,
            base_url: "not a url".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            build_verifier(&config),
            Err(VerifierError::Configuration(_))
        ));
    }

    #[test]
    fn test_cnpja_mode_builds_client() {
        assert!(build_verifier(&VerifierConfig::default()).is_ok());
    }
}
