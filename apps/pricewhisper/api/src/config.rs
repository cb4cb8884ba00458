use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_companies::VerifierConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config pieces.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub verifier: VerifierConfig,
    pub environment: Environment,
    /// Apply pending migrations before serving (`RUN_MIGRATIONS`, default true)
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DATABASE_URL is required
        let server = ServerConfig::from_env()?;
        let verifier = VerifierConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            verifier,
            environment,
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_companies::VerifierMode;

    #[test]
    fn test_from_env_requires_database_url() {
        temp_env::with_var_unset("DATABASE_URL", || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/pricewhisper")),
                ("PORT", None),
                ("RUN_MIGRATIONS", None),
                ("VERIFIER_MODE", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.app.name, "pricewhisper_api");
                assert_eq!(config.database.url(), "postgresql://localhost/pricewhisper");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.verifier.mode, VerifierMode::Cnpja);
                assert!(config.run_migrations);
            },
        );
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/pricewhisper")),
                ("PORT", Some("3000")),
                ("RUN_MIGRATIONS", Some("false")),
                ("VERIFIER_MODE", Some("static")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.server.port, 3000);
                assert_eq!(config.verifier.mode, VerifierMode::Static);
                assert!(!config.run_migrations);
            },
        );
    }

    #[test]
    fn test_invalid_run_migrations_is_rejected() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/pricewhisper")),
                ("RUN_MIGRATIONS", Some("sometimes")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
