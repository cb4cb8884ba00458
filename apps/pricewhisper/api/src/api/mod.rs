use axum::Router;

use crate::state::AppState;

pub mod companies;
pub mod health;
pub mod users;

/// API routes without the `/api` prefix; `create_router` adds it.
///
/// Every sub-router has its state applied, so the result is stateless.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/companies", companies::router(state))
        .nest("/users", users::router(state))
}

/// `/ready`, with state applied so it can be merged into the app router.
pub fn ready_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::config::{Config, Environment};
    use crate::state::AppState;
    use core_config::{app_info, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use domain_companies::{StaticTaxIdVerifier, VerifierConfig};
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;

    pub fn state(db: DatabaseConnection) -> AppState {
        AppState {
            config: Config {
                app: app_info!(),
                database: PostgresConfig::new("postgresql://localhost/test"),
                server: ServerConfig::default(),
                verifier: VerifierConfig::default(),
                environment: Environment::Development,
                run_migrations: false,
            },
            db,
            verifier: Arc::new(StaticTaxIdVerifier::well_formed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use domain_companies::entity::{companies, users};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use tower::ServiceExt;

    fn app() -> Router {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        routes(&test_support::state(db))
    }

    #[tokio::test]
    async fn test_company_and_user_routes_are_mounted() {
        for uri in ["/companies/abc", "/users/abc"] {
            let response = app()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_zero_id_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .append_query_results([Vec::<companies::Model>::new()])
            .into_connection();
        let app = routes(&test_support::state(db));

        for uri in ["/users/0", "/companies/0"] {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app()
            .oneshot(Request::get("/products").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
