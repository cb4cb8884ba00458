use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Pricewhisper API",
        version = "0.1.0",
        description = "Registry of companies, verified by Brazilian tax ID, and their users"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/companies", api = domain_companies::handlers::companies::ApiDoc),
        (path = "/users", api = domain_companies::handlers::users::ApiDoc)
    )
)]
pub struct ApiDoc;
