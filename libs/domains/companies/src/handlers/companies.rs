use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
    },
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::entity::companies;
use crate::error::CompanyResult;
use crate::models::{CompanyResponse, CompanyUser, CreateCompany, UpdateCompany};
use crate::repository::CompanyRepository;
use crate::service::CompanyService;

/// OpenAPI documentation for the Companies API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_companies,
        create_company,
        get_company,
        update_company,
        delete_company,
    ),
    components(
        schemas(CompanyResponse, CompanyUser, CreateCompany, UpdateCompany),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = companies::Model::TAG, description = "Company registry with tax ID verification")
    )
)]
pub struct ApiDoc;

/// Create the company router with all HTTP endpoints
pub fn router<R: CompanyRepository + 'static>(service: CompanyService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route(
            "/{id}",
            get(get_company).put(update_company).delete(delete_company),
        )
        .with_state(shared_service)
}

/// List all companies with their users
#[utoipa::path(
    get,
    path = "",
    tag = companies::Model::TAG,
    responses(
        (status = 200, description = "List of companies", body = Vec<CompanyResponse>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_companies<R: CompanyRepository>(
    State(service): State<Arc<CompanyService<R>>>,
) -> CompanyResult<Json<Vec<CompanyResponse>>> {
    let companies = service.list_companies().await?;
    Ok(Json(companies))
}

/// Register a company after verifying its tax ID
#[utoipa::path(
    post,
    path = "",
    tag = companies::Model::TAG,
    request_body = CreateCompany,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 503, response = ServiceUnavailableResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_company<R: CompanyRepository>(
    State(service): State<Arc<CompanyService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateCompany>,
) -> CompanyResult<impl IntoResponse> {
    let tax_id = input.tax_id.clone();

    let company = match service.create_company(input).await {
        Ok(company) => company,
        Err(err) => {
            AuditEvent::new("company.create", None, err.audit_outcome())
                .with_request_headers(&headers)
                .with_details(json!({ "tax_id": tax_id, "reason": err.to_string() }))
                .log();
            return Err(err);
        }
    };

    AuditEvent::new(
        "company.create",
        Some(format!("company:{}", company.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({
        "tax_id": company.tax_id,
        "legal_name": company.legal_name,
    }))
    .log();

    Ok((StatusCode::CREATED, Json(company)))
}

/// Get a company by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = companies::Model::TAG,
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company found", body = CompanyResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_company<R: CompanyRepository>(
    State(service): State<Arc<CompanyService<R>>>,
    IdPath(id): IdPath,
) -> CompanyResult<Json<CompanyResponse>> {
    let company = service.get_company(id).await?;
    Ok(Json(company))
}

/// Replace a company's fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = companies::Model::TAG,
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    request_body = UpdateCompany,
    responses(
        (status = 200, description = "Company updated", body = CompanyResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_company<R: CompanyRepository>(
    State(service): State<Arc<CompanyService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
    ValidatedJson(input): ValidatedJson<UpdateCompany>,
) -> CompanyResult<Json<CompanyResponse>> {
    let company = service.update_company(id, input).await?;

    AuditEvent::new(
        "company.update",
        Some(format!("company:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .log();

    Ok(Json(company))
}

/// Delete a company that owns no users
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = companies::Model::TAG,
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_company<R: CompanyRepository>(
    State(service): State<Arc<CompanyService<R>>>,
    headers: HeaderMap,
    IdPath(id): IdPath,
) -> CompanyResult<impl IntoResponse> {
    service.delete_company(id).await?;

    AuditEvent::new(
        "company.delete",
        Some(format!("company:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}
