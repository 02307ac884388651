use actix_web::{get, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{
        PaginationParams, UpdateProfileRequest, UpdateRoleRequest, UpdateSubscriptionRequest,
    },
};

#[get("/me")]
pub async fn get_profile(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let profile = state.user_service.get_profile(&auth.0.subject_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[put("/me")]
pub async fn update_profile(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let profile = state
        .user_service
        .update_profile(&auth.0.subject_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[get("")]
pub async fn list_users(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let pagination = query.into_inner();
    let response = state
        .user_service
        .list_users(pagination.offset(), pagination.limit())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/{id}/role")]
pub async fn set_user_role(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    target_id: web::Path<String>,
    request: web::Json<UpdateRoleRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let response = state
        .user_service
        .set_role(&auth.0, &target_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/{id}/subscription")]
pub async fn set_subscription(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    target_id: web::Path<String>,
    request: web::Json<UpdateSubscriptionRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let response = state
        .user_service
        .set_subscription(&target_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(state: web::Data<AppState>) -> HttpResponse {
    let db_health = state.db.health_check().await;

    let status = if db_health.is_ok() {
        "ready"
    } else {
        "not_ready"
    };

    let response = serde_json::json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "mongodb": if db_health.is_ok() { "ok" } else { "error" }
        }
    });

    if db_health.is_ok() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[get("/health/live")]
pub async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
