use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::{context::AuthContext, require_moderator, AuthenticatedUser, MaybeAuthenticated},
    errors::AppError,
    models::dto::request::{
        CreateQuestionRequest, LeaderboardParams, QuizTestParams, SubmitTestRequest,
    },
};

/// Stable key for quota and test tracking: the subject id when signed in,
/// the caller's address otherwise.
fn subject_key(context: &Option<AuthContext>, req: &HttpRequest) -> String {
    match context {
        Some(context) => context.subject_id.clone(),
        None => req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string(),
    }
}

#[get("/test")]
pub async fn start_test(
    state: web::Data<AppState>,
    maybe: MaybeAuthenticated,
    query: web::Query<QuizTestParams>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    params.validate()?;

    let key = subject_key(&maybe.0, &req);
    let tier = maybe.0.as_ref().map(|context| context.tier);

    let test = state
        .quiz_service
        .start_test(&key, tier, params.category, &params.language())
        .await?;
    Ok(HttpResponse::Ok().json(test))
}

#[post("/test/submit")]
pub async fn submit_test(
    state: web::Data<AppState>,
    maybe: MaybeAuthenticated,
    request: web::Json<SubmitTestRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let key = subject_key(&maybe.0, &req);
    let display_name = maybe
        .0
        .as_ref()
        .map(|context| context.display_name.clone())
        .unwrap_or_else(|| "Anonymous".to_string());

    let result = state
        .quiz_service
        .submit_test(&key, &display_name, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/limit")]
pub async fn get_limit(
    state: web::Data<AppState>,
    maybe: MaybeAuthenticated,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let key = subject_key(&maybe.0, &req);
    let tier = maybe.0.as_ref().map(|context| context.tier);

    let status = state.rate_limit_service.check(&key, tier).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[get("/leaderboard")]
pub async fn get_leaderboard(
    state: web::Data<AppState>,
    query: web::Query<LeaderboardParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    params.validate()?;

    let entries = state
        .quiz_service
        .leaderboard(params.category, params.limit())
        .await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[post("")]
pub async fn create_question(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
    request: web::Json<CreateQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    require_moderator(&auth.0)?;

    let question = state.quiz_service.add_question(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(question))
}
