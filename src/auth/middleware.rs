use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;

use crate::{auth::context::AuthContext, errors::AppError, services::AuthService};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GateMode {
    /// Requests without a resolvable identity are rejected.
    Mandatory,
    /// Requests proceed either way; a resolvable identity is attached when
    /// present, credential failures fall through to anonymous.
    Optional,
}

/// Route-scope middleware that resolves the bearer credential into an
/// [`AuthContext`] and stores it in the request extensions for the
/// [`AuthenticatedUser`] and [`MaybeAuthenticated`] extractors.
pub struct AuthGate {
    mode: GateMode,
}

impl AuthGate {
    pub fn mandatory() -> Self {
        Self {
            mode: GateMode::Mandatory,
        }
    }

    pub fn optional() -> Self {
        Self {
            mode: GateMode::Optional,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service: Rc::new(service),
            mode: self.mode,
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
    mode: GateMode,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let mode = self.mode;

        Box::pin(async move {
            let Some(auth_service) = req.app_data::<web::Data<AuthService>>().cloned() else {
                let err = AppError::InternalError("Auth service not configured".to_string());
                return Ok(req.error_response(err).map_into_right_body());
            };

            let header = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_owned());

            let outcome = match mode {
                GateMode::Mandatory => {
                    auth_service.authenticate(header.as_deref()).await.map(Some)
                }
                GateMode::Optional => auth_service.authenticate_optional(header.as_deref()).await,
            };

            match outcome {
                Ok(Some(context)) => {
                    req.extensions_mut().insert(context);
                }
                Ok(None) => {}
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Extractor for handlers behind a mandatory gate.
pub struct AuthenticatedUser(pub AuthContext);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let context = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AppError::MissingCredential("Not authenticated".to_string()));

        ready(context.map(AuthenticatedUser))
    }
}

/// Extractor for handlers behind an optional gate. `None` is an anonymous
/// caller.
pub struct MaybeAuthenticated(pub Option<AuthContext>);

impl FromRequest for MaybeAuthenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(MaybeAuthenticated(
            req.extensions().get::<AuthContext>().cloned(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use crate::test_utils::fixtures::make_user;

    fn context() -> AuthContext {
        AuthContext::new("subject-1", &make_user("user@example.com"), "root@example.com")
    }

    #[actix_web::test]
    async fn test_authenticated_user_reads_extensions() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(context());

        let user = AuthenticatedUser::from_request(&req, &mut actix_web::dev::Payload::None)
            .await
            .unwrap();

        assert_eq!(user.0.subject_id, "subject-1");
    }

    #[actix_web::test]
    async fn test_authenticated_user_requires_context() {
        let req = TestRequest::default().to_http_request();

        let result = AuthenticatedUser::from_request(&req, &mut actix_web::dev::Payload::None).await;

        assert!(matches!(result, Err(AppError::MissingCredential(_))));
    }

    #[actix_web::test]
    async fn test_maybe_authenticated_is_none_without_context() {
        let req = TestRequest::default().to_http_request();

        let maybe = MaybeAuthenticated::from_request(&req, &mut actix_web::dev::Payload::None)
            .await
            .unwrap();

        assert!(maybe.0.is_none());
    }

    #[actix_web::test]
    async fn test_maybe_authenticated_carries_context() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(context());

        let maybe = MaybeAuthenticated::from_request(&req, &mut actix_web::dev::Payload::None)
            .await
            .unwrap();

        assert_eq!(maybe.0.unwrap().email, "user@example.com");
    }
}
