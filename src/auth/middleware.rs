use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::{Claims, TokenService};
use crate::error::AppError;

/// Verifies the bearer token of every request passing through the wrapped scope.
///
/// On success the decoded `Claims` are stored in the request extensions for the
/// `AuthenticatedUser` extractor. On failure the request is answered with 401 and the
/// wrapped service never runs. Requires a `web::Data<TokenService>` in app data.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then_some(token.trim())
        })
        .filter(|token| !token.is_empty())
}

fn verify_request(req: &ServiceRequest) -> Result<Claims, AppError> {
    let tokens = req.app_data::<web::Data<TokenService>>().ok_or_else(|| {
        AppError::InternalServerError("TokenService is not registered as app data".into())
    })?;

    match bearer_token(req) {
        Some(token) => tokens.verify(token),
        None => Err(AppError::Unauthorized("Not authenticated".into())),
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match verify_request(&req) {
            Ok(claims) => {
                log::debug!("Authenticated user {} for {}", claims.id, req.path());
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            Err(app_err) => {
                log::debug!("Rejected request to {}: {}", req.path(), app_err);
                let response = req.into_response(app_err.error_response());
                Box::pin(async move { Ok(response.map_into_right_body()) })
            }
        }
    }
}
