use std::rc::Rc;

use actix_service::{forward_ready, Service};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures::future::{ok, LocalBoxFuture, Ready};
use serde_json::json;

use crate::auth::{Claims, TokenIssuer};

/// Rejects requests without a valid bearer token.
pub struct AuthMiddleware {
    tokens: TokenIssuer,
}

impl AuthMiddleware {
    pub fn new(tokens: TokenIssuer) -> Self {
        AuthMiddleware { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    tokens: TokenIssuer,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let service = self.service.clone();
        let claims = authenticate(&req, &self.tokens);

        Box::pin(async move {
            match claims {
                Ok(claims) => {
                    log::debug!("{} {} as {}", req.method(), req.path(), claims.sub);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(reason) => {
                    log::warn!("rejected {} {}: {reason}", req.method(), req.path());
                    let response = HttpResponse::Unauthorized().json(json!({ "error": reason }));
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

fn authenticate(req: &ServiceRequest, tokens: &TokenIssuer) -> Result<Claims, &'static str> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or("Authorization header missing")?;
    let value = header
        .to_str()
        .map_err(|_| "Invalid authorization header")?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or("Invalid authorization scheme")?;

    tokens.verify(token).map_err(|_| "Invalid token")
}
