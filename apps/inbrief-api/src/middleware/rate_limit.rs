//! Rate limiting middleware for the login route.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;

use inbrief_core::ports::RateLimiter;

use crate::middleware::error::AppError;

/// Rate limiting middleware factory, keyed by client IP.
///
/// The key is the socket peer address. `Forwarded` / `X-Forwarded-For` are
/// only read when the server sits behind a proxy that overwrites them.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
    trust_forwarded_for: bool,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self {
            limiter,
            trust_forwarded_for: false,
        }
    }

    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            trust_forwarded_for: self.trust_forwarded_for,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
    trust_forwarded_for: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();

        let key = client_key(&req, self.trust_forwarded_for);

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!(client = %key, "Login rate limit exceeded");

                    let retry_after = result.reset_after.as_secs().max(1);
                    let response = AppError::TooManyRequests(retry_after).error_response();
                    let (http_req, _payload) = req.into_parts();
                    return Ok(ServiceResponse::new(http_req, response).map_into_right_body());
                }
                Ok(_) => {}
                Err(e) => {
                    // Fail open
                    tracing::error!(error = %e, "Rate limiter error");
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn client_key(req: &ServiceRequest, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        if let Some(ip) = req.connection_info().realip_remote_addr() {
            return ip.to_string();
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn request() -> ServiceRequest {
        TestRequest::default()
            .peer_addr("10.1.2.3:50412".parse().unwrap())
            .insert_header(("x-forwarded-for", "203.0.113.7"))
            .to_srv_request()
    }

    #[test]
    fn test_key_ignores_forwarded_header_by_default() {
        assert_eq!(client_key(&request(), false), "10.1.2.3");
    }

    #[test]
    fn test_key_uses_forwarded_header_when_trusted() {
        assert_eq!(client_key(&request(), true), "203.0.113.7");
    }

    #[test]
    fn test_key_without_peer() {
        let req = TestRequest::default().to_srv_request();
        assert_eq!(client_key(&req, false), "unknown");
    }
}
