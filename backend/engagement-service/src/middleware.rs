/// Identity resolution for HTTP requests.
///
/// `IdentityResolver` validates a Bearer session token and stores the durable
/// user id in request extensions. Handlers declare identity as a typed
/// `UserId` argument; extracting it on a request with no resolved identity
/// fails with Unauthorized before any store access. Public read handlers
/// simply do not declare it.
use crate::error::AppError;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

/// Resolved user identifier stored in request extensions.
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

/// Session token claims: `sub` carries the durable user id.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Actix middleware that resolves the session identity when a Bearer token
/// is present. Resolution is non-fatal: a missing or unresolvable token
/// leaves the request anonymous, so public reads always serve. Enforcement
/// lives in the `UserId` extractor, which fails with Unauthorized on any
/// handler that requires an identity.
pub struct IdentityResolver {
    secret: Rc<String>,
}

impl IdentityResolver {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Rc::new(secret.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityResolver
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityResolverService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityResolverService {
            service: Rc::new(service),
            secret: self.secret.clone(),
        }))
    }
}

pub struct IdentityResolverService<S> {
    service: Rc<S>,
    secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for IdentityResolverService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let secret = self.secret.clone();

        Box::pin(async move {
            let bearer = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(str::to_owned);

            if let Some(token) = bearer {
                match resolve_token(&token, &secret) {
                    Ok(user_id) => {
                        req.extensions_mut().insert(UserId(user_id));
                    }
                    Err(reason) => {
                        // Anonymous-allowed routes must still serve; routes
                        // that need an identity fail in the extractor.
                        tracing::warn!(reason = %reason, "session token did not resolve");
                    }
                }
            }

            service.call(req).await
        })
    }
}

fn resolve_token(token: &str, secret: &str) -> Result<Uuid, String> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| "invalid or expired session token".to_string())?;

    Uuid::parse_str(&data.claims.sub).map_err(|_| "malformed subject in session token".to_string())
}

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .cloned()
                .ok_or_else(|| AppError::Unauthorized("no resolvable identity".to_string())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    fn sign(sub: &str, secret: &str) -> String {
        let claims = TestClaims {
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_resolves_to_subject() {
        let user = Uuid::new_v4();
        let token = sign(&user.to_string(), "secret");
        assert_eq!(resolve_token(&token, "secret").unwrap(), user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign(&Uuid::new_v4().to_string(), "secret");
        assert!(resolve_token(&token, "other").is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let token = sign("not-a-uuid", "secret");
        assert!(resolve_token(&token, "secret").is_err());
    }

    mod routing {
        use super::*;
        use actix_web::{test, web, App, HttpResponse};

        async fn public_handler() -> HttpResponse {
            HttpResponse::Ok().finish()
        }

        async fn private_handler(user_id: UserId) -> HttpResponse {
            HttpResponse::Ok().json(user_id.0)
        }

        macro_rules! resolver_app {
            () => {
                test::init_service(
                    App::new().service(
                        web::scope("/api/v1")
                            .wrap(IdentityResolver::new("secret"))
                            .route("/public", web::get().to(public_handler))
                            .route("/private", web::get().to(private_handler)),
                    ),
                )
                .await
            };
        }

        #[actix_web::test]
        async fn anonymous_request_reaches_public_route() {
            let app = resolver_app!();

            let req = test::TestRequest::get().uri("/api/v1/public").to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
        }

        #[actix_web::test]
        async fn unresolvable_token_does_not_block_public_route() {
            let app = resolver_app!();

            // An expired or garbage token degrades to anonymous; a public
            // read must serve rather than return 401.
            let req = test::TestRequest::get()
                .uri("/api/v1/public")
                .insert_header(("Authorization", "Bearer garbage"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
        }

        #[actix_web::test]
        async fn missing_identity_is_unauthorized_on_protected_route() {
            let app = resolver_app!();

            let req = test::TestRequest::get().uri("/api/v1/private").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        }

        #[actix_web::test]
        async fn unresolvable_token_is_unauthorized_on_protected_route() {
            let app = resolver_app!();

            let req = test::TestRequest::get()
                .uri("/api/v1/private")
                .insert_header(("Authorization", "Bearer garbage"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        }

        #[actix_web::test]
        async fn valid_token_resolves_identity_on_protected_route() {
            let app = resolver_app!();

            let user = Uuid::new_v4();
            let token = sign(&user.to_string(), "secret");
            let req = test::TestRequest::get()
                .uri("/api/v1/private")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request();
            let resolved: Uuid = test::call_and_read_body_json(&app, req).await;
            assert_eq!(resolved, user);
        }
    }
}
