//! Authorization Gate.
//!
//! Every gated request goes through [`authorize`]:
//!
//! 1. No `Authorization` header: the caller is a guest.
//! 2. A bearer token is validated by the session manager. Anything else in the
//!    header, or a token that fails validation, is rejected with code 1.
//! 3. Blocked users are rejected with code 13.
//! 4. The matched route template and method are looked up in the access table.
//!    A guest denied on a listed route gets 401 (code 5). Every other denial,
//!    including unlisted routes, is 403 (code 6).

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, MatchedPath, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use printshop_auth::{AuthError, AuthenticatedIdentity, SessionManager};
use printshop_config::{AccessRole, AccessTable};
use printshop_core::AppError;
use printshop_models::UserId;
use tracing::debug;

/// Resolved caller of the current request. `None` means guest.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub identity: Option<AuthenticatedIdentity>,
}

impl RequestContext {
    pub fn role(&self) -> AccessRole {
        self.identity
            .as_ref()
            .map_or(AccessRole::Guest, AuthenticatedIdentity::access_role)
    }

    pub fn is_admin(&self) -> bool {
        self.identity.as_ref().is_some_and(AuthenticatedIdentity::is_admin)
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Extractor for handlers that need a signed-in caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedIdentity);

impl CurrentUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .and_then(|ctx| ctx.identity.clone())
            .map(CurrentUser)
            .ok_or_else(AppError::unauthorized)
    }
}

#[derive(Clone)]
pub struct AuthGate {
    sessions: Arc<SessionManager>,
    access: Arc<AccessTable>,
    base_path: Arc<str>,
}

impl AuthGate {
    pub fn new(
        sessions: Arc<SessionManager>,
        access: Arc<AccessTable>,
        base_path: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            sessions,
            access,
            base_path: base_path.into(),
        }
    }

    /// Turns a matched route template into an access table key.
    ///
    /// `/api/v1/products/{id}` becomes `/products/{id}`; a trailing slash is dropped.
    pub fn route_key<'a>(&self, matched: &'a str) -> &'a str {
        let relative = matched
            .strip_prefix(&*self.base_path)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(matched);

        match relative.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        }
    }

    async fn identify(&self, parts: &mut Parts) -> Result<Option<AuthenticatedIdentity>, AppError> {
        let bearer =
            match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, &()).await {
                Ok(TypedHeader(Authorization(bearer))) => bearer,
                Err(rejection) if rejection.is_missing() => return Ok(None),
                Err(_) => {
                    debug!("rejecting malformed authorization header");
                    return Err(AppError::invalid_token());
                }
            };

        let identity = self.sessions.validate_token(bearer.token()).await?;
        if identity.is_blocked() {
            return Err(AuthError::UserIsBlocked.into());
        }

        Ok(Some(identity))
    }

    fn check(&self, route: &str, method: &str, caller: &RequestContext) -> Result<(), AppError> {
        let role = caller.role();
        let listed = self.access.allowed_roles(route, method);
        let allowed = listed.is_some_and(|roles| roles.contains(&role));
        printshop_observability::track_authorization(allowed, role.as_str());

        if allowed {
            return Ok(());
        }

        debug!(route, method, role = role.as_str(), "access denied");
        // Only a listed route can be unlocked by signing in.
        match (role, listed) {
            (AccessRole::Guest, Some(_)) => Err(AppError::unauthorized()),
            _ => Err(AppError::forbidden()),
        }
    }
}

pub async fn authorize(
    State(gate): State<AuthGate>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let matched = parts
        .extensions
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| parts.uri.path().to_owned());
    let route = gate.route_key(&matched).to_owned();

    let context = RequestContext {
        identity: gate.identify(&mut parts).await?,
    };
    gate.check(&route, parts.method.as_str(), &context)?;

    parts.extensions.insert(context);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use printshop_auth::memory::{MemorySecretStore, MemoryUserDirectory};
    use printshop_core::{CredentialHasher, ErrorCode};
    use std::time::Duration;

    fn gate_with(base_path: &str, access: AccessTable) -> AuthGate {
        let sessions = SessionManager::new(
            Arc::new(MemoryUserDirectory::new()),
            Arc::new(MemorySecretStore::new()),
            CredentialHasher::salted_sha256("salt"),
            Duration::from_secs(60),
            Duration::from_secs(60),
        );
        AuthGate::new(Arc::new(sessions), Arc::new(access), base_path)
    }

    fn gate(base_path: &str) -> AuthGate {
        gate_with(base_path, AccessTable::default())
    }

    #[test]
    fn test_route_key_strips_base_path() {
        let gate = gate("/api/v1");
        assert_eq!(gate.route_key("/api/v1/products/{id}"), "/products/{id}");
        assert_eq!(gate.route_key("/api/v1/products/"), "/products");
        assert_eq!(gate.route_key("/products"), "/products");
        assert_eq!(gate.route_key("/api/v1"), "/");
    }

    #[test]
    fn test_route_key_requires_segment_boundary() {
        let gate = gate("/api/v1");
        assert_eq!(gate.route_key("/api/v10/orders"), "/api/v10/orders");
    }

    #[test]
    fn test_guest_denied_on_listed_route_is_unauthorized() {
        let access = AccessTable::from_json_str(r#"{"/cart": {"GET": ["customer"]}}"#).unwrap();
        let gate = gate_with("/api/v1", access);

        let err = gate
            .check("/cart", "GET", &RequestContext::default())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_unlisted_route_is_forbidden_even_for_guests() {
        let access = AccessTable::from_json_str(r#"{"/cart": {"GET": ["customer"]}}"#).unwrap();
        let gate = gate_with("/api/v1", access);

        for (route, method) in [("/cart", "DELETE"), ("/reports", "GET")] {
            let err = gate
                .check(route, method, &RequestContext::default())
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::Forbidden);
        }
    }

    #[test]
    fn test_request_context_defaults_to_guest() {
        let ctx = RequestContext::default();
        assert_eq!(ctx.role(), AccessRole::Guest);
        assert!(!ctx.is_admin());
    }
}
