//! Authenticated identity extracted from upstream-provider headers.
//!
//! Authentication itself is out of scope: an identity-aware proxy in
//! front of this service authenticates the user and forwards an opaque
//! id (and optionally an email) in trusted headers.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;

use lettings_domain::id::UserId;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// The authenticated caller. Use as a handler parameter to require
/// authentication; requests without a user id are rejected with 401.
pub struct Identity {
    pub user_id: UserId,
    pub email: Option<String>,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let email = parts
            .headers
            .get(USER_EMAIL_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(Self {
            user_id: UserId::new(user_id),
            email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<Identity, StatusCode> {
        let (mut parts, ()) = request.into_parts();
        Identity::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn should_extract_user_id_and_email() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-1")
            .header(USER_EMAIL_HEADER, "user@example.com")
            .body(())
            .unwrap();

        let identity = extract(request).await.unwrap();

        assert_eq!(identity.user_id, UserId::new("user-1"));
        assert_eq!(identity.email.as_deref(), Some("user@example.com"));
    }

    #[tokio::test]
    async fn should_reject_request_without_user_id() {
        let request = Request::builder().body(()).unwrap();
        let result = extract(request).await;
        assert_eq!(result.err(), Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn should_treat_missing_email_as_none() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "user-1")
            .body(())
            .unwrap();

        let identity = extract(request).await.unwrap();

        assert!(identity.email.is_none());
    }
}
