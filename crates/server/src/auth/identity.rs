use axum::{extract::FromRequestParts, http::request::Parts};
use models::role::Role;
use serde::Deserialize;
use std::convert::Infallible;

/// Claims of a validated access token
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContosoClaims {
    pub sub: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// The user a request acts for.
///
/// Requests that reached the handler without validated claims are anonymous:
/// no user id and no roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<String>,
    pub roles: Vec<Role>,
}

impl Caller {
    #[cfg(test)]
    pub fn new(user_id: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            roles,
        }
    }

    #[cfg(test)]
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Administrators and managers bypass owner checks
    pub fn is_staff(&self) -> bool {
        self.has_role(Role::Administrator) || self.has_role(Role::Manager)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl From<&ContosoClaims> for Caller {
    fn from(claims: &ContosoClaims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            roles: Role::parse_all(&claims.roles),
        }
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ContosoClaims>()
            .map(Caller::from)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_claims_deserialize_without_roles() {
        let claims: ContosoClaims = serde_json::from_str(r#"{"sub":"user123"}"#).unwrap();
        let caller = Caller::from(&claims);

        assert_eq!(caller.user_id(), Some("user123"));
        assert!(caller.roles.is_empty());
        assert!(!caller.is_staff());
    }

    #[test]
    fn test_staff_roles() {
        let claims: ContosoClaims = serde_json::from_str(
            r#"{"sub":"admin","roles":["ContosoAdministrators","Readers"]}"#,
        )
        .unwrap();
        let caller = Caller::from(&claims);

        assert_eq!(caller.roles, vec![Role::Administrator]);
        assert!(caller.is_staff());
        assert!(Caller::new("m", vec![Role::Manager]).is_staff());
    }

    #[tokio::test]
    async fn test_extractor_reads_claims_from_extensions() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let caller = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(caller, Caller::anonymous());

        parts.extensions.insert(ContosoClaims {
            sub: Some("user456".to_owned()),
            roles: vec!["ContosoManagers".to_owned()],
        });
        let caller = Caller::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(caller, Caller::new("user456", vec![Role::Manager]));
    }
}
