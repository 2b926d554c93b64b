//! Static authorization rules, evaluated first-match in declaration order.

use axum::http::Method;

use crate::{error::AuthError, services::token::Principal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Public,
    /// At least one of the listed scopes.
    AnyScope(Vec<String>),
    Authenticated,
}

impl Requirement {
    pub fn any_scope(scopes: &[&str]) -> Self {
        Requirement::AnyScope(scopes.iter().map(|s| s.to_string()).collect())
    }

    /// Decide access for an optional principal. `None` means no token was presented.
    pub fn check(&self, principal: Option<&Principal>) -> Result<(), AuthError> {
        match (self, principal) {
            (Requirement::Public, _) => Ok(()),
            (_, None) => Err(AuthError::MissingToken),
            (Requirement::Authenticated, Some(_)) => Ok(()),
            (Requirement::AnyScope(scopes), Some(p)) if p.has_any_scope(scopes) => Ok(()),
            (Requirement::AnyScope(scopes), Some(_)) => Err(AuthError::InsufficientScope {
                required: scopes.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    Exact(String),
    /// Matches `prefix` followed by exactly one non-empty segment.
    PrefixSegment(String),
}

impl PathMatcher {
    fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Exact(p) => p == path,
            PathMatcher::PrefixSegment(prefix) => path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    method: Option<Method>,
    path: PathMatcher,
    requirement: Requirement,
}

impl Rule {
    pub fn new(method: Option<Method>, path: PathMatcher, requirement: Requirement) -> Self {
        Self { method, path, requirement }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method) && self.path.matches(path)
    }
}

#[derive(Debug, Clone)]
pub struct PolicyTable {
    rules: Vec<Rule>,
    fallback: Requirement,
}

impl PolicyTable {
    pub fn new(rules: Vec<Rule>, fallback: Requirement) -> Self {
        Self { rules, fallback }
    }

    /// The service's rule set. Anything not listed needs an authenticated caller.
    pub fn standard() -> Self {
        let exact = |p: &str| PathMatcher::Exact(p.to_string());
        Self::new(
            vec![
                Rule::new(Some(Method::GET), exact("/authorized"), Requirement::Public),
                Rule::new(
                    Some(Method::GET),
                    PathMatcher::PrefixSegment("/oauth2/authorization/".to_string()),
                    Requirement::Public,
                ),
                Rule::new(
                    Some(Method::GET),
                    exact("/messages"),
                    Requirement::any_scope(&["read", "write"]),
                ),
                Rule::new(
                    Some(Method::POST),
                    exact("/createMessage"),
                    Requirement::any_scope(&["write"]),
                ),
            ],
            Requirement::Authenticated,
        )
    }

    pub fn requirement_for(&self, method: &Method, path: &str) -> &Requirement {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.requirement)
            .unwrap_or(&self.fallback)
    }
}
