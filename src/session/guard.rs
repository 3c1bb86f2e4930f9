use crate::api::types::Role;
use crate::session::Session;

/// Outcome of a protected navigation. The caller decides presentation;
/// the guard only classifies.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// Startup validation still in flight. Render a placeholder and do
    /// not redirect, so protected content never flashes either way.
    Pending,
    Render,
    /// No valid session. Go to the login route, remembering the
    /// originally requested path so login can return there.
    Redirect { to: String, from: String },
    /// Valid session, insufficient role. Rendered in place rather than
    /// redirected so the user sees why.
    Deny,
}

/// What a protected region demands of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    Authenticated,
    /// Role must be a member of the set. Exact, case sensitive match.
    Role(Vec<Role>),
}

impl Requirement {
    pub fn role(role: impl Into<String>) -> Self {
        Requirement::Role(vec![Role::new(role)])
    }

    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Requirement::Role(roles.into_iter().map(Role::new).collect())
    }
}

pub struct RouteGuard {
    login_route: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new("/login")
    }
}

impl RouteGuard {
    pub fn new(login_route: impl Into<String>) -> Self {
        Self {
            login_route: login_route.into(),
        }
    }

    /// Classify access to `requested`. Evaluated from the snapshot on
    /// every call; decisions are never cached across state changes.
    pub fn authorize(&self, session: &Session, requested: &str, requirement: &Requirement) -> Access {
        if session.is_loading {
            return Access::Pending;
        }

        if !session.is_authenticated {
            return Access::Redirect {
                to: self.login_route.clone(),
                from: requested.to_owned(),
            };
        }

        match requirement {
            Requirement::Authenticated => Access::Render,
            Requirement::Role(allowed) => match session.user.as_ref() {
                Some(user) if allowed.contains(&user.role) => Access::Render,
                _ => Access::Deny,
            },
        }
    }
}
