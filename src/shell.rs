//! Routing shell capabilities: route parameters, the session check and navigation.

use crate::documents::Disambiguators;

/// Parameters a document route supplies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    /// Raw path segment; may still carry a leading `:`.
    pub loan_id: String,
    pub transaction_id: Option<String>,
    /// Raw `extensionNumber` query value.
    pub extension_number: Option<String>,
}

impl RouteParams {
    pub fn new(loan_id: impl Into<String>) -> Self {
        Self {
            loan_id: loan_id.into(),
            ..Default::default()
        }
    }

    pub fn with_transaction_id(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn with_extension_number(mut self, extension_number: impl Into<String>) -> Self {
        self.extension_number = Some(extension_number.into());
        self
    }

    /// Query disambiguators; blank values are dropped and a non-numeric
    /// extension number is treated as absent.
    pub fn disambiguators(&self) -> Disambiguators {
        Disambiguators {
            transaction_id: self
                .transaction_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            extension_number: self
                .extension_number
                .as_deref()
                .and_then(|raw| raw.trim().parse::<u32>().ok())
                .filter(|n| *n > 0),
        }
    }
}

/// Decides whether the current operator has a session.
pub trait AuthGuard: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// The two session markers left behind by the login page.
#[derive(Debug, Clone, Default)]
pub struct SessionMarkers {
    pub token: Option<String>,
    pub user: Option<String>,
}

impl SessionMarkers {
    pub fn new(token: Option<String>, user: Option<String>) -> Self {
        Self { token, user }
    }

    fn present(value: &Option<String>) -> bool {
        value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
    }
}

impl AuthGuard for SessionMarkers {
    /// Redirect only happens when both markers are missing.
    fn is_authenticated(&self) -> bool {
        Self::present(&self.token) || Self::present(&self.user)
    }
}

/// Navigation primitives offered by the shell.
pub trait Navigator: Send + Sync {
    fn go_back(&self);
    fn redirect_to_login(&self);
}
