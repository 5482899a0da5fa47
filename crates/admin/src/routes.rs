//! Screen routes and the authentication guard.

use backoffice_core::{OrderId, ProductId};

use crate::models::Session;

/// A screen of the back office.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Login,
    Products,
    Orders,
    OrderDetail(OrderId),
    Users,
    Reviews,
    ProductReviews(ProductId),
    Analytics,
    Faqs,
    ProductFaqs(ProductId),
}

/// Outcome of guarding a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show this route.
    Render(Route),
    /// Replace the location with this route.
    Redirect(Route),
}

impl Route {
    /// Sidebar entries, in display order.
    pub const NAV: [Self; 7] = [
        Self::Dashboard,
        Self::Products,
        Self::Orders,
        Self::Users,
        Self::Reviews,
        Self::Faqs,
        Self::Analytics,
    ];

    /// Match a location path. Query strings, fragments and a trailing slash
    /// are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] => Self::Dashboard,
            ["login"] => Self::Login,
            ["products"] => Self::Products,
            ["orders"] => Self::Orders,
            ["orders", id] => Self::OrderDetail(OrderId::new(*id)),
            ["users"] => Self::Users,
            ["reviews"] => Self::Reviews,
            ["reviews", product_id] => Self::ProductReviews(ProductId::new(*product_id)),
            ["analytics"] => Self::Analytics,
            ["faqs"] => Self::Faqs,
            ["faqs", product_id] => Self::ProductFaqs(ProductId::new(*product_id)),
            _ => return None,
        };
        Some(route)
    }

    /// Location path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Dashboard => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Products => "/products".to_owned(),
            Self::Orders => "/orders".to_owned(),
            Self::OrderDetail(id) => format!("/orders/{id}"),
            Self::Users => "/users".to_owned(),
            Self::Reviews => "/reviews".to_owned(),
            Self::ProductReviews(product_id) => format!("/reviews/{product_id}"),
            Self::Analytics => "/analytics".to_owned(),
            Self::Faqs => "/faqs".to_owned(),
            Self::ProductFaqs(product_id) => format!("/faqs/{product_id}"),
        }
    }

    /// Page heading.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Login => "Login",
            Self::Products => "Products",
            Self::Orders => "Orders",
            Self::OrderDetail(_) => "Order Details",
            Self::Users => "Users",
            Self::Reviews => "Reviews",
            Self::ProductReviews(_) => "Review Details",
            Self::Analytics => "Analytics",
            Self::Faqs => "FAQs",
            Self::ProductFaqs(_) => "FAQ Details",
        }
    }

    /// Only `/login` is reachable without a session.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// Apply the session guard to this route.
    #[must_use]
    pub fn guard(self, session: &Session) -> Navigation {
        match (session.is_authenticated(), self.is_public()) {
            (false, false) => Navigation::Redirect(Self::Login),
            (true, true) => Navigation::Redirect(Self::Dashboard),
            _ => Navigation::Render(self),
        }
    }

    /// Resolve a location path for `session`.
    ///
    /// Unknown paths go to `/login` without a session and to `/` with one.
    #[must_use]
    pub fn resolve(path: &str, session: &Session) -> Navigation {
        match Self::parse(path) {
            Some(route) => route.guard(session),
            None if session.is_authenticated() => Navigation::Redirect(Self::Dashboard),
            None => Navigation::Redirect(Self::Login),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}
