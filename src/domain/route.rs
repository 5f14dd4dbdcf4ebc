// src/domain/route.rs
//! In-app locations and the guards that decide whether a view may render.
//!
//! Protected views send signed-out users to the login page and remember where
//! they were going in the `redirect` query parameter. Login and signup send
//! signed-in users on to that remembered target, or home.
use regex::Regex;
use std::fmt;
use tracing::debug;
use url::{form_urlencoded, Url};

use crate::constants::{LOGIN_PATH, REDIRECT_PARAM, ROOT_PATH};

/// Path plus query string of an in-app location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
        }
    }

    /// Parses either an absolute URL or an app-relative path such as `/notes/1?x=2`.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse("http://localhost/")?;
        let url = base.join(input)?;
        Ok(Self {
            pathname: url.path().to_string(),
            search: url.query().map(|q| format!("?{q}")).unwrap_or_default(),
        })
    }

    pub fn root() -> Self {
        Self::new(ROOT_PATH, "")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pathname, self.search)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    NewNote,
    Note(String),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Unauthenticated,
}

impl Route {
    pub fn resolve(pathname: &str) -> Self {
        let trimmed = pathname.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').skip(1).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["notes", "new"] => Route::NewNote,
            ["notes", id] if !id.is_empty() => Route::Note((*id).to_string()),
            _ => Route::NotFound,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home | Route::NotFound => Access::Public,
            Route::NewNote | Route::Note(_) => Access::Authenticated,
            Route::Login | Route::Signup => Access::Unauthenticated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    Redirect(String),
}

/// Builds `/login?redirect=<encoded path and query>` for a protected location.
pub fn login_redirect(location: &Location) -> String {
    let target: String = form_urlencoded::byte_serialize(location.to_string().as_bytes()).collect();
    format!("{LOGIN_PATH}?{REDIRECT_PARAM}={target}")
}

pub fn authenticated_route(is_authenticated: bool, location: &Location) -> RouteDecision {
    if is_authenticated {
        RouteDecision::Render
    } else {
        RouteDecision::Redirect(login_redirect(location))
    }
}

pub fn unauthenticated_route(is_authenticated: bool, location: &Location) -> RouteDecision {
    if !is_authenticated {
        return RouteDecision::Render;
    }
    match querystring(REDIRECT_PARAM, &location.search) {
        Some(target) if !target.is_empty() => RouteDecision::Redirect(target),
        _ => RouteDecision::Redirect(ROOT_PATH.to_string()),
    }
}

/// Reads a query parameter from a URL or query string.
///
/// Returns `None` when the parameter is absent and `Some("")` when it has no
/// value. `+` decodes to a space and percent escapes are decoded.
pub fn querystring(name: &str, url: &str) -> Option<String> {
    let pattern = format!(r"(?i)[?&]{}(=([^&#]*)|&|#|$)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(url)?;
    let raw = match caps.get(2) {
        Some(m) => m.as_str(),
        None => return Some(String::new()),
    };
    let decoded = form_urlencoded::parse(format!("v={raw}").as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();
    Some(decoded)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub decision: RouteDecision,
}

/// Resolves a location to a view and applies the guard for its access class.
#[derive(Debug, Default)]
pub struct Router;

impl Router {
    pub fn new() -> Self {
        Self
    }

    pub fn navigate(&self, is_authenticated: bool, location: &Location) -> Navigation {
        let route = Route::resolve(&location.pathname);
        let decision = match route.access() {
            Access::Public => RouteDecision::Render,
            Access::Authenticated => authenticated_route(is_authenticated, location),
            Access::Unauthenticated => unauthenticated_route(is_authenticated, location),
        };
        debug!(?route, ?decision, %location, is_authenticated, "Navigated");
        Navigation { route, decision }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/", Route::Home)]
    #[case("", Route::Home)]
    #[case("/login", Route::Login)]
    #[case("/signup/", Route::Signup)]
    #[case("/notes/new", Route::NewNote)]
    #[case("/notes/abc-123", Route::Note("abc-123".to_string()))]
    #[case("/notes", Route::NotFound)]
    #[case("/settings/profile", Route::NotFound)]
    fn given_pathname_when_resolving_then_matches_route(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::resolve(path), expected);
    }

    #[test]
    fn given_signed_out_user_when_opening_protected_view_then_redirects_to_login_with_target() {
        let location = Location::new("/notes/42", "?tab=files");

        let decision = authenticated_route(false, &location);

        assert_eq!(
            decision,
            RouteDecision::Redirect("/login?redirect=%2Fnotes%2F42%3Ftab%3Dfiles".to_string())
        );
    }

    #[test]
    fn given_signed_in_user_when_opening_protected_view_then_renders() {
        let location = Location::new("/notes/new", "");
        assert_eq!(authenticated_route(true, &location), RouteDecision::Render);
    }

    #[test]
    fn given_login_redirect_when_reading_target_back_then_recovers_path_and_query() {
        let protected = Location::new("/notes/42", "?tab=files&sort=asc");
        let login = Location::parse(&login_redirect(&protected)).expect("valid login url");

        let decision = unauthenticated_route(true, &login);

        assert_eq!(
            decision,
            RouteDecision::Redirect("/notes/42?tab=files&sort=asc".to_string())
        );
    }

    #[test]
    fn given_signed_in_user_without_target_when_opening_login_then_redirects_home() {
        let location = Location::new("/login", "");
        assert_eq!(
            unauthenticated_route(true, &location),
            RouteDecision::Redirect("/".to_string())
        );
    }

    #[test]
    fn given_signed_in_user_with_empty_target_when_opening_signup_then_redirects_home() {
        let location = Location::new("/signup", "?redirect=");
        assert_eq!(
            unauthenticated_route(true, &location),
            RouteDecision::Redirect("/".to_string())
        );
    }

    #[test]
    fn given_signed_out_user_when_opening_login_then_renders() {
        let location = Location::new("/login", "?redirect=%2Fnotes%2F1");
        assert_eq!(unauthenticated_route(false, &location), RouteDecision::Render);
    }

    #[rstest]
    #[case("http://localhost/login?redirect=%2Fnotes%2F1", Some("/notes/1"))]
    #[case("?REDIRECT=/notes/1", Some("/notes/1"))]
    #[case("?a=1&redirect=hello+world&b=2", Some("hello world"))]
    #[case("?redirect&x=1", Some(""))]
    #[case("?redirect#frag", Some(""))]
    #[case("?redirect", Some(""))]
    #[case("?redirect=/notes?x=1", Some("/notes?x=1"))]
    #[case("?other=1", None)]
    #[case("", None)]
    fn given_url_when_reading_querystring_then_decodes_value(
        #[case] url: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(querystring("redirect", url).as_deref(), expected);
    }

    #[test]
    fn given_absolute_url_when_parsing_location_then_keeps_path_and_query() {
        let location = Location::parse("https://scratch.example.com/notes/7?x=1").unwrap();
        assert_eq!(location.pathname, "/notes/7");
        assert_eq!(location.search, "?x=1");
        assert_eq!(location.to_string(), "/notes/7?x=1");
    }

    #[test]
    fn given_router_when_navigating_public_home_then_always_renders() {
        let router = Router::new();
        let nav = router.navigate(false, &Location::root());
        assert_eq!(nav.route, Route::Home);
        assert_eq!(nav.decision, RouteDecision::Render);
    }

    #[test]
    fn given_router_when_signed_out_user_opens_note_then_redirects() {
        let router = Router::new();
        let nav = router.navigate(false, &Location::new("/notes/9", ""));
        assert_eq!(nav.route, Route::Note("9".to_string()));
        assert_eq!(
            nav.decision,
            RouteDecision::Redirect("/login?redirect=%2Fnotes%2F9".to_string())
        );
    }
}
