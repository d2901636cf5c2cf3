//! Route resolution and request dispatch.
//!
//! # Routing Table
//! ```text
//! GET  /signin, /homepage, /   → sign-in page
//! GET  /input/<username>       → survey page, or redirect to sign-in if unknown
//! POST /signin                 → create identity, redirect to /input/<username>
//! POST /input/<username>       → apply survey input, redirect to /input/<username>
//! anything else                → not-found page
//! ```
//!
//! # Design Decisions
//! - Exact path matching, no prefixes or patterns beyond `/input/<username>`
//! - Validation failures are survey transitions, never HTTP errors

use crate::http::request::{Method, Request};
use crate::http::response::{self, Response};
use crate::survey::IdentityStore;

const SURVEY_PREFIX: &str = "/input/";

/// A resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SignInPage,
    SurveyPage(String),
    SignIn,
    SubmitAnswer(String),
    NotFound,
}

impl Route {
    /// Resolve a method and path against the routing table.
    pub fn resolve(method: &Method, path: &str) -> Self {
        match method {
            Method::Get => match path {
                "/signin" | "/homepage" | "/" => Route::SignInPage,
                _ => survey_username(path).map_or(Route::NotFound, Route::SurveyPage),
            },
            Method::Post => match path {
                "/signin" => Route::SignIn,
                _ => survey_username(path).map_or(Route::NotFound, Route::SubmitAnswer),
            },
            Method::Other(_) => Route::NotFound,
        }
    }
}

/// Username in `/input/<username>`: the first segment, cut at `&`.
fn survey_username(path: &str) -> Option<String> {
    let rest = path.strip_prefix(SURVEY_PREFIX)?;
    let segment = rest.split('/').next().unwrap_or_default();
    let username = segment.split('&').next().unwrap_or_default();
    if username.is_empty() {
        None
    } else {
        Some(username.to_string())
    }
}

/// Turns decoded requests into responses against a shared identity store.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    store: IdentityStore,
    public_url: String,
}

impl Dispatcher {
    pub fn new(store: IdentityStore, public_url: impl Into<String>) -> Self {
        Self {
            store,
            public_url: public_url.into(),
        }
    }

    pub fn store(&self) -> &IdentityStore {
        &self.store
    }

    /// Compute the single response for `request`.
    pub fn dispatch(&self, request: &Request) -> Response {
        match Route::resolve(&request.method, &request.path) {
            Route::SignInPage => response::signin_page(),
            Route::SurveyPage(username) => match self.store.get(&username) {
                Some(identity) => response::survey_page(&username, &identity.transcript),
                None => {
                    tracing::debug!(username = %username, "Survey page for unknown user");
                    self.redirect("signin")
                }
            },
            Route::SignIn => {
                let username = request.body_value.split('&').next().unwrap_or_default();
                if username.is_empty() {
                    return self.redirect("signin");
                }
                self.store.create_if_absent(username);
                self.redirect(&format!("input/{}", username))
            }
            Route::SubmitAnswer(username) => {
                match self.store.submit(&username, &request.body_value) {
                    Some((outcome, step)) => {
                        tracing::info!(username = %username, outcome = %outcome, step, "Survey step");
                        self.redirect(&format!("input/{}", username))
                    }
                    None => {
                        tracing::debug!(username = %username, "Survey input for unknown user");
                        self.redirect("signin")
                    }
                }
            }
            Route::NotFound => response::not_found_page(),
        }
    }

    fn redirect(&self, slug: &str) -> Response {
        response::redirect(&self.public_url, slug)
    }
}
