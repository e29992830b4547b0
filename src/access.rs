//! Roles, per-role tab visibility, and role-gated route resolution.
//!
//! The signed-in user is an explicit [`UserContext`] handed to the router; there
//! is no ambient session.

use crate::core::DataSource;
use derive_deref::{Deref, DerefMut};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub email: String,
    pub role: Role,
}

impl UserContext {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Data tabs of the navigation bar
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NavTab {
    MarketLines,
    MyLibrary,
    Explore,
}

impl NavTab {
    pub fn page(&self) -> Page {
        match self {
            Self::MarketLines => Page::MarketLines,
            Self::MyLibrary => Page::SellersJson,
            Self::Explore => Page::Explore,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::MarketLines => "Market Lines",
            Self::MyLibrary => "SH Sellers.json",
            Self::Explore => "Explore",
        }
    }
}

/// Which nav tabs each role may open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Deref, DerefMut)]
pub struct TabVisibility(pub HashMap<Role, Vec<NavTab>>);

impl Default for TabVisibility {
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert(Role::Admin, NavTab::iter().collect());
        rules.insert(Role::User, vec![NavTab::MarketLines, NavTab::Explore]);
        Self(rules)
    }
}

impl TabVisibility {
    /// Market Lines is the landing page and always visible; admins see everything
    pub fn is_tab_visible(&self, role: Role, tab: NavTab) -> bool {
        if tab == NavTab::MarketLines || role == Role::Admin {
            return true;
        }
        self.get(&role).is_some_and(|tabs| tabs.contains(&tab))
    }

    pub fn visible_tabs(&self, role: Role) -> Vec<NavTab> {
        NavTab::iter().filter(|t| self.is_tab_visible(role, *t)).collect()
    }
}

/// Screens the router can land on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Register,
    Library,
    Contact,
    MarketLines,
    SellersJson,
    Explore,
    Settings,
    NotFound,
}

impl Page {
    /// Route path relative to the base path
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Library => "/library",
            Self::Contact => "/contact",
            Self::MarketLines => "/",
            Self::SellersJson => "/my-library",
            Self::Explore => "/explore",
            Self::Settings => "/settings",
            Self::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Library => "Library",
            Self::Contact => "Contact",
            Self::MarketLines => "Market Lines",
            Self::SellersJson => "SH Sellers.json",
            Self::Explore => "Explore",
            Self::Settings => "Settings",
            Self::NotFound => "Not Found",
        }
    }

    /// Remote feed shown on this page, if it is a data page
    pub fn data_source(&self) -> Option<DataSource> {
        match self {
            Self::MarketLines => Some(DataSource::MarketLines),
            Self::SellersJson => Some(DataSource::SellersJson),
            Self::Explore => Some(DataSource::Play),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Render(Page),
    Redirect(&'static str),
}

/// Protection level of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone)]
pub struct Router {
    base_path: String,
    visibility: TabVisibility,
}

impl Router {
    pub fn new(base_path: impl Into<String>, visibility: TabVisibility) -> Self {
        let base_path = base_path.into().trim_end_matches('/').to_string();
        Self {
            base_path,
            visibility,
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn visibility(&self) -> &TabVisibility {
        &self.visibility
    }

    /// Full path including the base path
    pub fn href(&self, page: Page) -> String {
        format!("{}{}", self.base_path, page.path())
    }

    /// Strip the base path and any trailing slash; `""` becomes `/`
    fn normalize<'a>(&self, path: &'a str) -> &'a str {
        let path = if !self.base_path.is_empty() {
            path.strip_prefix(self.base_path.as_str()).unwrap_or(path)
        } else {
            path
        };
        let path = path.trim_end_matches('/');
        if path.is_empty() { "/" } else { path }
    }

    /// Resolve a path for `user` without following redirects
    pub fn resolve(&self, path: &str, user: Option<&UserContext>) -> RouteOutcome {
        let (guard, page) = match self.normalize(path) {
            "/login" => (Guard::Public, Page::Login),
            "/register" => (Guard::Public, Page::Register),
            "/library" => (Guard::Public, Page::Library),
            "/contact" => (Guard::Public, Page::Contact),
            "/" => (Guard::Authenticated, Page::MarketLines),
            "/my-library" => (Guard::Authenticated, self.gated(user, NavTab::MyLibrary)),
            "/explore" => (Guard::Authenticated, self.gated(user, NavTab::Explore)),
            "/settings" => (Guard::Admin, Page::Settings),
            _ => (Guard::Public, Page::NotFound),
        };

        match (guard, user) {
            (Guard::Public, _) => RouteOutcome::Render(page),
            (_, None) => RouteOutcome::Redirect(Page::Login.path()),
            (Guard::Admin, Some(u)) if !u.is_admin() => RouteOutcome::Redirect(Page::MarketLines.path()),
            _ => RouteOutcome::Render(page),
        }
    }

    /// Tab pages the role may not see fall back to Market Lines
    fn gated(&self, user: Option<&UserContext>, tab: NavTab) -> Page {
        match user {
            Some(u) if self.visibility.is_tab_visible(u.role, tab) => tab.page(),
            _ => Page::MarketLines,
        }
    }

    /// Resolve and follow redirects to the page that ends up rendered
    pub fn navigate(&self, path: &str, user: Option<&UserContext>) -> Page {
        let mut current = path.to_string();
        // Redirect chains are at most login -> render or settings -> root -> render
        for _ in 0..4 {
            match self.resolve(&current, user) {
                RouteOutcome::Render(page) => return page,
                RouteOutcome::Redirect(target) => current = target.to_string(),
            }
        }
        Page::NotFound
    }

    /// Entries of the navigation bar; empty for an anonymous visitor
    pub fn nav_entries(&self, user: Option<&UserContext>) -> Vec<Page> {
        let Some(user) = user else {
            return Vec::new();
        };
        let mut entries: Vec<Page> = self
            .visibility
            .visible_tabs(user.role)
            .into_iter()
            .map(|t| t.page())
            .collect();
        if user.is_admin() {
            entries.push(Page::Settings);
        }
        entries
    }
}
