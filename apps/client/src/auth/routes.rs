//! Views reachable from the CLI and the guard that protects them.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Builder,
    Profile,
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Profile)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Builder => "/builder",
            Route::Profile => "/profile",
        };
        f.write_str(path)
    }
}

/// Resolves where a navigation actually lands.
/// Guarded views redirect to login when signed out.
pub fn guard(requested: Route, authenticated: bool) -> Route {
    if requested.requires_auth() && !authenticated {
        Route::Login
    } else {
        requested
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

/// Navigation entries for the current auth state. Logout is modelled as a
/// link back home because that is where it lands.
pub fn nav_links(authenticated: bool) -> Vec<NavLink> {
    let mut links = vec![NavLink {
        label: "Builder",
        route: Route::Builder,
    }];
    if authenticated {
        links.push(NavLink {
            label: "Profile",
            route: Route::Profile,
        });
        links.push(NavLink {
            label: "Logout",
            route: Route::Home,
        });
    } else {
        links.push(NavLink {
            label: "Login",
            route: Route::Login,
        });
        links.push(NavLink {
            label: "Sign Up",
            route: Route::Register,
        });
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_requires_login() {
        assert_eq!(guard(Route::Profile, false), Route::Login);
        assert_eq!(guard(Route::Profile, true), Route::Profile);
    }

    #[test]
    fn test_builder_is_open() {
        assert_eq!(guard(Route::Builder, false), Route::Builder);
    }

    #[test]
    fn test_nav_links_follow_auth() {
        let labels: Vec<_> = nav_links(false).iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Builder", "Login", "Sign Up"]);

        let labels: Vec<_> = nav_links(true).iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Builder", "Profile", "Logout"]);
    }
}
