// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Navigation shell: the fixed set of screens and allowed transitions.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Every addressable screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum Route {
    WelcomeScreen,
    Login,
    ForgotPassword,
    QuizQuestion1,
    Home,
    Relax,
    Journal,
    Profile,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::WelcomeScreen,
        Route::Login,
        Route::ForgotPassword,
        Route::QuizQuestion1,
        Route::Home,
        Route::Relax,
        Route::Journal,
        Route::Profile,
    ];

    /// Tab bar order.
    pub const TABS: [Route; 4] = [Route::Home, Route::Relax, Route::Journal, Route::Profile];

    pub fn path(self) -> &'static str {
        match self {
            Route::WelcomeScreen => "/welcomescreen",
            Route::Login => "/login",
            Route::ForgotPassword => "/forgot-password",
            Route::QuizQuestion1 => "/quiz-question-1",
            Route::Home => "/home",
            Route::Relax => "/relax",
            Route::Journal => "/journal",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn is_tab(self) -> bool {
        Route::TABS.contains(&self)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Presentation options shared by every screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub animated: bool,
    pub gesture_dismiss: bool,
}

/// No animation, no swipe-to-dismiss.
pub const PRESENTATION: Presentation = Presentation {
    animated: false,
    gesture_dismiss: false,
};

/// Whether `from -> to` is a declared transition.
pub fn is_allowed(from: Route, to: Route) -> bool {
    use Route::*;

    if from.is_tab() && to.is_tab() {
        return true;
    }

    matches!(
        (from, to),
        (WelcomeScreen, QuizQuestion1)
            | (WelcomeScreen, Login)
            | (QuizQuestion1, Login)
            | (Login, Home)
            | (Login, ForgotPassword)
            | (ForgotPassword, Login)
            | (Profile, WelcomeScreen)
    )
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No transition from {from} to {to}")]
    NotAllowed { from: Route, to: Route },

    #[error("Unknown route: {0}")]
    UnknownRoute(String),
}

/// Current screen plus the back stack.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Route,
    history: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::WelcomeScreen)
    }
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Move to `to` if the transition is declared.
    ///
    /// Switching tabs and entering the tab group replace the back stack;
    /// stack screens push onto it.
    pub fn navigate(&mut self, to: Route) -> Result<(), NavigationError> {
        if to == self.current {
            return Ok(());
        }
        if !is_allowed(self.current, to) {
            return Err(NavigationError::NotAllowed {
                from: self.current,
                to,
            });
        }

        if to.is_tab() || (to == Route::WelcomeScreen && self.current.is_tab()) {
            self.history.clear();
        } else {
            self.history.push(self.current);
        }
        self.current = to;
        Ok(())
    }

    /// Navigate by path, e.g. `/journal`.
    pub fn navigate_path(&mut self, path: &str) -> Result<(), NavigationError> {
        let to = Route::from_path(path)
            .ok_or_else(|| NavigationError::UnknownRoute(path.to_string()))?;
        self.navigate(to)
    }

    /// Pop the back stack. Returns false when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/journal/"), Some(Route::Journal));
        assert_eq!(Route::from_path("/settings"), None);
    }

    #[test]
    fn test_tabs() {
        assert!(Route::Relax.is_tab());
        assert!(!Route::Login.is_tab());
        assert!(is_allowed(Route::Journal, Route::Relax));
    }

    #[test]
    fn test_onboarding_flow() {
        let mut nav = Navigator::default();
        nav.navigate(Route::QuizQuestion1).unwrap();
        nav.navigate(Route::Login).unwrap();
        nav.navigate(Route::ForgotPassword).unwrap();
        assert!(nav.back());
        assert_eq!(nav.current(), Route::Login);

        nav.navigate(Route::Home).unwrap();
        assert!(!nav.back(), "entering the tabs clears the back stack");
    }

    #[test]
    fn test_undeclared_transition_fails() {
        let mut nav = Navigator::default();
        let err = nav.navigate(Route::Journal).unwrap_err();
        assert_eq!(
            err,
            NavigationError::NotAllowed {
                from: Route::WelcomeScreen,
                to: Route::Journal
            }
        );
        assert_eq!(nav.current(), Route::WelcomeScreen);

        assert!(matches!(
            nav.navigate_path("/nowhere"),
            Err(NavigationError::UnknownRoute(_))
        ));
    }

    #[test]
    fn test_sign_out_returns_to_welcome() {
        let mut nav = Navigator::new(Route::Profile);
        nav.navigate_path("/welcomescreen").unwrap();
        assert_eq!(nav.current(), Route::WelcomeScreen);
        assert!(!nav.back());
    }

    #[test]
    fn test_presentation_is_static() {
        assert!(!PRESENTATION.animated);
        assert!(!PRESENTATION.gesture_dismiss);
    }
}
