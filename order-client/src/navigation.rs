//! Application navigation state.
//!
//! The navigator owns the current view, the order in focus, the session user
//! and the theme. State only changes through [`Navigator::dispatch`]; an
//! action that makes no sense in the current state is rejected and leaves the
//! state untouched.

use order_types::UserResponse;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Login,
    Home,
    OrderForm,
    Clients,
    Finance,
    Settings,
    Support,
    Privacy,
    Terms,
}

/// The order shown by the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFocus {
    Creating,
    Viewing(Uuid),
    Editing(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Anything but `light` is the dark default.
    pub fn from_string(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LogIn(UserResponse),
    LogOut,
    /// Switch to a top-level page. The order form and the login page have
    /// dedicated actions.
    Open(View),
    NewOrder,
    ViewOrder(Uuid),
    EditOrder,
    /// The order in the form was stored.
    OrderSaved,
    Back,
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("not logged in")]
    NotAuthenticated,

    #[error("already logged in as {0}")]
    AlreadyAuthenticated(String),

    #[error("view {0:?} cannot be opened directly")]
    NotDirectlyOpenable(View),

    #[error("no order is being viewed")]
    NotViewingOrder,

    #[error("no order is being created or edited")]
    NothingToSave,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Navigator {
    view: View,
    focus: Option<OrderFocus>,
    user: Option<UserResponse>,
    theme: Theme,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::restore(None, Theme::default())
    }
}

impl Navigator {
    /// Start from a persisted session, if any.
    pub fn restore(user: Option<UserResponse>, theme: Theme) -> Self {
        let view = if user.is_some() { View::Home } else { View::Login };
        Self {
            view,
            focus: None,
            user,
            theme,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn focus(&self) -> Option<OrderFocus> {
        self.focus
    }

    pub fn user(&self) -> Option<&UserResponse> {
        self.user.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn dispatch(&mut self, action: Action) -> Result<(), NavigationError> {
        tracing::debug!(?action, view = ?self.view, "Dispatching navigation action");

        match action {
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
            }
            Action::LogIn(user) => {
                if let Some(current) = &self.user {
                    return Err(NavigationError::AlreadyAuthenticated(current.username.clone()));
                }
                self.user = Some(user);
                self.go(View::Home, None);
            }
            _ if self.user.is_none() => return Err(NavigationError::NotAuthenticated),
            Action::LogOut => {
                self.user = None;
                self.go(View::Login, None);
            }
            Action::Open(view @ (View::Login | View::OrderForm)) => {
                return Err(NavigationError::NotDirectlyOpenable(view));
            }
            Action::Open(view) => self.go(view, None),
            Action::NewOrder => self.go(View::OrderForm, Some(OrderFocus::Creating)),
            Action::ViewOrder(id) => self.go(View::OrderForm, Some(OrderFocus::Viewing(id))),
            Action::EditOrder => match self.focus {
                Some(OrderFocus::Viewing(id)) => self.focus = Some(OrderFocus::Editing(id)),
                _ => return Err(NavigationError::NotViewingOrder),
            },
            Action::OrderSaved => match self.focus {
                Some(OrderFocus::Creating | OrderFocus::Editing(_)) => self.go(View::Home, None),
                _ => return Err(NavigationError::NothingToSave),
            },
            Action::Back => self.go(View::Home, None),
        }

        Ok(())
    }

    fn go(&mut self, view: View, focus: Option<OrderFocus>) {
        self.view = view;
        self.focus = focus;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_types::Role;

    fn user(username: &str) -> UserResponse {
        UserResponse {
            id: Uuid::new_v4(),
            username: username.to_string(),
            name: "Ana".to_string(),
            role: Role::User,
        }
    }

    fn logged_in() -> Navigator {
        Navigator::restore(Some(user("ana")), Theme::Dark)
    }

    #[test]
    fn starts_on_login_without_session() {
        let nav = Navigator::default();
        assert_eq!(nav.view(), View::Login);
        assert_eq!(nav.theme(), Theme::Dark);
        assert!(nav.user().is_none());
    }

    #[test]
    fn restored_session_starts_home() {
        let nav = Navigator::restore(Some(user("ana")), Theme::Light);
        assert_eq!(nav.view(), View::Home);
        assert_eq!(nav.theme(), Theme::Light);
    }

    #[test]
    fn pages_require_a_user() {
        let mut nav = Navigator::default();
        assert_eq!(
            nav.dispatch(Action::Open(View::Clients)),
            Err(NavigationError::NotAuthenticated)
        );
        assert_eq!(nav.view(), View::Login);

        nav.dispatch(Action::ToggleTheme).unwrap();
        assert_eq!(nav.theme(), Theme::Light);

        nav.dispatch(Action::LogIn(user("ana"))).unwrap();
        assert_eq!(nav.view(), View::Home);
        assert_eq!(
            nav.dispatch(Action::LogIn(user("bia"))),
            Err(NavigationError::AlreadyAuthenticated("ana".to_string()))
        );
    }

    #[test]
    fn order_form_is_reached_through_order_actions() {
        let mut nav = logged_in();
        assert_eq!(
            nav.dispatch(Action::Open(View::OrderForm)),
            Err(NavigationError::NotDirectlyOpenable(View::OrderForm))
        );

        nav.dispatch(Action::NewOrder).unwrap();
        assert_eq!(nav.view(), View::OrderForm);
        assert_eq!(nav.focus(), Some(OrderFocus::Creating));
    }

    #[test]
    fn edit_requires_viewing() {
        let mut nav = logged_in();
        let id = Uuid::new_v4();

        nav.dispatch(Action::NewOrder).unwrap();
        assert_eq!(nav.dispatch(Action::EditOrder), Err(NavigationError::NotViewingOrder));

        nav.dispatch(Action::ViewOrder(id)).unwrap();
        nav.dispatch(Action::EditOrder).unwrap();
        assert_eq!(nav.focus(), Some(OrderFocus::Editing(id)));

        nav.dispatch(Action::OrderSaved).unwrap();
        assert_eq!(nav.view(), View::Home);
        assert_eq!(nav.focus(), None);
    }

    #[test]
    fn viewed_order_cannot_be_saved() {
        let mut nav = logged_in();
        nav.dispatch(Action::ViewOrder(Uuid::new_v4())).unwrap();
        assert_eq!(nav.dispatch(Action::OrderSaved), Err(NavigationError::NothingToSave));
        assert_eq!(nav.view(), View::OrderForm);
    }

    #[test]
    fn leaving_the_form_clears_focus() {
        let mut nav = logged_in();
        nav.dispatch(Action::NewOrder).unwrap();
        nav.dispatch(Action::Open(View::Finance)).unwrap();
        assert_eq!(nav.view(), View::Finance);
        assert_eq!(nav.focus(), None);

        nav.dispatch(Action::Back).unwrap();
        assert_eq!(nav.view(), View::Home);
    }

    #[test]
    fn logout_keeps_theme() {
        let mut nav = logged_in();
        nav.dispatch(Action::ToggleTheme).unwrap();
        nav.dispatch(Action::LogOut).unwrap();

        assert_eq!(nav.view(), View::Login);
        assert!(nav.user().is_none());
        assert_eq!(nav.theme(), Theme::Light);
        assert_eq!(
            nav.dispatch(Action::Open(View::Login)),
            Err(NavigationError::NotAuthenticated)
        );
    }

    #[test]
    fn theme_strings() {
        assert_eq!(Theme::from_string("light"), Theme::Light);
        assert_eq!(Theme::from_string("sepia"), Theme::Dark);
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
    }
}
