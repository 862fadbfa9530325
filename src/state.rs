use tracing::debug;

use crate::catalog::Catalog;
use crate::route::{Route, Tab};

/// Everything the shell needs to decide what to show.
///
/// The route mirrors the URL fragment and only changes through
/// [`Action::FragmentChanged`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub route: Route,
    pub query: String,
    pub highlight: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Route::Home, true)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// The platform reported a new fragment.
    FragmentChanged(String),
    SelectTab(Tab),
    SearchInput(String),
    /// Open a route, e.g. a list item or the back button.
    Open(Route),
    ToggleHighlight,
}

/// Side effects for the platform adapter to carry out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Navigate(Route),
}

impl ViewState {
    pub fn new(route: Route, highlight: bool) -> Self {
        Self {
            route,
            query: String::new(),
            highlight,
        }
    }

    pub fn tab(&self) -> Tab {
        self.route.tab()
    }

    pub fn apply(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::FragmentChanged(fragment) => {
                let route = Route::parse(&fragment);
                if route != self.route {
                    debug!(?route, "route changed");
                    self.route = route;
                }
                None
            }
            Action::SelectTab(tab) => {
                if tab == Tab::Tools {
                    self.query.clear();
                }
                Some(Command::Navigate(tab.route()))
            }
            Action::SearchInput(text) => {
                if self.tab() == Tab::Tools {
                    return None;
                }
                self.query = text;
                match self.route {
                    Route::Protocol(_) => Some(Command::Navigate(Route::Home)),
                    _ => None,
                }
            }
            Action::Open(route) => Some(Command::Navigate(route)),
            Action::ToggleHighlight => {
                self.highlight = !self.highlight;
                None
            }
        }
    }
}

/// Outcome of the one startup fetch.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum DataState {
    #[default]
    Loading,
    Ready(Catalog),
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_changes_drive_the_route() {
        let mut state = ViewState::default();
        assert_eq!(state.apply(Action::FragmentChanged("#/tools".into())), None);
        assert_eq!(state.route, Route::Tools);
        assert_eq!(state.tab(), Tab::Tools);

        state.apply(Action::FragmentChanged("#/protocol/p004".into()));
        assert_eq!(state.route, Route::Protocol("p004".into()));
        assert_eq!(state.tab(), Tab::Protocols);
    }

    #[test]
    fn same_fragment_leaves_state_untouched() {
        let mut state = ViewState::new(Route::Tools, true);
        state.query = "x".into();
        let before = state.clone();
        state.apply(Action::FragmentChanged("#/tools".into()));
        assert_eq!(state, before);
    }

    #[test]
    fn selecting_tools_clears_search() {
        let mut state = ViewState::default();
        state.apply(Action::SearchInput("asthma".into()));
        let effect = state.apply(Action::SelectTab(Tab::Tools));
        assert_eq!(effect, Some(Command::Navigate(Route::Tools)));
        assert!(state.query.is_empty());
    }

    #[test]
    fn selecting_protocols_keeps_search() {
        let mut state = ViewState::default();
        state.apply(Action::SearchInput("asthma".into()));
        let effect = state.apply(Action::SelectTab(Tab::Protocols));
        assert_eq!(effect, Some(Command::Navigate(Route::Home)));
        assert_eq!(state.query, "asthma");
    }

    #[test]
    fn typing_on_a_detail_route_goes_home() {
        let mut state = ViewState::new(Route::Protocol("p004".into()), true);
        let effect = state.apply(Action::SearchInput("sep".into()));
        assert_eq!(effect, Some(Command::Navigate(Route::Home)));
        assert_eq!(state.query, "sep");
    }

    #[test]
    fn typing_on_tools_is_ignored() {
        let mut state = ViewState::new(Route::Tools, true);
        assert_eq!(state.apply(Action::SearchInput("sep".into())), None);
        assert!(state.query.is_empty());
    }

    #[test]
    fn highlight_toggle_survives_navigation() {
        let mut state = ViewState::new(Route::Protocol("a".into()), true);
        state.apply(Action::ToggleHighlight);
        assert!(!state.highlight);
        state.apply(Action::FragmentChanged("#/".into()));
        state.apply(Action::FragmentChanged("#/protocol/b".into()));
        assert!(!state.highlight);
    }

    #[test]
    fn open_only_requests_navigation() {
        let mut state = ViewState::default();
        let effect = state.apply(Action::Open(Route::Protocol("p1".into())));
        assert_eq!(effect, Some(Command::Navigate(Route::Protocol("p1".into()))));
        assert_eq!(state.route, Route::Home);
    }
}
