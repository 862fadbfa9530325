use std::borrow::Cow;

pub const HOME_FRAGMENT: &str = "#/";
pub const TOOLS_FRAGMENT: &str = "#/tools";
const PROTOCOL_PREFIX: &str = "#/protocol/";

/// Logical screen derived from the URL fragment.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Protocol(String),
    Tools,
}

impl Route {
    /// Anything unrecognised, including an id that does not decode to
    /// UTF-8, resolves to `Home`.
    pub fn parse(fragment: &str) -> Self {
        let fragment = if fragment.is_empty() {
            HOME_FRAGMENT
        } else {
            fragment
        };

        if let Some(encoded) = fragment.strip_prefix(PROTOCOL_PREFIX) {
            if encoded.is_empty() {
                return Route::Home;
            }
            return match urlencoding::decode(encoded) {
                Ok(id) => Route::Protocol(id.into_owned()),
                Err(_) => Route::Home,
            };
        }

        if fragment == TOOLS_FRAGMENT {
            Route::Tools
        } else {
            Route::Home
        }
    }

    pub fn to_fragment(&self) -> Cow<'static, str> {
        match self {
            Route::Home => Cow::Borrowed(HOME_FRAGMENT),
            Route::Tools => Cow::Borrowed(TOOLS_FRAGMENT),
            Route::Protocol(id) => {
                Cow::Owned(format!("{PROTOCOL_PREFIX}{}", urlencoding::encode(id)))
            }
        }
    }

    pub fn tab(&self) -> Tab {
        match self {
            Route::Tools => Tab::Tools,
            _ => Tab::Protocols,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Protocols,
    Tools,
}

impl Tab {
    pub fn route(self) -> Route {
        match self {
            Tab::Protocols => Route::Home,
            Tab::Tools => Route::Tools,
        }
    }
}

/// The fragment to write, or `None` when `target` is already current.
pub fn navigation_target(current_fragment: &str, target: &Route) -> Option<String> {
    let next = target.to_fragment();
    if current_fragment == next {
        None
    } else {
        Some(next.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_three_forms() {
        assert_eq!(Route::parse("#/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("#/tools"), Route::Tools);
        assert_eq!(
            Route::parse("#/protocol/abc%20123"),
            Route::Protocol("abc 123".to_string())
        );
        assert_eq!(
            Route::parse("#/protocol/p004"),
            Route::Protocol("p004".to_string())
        );
    }

    #[test]
    fn unknown_fragments_fall_back_home() {
        assert_eq!(Route::parse("#/unknown"), Route::Home);
        assert_eq!(Route::parse("#/tools/extra"), Route::Home);
        assert_eq!(Route::parse("#/protocol/"), Route::Home);
        assert_eq!(Route::parse("#/protocol/%FF%FE"), Route::Home);
        assert_eq!(Route::parse("tools"), Route::Home);
    }

    #[test]
    fn fragments_round_trip_through_parse() {
        for route in [
            Route::Home,
            Route::Tools,
            Route::Protocol("abc 123".into()),
            Route::Protocol("פרוטוקול/1?x#y".into()),
        ] {
            assert_eq!(Route::parse(&route.to_fragment()), route);
        }
    }

    #[test]
    fn navigating_to_the_current_fragment_is_a_no_op() {
        assert_eq!(navigation_target("#/tools", &Route::Tools), None);
        assert_eq!(
            navigation_target("#/protocol/abc%20123", &Route::Protocol("abc 123".into())),
            None
        );
        assert_eq!(
            navigation_target("#/tools", &Route::Home),
            Some("#/".to_string())
        );
    }

    #[test]
    fn tab_follows_route() {
        assert_eq!(Route::Tools.tab(), Tab::Tools);
        assert_eq!(Route::Protocol("x".into()).tab(), Tab::Protocols);
        assert_eq!(Tab::Tools.route(), Route::Tools);
    }
}
