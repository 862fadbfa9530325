//! Pure screen models. [`build`] turns session state plus loaded data into a
//! description the Leptos layer renders without further decisions.

use crate::catalog::{Catalog, Protocol};
use crate::highlight::Highlighter;
use crate::labels;
use crate::route::Route;
use crate::search::{filter, group_by_category, normalize_query};
use crate::state::{DataState, ViewState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Loading,
    LoadError { message: String, hint: String },
    List(ListView),
    Detail(DetailView),
    NotFound,
    Tools,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListView {
    pub total: usize,
    pub searching: bool,
    pub groups: Vec<GroupView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupView {
    pub label: String,
    pub items: Vec<ItemView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemView {
    pub id: String,
    pub title: String,
    pub pages: String,
}

impl ItemView {
    pub fn route(&self) -> Route {
        Route::Protocol(self.id.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub pages: String,
    /// Escaped, optionally highlighted body.
    pub content_html: String,
    /// Body as stored, for the clipboard.
    pub raw_content: String,
    pub highlight: bool,
}

impl DetailView {
    pub fn highlight_label(&self) -> &'static str {
        if self.highlight {
            labels::HIGHLIGHT_ON
        } else {
            labels::HIGHLIGHT_OFF
        }
    }
}

/// Transient state of the copy button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CopyFeedback {
    #[default]
    Idle,
    Copied,
    Failed,
}

impl CopyFeedback {
    pub fn label(self) -> &'static str {
        match self {
            CopyFeedback::Idle => labels::COPY,
            CopyFeedback::Copied => labels::COPIED,
            CopyFeedback::Failed => labels::COPY_FAILED,
        }
    }
}

/// The copy button's label plus a ticket for its revert timer. Each new
/// outcome takes a fresh ticket, so an older timer cannot revert a newer label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CopyStatus {
    pub feedback: CopyFeedback,
    ticket: u64,
}

impl CopyStatus {
    /// Shows `feedback` and returns the ticket its timer must present.
    pub fn show(&mut self, feedback: CopyFeedback) -> u64 {
        self.ticket += 1;
        self.feedback = feedback;
        self.ticket
    }

    /// Back to idle, unless a newer outcome replaced the one for `ticket`.
    pub fn expire(&mut self, ticket: u64) {
        if ticket == self.ticket {
            self.feedback = CopyFeedback::Idle;
        }
    }

    pub fn label(&self) -> &'static str {
        self.feedback.label()
    }
}

pub fn build(state: &ViewState, data: &DataState, data_url: &str) -> Screen {
    let catalog = match data {
        DataState::Loading => return Screen::Loading,
        DataState::Failed(message) => {
            return Screen::LoadError {
                message: message.clone(),
                hint: labels::load_error_hint(data_url),
            }
        }
        DataState::Ready(catalog) => catalog,
    };

    match &state.route {
        Route::Home => Screen::List(list_view(catalog, &state.query)),
        Route::Tools => Screen::Tools,
        Route::Protocol(id) => match catalog.find(id) {
            Some(protocol) => Screen::Detail(detail_view(protocol, state.highlight)),
            None => Screen::NotFound,
        },
    }
}

pub fn list_view(catalog: &Catalog, raw_query: &str) -> ListView {
    let query = normalize_query(raw_query);
    let matched = filter(catalog.all(), &query);
    let groups = group_by_category(&matched)
        .into_iter()
        .map(|group| GroupView {
            label: group.label,
            items: group
                .items
                .into_iter()
                .map(|p| ItemView {
                    id: p.id.clone(),
                    title: p.title.clone(),
                    pages: p.page_range(),
                })
                .collect(),
        })
        .collect();

    ListView {
        total: matched.len(),
        searching: !query.is_empty(),
        groups,
    }
}

pub fn detail_view(protocol: &Protocol, highlight: bool) -> DetailView {
    DetailView {
        id: protocol.id.clone(),
        title: protocol.title.clone(),
        category: protocol.category.clone(),
        pages: protocol.page_range(),
        content_html: Highlighter::standard().render(&protocol.content, highlight),
        raw_content: protocol.content.clone(),
        highlight,
    }
}
