use gqlpen_client::Header;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://graphql-pokemon2.vercel.app";

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PersistedDocument")]
pub struct PersistedState {
    pub endpoint: String,
    pub sheets: Vec<Sheet>,
    pub active_sheet: usize,
    /// The `data` part of the last successful introspection response
    pub introspection: Option<Value>,
    /// The last query response, verbatim
    pub result: Value,
    /// Sent with every request
    pub headers: Vec<Header>,
    pub introspection_headers: Vec<Header>,
    pub query_headers: Vec<Header>,
    pub open_sidebar: bool,
    pub sidebar: SidebarView,
}

impl Default for PersistedState {
    fn default() -> Self {
        PersistedState {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            sheets: vec![Sheet::new("Sheet 1")],
            active_sheet: 0,
            introspection: None,
            result: empty_object(),
            headers: Vec::new(),
            introspection_headers: Vec::new(),
            query_headers: Vec::new(),
            open_sidebar: false,
            sidebar: SidebarView::Docs,
        }
    }
}

impl PersistedState {
    /// Whether the sheet list is usable: at least one sheet and an active index inside it.
    pub fn is_valid(&self) -> bool {
        self.active_sheet < self.sheets.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub content: String,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            content: String::new(),
        }
    }
}

/// What the sidebar shows when it is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarView {
    #[default]
    Docs,
    Settings,
}

/// The single `rightWindow` field older documents used for the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RightWindow {
    None,
    Docs,
    Settings,
}

impl SidebarView {
    /// Splits the legacy tri-state into the open flag and the view.
    pub fn from_right_window(window: RightWindow) -> (bool, SidebarView) {
        match window {
            RightWindow::None => (false, SidebarView::Docs),
            RightWindow::Docs => (true, SidebarView::Docs),
            RightWindow::Settings => (true, SidebarView::Settings),
        }
    }
}

/// Request state shown while a request is in flight. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transient {
    pub is_query_loading: bool,
    pub is_introspection_loading: bool,
}

/// On-disk shape, accepting documents from every earlier version.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedDocument {
    endpoint: String,
    sheets: Vec<Sheet>,
    active_sheet: usize,
    #[serde(default)]
    introspection: Option<Value>,
    /// Only a missing key means "no result yet", a stored `null` is a result of its own.
    #[serde(default = "empty_object")]
    result: Value,
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    introspection_headers: Vec<Header>,
    #[serde(default)]
    query_headers: Vec<Header>,
    open_sidebar: Option<bool>,
    sidebar: Option<SidebarView>,
    right_window: Option<RightWindow>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl From<PersistedDocument> for PersistedState {
    fn from(document: PersistedDocument) -> Self {
        let (open_sidebar, sidebar) = match (document.open_sidebar, document.sidebar, document.right_window) {
            (Some(open), view, _) => (open, view.unwrap_or_default()),
            (None, view, Some(window)) => {
                let (open, legacy_view) = SidebarView::from_right_window(window);
                (open, view.unwrap_or(legacy_view))
            }
            (None, view, None) => (false, view.unwrap_or_default()),
        };

        PersistedState {
            endpoint: document.endpoint,
            sheets: document.sheets,
            active_sheet: document.active_sheet,
            introspection: document.introspection.filter(|introspection| !introspection.is_null()),
            result: document.result,
            headers: document.headers,
            introspection_headers: document.introspection_headers,
            query_headers: document.query_headers,
            open_sidebar,
            sidebar,
        }
    }
}
