use std::fmt;

use serde_json::Value;

use super::SidebarView;

/// Key observers subscribe to for every mutation.
pub const ANY_PATH: &str = "*";

/// Which of the three header lists a header mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderScope {
    /// Sent with every request
    Global,
    Introspection,
    Query,
}

impl HeaderScope {
    pub fn path(self) -> &'static str {
        match self {
            HeaderScope::Global => "headers",
            HeaderScope::Introspection => "introspectionHeaders",
            HeaderScope::Query => "queryHeaders",
        }
    }
}

impl fmt::Display for HeaderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeaderScope::Global => "global",
            HeaderScope::Introspection => "introspection",
            HeaderScope::Query => "query",
        })
    }
}

/// Every write the store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetEndpoint(String),
    /// Appends a new empty sheet and selects it
    AddSheet,
    RemoveSheet(usize),
    RenameSheet { index: usize, name: String },
    SetSheetContent { index: usize, content: String },
    SelectSheet(usize),
    SetIntrospection(Option<Value>),
    SetResult(Value),
    /// Appends an empty header row
    AddHeader(HeaderScope),
    RemoveHeader { scope: HeaderScope, index: usize },
    SetHeaderKey { scope: HeaderScope, index: usize, key: String },
    SetHeaderValue { scope: HeaderScope, index: usize, value: String },
    ShowSidebar(SidebarView),
    /// Closes the sidebar when it already shows the view, shows the view otherwise
    ToggleSidebar(SidebarView),
    CloseSidebar,
    SetQueryLoading(bool),
    SetIntrospectionLoading(bool),
}

impl Mutation {
    /// The state field this mutation writes, which is also the key its observers listen on.
    pub fn path(&self) -> &'static str {
        match self {
            Mutation::SetEndpoint(_) => "endpoint",
            Mutation::AddSheet
            | Mutation::RemoveSheet(_)
            | Mutation::RenameSheet { .. }
            | Mutation::SetSheetContent { .. } => "sheets",
            Mutation::SelectSheet(_) => "activeSheet",
            Mutation::SetIntrospection(_) => "introspection",
            Mutation::SetResult(_) => "result",
            Mutation::AddHeader(scope) => scope.path(),
            Mutation::RemoveHeader { scope, .. }
            | Mutation::SetHeaderKey { scope, .. }
            | Mutation::SetHeaderValue { scope, .. } => scope.path(),
            Mutation::ShowSidebar(_) | Mutation::ToggleSidebar(_) | Mutation::CloseSidebar => "sidebar",
            Mutation::SetQueryLoading(_) => "isQueryLoading",
            Mutation::SetIntrospectionLoading(_) => "isIntrospectionLoading",
        }
    }
}
