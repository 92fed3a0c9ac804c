//! The playground document: every setting, sheet and cached response, plus the dirty flag.
//!
//! [`Store::mutate`] is the only way to change anything. Each accepted mutation marks the store
//! dirty until the next [`Store::save`], and is announced to observers under the path of the
//! field it wrote and under [`ANY_PATH`].

mod mutation;
mod state;

use gqlpen_client::{merge_headers, Header, RequestHeaders};

pub use mutation::{HeaderScope, Mutation, ANY_PATH};
pub use state::{PersistedState, RightWindow, Sheet, SidebarView, Transient, DEFAULT_ENDPOINT};

use crate::{
    event_bus::{EventBus, HandlerId},
    storage::Storage,
};

/// Storage key of the persisted document.
pub const STORAGE_KEY: &str = "__gqlpen_globalStore";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Sheet {index} does not exist, there are {len} sheets")]
    SheetOutOfRange { index: usize, len: usize },
    #[error("The last sheet cannot be removed")]
    LastSheet,
    #[error("Header row {index} does not exist in the {scope} headers, there are {len} rows")]
    HeaderOutOfRange { scope: HeaderScope, index: usize, len: usize },
    #[error("Could not serialize the playground state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Could not write the playground state: {0}")]
    Write(#[source] std::io::Error),
}

pub struct Store {
    state: PersistedState,
    transient: Transient,
    dirty: bool,
    storage: Box<dyn Storage>,
    observers: EventBus<Mutation>,
}

impl Store {
    /// Reads the persisted document, falling back to the default one when it is missing,
    /// unreadable or inconsistent.
    pub fn load(storage: impl Storage + 'static) -> Self {
        let state = match storage.read(STORAGE_KEY) {
            Ok(Some(document)) => match serde_json::from_str::<PersistedState>(&document) {
                Ok(state) if state.is_valid() => state,
                Ok(state) => {
                    tracing::debug!(
                        "stored state has {} sheets with sheet {} active, using defaults",
                        state.sheets.len(),
                        state.active_sheet
                    );
                    PersistedState::default()
                }
                Err(error) => {
                    tracing::debug!("stored state is malformed, using defaults: {error}");
                    PersistedState::default()
                }
            },
            Ok(None) => {
                tracing::debug!("no stored state, using defaults");
                PersistedState::default()
            }
            Err(error) => {
                tracing::debug!("could not read stored state, using defaults: {error}");
                PersistedState::default()
            }
        };

        Store {
            state,
            transient: Transient::default(),
            dirty: false,
            storage: Box::new(storage),
            observers: EventBus::new(),
        }
    }

    pub fn mutate(&mut self, mutation: Mutation) -> Result<(), StoreError> {
        self.apply(&mutation)?;
        self.dirty = true;

        let path = mutation.path();
        tracing::trace!("store mutation on `{path}`");

        self.observers.emit(path, &mutation);
        self.observers.emit(ANY_PATH, &mutation);

        Ok(())
    }

    /// Writes the persisted part of the state and clears the dirty flag.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let document = serde_json::to_string(&self.state)?;
        self.storage.write(STORAGE_KEY, &document).map_err(StoreError::Write)?;
        self.dirty = false;

        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn transient(&self) -> Transient {
        self.transient
    }

    pub fn active_sheet(&self) -> &Sheet {
        // `apply` never lets the active index leave the sheet list.
        &self.state.sheets[self.state.active_sheet]
    }

    pub fn headers(&self, scope: HeaderScope) -> &[Header] {
        match scope {
            HeaderScope::Global => &self.state.headers,
            HeaderScope::Introspection => &self.state.introspection_headers,
            HeaderScope::Query => &self.state.query_headers,
        }
    }

    /// The headers a request of the given scope sends: the global ones merged with the
    /// scope's own.
    pub fn effective_headers(&self, scope: HeaderScope) -> RequestHeaders {
        match scope {
            HeaderScope::Global => merge_headers(&self.state.headers, &[]),
            scope => merge_headers(&self.state.headers, self.headers(scope)),
        }
    }

    /// Calls `handler` after every accepted mutation of `path`, or of anything with [`ANY_PATH`].
    pub fn subscribe(
        &mut self,
        path: &str,
        handler: impl FnMut(&Mutation) -> anyhow::Result<()> + 'static,
    ) -> HandlerId {
        self.observers.on(path, handler)
    }

    pub fn unsubscribe(&mut self, path: &str, id: HandlerId) {
        self.observers.off(path, id);
    }

    fn apply(&mut self, mutation: &Mutation) -> Result<(), StoreError> {
        let state = &mut self.state;

        match mutation {
            Mutation::SetEndpoint(endpoint) => state.endpoint.clone_from(endpoint),
            Mutation::AddSheet => {
                state.sheets.push(Sheet::new(format!("Sheet {}", state.sheets.len() + 1)));
                state.active_sheet = state.sheets.len() - 1;
            }
            Mutation::RemoveSheet(index) => {
                let index = *index;
                check_sheet(state, index)?;

                if state.sheets.len() == 1 {
                    return Err(StoreError::LastSheet);
                }

                state.sheets.remove(index);

                if state.active_sheet > index {
                    state.active_sheet -= 1;
                } else {
                    state.active_sheet = state.active_sheet.min(state.sheets.len() - 1);
                }
            }
            Mutation::RenameSheet { index, name } => {
                check_sheet(state, *index)?;
                state.sheets[*index].name.clone_from(name);
            }
            Mutation::SetSheetContent { index, content } => {
                check_sheet(state, *index)?;
                state.sheets[*index].content.clone_from(content);
            }
            Mutation::SelectSheet(index) => {
                check_sheet(state, *index)?;
                state.active_sheet = *index;
            }
            Mutation::SetIntrospection(introspection) => {
                state.introspection = introspection.clone().filter(|introspection| !introspection.is_null());
            }
            Mutation::SetResult(result) => state.result.clone_from(result),
            Mutation::AddHeader(scope) => header_rows(state, *scope).push(Header::default()),
            Mutation::RemoveHeader { scope, index } => {
                let rows = header_rows(state, *scope);
                check_header(rows, *scope, *index)?;
                rows.remove(*index);
            }
            Mutation::SetHeaderKey { scope, index, key } => {
                let rows = header_rows(state, *scope);
                check_header(rows, *scope, *index)?;
                rows[*index].key.clone_from(key);
            }
            Mutation::SetHeaderValue { scope, index, value } => {
                let rows = header_rows(state, *scope);
                check_header(rows, *scope, *index)?;
                rows[*index].value.clone_from(value);
            }
            Mutation::ShowSidebar(view) => {
                state.open_sidebar = true;
                state.sidebar = *view;
            }
            Mutation::ToggleSidebar(view) => {
                if state.open_sidebar && state.sidebar == *view {
                    state.open_sidebar = false;
                } else {
                    state.open_sidebar = true;
                    state.sidebar = *view;
                }
            }
            Mutation::CloseSidebar => state.open_sidebar = false,
            Mutation::SetQueryLoading(loading) => self.transient.is_query_loading = *loading,
            Mutation::SetIntrospectionLoading(loading) => self.transient.is_introspection_loading = *loading,
        }

        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("transient", &self.transient)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

fn check_sheet(state: &PersistedState, index: usize) -> Result<(), StoreError> {
    if index < state.sheets.len() {
        Ok(())
    } else {
        Err(StoreError::SheetOutOfRange {
            index,
            len: state.sheets.len(),
        })
    }
}

fn check_header(rows: &[Header], scope: HeaderScope, index: usize) -> Result<(), StoreError> {
    if index < rows.len() {
        Ok(())
    } else {
        Err(StoreError::HeaderOutOfRange {
            scope,
            index,
            len: rows.len(),
        })
    }
}

fn header_rows(state: &mut PersistedState, scope: HeaderScope) -> &mut Vec<Header> {
    match scope {
        HeaderScope::Global => &mut state.headers,
        HeaderScope::Introspection => &mut state.introspection_headers,
        HeaderScope::Query => &mut state.query_headers,
    }
}
