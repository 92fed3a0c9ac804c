//! Session logic of the gqlpen GraphQL playground.
//!
//! A [`Playground`] ties the persisted [`Store`] to the query client, the schema built from the
//! last introspection and the documentation [`Navigator`]. Front ends drive it directly or
//! through keyboard [`Shortcuts`] dispatched on an [`EventBus`].

pub mod event_bus;
pub mod keybindings;
pub mod navigator;
pub mod notifier;
pub mod playground;
pub mod sequence;
pub mod storage;
pub mod store;

pub use event_bus::{EventBus, HandlerId};
pub use keybindings::{KeyPress, Keymap, Shortcuts};
pub use navigator::{Link, Navigator, Page, PageKind};
pub use notifier::{Notifier, RecordingNotifier, Severity, TracingNotifier};
pub use playground::{Outcome, PendingRequest, Playground, RequestKind};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{HeaderScope, Mutation, PersistedState, Sheet, SidebarView, Store, StoreError};

#[cfg(test)]
mod tests {
    pub(crate) const INTROSPECTION_RESPONSE: &str =
        include_str!("../../gqlpen-schema/tests/pokemon_introspection.json");

    /// The `data` part of the introspection response.
    pub(crate) fn fixture() -> serde_json::Value {
        let response: serde_json::Value = serde_json::from_str(INTROSPECTION_RESPONSE).unwrap();
        response["data"].clone()
    }
}
