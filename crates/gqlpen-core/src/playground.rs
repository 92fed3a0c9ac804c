use std::rc::Rc;

use gqlpen_client::{Client, ClientError, RequestHeaders};
use gqlpen_schema::{build_optional_schema, build_schema, BuildError, NodeId, Schema};
use serde_json::Value;

use crate::{
    navigator::{Navigator, Page},
    notifier::{Notifier, Severity},
    sequence::{RequestSequence, Ticket},
    store::{HeaderScope, Mutation, SidebarView, Store, StoreError},
};

/// What became of a request once its response was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response was written to the store
    Applied,
    /// A newer request of the same kind was started meanwhile, the response was dropped
    Stale,
    /// The user was notified, the store kept its previous value
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Introspection,
    Query(String),
}

/// A request started by the playground, to be sent and handed back with its response.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    ticket: Ticket,
    endpoint: String,
    headers: RequestHeaders,
    kind: RequestKind,
}

impl PendingRequest {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    pub async fn send(&self, client: &Client) -> Result<Value, ClientError> {
        match &self.kind {
            RequestKind::Introspection => client.fetch_introspection(&self.endpoint, &self.headers).await,
            RequestKind::Query(query) => client.execute_query(&self.endpoint, query, &self.headers).await,
        }
    }
}

/// One playground session: the store, the schema built from its introspection, and the
/// documentation history browsing that schema.
pub struct Playground {
    store: Store,
    client: Client,
    schema: Option<Rc<Schema>>,
    generation: u64,
    navigator: Navigator,
    notifier: Box<dyn Notifier>,
    introspections: RequestSequence,
    queries: RequestSequence,
}

impl Playground {
    pub fn new(store: Store, client: Client, notifier: impl Notifier + 'static) -> Self {
        Playground {
            store,
            client,
            schema: None,
            generation: 0,
            navigator: Navigator::new(0),
            notifier: Box::new(notifier),
            introspections: RequestSequence::default(),
            queries: RequestSequence::default(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn mutate(&mut self, mutation: Mutation) -> Result<(), StoreError> {
        self.store.mutate(mutation)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The current schema. Replaced as a whole whenever a new introspection is built, so a
    /// held copy always stays consistent.
    pub fn schema(&self) -> Option<Rc<Schema>> {
        self.schema.clone()
    }

    /// Increases every time the schema is replaced.
    pub fn schema_generation(&self) -> u64 {
        self.generation
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Follows a documentation link. Targets outside the current schema, such as links of a page
    /// rendered before the schema was replaced, are ignored.
    pub fn go_to(&mut self, node: impl Into<NodeId>) -> bool {
        let node = node.into();

        match &self.schema {
            Some(schema) if schema.contains(node) => {
                self.navigator.go_to(node);
                true
            }
            _ => {
                tracing::debug!("ignoring a link to {node:?}, it is not part of the current schema");
                false
            }
        }
    }

    /// Builds the schema from the stored introspection, fetching one first if none is stored.
    pub async fn restore_schema(&mut self) -> Outcome {
        match build_optional_schema(self.store.state().introspection.as_ref()) {
            Ok(schema) => {
                self.replace_schema(schema);
                Outcome::Applied
            }
            Err(BuildError::MissingIntrospection) => self.load_schema().await,
            Err(error) => {
                tracing::error!("stored introspection is unusable: {error}");
                self.notifier
                    .notify(&format!("Failed to build schema: {error}"), Severity::Error);
                Outcome::Failed
            }
        }
    }

    /// Introspects the endpoint and replaces the schema.
    pub async fn load_schema(&mut self) -> Outcome {
        let request = self.begin_introspection();
        let response = request.send(&self.client).await;

        self.finish_introspection(request.ticket, response)
    }

    pub fn begin_introspection(&mut self) -> PendingRequest {
        self.update(Mutation::SetIntrospectionLoading(true));

        PendingRequest {
            ticket: self.introspections.issue(),
            endpoint: self.store.state().endpoint.clone(),
            headers: self.store.effective_headers(HeaderScope::Introspection),
            kind: RequestKind::Introspection,
        }
    }

    pub fn finish_introspection(&mut self, ticket: Ticket, response: Result<Value, ClientError>) -> Outcome {
        if !self.introspections.is_latest(ticket) {
            tracing::debug!("dropping the response of a superseded introspection");
            return Outcome::Stale;
        }

        self.update(Mutation::SetIntrospectionLoading(false));

        let Ok(introspection) = response else {
            self.notifier.notify("Failed to load schema", Severity::Error);
            return Outcome::Failed;
        };

        match build_schema(&introspection) {
            Ok(schema) => {
                self.update(Mutation::SetIntrospection(Some(introspection)));
                self.replace_schema(schema);
                Outcome::Applied
            }
            Err(error) => {
                tracing::error!("introspection response is unusable: {error}");
                self.notifier
                    .notify(&format!("Failed to build schema: {error}"), Severity::Error);
                Outcome::Failed
            }
        }
    }

    /// Sends the active sheet and stores the response.
    pub async fn run_query(&mut self) -> Outcome {
        let request = self.begin_query();
        let response = request.send(&self.client).await;

        self.finish_query(request.ticket, response)
    }

    pub fn begin_query(&mut self) -> PendingRequest {
        self.update(Mutation::SetQueryLoading(true));

        PendingRequest {
            ticket: self.queries.issue(),
            endpoint: self.store.state().endpoint.clone(),
            headers: self.store.effective_headers(HeaderScope::Query),
            kind: RequestKind::Query(self.store.active_sheet().content.clone()),
        }
    }

    pub fn finish_query(&mut self, ticket: Ticket, response: Result<Value, ClientError>) -> Outcome {
        if !self.queries.is_latest(ticket) {
            tracing::debug!("dropping the response of a superseded query");
            return Outcome::Stale;
        }

        self.update(Mutation::SetQueryLoading(false));

        match response {
            Ok(result) => {
                self.update(Mutation::SetResult(result));
                Outcome::Applied
            }
            Err(_) => {
                self.notifier.notify("Failed to fetch query", Severity::Error);
                Outcome::Failed
            }
        }
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        match self.store.save() {
            Ok(()) => {
                self.notifier.notify("Saved!", Severity::Success);
                Ok(())
            }
            Err(error) => {
                self.notifier.notify(&format!("Failed to save: {error}"), Severity::Error);
                Err(error)
            }
        }
    }

    /// Whether leaving now would lose changes.
    pub fn confirm_exit_required(&self) -> bool {
        self.store.is_dirty()
    }

    pub fn toggle_sidebar(&mut self, view: SidebarView) {
        self.update(Mutation::ToggleSidebar(view));

        let state = self.store.state();
        if state.open_sidebar && state.sidebar == SidebarView::Docs {
            self.navigator.sync(self.generation);
        }
    }

    pub fn open_documentation(&mut self) {
        self.update(Mutation::ShowSidebar(SidebarView::Docs));
        self.navigator.sync(self.generation);
    }

    pub fn open_settings(&mut self) {
        self.update(Mutation::ShowSidebar(SidebarView::Settings));
    }

    pub fn close_sidebar(&mut self) {
        self.update(Mutation::CloseSidebar);
    }

    /// The current documentation page, `None` until a schema is loaded.
    pub fn documentation(&self) -> Option<Page> {
        self.schema.as_deref().map(|schema| self.navigator.page(schema))
    }

    fn replace_schema(&mut self, schema: Schema) {
        self.schema = Some(Rc::new(schema));
        self.generation += 1;
        self.navigator.sync(self.generation);

        tracing::debug!("schema generation {} loaded", self.generation);
    }

    /// Applies a mutation that cannot be rejected.
    fn update(&mut self, mutation: Mutation) {
        if let Err(error) = self.store.mutate(mutation) {
            tracing::error!("playground update rejected: {error}");
        }
    }
}

impl std::fmt::Debug for Playground {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Playground")
            .field("store", &self.store)
            .field("generation", &self.generation)
            .field("navigator", &self.navigator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use gqlpen_client::ClientConfig;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, method},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::{
        navigator::PageKind,
        notifier::RecordingNotifier,
        storage::MemoryStorage,
        store::STORAGE_KEY,
        tests::{fixture, INTROSPECTION_RESPONSE},
    };

    fn playground(endpoint: &str) -> (Playground, RecordingNotifier) {
        playground_with(Store::load(MemoryStorage::new()), endpoint)
    }

    fn playground_with(store: Store, endpoint: &str) -> (Playground, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let client = Client::new(&ClientConfig::default()).unwrap();
        let mut playground = Playground::new(store, client, notifier.clone());
        playground.mutate(Mutation::SetEndpoint(endpoint.to_owned())).unwrap();

        (playground, notifier)
    }

    async fn introspection_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({ "query": gqlpen_schema::INTROSPECTION_QUERY })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(INTROSPECTION_RESPONSE, "application/json"))
            .mount(&server)
            .await;
        server
    }

    fn field_names(playground: &Playground) -> Vec<String> {
        let schema = playground.schema().unwrap();
        schema
            .extract_fields(schema.root_operation_types().query)
            .into_iter()
            .map(|node| schema.node_name(node))
            .collect()
    }

    #[tokio::test]
    async fn loading_the_schema() {
        let server = introspection_server().await;
        let (mut playground, notifier) = playground(&server.uri());

        assert_eq!(playground.documentation(), None);
        assert_eq!(playground.load_schema().await, Outcome::Applied);

        assert_eq!(playground.store().state().introspection, Some(fixture()));
        assert!(!playground.store().transient().is_introspection_loading);
        assert_eq!(field_names(&playground), ["pokemons", "pokemon", "search", "node"]);
        assert_eq!(playground.schema_generation(), 1);
        assert_eq!(playground.documentation().unwrap().kind, PageKind::Root);
        assert!(playground.confirm_exit_required());
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn introspection_sends_global_and_introspection_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-client-id", "5ed1175bad06853b3aa1e492"))
            .and(header("x-app-id", "623996f3c35130073829b252"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(INTROSPECTION_RESPONSE, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let (mut playground, _) = playground(&server.uri());
        for (scope, key, value) in [
            (HeaderScope::Global, "x-client-id", "5ed1175bad06853b3aa1e492"),
            (HeaderScope::Global, "x-app-id", "1"),
            (HeaderScope::Introspection, "x-app-id", "623996f3c35130073829b252"),
            (HeaderScope::Query, "authorization", "Bearer token"),
        ] {
            playground.mutate(Mutation::AddHeader(scope)).unwrap();
            let index = playground.store().headers(scope).len() - 1;
            playground
                .mutate(Mutation::SetHeaderKey {
                    scope,
                    index,
                    key: key.into(),
                })
                .unwrap();
            playground
                .mutate(Mutation::SetHeaderValue {
                    scope,
                    index,
                    value: value.into(),
                })
                .unwrap();
        }

        let request = playground.begin_introspection();
        assert_eq!(request.headers().len(), 2);

        let response = request.send(playground.client()).await;
        assert_eq!(playground.finish_introspection(request.ticket(), response), Outcome::Applied);
    }

    #[tokio::test]
    async fn failed_introspection_keeps_the_previous_schema() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(INTROSPECTION_RESPONSE, "application/json"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let (mut playground, notifier) = playground(&server.uri());
        assert_eq!(playground.load_schema().await, Outcome::Applied);
        let schema = playground.schema().unwrap();

        assert_eq!(playground.load_schema().await, Outcome::Failed);

        assert_eq!(playground.store().state().introspection, Some(fixture()));
        assert!(Rc::ptr_eq(&schema, &playground.schema().unwrap()));
        assert_eq!(playground.schema_generation(), 1);
        assert!(!playground.store().transient().is_introspection_loading);
        assert_eq!(notifier.messages(), [(Severity::Error, "Failed to load schema".to_owned())]);
    }

    #[tokio::test]
    async fn unbuildable_introspection_is_not_stored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "__schema": {} } })))
            .mount(&server)
            .await;

        let (mut playground, notifier) = playground(&server.uri());

        assert_eq!(playground.load_schema().await, Outcome::Failed);
        assert_eq!(playground.store().state().introspection, None);
        assert!(playground.schema().is_none());

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, Severity::Error);
        assert!(messages[0].1.starts_with("Failed to build schema"), "{}", messages[0].1);
    }

    #[tokio::test]
    async fn restoring_uses_the_stored_introspection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let document = json!({
            "endpoint": server.uri(),
            "sheets": [{ "name": "Sheet 1", "content": "" }],
            "activeSheet": 0,
            "introspection": fixture(),
            "result": {}
        });
        let store = Store::load(MemoryStorage::new().with_entry(STORAGE_KEY, document.to_string()));
        let (mut playground, _) = playground_with(store, &server.uri());

        assert_eq!(playground.restore_schema().await, Outcome::Applied);
        assert_eq!(field_names(&playground), ["pokemons", "pokemon", "search", "node"]);
    }

    #[tokio::test]
    async fn restoring_without_introspection_fetches_one() {
        let server = introspection_server().await;
        let (mut playground, _) = playground(&server.uri());

        assert_eq!(playground.restore_schema().await, Outcome::Applied);
        assert!(playground.store().state().introspection.is_some());
    }

    #[tokio::test]
    async fn running_the_active_sheet() {
        let body = json!({ "data": { "pokemon": { "id": "UG9rZW1vbjowMDE=" } } });
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer token"))
            .and(body_json(json!({ "query": "{ pokemon(name: \"Bulbasaur\") { id } }" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let (mut playground, _) = playground(&server.uri());
        playground.mutate(Mutation::AddSheet).unwrap();
        playground
            .mutate(Mutation::SetSheetContent {
                index: 1,
                content: "{ pokemon(name: \"Bulbasaur\") { id } }".into(),
            })
            .unwrap();
        playground.mutate(Mutation::AddHeader(HeaderScope::Query)).unwrap();
        playground
            .mutate(Mutation::SetHeaderKey {
                scope: HeaderScope::Query,
                index: 0,
                key: "authorization".into(),
            })
            .unwrap();
        playground
            .mutate(Mutation::SetHeaderValue {
                scope: HeaderScope::Query,
                index: 0,
                value: "Bearer token".into(),
            })
            .unwrap();

        assert_eq!(playground.run_query().await, Outcome::Applied);
        assert_eq!(playground.store().state().result, body);
        assert!(!playground.store().transient().is_query_loading);
    }

    #[tokio::test]
    async fn failed_queries_keep_the_previous_result() {
        let (mut playground, notifier) = playground("http://127.0.0.1:1/graphql");
        playground.mutate(Mutation::SetResult(json!({ "data": { "ok": true } }))).unwrap();

        assert_eq!(playground.run_query().await, Outcome::Failed);

        assert_eq!(playground.store().state().result, json!({ "data": { "ok": true } }));
        assert!(!playground.store().transient().is_query_loading);
        assert_eq!(notifier.messages(), [(Severity::Error, "Failed to fetch query".to_owned())]);
    }

    #[test]
    fn only_the_newest_query_applies() {
        let (mut playground, _) = playground("http://localhost:4000/graphql");

        let first = playground.begin_query();
        let second = playground.begin_query();

        assert_eq!(
            playground.finish_query(first.ticket(), Ok(json!({ "data": 1 }))),
            Outcome::Stale
        );
        assert!(playground.store().transient().is_query_loading);

        assert_eq!(
            playground.finish_query(second.ticket(), Ok(json!({ "data": 2 }))),
            Outcome::Applied
        );
        assert!(!playground.store().transient().is_query_loading);
        assert_eq!(playground.store().state().result, json!({ "data": 2 }));
    }

    #[test]
    fn late_introspections_are_dropped() {
        let (mut playground, _) = playground("http://localhost:4000/graphql");

        let first = playground.begin_introspection();
        let second = playground.begin_introspection();

        assert_eq!(
            playground.finish_introspection(second.ticket(), Ok(fixture())),
            Outcome::Applied
        );
        assert_eq!(
            playground.finish_introspection(first.ticket(), Ok(json!({ "__schema": {} }))),
            Outcome::Stale
        );
        assert_eq!(playground.store().state().introspection, Some(fixture()));
        assert_eq!(playground.schema_generation(), 1);
    }

    #[tokio::test]
    async fn a_new_schema_resets_the_documentation() {
        let server = introspection_server().await;
        let (mut playground, _) = playground(&server.uri());
        playground.load_schema().await;

        playground.open_documentation();
        let query = playground.schema().unwrap().root_operation_types().query;
        playground.navigator_mut().go_to(query);
        assert_eq!(playground.documentation().unwrap().title, "Query");

        playground.close_sidebar();
        playground.load_schema().await;
        playground.toggle_sidebar(SidebarView::Docs);

        assert!(playground.store().state().open_sidebar);
        assert_eq!(playground.navigator().depth(), 0);
        assert_eq!(playground.documentation().unwrap().kind, PageKind::Root);
    }

    #[test]
    fn reopening_keeps_the_documentation_history() {
        let (mut playground, _) = playground("http://localhost:4000/graphql");
        let ticket = playground.begin_introspection().ticket();
        playground.finish_introspection(ticket, Ok(fixture()));

        playground.open_documentation();
        let query = playground.schema().unwrap().root_operation_types().query;
        playground.navigator_mut().go_to(query);
        playground.open_settings();
        playground.open_documentation();

        assert_eq!(playground.navigator().depth(), 1);
    }

    #[test]
    fn links_from_a_replaced_schema_are_ignored() {
        let (mut playground, _) = playground("http://localhost:4000/graphql");
        let ticket = playground.begin_introspection().ticket();
        playground.finish_introspection(ticket, Ok(fixture()));
        playground.open_documentation();

        let schema = playground.schema().unwrap();
        let stale = *schema.extract_fields(schema.root_operation_types().query).last().unwrap();

        let smaller = json!({
            "__schema": {
                "queryType": { "name": "Query" },
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "fields": [
                            { "name": "ok", "args": [], "type": { "kind": "SCALAR", "name": "Boolean" } }
                        ]
                    },
                    { "kind": "SCALAR", "name": "Boolean" }
                ]
            }
        });
        let ticket = playground.begin_introspection().ticket();
        assert_eq!(playground.finish_introspection(ticket, Ok(smaller)), Outcome::Applied);

        assert!(!playground.go_to(stale));
        assert_eq!(playground.navigator().depth(), 0);

        playground.navigator_mut().go_to(stale);
        assert_eq!(playground.documentation().unwrap().kind, PageKind::Root);

        let query = playground.schema().unwrap().root_operation_types().query;
        assert!(playground.go_to(query));
        assert_eq!(playground.documentation().unwrap().title, "Query");
    }

    #[test]
    fn following_links_without_a_schema() {
        let (mut playground, _) = playground("http://localhost:4000/graphql");
        let schema = gqlpen_schema::build_schema(&fixture()).unwrap();

        assert!(!playground.go_to(schema.root_operation_types().query));
        assert_eq!(playground.navigator().depth(), 0);
    }

    #[test]
    fn saving() {
        let (mut playground, notifier) = playground("http://localhost:4000/graphql");
        assert!(playground.confirm_exit_required());

        playground.save().unwrap();

        assert!(!playground.confirm_exit_required());
        assert_eq!(notifier.messages(), [(Severity::Success, "Saved!".to_owned())]);
    }
}
