//! Documentation browsing as a stack of visited schema nodes.
//!
//! An empty history is the root page listing the operation types. Every link on a page pushes
//! its target; going back pops. Node ids are only meaningful for the schema they came from, so
//! the history remembers which schema generation it was built against and starts over when a
//! different one shows up.

mod page;

use gqlpen_schema::{NodeId, Schema};

pub use page::{Link, Page, PageKind, Row};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    history: Vec<NodeId>,
    generation: u64,
}

impl Navigator {
    pub fn new(generation: u64) -> Self {
        Navigator {
            history: Vec::new(),
            generation,
        }
    }

    /// Visiting the current node again pushes it again.
    pub fn go_to(&mut self, node: impl Into<NodeId>) {
        self.history.push(node.into());
    }

    pub fn go_back(&mut self) {
        self.history.pop();
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn current(&self) -> Option<NodeId> {
        self.history.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[NodeId] {
        &self.history
    }

    /// Drops the history if it was built against another schema generation.
    pub fn sync(&mut self, generation: u64) {
        if self.generation == generation {
            return;
        }

        if !self.history.is_empty() {
            tracing::debug!(
                "schema changed from generation {} to {generation}, resetting documentation history",
                self.generation
            );
        }

        self.history.clear();
        self.generation = generation;
    }

    pub fn page(&self, schema: &Schema) -> Page {
        Page::resolve(schema, self.current())
    }
}

#[cfg(test)]
mod tests {
    use gqlpen_schema::{build_schema, TypeRecord};

    use super::*;
    use crate::tests::fixture;

    fn schema() -> Schema {
        build_schema(&fixture()).unwrap()
    }

    fn follow(navigator: &mut Navigator, schema: &Schema, label: &str) {
        let link = navigator
            .page(schema)
            .links()
            .into_iter()
            .find(|link| link.label == label)
            .unwrap();

        navigator.go_to(link.target);
    }

    #[test]
    fn root_page() {
        let schema = schema();
        let page = Navigator::default().page(&schema);

        assert_eq!(page.kind, PageKind::Root);
        assert!(!page.can_go_back());
        insta::assert_snapshot!(page, @r###"
        Schema

        query: Query
        mutation: Mutation
        "###);
    }

    #[test]
    fn object_page() {
        let schema = schema();
        let mut navigator = Navigator::default();
        follow(&mut navigator, &schema, "Query");

        let page = navigator.page(&schema);

        assert_eq!(page.kind, PageKind::Object);
        assert!(page.can_go_back());
        insta::assert_snapshot!(page, @r###"
        Query
        Query any Pokémon by number or name

        pokemons(first): [Pokemon]
          List the first Pokémon
        pokemon(id, name): Pokemon
          Find a Pokémon by id or name
        search(filter): [SearchResult!]!
        node: Node (deprecated)
        "###);
    }

    #[test]
    fn object_fields_link_to_the_field_and_its_type() {
        let schema = schema();
        let mut navigator = Navigator::default();
        navigator.go_to(schema.root_operation_types().query);

        let labels = navigator
            .page(&schema)
            .links()
            .into_iter()
            .map(|link| link.label)
            .collect::<Vec<_>>();

        assert_eq!(
            labels,
            [
                "pokemons(first)",
                "[Pokemon]",
                "pokemon(id, name)",
                "Pokemon",
                "search(filter)",
                "[SearchResult!]!",
                "node",
                "Node",
            ]
        );
    }

    #[test]
    fn field_page() {
        let schema = schema();
        let mut navigator = Navigator::default();
        follow(&mut navigator, &schema, "Query");
        follow(&mut navigator, &schema, "pokemons(first)");

        let page = navigator.page(&schema);

        assert_eq!(page.kind, PageKind::Field);
        insta::assert_snapshot!(page, @r###"
        pokemons
        List the first Pokémon
        type: [Pokemon]

        first: Int! = 10
          How many Pokémon to return
        "###);
        assert_eq!(
            page.links().into_iter().map(|link| link.label).collect::<Vec<_>>(),
            ["[Pokemon]", "Int!"]
        );
    }

    #[test]
    fn deprecated_field_page() {
        let schema = schema();
        let mut navigator = Navigator::default();
        follow(&mut navigator, &schema, "Query");
        follow(&mut navigator, &schema, "node");

        insta::assert_snapshot!(navigator.page(&schema), @r###"
        node
        Deprecated: Use `pokemon` instead
        type: Node
        "###);
    }

    #[test]
    fn wrapped_types_show_the_named_type() {
        let schema = schema();
        let mut navigator = Navigator::default();
        follow(&mut navigator, &schema, "Query");
        follow(&mut navigator, &schema, "[SearchResult!]!");

        assert!(matches!(navigator.current(), Some(NodeId::Type(TypeRecord::NonNull(_)))));

        let page = navigator.page(&schema);

        assert_eq!(page.kind, PageKind::Union);
        insta::assert_snapshot!(page, @r###"
        SearchResult

        Pokemon
          Represents a Pokémon
        Attack
          Represents a Pokémon's attack types
        "###);

        follow(&mut navigator, &schema, "Attack");
        assert_eq!(navigator.page(&schema).title, "Attack");
    }

    #[test]
    fn wrapped_scalars_show_the_scalar_page() {
        let schema = schema();
        let mut navigator = Navigator::default();
        navigator.go_to(schema.definition_by_name("Pokemon").unwrap());
        follow(&mut navigator, &schema, "[String!]!");

        assert!(matches!(navigator.current(), Some(NodeId::Type(TypeRecord::NonNull(_)))));

        let page = navigator.page(&schema);

        assert_eq!(page.kind, PageKind::Scalar);
        assert_eq!(page.title, "String");
        assert!(page.links().is_empty());
    }

    #[test]
    fn input_object_rows_only_link_their_type() {
        let schema = schema();
        let mut navigator = Navigator::default();
        navigator.go_to(schema.definition_by_name("PokemonFilter").unwrap());

        let page = navigator.page(&schema);

        assert_eq!(page.kind, PageKind::InputObject);
        insta::assert_snapshot!(page, @r###"
        PokemonFilter
        Filter Pokémon by name and type

        name: String
        types: [PokemonType!]
        "###);
        assert!(page.rows.iter().all(|row| row.target.is_none()));
        assert_eq!(page.links().len(), 2);
    }

    #[test]
    fn enum_interface_and_scalar_pages() {
        let schema = schema();
        let mut navigator = Navigator::default();

        navigator.go_to(schema.definition_by_name("PokemonType").unwrap());
        insta::assert_snapshot!(navigator.page(&schema), @r###"
        PokemonType

        FIRE
        WATER
        GRASS (deprecated)
        "###);

        navigator.go_to(schema.definition_by_name("Node").unwrap());
        insta::assert_snapshot!(navigator.page(&schema), @r###"
        Node
        An object with an id
        implemented by Pokemon

        id: ID!
        "###);

        follow(&mut navigator, &schema, "Pokemon");
        assert!(navigator.page(&schema).to_string().contains("implements Node"));

        navigator.go_to(schema.definition_by_name("ID").unwrap());
        let page = navigator.page(&schema);
        assert_eq!(page.kind, PageKind::Scalar);
        assert!(page.rows.is_empty());
        assert!(page.links().is_empty());
    }

    #[test]
    fn argument_page() {
        let schema = schema();
        let query = schema.walk(schema.root_operation_types().query);
        let first = query.fields().next().unwrap().arguments().next().unwrap();
        let mut navigator = Navigator::default();

        navigator.go_to(first.id());

        let page = navigator.page(&schema);
        assert_eq!(page.kind, PageKind::InputValue);
        insta::assert_snapshot!(page, @r###"
        first
        How many Pokémon to return
        type: Int! = 10
        "###);
    }

    #[test]
    fn going_back() {
        let schema = schema();
        let mut navigator = Navigator::default();

        navigator.go_back();
        assert_eq!(navigator.depth(), 0);

        follow(&mut navigator, &schema, "Query");
        follow(&mut navigator, &schema, "Pokemon");
        follow(&mut navigator, &schema, "[Attack]");
        assert_eq!(navigator.depth(), 3);
        assert_eq!(navigator.page(&schema).title, "Attack");

        navigator.go_back();
        assert_eq!(navigator.page(&schema).title, "Pokemon");

        navigator.go_back();
        navigator.go_back();
        navigator.go_back();
        assert_eq!(navigator.page(&schema).kind, PageKind::Root);
    }

    #[test]
    fn revisiting_pushes_again() {
        let schema = schema();
        let query = schema.root_operation_types().query;
        let mut navigator = Navigator::default();

        navigator.go_to(query);
        navigator.go_to(query);

        assert_eq!(navigator.depth(), 2);
        assert_eq!(navigator.history(), [NodeId::from(query), NodeId::from(query)]);
    }

    #[test]
    fn sync_only_resets_on_a_new_schema() {
        let schema = schema();
        let mut navigator = Navigator::new(1);
        navigator.go_to(schema.root_operation_types().query);

        navigator.sync(1);
        assert_eq!(navigator.depth(), 1);

        navigator.sync(2);
        assert_eq!(navigator.depth(), 0);
        assert_eq!(navigator.current(), None);
    }
}
