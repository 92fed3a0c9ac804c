//! Client-side GraphQL schema graph.
//!
//! A [`Schema`] is built once from an introspection result with [`build_schema`] and never
//! mutated afterwards. Every record lives in a flat vector owned by the schema and is addressed
//! with a small copyable id, so documentation history and editor integrations can hold on to
//! nodes without borrowing the schema. Wrapping types (lists and non-null) are records of their
//! own that point at the type they wrap; the wrapped definition is shared, never cloned.

mod builder;
mod error;
mod ids;
mod query;
mod sdl;
mod walkers;

use indexmap::IndexMap;

pub use builder::{build_optional_schema, build_schema};
pub use error::BuildError;
pub use ids::*;
pub use query::INTROSPECTION_QUERY;
pub use sdl::render_sdl;
pub use walkers::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(crate) description: Option<String>,
    pub(crate) root_operation_types: RootOperationTypes,
    pub(crate) definitions_by_name: IndexMap<String, TypeDefinitionId>,
    pub(crate) type_definitions: Vec<TypeDefinition>,
    pub(crate) wrappers: Vec<Wrapper>,
    pub(crate) fields: Vec<Field>,
    pub(crate) input_values: Vec<InputValue>,
    pub(crate) enum_values: Vec<EnumValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootOperationTypes {
    pub query: TypeDefinitionId,
    pub mutation: Option<TypeDefinitionId>,
    pub subscription: Option<TypeDefinitionId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub kind: DefinitionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionKind {
    Scalar {
        specified_by_url: Option<String>,
    },
    Object {
        fields: IdRange<FieldId>,
        interfaces: Vec<TypeDefinitionId>,
    },
    Interface {
        fields: IdRange<FieldId>,
        possible_types: Vec<TypeDefinitionId>,
    },
    Union {
        possible_types: Vec<TypeDefinitionId>,
    },
    Enum {
        values: IdRange<EnumValueId>,
    },
    InputObject {
        fields: IdRange<InputValueId>,
    },
}

/// A reference to a type as written on a field or argument: either a named definition or one
/// level of wrapping around another reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRecord {
    Named(TypeDefinitionId),
    List(WrapperId),
    NonNull(WrapperId),
}

/// One level of list or non-null wrapping. The wrapper kind is carried by the [`TypeRecord`]
/// pointing at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wrapper {
    pub of_type: TypeRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRecord,
    pub arguments: IdRange<InputValueId>,
    pub deprecation: Deprecation,
    pub parent: TypeDefinitionId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRecord,
    pub default_value: Option<String>,
    pub parent: InputValueParent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputValueParent {
    InputObject(TypeDefinitionId),
    Field(FieldId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Deprecation,
    pub parent: TypeDefinitionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Deprecation {
    #[default]
    None,
    Deprecated {
        reason: Option<String>,
    },
}

impl Deprecation {
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Deprecation::Deprecated { .. })
    }
}

/// Any node of the schema graph that documentation can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    Type(TypeRecord),
    Field(FieldId),
    InputValue(InputValueId),
}

impl From<TypeRecord> for NodeId {
    fn from(record: TypeRecord) -> Self {
        NodeId::Type(record)
    }
}

impl From<TypeDefinitionId> for NodeId {
    fn from(id: TypeDefinitionId) -> Self {
        NodeId::Type(TypeRecord::Named(id))
    }
}

impl From<FieldId> for NodeId {
    fn from(id: FieldId) -> Self {
        NodeId::Field(id)
    }
}

impl From<InputValueId> for NodeId {
    fn from(id: InputValueId) -> Self {
        NodeId::InputValue(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
    Field,
    InputField,
    Argument,
}

impl Schema {
    pub fn walk<I>(&self, item: I) -> SchemaWalker<'_, I> {
        SchemaWalker::new(item, self)
    }

    pub fn walker(&self) -> SchemaWalker<'_, ()> {
        SchemaWalker::new((), self)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn root_operation_types(&self) -> RootOperationTypes {
        self.root_operation_types
    }

    pub fn definition_by_name(&self, name: &str) -> Option<TypeDefinitionId> {
        self.definitions_by_name.get(name).copied()
    }

    pub fn definition_ids(&self) -> impl ExactSizeIterator<Item = TypeDefinitionId> + 'static {
        (0..self.type_definitions.len()).map(TypeDefinitionId::from)
    }

    pub fn kind(&self, node: NodeId) -> NodeKind {
        match node {
            NodeId::Type(TypeRecord::Named(id)) => self[id].kind.node_kind(),
            NodeId::Type(TypeRecord::List(_)) => NodeKind::List,
            NodeId::Type(TypeRecord::NonNull(_)) => NodeKind::NonNull,
            NodeId::Field(_) => NodeKind::Field,
            NodeId::InputValue(id) => match self[id].parent {
                InputValueParent::InputObject(_) => NodeKind::InputField,
                InputValueParent::Field(_) => NodeKind::Argument,
            },
        }
    }

    /// Whether `node` points at a record of this schema. Ids kept from an earlier schema may
    /// point past its end.
    pub fn contains(&self, node: NodeId) -> bool {
        match node {
            NodeId::Type(TypeRecord::Named(id)) => usize::from(id) < self.type_definitions.len(),
            NodeId::Type(TypeRecord::List(id) | TypeRecord::NonNull(id)) => usize::from(id) < self.wrappers.len(),
            NodeId::Field(id) => usize::from(id) < self.fields.len(),
            NodeId::InputValue(id) => usize::from(id) < self.input_values.len(),
        }
    }

    /// Strips every list and non-null wrapper from a type reference.
    pub fn named_type(&self, mut record: TypeRecord) -> TypeDefinitionId {
        // Wrappers only ever point at records created before them, so this always reaches a
        // named definition.
        loop {
            match record {
                TypeRecord::Named(id) => return id,
                TypeRecord::List(id) | TypeRecord::NonNull(id) => record = self[id].of_type,
            }
        }
    }

    /// The declared fields of an object, interface or input object, in declaration order.
    ///
    /// Other kinds of definitions have no fields and yield an empty list.
    pub fn extract_fields(&self, id: TypeDefinitionId) -> Vec<NodeId> {
        match &self[id].kind {
            DefinitionKind::Object { fields, .. } | DefinitionKind::Interface { fields, .. } => {
                fields.iter().map(NodeId::Field).collect()
            }
            DefinitionKind::InputObject { fields } => fields.iter().map(NodeId::InputValue).collect(),
            DefinitionKind::Scalar { .. } | DefinitionKind::Union { .. } | DefinitionKind::Enum { .. } => Vec::new(),
        }
    }

    pub fn node_name(&self, node: NodeId) -> String {
        match node {
            NodeId::Type(record) => self.walk(record).to_string(),
            NodeId::Field(id) => self[id].name.clone(),
            NodeId::InputValue(id) => self[id].name.clone(),
        }
    }
}

impl DefinitionKind {
    pub fn node_kind(&self) -> NodeKind {
        match self {
            DefinitionKind::Scalar { .. } => NodeKind::Scalar,
            DefinitionKind::Object { .. } => NodeKind::Object,
            DefinitionKind::Interface { .. } => NodeKind::Interface,
            DefinitionKind::Union { .. } => NodeKind::Union,
            DefinitionKind::Enum { .. } => NodeKind::Enum,
            DefinitionKind::InputObject { .. } => NodeKind::InputObject,
        }
    }
}
