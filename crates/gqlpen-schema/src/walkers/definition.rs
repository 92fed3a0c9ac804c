use super::{EnumValueWalker, FieldWalker, InputValueWalker, SchemaWalker};
use crate::{DefinitionKind, NodeKind, TypeDefinitionId};

pub type TypeDefinitionWalker<'a> = SchemaWalker<'a, TypeDefinitionId>;

impl<'a> TypeDefinitionWalker<'a> {
    pub fn name(&self) -> &'a str {
        &self.as_ref().name
    }

    pub fn description(&self) -> Option<&'a str> {
        self.as_ref().description.as_deref()
    }

    pub fn node_kind(&self) -> NodeKind {
        self.as_ref().kind.node_kind()
    }

    /// Output fields of objects and interfaces.
    pub fn fields(&self) -> impl Iterator<Item = FieldWalker<'a>> + 'a {
        let walker = *self;
        let range = match &self.as_ref().kind {
            DefinitionKind::Object { fields, .. } | DefinitionKind::Interface { fields, .. } => Some(*fields),
            _ => None,
        };

        range.into_iter().flat_map(|range| range.iter()).map(move |id| walker.walk(id))
    }

    /// Fields of input objects.
    pub fn input_fields(&self) -> impl Iterator<Item = InputValueWalker<'a>> + 'a {
        let walker = *self;
        let range = match &self.as_ref().kind {
            DefinitionKind::InputObject { fields } => Some(*fields),
            _ => None,
        };

        range.into_iter().flat_map(|range| range.iter()).map(move |id| walker.walk(id))
    }

    pub fn enum_values(&self) -> impl Iterator<Item = EnumValueWalker<'a>> + 'a {
        let walker = *self;
        let range = match &self.as_ref().kind {
            DefinitionKind::Enum { values } => Some(*values),
            _ => None,
        };

        range.into_iter().flat_map(|range| range.iter()).map(move |id| walker.walk(id))
    }

    /// Members of a union, or implementors of an interface.
    pub fn possible_types(&self) -> impl Iterator<Item = TypeDefinitionWalker<'a>> + 'a {
        let walker = *self;
        let ids: &'a [TypeDefinitionId] = match &self.as_ref().kind {
            DefinitionKind::Union { possible_types } | DefinitionKind::Interface { possible_types, .. } => {
                possible_types
            }
            _ => &[],
        };

        ids.iter().map(move |id| walker.walk(*id))
    }

    pub fn interfaces(&self) -> impl Iterator<Item = TypeDefinitionWalker<'a>> + 'a {
        let walker = *self;
        let ids: &'a [TypeDefinitionId] = match &self.as_ref().kind {
            DefinitionKind::Object { interfaces, .. } => interfaces,
            _ => &[],
        };

        ids.iter().map(move |id| walker.walk(*id))
    }

    pub fn specified_by_url(&self) -> Option<&'a str> {
        match &self.as_ref().kind {
            DefinitionKind::Scalar { specified_by_url } => specified_by_url.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for TypeDefinitionWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("id", &usize::from(self.item))
            .field("name", &self.name())
            .field("kind", &self.node_kind())
            .finish()
    }
}
