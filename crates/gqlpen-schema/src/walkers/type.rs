use super::{SchemaWalker, TypeDefinitionWalker};
use crate::TypeRecord;

pub type TypeWalker<'a> = SchemaWalker<'a, TypeRecord>;

impl<'a> TypeWalker<'a> {
    pub fn record(&self) -> TypeRecord {
        self.item
    }

    /// The type directly wrapped by a list or non-null, `None` for named types.
    pub fn of_type(&self) -> Option<TypeWalker<'a>> {
        match self.item {
            TypeRecord::Named(_) => None,
            TypeRecord::List(id) | TypeRecord::NonNull(id) => Some(self.walk(self.schema[id].of_type)),
        }
    }

    /// The named type at the bottom of every wrapper.
    pub fn named(&self) -> TypeDefinitionWalker<'a> {
        self.walk(self.schema.named_type(self.item))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self.item, TypeRecord::NonNull(_))
    }
}

impl std::fmt::Display for TypeWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.item {
            TypeRecord::Named(id) => f.write_str(&self.schema[id].name),
            TypeRecord::List(id) => write!(f, "[{}]", self.walk(self.schema[id].of_type)),
            TypeRecord::NonNull(id) => write!(f, "{}!", self.walk(self.schema[id].of_type)),
        }
    }
}

impl std::fmt::Debug for TypeWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Type")
            .field("name", &self.to_string())
            .field("named", &self.named())
            .finish()
    }
}
