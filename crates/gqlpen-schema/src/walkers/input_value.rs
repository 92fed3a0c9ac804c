use super::{FieldWalker, SchemaWalker, TypeDefinitionWalker, TypeWalker};
use crate::{InputValueId, InputValueParent};

pub type InputValueWalker<'a> = SchemaWalker<'a, InputValueId>;

impl<'a> InputValueWalker<'a> {
    pub fn name(&self) -> &'a str {
        &self.as_ref().name
    }

    pub fn description(&self) -> Option<&'a str> {
        self.as_ref().description.as_deref()
    }

    pub fn ty(&self) -> TypeWalker<'a> {
        self.walk(self.as_ref().ty)
    }

    pub fn default_value(&self) -> Option<&'a str> {
        self.as_ref().default_value.as_deref()
    }

    pub fn is_argument(&self) -> bool {
        matches!(self.as_ref().parent, InputValueParent::Field(_))
    }

    /// The field declaring this argument, if it is one.
    pub fn field(&self) -> Option<FieldWalker<'a>> {
        match self.as_ref().parent {
            InputValueParent::Field(id) => Some(self.walk(id)),
            InputValueParent::InputObject(_) => None,
        }
    }

    /// The input object declaring this field, if it is one.
    pub fn input_object(&self) -> Option<TypeDefinitionWalker<'a>> {
        match self.as_ref().parent {
            InputValueParent::InputObject(id) => Some(self.walk(id)),
            InputValueParent::Field(_) => None,
        }
    }
}

impl std::fmt::Debug for InputValueWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputValue")
            .field("name", &self.name())
            .field("type", &self.ty().to_string())
            .field("default_value", &self.default_value())
            .finish()
    }
}
