use super::{InputValueWalker, SchemaWalker, TypeDefinitionWalker, TypeWalker};
use crate::{Deprecation, FieldId};

pub type FieldWalker<'a> = SchemaWalker<'a, FieldId>;

impl<'a> FieldWalker<'a> {
    pub fn name(&self) -> &'a str {
        &self.as_ref().name
    }

    pub fn description(&self) -> Option<&'a str> {
        self.as_ref().description.as_deref()
    }

    pub fn ty(&self) -> TypeWalker<'a> {
        self.walk(self.as_ref().ty)
    }

    pub fn arguments(&self) -> impl ExactSizeIterator<Item = InputValueWalker<'a>> + 'a {
        let walker = *self;
        self.as_ref().arguments.iter().map(move |id| walker.walk(id))
    }

    pub fn deprecation(&self) -> &'a Deprecation {
        &self.as_ref().deprecation
    }

    pub fn parent(&self) -> TypeDefinitionWalker<'a> {
        self.walk(self.as_ref().parent)
    }

    /// `name(arg1, arg2)`, or just the name when the field takes no arguments.
    pub fn signature(&self) -> String {
        if self.as_ref().arguments.is_empty() {
            return self.name().to_owned();
        }

        let names = self.arguments().map(|argument| argument.name()).collect::<Vec<_>>();
        format!("{}({})", self.name(), names.join(", "))
    }
}

impl std::fmt::Debug for FieldWalker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name())
            .field("type", &self.ty().to_string())
            .field("arguments", &self.arguments().map(|arg| arg.name()).collect::<Vec<_>>())
            .finish()
    }
}
