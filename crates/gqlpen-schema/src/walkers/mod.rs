use crate::Schema;

mod definition;
mod enum_value;
mod field;
mod input_value;
mod r#type;

pub use definition::*;
pub use enum_value::*;
pub use field::*;
pub use input_value::*;
pub use r#type::*;

#[derive(Clone, Copy)]
pub struct SchemaWalker<'a, I = ()> {
    pub(crate) item: I,
    pub(crate) schema: &'a Schema,
}

impl<'a, I> SchemaWalker<'a, I> {
    pub fn new(item: I, schema: &'a Schema) -> Self {
        Self { item, schema }
    }

    pub fn walk<Other>(&self, item: Other) -> SchemaWalker<'a, Other> {
        SchemaWalker {
            item,
            schema: self.schema,
        }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }
}

impl<'a, Id: Copy> SchemaWalker<'a, Id>
where
    Schema: std::ops::Index<Id>,
{
    // Clippy complains because it's ambiguous with AsRef. But AsRef doesn't allow us to add the 'a
    // lifetime.
    #[allow(clippy::should_implement_trait)]
    pub fn as_ref(&self) -> &'a <Schema as std::ops::Index<Id>>::Output {
        &self.schema[self.item]
    }

    pub fn id(&self) -> Id {
        self.item
    }
}

impl<'a> SchemaWalker<'a, ()> {
    pub fn definitions(&self) -> impl ExactSizeIterator<Item = TypeDefinitionWalker<'a>> + 'a {
        let walker = *self;
        self.schema.definition_ids().map(move |id| walker.walk(id))
    }

    pub fn query(&self) -> TypeDefinitionWalker<'a> {
        self.walk(self.schema.root_operation_types.query)
    }

    pub fn mutation(&self) -> Option<TypeDefinitionWalker<'a>> {
        self.schema.root_operation_types.mutation.map(|id| self.walk(id))
    }

    pub fn subscription(&self) -> Option<TypeDefinitionWalker<'a>> {
        self.schema.root_operation_types.subscription.map(|id| self.walk(id))
    }
}

impl<'a, Id: Copy> std::ops::Deref for SchemaWalker<'a, Id>
where
    Schema: std::ops::Index<Id>,
{
    type Target = <Schema as std::ops::Index<Id>>::Output;

    fn deref(&self) -> &Self::Target {
        &self.schema[self.item]
    }
}
