/// Isolating ids from the rest to prevent misuse of the NonZeroU32.
/// They can only be created by From<usize>
use crate::{EnumValue, Field, InputValue, Schema, TypeDefinition, Wrapper};

/// Introspection documents of real servers stay far below this, and keeping the upper bits free
/// leaves room to pack ids later.
const MAX_ID: usize = (1 << 29) - 1;

macro_rules! id_newtypes {
    ($($ty:ident.$field:ident[$name:ident] => $out:ident unless $msg:literal,)*) => {
        $(
            #[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
            pub struct $name(std::num::NonZeroU32);

            impl std::ops::Index<$name> for $ty {
                type Output = $out;

                fn index(&self, index: $name) -> &$out {
                    &self.$field[usize::from(index)]
                }
            }

            impl From<usize> for $name {
                fn from(index: usize) -> Self {
                    assert!(index <= MAX_ID, $msg);
                    Self(std::num::NonZeroU32::MIN.saturating_add(index as u32))
                }
            }

            impl From<$name> for usize {
                fn from(id: $name) -> Self {
                    (id.0.get() - 1) as usize
                }
            }
        )*
    }
}

id_newtypes! {
    Schema.type_definitions[TypeDefinitionId] => TypeDefinition unless "Too many type definitions",
    Schema.wrappers[WrapperId] => Wrapper unless "Too many wrapping types",
    Schema.fields[FieldId] => Field unless "Too many fields",
    Schema.input_values[InputValueId] => InputValue unless "Too many input values",
    Schema.enum_values[EnumValueId] => EnumValue unless "Too many enum values",
}

/// A contiguous run of ids, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdRange<Id> {
    start: Id,
    end: Id,
}

impl<Id> IdRange<Id>
where
    Id: From<usize> + Copy + 'static,
    usize: From<Id>,
{
    pub(crate) fn new(start: usize, end: usize) -> Self {
        IdRange {
            start: Id::from(start),
            end: Id::from(end),
        }
    }

    pub fn len(&self) -> usize {
        usize::from(self.end) - usize::from(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = Id> + 'static {
        (usize::from(self.start)..usize::from(self.end)).map(Id::from)
    }
}
