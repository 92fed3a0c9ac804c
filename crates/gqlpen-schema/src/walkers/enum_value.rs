use super::SchemaWalker;
use crate::{Deprecation, EnumValueId};

pub type EnumValueWalker<'a> = SchemaWalker<'a, EnumValueId>;

impl<'a> EnumValueWalker<'a> {
    pub fn name(&self) -> &'a str {
        &self.as_ref().name
    }

    pub fn description(&self) -> Option<&'a str> {
        self.as_ref().description.as_deref()
    }

    pub fn deprecation(&self) -> &'a Deprecation {
        &self.as_ref().deprecation
    }
}
