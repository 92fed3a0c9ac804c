use std::fmt;

use gqlpen_schema::{
    DefinitionKind, Deprecation, FieldWalker, InputValueWalker, NodeId, Schema, TypeDefinitionWalker, TypeWalker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Root,
    Scalar,
    Object,
    Interface,
    InputObject,
    Enum,
    Union,
    Field,
    InputValue,
}

/// Something on a page that navigates to another node when followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub target: NodeId,
}

/// One entry of a page: a field, argument, input field, enum value, union member or root
/// operation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub name: String,
    /// Set when the name itself leads to a page of its own
    pub target: Option<NodeId>,
    pub ty: Option<Link>,
    pub default_value: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
}

impl Row {
    fn named(name: impl Into<String>) -> Self {
        Row {
            name: name.into(),
            target: None,
            ty: None,
            default_value: None,
            description: None,
            deprecated: false,
        }
    }

    fn field(field: FieldWalker<'_>) -> Self {
        Row {
            target: Some(field.id().into()),
            ty: Some(type_link(field.ty())),
            description: field.description().map(ToOwned::to_owned),
            deprecated: field.deprecation().is_deprecated(),
            ..Row::named(field.signature())
        }
    }

    fn input_value(value: InputValueWalker<'_>) -> Self {
        Row {
            ty: Some(type_link(value.ty())),
            default_value: value.default_value().map(ToOwned::to_owned),
            description: value.description().map(ToOwned::to_owned),
            ..Row::named(value.name())
        }
    }

    fn links(&self) -> impl Iterator<Item = Link> + '_ {
        let name = self.target.map(|target| Link {
            label: self.name.clone(),
            target,
        });

        name.into_iter().chain(self.ty.clone())
    }
}

/// A rendered documentation page. Owns its text, so it stays readable after the schema it was
/// built from is replaced. Its link targets only point into that schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub kind: PageKind,
    pub title: String,
    pub description: Option<String>,
    pub deprecation: Deprecation,
    /// Declared type of a field, argument or input field
    pub ty: Option<Link>,
    pub default_value: Option<String>,
    /// Interfaces of an object, implementors of an interface
    pub related: Vec<Link>,
    pub rows: Vec<Row>,
}

impl Page {
    pub(super) fn resolve(schema: &Schema, node: Option<NodeId>) -> Page {
        let Some(node) = node else {
            return Page::root(schema);
        };

        if !schema.contains(node) {
            tracing::debug!("{node:?} does not belong to the current schema, showing the root page");
            return Page::root(schema);
        }

        match node {
            NodeId::Type(record) => Page::definition(schema.walk(schema.named_type(record))),
            NodeId::Field(id) => Page::field(schema.walk(id)),
            NodeId::InputValue(id) => Page::input_value(schema.walk(id)),
        }
    }

    /// Whether going back leads anywhere. Only the root page has nothing behind it.
    pub fn can_go_back(&self) -> bool {
        self.kind != PageKind::Root
    }

    /// Every link on the page, in reading order.
    pub fn links(&self) -> Vec<Link> {
        self.ty
            .iter()
            .cloned()
            .chain(self.related.iter().cloned())
            .chain(self.rows.iter().flat_map(|row| row.links()))
            .collect()
    }

    fn empty(kind: PageKind, title: impl Into<String>, description: Option<&str>) -> Page {
        Page {
            kind,
            title: title.into(),
            description: description.map(ToOwned::to_owned),
            deprecation: Deprecation::None,
            ty: None,
            default_value: None,
            related: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn root(schema: &Schema) -> Page {
        let walker = schema.walker();
        let mut page = Page::empty(PageKind::Root, "Schema", schema.description());

        let roots = [
            ("query", Some(walker.query())),
            ("mutation", walker.mutation()),
            ("subscription", walker.subscription()),
        ];

        for (operation, definition) in roots {
            let Some(definition) = definition else {
                continue;
            };

            page.rows.push(Row {
                ty: Some(definition_link(definition)),
                ..Row::named(operation)
            });
        }

        page
    }

    fn definition(definition: TypeDefinitionWalker<'_>) -> Page {
        let page = |kind| Page::empty(kind, definition.name(), definition.description());

        match &definition.as_ref().kind {
            DefinitionKind::Scalar { specified_by_url } => {
                let mut page = page(PageKind::Scalar);
                if let Some(url) = specified_by_url {
                    page.description = Some(match page.description.take() {
                        Some(description) => format!("{description}\nSpecified by {url}"),
                        None => format!("Specified by {url}"),
                    });
                }
                page
            }
            DefinitionKind::Object { .. } => Page {
                related: definition.interfaces().map(definition_link).collect(),
                rows: definition.fields().map(Row::field).collect(),
                ..page(PageKind::Object)
            },
            DefinitionKind::Interface { .. } => Page {
                related: definition.possible_types().map(definition_link).collect(),
                rows: definition.fields().map(Row::field).collect(),
                ..page(PageKind::Interface)
            },
            DefinitionKind::InputObject { .. } => Page {
                rows: definition.input_fields().map(Row::input_value).collect(),
                ..page(PageKind::InputObject)
            },
            DefinitionKind::Enum { .. } => Page {
                rows: definition
                    .enum_values()
                    .map(|value| Row {
                        description: value.description().map(ToOwned::to_owned),
                        deprecated: value.deprecation().is_deprecated(),
                        ..Row::named(value.name())
                    })
                    .collect(),
                ..page(PageKind::Enum)
            },
            DefinitionKind::Union { .. } => Page {
                rows: definition
                    .possible_types()
                    .map(|member| Row {
                        target: Some(member.id().into()),
                        description: member.description().map(ToOwned::to_owned),
                        ..Row::named(member.name())
                    })
                    .collect(),
                ..page(PageKind::Union)
            },
        }
    }

    fn field(field: FieldWalker<'_>) -> Page {
        Page {
            deprecation: field.deprecation().clone(),
            ty: Some(type_link(field.ty())),
            rows: field.arguments().map(Row::input_value).collect(),
            ..Page::empty(PageKind::Field, field.name(), field.description())
        }
    }

    fn input_value(value: InputValueWalker<'_>) -> Page {
        Page {
            ty: Some(type_link(value.ty())),
            default_value: value.default_value().map(ToOwned::to_owned),
            ..Page::empty(PageKind::InputValue, value.name(), value.description())
        }
    }
}

fn type_link(ty: TypeWalker<'_>) -> Link {
    Link {
        label: ty.to_string(),
        target: ty.record().into(),
    }
}

fn definition_link(definition: TypeDefinitionWalker<'_>) -> Link {
    Link {
        label: definition.name().to_owned(),
        target: definition.id().into(),
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;

        match &self.deprecation {
            Deprecation::None => {}
            Deprecation::Deprecated { reason: None } => writeln!(f, "Deprecated")?,
            Deprecation::Deprecated { reason: Some(reason) } => writeln!(f, "Deprecated: {reason}")?,
        }

        if let Some(description) = &self.description {
            writeln!(f, "{description}")?;
        }

        if let Some(ty) = &self.ty {
            write!(f, "type: {}", ty.label)?;
            if let Some(default) = &self.default_value {
                write!(f, " = {default}")?;
            }
            writeln!(f)?;
        }

        if !self.related.is_empty() {
            let prefix = match self.kind {
                PageKind::Interface => "implemented by",
                _ => "implements",
            };
            let names = self.related.iter().map(|link| link.label.as_str()).collect::<Vec<_>>();
            writeln!(f, "{prefix} {}", names.join(", "))?;
        }

        if self.rows.is_empty() {
            return Ok(());
        }

        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{}", row.name)?;
            if let Some(ty) = &row.ty {
                write!(f, ": {}", ty.label)?;
            }
            if let Some(default) = &row.default_value {
                write!(f, " = {default}")?;
            }
            if row.deprecated {
                write!(f, " (deprecated)")?;
            }
            writeln!(f)?;

            if let Some(description) = &row.description {
                writeln!(f, "  {description}")?;
            }
        }

        Ok(())
    }
}
