use std::fmt::{self, Write as _};

use crate::{Deprecation, FieldWalker, NodeKind, Schema, TypeDefinitionWalker};

static BUILTIN_SCALARS: &[&str] = &["Boolean", "Float", "ID", "Int", "String"];

/// Print the schema in GraphQL SDL, leaving out built-in scalars and introspection types.
pub fn render_sdl(schema: &Schema) -> String {
    Sdl(schema).to_string()
}

struct Sdl<'a>(&'a Schema);

impl fmt::Display for Sdl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let walker = self.0.walker();
        let mut first = true;

        let roots = [
            ("query", Some(walker.query()), "Query"),
            ("mutation", walker.mutation(), "Mutation"),
            ("subscription", walker.subscription(), "Subscription"),
        ];

        if roots
            .iter()
            .any(|(_, ty, default)| ty.is_some_and(|ty| ty.name() != *default))
        {
            f.write_str("schema {\n")?;
            for (operation, ty, _) in roots {
                if let Some(ty) = ty {
                    writeln!(f, "  {operation}: {}", ty.name())?;
                }
            }
            f.write_str("}\n")?;
            first = false;
        }

        for definition in walker.definitions() {
            let name = definition.name();

            if name.starts_with("__") || BUILTIN_SCALARS.contains(&name) {
                continue;
            }

            if !first {
                f.write_char('\n')?;
            }
            first = false;

            write_definition(f, definition)?;
        }

        Ok(())
    }
}

fn write_definition(f: &mut fmt::Formatter<'_>, definition: TypeDefinitionWalker<'_>) -> fmt::Result {
    if let Some(description) = definition.description() {
        writeln!(f, "{}", quoted(description))?;
    }

    let name = definition.name();

    match definition.node_kind() {
        NodeKind::Scalar => writeln!(f, "scalar {name}"),
        NodeKind::Object | NodeKind::Interface => {
            let keyword = if definition.node_kind() == NodeKind::Object {
                "type"
            } else {
                "interface"
            };

            write!(f, "{keyword} {name}")?;

            let interfaces = definition.interfaces().map(|ty| ty.name()).collect::<Vec<_>>();
            if !interfaces.is_empty() {
                write!(f, " implements {}", interfaces.join(" & "))?;
            }

            f.write_str(" {\n")?;
            for field in definition.fields() {
                write_field(f, field)?;
            }
            f.write_str("}\n")
        }
        NodeKind::Union => {
            let members = definition.possible_types().map(|ty| ty.name()).collect::<Vec<_>>();
            writeln!(f, "union {name} = {}", members.join(" | "))
        }
        NodeKind::Enum => {
            writeln!(f, "enum {name} {{")?;
            for value in definition.enum_values() {
                if let Some(description) = value.description() {
                    writeln!(f, "  {}", quoted(description))?;
                }
                writeln!(f, "  {}{}", value.name(), deprecated(value.deprecation()))?;
            }
            f.write_str("}\n")
        }
        NodeKind::InputObject => {
            writeln!(f, "input {name} {{")?;
            for field in definition.input_fields() {
                if let Some(description) = field.description() {
                    writeln!(f, "  {}", quoted(description))?;
                }
                write!(f, "  {}: {}", field.name(), field.ty())?;
                if let Some(default) = field.default_value() {
                    write!(f, " = {default}")?;
                }
                f.write_char('\n')?;
            }
            f.write_str("}\n")
        }
        NodeKind::List | NodeKind::NonNull | NodeKind::Field | NodeKind::InputField | NodeKind::Argument => Ok(()),
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, field: FieldWalker<'_>) -> fmt::Result {
    if let Some(description) = field.description() {
        writeln!(f, "  {}", quoted(description))?;
    }

    write!(f, "  {}", field.name())?;

    let arguments = field
        .arguments()
        .map(|argument| match argument.default_value() {
            Some(default) => format!("{}: {} = {default}", argument.name(), argument.ty()),
            None => format!("{}: {}", argument.name(), argument.ty()),
        })
        .collect::<Vec<_>>();

    if !arguments.is_empty() {
        write!(f, "({})", arguments.join(", "))?;
    }

    writeln!(f, ": {}{}", field.ty(), deprecated(field.deprecation()))
}

fn deprecated(deprecation: &Deprecation) -> String {
    match deprecation {
        Deprecation::None => String::new(),
        Deprecation::Deprecated { reason: None } => " @deprecated".to_owned(),
        Deprecation::Deprecated { reason: Some(reason) } => format!(" @deprecated(reason: {})", quoted(reason)),
    }
}

fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
