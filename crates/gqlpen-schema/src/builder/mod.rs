mod introspection;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{de::Error as _, Deserialize};

use self::introspection::{
    FullType, IntrospectionData, IntrospectionEnumValue, IntrospectionField, IntrospectionInputValue,
    IntrospectionSchema, TypeKind, TypeRef,
};
use crate::{
    BuildError, DefinitionKind, Deprecation, EnumValue, EnumValueId, Field, FieldId, IdRange, InputValue,
    InputValueId, InputValueParent, RootOperationTypes, Schema, TypeDefinition, TypeDefinitionId, TypeRecord,
    Wrapper, WrapperId,
};

/// Build the schema graph from the `data` field of an introspection response.
///
/// The document is only read. Building the same document twice yields equal schemas.
pub fn build_schema(document: &serde_json::Value) -> Result<Schema, BuildError> {
    let data = IntrospectionData::deserialize(document)?;
    let schema = Builder::default().build(data.schema)?;

    tracing::debug!(
        types = schema.type_definitions.len(),
        fields = schema.fields.len(),
        "built client schema"
    );

    Ok(schema)
}

/// Same as [`build_schema`], for callers holding an introspection result that may not have been
/// fetched yet.
pub fn build_optional_schema(document: Option<&serde_json::Value>) -> Result<Schema, BuildError> {
    build_schema(document.ok_or(BuildError::MissingIntrospection)?)
}

#[derive(Default)]
struct Builder {
    definitions_by_name: IndexMap<String, TypeDefinitionId>,
    type_definitions: Vec<TypeDefinition>,
    wrappers: Vec<Wrapper>,
    interned_wrappers: HashMap<TypeRecord, WrapperId>,
    fields: Vec<Field>,
    input_values: Vec<InputValue>,
    enum_values: Vec<EnumValue>,
}

impl Builder {
    fn build(mut self, schema: IntrospectionSchema) -> Result<Schema, BuildError> {
        // Names first, so that fields can point at types declared after them.
        for (index, ty) in schema.types.iter().enumerate() {
            if self
                .definitions_by_name
                .insert(ty.name.clone(), TypeDefinitionId::from(index))
                .is_some()
            {
                return Err(BuildError::DuplicateType(ty.name.clone()));
            }
        }

        for ty in schema.types {
            let definition = self.definition(ty)?;
            self.type_definitions.push(definition);
        }

        let root_operation_types = RootOperationTypes {
            query: self.root_object(&schema.query_type.name)?,
            mutation: schema
                .mutation_type
                .map(|ty| self.root_object(&ty.name))
                .transpose()?,
            subscription: schema
                .subscription_type
                .map(|ty| self.root_object(&ty.name))
                .transpose()?,
        };

        Ok(Schema {
            description: schema.description,
            root_operation_types,
            definitions_by_name: self.definitions_by_name,
            type_definitions: self.type_definitions,
            wrappers: self.wrappers,
            fields: self.fields,
            input_values: self.input_values,
            enum_values: self.enum_values,
        })
    }

    fn definition(&mut self, ty: FullType) -> Result<TypeDefinition, BuildError> {
        let id = TypeDefinitionId::from(self.type_definitions.len());

        let kind = match ty.kind {
            TypeKind::Scalar => DefinitionKind::Scalar {
                specified_by_url: ty.specified_by_url,
            },
            TypeKind::Object => DefinitionKind::Object {
                fields: self.fields(id, ty.fields.unwrap_or_default())?,
                interfaces: self.named_types(ty.interfaces.unwrap_or_default())?,
            },
            TypeKind::Interface => DefinitionKind::Interface {
                fields: self.fields(id, ty.fields.unwrap_or_default())?,
                possible_types: self.named_types(ty.possible_types.unwrap_or_default())?,
            },
            TypeKind::Union => DefinitionKind::Union {
                possible_types: self.named_types(ty.possible_types.unwrap_or_default())?,
            },
            TypeKind::Enum => DefinitionKind::Enum {
                values: self.enum_values(id, ty.enum_values.unwrap_or_default()),
            },
            TypeKind::InputObject => DefinitionKind::InputObject {
                fields: self.input_values(InputValueParent::InputObject(id), ty.input_fields.unwrap_or_default())?,
            },
            TypeKind::List | TypeKind::NonNull => {
                return Err(BuildError::Malformed(serde_json::Error::custom(format!(
                    "type `{}` is declared as a wrapping type",
                    ty.name
                ))));
            }
        };

        Ok(TypeDefinition {
            name: ty.name,
            description: ty.description,
            kind,
        })
    }

    fn fields(
        &mut self,
        parent: TypeDefinitionId,
        fields: Vec<IntrospectionField>,
    ) -> Result<IdRange<FieldId>, BuildError> {
        let start = self.fields.len();

        for field in fields {
            let ty = self.type_record(&field.ty)?;
            let field_id = FieldId::from(self.fields.len());
            let arguments = self.input_values(InputValueParent::Field(field_id), field.args)?;

            self.fields.push(Field {
                name: field.name,
                description: field.description,
                ty,
                arguments,
                deprecation: deprecation(field.is_deprecated, field.deprecation_reason),
                parent,
            });
        }

        Ok(IdRange::new(start, self.fields.len()))
    }

    fn input_values(
        &mut self,
        parent: InputValueParent,
        values: Vec<IntrospectionInputValue>,
    ) -> Result<IdRange<InputValueId>, BuildError> {
        let start = self.input_values.len();

        for value in values {
            let ty = self.type_record(&value.ty)?;

            self.input_values.push(InputValue {
                name: value.name,
                description: value.description,
                ty,
                default_value: value.default_value,
                parent,
            });
        }

        Ok(IdRange::new(start, self.input_values.len()))
    }

    fn enum_values(&mut self, parent: TypeDefinitionId, values: Vec<IntrospectionEnumValue>) -> IdRange<EnumValueId> {
        let start = self.enum_values.len();

        self.enum_values.extend(values.into_iter().map(|value| EnumValue {
            name: value.name,
            description: value.description,
            deprecation: deprecation(value.is_deprecated, value.deprecation_reason),
            parent,
        }));

        IdRange::new(start, self.enum_values.len())
    }

    fn type_record(&mut self, type_ref: &TypeRef) -> Result<TypeRecord, BuildError> {
        match type_ref.kind {
            TypeKind::List | TypeKind::NonNull => {
                let is_list = type_ref.kind == TypeKind::List;

                let inner = type_ref
                    .of_type
                    .as_deref()
                    .ok_or(BuildError::InvalidTypeReference(if is_list { "list" } else { "non-null" }))?;

                let of_type = self.type_record(inner)?;
                let wrapper_id = self.wrapper(of_type);

                Ok(if is_list {
                    TypeRecord::List(wrapper_id)
                } else {
                    TypeRecord::NonNull(wrapper_id)
                })
            }
            _ => {
                let Some(name) = type_ref.name.as_deref() else {
                    return Err(BuildError::Malformed(serde_json::Error::custom(
                        "named type reference without a name",
                    )));
                };

                self.named_type(name).map(TypeRecord::Named)
            }
        }
    }

    /// Lists and non-null wrappers around the same type share one wrapper record.
    fn wrapper(&mut self, of_type: TypeRecord) -> WrapperId {
        if let Some(id) = self.interned_wrappers.get(&of_type) {
            return *id;
        }

        let id = WrapperId::from(self.wrappers.len());
        self.wrappers.push(Wrapper { of_type });
        self.interned_wrappers.insert(of_type, id);

        id
    }

    fn named_type(&self, name: &str) -> Result<TypeDefinitionId, BuildError> {
        self.definitions_by_name
            .get(name)
            .copied()
            .ok_or_else(|| BuildError::UnknownType(name.to_owned()))
    }

    fn named_types(&self, refs: Vec<TypeRef>) -> Result<Vec<TypeDefinitionId>, BuildError> {
        refs.into_iter()
            .map(|type_ref| match type_ref.name {
                Some(name) => self.named_type(&name),
                None => Err(BuildError::Malformed(serde_json::Error::custom(
                    "named type reference without a name",
                ))),
            })
            .collect()
    }

    fn root_object(&self, name: &str) -> Result<TypeDefinitionId, BuildError> {
        let id = self
            .definitions_by_name
            .get(name)
            .copied()
            .ok_or_else(|| BuildError::MissingRootType(name.to_owned()))?;

        match self.type_definitions[usize::from(id)].kind {
            DefinitionKind::Object { .. } => Ok(id),
            _ => Err(BuildError::MissingRootType(name.to_owned())),
        }
    }
}

fn deprecation(is_deprecated: bool, reason: Option<String>) -> Deprecation {
    if is_deprecated {
        Deprecation::Deprecated { reason }
    } else {
        Deprecation::None
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::tests::fixture;

    #[test]
    fn building_twice_yields_the_same_graph() {
        let document = fixture();

        let first = build_schema(&document).unwrap();
        let second = build_schema(&document).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn building_leaves_the_document_untouched() {
        let document = fixture();
        let before = document.clone();

        build_schema(&document).unwrap();

        assert_eq!(document, before);
    }

    #[test]
    fn root_operation_types() {
        let schema = build_schema(&fixture()).unwrap();
        let walker = schema.walker();

        assert_eq!(walker.query().name(), "Query");
        assert_eq!(walker.mutation().map(|ty| ty.name()), Some("Mutation"));
        assert!(walker.subscription().is_none());
    }

    #[test]
    fn identical_wrappers_are_shared() {
        let schema = build_schema(&fixture()).unwrap();

        let pokemon = schema.walk(schema.definition_by_name("Pokemon").unwrap());
        let filter = schema.walk(schema.definition_by_name("PokemonFilter").unwrap());

        let from_object = pokemon.fields().find(|field| field.name() == "types").unwrap().ty();
        let from_input = filter.input_fields().find(|field| field.name() == "types").unwrap().ty();

        assert_eq!(from_object.record(), from_input.record());
        assert_eq!(from_object.to_string(), "[PokemonType!]");
    }

    #[test]
    fn missing_document() {
        let error = build_optional_schema(None).unwrap_err();
        assert!(matches!(error, BuildError::MissingIntrospection));
    }

    #[test]
    fn missing_top_level_fields() {
        let error = build_schema(&json!({ "__schema": { "types": [] } })).unwrap_err();
        assert!(matches!(error, BuildError::Malformed(_)), "{error}");

        let error = build_schema(&json!({ "data": null })).unwrap_err();
        assert!(matches!(error, BuildError::Malformed(_)), "{error}");
    }

    #[test]
    fn query_root_must_be_declared() {
        let document = json!({
            "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": null,
                "subscriptionType": null,
                "types": [
                    { "kind": "SCALAR", "name": "String" }
                ]
            }
        });

        let error = build_schema(&document).unwrap_err();

        insta::assert_snapshot!(error, @"Root operation type `Query` is not declared as an object type");
    }

    #[test]
    fn unknown_field_type() {
        let document = json!({
            "__schema": {
                "queryType": { "name": "Query" },
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "fields": [
                            { "name": "me", "args": [], "type": { "kind": "OBJECT", "name": "User" } }
                        ]
                    }
                ]
            }
        });

        let error = build_schema(&document).unwrap_err();

        insta::assert_snapshot!(error, @"Type `User` is referenced but never declared");
    }

    #[test]
    fn wrapper_without_inner_type() {
        let document = json!({
            "__schema": {
                "queryType": { "name": "Query" },
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "fields": [
                            { "name": "me", "args": [], "type": { "kind": "NON_NULL", "name": null, "ofType": null } }
                        ]
                    }
                ]
            }
        });

        let error = build_schema(&document).unwrap_err();

        insta::assert_snapshot!(error, @"A non-null type reference is missing the type it wraps");
    }

    #[test]
    fn duplicate_types() {
        let document = json!({
            "__schema": {
                "queryType": { "name": "Query" },
                "types": [
                    { "kind": "OBJECT", "name": "Query", "fields": [] },
                    { "kind": "OBJECT", "name": "Query", "fields": [] }
                ]
            }
        });

        let error = build_schema(&document).unwrap_err();

        assert!(matches!(error, BuildError::DuplicateType(name) if name == "Query"));
    }

    #[test]
    fn scalar_specification_urls() {
        let document = json!({
            "__schema": {
                "queryType": { "name": "Query" },
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "fields": [
                            { "name": "caughtAt", "args": [], "type": { "kind": "SCALAR", "name": "DateTime" } }
                        ]
                    },
                    {
                        "kind": "SCALAR",
                        "name": "DateTime",
                        "specifiedByURL": "https://scalars.graphql.org/andimarek/date-time"
                    }
                ]
            }
        });

        let schema = build_schema(&document).unwrap();
        let date_time = schema.walk(schema.definition_by_name("DateTime").unwrap());

        assert_eq!(
            date_time.specified_by_url(),
            Some("https://scalars.graphql.org/andimarek/date-time")
        );
        assert!(crate::INTROSPECTION_QUERY.contains("specifiedByURL"));
    }
}
