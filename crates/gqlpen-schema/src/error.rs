#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("No introspection result is available, load the schema first")]
    MissingIntrospection,

    #[error("Could not parse the introspection result: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Type `{0}` is declared more than once")]
    DuplicateType(String),

    #[error("Type `{0}` is referenced but never declared")]
    UnknownType(String),

    #[error("Root operation type `{0}` is not declared as an object type")]
    MissingRootType(String),

    #[error("A {0} type reference is missing the type it wraps")]
    InvalidTypeReference(&'static str),
}
