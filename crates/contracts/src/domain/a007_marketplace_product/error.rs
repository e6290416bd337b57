use thiserror::Error;

/// Ошибки разбора записей характеристик, пришедших от каналов
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacteristicError {
    #[error("characteristic record is not a JSON object")]
    NotAnObject,

    #[error("characteristic record has no name (expected name, attribute_name or charcName)")]
    MissingName,

    #[error("record has no `{0}` field")]
    MissingField(&'static str),

    #[error("field `{field}` has unexpected type: {found}")]
    InvalidField { field: &'static str, found: String },
}
