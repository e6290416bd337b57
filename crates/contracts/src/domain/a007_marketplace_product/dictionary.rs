use super::characteristic::{id_field, text_field};
use super::error::CharacteristicError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Максимум вариантов, показываемых в выпадающем списке справочника
pub const DICTIONARY_DISPLAY_LIMIT: usize = 50;

/// Значение из справочника канала.
///
/// Каналы называют поля по-разному (`dictionary_value_id`/`name` у Ozon),
/// запись может нести оба варианта сразу.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct DictionaryValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: String,
}

impl DictionaryValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: None,
            value: value.into(),
        }
    }
}

impl TryFrom<Value> for DictionaryValue {
    type Error = CharacteristicError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let obj = value.as_object().ok_or(CharacteristicError::NotAnObject)?;
        Ok(Self {
            id: id_field(obj, &["id", "dictionary_value_id"])?,
            value: text_field(obj, &["value", "name"])?
                .ok_or(CharacteristicError::MissingField("value"))?,
        })
    }
}

/// Отфильтровать справочник по введённому тексту.
///
/// Без учёта регистра. Сначала совпадения по началу строки, затем по
/// вхождению; внутри групп порядок исходный. Не более
/// [`DICTIONARY_DISPLAY_LIMIT`] элементов.
pub fn filter_dictionary<'a>(values: &'a [DictionaryValue], query: &str) -> Vec<&'a DictionaryValue> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return values.iter().take(DICTIONARY_DISPLAY_LIMIT).collect();
    }

    let mut prefix = Vec::new();
    let mut substring = Vec::new();
    for item in values {
        let lower = item.value.to_lowercase();
        if lower.starts_with(&query) {
            prefix.push(item);
        } else if lower.contains(&query) {
            substring.push(item);
        }
        if prefix.len() >= DICTIONARY_DISPLAY_LIMIT {
            break;
        }
    }

    prefix
        .into_iter()
        .chain(substring)
        .take(DICTIONARY_DISPLAY_LIMIT)
        .collect()
}
