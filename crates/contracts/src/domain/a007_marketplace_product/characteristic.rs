use super::error::CharacteristicError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Channel characteristic record
// ============================================================================

/// Характеристика, объявленная каналом продаж для категории товара.
///
/// Каналы отдают записи с разными именами полей (Ozon: `attribute_name`,
/// Wildberries: `charcName`/`charcID` и т.д.), поэтому чтение идёт через
/// `TryFrom<Value>` с перебором алиасов. Сериализация всегда в каноническом виде.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct ChannelCharacteristic {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "is_required", default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_id: Option<i64>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

const NAME_KEYS: &[&str] = &["name", "attribute_name", "charcName"];
const ID_KEYS: &[&str] = &["id", "attribute_id", "charcID"];
const REQUIRED_KEYS: &[&str] = &["is_required", "required"];

impl ChannelCharacteristic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            required: false,
            dictionary_id: None,
            kind: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_dictionary(mut self, dictionary_id: i64) -> Self {
        self.dictionary_id = Some(dictionary_id);
        self
    }

    /// Значения характеристики берутся из закрытого справочника канала
    pub fn is_dictionary(&self) -> bool {
        self.dictionary_id.map_or(false, |d| d > 0)
            || self
                .kind
                .as_deref()
                .map_or(false, |k| k.eq_ignore_ascii_case("dictionary"))
    }

    /// Ключ для записи значения в канал: ID, если известен, иначе имя
    pub fn attribute_key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Разобрать запись канала, принимая любой из алиасов полей
    pub fn from_json(value: &Value) -> Result<Self, CharacteristicError> {
        let obj = value.as_object().ok_or(CharacteristicError::NotAnObject)?;

        let name = text_field(obj, NAME_KEYS)?.ok_or(CharacteristicError::MissingName)?;

        let id = id_field(obj, ID_KEYS)?;

        // Флаг обязательности: любой из алиасов
        let mut required = false;
        for &field in REQUIRED_KEYS {
            match obj.get(field) {
                None | Some(Value::Null) => {}
                Some(Value::Bool(b)) => required |= *b,
                Some(v) => {
                    return Err(CharacteristicError::InvalidField {
                        field,
                        found: type_name(v),
                    })
                }
            }
        }

        let dictionary_id = match first_present(obj, &["dictionary_id"]) {
            None => None,
            Some((_, Value::Number(n))) => n.as_i64(),
            Some((_, Value::String(s))) => s.trim().parse::<i64>().ok(),
            Some((field, v)) => {
                return Err(CharacteristicError::InvalidField {
                    field,
                    found: type_name(v),
                })
            }
        };

        let kind = match first_present(obj, &["type"]) {
            Some((_, Value::String(s))) => Some(s.clone()),
            _ => None,
        };

        Ok(Self {
            name,
            id,
            required,
            dictionary_id,
            kind,
        })
    }
}

impl TryFrom<Value> for ChannelCharacteristic {
    type Error = CharacteristicError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

/// Первый присутствующий (не null) ключ из списка алиасов
fn first_present<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&'static str],
) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|k| obj.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))
}

/// Первый алиас с заполненным значением: пустые строки пропускаются
fn first_filled<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&'static str],
) -> Option<(&'static str, &'a Value)> {
    keys.iter().find_map(|k| {
        obj.get(*k)
            .filter(|v| match v {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                _ => true,
            })
            .map(|v| (*k, v))
    })
}

fn type_name(v: &Value) -> String {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

/// Разобрать ответ канала целиком.
///
/// Некорректные записи не валят весь канал: они возвращаются отдельно
/// (индекс + ошибка), чтобы вызывающий код мог их залогировать.
pub fn parse_channel_characteristics(
    records: Vec<Value>,
) -> (Vec<ChannelCharacteristic>, Vec<(usize, CharacteristicError)>) {
    let mut parsed = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        match ChannelCharacteristic::from_json(record) {
            Ok(c) => parsed.push(c),
            Err(e) => rejected.push((idx, e)),
        }
    }
    (parsed, rejected)
}

/// ID из JSON: строка или число (каналы отдают по-разному)
pub(crate) fn id_field(
    obj: &Map<String, Value>,
    keys: &[&'static str],
) -> Result<Option<String>, CharacteristicError> {
    match first_filled(obj, keys) {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(s.clone())),
        Some((_, Value::Number(n))) => Ok(Some(n.to_string())),
        Some((field, v)) => Err(CharacteristicError::InvalidField {
            field,
            found: type_name(v),
        }),
    }
}

/// Строковое поле по алиасам; `None`, если ни один не заполнен
pub(crate) fn text_field(
    obj: &Map<String, Value>,
    keys: &[&'static str],
) -> Result<Option<String>, CharacteristicError> {
    match first_filled(obj, keys) {
        None => Ok(None),
        Some((_, Value::String(s))) => Ok(Some(s.clone())),
        Some((field, v)) => Err(CharacteristicError::InvalidField {
            field,
            found: type_name(v),
        }),
    }
}

// ============================================================================
// Characteristic value
// ============================================================================

/// Значение характеристики: строка или список строк
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Single(String),
    Multiple(Vec<String>),
}

impl CharacteristicValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CharacteristicValue::Single(s) => s.trim().is_empty(),
            CharacteristicValue::Multiple(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// Строка для отображения в поле ввода
    pub fn display(&self) -> String {
        match self {
            CharacteristicValue::Single(s) => s.clone(),
            CharacteristicValue::Multiple(items) => items
                .iter()
                .filter(|s| !s.trim().is_empty())
                .cloned()
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Значение из текста поля ввода в той же форме, что и текущее.
    /// Список отображается через ", " и разбирается обратно по запятым
    pub fn parse_input(&self, text: &str) -> Self {
        match self {
            CharacteristicValue::Single(_) => CharacteristicValue::Single(text.to_string()),
            CharacteristicValue::Multiple(_) => CharacteristicValue::Multiple(
                text.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }
}

impl Default for CharacteristicValue {
    fn default() -> Self {
        CharacteristicValue::Single(String::new())
    }
}

impl From<&str> for CharacteristicValue {
    fn from(s: &str) -> Self {
        CharacteristicValue::Single(s.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(s: String) -> Self {
        CharacteristicValue::Single(s)
    }
}

impl From<Vec<String>> for CharacteristicValue {
    fn from(items: Vec<String>) -> Self {
        CharacteristicValue::Multiple(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_ozon_aliases() {
        let c = ChannelCharacteristic::from_json(&json!({
            "attribute_id": 85,
            "attribute_name": "Бренд",
            "is_required": true,
            "dictionary_id": 28732849,
            "type": "String"
        }))
        .unwrap();
        assert_eq!(c.name, "Бренд");
        assert_eq!(c.id.as_deref(), Some("85"));
        assert!(c.required);
        assert!(c.is_dictionary());
        assert_eq!(c.attribute_key(), "85");
    }

    #[test]
    fn test_reads_wildberries_aliases() {
        let c: ChannelCharacteristic = serde_json::from_value(json!({
            "charcID": "14177449",
            "charcName": "Цвет",
            "required": false,
            "dictionary_id": 0
        }))
        .unwrap();
        assert_eq!(c.name, "Цвет");
        assert_eq!(c.id.as_deref(), Some("14177449"));
        assert!(!c.required);
        assert!(!c.is_dictionary());
    }

    #[test]
    fn test_first_alias_wins_without_duplicate_error() {
        let c = ChannelCharacteristic::from_json(&json!({
            "name": "Материал",
            "attribute_name": "Material",
            "type": "dictionary"
        }))
        .unwrap();
        assert_eq!(c.name, "Материал");
        assert_eq!(c.id, None);
        assert!(c.is_dictionary());
        assert_eq!(c.attribute_key(), "Материал");
    }

    #[test]
    fn test_empty_alias_falls_through() {
        let c = ChannelCharacteristic::from_json(&json!({
            "name": "",
            "attribute_name": "Цвет",
            "id": "",
            "attribute_id": 10,
            "is_required": false,
            "required": true
        }))
        .unwrap();
        assert_eq!(c.name, "Цвет");
        assert_eq!(c.id.as_deref(), Some("10"));
        assert!(c.required);
    }

    #[test]
    fn test_rejects_bad_records() {
        assert_eq!(
            ChannelCharacteristic::from_json(&json!("Цвет")),
            Err(CharacteristicError::NotAnObject)
        );
        assert_eq!(
            ChannelCharacteristic::from_json(&json!({ "name": "  " })),
            Err(CharacteristicError::MissingName)
        );
        assert_eq!(
            ChannelCharacteristic::from_json(&json!({ "name": "Вес", "is_required": "yes" })),
            Err(CharacteristicError::InvalidField {
                field: "is_required",
                found: "string".to_string()
            })
        );
    }

    #[test]
    fn test_parse_keeps_valid_records() {
        let (parsed, rejected) = parse_channel_characteristics(vec![
            json!({ "name": "Цвет" }),
            json!({ "id": 1 }),
            json!({ "charcName": "Размер", "charcID": 7 }),
        ]);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].name, "Размер");
        assert_eq!(rejected, vec![(1, CharacteristicError::MissingName)]);
    }

    #[test]
    fn test_input_keeps_value_shape() {
        let list = CharacteristicValue::from(vec!["красный".to_string(), "синий".to_string()]);
        assert_eq!(list.parse_input(&list.display()), list);
        assert_eq!(
            list.parse_input("белый,  чёрный, "),
            CharacteristicValue::from(vec!["белый".to_string(), "чёрный".to_string()])
        );
        assert_eq!(
            CharacteristicValue::from("хлопок").parse_input("лён, шёлк"),
            CharacteristicValue::from("лён, шёлк")
        );
    }

    #[test]
    fn test_value_forms() {
        let single: CharacteristicValue = serde_json::from_value(json!("хлопок")).unwrap();
        let multi: CharacteristicValue =
            serde_json::from_value(json!(["красный", "", "синий"])).unwrap();
        assert_eq!(single.display(), "хлопок");
        assert_eq!(multi.display(), "красный, синий");
        assert!(CharacteristicValue::from("  ").is_empty());
        assert!(CharacteristicValue::Multiple(vec![]).is_empty());
        assert!(!multi.is_empty());
    }
}
