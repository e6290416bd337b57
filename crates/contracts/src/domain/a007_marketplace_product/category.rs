use super::characteristic::{id_field, text_field};
use super::error::CharacteristicError;
use crate::enums::SalesChannel;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Категория маркетплейса, к которой можно привязать товар
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct MarketplaceCategory {
    pub id: String,
    pub name: String,
    /// Полный путь в дереве категорий ("Одежда / Футболки")
    #[serde(default)]
    pub path: Option<String>,
}

impl TryFrom<Value> for MarketplaceCategory {
    type Error = CharacteristicError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let obj = value.as_object().ok_or(CharacteristicError::NotAnObject)?;
        Ok(Self {
            id: id_field(obj, &["id", "category_id", "subjectID"])?
                .ok_or(CharacteristicError::MissingField("id"))?,
            name: text_field(obj, &["name", "category_name", "subjectName"])?
                .ok_or(CharacteristicError::MissingField("name"))?,
            path: text_field(obj, &["path"])?,
        })
    }
}

/// Запрос на привязку товара к категории канала
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMappingRequest {
    pub channel: SalesChannel,
    #[serde(rename = "categoryId")]
    pub category_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_wildberries_subject() {
        let c: MarketplaceCategory = serde_json::from_value(json!({
            "subjectID": 105,
            "subjectName": "Футболки",
            "path": null
        }))
        .unwrap();
        assert_eq!(c.id, "105");
        assert_eq!(c.name, "Футболки");
        assert_eq!(c.path, None);
    }

    #[test]
    fn test_category_without_id_is_rejected() {
        assert_eq!(
            MarketplaceCategory::try_from(json!({ "name": "Футболки" })),
            Err(CharacteristicError::MissingField("id"))
        );
    }
}
