use super::characteristic::CharacteristicValue;
use crate::domain::common::AggregateId;
use crate::enums::SalesChannel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор товара
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::from_string(s).map(ProductId::new)
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Характеристики товара, как их отдаёт бэкенд
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductCharacteristicsDto {
    /// Базовые (не зависящие от канала) значения: имя → значение.
    /// Порядок ключей как в ответе бэкенда
    #[serde(default)]
    pub base: IndexMap<String, CharacteristicValue>,

    /// Каналы, в которых товар продаётся
    #[serde(rename = "activeChannels", default)]
    pub active_channels: Vec<SalesChannel>,

    /// Значения по каналам: канал → (ID атрибута или имя → значение)
    #[serde(rename = "channelValues", default)]
    pub channel_values: BTreeMap<SalesChannel, BTreeMap<String, CharacteristicValue>>,
}

/// Запрос на изменение базового значения характеристики
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseValueUpdate {
    pub name: String,
    pub value: CharacteristicValue,
}

/// Запрос на изменение значения характеристики в канале
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelValueUpdate {
    /// ID атрибута канала (или имя, если ID неизвестен)
    #[serde(rename = "attributeId")]
    pub attribute_id: String,
    pub name: String,
    pub value: CharacteristicValue,
}
