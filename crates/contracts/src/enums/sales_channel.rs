use serde::{Deserialize, Serialize};
use std::fmt;

/// Каналы продаж (маркетплейсы), для которых редактируются характеристики.
///
/// Порядок объявления задаёт фиксированный порядок обхода каналов:
/// приоритет значений, порядок записи и порядок подсказок о маппинге.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SalesChannel {
    #[serde(rename = "ozon")]
    Ozon,
    #[serde(rename = "wb")]
    Wildberries,
    #[serde(rename = "yandex")]
    YandexMarket,
}

impl SalesChannel {
    /// Получить код канала (используется в URL API)
    pub fn code(&self) -> &'static str {
        match self {
            SalesChannel::Ozon => "ozon",
            SalesChannel::Wildberries => "wb",
            SalesChannel::YandexMarket => "yandex",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            SalesChannel::Ozon => "Ozon",
            SalesChannel::Wildberries => "Wildberries",
            SalesChannel::YandexMarket => "Яндекс Маркет",
        }
    }

    /// Все каналы в фиксированном порядке обхода
    pub fn all() -> [SalesChannel; 3] {
        [
            SalesChannel::Ozon,
            SalesChannel::Wildberries,
            SalesChannel::YandexMarket,
        ]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ozon" => Some(SalesChannel::Ozon),
            "wb" => Some(SalesChannel::Wildberries),
            "yandex" => Some(SalesChannel::YandexMarket),
            _ => None,
        }
    }
}

impl fmt::Display for SalesChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
