//! Товар маркетплейса: единый список характеристик по всем каналам продаж
//!
//! - `characteristic` — записи характеристик каналов (с алиасами полей)
//! - `merger` — объединение базовых характеристик и характеристик каналов
//! - `write_back` — раздача отредактированного значения во все источники
//! - `dictionary` — справочные значения и их фильтрация
//! - `category` — маппинг категорий для каналов без характеристик

pub mod aggregate;
pub mod category;
pub mod characteristic;
pub mod dictionary;
pub mod error;
pub mod merger;
pub mod write_back;

pub use aggregate::{BaseValueUpdate, ChannelValueUpdate, ProductCharacteristicsDto, ProductId};
pub use category::{CategoryMappingRequest, MarketplaceCategory};
pub use characteristic::{
    parse_channel_characteristics, ChannelCharacteristic, CharacteristicValue,
};
pub use dictionary::{filter_dictionary, DictionaryValue, DICTIONARY_DISPLAY_LIMIT};
pub use error::CharacteristicError;
pub use merger::{
    CharacteristicSource, CharacteristicsSnapshot, ChannelMeta, MergedCharacteristics,
    UnifiedCharacteristic,
};
pub use write_back::{
    fan_out, write_to, CharacteristicWriter, WriteOutcome, WriteReport, WriteTarget,
};
