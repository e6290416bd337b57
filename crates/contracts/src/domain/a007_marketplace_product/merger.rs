use super::aggregate::ProductCharacteristicsDto;
use super::characteristic::{ChannelCharacteristic, CharacteristicValue};
use crate::enums::SalesChannel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ============================================================================
// Snapshot (input state)
// ============================================================================

/// Состояние характеристик товара на текущий момент.
///
/// Данные каналов приходят независимо, снапшот хранит то, что уже пришло:
/// отсутствие ключа в `channel_characteristics` значит "ещё не загружено",
/// пустой список значит "канал выбран, но категория не сопоставлена"
/// (или загрузка упала).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicsSnapshot {
    pub active_channels: BTreeSet<SalesChannel>,
    pub channel_characteristics: BTreeMap<SalesChannel, Vec<ChannelCharacteristic>>,
    /// Порядок вставки сохраняется: он задаёт порядок базовых полей
    pub base_values: IndexMap<String, CharacteristicValue>,
    /// Канал → (ключ атрибута → значение)
    pub channel_values: BTreeMap<SalesChannel, BTreeMap<String, CharacteristicValue>>,
}

impl CharacteristicsSnapshot {
    pub fn from_dto(dto: ProductCharacteristicsDto) -> Self {
        Self {
            active_channels: dto.active_channels.into_iter().collect(),
            channel_characteristics: BTreeMap::new(),
            base_values: dto.base,
            channel_values: dto.channel_values,
        }
    }

    pub fn set_channel_active(&mut self, channel: SalesChannel, active: bool) {
        if active {
            self.active_channels.insert(channel);
        } else {
            self.active_channels.remove(&channel);
        }
    }

    pub fn is_channel_active(&self, channel: SalesChannel) -> bool {
        self.active_channels.contains(&channel)
    }

    pub fn set_channel_characteristics(
        &mut self,
        channel: SalesChannel,
        characteristics: Vec<ChannelCharacteristic>,
    ) {
        self.channel_characteristics.insert(channel, characteristics);
    }

    /// Сбросить характеристики канала (перед повторной загрузкой)
    pub fn forget_channel_characteristics(&mut self, channel: SalesChannel) {
        self.channel_characteristics.remove(&channel);
    }

    pub fn set_base_value(&mut self, name: &str, value: CharacteristicValue) {
        self.base_values.insert(name.to_string(), value);
    }

    pub fn set_channel_value(
        &mut self,
        channel: SalesChannel,
        attribute_key: &str,
        value: CharacteristicValue,
    ) {
        self.channel_values
            .entry(channel)
            .or_default()
            .insert(attribute_key.to_string(), value);
    }

    /// Построить единый список характеристик по базе и активным каналам
    pub fn merge(&self) -> MergedCharacteristics {
        let mut entries: Vec<UnifiedCharacteristic> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for name in self.base_values.keys() {
            let entry = entry_for(&mut entries, &mut index, name);
            entry.add_source(CharacteristicSource::Base);
        }

        for &channel in &self.active_channels {
            let Some(list) = self.channel_characteristics.get(&channel) else {
                continue;
            };
            for characteristic in list {
                let entry = entry_for(&mut entries, &mut index, &characteristic.name);
                entry.absorb(channel, characteristic);
            }
        }

        for entry in &mut entries {
            let value = self.resolve_value(entry);
            entry.value = value;
        }

        // sort_by_key стабильна: внутри групп сохраняется порядок вставки
        entries.sort_by_key(|e| !e.is_required());

        let unmapped_channels = self
            .active_channels
            .iter()
            .copied()
            .filter(|c| self.channel_characteristics.get(c).map_or(false, Vec::is_empty))
            .collect();

        MergedCharacteristics {
            entries,
            unmapped_channels,
        }
    }

    /// База важнее каналов; среди каналов первый непустой в фиксированном порядке
    fn resolve_value(&self, entry: &UnifiedCharacteristic) -> Option<CharacteristicValue> {
        if let Some(base) = self
            .base_values
            .get(&entry.name)
            .filter(|v| !v.is_empty())
        {
            return Some(base.clone());
        }

        entry
            .channels()
            .filter_map(|channel| {
                let values = self.channel_values.get(&channel)?;
                let key = entry.attribute_key(channel);
                values
                    .get(key.as_str())
                    .or_else(|| values.get(&entry.name))
                    .filter(|v| !v.is_empty())
            })
            .next()
            .cloned()
    }
}

fn entry_for<'a>(
    entries: &'a mut Vec<UnifiedCharacteristic>,
    index: &mut HashMap<String, usize>,
    name: &str,
) -> &'a mut UnifiedCharacteristic {
    let idx = *index.entry(name.to_string()).or_insert_with(|| {
        entries.push(UnifiedCharacteristic::new(name));
        entries.len() - 1
    });
    &mut entries[idx]
}

// ============================================================================
// Merge result
// ============================================================================

/// Источник характеристики: базовый набор или канал продаж
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacteristicSource {
    Base,
    Channel(SalesChannel),
}

/// То, что канал сообщил о характеристике; нужно для записи значения обратно
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMeta {
    pub id: Option<String>,
    pub required: bool,
    pub dictionary_id: Option<i64>,
    pub dictionary: bool,
}

/// Одна характеристика в объединённом списке (одно поле формы)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedCharacteristic {
    pub name: String,
    pub sources: Vec<CharacteristicSource>,
    pub required_in: Vec<SalesChannel>,
    pub is_dictionary: bool,
    pub channel_meta: BTreeMap<SalesChannel, ChannelMeta>,
    pub value: Option<CharacteristicValue>,
}

impl UnifiedCharacteristic {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sources: Vec::new(),
            required_in: Vec::new(),
            is_dictionary: false,
            channel_meta: BTreeMap::new(),
            value: None,
        }
    }

    fn add_source(&mut self, source: CharacteristicSource) {
        if !self.sources.contains(&source) {
            self.sources.push(source);
        }
    }

    fn absorb(&mut self, channel: SalesChannel, characteristic: &ChannelCharacteristic) {
        self.add_source(CharacteristicSource::Channel(channel));

        let dictionary = characteristic.is_dictionary();
        self.is_dictionary |= dictionary;

        if characteristic.required && !self.required_in.contains(&channel) {
            self.required_in.push(channel);
        }

        // Дубликат имени внутри одного канала: ID берём от первой записи
        let meta = self.channel_meta.entry(channel).or_insert_with(|| ChannelMeta {
            id: characteristic.id.clone(),
            required: false,
            dictionary_id: characteristic.dictionary_id,
            dictionary: false,
        });
        meta.required |= characteristic.required;
        meta.dictionary |= dictionary;
    }

    pub fn is_required(&self) -> bool {
        !self.required_in.is_empty()
    }

    pub fn has_base(&self) -> bool {
        self.sources.contains(&CharacteristicSource::Base)
    }

    /// Каналы-источники в фиксированном порядке
    pub fn channels(&self) -> impl Iterator<Item = SalesChannel> + '_ {
        self.sources.iter().filter_map(|s| match s {
            CharacteristicSource::Channel(c) => Some(*c),
            CharacteristicSource::Base => None,
        })
    }

    /// Ключ для записи в канал: ID атрибута канала, иначе имя
    pub fn attribute_key(&self, channel: SalesChannel) -> String {
        self.channel_meta
            .get(&channel)
            .and_then(|m| m.id.clone())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Канал, из справочника которого берутся значения
    pub fn dictionary_source(&self) -> Option<SalesChannel> {
        if !self.is_dictionary {
            return None;
        }
        self.channels()
            .find(|c| self.channel_meta.get(c).map_or(false, |m| m.dictionary))
    }

    pub fn display_value(&self) -> String {
        self.value
            .as_ref()
            .map(CharacteristicValue::display)
            .unwrap_or_default()
    }
}

/// Результат объединения
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergedCharacteristics {
    pub entries: Vec<UnifiedCharacteristic>,
    /// Активные каналы без характеристик: нужно предложить выбор категории
    pub unmapped_channels: Vec<SalesChannel>,
}

impl MergedCharacteristics {
    pub fn get(&self, name: &str) -> Option<&UnifiedCharacteristic> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::CharacteristicSource::{Base, Channel};
    use super::*;
    use crate::enums::SalesChannel::{Ozon, Wildberries, YandexMarket};
    use std::collections::HashSet;

    fn snapshot_with(
        base: &[(&str, &str)],
        channels: Vec<(SalesChannel, Vec<ChannelCharacteristic>)>,
    ) -> CharacteristicsSnapshot {
        let mut s = CharacteristicsSnapshot::default();
        for (name, value) in base {
            s.set_base_value(name, CharacteristicValue::from(*value));
        }
        for (channel, list) in channels {
            s.set_channel_active(channel, true);
            s.set_channel_characteristics(channel, list);
        }
        s
    }

    fn ch(name: &str) -> ChannelCharacteristic {
        ChannelCharacteristic::new(name)
    }

    #[test]
    fn test_base_and_ozon_example() {
        let s = snapshot_with(
            &[("Материал", "хлопок")],
            vec![(Ozon, vec![ch("Материал").required(true), ch("Цвет")])],
        );
        let merged = s.merge();

        assert_eq!(merged.entries.len(), 2);
        let material = merged.get("Материал").unwrap();
        assert_eq!(material.sources, vec![Base, Channel(Ozon)]);
        assert_eq!(material.required_in, vec![Ozon]);
        assert!(!material.is_dictionary);
        assert_eq!(material.display_value(), "хлопок");

        let color = merged.get("Цвет").unwrap();
        assert_eq!(color.sources, vec![Channel(Ozon)]);
        assert!(color.required_in.is_empty());
        assert_eq!(color.display_value(), "");
        assert_eq!(merged.names(), vec!["Материал", "Цвет"]);
    }

    #[test]
    fn test_each_name_appears_once() {
        let s = snapshot_with(
            &[("Цвет", ""), ("Бренд", "Acme")],
            vec![
                (Ozon, vec![ch("Цвет"), ch("Вес"), ch("Цвет")]),
                (Wildberries, vec![ch("Вес"), ch("Состав")]),
                (YandexMarket, vec![ch("Бренд"), ch("цвет")]),
            ],
        );
        let merged = s.merge();
        let names = merged.names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        // Сравнение имён регистрозависимое
        assert_eq!(names.len(), 5);
        assert!(merged.get("цвет").is_some());
        assert_eq!(merged.get("Цвет").unwrap().sources, vec![Base, Channel(Ozon)]);
    }

    #[test]
    fn test_required_in_any_channel_sorts_first() {
        let s = snapshot_with(
            &[("Бренд", "Acme")],
            vec![
                (Ozon, vec![ch("Цвет"), ch("Вес")]),
                (Wildberries, vec![ch("Вес").required(true), ch("Размер")]),
                (YandexMarket, vec![ch("Цвет").required(true)]),
            ],
        );
        let merged = s.merge();
        assert_eq!(merged.names(), vec!["Цвет", "Вес", "Бренд", "Размер"]);
        assert_eq!(merged.get("Цвет").unwrap().required_in, vec![YandexMarket]);
        assert_eq!(merged.get("Вес").unwrap().required_in, vec![Wildberries]);
        assert!(!merged.get("Бренд").unwrap().is_required());
    }

    #[test]
    fn test_base_only_is_never_required() {
        let s = snapshot_with(&[("Страна", "Россия")], vec![]);
        let merged = s.merge();
        assert!(!merged.get("Страна").unwrap().is_required());
    }

    #[test]
    fn test_dictionary_flag_is_union() {
        let s = snapshot_with(
            &[],
            vec![
                (Ozon, vec![ch("Цвет")]),
                (Wildberries, vec![ch("Цвет").with_dictionary(14)]),
            ],
        );
        let merged = s.merge();
        let color = merged.get("Цвет").unwrap();
        assert!(color.is_dictionary);
        assert_eq!(color.dictionary_source(), Some(Wildberries));
        assert!(!color.channel_meta[&Ozon].dictionary);
    }

    #[test]
    fn test_deactivated_channel_is_dropped_on_recompute() {
        let mut s = snapshot_with(
            &[("Материал", "хлопок")],
            vec![
                (Ozon, vec![ch("Материал"), ch("Цвет").required(true)]),
                (Wildberries, vec![ch("Вес")]),
            ],
        );
        assert_eq!(s.merge().entries.len(), 3);

        s.set_channel_active(Ozon, false);
        let merged = s.merge();
        assert_eq!(merged.names(), vec!["Материал", "Вес"]);
        for entry in &merged.entries {
            assert!(!entry.sources.contains(&Channel(Ozon)));
        }
    }

    #[test]
    fn test_value_precedence() {
        let mut s = snapshot_with(
            &[("Материал", "хлопок")],
            vec![
                (Ozon, vec![ch("Материал").with_id("10"), ch("Цвет").with_id("20")]),
                (Wildberries, vec![ch("Цвет").with_id("c-1")]),
                (YandexMarket, vec![ch("Цвет")]),
            ],
        );
        s.set_channel_value(Ozon, "10", "лён".into());
        s.set_channel_value(Ozon, "20", "".into());
        s.set_channel_value(Wildberries, "c-1", "красный".into());
        s.set_channel_value(YandexMarket, "Цвет", "синий".into());

        let merged = s.merge();
        assert_eq!(merged.get("Материал").unwrap().display_value(), "хлопок");
        assert_eq!(merged.get("Цвет").unwrap().display_value(), "красный");

        s.set_base_value("Материал", "".into());
        assert_eq!(s.merge().get("Материал").unwrap().display_value(), "лён");
    }

    #[test]
    fn test_unmapped_channels_are_signaled() {
        let mut s = snapshot_with(
            &[],
            vec![(Ozon, vec![ch("Цвет")]), (YandexMarket, vec![])],
        );
        // Wildberries активен, но данные ещё не пришли
        s.set_channel_active(Wildberries, true);
        let merged = s.merge();
        assert_eq!(merged.unmapped_channels, vec![YandexMarket]);
        assert_eq!(merged.names(), vec!["Цвет"]);

        s.set_channel_characteristics(Wildberries, vec![]);
        assert_eq!(
            s.merge().unmapped_channels,
            vec![Wildberries, YandexMarket]
        );
    }

    #[test]
    fn test_inactive_channel_data_is_ignored() {
        let mut s = CharacteristicsSnapshot::default();
        s.set_channel_characteristics(Ozon, vec![ch("Цвет").required(true)]);
        let merged = s.merge();
        assert!(merged.entries.is_empty());
        assert!(merged.unmapped_channels.is_empty());
    }

    #[test]
    fn test_attribute_key_falls_back_to_name() {
        let s = snapshot_with(
            &[],
            vec![(Ozon, vec![ch("Цвет").with_id("20")]), (Wildberries, vec![ch("Цвет")])],
        );
        let merged = s.merge();
        let color = merged.get("Цвет").unwrap();
        assert_eq!(color.attribute_key(Ozon), "20");
        assert_eq!(color.attribute_key(Wildberries), "Цвет");
    }

    #[test]
    fn test_base_names_keep_backend_order() {
        // json! сортирует ключи, поэтому разбираем текст ответа как есть
        let dto: ProductCharacteristicsDto = serde_json::from_str(
            r#"{"base":{"Цвет":"красный","Бренд":"Acme","Материал":"хлопок"},"activeChannels":[]}"#,
        )
        .unwrap();
        let merged = CharacteristicsSnapshot::from_dto(dto).merge();
        assert_eq!(merged.names(), vec!["Цвет", "Бренд", "Материал"]);
    }
}
