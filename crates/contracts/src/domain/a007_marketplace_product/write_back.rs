use super::characteristic::CharacteristicValue;
use super::merger::{CharacteristicSource, CharacteristicsSnapshot, UnifiedCharacteristic};
use crate::enums::SalesChannel;
use serde::{Deserialize, Serialize};

/// Куда уходит отредактированное значение
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WriteTarget {
    Base {
        name: String,
    },
    Channel {
        channel: SalesChannel,
        /// ID атрибута канала, иначе имя характеристики
        attribute_key: String,
        name: String,
    },
}

impl WriteTarget {
    pub fn name(&self) -> &str {
        match self {
            WriteTarget::Base { name } | WriteTarget::Channel { name, .. } => name,
        }
    }

    /// Подпись для сообщений пользователю
    pub fn label(&self) -> String {
        match self {
            WriteTarget::Base { name } => format!("{} (база)", name),
            WriteTarget::Channel { channel, name, .. } => {
                format!("{} ({})", name, channel.display_name())
            }
        }
    }
}

/// Получатель записей: база и каналы.
///
/// Каждый вызов независим, ошибка одного не откатывает остальные.
pub trait CharacteristicWriter {
    fn on_base_characteristic_change(
        &mut self,
        name: &str,
        value: &CharacteristicValue,
    ) -> Result<(), String>;

    fn on_change(
        &mut self,
        channel: SalesChannel,
        attribute_id_or_name: &str,
        name: &str,
        value: &CharacteristicValue,
    ) -> Result<(), String>;
}

impl UnifiedCharacteristic {
    /// По одной цели на каждый источник, в порядке источников
    pub fn write_targets(&self) -> Vec<WriteTarget> {
        self.sources
            .iter()
            .map(|source| match source {
                CharacteristicSource::Base => WriteTarget::Base {
                    name: self.name.clone(),
                },
                CharacteristicSource::Channel(channel) => WriteTarget::Channel {
                    channel: *channel,
                    attribute_key: self.attribute_key(*channel),
                    name: self.name.clone(),
                },
            })
            .collect()
    }
}

/// Записать значение в одну цель
pub fn write_to<W: CharacteristicWriter + ?Sized>(
    target: &WriteTarget,
    value: &CharacteristicValue,
    writer: &mut W,
) -> Result<(), String> {
    match target {
        WriteTarget::Base { name } => writer.on_base_characteristic_change(name, value),
        WriteTarget::Channel {
            channel,
            attribute_key,
            name,
        } => writer.on_change(*channel, attribute_key, name, value),
    }
}

/// Раздать значение во все источники характеристики
pub fn fan_out<W: CharacteristicWriter + ?Sized>(
    entry: &UnifiedCharacteristic,
    value: &CharacteristicValue,
    writer: &mut W,
) -> WriteReport {
    let mut report = WriteReport::default();
    for target in entry.write_targets() {
        let result = write_to(&target, value, writer);
        report.record(target, result);
    }
    report
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    pub target: WriteTarget,
    pub error: Option<String>,
}

impl WriteOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Итог пакетной записи: результат по каждой цели
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReport {
    pub outcomes: Vec<WriteOutcome>,
}

impl WriteReport {
    pub fn record(&mut self, target: WriteTarget, result: Result<(), String>) {
        self.outcomes.push(WriteOutcome {
            target,
            error: result.err(),
        });
    }

    pub fn merge(&mut self, other: WriteReport) {
        self.outcomes.extend(other.outcomes);
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(WriteOutcome::is_ok)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &WriteTarget> {
        self.outcomes
            .iter()
            .filter(|o| o.is_ok())
            .map(|o| &o.target)
    }

    pub fn failures(&self) -> impl Iterator<Item = &WriteOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }

    /// Короткая сводка для уведомления
    pub fn summary(&self) -> String {
        let failed: Vec<String> = self
            .failures()
            .map(|o| {
                format!(
                    "{}: {}",
                    o.target.label(),
                    o.error.as_deref().unwrap_or_default()
                )
            })
            .collect();
        if failed.is_empty() {
            format!("Сохранено: {}", self.outcomes.len())
        } else {
            format!(
                "Сохранено {} из {}. Ошибки: {}",
                self.outcomes.len() - failed.len(),
                self.outcomes.len(),
                failed.join("; ")
            )
        }
    }
}

// ============================================================================
// Local state as a writer
// ============================================================================

impl CharacteristicWriter for CharacteristicsSnapshot {
    fn on_base_characteristic_change(
        &mut self,
        name: &str,
        value: &CharacteristicValue,
    ) -> Result<(), String> {
        self.set_base_value(name, value.clone());
        Ok(())
    }

    fn on_change(
        &mut self,
        channel: SalesChannel,
        attribute_id_or_name: &str,
        _name: &str,
        value: &CharacteristicValue,
    ) -> Result<(), String> {
        self.set_channel_value(channel, attribute_id_or_name, value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a007_marketplace_product::characteristic::ChannelCharacteristic;
    use crate::enums::SalesChannel::{Ozon, Wildberries, YandexMarket};

    #[derive(Default)]
    struct RecordingWriter {
        base_calls: Vec<String>,
        channel_calls: Vec<(SalesChannel, String, String)>,
        fail_on: Option<SalesChannel>,
    }

    impl CharacteristicWriter for RecordingWriter {
        fn on_base_characteristic_change(
            &mut self,
            name: &str,
            _value: &CharacteristicValue,
        ) -> Result<(), String> {
            self.base_calls.push(name.to_string());
            Ok(())
        }

        fn on_change(
            &mut self,
            channel: SalesChannel,
            attribute_id_or_name: &str,
            name: &str,
            _value: &CharacteristicValue,
        ) -> Result<(), String> {
            self.channel_calls
                .push((channel, attribute_id_or_name.to_string(), name.to_string()));
            if self.fail_on == Some(channel) {
                return Err("HTTP 500".to_string());
            }
            Ok(())
        }
    }

    fn snapshot() -> CharacteristicsSnapshot {
        let mut s = CharacteristicsSnapshot::default();
        s.set_base_value("Материал", "хлопок".into());
        s.set_channel_active(Ozon, true);
        s.set_channel_active(Wildberries, true);
        s.set_channel_active(YandexMarket, true);
        s.set_channel_characteristics(
            Ozon,
            vec![ChannelCharacteristic::new("Материал").with_id("10")],
        );
        s.set_channel_characteristics(Wildberries, vec![ChannelCharacteristic::new("Цвет")]);
        s.set_channel_characteristics(
            YandexMarket,
            vec![
                ChannelCharacteristic::new("Цвет").with_id("ym-5"),
                ChannelCharacteristic::new("Вес"),
            ],
        );
        s
    }

    #[test]
    fn test_base_and_ozon_fan_out_exactly_once() {
        let merged = snapshot().merge();
        let material = merged.get("Материал").unwrap();
        let mut writer = RecordingWriter::default();

        let report = fan_out(material, &"лён".into(), &mut writer);

        assert_eq!(writer.base_calls, vec!["Материал".to_string()]);
        assert_eq!(
            writer.channel_calls,
            vec![(Ozon, "10".to_string(), "Материал".to_string())]
        );
        assert_eq!(report.outcomes.len(), 2);
        assert!(report.is_success());
    }

    #[test]
    fn test_channel_key_falls_back_to_name() {
        let merged = snapshot().merge();
        let color = merged.get("Цвет").unwrap();
        assert_eq!(
            color.write_targets(),
            vec![
                WriteTarget::Channel {
                    channel: Wildberries,
                    attribute_key: "Цвет".to_string(),
                    name: "Цвет".to_string(),
                },
                WriteTarget::Channel {
                    channel: YandexMarket,
                    attribute_key: "ym-5".to_string(),
                    name: "Цвет".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_partial_failure_is_reported_without_stopping() {
        let merged = snapshot().merge();
        let color = merged.get("Цвет").unwrap();
        let mut writer = RecordingWriter {
            fail_on: Some(Wildberries),
            ..Default::default()
        };

        let report = fan_out(color, &"красный".into(), &mut writer);

        assert_eq!(writer.channel_calls.len(), 2);
        assert!(!report.is_success());
        let failed: Vec<_> = report.failures().map(|o| o.target.clone()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].name(), "Цвет");
        assert_eq!(report.succeeded().count(), 1);
        assert!(report.summary().starts_with("Сохранено 1 из 2"));
    }

    #[test]
    fn test_snapshot_applies_edit_to_every_source() {
        let mut s = snapshot();
        let merged = s.merge();
        let material = merged.get("Материал").unwrap().clone();

        let report = fan_out(&material, &"лён".into(), &mut s);

        assert!(report.is_success());
        assert_eq!(s.base_values["Материал"], CharacteristicValue::from("лён"));
        assert_eq!(
            s.channel_values[&Ozon]["10"],
            CharacteristicValue::from("лён")
        );
        assert!(!s.channel_values.contains_key(&Wildberries));
        assert_eq!(s.merge().get("Материал").unwrap().display_value(), "лён");
    }
}
