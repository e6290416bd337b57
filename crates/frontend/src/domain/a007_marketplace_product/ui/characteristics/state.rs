//! View state of the characteristics form.
//!
//! Everything the form shows is derived from [`CharacteristicsState`]; async
//! results are fed in as [`CharacteristicsAction`]s. No signals here, so the
//! fan-out and save bookkeeping can be tested without rendering.

use contracts::domain::a007_marketplace_product::{
    fan_out, CharacteristicValue, CharacteristicsSnapshot, ChannelCharacteristic,
    DictionaryValue, MergedCharacteristics, ProductCharacteristicsDto, WriteReport, WriteTarget,
};
use contracts::enums::SalesChannel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Dictionary values of one channel attribute, fetched once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DictionaryEntry {
    Loading,
    Ready(Vec<DictionaryValue>),
    Failed(String),
}

fn dictionary_key(channel: SalesChannel, attribute_key: &str) -> String {
    format!("{}:{}", channel.code(), attribute_key)
}

#[derive(Debug, Clone, PartialEq)]
pub enum CharacteristicsAction {
    ProductLoaded(ProductCharacteristicsDto),
    ChannelToggled {
        channel: SalesChannel,
        active: bool,
    },
    ChannelRequested(SalesChannel),
    ChannelCharacteristicsLoaded {
        channel: SalesChannel,
        characteristics: Vec<ChannelCharacteristic>,
    },
    ChannelCharacteristicsFailed {
        channel: SalesChannel,
        error: String,
    },
    FieldEdited {
        name: String,
        value: CharacteristicValue,
    },
    /// Текст из поля ввода; форма значения (строка или список) сохраняется
    FieldInput {
        name: String,
        text: String,
    },
    DictionaryRequested {
        channel: SalesChannel,
        attribute_key: String,
    },
    DictionaryLoaded {
        channel: SalesChannel,
        attribute_key: String,
        values: Vec<DictionaryValue>,
    },
    DictionaryFailed {
        channel: SalesChannel,
        attribute_key: String,
        error: String,
    },
    SaveFinished(WriteReport),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacteristicsState {
    pub snapshot: CharacteristicsSnapshot,
    pub product_loaded: bool,
    pub loading_channels: BTreeSet<SalesChannel>,
    /// Edited targets not yet persisted
    pub pending: BTreeSet<WriteTarget>,
    pub dictionaries: BTreeMap<String, DictionaryEntry>,
    pub last_report: Option<WriteReport>,
}

impl CharacteristicsState {
    pub fn merged(&self) -> MergedCharacteristics {
        self.snapshot.merge()
    }

    pub fn reduce(&mut self, action: CharacteristicsAction) {
        match action {
            CharacteristicsAction::ProductLoaded(dto) => {
                self.snapshot = CharacteristicsSnapshot::from_dto(dto);
                self.product_loaded = true;
                self.pending.clear();
                self.loading_channels.clear();
            }
            CharacteristicsAction::ChannelToggled { channel, active } => {
                self.snapshot.set_channel_active(channel, active);
                if !active {
                    self.pending.retain(|t| !targets_channel(t, channel));
                }
            }
            CharacteristicsAction::ChannelRequested(channel) => {
                self.snapshot.forget_channel_characteristics(channel);
                self.loading_channels.insert(channel);
            }
            CharacteristicsAction::ChannelCharacteristicsLoaded {
                channel,
                characteristics,
            } => {
                self.loading_channels.remove(&channel);
                self.snapshot
                    .set_channel_characteristics(channel, characteristics);
            }
            CharacteristicsAction::ChannelCharacteristicsFailed { channel, .. } => {
                // A failed channel degrades to "no characteristics"
                self.loading_channels.remove(&channel);
                self.snapshot.set_channel_characteristics(channel, Vec::new());
            }
            CharacteristicsAction::FieldEdited { name, value } => {
                let merged = self.snapshot.merge();
                let Some(entry) = merged.get(&name) else {
                    return;
                };
                fan_out(entry, &value, &mut self.snapshot);
                self.pending.extend(entry.write_targets());
            }
            CharacteristicsAction::FieldInput { name, text } => {
                let value = match self.snapshot.merge().get(&name) {
                    Some(entry) => match &entry.value {
                        Some(current) => current.parse_input(&text),
                        None => CharacteristicValue::Single(text),
                    },
                    None => return,
                };
                self.reduce(CharacteristicsAction::FieldEdited { name, value });
            }
            CharacteristicsAction::DictionaryRequested {
                channel,
                attribute_key,
            } => {
                self.dictionaries
                    .entry(dictionary_key(channel, &attribute_key))
                    .or_insert(DictionaryEntry::Loading);
            }
            CharacteristicsAction::DictionaryLoaded {
                channel,
                attribute_key,
                values,
            } => {
                self.dictionaries.insert(
                    dictionary_key(channel, &attribute_key),
                    DictionaryEntry::Ready(values),
                );
            }
            CharacteristicsAction::DictionaryFailed {
                channel,
                attribute_key,
                error,
            } => {
                self.dictionaries.insert(
                    dictionary_key(channel, &attribute_key),
                    DictionaryEntry::Failed(error),
                );
            }
            CharacteristicsAction::SaveFinished(report) => {
                for target in report.succeeded() {
                    self.pending.remove(target);
                }
                self.last_report = Some(report);
            }
        }
    }

    /// Active channel whose characteristics are neither known nor loading
    pub fn needs_characteristics(&self, channel: SalesChannel) -> bool {
        self.snapshot.is_channel_active(channel)
            && !self.snapshot.channel_characteristics.contains_key(&channel)
            && !self.loading_channels.contains(&channel)
    }

    /// Dictionary has never been requested
    pub fn needs_dictionary(&self, channel: SalesChannel, attribute_key: &str) -> bool {
        !self
            .dictionaries
            .contains_key(&dictionary_key(channel, attribute_key))
    }

    pub fn dictionary(&self, channel: SalesChannel, attribute_key: &str) -> Option<&DictionaryEntry> {
        self.dictionaries.get(&dictionary_key(channel, attribute_key))
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Pending targets with the value each should receive
    pub fn pending_writes(&self) -> Vec<(WriteTarget, CharacteristicValue)> {
        self.pending
            .iter()
            .map(|target| {
                let value = match target {
                    WriteTarget::Base { name } => self.snapshot.base_values.get(name),
                    WriteTarget::Channel {
                        channel,
                        attribute_key,
                        ..
                    } => self
                        .snapshot
                        .channel_values
                        .get(channel)
                        .and_then(|values| values.get(attribute_key)),
                };
                (target.clone(), value.cloned().unwrap_or_default())
            })
            .collect()
    }
}

fn targets_channel(target: &WriteTarget, channel: SalesChannel) -> bool {
    matches!(target, WriteTarget::Channel { channel: c, .. } if *c == channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::SalesChannel::{Ozon, Wildberries, YandexMarket};
    use serde_json::json;

    fn loaded_state() -> CharacteristicsState {
        let dto: ProductCharacteristicsDto = serde_json::from_value(json!({
            "base": { "Материал": "хлопок" },
            "activeChannels": ["ozon", "wb"]
        }))
        .unwrap();
        let mut state = CharacteristicsState::default();
        state.reduce(CharacteristicsAction::ProductLoaded(dto));
        state.reduce(CharacteristicsAction::ChannelCharacteristicsLoaded {
            channel: Ozon,
            characteristics: vec![
                ChannelCharacteristic::new("Материал").with_id("10").required(true),
                ChannelCharacteristic::new("Цвет").with_id("20"),
            ],
        });
        state
    }

    #[test]
    fn test_partial_data_renders_partial_result() {
        let state = loaded_state();
        assert!(state.needs_characteristics(Wildberries));
        assert!(!state.needs_characteristics(Ozon));
        assert!(!state.needs_characteristics(YandexMarket));
        assert_eq!(state.merged().names(), vec!["Материал", "Цвет"]);
        assert!(state.merged().unmapped_channels.is_empty());
    }

    #[test]
    fn test_failed_channel_becomes_unmapped() {
        let mut state = loaded_state();
        state.reduce(CharacteristicsAction::ChannelRequested(Wildberries));
        assert!(!state.needs_characteristics(Wildberries));
        state.reduce(CharacteristicsAction::ChannelCharacteristicsFailed {
            channel: Wildberries,
            error: "HTTP 502".to_string(),
        });
        assert!(state.loading_channels.is_empty());
        assert_eq!(state.merged().unmapped_channels, vec![Wildberries]);
        assert_eq!(state.merged().entries.len(), 2);
    }

    #[test]
    fn test_edit_fans_out_and_marks_pending() {
        let mut state = loaded_state();
        state.reduce(CharacteristicsAction::FieldEdited {
            name: "Материал".to_string(),
            value: "лён".into(),
        });

        let writes = state.pending_writes();
        assert_eq!(writes.len(), 2);
        assert!(writes.iter().all(|(_, v)| *v == CharacteristicValue::from("лён")));
        assert_eq!(state.merged().get("Материал").unwrap().display_value(), "лён");
    }

    #[test]
    fn test_input_into_list_field_stays_a_list() {
        let mut state = loaded_state();
        state.reduce(CharacteristicsAction::FieldEdited {
            name: "Цвет".to_string(),
            value: vec!["красный".to_string(), "синий".to_string()].into(),
        });
        assert_eq!(
            state.merged().get("Цвет").unwrap().display_value(),
            "красный, синий"
        );

        state.reduce(CharacteristicsAction::FieldInput {
            name: "Цвет".to_string(),
            text: "красный, синий, белый".to_string(),
        });
        let expected = CharacteristicValue::from(vec![
            "красный".to_string(),
            "синий".to_string(),
            "белый".to_string(),
        ]);
        let writes = state.pending_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1, expected);

        state.reduce(CharacteristicsAction::FieldInput {
            name: "Материал".to_string(),
            text: "лён, шёлк".to_string(),
        });
        assert_eq!(
            state.snapshot.base_values["Материал"],
            CharacteristicValue::from("лён, шёлк")
        );
    }

    #[test]
    fn test_edit_of_unknown_field_is_ignored() {
        let mut state = loaded_state();
        let before = state.clone();
        state.reduce(CharacteristicsAction::FieldEdited {
            name: "Вес".to_string(),
            value: "1 кг".into(),
        });
        assert_eq!(state, before);
    }

    #[test]
    fn test_save_keeps_failed_targets_pending() {
        let mut state = loaded_state();
        state.reduce(CharacteristicsAction::FieldEdited {
            name: "Материал".to_string(),
            value: "лён".into(),
        });

        let mut report = WriteReport::default();
        for (target, _) in state.pending_writes() {
            let result = match &target {
                WriteTarget::Base { .. } => Ok(()),
                WriteTarget::Channel { .. } => Err("HTTP 500".to_string()),
            };
            report.record(target, result);
        }
        state.reduce(CharacteristicsAction::SaveFinished(report));

        assert_eq!(
            state.pending.iter().cloned().collect::<Vec<_>>(),
            vec![WriteTarget::Channel {
                channel: Ozon,
                attribute_key: "10".to_string(),
                name: "Материал".to_string(),
            }]
        );
        assert!(!state.last_report.as_ref().unwrap().is_success());
    }

    #[test]
    fn test_deactivation_drops_channel_pending_writes() {
        let mut state = loaded_state();
        state.reduce(CharacteristicsAction::FieldEdited {
            name: "Цвет".to_string(),
            value: "красный".into(),
        });
        assert!(state.has_pending());

        state.reduce(CharacteristicsAction::ChannelToggled {
            channel: Ozon,
            active: false,
        });
        assert!(!state.has_pending());
        assert_eq!(state.merged().names(), vec!["Материал"]);
    }

    #[test]
    fn test_dictionary_is_requested_once() {
        let mut state = loaded_state();
        assert!(state.needs_dictionary(Ozon, "20"));
        state.reduce(CharacteristicsAction::DictionaryRequested {
            channel: Ozon,
            attribute_key: "20".to_string(),
        });
        assert!(!state.needs_dictionary(Ozon, "20"));
        assert_eq!(state.dictionary(Ozon, "20"), Some(&DictionaryEntry::Loading));

        state.reduce(CharacteristicsAction::DictionaryLoaded {
            channel: Ozon,
            attribute_key: "20".to_string(),
            values: vec![DictionaryValue::new("красный")],
        });
        // A repeated request does not reset loaded values
        state.reduce(CharacteristicsAction::DictionaryRequested {
            channel: Ozon,
            attribute_key: "20".to_string(),
        });
        assert!(matches!(
            state.dictionary(Ozon, "20"),
            Some(DictionaryEntry::Ready(values)) if values.len() == 1
        ));
    }

    #[test]
    fn test_state_is_serializable() {
        let state = loaded_state();
        let json = serde_json::to_value(&state).unwrap();
        let back: CharacteristicsState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
