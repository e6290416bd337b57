//! ViewModel for the unified characteristics form
//!
//! Holds the whole form state in one `RwSignal<CharacteristicsState>` and
//! derives the merged field list from it. Every fetch is fired on its own;
//! each result is dispatched as an action and the merge recomputes from
//! whatever has arrived so far.

use super::model;
use super::state::{CharacteristicsAction, CharacteristicsState};
use crate::shared::notice::Notices;
use contracts::domain::a007_marketplace_product::{
    CategoryMappingRequest, MarketplaceCategory, MergedCharacteristics, ProductId, WriteReport,
};
use contracts::enums::SalesChannel;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct CharacteristicsVm {
    pub product_id: ProductId,
    pub state: RwSignal<CharacteristicsState>,
    pub merged: Memo<MergedCharacteristics>,
    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,

    // Category mapping picker
    pub mapping_channel: RwSignal<Option<SalesChannel>>,
    pub categories: RwSignal<Vec<MarketplaceCategory>>,
    pub categories_loading: RwSignal<bool>,
    pub categories_error: RwSignal<Option<String>>,

    pub notices: Notices,
}

impl CharacteristicsVm {
    pub fn new(product_id: ProductId) -> Self {
        let state = RwSignal::new(CharacteristicsState::default());
        let merged = Memo::new(move |_| state.with(|s| s.merged()));
        Self {
            product_id,
            state,
            merged,
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
            mapping_channel: RwSignal::new(None),
            categories: RwSignal::new(Vec::new()),
            categories_loading: RwSignal::new(false),
            categories_error: RwSignal::new(None),
            notices: Notices::new(),
        }
    }

    pub fn dispatch(&self, action: CharacteristicsAction) {
        self.state.update(|s| s.reduce(action));
    }

    // === Derived signals ===

    pub fn is_channel_active(&self, channel: SalesChannel) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.snapshot.is_channel_active(channel)))
    }

    pub fn is_channel_loading(&self, channel: SalesChannel) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.loading_channels.contains(&channel)))
    }

    pub fn is_save_disabled(&self) -> Signal<bool> {
        let state = self.state;
        let saving = self.saving;
        Signal::derive(move || saving.get() || !state.with(|s| s.has_pending()))
    }

    // === Data loading ===

    /// Load product values, then every active channel independently
    pub fn load(&self) {
        let this = *self;
        this.loading.set(true);

        leptos::task::spawn_local(async move {
            match model::fetch_product_characteristics(this.product_id).await {
                Ok(dto) => {
                    log::debug!(
                        "product {:?}: {} base values, channels {:?}",
                        this.product_id,
                        dto.base.len(),
                        dto.active_channels
                    );
                    this.dispatch(CharacteristicsAction::ProductLoaded(dto));
                    for channel in SalesChannel::all() {
                        if this.state.with_untracked(|s| s.needs_characteristics(channel)) {
                            this.load_channel(channel);
                        }
                    }
                }
                Err(e) => {
                    log::error!("failed to load product characteristics: {}", e);
                    this.notices.error(format!("Ошибка загрузки: {}", e));
                }
            }
            this.loading.set(false);
        });
    }

    pub fn load_channel(&self, channel: SalesChannel) {
        let this = *self;
        this.dispatch(CharacteristicsAction::ChannelRequested(channel));

        leptos::task::spawn_local(async move {
            match model::fetch_channel_characteristics(this.product_id, channel).await {
                Ok(characteristics) => {
                    log::debug!("{}: {} characteristics", channel, characteristics.len());
                    this.dispatch(CharacteristicsAction::ChannelCharacteristicsLoaded {
                        channel,
                        characteristics,
                    });
                }
                Err(e) => {
                    log::error!("{}: failed to load characteristics: {}", channel, e);
                    this.notices.warning(format!(
                        "{}: характеристики не загружены ({})",
                        channel.display_name(),
                        e
                    ));
                    this.dispatch(CharacteristicsAction::ChannelCharacteristicsFailed {
                        channel,
                        error: e,
                    });
                }
            }
        });
    }

    pub fn load_dictionary(&self, channel: SalesChannel, attribute_key: String) {
        if !self
            .state
            .with_untracked(|s| s.needs_dictionary(channel, &attribute_key))
        {
            return;
        }
        let this = *self;
        this.dispatch(CharacteristicsAction::DictionaryRequested {
            channel,
            attribute_key: attribute_key.clone(),
        });

        leptos::task::spawn_local(async move {
            match model::fetch_dictionary(channel, &attribute_key).await {
                Ok(values) => this.dispatch(CharacteristicsAction::DictionaryLoaded {
                    channel,
                    attribute_key,
                    values,
                }),
                Err(e) => {
                    log::error!("{}: dictionary {} failed: {}", channel, attribute_key, e);
                    this.dispatch(CharacteristicsAction::DictionaryFailed {
                        channel,
                        attribute_key,
                        error: e,
                    });
                }
            }
        });
    }

    // === Commands ===

    pub fn toggle_channel(&self, channel: SalesChannel, active: bool) {
        self.dispatch(CharacteristicsAction::ChannelToggled { channel, active });
        if self
            .state
            .with_untracked(|s| s.needs_characteristics(channel))
        {
            self.load_channel(channel);
        }
    }

    pub fn edit(&self, name: String, text: String) {
        self.dispatch(CharacteristicsAction::FieldInput { name, text });
    }

    /// Persist every pending target; each target is an independent request
    pub fn save(&self) {
        let writes = self.state.with_untracked(|s| s.pending_writes());
        if writes.is_empty() {
            return;
        }
        let this = *self;
        this.saving.set(true);

        leptos::task::spawn_local(async move {
            let mut report = WriteReport::default();
            for (target, value) in writes {
                let result = model::save_target(this.product_id, &target, &value).await;
                if let Err(e) = &result {
                    log::error!("save {} failed: {}", target.label(), e);
                }
                report.record(target, result);
            }

            if report.is_success() {
                this.notices.success(report.summary());
            } else {
                this.notices.error(report.summary());
            }
            this.dispatch(CharacteristicsAction::SaveFinished(report));
            this.saving.set(false);
        });
    }

    // === Category mapping ===

    pub fn open_mapping(&self, channel: SalesChannel) {
        let this = *self;
        this.mapping_channel.set(Some(channel));
        this.categories.set(Vec::new());
        this.categories_error.set(None);
        this.categories_loading.set(true);

        leptos::task::spawn_local(async move {
            match model::fetch_categories(channel).await {
                Ok(items) => this.categories.set(items),
                Err(e) => {
                    log::error!("{}: failed to load categories: {}", channel, e);
                    this.categories_error.set(Some(e));
                }
            }
            this.categories_loading.set(false);
        });
    }

    pub fn close_mapping(&self) {
        self.mapping_channel.set(None);
    }

    pub fn confirm_mapping(&self, category: MarketplaceCategory) {
        let Some(channel) = self.mapping_channel.get_untracked() else {
            return;
        };
        let this = *self;
        this.mapping_channel.set(None);

        leptos::task::spawn_local(async move {
            let request = CategoryMappingRequest {
                channel,
                category_id: category.id.clone(),
            };
            match model::map_category(this.product_id, &request).await {
                Ok(()) => {
                    this.notices.success(format!(
                        "{}: категория «{}» назначена",
                        channel.display_name(),
                        category.name
                    ));
                    this.load_channel(channel);
                }
                Err(e) => {
                    log::error!("{}: category mapping failed: {}", channel, e);
                    this.notices.error(format!("Ошибка назначения категории: {}", e));
                }
            }
        });
    }
}
