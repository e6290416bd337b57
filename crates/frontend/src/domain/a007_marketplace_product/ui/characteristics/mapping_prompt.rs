//! Channels that are active but report no characteristics get a prompt to
//! map the product to one of the channel's categories.

use super::view_model::CharacteristicsVm;
use crate::shared::icons::icon;
use crate::shared::picker_aggregate::{
    AggregatePickerResult, GenericAggregatePicker, TableDisplayable,
};
use contracts::domain::a007_marketplace_product::MarketplaceCategory;
use leptos::prelude::*;
use thaw::*;

impl AggregatePickerResult for MarketplaceCategory {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl TableDisplayable for MarketplaceCategory {
    fn code(&self) -> String {
        self.id.clone()
    }

    fn description(&self) -> String {
        match &self.path {
            Some(path) if !path.is_empty() => format!("{} / {}", path, self.name),
            _ => self.name.clone(),
        }
    }
}

#[component]
pub fn MappingPrompt(vm: CharacteristicsVm) -> impl IntoView {
    view! {
        <For
            each=move || vm.merged.get().unmapped_channels
            key=|channel| *channel
            children=move |channel| {
                view! {
                    <div class="warning-box mapping-prompt">
                        <span class="warning-box__icon">"⚠"</span>
                        <span class="warning-box__text">
                            {format!(
                                "{}: категория не сопоставлена, характеристики канала недоступны",
                                channel.display_name()
                            )}
                        </span>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            size=ButtonSize::Small
                            on_click=move |_| vm.open_mapping(channel)
                        >
                            {icon("link")}
                            " Выбрать категорию"
                        </Button>
                    </div>
                }
            }
        />

        {move || vm.mapping_channel.get().map(|channel| {
            let title = format!("Категория {}", channel.display_name());
            view! {
                <div class="modal-overlay">
                    <div class="modal-frame">
                        <GenericAggregatePicker
                            items=vm.categories
                            loading=vm.categories_loading
                            error=vm.categories_error
                            title=title
                            on_confirm=move |category: MarketplaceCategory| vm.confirm_mapping(category)
                            on_cancel=move |_| vm.close_mapping()
                        />
                    </div>
                </div>
            }
        })}
    }
}
