use super::dictionary_select::DictionarySelect;
use super::mapping_prompt::MappingPrompt;
use super::view_model::CharacteristicsVm;
use crate::shared::icons::icon;
use crate::shared::notice::NoticeStack;
use contracts::domain::a007_marketplace_product::{
    CharacteristicSource, ProductId, UnifiedCharacteristic,
};
use contracts::enums::SalesChannel;
use leptos::prelude::*;
use thaw::*;

/// Unified characteristics form: one field per distinct characteristic name
#[component]
pub fn ProductCharacteristics(product_id: ProductId) -> impl IntoView {
    let vm = CharacteristicsVm::new(product_id);
    vm.load();

    view! {
        <div class="details-container product-characteristics">
            <Header vm=vm />

            <div class="modal-body">
                <NoticeStack notices=vm.notices />
                <ChannelToggles vm=vm />
                <MappingPrompt vm=vm />

                <Show
                    when=move || !vm.loading.get()
                    fallback=|| view! { <div class="details-loading"><Spinner /></div> }
                >
                    <FieldList vm=vm />
                </Show>
            </div>
        </div>
    }
}

#[component]
fn Header(vm: CharacteristicsVm) -> impl IntoView {
    let is_save_disabled = vm.is_save_disabled();

    view! {
        <div class="modal-header">
            <h3 class="modal-title">"Характеристики товара"</h3>
            <div class="modal-header-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.save()
                    disabled=is_save_disabled
                >
                    {icon("save")}
                    " Сохранить"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| vm.load()
                >
                    {icon("refresh")}
                    " Обновить"
                </Button>
            </div>
        </div>
    }
}

#[component]
fn ChannelToggles(vm: CharacteristicsVm) -> impl IntoView {
    view! {
        <div class="details-section channel-toggles">
            <h4 class="details-section__title">"Каналы продаж"</h4>
            <div class="details-flags">
                {SalesChannel::all().into_iter().map(|channel| {
                    let active = vm.is_channel_active(channel);
                    let loading = vm.is_channel_loading(channel);
                    view! {
                        <label class="channel-toggle">
                            <input
                                type="checkbox"
                                prop:checked=move || active.get()
                                on:change=move |ev| vm.toggle_channel(channel, event_target_checked(&ev))
                            />
                            {channel.display_name()}
                            <Show when=move || loading.get()>
                                <Spinner />
                            </Show>
                        </label>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}

#[component]
fn FieldList(vm: CharacteristicsVm) -> impl IntoView {
    view! {
        <div class="details-section">
            <h4 class="details-section__title">"Характеристики"</h4>
            <Show
                when=move || vm.merged.with(|m| !m.entries.is_empty())
                fallback=|| view! {
                    <div class="details-empty">"Нет характеристик для выбранных каналов"</div>
                }
            >
                <div class="details-grid--2col">
                    <For
                        each=move || vm.merged.get().entries
                        key=field_key
                        children=move |entry| view! { <CharacteristicField vm=vm entry=entry /> }
                    />
                </div>
            </Show>
        </div>
    }
}

/// Row identity: everything the row renders except the value, which is
/// read reactively, so typing does not rebuild the row
fn field_key(
    entry: &UnifiedCharacteristic,
) -> (String, Vec<CharacteristicSource>, Vec<SalesChannel>, Option<String>) {
    (
        entry.name.clone(),
        entry.sources.clone(),
        entry.required_in.clone(),
        entry.dictionary_source().map(|c| entry.attribute_key(c)),
    )
}

/// Label with the required marker and the list of declaring sources
fn field_label(entry: &UnifiedCharacteristic) -> String {
    if entry.required_in.is_empty() {
        entry.name.clone()
    } else {
        let channels: Vec<&str> = entry.required_in.iter().map(|c| c.display_name()).collect();
        format!("{} * ({})", entry.name, channels.join(", "))
    }
}

fn source_label(source: &CharacteristicSource) -> &'static str {
    match source {
        CharacteristicSource::Base => "База",
        CharacteristicSource::Channel(channel) => channel.display_name(),
    }
}

#[component]
fn CharacteristicField(vm: CharacteristicsVm, entry: UnifiedCharacteristic) -> impl IntoView {
    let name = entry.name.clone();
    let field_id = format!("characteristic-{}", name);
    let label = field_label(&entry);

    // The value is not part of the row key, read it from the memo
    let value = {
        let name = name.clone();
        Signal::derive(move || {
            vm.merged
                .with(|m| m.get(&name).map(UnifiedCharacteristic::display_value))
                .unwrap_or_default()
        })
    };

    let on_change = {
        let name = name.clone();
        Callback::new(move |text: String| {
            vm.edit(name.clone(), text);
        })
    };

    let input = match entry.dictionary_source() {
        Some(channel) => {
            let attribute_key = entry.attribute_key(channel);
            let key_for_entry = attribute_key.clone();
            let dictionary = Signal::derive(move || {
                vm.state.with(|s| s.dictionary(channel, &key_for_entry).cloned())
            });
            let on_open = Callback::new(move |_: ()| {
                vm.load_dictionary(channel, attribute_key.clone());
            });
            view! {
                <DictionarySelect
                    id=field_id.clone()
                    value=value
                    on_change=on_change
                    entry=dictionary
                    on_open=on_open
                />
            }
            .into_any()
        }
        None => view! {
            <input
                type="text"
                id=field_id.clone()
                prop:value=move || value.get()
                on:change=move |ev| on_change.run(event_target_value(&ev))
            />
        }
        .into_any(),
    };

    view! {
        <div class="form__group">
            <label class="form__label" for=field_id>{label}</label>
            {input}
            <div class="characteristic-sources">
                {entry.sources.iter().map(|source| {
                    let label = source_label(source);
                    view! {
                        <Badge appearance=BadgeAppearance::Tint color=BadgeColor::Informative>
                            {label}
                        </Badge>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}
