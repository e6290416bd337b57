use super::state::DictionaryEntry;
use contracts::domain::a007_marketplace_product::filter_dictionary;
use leptos::ev::MouseEvent;
use leptos::prelude::*;

/// Searchable selector over a channel dictionary.
///
/// Values are requested through `on_open` the first time the list opens.
/// Typing only filters; a value is committed by picking it from the list.
#[component]
pub fn DictionarySelect(
    #[prop(into)] id: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(into)] entry: Signal<Option<DictionaryEntry>>,
    #[prop(into)] on_open: Callback<()>,
) -> impl IntoView {
    let (is_open, set_is_open) = signal(false);
    let (filter_text, set_filter_text) = signal(String::new());

    // Sync shown text with the committed value
    Effect::new(move || {
        set_filter_text.set(value.get());
    });

    let open = move || {
        on_open.run(());
        set_is_open.set(true);
    };

    let filtered = move || -> Result<Vec<String>, String> {
        match entry.get() {
            None | Some(DictionaryEntry::Loading) => Ok(Vec::new()),
            Some(DictionaryEntry::Failed(e)) => Err(e),
            Some(DictionaryEntry::Ready(values)) => {
                // The current value shows all options, anything else filters
                let text = filter_text.get();
                let query = if text == value.get_untracked() { "" } else { text.as_str() };
                Ok(filter_dictionary(&values, query)
                    .into_iter()
                    .map(|v| v.value.clone())
                    .collect())
            }
        }
    };

    let select_option = move |option: String| {
        set_filter_text.set(option.clone());
        on_change.run(option);
        set_is_open.set(false);
    };

    let on_clear = move |_: MouseEvent| {
        set_filter_text.set(String::new());
        on_change.run(String::new());
        set_is_open.set(false);
    };

    let toggle_dropdown = move |_: MouseEvent| {
        if is_open.get_untracked() {
            set_is_open.set(false);
        } else {
            open();
        }
    };

    // Close with a small delay so mousedown on an option fires first
    let on_blur = move |_| {
        leptos::task::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(150).await;
            set_is_open.set(false);
            set_filter_text.set(value.get_untracked());
        });
    };

    view! {
        <div class="dictionary-select">
            <input
                type="text"
                id=id
                prop:value=move || filter_text.get()
                on:input=move |ev| {
                    set_filter_text.set(event_target_value(&ev));
                    if !is_open.get_untracked() {
                        open();
                    }
                }
                on:focus=move |_| open()
                on:blur=on_blur
                placeholder="Выберите из справочника"
            />
            <div class="dictionary-select__buttons">
                <button type="button" on:mousedown=on_clear title="Очистить">"✕"</button>
                <button type="button" on:mousedown=toggle_dropdown title="Выбрать из списка">"▼"</button>
            </div>
            <Show when=move || is_open.get()>
                <div class="dictionary-select__dropdown">
                    {move || {
                        if matches!(entry.get(), None | Some(DictionaryEntry::Loading)) {
                            return view! {
                                <div class="dictionary-select__hint">"Загрузка..."</div>
                            }.into_any();
                        }
                        match filtered() {
                            Err(e) => view! {
                                <div class="dictionary-select__hint dictionary-select__hint--error">
                                    "Справочник недоступен: " {e}
                                </div>
                            }.into_any(),
                            Ok(options) if options.is_empty() => view! {
                                <div class="dictionary-select__hint">"Нет совпадений"</div>
                            }.into_any(),
                            Ok(options) => options.into_iter().map(|option| {
                                let option_for_click = option.clone();
                                view! {
                                    <div
                                        class="dictionary-select__option"
                                        on:mousedown=move |_| select_option(option_for_click.clone())
                                    >
                                        {option}
                                    </div>
                                }
                            }).collect_view().into_any(),
                        }
                    }}
                </div>
            </Show>
        </div>
    }
}
