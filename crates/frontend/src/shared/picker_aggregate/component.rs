use super::traits::{matches_query, TableDisplayable};
use leptos::prelude::*;

/// Универсальный компонент для выбора элемента из списка
///
/// Клик выбирает строку, двойной клик сразу подтверждает выбор.
/// Поле поиска фильтрует по описанию и коду.
#[component]
pub fn GenericAggregatePicker<T>(
    /// Список элементов для выбора
    #[prop(into)]
    items: Signal<Vec<T>>,
    /// Ошибка загрузки (если есть)
    #[prop(optional, into)]
    error: Option<Signal<Option<String>>>,
    /// Индикатор загрузки
    #[prop(optional, into)]
    loading: Option<Signal<bool>>,
    /// Callback при подтверждении выбора
    on_confirm: impl Fn(T) + 'static + Clone + Send + Sync,
    /// Callback при отмене
    on_cancel: impl Fn(()) + 'static + Clone + Send + Sync,
    /// Заголовок
    #[prop(optional, into)]
    title: Option<String>,
) -> impl IntoView
where
    T: TableDisplayable + Clone + Send + Sync + 'static,
{
    let (selected_id, set_selected_id) = signal::<Option<String>>(None);
    let (query, set_query) = signal(String::new());
    let title = title.unwrap_or_else(|| "Выбор элемента".to_string());

    let loading = loading.unwrap_or_else(|| Signal::derive(|| false));
    let error = error.unwrap_or_else(|| Signal::derive(|| None));

    let visible = move || {
        let q = query.get();
        items.with(|all| {
            all.iter()
                .filter(|item| matches_query(*item, &q))
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    let handle_confirm = {
        let on_confirm = on_confirm.clone();
        move |_| {
            let Some(id) = selected_id.get() else {
                return;
            };
            if let Some(item) = items.with(|all| all.iter().find(|i| i.id() == id).cloned()) {
                on_confirm(item);
            }
        }
    };

    view! {
        <div class="picker-container">
            <div class="picker-header">
                <h3>{title}</h3>
                <input
                    type="text"
                    class="picker-search"
                    placeholder="Поиск..."
                    prop:value=move || query.get()
                    on:input=move |ev| set_query.set(event_target_value(&ev))
                />
            </div>

            <div class="picker-content">
                {move || {
                    if loading.get() {
                        view! { <div class="picker-loading">"Загрузка..."</div> }.into_any()
                    } else if let Some(err) = error.get() {
                        view! {
                            <div class="picker-error">
                                <p>"Ошибка загрузки: " {err}</p>
                            </div>
                        }.into_any()
                    } else {
                        let rows = visible();
                        if rows.is_empty() {
                            view! {
                                <div class="picker-empty">"Нет доступных элементов"</div>
                            }.into_any()
                        } else {
                            let on_confirm = on_confirm.clone();
                            view! {
                                <table class="picker-table">
                                    <thead>
                                        <tr>
                                            <th>"Наименование"</th>
                                            <th>"Код"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {rows.into_iter().map(|item| {
                                            let item_id = item.id();
                                            let id_for_selected = item_id.clone();
                                            let item_for_dblclick = item.clone();
                                            let on_confirm = on_confirm.clone();

                                            view! {
                                                <tr
                                                    class="picker-row"
                                                    class:selected=move || selected_id.get().as_ref() == Some(&id_for_selected)
                                                    on:click=move |_| set_selected_id.set(Some(item_id.clone()))
                                                    on:dblclick=move |_| on_confirm(item_for_dblclick.clone())
                                                >
                                                    <td>{item.description()}</td>
                                                    <td>{item.code()}</td>
                                                </tr>
                                            }
                                        }).collect_view()}
                                    </tbody>
                                </table>
                            }.into_any()
                        }
                    }
                }}
            </div>

            <div class="picker-actions">
                <button
                    class="button button--primary"
                    on:click=handle_confirm
                    disabled=move || selected_id.get().is_none()
                >
                    "Выбрать"
                </button>
                <button
                    class="button button--secondary"
                    on:click=move |_| on_cancel(())
                >
                    "Отмена"
                </button>
            </div>
        </div>
    }
}
