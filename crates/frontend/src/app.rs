use crate::domain::a007_marketplace_product::ui::characteristics::ProductCharacteristics;
use contracts::domain::a007_marketplace_product::ProductId;
use contracts::domain::common::AggregateId;
use leptos::prelude::*;
use serde::Deserialize;
use web_sys::window;

/// Query string of the page: `?product=<uuid>`
#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    product: Option<String>,
}

fn parse_product_id(search: &str) -> Result<ProductId, String> {
    let query: PageQuery =
        serde_qs::from_str(search.trim_start_matches('?')).map_err(|e| format!("{}", e))?;
    let raw = query
        .product
        .ok_or_else(|| "Не указан параметр product".to_string())?;
    ProductId::from_string(&raw)
}

fn product_id_from_location() -> Result<ProductId, String> {
    let search = window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    parse_product_id(&search)
}

#[component]
pub fn App() -> impl IntoView {
    match product_id_from_location() {
        Ok(product_id) => view! { <ProductCharacteristics product_id=product_id /> }.into_any(),
        Err(e) => {
            log::warn!("product id is missing or invalid: {}", e);
            view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{format!("Товар не выбран: {}", e)}</span>
                </div>
            }
            .into_any()
        }
    }
}
