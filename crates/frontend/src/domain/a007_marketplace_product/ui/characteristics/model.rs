use crate::shared::api_utils::{get_json, post_json, put_json};
use contracts::domain::a007_marketplace_product::{
    parse_channel_characteristics, BaseValueUpdate, CategoryMappingRequest, ChannelCharacteristic,
    ChannelValueUpdate, CharacteristicValue, DictionaryValue, MarketplaceCategory,
    ProductCharacteristicsDto, ProductId, WriteTarget,
};
use contracts::domain::common::AggregateId;
use contracts::enums::SalesChannel;

fn product_path(id: ProductId) -> String {
    format!("/api/marketplace_product/{}", id.as_string())
}

/// Base values, active channels and stored channel values of a product
pub async fn fetch_product_characteristics(
    id: ProductId,
) -> Result<ProductCharacteristicsDto, String> {
    get_json(&format!("{}/characteristics", product_path(id))).await
}

/// Characteristics the channel declares for the product's mapped category.
///
/// Malformed records are logged and skipped; they never fail the channel.
pub async fn fetch_channel_characteristics(
    id: ProductId,
    channel: SalesChannel,
) -> Result<Vec<ChannelCharacteristic>, String> {
    let raw: Vec<serde_json::Value> = get_json(&format!(
        "{}/characteristics/{}/attributes",
        product_path(id),
        channel.code()
    ))
    .await?;

    let (parsed, rejected) = parse_channel_characteristics(raw);
    for (idx, err) in rejected {
        log::warn!("{}: skipped characteristic #{}: {}", channel, idx, err);
    }
    Ok(parsed)
}

/// Closed value list of a dictionary-typed channel attribute
pub async fn fetch_dictionary(
    channel: SalesChannel,
    attribute_key: &str,
) -> Result<Vec<DictionaryValue>, String> {
    get_json(&format!(
        "/api/characteristics/{}/dictionary/{}",
        channel.code(),
        urlencoding::encode(attribute_key)
    ))
    .await
}

pub async fn fetch_categories(channel: SalesChannel) -> Result<Vec<MarketplaceCategory>, String> {
    get_json(&format!("/api/characteristics/{}/categories", channel.code())).await
}

pub async fn map_category(id: ProductId, request: &CategoryMappingRequest) -> Result<(), String> {
    post_json(&format!("{}/category", product_path(id)), request).await
}

/// Persist one write target
pub async fn save_target(
    id: ProductId,
    target: &WriteTarget,
    value: &CharacteristicValue,
) -> Result<(), String> {
    match target {
        WriteTarget::Base { name } => {
            let body = BaseValueUpdate {
                name: name.clone(),
                value: value.clone(),
            };
            put_json(&format!("{}/characteristics/base", product_path(id)), &body).await
        }
        WriteTarget::Channel {
            channel,
            attribute_key,
            name,
        } => {
            let body = ChannelValueUpdate {
                attribute_id: attribute_key.clone(),
                name: name.clone(),
                value: value.clone(),
            };
            put_json(
                &format!("{}/characteristics/{}", product_path(id), channel.code()),
                &body,
            )
            .await
        }
    }
}
