/// Базовый трейт для элементов, которые можно выбирать через пикер
pub trait AggregatePickerResult {
    fn id(&self) -> String;
    fn display_name(&self) -> String;
}

/// Трейт для элементов, которые можно отобразить в виде таблицы
pub trait TableDisplayable: AggregatePickerResult {
    fn code(&self) -> String;
    fn description(&self) -> String;
}

/// Поиск по описанию и коду без учёта регистра
pub fn matches_query<T: TableDisplayable>(item: &T, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || item.description().to_lowercase().contains(&query)
        || item.code().to_lowercase().contains(&query)
}
