//! Aggregate Picker
//!
//! Табличный выбор элемента из списка с поиском по тексту.
//! Используется для сопоставления товара с категорией маркетплейса.
//!
//! ```rust,ignore
//! impl AggregatePickerResult for MyItem { ... }
//! impl TableDisplayable for MyItem { ... }
//!
//! view! {
//!     <GenericAggregatePicker
//!         items=items_signal
//!         on_confirm=|item| { /* ... */ }
//!         on_cancel=|_| { /* ... */ }
//!     />
//! }
//! ```

pub mod component;
pub mod traits;

pub use component::GenericAggregatePicker;
pub use traits::{matches_query, AggregatePickerResult, TableDisplayable};
