//! Unified characteristics form (MVVM)
//!
//! - model.rs: API functions (fetch, save)
//! - state.rs: serializable view state and reducer
//! - view_model.rs: signals + async commands
//! - view.rs: Leptos components (pure UI)
//! - dictionary_select.rs: searchable selector for dictionary-typed fields
//! - mapping_prompt.rs: category mapping for channels without characteristics

mod dictionary_select;
mod mapping_prompt;
mod model;
pub mod state;
mod view;
mod view_model;

pub use view::ProductCharacteristics;
pub use view_model::CharacteristicsVm;
