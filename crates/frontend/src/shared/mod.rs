pub mod api_utils;
pub mod icons;
pub mod notice;
pub mod picker_aggregate;
