pub mod a007_marketplace_product;
pub mod common;
