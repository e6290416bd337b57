pub mod a007_marketplace_product;
