pub mod favorites;
pub mod kv;
