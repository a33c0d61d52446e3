pub mod currency;
pub mod favorite;
pub mod rate;
