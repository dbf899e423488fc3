pub mod bid;
pub mod category;
pub mod product;
pub mod user;
