pub mod bid;
pub mod category;
pub mod dashboard;
pub mod product;
pub mod user;
