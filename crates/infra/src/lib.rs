pub mod academic_year;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod membership;
pub mod models;
pub mod pagination;
pub mod payload;
pub mod repos;
