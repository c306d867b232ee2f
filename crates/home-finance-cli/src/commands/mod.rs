pub mod budget;
pub mod debt;
