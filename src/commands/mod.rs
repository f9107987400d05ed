pub mod catalog;
pub mod turn;
