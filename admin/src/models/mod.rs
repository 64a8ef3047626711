pub mod common;
pub mod company;
pub mod order;
