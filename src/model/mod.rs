pub mod deck;
pub mod fleet;
pub mod master;
