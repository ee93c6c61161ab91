pub mod datefmt;
pub mod unicode;
