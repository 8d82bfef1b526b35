pub mod diag;
pub mod error;
