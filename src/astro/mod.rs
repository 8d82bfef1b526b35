pub mod solar;
pub mod source;
