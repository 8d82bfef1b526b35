pub mod activation;
pub mod fades;
pub mod location;
pub mod now_override;
