pub mod context;
pub mod dispatch;
pub mod evaluate;
pub mod output;
pub mod scheduler;
