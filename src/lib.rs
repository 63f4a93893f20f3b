pub mod config;
pub mod error;
pub mod report;
pub mod sonar;
pub mod wechat;
pub mod webhooks;

pub use error::NotifierError;
