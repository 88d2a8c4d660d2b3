pub mod dispatch;
pub mod group;
pub mod init;
pub mod org;
pub mod settings;
pub mod sync;
