pub mod archive;
pub mod clockin;
pub mod clockout;
pub mod config;
pub mod db;
pub mod delete;
pub mod edit;
pub mod export;
pub mod history;
pub mod init;
pub mod log;
pub mod month;
pub mod range;
pub mod sessions;
pub mod status;
pub mod week;
