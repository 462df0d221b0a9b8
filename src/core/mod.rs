pub mod archive;
pub mod background;
pub mod log;
pub mod progress;
pub mod rules;
pub mod session;
