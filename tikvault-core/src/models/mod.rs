pub mod history;
pub mod progress;
pub mod settings;
pub mod video;
