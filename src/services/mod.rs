pub mod contents;
pub mod fs;
pub mod markdown;
pub mod watcher;
