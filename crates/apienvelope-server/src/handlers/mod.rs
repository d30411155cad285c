pub mod items;
pub mod operations;
pub mod status;

// Re-export handler functions
pub use items::*;
pub use operations::*;
pub use status::*;
