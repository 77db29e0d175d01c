// File I/O operations

pub mod csv;
pub mod error;
pub mod export;
pub mod mappings;
pub mod participants;
pub mod talks;

pub use error::IoError;
