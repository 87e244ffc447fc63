//! SQLite persistence for the document graph

pub mod init;
pub mod notes;

pub use init::init_database;
pub use notes::SqliteNoteStore;
