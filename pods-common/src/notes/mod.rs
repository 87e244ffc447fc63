//! Document graph: node model and the store contract pods write through

mod memory;
mod model;
mod store;

pub use memory::MemoryNoteStore;
pub use model::{DocumentNode, NoteCustom, SocialHandles, SocialKey, SOCIAL_KEYS};
pub use store::{NoteStore, WriteOptions};
