pub mod apply;
pub mod common;
pub mod dirty;
pub mod mark_synced;
pub mod migrate;
pub mod payload;
pub mod settings;
pub mod status;
