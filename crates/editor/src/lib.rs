// Library crate: the editing engine plus the headless command interface.
// The binary only wires these to stdin/stdout and the filesystem.

pub mod command;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod state;
