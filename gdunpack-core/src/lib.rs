//! gdunpack-core
//!
//! Low-level plumbing shared by the unpacker and the script decoder:
//! bounds-checked byte ranges over a memory-mapped medium, and the pack
//! container index that tells us where every asset lives.

mod error;
mod mapped;
pub mod pck;
mod reader;

pub use error::{BoundsError, PackError};
pub use mapped::MappedFile;
pub use reader::{align4, ByteReader};
