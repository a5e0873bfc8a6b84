pub mod facts;
pub mod link;

pub use facts::{FactsError, FileFacts, SLICE_LEN};
pub use link::{detect, parse, render, resolve_formats, LinkError, LinkFormat};
