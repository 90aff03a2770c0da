mod draft;
mod entry;
mod filter;
mod id_types;
mod identity;
pub use draft::*;
pub use entry::*;
pub use filter::*;
pub use id_types::*;
pub use identity::*;
