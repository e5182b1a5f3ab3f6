mod entry;
mod ids;
mod known;
mod pack;

pub use entry::{Entry, Token};
pub use ids::{EntryId, PackUrl};
pub use known::KnownSet;
pub use pack::{Manifest, Pack, PackRef};
