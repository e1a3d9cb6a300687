pub mod attributes;
pub mod byterange;
pub mod item;
pub mod key;
pub mod stream_info;

pub use byterange::ByteRange;
pub use item::{Comment, ItemKind, MediaFile, PlaylistItem, Tag};
pub use key::{KeyInfo, KeyMethod, KeyUrl};
pub use stream_info::VariantStream;
