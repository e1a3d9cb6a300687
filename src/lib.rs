pub mod config;
pub mod error;
pub mod hls;
pub mod playlist;
pub mod proxy;
pub mod reader;
pub mod server;
pub mod writer;

pub use error::{Error, ParseError};
pub use playlist::{Playlist, PlaylistType};
pub use reader::Reader;
pub use writer::Writer;

pub type Result<T> = std::result::Result<T, Error>;
