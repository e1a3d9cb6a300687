pub mod playlist;

pub use playlist::handle_playlist;
