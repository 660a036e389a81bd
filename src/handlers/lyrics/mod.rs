pub mod lyrics_handler;

pub use lyrics_handler::lyrics_handler;
