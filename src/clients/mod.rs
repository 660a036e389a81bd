pub mod genius;
pub mod spotify;

pub use genius::GeniusClient;
