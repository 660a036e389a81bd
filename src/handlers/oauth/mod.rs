pub mod callback_handler;
pub mod login_handler;
pub mod refresh_handler;
pub mod tokens_handler;

pub use callback_handler::callback_handler;
pub use login_handler::login_handler;
pub use refresh_handler::refresh_handler;
pub use tokens_handler::tokens_handler;
