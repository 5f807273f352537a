// handlers/public/auth - token acquisition
pub mod client_token;
pub mod token;

pub use client_token::client_token;
pub use token::user_token;
