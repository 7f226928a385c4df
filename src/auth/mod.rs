pub mod context;
pub mod password;
pub mod token;

pub use context::AuthContext;
pub use token::TokenService;
