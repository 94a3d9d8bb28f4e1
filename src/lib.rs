pub mod error;
pub mod loader;
pub mod output;
pub mod validator;
pub mod weather;
