pub mod cascade;
pub mod config;
pub mod error;
pub mod locator;
pub mod transport;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;
