pub mod authentication;
pub mod errors;
pub mod order;
pub mod pagination;
pub mod ports;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;
