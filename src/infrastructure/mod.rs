pub mod http;
pub mod repositories;
