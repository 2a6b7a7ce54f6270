pub mod auth;
pub mod contractor;
pub mod formula;
pub mod job;
pub mod system;
