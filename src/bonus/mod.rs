pub mod allocator;
pub mod errors;
pub mod package;
pub mod validator;
