pub mod shells;
pub mod validator;
