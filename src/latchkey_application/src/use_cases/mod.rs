pub mod activate;
pub mod login;
pub mod pre_register;
