pub mod activation_token;
pub mod email;
pub mod password;
pub mod password_hash;
pub mod policy;
pub mod profile;
pub mod session_token;
pub mod user;
