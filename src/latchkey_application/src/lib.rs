pub mod deadline;
pub mod error_kind;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use deadline::{DeadlineExceeded, within};
pub use error_kind::ErrorKind;
pub use use_cases::{
    activate::{ActivateError, ActivateUseCase},
    login::{LoginError, LoginUseCase},
    pre_register::{ActivationSent, PreRegisterError, PreRegisterRequest, PreRegisterUseCase},
};
