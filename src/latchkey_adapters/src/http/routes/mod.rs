use std::sync::Arc;
use std::time::Duration;

pub mod error;
pub mod login;
pub mod register_complete;
pub mod register_initial;

pub use error::{AuthApiError, ErrorResponse};
pub use login::{LoginHttpResponse, LoginRequest, LoginState, login};
pub use register_complete::{RegisterCompleteRequest, RegisterCompleteResponse, register_complete};
pub use register_initial::{RegisterInitialRequest, RegisterInitialResponse, register_initial};

/// Shared router state for one flow: the use case plus the deadline applied
/// to each request it serves.
pub struct FlowState<F> {
    pub flow: Arc<F>,
    pub deadline: Duration,
}

impl<F> FlowState<F> {
    pub fn new(flow: F, deadline: Duration) -> Self {
        Self {
            flow: Arc::new(flow),
            deadline,
        }
    }
}

impl<F> Clone for FlowState<F> {
    fn clone(&self) -> Self {
        Self {
            flow: Arc::clone(&self.flow),
            deadline: self.deadline,
        }
    }
}
