pub mod domain;
pub mod guard;
pub mod ports;
pub mod validation;

pub use domain::{
    Assignment, AssignmentStatus, NewAssignment, NewSubmission, Role, Session, StudentRef,
    Submission, UserProfile,
};
pub use guard::{can_access, home_view, resolve, View};
pub use ports::{
    ApiRequest, ApiResponse, ApiTransport, Method, PortError, PortResult, SessionStorage,
    TOKEN_KEY, USER_KEY,
};
pub use validation::{validate_credentials, ValidationError};
