//! Business logic services for the application layer.

pub mod post_service;
pub mod session_service;
pub mod user_service;

pub use post_service::{CreatePostInput, PostService, UpdatePostInput};
pub use session_service::{Requester, SessionService};
pub use user_service::{RegisterUser, UserService};
