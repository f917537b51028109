pub mod auth_service;
pub use auth_service::{AuthError, AuthService, MemberInfo};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod membership_service;
pub use membership_service::{MembershipError, MembershipService};

pub mod membership_service_impl;
pub use membership_service_impl::SeaOrmMembershipService;

pub mod message_service;
pub use message_service::{MessageError, MessageService};

pub mod message_service_impl;
pub use message_service_impl::SeaOrmMessageService;

pub mod context_service;
pub use context_service::{ContextError, ContextService, UserContext};

pub mod context_service_impl;
pub use context_service_impl::SeaOrmContextService;
