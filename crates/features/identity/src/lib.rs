//! # Identity
//!
//! This crate owns everything that touches the identity collaborator: the
//! HTTP gateway implementing the [`fxbet_kernel::ports::IdentityGateway`]
//! port, the ambient [`session::AuthSession`] tracking who is signed in,
//! and the admin user-listing surface.
//!
//! The auth state is explicit context, not a global: subsystems that need
//! it subscribe to the session and receive change notifications, so the
//! concrete backend stays swappable behind the port.

pub mod admin;
pub mod gateway;
pub mod session;

pub use crate::admin::{CONCEALED_CPF, UserDirectory, cpf_display};
pub use crate::gateway::RestIdentityGateway;
pub use crate::session::{AuthSession, AuthState, Identity};
