//! Domain layer for the chat client.
//!
//! This module contains the models and contracts that are independent of
//! transport and presentation concerns. The [`server`] module defines the
//! RPC boundary as traits (dependency inversion: the transport implements
//! them, the usecase layer only depends on the traits).

pub mod entity;
pub mod error;
pub mod factory;
pub mod server;
pub mod value_object;

pub use entity::{Identity, Message, MessageKind, Sender, TopicDescriptor};
pub use error::ValueObjectError;
pub use factory::IdentityFactory;
pub use value_object::{ListenerName, Timestamp, TopicId};
