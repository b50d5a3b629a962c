//! Domain factories for creating domain entities and value objects.

use super::entity::Identity;
use super::error::ValueObjectError;
use super::value_object::ListenerName;

/// Factory for creating session identities.
///
/// Encapsulates token generation so that [`Identity`] itself stays a plain
/// immutable record. Each call produces a distinct session token even for
/// the same display name.
pub struct IdentityFactory;

impl IdentityFactory {
    /// Create a new Identity for the given display name.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueObjectError`] when the name fails validation.
    pub fn create(name: &str) -> Result<Identity, ValueObjectError> {
        let name = ListenerName::new(name.to_string())?;
        Ok(Identity {
            name,
            token: uuid::Uuid::new_v4(),
        })
    }
}
