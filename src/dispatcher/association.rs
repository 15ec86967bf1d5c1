//! Resource association of a dispatcher.

use crate::error::{DispatchError, DispatchResult};

/// The resource a dispatcher serves. Set once, for the dispatcher's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAssociation {
    resource_id: Option<String>,
}

impl ResourceAssociation {
    /// An association that is not set yet.
    pub fn unset() -> Self {
        Self::default()
    }

    /// An association bound to `resource_id`.
    pub fn bound(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
        }
    }

    /// Binds the association.
    ///
    /// Re-binding to the same resource is accepted.
    ///
    /// # Errors
    /// [`DispatchError::AssociationAlreadySet`] if bound to another resource.
    pub fn set(&mut self, resource_id: &str) -> DispatchResult<()> {
        match &self.resource_id {
            Some(current) if current == resource_id => Ok(()),
            Some(current) => Err(DispatchError::AssociationAlreadySet {
                current: current.clone(),
                requested: resource_id.to_owned(),
            }),
            None => {
                self.resource_id = Some(resource_id.to_owned());
                Ok(())
            }
        }
    }

    /// The associated resource.
    ///
    /// # Errors
    /// [`DispatchError::AssociationNotSet`] if nothing is bound yet.
    pub fn get(&self) -> DispatchResult<&str> {
        self.resource_id
            .as_deref()
            .ok_or(DispatchError::AssociationNotSet)
    }

    /// Whether a resource is bound.
    pub fn is_set(&self) -> bool {
        self.resource_id.is_some()
    }

    /// The associated resource, if any.
    pub fn as_option(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_read_fails() {
        let a = ResourceAssociation::unset();
        assert!(!a.is_set());
        assert_eq!(a.get(), Err(DispatchError::AssociationNotSet));
    }

    #[test]
    fn test_set_once() {
        let mut a = ResourceAssociation::unset();
        a.set("M1").unwrap();
        assert_eq!(a.get(), Ok("M1"));
        assert!(a.set("M1").is_ok());
        assert_eq!(
            a.set("M2"),
            Err(DispatchError::AssociationAlreadySet {
                current: "M1".into(),
                requested: "M2".into(),
            })
        );
        assert_eq!(ResourceAssociation::bound("M3").as_option(), Some("M3"));
    }
}
