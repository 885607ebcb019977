//! Capability-set authorization.
//!
//! The platform hands the dispatcher a flat list of role names per member;
//! an operation is authorized when the actor holds at least one of the roles
//! it requires. A pure set-intersection test - no hierarchy, no inheritance.

use std::collections::HashSet;

/// A set of role names.
pub type RoleSet = HashSet<String>;

/// The identity on whose behalf an operation runs.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Platform user ID of the actor
    pub user_id: String,
    /// Role names the platform reports for the actor
    pub roles: RoleSet,
}

impl Actor {
    /// Creates an actor from a user ID and an iterator of role names.
    pub fn new<I, S>(user_id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: user_id.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true when the actor holds at least one of the required roles.
    ///
    /// An empty required set authorizes nobody; operations that anyone may
    /// run simply never call this.
    #[must_use]
    pub fn is_authorized(&self, required: &RoleSet) -> bool {
        required.iter().any(|role| self.roles.contains(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role_set(roles: &[&str]) -> RoleSet {
        roles.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_authorized_with_one_matching_role() {
        let actor = Actor::new("user1", ["Member", "Quartermaster"]);
        assert!(actor.is_authorized(&role_set(&["High Command", "Quartermaster"])));
    }

    #[test]
    fn test_rejected_without_matching_role() {
        let actor = Actor::new("user1", ["Member"]);
        assert!(!actor.is_authorized(&role_set(&["High Command"])));
    }

    #[test]
    fn test_empty_required_set_authorizes_nobody() {
        let actor = Actor::new("user1", ["Member"]);
        assert!(!actor.is_authorized(&RoleSet::new()));
    }

    #[test]
    fn test_actor_with_no_roles() {
        let actor = Actor::new("user1", Vec::<String>::new());
        assert!(!actor.is_authorized(&role_set(&["Member"])));
    }
}
