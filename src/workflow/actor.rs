use uuid::Uuid;

use crate::models::users::{self, Role};

/// What an actor is allowed to do, computed once when the actor is resolved.
///
/// A superuser gets every capability; otherwise each flag follows directly
/// from the role column. Guards check these flags instead of re-deriving
/// role logic per call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Superuser: bypasses ownership checks, sees everything.
    pub admin: bool,
    /// Support staff: sees everything, mutates nothing.
    pub support: bool,
    /// May apply to and withdraw from ads, report assigned work done.
    pub contractor: bool,
    /// May create ads and review completed ones.
    pub customer: bool,
}

/// The authenticated identity performing an operation.
///
/// Built by the auth middleware from the user row and passed explicitly
/// into every workflow operation; there is no ambient role lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub caps: Capabilities,
}

impl Actor {
    pub fn new(id: Uuid, role: Role, is_superuser: bool) -> Self {
        let caps = Capabilities {
            admin: is_superuser,
            support: is_superuser || role == Role::Support,
            contractor: is_superuser || role == Role::Contractor,
            customer: is_superuser || role == Role::Customer,
        };
        Self { id, role, caps }
    }

    pub fn from_user(user: &users::Model) -> Self {
        Self::new(user.id, user.role, user.is_superuser)
    }

    /// Whether this actor may act on the given ad as its owner.
    pub fn owns(&self, creator_id: Uuid) -> bool {
        self.caps.admin || self.id == creator_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superuser_gets_every_capability() {
        let admin = Actor::new(Uuid::new_v4(), Role::Customer, true);
        assert!(admin.caps.admin);
        assert!(admin.caps.support);
        assert!(admin.caps.contractor);
        assert!(admin.caps.customer);
    }

    #[test]
    fn capabilities_follow_the_role() {
        let contractor = Actor::new(Uuid::new_v4(), Role::Contractor, false);
        assert!(contractor.caps.contractor);
        assert!(!contractor.caps.customer);
        assert!(!contractor.caps.support);
        assert!(!contractor.caps.admin);

        let support = Actor::new(Uuid::new_v4(), Role::Support, false);
        assert!(support.caps.support);
        assert!(!support.caps.contractor);
        assert!(!support.caps.admin);
    }

    #[test]
    fn ownership_is_identity_or_admin() {
        let creator = Uuid::new_v4();
        let customer = Actor::new(creator, Role::Customer, false);
        assert!(customer.owns(creator));

        let stranger = Actor::new(Uuid::new_v4(), Role::Customer, false);
        assert!(!stranger.owns(creator));

        let admin = Actor::new(Uuid::new_v4(), Role::Support, true);
        assert!(admin.owns(creator));
    }
}
