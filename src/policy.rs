//! Who may do what to a result.
//!
//! Self-service users act on their own results; administrators act on any.
//! Reads only need an authenticated caller, deletes need an administrator.

use crate::auth::Principal;

/// Guarded operations of the results resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Read,
    Create,
    Update,
    Delete,
}

/// `target_user` is the owner named by the request payload, if any.
pub fn can_act(principal: &Principal, action: Action, target_user: Option<i32>) -> bool {
    match action {
        Action::List | Action::Read => true,
        Action::Create | Action::Update => {
            principal.is_admin() || target_user == Some(principal.id)
        }
        Action::Delete => principal.is_admin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ADMIN_ROLE;

    fn user(id: i32) -> Principal {
        Principal {
            id,
            email: format!("user{}@example.com", id),
            roles: vec!["ROLE_USER".into()],
        }
    }

    fn admin(id: i32) -> Principal {
        Principal {
            roles: vec!["ROLE_USER".into(), DEFAULT_ADMIN_ROLE.into()],
            ..user(id)
        }
    }

    #[test]
    fn anyone_authenticated_reads() {
        assert!(can_act(&user(2), Action::List, None));
        assert!(can_act(&user(2), Action::Read, Some(9)));
    }

    #[test]
    fn users_write_only_their_own() {
        for action in [Action::Create, Action::Update] {
            assert!(can_act(&user(2), action, Some(2)));
            assert!(!can_act(&user(2), action, Some(3)));
            assert!(!can_act(&user(2), action, None));
        }
    }

    #[test]
    fn admins_write_for_anyone() {
        for action in [Action::Create, Action::Update, Action::Delete] {
            assert!(can_act(&admin(1), action, Some(3)));
            assert!(can_act(&admin(1), action, None));
        }
    }

    #[test]
    fn only_admins_delete() {
        assert!(!can_act(&user(2), Action::Delete, Some(2)));
    }
}
