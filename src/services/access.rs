//! Capability checks for complaints.
//!
//! Handlers and services ask the policy what a caller may do instead of
//! branching on roles themselves.

use crate::models::Complaint;
use crate::services::auth_service::AuthenticatedUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    UpdateStatus,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permitted,
    Denied,
}

impl Decision {
    pub fn is_permitted(&self) -> bool {
        matches!(self, Decision::Permitted)
    }
}

/// Which complaints a caller may list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    All,
    SubmittedBy(String),
}

pub trait AccessPolicy: Send + Sync {
    fn decide(&self, user: &AuthenticatedUser, action: Action, complaint: &Complaint) -> Decision;

    fn list_scope(&self, user: &AuthenticatedUser) -> ListScope;

    /// Gate for admin-only operations that have no single complaint in hand,
    /// such as user listings or status updates before the record is loaded.
    fn can_administer(&self, user: &AuthenticatedUser) -> bool;
}

/// Admins may do anything; submitters may view and delete their own
/// complaints; status changes are admin-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoleOwnershipPolicy;

impl AccessPolicy for RoleOwnershipPolicy {
    fn decide(&self, user: &AuthenticatedUser, action: Action, complaint: &Complaint) -> Decision {
        let permitted = match action {
            Action::View | Action::Delete => {
                user.is_admin() || complaint.is_submitted_by(&user.id)
            }
            Action::UpdateStatus => user.is_admin(),
        };

        if permitted {
            Decision::Permitted
        } else {
            Decision::Denied
        }
    }

    fn list_scope(&self, user: &AuthenticatedUser) -> ListScope {
        if user.is_admin() {
            ListScope::All
        } else {
            ListScope::SubmittedBy(user.id.clone())
        }
    }

    fn can_administer(&self, user: &AuthenticatedUser) -> bool {
        user.is_admin()
    }
}
