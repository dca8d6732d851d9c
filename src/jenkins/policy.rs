use crate::auth::Session;

/// Restricted job-name prefix; only admins may touch jobs under it.
const RESTRICTED_PREFIX: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    List,
    Trigger,
    Summary,
    Health,
}

/// Pure authorization predicate, applied uniformly to every job-addressed
/// operation. Admins are permitted everything; other roles are denied any
/// job whose name case-insensitively starts with the restricted prefix.
pub fn is_permitted(session: &Session, job_name: &str, _kind: OperationKind) -> bool {
    if session.role.is_admin() {
        return true;
    }

    !job_name.to_lowercase().starts_with(RESTRICTED_PREFIX)
}
