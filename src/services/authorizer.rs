use crate::{
    error::{AppError, AppResult},
    models::Identity,
};

/// Whether `actor` may remove an annotation owned by `owner_id`
///
/// Owners may always act on their own annotations; elevated actors may act
/// on anyone's.
pub fn can_moderate(actor: &Identity, owner_id: &str) -> bool {
    actor.user_id == owner_id || actor.role.is_elevated()
}

/// Fails with `Forbidden` unless [`can_moderate`] allows the action
pub fn authorize_removal(actor: &Identity, owner_id: &str, what: &str) -> AppResult<()> {
    if can_moderate(actor, owner_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You don't have permission to delete this {}",
            what
        )))
    }
}

/// Fails with `Forbidden` unless `actor` is the author; roles do not apply to edits
pub fn authorize_edit(actor: &Identity, owner_id: &str, what: &str) -> AppResult<()> {
    if actor.user_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Only the author can edit this {}",
            what
        )))
    }
}
