//! Matching a verified identity to a local user.

use crate::claims::IdentityClaims;
use crate::error::UserStoreError;
use crate::store::UserStore;
use crate::user::User;

/// Outcome of reconciling a login with the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledUser {
    /// The local user, existing or just created.
    pub user: User,
    /// Whether this login provisioned the user.
    pub is_new_user: bool,
}

/// Finds the user for the claims' subject, creating it on first login.
///
/// An existing user is returned as stored; its email is not refreshed from
/// the claims. If a concurrent login creates the same subject first, the
/// conflict is resolved by reading back the winner's row once.
///
/// # Errors
///
/// Returns [`UserStoreError::Database`] when the store fails, or when the
/// conflicting row cannot be read back.
pub async fn reconcile_user(
    store: &dyn UserStore,
    claims: &IdentityClaims,
) -> Result<ReconciledUser, UserStoreError> {
    let subject = claims.subject();

    if let Some(user) = store.find_by_subject(subject).await? {
        tracing::info!(user_id = %user.id(), "Found existing user");
        return Ok(ReconciledUser {
            user,
            is_new_user: false,
        });
    }

    let user = User::new(subject.to_string(), claims.contact_email().to_string());
    match store.create(&user).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id(), "Created new user");
            Ok(ReconciledUser {
                user,
                is_new_user: true,
            })
        }
        Err(UserStoreError::Conflict { .. }) => {
            tracing::warn!(subject, "Lost user creation race, reading existing user");
            let user = store
                .find_by_subject(subject)
                .await?
                .ok_or_else(|| UserStoreError::Database {
                    details: format!("user '{subject}' conflicted on insert but was not found"),
                })?;
            Ok(ReconciledUser {
                user,
                is_new_user: false,
            })
        }
        Err(e) => Err(e),
    }
}
