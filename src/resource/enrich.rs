//! IAM user enrichment
//!
//! Each user gets two independent IAM lookups. A failed lookup degrades
//! only its own field to [`UNKNOWN`]; the user is always returned.

use super::kinds::IamUser;
use crate::aws::identity::IdentitySource;
use futures::future::join_all;

/// Placeholder for a field whose lookup failed
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a user that never signed in to the console
pub const NEVER: &str = "Never";

/// Enrich all users concurrently, preserving order
pub async fn enrich_users(identity: &dyn IdentitySource, users: Vec<IamUser>) -> Vec<IamUser> {
    join_all(users.into_iter().map(|user| enrich_user(identity, user))).await
}

/// Fill in access key status and last console login for one user
pub async fn enrich_user(identity: &dyn IdentitySource, mut user: IamUser) -> IamUser {
    let (keys, login) = tokio::join!(
        identity.access_key_status(&user.user_name),
        identity.last_console_login(&user.user_name),
    );

    user.access_key_status = match keys {
        Ok(status) => status.as_str().to_string(),
        Err(e) => {
            tracing::debug!("ListAccessKeys for {} failed: {:#}", user.user_name, e);
            UNKNOWN.to_string()
        }
    };

    user.last_console_login = match login {
        Ok(Some(at)) => at.to_rfc3339(),
        Ok(None) => NEVER.to_string(),
        Err(e) => {
            tracing::debug!("GetUser for {} failed: {:#}", user.user_name, e);
            UNKNOWN.to_string()
        }
    };

    user
}
