//! Invitation redemption.
//!
//! This endpoint is navigated to from an email link, so outcomes are
//! conveyed as redirect query parameters rather than error bodies, and the
//! token is preserved in the failure URL so a client can offer "request a
//! new invitation".

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Redirect;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::server::{PodspaceServer, RedeemOutcome};

pub async fn accept(
    State(server): State<Arc<PodspaceServer>>,
    user: Option<AuthUser>,
    Path(token): Path<String>,
) -> Result<Redirect, ApiError> {
    let base = &server.config.base_url;

    let Some(AuthUser(user_id)) = user else {
        // Not signed in: bounce to the login page, carrying the token so
        // redemption can resume afterwards.
        return Ok(Redirect::to(&format!("{base}/signin?invitation={token}")));
    };

    let url = match server.redeem_invitation(&user_id, &token).await? {
        RedeemOutcome::Joined { pod_id } => {
            format!("{base}/pods/{}?success=true", pod_id.0)
        }
        RedeemOutcome::AlreadyMember { pod_id } => {
            format!("{base}/pods/{}?success=true&message=already_member", pod_id.0)
        }
        RedeemOutcome::Invalid => {
            format!("{base}/invitations?error=invalid_invitation&token={token}")
        }
        RedeemOutcome::Expired => {
            format!("{base}/invitations?error=expired_invitation&token={token}")
        }
        RedeemOutcome::EmailMismatch => {
            format!("{base}/invitations?error=email_mismatch&token={token}")
        }
    };
    Ok(Redirect::to(&url))
}
