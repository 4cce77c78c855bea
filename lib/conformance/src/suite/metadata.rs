//! The optional metadata extension: `tokenURI`.
use super::{case, invalid_token::UNMINTED_TOKEN, Case, Ctx};
use crate::expect_revert;

pub(super) fn cases() -> Vec<Case> {
    vec![
        case!(token_uri_of_minted_token_succeeds),
        case!(token_uri_of_nonexistent_token_fails),
    ]
}

async fn token_uri_of_minted_token_succeeds(ctx: &Ctx) -> eyre::Result<()> {
    let uri = ctx.token().token_uri(ctx.token_id()).await?;
    tracing::debug!(%uri, "tokenURI");
    Ok(())
}

async fn token_uri_of_nonexistent_token_fails(ctx: &Ctx) -> eyre::Result<()> {
    expect_revert(ctx.token().token_uri(UNMINTED_TOKEN)).await?;
    Ok(())
}
