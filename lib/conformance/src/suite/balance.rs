//! `balanceOf` bookkeeping.
use super::{case, Case, Ctx, MINTED_TOKENS};

pub(super) fn cases() -> Vec<Case> {
    vec![
        case!(is_zero_for_new_user),
        case!(counts_minted_tokens),
        case!(tracks_transfers),
    ]
}

async fn is_zero_for_new_user(ctx: &Ctx) -> eyre::Result<()> {
    ctx.ensure_balance(ctx.accounts().user1, 0).await
}

async fn counts_minted_tokens(ctx: &Ctx) -> eyre::Result<()> {
    ctx.ensure_balance(ctx.accounts().creator, MINTED_TOKENS as u64).await
}

async fn tracks_transfers(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let [first, second, _] = ctx.tokens();
    let token = ctx.token();

    token
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            first,
        )
        .await?;
    token
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            second,
        )
        .await?;
    ctx.ensure_balance(accounts.user1, 2).await?;

    token
        .transfer_from(accounts.user1, accounts.user1, accounts.user2, first)
        .await?;
    ctx.ensure_balance(accounts.user1, 1).await?;
    ctx.ensure_balance(accounts.user2, 1).await
}
