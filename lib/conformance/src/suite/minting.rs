//! Tokens created through the fixture's mint hook.
use alloy_primitives::Address;
use erc721_reference::token::erc721::Transfer;

use super::{case, ensure_single_event, Case, Ctx};
use crate::events_in;

pub(super) fn cases() -> Vec<Case> {
    vec![case!(emits_one_transfer_event), case!(gives_correct_owner)]
}

async fn emits_one_transfer_event(ctx: &Ctx) -> eyre::Result<()> {
    let user1 = ctx.accounts().user1;
    let block = ctx.target().block_number().await?;

    let token_id = ctx.mint(user1).await?;

    let logs = ctx.target().logs(block + 1).await?;
    let events = events_in::<Transfer>(&logs, ctx.token().address());
    ensure_single_event(
        &events,
        &Transfer { from: Address::ZERO, to: user1, tokenId: token_id },
    )
}

async fn gives_correct_owner(ctx: &Ctx) -> eyre::Result<()> {
    let user1 = ctx.accounts().user1;
    let token_id = ctx.mint(user1).await?;
    ctx.ensure_owner(token_id, user1).await
}
