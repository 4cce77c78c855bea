//! Tokens destroyed through the fixture's burn hook.
//!
//! Burning mirrors minting: the only event is a `Transfer` to the zero
//! address.
use alloy_primitives::Address;
use erc721_reference::token::erc721::Transfer;

use super::{case, ensure_single_event, Case, Ctx};
use crate::{events_in, expect_revert};

pub(super) fn cases() -> Vec<Case> {
    vec![
        case!(emits_one_transfer_event),
        case!(burned_token_has_no_owner),
        case!(decreases_owner_balance),
    ]
}

async fn emits_one_transfer_event(ctx: &Ctx) -> eyre::Result<()> {
    let user1 = ctx.accounts().user1;
    let token_id = ctx.mint(user1).await?;
    let block = ctx.target().block_number().await?;

    ctx.burn(user1, token_id).await?;

    let logs = ctx.target().logs(block + 1).await?;
    let events = events_in::<Transfer>(&logs, ctx.token().address());
    ensure_single_event(
        &events,
        &Transfer { from: user1, to: Address::ZERO, tokenId: token_id },
    )
}

async fn burned_token_has_no_owner(ctx: &Ctx) -> eyre::Result<()> {
    let user1 = ctx.accounts().user1;
    let token_id = ctx.mint(user1).await?;

    ctx.burn(user1, token_id).await?;

    expect_revert(ctx.token().owner_of(token_id)).await?;
    Ok(())
}

async fn decreases_owner_balance(ctx: &Ctx) -> eyre::Result<()> {
    let user1 = ctx.accounts().user1;
    let token_id = ctx.mint(user1).await?;

    ctx.burn(user1, token_id).await?;

    ctx.ensure_balance(user1, 0).await
}
