//! Queries and transfers that name a token or an account that cannot exist.
use alloy_primitives::{uint, Address, U256};
use erc721_reference::token::erc721::abi::IErc721;

use super::{case, Case, Ctx};
use crate::{expect_revert, Invocation};

/// Never minted by any fixture.
const NONEXISTENT_TOKEN: U256 = uint!(10_000_000_U256);
/// Never minted by any fixture, used for the per-token queries.
pub(super) const UNMINTED_TOKEN: U256 = uint!(1_000_000_000_U256);

pub(super) fn cases() -> Vec<Case> {
    vec![
        case!(transferring_nonexistent_token_fails),
        case!(balance_of_zero_address_fails_in_transaction),
        case!(balance_of_zero_address_fails_in_call),
        case!(owner_of_nonexistent_token_fails_in_transaction),
        case!(owner_of_nonexistent_token_fails_in_call),
        case!(get_approved_of_nonexistent_token_fails_in_transaction),
        case!(get_approved_of_nonexistent_token_fails_in_call),
    ]
}

async fn transferring_nonexistent_token_fails(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    expect_revert(ctx.token().transfer_from(
        accounts.creator,
        accounts.creator,
        accounts.user1,
        NONEXISTENT_TOKEN,
    ))
    .await?;
    Ok(())
}

async fn balance_of_zero(
    ctx: &Ctx,
    invocation: Invocation,
) -> eyre::Result<()> {
    let call = IErc721::balanceOfCall { owner: Address::ZERO };
    expect_revert(ctx.token().invoke(invocation, ctx.accounts().creator, &call))
        .await?;
    Ok(())
}

async fn balance_of_zero_address_fails_in_transaction(
    ctx: &Ctx,
) -> eyre::Result<()> {
    balance_of_zero(ctx, Invocation::Transaction).await
}

async fn balance_of_zero_address_fails_in_call(ctx: &Ctx) -> eyre::Result<()> {
    balance_of_zero(ctx, Invocation::Call).await
}

async fn owner_of_unminted(
    ctx: &Ctx,
    invocation: Invocation,
) -> eyre::Result<()> {
    let call = IErc721::ownerOfCall { tokenId: UNMINTED_TOKEN };
    expect_revert(ctx.token().invoke(invocation, ctx.accounts().creator, &call))
        .await?;
    Ok(())
}

async fn owner_of_nonexistent_token_fails_in_transaction(
    ctx: &Ctx,
) -> eyre::Result<()> {
    owner_of_unminted(ctx, Invocation::Transaction).await
}

async fn owner_of_nonexistent_token_fails_in_call(
    ctx: &Ctx,
) -> eyre::Result<()> {
    owner_of_unminted(ctx, Invocation::Call).await
}

async fn get_approved_of_unminted(
    ctx: &Ctx,
    invocation: Invocation,
) -> eyre::Result<()> {
    let call = IErc721::getApprovedCall { tokenId: UNMINTED_TOKEN };
    expect_revert(ctx.token().invoke(invocation, ctx.accounts().creator, &call))
        .await?;
    Ok(())
}

async fn get_approved_of_nonexistent_token_fails_in_transaction(
    ctx: &Ctx,
) -> eyre::Result<()> {
    get_approved_of_unminted(ctx, Invocation::Transaction).await
}

async fn get_approved_of_nonexistent_token_fails_in_call(
    ctx: &Ctx,
) -> eyre::Result<()> {
    get_approved_of_unminted(ctx, Invocation::Call).await
}
