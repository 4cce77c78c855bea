//! `transferFrom`.
use alloy_primitives::{Address, U256};
use erc721_reference::token::erc721::Transfer;
use eyre::ensure;

use super::{case, ensure_single_event, Case, Ctx};
use crate::{expect_revert, ReceiptExt, ReceiverKind};

pub(super) fn cases() -> Vec<Case> {
    vec![
        case!(emits_one_transfer_event),
        case!(changes_owner),
        case!(increases_receiver_balance),
        case!(decreases_sender_balance),
        case!(unauthorized_transfer_fails),
        case!(transfer_to_zero_address_fails),
        case!(transfer_to_non_accepting_contract_succeeds),
    ]
}

async fn emits_one_transfer_event(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();

    let receipt = token
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    ensure_single_event(
        &receipt.events::<Transfer>(token.address()),
        &Transfer {
            from: accounts.creator,
            to: accounts.user1,
            tokenId: ctx.token_id(),
        },
    )
}

async fn changes_owner(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    ctx.token()
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;
    ctx.ensure_owner(ctx.token_id(), accounts.user1).await
}

async fn increases_receiver_balance(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    let before = token.balance_of(accounts.user1).await?;

    token
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    let after = token.balance_of(accounts.user1).await?;
    ensure!(
        after == before + U256::from(1),
        "expected receiver balance to go from {before} to {before} + 1, got {after}"
    );
    Ok(())
}

async fn decreases_sender_balance(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    let before = token.balance_of(accounts.creator).await?;

    token
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    let after = token.balance_of(accounts.creator).await?;
    ensure!(
        after + U256::from(1) == before,
        "expected sender balance to go from {before} to {before} - 1, got {after}"
    );
    Ok(())
}

async fn unauthorized_transfer_fails(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    expect_revert(ctx.token().transfer_from(
        accounts.user1,
        accounts.creator,
        accounts.user1,
        ctx.token_id(),
    ))
    .await?;
    ctx.ensure_owner(ctx.token_id(), accounts.creator).await
}

async fn transfer_to_zero_address_fails(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    expect_revert(ctx.token().transfer_from(
        accounts.creator,
        accounts.creator,
        Address::ZERO,
        ctx.token_id(),
    ))
    .await?;
    ctx.ensure_owner(ctx.token_id(), accounts.creator).await
}

async fn transfer_to_non_accepting_contract_succeeds(
    ctx: &Ctx,
) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let receiver = ctx.receiver(ReceiverKind::Rejecting).await?;

    ctx.token()
        .transfer_from(
            accounts.creator,
            accounts.creator,
            receiver,
            ctx.token_id(),
        )
        .await?;

    ctx.ensure_owner(ctx.token_id(), receiver).await
}
