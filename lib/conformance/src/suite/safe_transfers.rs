//! `safeTransferFrom`, run once per payload variant.
//!
//! Every rejected transfer must also leave the token with its owner.
use alloy_primitives::{Address, U256};
use erc721_reference::token::erc721::{Approval, Transfer};
use eyre::ensure;

use super::{case, ensure_single_event, Case, Ctx};
use crate::{expect_revert, Receipt, ReceiptExt, ReceiverKind, Result};

pub(super) fn cases() -> Vec<Case> {
    vec![
        case!(emits_one_transfer_event),
        case!(transfer_to_zero_address_fails),
        case!(changes_owner),
        case!(unauthorized_transfer_fails),
        case!(rejecting_receiver_fails),
        case!(wrong_selector_receiver_fails),
        case!(non_receiver_contract_fails),
        case!(accepting_receiver_succeeds),
        case!(resets_approval_without_event),
        case!(approved_party_can_transfer),
        case!(operator_can_transfer),
    ]
}

async fn safe_transfer(
    ctx: &Ctx,
    sender: Address,
    from: Address,
    to: Address,
    token_id: U256,
) -> Result<Receipt> {
    ctx.token()
        .safe_transfer_from(sender, from, to, token_id, ctx.payload())
        .await
}

/// Asserts a safe transfer of the creator's token to `to` is rejected.
async fn ensure_rejected(
    ctx: &Ctx,
    sender: Address,
    to: Address,
) -> eyre::Result<()> {
    let creator = ctx.accounts().creator;
    expect_revert(safe_transfer(ctx, sender, creator, to, ctx.token_id()))
        .await?;
    ctx.ensure_owner(ctx.token_id(), creator).await
}

async fn emits_one_transfer_event(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();

    let receipt = safe_transfer(
        ctx,
        accounts.creator,
        accounts.creator,
        accounts.user1,
        ctx.token_id(),
    )
    .await?;

    ensure_single_event(
        &receipt.events::<Transfer>(ctx.token().address()),
        &Transfer {
            from: accounts.creator,
            to: accounts.user1,
            tokenId: ctx.token_id(),
        },
    )
}

async fn transfer_to_zero_address_fails(ctx: &Ctx) -> eyre::Result<()> {
    ensure_rejected(ctx, ctx.accounts().creator, Address::ZERO).await
}

async fn changes_owner(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    safe_transfer(
        ctx,
        accounts.creator,
        accounts.creator,
        accounts.user1,
        ctx.token_id(),
    )
    .await?;
    ctx.ensure_owner(ctx.token_id(), accounts.user1).await
}

async fn unauthorized_transfer_fails(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    ensure_rejected(ctx, accounts.user1, accounts.user1).await
}

async fn rejecting_receiver_fails(ctx: &Ctx) -> eyre::Result<()> {
    let receiver = ctx.receiver(ReceiverKind::Rejecting).await?;
    ensure_rejected(ctx, ctx.accounts().creator, receiver).await
}

async fn wrong_selector_receiver_fails(ctx: &Ctx) -> eyre::Result<()> {
    let receiver = ctx.receiver(ReceiverKind::WrongSelector).await?;
    ensure_rejected(ctx, ctx.accounts().creator, receiver).await
}

async fn non_receiver_contract_fails(ctx: &Ctx) -> eyre::Result<()> {
    let receiver = ctx.receiver(ReceiverKind::NonReceiver).await?;
    ensure_rejected(ctx, ctx.accounts().creator, receiver).await
}

async fn accepting_receiver_succeeds(ctx: &Ctx) -> eyre::Result<()> {
    let creator = ctx.accounts().creator;
    let receiver = ctx.receiver(ReceiverKind::Accepting).await?;

    safe_transfer(ctx, creator, creator, receiver, ctx.token_id()).await?;

    ctx.ensure_owner(ctx.token_id(), receiver).await
}

async fn resets_approval_without_event(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.approve(accounts.creator, accounts.user2, ctx.token_id()).await?;

    let receipt = safe_transfer(
        ctx,
        accounts.creator,
        accounts.creator,
        accounts.user1,
        ctx.token_id(),
    )
    .await?;

    let events = receipt.events::<Approval>(token.address());
    ensure!(events.is_empty(), "expected no Approval event, got {events:?}");
    let approved = token.get_approved(ctx.token_id()).await?;
    ensure!(
        approved.is_zero(),
        "expected the transfer to reset the approval, got {approved}"
    );
    Ok(())
}

async fn approved_party_can_transfer(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    ctx.token()
        .approve(accounts.creator, accounts.user1, ctx.token_id())
        .await?;

    safe_transfer(
        ctx,
        accounts.user1,
        accounts.creator,
        accounts.user2,
        ctx.token_id(),
    )
    .await?;

    ctx.ensure_owner(ctx.token_id(), accounts.user2).await
}

async fn operator_can_transfer(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    ctx.token()
        .set_approval_for_all(accounts.creator, accounts.user1, true)
        .await?;

    safe_transfer(
        ctx,
        accounts.user1,
        accounts.creator,
        accounts.user2,
        ctx.token_id(),
    )
    .await?;

    ctx.ensure_owner(ctx.token_id(), accounts.user2).await
}
