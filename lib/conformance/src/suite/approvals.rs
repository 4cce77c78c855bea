//! Single-token approvals through `approve` and `getApproved`.
use alloy_primitives::Address;
use erc721_reference::token::erc721::Approval;
use eyre::ensure;

use super::{case, ensure_single_event, Case, Ctx};
use crate::{expect_revert, ReceiptExt};

pub(super) fn cases() -> Vec<Case> {
    vec![
        case!(emits_approval_event),
        case!(removing_approval_emits_approval_event),
        case!(updates_approved_address),
        case!(cannot_approve_unless_owner_or_operator),
        case!(approved_party_can_transfer),
        case!(transfer_resets_approval),
        case!(transfer_emits_no_approval_event),
        case!(approval_is_consumed_by_transfer),
        case!(operator_can_approve),
    ]
}

async fn emits_approval_event(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();

    let receipt =
        token.approve(accounts.creator, accounts.user1, ctx.token_id()).await?;

    ensure_single_event(
        &receipt.events::<Approval>(token.address()),
        &Approval {
            owner: accounts.creator,
            approved: accounts.user1,
            tokenId: ctx.token_id(),
        },
    )
}

async fn removing_approval_emits_approval_event(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.approve(accounts.creator, accounts.user1, ctx.token_id()).await?;

    let receipt =
        token.approve(accounts.creator, Address::ZERO, ctx.token_id()).await?;

    ensure_single_event(
        &receipt.events::<Approval>(token.address()),
        &Approval {
            owner: accounts.creator,
            approved: Address::ZERO,
            tokenId: ctx.token_id(),
        },
    )?;
    let approved = token.get_approved(ctx.token_id()).await?;
    ensure!(
        approved.is_zero(),
        "expected approval to be removed, got {approved}"
    );
    Ok(())
}

async fn updates_approved_address(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();

    token.approve(accounts.creator, accounts.user1, ctx.token_id()).await?;

    let approved = token.get_approved(ctx.token_id()).await?;
    ensure!(
        approved == accounts.user1,
        "expected {} to be approved, got {approved}",
        accounts.user1
    );
    Ok(())
}

async fn cannot_approve_unless_owner_or_operator(
    ctx: &Ctx,
) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    expect_revert(token.approve(
        accounts.creator,
        accounts.user1,
        ctx.token_id(),
    ))
    .await?;
    Ok(())
}

async fn approved_party_can_transfer(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.approve(accounts.creator, accounts.user1, ctx.token_id()).await?;

    token
        .transfer_from(
            accounts.user1,
            accounts.creator,
            accounts.user2,
            ctx.token_id(),
        )
        .await?;

    ctx.ensure_owner(ctx.token_id(), accounts.user2).await
}

async fn transfer_resets_approval(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.approve(accounts.creator, accounts.user2, ctx.token_id()).await?;

    token
        .transfer_from(
            accounts.user2,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    let approved = token.get_approved(ctx.token_id()).await?;
    ensure!(
        approved.is_zero(),
        "expected the transfer to reset the approval, got {approved}"
    );
    Ok(())
}

async fn transfer_emits_no_approval_event(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.approve(accounts.creator, accounts.user2, ctx.token_id()).await?;

    let receipt = token
        .transfer_from(
            accounts.user2,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    let events = receipt.events::<Approval>(token.address());
    ensure!(events.is_empty(), "expected no Approval event, got {events:?}");
    Ok(())
}

async fn approval_is_consumed_by_transfer(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.approve(accounts.creator, accounts.user2, ctx.token_id()).await?;
    token
        .transfer_from(
            accounts.user2,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    expect_revert(token.transfer_from(
        accounts.user2,
        accounts.user1,
        accounts.creator,
        ctx.token_id(),
    ))
    .await?;
    ctx.ensure_owner(ctx.token_id(), accounts.user1).await
}

async fn operator_can_approve(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.set_approval_for_all(accounts.creator, accounts.user1, true).await?;

    let receipt =
        token.approve(accounts.user1, accounts.user2, ctx.token_id()).await?;
    ensure_single_event(
        &receipt.events::<Approval>(token.address()),
        &Approval {
            owner: accounts.creator,
            approved: accounts.user2,
            tokenId: ctx.token_id(),
        },
    )?;

    token
        .transfer_from(
            accounts.user2,
            accounts.creator,
            accounts.user3,
            ctx.token_id(),
        )
        .await?;
    ctx.ensure_owner(ctx.token_id(), accounts.user3).await
}
