//! Operator approvals through `setApprovalForAll` and `isApprovedForAll`.
use erc721_reference::token::erc721::{Approval, ApprovalForAll};
use eyre::ensure;

use super::{case, ensure_single_event, Case, Ctx};
use crate::{expect_revert, ReceiptExt};

pub(super) fn cases() -> Vec<Case> {
    vec![
        case!(emits_approval_for_all_event),
        case!(updates_approval_status),
        case!(unsetting_updates_approval_status),
        case!(unsetting_emits_approval_for_all_event),
        case!(redundant_set_emits_approval_for_all_event),
        case!(operator_can_transfer),
        case!(transfer_keeps_operator_approval),
        case!(operator_has_no_rights_over_transferred_token),
        case!(operator_set_before_token_arrives_can_transfer),
        case!(operator_can_approve_single_token),
    ]
}

async fn emits_approval_for_all_event(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();

    let receipt = token
        .set_approval_for_all(accounts.creator, accounts.user1, true)
        .await?;

    ensure_single_event(
        &receipt.events::<ApprovalForAll>(token.address()),
        &ApprovalForAll {
            owner: accounts.creator,
            operator: accounts.user1,
            approved: true,
        },
    )?;
    let approved =
        token.is_approved_for_all(accounts.creator, accounts.user1).await?;
    ensure!(approved, "expected {} to stay an operator", accounts.user1);
    Ok(())
}

async fn updates_approval_status(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();

    token.set_approval_for_all(accounts.creator, accounts.user1, true).await?;

    let approved =
        token.is_approved_for_all(accounts.creator, accounts.user1).await?;
    ensure!(approved, "expected {} to be an operator", accounts.user1);
    Ok(())
}

async fn unsetting_updates_approval_status(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.set_approval_for_all(accounts.creator, accounts.user1, true).await?;

    token.set_approval_for_all(accounts.creator, accounts.user1, false).await?;

    let approved =
        token.is_approved_for_all(accounts.creator, accounts.user1).await?;
    ensure!(
        !approved,
        "expected {} to no longer be an operator",
        accounts.user1
    );
    Ok(())
}

async fn unsetting_emits_approval_for_all_event(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.set_approval_for_all(accounts.creator, accounts.user1, true).await?;

    let receipt =
        token
            .set_approval_for_all(accounts.creator, accounts.user1, false)
            .await?;

    ensure_single_event(
        &receipt.events::<ApprovalForAll>(token.address()),
        &ApprovalForAll {
            owner: accounts.creator,
            operator: accounts.user1,
            approved: false,
        },
    )
}

async fn redundant_set_emits_approval_for_all_event(
    ctx: &Ctx,
) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.set_approval_for_all(accounts.creator, accounts.user1, true).await?;

    let receipt = token
        .set_approval_for_all(accounts.creator, accounts.user1, true)
        .await?;

    ensure_single_event(
        &receipt.events::<ApprovalForAll>(token.address()),
        &ApprovalForAll {
            owner: accounts.creator,
            operator: accounts.user1,
            approved: true,
        },
    )?;
    let approved =
        token.is_approved_for_all(accounts.creator, accounts.user1).await?;
    ensure!(approved, "expected {} to stay an operator", accounts.user1);
    Ok(())
}

async fn operator_can_transfer(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.set_approval_for_all(accounts.creator, accounts.user1, true).await?;

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

async fn transfer_keeps_operator_approval(ctx: &Ctx) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.set_approval_for_all(accounts.creator, accounts.user2, true).await?;

    token
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    let approved =
        token.is_approved_for_all(accounts.creator, accounts.user2).await?;
    ensure!(
        approved,
        "expected the transfer to keep {} as operator",
        accounts.user2
    );
    Ok(())
}

async fn operator_has_no_rights_over_transferred_token(
    ctx: &Ctx,
) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.set_approval_for_all(accounts.creator, accounts.user2, true).await?;
    token
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    expect_revert(token.transfer_from(
        accounts.user2,
        accounts.user1,
        accounts.user2,
        ctx.token_id(),
    ))
    .await?;
    ctx.ensure_owner(ctx.token_id(), accounts.user1).await
}

async fn operator_set_before_token_arrives_can_transfer(
    ctx: &Ctx,
) -> eyre::Result<()> {
    let accounts = ctx.accounts();
    let token = ctx.token();
    token.set_approval_for_all(accounts.user1, accounts.user2, true).await?;
    token
        .transfer_from(
            accounts.creator,
            accounts.creator,
            accounts.user1,
            ctx.token_id(),
        )
        .await?;

    token
        .transfer_from(
            accounts.user2,
            accounts.user1,
            accounts.user2,
            ctx.token_id(),
        )
        .await?;

    ctx.ensure_owner(ctx.token_id(), accounts.user2).await
}

async fn operator_can_approve_single_token(ctx: &Ctx) -> eyre::Result<()> {
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
