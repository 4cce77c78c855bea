//! ERC-165 interface discovery.
use erc721_reference::{
    token::erc721::{self, extensions::metadata},
    utils::introspection::erc165,
};
use eyre::ensure;

use super::{case, Case, Ctx};

/// An id no ERC-721 token has a reason to claim.
const RANDOM_INTERFACE_ID: u32 = 0x8888_8888;

pub(super) fn cases() -> Vec<Case> {
    vec![
        case!(claims_erc165),
        case!(claims_erc721),
        case!(claims_erc721_metadata),
        case!(does_not_claim_random_interface),
        case!(does_not_claim_invalid_interface),
    ]
}

async fn ensure_claim(
    ctx: &Ctx,
    interface_id: u32,
    expected: bool,
) -> eyre::Result<()> {
    let supported = ctx.token().supports_interface(interface_id).await?;
    ensure!(
        supported == expected,
        "expected supportsInterface({interface_id:#010x}) to be {expected}, \
         got {supported}"
    );
    Ok(())
}

async fn claims_erc165(ctx: &Ctx) -> eyre::Result<()> {
    ensure_claim(ctx, erc165::INTERFACE_ID, true).await
}

async fn claims_erc721(ctx: &Ctx) -> eyre::Result<()> {
    ensure_claim(ctx, erc721::INTERFACE_ID, true).await
}

async fn claims_erc721_metadata(ctx: &Ctx) -> eyre::Result<()> {
    ensure_claim(ctx, metadata::INTERFACE_ID, true).await
}

async fn does_not_claim_random_interface(ctx: &Ctx) -> eyre::Result<()> {
    ensure_claim(ctx, RANDOM_INTERFACE_ID, false).await
}

async fn does_not_claim_invalid_interface(ctx: &Ctx) -> eyre::Result<()> {
    ensure_claim(ctx, erc165::INVALID_INTERFACE_ID, false).await
}
