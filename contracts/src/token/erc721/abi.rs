//! Consolidated Solidity interfaces for ERC-721 tokens.
//!
//! These are ABI interfaces defined with [`alloy_sol_types::sol`]. They are
//! used on both sides of the ABI boundary: contracts decode incoming calldata
//! with the generated `*Calls` enums, and clients encode calls and decode
//! return values and logs with the generated call and event types.

pub use interfaces::*;

mod interfaces {
    #![allow(missing_docs)]
    #![allow(clippy::pub_underscore_fields)]

    use alloy_sol_types::sol;

    sol! {
        /// ERC-721 standard interface.
        interface IErc721 {
            /// Emitted when `tokenId` token is transferred from `from` to
            /// `to`.
            #[derive(Debug, PartialEq, Eq)]
            event Transfer(
                address indexed from,
                address indexed to,
                uint256 indexed tokenId
            );

            /// Emitted when `owner` enables `approved` to manage the
            /// `tokenId` token.
            #[derive(Debug, PartialEq, Eq)]
            event Approval(
                address indexed owner,
                address indexed approved,
                uint256 indexed tokenId
            );

            /// Emitted when `owner` enables or disables `operator` to manage
            /// all of its assets.
            #[derive(Debug, PartialEq, Eq)]
            event ApprovalForAll(
                address indexed owner,
                address indexed operator,
                bool approved
            );

            function balanceOf(address owner) external view returns (uint256 balance);
            function ownerOf(uint256 tokenId) external view returns (address owner);
            function safeTransferFrom(address from, address to, uint256 tokenId) external;
            function safeTransferFrom(address from, address to, uint256 tokenId, bytes calldata data) external;
            function transferFrom(address from, address to, uint256 tokenId) external;
            function approve(address to, uint256 tokenId) external;
            function setApprovalForAll(address operator, bool approved) external;
            function getApproved(uint256 tokenId) external view returns (address operator);
            function isApprovedForAll(address owner, address operator) external view returns (bool approved);
        }
    }

    sol! {
        /// ERC-721 optional metadata extension.
        interface IErc721Metadata {
            function name() external view returns (string name);
            function symbol() external view returns (string symbol);
            function tokenURI(uint256 tokenId) external view returns (string uri);
        }
    }

    sol! {
        /// ERC-165 standard interface detection.
        interface IErc165 {
            function supportsInterface(bytes4 interfaceId) external view returns (bool supported);
        }
    }

    sol! {
        /// ERC-721 token receiver interface.
        interface IErc721Receiver {
            function onERC721Received(
                address operator,
                address from,
                uint256 tokenId,
                bytes calldata data
            ) external returns (bytes4 selector);
        }
    }

    sol! {
        /// Non-standard supply hooks of the reference token.
        interface IErc721Supply {
            function mint(address to, uint256 tokenId) external;
            function burn(uint256 tokenId) external;
        }
    }
}
