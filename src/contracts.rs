//! Cross-chain sync oracle ABI
//!
//! Uses alloy's sol! macro to generate a typed binding for the destination
//! chain's `CrossChainSync` contract, so checkpoint fields are decoded once at
//! the client boundary.

use alloy::sol;

sol! {
    /// Destination-chain record of synced source-chain blocks
    #[sol(rpc)]
    contract CrossChainSync {
        /// A synced source-chain block
        struct Snippet {
            uint64 remoteBlockId;
            bytes32 blockHash;
            bytes32 signalRoot;
        }

        /// Get the synced snippet for a block ID (0 returns the latest)
        function getSyncedSnippet(uint64 blockId) external view returns (Snippet memory snippet);
    }
}
