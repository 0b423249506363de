//! Protocol constants and compiled-in checkpoint tables.

use serde::{Deserialize, Serialize};

/// Network type: Mainnet or Testnet.
///
/// Chosen once at startup. Selects the checkpoint table and whether
/// checkpoints are enforced at all.
///
/// # Examples
///
/// ```
/// use cali_core::constants::NetworkType;
/// let net = NetworkType::default();
/// assert_eq!(net, NetworkType::Mainnet);
/// assert_eq!(net.data_dir_suffix(), "mainnet");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Production network.
    #[default]
    Mainnet,
    /// Public test network. Its checkpoints are informational only.
    Testnet,
}

impl NetworkType {
    /// Subdirectory name appended to the base data directory path.
    ///
    /// # Examples
    ///
    /// ```
    /// use cali_core::constants::NetworkType;
    /// assert_eq!(NetworkType::Testnet.data_dir_suffix(), "testnet");
    /// ```
    pub fn data_dir_suffix(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

pub const SECONDS_PER_DAY: u64 = 86_400;

/// How many times slower a transaction after the last checkpoint is to verify
/// than one before it.
///
/// Reindexing from a fast disk on a slow CPU can push the real ratio towards
/// 20; downloading over a slow network on a fast multicore CPU keeps it close
/// to 1.
pub const SIGCHECK_VERIFICATION_FACTOR: f64 = 5.0;

/// Hard-coded mainnet checkpoints: (height, block_hash) pairs.
///
/// A good checkpoint block is surrounded by blocks with sane timestamps (none
/// before it dated after it, none after it dated before it) and contains no
/// unusual transactions.
pub const MAINNET_CHECKPOINTS: &[(u64, &str)] = &[
    (0, "0x1017569372a0f2c626d602566608fd7e29693c028cb38b3d3ea9bf1a0b93ee1e"),
    (1, "0xe31fafaa991b243f2d1144332ee6198f017a1c72c7688aba7239115a35949816"),
    (2, "0x23ec6be809e7546cb06ce5e328c2ea23163dfec175623109feccc6feab3c63dc"),
    (3, "0x334e3cd1c3e99756bf3b7d9fb611a4f2e26b8c733bb78cf1e225157caa917bc5"),
    (4, "0xb207a2955cd3c83da66cd77760cc5ffc6e026cc0944fe917255b5066e24b2683"),
    (5, "0xa80ad2238de3123fc8237ba3c261b4ed9306d64a051bc1cc90592e31a21df8ae"),
    (6, "0x05ad5fbc50b5ee67dba88027109a1d4237fe8b89bcf10ee82e042459215c20bd"),
    (7, "0x93b5921bdc6899d0c7229bddbee19ca668fc5dffceae9819492580d8654aa13a"),
    (8, "0xce79d261dc9c4f75adc054ef79cbee57a7e2b2b517ce5ec86f2fac7db5fa09dc"),
    (9, "0x09d8f0f8a1e8d98b362efb0dd6268c5a6e515ed14f4b759335846f0e5fd2ad13"),
    (10, "0xa0224a8185f59d6ab6f14c265001170912b3b26fae7c5b9f185eb3d1b06daf7b"),
    (1005, "0x4fc946cd633740ff4bc7b624f65a9ab1d54a50ed1d85b6efff03ca1fe55da345"),
    (1049, "0x43aa25dd33660710dcd39db4b023d1a378969d59435d2cd08bf88b6ef0d260c8"),
    (1336, "0xd8422e5eaedb9996a4736286d64dae2ae2a3652f0d20749c23502e55eb41ad5a"),
    (1389, "0x468ea4dca9114b97ed4c02258f876595ef8c6548070259d68e323603ffdea687"),
    (1627, "0x27ce433f6192471794dbe54d298ab59aaf55cdde4951f2fcdc7c65930c330fb9"),
    (1973, "0x41158f014b17cfd7128eb8b3f5f5e171d38ef9e9a4aaa286733070f22e1f6559"),
    (2025, "0x9f77de3fddd54ede574c08a48f0ab9926a987eebdd975514a086ad0cb48b63a8"),
    (27496, "0xa71f067f976511ecc2ba4696c32c87c2392582717676429de5ccd261508e404c"),
];

/// Unix timestamp of the last mainnet checkpoint block.
pub const MAINNET_LAST_CHECKPOINT_TIME: u64 = 1_402_128_269;
/// Transactions between genesis and the last mainnet checkpoint, inclusive.
pub const MAINNET_LAST_CHECKPOINT_TX_COUNT: u64 = 32_257;
/// Estimated mainnet transactions per day after the last checkpoint.
pub const MAINNET_TX_PER_DAY: f64 = 8000.0;

/// Hard-coded testnet checkpoints. Never enforced.
pub const TESTNET_CHECKPOINTS: &[(u64, &str)] = &[
    (546, "000000002a936ca763904c3c35fce2f3556c559c0214345d31b1bcebf76acb70"),
    (35000, "2af959ab4f12111ce947479bfcef16702485f04afd95210aa90fde7d1e4a64ad"),
];

pub const TESTNET_LAST_CHECKPOINT_TIME: u64 = 1_369_685_559;
pub const TESTNET_LAST_CHECKPOINT_TX_COUNT: u64 = 37_581;
pub const TESTNET_TX_PER_DAY: f64 = 300.0;
