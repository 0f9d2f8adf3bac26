use solana_program::native_token::LAMPORTS_PER_SOL;

/// Byte patterns the well-known test identities are built from
pub const FACTORY_SEED: u8 = 0xfa;
pub const OWNER_SEED: u8 = 0x01;
pub const FEE_RECIPIENT_SEED: u8 = 0x02;

/// Lamports airdropped to every test user
pub const USER_AIRDROP: u64 = 10 * LAMPORTS_PER_SOL;
