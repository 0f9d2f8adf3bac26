pub mod constants;
pub mod helpers;

use launchpad_core::{
    FactoryResult, FactoryState, InMemoryLedger, TemplateKind, TokenConfig, TokenFactory,
    DEFAULT_SERVICE_FEE,
};
use solana_program::pubkey::Pubkey;

pub use constants::*;
pub use helpers::*;

/// Factory wired to an in-memory ledger with the three standard templates
/// registered under their conventional ids.
pub struct TestApp {
    pub factory: TokenFactory<InMemoryLedger>,
    pub owner: Pubkey,
    pub fee_recipient: Pubkey,
    pub basic: Pubkey,
    pub mintable: Pubkey,
    pub full_featured: Pubkey,
}

impl TestApp {
    /// Initialized factory charging the default service fee
    pub fn new() -> Self {
        Self::with_fee(DEFAULT_SERVICE_FEE)
    }

    pub fn with_fee(service_fee: u64) -> Self {
        let owner = key(OWNER_SEED);
        let fee_recipient = key(FEE_RECIPIENT_SEED);

        let mut factory = TokenFactory::new(key(FACTORY_SEED), InMemoryLedger::new());
        factory
            .initialize(owner, fee_recipient, service_fee)
            .expect("factory initialization");

        let mut app = Self {
            factory,
            owner,
            fee_recipient,
            basic: Pubkey::default(),
            mintable: Pubkey::default(),
            full_featured: Pubkey::default(),
        };
        app.basic = app.register(TemplateKind::Basic);
        app.mintable = app.register(TemplateKind::Mintable);
        app.full_featured = app.register(TemplateKind::FullFeatured);
        app
    }

    /// Deploy a template program and register it under its default id
    pub fn register(&mut self, kind: TemplateKind) -> Pubkey {
        let implementation = self.factory.ledger_mut().deploy_template(kind);
        self.factory
            .add_template(self.owner, kind.default_template_id(), implementation)
            .expect("template registration");
        implementation
    }

    /// Identity holding [`USER_AIRDROP`] lamports
    pub fn funded_user(&mut self, seed: u8) -> Pubkey {
        let user = key(seed);
        self.factory.ledger_mut().airdrop(&user, USER_AIRDROP);
        user
    }

    /// Deploy paying exactly the current service fee
    pub fn create_token(&mut self, creator: Pubkey, config: &TokenConfig) -> FactoryResult<Pubkey> {
        let fee = self.factory.service_fee();
        self.factory.create_token(creator, config, fee)
    }

    pub fn state(&self) -> FactoryState {
        self.factory.state().clone()
    }

    pub fn ledger(&self) -> InMemoryLedger {
        self.factory.ledger().clone()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
