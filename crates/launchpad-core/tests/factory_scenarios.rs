//! End-to-end factory behaviour against the in-memory ledger.

use launchpad_core::{
    config_hash, ErrorCategory, FactoryError, FactoryEvent, FeatureFlags, TemplateKind,
    TokenConfig, ValidationError, BASIC_TEMPLATE, DEFAULT_SERVICE_FEE, FULL_FEATURED_TEMPLATE,
    MAX_SERVICE_FEE, MINTABLE_TEMPLATE,
};
use launchpad_test_utils::{basic_config, full_config, key, mintable_config, TestApp, USER_AIRDROP};
use solana_program::pubkey::Pubkey;

// ============================================================================
// Instantiation
// ============================================================================

#[test]
fn test_basic_token_scenario() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    let config = basic_config("Basic Token", "BASIC", creator);

    let instance = app
        .factory
        .create_token(creator, &config, DEFAULT_SERVICE_FEE)
        .unwrap();

    assert_ne!(instance, Pubkey::default());
    assert_eq!(app.factory.total_tokens_created(), 1);
    assert_eq!(app.factory.tokens_created_by(&creator), 1);
    assert_eq!(app.factory.tokens_by_creator(&creator), vec![instance]);
    assert!(app.factory.is_token_deployed("BASIC"));
    assert_eq!(app.factory.total_fees_collected(), DEFAULT_SERVICE_FEE);
    assert_eq!(app.factory.balance(), DEFAULT_SERVICE_FEE);
    assert_eq!(app.factory.nonce(), 1);

    let token = app.factory.instance(&instance).unwrap();
    assert_eq!(token.kind(), TemplateKind::Basic);
    assert_eq!(token.owner(), creator);
    assert_eq!(token.balance_of(&creator), 1_000_000);
    assert!(!token.is_mintable());

    // Same caller resubmits the identical config
    let result = app.factory.create_token(creator, &config, DEFAULT_SERVICE_FEE);
    assert_eq!(result, Err(FactoryError::SymbolAlreadyExists("BASIC".into())));
    assert_eq!(app.factory.total_tokens_created(), 1);
    assert_eq!(app.factory.nonce(), 1);
}

#[test]
fn test_symbol_conflict_from_other_creator() {
    let mut app = TestApp::new();
    let alice = app.funded_user(10);
    let bob = app.funded_user(11);

    app.create_token(alice, &basic_config("Alice", "SHARED", alice))
        .unwrap();
    let before = app.state();

    let result = app.create_token(bob, &basic_config("Bob", "SHARED", bob));
    assert_eq!(result, Err(FactoryError::SymbolAlreadyExists("SHARED".into())));
    assert_eq!(app.state(), before);
    assert_eq!(app.factory.tokens_created_by(&bob), 0);
}

#[test]
fn test_predicted_address_matches_deployment() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    let config = full_config("Full Token", "FULL", creator);

    let predicted = app.factory.predict_instance_address(&creator, &config).unwrap();
    let deployed = app.create_token(creator, &config).unwrap();
    assert_eq!(predicted, deployed);

    let token = app.factory.instance(&deployed).unwrap();
    assert_eq!(token.kind(), TemplateKind::FullFeatured);
    assert!(token.is_mintable() && token.is_burnable() && token.is_pausable());
    assert!(token.is_capped());
    assert_eq!(token.max_supply(), 2_000_000);
}

#[test]
fn test_nonce_moves_predicted_address() {
    let mut app = TestApp::new();
    let alice = app.funded_user(10);
    let bob = app.funded_user(11);

    let config = basic_config("Retry", "RETRY", alice);
    let first_prediction = app.factory.predict_instance_address(&alice, &config).unwrap();

    // Unrelated deployment advances the nonce
    app.create_token(bob, &basic_config("Other", "OTHER", bob)).unwrap();

    let second_prediction = app.factory.predict_instance_address(&alice, &config).unwrap();
    assert_ne!(first_prediction, second_prediction);
    assert_eq!(app.create_token(alice, &config).unwrap(), second_prediction);
}

#[test]
fn test_mintable_template_selected() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);

    let instance = app
        .create_token(creator, &mintable_config("Mint", "MINT", creator).capped(5_000_000))
        .unwrap();
    let token = app.factory.instance(&instance).unwrap();
    assert_eq!(token.kind(), TemplateKind::Mintable);
    assert!(token.is_mintable());
    assert!(token.is_capped());
}

#[test]
fn test_unsupported_feature_unwinds_everything() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    let before_state = app.state();
    let before_ledger = app.ledger();

    // burnable + pausable without mintable resolves to the basic template
    let config = basic_config("Burn", "BURN", creator).with_features(FeatureFlags {
        burnable: true,
        pausable: true,
        ..FeatureFlags::NONE
    });
    let result = app.create_token(creator, &config);

    assert_eq!(
        result,
        Err(FactoryError::UnsupportedFeature {
            template: "basic",
            feature: "burnable"
        })
    );
    assert_eq!(
        result.unwrap_err().category(),
        ErrorCategory::UnsupportedFeature
    );
    assert_eq!(app.state(), before_state);
    assert_eq!(app.ledger(), before_ledger);
    assert!(!app.factory.is_token_deployed("BURN"));
}

#[test]
fn test_insufficient_fee_changes_nothing() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    let before_state = app.state();
    let before_ledger = app.ledger();

    let result = app.factory.create_token(
        creator,
        &basic_config("Cheap", "CHEAP", creator),
        DEFAULT_SERVICE_FEE - 1,
    );

    assert_eq!(
        result,
        Err(FactoryError::InsufficientFee {
            paid: DEFAULT_SERVICE_FEE - 1,
            required: DEFAULT_SERVICE_FEE
        })
    );
    assert_eq!(app.state(), before_state);
    assert_eq!(app.ledger(), before_ledger);
}

#[test]
fn test_unfunded_caller_reverts() {
    let mut app = TestApp::new();
    let broke = key(42);
    let before_state = app.state();

    let result = app.create_token(broke, &basic_config("Broke", "BROKE", broke));
    assert_eq!(
        result,
        Err(FactoryError::InsufficientFunds {
            balance: 0,
            needed: DEFAULT_SERVICE_FEE
        })
    );
    assert_eq!(app.state(), before_state);

    let address = app
        .factory
        .predict_instance_address(&broke, &basic_config("Broke", "BROKE", broke))
        .unwrap();
    assert!(app.factory.instance(&address).is_none());
}

#[test]
fn test_invalid_config_reported() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    let mut config = basic_config("Bad", "BAD", creator);
    config.decimals = 19;

    let result = app.create_token(creator, &config);
    assert_eq!(
        result,
        Err(FactoryError::InvalidConfig(ValidationError::DecimalsTooLarge))
    );
    assert_eq!(app.factory.nonce(), 0);
}

#[test]
fn test_overpayment_is_retained() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    let paid = DEFAULT_SERVICE_FEE * 3;

    app.factory
        .create_token(creator, &basic_config("Tip", "TIP", creator), paid)
        .unwrap();

    assert_eq!(app.factory.total_fees_collected(), paid);
    assert_eq!(app.factory.balance(), paid);
    assert_eq!(app.factory.ledger().account(&creator).unwrap().lamports, USER_AIRDROP - paid);
}

#[test]
fn test_missing_template() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    app.factory.remove_template(app.owner, MINTABLE_TEMPLATE).unwrap();

    let result = app.create_token(creator, &mintable_config("Mint", "MINT", creator));
    assert_eq!(
        result,
        Err(FactoryError::TemplateNotFound("MINTABLE_TEMPLATE".into()))
    );
    assert_eq!(app.factory.nonce(), 0);
}

#[test]
fn test_existing_instance_at_computed_address() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    let config = basic_config("Squat", "SQUAT", creator);

    let address = app.factory.predict_instance_address(&creator, &config).unwrap();
    app.factory
        .ledger_mut()
        .deploy_template_at(address, TemplateKind::Basic);
    let before_state = app.state();

    let result = app.create_token(creator, &config);
    assert_eq!(
        result,
        Err(FactoryError::InstanceAlreadyExists(address.to_string()))
    );
    assert_eq!(app.state(), before_state);
    assert_eq!(app.factory.total_tokens_created(), 0);
}

#[test]
fn test_token_created_event() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    let config = basic_config("Event", "EVT", creator);
    app.factory.ledger_mut().clear_events();

    let instance = app.create_token(creator, &config).unwrap();

    assert_eq!(
        app.factory.events(),
        &[FactoryEvent::TokenCreated {
            instance,
            creator,
            name: "Event".into(),
            symbol: "EVT".into(),
            total_supply: 1_000_000,
            decimals: 18,
            config_hash: config_hash(&config),
        }]
    );
}

// ============================================================================
// Pause
// ============================================================================

#[test]
fn test_setup_events() {
    let app = TestApp::new();
    let events = app.factory.events();

    assert_eq!(events.len(), 4);
    assert_eq!(
        events[0],
        FactoryEvent::FactoryInitialized {
            owner: app.owner,
            fee_recipient: app.fee_recipient,
            service_fee: DEFAULT_SERVICE_FEE
        }
    );
    assert_eq!(
        &events[1..],
        &[
            FactoryEvent::TemplateAdded {
                id: BASIC_TEMPLATE,
                implementation: app.basic
            },
            FactoryEvent::TemplateAdded {
                id: MINTABLE_TEMPLATE,
                implementation: app.mintable
            },
            FactoryEvent::TemplateAdded {
                id: FULL_FEATURED_TEMPLATE,
                implementation: app.full_featured
            },
        ]
    );
}

#[test]
fn test_pause_blocks_deployment_only() {
    let mut app = TestApp::new();
    let creator = app.funded_user(10);
    let owner = app.owner;

    app.factory.pause(owner).unwrap();
    assert!(app.factory.is_paused());
    assert_eq!(
        app.factory.events().last(),
        Some(&FactoryEvent::Paused { by: owner })
    );
    assert_eq!(
        app.create_token(creator, &basic_config("P", "P", creator)),
        Err(FactoryError::Paused)
    );

    // Administration still works while paused
    app.factory.set_service_fee(owner, 5_000).unwrap();
    assert_eq!(app.factory.service_fee(), 5_000);
    assert_eq!(app.factory.get_all_templates().len(), 3);
    assert_eq!(app.factory.pause(owner), Err(FactoryError::Paused));

    app.factory.unpause(owner).unwrap();
    assert_eq!(
        app.factory.events().last(),
        Some(&FactoryEvent::Unpaused { by: owner })
    );
    assert_eq!(app.factory.unpause(owner), Err(FactoryError::NotPaused));
    assert!(app.create_token(creator, &basic_config("P", "P", creator)).is_ok());
}

// ============================================================================
// Template Registry
// ============================================================================

#[test]
fn test_remove_and_readd_template() {
    let mut app = TestApp::new();
    let owner = app.owner;
    let before = app.factory.get_all_templates().len();

    app.factory.remove_template(owner, BASIC_TEMPLATE).unwrap();
    assert_eq!(
        app.factory.events().last(),
        Some(&FactoryEvent::TemplateRemoved { id: BASIC_TEMPLATE })
    );
    assert_eq!(app.factory.get_template(&BASIC_TEMPLATE), None);
    assert_eq!(app.factory.get_all_templates().len(), before - 1);

    let replacement = app
        .factory
        .ledger_mut()
        .deploy_template(TemplateKind::FullFeatured);
    app.factory
        .add_template(owner, BASIC_TEMPLATE, replacement)
        .unwrap();
    assert_eq!(
        app.factory.events().last(),
        Some(&FactoryEvent::TemplateAdded {
            id: BASIC_TEMPLATE,
            implementation: replacement
        })
    );

    assert_eq!(app.factory.get_template(&BASIC_TEMPLATE), Some(replacement));
    assert_eq!(app.factory.get_all_templates().len(), before);

    // Deployments now run the replacement implementation
    let creator = app.funded_user(10);
    let instance = app
        .create_token(creator, &basic_config("New", "NEW", creator))
        .unwrap();
    assert_eq!(
        app.factory.instance(&instance).unwrap().kind(),
        TemplateKind::FullFeatured
    );
}

#[test]
fn test_add_template_updates_in_place() {
    let mut app = TestApp::new();
    let owner = app.owner;
    let replacement = app.factory.ledger_mut().deploy_template(TemplateKind::Basic);

    app.factory
        .add_template(owner, FULL_FEATURED_TEMPLATE, replacement)
        .unwrap();
    assert_eq!(app.factory.get_all_templates().len(), 3);
    assert_eq!(app.factory.get_template(&FULL_FEATURED_TEMPLATE), Some(replacement));
}

#[test]
fn test_add_template_rejections() {
    let mut app = TestApp::new();
    let owner = app.owner;

    assert_eq!(
        app.factory.add_template(owner, BASIC_TEMPLATE, Pubkey::default()),
        Err(FactoryError::InvalidImplementation)
    );
    assert_eq!(
        app.factory.add_template(owner, BASIC_TEMPLATE, key(77)),
        Err(FactoryError::ImplementationHasNoCode(key(77).to_string()))
    );
    assert_eq!(
        app.factory.add_template(key(9), BASIC_TEMPLATE, app.mintable),
        Err(FactoryError::Unauthorized)
    );
    assert_eq!(
        app.factory.remove_template(owner, "UNKNOWN".parse().unwrap()),
        Err(FactoryError::TemplateNotFound("UNKNOWN".into()))
    );
    assert_eq!(app.factory.get_template(&BASIC_TEMPLATE), Some(app.basic));
}

// ============================================================================
// Fees
// ============================================================================

#[test]
fn test_non_owner_cannot_set_fee() {
    let mut app = TestApp::new();
    let result = app.factory.set_service_fee(key(9), 1);
    assert_eq!(result, Err(FactoryError::Unauthorized));
    assert_eq!(result.unwrap_err().category(), ErrorCategory::Authorization);
    assert_eq!(app.factory.service_fee(), DEFAULT_SERVICE_FEE);
}

#[test]
fn test_fee_ceiling_and_recipient() {
    let mut app = TestApp::new();
    let owner = app.owner;

    assert_eq!(
        app.factory.set_service_fee(owner, MAX_SERVICE_FEE + 1),
        Err(FactoryError::FeeTooHigh {
            fee: MAX_SERVICE_FEE + 1,
            max: MAX_SERVICE_FEE
        })
    );
    app.factory.set_service_fee(owner, MAX_SERVICE_FEE).unwrap();

    assert_eq!(
        app.factory.set_fee_recipient(owner, Pubkey::default()),
        Err(FactoryError::InvalidFeeRecipient)
    );
    app.factory.set_fee_recipient(owner, key(50)).unwrap();
    assert_eq!(app.factory.fee_recipient(), key(50));

    let events = app.factory.events();
    assert!(events.contains(&FactoryEvent::ServiceFeeUpdated {
        old_fee: DEFAULT_SERVICE_FEE,
        new_fee: MAX_SERVICE_FEE
    }));
    assert!(events.contains(&FactoryEvent::FeeRecipientUpdated {
        old_recipient: app.fee_recipient,
        new_recipient: key(50)
    }));
}

#[test]
fn test_free_deployments() {
    let mut app = TestApp::with_fee(0);
    let creator = key(33);

    app.factory
        .create_token(creator, &basic_config("Free", "FREE", creator), 0)
        .unwrap();
    assert_eq!(app.factory.total_fees_collected(), 0);
}

#[test]
fn test_withdraw() {
    let mut app = TestApp::new();
    let owner = app.owner;
    let recipient = app.fee_recipient;

    // Empty balance is a no-op
    assert_eq!(app.factory.withdraw(owner), Ok(0));

    let creator = app.funded_user(10);
    app.create_token(creator, &basic_config("A", "A", creator)).unwrap();
    app.create_token(creator, &basic_config("B", "B", creator)).unwrap();

    assert_eq!(app.factory.withdraw(key(9)), Err(FactoryError::Unauthorized));
    assert_eq!(app.factory.withdraw(owner), Ok(2 * DEFAULT_SERVICE_FEE));
    assert_eq!(app.factory.balance(), 0);
    assert_eq!(
        app.factory.ledger().account(&recipient).unwrap().lamports,
        2 * DEFAULT_SERVICE_FEE
    );
    // Lifetime total is unaffected by withdrawals
    assert_eq!(app.factory.total_fees_collected(), 2 * DEFAULT_SERVICE_FEE);
    assert_eq!(
        app.factory.events().last(),
        Some(&FactoryEvent::FeesWithdrawn {
            recipient,
            amount: 2 * DEFAULT_SERVICE_FEE
        })
    );
}

#[test]
fn test_vault_cannot_receive_fees() {
    let mut app = TestApp::new();
    let owner = app.owner;
    let vault = app.factory.address();
    let creator = app.funded_user(10);
    app.create_token(creator, &basic_config("A", "A", creator)).unwrap();

    assert_eq!(
        app.factory.set_fee_recipient(owner, vault),
        Err(FactoryError::InvalidFeeRecipient)
    );
    assert_eq!(app.factory.fee_recipient(), app.fee_recipient);

    assert_eq!(app.factory.withdraw(owner), Ok(DEFAULT_SERVICE_FEE));
    assert_eq!(app.factory.balance(), 0);
}

#[test]
fn test_withdraw_failure_surfaces() {
    let mut app = TestApp::new();
    let owner = app.owner;
    let recipient = app.fee_recipient;
    let creator = app.funded_user(10);
    app.create_token(creator, &basic_config("A", "A", creator)).unwrap();

    app.factory
        .ledger_mut()
        .set_rejects_deposits(&recipient, true);
    assert_eq!(
        app.factory.withdraw(owner),
        Err(FactoryError::WithdrawalFailed {
            recipient: recipient.to_string(),
            amount: DEFAULT_SERVICE_FEE
        })
    );
    assert_eq!(app.factory.balance(), DEFAULT_SERVICE_FEE);
}

#[test]
fn test_cost_estimate() {
    let app = TestApp::new();
    let estimate = app.factory.estimate_deployment_cost(&FeatureFlags::ALL);
    assert_eq!(estimate.compute_units, 340_000);
    assert_eq!(estimate.service_fee, DEFAULT_SERVICE_FEE);
}

// ============================================================================
// Ownership & Upgrades
// ============================================================================

#[test]
fn test_transfer_ownership() {
    let mut app = TestApp::new();
    let owner = app.owner;
    let new_owner = key(60);

    assert_eq!(
        app.factory.transfer_ownership(owner, Pubkey::default()),
        Err(FactoryError::InvalidOwner)
    );
    app.factory.transfer_ownership(owner, new_owner).unwrap();
    assert_eq!(app.factory.owner(), new_owner);
    assert_eq!(
        app.factory.events().last(),
        Some(&FactoryEvent::OwnershipTransferred {
            previous_owner: owner,
            new_owner
        })
    );

    assert_eq!(app.factory.pause(owner), Err(FactoryError::Unauthorized));
    app.factory.pause(new_owner).unwrap();
}

#[test]
fn test_upgrade_preserves_state() {
    let mut app = TestApp::new();
    let owner = app.owner;
    let creator = app.funded_user(10);
    app.create_token(creator, &basic_config("Keep", "KEEP", creator)).unwrap();

    let registry_before = app.factory.get_all_templates();
    let tokens_before = app.factory.total_tokens_created();
    let fees_before = app.factory.total_fees_collected();
    let nonce_before = app.factory.nonce();

    assert_eq!(
        app.factory.upgrade_to(key(9), key(70)),
        Err(FactoryError::Unauthorized)
    );
    assert_eq!(
        app.factory.upgrade_to(owner, Pubkey::default()),
        Err(FactoryError::InvalidImplementation)
    );

    assert_eq!(app.factory.upgrade_to(owner, key(70)), Ok(2));
    assert_eq!(
        app.factory.events().last(),
        Some(&FactoryEvent::Upgraded {
            logic: key(70),
            version: 2
        })
    );
    assert_eq!(app.factory.logic(), key(70));
    assert_eq!(app.factory.version(), 2);

    assert_eq!(app.factory.get_all_templates(), registry_before);
    assert_eq!(app.factory.total_tokens_created(), tokens_before);
    assert_eq!(app.factory.total_fees_collected(), fees_before);
    assert_eq!(app.factory.nonce(), nonce_before);
    assert!(app.factory.is_token_deployed("KEEP"));
}

#[test]
fn test_config_serde_shape() {
    let owner = key(5);
    let config: TokenConfig = basic_config("Json", "JSON", owner).capped(2_000_000);
    let value = serde_json_value(&config);
    assert_eq!(value["capped"], true);
    assert_eq!(value["initial_owner"], owner.to_string());
}

fn serde_json_value(config: &TokenConfig) -> serde_json::Value {
    serde_json::to_value(config).unwrap()
}
