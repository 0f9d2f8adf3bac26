/// Property-based tests for configuration validation, address derivation
/// and deployment atomicity.

use launchpad_core::{
    compute_salt, derive_instance_address, estimate_compute_units, select_template,
    validate_config, FeatureFlags, TokenConfig, BASE_DEPLOYMENT_UNITS, BASIC_TEMPLATE,
    DEFAULT_SERVICE_FEE, FULL_FEATURED_TEMPLATE, MAX_DECIMALS, MAX_NAME_LENGTH,
    MAX_SYMBOL_LENGTH, MINTABLE_TEMPLATE,
};
use launchpad_test_utils::{key, TestApp};
use proptest::prelude::*;
use solana_program::pubkey::Pubkey;

// ============================================================================
// Test Strategies
// ============================================================================

fn names() -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[A-Za-z0-9 ]{{1,{}}}", MAX_NAME_LENGTH)).unwrap()
}

fn symbols() -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[A-Z0-9]{{1,{}}}", MAX_SYMBOL_LENGTH)).unwrap()
}

fn features() -> impl Strategy<Value = FeatureFlags> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(mintable, burnable, pausable, capped)| FeatureFlags {
            mintable,
            burnable,
            pausable,
            capped,
        },
    )
}

fn pubkeys() -> impl Strategy<Value = Pubkey> {
    any::<[u8; 32]>().prop_map(Pubkey::new_from_array)
}

/// Configurations that satisfy every validation rule
fn valid_configs() -> impl Strategy<Value = TokenConfig> {
    (
        names(),
        symbols(),
        1u64..=u64::MAX / 2,
        0u8..=MAX_DECIMALS,
        features(),
        0u64..=u64::MAX / 2,
        1u8..=255,
    )
        .prop_map(|(name, symbol, supply, decimals, features, headroom, owner)| {
            let config =
                TokenConfig::new(name, symbol, supply, decimals, key(owner)).with_features(features);
            if features.capped {
                config.capped(supply + headroom)
            } else {
                config
            }
        })
}

// ============================================================================
// Validation Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_valid_configs_pass(config in valid_configs()) {
        prop_assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn prop_oversized_decimals_fail(config in valid_configs(), decimals in (MAX_DECIMALS + 1)..=u8::MAX) {
        let mut config = config;
        config.decimals = decimals;
        prop_assert!(validate_config(&config).is_err());
    }

    #[test]
    fn prop_cap_below_supply_fails(config in valid_configs(), shortfall in 1u64..1000) {
        let mut config = config;
        config.total_supply = config.total_supply.max(shortfall + 1);
        let cap = config.total_supply - shortfall;
        config = config.capped(cap);
        prop_assert!(validate_config(&config).is_err());
    }
}

// ============================================================================
// Derivation Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_derivation_deterministic(
        implementation in pubkeys(),
        creator in pubkeys(),
        name in names(),
        symbol in symbols(),
        nonce in any::<u64>(),
    ) {
        let salt = compute_salt(&creator, &name, &symbol, nonce);
        prop_assert_eq!(salt, compute_salt(&creator, &name, &symbol, nonce));
        prop_assert_eq!(
            derive_instance_address(&implementation, &salt),
            derive_instance_address(&implementation, &salt)
        );
    }

    #[test]
    fn prop_nonce_separates_addresses(
        implementation in pubkeys(),
        creator in pubkeys(),
        name in names(),
        symbol in symbols(),
        nonce in 0u64..u64::MAX,
    ) {
        let first = derive_instance_address(
            &implementation,
            &compute_salt(&creator, &name, &symbol, nonce),
        );
        let second = derive_instance_address(
            &implementation,
            &compute_salt(&creator, &name, &symbol, nonce + 1),
        );
        prop_assert_ne!(first, second);
    }

    /// Length prefixes keep ("ab", "c") and ("a", "bc") apart
    #[test]
    fn prop_name_symbol_boundary_matters(creator in pubkeys(), split in 1usize..8) {
        let joined = "ABCDEFGHI";
        let (name, symbol) = joined.split_at(split);
        let (other_name, other_symbol) = joined.split_at(split + 1);
        prop_assert_ne!(
            compute_salt(&creator, name, symbol, 0),
            compute_salt(&creator, other_name, other_symbol, 0)
        );
    }

    #[test]
    fn prop_template_selection_table(features in features()) {
        let expected = if features.mintable && features.burnable && features.pausable {
            FULL_FEATURED_TEMPLATE
        } else if features.mintable && !features.burnable && !features.pausable {
            MINTABLE_TEMPLATE
        } else {
            BASIC_TEMPLATE
        };
        prop_assert_eq!(select_template(&features), expected);
    }

    #[test]
    fn prop_compute_units_bounded(features in features()) {
        let units = estimate_compute_units(&features);
        prop_assert!(units >= BASE_DEPLOYMENT_UNITS);
        prop_assert!(units <= estimate_compute_units(&FeatureFlags::ALL));
    }
}

// ============================================================================
// Deployment Atomicity
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// A deployment either fully lands or leaves no trace
    #[test]
    fn prop_failed_deploy_leaves_no_trace(
        config in valid_configs(),
        paid in 0u64..=(2 * DEFAULT_SERVICE_FEE),
    ) {
        let mut app = TestApp::new();
        let creator = app.funded_user(200);
        let state_before = app.state();
        let ledger_before = app.ledger();

        match app.factory.create_token(creator, &config, paid) {
            Ok(instance) => {
                prop_assert!(paid >= DEFAULT_SERVICE_FEE);
                prop_assert_eq!(app.factory.total_tokens_created(), 1);
                prop_assert_eq!(app.factory.nonce(), 1);
                prop_assert_eq!(app.factory.total_fees_collected(), paid);
                prop_assert!(app.factory.instance(&instance).is_some());
            }
            Err(_) => {
                prop_assert_eq!(app.state(), state_before);
                prop_assert_eq!(app.ledger(), ledger_before);
            }
        }
    }

    #[test]
    fn prop_symbols_never_reused(config in valid_configs()) {
        let mut app = TestApp::new();
        let first = app.funded_user(200);
        let second = app.funded_user(201);

        if app.create_token(first, &config).is_ok() {
            let mut retry = config.clone();
            retry.initial_owner = second;
            prop_assert!(app.create_token(second, &retry).is_err());
            prop_assert_eq!(app.factory.total_tokens_created(), 1);
        }
    }
}
