//! Property-based tests for configuration merging.

use super::merger::ConfigMerger;
use super::schema::{AllocationSettings, Config, OutputFormat};
use proptest::prelude::*;

fn output_format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![
        Just(OutputFormat::Json),
        Just(OutputFormat::Csv),
        Just(OutputFormat::Tsv),
        Just(OutputFormat::Table),
    ]
}

fn allocation_strategy() -> impl Strategy<Value = AllocationSettings> {
    (prop::option::of(2usize..=4), prop::option::of(any::<bool>())).prop_map(
        |(max_group_size, permissive_fallback)| AllocationSettings {
            max_group_size,
            permissive_fallback,
        },
    )
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(allocation_strategy()),
        prop::option::of(1u32..=600),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..=60),
        prop::option::of(output_format_strategy()),
    )
        .prop_map(
            |(allocation, duration, notifications, autoinit, lock_wait, output_format)| Config {
                allocation,
                default_duration_minutes: duration,
                disable_notifications: notifications,
                disable_autoinit: autoinit,
                maximum_lock_wait_seconds: lock_wait,
                output_format,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Set values in the higher source win; unset ones fall through
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(
            result.default_duration_minutes,
            high.default_duration_minutes.or(low.default_duration_minutes)
        );
        prop_assert_eq!(
            result.disable_notifications,
            high.disable_notifications.or(low.disable_notifications)
        );
        prop_assert_eq!(result.disable_autoinit, high.disable_autoinit.or(low.disable_autoinit));
        prop_assert_eq!(
            result.maximum_lock_wait_seconds,
            high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds)
        );
        prop_assert_eq!(result.output_format, high.output_format.or(low.output_format));

        let expected_group = high
            .allocation
            .as_ref()
            .and_then(|a| a.max_group_size)
            .or_else(|| low.allocation.as_ref().and_then(|a| a.max_group_size));
        prop_assert_eq!(
            result.allocation.as_ref().and_then(|a| a.max_group_size),
            expected_group
        );
    }

    #[test]
    fn config_merge_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    #[test]
    fn config_merge_associative(
        a in config_strategy(),
        b in config_strategy(),
        c in config_strategy()
    ) {
        let mut left = a.clone();
        ConfigMerger::merge_into(&mut left, &b);
        ConfigMerger::merge_into(&mut left, &c);

        let mut b_then_c = b;
        ConfigMerger::merge_into(&mut b_then_c, &c);
        let mut right = a;
        ConfigMerger::merge_into(&mut right, &b_then_c);

        prop_assert_eq!(left, right);
    }

    #[test]
    fn config_yaml_roundtrip(config in config_strategy()) {
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
