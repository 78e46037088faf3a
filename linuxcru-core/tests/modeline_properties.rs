//! Property tests for the timing calculator and emitter.

use linuxcru_core::{
    compute_modeline, render_dialect, validate, BlankingMode, CapabilityConstraint, PixelClock,
    RefreshRate, RenderOptions, Resolution, TargetDialect, ValidationOutcome,
};
use proptest::prelude::*;

fn blanking_mode() -> impl Strategy<Value = BlankingMode> {
    prop_oneof![
        Just(BlankingMode::Standard),
        Just(BlankingMode::Reduced),
        Just(BlankingMode::ReducedV2),
    ]
}

fn resolution() -> impl Strategy<Value = Resolution> {
    (320u32..=7680, 200u32..=4320, 10_000u32..=300_000).prop_map(|(width, height, millihertz)| {
        Resolution::new(width, height, RefreshRate::from_millihertz(millihertz))
    })
}

proptest! {
    #[test]
    fn computation_is_deterministic(resolution in resolution(), mode in blanking_mode()) {
        let first = compute_modeline(&resolution, mode).expect("valid request");
        let second = compute_modeline(&resolution, mode).expect("valid request");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn both_axes_are_ordered(resolution in resolution(), mode in blanking_mode()) {
        let modeline = compute_modeline(&resolution, mode).expect("valid request");
        prop_assert!(modeline.horizontal().is_ordered());
        prop_assert!(modeline.vertical().is_ordered());
        prop_assert!(modeline.horizontal().active <= resolution.width);
        prop_assert_eq!(modeline.vertical().active, resolution.height);
    }

    #[test]
    fn pixel_clock_never_rounds_up(resolution in resolution(), mode in blanking_mode()) {
        let modeline = compute_modeline(&resolution, mode).expect("valid request");
        let exact = u128::from(modeline.horizontal().total)
            * u128::from(modeline.vertical().total)
            * u128::from(resolution.refresh.millihertz());
        let clock = u128::from(modeline.pixel_clock().khz()) * 1_000_000;
        prop_assert!(clock <= exact, "{} > {}", clock, exact);
        prop_assert_eq!(modeline.pixel_clock().khz() % 10, 0);
    }

    #[test]
    fn force_turns_rejection_into_warning(resolution in resolution(), mode in blanking_mode()) {
        let modeline = compute_modeline(&resolution, mode).expect("valid request");
        let ceiling = PixelClock::from_khz(modeline.pixel_clock().khz().saturating_sub(10));
        let constraint = CapabilityConstraint::new("DP-1").with_max_pixel_clock(ceiling);

        let strict = validate(&modeline, Some(&constraint), false);
        let forced = validate(&modeline, Some(&constraint), true);

        prop_assert!(matches!(strict, ValidationOutcome::Rejected(_)));
        prop_assert!(matches!(forced, ValidationOutcome::AcceptedWithWarning(_)));
        prop_assert_eq!(strict.issue(), forced.issue());
    }

    #[test]
    fn rendering_is_pure(
        resolution in resolution(),
        mode in blanking_mode(),
        force in any::<bool>()
    ) {
        let modeline = compute_modeline(&resolution, mode).expect("valid request");
        let options = RenderOptions { force_enable: force };

        for dialect in TargetDialect::ALL {
            let first = render_dialect(&modeline, dialect, "DP-1", &options).to_string();
            let second = render_dialect(&modeline, dialect, "DP-1", &options).to_string();
            prop_assert_eq!(first, second);
        }
    }
}
