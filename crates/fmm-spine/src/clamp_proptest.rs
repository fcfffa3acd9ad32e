#[cfg(all(test, feature = "simulation"))]
mod proptest_clamp {
    use crate::hal::{StationIO, CONTROL_MAX, CONTROL_MIN};
    use crate::hal_sim::{SimulatedStation, StationConfig};
    use crate::recipe::RecipeKind;
    use crate::timebase::VirtualClock;
    use proptest::prelude::*;

    fn station() -> SimulatedStation {
        SimulatedStation::new(StationConfig::default()).with_clock(VirtualClock::new())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2000))]

        // Property: stored pressure always equals the clamped request
        #[test]
        fn pressure_is_clamped(value in any::<i64>()) {
            let mut station = station();
            station.set_pressure(value);
            prop_assert_eq!(
                i64::from(station.pressure()),
                value.clamp(CONTROL_MIN.into(), CONTROL_MAX.into())
            );
        }

        // Property: stored current always equals the clamped request
        #[test]
        fn current_is_clamped(value in any::<i64>()) {
            let mut station = station();
            station.set_current(value);
            prop_assert_eq!(
                i64::from(station.current()),
                value.clamp(CONTROL_MIN.into(), CONTROL_MAX.into())
            );
        }

        // Property: values inside the range are stored unchanged
        #[test]
        fn in_range_values_are_kept(pressure in 0i64..=200, current in 0i64..=200) {
            let mut station = station();
            station.set_pressure(pressure);
            station.set_current(current);
            prop_assert_eq!(i64::from(station.pressure()), pressure);
            prop_assert_eq!(i64::from(station.current()), current);
        }

        // Property: the constant-current pressure never drops below its floor
        #[test]
        fn constant_current_pressure_floor(part in -1000i32..1000, second in 0u32..10_000) {
            let (pressure, _) = RecipeKind::ConstantCurrent.setpoint(part, second);
            prop_assert!((10..=50).contains(&pressure));
        }

        // Property: ramp pressure never exceeds its cap
        #[test]
        fn ramp_pressure_cap(part in 51i32..1000, second in 0u32..10_000) {
            let (pressure, current) = RecipeKind::Ramp.setpoint(part, second);
            prop_assert!(pressure <= 100);
            prop_assert_eq!(current, i64::from(part) + 20 * i64::from(second));
        }
    }
}
