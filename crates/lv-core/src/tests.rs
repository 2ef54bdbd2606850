//! Unit tests for lv-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EdgeId, NodeId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::default(), EdgeId::INVALID);
    }

    #[test]
    fn agent_ids_order_lexicographically() {
        let mut ids = vec![AgentId::from("b"), AgentId::from("a10"), AgentId::from("a2")];
        ids.sort();
        let labels: Vec<&str> = ids.iter().map(AgentId::as_str).collect();
        assert_eq!(labels, ["a10", "a2", "b"]);
        assert_eq!(AgentId::new("p1").to_string(), "p1");
    }
}

#[cfg(test)]
mod geo {
    use crate::Coord;

    #[test]
    fn pythagorean_distance() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(300.0, 400.0);
        assert!((a.euclidean_m(b) - 500.0).abs() < 1e-9);
        assert_eq!(a.euclidean_m(a), 0.0);
    }

    #[test]
    fn finiteness() {
        assert!(Coord::new(1.0, 2.0).is_finite());
        assert!(!Coord::new(f64::NAN, 2.0).is_finite());
    }
}

#[cfg(test)]
mod time {
    use crate::time::{day_intervals, format_hms, interval_label, parse_hms};

    #[test]
    fn parses_hours_beyond_a_day() {
        assert_eq!(parse_hms("00:00:00").unwrap(), 0);
        assert_eq!(parse_hms("01:02:03").unwrap(), 3_723);
        assert_eq!(parse_hms("25:10:00").unwrap(), 90_600);
        assert_eq!(parse_hms("104:00:00").unwrap(), 374_400);
    }

    #[test]
    fn accepts_plain_seconds() {
        assert_eq!(parse_hms(" 95 ").unwrap(), 95);
    }

    #[test]
    fn rejects_malformed() {
        assert!(parse_hms("").is_err());
        assert!(parse_hms("1:2").is_err());
        assert!(parse_hms("aa:00:00").is_err());
        assert!(parse_hms("00:61:00").is_err());
        assert!(parse_hms("-1:00:00").is_err());
    }

    #[test]
    fn rejects_hours_that_overflow() {
        assert!(matches!(
            parse_hms("9999999999999999999:00:00"),
            Err(crate::CoreError::Parse(_))
        ));
        assert!(parse_hms("5124095576030431:00:00").is_ok());
        assert!(parse_hms("5124095576030432:00:00").is_err());
    }

    #[test]
    fn formats_long_durations() {
        assert_eq!(format_hms(0.0), "00:00:00");
        assert_eq!(format_hms(3_723.9), "01:02:03");
        assert_eq!(format_hms(90_600.0), "25:10:00");
        assert_eq!(format_hms(-5.0), "00:00:00");
    }

    #[test]
    fn format_then_parse_preserves_whole_seconds() {
        for secs in [0u64, 59, 3_600, 86_399, 90_600] {
            assert_eq!(parse_hms(&format_hms(secs as f64)).unwrap(), secs);
        }
    }

    #[test]
    fn quarter_hour_buckets() {
        assert_eq!(interval_label(0, 15), "00:00");
        assert_eq!(interval_label(8 * 3_600 + 14 * 60 + 59, 15), "08:00");
        assert_eq!(interval_label(8 * 3_600 + 15 * 60, 15), "08:15");
        assert_eq!(interval_label(90_600, 15), "01:00");
    }

    #[test]
    fn day_has_96_quarter_hours() {
        let all = day_intervals(15);
        assert_eq!(all.len(), 96);
        assert_eq!(all.first().map(String::as_str), Some("00:00"));
        assert_eq!(all.last().map(String::as_str), Some("23:45"));
    }
}

#[cfg(test)]
mod transport {
    use crate::TransportMode;

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(TransportMode::from_label("CAR"), Some(TransportMode::Car));
        assert_eq!(TransportMode::from_label(" pt"), Some(TransportMode::Pt));
        assert_eq!(TransportMode::from_label("hovercraft"), None);
    }

    #[test]
    fn label_roundtrip() {
        for m in TransportMode::ALL {
            assert_eq!(TransportMode::from_label(m.as_str()), Some(m));
        }
    }

    #[test]
    fn network_routed_set() {
        assert!(TransportMode::Car.is_network_routed());
        assert!(TransportMode::Truck.is_network_routed());
        assert!(!TransportMode::Walk.is_network_routed());
        assert!(!TransportMode::Pt.is_network_routed());
    }
}

#[cfg(test)]
mod limit {
    use crate::{deviation, Limit, UNBOUNDED_DEVIATION};

    #[test]
    fn zero_at_limit() {
        for l in [0.15, 1.0, 500.0, 1_800.0] {
            assert_eq!(deviation(l, l), 0.0);
        }
    }

    #[test]
    fn walk_access_example() {
        assert!((deviation(650.0, 500.0) - 0.30).abs() < 1e-12);
    }

    #[test]
    fn car_trip_example() {
        assert!((deviation(2_700.0, 1_800.0) - 0.50).abs() < 1e-12);
    }

    #[test]
    fn monotonic_in_measured() {
        let mut prev = f64::NEG_INFINITY;
        for m in (0..50).map(|i| i as f64 * 100.0) {
            let d = deviation(m, 1_800.0);
            assert!(d > prev);
            prev = d;
        }
    }

    #[test]
    fn bounded_rejects_non_positive() {
        assert!(Limit::bounded(0.0).is_err());
        assert!(Limit::bounded(-1.0).is_err());
        assert!(Limit::bounded(f64::INFINITY).is_err());
        assert_eq!(Limit::bounded(2.0).unwrap(), Limit::Bounded(2.0));
    }

    #[test]
    fn unbounded_is_always_within() {
        assert_eq!(Limit::Unbounded.deviation(1e9), UNBOUNDED_DEVIATION);
        assert_eq!(Limit::from_option(None), Limit::Unbounded);
        assert_eq!(Limit::from_option(Some(0.0)), Limit::Unbounded);
        assert_eq!(Limit::Unbounded.value(), None);
    }
}

#[cfg(test)]
mod config {
    use crate::{ClampedLegPolicy, Limit, LiveabilityConfig, PtPolicy, TransportMode};

    #[test]
    fn defaults_match_policy_constants() {
        let c = LiveabilityConfig::default();
        assert_eq!(c.limits.trip_duration.for_mode(TransportMode::Car), Limit::Bounded(1_800.0));
        assert_eq!(c.limits.trip_duration.for_mode(TransportMode::Pt), Limit::Bounded(3_600.0));
        assert_eq!(c.limits.trip_duration.for_mode(TransportMode::Ride), Limit::Bounded(3_600.0));
        assert_eq!(c.limits.trip_duration.for_mode(TransportMode::Walk), Limit::Unbounded);
        assert_eq!(c.limits.trip_duration.for_label("inactive"), Limit::Unbounded);
        assert_eq!(c.limits.walk_access_m, 500.0);
        assert_eq!(c.baseline.pt_policy, PtPolicy::PassThrough);
        assert_eq!(c.clamped_legs, ClampedLegPolicy::Include);
        assert_eq!(c.delimiter_byte().unwrap(), b';');
        c.validate().unwrap();
    }

    #[test]
    fn validate_catches_bad_values() {
        let mut c = LiveabilityConfig::default();
        c.sample_size = 0.0;
        assert!(c.validate().is_err());

        let mut c = LiveabilityConfig::default();
        c.departure_interval_mins = 7;
        assert!(c.validate().is_err());

        let mut c = LiveabilityConfig::default();
        c.csv_delimiter = 'é';
        assert!(c.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "baseline": { "pt_policy": "routed" },
            "limits": { "trip_duration": { "car": 2400 } },
            "clamped_legs": "exclude"
        }"#;
        let c: LiveabilityConfig = serde_json::from_str(json).unwrap();
        assert_eq!(c.baseline.pt_policy, PtPolicy::Routed);
        assert_eq!(c.baseline.walk_speed_mps, 1.23);
        assert_eq!(c.limits.trip_duration.car, Some(2_400.0));
        assert_eq!(c.limits.trip_duration.pt, Some(3_600.0));
        assert_eq!(c.clamped_legs, ClampedLegPolicy::Exclude);
        assert_eq!(c.sample_size, 0.1);
    }
}
