//! Unit tests for lv-pipeline.

#[cfg(test)]
mod fixtures {
    use lv_baseline::{Itinerary, ItineraryLeg, TransitRouter};
    use lv_core::{AgentId, Coord, TransportMode};
    use lv_network::{ModeSet, RoadNetwork, RoadNetworkBuilder};
    use lv_records::{LegRecord, StudyArea, TripRecord};

    use crate::RunInputs;

    /// Car free-flow between (0, 0) and (1000, 0) is 100 s.
    pub fn network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node("a", Coord::new(0.0, 0.0));
        let c = b.add_node("c", Coord::new(1_000.0, 0.0));
        b.add_road("ac", a, c, 1_000.0, 10.0, ModeSet::of(&[TransportMode::Car]));
        b.build()
    }

    /// 250 s door to door, 650 m access walk.
    pub struct FixedTransit;

    impl TransitRouter for FixedTransit {
        fn route(&self, _o: Coord, _d: Coord, _t: u64) -> Option<Itinerary> {
            Some(Itinerary {
                legs: vec![
                    ItineraryLeg { mode: "walk".into(), travel_secs: 50.0, distance_m: 650.0 },
                    ItineraryLeg { mode: "pt".into(), travel_secs: 200.0, distance_m: 1_000.0 },
                ],
            })
        }
    }

    fn leg(agent: &str, trav: u64, dep: u64) -> LegRecord {
        LegRecord {
            agent:          AgentId::from(agent),
            trip_id:        format!("{agent}_1"),
            mode:           "car".into(),
            trav_time_secs: trav,
            dep_time_secs:  dep,
            start:          Coord::new(0.0, 0.0),
            end:            Coord::new(1_000.0, 0.0),
            start_link:     "s".into(),
            end_link:       "e".into(),
            distance_m:     None,
        }
    }

    fn trip(agent: &str, trav: u64, dep: u64) -> TripRecord {
        TripRecord {
            agent:                AgentId::from(agent),
            trip_id:              format!("{agent}_1"),
            main_mode:            "car".into(),
            trav_time_secs:       trav,
            dep_time_secs:        dep,
            euclidean_distance_m: 1_000.0,
            start:                Coord::new(0.0, 0.0),
            end:                  Coord::new(1_000.0, 0.0),
            start_link:           "s".into(),
            end_link:             "e".into(),
        }
    }

    /// `a` loses 10 s of 110, `b` loses 100 s of 200, `c` stays home.
    pub fn inputs() -> RunInputs {
        let area: StudyArea = [("a", 0.0), ("b", 10.0), ("c", 20.0)]
            .into_iter()
            .map(|(id, x)| (AgentId::from(id), Coord::new(x, 0.0)))
            .collect();
        let legs = vec![leg("a", 110, 8 * 3_600), leg("b", 200, 8 * 3_600 + 900)];
        let trips = vec![trip("a", 110, 8 * 3_600), trip("b", 200, 8 * 3_600 + 900)];
        RunInputs::new(legs, trips, area)
    }

    pub fn num(run: &crate::PipelineRun, agent: &str, column: &str) -> Option<f64> {
        run.outputs.ledger.get(&AgentId::from(agent), column).and_then(|c| c.as_f64())
    }

    pub fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }
}

// ── Module runs ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use std::time::Duration;

    use lv_core::LiveabilityConfig;

    use super::fixtures::{close, inputs, network, num, FixedTransit};
    use crate::{
        LiveabilitySummary, LossTime, NoopObserver, PipelineBuilder, PipelineError, PipelineObserver,
        TrafficQuality, NO_RANKING,
    };

    #[derive(Default)]
    struct Recorder {
        started:  Vec<String>,
        finished: Vec<String>,
        ended:    bool,
    }

    impl PipelineObserver for Recorder {
        fn on_module_start(&mut self, name: &str) {
            self.started.push(name.to_owned());
        }
        fn on_module_end(&mut self, name: &str, _elapsed: Duration) {
            self.finished.push(name.to_owned());
        }
        fn on_run_end(&mut self, _run: &crate::PipelineRun) {
            self.ended = true;
        }
    }

    #[test]
    fn traffic_quality_and_summary() {
        let net = network();
        let inputs = inputs();
        let mut pipeline = PipelineBuilder::new(LiveabilityConfig::default())
            .module(TrafficQuality)
            .module(LiveabilitySummary)
            .build()
            .unwrap();
        let est = pipeline.estimator(&net).unwrap();
        let run = pipeline.run(&est, &inputs, &mut NoopObserver).unwrap();

        // Relative loss 0.1 and 1.0 against 0.2.
        assert!(close(num(&run, "a", "percentageLossTime").unwrap(), 0.1));
        assert!(close(num(&run, "a", "indexValue_relativeLossTime").unwrap(), -0.5));
        assert!(close(num(&run, "b", "indexValue_relativeLossTime").unwrap(), 4.0));
        assert!(close(num(&run, "a", "indexValue_trafficQuality").unwrap(), -0.5));
        assert!(close(num(&run, "b", "indexValue_trafficQuality").unwrap(), 4.0));

        // Longest car trip 110 s against 30 min.
        assert_eq!(num(&run, "a", "maxTravelTimePerTrip"), Some(110.0));
        assert_eq!(num(&run, "a", "limit_maxTravelTimePerTrip"), Some(1_800.0));
        assert!(close(num(&run, "a", "indexValue_maxTravelTimePerTrip").unwrap(), (110.0 - 1_800.0) / 1_800.0));

        // The inactive agent is within every limit and has no bounded limit.
        assert_eq!(num(&run, "c", "indexValue_trafficQuality"), Some(-1.0));
        assert_eq!(num(&run, "c", "limit_maxTravelTimePerTrip"), None);

        let tiles = &run.outputs.tiles;
        assert_eq!(tiles.get("Travel Time Index Value"), Some("66.67%"));
        assert_eq!(tiles.get("Overall Ranking"), Some("66.67%"));

        let records = run.outputs.indicators.records();
        assert_eq!(records[0].indicator, "Longest trip");
        assert_eq!(records[0].median, Some(110.0));
        assert!(records[0].limit.contains("car 30"));
        assert_eq!(records[1].indicator, "Loss time");
        assert_eq!(records[1].limit, "0.2");

        let deps = run.outputs.table("travelTime_histogram_longestTripDep").unwrap();
        assert_eq!(deps.len(), 96);
        assert_eq!(deps.rows[32][1].as_f64(), Some(1.0)); // 08:00
        assert_eq!(deps.rows[33][1].as_f64(), Some(1.0)); // 08:15

        let per_mode = run.outputs.table("travelTime_stats_LegsLossTimePerMode").unwrap();
        assert_eq!(per_mode.len(), 1);
        assert_eq!(per_mode.rows[0][0].as_text(), Some("car"));
        // (10 + 100) / 0.1 sample size, in minutes.
        assert!(close(per_mode.rows[0][1].as_f64().unwrap(), 1_100.0 / 60.0));

        assert_eq!(run.outputs.maps.len(), 4);
        assert_eq!(run.outputs.maps[3].name, "agentRankingForMap");
        assert_eq!(run.outputs.maps[3].points.len(), 3);
    }

    #[test]
    fn standard_modules_in_order() {
        let net = network();
        let inputs = inputs();
        let mut pipeline = PipelineBuilder::new(LiveabilityConfig::default()).standard_modules().build().unwrap();
        assert_eq!(pipeline.module_names(), ["traffic_quality", "pt_quality", "loss_time", "summary"]);

        let est = pipeline.estimator(&net).unwrap().with_transit(&FixedTransit);
        let mut recorder = Recorder::default();
        let run = pipeline.run(&est, &inputs, &mut recorder).unwrap();
        assert_eq!(recorder.started, recorder.finished);
        assert_eq!(recorder.started.len(), 4);
        assert!(recorder.ended);

        let categories: Vec<&str> = run.outputs.tiles.tiles().iter().map(|t| t.category.as_str()).collect();
        assert_eq!(categories, ["Travel Time Index Value", "PtQuality", "Loss Time Ranking", "Overall Ranking"]);

        // 250 s by transit against the observed 110 s and 200 s car trips.
        assert!(close(num(&run, "a", "indexValue_ptCarRatio").unwrap(), (250.0 / 110.0 - 2.0) / 2.0));
        assert!(close(num(&run, "b", "indexValue_ptQuality").unwrap(), -0.375));
        assert_eq!(num(&run, "c", "indexValue_ptCarRatio"), None);

        // Relative loss 0.1, 1.0 and 0 against 0.15.
        assert_eq!(run.outputs.tiles.get("Loss Time Ranking"), Some("66.67%"));
        assert_eq!(run.outputs.table("lossTime_stats_legs").unwrap().len(), 2);

        // Walk access is empty for everyone since nobody rode pt.  Overall:
        // a is max(-0.5, 0.136), b is 4.0 and only c is within.
        assert_eq!(run.outputs.tiles.get("Overall Ranking"), Some("33.33%"));
        assert_eq!(run.outputs.table("overviewIndicatorTable").unwrap().len(), 4);
        let walk = run.outputs.indicators.records().iter().find(|r| r.indicator == "Walk access").unwrap();
        assert_eq!(walk.ranking, NO_RANKING);

        let ranking_map = run.outputs.maps.last().unwrap();
        assert_eq!(ranking_map.name, "agentRankingForMap");
        assert_eq!(ranking_map.points.len(), 3);
    }

    #[test]
    fn car_only_population_still_ranks() {
        let net = network();
        let inputs = inputs();
        let mut pipeline = PipelineBuilder::new(LiveabilityConfig::default()).standard_modules().build().unwrap();
        let est = pipeline.estimator(&net).unwrap();
        let run = pipeline.run(&est, &inputs, &mut NoopObserver).unwrap();

        assert_eq!(num(&run, "a", "indexValue_ptCarRatio"), None);
        assert_eq!(run.outputs.tiles.get("PtQuality"), Some(NO_RANKING));
        assert_eq!(run.outputs.tiles.get("Overall Ranking"), Some("66.67%"));
        assert_eq!(run.outputs.maps.last().unwrap().points.len(), 3);
    }

    #[test]
    fn summary_without_index_columns_fails() {
        let net = network();
        let inputs = inputs();
        let mut pipeline = PipelineBuilder::new(LiveabilityConfig::default())
            .module(LossTime)
            .module(LiveabilitySummary)
            .build()
            .unwrap();
        let est = pipeline.estimator(&net).unwrap();
        let err = pipeline.run(&est, &inputs, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, PipelineError::NoIndexColumns));
    }

    #[test]
    fn loss_report_is_shared() {
        let net = network();
        let inputs = inputs();
        let cfg = LiveabilityConfig::default();
        let est = lv_baseline::BaselineEstimator::new(&net, cfg.baseline.clone()).unwrap();
        let mut ctx = crate::RunContext::new(&cfg, &est, &inputs);
        let first = ctx.loss_report().unwrap();
        let second = ctx.loss_report().unwrap();
        assert!(std::rc::Rc::ptr_eq(&first, &second));
        assert_eq!(first.legs.len(), 2);
    }
}

// ── Summary ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod summary {
    use std::collections::BTreeMap;

    use lv_core::{AgentId, Coord};
    use lv_ledger::Ledger;
    use lv_records::StudyArea;

    use crate::LiveabilitySummary;

    #[test]
    fn max_over_present_index_cells() {
        let area: StudyArea =
            ["p1", "p2", "p3", "p4"].into_iter().map(|id| (AgentId::from(id), Coord::new(0.0, 0.0))).collect();
        let mut ledger = Ledger::from_study_area(&area);
        let first = BTreeMap::from([
            (AgentId::from("p1"), -0.5),
            (AgentId::from("p2"), 0.3),
            (AgentId::from("p3"), 0.1),
        ]);
        let second = BTreeMap::from([(AgentId::from("p1"), -0.2), (AgentId::from("p2"), -0.9)]);
        let unrelated = BTreeMap::from([(AgentId::from("p3"), 99.0), (AgentId::from("p4"), 99.0)]);
        ledger.extend_with_attribute(&first, "indexValue_first").unwrap();
        ledger.extend_with_attribute(&second, "indexValue_second").unwrap();
        ledger.extend_with_attribute(&unrelated, "lossTime").unwrap();

        let overall = LiveabilitySummary::overall_values(&ledger).unwrap();
        assert_eq!(overall.len(), 3);
        assert_eq!(overall[&AgentId::from("p1")], -0.2);
        assert_eq!(overall[&AgentId::from("p2")], 0.3);
        assert_eq!(overall[&AgentId::from("p3")], 0.1);
        assert!(!overall.contains_key(&AgentId::from("p4")));
    }
}

// ── Builder ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use lv_core::LiveabilityConfig;

    use crate::{ErrorKind, LiveabilitySummary, LossTime, PipelineBuilder, PipelineError, TrafficQuality};

    #[test]
    fn requires_modules() {
        let err = PipelineBuilder::new(LiveabilityConfig::default()).build().err().expect("no modules");
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn rejects_duplicates() {
        let err = PipelineBuilder::new(LiveabilityConfig::default())
            .module(LossTime)
            .module(LossTime)
            .build()
            .err()
            .expect("duplicate module");
        assert!(matches!(err, PipelineError::Config(ref m) if m.contains("twice")));
    }

    #[test]
    fn summary_must_be_last() {
        let err = PipelineBuilder::new(LiveabilityConfig::default())
            .module(LiveabilitySummary)
            .module(TrafficQuality)
            .build()
            .err()
            .expect("summary not last");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn validates_config() {
        let cfg = LiveabilityConfig { sample_size: 0.0, ..LiveabilityConfig::default() };
        let err = PipelineBuilder::new(cfg).standard_modules().build().err().expect("invalid config");
        assert!(matches!(err, PipelineError::Core(_)));
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}

// ── Errors ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod errors {
    use std::path::PathBuf;

    use lv_core::CoreError;
    use lv_ledger::LedgerError;

    use crate::{ErrorKind, PipelineError};

    #[test]
    fn kinds() {
        let missing = PipelineError::MissingInput { what: "output_legs", dir: PathBuf::from("run") };
        assert_eq!(missing.kind(), ErrorKind::Io);
        assert_eq!(PipelineError::NoIndexColumns.kind(), ErrorKind::Config);
        assert_eq!(PipelineError::from(CoreError::Parse("bad".into())).kind(), ErrorKind::Parse);
        assert_eq!(PipelineError::from(LedgerError::BadHeader("x".into())).kind(), ErrorKind::Parse);
        assert_eq!(PipelineError::from(LedgerError::DuplicateColumn("x".into())).kind(), ErrorKind::Config);
    }
}

// ── Inputs and persistence ─────────────────────────────────────────────────────

#[cfg(test)]
mod files {
    use std::fs;
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;
    use lv_core::LiveabilityConfig;
    use lv_ledger::{load_ledger_csv, CsvLedgerWriter};

    use super::fixtures::{inputs, network};
    use crate::{ErrorKind, InputPaths, LogObserver, PipelineBuilder, RunInputs};

    const LEGS: &str = "person;trip_id;mode;dep_time;trav_time;start_x;start_y;start_link;end_x;end_y;end_link;distance\n\
                        a;a_1;walk;08:00:00;00:05:00;0;0;l1;300;0;l2;400\n\
                        a;a_1;pt;08:05:00;00:10:00;300;0;l2;900;0;l3;\n\
                        a;a_1;walk;08:15:00;00:02:00;900;0;l3;1000;0;l4;120\n\
                        b;b_1;car;xx;00:05:00;0;0;l1;1000;0;l2;\n";
    const TRIPS: &str = "person;trip_id;main_mode;dep_time;trav_time;euclidean_distance;start_x;start_y;start_link;end_x;end_y;end_link\n\
                         a;a_1;pt;08:00:00;00:17:00;1000;0;0;l1;1000;0;l4\n";
    const AREA: &str = "person,home_x,home_y\na,0,0\nb,5,5\n";

    #[test]
    fn loads_a_run_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut enc = GzEncoder::new(fs::File::create(dir.path().join("run7.output_legs.csv.gz")).unwrap(), Compression::default());
        enc.write_all(LEGS.as_bytes()).unwrap();
        enc.finish().unwrap();
        fs::write(dir.path().join("run7.output_trips.csv"), TRIPS).unwrap();
        let area = dir.path().join("study_area.csv");
        fs::write(&area, AREA).unwrap();

        let paths = InputPaths::in_run_dir(dir.path(), &area).unwrap();
        assert!(paths.legs.to_string_lossy().ends_with(".gz"));
        let inputs = RunInputs::load(&paths, &LiveabilityConfig::default()).unwrap();
        assert_eq!(inputs.legs.len(), 3);
        assert_eq!(inputs.skipped.legs, 1);
        assert_eq!(inputs.trips.len(), 1);
        assert_eq!(inputs.area.len(), 2);
        assert_eq!(inputs.walks.longest_walk_m("a_1"), Some(400.0));
    }

    #[test]
    fn missing_export_is_io() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("output_trips.csv"), TRIPS).unwrap();
        let err = InputPaths::in_run_dir(dir.path(), &dir.path().join("area.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn execute_persists_csv() {
        let out = tempfile::tempdir().unwrap();
        let net = network();
        let inputs = inputs();
        let mut pipeline = PipelineBuilder::new(LiveabilityConfig::default()).standard_modules().build().unwrap();
        let est = pipeline.estimator(&net).unwrap();
        let mut writer = CsvLedgerWriter::new(out.path()).unwrap();
        let run = pipeline.execute(&est, &inputs, &mut LogObserver, &mut writer).unwrap();

        let ledger = load_ledger_csv(&out.path().join("overall_stats_agentLiveabilityInfo.csv")).unwrap();
        assert_eq!(ledger, run.outputs.ledger);
        assert!(out.path().join("overall_tiles_indexDimensionValues.csv").exists());
        assert!(out.path().join("overall_stats_indicatorValues.csv").exists());
        assert!(out.path().join("lossTime_stats_legs.csv").exists());
        assert!(out.path().join("agentRankingForMap.xyt.csv").exists());
    }
}
