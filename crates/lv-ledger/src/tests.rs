//! Unit tests for lv-ledger.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeMap;

    use lv_core::{AgentId, Coord};
    use lv_records::StudyArea;

    pub fn area() -> StudyArea {
        [
            (AgentId::from("p3"), Coord::new(30.0, 3.5)),
            (AgentId::from("p1"), Coord::new(10.0, 1.5)),
            (AgentId::from("p2"), Coord::new(20.0, 2.5)),
        ]
        .into_iter()
        .collect()
    }

    pub fn values(pairs: &[(&str, f64)]) -> BTreeMap<AgentId, f64> {
        pairs.iter().map(|&(a, v)| (AgentId::from(a), v)).collect()
    }
}

// ── Cells ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cells {
    use crate::{Cell, ColumnKind};

    #[test]
    fn parse_distinguishes_kinds() {
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("0.3"), Cell::Number(0.3));
        assert_eq!(Cell::parse("car|walk"), Cell::Text("car|walk".into()));
        assert_eq!(Cell::parse("NaN"), Cell::Text("NaN".into()));
    }

    #[test]
    fn non_finite_number_is_empty() {
        assert_eq!(Cell::from(f64::NAN), Cell::Empty);
        assert_eq!(Cell::from(None::<f64>), Cell::Empty);
        assert_eq!(Cell::from(Some(2.0)), Cell::Number(2.0));
        assert_eq!(Cell::from(""), Cell::Empty);
    }

    #[test]
    fn display_round_trips() {
        for v in [0.1, 1800.0, -1.0, 1.0 / 3.0, 123_456.789] {
            assert_eq!(Cell::parse(&Cell::Number(v).to_string()), Cell::Number(v));
        }
    }

    #[test]
    fn kind_inference() {
        let numeric = [Cell::Number(1.0), Cell::Empty];
        let text = [Cell::Number(1.0), Cell::Text("x".into())];
        assert_eq!(ColumnKind::infer(&numeric), ColumnKind::Numeric);
        assert_eq!(ColumnKind::infer(&text), ColumnKind::Text);
    }
}

// ── Ledger ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ledger {
    use std::collections::BTreeMap;

    use lv_core::AgentId;

    use super::helpers::{area, values};
    use crate::{Cell, Ledger, LedgerError};

    #[test]
    fn initial_columns_from_study_area() {
        let ledger = Ledger::from_study_area(&area());
        assert_eq!(ledger.header().collect::<Vec<_>>(), ["person", "home_x", "home_y"]);
        assert_eq!(ledger.len(), 3);
        let order: Vec<&str> = ledger.agents().iter().map(AgentId::as_str).collect();
        assert_eq!(order, ["p1", "p2", "p3"]);
        assert_eq!(ledger.get(&AgentId::from("p2"), "home_x"), Some(&Cell::Number(20.0)));
    }

    #[test]
    fn extend_adds_one_column_and_keeps_rows() {
        let mut ledger = Ledger::from_study_area(&area());
        let before: Vec<AgentId> = ledger.agents().to_vec();

        ledger
            .extend_with_attribute(&values(&[("p1", 0.5), ("p3", -0.2), ("stranger", 9.0)]), "indexValue_x")
            .unwrap();

        assert_eq!(ledger.agents(), before.as_slice());
        assert_eq!(ledger.columns().len(), 3);
        assert_eq!(ledger.get(&AgentId::from("p1"), "indexValue_x"), Some(&Cell::Number(0.5)));
        assert_eq!(ledger.get(&AgentId::from("p2"), "indexValue_x"), Some(&Cell::Empty));
        assert!(!ledger.contains_agent(&AgentId::from("stranger")));
        assert!(ledger.rows().all(|(_, cells)| cells.len() == 3));
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let mut ledger = Ledger::from_study_area(&area());
        ledger.extend_with_attribute(&values(&[]), "lossTime").unwrap();
        let err = ledger.extend_with_attribute(&values(&[]), "lossTime").unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateColumn(c) if c == "lossTime"));
        assert!(ledger.extend_with_attribute(&values(&[]), "person").is_err());
        assert_eq!(ledger.columns().len(), 3);
    }

    #[test]
    fn text_attributes() {
        let mut ledger = Ledger::from_study_area(&area());
        let modes: BTreeMap<AgentId, String> =
            [(AgentId::from("p1"), "car|walk".to_owned())].into_iter().collect();
        ledger.extend_with_attribute(&modes, "modes").unwrap();
        assert_eq!(ledger.get(&AgentId::from("p1"), "modes").and_then(Cell::as_text), Some("car|walk"));
    }

    #[test]
    fn prefix_lookup() {
        let mut ledger = Ledger::from_study_area(&area());
        for c in ["indexValue_a", "lossTime", "indexValue_b"] {
            ledger.extend_with_attribute(&values(&[]), c).unwrap();
        }
        let idx: Vec<&str> = ledger.columns_with_prefix("indexValue_").collect();
        assert_eq!(idx, ["indexValue_a", "indexValue_b"]);
        assert_eq!(ledger.column("lossTime").map(|c| c.count()), Some(3));
        assert!(ledger.column("missing").is_none());
    }
}

// ── Tiles and catalogue ────────────────────────────────────────────────────────

#[cfg(test)]
mod tiles {
    use crate::{IndicatorCatalogue, SummaryTiles, PLACEHOLDER};

    #[test]
    fn placeholder_until_first_tile() {
        let mut tiles = SummaryTiles::new();
        assert!(tiles.is_placeholder());
        assert_eq!(tiles.lines(), vec![vec![PLACEHOLDER]]);

        tiles.extend_summary_tile("Travel Time Index Value", "70.00%");
        tiles.extend_summary_tile("Loss Time Ranking", "55.00%");
        assert!(!tiles.is_placeholder());
        let lines = tiles.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], ["Travel Time Index Value", "70.00%"]);
        assert_eq!(tiles.get("Loss Time Ranking"), Some("55.00%"));
        assert!(tiles.to_table().rows.len() == 2);
    }

    #[test]
    fn indicator_rows_append() {
        let mut cat = IndicatorCatalogue::new();
        cat.extend_indicator_record("Traffic Quality", "Longest trip", Some(1_234.567), "30 min", "70.00%", 1.0);
        cat.extend_indicator_record("Traffic Quality", "Loss time", None, "0.2", "0.00%", 1.0);
        assert_eq!(cat.len(), 2);
        let table = cat.to_table();
        assert_eq!(table.header[2], "median value");
        assert_eq!(table.rows[0][2].to_string(), "1234.57");
        assert!(table.rows[1][2].is_empty());
    }
}

// ── CSV ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use std::io::Cursor;

    use lv_core::AgentId;
    use tempfile::TempDir;

    use super::helpers::{area, values};
    use crate::{
        load_ledger_csv, load_ledger_reader, CsvLedgerWriter, Ledger, LedgerError, LedgerWriter, RunOutputs,
        Table, XytMap, PLACEHOLDER,
    };

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn sample_outputs() -> RunOutputs {
        let mut out = RunOutputs::new(Ledger::from_study_area(&area()));
        out.ledger.extend_with_attribute(&values(&[("p1", 0.25), ("p2", -1.0)]), "indexValue_a").unwrap();
        out.ledger.extend_with_attribute(&values(&[("p3", 1_800.0)]), "lossTime").unwrap();
        out
    }

    #[test]
    fn ledger_round_trip() {
        let dir = tmp();
        let out = sample_outputs();
        let mut w = CsvLedgerWriter::new(dir.path()).unwrap();
        out.persist(&mut w).unwrap();

        let reloaded = load_ledger_csv(&dir.path().join("overall_stats_agentLiveabilityInfo.csv")).unwrap();
        assert_eq!(reloaded, out.ledger);
    }

    #[test]
    fn fresh_tiles_file_holds_placeholder() {
        let dir = tmp();
        let out = sample_outputs();
        out.persist(&mut CsvLedgerWriter::new(dir.path()).unwrap()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("overall_tiles_indexDimensionValues.csv")).unwrap();
        assert_eq!(text.trim_end(), PLACEHOLDER);
    }

    #[test]
    fn tiles_replace_placeholder() {
        let dir = tmp();
        let mut out = sample_outputs();
        out.tiles.extend_summary_tile("Overall Ranking", "50.00%");
        out.persist(&mut CsvLedgerWriter::new(dir.path()).unwrap()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("overall_tiles_indexDimensionValues.csv")).unwrap();
        assert_eq!(text.trim_end(), "Overall Ranking,50.00%");
    }

    #[test]
    fn indicator_file_header() {
        let dir = tmp();
        let out = sample_outputs();
        out.persist(&mut CsvLedgerWriter::new(dir.path()).unwrap()).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("overall_stats_indicatorValues.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["dimension", "indicator", "median value", "limit", "ranking value", "weight"]);
    }

    #[test]
    fn xyt_map_has_crs_line() {
        let dir = tmp();
        let mut out = sample_outputs();
        out.add_map(XytMap::from_values("agentRankingForMap", "EPSG:25832", &values(&[("p1", 0.5)]), &area()));
        out.persist(&mut CsvLedgerWriter::new(dir.path()).unwrap()).unwrap();

        let text = std::fs::read_to_string(dir.path().join("agentRankingForMap.xyt.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["# EPSG:25832", "time,x,y,value", "0,10,1.5,0.5"]);
    }

    #[test]
    fn auxiliary_tables() {
        let dir = tmp();
        let mut out = sample_outputs();
        let mut t = Table::new("lossTime_perMode", ["mode", "legs"]);
        t.push_row(vec!["car".into(), 3u64.into()]).unwrap();
        assert!(t.push_row(vec!["car".into()]).is_err());
        out.add_table(t);
        out.persist(&mut CsvLedgerWriter::new(dir.path()).unwrap()).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("lossTime_perMode.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "car");
        assert_eq!(&rows[0][1], "3");
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvLedgerWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn reader_rejects_bad_header() {
        let err = load_ledger_reader(Cursor::new("agent,home_x\nA,1\n")).unwrap_err();
        assert!(matches!(err, LedgerError::BadHeader(h) if h == "agent"));

        let err = load_ledger_reader(Cursor::new("person,a,a\n")).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateColumn(_)));
    }

    #[test]
    fn reader_keeps_first_duplicate_row() {
        let ledger = load_ledger_reader(Cursor::new("person,v\nA,1\nA,2\nB,\n")).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(&AgentId::from("A"), "v").and_then(|c| c.as_f64()), Some(1.0));
        assert!(ledger.get(&AgentId::from("B"), "v").is_some_and(|c| c.is_empty()));
    }
}

// ── SQLite tests ───────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::helpers::{area, values};
    use crate::sqlite::{SqliteLedgerWriter, DB_FILE};
    use crate::{Ledger, LedgerWriter, RunOutputs};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn ledger_table_typed_columns() {
        let dir = tmp();
        let mut out = RunOutputs::new(Ledger::from_study_area(&area()));
        out.ledger.extend_with_attribute(&values(&[("p1", 0.5)]), "indexValue_a").unwrap();
        let mut w = SqliteLedgerWriter::new(dir.path()).unwrap();
        out.persist(&mut w).unwrap();

        let conn = rusqlite::Connection::open(dir.path().join(DB_FILE)).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM overall_stats_agentLiveabilityInfo", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);

        let v: f64 = conn
            .query_row(
                "SELECT indexValue_a FROM overall_stats_agentLiveabilityInfo WHERE person = 'p1'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(v, 0.5);

        let missing: Option<f64> = conn
            .query_row(
                "SELECT indexValue_a FROM overall_stats_agentLiveabilityInfo WHERE person = 'p2'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn rewriting_replaces_table() {
        let dir = tmp();
        let out = RunOutputs::new(Ledger::from_study_area(&area()));
        let mut w = SqliteLedgerWriter::new(dir.path()).unwrap();
        w.write_ledger(&out.ledger).unwrap();
        w.write_ledger(&out.ledger).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join(DB_FILE)).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM overall_stats_agentLiveabilityInfo", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }
}

// ── Parquet tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use std::fs::File;

    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    use super::helpers::{area, values};
    use crate::parquet::ParquetLedgerWriter;
    use crate::{Ledger, RunOutputs};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn ledger_schema_and_rows() {
        let dir = tmp();
        let mut out = RunOutputs::new(Ledger::from_study_area(&area()));
        out.ledger.extend_with_attribute(&values(&[("p1", 0.5)]), "indexValue_a").unwrap();
        out.persist(&mut ParquetLedgerWriter::new(dir.path()).unwrap()).unwrap();

        let file = File::open(dir.path().join("overall_stats_agentLiveabilityInfo.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(3).data_type(), &DataType::Float64);

        let rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(rows, 3);
        assert!(dir.path().join("overall_tiles_indexDimensionValues.parquet").exists());
    }
}
