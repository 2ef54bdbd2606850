//! Traffic quality: longest trip and relative loss time per agent.

use std::collections::BTreeMap;

use lv_core::time::{format_hms, interval_label};
use lv_core::{deviation, AgentId, TransportMode, TripDurationLimits};
use lv_indicators::{format_percent, longest_trips, mean, median, RankingSummary};
use lv_ledger::{Cell, Table, XytMap};

use super::{interval_table, ranking_value, tile_table};
use crate::context::RunContext;
use crate::module::IndicatorModule;
use crate::PipelineResult;

pub const DIMENSION: &str = "Travel Time";
pub const TILE: &str = "Travel Time Index Value";

/// Longest-trip and relative-loss indicators, combined by their maximum
/// into `indexValue_trafficQuality`.
#[derive(Debug, Default)]
pub struct TrafficQuality;

/// `"car 30 / ride 60 / pt 60 min, others unbounded"`.
fn limit_label(limits: &TripDurationLimits) -> String {
    let bounded: Vec<String> = TransportMode::ALL
        .iter()
        .filter_map(|&m| limits.for_mode(m).value().map(|v| format!("{m} {}", v / 60.0)))
        .collect();
    if bounded.is_empty() {
        "unbounded".to_owned()
    } else {
        format!("{} min, others unbounded", bounded.join(" / "))
    }
}

impl IndicatorModule for TrafficQuality {
    fn name(&self) -> &'static str {
        "traffic_quality"
    }

    fn run(&mut self, ctx: &mut RunContext<'_, '_>) -> PipelineResult<()> {
        let config = ctx.config;
        let inputs = ctx.inputs;
        let rel_limit = config.limits.relative_loss_traffic;

        let longest = longest_trips(&inputs.trips, &inputs.area, &config.limits.trip_duration);
        let loss = ctx.loss_report()?;

        // ── Per-agent values ──────────────────────────────────────────────
        let mut max_travel   = BTreeMap::new();
        let mut max_limit    = BTreeMap::new();
        let mut idx_longest  = BTreeMap::new();
        let mut loss_time    = BTreeMap::new();
        let mut travel_time  = BTreeMap::new();
        let mut relative     = BTreeMap::new();
        let mut rel_limits   = BTreeMap::new();
        let mut idx_relative = BTreeMap::new();
        let mut idx_traffic: BTreeMap<AgentId, f64> = BTreeMap::new();

        for agent in inputs.area.agents() {
            let (Some(trip), Some(agent_loss)) = (longest.get(agent), loss.per_agent.get(agent)) else {
                continue;
            };
            let rel = agent_loss.relative_loss();
            let rel_dev = deviation(rel, rel_limit);

            max_travel.insert(agent.clone(), trip.duration_secs as f64);
            max_limit.insert(agent.clone(), trip.limit.value());
            idx_longest.insert(agent.clone(), trip.deviation);
            loss_time.insert(agent.clone(), agent_loss.loss_secs);
            travel_time.insert(agent.clone(), agent_loss.travel_secs);
            relative.insert(agent.clone(), rel);
            rel_limits.insert(agent.clone(), rel_limit);
            idx_relative.insert(agent.clone(), rel_dev);
            idx_traffic.insert(agent.clone(), trip.deviation.max(rel_dev));
        }

        let longest_rank = RankingSummary::from_deviations(idx_longest.values().copied());
        let relative_rank = RankingSummary::from_deviations(idx_relative.values().copied());
        let traffic_rank = RankingSummary::from_deviations(idx_traffic.values().copied());

        // ── Ledger, tiles, catalogue ──────────────────────────────────────
        let out = &mut ctx.outputs;
        out.ledger.extend_with_attribute(&max_travel, "maxTravelTimePerTrip")?;
        out.ledger.extend_with_attribute(&max_limit, "limit_maxTravelTimePerTrip")?;
        out.ledger.extend_with_attribute(&idx_longest, "indexValue_maxTravelTimePerTrip")?;
        out.ledger.extend_with_attribute(&loss_time, "lossTime")?;
        out.ledger.extend_with_attribute(&travel_time, "travelTime")?;
        out.ledger.extend_with_attribute(&relative, "percentageLossTime")?;
        out.ledger.extend_with_attribute(&rel_limits, "limit_relativeLossTime")?;
        out.ledger.extend_with_attribute(&idx_relative, "indexValue_relativeLossTime")?;
        out.ledger.extend_with_attribute(&idx_traffic, "indexValue_trafficQuality")?;

        out.tiles.extend_summary_tile(TILE, ranking_value(&traffic_rank));

        out.indicators.extend_indicator_record(
            DIMENSION,
            "Longest trip",
            median(max_travel.values().copied()),
            limit_label(&config.limits.trip_duration),
            ranking_value(&longest_rank),
            1.0,
        );
        out.indicators.extend_indicator_record(
            DIMENSION,
            "Loss time",
            median(loss_time.values().copied()),
            rel_limit.to_string(),
            ranking_value(&relative_rank),
            1.0,
        );

        // ── Per-agent stats ───────────────────────────────────────────────
        let mut per_agent = Table::new(
            "travelTime_stats_perAgent",
            [
                "Person",
                "lossTimePerAgent",
                "travTimePerAgent",
                "percentageLossTime",
                "TQLossTimeDeviationFromLimit",
                "modesUsed",
                "longestTripMode",
                "longestTripTravelTime",
                "TQLongestTripDeviationFromLimit",
                "Travel Quality Index Value",
            ],
        );
        for (agent, &tq) in &idx_traffic {
            let (Some(trip), Some(agent_loss)) = (longest.get(agent), loss.per_agent.get(agent)) else {
                continue;
            };
            per_agent.push_row(vec![
                Cell::from(agent.as_str()),
                Cell::from(agent_loss.loss_secs),
                Cell::from(agent_loss.travel_secs),
                Cell::from(relative[agent]),
                Cell::from(idx_relative[agent]),
                Cell::from(agent_loss.modes_label()),
                Cell::from(trip.mode.as_str()),
                Cell::from(trip.duration_secs),
                Cell::from(trip.deviation),
                Cell::from(tq),
            ])?;
        }
        out.add_table(per_agent);

        // ── Longest-trip histograms per winning mode (minutes) ────────────
        for (mode, name) in [
            (TransportMode::Car, "travelTime_histogram_longestCarTravel"),
            (TransportMode::Ride, "travelTime_histogram_longestRideTravel"),
            (TransportMode::Pt, "travelTime_histogram_longestPtTravel"),
        ] {
            let mut table = Table::new(name, ["Person", "travTimePerAgent"]);
            for (agent, trip) in longest.iter().filter(|(_, t)| t.mode == mode.as_str()) {
                table.push_row(vec![Cell::from(agent.as_str()), Cell::from(trip.duration_secs as f64 / 60.0)])?;
            }
            out.add_table(table);
        }

        let interval_mins = config.departure_interval_mins;
        let mut departures: BTreeMap<String, f64> = BTreeMap::new();
        for trip in longest.values() {
            if let Some(dep) = trip.dep_time_secs {
                *departures.entry(interval_label(dep, interval_mins)).or_insert(0.0) += 1.0;
            }
        }
        out.add_table(interval_table(
            "travelTime_histogram_longestTripDep",
            "numberOfDepartures",
            &departures,
            interval_mins,
        )?);

        let loss_minutes: BTreeMap<String, f64> =
            loss.per_interval.iter().map(|(k, v)| (k.clone(), v / 60.0)).collect();
        out.add_table(interval_table(
            "travelTime_histogram_lossTimeDep",
            "LossMinutes",
            &loss_minutes,
            interval_mins,
        )?);

        // ── Per-mode diagnostics ──────────────────────────────────────────
        let mut per_mode = Table::new(
            "travelTime_stats_LegsLossTimePerMode",
            ["mode", "cumulative_loss_time", "failed_routings", "legs", "clamped_legs"],
        );
        for (mode, m) in &loss.per_mode {
            per_mode.push_row(vec![
                Cell::from(mode.as_str()),
                Cell::from(m.cumulative_loss_secs / 60.0),
                Cell::from(loss.tally.failed_routings(mode)),
                Cell::from(m.legs),
                Cell::from(m.clamped_legs),
            ])?;
        }
        out.add_table(per_mode);

        let mut leg_counts: BTreeMap<&str, u64> = BTreeMap::new();
        for leg in &loss.legs {
            *leg_counts.entry(leg.mode.as_str()).or_insert(0) += 1;
        }
        let mut modes = Table::new("travelTime_bar_numberOfModes", ["mode", "count"]);
        for (mode, n) in leg_counts {
            modes.push_row(vec![Cell::from(mode), Cell::from(n)])?;
        }
        out.add_table(modes);

        // ── Module tiles ──────────────────────────────────────────────────
        let median_by_mode = |mode: TransportMode| {
            median(longest.values().filter(|t| t.mode == mode.as_str()).map(|t| t.duration_secs as f64))
                .map_or_else(String::new, format_hms)
        };
        out.add_table(tile_table(
            "travelTime_tiles_overall",
            &[
                ("Traffic Quality: 50% under limit", format_percent(traffic_rank.well_within_pct())),
                ("Traffic Quality within limit", ranking_value(&traffic_rank)),
                ("Traffic Quality: 50% over limit", format_percent(traffic_rank.not_grossly_over_pct())),
            ],
        )?);
        out.add_table(tile_table(
            "travelTime_tiles_longestTrip",
            &[
                ("Longest Trip Index Value", ranking_value(&longest_rank)),
                ("Median Longest Car Trip Duration (hh:mm:ss)", median_by_mode(TransportMode::Car)),
                ("Median Longest PT Trip Duration (hh:mm:ss)", median_by_mode(TransportMode::Pt)),
                ("Median Longest Ride Trip Duration (hh:mm:ss)", median_by_mode(TransportMode::Ride)),
            ],
        )?);
        let sum_scaled: f64 = loss_time.values().map(|l| l / config.sample_size).sum();
        out.add_table(tile_table(
            "travelTime_tiles_lossTime",
            &[
                ("Loss Time Index Value", ranking_value(&relative_rank)),
                ("Mean loss time (hh:mm:ss)", mean(loss_time.values().copied()).map_or_else(String::new, format_hms)),
                ("Median loss time (hh:mm:ss)", median(loss_time.values().copied()).map_or_else(String::new, format_hms)),
                ("Sum loss time (hh:mm:ss)", format_hms(sum_scaled)),
            ],
        )?);

        // ── Map layers ────────────────────────────────────────────────────
        let crs = config.map_crs.as_str();
        out.add_map(XytMap::from_values("travelTime_XYT_agentBasedLossTime", crs, &idx_relative, &inputs.area));
        out.add_map(XytMap::from_values("travelTime_XYT_agentBasedLongestTrip", crs, &idx_longest, &inputs.area));
        out.add_map(XytMap::from_values("travelTime_XYT_agentBasedTrafficQuality", crs, &idx_traffic, &inputs.area));

        log::info!(
            "traffic quality: {} agents, {} within limit ({})",
            traffic_rank.counted,
            traffic_rank.within,
            ranking_value(&traffic_rank)
        );
        Ok(())
    }
}
