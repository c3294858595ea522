//! Edge-cost policies used to diversify the planned routes.
//!
//! Each request runs the search once per [`CostPolicy`]. All policies share
//! the great-circle distance heuristic; it is a lower bound on the fastest
//! policy's cost, and since every policy's cost is at least the edge distance
//! for risk >= 1 it never overestimates on the other scales either. The
//! risk-weighted results are still best-effort: edge distances are published
//! estimates, not certified lengths.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::SeaGraph;
use crate::network::{NodeIndex, SeaEdge};

/// Multiplier applied to risk values above 1.0 by the safest policy when
/// high-risk avoidance is requested.
pub const HIGH_RISK_AMPLIFICATION: f64 = 10.0;

/// Distance scaling applied by the safest policy when high-risk avoidance is requested.
pub const SAFETY_DISTANCE_SCALE: f64 = 5.0;

/// Fraction of the excess risk charged by the economical policy.
pub const ECONOMICAL_RISK_SURCHARGE: f64 = 0.5;

/// Caller-supplied options that shape edge costs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    /// Strongly steer the safest route away from hazardous chokepoints.
    pub avoid_high_risk: bool,
    /// Inflates the fastest route's cost; 0 disables it.
    pub weather_penalty: f64,
}

impl RouteOptions {
    pub fn avoiding_high_risk(mut self) -> Self {
        self.avoid_high_risk = true;
        self
    }

    pub fn with_weather_penalty(mut self, penalty: f64) -> Self {
        self.weather_penalty = penalty;
        self
    }

    /// Options with a non-negative, finite weather penalty.
    pub fn normalized(&self) -> Self {
        let weather_penalty = if self.weather_penalty.is_finite() {
            self.weather_penalty.max(0.0)
        } else {
            0.0
        };
        Self {
            avoid_high_risk: self.avoid_high_risk,
            weather_penalty,
        }
    }
}

/// Closed set of route cost strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostPolicy {
    /// Shortest distance, optionally inflated by weather.
    Fastest,
    /// Distance weighted heavily by risk.
    Safest,
    /// Distance with a moderate risk surcharge.
    Economical,
}

impl CostPolicy {
    /// Policies in the order their routes are reported.
    pub const ALL: [CostPolicy; 3] = [
        CostPolicy::Fastest,
        CostPolicy::Safest,
        CostPolicy::Economical,
    ];

    /// Cost of traversing `edge` under this policy.
    pub fn edge_cost(self, edge: &SeaEdge, options: &RouteOptions) -> f64 {
        let distance = edge.distance_nm;
        let risk = edge.risk;
        match self {
            CostPolicy::Fastest => distance * (1.0 + options.weather_penalty),
            CostPolicy::Safest if options.avoid_high_risk => {
                let amplified = if risk > 1.0 {
                    risk * HIGH_RISK_AMPLIFICATION
                } else {
                    risk
                };
                distance * SAFETY_DISTANCE_SCALE * amplified
            }
            CostPolicy::Safest => distance * risk * risk,
            CostPolicy::Economical => distance * (1.0 + (risk - 1.0) * ECONOMICAL_RISK_SURCHARGE),
        }
    }

    /// Lower-bound estimate of the remaining cost from `node` to `goal`.
    pub fn heuristic(self, graph: &SeaGraph, node: NodeIndex, goal: NodeIndex) -> f64 {
        graph
            .node(node)
            .coordinate
            .distance_nm(&graph.node(goal).coordinate)
    }

    /// Stable identifier used for the route `id` field.
    pub fn id(self) -> &'static str {
        match self {
            CostPolicy::Fastest => "fastest",
            CostPolicy::Safest => "safest",
            CostPolicy::Economical => "economical",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CostPolicy::Fastest => "Fastest Route",
            CostPolicy::Safest => "Safest Route",
            CostPolicy::Economical => "Economical Route",
        }
    }

    /// Rendering color hint.
    pub fn color(self) -> &'static str {
        match self {
            CostPolicy::Fastest => "#2563eb",
            CostPolicy::Safest => "#16a34a",
            CostPolicy::Economical => "#f59e0b",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            CostPolicy::Fastest => "Shortest sea-lane distance between the selected ports.",
            CostPolicy::Safest => {
                "Prefers lanes away from high-risk chokepoints, accepting extra distance."
            }
            CostPolicy::Economical => {
                "Balances directness against a moderate surcharge for hazardous lanes."
            }
        }
    }
}

impl fmt::Display for CostPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(distance_nm: f64, risk: f64) -> SeaEdge {
        SeaEdge {
            from: 0,
            to: 1,
            distance_nm,
            risk,
            geometry: None,
        }
    }

    #[test]
    fn fastest_ignores_risk_and_scales_with_weather() {
        let options = RouteOptions::default();
        assert_eq!(CostPolicy::Fastest.edge_cost(&edge(100.0, 3.0), &options), 100.0);

        let stormy = RouteOptions::default().with_weather_penalty(0.5);
        assert_eq!(CostPolicy::Fastest.edge_cost(&edge(100.0, 1.0), &stormy), 150.0);
    }

    #[test]
    fn safest_amplifies_only_hazardous_edges_when_avoiding() {
        let options = RouteOptions::default().avoiding_high_risk();
        assert_eq!(CostPolicy::Safest.edge_cost(&edge(100.0, 1.0), &options), 500.0);
        assert_eq!(
            CostPolicy::Safest.edge_cost(&edge(100.0, 2.0), &options),
            100.0 * 5.0 * 20.0
        );
    }

    #[test]
    fn safest_without_avoidance_squares_risk() {
        let options = RouteOptions::default();
        assert_eq!(CostPolicy::Safest.edge_cost(&edge(100.0, 2.0), &options), 400.0);
        assert_eq!(CostPolicy::Safest.edge_cost(&edge(100.0, 1.0), &options), 100.0);
    }

    #[test]
    fn economical_charges_half_the_excess_risk() {
        let options = RouteOptions::default();
        assert_eq!(CostPolicy::Economical.edge_cost(&edge(100.0, 3.0), &options), 200.0);
        assert_eq!(CostPolicy::Economical.edge_cost(&edge(100.0, 1.0), &options), 100.0);
    }

    #[test]
    fn every_policy_cost_is_at_least_distance() {
        let options = [
            RouteOptions::default(),
            RouteOptions::default().avoiding_high_risk(),
            RouteOptions::default().with_weather_penalty(2.0),
        ];
        for policy in CostPolicy::ALL {
            for opts in &options {
                for risk in [1.0, 1.2, 3.5] {
                    assert!(policy.edge_cost(&edge(42.0, risk), opts) >= 42.0);
                }
            }
        }
    }

    #[test]
    fn normalized_options_clamp_weather_penalty() {
        let negative = RouteOptions::default().with_weather_penalty(-1.0).normalized();
        assert_eq!(negative.weather_penalty, 0.0);
        let nan = RouteOptions::default().with_weather_penalty(f64::NAN).normalized();
        assert_eq!(nan.weather_penalty, 0.0);
    }

    #[test]
    fn policy_identifiers_are_distinct() {
        let ids: Vec<_> = CostPolicy::ALL.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["fastest", "safest", "economical"]);
        assert_eq!(CostPolicy::Safest.to_string(), "safest");
    }
}
