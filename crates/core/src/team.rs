//! Team Budget Manager
//!
//! Summarizes a roster against the team's budget: totals, extrema, average
//! price and a per-role head count.

use serde::Serialize;
use serde_json::Value;

use crate::aggregate::{first_max_by, first_min_by, rounded_average, Tally};
use crate::error::{parse_document, Outcome, PipelineError};
use crate::schema::{self, filter_rows, Field, Filtered, Kind, Schema};

pub const TEAM: Schema = Schema {
    name: "team",
    fields: &[
        Field::required("budget", Kind::PositiveNumber),
        Field::optional("name", Kind::Text),
    ],
};

pub const PLAYER: Schema = Schema {
    name: "player",
    fields: &[
        Field::required("name", Kind::Text),
        Field::required("role", Kind::Text),
        Field::required("price", Kind::NonNegativeNumber),
    ],
};

/// A player row that passed [`PLAYER`]
#[derive(Debug, Clone, PartialEq)]
pub struct Player<'a> {
    pub name: &'a str,
    pub role: &'a str,
    pub price: f64,
    /// The original record, returned as-is for extrema
    pub record: &'a Value,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamBudgetSummary {
    pub team_name: String,
    pub total_spent: f64,
    pub remaining: f64,
    pub player_count: usize,
    pub costliest_player: Value,
    pub cheapest_player: Value,
    pub average_price: i64,
    pub by_role: Tally<u64>,
    pub is_over_budget: bool,
}

/// Keep the players that conform to [`PLAYER`]
pub fn filter_players(players: &[Value]) -> Filtered<Player<'_>> {
    filter_rows(players, |record| {
        let map = PLAYER.check(record)?;
        Ok(Player {
            name: schema::text(map, "name").unwrap_or_default(),
            role: schema::text(map, "role").unwrap_or_default(),
            price: schema::number(map, "price").unwrap_or_default(),
            record,
        })
    })
}

/// Summarize a roster against its team budget
pub fn summarize_team_budget(team: &Value, players: &Value) -> Outcome<TeamBudgetSummary> {
    let team_map = TEAM
        .check(team)
        .map_err(|v| PipelineError::malformed(TEAM.name, v))?;
    let rows = schema::rows(players, "players")
        .map_err(|v| PipelineError::malformed("players", v))?;

    let budget = schema::number(team_map, "budget").unwrap_or_default();
    let team_name = schema::text(team_map, "name").unwrap_or_default().to_string();

    let players = filter_players(rows).kept;
    let (Some(costliest), Some(cheapest)) = (
        first_max_by(&players, |p| p.price),
        first_min_by(&players, |p| p.price),
    ) else {
        return Err(PipelineError::NoValidRows {
            container: "players",
        });
    };

    let total_spent: f64 = players.iter().map(|p| p.price).sum();

    let mut by_role = Tally::new();
    for player in &players {
        by_role.count(player.role);
    }

    Ok(TeamBudgetSummary {
        team_name,
        total_spent,
        remaining: budget - total_spent,
        player_count: players.len(),
        costliest_player: costliest.record.clone(),
        cheapest_player: cheapest.record.clone(),
        average_price: rounded_average(total_spent, players.len()),
        by_role,
        is_over_budget: total_spent > budget,
    })
}

/// Parse `{ "team": {...}, "players": [...] }` and summarize it
pub fn summarize_team_budget_json(input: &str) -> Outcome<TeamBudgetSummary> {
    let document = parse_document(input)?;
    summarize_team_budget(&document["team"], &document["players"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Violation;
    use serde_json::json;

    fn roster() -> Value {
        json!([
            {"name": "Avery", "role": "offense", "price": 1200},
            {"name": "Blake", "role": "defense", "price": 1500},
            {"name": "Casey", "role": "offense", "price": 900},
            {"name": "Devon", "role": "goalie", "price": 1500},
            {"name": "Emery", "role": "defense", "price": 900}
        ])
    }

    #[test]
    fn test_summarize_team_budget_basic() {
        let team = json!({"name": "BOS", "budget": 9000});
        let summary = summarize_team_budget(&team, &roster()).unwrap();

        assert_eq!(summary.team_name, "BOS");
        assert_eq!(summary.total_spent, 6000.0);
        assert_eq!(summary.remaining, 3000.0);
        assert_eq!(summary.player_count, 5);
        assert_eq!(summary.average_price, 1200);
        assert!(!summary.is_over_budget);
    }

    #[test]
    fn test_extrema_ties_keep_first_player() {
        let team = json!({"name": "BOS", "budget": 9000});
        let summary = summarize_team_budget(&team, &roster()).unwrap();

        assert_eq!(summary.costliest_player["name"], "Blake");
        assert_eq!(summary.cheapest_player["name"], "Casey");
        // Full record is returned, not just the price
        assert_eq!(summary.cheapest_player["role"], "offense");
    }

    #[test]
    fn test_by_role_counts_in_first_seen_order() {
        let team = json!({"name": "BOS", "budget": 9000});
        let summary = summarize_team_budget(&team, &roster()).unwrap();

        let roles: Vec<(&str, u64)> = summary.by_role.iter().collect();
        assert_eq!(
            roles,
            vec![("offense", 2), ("defense", 2), ("goalie", 1)]
        );
    }

    #[test]
    fn test_over_budget() {
        let team = json!({"name": "NYC", "budget": 5000});
        let summary = summarize_team_budget(&team, &roster()).unwrap();

        assert!(summary.is_over_budget);
        assert_eq!(summary.remaining, -1000.0);
    }

    #[test]
    fn test_exactly_on_budget_is_not_over() {
        let team = json!({"name": "NYC", "budget": 6000});
        let summary = summarize_team_budget(&team, &roster()).unwrap();
        assert!(!summary.is_over_budget);
        assert_eq!(summary.remaining, 0.0);
    }

    #[test]
    fn test_average_rounds_half_away_from_zero() {
        let team = json!({"budget": 100});
        let players = json!([
            {"name": "A", "role": "x", "price": 1},
            {"name": "B", "role": "x", "price": 2}
        ]);
        let summary = summarize_team_budget(&team, &players).unwrap();
        assert_eq!(summary.average_price, 2);
        assert_eq!(summary.team_name, "");
    }

    #[test]
    fn test_invalid_players_are_skipped() {
        let team = json!({"name": "BOS", "budget": 9000});
        let players = json!([
            {"name": "Avery", "role": "offense", "price": 1200},
            {"name": "Ghost", "role": "offense"},
            {"name": "Minus", "role": "defense", "price": -5},
            "not a player",
            {"name": "Blake", "role": "defense", "price": 800}
        ]);

        let summary = summarize_team_budget(&team, &players).unwrap();
        assert_eq!(summary.player_count, 2);
        assert_eq!(summary.total_spent, 2000.0);
        assert_eq!(summary.cheapest_player["name"], "Blake");

        let rows = players.as_array().unwrap();
        let rejected: Vec<usize> = filter_players(rows)
            .rejected
            .iter()
            .map(|r| r.index)
            .collect();
        assert_eq!(rejected, vec![1, 2, 3]);
    }

    #[test]
    fn test_all_players_invalid_fails() {
        let team = json!({"name": "BOS", "budget": 9000});
        let players = json!([{"name": "Ghost"}]);

        assert_eq!(
            summarize_team_budget(&team, &players),
            Err(PipelineError::NoValidRows {
                container: "players"
            })
        );
    }

    #[test]
    fn test_team_validation() {
        let players = roster();

        let not_object = summarize_team_budget(&json!("BOS"), &players).unwrap_err();
        assert_eq!(
            not_object,
            PipelineError::malformed("team", Violation::NotAnObject)
        );

        for budget in [json!(0), json!(-100), json!("9000")] {
            let team = json!({"name": "BOS", "budget": budget});
            assert!(summarize_team_budget(&team, &players).is_err());
        }

        let missing = json!({"name": "BOS"});
        assert_eq!(
            summarize_team_budget(&missing, &players),
            Err(PipelineError::malformed("team", Violation::Missing("budget")))
        );
    }

    #[test]
    fn test_players_validation() {
        let team = json!({"name": "BOS", "budget": 9000});

        assert_eq!(
            summarize_team_budget(&team, &json!([])),
            Err(PipelineError::malformed("players", Violation::Empty("players")))
        );
        assert_eq!(
            summarize_team_budget(&team, &json!({"name": "Avery"})),
            Err(PipelineError::malformed("players", Violation::NotASequence))
        );
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let team = json!({"name": "BOS", "budget": 9000});
        let players = roster();
        let before = players.clone();

        let first = summarize_team_budget(&team, &players).unwrap();
        let second = summarize_team_budget(&team, &players).unwrap();

        assert_eq!(first, second);
        assert_eq!(players, before);
    }

    #[test]
    fn test_summarize_team_budget_json() {
        let input = r#"{
            "team": {"name": "BOS", "budget": 3000},
            "players": [{"name": "Avery", "role": "offense", "price": 1200}]
        }"#;
        let summary = summarize_team_budget_json(input).unwrap();
        assert_eq!(summary.remaining, 1800.0);

        let output = serde_json::to_value(&summary).unwrap();
        assert_eq!(output["teamName"], "BOS");
        assert_eq!(output["byRole"], json!({"offense": 1}));
        assert_eq!(output["isOverBudget"], false);
    }

    #[test]
    fn test_summarize_team_budget_json_missing_sections() {
        assert!(matches!(
            summarize_team_budget_json(r#"{"players": []}"#),
            Err(PipelineError::Malformed {
                container: "team",
                ..
            })
        ));
        assert!(matches!(
            summarize_team_budget_json("[1,"),
            Err(PipelineError::InvalidJson(_))
        ));
    }
}
