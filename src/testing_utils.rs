use serde_json::{Value, json};

/// Test utilities for creating mock API payloads
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Creates a basic completed game with flat team names
    pub fn create_basic_game(home_team: &str, away_team: &str) -> Value {
        json!({
            "id": 1001,
            "season": 2024,
            "seasonType": "regular",
            "startDate": "2024-01-15T19:00:00.000Z",
            "status": "final",
            "neutralSite": false,
            "conferenceGame": true,
            "homeTeamId": 150,
            "homeTeam": home_team,
            "homeConference": "ACC",
            "homePoints": 75,
            "awayTeamId": 153,
            "awayTeam": away_team,
            "awayConference": "ACC",
            "awayPoints": 70,
            "venue": "Cameron Indoor Stadium",
            "city": "Durham",
            "state": "NC"
        })
    }

    /// Creates a game the way older endpoints return it: stringly typed scores,
    /// "NULL" sentinels and nested team objects
    pub fn create_legacy_game(home_team: &str, away_team: &str) -> Value {
        json!({
            "gameId": "1002",
            "season": "2024",
            "startDate": "2024-01-20 18:30:00",
            "attendance": "NULL",
            "conferenceGame": "false",
            "homeTeam": {"id": 52, "name": home_team, "conference": "ACC"},
            "awayTeam": {"id": 2, "name": away_team, "conference": "SEC"},
            "homeScore": "68",
            "awayScore": "68"
        })
    }

    /// Creates a game carrying per-half line scores
    pub fn create_game_with_line_scores(home: &[i64], away: &[i64]) -> Value {
        let home_points: i64 = home.iter().sum();
        let away_points: i64 = away.iter().sum();
        json!({
            "id": 1003,
            "homeTeam": "Kansas",
            "awayTeam": "Baylor",
            "homePoints": home_points,
            "awayPoints": away_points,
            "homePeriodPoints": home,
            "awayPeriodPoints": away
        })
    }

    /// Creates a roster wrapper with the given player names
    pub fn create_roster(team: &str, season: i64, players: &[&str]) -> Value {
        let players: Vec<Value> = players
            .iter()
            .enumerate()
            .map(|(index, name)| {
                json!({
                    "id": 4000 + index as i64,
                    "name": name,
                    "position": "G",
                    "height": "76",
                    "startSeason": season - index as i64,
                    "hometown": {"city": "Chicago", "state": "IL", "country": "USA"}
                })
            })
            .collect();

        json!({
            "teamId": 150,
            "team": team,
            "conference": "ACC",
            "season": season,
            "players": players
        })
    }

    /// Creates a season of polls, each ranking `schools` in order
    pub fn create_rankings(season: i64, polls: &[&str], schools: &[&str]) -> Value {
        let polls: Vec<Value> = polls
            .iter()
            .map(|poll| {
                let ranks: Vec<Value> = schools
                    .iter()
                    .enumerate()
                    .map(|(index, school)| {
                        json!({"ranking": index + 1, "school": school, "points": 1500 - 25 * index as i64})
                    })
                    .collect();
                json!({"poll": poll, "week": 10, "ranks": ranks})
            })
            .collect();

        json!([{"season": season, "seasonType": "regular", "polls": polls}])
    }

    /// Creates an adjusted efficiency rating record
    pub fn create_rating(school: &str, wins: i64, losses: i64) -> Value {
        json!({
            "season": 2024,
            "team": school,
            "conference": "Big 12",
            "netRating": "24.5",
            "offensiveRating": 120.1,
            "defensiveRating": 95.6,
            "tempo": 68.2,
            "wins": wins,
            "losses": losses
        })
    }

    /// Creates a game wrapper with one betting line per provider
    pub fn create_lines(home_score: i64, away_score: i64, providers: &[(&str, f64, f64)]) -> Value {
        let lines: Vec<Value> = providers
            .iter()
            .map(|(provider, spread, over_under)| {
                json!({"provider": provider, "spread": spread.to_string(), "overUnder": over_under})
            })
            .collect();

        json!([{
            "gameId": 2001,
            "season": 2024,
            "homeTeam": "Houston",
            "awayTeam": "Iowa State",
            "homeScore": home_score,
            "awayScore": away_score,
            "lines": lines
        }])
    }

    /// Creates a play-by-play wrapper for one game
    pub fn create_plays(plays: &[(i64, &str, i64, i64)]) -> Value {
        let plays: Vec<Value> = plays
            .iter()
            .enumerate()
            .map(|(index, (period, clock, home, away))| {
                json!({
                    "id": 90000 + index as i64,
                    "period": period,
                    "clock": clock,
                    "homeScore": home,
                    "awayScore": away,
                    "playType": "JumpShot",
                    "scoringPlay": "true"
                })
            })
            .collect();

        json!({
            "gameId": 3001,
            "season": 2024,
            "homeTeam": "Purdue",
            "awayTeam": "Indiana",
            "plays": plays
        })
    }

    /// Creates a team record
    pub fn create_team(id: i64, school: &str, conference: &str) -> Value {
        json!({
            "id": id,
            "school": school,
            "mascot": "NULL",
            "abbreviation": school.chars().take(4).collect::<String>().to_uppercase(),
            "conference": conference
        })
    }

    /// Creates a venue record with a nested location
    pub fn create_venue(name: &str, capacity: &str) -> Value {
        json!({
            "id": 77,
            "name": name,
            "capacity": capacity,
            "indoor": "true",
            "location": {"city": "Durham", "state": "NC", "country": "USA"}
        })
    }

    /// Creates a season stat line with nested shooting splits
    pub fn create_player_stats(name: &str, games: i64, points: i64) -> Value {
        json!({
            "season": 2024,
            "team": "Duke",
            "athleteId": 5001,
            "name": name,
            "games": games,
            "points": points,
            "rebounds": {"offensive": 40, "defensive": 110, "total": 150},
            "assists": 60,
            "fieldGoals": {"made": "150", "attempted": "300"}
        })
    }

    /// Creates a game boxscore with team totals and one player line per name
    pub fn create_boxscore(home: (&str, i64), away: (&str, i64), players: &[&str]) -> Value {
        let side = |(team, points): (&str, i64)| {
            json!({
                "team": team,
                "points": points,
                "fieldGoals": {"made": points / 3, "attempted": "60"},
                "rebounds": {"offensive": 9, "defensive": 25, "total": 34},
                "turnovers": {"total": 11}
            })
        };
        let lines: Vec<Value> = players
            .iter()
            .enumerate()
            .map(|(index, name)| {
                json!({
                    "player": {"id": 6000 + index as i64, "name": name, "position": "G"},
                    "starter": index < 5,
                    "minutes": "31",
                    "points": 12,
                    "fieldGoals": {"made": 5, "attempted": 10}
                })
            })
            .collect();

        json!({
            "gameId": 4001,
            "season": 2024,
            "homeTeam": side(home),
            "awayTeam": side(away),
            "homePlayers": lines,
            "awayPlayers": []
        })
    }

    /// Creates a payload mixing valid records with malformed entries
    pub fn create_malformed_mix() -> Value {
        json!([
            {"id": 1, "school": "Duke", "conference": "ACC"},
            "not a record",
            null,
            42,
            {"id": 2, "school": "UNC", "conference": "ACC"}
        ])
    }
}
