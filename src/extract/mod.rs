//! vlr.gg page extractors
//!
//! Pure functions over raw page bodies. Each returns the structured paths or
//! fields the orchestrator needs, or an [`ExtractError`] when the expected
//! structure is absent. The pipeline treats an extraction error exactly like
//! a fetch failure: the enclosing region or team is skipped.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;

/// A page did not contain the structure an extractor expected
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing element '{0}'")]
    Missing(&'static str),

    #[error("Empty field '{0}'")]
    Empty(&'static str),

    #[error("Malformed value in '{field}': {value}")]
    Malformed { field: &'static str, value: String },
}

/// Teams and region label extracted from one regional ranking page
#[derive(Debug, Clone)]
pub struct RankingPage {
    /// Human-readable region label, e.g. "Europe"
    pub region: String,

    /// Team profile paths in listing (= ranking) order
    pub team_paths: Vec<String>,
}

/// Identity fields from a team profile page
#[derive(Debug, Clone)]
pub struct TeamIdentity {
    pub name: String,
    pub players: Vec<String>,
    pub coach: Option<String>,
}

/// One recent match from a team's matchlist page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub date: String,
    pub event: String,
    pub opponent: String,
    /// Overall score as listed, e.g. "2:0"
    pub score: String,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Loss,
}

/// Per-map statistics from a team's stats page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapStats {
    pub map: String,
    /// Map win percentage, 0-100
    pub win_pct: f32,
    /// Attack-side round win percentage, 0-100
    pub atk_round_pct: f32,
    /// Defense-side round win percentage, 0-100
    pub def_round_pct: f32,
}

fn selector(css: &'static str) -> Selector {
    // All selectors in this module are literals; a parse failure is a typo
    // caught by the unit tests below.
    Selector::parse(css).expect(css)
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts the per-region ranking paths from the rankings index page.
///
/// Returns every distinct `/rankings/<region>` link in document order.
pub fn region_ranking_paths(html: &str) -> Result<Vec<String>, ExtractError> {
    let document = Html::parse_document(html);
    let anchors = selector("a[href]");

    let mut paths: Vec<String> = Vec::new();
    for element in document.select(&anchors) {
        if let Some(href) = element.value().attr("href") {
            if href.starts_with("/rankings/") && !paths.iter().any(|p| p.as_str() == href) {
                paths.push(href.to_string());
            }
        }
    }

    if paths.is_empty() {
        return Err(ExtractError::Missing("a[href^='/rankings/']"));
    }
    Ok(paths)
}

/// Extracts the region label and ranked team paths from a ranking page.
///
/// `limit` caps how many teams are taken from the top of the listing. An
/// empty listing is not an error; a missing region title is.
pub fn ranking_page(html: &str, limit: usize) -> Result<RankingPage, ExtractError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&selector("h1.wf-title"))
        .next()
        .map(text_of)
        .ok_or(ExtractError::Missing("h1.wf-title"))?;

    // Titles read "Valorant Team Rankings: Europe"; keep the region part.
    let region = title
        .rsplit(':')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ExtractError::Empty("region title"))?
        .to_string();

    let team_paths = document
        .select(&selector("a.rank-item-team[href]"))
        .filter_map(|e| e.value().attr("href"))
        .map(str::to_string)
        .take(limit)
        .collect();

    Ok(RankingPage { region, team_paths })
}

/// Extracts name, roster, and coach from a team profile page.
pub fn team_page(html: &str) -> Result<TeamIdentity, ExtractError> {
    let document = Html::parse_document(html);

    let name = document
        .select(&selector("h1.wf-title"))
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty())
        .ok_or(ExtractError::Missing("h1.wf-title"))?;

    let alias_selector = selector(".team-roster-item-name-alias");
    let role_selector = selector(".team-roster-item-name-role");

    let mut players = Vec::new();
    let mut coach = None;
    for item in document.select(&selector(".team-roster-item")) {
        let alias = match item.select(&alias_selector).next().map(text_of) {
            Some(a) if !a.is_empty() => a,
            _ => continue,
        };
        let role = item
            .select(&role_selector)
            .next()
            .map(text_of)
            .unwrap_or_default();

        if role.to_lowercase().contains("coach") {
            coach.get_or_insert(alias);
        } else {
            players.push(alias);
        }
    }

    Ok(TeamIdentity {
        name,
        players,
        coach,
    })
}

/// Extracts the matchlist-page path from a team profile page.
pub fn matchlist_path(html: &str) -> Result<String, ExtractError> {
    first_href(html, "a[href^='/team/matches/']")
}

/// Extracts the stats-page path from a team profile page.
pub fn stats_path(html: &str) -> Result<String, ExtractError> {
    first_href(html, "a[href^='/team/stats/']")
}

fn first_href(html: &str, css: &'static str) -> Result<String, ExtractError> {
    let document = Html::parse_document(html);
    document
        .select(&selector(css))
        .next()
        .and_then(|e| e.value().attr("href"))
        .map(str::to_string)
        .ok_or(ExtractError::Missing(css))
}

/// Extracts recent match results from a matchlist page.
///
/// Items missing any field are skipped; an empty matchlist yields an empty
/// vector, not an error.
pub fn recent_results(html: &str) -> Result<Vec<MatchResult>, ExtractError> {
    let document = Html::parse_document(html);
    let result_selector = selector(".m-item-result");
    let date_selector = selector(".m-item-date");
    let event_selector = selector(".m-item-event");
    let opponent_selector = selector(".m-item-team.mod-right .m-item-team-name");

    let mut results = Vec::new();
    for item in document.select(&selector(".m-item")) {
        let result = match item.select(&result_selector).next() {
            Some(r) => r,
            None => continue,
        };
        let score = text_of(result);
        let outcome = if result.value().classes().any(|c| c == "mod-win") {
            MatchOutcome::Win
        } else {
            MatchOutcome::Loss
        };

        results.push(MatchResult {
            date: item
                .select(&date_selector)
                .next()
                .map(text_of)
                .unwrap_or_default(),
            event: item
                .select(&event_selector)
                .next()
                .map(text_of)
                .unwrap_or_default(),
            opponent: item
                .select(&opponent_selector)
                .next()
                .map(text_of)
                .unwrap_or_default(),
            score,
            outcome,
        });
    }

    Ok(results)
}

/// Extracts per-map statistics from a team stats page.
///
/// Columns are located by header label so reordered tables keep working.
pub fn map_stats(html: &str) -> Result<Vec<MapStats>, ExtractError> {
    let document = Html::parse_document(html);
    let header_selector = selector("table.wf-table th");
    let row_selector = selector("table.wf-table tbody tr");
    let cell_selector = selector("td");

    let headers: Vec<String> = document
        .select(&header_selector)
        .map(|h| text_of(h).to_uppercase())
        .collect();

    let win_idx = column_index(&headers, "WIN%")?;
    let atk_idx = column_index(&headers, "ATK")?;
    let def_idx = column_index(&headers, "DEF")?;

    let mut stats = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row.select(&cell_selector).map(text_of).collect();
        if cells.len() <= win_idx.max(atk_idx).max(def_idx) {
            continue;
        }

        let map = cells[0]
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        if map.is_empty() {
            continue;
        }

        stats.push(MapStats {
            map,
            win_pct: parse_pct("WIN%", &cells[win_idx])?,
            atk_round_pct: parse_pct("ATK", &cells[atk_idx])?,
            def_round_pct: parse_pct("DEF", &cells[def_idx])?,
        });
    }

    Ok(stats)
}

fn column_index(headers: &[String], label: &'static str) -> Result<usize, ExtractError> {
    // Exact match first: "ATK RWIN%" would otherwise shadow "WIN%".
    headers
        .iter()
        .position(|h| h.as_str() == label)
        .or_else(|| headers.iter().position(|h| h.contains(label)))
        .ok_or(ExtractError::Missing(label))
}

fn parse_pct(field: &'static str, value: &str) -> Result<f32, ExtractError> {
    value
        .trim()
        .trim_end_matches('%')
        .parse::<f32>()
        .map_err(|_| ExtractError::Malformed {
            field,
            value: value.to_string(),
        })
}

/// Parses the numeric team id out of a team path, e.g. `/team/1001/heretics`.
///
/// The id is the first run of digits in the path.
pub fn team_id_from_path(path: &str) -> Result<String, ExtractError> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern"));

    digits
        .find(path)
        .map(|m| m.as_str().to_string())
        .ok_or(ExtractError::Malformed {
            field: "team path",
            value: path.to_string(),
        })
}
