//! End-to-end pipeline tests
//!
//! These run the full orchestrator + worker pool against a wiremock site
//! shaped like vlr.gg and assert on the run report and the produced dataset.

use std::path::PathBuf;
use vlr_scout::config::Config;
use vlr_scout::crawler::{run_crawl, SkipUnit};
use vlr_scout::{Dataset, ScoutError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestEnv {
    config: Config,
    dataset_path: PathBuf,
    _dir: tempfile::TempDir,
}

fn test_env(host: &str) -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let dataset_path = dir.path().join("dataset.json");

    let mut config = Config::default();
    config.crawler.workers = 3;
    config.crawler.fetch_delay_ms = 10;
    config.crawler.retrieve_timeout_secs = 10;
    config.crawler.retry_attempts = 2;
    config.crawler.retry_backoff_ms = 10;
    config.crawler.request_timeout_secs = 5;
    config.site.host = host.to_string();
    config.site.user_agent = "TestScout/1.0".to_string();
    config.output.dataset_path = dataset_path.display().to_string();
    config.output.audit_log_path = dir.path().join("audit.txt").display().to_string();

    TestEnv {
        config,
        dataset_path,
        _dir: dir,
    }
}

fn rankings_index(regions: &[&str]) -> String {
    let links: String = regions
        .iter()
        .map(|r| format!(r#"<a href="/rankings/{}">{}</a>"#, r, r))
        .collect();
    format!("<html><body>{}</body></html>", links)
}

fn ranking_page(region: &str, team_paths: &[&str]) -> String {
    let links: String = team_paths
        .iter()
        .map(|p| format!(r#"<a class="rank-item-team" href="{}">team</a>"#, p))
        .collect();
    format!(
        r#"<html><body><h1 class="wf-title">Valorant Team Rankings: {}</h1>{}</body></html>"#,
        region, links
    )
}

fn team_page(name: &str, id: &str) -> String {
    format!(
        r#"<html><body>
        <h1 class="wf-title">{name}</h1>
        <div class="team-roster-item"><div class="team-roster-item-name-alias">p1</div></div>
        <div class="team-roster-item"><div class="team-roster-item-name-alias">p2</div></div>
        <div class="team-roster-item">
            <div class="team-roster-item-name-alias">the-coach</div>
            <div class="team-roster-item-name-role">coach</div>
        </div>
        <a href="/team/matches/{id}/x/">Matches</a>
        <a href="/team/stats/{id}/x/">Stats</a>
        </body></html>"#
    )
}

fn matchlist_page() -> String {
    r#"<html><body>
    <a class="m-item">
        <div class="m-item-date">2026/08/14</div>
        <div class="m-item-event">Champions Tour</div>
        <div class="m-item-team mod-right"><span class="m-item-team-name">Rival</span></div>
        <div class="m-item-result mod-win"><span>2</span>:<span>1</span></div>
    </a>
    </body></html>"#
        .to_string()
}

fn stats_page() -> String {
    r#"<html><body><table class="wf-table">
    <thead><tr><th>Map</th><th>WIN%</th><th>ATK RWin%</th><th>DEF RWin%</th></tr></thead>
    <tbody>
        <tr><td>Ascent (10)</td><td>60%</td><td>52%</td><td>48%</td></tr>
    </tbody>
    </table></body></html>"#
        .to_string()
}

async fn mount_page(server: &MockServer, url_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(url_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a complete team: profile, matchlist, stats.
async fn mount_team(server: &MockServer, id: &str, name: &str) {
    mount_page(server, &format!("/team/{}/x", id), team_page(name, id)).await;
    mount_page(server, &format!("/team/matches/{}/x/", id), matchlist_page()).await;
    mount_page(server, &format!("/team/stats/{}/x/", id), stats_page()).await;
}

#[tokio::test]
async fn full_crawl_assembles_ranked_teams() {
    let server = MockServer::start().await;
    mount_page(&server, "/rankings", rankings_index(&["europe"])).await;
    mount_page(
        &server,
        "/rankings/europe",
        ranking_page("Europe", &["/team/1001/x", "/team/2002/x"]),
    )
    .await;
    mount_team(&server, "1001", "Alpha").await;
    mount_team(&server, "2002", "Beta").await;

    let env = test_env(&server.uri());
    let report = run_crawl(env.config).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.regions_crawled, 1);
    assert_eq!(report.teams_added, 2);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&env.dataset_path).unwrap()).unwrap();
    assert_eq!(json["count"], 2);

    let teams = json["teams"].as_array().unwrap();
    assert_eq!(teams[0]["id"], "1001");
    assert_eq!(teams[0]["name"], "Alpha");
    assert_eq!(teams[0]["rank"], 1);
    assert_eq!(teams[0]["region"], "Europe");
    assert_eq!(teams[0]["coach"], "the-coach");
    assert_eq!(teams[0]["recent_results"][0]["outcome"], "win");
    assert_eq!(teams[0]["map_stats"][0]["map"], "Ascent");
    assert_eq!(teams[1]["id"], "2002");
    assert_eq!(teams[1]["rank"], 2);
}

#[tokio::test]
async fn failing_region_is_skipped_not_fatal() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/rankings",
        rankings_index(&["europe", "north-america"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/rankings/europe"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/rankings/north-america",
        ranking_page("North America", &["/team/3003/x"]),
    )
    .await;
    mount_team(&server, "3003", "Gamma").await;

    let env = test_env(&server.uri());
    let report = run_crawl(env.config).await.unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.teams_added, 1);
    assert_eq!(report.skips.len(), 1);
    assert_eq!(report.skips[0].unit, SkipUnit::Region);
    assert!(report.skips[0].reason.contains("HTTP 500"));

    let dataset = Dataset::open(&env.dataset_path).unwrap();
    assert!(dataset.has_team("3003"));
}

#[tokio::test]
async fn empty_region_is_not_an_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/rankings", rankings_index(&["oceania"])).await;
    mount_page(&server, "/rankings/oceania", ranking_page("Oceania", &[])).await;

    let env = test_env(&server.uri());
    let report = run_crawl(env.config).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.regions_crawled, 1);
    assert_eq!(report.teams_added, 0);
}

#[tokio::test]
async fn known_team_skips_subpage_fetches() {
    let server = MockServer::start().await;
    mount_page(&server, "/rankings", rankings_index(&["europe"])).await;
    mount_page(
        &server,
        "/rankings/europe",
        ranking_page("Europe", &["/team/1001/x"]),
    )
    .await;
    mount_page(&server, "/team/1001/x", team_page("Alpha", "1001")).await;
    // The team is already in the dataset, so its sub-pages must never be hit.
    Mock::given(method("GET"))
        .and(path("/team/matches/1001/x/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/team/stats/1001/x/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let env = test_env(&server.uri());
    std::fs::write(
        &env.dataset_path,
        r#"{"teams":[{"id":"1001","name":"Alpha","players":[],"coach":null,
            "region":"Europe","rank":1,"recent_results":[],"map_stats":[],"urls":[]}],
            "count":1}"#,
    )
    .unwrap();

    let report = run_crawl(env.config).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.teams_added, 0);
    assert_eq!(report.teams_already_present, 1);

    let dataset = Dataset::open(&env.dataset_path).unwrap();
    assert_eq!(dataset.len(), 1);
}

#[tokio::test]
async fn failing_team_is_skipped_within_region() {
    let server = MockServer::start().await;
    mount_page(&server, "/rankings", rankings_index(&["europe"])).await;
    mount_page(
        &server,
        "/rankings/europe",
        ranking_page("Europe", &["/team/1001/x", "/team/2002/x"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/team/1001/x"))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;
    mount_team(&server, "2002", "Beta").await;

    let env = test_env(&server.uri());
    let report = run_crawl(env.config).await.unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.skips.len(), 1);
    assert_eq!(report.skips[0].unit, SkipUnit::Team);
    assert_eq!(report.teams_added, 1);

    // The surviving team keeps its listing rank.
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&env.dataset_path).unwrap()).unwrap();
    assert_eq!(json["teams"][0]["id"], "2002");
    assert_eq!(json["teams"][0]["rank"], 2);
}

#[tokio::test]
async fn bootstrap_failure_aborts_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rankings"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let env = test_env(&server.uri());
    let result = run_crawl(env.config).await;

    assert!(matches!(result, Err(ScoutError::Bootstrap { .. })));
}
