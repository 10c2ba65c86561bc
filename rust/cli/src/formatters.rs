//! Plain-text rendering of arena reports.
//!
//! ```rust
//! use tessera_cli::formatters::format_percent;
//!
//! assert_eq!(format_percent(0.5), "50.0%");
//! ```

use tessera_engine::arena::{ArenaReport, MatchupReport, PlayerStats};

pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", 100.0 * rate)
}

/// `min..max`, or `-` when no game completed.
pub fn format_score_range(stats: &PlayerStats) -> String {
    match (stats.score_min, stats.score_max) {
        (Some(min), Some(max)) => format!("{}..{}", min, max),
        _ => "-".to_string(),
    }
}

/// Heading naming the strategies of one matchup.
pub fn format_matchup_title(report: &MatchupReport) -> String {
    let names: Vec<&str> = report.stats.iter().map(|s| s.player.as_str()).collect();
    let mut title = names.join(" vs ");
    title.push_str(&format!(" ({} games", report.games));
    if report.aborts > 0 {
        title.push_str(&format!(", {} aborted", report.aborts));
    }
    title.push(')');
    title
}

const HEADER: [&str; 9] = [
    "player", "games", "wins", "draws", "losses", "win%", "mean", "sd", "range",
];

fn stats_row(stats: &PlayerStats) -> [String; 9] {
    [
        stats.player.clone(),
        stats.games.to_string(),
        stats.wins.to_string(),
        stats.draws.to_string(),
        stats.losses.to_string(),
        format_percent(stats.win_rate()),
        format!("{:.2}", stats.mean_score()),
        format!("{:.2}", stats.score_stddev()),
        format_score_range(stats),
    ]
}

/// Aligned table, first column left-justified, the rest right-justified.
pub fn format_stats_table(rows: &[PlayerStats], with_forfeits: bool) -> String {
    let mut cells: Vec<Vec<String>> = vec![HEADER.iter().map(|h| h.to_string()).collect()];
    for stats in rows {
        cells.push(stats_row(stats).to_vec());
    }
    if with_forfeits {
        cells[0].push("first".into());
        cells[0].push("forfeits".into());
        for (row, stats) in cells.iter_mut().skip(1).zip(rows) {
            row.push(stats.first_seat.to_string());
            row.push(stats.forfeits.to_string());
        }
    }

    let columns = cells[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| cells.iter().map(|r| r[c].len()).max().unwrap_or(0))
        .collect();

    let mut text = String::new();
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(c, cell)| {
                if c == 0 {
                    format!("{:<w$}", cell, w = widths[c])
                } else {
                    format!("{:>w$}", cell, w = widths[c])
                }
            })
            .collect();
        text.push_str(line.join("  ").trim_end());
        text.push('\n');
    }
    text
}

/// Full report: one table per matchup, then the roster totals.
pub fn format_report(report: &ArenaReport) -> String {
    let mut text = String::new();
    for matchup in &report.matchups {
        text.push_str(&format_matchup_title(matchup));
        text.push('\n');
        text.push_str(&format_stats_table(&matchup.stats, false));
        text.push('\n');
    }
    text.push_str(&format!(
        "Totals ({} mode, {} games, {} aborted)\n",
        report.mode,
        report.total_games(),
        report.total_aborts()
    ));
    text.push_str(&format_stats_table(&report.totals, true));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_engine::arena::ArenaMode;

    fn stats(player: &str, games: u32, wins: u32) -> PlayerStats {
        PlayerStats {
            player: player.into(),
            games,
            wins,
            losses: games - wins,
            score_sum: 10 * games as u64,
            score_sum_sq: 100 * games as u64,
            score_min: Some(10),
            score_max: Some(10),
            ..PlayerStats::default()
        }
    }

    #[test]
    fn score_range_without_games() {
        assert_eq!(format_score_range(&PlayerStats::default()), "-");
        assert_eq!(format_score_range(&stats("fl", 2, 1)), "10..10");
    }

    #[test]
    fn matchup_title_mentions_aborts_only_when_present() {
        let mut m = MatchupReport {
            players: vec![0, 1],
            games: 4,
            aborts: 0,
            stats: vec![stats("fl", 4, 3), stats("r", 4, 1)],
        };
        assert_eq!(format_matchup_title(&m), "fl vs r (4 games)");
        m.aborts = 2;
        assert_eq!(format_matchup_title(&m), "fl vs r (4 games, 2 aborted)");
    }

    #[test]
    fn table_is_aligned() {
        let table = format_stats_table(&[stats("fl", 4, 3), stats("mc:16", 4, 1)], true);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("player"));
        assert!(lines[0].ends_with("forfeits"));
        assert!(lines[1].contains("75.0%"));
        assert!(lines[2].starts_with("mc:16"));
        assert_eq!(lines[1].len(), lines[2].len());
    }

    #[test]
    fn report_ends_with_totals() {
        let report = ArenaReport {
            mode: ArenaMode::Pairs,
            matchups: vec![MatchupReport {
                players: vec![0, 1],
                games: 2,
                aborts: 0,
                stats: vec![stats("fl", 2, 1), stats("r", 2, 1)],
            }],
            totals: vec![stats("fl", 2, 1), stats("r", 2, 1)],
        };
        let text = format_report(&report);
        assert!(text.starts_with("fl vs r (2 games)"));
        assert!(text.contains("Totals (pairs mode, 2 games, 0 aborted)"));
    }
}
