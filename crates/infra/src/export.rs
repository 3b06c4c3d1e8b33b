//! Guidance-record CSV export of a filtered result list.
//!
//! Excel on Windows needs the UTF-8 BOM to pick the right encoding, and the
//! school office opens these files there, so the byte stream is BOM + CRLF.

use chrono::{Datelike, NaiveDate};

use crate::models::CompetitionResultRow;
use crate::payload::ResultPayload;

const UTF8_BOM: &str = "\u{feff}";

const HEADER: [&str; 5] = ["大会日", "生徒名/クラス", "大会名", "成績・結果", "備考・特別賞"];

fn escape_field(value: &str) -> String {
    if value.contains('"') || value.contains(',') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn format_date(date: NaiveDate) -> String {
    format!("{}/{:02}/{:02}", date.year(), date.month(), date.day())
}

/// Name cell: the first entry for individual results, the joined member list
/// for team results.
fn name_cell(payload: &ResultPayload) -> String {
    match payload {
        ResultPayload::Individual(ind) => ind
            .entries
            .first()
            .map(|e| e.student_name.clone())
            .unwrap_or_default(),
        ResultPayload::Team(team) => team.members.join(", "),
    }
}

/// Result cell: individual result/score/rank in priority order, team rank
/// followed by the round reached.
fn result_cell(payload: &ResultPayload) -> String {
    match payload {
        ResultPayload::Individual(_) => payload.display_score().unwrap_or_default().to_owned(),
        ResultPayload::Team(team) => {
            let parts: Vec<&str> = [team.rank.as_deref(), team.round.as_deref()]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .collect();
            parts.join(" ")
        }
    }
}

/// Render one row per result, fixed column order, CRLF separated.
pub fn results_to_csv(results: &[CompetitionResultRow]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push(HEADER.join(","));
    for result in results {
        let fields = [
            format_date(result.display_date()),
            name_cell(result.payload()),
            result.competition_name.clone().unwrap_or_default(),
            result_cell(result.payload()),
            result.special_prizes.clone().unwrap_or_default(),
        ];
        let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        lines.push(escaped.join(","));
    }
    format!("{UTF8_BOM}{}", lines.join("\r\n"))
}
