//! Dashboard view over a fetched result list: keyword search, dropdown
//! filters, and the distinct option sets the dropdowns are populated from.
//!
//! Everything here is a single pass over an in-memory list the primary query
//! already narrowed (one club, one year). Facets are recomputed per request
//! rather than indexed; result sets are small enough that O(n) is fine.

use std::collections::BTreeSet;

use crate::models::CompetitionResultRow;

#[derive(Debug, Clone, Default)]
pub struct ResultSearch {
    /// Case-insensitive substring match against embedded names.
    pub keyword: Option<String>,
    pub club: Option<String>,
    pub class_label: Option<String>,
    pub student: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultFacets {
    pub clubs: Vec<String>,
    pub classes: Vec<String>,
    pub students: Vec<String>,
}

#[derive(Debug)]
pub struct DashboardView {
    pub results: Vec<CompetitionResultRow>,
    pub facets: ResultFacets,
}

/// Last parenthesized group of a member name, used as its class label:
/// "三田村 和真 (3M)" -> "3M". Names without one carry no class.
pub fn class_label(name: &str) -> Option<&str> {
    let open = name.rfind('(')?;
    let rest = &name[open + 1..];
    let close = rest.find(')')?;
    let label = rest[..close].trim();
    (!label.is_empty()).then_some(label)
}

fn matches_keyword(row: &CompetitionResultRow, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();
    row.payload()
        .embedded_names()
        .iter()
        .any(|name| name.to_lowercase().contains(&needle))
}

fn derive_facets(rows: &[CompetitionResultRow]) -> ResultFacets {
    let mut clubs = BTreeSet::new();
    let mut classes = BTreeSet::new();
    let mut students = BTreeSet::new();
    for row in rows {
        clubs.insert(row.club_name.clone());
        for name in row.payload().embedded_names() {
            if let Some(label) = class_label(name) {
                classes.insert(label.to_owned());
            }
            students.insert(name.to_owned());
        }
    }
    ResultFacets {
        clubs: clubs.into_iter().collect(),
        classes: classes.into_iter().collect(),
        students: students.into_iter().collect(),
    }
}

fn matches_dropdowns(row: &CompetitionResultRow, search: &ResultSearch) -> bool {
    if let Some(club) = &search.club {
        if &row.club_name != club {
            return false;
        }
    }
    let names = row.payload().embedded_names();
    if let Some(label) = &search.class_label {
        if !names.iter().any(|n| class_label(n) == Some(label)) {
            return false;
        }
    }
    if let Some(student) = &search.student {
        if !names.iter().any(|n| n == student) {
            return false;
        }
    }
    true
}

/// Apply the keyword filter, derive the facet option sets from what is left,
/// then apply the dropdown selections. Facets deliberately ignore the
/// dropdowns so each option list reflects the keyword search only.
pub fn build_dashboard(rows: Vec<CompetitionResultRow>, search: &ResultSearch) -> DashboardView {
    let keyword = search
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    let keyword_filtered: Vec<CompetitionResultRow> = match keyword {
        Some(kw) => rows.into_iter().filter(|r| matches_keyword(r, kw)).collect(),
        None => rows,
    };

    let facets = derive_facets(&keyword_filtered);

    let results = keyword_filtered
        .into_iter()
        .filter(|r| matches_dropdowns(r, search))
        .collect();

    DashboardView { results, facets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{IndividualEntry, IndividualPayload, ResultPayload, TeamPayload};
    use chrono::{TimeZone, Utc};
    use sqlx::types::Json;
    use uuid::Uuid;

    fn row(club: &str, payload: ResultPayload) -> CompetitionResultRow {
        let now = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap();
        CompetitionResultRow {
            id: Uuid::new_v4(),
            profile_id: None,
            club_name: club.to_owned(),
            competition_name: Some("市民大会".to_owned()),
            division: payload.division().as_str().to_owned(),
            payload: Json(payload),
            special_prizes: None,
            date: None,
            end_date: None,
            is_signboard_requested: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn individual(name: &str) -> ResultPayload {
        ResultPayload::Individual(IndividualPayload {
            entries: vec![IndividualEntry {
                student_name: name.to_owned(),
                ..Default::default()
            }],
        })
    }

    fn team(members: &[&str]) -> ResultPayload {
        ResultPayload::Team(TeamPayload {
            members: members.iter().map(|m| (*m).to_owned()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn class_label_takes_the_last_parenthesized_group() {
        assert_eq!(class_label("三田村 和真 (3M)"), Some("3M"));
        assert_eq!(class_label("佐藤(旧姓) 花子 (2A)"), Some("2A"));
        assert_eq!(class_label("三田村 和真"), None);
        assert_eq!(class_label("三田村 ()"), None);
    }

    #[test]
    fn keyword_matches_any_embedded_name() {
        let rows = vec![
            row("卓球部", individual("三田村 和真 (3M)")),
            row("卓球部", individual("鈴木 一郎 (2A)")),
        ];
        let search = ResultSearch {
            keyword: Some("3M".into()),
            ..Default::default()
        };
        let view = build_dashboard(rows, &search);
        assert_eq!(view.results.len(), 1);
        assert_eq!(
            view.results[0].payload().embedded_names(),
            vec!["三田村 和真 (3M)"]
        );
    }

    #[test]
    fn keyword_is_case_insensitive_and_blank_is_identity() {
        let rows = vec![row("卓球部", individual("三田村 和真 (3M)"))];
        let lowered = build_dashboard(rows.clone(), &ResultSearch {
            keyword: Some("3m".into()),
            ..Default::default()
        });
        assert_eq!(lowered.results.len(), 1);

        let blank = build_dashboard(rows, &ResultSearch {
            keyword: Some("   ".into()),
            ..Default::default()
        });
        assert_eq!(blank.results.len(), 1);
    }

    #[test]
    fn facets_are_deduplicated_and_sorted() {
        let rows = vec![
            row("卓球部", individual("三田村 和真 (3M)")),
            row("卓球部", individual("鈴木 一郎 (3M)")),
            row("吹奏楽部", team(&["伊藤(1B)", "佐藤(2A)"])),
        ];
        let view = build_dashboard(rows, &ResultSearch::default());
        assert_eq!(view.facets.clubs, vec!["卓球部", "吹奏楽部"]);
        assert_eq!(view.facets.classes, vec!["1B", "2A", "3M"]);
        assert_eq!(
            view.facets.students,
            vec![
                "三田村 和真 (3M)",
                "伊藤(1B)",
                "佐藤(2A)",
                "鈴木 一郎 (3M)"
            ]
        );
    }

    #[test]
    fn facets_reflect_keyword_but_not_dropdowns() {
        let rows = vec![
            row("卓球部", individual("三田村 和真 (3M)")),
            row("吹奏楽部", individual("三田 蘭 (1B)")),
            row("美術部", individual("鈴木 一郎 (2A)")),
        ];
        let search = ResultSearch {
            keyword: Some("三田".into()),
            club: Some("卓球部".into()),
            ..Default::default()
        };
        let view = build_dashboard(rows, &search);
        // Dropdown narrowed the rows to one club...
        assert_eq!(view.results.len(), 1);
        assert_eq!(view.results[0].club_name, "卓球部");
        // ...but the options still span every keyword match.
        assert_eq!(view.facets.clubs, vec!["卓球部", "吹奏楽部"]);
    }

    #[test]
    fn dropdowns_are_and_combined() {
        let rows = vec![
            row("卓球部", team(&["三村(3-1)", "友野(3-2)"])),
            row("卓球部", team(&["三村(3-1)"])),
        ];
        let search = ResultSearch {
            class_label: Some("3-2".into()),
            student: Some("三村(3-1)".into()),
            ..Default::default()
        };
        let view = build_dashboard(rows, &search);
        assert_eq!(view.results.len(), 1);
        assert_eq!(
            view.results[0].payload().embedded_names(),
            vec!["三村(3-1)", "友野(3-2)"]
        );
    }

    #[test]
    fn student_dropdown_is_an_exact_match() {
        let rows = vec![row("卓球部", team(&["三村(3-1)"]))];
        let miss = build_dashboard(rows.clone(), &ResultSearch {
            student: Some("三村".into()),
            ..Default::default()
        });
        assert!(miss.results.is_empty());

        let hit = build_dashboard(rows, &ResultSearch {
            student: Some("三村(3-1)".into()),
            ..Default::default()
        });
        assert_eq!(hit.results.len(), 1);
    }
}
