//! Stored shape of a competition result.
//!
//! Results are a tagged union over the `type` key: team results carry a
//! member list and match details, individual results carry per-student
//! entries. Competition shapes vary by sport, so both forms keep unknown
//! keys in a flattened map instead of rejecting them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Division {
    Team,
    Individual,
}

impl Division {
    pub fn as_str(&self) -> &'static str {
        match self {
            Division::Team => "team",
            Division::Individual => "individual",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResultPayload {
    Team(TeamPayload),
    Individual(IndividualPayload),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamPayload {
    /// Member names, typically "姓(クラス)" free text.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualPayload {
    #[serde(default)]
    pub entries: Vec<IndividualEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualEntry {
    pub student_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Treat empty strings like missing values; free-form fields are often
/// submitted as "".
fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

impl ResultPayload {
    pub fn division(&self) -> Division {
        match self {
            ResultPayload::Team(_) => Division::Team,
            ResultPayload::Individual(_) => Division::Individual,
        }
    }

    /// Names a record is searchable by: every member of a team result, the
    /// first entry of an individual result.
    pub fn embedded_names(&self) -> Vec<&str> {
        match self {
            ResultPayload::Team(team) => team.members.iter().map(String::as_str).collect(),
            ResultPayload::Individual(ind) => ind
                .entries
                .first()
                .map(|e| e.student_name.as_str())
                .into_iter()
                .collect(),
        }
    }

    /// Score cell shown in listings: team score falling back to rank,
    /// individual result falling back to score, then rank.
    pub fn display_score(&self) -> Option<&str> {
        match self {
            ResultPayload::Team(team) => non_empty(&team.score).or(non_empty(&team.rank)),
            ResultPayload::Individual(ind) => ind.entries.first().and_then(|e| {
                non_empty(&e.result)
                    .or(non_empty(&e.score))
                    .or(non_empty(&e.rank))
            }),
        }
    }

    /// Member cell shown in listings; individual results list every entry.
    pub fn display_members(&self) -> String {
        match self {
            ResultPayload::Team(team) => team.members.join(", "),
            ResultPayload::Individual(ind) => ind
                .entries
                .iter()
                .map(|e| e.student_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn individual(entries: Vec<IndividualEntry>) -> ResultPayload {
        ResultPayload::Individual(IndividualPayload { entries })
    }

    #[test]
    fn tagged_union_round_trips() {
        let payload = ResultPayload::Team(TeamPayload {
            members: vec!["三村(3-1)".into(), "友野(3-2)".into()],
            score: Some("3-1".into()),
            ..Default::default()
        });
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "team");
        assert_eq!(serde_json::from_value::<ResultPayload>(value).unwrap(), payload);
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let value = json!({
            "type": "team",
            "members": ["三村(3-1)"],
            "court": "第2コート"
        });
        let payload: ResultPayload = serde_json::from_value(value).unwrap();
        let ResultPayload::Team(team) = &payload else {
            panic!("expected a team payload");
        };
        assert_eq!(team.extra["court"], "第2コート");
        let back = serde_json::to_value(&payload).unwrap();
        assert_eq!(back["court"], "第2コート");
    }

    #[test]
    fn division_follows_the_tag() {
        let value = json!({"type": "individual", "entries": []});
        let payload: ResultPayload = serde_json::from_value(value).unwrap();
        assert_eq!(payload.division(), Division::Individual);
        assert_eq!(payload.division().as_str(), "individual");
    }

    #[test]
    fn searchable_names_use_first_individual_entry_only() {
        let payload = individual(vec![
            IndividualEntry {
                student_name: "三田村 和真 (3M)".into(),
                ..Default::default()
            },
            IndividualEntry {
                student_name: "鈴木 一郎 (2A)".into(),
                ..Default::default()
            },
        ]);
        assert_eq!(payload.embedded_names(), vec!["三田村 和真 (3M)"]);
        // Listings still show every entry.
        assert_eq!(payload.display_members(), "三田村 和真 (3M), 鈴木 一郎 (2A)");
    }

    #[test]
    fn score_priority_for_individual_entries() {
        let payload = individual(vec![IndividualEntry {
            student_name: "三田村 和真 (3M)".into(),
            result: None,
            score: Some("3-1".into()),
            rank: Some("優勝".into()),
            ..Default::default()
        }]);
        assert_eq!(payload.display_score(), Some("3-1"));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let payload = ResultPayload::Team(TeamPayload {
            members: vec![],
            score: Some("".into()),
            rank: Some("準優勝".into()),
            ..Default::default()
        });
        assert_eq!(payload.display_score(), Some("準優勝"));
    }
}
