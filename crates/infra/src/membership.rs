//! Club membership slots.
//!
//! Every student owns two ordered club slots: a primary and a secondary
//! (兼部). Invariant: the primary is never empty while the secondary is
//! occupied, and the two slots never hold the same club.
//!
//! The planners below are pure: they map the current slot pair and a target
//! club to the slot pair that should be written, or `None` when the student
//! must not be touched. The batch operations in `repos::students` apply them
//! one student at a time.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MembershipError {
    #[error("club name must not be empty")]
    EmptyClubName,
    #[error("no students selected")]
    NoStudents,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubSlots {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl ClubSlots {
    /// Build from the stored columns; blank strings mean "unassigned".
    pub fn from_columns(club_name: &str, club_name_2: Option<&str>) -> Self {
        Self {
            primary: normalize(club_name),
            secondary: club_name_2.and_then(normalize),
        }
    }

    pub fn holds(&self, club: &str) -> bool {
        self.primary.as_deref() == Some(club) || self.secondary.as_deref() == Some(club)
    }

    /// Value written back to the NOT NULL primary column.
    pub fn primary_column(&self) -> &str {
        self.primary.as_deref().unwrap_or("")
    }

    pub fn secondary_column(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    /// Primary empty implies secondary empty; occupied slots are distinct.
    pub fn invariant_holds(&self) -> bool {
        match (&self.primary, &self.secondary) {
            (None, Some(_)) => false,
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }
}

/// Put `club` into the first free slot. `None` when the student already
/// belongs to the club or both slots are taken (never evicts).
pub fn plan_assign(current: &ClubSlots, club: &str) -> Option<ClubSlots> {
    if current.holds(club) {
        return None;
    }
    match (&current.primary, &current.secondary) {
        (None, _) => Some(ClubSlots {
            primary: Some(club.to_owned()),
            secondary: current.secondary.clone(),
        }),
        (Some(_), None) => Some(ClubSlots {
            primary: current.primary.clone(),
            secondary: Some(club.to_owned()),
        }),
        (Some(_), Some(_)) => None,
    }
}

/// Drop `club` from whichever slot holds it. Removing the primary promotes
/// the secondary into its place. `None` when the student is not a member.
pub fn plan_remove(current: &ClubSlots, club: &str) -> Option<ClubSlots> {
    if current.primary.as_deref() == Some(club) {
        Some(ClubSlots {
            primary: current.secondary.clone(),
            secondary: None,
        })
    } else if current.secondary.as_deref() == Some(club) {
        Some(ClubSlots {
            primary: current.primary.clone(),
            secondary: None,
        })
    } else {
        None
    }
}

/// Overwrite the slot holding `from` with `to`; the sibling slot is left
/// as-is. `None` when `from` is in neither slot.
pub fn plan_change(current: &ClubSlots, from: &str, to: &str) -> Option<ClubSlots> {
    if current.primary.as_deref() == Some(from) {
        Some(ClubSlots {
            primary: Some(to.to_owned()),
            secondary: current.secondary.clone(),
        })
    } else if current.secondary.as_deref() == Some(from) {
        Some(ClubSlots {
            primary: current.primary.clone(),
            secondary: Some(to.to_owned()),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(primary: &str, secondary: &str) -> ClubSlots {
        ClubSlots::from_columns(primary, Some(secondary))
    }

    #[test]
    fn blank_columns_mean_unassigned() {
        let s = ClubSlots::from_columns("  ", None);
        assert_eq!(s, ClubSlots::default());
        assert_eq!(s.primary_column(), "");
        assert!(s.invariant_holds());
    }

    #[test]
    fn assign_fills_primary_first() {
        let planned = plan_assign(&slots("", ""), "卓球部").unwrap();
        assert_eq!(planned.primary.as_deref(), Some("卓球部"));
        assert_eq!(planned.secondary, None);
    }

    #[test]
    fn assign_fills_secondary_when_primary_taken() {
        let planned = plan_assign(&slots("卓球部", ""), "吹奏楽部").unwrap();
        assert_eq!(planned.primary.as_deref(), Some("卓球部"));
        assert_eq!(planned.secondary.as_deref(), Some("吹奏楽部"));
    }

    #[test]
    fn assign_is_an_idempotent_skip_for_members() {
        assert_eq!(plan_assign(&slots("卓球部", ""), "卓球部"), None);
        assert_eq!(plan_assign(&slots("吹奏楽部", "卓球部"), "卓球部"), None);
    }

    #[test]
    fn assign_never_evicts() {
        assert_eq!(plan_assign(&slots("卓球部", "吹奏楽部"), "美術部"), None);
    }

    #[test]
    fn removing_primary_promotes_secondary() {
        let planned = plan_remove(&slots("卓球部", "吹奏楽部"), "卓球部").unwrap();
        assert_eq!(planned.primary.as_deref(), Some("吹奏楽部"));
        assert_eq!(planned.secondary, None);
        assert!(planned.invariant_holds());
    }

    #[test]
    fn removing_sole_primary_empties_both() {
        let planned = plan_remove(&slots("卓球部", ""), "卓球部").unwrap();
        assert_eq!(planned, ClubSlots::default());
    }

    #[test]
    fn removing_secondary_keeps_primary() {
        let planned = plan_remove(&slots("卓球部", "吹奏楽部"), "吹奏楽部").unwrap();
        assert_eq!(planned.primary.as_deref(), Some("卓球部"));
        assert_eq!(planned.secondary, None);
    }

    #[test]
    fn remove_is_a_noop_for_non_members() {
        assert_eq!(plan_remove(&slots("卓球部", ""), "美術部"), None);
    }

    #[test]
    fn change_rewrites_only_the_matching_slot() {
        let planned = plan_change(&slots("卓球部", "吹奏楽部"), "吹奏楽部", "美術部").unwrap();
        assert_eq!(planned.primary.as_deref(), Some("卓球部"));
        assert_eq!(planned.secondary.as_deref(), Some("美術部"));

        assert_eq!(plan_change(&slots("卓球部", ""), "美術部", "吹奏楽部"), None);
    }

    #[test]
    fn change_does_not_inspect_the_sibling_slot() {
        // Deliberately unchecked: renaming into the sibling's club produces a
        // duplicate pair. Callers that care must validate beforehand.
        let planned = plan_change(&slots("卓球部", "吹奏楽部"), "卓球部", "吹奏楽部").unwrap();
        assert_eq!(planned.primary.as_deref(), Some("吹奏楽部"));
        assert_eq!(planned.secondary.as_deref(), Some("吹奏楽部"));
        assert!(!planned.invariant_holds());
    }

    #[test]
    fn two_joiners_then_one_leaver() {
        let mut a = ClubSlots::default();
        let mut b = ClubSlots::default();
        a = plan_assign(&a, "卓球部").unwrap();
        b = plan_assign(&b, "卓球部").unwrap();
        assert_eq!(a.primary.as_deref(), Some("卓球部"));
        assert_eq!(b.primary.as_deref(), Some("卓球部"));

        a = plan_remove(&a, "卓球部").unwrap();
        assert_eq!(a, ClubSlots::default());
        assert_eq!(b.primary.as_deref(), Some("卓球部"));
    }

    #[test]
    fn slot_invariant_survives_operation_sequences() {
        let mut current = ClubSlots::default();
        let steps: Vec<Box<dyn Fn(&ClubSlots) -> Option<ClubSlots>>> = vec![
            Box::new(|s| plan_assign(s, "卓球部")),
            Box::new(|s| plan_assign(s, "吹奏楽部")),
            Box::new(|s| plan_remove(s, "卓球部")),
            Box::new(|s| plan_assign(s, "美術部")),
            Box::new(|s| plan_change(s, "美術部", "演劇部")),
            Box::new(|s| plan_remove(s, "演劇部")),
            Box::new(|s| plan_remove(s, "吹奏楽部")),
        ];
        for step in steps {
            if let Some(next) = step(&current) {
                current = next;
            }
            assert!(current.invariant_holds(), "violated at {current:?}");
        }
        assert_eq!(current, ClubSlots::default());
    }
}
