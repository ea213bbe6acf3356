use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::HistoryRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    SuperAdmin,
    Admin,
    #[default]
    Staff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "superadmin"),
            Role::Admin => write!(f, "admin"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

/// The operator on whose behalf a presentation surface acts.
///
/// Passed explicitly to anything that gates on identity; the relocation
/// workflow itself only needs the responsible party's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

impl Viewer {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    /// Super-admins see the whole log; everyone else sees entries they were responsible for.
    pub fn can_view(&self, record: &HistoryRecord) -> bool {
        self.role == Role::SuperAdmin || record.responsible.to_lowercase() == self.name.to_lowercase()
    }

    pub fn visible_history<'a>(
        &'a self,
        records: &'a [HistoryRecord],
    ) -> impl Iterator<Item = &'a HistoryRecord> + 'a {
        records.iter().filter(move |record| self.can_view(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlacementSnapshot;
    use chrono::Utc;

    fn record(responsible: &str) -> HistoryRecord {
        HistoryRecord {
            id: Some(1),
            exhibit: 1,
            exhibit_name: "Qilich".to_string(),
            reason: "Remont ishlari".to_string(),
            note: None,
            recorded_at: Utc::now(),
            responsible: responsible.to_string(),
            from: None,
            to: PlacementSnapshot {
                building: 1,
                building_name: "Asosiy bino".to_string(),
                floor: 1,
                room: 1,
                showcase: 1,
                shelf: 1,
            },
        }
    }

    #[test]
    fn staff_sees_own_records_case_insensitively() {
        let viewer = Viewer::new("a. karimov", Role::Staff);
        let records = vec![record("A. Karimov"), record("B. Tursunova")];

        let visible: Vec<_> = viewer.visible_history(&records).collect();

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].responsible, "A. Karimov");
    }

    #[test]
    fn superadmin_sees_everything() {
        let viewer = Viewer::new("root", Role::SuperAdmin);
        let records = vec![record("A. Karimov"), record("B. Tursunova")];
        assert_eq!(viewer.visible_history(&records).count(), 2);
    }

    #[test]
    fn admin_is_not_superadmin_for_history() {
        let viewer = Viewer::new("c. rahimov", Role::Admin);
        let records = vec![record("A. Karimov")];
        assert_eq!(viewer.visible_history(&records).count(), 0);
    }

    #[test]
    fn role_display_matches_config_spelling() {
        assert_eq!(Role::SuperAdmin.to_string(), "superadmin");
        assert_eq!(Role::Staff.to_string(), "staff");
    }
}
