//! User account entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, Timestamp, UserId};
use crate::domain::notification::NotificationSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

/// A platform account.
///
/// The password digest never serializes; API layers can hand the whole
/// struct to serde without leaking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_no: Option<String>,
    pub phone: String,
    pub department: String,
    pub major: String,
    pub avatar: String,
    pub skills: Vec<String>,
    pub settings: NotificationSettings,
    pub status: AccountStatus,
    pub created_at: Timestamp,
}

impl UserAccount {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(major) = patch.major {
            self.major = major;
        }
        if let Some(skills) = patch.skills {
            self.skills = skills;
        }
        if let Some(settings) = patch.settings {
            self.settings = settings;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
    }
}

/// Partial account update; admin-only fields (`status`, `role`) are
/// stripped by the profile handler before it applies a self-update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub major: Option<String>,
    pub skills: Option<Vec<String>>,
    pub settings: Option<NotificationSettings>,
    pub status: Option<AccountStatus>,
    pub role: Option<Role>,
}

impl UserPatch {
    /// Drops the fields only admins may change.
    pub fn self_service(mut self) -> Self {
        self.status = None;
        self.role = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount {
            id: UserId::new("u-1").unwrap(),
            username: "2252001".to_string(),
            password_hash: "digest".to_string(),
            role: Role::Student,
            name: "An Nguyen".to_string(),
            email: "an@example.edu".to_string(),
            student_no: Some("2252001".to_string()),
            phone: String::new(),
            department: "Computer Science".to_string(),
            major: "Software Engineering".to_string(),
            avatar: "/avatars/default.png".to_string(),
            skills: vec![],
            settings: NotificationSettings::default(),
            status: AccountStatus::Active,
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn password_hash_never_serializes() {
        let json = serde_json::to_value(account()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "2252001");
    }

    #[test]
    fn apply_patch_touches_only_supplied_fields() {
        let mut acc = account();
        acc.apply(UserPatch {
            phone: Some("0901234567".to_string()),
            ..Default::default()
        });
        assert_eq!(acc.phone, "0901234567");
        assert_eq!(acc.name, "An Nguyen");
    }

    #[test]
    fn self_service_strips_privileged_fields() {
        let patch = UserPatch {
            name: Some("New Name".to_string()),
            role: Some(Role::Admin),
            status: Some(AccountStatus::Inactive),
            ..Default::default()
        }
        .self_service();

        assert!(patch.role.is_none());
        assert!(patch.status.is_none());
        assert_eq!(patch.name.as_deref(), Some("New Name"));
    }
}
