//! In-memory implementation of UserDirectory.
//!
//! Backs tests and demo mode with a seeded set of accounts; the PostgreSQL
//! adapter is the production path.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::adapters::auth::hash_password;
use crate::domain::foundation::{DomainError, ErrorCode, Role, Timestamp, UserId};
use crate::domain::notification::NotificationSettings;
use crate::domain::user::{AccountStatus, UserAccount, UserPatch};
use crate::ports::UserDirectory;

/// Password every demo account accepts.
pub const DEMO_PASSWORD: &str = "password123";

static DEMO_ACCOUNTS: Lazy<Vec<UserAccount>> = Lazy::new(|| {
    let hash = hash_password(DEMO_PASSWORD);
    let account = |id: &str,
                   username: &str,
                   role: Role,
                   name: &str,
                   student_no: Option<&str>,
                   department: &str,
                   skills: &[&str]| UserAccount {
        id: UserId::new(id).expect("demo id"),
        username: username.to_string(),
        password_hash: hash.clone(),
        role,
        name: name.to_string(),
        email: format!("{}@tutorlink.example.edu", username),
        student_no: student_no.map(str::to_string),
        phone: String::new(),
        department: department.to_string(),
        major: String::new(),
        avatar: "/avatars/default.png".to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        settings: NotificationSettings::default(),
        status: AccountStatus::Active,
        created_at: Timestamp::now(),
    };

    vec![
        account("admin-1", "admin", Role::Admin, "Platform Admin", None, "", &[]),
        account(
            "t-1",
            "dchen",
            Role::Tutor,
            "Dr. Chen",
            None,
            "Computer Science",
            &["Databases", "Data Structures"],
        ),
        account(
            "t-2",
            "hpham",
            Role::Tutor,
            "Hanh Pham",
            None,
            "Computer Science",
            &["Algorithms", "Web Development"],
        ),
        account(
            "s-1",
            "an.nguyen",
            Role::Student,
            "An Nguyen",
            Some("2252001"),
            "Computer Science",
            &[],
        ),
        account(
            "s-2",
            "binh.le",
            Role::Student,
            "Binh Le",
            Some("2252002"),
            "Mechanical Engineering",
            &[],
        ),
    ]
});

/// Guarded-map account directory.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory seeded with the demo roster (one admin, two tutors,
    /// two students, all accepting [`DEMO_PASSWORD`]).
    pub fn with_demo_accounts() -> Self {
        let dir = Self::new();
        {
            let mut accounts = dir.accounts.try_write().expect("fresh lock");
            for account in DEMO_ACCOUNTS.iter() {
                accounts.insert(account.id.clone(), account.clone());
            }
        }
        dir
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.accounts.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, DomainError> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<UserAccount>, DomainError> {
        let accounts = self.accounts.read().await;
        let mut result: Vec<UserAccount> = accounts.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn search(
        &self,
        query: &str,
        exclude: &UserId,
        limit: usize,
    ) -> Result<Vec<UserAccount>, DomainError> {
        let query = query.to_lowercase();
        let accounts = self.accounts.read().await;
        let mut result: Vec<UserAccount> = accounts
            .values()
            .filter(|a| &a.id != exclude && a.is_active())
            .filter(|a| {
                query.is_empty()
                    || format!("{} {} {}", a.name, a.username, a.email)
                        .to_lowercase()
                        .contains(&query)
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        result.truncate(limit);
        Ok(result)
    }

    async fn create(&self, account: UserAccount) -> Result<UserAccount, DomainError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.username == account.username) {
            return Err(DomainError::new(
                ErrorCode::Duplicate,
                "Username already exists",
            ));
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<UserAccount, DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("User"))?;
        account.apply(patch);
        Ok(account.clone())
    }

    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("User"))?;
        account.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        self.accounts
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("User"))
    }

    async fn list_tutors(&self) -> Result<Vec<UserAccount>, DomainError> {
        let accounts = self.accounts.read().await;
        let mut result: Vec<UserAccount> = accounts
            .values()
            .filter(|a| a.role == Role::Tutor && a.is_active())
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::verify_password;

    #[tokio::test]
    async fn demo_directory_contains_all_roles() {
        let dir = InMemoryUserDirectory::with_demo_accounts();
        let tutors = dir.list_tutors().await.unwrap();
        assert_eq!(tutors.len(), 2);

        let admin = dir
            .find_by_username("admin")
            .await
            .unwrap()
            .expect("admin seeded");
        assert_eq!(admin.role, Role::Admin);
        assert!(verify_password(DEMO_PASSWORD, &admin.password_hash));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_username() {
        let dir = InMemoryUserDirectory::with_demo_accounts();
        let mut clone = dir.find_by_username("dchen").await.unwrap().unwrap();
        clone.id = UserId::new("t-99").unwrap();

        let result = dir.create(clone).await;
        assert!(matches!(result, Err(e) if e.code == ErrorCode::Duplicate));
    }

    #[tokio::test]
    async fn search_excludes_caller_and_inactive() {
        let dir = InMemoryUserDirectory::with_demo_accounts();
        dir.update(
            &UserId::new("s-2").unwrap(),
            UserPatch {
                status: Some(AccountStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let hits = dir
            .search("", &UserId::new("s-1").unwrap(), 50)
            .await
            .unwrap();
        assert!(hits.iter().all(|a| a.id.as_str() != "s-1"));
        assert!(hits.iter().all(|a| a.id.as_str() != "s-2"));
    }

    #[tokio::test]
    async fn search_matches_name_username_email() {
        let dir = InMemoryUserDirectory::with_demo_accounts();
        let exclude = UserId::new("admin-1").unwrap();

        assert_eq!(dir.search("chen", &exclude, 50).await.unwrap().len(), 1);
        assert_eq!(dir.search("an.nguyen", &exclude, 50).await.unwrap().len(), 1);
        assert!(dir.search("zzz", &exclude, 50).await.unwrap().is_empty());
    }
}
