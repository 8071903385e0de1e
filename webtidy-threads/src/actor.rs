//! Participants in the thread service.
//!
//! `User` and `Admin` live in one module so admin equality can reach
//! the user's private id. Neither exposes its fields.

use webtidy_types::{ThreadId, UserId};

use crate::client::{ThreadClient, ThreadError};

/// A participant identified by id alone.
///
/// Equality is identity: two users are equal exactly when their ids
/// are. The comparison is typed to `User` only, so comparing against an
/// [`Admin`] is rejected at compile time rather than answered at
/// runtime:
///
/// ```compile_fail
/// use webtidy_threads::{Admin, User};
/// use webtidy_types::UserId;
///
/// let user = User::new(UserId::new(1));
/// let admin = Admin::new(UserId::new(1));
/// assert_eq!(user, admin);
/// ```
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self { id }
    }

    /// Open a thread through `client` and return the id it was given.
    pub async fn open_thread(
        &self,
        client: &ThreadClient,
        title: &str,
        content: &str,
    ) -> Result<ThreadId, ThreadError> {
        client.create_thread(title, content).await
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}

/// A user carrying privilege strings. Only admins may close threads.
///
/// Equality still compares ids alone; privileges never participate.
#[derive(Debug, Clone)]
pub struct Admin {
    user: User,
    privileges: Vec<String>,
}

impl Admin {
    pub fn new(id: UserId) -> Self {
        Self::with_privileges(id, Vec::new())
    }

    pub fn with_privileges(id: UserId, privileges: Vec<String>) -> Self {
        Self {
            user: User::new(id),
            privileges,
        }
    }

    pub fn has_privilege(&self, name: &str) -> bool {
        self.privileges.iter().any(|p| p == name)
    }

    /// Open a thread, same as any user.
    pub async fn open_thread(
        &self,
        client: &ThreadClient,
        title: &str,
        content: &str,
    ) -> Result<ThreadId, ThreadError> {
        self.user.open_thread(client, title, content).await
    }

    /// Close a thread. Not available on [`User`].
    pub async fn close_thread(
        &self,
        client: &ThreadClient,
        thread_id: ThreadId,
    ) -> Result<(), ThreadError> {
        client.close_thread(thread_id).await
    }
}

impl PartialEq for Admin {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
    }
}

impl Eq for Admin {}
