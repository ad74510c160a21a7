use crate::db::user_store::UserStore;
use crate::error::Result;
use crate::models::{NameLengthPolicy, UserView};

/// Reads the snapshot and derives the display-only fields.
pub struct ViewService {
    user_store: UserStore,
    policy: NameLengthPolicy,
}

impl ViewService {
    pub fn new(user_store: UserStore, policy: NameLengthPolicy) -> Self {
        Self { user_store, policy }
    }

    pub async fn load(&self) -> Result<Vec<UserView>> {
        let users = self.user_store.get_all_users().await?;
        Ok(users
            .into_iter()
            .map(|user| UserView::derive(user, self.policy))
            .collect())
    }

    pub async fn load_one(&self, id: i64) -> Result<UserView> {
        let user = self.user_store.get_user_by_id(id).await?;
        Ok(UserView::derive(user, self.policy))
    }
}
