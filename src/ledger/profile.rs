use anyhow::Result;

use crate::db::{keys, load_json, save_json, StateStore};

/// Display name shown when none has been saved
pub const DEFAULT_USER_NAME: &str = "Player";

/// Saved display name, or the default
pub async fn user_name(state: &dyn StateStore) -> String {
    load_json(state, keys::USER_NAME)
        .await
        .unwrap_or_else(|| DEFAULT_USER_NAME.to_string())
}

pub async fn set_user_name(state: &dyn StateStore, name: &str) -> Result<()> {
    save_json(state, keys::USER_NAME, &name).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStateStore;

    #[tokio::test]
    async fn test_user_name_round_trip() {
        let state = MemoryStateStore::new();
        assert_eq!(user_name(&state).await, DEFAULT_USER_NAME);

        set_user_name(&state, "Sam").await.unwrap();
        assert_eq!(user_name(&state).await, "Sam");
        assert_eq!(state.load(keys::USER_NAME).await.unwrap().as_deref(), Some("\"Sam\""));
    }
}
