//! The logged-in user for the open workspace.
//!
//! A `Session` is created when a workspace is opened (picking up whatever
//! pointer was persisted last time) and lives in the daemon state. Starting
//! and ending a session writes through to the store's session pointer.

use crate::model::User;
use crate::store::{KvBackend, RecordStore, StoreError};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    /// Read the persisted pointer. A pointer to a deleted user is kept as is;
    /// it simply resolves to no user.
    pub fn restore<B: KvBackend>(store: &RecordStore<B>) -> Result<Self, StoreError> {
        Ok(Self {
            user_id: store.current_user_id()?,
        })
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn begin<B: KvBackend>(
        &mut self,
        store: &mut RecordStore<B>,
        user_id: &str,
    ) -> Result<(), StoreError> {
        store.set_current_user(Some(user_id))?;
        self.user_id = Some(user_id.to_string());
        tracing::info!(user_id, "session started");
        Ok(())
    }

    pub fn end<B: KvBackend>(&mut self, store: &mut RecordStore<B>) -> Result<(), StoreError> {
        store.set_current_user(None)?;
        if let Some(prev) = self.user_id.take() {
            tracing::info!(user_id = %prev, "session ended");
        }
        Ok(())
    }

    pub fn current_user<B: KvBackend>(
        &self,
        store: &RecordStore<B>,
    ) -> Result<Option<User>, StoreError> {
        match self.user_id.as_deref() {
            Some(id) => store.user_by_id(id),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewUser, Role};
    use crate::store::MemoryKv;

    fn store_with_user() -> (RecordStore<MemoryKv>, String) {
        let mut store = RecordStore::new(MemoryKv::default());
        let id = store
            .create_user(NewUser {
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
                role: Role::Student,
                name: "A".to_string(),
                student_id: None,
                teacher_id: None,
            })
            .unwrap();
        (store, id)
    }

    #[test]
    fn begin_persists_pointer_and_restore_reads_it() {
        let (mut store, id) = store_with_user();
        let mut session = Session::restore(&store).unwrap();
        assert_eq!(session.user_id(), None);

        session.begin(&mut store, &id).unwrap();
        assert_eq!(session.current_user(&store).unwrap().unwrap().id, id);

        let restored = Session::restore(&store).unwrap();
        assert_eq!(restored, session);
        assert_eq!(store.current_user().unwrap().unwrap().id, id);
    }

    #[test]
    fn end_clears_both_sides() {
        let (mut store, id) = store_with_user();
        let mut session = Session::default();
        session.begin(&mut store, &id).unwrap();
        session.end(&mut store).unwrap();

        assert_eq!(session.user_id(), None);
        assert_eq!(session.current_user(&store).unwrap(), None);
        assert_eq!(store.current_user_id().unwrap(), None);
    }

    #[test]
    fn dangling_pointer_resolves_to_nobody() {
        let (mut store, _) = store_with_user();
        store.set_current_user(Some("gone")).unwrap();
        let session = Session::restore(&store).unwrap();
        assert_eq!(session.user_id(), Some("gone"));
        assert_eq!(session.current_user(&store).unwrap(), None);
    }
}
