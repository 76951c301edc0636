use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};

use crate::errors::ClientError;
use crate::models::profile::{ProfileId, Section, SectionData, UserProfile};
use crate::profile::completeness::{compute_completeness, CompletenessReport};
use crate::profile::editor::{self, ListItem, SectionLists};
use crate::profile::keyed::ItemKey;
use crate::profile::ProfileService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The backend accepted the full document.
    Saved,
    /// The profile has no server id yet; the edit lives only in memory.
    LocalOnly,
}

struct SessionState {
    profile: UserProfile,
    lists: SectionLists,
}

/// The profile being viewed and edited.
///
/// Each section saves independently by sending the whole document with that
/// one key replaced. Two saves of the same section never overlap; saves of
/// different sections may race at the server and the last one wins.
pub struct ProfileSession {
    service: ProfileService,
    state: Mutex<SessionState>,
    in_flight: Mutex<HashSet<Section>>,
}

/// Marks a section as saving until dropped.
struct InFlight<'a> {
    sections: &'a Mutex<HashSet<Section>>,
    section: Section,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.sections).remove(&self.section);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ProfileSession {
    /// Opens the first profile on the account, or an unsaved placeholder
    /// when there is none yet.
    pub async fn load(service: ProfileService) -> Result<Self, ClientError> {
        let profiles = service.list().await?;
        let profile = match profiles.into_iter().next() {
            Some(profile) => profile,
            None => {
                debug!("No profiles on the account; using placeholder");
                UserProfile::placeholder()
            }
        };
        Ok(Self::from_profile(service, profile))
    }

    pub fn from_profile(service: ProfileService, profile: UserProfile) -> Self {
        let lists = SectionLists::from_document(&profile.profile_data);
        Self {
            service,
            state: Mutex::new(SessionState { profile, lists }),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn profile(&self) -> UserProfile {
        lock(&self.state).profile.clone()
    }

    pub fn completeness(&self) -> CompletenessReport {
        compute_completeness(&lock(&self.state).profile.profile_data)
    }

    #[allow(dead_code)]
    pub fn is_saving(&self, section: Section) -> bool {
        lock(&self.in_flight).contains(&section)
    }

    pub fn items<T: ListItem>(&self) -> Vec<(ItemKey, T)> {
        let state = lock(&self.state);
        T::list(&state.lists)
            .iter()
            .map(|(key, item)| (key, item.clone()))
            .collect()
    }

    pub fn key_at<T: ListItem>(&self, position: usize) -> Option<ItemKey> {
        T::list(&lock(&self.state).lists).key_at(position)
    }

    /// Replaces one section wholesale and saves.
    pub async fn save_section(&self, data: SectionData) -> Result<SaveOutcome, ClientError> {
        let section = data.section();
        let ((), outcome) = self
            .commit(section, move |state| {
                state.profile.profile_data.replace_section(data);
                state.lists.resync(&state.profile.profile_data, section);
                Ok(())
            })
            .await?;
        Ok(outcome)
    }

    pub async fn add_skill(&self, category: &str, skill: &str) -> Result<SaveOutcome, ClientError> {
        let ((), outcome) = self
            .commit(Section::Skills, |state| {
                let data = &mut state.profile.profile_data;
                data.skills = editor::add_skill(&data.skills, category, skill)?;
                Ok(())
            })
            .await?;
        Ok(outcome)
    }

    pub async fn remove_skill(
        &self,
        category: &str,
        skill: &str,
    ) -> Result<SaveOutcome, ClientError> {
        let ((), outcome) = self
            .commit(Section::Skills, |state| {
                let data = &mut state.profile.profile_data;
                data.skills = editor::remove_skill(&data.skills, category, skill);
                Ok(())
            })
            .await?;
        Ok(outcome)
    }

    pub async fn add_category(
        &self,
        category: &str,
        first_skill: &str,
    ) -> Result<SaveOutcome, ClientError> {
        let ((), outcome) = self
            .commit(Section::Skills, |state| {
                let data = &mut state.profile.profile_data;
                data.skills = editor::add_category(&data.skills, category, first_skill)?;
                Ok(())
            })
            .await?;
        Ok(outcome)
    }

    pub async fn add_item<T: ListItem>(
        &self,
        item: T,
    ) -> Result<(ItemKey, SaveOutcome), ClientError> {
        self.commit(T::SECTION, |state| {
            let key = T::list_mut(&mut state.lists).push(item);
            sync_list::<T>(state);
            Ok(key)
        })
        .await
    }

    pub async fn edit_item<T: ListItem>(
        &self,
        key: ItemKey,
        item: T,
    ) -> Result<SaveOutcome, ClientError> {
        let ((), outcome) = self
            .commit(T::SECTION, |state| {
                if !T::list_mut(&mut state.lists).update(key, item) {
                    return Err(missing_item(T::SECTION));
                }
                sync_list::<T>(state);
                Ok(())
            })
            .await?;
        Ok(outcome)
    }

    pub async fn delete_item<T: ListItem>(
        &self,
        key: ItemKey,
    ) -> Result<(T, SaveOutcome), ClientError> {
        self.commit(T::SECTION, |state| {
            let removed = T::list_mut(&mut state.lists)
                .remove(key)
                .ok_or_else(|| missing_item(T::SECTION))?;
            sync_list::<T>(state);
            Ok(removed)
        })
        .await
    }

    fn begin(&self, section: Section) -> Result<InFlight<'_>, ClientError> {
        let mut sections = lock(&self.in_flight);
        if !sections.insert(section) {
            return Err(ClientError::SaveInFlight(section));
        }
        Ok(InFlight {
            sections: &self.in_flight,
            section,
        })
    }

    /// Applies `mutate` to the local document, then sends the whole document
    /// if the profile exists server-side. A failed save keeps the local edit.
    async fn commit<R, F>(&self, section: Section, mutate: F) -> Result<(R, SaveOutcome), ClientError>
    where
        F: FnOnce(&mut SessionState) -> Result<R, ClientError>,
    {
        let _saving = self.begin(section)?;

        let (result, target) = {
            let mut state = lock(&self.state);
            let result = mutate(&mut *state)?;
            let target = match state.profile.id {
                ProfileId::Saved(id) => Some((id, state.profile.profile_data.clone())),
                ProfileId::Unsaved => None,
            };
            (result, target)
        };

        let Some((id, document)) = target else {
            debug!("Profile not uploaded yet; kept {section} locally");
            return Ok((result, SaveOutcome::LocalOnly));
        };

        if let Err(e) = self.service.update(id, &document).await {
            error!("Failed to update profile {id} ({section}): {e}");
            return Err(e);
        }
        info!("Saved {section} on profile {id}");
        Ok((result, SaveOutcome::Saved))
    }
}

fn sync_list<T: ListItem>(state: &mut SessionState) {
    let items = T::list(&state.lists).to_vec();
    T::write_back(&mut state.profile.profile_data, items);
}

fn missing_item(section: Section) -> ClientError {
    ClientError::Validation(format!("That {section} entry no longer exists"))
}
