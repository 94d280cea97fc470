//! JSON flat-file adapter for MembershipRepository

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entities::{
    Membership, MembershipId, MembershipPeriod, MembershipPeriodId, NewMembership,
};
use crate::domain::ports::MembershipRepository;
use crate::error::DomainError;

use super::records::{JsonMembership, JsonMembershipPeriod};

pub const MEMBERSHIPS_FILE: &str = "memberships.json";
pub const MEMBERSHIP_PERIODS_FILE: &str = "membership-periods.json";

/// Both collections plus their id counters
///
/// Memberships and periods are always mutated together, so they live behind
/// one lock.
#[derive(Debug)]
struct JsonStore {
    memberships: Vec<JsonMembership>,
    membership_periods: Vec<JsonMembershipPeriod>,
    next_membership_id: i64,
    next_period_id: i64,
}

impl JsonStore {
    fn new(memberships: Vec<JsonMembership>, membership_periods: Vec<JsonMembershipPeriod>) -> Self {
        let next_membership_id = memberships.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let next_period_id = membership_periods.iter().map(|p| p.id).max().unwrap_or(0) + 1;

        Self {
            memberships,
            membership_periods,
            next_membership_id,
            next_period_id,
        }
    }

    /// Periods of one membership, in insertion order
    fn periods_of(&self, membership_id: i64) -> Result<Vec<MembershipPeriod>, DomainError> {
        self.membership_periods
            .iter()
            .filter(|period| period.membership_id == membership_id)
            .map(MembershipPeriod::try_from)
            .collect()
    }
}

/// Flat-file implementation of MembershipRepository
///
/// Without a data directory the store lives only in memory.
pub struct JsonMembershipRepository {
    store: Mutex<JsonStore>,
    data_dir: Option<PathBuf>,
}

impl JsonMembershipRepository {
    pub fn in_memory() -> Self {
        Self::from_records(Vec::new(), Vec::new())
    }

    /// In-memory store seeded with existing records
    pub fn from_records(
        memberships: Vec<JsonMembership>,
        membership_periods: Vec<JsonMembershipPeriod>,
    ) -> Self {
        Self {
            store: Mutex::new(JsonStore::new(memberships, membership_periods)),
            data_dir: None,
        }
    }

    /// Load both collections from `data_dir`, creating the directory if needed
    ///
    /// A missing file is an empty collection.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let data_dir = data_dir.as_ref().to_path_buf();

        tokio::fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| storage_error(&data_dir, e))?;

        let memberships: Vec<JsonMembership> =
            read_collection(&data_dir.join(MEMBERSHIPS_FILE)).await?;
        let membership_periods: Vec<JsonMembershipPeriod> =
            read_collection(&data_dir.join(MEMBERSHIP_PERIODS_FILE)).await?;

        tracing::info!(
            data_dir = %data_dir.display(),
            memberships = memberships.len(),
            periods = membership_periods.len(),
            "Loaded membership store"
        );

        Ok(Self {
            store: Mutex::new(JsonStore::new(memberships, membership_periods)),
            data_dir: Some(data_dir),
        })
    }

    /// Rewrite both data files from `store`
    ///
    /// Both collections are serialized and staged next to their targets before
    /// either target is replaced, so a serialization or staging failure leaves
    /// the files untouched.
    async fn flush(&self, store: &JsonStore) -> Result<(), DomainError> {
        let Some(data_dir) = &self.data_dir else {
            return Ok(());
        };

        let memberships_path = data_dir.join(MEMBERSHIPS_FILE);
        let periods_path = data_dir.join(MEMBERSHIP_PERIODS_FILE);

        let memberships = serialize_collection(&memberships_path, &store.memberships)?;
        let periods = serialize_collection(&periods_path, &store.membership_periods)?;

        let staged_memberships = stage_file(&memberships_path, memberships).await?;
        let staged_periods = match stage_file(&periods_path, periods).await {
            Ok(staged) => staged,
            Err(e) => {
                discard_staged(&staged_memberships).await;
                return Err(e);
            }
        };

        if let Err(e) = replace_file(&staged_memberships, &memberships_path).await {
            discard_staged(&staged_memberships).await;
            discard_staged(&staged_periods).await;
            return Err(e);
        }
        // memberships.json is already replaced here; the caller restores it
        if let Err(e) = replace_file(&staged_periods, &periods_path).await {
            discard_staged(&staged_periods).await;
            return Err(e);
        }

        tracing::debug!(data_dir = %data_dir.display(), "Flushed membership store");
        Ok(())
    }
}

#[async_trait]
impl MembershipRepository for JsonMembershipRepository {
    async fn create_membership(
        &self,
        membership: &NewMembership,
    ) -> Result<Membership, DomainError> {
        let mut store = self.store.lock().await;

        let membership_id = MembershipId(store.next_membership_id);
        let first_period_id = store.next_period_id;
        let saved_lengths = (store.memberships.len(), store.membership_periods.len());

        let periods: Vec<MembershipPeriod> = membership
            .periods
            .iter()
            .zip(first_period_id..)
            .map(|(period, id)| period.persisted(MembershipPeriodId(id), membership_id))
            .collect();

        store
            .memberships
            .push(JsonMembership::from_new(membership_id, membership));
        store.membership_periods.extend(
            membership
                .periods
                .iter()
                .zip(periods.iter())
                .map(|(new_period, period)| {
                    JsonMembershipPeriod::from_new(period.id, membership_id, new_period)
                }),
        );
        store.next_membership_id += 1;
        store.next_period_id += periods.len() as i64;

        if let Err(e) = self.flush(&store).await {
            store.memberships.truncate(saved_lengths.0);
            store.membership_periods.truncate(saved_lengths.1);
            store.next_membership_id = membership_id.0;
            store.next_period_id = first_period_id;

            // A failure after the first file was replaced leaves the files out of
            // step with each other; write the rolled-back store over them.
            if let Err(restore_err) = self.flush(&store).await {
                tracing::error!(
                    error = %restore_err,
                    "Failed to restore membership store files after rollback"
                );
            }
            return Err(e);
        }

        Ok(Membership {
            id: membership_id,
            uuid: membership.uuid,
            name: membership.name.clone(),
            user_id: membership.user_id,
            recurring_price: membership.recurring_price,
            valid_from: membership.valid_from,
            valid_until: membership.valid_until,
            state: membership.state,
            payment_method: membership.payment_method,
            billing_interval: membership.billing_interval,
            billing_periods: membership.billing_periods,
            assigned_by: membership.assigned_by.clone(),
            periods,
        })
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>, DomainError> {
        let store = self.store.lock().await;

        store
            .memberships
            .iter()
            .map(|membership| {
                let periods = store.periods_of(membership.id)?;
                membership.clone().into_domain(periods)
            })
            .collect()
    }
}

async fn read_collection<T>(path: &Path) -> Result<Vec<T>, DomainError>
where
    T: serde::de::DeserializeOwned,
{
    match tokio::fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content).map_err(|e| storage_error(path, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(storage_error(path, e)),
    }
}

fn serialize_collection<T>(path: &Path, records: &[T]) -> Result<String, DomainError>
where
    T: serde::Serialize,
{
    serde_json::to_string_pretty(records).map_err(|e| storage_error(path, e))
}

/// Write `content` next to `path`, returning the staged file's path
async fn stage_file(path: &Path, content: String) -> Result<PathBuf, DomainError> {
    let staged = path.with_extension("json.tmp");
    tokio::fs::write(&staged, content)
        .await
        .map_err(|e| storage_error(&staged, e))?;
    Ok(staged)
}

async fn replace_file(staged: &Path, path: &Path) -> Result<(), DomainError> {
    tokio::fs::rename(staged, path)
        .await
        .map_err(|e| storage_error(path, e))
}

async fn discard_staged(staged: &Path) {
    if let Err(e) = tokio::fs::remove_file(staged).await {
        tracing::warn!(path = %staged.display(), error = %e, "Failed to remove staged file");
    }
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::Storage(format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{MembershipPeriodState, MembershipState};
    use crate::test_utils::{date, test_new_membership};

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let repo = JsonMembershipRepository::in_memory();

        let first = repo
            .create_membership(&test_new_membership(3))
            .await
            .unwrap();
        let second = repo
            .create_membership(&test_new_membership(2))
            .await
            .unwrap();

        assert_eq!(first.id, MembershipId(1));
        assert_eq!(second.id, MembershipId(2));
        let period_ids: Vec<i64> = first
            .periods
            .iter()
            .chain(second.periods.iter())
            .map(|p| p.id.0)
            .collect();
        assert_eq!(period_ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn create_links_periods_to_membership() {
        let repo = JsonMembershipRepository::in_memory();

        let membership = repo
            .create_membership(&test_new_membership(3))
            .await
            .unwrap();

        assert_eq!(membership.periods.len(), 3);
        assert!(membership
            .periods
            .iter()
            .all(|p| p.membership_id == membership.id));
    }

    #[tokio::test]
    async fn ids_continue_after_seeded_records() {
        let seeded = JsonMembershipRepository::in_memory();
        seeded
            .create_membership(&test_new_membership(2))
            .await
            .unwrap();
        let store = seeded.store.into_inner();

        let repo =
            JsonMembershipRepository::from_records(store.memberships, store.membership_periods);
        let membership = repo
            .create_membership(&test_new_membership(1))
            .await
            .unwrap();

        assert_eq!(membership.id, MembershipId(2));
        assert_eq!(membership.periods[0].id, MembershipPeriodId(3));
    }

    #[tokio::test]
    async fn list_joins_periods_by_membership_id() {
        let repo = JsonMembershipRepository::in_memory();
        let first = repo
            .create_membership(&test_new_membership(2))
            .await
            .unwrap();
        let second = repo
            .create_membership(&test_new_membership(3))
            .await
            .unwrap();

        let listed = repo.list_memberships().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], first);
        assert_eq!(listed[1], second);
    }

    #[tokio::test]
    async fn list_returns_empty_periods_for_membership_without_periods() {
        let repo = JsonMembershipRepository::in_memory();
        repo.create_membership(&test_new_membership(2))
            .await
            .unwrap();
        let store = repo.store.into_inner();

        // Keep the membership but drop its periods
        let repo = JsonMembershipRepository::from_records(store.memberships, Vec::new());
        let listed = repo.list_memberships().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert!(listed[0].periods.is_empty());
    }

    #[tokio::test]
    async fn list_reads_legacy_data_files() {
        let memberships = serde_json::from_str(
            r#"[{
                "id": 1,
                "uuid": "123e4567-e89b-12d3-a456-426614174000",
                "name": "Platinum Plan",
                "userId": 2000,
                "recurringPrice": 150.0,
                "validFrom": "2023-01-01",
                "validUntil": "2023-12-31",
                "state": "active",
                "paymentMethod": null,
                "billingInterval": "monthly",
                "billingPeriods": 12,
                "assignedBy": "Admin"
            }]"#,
        )
        .unwrap();
        let periods = serde_json::from_str(
            r#"[
                {"id": 1, "uuid": "123e4567-e89b-12d3-a456-426614174001", "membership": 1,
                 "start": "2023-01-01", "end": "2023-01-31", "state": "issued"},
                {"id": 2, "uuid": "123e4567-e89b-12d3-a456-426614174002", "membership": 7,
                 "start": "2023-02-01", "end": "2023-02-28", "state": "planned"}
            ]"#,
        )
        .unwrap();
        let repo = JsonMembershipRepository::from_records(memberships, periods);

        let listed = repo.list_memberships().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].state, MembershipState::Active);
        assert_eq!(listed[0].payment_method, None);
        assert_eq!(listed[0].periods.len(), 1);
        assert_eq!(listed[0].periods[0].state, MembershipPeriodState::Issued);
        assert_eq!(listed[0].periods[0].end, date(2023, 1, 31));
    }

    #[tokio::test]
    async fn open_missing_files_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();

        let repo = JsonMembershipRepository::open(dir.path().join("data"))
            .await
            .unwrap();

        assert!(repo.list_memberships().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonMembershipRepository::open(dir.path()).await.unwrap();

        let created = repo
            .create_membership(&test_new_membership(6))
            .await
            .unwrap();
        drop(repo);

        let reopened = JsonMembershipRepository::open(dir.path()).await.unwrap();
        let listed = reopened.list_memberships().await.unwrap();

        assert_eq!(listed, vec![created]);

        let raw = std::fs::read_to_string(dir.path().join(MEMBERSHIP_PERIODS_FILE)).unwrap();
        assert!(raw.contains("\"membershipId\": 1"));
        assert!(raw.contains("\"start\": \"2023-01-01\""));
    }

    #[tokio::test]
    async fn reopened_store_keeps_counting_ids() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonMembershipRepository::open(dir.path()).await.unwrap();
        repo.create_membership(&test_new_membership(6))
            .await
            .unwrap();
        drop(repo);

        let reopened = JsonMembershipRepository::open(dir.path()).await.unwrap();
        let second = reopened
            .create_membership(&test_new_membership(6))
            .await
            .unwrap();

        assert_eq!(second.id, MembershipId(2));
        assert_eq!(second.periods[0].id, MembershipPeriodId(7));
    }

    #[tokio::test]
    async fn open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MEMBERSHIPS_FILE), "{not json").unwrap();

        let result = JsonMembershipRepository::open(dir.path()).await;

        assert!(matches!(result, Err(DomainError::Storage(_))));
    }

    #[tokio::test]
    async fn failed_flush_rolls_back_the_create() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonMembershipRepository::open(dir.path()).await.unwrap();
        // A directory where the file should be makes the write fail
        std::fs::create_dir(dir.path().join(MEMBERSHIPS_FILE)).unwrap();

        let result = repo.create_membership(&test_new_membership(6)).await;
        assert!(matches!(result, Err(DomainError::Storage(_))));

        std::fs::remove_dir(dir.path().join(MEMBERSHIPS_FILE)).unwrap();
        assert!(repo.list_memberships().await.unwrap().is_empty());

        let membership = repo
            .create_membership(&test_new_membership(6))
            .await
            .unwrap();
        assert_eq!(membership.id, MembershipId(1));
        assert_eq!(membership.periods[0].id, MembershipPeriodId(1));
    }

    fn staged_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[tokio::test]
    async fn failed_periods_write_leaves_no_membership_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonMembershipRepository::open(dir.path()).await.unwrap();
        std::fs::create_dir(dir.path().join(MEMBERSHIP_PERIODS_FILE)).unwrap();

        let result = repo.create_membership(&test_new_membership(6)).await;
        assert!(matches!(result, Err(DomainError::Storage(_))));
        assert!(repo.list_memberships().await.unwrap().is_empty());
        drop(repo);

        std::fs::remove_dir(dir.path().join(MEMBERSHIP_PERIODS_FILE)).unwrap();
        let reopened = JsonMembershipRepository::open(dir.path()).await.unwrap();

        assert!(reopened.list_memberships().await.unwrap().is_empty());
        assert!(staged_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn failed_periods_write_keeps_earlier_memberships() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonMembershipRepository::open(dir.path()).await.unwrap();
        let first = repo
            .create_membership(&test_new_membership(6))
            .await
            .unwrap();

        let periods_path = dir.path().join(MEMBERSHIP_PERIODS_FILE);
        let saved_periods = std::fs::read_to_string(&periods_path).unwrap();
        std::fs::remove_file(&periods_path).unwrap();
        std::fs::create_dir(&periods_path).unwrap();

        let result = repo.create_membership(&test_new_membership(3)).await;
        assert!(matches!(result, Err(DomainError::Storage(_))));
        drop(repo);

        std::fs::remove_dir(&periods_path).unwrap();
        std::fs::write(&periods_path, saved_periods).unwrap();
        let reopened = JsonMembershipRepository::open(dir.path()).await.unwrap();

        assert_eq!(reopened.list_memberships().await.unwrap(), vec![first]);
    }
}
