use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::models::{DishEstimate, LedgerEntry};

/// Append-mostly local day log: one JSON file holding the ordered entry
/// list. Day arithmetic uses the device-local calendar, matching what
/// the user sees. Writes are serialized through the mutex; a second
/// process sharing the file is not supported.
pub struct DailyLedger {
    path: PathBuf,
    entries: Mutex<Vec<LedgerEntry>>,
}

impl DailyLedger {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read ledger file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("ledger file {} is corrupt", path.display()))?
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create ledger directory {}", parent.display())
                    })?;
                }
            }
            Vec::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn append(&self, estimate: DishEstimate, recorded_at: DateTime<Utc>) -> Result<()> {
        let mut entries = self.lock();
        entries.push(LedgerEntry {
            estimate,
            recorded_at,
        });
        self.persist(&entries)
    }

    /// Calorie sum for all entries on the given local calendar day.
    pub fn sum_for_day(&self, date: NaiveDate) -> i64 {
        self.lock()
            .iter()
            .filter(|e| local_date(e.recorded_at) == date)
            .map(|e| e.estimate.calories)
            .sum()
    }

    /// Entries for the given local calendar day, in insertion order.
    pub fn entries_for_day(&self, date: NaiveDate) -> Vec<LedgerEntry> {
        self.lock()
            .iter()
            .filter(|e| local_date(e.recorded_at) == date)
            .cloned()
            .collect()
    }

    /// Remove every entry on the given local calendar day. Irreversible.
    /// Returns the number of removed entries.
    pub fn clear_day(&self, date: NaiveDate) -> Result<usize> {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| local_date(e.recorded_at) != date);
        let removed = before - entries.len();
        if removed > 0 {
            self.persist(&entries)?;
        }
        Ok(removed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LedgerEntry>> {
        // A poisoned lock still holds a consistent entry list.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &[LedgerEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("failed to write ledger file {}", self.path.display()))?;
        Ok(())
    }
}

fn local_date(recorded_at: DateTime<Utc>) -> NaiveDate {
    recorded_at.with_timezone(&Local).date_naive()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Macros;
    use chrono::{Duration, TimeZone};

    fn estimate(name: &str, calories: i64) -> DishEstimate {
        DishEstimate {
            dish_name: name.to_string(),
            portion_weight_g: 200.0,
            ingredients: vec![],
            calories,
            macros: Macros::default(),
        }
    }

    fn temp_ledger() -> (tempfile::TempDir, DailyLedger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = DailyLedger::open(dir.path().join("ledger.json")).unwrap();
        (dir, ledger)
    }

    #[test]
    fn test_append_and_sum() {
        let (_dir, ledger) = temp_ledger();
        let now = Utc::now();

        ledger.append(estimate("борщ", 180), now).unwrap();
        ledger.append(estimate("плов", 520), now).unwrap();

        assert_eq!(ledger.sum_for_day(local_date(now)), 700);
        assert_eq!(ledger.entries_for_day(local_date(now)).len(), 2);
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let (_dir, ledger) = temp_ledger();
        let now = Utc::now();

        ledger.append(estimate("first", 100), now).unwrap();
        ledger.append(estimate("second", 200), now).unwrap();

        let entries = ledger.entries_for_day(local_date(now));
        assert_eq!(entries[0].estimate.dish_name, "first");
        assert_eq!(entries[1].estimate.dish_name, "second");
    }

    #[test]
    fn test_clear_day_leaves_other_days_untouched() {
        let (_dir, ledger) = temp_ledger();
        let today = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let yesterday = today - Duration::days(1);

        ledger.append(estimate("old", 300), yesterday).unwrap();
        ledger.append(estimate("new", 400), today).unwrap();

        let removed = ledger.clear_day(local_date(today)).unwrap();
        assert_eq!(removed, 1);

        assert_eq!(ledger.sum_for_day(local_date(today)), 0);
        assert_eq!(ledger.sum_for_day(local_date(yesterday)), 300);
        assert_eq!(ledger.entries_for_day(local_date(yesterday)).len(), 1);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let now = Utc::now();

        {
            let ledger = DailyLedger::open(&path).unwrap();
            ledger.append(estimate("суп", 120), now).unwrap();
        }

        let reopened = DailyLedger::open(&path).unwrap();
        assert_eq!(reopened.sum_for_day(local_date(now)), 120);
    }

    #[test]
    fn test_clear_empty_day_is_a_noop() {
        let (_dir, ledger) = temp_ledger();
        let removed = ledger.clear_day(today()).unwrap();
        assert_eq!(removed, 0);
    }
}
