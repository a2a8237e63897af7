//! Fakes shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use inbrief_core::domain::{Identity, StoredImage};
use inbrief_core::ports::{
    Clock, DirectoryError, DirectoryService, EmployeeRecord, FailedUpload, ImageStore,
    ImageStoreError, ImageUpload, UploadBatch,
};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
}

pub fn staff(employee_id: &str) -> Identity {
    Identity {
        employee_id: employee_id.to_string(),
        display_name: format!("Staff {employee_id}"),
        authenticated_at: t0(),
    }
}

pub fn image(name: &str) -> ImageUpload {
    ImageUpload {
        filename: name.to_string(),
        content_type: Some("image/jpeg".to_string()),
        bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

/// Clock that only moves when told to.
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Image store with injectable failures that records deletions.
#[derive(Default)]
pub struct FakeImageStore {
    failing: Mutex<HashSet<String>>,
    batch_error: Mutex<bool>,
    refuse_deletes: Mutex<bool>,
    deleted: Mutex<Vec<String>>,
}

impl FakeImageStore {
    pub fn fail_file(&self, filename: &str) {
        self.failing.lock().unwrap().insert(filename.to_string());
    }

    pub fn fail_batches(&self) {
        *self.batch_error.lock().unwrap() = true;
    }

    pub fn refuse_deletes(&self) {
        *self.refuse_deletes.lock().unwrap() = true;
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for FakeImageStore {
    async fn upload_many(&self, files: Vec<ImageUpload>) -> Result<UploadBatch, ImageStoreError> {
        if *self.batch_error.lock().unwrap() {
            return Err(ImageStoreError::Client("connection refused".to_string()));
        }

        let failing = self.failing.lock().unwrap().clone();
        let mut batch = UploadBatch::default();
        for file in files {
            if failing.contains(&file.filename) {
                batch.failed.push(FailedUpload {
                    filename: file.filename,
                    reason: "Invalid image file".to_string(),
                });
            } else {
                batch.uploaded.push(StoredImage {
                    url: format!("https://img.test/{}", file.filename),
                    handle: format!("inbrief_posts/{}", file.filename),
                });
            }
        }
        Ok(batch)
    }

    async fn delete_one(&self, handle: &str) -> bool {
        if *self.refuse_deletes.lock().unwrap() {
            return false;
        }
        self.deleted.lock().unwrap().push(handle.to_string());
        true
    }
}

/// How the fake directory answers for one employee.
#[derive(Clone)]
pub enum Lookup {
    Found(EmployeeRecord),
    Timeout,
    Status(u16),
    Transport,
}

#[derive(Default)]
pub struct FakeDirectory {
    answers: Mutex<HashMap<String, Lookup>>,
}

impl FakeDirectory {
    pub fn with(self, employee_id: &str, lookup: Lookup) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(employee_id.to_string(), lookup);
        self
    }

    pub fn employee(self, employee_id: &str, phone: &str) -> Self {
        let record = EmployeeRecord {
            employee_id: employee_id.to_string(),
            first_name: Some("Asha".to_string()),
            last_name: Some("Rao".to_string()),
            phone_numbers: vec![phone.to_string()],
        };
        self.with(employee_id, Lookup::Found(record))
    }
}

#[async_trait]
impl DirectoryService for FakeDirectory {
    async fn find_employee(
        &self,
        employee_id: &str,
    ) -> Result<Option<EmployeeRecord>, DirectoryError> {
        match self.answers.lock().unwrap().get(employee_id).cloned() {
            None => Ok(None),
            Some(Lookup::Found(record)) => Ok(Some(record)),
            Some(Lookup::Timeout) => Err(DirectoryError::Timeout),
            Some(Lookup::Status(code)) => Err(DirectoryError::Status(code)),
            Some(Lookup::Transport) => Err(DirectoryError::Transport("refused".to_string())),
        }
    }
}
