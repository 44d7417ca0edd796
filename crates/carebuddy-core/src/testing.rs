//! Scripted in-memory `CareBuddyApi` for view-model tests.
//!
//! Every call is appended to a shared event log. A call can be held open
//! with [`FakeApi::gate`] until the test releases it, which lets tests
//! choose the order in which overlapping requests resolve.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::api::{ApiResult, CareBuddyApi};
use crate::error::ApiError;
use crate::types::{Analytics, Buddy, BuddyDetail, ImpactSummary, ReportingPeriod};
use crate::upload::UploadFile;

pub(crate) type EventLog = Arc<Mutex<Vec<String>>>;

pub(crate) struct FakeApi {
    log: EventLog,
    buddies: Mutex<ApiResult<Vec<Buddy>>>,
    details: Mutex<HashMap<String, BuddyDetail>>,
    create: Mutex<ApiResult<String>>,
    upload: Mutex<ApiResult<()>>,
    impact: Mutex<ApiResult<ImpactSummary>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            buddies: Mutex::new(Ok(Vec::new())),
            details: Mutex::new(HashMap::new()),
            create: Mutex::new(Ok("buddy-1".into())),
            upload: Mutex::new(Ok(())),
            impact: Mutex::new(Ok(ImpactSummary::default())),
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn log(&self) -> EventLog {
        Arc::clone(&self.log)
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }

    pub(crate) fn set_buddies(&self, result: ApiResult<Vec<Buddy>>) {
        *self.buddies.lock().unwrap() = result;
    }

    pub(crate) fn add_detail(&self, detail: BuddyDetail) {
        self.details.lock().unwrap().insert(detail.id.clone(), detail);
    }

    pub(crate) fn set_create(&self, result: ApiResult<String>) {
        *self.create.lock().unwrap() = result;
    }

    pub(crate) fn set_upload(&self, result: ApiResult<()>) {
        *self.upload.lock().unwrap() = result;
    }

    pub(crate) fn set_impact(&self, result: ApiResult<ImpactSummary>) {
        *self.impact.lock().unwrap() = result;
    }

    /// Hold the next call logged as `key` until the returned sender fires.
    pub(crate) fn gate(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key.to_string(), rx);
        tx
    }

    async fn enter(&self, key: String) {
        self.log.lock().unwrap().push(key.clone());
        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(rx) = gate {
            let _ = rx.await;
        }
    }
}

pub(crate) fn buddy(id: &str, name: &str) -> Buddy {
    Buddy {
        id: id.into(),
        name: name.into(),
    }
}

pub(crate) fn detail(id: &str, name: &str, number: &str) -> BuddyDetail {
    BuddyDetail {
        id: id.into(),
        name: name.into(),
        whatsapp_number: number.into(),
        creation_date: None,
        stats: Analytics::default(),
        documents: Vec::new(),
    }
}

impl CareBuddyApi for FakeApi {
    async fn get_buddies(&self) -> ApiResult<Vec<Buddy>> {
        self.enter("get_buddies".into()).await;
        self.buddies.lock().unwrap().clone()
    }

    async fn get_buddy_details(&self, id: &str) -> ApiResult<BuddyDetail> {
        self.enter(format!("detail:{id}")).await;
        self.details
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("buddy {id}")))
    }

    async fn get_buddy_analytics(&self, id: &str) -> ApiResult<Analytics> {
        self.get_buddy_details(id).await.map(|d| d.stats)
    }

    async fn create_buddy(&self, name: &str, files: &[UploadFile]) -> ApiResult<String> {
        self.enter(format!("create:{name}:{}", files.len())).await;
        self.create.lock().unwrap().clone()
    }

    async fn upload_documents(&self, buddy_id: &str, files: &[UploadFile]) -> ApiResult<()> {
        self.enter(format!("upload:{buddy_id}:{}", files.len())).await;
        self.upload.lock().unwrap().clone()
    }

    async fn get_doctor_impact(&self, period: ReportingPeriod) -> ApiResult<ImpactSummary> {
        self.enter(format!("impact:{period}")).await;
        self.impact.lock().unwrap().clone()
    }
}
