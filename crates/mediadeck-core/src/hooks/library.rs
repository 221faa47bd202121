// Tags, logs, tasks and documents, plus the write operations that go
// with them.

use mediadeck_api::models::{
    CreateTag, DocumentEntry, DocumentQuery, LogEntry, LogQuery, Tag, TagQuery, TaskStatus,
    TelegramMessage, UpdateTag, UploadRequest, UploadResult,
};
use mediadeck_api::{ApiClient, PagedList};

use super::{LOGS_STALE_TIME, TASK_STATUS_STALE_TIME, describe, keys};
use crate::cache::QueryKey;
use crate::mutation::Mutation;
use crate::query::{QueryDescriptor, QueryOptions};

// ── Queries ──────────────────────────────────────────────────────────

pub fn tags(client: &ApiClient, query: TagQuery) -> QueryDescriptor<PagedList<Tag>> {
    describe(
        client,
        QueryKey::with_params(keys::TAGS, &query),
        QueryOptions::default(),
        query,
        |client, query| async move { client.list_tags(&query).await },
    )
}

pub fn tag(client: &ApiClient, id: u64) -> QueryDescriptor<Tag> {
    describe(
        client,
        QueryKey::with_params(keys::TAG, &id),
        QueryOptions::default().enabled(id != 0),
        id,
        |client, id| async move { client.get_tag(id).await },
    )
}

/// Log pages stay fresh for five minutes.
pub fn logs(client: &ApiClient, query: LogQuery) -> QueryDescriptor<PagedList<LogEntry>> {
    describe(
        client,
        QueryKey::with_params(keys::LOGS, &query),
        QueryOptions::default().stale_for(LOGS_STALE_TIME),
        query,
        |client, query| async move { client.list_logs(&query).await },
    )
}

pub fn tasks(client: &ApiClient) -> QueryDescriptor<Vec<TaskStatus>> {
    describe(
        client,
        QueryKey::new(keys::TASKS),
        QueryOptions::default(),
        (),
        |client, ()| async move { client.list_tasks().await },
    )
}

/// One task's status, fresh for five seconds. Disabled for a blank id.
pub fn task_status(client: &ApiClient, task_id: &str) -> QueryDescriptor<TaskStatus> {
    let task_id = task_id.trim().to_owned();
    describe(
        client,
        QueryKey::with_params(keys::TASK_STATUS, &task_id),
        QueryOptions::default()
            .stale_for(TASK_STATUS_STALE_TIME)
            .enabled(!task_id.is_empty()),
        task_id,
        |client, task_id| async move { client.task_status(&task_id).await },
    )
}

pub fn documents(client: &ApiClient, query: DocumentQuery) -> QueryDescriptor<Vec<DocumentEntry>> {
    describe(
        client,
        QueryKey::with_params(keys::DOCUMENTS, &query),
        QueryOptions::default(),
        query,
        |client, query| async move { client.list_documents(&query).await },
    )
}

// ── Mutations ────────────────────────────────────────────────────────

pub fn create_tag(client: &ApiClient) -> Mutation<CreateTag, Tag> {
    let client = client.clone();
    Mutation::new("create-tag", move |tag: CreateTag| {
        let client = client.clone();
        async move { client.create_tag(&tag).await }
    })
}

pub fn update_tag(client: &ApiClient) -> Mutation<(u64, UpdateTag), Tag> {
    let client = client.clone();
    Mutation::new("update-tag", move |(id, update): (u64, UpdateTag)| {
        let client = client.clone();
        async move { client.update_tag(id, &update).await }
    })
}

pub fn delete_tag(client: &ApiClient) -> Mutation<u64, ()> {
    let client = client.clone();
    Mutation::new("delete-tag", move |id: u64| {
        let client = client.clone();
        async move { client.delete_tag(id).await }
    })
}

pub fn upload_file(client: &ApiClient) -> Mutation<UploadRequest, UploadResult> {
    let client = client.clone();
    Mutation::new("upload-file", move |upload: UploadRequest| {
        let client = client.clone();
        async move { client.upload_file(upload).await }
    })
}

pub fn send_notification(client: &ApiClient) -> Mutation<TelegramMessage, ()> {
    let client = client.clone();
    Mutation::new("send-notification", move |message: TelegramMessage| {
        let client = client.clone();
        async move { client.send_notification(&message).await }
    })
}
