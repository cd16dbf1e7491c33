use pretty_assertions::assert_eq;
use vacancy_core::{ExtractedFields, ListingStub, PendingListing, VisitState};
use vacancy_engine::{ListingStore, SqliteStore, StoreCounts, StoreError, UpsertOutcome};

fn stub(url: &str, partner: &str) -> ListingStub {
    ListingStub {
        url: url.to_string(),
        title: "Разработчик стажер".to_string(),
        company: "ООО Ромашка".to_string(),
        location: "Новосибирск".to_string(),
        partner: partner.to_string(),
    }
}

fn fields() -> ExtractedFields {
    ExtractedFields {
        salary: Some("100000 ₽".to_string()),
        experience_level: Some("Не указано".to_string()),
        work_regime: Some("полная занятость".to_string()),
        description: Some("Пишем на Rust".to_string()),
        key_skills: Some("Rust, SQL".to_string()),
        posting_date: Some("1 июня".to_string()),
    }
}

#[tokio::test]
async fn upsert_is_idempotent_per_url() {
    let store = SqliteStore::in_memory().await.unwrap();

    let first = store.upsert_stub(&stub("https://hh.ru/v/1", "hh.ru")).await.unwrap();
    let second = store.upsert_stub(&stub("https://hh.ru/v/1", "hh.ru")).await.unwrap();

    assert_eq!(first, UpsertOutcome::Inserted);
    assert_eq!(second, UpsertOutcome::Touched);
    assert_eq!(
        store.counts().await.unwrap(),
        StoreCounts {
            total: 1,
            pending: 1
        }
    );
}

#[tokio::test]
async fn reupsert_keeps_original_stub_columns() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.upsert_stub(&stub("https://hh.ru/v/1", "hh.ru")).await.unwrap();

    let mut renamed = stub("https://hh.ru/v/1", "superjob.ru");
    renamed.company = "Другая компания".to_string();
    store.upsert_stub(&renamed).await.unwrap();

    let listing = store.get("https://hh.ru/v/1").await.unwrap().unwrap();
    assert_eq!(listing.visit_state(), VisitState::Pending);
    assert_eq!(listing.company, "ООО Ромашка");
    assert_eq!(listing.partner, "hh.ru");
    assert_eq!(listing.last_updated, chrono::Utc::now().date_naive());
}

#[tokio::test]
async fn pending_rows_come_back_in_insertion_order() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.upsert_stub(&stub("https://b.example/2", "hh.ru")).await.unwrap();
    store.upsert_stub(&stub("https://a.example/1", "")).await.unwrap();

    let next = store.next_unvisited().await.unwrap();
    assert_eq!(
        next,
        Some(PendingListing {
            url: "https://b.example/2".to_string(),
            partner: "hh.ru".to_string(),
        })
    );
}

#[tokio::test]
async fn merge_marks_visited_and_stores_fields() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.upsert_stub(&stub("https://hh.ru/v/1", "hh.ru")).await.unwrap();
    store.upsert_stub(&stub("https://hh.ru/v/2", "hh.ru")).await.unwrap();

    store
        .merge_and_mark_visited("https://hh.ru/v/1", &fields())
        .await
        .unwrap();

    let listing = store.get("https://hh.ru/v/1").await.unwrap().unwrap();
    assert_eq!(listing.visit_state(), VisitState::Processed);
    assert_eq!(listing.fields, fields());
    assert_eq!(
        store.next_unvisited().await.unwrap().map(|p| p.url),
        Some("https://hh.ru/v/2".to_string())
    );
    assert_eq!(store.counts().await.unwrap().pending, 1);
}

#[tokio::test]
async fn visited_rows_stay_visited_after_rediscovery() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.upsert_stub(&stub("https://hh.ru/v/1", "hh.ru")).await.unwrap();
    store
        .merge_and_mark_visited("https://hh.ru/v/1", &fields())
        .await
        .unwrap();

    store.upsert_stub(&stub("https://hh.ru/v/1", "hh.ru")).await.unwrap();

    let listing = store.get("https://hh.ru/v/1").await.unwrap().unwrap();
    assert!(listing.visited);
    assert_eq!(listing.fields, fields());
    assert_eq!(store.next_unvisited().await.unwrap(), None);
}

#[tokio::test]
async fn absent_fields_are_stored_as_null() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.upsert_stub(&stub("https://job.example/1", "")).await.unwrap();
    store
        .merge_and_mark_visited("https://job.example/1", &ExtractedFields::default())
        .await
        .unwrap();

    let listing = store.get("https://job.example/1").await.unwrap().unwrap();
    assert!(listing.visited);
    assert!(listing.fields.is_empty());
}

#[tokio::test]
async fn merging_unknown_url_is_an_error() {
    let store = SqliteStore::in_memory().await.unwrap();
    let err = store
        .merge_and_mark_visited("https://nowhere.example/", &fields())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::UnknownListing(url) if url == "https://nowhere.example/"));
}

#[tokio::test]
async fn reset_empties_the_table() {
    let store = SqliteStore::in_memory().await.unwrap();
    store.upsert_stub(&stub("https://hh.ru/v/1", "hh.ru")).await.unwrap();

    store.reset().await.unwrap();

    assert_eq!(store.counts().await.unwrap(), StoreCounts::default());
    assert_eq!(store.get("https://hh.ru/v/1").await.unwrap(), None);
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("vacancies.sqlite").display());

    let store = SqliteStore::connect(&url).await.unwrap();
    store.upsert_stub(&stub("https://hh.ru/v/1", "hh.ru")).await.unwrap();
    store
        .merge_and_mark_visited("https://hh.ru/v/1", &fields())
        .await
        .unwrap();
    store.upsert_stub(&stub("https://hh.ru/v/2", "hh.ru")).await.unwrap();
    store.close().await;

    let reopened = SqliteStore::connect(&url).await.unwrap();
    assert_eq!(
        reopened.counts().await.unwrap(),
        StoreCounts {
            total: 2,
            pending: 1
        }
    );
    assert_eq!(
        reopened.next_unvisited().await.unwrap().map(|p| p.url),
        Some("https://hh.ru/v/2".to_string())
    );
}
