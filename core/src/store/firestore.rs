use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::model::{
    Entry, EntryId, EntryLocation, GpsCoordinates, NewEntry, OwnerStamp, SortOrder, UserId,
};

use super::{EntryStore, StoreError};

pub const FIRESTORE_API_URL: &str = "https://firestore.googleapis.com";

const COLLECTION: &str = "entries";

/// Entry store backed by the Firestore REST API. Documents live in one
/// `entries` collection; every document carries the denormalized owner
/// fields so by-owner queries are a single field filter.
pub struct FirestoreStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
}

impl FirestoreStore {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        api_key: Option<String>,
    ) -> FirestoreStore {
        FirestoreStore {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            project_id: project_id.into(),
            api_key,
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, COLLECTION
        )
    }

    fn run_query_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents:runQuery",
            self.base_url, self.project_id
        )
    }

    fn key_params(&self) -> Vec<(&'static str, String)> {
        self.api_key
            .iter()
            .map(|key| ("key", key.clone()))
            .collect()
    }
}

/// Firestore's typed value wrappers, limited to the shapes entry
/// documents actually use.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum DocValue {
    StringValue(String),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    NullValue(Option<()>),
    MapValue { fields: BTreeMap<String, DocValue> },
}

#[derive(Debug, Serialize)]
struct NewDocument {
    fields: BTreeMap<String, DocValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, DocValue>,
    create_time: DateTime<Utc>,
    update_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RunQueryElement {
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

fn entry_fields(entry: &NewEntry, now: DateTime<Utc>) -> BTreeMap<String, DocValue> {
    let mut fields = BTreeMap::new();
    fields.insert("title".to_owned(), DocValue::StringValue(entry.title.clone()));
    fields.insert("story".to_owned(), DocValue::StringValue(entry.story.clone()));
    fields.insert("date".to_owned(), DocValue::StringValue(entry.date.to_string()));
    let location = match &entry.location {
        None => DocValue::NullValue(None),
        Some(location) => {
            let mut loc_fields = BTreeMap::new();
            if let Some(coords) = location.coordinates {
                loc_fields.insert("lat".to_owned(), DocValue::DoubleValue(coords.lat_degrees()));
                loc_fields.insert("lng".to_owned(), DocValue::DoubleValue(coords.lon_degrees()));
            }
            loc_fields.insert(
                "address".to_owned(),
                DocValue::StringValue(location.address.clone()),
            );
            DocValue::MapValue { fields: loc_fields }
        }
    };
    fields.insert("location".to_owned(), location);
    let image_url = match &entry.image_url {
        None => DocValue::NullValue(None),
        Some(url) => DocValue::StringValue(url.clone()),
    };
    fields.insert("imageUrl".to_owned(), image_url);
    fields.insert(
        "userId".to_owned(),
        DocValue::StringValue(entry.owner.id.0.clone()),
    );
    fields.insert(
        "userEmail".to_owned(),
        DocValue::StringValue(entry.owner.email.clone()),
    );
    fields.insert(
        "userName".to_owned(),
        DocValue::StringValue(entry.owner.display_name.clone()),
    );
    fields.insert("createdAt".to_owned(), DocValue::TimestampValue(now));
    fields.insert("updatedAt".to_owned(), DocValue::TimestampValue(now));
    fields
}

fn malformed(what: impl Into<String>) -> StoreError {
    StoreError::Other {
        message: format!("malformed document from entry store: {}", what.into()),
    }
}

fn string_field(fields: &BTreeMap<String, DocValue>, name: &str) -> Result<String, StoreError> {
    match fields.get(name) {
        Some(DocValue::StringValue(s)) => Ok(s.clone()),
        _ => Err(malformed(format!("missing string field {name}"))),
    }
}

fn opt_string_field(fields: &BTreeMap<String, DocValue>, name: &str) -> Option<String> {
    match fields.get(name) {
        Some(DocValue::StringValue(s)) => Some(s.clone()),
        _ => None,
    }
}

fn opt_double_field(fields: &BTreeMap<String, DocValue>, name: &str) -> Option<f64> {
    match fields.get(name) {
        Some(DocValue::DoubleValue(d)) => Some(*d),
        _ => None,
    }
}

fn opt_timestamp_field(fields: &BTreeMap<String, DocValue>, name: &str) -> Option<DateTime<Utc>> {
    match fields.get(name) {
        Some(DocValue::TimestampValue(t)) => Some(*t),
        _ => None,
    }
}

fn entry_from_document(doc: Document) -> Result<Entry, StoreError> {
    let id = doc
        .name
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| malformed("empty document name"))?;
    let fields = &doc.fields;
    let date: NaiveDate = string_field(fields, "date")?
        .parse()
        .map_err(|_| malformed("unparseable date"))?;
    let location = match fields.get("location") {
        Some(DocValue::MapValue { fields: loc }) => {
            let coordinates = match (opt_double_field(loc, "lat"), opt_double_field(loc, "lng")) {
                (Some(lat), Some(lng)) => Some(GpsCoordinates::from_degrees(lat, lng)),
                _ => None,
            };
            Some(EntryLocation {
                coordinates,
                address: opt_string_field(loc, "address").unwrap_or_default(),
            })
        }
        _ => None,
    };
    Ok(Entry {
        id: EntryId::from(id),
        title: string_field(fields, "title")?,
        story: string_field(fields, "story")?,
        date,
        location,
        image_url: opt_string_field(fields, "imageUrl"),
        owner: OwnerStamp {
            id: UserId(string_field(fields, "userId")?),
            email: string_field(fields, "userEmail")?,
            display_name: string_field(fields, "userName")?,
        },
        created_at: opt_timestamp_field(fields, "createdAt").unwrap_or(doc.create_time),
        updated_at: opt_timestamp_field(fields, "updatedAt").unwrap_or(doc.update_time),
    })
}

/// The platform reports a status string alongside the HTTP status; the
/// string is authoritative when present.
async fn classify_failure(response: reqwest::Response) -> StoreError {
    let http_status = response.status();
    let body = response.json::<ApiError>().await.ok();
    if let Some(body) = &body {
        match body.error.status.as_str() {
            "PERMISSION_DENIED" => return StoreError::PermissionDenied,
            "UNAUTHENTICATED" => return StoreError::Unauthenticated,
            "RESOURCE_EXHAUSTED" => return StoreError::QuotaExceeded,
            "UNAVAILABLE" => return StoreError::Unavailable,
            _ => {}
        }
    }
    match http_status {
        StatusCode::UNAUTHORIZED => StoreError::Unauthenticated,
        StatusCode::FORBIDDEN => StoreError::PermissionDenied,
        StatusCode::TOO_MANY_REQUESTS => StoreError::QuotaExceeded,
        StatusCode::SERVICE_UNAVAILABLE => StoreError::Unavailable,
        status => StoreError::Other {
            message: body
                .map(|b| b.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("entry store returned HTTP {status}")),
        },
    }
}

#[async_trait]
impl EntryStore for FirestoreStore {
    #[instrument(skip(self, entry), fields(owner = %entry.owner.id))]
    async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError> {
        // the REST dialect has no server-time sentinel, so creation
        // timestamps are stamped here and mirrored by the document's own
        // createTime
        let now = Utc::now();
        let body = NewDocument {
            fields: entry_fields(&entry, now),
        };
        let response = self
            .client
            .post(self.documents_url())
            .query(&self.key_params())
            .json(&body)
            .send()
            .await
            .map_err(StoreError::Network)?;
        if !response.status().is_success() {
            let err = classify_failure(response).await;
            warn!(%err, "insert failed");
            return Err(err);
        }
        let doc: Document = response.json().await.map_err(StoreError::Network)?;
        let stored = entry_from_document(doc)?;
        debug!(id = %stored.id, "entry inserted");
        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn list_for_owner(
        &self,
        owner: &UserId,
        order: SortOrder,
        limit: Option<u32>,
    ) -> Result<Vec<Entry>, StoreError> {
        let direction = match order {
            SortOrder::NewestFirst => "DESCENDING",
            SortOrder::OldestFirst => "ASCENDING",
        };
        let mut query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": COLLECTION }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "userId" },
                        "op": "EQUAL",
                        "value": { "stringValue": owner.0 },
                    }
                },
                "orderBy": [
                    { "field": { "fieldPath": "date" }, "direction": direction },
                    { "field": { "fieldPath": "createdAt" }, "direction": direction },
                ],
            }
        });
        if let Some(limit) = limit {
            query["structuredQuery"]["limit"] = json!(limit);
        }
        let response = self
            .client
            .post(self.run_query_url())
            .query(&self.key_params())
            .json(&query)
            .send()
            .await
            .map_err(StoreError::Network)?;
        if !response.status().is_success() {
            let err = classify_failure(response).await;
            warn!(%err, "query failed");
            return Err(err);
        }
        let elements: Vec<RunQueryElement> = response.json().await.map_err(StoreError::Network)?;
        let entries = elements
            .into_iter()
            // a query answer may end with a read-time-only element
            .filter_map(|el| el.document)
            .map(entry_from_document)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = entries.len(), "entries fetched");
        Ok(entries)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn new_entry() -> NewEntry {
        NewEntry {
            title: "Paris".to_owned(),
            story: "Walked along the Seine".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            location: Some(EntryLocation {
                coordinates: Some(GpsCoordinates::from_degrees(48.8566, 2.3522)),
                address: "Paris, France".to_owned(),
            }),
            image_url: None,
            owner: OwnerStamp {
                id: UserId::from("user-1"),
                email: "ada@example.com".to_owned(),
                display_name: "Ada".to_owned(),
            },
        }
    }

    fn document_json(id: &str, title: &str, date: &str) -> serde_json::Value {
        json!({
            "name": format!("projects/demo/databases/(default)/documents/entries/{id}"),
            "fields": {
                "title": { "stringValue": title },
                "story": { "stringValue": "story" },
                "date": { "stringValue": date },
                "location": { "nullValue": null },
                "imageUrl": { "nullValue": null },
                "userId": { "stringValue": "user-1" },
                "userEmail": { "stringValue": "ada@example.com" },
                "userName": { "stringValue": "Ada" },
                "createdAt": { "timestampValue": "2024-01-02T03:04:05Z" },
                "updatedAt": { "timestampValue": "2024-01-02T03:04:05Z" },
            },
            "createTime": "2024-01-02T03:04:05.678Z",
            "updateTime": "2024-01-02T03:04:05.678Z",
        })
    }

    #[tokio::test]
    async fn insert_round_trips_the_stored_document() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/v1/projects/demo/databases/(default)/documents/entries",
            ))
            .and(body_partial_json(json!({
                "fields": {
                    "title": { "stringValue": "Paris" },
                    "date": { "stringValue": "2024-01-01" },
                    "userId": { "stringValue": "user-1" },
                }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(document_json("abc123", "Paris", "2024-01-01")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = FirestoreStore::new(server.uri(), "demo", None);
        let entry = store.insert(new_entry()).await.unwrap();
        assert_eq!(entry.id, EntryId::from("abc123"));
        assert_eq!(entry.title, "Paris");
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(entry.image_url, None);
        assert_eq!(entry.owner.display_name, "Ada");
    }

    #[tokio::test]
    async fn list_for_owner_skips_read_time_only_elements() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/databases/(default)/documents:runQuery"))
            .and(body_partial_json(json!({
                "structuredQuery": {
                    "where": { "fieldFilter": {
                        "field": { "fieldPath": "userId" },
                        "op": "EQUAL",
                        "value": { "stringValue": "user-1" },
                    }},
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "document": document_json("e2", "Tokyo", "2024-06-01") },
                { "document": document_json("e1", "Paris", "2024-01-01") },
                { "readTime": "2024-07-01T00:00:00Z" },
            ])))
            .mount(&server)
            .await;

        let store = FirestoreStore::new(server.uri(), "demo", None);
        let entries = store
            .list_for_owner(&UserId::from("user-1"), SortOrder::NewestFirst, None)
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Tokyo");
        assert_eq!(entries[1].title, "Paris");
    }

    #[tokio::test]
    async fn platform_status_string_wins_over_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(
                "/v1/projects/demo/databases/(default)/documents/entries",
            ))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "quota exhausted",
                    "status": "RESOURCE_EXHAUSTED",
                }
            })))
            .mount(&server)
            .await;

        let store = FirestoreStore::new(server.uri(), "demo", None);
        let err = store.insert(new_entry()).await.unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded));
    }

    #[tokio::test]
    async fn http_status_classifies_when_no_status_string() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/projects/demo/databases/(default)/documents:runQuery"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = FirestoreStore::new(server.uri(), "demo", None);
        let err = store
            .list_for_owner(&UserId::from("user-1"), SortOrder::NewestFirst, None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable));
    }

    #[test]
    fn location_without_coordinates_round_trips_as_address_only() {
        let fields = entry_fields(
            &NewEntry {
                location: Some(EntryLocation {
                    coordinates: None,
                    address: "somewhere".to_owned(),
                }),
                ..new_entry()
            },
            Utc::now(),
        );
        let doc = Document {
            name: "projects/p/databases/(default)/documents/entries/x".to_owned(),
            fields,
            create_time: Utc::now(),
            update_time: Utc::now(),
        };
        let entry = entry_from_document(doc).unwrap();
        let location = entry.location.unwrap();
        assert_eq!(location.address, "somewhere");
        assert_eq!(location.coordinates, None);
    }
}
