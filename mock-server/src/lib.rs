//! In-memory DQSEGDB mock server for integration tests.
//!
//! Serves the `/dq` resource tree over real HTTP: flag listing per detector,
//! version listing per flag, and flag-version resources with `include` field
//! filtering and `s`/`e` time windowing. PUT creates a resource, PATCH merges
//! segments into an existing one. A `/delay/{seconds}` route exists for
//! timeout tests.
//!
//! The client under test sends PUT/PATCH bodies with `Content-Type: JSON`,
//! so write handlers take the raw body string instead of the `Json`
//! extractor (which would reject the non-standard content type with a 415).

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// A `[start, end)` segment in integer epoch seconds.
pub type Segment = [i64; 2];

/// One stored flag version.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlagResource {
    pub ifo: String,
    pub name: String,
    pub version: u32,
    #[serde(default)]
    pub known: Vec<Segment>,
    #[serde(default)]
    pub active: Vec<Segment>,
    #[serde(default)]
    pub metadata: Value,
}

/// Body accepted by PUT and PATCH.
#[derive(Debug, Deserialize)]
pub struct SegmentPayload {
    #[serde(default)]
    pub known: Vec<Segment>,
    #[serde(default)]
    pub active: Vec<Segment>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Query parameters of a flag-version GET.
#[derive(Debug, Default, Deserialize)]
pub struct SegmentQuery {
    pub s: Option<i64>,
    pub e: Option<i64>,
    pub include: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<(String, String, u32), FlagResource>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/dq/{ifo}", get(list_flags))
        .route("/dq/{ifo}/{flag}", get(list_versions))
        .route(
            "/dq/{ifo}/{flag}/{version}",
            get(get_version).put(put_version).patch(patch_version),
        )
        .route("/delay/{seconds}", get(delay))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_flags(
    State(db): State<Db>,
    Path(ifo): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let db = db.read().await;
    let mut names: Vec<String> = db
        .keys()
        .filter(|(i, _, _)| *i == ifo)
        .map(|(_, name, _)| name.clone())
        .collect();
    if names.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    names.sort();
    names.dedup();
    Ok(Json(json!({ "results": names })))
}

async fn list_versions(
    State(db): State<Db>,
    Path((ifo, flag)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let db = db.read().await;
    let mut versions: Vec<u32> = db
        .keys()
        .filter(|(i, n, _)| *i == ifo && *n == flag)
        .map(|(_, _, v)| *v)
        .collect();
    if versions.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    versions.sort_unstable();
    Ok(Json(json!({ "results": versions })))
}

async fn get_version(
    State(db): State<Db>,
    Path((ifo, flag, version)): Path<(String, String, String)>,
    Query(query): Query<SegmentQuery>,
) -> Result<Json<Value>, StatusCode> {
    let db = db.read().await;
    let resource = resolve_version(&db, &ifo, &flag, &version).ok_or(StatusCode::NOT_FOUND)?;

    let mut resource = resource.clone();
    if let (Some(s), Some(e)) = (query.s, query.e) {
        resource.known = window_filter(&resource.known, s, e);
        resource.active = window_filter(&resource.active, s, e);
    }

    let body = render_resource(&resource, query.include.as_deref());
    Ok(Json(body))
}

async fn put_version(
    State(db): State<Db>,
    Path((ifo, flag, version)): Path<(String, String, String)>,
    body: String,
) -> Result<StatusCode, StatusCode> {
    let version: u32 = version.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let payload: SegmentPayload =
        serde_json::from_str(&body).map_err(|_| StatusCode::BAD_REQUEST)?;

    let resource = FlagResource {
        ifo: ifo.clone(),
        name: flag.clone(),
        version,
        known: payload.known,
        active: payload.active,
        metadata: payload.metadata.unwrap_or_else(|| json!({})),
    };
    db.write().await.insert((ifo, flag, version), resource);
    Ok(StatusCode::CREATED)
}

async fn patch_version(
    State(db): State<Db>,
    Path((ifo, flag, version)): Path<(String, String, String)>,
    body: String,
) -> Result<StatusCode, StatusCode> {
    let version: u32 = version.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let payload: SegmentPayload =
        serde_json::from_str(&body).map_err(|_| StatusCode::BAD_REQUEST)?;

    let mut db = db.write().await;
    let resource = db
        .get_mut(&(ifo, flag, version))
        .ok_or(StatusCode::NOT_FOUND)?;
    resource.known.extend(payload.known);
    resource.active.extend(payload.active);
    if let Some(metadata) = payload.metadata {
        resource.metadata = metadata;
    }
    Ok(StatusCode::OK)
}

async fn delay(Path(seconds): Path<u64>) -> &'static str {
    tokio::time::sleep(Duration::from_secs(seconds)).await;
    "ok"
}

/// Look up a version by number, or by the `active` token meaning the highest
/// stored version of the flag.
fn resolve_version<'a>(
    db: &'a HashMap<(String, String, u32), FlagResource>,
    ifo: &str,
    flag: &str,
    version: &str,
) -> Option<&'a FlagResource> {
    if version == "active" {
        return db
            .iter()
            .filter(|((i, n, _), _)| i == ifo && n == flag)
            .max_by_key(|((_, _, v), _)| *v)
            .map(|(_, resource)| resource);
    }
    let version: u32 = version.parse().ok()?;
    db.get(&(ifo.to_string(), flag.to_string(), version))
}

/// Keep only segments overlapping `[s, e)`.
fn window_filter(segments: &[Segment], s: i64, e: i64) -> Vec<Segment> {
    segments
        .iter()
        .copied()
        .filter(|[start, end]| *start < e && *end > s)
        .collect()
}

/// Serialize a resource, keeping only the fields named in the include list
/// (identity fields `ifo`, `name`, `version` are always present).
fn render_resource(resource: &FlagResource, include: Option<&str>) -> Value {
    let full = json!({
        "ifo": resource.ifo,
        "name": resource.name,
        "version": resource.version,
        "known": resource.known,
        "active": resource.active,
        "metadata": resource.metadata,
    });
    let Some(include) = include else {
        return full;
    };

    let wanted: Vec<&str> = include.split(',').filter(|f| !f.is_empty()).collect();
    let Value::Object(fields) = full else {
        unreachable!("resource serializes to an object");
    };
    let filtered = fields
        .into_iter()
        .filter(|(key, _)| {
            matches!(key.as_str(), "ifo" | "name" | "version") || wanted.contains(&key.as_str())
        })
        .collect();
    Value::Object(filtered)
}
