//! Tracking-id composition.
//!
//! A tracking id correlates a failure across client, gateway and service
//! logs. Its format is an opaque root optionally followed by segments:
//!
//! ```text
//! 6f9619ff8b86d011b42d00c04fc964ff-G:edge-gw-01-B:backend-3-P:7
//! └────────────── root ──────────┘└─ gateway ─┘└ backend ┘└ partition
//! ```
//!
//! Composition rules ([`TrackingIdComposer::compose`]):
//!
//! | Existing id         | Gateway | Result                                 |
//! |---------------------|---------|----------------------------------------|
//! | empty               | none    | fresh root                             |
//! | empty               | `gw`    | `<fresh root>-G:gw`                    |
//! | `id`                | none    | `id` unchanged                         |
//! | `id` naming `gw`    | `gw`    | `id` unchanged                         |
//! | `id` with `-B:`     | `gw`    | `-G:gw` spliced in before `-B:`        |
//! | `id` with `-P:`     | `gw`    | `-G:gw` spliced in before `-P:`        |
//! | `id`                | `gw`    | `id-G:gw`                              |
//!
//! Each relaying gateway is recorded once, in hop order, so a device-side id
//! such as `root-G:edge-01-G:edge-02` names every gateway it crossed.
//! Composition is idempotent: composing a composed id with the same gateway
//! returns it unchanged.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

/// Gateway segment marker
pub const GATEWAY_SEGMENT: &str = "-G:";
/// Backend segment marker
pub const BACKEND_SEGMENT: &str = "-B:";
/// Partition segment marker
pub const PARTITION_SEGMENT: &str = "-P:";

const SEGMENTS: [&str; 3] = [GATEWAY_SEGMENT, BACKEND_SEGMENT, PARTITION_SEGMENT];

/// Source of fresh root identifiers. Must be safe to call concurrently.
pub trait IdSource: Send + Sync {
    /// Produce a new, globally unique root id.
    fn next_id(&self) -> String;
}

/// Random UUID v4 roots, rendered as 32 hex chars.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Composes tracking ids from a gateway id and an existing id.
#[derive(Clone)]
pub struct TrackingIdComposer {
    source: Arc<dyn IdSource>,
}

impl fmt::Debug for TrackingIdComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingIdComposer").finish_non_exhaustive()
    }
}

impl Default for TrackingIdComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingIdComposer {
    /// Composer backed by random UUIDs
    pub fn new() -> Self {
        Self::with_source(UuidSource)
    }

    /// Composer backed by a custom id source
    pub fn with_source(source: impl IdSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Generate a fresh tracking id, tagged with the gateway when given.
    pub fn generate(&self, gateway_id: Option<&str>) -> String {
        let root = self.source.next_id();
        let id = match non_empty(gateway_id) {
            Some(gateway) => format!("{root}{GATEWAY_SEGMENT}{gateway}"),
            None => root,
        };
        tracing::debug!(tracking_id = %id, "generated tracking id");
        id
    }

    /// Compose a tracking id. See the module docs for the rules.
    pub fn compose(&self, gateway_id: Option<&str>, existing: Option<&str>) -> String {
        let gateway = non_empty(gateway_id);
        match (non_empty(existing), gateway) {
            (None, _) => self.generate(gateway),
            (Some(id), None) => id.to_string(),
            (Some(id), Some(gateway)) => add_gateway(id, gateway),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn add_gateway(id: &str, gateway: &str) -> String {
    if gateways_of(id).any(|g| g == gateway) {
        return id.to_string();
    }
    // Gateway segments precede backend and partition segments.
    let at = [BACKEND_SEGMENT, PARTITION_SEGMENT]
        .iter()
        .filter_map(|marker| id.find(marker))
        .min()
        .unwrap_or(id.len());
    format!("{}{GATEWAY_SEGMENT}{gateway}{}", &id[..at], &id[at..])
}

/// Offset of the first segment marker at or after `from`.
fn next_segment(id: &str, from: usize) -> usize {
    SEGMENTS
        .iter()
        .filter_map(|marker| id[from..].find(marker).map(|at| from + at))
        .min()
        .unwrap_or(id.len())
}

/// Opaque root of a tracking id (everything before the first segment).
pub fn root_of(id: &str) -> &str {
    &id[..next_segment(id, 0)]
}

/// First (originating) gateway segment of a tracking id, if present.
pub fn gateway_of(id: &str) -> Option<&str> {
    gateways_of(id).next()
}

/// Every gateway segment of a tracking id, in hop order.
pub fn gateways_of(id: &str) -> impl Iterator<Item = &str> {
    let mut from = 0;
    std::iter::from_fn(move || {
        let start = from + id[from..].find(GATEWAY_SEGMENT)? + GATEWAY_SEGMENT.len();
        let end = next_segment(id, start);
        from = end;
        Some(&id[start..end])
    })
}
