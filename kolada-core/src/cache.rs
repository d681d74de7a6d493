//! Lazily populated allowed values for the area-like dimensions.
//!
//! Areas and area groups are each fetched once per [`AllowedValueCache`] and
//! partitioned by area-type. Every later lookup is served from memory.
//!
//! Invariants:
//! - Each partition slot is populated at most once after a successful fetch.
//! - A failed fetch leaves the slot empty so the next lookup retries.
//! - Only `K` and `L` partitions exist; other area-types resolve to nothing.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use log::debug;
use regex::Regex;

use crate::gateway::{AreaGroupRecord, AreaRecord, Gateway, GatewayError};
use crate::{AllowedValue, AreaType};

type Partitions = HashMap<AreaType, Vec<AllowedValue>>;

#[expect(
    clippy::expect_used,
    reason = "pattern is a literal and is covered by unit tests"
)]
static MUNICIPALITY_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)kommuner|municipalities").expect("valid regex"));

#[expect(
    clippy::expect_used,
    reason = "pattern is a literal and is covered by unit tests"
)]
static REGION_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)regioner|landsting|regions|county councils").expect("valid regex")
});

/// Area-type classification of an area-group title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupClass {
    /// The group collects municipalities (`K`).
    Municipality,
    /// The group collects regions (`L`).
    Region,
    /// The title matches neither pattern.
    Unclassified,
}

impl GroupClass {
    const fn area_type(self) -> Option<AreaType> {
        match self {
            Self::Municipality => Some(AreaType::Municipality),
            Self::Region => Some(AreaType::Region),
            Self::Unclassified => None,
        }
    }
}

/// Classify an area group by its display title.
///
/// The municipality pattern is checked first.
///
/// # Examples
///
/// ```
/// use kolada_core::{GroupClass, classify_group_title};
///
/// assert_eq!(classify_group_title("Storstadskommuner"), GroupClass::Municipality);
/// assert_eq!(classify_group_title("Alla regioner"), GroupClass::Region);
/// assert_eq!(classify_group_title("Övrigt"), GroupClass::Unclassified);
/// ```
#[must_use]
pub fn classify_group_title(title: &str) -> GroupClass {
    if MUNICIPALITY_TITLE.is_match(title) {
        GroupClass::Municipality
    } else if REGION_TITLE.is_match(title) {
        GroupClass::Region
    } else {
        GroupClass::Unclassified
    }
}

/// Per-scraper store of allowed area and area-group values.
///
/// Each catalog sits behind its own lock, so the check-then-fetch sequence is
/// atomic per catalog even when lookups race.
#[derive(Debug, Default)]
pub struct AllowedValueCache {
    areas: Mutex<Option<Partitions>>,
    area_groups: Mutex<Option<Partitions>>,
}

impl AllowedValueCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allowed area values for `area_type`.
    ///
    /// The first lookup fetches the full area catalog, whatever `area_type`
    /// is.
    ///
    /// # Errors
    ///
    /// Returns the gateway error when the triggering fetch fails.
    pub fn allowed_areas<G: Gateway + ?Sized>(
        &self,
        gateway: &G,
        area_type: &AreaType,
    ) -> Result<Vec<AllowedValue>, GatewayError> {
        resolve(&self.areas, area_type, || {
            gateway.fetch_areas().map(partition_areas)
        })
    }

    /// Allowed area-group values for `area_type`.
    ///
    /// # Errors
    ///
    /// Returns the gateway error when the triggering fetch fails.
    pub fn allowed_area_groups<G: Gateway + ?Sized>(
        &self,
        gateway: &G,
        area_type: &AreaType,
    ) -> Result<Vec<AllowedValue>, GatewayError> {
        resolve(&self.area_groups, area_type, || {
            gateway.fetch_area_groups().map(partition_area_groups)
        })
    }

    /// Whether the area catalog has been loaded.
    #[must_use]
    pub fn areas_loaded(&self) -> bool {
        is_loaded(&self.areas)
    }

    /// Whether the area-group catalog has been loaded.
    #[must_use]
    pub fn area_groups_loaded(&self) -> bool {
        is_loaded(&self.area_groups)
    }
}

fn is_loaded(slot: &Mutex<Option<Partitions>>) -> bool {
    slot.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

fn resolve(
    slot: &Mutex<Option<Partitions>>,
    area_type: &AreaType,
    load: impl FnOnce() -> Result<Partitions, GatewayError>,
) -> Result<Vec<AllowedValue>, GatewayError> {
    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    let partitions = match guard.take() {
        Some(partitions) => guard.insert(partitions),
        None => guard.insert(load()?),
    };
    Ok(partitions.get(area_type).cloned().unwrap_or_default())
}

fn partition_areas(records: Vec<AreaRecord>) -> Partitions {
    let mut partitions = Partitions::new();
    for record in records {
        let area_type = AreaType::from_code(&record.area_type);
        if !area_type.is_partitioned() {
            debug!(
                "dropping area {} with unrecognised type {:?}",
                record.id, record.area_type
            );
            continue;
        }
        partitions
            .entry(area_type)
            .or_default()
            .push(AllowedValue::new(record.id, record.title));
    }
    partitions
}

fn partition_area_groups(records: Vec<AreaGroupRecord>) -> Partitions {
    let mut partitions = Partitions::new();
    for record in records {
        let Some(area_type) = classify_group_title(&record.title).area_type() else {
            debug!(
                "dropping area group {} with unclassified title {:?}",
                record.id, record.title
            );
            continue;
        };
        partitions
            .entry(area_type)
            .or_default()
            .push(AllowedValue::new(record.id, record.title));
    }
    partitions
}
