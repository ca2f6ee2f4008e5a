use crate::error::FetchError;
use crate::favorites::Favorites;
use crate::filters::Filters;
use crate::map::{LngLat, MapBackend, MapView};
use crate::models::{Property, PropertyId};
use crate::sort::{sort, SortKey};
use crate::sources::ListingSource;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use tracing::{debug, error, info};

/// Surface the map is mounted on
pub const MAP_MOUNT: &str = "map-surface";

/// Optional parts of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub show_header: bool,
    pub enable_favorites: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            show_header: true,
            enable_favorites: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ViewMode {
    #[default]
    List,
    Map,
}

/// Permission to commit one fetch result. Issued once per mount; a ticket
/// from an earlier mount is rejected by [`Page::commit`].
#[derive(Debug)]
#[must_use = "a fetch ticket must be committed"]
pub struct FetchTicket {
    epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Records replaced with this many listings
    Loaded(usize),
    /// Fetch failed; records left as they were
    Failed,
    /// Page was unmounted or remounted since the ticket was issued
    Stale,
}

/// In-memory session behind the listing page
pub struct Page {
    capabilities: Capabilities,
    epoch: u64,
    mounted: bool,
    records: Vec<Property>,
    fetched_at: Option<DateTime<Utc>>,
    sort_key: SortKey,
    view_mode: ViewMode,
    favorites: Favorites,
    filters: Filters,
    selected: Option<PropertyId>,
    map: MapView,
}

impl Page {
    pub fn new(capabilities: Capabilities, map_backend: Box<dyn MapBackend>) -> Self {
        Self {
            capabilities,
            epoch: 0,
            mounted: false,
            records: Vec::new(),
            fetched_at: None,
            sort_key: SortKey::default(),
            view_mode: ViewMode::default(),
            favorites: Favorites::new(),
            filters: Filters::default(),
            selected: None,
            map: MapView::new(map_backend),
        }
    }

    /// Start a fresh session and hand out its single fetch ticket
    pub fn mount(&mut self) -> FetchTicket {
        if self.mounted {
            self.unmount();
        }
        self.epoch += 1;
        self.mounted = true;
        self.records.clear();
        self.fetched_at = None;
        self.favorites = Favorites::new();
        self.selected = None;
        if self.view_mode == ViewMode::Map {
            self.map.set_records(std::iter::empty());
            self.map.mount(MAP_MOUNT);
        }
        debug!(epoch = self.epoch, "Mounted page");
        FetchTicket { epoch: self.epoch }
    }

    /// Tear down the session. Outstanding tickets become stale.
    pub fn unmount(&mut self) {
        self.epoch += 1;
        self.mounted = false;
        self.map.unmount();
        debug!(epoch = self.epoch, "Unmounted page");
    }

    /// Apply a fetch result if `ticket` belongs to the current mount
    pub fn commit(&mut self, ticket: FetchTicket, result: Result<Vec<Property>, FetchError>) -> CommitOutcome {
        if !self.mounted || ticket.epoch != self.epoch {
            debug!(ticket = ticket.epoch, current = self.epoch, "Discarding late fetch result");
            return CommitOutcome::Stale;
        }

        match result {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.fetched_at = Some(Utc::now());
                self.sync_map();
                info!("Loaded {} properties", count);
                CommitOutcome::Loaded(count)
            }
            Err(err) => {
                error!(error = %err, "Error fetching properties");
                CommitOutcome::Failed
            }
        }
    }

    /// Mount and run the one fetch for this mount to completion
    pub async fn load(&mut self, source: &dyn ListingSource) -> CommitOutcome {
        let ticket = self.mount();
        info!("Fetching properties from {}", source.source_name());
        let result = source.fetch_all().await;
        self.commit(ticket, result)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn records(&self) -> &[Property] {
        &self.records
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Filtered, sorted projection of the records
    pub fn visible(&self) -> Vec<&Property> {
        sort(self.filters.apply(&self.records), self.sort_key)
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switching to the map mounts it; switching away releases it
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if mode == self.view_mode {
            return;
        }
        self.view_mode = mode;
        match mode {
            ViewMode::Map if self.mounted => {
                self.sync_map();
                self.map.mount(MAP_MOUNT);
            }
            ViewMode::Map => {}
            ViewMode::List => self.map.unmount(),
        }
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.sync_map();
    }

    /// Returns the new membership, or `None` when favorites are disabled
    pub fn toggle_favorite(&mut self, id: PropertyId) -> Option<bool> {
        if !self.capabilities.enable_favorites {
            return None;
        }
        Some(self.favorites.toggle(id))
    }

    /// Mark every id in `ids` as favorite, leaving existing marks in place.
    /// Returns `false` without touching the set when favorites are disabled.
    pub fn mark_favorites(&mut self, ids: &[PropertyId]) -> bool {
        if !self.capabilities.enable_favorites {
            return false;
        }
        for &id in ids {
            if !self.favorites.is_favorite(id) {
                self.favorites.toggle(id);
            }
        }
        true
    }

    pub fn is_favorite(&self, id: PropertyId) -> bool {
        self.capabilities.enable_favorites && self.favorites.is_favorite(id)
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    /// Open the detail view of `id`, if such a listing is loaded
    pub fn select(&mut self, id: PropertyId) -> Option<&Property> {
        let property = self.records.iter().find(|p| p.id == id)?;
        self.selected = Some(id);
        Some(property)
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Property> {
        let id = self.selected?;
        self.records.iter().find(|p| p.id == id)
    }

    fn sync_map(&mut self) {
        let points: Vec<LngLat> = self
            .filters
            .apply(&self.records)
            .map(|p| LngLat::from(p.lng_lat()))
            .collect();
        self.map.set_records(points);
    }
}
