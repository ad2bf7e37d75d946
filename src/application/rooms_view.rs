// Rooms view with sensor detail drill-down
use crate::application::data_source::AdminDataSource;
use crate::application::resource_view::ActionError;
use crate::domain::room::{Room, RoomHistory};

pub const DETAIL_SUBTITLE: &str = "Latest readings and recent history";
const UNKNOWN_ROOM_TITLE: &str = "Room Details";

#[derive(Debug, Clone, PartialEq)]
pub enum RoomDetail {
    /// Nothing selected yet
    Empty,
    Loaded { title: String, history: RoomHistory },
    Failed { title: String },
}

/// Owns the rooms cache: the last fetched room list, filtered client-side
/// by the search text.
#[derive(Debug)]
pub struct RoomsView {
    cache: Vec<Room>,
    query: String,
    detail: RoomDetail,
}

impl Default for RoomsView {
    fn default() -> Self {
        Self {
            cache: Vec::new(),
            query: String::new(),
            detail: RoomDetail::Empty,
        }
    }
}

impl RoomsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn detail(&self) -> &RoomDetail {
        &self.detail
    }

    /// Rooms matching the current search text, in cache order
    pub fn visible(&self) -> Vec<&Room> {
        self.cache.iter().filter(|room| room.matches(&self.query)).collect()
    }

    /// Rebuild the cache from the data source. A failed load keeps the
    /// previous list.
    pub async fn load(&mut self, source: &dyn AdminDataSource) -> bool {
        match source.list_rooms().await {
            Ok(rooms) => {
                tracing::debug!(rooms = rooms.len(), "rooms loaded");
                self.cache = rooms;
                self.detail = RoomDetail::Empty;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load rooms");
                false
            }
        }
    }

    /// Re-filter the cached list without touching the backend
    pub fn search(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.detail = RoomDetail::Empty;
    }

    /// Open the room on a 1-based row of the visible list
    pub async fn open(&mut self, row: usize, source: &dyn AdminDataSource) -> Result<(), ActionError> {
        let room_id = row
            .checked_sub(1)
            .and_then(|index| self.visible().get(index).map(|room| room.room_id.clone()))
            .ok_or(ActionError::NoSuchRow { row, view: "rooms" })?;

        self.show(&room_id, source).await;
        Ok(())
    }

    pub async fn show(&mut self, room_id: &str, source: &dyn AdminDataSource) {
        let title = self
            .cache
            .iter()
            .find(|room| room.room_id == room_id)
            .map(Room::display_name)
            .unwrap_or_else(|| UNKNOWN_ROOM_TITLE.to_string());

        self.detail = match source.room_history(room_id).await {
            Ok(history) => RoomDetail::Loaded { title, history },
            Err(e) => {
                tracing::error!(room_id, error = %e, "failed to load room history");
                RoomDetail::Failed { title }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_data_source::outage::OutageSource;
    use crate::infrastructure::memory_data_source::InMemoryDataSource;

    #[tokio::test]
    async fn test_search_filters_cached_rooms() {
        let source = InMemoryDataSource::with_fixtures();
        let mut view = RoomsView::new();
        assert!(view.load(&source).await);
        let total = view.visible().len();

        view.search("bedroom");
        let visible = view.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].room_name.as_deref(), Some("Bedroom"));

        view.search("");
        assert_eq!(view.visible().len(), total);
    }

    #[tokio::test]
    async fn test_open_loads_history_for_the_visible_row() {
        let source = InMemoryDataSource::with_fixtures();
        let mut view = RoomsView::new();
        view.load(&source).await;
        view.search("bedroom");

        view.open(1, &source).await.unwrap();
        match view.detail() {
            RoomDetail::Loaded { title, history } => {
                assert_eq!(title, "3B - Bedroom");
                assert_eq!(history.readings.len(), 2);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_room_gets_generic_title() {
        let source = InMemoryDataSource::with_fixtures();
        let mut view = RoomsView::new();
        view.show("nowhere", &source).await;
        assert_eq!(
            view.detail(),
            &RoomDetail::Loaded {
                title: "Room Details".to_string(),
                history: RoomHistory::default()
            }
        );
    }

    #[tokio::test]
    async fn test_reload_clears_selection() {
        let source = InMemoryDataSource::with_fixtures();
        let mut view = RoomsView::new();
        view.load(&source).await;
        view.open(1, &source).await.unwrap();
        assert_ne!(view.detail(), &RoomDetail::Empty);

        view.load(&source).await;
        assert_eq!(view.detail(), &RoomDetail::Empty);
        assert!(matches!(
            view.open(9, &source).await,
            Err(ActionError::NoSuchRow { row: 9, .. })
        ));
    }

    #[tokio::test]
    async fn test_outage_keeps_cache_and_fails_the_detail() {
        let source = OutageSource::with_fixtures();
        let mut view = RoomsView::new();
        assert!(view.load(&source).await);
        let cached: Vec<Room> = view.visible().into_iter().cloned().collect();

        source.go_down();
        assert!(!view.load(&source).await);
        let after: Vec<Room> = view.visible().into_iter().cloned().collect();
        assert_eq!(after, cached);

        view.open(1, &source).await.unwrap();
        assert_eq!(
            view.detail(),
            &RoomDetail::Failed {
                title: cached[0].display_name()
            }
        );
    }
}
