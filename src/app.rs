use crate::fetcher::FetchOrigin;
use crate::models::{Coordinate, PlaceRecord, Review};
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;
use tracing::debug;

/// Which screen is on top. `ReviewCompose` carries the draft the detail
/// screen hands over; submitting it is out of scope.
#[derive(Debug, PartialEq, Clone)]
pub enum Screen {
    PlaceDetail,
    ReviewCompose(ReviewDraft),
}

/// Pre-filled state for the review composition screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReviewDraft {
    pub name: String,
    pub rating: f64,
    pub review_text: String,
}

/// View state for one place detail page.
///
/// Created with empty defaults at mount and mutated only by the pipeline
/// results and the local bookmark toggle. Fetch results commit through
/// [`apply_place_update`](App::apply_place_update), which drops anything but
/// the most recently issued fetch.
pub struct App {
    pub place_id: String,
    pub screen: Screen,
    pub place: PlaceRecord,
    pub is_bookmarked: bool,
    /// Reviews authored through this app. Reserved; currently always empty.
    pub user_reviews: Vec<Review>,
    /// Reviews sourced from the remote place service.
    pub google_reviews: Vec<Review>,
    pub viewer_location: Option<Coordinate>,
    pub should_quit: bool,
    pub tick_count: usize,
    pub loading: bool,

    // System telemetry info
    pub last_update: Option<Instant>,
    pub last_origin: Option<FetchOrigin>,

    issued_seq: u64,
}

impl App {
    pub fn new(place_id: String) -> Self {
        Self {
            place_id,
            screen: Screen::PlaceDetail,
            place: PlaceRecord::default(),
            is_bookmarked: false,
            user_reviews: Vec::new(),
            google_reviews: Vec::new(),
            viewer_location: None,
            should_quit: false,
            tick_count: 0,
            loading: true,
            last_update: None,
            last_origin: None,
            issued_seq: 0,
        }
    }

    /// Reserves the sequence number for a fetch about to be spawned. Issuing
    /// a new one supersedes every fetch still in flight.
    pub fn next_fetch_seq(&mut self) -> u64 {
        self.issued_seq += 1;
        self.loading = true;
        self.issued_seq
    }

    pub fn set_viewer_location(&mut self, coord: Coordinate) {
        self.viewer_location = Some(coord);
    }

    /// Commits a fetch result, unless a newer fetch has been issued since.
    ///
    /// The record and review list fully replace the previous ones. The
    /// bookmark flag only comes from the bundled dataset; remote results
    /// leave the local toggle alone.
    pub fn apply_place_update(
        &mut self,
        seq: u64,
        record: PlaceRecord,
        reviews: Vec<Review>,
        origin: FetchOrigin,
    ) -> bool {
        if seq != self.issued_seq {
            debug!(
                "Discarding stale fetch result (seq {} superseded by {})",
                seq, self.issued_seq
            );
            return false;
        }

        if origin == FetchOrigin::Bundled {
            self.is_bookmarked = record.bookmark;
        }
        self.place = record;
        self.user_reviews = Vec::new();
        self.google_reviews = reviews;
        self.loading = false;
        self.last_update = Some(Instant::now());
        self.last_origin = Some(origin);
        true
    }

    pub fn on_tick(&mut self) {
        self.tick_count += 1;
    }

    pub fn toggle_bookmark(&mut self) {
        self.is_bookmarked = !self.is_bookmarked;
    }

    /// Opens the review composition screen with a fresh draft for this place.
    pub fn open_review_compose(&mut self) {
        self.screen = Screen::ReviewCompose(ReviewDraft {
            name: self.place.name.clone(),
            rating: 0.0,
            review_text: String::new(),
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::PlaceDetail => match key.code {
                // Back out of the page
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('b') => self.toggle_bookmark(),
                KeyCode::Char('w') => self.open_review_compose(),
                _ => {}
            },
            Screen::ReviewCompose(_) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.screen = Screen::PlaceDetail,
                _ => {}
            },
        }
    }
}
