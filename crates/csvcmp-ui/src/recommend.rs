//! Recommendation panel state and the debounced, generation-guarded refresh.
//!
//! Column discovery is asynchronous (local header reads, backend lookups)
//! and responses may arrive out of order. Every refresh takes a ticket from
//! [`RefreshGeneration`]; only the ticket matching the latest refresh may
//! commit its results, so a stale response is discarded on arrival rather
//! than clobbering newer state. Edits are additionally debounced through
//! [`RefreshDebounce`] so a typing burst issues one refresh, not one per
//! keystroke.

use std::time::{Duration, Instant};

use csvcmp_map::score::{AUTO_SELECT_MIN_SCORE, Recommendation, build_recommendations};
use csvcmp_model::{ColumnsPayload, MappingSummary};

use crate::wizard::{FileSource, MappingChoice, RunMode, WizardState};

/// Quiet period before an edited path triggers a refresh (milliseconds).
pub const REFRESH_DEBOUNCE_MS: u64 = 350;

/// Recommendation cards shown at once.
const VISIBLE_LIMIT: usize = 3;

/// Debounce tracker for refresh-triggering edits.
///
/// Takes an explicit `Instant` so tests stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct RefreshDebounce {
    last_changed: Option<Instant>,
}

impl RefreshDebounce {
    /// Records an edit at `now`, restarting the quiet period.
    pub fn touch(&mut self, now: Instant) {
        self.last_changed = Some(now);
    }

    /// True once the quiet period has elapsed since the last edit.
    #[must_use]
    pub fn ready(&self, now: Instant) -> bool {
        self.last_changed
            .is_some_and(|t| now.duration_since(t) >= Duration::from_millis(REFRESH_DEBOUNCE_MS))
    }

    /// Consumes the pending edit once a refresh has been issued.
    pub fn clear(&mut self) {
        self.last_changed = None;
    }
}

/// Monotonic refresh generation: last ticket wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshGeneration {
    latest: u64,
}

impl RefreshGeneration {
    /// Starts a new refresh, invalidating all earlier tickets.
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// True if `ticket` is still the newest refresh.
    #[must_use]
    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest == ticket
    }
}

/// What the recommendation panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendStatus {
    /// The store has no mappings at all.
    NoSavedMappings,
    /// One or both column sets are still unknown.
    WaitingForFiles,
    /// Columns are known but nothing scored above zero.
    NoMatches,
    /// Number of mappings that matched.
    Matches(usize),
}

impl RecommendStatus {
    /// Status line text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NoSavedMappings => "No saved mappings".to_string(),
            Self::WaitingForFiles => "Waiting for files".to_string(),
            Self::NoMatches => "No matches yet".to_string(),
            Self::Matches(count) => {
                let plural = if *count == 1 { "" } else { "es" };
                format!("{count} match{plural} found")
            }
        }
    }

    /// Hint shown in place of the empty list, where one applies.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NoSavedMappings => Some("Create a mapping to see recommendations."),
            Self::WaitingForFiles => Some("Upload or provide both CSVs to see recommendations."),
            _ => None,
        }
    }
}

/// State of the recommendation panel.
#[derive(Debug, Clone)]
pub struct RecommendPanel {
    /// Saved-mapping summaries, read once at startup.
    summaries: Vec<MappingSummary>,
    status: RecommendStatus,
    recommendations: Vec<Recommendation>,
    pub generation: RefreshGeneration,
    pub debounce: RefreshDebounce,
}

impl RecommendPanel {
    #[must_use]
    pub fn new(summaries: Vec<MappingSummary>) -> Self {
        let status = if summaries.is_empty() {
            RecommendStatus::NoSavedMappings
        } else {
            RecommendStatus::WaitingForFiles
        };
        Self {
            summaries,
            status,
            recommendations: Vec::new(),
            generation: RefreshGeneration::default(),
            debounce: RefreshDebounce::default(),
        }
    }

    #[must_use]
    pub fn status(&self) -> &RecommendStatus {
        &self.status
    }

    /// The cards currently rendered (top three).
    #[must_use]
    pub fn visible(&self) -> &[Recommendation] {
        let end = self.recommendations.len().min(VISIBLE_LIMIT);
        &self.recommendations[..end]
    }

    /// The best recommendation, if any.
    #[must_use]
    pub fn top(&self) -> Option<&Recommendation> {
        self.recommendations.first()
    }

    /// Whether the use-top-recommendation action is enabled.
    #[must_use]
    pub fn use_top_enabled(&self) -> bool {
        matches!(self.status, RecommendStatus::Matches(_))
    }

    /// Starts a refresh, returning the ticket the eventual commit must
    /// present.
    pub fn begin_refresh(&mut self) -> u64 {
        self.generation.begin()
    }

    /// Commits resolved columns for `ticket`.
    ///
    /// A stale ticket is discarded outright: returns false and leaves all
    /// state untouched. With both column sets known, recommendations are
    /// rebuilt and the top one is auto-selected into the wizard when the
    /// user is reusing a mapping, has not picked one yet, and the score
    /// clears [`AUTO_SELECT_MIN_SCORE`].
    pub fn commit(
        &mut self,
        ticket: u64,
        left_columns: &[String],
        right_columns: &[String],
        wizard: &mut WizardState,
    ) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!(ticket, "discarding stale recommendation refresh");
            return false;
        }
        if self.summaries.is_empty() {
            self.status = RecommendStatus::NoSavedMappings;
            self.recommendations.clear();
            return true;
        }
        if left_columns.is_empty() || right_columns.is_empty() {
            self.status = RecommendStatus::WaitingForFiles;
            self.recommendations.clear();
            return true;
        }
        self.recommendations = build_recommendations(&self.summaries, left_columns, right_columns);
        self.status = if self.recommendations.is_empty() {
            RecommendStatus::NoMatches
        } else {
            RecommendStatus::Matches(self.recommendations.len())
        };

        if wizard.mapping_choice() == MappingChoice::Existing
            && wizard.selected_mapping().is_none()
            && let Some(top) = self.top()
            && top.score >= AUTO_SELECT_MIN_SCORE
        {
            let name = top.name.clone();
            wizard.choose_existing(&name);
        }
        true
    }

    /// Applies the top recommendation to the wizard (the use-top action).
    pub fn use_top(&self, wizard: &mut WizardState) -> bool {
        match self.top() {
            Some(top) if self.use_top_enabled() => {
                let name = top.name.clone();
                wizard.choose_existing(&name);
                true
            }
            _ => false,
        }
    }
}

/// Source of column names for the two sides.
///
/// The panel stays I/O-free; callers implement this over local files and
/// the backend.
pub trait ColumnSource {
    /// Header columns of a locally available upload, empty when the file
    /// cannot be read.
    fn upload_columns(&self, source: &FileSource) -> Vec<String>;

    /// Backend lookup for server-known paths. Both sides may be requested
    /// in one call; failures degrade to the empty payload.
    fn remote_columns(&self, left_path: Option<&str>, right_path: Option<&str>) -> ColumnsPayload;
}

/// Resolves both column sets for the wizard's current sources.
///
/// Uploads win; the backend is consulted only when a side has a path and
/// its columns are still unknown, and it only fills sides that are still
/// empty.
pub fn resolve_columns<S: ColumnSource>(
    source: &S,
    wizard: &WizardState,
) -> (Vec<String>, Vec<String>) {
    let mut left = match &wizard.left {
        upload @ FileSource::Upload(_) => source.upload_columns(upload),
        _ => Vec::new(),
    };
    let mut right = match &wizard.right {
        upload @ FileSource::Upload(_) => source.upload_columns(upload),
        _ => Vec::new(),
    };
    let left_path = wizard.left.path();
    let right_path = wizard.right.path();
    if (left_path.is_some() && left.is_empty()) || (right_path.is_some() && right.is_empty()) {
        let fetched = source.remote_columns(left_path, right_path);
        if left.is_empty() {
            left = fetched.left_columns;
        }
        if right.is_empty() {
            right = fetched.right_columns;
        }
    }
    (left, right)
}

/// Runs one full refresh cycle: a no-op outside compare mode, otherwise
/// resolve columns and commit under a fresh ticket.
pub fn refresh_recommendations<S: ColumnSource>(
    panel: &mut RecommendPanel,
    wizard: &mut WizardState,
    source: &S,
) {
    if wizard.mode() != RunMode::Compare {
        return;
    }
    let ticket = panel.begin_refresh();
    let (left, right) = resolve_columns(source, wizard);
    panel.commit(ticket, &left, &right, wizard);
}

/// Edit-driven refresh: runs only once the debounce quiet period has
/// elapsed, then consumes the pending edit. Returns whether a refresh ran.
pub fn refresh_if_ready<S: ColumnSource>(
    panel: &mut RecommendPanel,
    wizard: &mut WizardState,
    source: &S,
    now: Instant,
) -> bool {
    if !panel.debounce.ready(now) {
        return false;
    }
    panel.debounce.clear();
    refresh_recommendations(panel, wizard, source);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn summaries() -> Vec<MappingSummary> {
        vec![
            MappingSummary {
                name: "customers".to_string(),
                field_count: 2,
                left_columns: columns(&["id", "name"]),
                right_columns: columns(&["id", "name"]),
                ..MappingSummary::default()
            },
            MappingSummary {
                name: "orders".to_string(),
                field_count: 1,
                left_columns: columns(&["order_id"]),
                right_columns: columns(&["order_id"]),
                ..MappingSummary::default()
            },
        ]
    }

    fn compare_wizard() -> WizardState {
        let mut wizard = WizardState::with_default_steps();
        wizard.set_mode(RunMode::Compare);
        wizard
    }

    #[test]
    fn debounce_waits_for_the_quiet_period() {
        let mut debounce = RefreshDebounce::default();
        let start = Instant::now();
        assert!(!debounce.ready(start));
        debounce.touch(start);
        assert!(!debounce.ready(start + Duration::from_millis(100)));
        assert!(debounce.ready(start + Duration::from_millis(REFRESH_DEBOUNCE_MS)));
        debounce.clear();
        assert!(!debounce.ready(start + Duration::from_secs(10)));
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut panel = RecommendPanel::new(summaries());
        let mut wizard = compare_wizard();

        let first = panel.begin_refresh();
        let second = panel.begin_refresh();

        // Newer refresh commits first.
        assert!(panel.commit(second, &columns(&["id", "name"]), &columns(&["id"]), &mut wizard));
        let status_after_second = panel.status().clone();

        // The older response arrives late and must change nothing.
        assert!(!panel.commit(first, &columns(&["order_id"]), &columns(&["order_id"]), &mut wizard));
        assert_eq!(panel.status(), &status_after_second);
        assert_eq!(panel.top().map(|r| r.name.as_str()), Some("customers"));
    }

    #[test]
    fn missing_side_waits_for_files() {
        let mut panel = RecommendPanel::new(summaries());
        let mut wizard = compare_wizard();
        let ticket = panel.begin_refresh();
        assert!(panel.commit(ticket, &columns(&["id"]), &[], &mut wizard));
        assert_eq!(panel.status(), &RecommendStatus::WaitingForFiles);
        assert!(panel.visible().is_empty());
        assert!(!panel.use_top_enabled());
    }

    #[test]
    fn no_saved_mappings_state_wins() {
        let mut panel = RecommendPanel::new(Vec::new());
        let mut wizard = compare_wizard();
        let ticket = panel.begin_refresh();
        assert!(panel.commit(ticket, &columns(&["id"]), &columns(&["id"]), &mut wizard));
        assert_eq!(panel.status(), &RecommendStatus::NoSavedMappings);
        assert_eq!(panel.status().hint(), Some("Create a mapping to see recommendations."));
    }

    #[test]
    fn auto_select_requires_existing_choice_and_no_selection() {
        let mut panel = RecommendPanel::new(summaries());

        // Choice is Create: no auto-select.
        let mut wizard = compare_wizard();
        let ticket = panel.begin_refresh();
        panel.commit(ticket, &columns(&["id", "name"]), &columns(&["id", "name"]), &mut wizard);
        assert_eq!(wizard.selected_mapping(), None);

        // Choice is Existing and nothing picked: the 100% match is selected.
        let mut wizard = compare_wizard();
        wizard.set_mapping_choice(MappingChoice::Existing);
        let ticket = panel.begin_refresh();
        panel.commit(ticket, &columns(&["id", "name"]), &columns(&["id", "name"]), &mut wizard);
        assert_eq!(wizard.selected_mapping(), Some("customers"));

        // An existing selection is never overwritten.
        let mut wizard = compare_wizard();
        wizard.choose_existing("orders");
        let ticket = panel.begin_refresh();
        panel.commit(ticket, &columns(&["id", "name"]), &columns(&["id", "name"]), &mut wizard);
        assert_eq!(wizard.selected_mapping(), Some("orders"));
    }

    #[test]
    fn low_scores_do_not_auto_select() {
        let mut panel = RecommendPanel::new(vec![MappingSummary {
            name: "weak".to_string(),
            field_count: 3,
            left_columns: columns(&["id", "aaa", "bbb"]),
            right_columns: columns(&["ccc"]),
            ..MappingSummary::default()
        }]);
        let mut wizard = compare_wizard();
        wizard.set_mapping_choice(MappingChoice::Existing);
        let ticket = panel.begin_refresh();
        panel.commit(ticket, &columns(&["id"]), &columns(&["ccc"]), &mut wizard);
        // 2/4 targets matched: half score, below the auto-select bar.
        assert!(matches!(panel.status(), RecommendStatus::Matches(1)));
        assert_eq!(wizard.selected_mapping(), None);
    }

    #[test]
    fn status_message_pluralizes() {
        assert_eq!(RecommendStatus::Matches(1).message(), "1 match found");
        assert_eq!(RecommendStatus::Matches(2).message(), "2 matches found");
        assert_eq!(RecommendStatus::NoMatches.message(), "No matches yet");
    }

    #[test]
    fn use_top_applies_only_when_matches_exist() {
        let mut panel = RecommendPanel::new(summaries());
        let mut wizard = compare_wizard();
        assert!(!panel.use_top(&mut wizard));

        let ticket = panel.begin_refresh();
        panel.commit(ticket, &columns(&["id", "name"]), &columns(&["id", "name"]), &mut wizard);
        assert!(panel.use_top(&mut wizard));
        assert_eq!(wizard.selected_mapping(), Some("customers"));
        assert_eq!(wizard.mapping_choice(), MappingChoice::Existing);
    }

    struct FakeSource {
        upload: Vec<String>,
        remote: ColumnsPayload,
    }

    impl ColumnSource for FakeSource {
        fn upload_columns(&self, _source: &FileSource) -> Vec<String> {
            self.upload.clone()
        }

        fn remote_columns(
            &self,
            _left_path: Option<&str>,
            _right_path: Option<&str>,
        ) -> ColumnsPayload {
            self.remote.clone()
        }
    }

    #[test]
    fn uploads_win_over_remote_lookup() {
        let source = FakeSource {
            upload: columns(&["id", "name"]),
            remote: ColumnsPayload {
                left_columns: columns(&["remote_left"]),
                right_columns: columns(&["remote_right"]),
            },
        };
        let mut wizard = compare_wizard();
        wizard.left = FileSource::Upload("left.csv".to_string());
        wizard.right = FileSource::Path("/srv/right.csv".to_string());

        let (left, right) = resolve_columns(&source, &wizard);
        assert_eq!(left, columns(&["id", "name"]));
        assert_eq!(right, columns(&["remote_right"]));
    }

    #[test]
    fn remote_lookup_skipped_without_paths() {
        struct PanickingSource;
        impl ColumnSource for PanickingSource {
            fn upload_columns(&self, _source: &FileSource) -> Vec<String> {
                Vec::new()
            }
            fn remote_columns(
                &self,
                _left_path: Option<&str>,
                _right_path: Option<&str>,
            ) -> ColumnsPayload {
                panic!("remote lookup must not run without paths");
            }
        }
        let wizard = compare_wizard();
        let (left, right) = resolve_columns(&PanickingSource, &wizard);
        assert!(left.is_empty() && right.is_empty());
    }

    #[test]
    fn edits_refresh_only_after_the_quiet_period() {
        let source = FakeSource {
            upload: columns(&["id", "name"]),
            remote: ColumnsPayload::default(),
        };
        let mut panel = RecommendPanel::new(summaries());
        let mut wizard = compare_wizard();
        wizard.left = FileSource::Upload("left.csv".to_string());
        wizard.right = FileSource::Upload("right.csv".to_string());

        let start = Instant::now();
        panel.debounce.touch(start);
        assert!(!refresh_if_ready(&mut panel, &mut wizard, &source, start));
        assert_eq!(panel.status(), &RecommendStatus::WaitingForFiles);

        let later = start + Duration::from_millis(REFRESH_DEBOUNCE_MS);
        assert!(refresh_if_ready(&mut panel, &mut wizard, &source, later));
        assert!(matches!(panel.status(), RecommendStatus::Matches(_)));

        // The edit was consumed; nothing further is pending.
        assert!(!refresh_if_ready(&mut panel, &mut wizard, &source, later));
    }

    #[test]
    fn refresh_is_a_noop_in_single_mode() {
        let source = FakeSource {
            upload: columns(&["id"]),
            remote: ColumnsPayload::default(),
        };
        let mut panel = RecommendPanel::new(summaries());
        let mut wizard = WizardState::with_default_steps();
        refresh_recommendations(&mut panel, &mut wizard, &source);
        assert_eq!(panel.status(), &RecommendStatus::WaitingForFiles);
    }
}
