//! Step state machine for the "new run" wizard.
//!
//! Steps form a fixed ordered sequence; some are tagged compare-only and
//! disappear in single-file mode. The current position indexes into the
//! *visible* subset, so every mode change re-clamps it. Moving the user
//! silently backward when compare-only steps vanish is intended behavior.

/// Comparison mode of the run being configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Single,
    Compare,
}

/// Whether the user creates a fresh mapping or reuses a saved one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingChoice {
    #[default]
    Create,
    Existing,
}

/// Where a side's CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileSource {
    #[default]
    None,
    /// A file the user picked locally; carries the display name.
    Upload(String),
    /// A server-known path, resolvable through the backend.
    Path(String),
}

impl FileSource {
    /// Display name for summaries; `None` when nothing is selected.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Upload(name) | Self::Path(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() { None } else { Some(trimmed) }
            }
        }
    }

    /// The server path, if this side is path-backed.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => {
                let trimmed = path.trim();
                if trimmed.is_empty() { None } else { Some(trimmed) }
            }
            _ => None,
        }
    }
}

/// One step of the wizard.
#[derive(Debug, Clone)]
pub struct StepDef {
    pub id: String,
    /// Hidden unless the run is in compare mode.
    pub compare_only: bool,
}

impl StepDef {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            compare_only: false,
        }
    }

    #[must_use]
    pub fn compare_only(id: &str) -> Self {
        Self {
            id: id.to_string(),
            compare_only: true,
        }
    }
}

/// Render projection of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub id: String,
    pub visible: bool,
    pub active: bool,
    pub complete: bool,
}

/// Render projection of the review summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: &'static str,
    pub rule_file: String,
    pub left: String,
    pub right: String,
    pub mapping: String,
    /// The right-file row is hidden in single mode.
    pub show_right: bool,
    /// The mapping row is hidden in single mode.
    pub show_mapping: bool,
}

/// Mutable state of the run wizard.
#[derive(Debug, Clone)]
pub struct WizardState {
    steps: Vec<StepDef>,
    /// Index into the currently visible step subset.
    current: usize,
    mode: RunMode,
    mapping_choice: MappingChoice,
    pub left: FileSource,
    pub right: FileSource,
    selected_mapping: Option<String>,
    pub rule_file: Option<String>,
}

impl WizardState {
    /// Creates a wizard over the given step sequence, starting at the first
    /// step in single mode.
    #[must_use]
    pub fn new(steps: Vec<StepDef>) -> Self {
        Self {
            steps,
            current: 0,
            mode: RunMode::default(),
            mapping_choice: MappingChoice::default(),
            left: FileSource::None,
            right: FileSource::None,
            selected_mapping: None,
            rule_file: None,
        }
    }

    /// The default step sequence of the new-run form.
    #[must_use]
    pub fn with_default_steps() -> Self {
        Self::new(vec![
            StepDef::new("mode"),
            StepDef::new("files"),
            StepDef::compare_only("mapping"),
            StepDef::new("review"),
        ])
    }

    #[must_use]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    #[must_use]
    pub fn mapping_choice(&self) -> MappingChoice {
        self.mapping_choice
    }

    #[must_use]
    pub fn selected_mapping(&self) -> Option<&str> {
        self.selected_mapping.as_deref()
    }

    /// Steps visible under the current mode, in order.
    #[must_use]
    pub fn visible_steps(&self) -> Vec<&StepDef> {
        self.steps
            .iter()
            .filter(|step| !step.compare_only || self.mode == RunMode::Compare)
            .collect()
    }

    /// Index of the active step within the visible subset.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active step.
    #[must_use]
    pub fn current_step(&self) -> Option<&StepDef> {
        let visible = self.visible_steps();
        visible.get(self.current).copied()
    }

    /// Moves by `offset` visible steps, clamped to the ends. A no-op at
    /// either boundary; never wraps.
    pub fn go(&mut self, offset: isize) {
        let len = self.visible_steps().len();
        if len == 0 {
            return;
        }
        let next = (self.current as isize + offset).clamp(0, len as isize - 1);
        self.current = next as usize;
    }

    /// Switches mode, re-clamping the step index against the new visible
    /// subset. Leaving compare mode clears the mapping selection.
    pub fn set_mode(&mut self, mode: RunMode) {
        self.mode = mode;
        if mode != RunMode::Compare {
            self.selected_mapping = None;
        }
        let len = self.visible_steps().len();
        if len > 0 && self.current >= len {
            self.current = len - 1;
        }
    }

    /// Switches the mapping choice; anything but `Existing` clears the
    /// selection.
    pub fn set_mapping_choice(&mut self, choice: MappingChoice) {
        self.mapping_choice = choice;
        if choice != MappingChoice::Existing {
            self.selected_mapping = None;
        }
    }

    /// Picks a saved mapping, flipping the choice to `Existing`.
    pub fn choose_existing(&mut self, name: &str) {
        self.mapping_choice = MappingChoice::Existing;
        self.selected_mapping = Some(name.to_string());
    }

    /// Per-step render state: exactly one visible step is active, earlier
    /// visible steps are complete, hidden steps are neither.
    #[must_use]
    pub fn step_views(&self) -> Vec<StepView> {
        let visible_ids: Vec<&str> = self
            .visible_steps()
            .iter()
            .map(|step| step.id.as_str())
            .collect();
        self.steps
            .iter()
            .map(|step| {
                let position = visible_ids.iter().position(|id| *id == step.id);
                match position {
                    Some(idx) => StepView {
                        id: step.id.clone(),
                        visible: true,
                        active: idx == self.current,
                        complete: idx < self.current,
                    },
                    None => StepView {
                        id: step.id.clone(),
                        visible: false,
                        active: false,
                        complete: false,
                    },
                }
            })
            .collect()
    }

    /// Progress through the visible steps as a percentage. A single visible
    /// step counts as 100%.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let len = self.visible_steps().len();
        if len <= 1 {
            return 100;
        }
        (100.0 * self.current as f64 / (len - 1) as f64).round() as u8
    }

    /// Submit button label: creating a mapping in compare mode detours
    /// through the mapping builder, everything else starts the run.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.mode == RunMode::Compare && self.mapping_choice == MappingChoice::Create {
            "Continue to mapping builder"
        } else {
            "Start run"
        }
    }

    /// The review-step summary projection.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let compare = self.mode == RunMode::Compare;
        let mapping = if !compare {
            "Not needed".to_string()
        } else {
            match self.mapping_choice {
                MappingChoice::Create => "Create new mapping".to_string(),
                MappingChoice::Existing => self
                    .selected_mapping
                    .clone()
                    .unwrap_or_else(|| "Select a mapping".to_string()),
            }
        };
        RunSummary {
            mode: if compare { "Compare CSVs" } else { "Single CSV" },
            rule_file: self.rule_file.clone().unwrap_or_else(|| "--".to_string()),
            left: self
                .left
                .display_name()
                .unwrap_or("--")
                .to_string(),
            right: self
                .right
                .display_name()
                .unwrap_or("--")
                .to_string(),
            mapping,
            show_right: compare,
            show_mapping: compare,
        }
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::with_default_steps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compare_wizard() -> WizardState {
        let mut wizard = WizardState::with_default_steps();
        wizard.set_mode(RunMode::Compare);
        wizard
    }

    #[test]
    fn go_clamps_at_both_ends() {
        let mut wizard = compare_wizard();
        wizard.go(-1);
        assert_eq!(wizard.current_index(), 0);
        wizard.go(10);
        assert_eq!(wizard.current_index(), 3);
        wizard.go(1);
        assert_eq!(wizard.current_index(), 3);
        wizard.go(-2);
        assert_eq!(wizard.current_index(), 1);
    }

    #[test]
    fn compare_only_steps_hide_in_single_mode() {
        let mut wizard = compare_wizard();
        assert_eq!(wizard.visible_steps().len(), 4);
        wizard.set_mode(RunMode::Single);
        let ids: Vec<&str> = wizard
            .visible_steps()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["mode", "files", "review"]);
    }

    #[test]
    fn mode_switch_reclamps_current_step() {
        let mut wizard = compare_wizard();
        wizard.go(3);
        assert_eq!(wizard.current_step().map(|s| s.id.as_str()), Some("review"));
        wizard.set_mode(RunMode::Single);
        // Index 3 no longer exists in a 3-step subset; clamped to the last.
        assert_eq!(wizard.current_index(), 2);
        assert_eq!(wizard.current_step().map(|s| s.id.as_str()), Some("review"));
    }

    #[test]
    fn leaving_compare_clears_the_mapping_selection() {
        let mut wizard = compare_wizard();
        wizard.choose_existing("customers");
        wizard.set_mode(RunMode::Single);
        assert_eq!(wizard.selected_mapping(), None);
    }

    #[test]
    fn choice_change_clears_selection_unless_existing() {
        let mut wizard = compare_wizard();
        wizard.choose_existing("customers");
        wizard.set_mapping_choice(MappingChoice::Existing);
        assert_eq!(wizard.selected_mapping(), Some("customers"));
        wizard.set_mapping_choice(MappingChoice::Create);
        assert_eq!(wizard.selected_mapping(), None);
    }

    #[test]
    fn exactly_one_step_is_active() {
        let mut wizard = compare_wizard();
        wizard.go(2);
        let views = wizard.step_views();
        let active: Vec<&StepView> = views.iter().filter(|v| v.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "mapping");
        let complete: Vec<&str> = views
            .iter()
            .filter(|v| v.complete)
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(complete, vec!["mode", "files"]);
    }

    #[test]
    fn hidden_steps_are_neither_active_nor_complete() {
        let mut wizard = compare_wizard();
        wizard.go(3);
        wizard.set_mode(RunMode::Single);
        let views = wizard.step_views();
        let mapping = views.iter().find(|v| v.id == "mapping").expect("mapping step");
        assert!(!mapping.visible && !mapping.active && !mapping.complete);
    }

    #[test]
    fn progress_percent_tracks_visible_steps() {
        let mut wizard = compare_wizard();
        assert_eq!(wizard.progress_percent(), 0);
        wizard.go(1);
        assert_eq!(wizard.progress_percent(), 33);
        wizard.go(2);
        assert_eq!(wizard.progress_percent(), 100);

        let single = WizardState::new(vec![StepDef::new("only")]);
        assert_eq!(single.progress_percent(), 100);
    }

    #[test]
    fn submit_label_depends_on_mode_and_choice() {
        let mut wizard = compare_wizard();
        assert_eq!(wizard.submit_label(), "Continue to mapping builder");
        wizard.set_mapping_choice(MappingChoice::Existing);
        assert_eq!(wizard.submit_label(), "Start run");
        wizard.set_mode(RunMode::Single);
        assert_eq!(wizard.submit_label(), "Start run");
    }

    #[test]
    fn summary_reflects_sources_and_choice() {
        let mut wizard = compare_wizard();
        wizard.left = FileSource::Upload("left.csv".to_string());
        wizard.right = FileSource::Path("/data/right.csv".to_string());
        wizard.rule_file = Some("baseline.yaml".to_string());
        wizard.choose_existing("customers");

        let summary = wizard.summary();
        assert_eq!(summary.mode, "Compare CSVs");
        assert_eq!(summary.left, "left.csv");
        assert_eq!(summary.right, "/data/right.csv");
        assert_eq!(summary.mapping, "customers");
        assert!(summary.show_right && summary.show_mapping);

        wizard.set_mode(RunMode::Single);
        let summary = wizard.summary();
        assert_eq!(summary.mode, "Single CSV");
        assert_eq!(summary.mapping, "Not needed");
        assert!(!summary.show_right && !summary.show_mapping);
    }

    #[test]
    fn summary_falls_back_to_dashes() {
        let wizard = WizardState::with_default_steps();
        let summary = wizard.summary();
        assert_eq!(summary.left, "--");
        assert_eq!(summary.right, "--");
        assert_eq!(summary.rule_file, "--");
    }
}
