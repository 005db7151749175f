//! Round-by-round progress display for one or many target files

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Display state of one target file
#[derive(Debug, Clone, Default)]
struct FileState {
    name: String,
    round: usize,
    max_rounds: usize,
    mse: Option<f64>,
}

/// Shows search rounds per file, batching the display for large directories
///
/// Up to `MAX_INDIVIDUAL_PROGRESS_BARS` files get their own bar; beyond that
/// an extra bar counts finished files while the per-file bars roll over to
/// the most recently started ones.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    files: Vec<FileState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static ROUND_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>20} [{bar:30.cyan/blue}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Targets: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a progress manager drawing to stderr
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Create a progress manager that renders nothing
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(target),
            batch_bar: None,
            file_bars: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Create bars for `file_count` targets
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(0);
            bar.set_style(ROUND_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Register the target at `index` with its round budget
    pub fn start_file(&mut self, index: usize, path: &Path, max_rounds: usize) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.files.len() {
            self.files.resize(index + 1, FileState::default());
        }
        if let Some(state) = self.files.get_mut(index) {
            *state = FileState {
                name,
                round: 0,
                max_rounds,
                mse: None,
            };
        }
        self.update_bars();
    }

    /// Report a committed round and the canvas error after it
    pub fn update_round(&mut self, index: usize, round: usize, mse: f64) {
        if let Some(state) = self.files.get_mut(index) {
            state.round = round;
            state.mse = Some(mse);
        }
        self.update_bars();
    }

    /// Mark the target at `index` finished after `rounds` committed placements
    ///
    /// A search that converged early ends with its bar short of the budget.
    pub fn complete_file(&mut self, index: usize, rounds: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.files.get_mut(index) {
            state.name = format!("✓ {}", state.name);
            state.round = rounds;
            state.max_rounds = state.max_rounds.max(rounds);
        }
        self.update_bars();
    }

    /// Remove all bars from the terminal
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All targets processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Number of targets registered so far
    pub fn tracked_files(&self) -> usize {
        self.files.iter().filter(|state| !state.name.is_empty()).count()
    }

    /// Show the most recently started targets on the available bars
    fn update_bars(&self) {
        let active: Vec<&FileState> = self
            .files
            .iter()
            .filter(|state| !state.name.is_empty())
            .collect();
        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar, state) in self.file_bars.iter().zip(visible) {
            bar.set_length(state.max_rounds as u64);
            bar.set_position(state.round as u64);
            bar.set_prefix(state.name.clone());
            let width = state.max_rounds.to_string().len();
            let message = state.mse.map_or_else(
                || format!("{:>width$}/{}", state.round, state.max_rounds),
                |mse| format!("{:>width$}/{} mse {mse:.1}", state.round, state.max_rounds),
            );
            bar.set_message(message);
        }

        for bar in self.file_bars.iter().skip(visible.len()) {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_message(String::new());
            bar.set_prefix(String::new());
        }
    }
}
