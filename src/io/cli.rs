//! Command-line interface for approximating one or many target images

use crate::algorithm::history::{PlacementHistory, replay, replay_final};
use crate::algorithm::search::{PlacementSearch, RoundOutcome, SearchConfig, SearchResult};
use crate::analysis::metrics::{mean_squared_error, structural_similarity};
use crate::io::configuration::{
    DEFAULT_MAX_SHAPES, DEFAULT_SEED, DEFAULT_TEMPLATE_SIZE, GIF_FRAME_DELAY_MS, HISTORY_SUFFIX,
    INPUT_EXTENSIONS, OUTPUT_SUFFIX, REPLAY_SUFFIX, TRIALS_PER_ROUND,
};
use crate::io::error::{Result, StencilError, invalid_parameter};
use crate::io::history::{load_history, save_history};
use crate::io::image::{export_raster_as_png, load_target};
use crate::io::progress::ProgressManager;
use crate::io::visualization::export_replay_gif;
use crate::spatial::{Raster, ShapeTemplate};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stencilfit")]
#[command(
    author,
    version,
    about = "Approximate grayscale images by stamping a star stencil"
)]
/// Command-line arguments for the stencil placement tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file or directory of images to approximate
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for reproducible searches
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Maximum number of stamps to place
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_SHAPES)]
    pub shapes: usize,

    /// Side length of the star stencil in pixels
    #[arg(short, long, default_value_t = DEFAULT_TEMPLATE_SIZE)]
    pub template_size: usize,

    /// Random trials evaluated per placement
    #[arg(long, default_value_t = TRIALS_PER_ROUND)]
    pub trials: usize,

    /// Export the placement sequence as an animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Write committed placements as x,y,scale,rotation rows
    #[arg(short, long)]
    pub placements: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(long)]
    pub no_skip: bool,

    /// Render a saved placement history onto the target's canvas instead of searching
    #[arg(long, value_name = "CSV")]
    pub replay: Option<PathBuf>,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Search configuration described by the flags
    ///
    /// # Errors
    ///
    /// Returns an error if the shape or trial count is zero
    pub fn search_config(&self) -> Result<SearchConfig> {
        let config = SearchConfig {
            max_shapes: self.shapes,
            trials_per_round: self.trials,
            ..SearchConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence; otherwise `info` is shown, or only warnings
/// when `quiet` is set.
pub fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // An embedding application may already have installed a subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Orchestrates batch processing of target images with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if argument validation, target collection or any
    /// file's processing fails
    pub fn process(&mut self) -> Result<()> {
        let config = self.cli.search_config()?;
        let template = ShapeTemplate::star(self.cli.template_size)?;

        if let Some(history_path) = self.cli.replay.clone() {
            return self.render_history(&history_path, &template);
        }

        let files = self.collect_files()?;

        if files.is_empty() {
            info!("nothing to process");
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index, &template, config)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if !is_supported_image(target) {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &format!("file must be one of: {}", INPUT_EXTENSIONS.join(", ")),
                ));
            }
            Ok(if self.should_process_file(target) {
                vec![target.clone()]
            } else {
                vec![]
            })
        } else if target.is_dir() {
            let entries = std::fs::read_dir(target).map_err(|e| StencilError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source: e,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let path = entry?.path();
                if is_supported_image(&path)
                    && !is_generated_output(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &target.display(),
                &"target must be an image file or directory",
            ))
        }
    }

    fn render_history(&self, history_path: &Path, template: &ShapeTemplate) -> Result<()> {
        let input_path = &self.cli.target;
        if !input_path.is_file() {
            return Err(invalid_parameter(
                "target",
                &input_path.display(),
                &"replaying a history needs a single image file",
            ));
        }

        let target = load_target(input_path)?;
        let history = load_history(history_path)?;
        let blank = Raster::blank(target.rows(), target.cols());
        let canvas = replay_final(&blank, template, &history)?;

        export_raster_as_png(&canvas, &Self::get_output_path(input_path))?;
        if self.cli.visualize {
            Self::export_visualization(input_path, &blank, template, &history)?;
        }

        info!(
            path = %input_path.display(),
            history = %history_path.display(),
            placements = history.len(),
            mse = mean_squared_error(&canvas, &target)?,
            "rendered saved history"
        );
        Ok(())
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            warn!(path = %input_path.display(), "skipping, output exists");
            false
        } else {
            true
        }
    }

    fn process_file(
        &mut self,
        input_path: &Path,
        index: usize,
        template: &ShapeTemplate,
        config: SearchConfig,
    ) -> Result<()> {
        let start_time = Instant::now();

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, config.max_shapes);
        }

        let target = load_target(input_path)?;
        let blank = Raster::blank(target.rows(), target.cols());
        let mut rng = StdRng::seed_from_u64(self.cli.seed);

        info!(
            path = %input_path.display(),
            rows = target.rows(),
            cols = target.cols(),
            max_shapes = config.max_shapes,
            "approximating target"
        );

        let mut search = PlacementSearch::new(&target, blank.clone(), template, config)?;
        while let RoundOutcome::Committed { round, mse, .. } = search.step(&mut rng)? {
            if let Some(ref mut pm) = self.progress_manager {
                pm.update_round(index, round + 1, mse);
            }
        }
        let result = search.into_result();

        self.export_results(input_path, &blank, template, &result)?;
        Self::report(input_path, &target, &result, start_time);

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, result.history.len());
        }

        Ok(())
    }

    fn export_results(
        &self,
        input_path: &Path,
        blank: &Raster,
        template: &ShapeTemplate,
        result: &SearchResult,
    ) -> Result<()> {
        export_raster_as_png(&result.canvas, &Self::get_output_path(input_path))?;

        if self.cli.placements {
            save_history(&result.history, &Self::get_history_path(input_path))?;
        }

        if self.cli.visualize {
            Self::export_visualization(input_path, blank, template, &result.history)?;
        }

        Ok(())
    }

    fn export_visualization(
        input_path: &Path,
        blank: &Raster,
        template: &ShapeTemplate,
        history: &PlacementHistory,
    ) -> Result<()> {
        let frames = replay(blank, template, history)?;
        export_replay_gif(
            &frames,
            &Self::get_visualization_path(input_path),
            GIF_FRAME_DELAY_MS,
        )
    }

    fn report(input_path: &Path, target: &Raster, result: &SearchResult, start_time: Instant) {
        match structural_similarity(&result.canvas, target) {
            Ok(ssim) => info!(
                path = %input_path.display(),
                placements = result.history.len(),
                termination = ?result.termination,
                mse = result.final_mse,
                ssim,
                elapsed_secs = start_time.elapsed().as_secs_f64(),
                "finished target"
            ),
            Err(error) => warn!(
                path = %input_path.display(),
                placements = result.history.len(),
                mse = result.final_mse,
                %error,
                "finished target, similarity unavailable"
            ),
        }
    }

    /// Path of the rendered canvas for `input_path`
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        sibling_path(input_path, OUTPUT_SUFFIX, "png")
    }

    /// Path of the placement history for `input_path`
    pub fn get_history_path(input_path: &Path) -> PathBuf {
        sibling_path(input_path, HISTORY_SUFFIX, "csv")
    }

    /// Path of the replay animation for `input_path`
    pub fn get_visualization_path(input_path: &Path) -> PathBuf {
        sibling_path(input_path, REPLAY_SUFFIX, "gif")
    }
}

fn sibling_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let name = format!("{}{suffix}.{extension}", stem.to_string_lossy());

    input_path
        .parent()
        .map_or_else(|| PathBuf::from(&name), |parent| parent.join(&name))
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            INPUT_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
}

fn is_generated_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}
