//! Align command implementation - fill the grids, build the path tree, print it

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::PathBuf;

use aligntree_core::{
    format_score, render_path_grid, render_score_grid, write_tree, AlignError, Aligner, Alignment,
    AlignmentGrids, BoundaryPolicy, FastaParser, GapModel, PathTree, ScoreTable, Sequence,
    TreeBuilder,
};

use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::{BoundaryArg, OutputFormat};

/// Command-line values; `None` falls back to the configuration file.
#[derive(Debug, Clone)]
pub struct AlignOptions {
    pub input: PathBuf,
    pub matrix: Option<PathBuf>,
    pub gap_open: Option<i32>,
    pub gap_extend: Option<i32>,
    pub linear: bool,
    pub gap_penalty: Option<i32>,
    pub boundary: Option<BoundaryArg>,
    pub max_nodes: Option<usize>,
    pub show_grids: bool,
    pub format: OutputFormat,
}

impl From<BoundaryArg> for BoundaryPolicy {
    fn from(arg: BoundaryArg) -> Self {
        match arg {
            BoundaryArg::Exhaust => BoundaryPolicy::Exhaust,
            BoundaryArg::SingleStep => BoundaryPolicy::SingleStep,
        }
    }
}

/// Settings after merging the configuration file with CLI overrides
#[derive(Debug, Clone)]
struct Settings {
    matrix: Option<PathBuf>,
    match_score: i32,
    mismatch_score: i32,
    gaps: GapModel,
    builder: TreeBuilder,
    show_grids: bool,
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    sequence_a: &'a str,
    sequence_b: &'a str,
    length_a: usize,
    length_b: usize,
    gap_model: GapModel,
    boundary: BoundaryPolicy,
    best_score: f64,
    tree_nodes: usize,
    alignments: Vec<Alignment>,
}

pub fn execute(config: &Config, options: AlignOptions) -> Result<()> {
    log::info!("Input file: {}", options.input.display());

    if !options.input.exists() {
        return Err(CliError::file_not_found(options.input).into());
    }

    let settings = resolve_settings(config, &options)?;
    let (a, b) = FastaParser::read_pair(&options.input).map_err(CliError::from)?;
    log::info!("Aligning '{}' ({} residues) against '{}' ({} residues)", a.id, a.len(), b.id, b.len());

    let output = run_alignment(&settings, &a, &b)?;
    print!("{}", output);

    Ok(())
}

fn resolve_settings(config: &Config, options: &AlignOptions) -> CliResult<Settings> {
    let scoring = &config.scoring;

    // Any affine flag selects the affine model, any linear flag the linear one.
    let affine_flags = options.gap_open.is_some() || options.gap_extend.is_some();
    let linear_flags = options.linear || options.gap_penalty.is_some();
    let gaps = match (affine_flags, linear_flags) {
        (true, true) => {
            return Err(CliError::validation(
                "--gap-open/--gap-extend cannot be combined with --linear/--gap-penalty",
            ))
        }
        (true, false) => GapModel::affine(
            options.gap_open.unwrap_or(scoring.gap_open),
            options.gap_extend.unwrap_or(scoring.gap_extend),
        )?,
        (false, true) => GapModel::linear(options.gap_penalty.unwrap_or(scoring.gap_penalty))?,
        (false, false) => scoring.gap_model()?,
    };
    log::debug!("Gap model: {:?}", gaps);

    let boundary = options
        .boundary
        .map(BoundaryPolicy::from)
        .unwrap_or(config.tree.boundary);
    let max_nodes = options.max_nodes.unwrap_or(config.tree.max_nodes);
    if max_nodes == 0 {
        return Err(CliError::validation("--max-nodes must be at least 1"));
    }

    Ok(Settings {
        matrix: options.matrix.clone().or_else(|| scoring.matrix.clone()),
        match_score: scoring.match_score,
        mismatch_score: scoring.mismatch_score,
        gaps,
        builder: TreeBuilder::new(boundary, max_nodes),
        show_grids: options.show_grids || config.tree.show_grids,
        format: options.format,
    })
}

fn load_table(settings: &Settings, a: &Sequence, b: &Sequence) -> CliResult<ScoreTable> {
    match &settings.matrix {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::file_not_found(path.clone()));
            }
            log::info!("Score table: {}", path.display());
            Ok(ScoreTable::from_path(path)?)
        }
        None => {
            let alphabet: BTreeSet<u8> = a.residues().iter().chain(b.residues()).copied().collect();
            let alphabet: Vec<u8> = alphabet.into_iter().collect();
            log::info!(
                "Score table: identity over {} symbols (match {}, mismatch {})",
                alphabet.len(),
                settings.match_score,
                settings.mismatch_score
            );
            Ok(ScoreTable::identity(&alphabet, settings.match_score, settings.mismatch_score))
        }
    }
}

fn run_alignment(settings: &Settings, a: &Sequence, b: &Sequence) -> Result<String> {
    let table = load_table(settings, a, b)?;
    log::debug!(
        "Score table has {} entries over symbols {}",
        table.len(),
        String::from_utf8_lossy(&table.symbols())
    );
    if let Some((x, y)) = table.first_missing(a.residues(), b.residues()) {
        return Err(CliError::from(AlignError::MissingScore { a: x, b: y }).into());
    }
    let aligner = Aligner::new(table, settings.gaps);

    let grids = aligner.align(a, b).map_err(CliError::from)?;
    let tree = settings.builder.build(&grids, a, b).map_err(CliError::from)?;
    log::info!(
        "Best score {} with {} optimal alignment(s), {} tree nodes",
        format_score(grids.best_score()),
        tree.leaf_count(),
        tree.len()
    );

    match settings.format {
        OutputFormat::Tree => format_tree_output(settings, &grids, &tree),
        OutputFormat::Alignments => format_alignments_output(settings, &grids, &tree),
        OutputFormat::Json => {
            let report = Report {
                sequence_a: &a.id,
                sequence_b: &b.id,
                length_a: a.len(),
                length_b: b.len(),
                gap_model: settings.gaps,
                boundary: settings.builder.boundary,
                best_score: grids.best_score(),
                tree_nodes: tree.len(),
                alignments: tree.alignments(),
            };
            let mut json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            json.push('\n');
            Ok(json)
        }
    }
}

fn format_header(settings: &Settings, grids: &AlignmentGrids, out: &mut String) -> std::fmt::Result {
    if settings.show_grids {
        writeln!(out, "Alignment Matrix:")?;
        out.push_str(&render_score_grid(&grids.scores));
        writeln!(out, "\nPaths Matrix:")?;
        out.push_str(&render_path_grid(&grids.paths));
        writeln!(out)?;
    }
    writeln!(out, "Best score found = [{}]", format_score(grids.best_score()))
}

fn format_tree_output(settings: &Settings, grids: &AlignmentGrids, tree: &PathTree) -> Result<String> {
    let mut out = String::new();
    format_header(settings, grids, &mut out)?;
    writeln!(out, "\nSequences possible alignments tree:")?;
    write_tree(tree, &mut out)?;
    Ok(out)
}

fn format_alignments_output(settings: &Settings, grids: &AlignmentGrids, tree: &PathTree) -> Result<String> {
    let mut out = String::new();
    format_header(settings, grids, &mut out)?;
    for alignment in tree.alignments() {
        writeln!(out, "\n{}", alignment)?;
    }
    Ok(out)
}
