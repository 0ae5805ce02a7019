mod load;
mod provenance;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use polyfit::{Fitness, PolygonEvaluator, PolygonFit, ResidueMethod, Vec2};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Polygon fitting over 2D point clouds")]
struct Cmd {
    /// Log at debug level instead of info
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Score one candidate and print a JSON report
    Eval {
        #[command(flatten)]
        problem: Problem,
    },
    /// Write the candidate's corners (csv or parquet) plus a provenance sidecar
    Corners {
        #[command(flatten)]
        problem: Problem,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Point cloud, polygon shape and candidate shared by `eval` and `corners`.
#[derive(Args)]
struct Problem {
    /// Point cloud: headerless `x,y` CSV, or PNG (red pixels are points)
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value_t = 4)]
    sides: usize,
    /// `segment` or `line`
    #[arg(long, default_value = "segment")]
    residue: String,
    /// Boundary indices into the angle-sorted points; evenly spaced if omitted
    #[arg(long, value_delimiter = ',')]
    indices: Vec<usize>,
}

#[derive(Serialize)]
struct EvalReport {
    input: String,
    sides: usize,
    residue: String,
    points: usize,
    centroid: [f64; 2],
    indices: Vec<usize>,
    valid: bool,
    fitness: f64,
    rejection: Option<String>,
    corners: Vec<[f64; 2]>,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Eval { problem } => eval(&problem),
        Action::Corners { problem, out } => corners(&problem, &out),
        Action::Report => report(),
    }
}

fn prepare(problem: &Problem) -> Result<(PolygonEvaluator, Vec<usize>)> {
    let method: ResidueMethod = problem.residue.parse()?;
    let points = load::load_points(&problem.input)?;
    let eval = PolygonEvaluator::new(points, problem.sides, method)
        .with_context(|| format!("preparing {}", problem.input.display()))?;
    let indices = if problem.indices.is_empty() {
        eval.uniform_indices()
    } else {
        problem.indices.clone()
    };
    Ok((eval, indices))
}

fn xy(p: &Vec2<f64>) -> [f64; 2] {
    [p.x, p.y]
}

fn build_report(
    problem: &Problem,
    eval: &PolygonEvaluator,
    indices: Vec<usize>,
    fit: &PolygonFit,
) -> EvalReport {
    let fitness = Fitness::from(fit);
    EvalReport {
        input: problem.input.display().to_string(),
        sides: eval.num_sides(),
        residue: eval.residue_method().to_string(),
        points: eval.points().len(),
        centroid: xy(&eval.points().centroid()),
        indices,
        valid: fitness.is_valid(),
        fitness: fitness.score(),
        rejection: fitness.rejection().map(|r| r.to_string()),
        corners: fit.corner_points().iter().map(xy).collect(),
    }
}

fn eval(problem: &Problem) -> Result<()> {
    let (eval, indices) = prepare(problem)?;
    let fit = eval.fit(&indices)?;
    let report = build_report(problem, &eval, indices, &fit);
    tracing::info!(valid = report.valid, fitness = report.fitness, "eval");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn corners(problem: &Problem, out: &Path) -> Result<()> {
    let (eval, indices) = prepare(problem)?;
    let fit = eval.fit(&indices)?;
    load::write_corners(out, &fit.corner_points())?;
    let report = build_report(problem, &eval, indices, &fit);

    let params = serde_json::json!({
        "input": report.input,
        "sides": report.sides,
        "residue": report.residue,
        "indices": report.indices,
    });
    let outcome = serde_json::json!({
        "valid": report.valid,
        "fitness": report.fitness,
        "rejection": report.rejection,
    });
    let sidecar =
        provenance::write_sidecar(out, provenance::Payload::new(params).with_outcome(outcome))?;
    tracing::info!(sidecar = %sidecar.display(), "corners");
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "polyfit": polyfit::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
