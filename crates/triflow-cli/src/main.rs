use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;
use triflow::prelude::*;

mod provenance;

#[derive(Parser)]
#[command(name = "triflow")]
#[command(about = "Constrained Delaunay triangulation and advancing-front meshing")]
struct Cmd {
    /// Optional run ticket; logged with tracing spans for easy correlation.
    #[arg(long)]
    vk: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Mesh the boundary curves in `input` and write the result to `out`.
    Mesh {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
        /// Target edge length used for boundary upsampling and relaxation.
        #[arg(long, default_value_t = 1.0)]
        target_length: f64,
        /// Caps the number of advancing-front sites processed; unbounded if omitted.
        #[arg(long)]
        max_sites: Option<usize>,
    },
    /// Print a small provenance JSON block.
    Report,
}

#[derive(Deserialize)]
struct BoundaryInput {
    curves: Vec<BoundaryCurve>,
}

#[derive(Deserialize)]
struct BoundaryCurve {
    points: Vec<[f64; 2]>,
    closed: bool,
}

#[derive(Serialize)]
struct MeshOutput {
    nodes: Vec<[f64; 2]>,
    cells: Vec<[usize; 3]>,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Mesh { input, out, target_length, max_sites } => mesh(input, out, target_length, max_sites, cmd.vk),
        Action::Report => report(cmd.vk),
    }
}

fn mesh(input: String, out: String, target_length: f64, max_sites: Option<usize>, vk: Option<String>) -> Result<()> {
    tracing::info!(input, out, target_length, vk = ?vk, "mesh");

    let raw = std::fs::read_to_string(&input).with_context(|| format!("reading {input}"))?;
    let boundary: BoundaryInput = serde_json::from_str(&raw).with_context(|| format!("parsing {input}"))?;

    let mut driver = Driver::new(move |_| target_length);
    for curve in &boundary.curves {
        let points = curve.points.iter().map(|&[x, y]| Point2::new(x, y)).collect();
        let curve = Curve::new(points, curve.closed).context("building boundary curve")?;
        driver.add_curve(curve);
    }
    driver.initialize_boundaries().map_err(|e| anyhow::anyhow!("initialize_boundaries: {e}"))?;

    let processed = driver.run(max_sites).map_err(|e| anyhow::anyhow!("advancing-front loop: {e}"))?;
    tracing::info!(processed, nodes = driver.mesh().node_count(), cells = driver.mesh().cell_count(), "mesh_complete");

    let mesh = driver.mesh();
    let live_nodes: Vec<_> = mesh.live_node_ids().collect();
    let index_of: std::collections::HashMap<_, _> = live_nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
    let output = MeshOutput {
        nodes: live_nodes.iter().map(|&n| { let p = mesh.node_x(n); [p.x, p.y] }).collect(),
        cells: mesh
            .live_cell_ids()
            .map(|c| {
                let [a, b, d] = mesh.cell_to_nodes(c);
                [index_of[&a], index_of[&b], index_of[&d]]
            })
            .collect(),
    };

    let out_path = Path::new(&out);
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&out, serde_json::to_vec_pretty(&output)?)?;

    provenance::write_sidecar(
        out_path,
        provenance::Payload::new(json!({
            "input": input,
            "target_length": target_length,
            "sites_processed": processed,
        })),
    )?;

    Ok(())
}

fn report(vk: Option<String>) -> Result<()> {
    let obj = json!({
        "code_rev": provenance::current_git_rev(),
        "vk": vk,
        "th": [],
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
