//! Minimal CLI driver over `superbubble_core`: reads an edge-list file,
//! runs detection, writes a text report. Not part of the detection core.
use std::fs;
use std::io::Write;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use superbubble_core::{find, Graph};

/// Dumps every superbubble found in an edge-list graph file.
#[derive(Parser)]
#[command(name = "dump-superbubbles", about = "Find superbubbles in a directed graph")]
struct Cli {
    /// Input file: first line is the vertex count, each following line an "u v" edge.
    #[arg(short = 'i', long = "input")]
    input: String,

    /// Output file for the report.
    #[arg(short = 'o', long = "output")]
    output: String,
}

fn parse_graph(text: &str) -> Option<Graph> {
    let mut lines = text.lines();
    let n: usize = lines.next()?.trim().parse().ok()?;
    let mut graph = Graph::new(n);
    for line in lines {
        let mut parts = line.split_whitespace();
        let u: usize = parts.next()?.parse().ok()?;
        let v: usize = parts.next()?.parse().ok()?;
        graph.add_edge(u, v).ok()?;
    }
    Some(graph)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let text = match fs::read_to_string(&cli.input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot open input file: {err}");
            return ExitCode::FAILURE;
        }
    };

    let Some(graph) = parse_graph(&text) else {
        eprintln!("malformed input file: {}", cli.input);
        return ExitCode::FAILURE;
    };

    let start = Instant::now();
    let bubbles = find(&graph);
    let elapsed = start.elapsed();

    let mut report = String::new();
    report.push_str(&format!("Vertices: {}\n", graph.num_vertices()));
    report.push_str(&format!("Edges: {}\n", graph.num_edges()));
    report.push_str(&format!("Elapsed time for processing: {:.6} secs.\n", elapsed.as_secs_f64()));
    report.push_str(&format!("Number of superbubbles found: {}.\n", bubbles.len()));
    for sb in &bubbles {
        report.push_str(&format!("<{},{}>\n", sb.entrance, sb.exit));
    }

    match fs::File::create(&cli.output).and_then(|mut f| f.write_all(report.as_bytes())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cannot open output file: {err}");
            ExitCode::FAILURE
        }
    }
}
