//! ShipChain Headless Generation Harness
//!
//! Builds a whole campaign in-process and checks every deck against the
//! generation invariants. No renderer, no assets, no networking.
//!
//! Usage:
//!   cargo run -p shipchain-simtest
//!   cargo run -p shipchain-simtest -- --verbose
//!   cargo run -p shipchain-simtest -- --seed 42 --config gen.json --catalog npcs.json
//!   cargo run -p shipchain-simtest -- --seed 42 --dump 0 > deck0.json

use shipchain_logic::catalog::StaticCatalog;
use shipchain_logic::constants::anchors;
use shipchain_logic::graph::IncomingVector;
use shipchain_logic::grid::GridPos;
use shipchain_logic::hull::{hull_mask, HullStyle};
use shipchain_logic::spine::SpineRoute;
use shipchain_logic::validate::{validate_deck, validate_graph, Severity};
use shipchain_logic::{anchor, Campaign, GenerationConfig};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Default)]
struct Args {
    verbose: bool,
    seed: Option<u64>,
    config: Option<String>,
    catalog: Option<String>,
    dump: Option<usize>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" => args.verbose = true,
            "--seed" => args.seed = Some(parse_value(&arg, iter.next())?),
            "--dump" => args.dump = Some(parse_value(&arg, iter.next())?),
            "--config" => args.config = Some(iter.next().ok_or("--config needs a path")?),
            "--catalog" => args.catalog = Some(iter.next().ok_or("--catalog needs a path")?),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(args)
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("{} got an invalid value: {}", flag, value))
}

fn main() {
    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &args.config {
        Some(path) => match GenerationConfig::from_path(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let catalog = match &args.catalog {
        Some(path) => match StaticCatalog::from_path(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => StaticCatalog::builtin(),
    };

    let campaign = match Campaign::new(config, catalog) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if let Some(index) = args.dump {
        dump_deck(&campaign, index);
        return;
    }

    let verbose = args.verbose;
    println!("=== ShipChain Generation Harness ===\n");
    println!(
        "seed {} | {} decks over {} depths | {} NPC skins\n",
        campaign.config().seed,
        campaign.deck_count(),
        campaign.graph().depth_count(),
        campaign.catalog().len()
    );

    let mut results = Vec::new();

    // 1. Campaign graph shape
    results.extend(validate_campaign_graph(&campaign, verbose));

    // 2. Every deck through the full pipeline
    results.extend(validate_all_decks(&campaign, verbose));

    // 3. Regeneration is byte-identical
    results.extend(validate_determinism(&campaign, verbose));

    // 4. Anchor snapping on each hull
    results.extend(validate_anchor_snapping(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn dump_deck(campaign: &Campaign, index: usize) {
    let Some(level) = campaign.generate_level(index) else {
        eprintln!(
            "Deck {} does not exist ({} decks)",
            index,
            campaign.deck_count()
        );
        std::process::exit(2);
    };
    match serde_json::to_string_pretty(&level) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize deck {}: {}", index, e);
            std::process::exit(1);
        }
    }
}

// ── 1. Campaign Graph ───────────────────────────────────────────────────

fn validate_campaign_graph(campaign: &Campaign, verbose: bool) -> Vec<TestResult> {
    println!("--- Campaign Graph ---");
    let mut results = Vec::new();
    let graph = campaign.graph();
    let depth = graph.depth_count() as usize;

    let errors = validate_graph(graph);
    results.push(TestResult {
        name: "graph_shape".into(),
        passed: errors.is_empty(),
        detail: match errors.first() {
            Some(e) => format!("{} problems, first: {}", errors.len(), e.message),
            None => "trellis is well formed".into(),
        },
    });

    let min = depth;
    let max = (3 * depth).saturating_sub(2).max(depth);
    results.push(TestResult {
        name: "graph_node_count".into(),
        passed: (min..=max).contains(&graph.len()),
        detail: format!("{} nodes (allowed {}..={})", graph.len(), min, max),
    });

    let side_lanes = graph.nodes().iter().filter(|n| n.lateral != 0).count();
    if verbose {
        println!("  {} side-lane decks", side_lanes);
    }
    results.push(TestResult {
        name: "graph_terminal_depth".into(),
        passed: graph
            .at_depth(graph.depth_count())
            .all(|n| n.exits.is_empty()),
        detail: "last depth has no exits".into(),
    });

    results
}

// ── 2. Deck Pipeline ────────────────────────────────────────────────────

fn validate_all_decks(campaign: &Campaign, verbose: bool) -> Vec<TestResult> {
    println!("--- Deck Pipeline ---");
    let mut results = Vec::new();

    let mut failing = Vec::new();
    let mut warnings = 0;
    let mut fallbacks = 0;
    let (mut rooms, mut npcs, mut walls) = (0u64, 0u64, 0u64);

    for index in 0..campaign.deck_count() {
        let Some(build) = campaign.build_deck(index) else {
            failing.push(format!("deck {} missing", index));
            continue;
        };
        let findings = validate_deck(&build);
        warnings += findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count();
        if let Some(err) = findings.iter().find(|f| f.severity == Severity::Error) {
            failing.push(format!("deck {} [{}] {}", index, err.category, err.message));
        }
        if build.spine.route == SpineRoute::Fallback {
            fallbacks += 1;
        }
        rooms += u64::from(build.growth.rooms);
        npcs += build.growth.npcs as u64;
        walls += build.walls as u64;

        if verbose {
            let node = &campaign.graph().nodes()[index];
            println!(
                "  {} {:>6} {:>9?}: spine {:>3}, rooms {:>2}, npcs {:>2}, walls {:>4}",
                node.id,
                build.hull_style.name(),
                node.faction,
                build.spine.points.len(),
                build.growth.rooms,
                build.growth.npcs,
                build.walls
            );
        }
    }

    results.push(TestResult {
        name: "decks_valid".into(),
        passed: failing.is_empty(),
        detail: match failing.first() {
            Some(first) => format!("{} decks failing, first: {}", failing.len(), first),
            None => format!(
                "{} decks clean ({} warnings, {} line-fallback spines)",
                campaign.deck_count(),
                warnings,
                fallbacks
            ),
        },
    });

    results.push(TestResult {
        name: "decks_populated".into(),
        passed: rooms > 0 && walls > 0,
        detail: format!("{} rooms, {} npcs, {} wall stacks", rooms, npcs, walls),
    });

    let past_end = campaign.generate_level(campaign.deck_count());
    results.push(TestResult {
        name: "deck_past_end".into(),
        passed: past_end.is_none(),
        detail: "index past the node list yields no level".into(),
    });

    results
}

// ── 3. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(campaign: &Campaign, _verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let mut results = Vec::new();

    let last = campaign.deck_count().saturating_sub(1);
    for index in [0, last / 2, last] {
        let first = campaign.generate_level(index).map(|l| l.to_json());
        let second = campaign.generate_level(index).map(|l| l.to_json());
        let same = match (first, second) {
            (Some(Ok(a)), Some(Ok(b))) => a == b,
            _ => false,
        };
        results.push(TestResult {
            name: format!("deck_{}_repeatable", index),
            passed: same,
            detail: "two builds serialize identically".into(),
        });
    }

    results
}

// ── 4. Anchor Snapping ──────────────────────────────────────────────────

fn validate_anchor_snapping(verbose: bool) -> Vec<TestResult> {
    println!("--- Anchor Snapping ---");
    let mut results = Vec::new();

    let tube = hull_mask(HullStyle::Tube);
    let (spawn, exit) = anchor::resolve_anchors(IncomingVector::Start, &tube);
    let (sx, sy) = anchors::SPAWN_DEFAULT;
    let (ex, ey) = anchors::EXIT;
    results.push(TestResult {
        name: "tube_default_anchors".into(),
        passed: spawn.steps == 0
            && exit.steps == 0
            && spawn.anchor.pos == GridPos::round(sx, sy)
            && exit.anchor.pos == GridPos::round(ex, ey),
        detail: format!("spawn {} exit {}", spawn.anchor.pos, exit.anchor.pos),
    });

    for style in HullStyle::ALL {
        let mask = hull_mask(style);
        for incoming in [
            IncomingVector::Start,
            IncomingVector::FromLeft,
            IncomingVector::FromRight,
        ] {
            let (spawn, exit) = anchor::resolve_anchors(incoming, &mask);
            if verbose {
                println!(
                    "  {:>6} {:?}: spawn {} ({} steps), exit {} ({} steps)",
                    style.name(),
                    incoming,
                    spawn.anchor.pos,
                    spawn.steps,
                    exit.anchor.pos,
                    exit.steps
                );
            }
            results.push(TestResult {
                name: format!("{}_{:?}_anchors_in_hull", style.name(), incoming),
                passed: spawn.in_hull && exit.in_hull,
                detail: format!("spawn {} steps, exit {} steps", spawn.steps, exit.steps),
            });
        }
    }

    results
}
