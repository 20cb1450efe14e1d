//! # rogue
//!
//! Headless driver for the simulation core. Generates one level, spawns the
//! player and a handful of mobs on free floor cells, computes the player's
//! field of view, and prints the viewport as ASCII.
//!
//! ```text
//! @ player   m mob   * path   # seen wall   . seen floor
//! ```

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rogue_core::{GlobalRng, Point, seed_global};
use rogue_ecs::{Entity, GroupName};
use rogue_map::{GeneratorConfig, WALL};

use rogue_app::{GameSession, SessionConfig};

#[derive(Parser)]
#[command(name = "rogue", about = "Generate a roguelike level and print the player's view")]
struct Args {
    /// Map width in cells
    #[arg(long, default_value_t = 80)]
    width: usize,

    /// Map height in cells
    #[arg(long, default_value_t = 50)]
    height: usize,

    /// Seed for the process-wide generator; drawn from the OS when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cellular-automaton smoothing passes
    #[arg(long, default_value_t = 10)]
    passes: usize,

    /// Viewport width in cells
    #[arg(long, default_value_t = 40)]
    view_width: i32,

    /// Viewport height in cells
    #[arg(long, default_value_t = 20)]
    view_height: i32,

    /// Number of mobs to spawn
    #[arg(short, long, default_value_t = 5)]
    mobs: usize,

    /// Level name
    #[arg(short, long, default_value = "level-1")]
    name: String,

    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    map: String,
    width: usize,
    height: usize,
    player: Point,
    mobs: usize,
    visible_entities: usize,
    path_target: Option<String>,
    path_length: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Some(seed) = args.seed {
        seed_global(seed);
        info!(seed, "seeded global generator");
    }
    let mut rng = GlobalRng;

    let config = SessionConfig::default()
        .with_generator(GeneratorConfig::default().with_passes(args.passes))
        .with_view_size(args.view_width, args.view_height);
    let mut session = GameSession::new(config);

    session
        .generate_map(&args.name, args.width, args.height, &mut rng)
        .context("generating map")?;

    let player_id = session
        .spawn(GroupName::Player, "player", &mut rng)
        .context("spawning player")?;
    for i in 0..args.mobs {
        session
            .spawn(GroupName::Mobs, &format!("mob{i}"), &mut rng)
            .with_context(|| format!("spawning mob {i}"))?;
    }

    let player = session
        .registry()
        .entity_by_id(GroupName::Player, player_id)
        .and_then(Entity::position)
        .context("player has no position")?;
    session.update_viewport(player)?;
    let open = session
        .adjacent_points(player.x, player.y)
        .iter()
        .filter(|a| !a.blocked)
        .count();
    info!(%player, open_neighbours = open, "player placed");

    let (path_target, path) = session
        .registry()
        .entities_in_group(GroupName::Mobs)
        .iter()
        .find_map(|mob| {
            let path = session.path_between(player, mob.position()?);
            (!path.is_empty()).then(|| (mob.full_name(), path))
        })
        .map_or((None, Vec::new()), |(name, path)| (Some(name), path));

    println!("{}", render(&session, &path)?);

    let summary = Summary {
        map: args.name.clone(),
        width: args.width,
        height: args.height,
        player,
        mobs: args.mobs,
        visible_entities: session.entities_in_viewport().len(),
        path_length: path.len(),
        path_target,
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} {}x{}: player at {}, {} mobs, {} in view, path to {} ({} steps)",
            summary.map,
            summary.width,
            summary.height,
            summary.player,
            summary.mobs,
            summary.visible_entities,
            summary.path_target.as_deref().unwrap_or("nothing"),
            summary.path_length.saturating_sub(1),
        );
    }

    Ok(())
}

/// Draw the current viewport. Entities are drawn wherever they stand; map
/// cells only where the player has seen them.
fn render(session: &GameSession, path: &[Point]) -> Result<String> {
    let map = session.current_map().context("no current map")?;
    let viewport = session.viewport();
    let end = viewport.extent();
    let path: HashSet<Point> = path.iter().copied().collect();

    let mut glyphs = HashMap::new();
    for (group, entity) in session.registry().iter() {
        let glyph = if group == GroupName::Player.as_str() { '@' } else { 'm' };
        if let Some(p) = entity.position() {
            glyphs.entry(p).or_insert(glyph);
        }
    }

    let mut out = String::new();
    for y in viewport.origin.y..end.y.min(map.height() as i32) {
        for x in viewport.origin.x..end.x.min(map.width() as i32) {
            let p = Point::new(x, y);
            let ch = match glyphs.get(&p) {
                Some(&g) => g,
                None if path.contains(&p) => '*',
                None if !map.is_visible(p) => ' ',
                None if map.cell_at(p) == Some(WALL) => '#',
                None => '.',
            };
            out.push(ch);
        }
        out.push('\n');
    }
    Ok(out)
}
