use std::path::Path;

use heightmesh::terrain::{ChangeWatcher, GenerationParameters, PollOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TICKS: u32 = 120;

/// Simulates an editor nudging one parameter
fn edit(params: &mut GenerationParameters, rng: &mut StdRng) {
    match rng.random_range(0..4) {
        0 => {
            let layer = rng.random_range(0..params.noise_layers.len());
            params.noise_layers[layer].weight = rng.random_range(0.0..1.0);
        }
        1 => {
            let layer = rng.random_range(0..params.noise_layers.len());
            params.noise_layers[layer].frequency_scale = rng.random_range(0.05..1.0);
        }
        2 => {
            params.grid_width = rng.random_range(8..96);
            params.grid_depth = rng.random_range(8..96);
        }
        _ => {
            params.height_scale = rng.random_range(1.0..20.0);
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut params = match std::env::args().nth(1) {
        Some(path) => match GenerationParameters::load(Path::new(&path)) {
            Ok(params) => params,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => GenerationParameters::terrain(),
    };

    let mut rng = StdRng::seed_from_u64(7);
    let mut watcher = ChangeWatcher::new();

    for tick in 0..TICKS {
        if tick > 0 && rng.random_bool(0.1) {
            edit(&mut params, &mut rng);
        }

        match watcher.poll(&params) {
            Ok(PollOutcome::Rebuilt(changes)) => {
                let Some(mesh) = watcher.mesh() else {
                    continue;
                };
                println!("Tick {}: rebuilt ({:?})", tick, changes);
                println!("  Grid: {}x{}", mesh.grid_width, mesh.grid_depth);
                println!("  Vertices: {}", mesh.vertex_count());
                println!("  Triangles: {}", mesh.triangle_count());
                println!(
                    "  Height range: [{:.3}, {:.3}]",
                    mesh.stats.min_height, mesh.stats.max_height
                );
                println!("  NaN nodes: {}", mesh.stats.numeric_faults);
            }
            Ok(_) => {}
            Err(e) => eprintln!("Tick {}: {}", tick, e),
        }
    }

    println!("Rebuilds over {} ticks: {}", TICKS, watcher.rebuild_count());
}
