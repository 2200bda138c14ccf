//! Umbra command line renderer.
//!
//! Renders one of the built-in sample scenes and writes the image to disk.

mod scenes;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{arg, value_parser, ArgMatches, Command};
use umbra_core::{Material, Mesh, Shape};
use umbra_math::Color;
use umbra_renderer::{render_with, RenderConfig};

use scenes::SceneRegistry;
use settings::{parse_resolution, Settings, ToneMapping};

fn cli() -> Command {
    Command::new("umbra")
        .about("Physically based path tracer")
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(
            "Images are divided by their brightest value by default. Use --clamp or --gamma \
             when that leaves them too dark.\n\n\
             Scanned models such as the teapot or dragon are not built in: add them to any \
             scene with --obj FILE.",
        )
        .arg(arg!(-s --scene <NAME> "Scene to render (see --list-scenes)"))
        .arg(arg!(-r --resolution <RES> "Output resolution (WIDTHxHEIGHT)"))
        .arg(
            arg!(--"indirect-steps" <N> "Indirect bounces per path, 0 disables indirect light")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(--"indirect-rays" <N> "Indirect rays traced at each primary hit")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(-j --threads <N> "Worker threads [default: all available]")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--seed <N> "Seed for indirect sampling").value_parser(value_parser!(u64)))
        .arg(arg!(--clamp "Clamp colours instead of dividing by the brightest value").conflicts_with("gamma"))
        .arg(arg!(--gamma "Apply gamma 2.2, then clamp"))
        .arg(arg!(-o --output <FILE> "Output image (.ppm or .png) [default: <SCENE>.ppm]").value_parser(value_parser!(PathBuf)))
        .arg(arg!(--config <FILE> "JSON settings file").value_parser(value_parser!(PathBuf)))
        .arg(arg!(--obj <FILE> "Add an OBJ mesh to the scene").value_parser(value_parser!(PathBuf)))
        .arg(arg!(--"list-scenes" "List the available scenes and exit"))
}

/// Settings given on the command line.
fn settings_from_matches(matches: &ArgMatches) -> Result<Settings> {
    let (width, height) = match matches.get_one::<String>("resolution") {
        Some(text) => {
            let (width, height) = parse_resolution(text)?;
            (Some(width), Some(height))
        }
        None => (None, None),
    };

    let save_mode = if matches.get_flag("clamp") {
        Some(ToneMapping::Clamp)
    } else if matches.get_flag("gamma") {
        Some(ToneMapping::Gamma)
    } else {
        None
    };

    Ok(Settings {
        scene: matches.get_one::<String>("scene").cloned(),
        width,
        height,
        indirect_steps: matches.get_one::<u32>("indirect-steps").copied(),
        indirect_rays: matches.get_one::<u32>("indirect-rays").copied(),
        threads: matches.get_one::<usize>("threads").copied(),
        seed: matches.get_one::<u64>("seed").copied(),
        save_mode,
        output: matches.get_one::<PathBuf>("output").cloned(),
        obj: matches.get_one::<PathBuf>("obj").cloned(),
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();
    let registry = SceneRegistry::with_samples();

    if matches.get_flag("list-scenes") {
        for name in registry.names() {
            println!("{name}");
        }
        println!("\nOBJ models (teapot, dragon, ...) can be added to any scene with --obj FILE");
        return Ok(());
    }

    let file_settings = match matches.get_one::<PathBuf>("config") {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let options = file_settings
        .overlay(settings_from_matches(&matches)?)
        .resolve()?;

    let mut scene = registry.build(&options.scene)?;
    if let Some(path) = &options.obj {
        let mesh = Mesh::load_obj(path)
            .with_context(|| format!("failed to load mesh {}", path.display()))?;
        let material = Material::phong(Color::new(0.6, 0.6, 0.55), Color::splat(0.2), 40.0)?;
        scene.add_shape(Shape::new(mesh).with_material(material));
    }
    if let Some((width, height)) = options.resolution {
        scene.set_image_dimensions(width, height);
    }
    scene.set_indirect_steps(options.indirect_steps);
    scene.set_indirect_rays(options.indirect_rays);

    log::info!("Scene '{}'", options.scene);
    let start = Instant::now();
    let image = render_with(
        &scene,
        &RenderConfig {
            threads: options.threads,
            seed: options.seed,
        },
    )?;

    image
        .save(&options.output, options.save_mode)
        .with_context(|| format!("failed to save {}", options.output.display()))?;
    println!(
        "Saved image {} ({:.2?})",
        options.output.display(),
        start.elapsed()
    );
    Ok(())
}
