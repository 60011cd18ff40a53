use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use orrery::content::{bundled_projects, load_projects, Project};
use orrery::gallery::Gallery;
use orrery::scene::SceneConfig;
use orrery::state::{self, ViewerOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Scroll-driven solar system where every planet is a project
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
  /// Project list (JSON); the bundled list is used when omitted
  #[arg(short, long)]
  projects: Option<PathBuf>,
  /// Seed for the galaxy and dust fields
  #[arg(long, default_value_t = 42)]
  seed: u64,
  /// Number of galaxy particles
  #[arg(long, default_value_t = 15000)]
  galaxy_particles: u32,
  /// Number of floating dust particles
  #[arg(long, default_value_t = 5000)]
  dust_particles: u32,
  /// Run in headless mode (no window)
  #[arg(long, default_value_t = false)]
  headless: bool,
  /// Stop a headless run after this many frames
  #[arg(long)]
  frames: Option<u64>,
  /// Milliseconds a headless run stays on each planet
  #[arg(long, default_value_t = 3000)]
  dwell_ms: u64,
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// List the projects, one per planet
  Projects {
    #[arg(short, long)]
    projects: Option<PathBuf>,
  },
  /// Print gallery albums, or one album with its photos, as JSON
  Gallery {
    /// Gallery root directory
    #[arg(long, default_value = "public/gallery")]
    root: PathBuf,
    /// Album folder name
    slug: Option<String>,
  },
  /// Generate shell completion scripts
  Completions {
    /// The shell to generate the script for
    #[arg(value_enum)]
    shell: Shell,
  },
}

fn projects_from(path: Option<&Path>) -> anyhow::Result<Vec<Project>> {
  match path {
    Some(path) => {
      load_projects(path).with_context(|| format!("loading projects from {}", path.display()))
    }
    None => Ok(bundled_projects()),
  }
}

fn print_gallery(root: PathBuf, slug: Option<String>) -> anyhow::Result<()> {
  let gallery = Gallery::new(root);
  let json = match slug {
    Some(slug) => {
      let album = gallery
        .album(&slug)
        .with_context(|| format!("album {slug:?} not found under {}", gallery.root().display()))?;
      serde_json::to_string_pretty(&album)?
    }
    None => serde_json::to_string_pretty(&gallery.albums())?,
  };
  println!("{json}");
  Ok(())
}

fn main() -> anyhow::Result<()> {
  env_logger::init();
  let args = Args::parse();

  match args.command {
    Some(Commands::Completions { shell }) => {
      let mut cmd = Args::command();
      let name = cmd.get_name().to_string();
      generate(shell, &mut cmd, name, &mut io::stdout());
      Ok(())
    }
    Some(Commands::Projects { projects }) => {
      for (i, p) in projects_from(projects.as_deref())?.iter().enumerate() {
        println!("[{i}] {} - {}", p.title, p.status);
      }
      Ok(())
    }
    Some(Commands::Gallery { root, slug }) => print_gallery(root, slug),
    None => {
      let projects = projects_from(args.projects.as_deref())?;
      let mut config = SceneConfig {
        seed: args.seed,
        ..Default::default()
      };
      config.galaxy.particle_count = args.galaxy_particles;
      config.dust.particle_count = args.dust_particles;

      state::run(
        projects,
        ViewerOptions {
          config,
          headless: args.headless,
          frames: args.frames,
          dwell: Duration::from_millis(args.dwell_ms),
        },
      )
    }
  }
}
