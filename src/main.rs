use clap::{Parser, Subcommand};
use nebula_lucent::content::{Category, ContentItem, ContentKind};
use nebula_lucent::scaffold::{self, NewPost};
use nebula_lucent::store::ContentStore;
use nebula_lucent::{config, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "nebula-lucent")]
#[command(about = "Static site generator for a cosmic personal site")]
#[command(long_about = "\
Static site generator for a cosmic personal site

Posts, lab experiments and portfolio projects become masonry card grids over
an animated star field. Projects also orbit in the galaxy on /program/.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── assets/                      # Static files → copied to dist/assets/
  ├── posts/                       # Blog posts, front-matter + markdown
  │   ├── 2025-01-01-first-light.mdx
  │   └── notes/2024-11-02-orbits.md   # Subdirectories are walked
  ├── projects.toml                # [[project]] entries (the galaxy)
  ├── experiments.toml             # [[experiment]] entries (the lab)
  └── knowledge.toml               # [[category]] entries

Broken sources are skipped with a warning; run 'nebula-lucent check' to see
them. Run 'nebula-lucent gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the site into the output directory
    Build,
    /// Load all content and report problems without building
    Check,
    /// List content items, featured first then newest
    List {
        /// Only this kind: post, experiment or project
        #[arg(long)]
        kind: Option<ContentKind>,
        /// Only items with this tag or technology
        #[arg(long)]
        tag: Option<String>,
        /// Only this category, e.g. web, 3d, js-effect
        #[arg(long)]
        category: Option<Category>,
        /// Print the items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one item by id
    Show {
        id: String,
    },
    /// Scaffold a new post; prompts for the fields when no title is given
    NewPost {
        /// Post title
        title: Vec<String>,
        #[arg(long, default_value = "")]
        excerpt: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "")]
        author: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.source)?;
            println!("==> Loading {}", cli.source.display());
            let store = ContentStore::load(&cli.source, &config.posts);
            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&store, &config, &cli.source, &cli.output)?;
            output::print_generate_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let config = config::load_config(&cli.source)?;
            println!("==> Checking {}", cli.source.display());
            let store = ContentStore::load(&cli.source, &config.posts);
            output::print_load_output(&store, &config, &cli.source);
            if !store.warnings().is_empty() {
                std::process::exit(1);
            }
            println!("==> Content is valid");
        }
        Command::List {
            kind,
            tag,
            category,
            json,
        } => {
            let config = config::load_config(&cli.source)?;
            let store = ContentStore::load(&cli.source, &config.posts);
            let items: Vec<&ContentItem> = store
                .list()
                .iter()
                .filter(|i| kind.is_none_or(|k| i.kind == k))
                .filter(|i| category.is_none_or(|c| i.category == c))
                .filter(|i| tag.as_deref().is_none_or(|t| i.has_tag(t)))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                output::print_list_output(&items);
            }
        }
        Command::Show { id } => {
            let config = config::load_config(&cli.source)?;
            let store = ContentStore::load(&cli.source, &config.posts);
            match store.get(&id) {
                Ok(item) => output::print_item_detail(item, config.posts.words_per_minute),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Command::NewPost {
            title,
            excerpt,
            tags,
            author,
        } => {
            let config = config::load_config(&cli.source)?;
            let post = if title.is_empty() {
                let stdin = std::io::stdin();
                scaffold::prompt_post(&mut stdin.lock(), &mut std::io::stdout())
            } else {
                Ok(NewPost {
                    title: title.join(" "),
                    excerpt,
                    tags: scaffold::parse_tags(&tags),
                    author,
                })
            };
            let date = chrono::Local::now().date_naive();
            let posts_dir = cli.source.join(&config.posts.dir);
            match post.and_then(|p| scaffold::create_post(&posts_dir, &p, date)) {
                Ok(path) => println!("Created {}", path.display()),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
