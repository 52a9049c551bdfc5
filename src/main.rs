//! CLI entry point for balasolu-blog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use balasolu_blog::commands::new::NewPost;
use balasolu_blog::Blog;

#[derive(Parser)]
#[command(name = "balasolu-blog")]
#[command(author = "Balanced Solutions Software")]
#[command(version)]
#[command(about = "Static generator for the Balanced Solutions Software blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Google Analytics measurement id, overriding _config.yml
    #[arg(long, global = true, env = "BLOG_GA_MEASUREMENT_ID")]
    analytics_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name to use instead of the slugified title
        #[arg(short, long)]
        slug: Option<String>,

        /// Summary shown under the title in the feed
        #[arg(long)]
        description: Option<String>,

        /// Mark the post as a draft
        #[arg(long)]
        draft: bool,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Remove the generated output
    Clean,

    /// List posts in feed order
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "balasolu_blog=debug,info"
    } else {
        "balasolu_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let analytics_id = cli.analytics_id;

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            balasolu_blog::commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            slug,
            description,
            draft,
        } => {
            let blog = Blog::open(&base_dir, analytics_id)?;
            let options = NewPost {
                slug: slug.as_deref(),
                description: description.as_deref(),
                draft,
            };
            let path = balasolu_blog::commands::new::create_post(&blog, &title, &options)?;
            println!("Created: {:?}", path);
        }

        Commands::Generate { watch } => {
            let blog = Blog::open(&base_dir, analytics_id)?;
            tracing::info!("Generating static files...");
            blog.generate()?;
            println!("Generated successfully!");

            if watch {
                balasolu_blog::commands::generate::watch(&blog).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let blog = Blog::open(&base_dir, analytics_id)?;

            tracing::info!("Generating static files...");
            blog.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            balasolu_blog::server::start(&blog, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let blog = Blog::open(&base_dir, analytics_id)?;
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let blog = Blog::open(&base_dir, analytics_id)?;
            balasolu_blog::commands::list::run(&blog)?;
        }

        Commands::Version => {
            println!("balasolu-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
