use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use folio_types::ArticleStatus;

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: portfolio and blog publishing backend",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (TOML). Falls back to $FOLIO_CONFIG, then defaults.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Bucket directory, overriding the config file.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// List articles in the bucket
    List(ListArgs),
    /// Show one article
    Show(ShowArgs),
    /// Create a draft article
    New(NewArgs),
    /// Publish a draft
    Publish(PublishArgs),
    /// Delete an article
    Delete(DeleteArgs),
    /// Upload a media file for an article
    Upload(UploadArgs),
    /// Tag counts of the markdown library
    Tags(TagsArgs),
    /// List the markdown library
    Articles(ArticlesArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short, long, default_value = "published")]
    pub status: ArticleStatus,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
    #[arg(short, long, default_value = "published")]
    pub status: ArticleStatus,
}

#[derive(Args)]
pub struct NewArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub excerpt: Option<String>,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub cover_image: Option<String>,
    /// JSON document used as the article body.
    #[arg(long)]
    pub content_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct PublishArgs {
    pub id: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    #[arg(short, long, default_value = "published")]
    pub status: ArticleStatus,
}

#[derive(Args)]
pub struct UploadArgs {
    pub id: String,
    pub path: PathBuf,
    /// Defaults to a guess from the file extension.
    #[arg(long)]
    pub content_type: Option<String>,
}

#[derive(Args)]
pub struct TagsArgs {
    /// List articles carrying this tag instead of counting tags.
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Args)]
pub struct ArticlesArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["folio", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_list_defaults_to_published() {
        let cli = Cli::try_parse_from(["folio", "list"]).unwrap();
        if let Command::List(args) = cli.command {
            assert_eq!(args.status, ArticleStatus::Published);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_list_drafts() {
        let cli = Cli::try_parse_from(["folio", "list", "--status", "draft"]).unwrap();
        if let Command::List(args) = cli.command {
            assert_eq!(args.status, ArticleStatus::Draft);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_bad_status() {
        assert!(Cli::try_parse_from(["folio", "list", "--status", "archived"]).is_err());
    }

    #[test]
    fn parse_new_with_tags() {
        let cli = Cli::try_parse_from([
            "folio", "new", "--title", "Hello", "--tag", "rust", "--tag", "web",
        ])
        .unwrap();
        if let Command::New(args) = cli.command {
            assert_eq!(args.title, "Hello");
            assert_eq!(args.tags, vec!["rust", "web"]);
            assert!(args.content_file.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_new_requires_title() {
        assert!(Cli::try_parse_from(["folio", "new"]).is_err());
    }

    #[test]
    fn parse_upload() {
        let cli = Cli::try_parse_from(["folio", "upload", "abc", "./pic.png"]).unwrap();
        if let Command::Upload(args) = cli.command {
            assert_eq!(args.id, "abc");
            assert_eq!(args.path, PathBuf::from("./pic.png"));
            assert!(args.content_type.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_root_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "publish", "abc", "--root", "/tmp/b"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/b")));
        assert!(matches!(cli.command, Command::Publish(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["folio", "--verbose", "articles"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["folio", "--format", "json", "tags"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
