use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use folio_articles::ArticleRepository;
use folio_markdown::MarkdownLibrary;
use folio_server::{FolioServer, ServerConfig};
use folio_store::{FsObjectStore, UrlSigner, DEFAULT_CONTENT_TYPE};
use folio_types::{ArticleDraft, ArticleId, ArticleMetadata, ArticleStatus};
use serde::Serialize;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.root.as_deref())?;
    let format = cli.format;

    match cli.command {
        Command::Serve(args) => cmd_serve(config, args).await,
        Command::List(args) => cmd_list(&repository(&config)?, args, &format).await,
        Command::Show(args) => cmd_show(&repository(&config)?, args, &format).await,
        Command::New(args) => cmd_new(&repository(&config)?, args, &format).await,
        Command::Publish(args) => cmd_publish(&repository(&config)?, args, &format).await,
        Command::Delete(args) => cmd_delete(&repository(&config)?, args).await,
        Command::Upload(args) => cmd_upload(&repository(&config)?, args, &format).await,
        Command::Tags(args) => cmd_tags(&library(&config), args, &format),
        Command::Articles(_) => cmd_articles(&library(&config), &format),
    }
}

fn load_config(path: Option<&Path>, root: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::resolve(path).context("loading configuration")?;
    if let Some(root) = root {
        config.bucket_root = root.to_path_buf();
    }
    tracing::debug!(
        bucket_root = %config.bucket_root.display(),
        content_dir = %config.content_dir.display(),
        "resolved configuration"
    );
    Ok(config)
}

fn repository(config: &ServerConfig) -> anyhow::Result<ArticleRepository> {
    let store = FsObjectStore::open(&config.bucket_root, config.bucket_name.clone())
        .with_context(|| format!("opening bucket at {}", config.bucket_root.display()))?;
    let mut repo = ArticleRepository::new(Arc::new(store), config.public_base_url.clone());
    if let Some(key) = &config.signing_key {
        let signer = UrlSigner::from_hex(key, &config.public_base_url, &config.bucket_name)?;
        repo = repo.with_signer(signer);
    }
    Ok(repo)
}

fn library(config: &ServerConfig) -> MarkdownLibrary {
    MarkdownLibrary::new(&config.content_dir, config.default_author.clone())
}

fn parse_id(raw: &str) -> anyhow::Result<ArticleId> {
    ArticleId::parse(raw).with_context(|| format!("invalid article id {raw:?}"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_summary(meta: &ArticleMetadata) {
    let status = match meta.status {
        ArticleStatus::Published => meta.status.as_str().green(),
        ArticleStatus::Draft => meta.status.as_str().yellow(),
    };
    println!(
        "{}  {}  [{}]  {}",
        meta.id.as_str().dimmed(),
        meta.created_at.format("%Y-%m-%d"),
        status,
        meta.title.bold()
    );
}

async fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind
            .parse()
            .with_context(|| format!("invalid bind address {bind:?}"))?;
    }
    println!(
        "Folio server on {} (bucket: {})",
        config.bind_addr.to_string().bold(),
        config.bucket_root.display()
    );
    FolioServer::new(config).serve().await?;
    Ok(())
}

async fn cmd_list(
    repo: &ArticleRepository,
    args: ListArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let articles = repo.list_articles(args.status).await?;
    match format {
        OutputFormat::Json => print_json(&articles)?,
        OutputFormat::Text if articles.is_empty() => println!("No {} articles.", args.status),
        OutputFormat::Text => articles.iter().for_each(print_summary),
    }
    Ok(())
}

async fn cmd_show(
    repo: &ArticleRepository,
    args: ShowArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let article = repo
        .get_article(&id, args.status)
        .await?
        .with_context(|| format!("article {id} not found"))?;

    match format {
        OutputFormat::Json => print_json(&article)?,
        OutputFormat::Text => {
            let (meta, content) = article.into_parts();
            print_summary(&meta);
            println!("  Slug: {}", meta.slug.cyan());
            if !meta.tags.is_empty() {
                println!("  Tags: {}", meta.tags.join(", "));
            }
            if !meta.excerpt.is_empty() {
                println!("  Excerpt: {}", meta.excerpt);
            }
            println!("  Updated: {}", meta.updated_at.to_rfc3339());
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
    }
    Ok(())
}

async fn cmd_new(
    repo: &ArticleRepository,
    args: NewArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let content = match &args.content_file {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&source)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
        }
        None => serde_json::Value::Null,
    };

    let draft = ArticleDraft {
        title: Some(args.title),
        excerpt: args.excerpt,
        cover_image: args.cover_image,
        tags: Some(args.tags),
        content,
        ..Default::default()
    };
    let saved = repo.save_draft(draft).await?;

    match format {
        OutputFormat::Json => print_json(&saved)?,
        OutputFormat::Text => {
            println!("{} Saved draft {}", "✓".green().bold(), saved.id().as_str().yellow());
            println!("  Slug: {}", saved.meta.slug.cyan());
        }
    }
    Ok(())
}

async fn cmd_publish(
    repo: &ArticleRepository,
    args: PublishArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let article = repo.publish_article(&id).await?;
    match format {
        OutputFormat::Json => print_json(&article)?,
        OutputFormat::Text => println!(
            "{} Published {} ({})",
            "✓".green().bold(),
            article.meta.title.bold(),
            id.as_str().yellow()
        ),
    }
    Ok(())
}

async fn cmd_delete(repo: &ArticleRepository, args: DeleteArgs) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    if repo.delete_article(&id, args.status).await? {
        println!("Deleted {} article {}", args.status, id.as_str().yellow());
    } else {
        println!("No {} article {}", args.status, id.as_str().yellow());
    }
    Ok(())
}

async fn cmd_upload(
    repo: &ArticleRepository,
    args: UploadArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let id = parse_id(&args.id)?;
    let data = std::fs::read(&args.path)
        .with_context(|| format!("reading {}", args.path.display()))?;
    let file_name = args
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = args
        .content_type
        .unwrap_or_else(|| content_type_for(&args.path).to_string());

    let public_url = repo
        .upload_media(&id, &file_name, data.into(), &content_type)
        .await?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "publicUrl": public_url }))?,
        OutputFormat::Text => {
            println!("{} Uploaded {}", "✓".green().bold(), file_name.bold());
            println!("  {}", public_url.blue());
        }
    }
    Ok(())
}

fn cmd_tags(library: &MarkdownLibrary, args: TagsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    if let Some(tag) = args.tag {
        let articles = library.articles_by_tag(&tag)?;
        return match format {
            OutputFormat::Json => print_json(&articles),
            OutputFormat::Text => {
                for article in &articles {
                    println!("{}  {}", article.slug.cyan(), article.title);
                }
                Ok(())
            }
        };
    }

    let tags = library.all_tags()?;
    match format {
        OutputFormat::Json => print_json(&tags)?,
        OutputFormat::Text if tags.is_empty() => println!("No tags."),
        OutputFormat::Text => {
            for tag in &tags {
                println!("{:>4}  {}", tag.count.to_string().bold(), tag.tag);
            }
        }
    }
    Ok(())
}

fn cmd_articles(library: &MarkdownLibrary, format: &OutputFormat) -> anyhow::Result<()> {
    let articles = library.all_articles()?;
    match format {
        OutputFormat::Json => print_json(&articles)?,
        OutputFormat::Text if articles.is_empty() => {
            println!("No articles in {}.", library.dir().display())
        }
        OutputFormat::Text => {
            for article in &articles {
                println!(
                    "{}  {}  {}",
                    article.created_at.format("%Y-%m-%d"),
                    article.slug.cyan(),
                    article.title.bold()
                );
            }
        }
    }
    Ok(())
}

/// Content type guessed from a file extension.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "md" => "text/markdown",
        "txt" => "text/plain",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
