use std::path::Path;
use std::sync::Arc;

use folio_articles::ArticleRepository;
use folio_markdown::MarkdownLibrary;
use folio_store::{FsObjectStore, ObjectStore, UrlSigner};
use serde_json::Value;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub articles: ArticleRepository,
    pub library: MarkdownLibrary,
    pub portfolio: Option<Arc<Value>>,
    pub signer: Option<UrlSigner>,
    pub max_upload_size: usize,
}

impl AppState {
    /// Assemble state around an existing store.
    pub fn new(store: Arc<dyn ObjectStore>, config: &ServerConfig) -> ServerResult<Self> {
        let signer = config
            .signing_key
            .as_deref()
            .map(|key| UrlSigner::from_hex(key, &config.public_base_url, store.bucket()))
            .transpose()?;

        let mut articles = ArticleRepository::new(store, config.public_base_url.clone());
        if let Some(signer) = &signer {
            articles = articles.with_signer(signer.clone());
        }

        let portfolio = config
            .portfolio_path
            .as_deref()
            .map(load_portfolio)
            .transpose()?
            .map(Arc::new);

        Ok(Self {
            articles,
            library: MarkdownLibrary::new(&config.content_dir, config.default_author.clone()),
            portfolio,
            signer,
            max_upload_size: config.max_upload_size,
        })
    }

    /// State backed by the filesystem bucket named in `config`.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let store = FsObjectStore::open(&config.bucket_root, config.bucket_name.clone())?;
        Self::new(Arc::new(store), config)
    }
}

/// Read the portfolio document. `.json` files are parsed as JSON, anything
/// else as TOML.
pub fn load_portfolio(path: &Path) -> ServerResult<Value> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&source).map_err(|e| ServerError::Config(e.to_string()))
    } else {
        let doc: toml::Value =
            toml::from_str(&source).map_err(|e| ServerError::Config(e.to_string()))?;
        serde_json::to_value(doc).map_err(|e| ServerError::Config(e.to_string()))
    }
}
