//! Storage collaborator: background images in, flattened exports out.
//!
//! A canvas may have a cached background reference, a small JSON record
//! naming the image to draw behind the canvas. The first usable URL among
//! `backgroundImage`, `image` and `imagePath` wins. `data:` URLs are decoded
//! locally; anything else is fetched by the storage implementation.

use crate::error::{EngineError, EngineResult};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Keys checked in a cached background reference, highest priority first
pub const BACKGROUND_REFERENCE_KEYS: [&str; 3] = ["backgroundImage", "image", "imagePath"];

/// Encoded image bytes for a canvas background.
#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundPayload {
    pub bytes: Vec<u8>,
    /// URL the bytes came from, when known
    pub source_url: Option<String>,
    /// The pixels can be displayed but not read back for export
    pub restricted: bool,
}

pub trait CanvasStorage: Send + Sync {
    /// Raw cached background reference for `canvas_id`, if one exists.
    fn cached_background_reference(&self, canvas_id: &str) -> EngineResult<Option<String>>;

    /// Fetch a non-`data:` URL.
    fn fetch_url(&self, url: &str) -> EngineResult<Option<BackgroundPayload>>;

    /// Persist a flattened, encoded canvas under `name`.
    fn export_composite(&self, bytes: &[u8], name: &str) -> EngineResult<()>;

    /// Resolve the background image for `canvas_id`.
    ///
    /// A malformed reference is logged and treated as no background.
    fn load_background_image(&self, canvas_id: &str) -> EngineResult<Option<BackgroundPayload>> {
        let Some(raw) = self.cached_background_reference(canvas_id)? else {
            debug!(canvas_id, "No cached background reference");
            return Ok(None);
        };
        let url = match parse_background_reference(&raw) {
            Ok(Some(url)) => url,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(canvas_id, error = %e, "Ignoring malformed background reference");
                return Ok(None);
            }
        };
        if is_data_url(&url) {
            let bytes = decode_data_url(&url)?;
            return Ok(Some(BackgroundPayload {
                bytes,
                source_url: Some(url),
                restricted: false,
            }));
        }
        self.fetch_url(&url)
    }
}

/// URLs the engine knows how to draw.
pub fn is_drawable_url(url: &str) -> bool {
    url.starts_with("data:image/")
        || url.starts_with("http")
        || url.starts_with("blob:")
        || url.starts_with("file:")
}

pub fn is_data_url(url: &str) -> bool {
    url.starts_with("data:")
}

/// Pick the background URL out of a cached reference record.
pub fn parse_background_reference(raw: &str) -> EngineResult<Option<String>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| EngineError::MalformedBackground(e.to_string()))?;
    let Value::Object(record) = value else {
        return Err(EngineError::MalformedBackground(
            "reference is not a JSON object".to_string(),
        ));
    };
    Ok(BACKGROUND_REFERENCE_KEYS
        .iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|url| is_drawable_url(url))
        .map(str::to_string))
}

/// Decode the payload of a base64 `data:` URL.
pub fn decode_data_url(url: &str) -> EngineResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| EngineError::MalformedBackground("not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| EngineError::MalformedBackground("data URL has no payload".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(EngineError::MalformedBackground(
            "only base64 data URLs are supported".to_string(),
        ));
    }
    Ok(STANDARD.decode(payload.trim())?)
}

/// Encode bytes as a `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

// ============================================================================
// Directory-backed storage
// ============================================================================

/// Stores references and exports as plain files:
///
/// ```text
/// <root>/backgrounds/<canvas_id>.json   cached background reference
/// <root>/exports/<name>                 exported canvases
/// ```
///
/// `file:` URLs are read from disk; files outside `root` are marked
/// restricted. Remote URLs are not fetched.
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<data_dir>/gesture-canvas`
    pub fn default_root() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("gesture-canvas"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.root.join("exports")
    }

    fn reference_path(&self, canvas_id: &str) -> PathBuf {
        self.root.join("backgrounds").join(format!("{}.json", canvas_id))
    }

    /// Write a cached background reference for `canvas_id`.
    pub fn store_background_reference(&self, canvas_id: &str, record: &Value) -> EngineResult<()> {
        let path = self.reference_path(canvas_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(record)?)?;
        Ok(())
    }
}

impl CanvasStorage for DirectoryStorage {
    fn cached_background_reference(&self, canvas_id: &str) -> EngineResult<Option<String>> {
        let path = self.reference_path(canvas_id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn fetch_url(&self, url: &str) -> EngineResult<Option<BackgroundPayload>> {
        let Some(path) = url.strip_prefix("file://") else {
            return Err(EngineError::Storage(format!("cannot fetch {}", url)));
        };
        let path = PathBuf::from(path);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        let restricted = !path.starts_with(&self.root);
        Ok(Some(BackgroundPayload {
            bytes,
            source_url: Some(url.to_string()),
            restricted,
        }))
    }

    fn export_composite(&self, bytes: &[u8], name: &str) -> EngineResult<()> {
        let file_name = Path::new(name)
            .file_name()
            .ok_or_else(|| EngineError::Storage(format!("invalid export name: {:?}", name)))?;
        let dir = self.exports_dir();
        fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Canvas exported");
        Ok(())
    }
}
