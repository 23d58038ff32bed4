//! The shopping session persisted between CLI runs as JSON.

use std::path::Path;

use anyhow::Context;
use booth_core::ShopSession;

/// Load the session at `path`; a missing file is an empty session.
pub(crate) fn load(path: &Path) -> anyhow::Result<ShopSession> {
    match std::fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text)
            .with_context(|| format!("session file {} is not valid", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ShopSession::new()),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Write the session to `path`, creating parent directories. The file is
/// replaced atomically so a crash never leaves half a session behind.
pub(crate) fn save(path: &Path, session: &ShopSession) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(session)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, text).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    tracing::debug!(path = %path.display(), lines = session.cart.len(), "session saved");
    Ok(())
}
