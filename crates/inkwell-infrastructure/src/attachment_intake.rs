//! Reads files from disk into chat attachments.

use std::path::Path;

use inkwell_core::conversation::FileAttachment;
use inkwell_core::error::{InkwellError, Result};

/// Reads `path` as a [`FileAttachment`].
///
/// The extension is checked before the file is opened. The MIME type is
/// guessed from the extension; the content is decoded as lossy UTF-8 whatever
/// the type.
pub async fn read_attachment(path: impl AsRef<Path>) -> Result<FileAttachment> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| InkwellError::invalid_input(format!("Not a file path: {}", path.display())))?
        .to_string();

    if !FileAttachment::is_accepted(&name) {
        // Reuse the domain error, which lists the accepted extensions.
        return FileAttachment::from_bytes(name, "", &[]);
    }

    let bytes = tokio::fs::read(path).await?;
    let mime_type = mime_guess::from_path(path)
        .first_or_text_plain()
        .essence_str()
        .to_string();

    tracing::debug!(
        "[Attachment] Read {} ({}, {} bytes)",
        name,
        mime_type,
        bytes.len()
    );
    FileAttachment::from_bytes(name, mime_type, &bytes)
}

/// Reads several files, failing on the first one that cannot be attached.
pub async fn read_attachments<I, P>(paths: I) -> Result<Vec<FileAttachment>>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut attachments = Vec::new();
    for path in paths {
        attachments.push(read_attachment(path).await?);
    }
    Ok(attachments)
}
