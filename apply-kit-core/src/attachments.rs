use std::path::Path;
use tracing::{info, warn};

use crate::data::ApplicationData;

/// Keeps only the requested attachments that exist in `attachment_dir`,
/// preserving their order. Each missing file is reported and dropped.
pub fn validate_attachments(data: &mut ApplicationData, attachment_dir: &Path) {
    let requested = std::mem::take(&mut data.attachments);
    let requested_count = requested.len();

    data.attachments = requested
        .into_iter()
        .filter(|name| {
            let doc_path = attachment_dir.join(name);
            let present = doc_path.is_file();
            if !present {
                warn!(path = %doc_path.display(), "[ATTACH][WARN] Attachment is missing");
            }
            present
        })
        .collect();

    info!(
        requested = requested_count,
        valid = data.attachments.len(),
        "[ATTACH] Attachments validated"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{create_dir_all, write};
    use tempfile::tempdir;

    #[test]
    fn drops_missing_attachments() {
        let dir = tempdir().unwrap();
        write(dir.path().join("a.pdf"), b"%PDF").unwrap();

        let mut data = ApplicationData {
            attachments: vec!["a.pdf".into(), "b.pdf".into()],
            ..Default::default()
        };
        validate_attachments(&mut data, dir.path());
        assert_eq!(data.attachments, vec!["a.pdf".to_string()]);
    }

    #[test]
    fn keeps_requested_order() {
        let dir = tempdir().unwrap();
        for name in ["z.pdf", "m.pdf", "a.pdf"] {
            write(dir.path().join(name), b"x").unwrap();
        }
        let mut data = ApplicationData {
            attachments: vec!["z.pdf".into(), "gone.pdf".into(), "m.pdf".into(), "a.pdf".into()],
            ..Default::default()
        };
        validate_attachments(&mut data, dir.path());
        assert_eq!(data.attachments, vec!["z.pdf", "m.pdf", "a.pdf"]);
    }

    #[test]
    fn directories_do_not_count_as_attachments() {
        let dir = tempdir().unwrap();
        create_dir_all(dir.path().join("certificates")).unwrap();
        let mut data = ApplicationData {
            attachments: vec!["certificates".into()],
            ..Default::default()
        };
        validate_attachments(&mut data, dir.path());
        assert!(data.attachments.is_empty());
    }

    #[test]
    fn missing_attachment_dir_drops_everything() {
        let dir = tempdir().unwrap();
        let mut data = ApplicationData {
            attachments: vec!["a.pdf".into()],
            ..Default::default()
        };
        validate_attachments(&mut data, &dir.path().join("attachments"));
        assert!(data.attachments.is_empty());
    }
}
