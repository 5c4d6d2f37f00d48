use std::io;

use futures::future::BoxFuture;
use langws_source::Location;

use crate::fs::Entry;
use crate::fs::EntryKind;
use crate::fs::FileSystem;

/// Decides whether an entry is collected (files) or descended into (directories).
pub type InclusionFilter<'f> = dyn Fn(&Entry) -> bool + Send + Sync + 'f;

/// Walk `root` depth-first and collect the files that pass `filter`.
///
/// The filter sees each unresolved [`Entry`] before any path is joined. A
/// rejected directory is pruned: nothing beneath it is listed. Without a filter
/// every file is collected.
///
/// Results are in pre-order, siblings in the order storage listed them. The
/// walk is sequential, so the order is deterministic for a given storage
/// state. The first failed listing aborts the whole walk.
///
/// Symbolic links are whatever the [`FileSystem`] reports; nothing here guards
/// against cycles.
pub async fn traverse(
    fs: &dyn FileSystem,
    root: &Location,
    filter: Option<&InclusionFilter<'_>>,
) -> io::Result<Vec<Location>> {
    let mut files = Vec::new();
    traverse_folder(fs, root.clone(), filter, &mut files).await?;
    Ok(files)
}

fn traverse_folder<'a>(
    fs: &'a dyn FileSystem,
    folder: Location,
    filter: Option<&'a InclusionFilter<'a>>,
    files: &'a mut Vec<Location>,
) -> BoxFuture<'a, io::Result<()>> {
    Box::pin(async move {
        let entries = fs.read_directory(&folder).await?;
        tracing::trace!("Listed {} entries in {folder}", entries.len());

        for entry in entries {
            if filter.is_some_and(|include| !include(&entry)) {
                continue;
            }

            match entry.kind() {
                EntryKind::Directory => {
                    traverse_folder(fs, entry.location(), filter, files).await?;
                }
                EntryKind::File => files.push(entry.location()),
            }
        }

        Ok(())
    })
}
