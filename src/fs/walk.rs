//! ## Walk
//!
//! depth-first traversal of a remote file tree

use std::path::{Path, PathBuf};

use super::{File, RemoteError, RemoteFs, RemoteResult};

/// Lazy depth-first iterator over the remote file tree rooted at a path.
///
/// - the root is yielded first, then the content of each directory sorted by path,
///   each subtree before its next sibling;
/// - symbolic links are yielded but never followed;
/// - a directory which can't be listed is yielded, then followed by an `Err`,
///   and the walk goes on with the remaining entries;
/// - if the root can't be stat'ed, a single `Err` is yielded.
///
/// The iterator is finite and can't be restarted.
pub struct Walk<'a, F: RemoteFs + ?Sized> {
    client: &'a mut F,
    stack: Vec<Pending>,
}

enum Pending {
    /// Root path, not stat'ed yet
    Root(PathBuf),
    /// Entry returned by `list_dir`
    Entry(File),
    /// Error listing the directory yielded just before
    Failed(RemoteError),
}

impl<'a, F: RemoteFs + ?Sized> Walk<'a, F> {
    /// Instantiates a new `Walk` rooted at `root`
    pub fn new(client: &'a mut F, root: &Path) -> Self {
        Self {
            client,
            stack: vec![Pending::Root(root.to_path_buf())],
        }
    }
}

impl<'a, F: RemoteFs + ?Sized> Iterator for Walk<'a, F> {
    type Item = RemoteResult<File>;

    fn next(&mut self) -> Option<Self::Item> {
        let file = match self.stack.pop()? {
            Pending::Root(path) => match self.client.lstat(path.as_path()) {
                Ok(file) => file,
                Err(err) => return Some(Err(err)),
            },
            Pending::Entry(file) => file,
            Pending::Failed(err) => return Some(Err(err)),
        };
        if file.is_dir() {
            trace!("Walking into {}", file.path().display());
            match self.client.list_dir(file.path()) {
                Ok(mut entries) => {
                    // reversed, so that popping yields entries in ascending order
                    entries.sort_by(|a, b| b.path.cmp(&a.path));
                    self.stack.extend(entries.into_iter().map(Pending::Entry));
                }
                Err(err) => self.stack.push(Pending::Failed(err)),
            }
        }
        Some(Ok(file))
    }
}
