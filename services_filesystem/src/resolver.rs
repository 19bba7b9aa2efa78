//! Path resolution against the descriptor table
//!
//! Resolution walks segment by segment from the root (absolute paths) or
//! from the acting current directory (relative paths).
//!
//! - A symlink met on an intermediate segment is replaced by its target
//!   followed by the still-unresolved segments; the walk restarts from the
//!   directory holding the link, or from the root if the target is absolute.
//! - The final segment is returned unresolved unless the caller asks to
//!   follow it. A followed final symlink is re-resolved as a fresh path from
//!   the acting current directory (root for absolute targets).
//! - One hop counter spans the whole resolution, so cycles on either kind
//!   of segment end in `SymlinkLoop`.

use crate::OperationError;
use core_types::DescriptorId;
use fs_view::{DirectoryView, ParsedPath};
use services_storage::{DescriptorPayload, DescriptorTable};

/// Where a path leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// The path has no segments; it names the directory resolution started in
    Start(DescriptorId),
    /// A final name inside a containing directory; the name may be absent
    Entry {
        /// Directory that holds (or would hold) the name
        parent: DescriptorId,
        /// The final segment
        name: String,
    },
}

/// Resolves paths for one operation
pub struct PathResolver<'a> {
    table: &'a DescriptorTable,
    cwd: Option<DescriptorId>,
    max_hops: usize,
}

impl<'a> PathResolver<'a> {
    /// Creates a resolver acting from `cwd`
    ///
    /// A `None` current directory means it was removed; relative paths then
    /// fail to resolve.
    pub fn new(table: &'a DescriptorTable, cwd: Option<DescriptorId>, max_hops: usize) -> Self {
        Self {
            table,
            cwd,
            max_hops,
        }
    }

    /// Walks `path` to its final segment
    pub fn locate(&self, path: &str, follow_last: bool) -> Result<Location, OperationError> {
        let mut parsed = ParsedPath::parse(path);
        let mut dir = self.anchor(&parsed, None, path)?;
        let mut hops = 0;

        'resolve: loop {
            let current = parsed.clone();
            let Some((last, intermediate)) = current.split_last() else {
                self.directory(dir, path)?;
                return Ok(Location::Start(dir));
            };

            for (index, segment) in intermediate.iter().enumerate() {
                let id = self.lookup(dir, segment, path)?;
                match self.payload(id, path)? {
                    DescriptorPayload::Directory(_) => dir = id,
                    DescriptorPayload::Symlink(target) => {
                        self.count_hop(&mut hops, path)?;
                        let target = ParsedPath::parse(target);
                        parsed = ParsedPath::splice(&target, &current.segments()[index + 1..]);
                        dir = self.anchor(&parsed, Some(dir), path)?;
                        continue 'resolve;
                    }
                    DescriptorPayload::Regular(_) => {
                        return Err(OperationError::NotADirectory(segment.clone()));
                    }
                }
            }

            if follow_last {
                if let Some(id) = self.directory(dir, path)?.get_entry(last) {
                    if let DescriptorPayload::Symlink(target) = self.payload(id, path)? {
                        self.count_hop(&mut hops, path)?;
                        parsed = ParsedPath::parse(target);
                        dir = self.anchor(&parsed, None, path)?;
                        continue 'resolve;
                    }
                }
            }

            return Ok(Location::Entry {
                parent: dir,
                name: last.clone(),
            });
        }
    }

    /// Resolves `path` to an existing descriptor, following a final symlink
    pub fn resolve(&self, path: &str) -> Result<DescriptorId, OperationError> {
        self.existing(path, true)
    }

    /// Resolves `path` to an existing descriptor, leaving a final symlink as is
    pub fn resolve_literal(&self, path: &str) -> Result<DescriptorId, OperationError> {
        self.existing(path, false)
    }

    /// Resolves the directory and name a new entry would get
    pub fn resolve_new(&self, path: &str) -> Result<(DescriptorId, String), OperationError> {
        match self.locate(path, false)? {
            Location::Entry { parent, name } => Ok((parent, name)),
            Location::Start(_) => Err(OperationError::InvalidPath(format!(
                "{:?} does not name an entry",
                path
            ))),
        }
    }

    fn existing(&self, path: &str, follow_last: bool) -> Result<DescriptorId, OperationError> {
        match self.locate(path, follow_last)? {
            Location::Start(id) => Ok(id),
            Location::Entry { parent, name } => {
                let id = self.lookup(parent, &name, path)?;
                self.payload(id, path)?;
                Ok(id)
            }
        }
    }

    /// Picks the directory a (re)started walk begins in
    fn anchor(
        &self,
        parsed: &ParsedPath,
        relative_to: Option<DescriptorId>,
        path: &str,
    ) -> Result<DescriptorId, OperationError> {
        if parsed.is_absolute() {
            return Ok(DescriptorId::ROOT);
        }
        relative_to
            .or(self.cwd)
            .ok_or_else(|| OperationError::PathNotFound(format!("{} (current directory removed)", path)))
    }

    fn count_hop(&self, hops: &mut usize, path: &str) -> Result<(), OperationError> {
        *hops += 1;
        if *hops > self.max_hops {
            return Err(OperationError::SymlinkLoop(path.to_string()));
        }
        Ok(())
    }

    fn lookup(
        &self,
        dir: DescriptorId,
        name: &str,
        path: &str,
    ) -> Result<DescriptorId, OperationError> {
        self.directory(dir, path)?
            .get_entry(name)
            .ok_or_else(|| OperationError::PathNotFound(path.to_string()))
    }

    fn directory(&self, id: DescriptorId, path: &str) -> Result<&'a DirectoryView, OperationError> {
        match self.payload(id, path)? {
            DescriptorPayload::Directory(entries) => Ok(entries),
            _ => Err(OperationError::NotADirectory(path.to_string())),
        }
    }

    fn payload(&self, id: DescriptorId, path: &str) -> Result<&'a DescriptorPayload, OperationError> {
        self.table
            .get(id)
            .map(|d| d.payload())
            .ok_or_else(|| OperationError::PathNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services_storage::Descriptor;

    /// Builds `/a/b` with `/a/file` and returns the table with a's and b's ids
    fn tree() -> (DescriptorTable, DescriptorId, DescriptorId, DescriptorId) {
        let mut table = DescriptorTable::new(16);
        let a = mkdir(&mut table, DescriptorId::ROOT, "a");
        let b = mkdir(&mut table, a, "b");
        let file = table.allocate(Descriptor::regular(8)).unwrap();
        add(&mut table, a, "file", file);
        (table, a, b, file)
    }

    fn mkdir(table: &mut DescriptorTable, parent: DescriptorId, name: &str) -> DescriptorId {
        let id = table
            .allocate_with(|id| Descriptor::directory(DirectoryView::new(id, parent)))
            .unwrap();
        add(table, parent, name, id);
        id
    }

    fn symlink(table: &mut DescriptorTable, parent: DescriptorId, name: &str, target: &str) {
        let id = table.allocate(Descriptor::symlink(target)).unwrap();
        add(table, parent, name, id);
    }

    fn add(table: &mut DescriptorTable, parent: DescriptorId, name: &str, id: DescriptorId) {
        table
            .get_mut(parent)
            .unwrap()
            .entries_mut()
            .unwrap()
            .add_entry(name, id);
    }

    fn resolver(table: &DescriptorTable) -> PathResolver<'_> {
        PathResolver::new(table, Some(DescriptorId::ROOT), 8)
    }

    #[test]
    fn test_absolute_and_relative() {
        let (table, a, b, _) = tree();
        assert_eq!(resolver(&table).resolve("/a/b").unwrap(), b);
        assert_eq!(resolver(&table).resolve("a//b/").unwrap(), b);

        let from_a = PathResolver::new(&table, Some(a), 8);
        assert_eq!(from_a.resolve("b").unwrap(), b);
        assert_eq!(from_a.resolve("b/..").unwrap(), a);
        assert_eq!(from_a.resolve("..").unwrap(), DescriptorId::ROOT);
    }

    #[test]
    fn test_empty_path_is_start_directory() {
        let (table, a, _, _) = tree();
        let from_a = PathResolver::new(&table, Some(a), 8);
        assert_eq!(from_a.locate("", false).unwrap(), Location::Start(a));
        assert_eq!(
            from_a.locate("/", false).unwrap(),
            Location::Start(DescriptorId::ROOT)
        );
    }

    #[test]
    fn test_final_name_is_not_required_to_exist() {
        let (table, a, _, _) = tree();
        let (parent, name) = resolver(&table).resolve_new("/a/new.txt").unwrap();
        assert_eq!(parent, a);
        assert_eq!(name, "new.txt");
    }

    #[test]
    fn test_missing_intermediate() {
        let (table, _, _, _) = tree();
        let err = resolver(&table).resolve_new("/missing/x").unwrap_err();
        assert!(matches!(err, OperationError::PathNotFound(_)));
    }

    #[test]
    fn test_traverse_through_file() {
        let (table, _, _, _) = tree();
        let err = resolver(&table).resolve("/a/file/x").unwrap_err();
        assert!(matches!(err, OperationError::NotADirectory(_)));
    }

    #[test]
    fn test_intermediate_symlink_is_relative_to_link_directory() {
        let (mut table, a, b, _) = tree();
        symlink(&mut table, a, "to_b", "b");
        let file = table.allocate(Descriptor::regular(8)).unwrap();
        add(&mut table, b, "deep.txt", file);

        assert_eq!(resolver(&table).resolve("/a/to_b/deep.txt").unwrap(), file);
    }

    #[test]
    fn test_intermediate_absolute_symlink() {
        let (mut table, a, b, _) = tree();
        symlink(&mut table, DescriptorId::ROOT, "jump", "/a/b");
        assert_eq!(resolver(&table).resolve("jump/..").unwrap(), a);
        assert_eq!(resolver(&table).resolve("/jump").unwrap(), b);
    }

    #[test]
    fn test_final_symlink_followed_from_current_directory() {
        let (mut table, a, _, file) = tree();
        symlink(&mut table, a, "link", "a/file");

        assert_eq!(resolver(&table).resolve("/a/link").unwrap(), file);
        let link = resolver(&table).resolve_literal("/a/link").unwrap();
        assert!(table.get(link).unwrap().is_symlink());
    }

    #[test]
    fn test_symlink_chain() {
        let (mut table, _, _, file) = tree();
        symlink(&mut table, DescriptorId::ROOT, "one", "two");
        symlink(&mut table, DescriptorId::ROOT, "two", "/a/file");
        assert_eq!(resolver(&table).resolve("one").unwrap(), file);
    }

    #[test]
    fn test_dangling_symlink() {
        let (mut table, _, _, _) = tree();
        symlink(&mut table, DescriptorId::ROOT, "dangling", "nowhere");
        let err = resolver(&table).resolve("dangling").unwrap_err();
        assert!(matches!(err, OperationError::PathNotFound(_)));
        assert!(resolver(&table).resolve_literal("dangling").is_ok());
    }

    #[test]
    fn test_final_symlink_cycle() {
        let (mut table, _, _, _) = tree();
        symlink(&mut table, DescriptorId::ROOT, "ping", "pong");
        symlink(&mut table, DescriptorId::ROOT, "pong", "ping");
        let err = resolver(&table).resolve("ping").unwrap_err();
        assert!(matches!(err, OperationError::SymlinkLoop(_)));
    }

    #[test]
    fn test_intermediate_symlink_cycle() {
        let (mut table, _, _, _) = tree();
        symlink(&mut table, DescriptorId::ROOT, "self", "self");
        let err = resolver(&table).resolve_new("self/x").unwrap_err();
        assert!(matches!(err, OperationError::SymlinkLoop(_)));
    }

    #[test]
    fn test_removed_current_directory() {
        let (table, _, _, _) = tree();
        let orphan = PathResolver::new(&table, None, 8);
        assert!(matches!(
            orphan.resolve("..").unwrap_err(),
            OperationError::PathNotFound(_)
        ));
        assert_eq!(orphan.resolve("/").unwrap(), DescriptorId::ROOT);
    }
}
