//! File-system engine
//!
//! This module provides the engine that owns the descriptor table, the
//! open-file table and the current directory, and implements every
//! operation on top of them.

use crate::open_files::OpenFileTable;
use crate::operations::{FileSystemOperations, ListingEntry, OperationError, StatInfo};
use crate::resolver::PathResolver;
use core_types::{DescriptorId, HandleId};
use fs_view::{DirectoryView, PathParser};
use services_logger::{EventLog, LogEntry, LogLevel};
use services_settings::{ConfigError, FsConfig};
use services_storage::{BlockStore, Descriptor, DescriptorTable};

/// The file-system engine
///
/// A descriptor's slot is freed when its last name is gone and no handle
/// has it open (checked after every `unlink` and `close`), or immediately
/// by `rmdir`.
#[derive(Debug, Clone)]
pub struct FileSystemEngine {
    config: FsConfig,
    descriptors: DescriptorTable,
    open_files: OpenFileTable,
    /// `None` once the current directory has been removed
    cwd: Option<DescriptorId>,
    log: EventLog,
}

impl FileSystemEngine {
    /// Creates an engine holding only the root directory
    pub fn new(config: FsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: FsConfig) -> Self {
        Self {
            descriptors: DescriptorTable::new(config.max_descriptors),
            open_files: OpenFileTable::new(),
            cwd: Some(DescriptorId::ROOT),
            log: EventLog::new(config.log_capacity, config.log_level),
            config,
        }
    }

    /// Settings this engine was built with
    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Current directory, or `None` if it was removed
    pub fn current_dir(&self) -> Option<DescriptorId> {
        self.cwd
    }

    /// Looks up a live descriptor by id
    pub fn descriptor(&self, id: DescriptorId) -> Option<&Descriptor> {
        self.descriptors.get(id)
    }

    /// The descriptor table
    pub fn descriptors(&self) -> &DescriptorTable {
        &self.descriptors
    }

    /// The open-file table
    pub fn open_files(&self) -> &OpenFileTable {
        &self.open_files
    }

    /// Structured record of past operations
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Takes every retained log entry
    pub fn drain_log(&mut self) -> Vec<LogEntry> {
        self.log.drain()
    }

    fn resolver(&self) -> PathResolver<'_> {
        PathResolver::new(&self.descriptors, self.cwd, self.config.max_symlink_hops)
    }

    fn directory(&self, id: DescriptorId) -> Result<&DirectoryView, OperationError> {
        self.descriptors
            .get(id)
            .ok_or_else(|| OperationError::PathNotFound(id.to_string()))?
            .entries()
            .ok_or_else(|| OperationError::NotADirectory(id.to_string()))
    }

    fn directory_mut(&mut self, id: DescriptorId) -> Result<&mut DirectoryView, OperationError> {
        self.descriptors
            .get_mut(id)
            .ok_or_else(|| OperationError::PathNotFound(id.to_string()))?
            .entries_mut()
            .ok_or_else(|| OperationError::NotADirectory(id.to_string()))
    }

    fn live(&self, id: DescriptorId) -> Result<&Descriptor, OperationError> {
        self.descriptors
            .get(id)
            .ok_or_else(|| OperationError::PathNotFound(id.to_string()))
    }

    fn handle(&self, fd: HandleId) -> Result<(DescriptorId, usize), OperationError> {
        self.open_files
            .get(fd)
            .map(|f| (f.descriptor, f.cursor))
            .ok_or(OperationError::InvalidHandle(fd))
    }

    fn handle_blocks(&mut self, fd: HandleId) -> Result<&mut BlockStore, OperationError> {
        let (id, _) = self.handle(fd)?;
        self.descriptors
            .get_mut(id)
            .and_then(Descriptor::blocks_mut)
            .ok_or(OperationError::InvalidHandle(fd))
    }

    fn advance(&mut self, fd: HandleId, by: usize) {
        if let Some(file) = self.open_files.get_mut(fd) {
            file.cursor += by;
        }
    }

    /// Checks that `path` can receive a new entry and returns where it goes
    fn prepare_entry(&self, path: &str) -> Result<(DescriptorId, String), OperationError> {
        let (parent, name) = self.resolver().resolve_new(path)?;
        PathParser::validate_name(&name, self.config.max_filename_length)?;
        if self.directory(parent)?.contains(&name) {
            return Err(OperationError::AlreadyExists(path.to_string()));
        }
        Ok((parent, name))
    }

    /// Allocates a descriptor and names it `name` inside `parent`
    fn install<F>(
        &mut self,
        parent: DescriptorId,
        name: String,
        build: F,
    ) -> Result<DescriptorId, OperationError>
    where
        F: FnOnce(DescriptorId) -> Descriptor,
    {
        let id = self.descriptors.allocate_with(build)?;
        self.directory_mut(parent)?.add_entry(name, id);
        Ok(id)
    }

    /// Frees `id` if nothing names it and no handle holds it
    fn reclaim_if_unreferenced(&mut self, id: DescriptorId) -> Result<bool, OperationError> {
        let unnamed = self.live(id)?.link_count() == 0;
        if !unnamed || self.open_files.references(id) {
            return Ok(false);
        }
        let freed = self.descriptors.free(id)?;
        self.log.record(
            LogEntry::new(LogLevel::Info, "descriptor reclaimed")
                .with_source("reclaim")
                .with_field("id", id.index())
                .with_field("kind", freed.kind()),
        );
        Ok(true)
    }

    fn stat_descriptor(&self, id: DescriptorId) -> Result<StatInfo, OperationError> {
        let desc = self.live(id)?;
        Ok(StatInfo {
            id,
            kind: desc.kind(),
            size: desc.size(),
            link_count: desc.link_count(),
            block_count: desc.block_count(),
            entry_count: desc.entries().map(DirectoryView::count),
        })
    }

    /// Records the outcome of one operation
    fn finish<T>(
        &mut self,
        op: &'static str,
        subject: impl ToString,
        result: Result<T, OperationError>,
    ) -> Result<T, OperationError> {
        let entry = match &result {
            Ok(_) => LogEntry::new(LogLevel::Debug, format!("{} succeeded", op)),
            Err(err) => LogEntry::new(LogLevel::Warn, err.to_string())
                .with_field("error", format!("{:?}", err.kind())),
        };
        self.log
            .record(entry.with_source(op).with_field("subject", subject));
        result
    }

    fn try_create(&mut self, path: &str) -> Result<DescriptorId, OperationError> {
        let (parent, name) = self.prepare_entry(path)?;
        let block_size = self.config.block_size;
        self.install(parent, name, |_| Descriptor::regular(block_size))
    }

    fn try_mkdir(&mut self, path: &str) -> Result<DescriptorId, OperationError> {
        let (parent, name) = self.prepare_entry(path)?;
        self.install(parent, name, |id| {
            Descriptor::directory(DirectoryView::new(id, parent))
        })
    }

    fn try_symlink(&mut self, target: &str, path: &str) -> Result<DescriptorId, OperationError> {
        if target.is_empty() {
            return Err(OperationError::InvalidPath(
                "Symlink target is empty".to_string(),
            ));
        }
        if target.len() > self.config.block_size {
            return Err(OperationError::SymlinkTooLong {
                len: target.len(),
                max: self.config.block_size,
            });
        }
        let (parent, name) = self.prepare_entry(path)?;
        self.install(parent, name, |_| Descriptor::symlink(target))
    }

    fn try_link(&mut self, existing: &str, new_path: &str) -> Result<(), OperationError> {
        let id = self.resolver().resolve(existing)?;
        if self.live(id)?.is_directory() {
            return Err(OperationError::IsADirectory(existing.to_string()));
        }
        let (parent, name) = self.prepare_entry(new_path)?;
        self.directory_mut(parent)?.add_entry(name, id);
        if let Some(desc) = self.descriptors.get_mut(id) {
            desc.increment_links();
        }
        Ok(())
    }

    fn try_unlink(&mut self, path: &str) -> Result<(), OperationError> {
        let (parent, name) = self.resolver().resolve_new(path)?;
        let id = self
            .directory(parent)?
            .get_entry(&name)
            .ok_or_else(|| OperationError::PathNotFound(path.to_string()))?;
        if self.live(id)?.is_directory() {
            return Err(OperationError::IsADirectory(path.to_string()));
        }

        self.directory_mut(parent)?.remove_entry(&name);
        if let Some(desc) = self.descriptors.get_mut(id) {
            desc.decrement_links();
        }
        self.reclaim_if_unreferenced(id)?;
        Ok(())
    }

    fn try_open(&mut self, path: &str) -> Result<HandleId, OperationError> {
        let id = self.resolver().resolve(path)?;
        if self.live(id)?.blocks().is_none() {
            return Err(OperationError::IsADirectory(path.to_string()));
        }
        Ok(self.open_files.open(id))
    }

    fn try_close(&mut self, fd: HandleId) -> Result<(), OperationError> {
        let file = self
            .open_files
            .close(fd)
            .ok_or(OperationError::InvalidHandle(fd))?;
        self.reclaim_if_unreferenced(file.descriptor)?;
        Ok(())
    }

    fn try_read(&mut self, fd: HandleId, len: usize) -> Result<Vec<u8>, OperationError> {
        let (_, cursor) = self.handle(fd)?;
        let data = self.handle_blocks(fd)?.read_at(cursor, len);
        self.advance(fd, data.len());
        Ok(data)
    }

    fn try_write(&mut self, fd: HandleId, data: &[u8]) -> Result<usize, OperationError> {
        let (_, cursor) = self.handle(fd)?;
        let written = self.handle_blocks(fd)?.write_at(cursor, data);
        self.advance(fd, written);
        Ok(written)
    }

    fn try_seek(&mut self, fd: HandleId, offset: usize) -> Result<(), OperationError> {
        let size = self.handle_blocks(fd)?.size();
        if offset > size {
            return Err(OperationError::OffsetOutOfRange { offset, size });
        }
        if let Some(file) = self.open_files.get_mut(fd) {
            file.cursor = offset;
        }
        Ok(())
    }

    fn try_truncate(&mut self, path: &str, size: usize) -> Result<(), OperationError> {
        let id = self.resolver().resolve(path)?;
        let store = self
            .descriptors
            .get_mut(id)
            .and_then(Descriptor::blocks_mut)
            .ok_or_else(|| OperationError::IsADirectory(path.to_string()))?;
        store.resize(size);
        self.open_files.clamp_cursors(id, size);
        Ok(())
    }

    fn try_ls(&mut self, path: &str) -> Result<Vec<ListingEntry>, OperationError> {
        let id = self.resolver().resolve(path)?;
        let entries = self
            .live(id)?
            .entries()
            .ok_or_else(|| OperationError::NotADirectory(path.to_string()))?;

        Ok(entries
            .list_entries()
            .filter_map(|(name, id)| {
                self.descriptors.get(id).map(|desc| ListingEntry {
                    name: name.to_string(),
                    id,
                    kind: desc.kind(),
                    size: desc.size(),
                    link_count: desc.link_count(),
                })
            })
            .collect())
    }

    fn try_rmdir(&mut self, path: &str) -> Result<(), OperationError> {
        let id = self.resolver().resolve(path)?;
        if id.is_root() {
            return Err(OperationError::InvalidOperation(
                "The root directory cannot be removed".to_string(),
            ));
        }
        let entries = self
            .live(id)?
            .entries()
            .ok_or_else(|| OperationError::NotADirectory(path.to_string()))?;
        if !entries.is_empty() {
            return Err(OperationError::DirectoryNotEmpty(path.to_string()));
        }

        let parent = entries
            .parent()
            .ok_or_else(|| OperationError::PathNotFound(path.to_string()))?;
        let parent_dir = self.directory_mut(parent)?;
        if let Some(name) = parent_dir.name_of(id).map(str::to_string) {
            parent_dir.remove_entry(&name);
        }

        self.descriptors.free(id)?;
        if self.cwd == Some(id) {
            self.cwd = None;
        }
        Ok(())
    }

    fn try_cd(&mut self, path: &str) -> Result<(), OperationError> {
        let id = self.resolver().resolve(path)?;
        if !self.live(id)?.is_directory() {
            return Err(OperationError::NotADirectory(path.to_string()));
        }
        self.cwd = Some(id);
        Ok(())
    }

    fn try_readlink(&mut self, path: &str) -> Result<String, OperationError> {
        let id = self.resolver().resolve_literal(path)?;
        self.live(id)?
            .symlink_target()
            .map(str::to_string)
            .ok_or_else(|| OperationError::InvalidOperation(format!("{} is not a symlink", path)))
    }

    fn try_pwd(&self) -> Result<String, OperationError> {
        let mut id = self.cwd.ok_or_else(|| {
            OperationError::PathNotFound("current directory was removed".to_string())
        })?;

        let mut names = Vec::new();
        while !id.is_root() {
            if names.len() >= self.descriptors.capacity() {
                return Err(OperationError::InvalidOperation(
                    "parent chain does not reach the root".to_string(),
                ));
            }
            let parent = self
                .directory(id)?
                .parent()
                .ok_or_else(|| OperationError::PathNotFound(id.to_string()))?;
            let name = self
                .directory(parent)?
                .name_of(id)
                .ok_or_else(|| OperationError::PathNotFound(id.to_string()))?;
            names.push(name.to_string());
            id = parent;
        }

        names.reverse();
        Ok(format!("/{}", names.join("/")))
    }
}

impl Default for FileSystemEngine {
    fn default() -> Self {
        Self::build(FsConfig::default())
    }
}

impl FileSystemOperations for FileSystemEngine {
    fn create(&mut self, path: &str) -> Result<DescriptorId, OperationError> {
        let result = self.try_create(path);
        self.finish("create", path, result)
    }

    fn mkdir(&mut self, path: &str) -> Result<DescriptorId, OperationError> {
        let result = self.try_mkdir(path);
        self.finish("mkdir", path, result)
    }

    fn symlink(&mut self, target: &str, path: &str) -> Result<DescriptorId, OperationError> {
        let result = self.try_symlink(target, path);
        self.finish("symlink", format!("{} -> {}", path, target), result)
    }

    fn link(&mut self, existing: &str, new_path: &str) -> Result<(), OperationError> {
        let result = self.try_link(existing, new_path);
        self.finish("link", format!("{} => {}", new_path, existing), result)
    }

    fn unlink(&mut self, path: &str) -> Result<(), OperationError> {
        let result = self.try_unlink(path);
        self.finish("unlink", path, result)
    }

    fn open(&mut self, path: &str) -> Result<HandleId, OperationError> {
        let result = self.try_open(path);
        self.finish("open", path, result)
    }

    fn close(&mut self, fd: HandleId) -> Result<(), OperationError> {
        let result = self.try_close(fd);
        self.finish("close", fd, result)
    }

    fn read(&mut self, fd: HandleId, len: usize) -> Result<Vec<u8>, OperationError> {
        let result = self.try_read(fd, len);
        self.finish("read", fd, result)
    }

    fn write(&mut self, fd: HandleId, data: &[u8]) -> Result<usize, OperationError> {
        let result = self.try_write(fd, data);
        self.finish("write", fd, result)
    }

    fn seek(&mut self, fd: HandleId, offset: usize) -> Result<(), OperationError> {
        let result = self.try_seek(fd, offset);
        self.finish("seek", fd, result)
    }

    fn truncate(&mut self, path: &str, size: usize) -> Result<(), OperationError> {
        let result = self.try_truncate(path, size);
        self.finish("truncate", path, result)
    }

    fn stat(&mut self, path: &str) -> Result<StatInfo, OperationError> {
        let result = self
            .resolver()
            .resolve(path)
            .and_then(|id| self.stat_descriptor(id));
        self.finish("stat", path, result)
    }

    fn fstat(&mut self, fd: HandleId) -> Result<StatInfo, OperationError> {
        let result = self
            .handle(fd)
            .and_then(|(id, _)| self.stat_descriptor(id));
        self.finish("fstat", fd, result)
    }

    fn ls(&mut self, path: &str) -> Result<Vec<ListingEntry>, OperationError> {
        let result = self.try_ls(path);
        self.finish("ls", path, result)
    }

    fn rmdir(&mut self, path: &str) -> Result<(), OperationError> {
        let result = self.try_rmdir(path);
        self.finish("rmdir", path, result)
    }

    fn cd(&mut self, path: &str) -> Result<(), OperationError> {
        let result = self.try_cd(path);
        self.finish("cd", path, result)
    }

    fn readlink(&mut self, path: &str) -> Result<String, OperationError> {
        let result = self.try_readlink(path);
        self.finish("readlink", path, result)
    }

    fn pwd(&mut self) -> Result<String, OperationError> {
        let result = self.try_pwd();
        self.finish("pwd", "", result)
    }
}
