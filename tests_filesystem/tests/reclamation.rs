//! Reclamation Tests
//!
//! A descriptor stays alive while it has a name or an open handle, and its
//! slot is freed as soon as it has neither.

use services_filesystem::{ErrorKind, FileSystemOperations};
use services_logger::LogLevel;
use tests_filesystem::{default_engine, small_engine, write_file};

/// Test: Hard links share a descriptor and count names
#[test]
fn test_hard_link_counting() {
    let mut fs = default_engine();
    fs.mkdir("dir").unwrap();
    let id = fs.create("a").unwrap();
    fs.link("a", "b").unwrap();
    fs.link("/a", "dir/c").unwrap();

    for path in ["a", "b", "dir/c"] {
        let stat = fs.stat(path).unwrap();
        assert_eq!(stat.id, id);
        assert_eq!(stat.link_count, 3);
    }

    fs.unlink("b").unwrap();
    assert_eq!(fs.stat("a").unwrap().link_count, 2);
    assert_eq!(fs.stat("dir/c").unwrap().link_count, 2);
    assert_eq!(fs.stat("b").unwrap_err().kind(), ErrorKind::PathNotFound);
}

/// Test: Data written through one name is visible through another
#[test]
fn test_hard_link_shares_data() {
    let mut fs = default_engine();
    write_file(&mut fs, "orig", b"shared");
    fs.link("orig", "alias").unwrap();

    let fd = fs.open("alias").unwrap();
    fs.seek(fd, 6).unwrap();
    fs.write(fd, b" bytes").unwrap();
    fs.close(fd).unwrap();

    let fd = fs.open("orig").unwrap();
    assert_eq!(fs.read(fd, 64).unwrap(), b"shared bytes");
}

/// Test: Unlinking the last name with a handle open keeps I/O working
#[test]
fn test_unlinked_file_lives_until_close() {
    let mut fs = default_engine();
    let id = fs.create("temp").unwrap();
    let fd = fs.open("temp").unwrap();
    fs.write(fd, b"scratch").unwrap();

    fs.unlink("temp").unwrap();
    assert_eq!(fs.stat("temp").unwrap_err().kind(), ErrorKind::PathNotFound);
    assert!(fs.descriptor(id).is_some());

    fs.seek(fd, 0).unwrap();
    assert_eq!(fs.read(fd, 7).unwrap(), b"scratch");

    fs.close(fd).unwrap();
    assert!(fs.descriptor(id).is_none());
}

/// Test: The slot is freed only after the last of several handles closes
#[test]
fn test_multiple_handles_delay_reclamation() {
    let mut fs = default_engine();
    let id = fs.create("f").unwrap();
    let a = fs.open("f").unwrap();
    let b = fs.open("f").unwrap();
    fs.unlink("f").unwrap();

    fs.close(a).unwrap();
    assert!(fs.descriptor(id).is_some());
    fs.close(b).unwrap();
    assert!(fs.descriptor(id).is_none());
}

/// Test: A freed slot is reused by the next allocation
#[test]
fn test_slot_reuse() {
    let mut fs = small_engine(8, 3);
    let first = fs.create("a").unwrap();
    fs.create("b").unwrap();
    assert_eq!(
        fs.create("c").unwrap_err().kind(),
        ErrorKind::DescriptorsExhausted
    );

    fs.unlink("a").unwrap();
    let reused = fs.create("c").unwrap();
    assert_eq!(reused, first);
    assert_eq!(fs.stat("c").unwrap().size, 0);
}

/// Test: An open handle also blocks slot reuse
#[test]
fn test_open_handle_holds_slot() {
    let mut fs = small_engine(8, 2);
    fs.create("a").unwrap();
    let fd = fs.open("a").unwrap();
    fs.unlink("a").unwrap();

    assert_eq!(
        fs.create("b").unwrap_err().kind(),
        ErrorKind::DescriptorsExhausted
    );
    fs.close(fd).unwrap();
    assert!(fs.create("b").is_ok());
}

/// Test: rmdir frees the directory slot
#[test]
fn test_rmdir_frees_slot() {
    let mut fs = small_engine(8, 2);
    let id = fs.mkdir("d").unwrap();
    fs.rmdir("d").unwrap();
    assert!(fs.descriptor(id).is_none());
    assert_eq!(fs.mkdir("e").unwrap(), id);
}

/// Test: Reclamation is logged at info level
#[test]
fn test_reclamation_log_entry() {
    let mut fs = default_engine();
    let id = fs.create("f").unwrap();
    fs.drain_log();
    fs.unlink("f").unwrap();

    let entries = fs.drain_log();
    let reclaim = entries
        .iter()
        .find(|e| e.level == LogLevel::Info)
        .expect("reclaim entry");
    assert_eq!(reclaim.field("id"), Some(id.index().to_string().as_str()));
    assert_eq!(reclaim.field("kind"), Some("REGULAR"));
}
