//! # Project Persistence
//!
//! Reads and writes `.bst` project files. Storage is snapshot-oriented:
//! callers load the whole project, mutate it in memory, and commit the
//! whole thing back — there are no partial updates. [`ProjectStore`] wraps
//! that cycle in an editing session that holds an advisory lock, so two
//! people pointed at the same file on a shared team drive get a clear
//! "locked by" message instead of clobbering each other's saves.
//!
//! Saves are atomic: the JSON is staged to a `.tmp` sibling, synced, then
//! renamed over the target. A crash mid-save leaves the previous file
//! intact.
//!
//! ## Example
//!
//! ```rust,no_run
//! use track_core::file_io::ProjectStore;
//! use track_core::project::Project;
//!
//! let store = ProjectStore::open("robot.bst", "pat@team1234.org").unwrap();
//! let mut project = Project::new("2025 Robot", "1234", 2025);
//! store.commit(&project).unwrap();
//!
//! // Snapshot cycle: fetch, mutate, commit
//! project = store.fetch().unwrap();
//! project.archive();
//! store.commit(&project).unwrap();
//! // Lock releases when the store drops
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{TrackError, TrackResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Suffix appended to the project file name for the lock sidecar
const LOCK_SUFFIX: &str = ".lock";

/// Tickets older than this are treated as abandoned even when the holding
/// process can't be probed (crashed session on another machine)
const LOCK_MAX_AGE_HOURS: i64 = 24;

/// Who holds a project file open, recorded in the `.bst.lock` sidecar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockTicket {
    /// User identifier (email or username)
    pub owner: String,
    /// Machine the session was started on
    pub host: String,
    /// Process id of the holding session
    pub pid: u32,
    pub acquired_at: DateTime<Utc>,
}

impl LockTicket {
    fn for_current_process(owner: impl Into<String>) -> Self {
        LockTicket {
            owner: owner.into(),
            host: local_host(),
            pid: std::process::id(),
            acquired_at: Utc::now(),
        }
    }

    /// Whether the holder can be presumed gone.
    fn is_stale(&self) -> bool {
        if self.host == local_host() && !process_alive(self.pid) {
            return true;
        }
        Utc::now().signed_duration_since(self.acquired_at) > Duration::hours(LOCK_MAX_AGE_HOURS)
    }
}

fn local_host() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    // No cheap liveness probe here; the age cutoff handles abandoned locks
    true
}

/// An exclusive editing session on one `.bst` file.
///
/// Opening the store acquires the lock; dropping it releases the OS lock
/// and deletes the sidecar. The sidecar carries the human-readable
/// [`LockTicket`]; the held file handle carries an OS-level `fs2` lock so
/// a raced sidecar write still resolves to a single winner.
#[derive(Debug)]
pub struct ProjectStore {
    path: PathBuf,
    lock_path: PathBuf,
    lock_file: File,
    ticket: LockTicket,
}

impl ProjectStore {
    /// Start an editing session on `path`, acquiring the lock.
    ///
    /// Fails with [`TrackError::FileLocked`] when another live session
    /// holds the file. Stale tickets (dead process on this machine, or
    /// past the age cutoff) are taken over.
    pub fn open(path: impl AsRef<Path>, owner: impl Into<String>) -> TrackResult<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_path = sidecar_path(&path);

        if let Some(holder) = read_ticket(&lock_path) {
            if !holder.is_stale() {
                return Err(TrackError::file_locked(
                    path.display().to_string(),
                    format!("{} on {}", holder.owner, holder.host),
                    holder.acquired_at.to_rfc3339(),
                ));
            }
        }

        let ticket = LockTicket::for_current_process(owner);
        let mut lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| io_error("create lock", &lock_path, e))?;
        lock_file.try_lock_exclusive().map_err(|_| {
            TrackError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                Utc::now().to_rfc3339(),
            )
        })?;

        let body = serde_json::to_vec_pretty(&ticket).map_err(json_error)?;
        lock_file
            .write_all(&body)
            .map_err(|e| io_error("write lock", &lock_path, e))?;
        lock_file
            .sync_all()
            .map_err(|e| io_error("sync lock", &lock_path, e))?;

        Ok(ProjectStore {
            path,
            lock_path,
            lock_file,
            ticket,
        })
    }

    /// The current snapshot from disk.
    pub fn fetch(&self) -> TrackResult<Project> {
        load_project(&self.path)
    }

    /// Atomically write a snapshot back.
    pub fn commit(&self, project: &Project) -> TrackResult<()> {
        save_project(project, &self.path)
    }

    /// The project file this session owns.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// This session's lock ticket.
    pub fn ticket(&self) -> &LockTicket {
        &self.ticket
    }

    /// Who currently holds `path`, if anyone. Acquires nothing.
    pub fn lock_holder(path: impl AsRef<Path>) -> Option<LockTicket> {
        read_ticket(&sidecar_path(path.as_ref())).filter(|t| !t.is_stale())
    }
}

impl Drop for ProjectStore {
    fn drop(&mut self) {
        let _ = self.lock_file.unlock();
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Write a project to `path`, staging through a `.tmp` sibling so an
/// interrupted save can't truncate the existing file.
pub fn save_project(project: &Project, path: &Path) -> TrackResult<()> {
    let body = serde_json::to_vec_pretty(project).map_err(json_error)?;
    let staging = staging_path(path);

    let write = (|| -> io::Result<()> {
        let mut file = File::create(&staging)?;
        file.write_all(&body)?;
        file.sync_all()?;
        fs::rename(&staging, path)
    })();

    write.map_err(|e| {
        let _ = fs::remove_file(&staging);
        io_error("save", path, e)
    })
}

/// Read a project from `path`, rejecting files written by an incompatible
/// schema.
pub fn load_project(path: &Path) -> TrackResult<Project> {
    let body = fs::read_to_string(path).map_err(|e| io_error("load", path, e))?;
    let project: Project = serde_json::from_str(&body).map_err(json_error)?;
    check_compatibility(&project.meta.version)?;
    Ok(project)
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn read_ticket(lock_path: &Path) -> Option<LockTicket> {
    let body = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&body).ok()
}

fn io_error(operation: &str, path: &Path, err: io::Error) -> TrackError {
    TrackError::file_error(operation, path.display().to_string(), err.to_string())
}

fn json_error(err: serde_json::Error) -> TrackError {
    TrackError::SerializationError {
        reason: err.to_string(),
    }
}

/// A file is readable when its major version matches ours and, while the
/// schema is still 0.x, its minor does not run ahead of ours.
fn check_compatibility(file_version: &str) -> TrackResult<()> {
    let mismatch = || TrackError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let (file_major, file_minor) = version_pair(file_version).ok_or_else(mismatch)?;
    let (our_major, our_minor) = version_pair(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != our_major || (our_major == 0 && file_minor > our_minor) {
        return Err(mismatch());
    }
    Ok(())
}

fn version_pair(version: &str) -> Option<(u32, u32)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    Some((major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn scratch(name: &str) -> PathBuf {
        temp_dir().join(format!("bst_{}_{}.bst", name, std::process::id()))
    }

    fn cleanup(path: &Path) {
        let _ = fs::remove_file(path);
        let _ = fs::remove_file(sidecar_path(path));
    }

    #[test]
    fn test_commit_fetch_cycle() {
        let path = scratch("cycle");
        let store = ProjectStore::open(&path, "pat@team").unwrap();

        let mut project = Project::new("Cycle Bot", "1234", 2025);
        store.commit(&project).unwrap();

        project = store.fetch().unwrap();
        assert_eq!(project.meta.name, "Cycle Bot");
        assert_eq!(project.meta.version, SCHEMA_VERSION);

        project.archive();
        store.commit(&project).unwrap();
        assert!(store.fetch().unwrap().meta.is_archived);

        drop(store);
        cleanup(&path);
    }

    #[test]
    fn test_save_leaves_no_staging_file() {
        let path = scratch("staging");
        save_project(&Project::new("Bot", "1234", 2025), &path).unwrap();
        assert!(path.exists());
        assert!(!staging_path(&path).exists());
        cleanup(&path);
    }

    #[test]
    fn test_sidecar_naming() {
        assert_eq!(
            sidecar_path(Path::new("/drive/robot.bst")),
            Path::new("/drive/robot.bst.lock")
        );
    }

    #[test]
    fn test_second_open_reports_holder() {
        let path = scratch("holder");
        let store = ProjectStore::open(&path, "pat@team").unwrap();

        let err = ProjectStore::open(&path, "alex@team").unwrap_err();
        match err {
            TrackError::FileLocked { locked_by, .. } => {
                assert!(locked_by.contains("pat@team"));
            }
            other => panic!("expected FileLocked, got {:?}", other),
        }

        drop(store);
        cleanup(&path);
    }

    #[test]
    fn test_drop_releases_lock() {
        let path = scratch("release");
        {
            let _store = ProjectStore::open(&path, "pat@team").unwrap();
            assert!(ProjectStore::lock_holder(&path).is_some());
        }
        assert!(ProjectStore::lock_holder(&path).is_none());

        // A released lock means the next session can start
        let store = ProjectStore::open(&path, "alex@team").unwrap();
        assert_eq!(store.ticket().owner, "alex@team");
        drop(store);
        cleanup(&path);
    }

    #[cfg(unix)]
    #[test]
    fn test_stale_ticket_is_taken_over() {
        let path = scratch("stale");
        let dead = LockTicket {
            owner: "gone@team".to_string(),
            host: local_host(),
            pid: u32::MAX, // no such process
            acquired_at: Utc::now(),
        };
        fs::write(sidecar_path(&path), serde_json::to_vec(&dead).unwrap()).unwrap();

        let store = ProjectStore::open(&path, "pat@team").unwrap();
        assert_eq!(store.ticket().owner, "pat@team");
        drop(store);
        cleanup(&path);
    }

    #[test]
    fn test_version_gate() {
        assert!(check_compatibility(SCHEMA_VERSION).is_ok());
        assert!(check_compatibility("0.1.7").is_ok());
        assert!(check_compatibility("0.2.0").is_err());
        assert!(check_compatibility("1.0.0").is_err());
        assert!(check_compatibility("not a version").is_err());
    }

    #[test]
    fn test_load_rejects_newer_schema() {
        let path = scratch("newer");
        let mut project = Project::new("Bot", "1234", 2025);
        project.meta.version = "0.99.0".to_string();
        save_project(&project, &path).unwrap();

        assert!(matches!(
            load_project(&path),
            Err(TrackError::VersionMismatch { .. })
        ));
        cleanup(&path);
    }
}
