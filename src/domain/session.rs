use super::{Decision, FileEntry};
use crate::error::{MoveError, SessionComplete, UndoError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Moves a file from one path to another in a single step.
pub trait Relocator {
    fn relocate(&mut self, from: &Path, to: &Path) -> io::Result<()>;
}

/// `fs::rename`. Fails rather than copying when the paths are on different
/// filesystems.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRelocator;

impl Relocator for FsRelocator {
    fn relocate(&mut self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStatistics {
    pub total_files: usize,
    pub moved: usize,
    pub skipped: usize,
}

/// The ordered file list and the cursor walking it.
///
/// Entries before the cursor carry a decision; entries at or after it are
/// untouched and still at their original path.
#[derive(Debug)]
pub struct SessionState<R = FsRelocator> {
    files: Vec<FileEntry>,
    cursor: usize,
    relocator: R,
}

impl SessionState<FsRelocator> {
    pub fn new(files: Vec<FileEntry>) -> Self {
        Self::with_relocator(files, FsRelocator)
    }
}

impl<R: Relocator> SessionState<R> {
    pub fn with_relocator(files: Vec<FileEntry>, relocator: R) -> Self {
        Self {
            files,
            cursor: 0,
            relocator,
        }
    }

    /// The file awaiting a decision, `None` once every file has one
    pub fn current_file(&self) -> Option<&FileEntry> {
        self.files.get(self.cursor)
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self) -> bool {
        self.cursor == self.files.len()
    }

    /// `(cursor, total)`
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.files.len())
    }

    /// Leaves the current file where it is and advances.
    pub fn skip(&mut self) -> Result<(), SessionComplete> {
        let entry = self.files.get_mut(self.cursor).ok_or(SessionComplete)?;
        entry.decision = Some(Decision::Skipped);
        debug!(index = self.cursor, path = %entry.current_path.display(), "skipped");
        self.cursor += 1;
        Ok(())
    }

    /// Moves the current file into `destination` under its own file name and
    /// advances. On error nothing changes and the same file stays current.
    pub fn move_to(&mut self, key: char, destination: &Path) -> Result<PathBuf, MoveError> {
        let index = self.cursor;
        let entry = self.files.get_mut(index).ok_or(SessionComplete)?;
        let source = entry.current_path.clone();

        if !source.is_file() {
            return Err(MoveError::SourceMissing(source));
        }
        if !destination.is_dir() {
            return Err(MoveError::NotADirectory(destination.to_path_buf()));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| MoveError::SourceMissing(source.clone()))?;
        let target = destination.join(file_name);

        // rename would silently replace an existing file on unix
        if fs::symlink_metadata(&target).is_ok() {
            return Err(MoveError::Collision(target));
        }

        self.relocator
            .relocate(&source, &target)
            .map_err(|e| MoveError::Relocate {
                from: source.clone(),
                to: target.clone(),
                source: e,
            })?;

        info!(index, key = %key, from = %source.display(), to = %target.display(), "moved");
        entry.current_path = target.clone();
        entry.decision = Some(Decision::Moved(key));
        self.cursor += 1;
        Ok(target)
    }

    /// Reverses the decision for the previous file and makes it current again.
    ///
    /// If a moved file cannot be put back, the cursor is returned to where it
    /// was and the entry keeps its moved location, so entries at or after the
    /// cursor are always at their original path.
    ///
    /// Calling it again keeps walking back, one decision per call.
    pub fn undo(&mut self) -> Result<(), UndoError> {
        if self.cursor == 0 {
            return Err(UndoError::NothingToUndo);
        }

        self.cursor -= 1;
        let index = self.cursor;
        let entry = &mut self.files[index];

        let key = match entry.decision {
            Some(Decision::Moved(key)) => key,
            Some(Decision::Skipped) | None => {
                entry.decision = None;
                debug!(index, "undid skip");
                return Ok(());
            }
        };

        let current = entry.current_path.clone();
        let original = entry.original_path.clone();

        let failure = if !current.is_file() {
            Some(format!("file is no longer at {}", current.display()))
        } else if fs::symlink_metadata(&original).is_ok() {
            Some(format!("{} is occupied", original.display()))
        } else {
            self.relocator
                .relocate(&current, &original)
                .err()
                .map(|e| e.to_string())
        };

        if let Some(reason) = failure {
            warn!(index, key = %key, current = %current.display(), %reason, "restore failed");
            self.cursor += 1;
            return Err(UndoError::RestoreFailed {
                current,
                original,
                reason,
            });
        }

        info!(index, from = %current.display(), to = %original.display(), "restored");
        entry.current_path = original;
        entry.decision = None;
        Ok(())
    }

    pub fn statistics(&self) -> SessionStatistics {
        let mut moved = 0;
        let mut skipped = 0;

        for entry in &self.files[..self.cursor] {
            match entry.decision {
                Some(Decision::Moved(_)) => moved += 1,
                Some(Decision::Skipped) => skipped += 1,
                None => {}
            }
        }

        SessionStatistics {
            total_files: self.files.len(),
            moved,
            skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        work: PathBuf,
        dest: PathBuf,
    }

    /// Working directory with the given files plus an empty destination
    fn fixture(names: &[&str]) -> (Fixture, SessionState) {
        let temp_dir = TempDir::new().unwrap();
        let work = temp_dir.path().join("work");
        let dest = temp_dir.path().join("dest1");
        fs::create_dir(&work).unwrap();
        fs::create_dir(&dest).unwrap();

        let files = names
            .iter()
            .map(|name| {
                let path = work.join(name);
                fs::write(&path, name.as_bytes()).unwrap();
                FileEntry::from_path(&path).unwrap()
            })
            .collect();

        (
            Fixture {
                _temp_dir: temp_dir,
                work,
                dest,
            },
            SessionState::new(files),
        )
    }

    /// Entries at or after the cursor must be untouched
    fn assert_tail_in_place<R: Relocator>(session: &SessionState<R>) {
        for entry in &session.files()[session.cursor()..] {
            assert_eq!(entry.current_path(), entry.original_path());
            assert!(entry.decision().is_none());
            assert!(entry.original_path().is_file());
        }
    }

    struct FailingRelocator;

    impl Relocator for FailingRelocator {
        fn relocate(&mut self, _from: &Path, _to: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "cross-device link"))
        }
    }

    /// Succeeds for the first `remaining` calls, then fails
    struct FlakyRelocator {
        remaining: usize,
    }

    impl Relocator for FlakyRelocator {
        fn relocate(&mut self, from: &Path, to: &Path) -> io::Result<()> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.remaining -= 1;
            fs::rename(from, to)
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_new_session() {
            let (_fx, session) = fixture(&["a.jpg", "b.jpg"]);
            assert_eq!(session.progress(), (0, 2));
            assert!(!session.is_complete());
            assert_eq!(session.current_file().unwrap().name, "a.jpg");
        }

        #[test]
        fn test_empty_session_is_complete() {
            let session = SessionState::new(vec![]);
            assert!(session.is_complete());
            assert!(session.current_file().is_none());
            assert_eq!(session.progress(), (0, 0));
        }

        #[test]
        fn test_skip_leaves_file_in_place() {
            let (_fx, mut session) = fixture(&["a.jpg", "b.jpg"]);
            let before = session.current_file().unwrap().current_path().to_path_buf();

            session.skip().unwrap();

            let skipped = &session.files()[0];
            assert_eq!(skipped.current_path(), before);
            assert!(before.is_file());
            assert_eq!(skipped.decision(), Some(Decision::Skipped));
            assert_eq!(session.cursor(), 1);
            assert_tail_in_place(&session);
        }

        #[test]
        fn test_skip_at_end_is_rejected() {
            let (_fx, mut session) = fixture(&["a.jpg"]);
            session.skip().unwrap();
            assert!(session.is_complete());

            assert_eq!(session.skip(), Err(SessionComplete));
            assert_eq!(session.progress(), (1, 1));
        }
    }

    mod move_tests {
        use super::*;

        #[test]
        fn test_move_to_relocates_and_advances() {
            let (fx, mut session) = fixture(&["a.jpg", "b.jpg"]);

            let new_path = session.move_to('1', &fx.dest).unwrap();

            assert_eq!(new_path, fx.dest.join("a.jpg"));
            assert!(new_path.is_file());
            assert!(!fx.work.join("a.jpg").exists());

            let moved = &session.files()[0];
            assert_eq!(moved.current_path(), new_path);
            assert_eq!(moved.original_path(), fx.work.join("a.jpg"));
            assert_eq!(moved.destination_key(), Some('1'));
            assert_eq!(session.cursor(), 1);
            assert_tail_in_place(&session);
        }

        #[test]
        fn test_move_to_at_end_is_rejected() {
            let (fx, mut session) = fixture(&["a.jpg"]);
            session.move_to('1', &fx.dest).unwrap();

            let result = session.move_to('1', &fx.dest);
            assert!(matches!(result, Err(MoveError::Complete(SessionComplete))));
            assert_eq!(session.progress(), (1, 1));
        }

        #[test]
        fn test_move_source_deleted_externally() {
            let (fx, mut session) = fixture(&["a.jpg", "b.jpg"]);
            fs::remove_file(fx.work.join("a.jpg")).unwrap();

            let result = session.move_to('1', &fx.dest);

            assert!(matches!(result, Err(MoveError::SourceMissing(_))));
            assert_eq!(session.cursor(), 0);
            let entry = session.current_file().unwrap();
            assert_eq!(entry.name, "a.jpg");
            assert_eq!(entry.current_path(), entry.original_path());
            assert!(entry.decision().is_none());
        }

        #[test]
        fn test_move_destination_not_directory() {
            let (fx, mut session) = fixture(&["a.jpg"]);
            let missing = fx.dest.join("nope");

            let result = session.move_to('1', &missing);

            assert!(matches!(result, Err(MoveError::NotADirectory(p)) if p == missing));
            assert_eq!(session.cursor(), 0);
            assert!(fx.work.join("a.jpg").is_file());
        }

        #[test]
        fn test_move_name_collision() {
            let (fx, mut session) = fixture(&["a.jpg"]);
            fs::write(fx.dest.join("a.jpg"), b"already here").unwrap();

            let result = session.move_to('1', &fx.dest);

            assert!(matches!(result, Err(MoveError::Collision(_))));
            assert_eq!(session.cursor(), 0);
            assert!(fx.work.join("a.jpg").is_file());
            assert_eq!(fs::read(fx.dest.join("a.jpg")).unwrap(), b"already here");
        }

        #[test]
        fn test_move_relocator_failure() {
            let (fx, session) = fixture(&["a.jpg"]);
            let mut session = SessionState::with_relocator(session.files().to_vec(), FailingRelocator);

            let result = session.move_to('1', &fx.dest);

            match result {
                Err(MoveError::Relocate { from, to, source }) => {
                    assert_eq!(from, fx.work.join("a.jpg"));
                    assert_eq!(to, fx.dest.join("a.jpg"));
                    assert!(source.to_string().contains("cross-device"));
                }
                other => panic!("expected Relocate error, got {:?}", other),
            }
            assert_eq!(session.cursor(), 0);
            assert_tail_in_place(&session);
        }
    }

    mod undo_tests {
        use super::*;

        #[test]
        fn test_undo_at_start_is_nothing_to_undo() {
            let (_fx, mut session) = fixture(&["a.jpg"]);

            let result = session.undo();

            assert!(matches!(result, Err(UndoError::NothingToUndo)));
            assert_eq!(session.cursor(), 0);
            assert_tail_in_place(&session);
        }

        #[test]
        fn test_move_then_undo_round_trip() {
            let (fx, mut session) = fixture(&["a.jpg", "b.jpg"]);
            let before_path = session.current_file().unwrap().current_path().to_path_buf();
            let before_cursor = session.cursor();

            session.move_to('1', &fx.dest).unwrap();
            session.undo().unwrap();

            assert_eq!(session.cursor(), before_cursor);
            let entry = session.current_file().unwrap();
            assert_eq!(entry.current_path(), before_path);
            assert!(before_path.is_file());
            assert!(!fx.dest.join("a.jpg").exists());
            assert_eq!(entry.destination_key(), None);
            assert_tail_in_place(&session);
        }

        #[test]
        fn test_undo_skip_only_moves_cursor() {
            let (_fx, mut session) = fixture(&["a.jpg", "b.jpg"]);
            session.skip().unwrap();

            session.undo().unwrap();

            assert_eq!(session.cursor(), 0);
            assert_eq!(session.current_file().unwrap().name, "a.jpg");
            assert_tail_in_place(&session);
        }

        #[test]
        fn test_repeated_undo_walks_back() {
            let (fx, mut session) = fixture(&["a.jpg", "b.jpg", "c.jpg"]);
            session.move_to('1', &fx.dest).unwrap();
            session.skip().unwrap();
            session.move_to('1', &fx.dest).unwrap();
            assert!(session.is_complete());

            session.undo().unwrap();
            assert_eq!(session.current_file().unwrap().name, "c.jpg");
            assert!(fx.work.join("c.jpg").is_file());

            session.undo().unwrap();
            assert_eq!(session.current_file().unwrap().name, "b.jpg");

            session.undo().unwrap();
            assert_eq!(session.current_file().unwrap().name, "a.jpg");
            assert!(fx.work.join("a.jpg").is_file());
            assert_tail_in_place(&session);

            assert!(matches!(session.undo(), Err(UndoError::NothingToUndo)));
        }

        #[test]
        fn test_undo_restore_blocked_by_occupied_original() {
            let (fx, mut session) = fixture(&["a.jpg", "b.jpg"]);
            session.move_to('1', &fx.dest).unwrap();
            fs::write(fx.work.join("a.jpg"), b"impostor").unwrap();

            let result = session.undo();

            assert!(matches!(result, Err(UndoError::RestoreFailed { .. })));
            assert_eq!(session.cursor(), 1);
            let entry = &session.files()[0];
            assert_eq!(entry.current_path(), fx.dest.join("a.jpg"));
            assert_eq!(entry.destination_key(), Some('1'));
            assert!(fx.dest.join("a.jpg").is_file());
            assert_eq!(fs::read(fx.work.join("a.jpg")).unwrap(), b"impostor");
            assert_eq!(session.current_file().unwrap().name, "b.jpg");
        }

        #[test]
        fn test_undo_restore_after_external_delete() {
            let (fx, mut session) = fixture(&["a.jpg"]);
            session.move_to('1', &fx.dest).unwrap();
            fs::remove_file(fx.dest.join("a.jpg")).unwrap();

            let result = session.undo();

            match result {
                Err(UndoError::RestoreFailed { current, original, reason }) => {
                    assert_eq!(current, fx.dest.join("a.jpg"));
                    assert_eq!(original, fx.work.join("a.jpg"));
                    assert!(reason.contains("no longer"));
                }
                other => panic!("expected RestoreFailed, got {:?}", other),
            }
            assert!(session.is_complete());
        }

        #[test]
        fn test_undo_restore_relocator_failure_keeps_cursor() {
            let (fx, session) = fixture(&["a.jpg", "b.jpg"]);
            let mut session =
                SessionState::with_relocator(session.files().to_vec(), FlakyRelocator { remaining: 1 });
            session.move_to('1', &fx.dest).unwrap();

            let result = session.undo();

            assert!(matches!(result, Err(UndoError::RestoreFailed { .. })));
            assert_eq!(session.cursor(), 1);
            assert_eq!(session.files()[0].current_path(), fx.dest.join("a.jpg"));
            assert_tail_in_place(&session);
        }
    }

    mod statistics_tests {
        use super::*;

        #[test]
        fn test_statistics_count_decisions_before_cursor() {
            let (fx, mut session) = fixture(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
            session.move_to('1', &fx.dest).unwrap();
            session.skip().unwrap();
            session.move_to('1', &fx.dest).unwrap();

            let stats = session.statistics();
            assert_eq!(stats.total_files, 4);
            assert_eq!(stats.moved, 2);
            assert_eq!(stats.skipped, 1);

            session.undo().unwrap();
            let stats = session.statistics();
            assert_eq!(stats.moved, 1);
            assert_eq!(stats.skipped, 1);
        }
    }
}
