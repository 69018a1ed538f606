//! Persistence of found matches.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::worker::Match;

/// Default match log, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "solana_wallet.txt";

/// Delimiter line closing each match block.
pub const BLOCK_DELIMITER: &str = "==================================================";

/// Receives every match a run produces. Never called under a lock.
pub trait ResultSink: Send {
    fn persist(&self, found: &Match) -> Result<(), SinkError>;
}

/// Append-only text log, one block per match.
#[derive(Debug, Clone)]
pub struct WalletFile {
    path: PathBuf,
}

impl WalletFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Formats a match block exactly as it is appended to the log.
    pub fn format_block(found: &Match) -> String {
        format!(
            "\nSolana Wallet Found!\n\nWallet Address: {}\nPrivate Key: {}\n\n{}\n",
            found.public_key, found.private_key, BLOCK_DELIMITER
        )
    }
}

impl ResultSink for WalletFile {
    fn persist(&self, found: &Match) -> Result<(), SinkError> {
        let io_err = |source| SinkError::Io {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(Self::format_block(found).as_bytes())
            .map_err(io_err)?;
        file.flush().map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(public_key: &str) -> Match {
        Match {
            public_key: public_key.into(),
            private_key: "5Kd3NBUAdUnhyzenEwVLy9pBKxSwXvE9FMPyR4UKZvpe6E3AgLr".into(),
            worker_id: 0,
        }
    }

    #[test]
    fn test_appends_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let sink = WalletFile::new(dir.path().join("wallet.txt"));

        sink.persist(&sample("Sol111")).unwrap();
        sink.persist(&sample("Sol222")).unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents.matches(BLOCK_DELIMITER).count(), 2);
        let first = contents.find("Wallet Address: Sol111").unwrap();
        let second = contents.find("Wallet Address: Sol222").unwrap();
        assert!(first < second);
        assert!(contents.contains("Private Key: 5Kd3NBUAdUnhyzenEwVLy9pBKxSwXvE9FMPyR4UKZvpe6E3AgLr"));
    }

    #[test]
    fn test_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet.txt");
        std::fs::write(&path, "earlier run\n").unwrap();

        WalletFile::new(&path).persist(&sample("Sol333")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("earlier run\n"));
        assert!(contents.ends_with(&format!("{}\n", BLOCK_DELIMITER)));
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = WalletFile::new(dir.path().join("missing").join("wallet.txt"));
        assert!(matches!(sink.persist(&sample("Sol")), Err(SinkError::Io { .. })));
    }
}
