//! Test environment abstraction for isolated config testing.
//!
//! # Usage
//!
//! ```ignore
//! use unixfs_config::testing::TestEnvironment;
//!
//! let env = TestEnvironment::new()?;
//! let path = env.write_config("[shard]\nfanout = 64\n")?;
//! let config = unixfs_config::Config::load_from(&path)?;
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use tempfile::TempDir;

/// Atomic counter for unique test IDs
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Isolated scratch directory holding config files for one test
pub struct TestEnvironment {
    /// Temporary directory (dropped on cleanup)
    _temp_dir: TempDir,
    /// Root of the scratch directory
    pub root: PathBuf,
    /// Unique test ID
    pub test_id: u32,
}

impl TestEnvironment {
    pub fn new() -> anyhow::Result<Self> {
        let test_id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().to_path_buf();

        Ok(Self {
            _temp_dir: temp_dir,
            root,
            test_id,
        })
    }

    /// Default location of the config file inside the environment
    pub fn config_path(&self) -> PathBuf {
        self.root.join(format!("unixfs-test-{}.toml", self.test_id))
    }

    /// Write `contents` to `config_path()` and return the path
    pub fn write_config(&self, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.config_path();
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Create a file with content, relative to the environment root
    pub fn create_file(&self, relative_path: &str, content: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
