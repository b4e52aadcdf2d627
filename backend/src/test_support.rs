//! Test utilities for the binder crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and behind the `test-support` feature.

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! File access in this crate goes through `cap_std::fs::Dir`; these
    //! helpers give test suites the same policy for fixture files.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a UTF-8 text file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use binder::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let path = std::env::temp_dir().join("binder-cap-fs-read.txt");
    /// write_file(&path, b"N\tName\n")?;
    /// assert_eq!(read_file_to_string(&path)?, "N\tName\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod memory {
    //! In-memory adapters for the driven ports.
    //!
    //! These let behaviour tests drive the real services without a database
    //! or catalogue file.

    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::domain::ports::{
        CatalogueSource, CatalogueSourceError, CollectionRepository, CollectionRepositoryError,
        SchemaInspector, SchemaInspectorError,
    };
    use crate::domain::{CardKey, CollectionStatus, StatusFlags, StatusPatch};

    /// Collection store held in a map keyed by identity.
    #[derive(Debug, Default)]
    pub struct InMemoryCollectionRepository {
        rows: Mutex<BTreeMap<CardKey, CollectionStatus>>,
        unavailable: AtomicBool,
    }

    impl InMemoryCollectionRepository {
        /// Empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Store seeded with `rows`.
        pub fn with_rows(rows: impl IntoIterator<Item = (CardKey, StatusFlags)>) -> Self {
            let now = Utc::now();
            let rows = rows
                .into_iter()
                .map(|(key, flags)| {
                    let status = CollectionStatus {
                        key: key.clone(),
                        flags,
                        updated_at: now,
                    };
                    (key, status)
                })
                .collect();
            Self {
                rows: Mutex::new(rows),
                unavailable: AtomicBool::new(false),
            }
        }

        /// Make every call fail with a connection error until reset.
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Snapshot of the stored rows in key order.
        #[must_use]
        pub fn rows(&self) -> Vec<CollectionStatus> {
            self.rows
                .lock()
                .map(|rows| rows.values().cloned().collect())
                .unwrap_or_default()
        }

        fn guard(
            &self,
        ) -> Result<MutexGuard<'_, BTreeMap<CardKey, CollectionStatus>>, CollectionRepositoryError>
        {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(CollectionRepositoryError::connection("store offline"));
            }
            self.rows
                .lock()
                .map_err(|_| CollectionRepositoryError::query("store lock poisoned"))
        }
    }

    #[async_trait]
    impl CollectionRepository for InMemoryCollectionRepository {
        async fn fetch_all(&self) -> Result<Vec<CollectionStatus>, CollectionRepositoryError> {
            Ok(self.guard()?.values().cloned().collect())
        }

        async fn upsert(
            &self,
            key: &CardKey,
            patch: &StatusPatch,
        ) -> Result<CollectionStatus, CollectionRepositoryError> {
            let mut rows = self.guard()?;
            let flags = rows
                .get(key)
                .map_or_else(|| patch.insert_flags(), |row| patch.apply_to(row.flags));
            let status = CollectionStatus {
                key: key.clone(),
                flags,
                updated_at: Utc::now(),
            };
            rows.insert(key.clone(), status.clone());
            Ok(status)
        }

        async fn insert_missing(
            &self,
            keys: &[CardKey],
        ) -> Result<usize, CollectionRepositoryError> {
            let mut rows = self.guard()?;
            let now = Utc::now();
            let mut inserted = 0;
            for key in keys {
                if !rows.contains_key(key) {
                    rows.insert(
                        key.clone(),
                        CollectionStatus {
                            key: key.clone(),
                            flags: StatusFlags::default(),
                            updated_at: now,
                        },
                    );
                    inserted += 1;
                }
            }
            Ok(inserted)
        }

        async fn count(&self) -> Result<u64, CollectionRepositoryError> {
            let rows = self.guard()?;
            u64::try_from(rows.len()).map_err(|err| CollectionRepositoryError::query(err.to_string()))
        }
    }

    /// Catalogue source returning fixed text, or failing when `text` is `None`.
    #[derive(Debug, Clone)]
    pub struct StaticCatalogueSource {
        text: Option<String>,
    }

    impl StaticCatalogueSource {
        /// Source yielding `text`.
        pub fn new(text: impl Into<String>) -> Self {
            Self {
                text: Some(text.into()),
            }
        }

        /// Source that is always unavailable.
        #[must_use]
        pub const fn unavailable() -> Self {
            Self { text: None }
        }
    }

    #[async_trait]
    impl CatalogueSource for StaticCatalogueSource {
        async fn load_text(&self) -> Result<String, CatalogueSourceError> {
            self.text
                .clone()
                .ok_or_else(|| CatalogueSourceError::unavailable("static source offline"))
        }

        fn location(&self) -> String {
            "static".to_owned()
        }
    }

    /// Schema inspector returning a fixed column list.
    #[derive(Debug, Clone, Default)]
    pub struct StaticSchemaInspector {
        columns: Option<Vec<String>>,
    }

    impl StaticSchemaInspector {
        /// Inspector reporting `columns` for every table.
        pub fn new<I, S>(columns: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                columns: Some(columns.into_iter().map(Into::into).collect()),
            }
        }
    }

    #[async_trait]
    impl SchemaInspector for StaticSchemaInspector {
        async fn table_columns(
            &self,
            _table: &str,
        ) -> Result<Option<Vec<String>>, SchemaInspectorError> {
            Ok(self.columns.clone())
        }
    }

}
