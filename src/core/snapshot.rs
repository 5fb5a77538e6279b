use crate::core::manager::Registry;
use crate::core::repository::Repository;
use crate::domain::model::{Course, Professor, Student};
use crate::domain::ports::{Identifiable, Storage};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct SnapshotFiles {
    pub professors: String,
    pub students: String,
    pub courses: String,
}

impl Default for SnapshotFiles {
    fn default() -> Self {
        Self {
            professors: "professors.json".to_string(),
            students: "students.json".to_string(),
            courses: "courses.json".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub professors: usize,
    pub students: usize,
    pub courses: usize,
    pub skipped: usize,
}

/// Saves and restores master data. Enrollments and grades are never written,
/// so a reload always starts with an empty enrollment history.
pub struct SnapshotStore<S: Storage> {
    storage: S,
    files: SnapshotFiles,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_files(storage, SnapshotFiles::default())
    }

    pub fn with_files(storage: S, files: SnapshotFiles) -> Self {
        Self { storage, files }
    }

    pub fn save(&self, registry: &Registry) -> Result<()> {
        write_collection(&self.storage, &self.files.professors, &registry.professors)?;
        write_collection(&self.storage, &self.files.students, &registry.students)?;
        write_collection(&self.storage, &self.files.courses, &registry.courses)?;
        tracing::info!(
            "Snapshot saved: {} professor(s), {} student(s), {} course(s)",
            registry.professors.len(),
            registry.students.len(),
            registry.courses.len()
        );
        Ok(())
    }

    /// Adds every stored entity whose identifier is not already present.
    /// Missing files are treated as empty collections. All three files are parsed
    /// before anything is inserted, so a bad file leaves `registry` untouched.
    pub fn load_into(&self, registry: &mut Registry) -> Result<LoadSummary> {
        let professors: Vec<Professor> = read_collection(&self.storage, &self.files.professors)?;
        let students: Vec<Student> = read_collection(&self.storage, &self.files.students)?;
        let courses: Vec<Course> = read_collection(&self.storage, &self.files.courses)?;

        let mut summary = LoadSummary::default();

        let (added, skipped) = insert_new(&mut registry.professors, professors)?;
        summary.professors = added;
        summary.skipped += skipped;

        let (added, skipped) = insert_new(&mut registry.students, students)?;
        summary.students = added;
        summary.skipped += skipped;

        let (added, skipped) = insert_new(&mut registry.courses, courses)?;
        summary.courses = added;
        summary.skipped += skipped;

        tracing::info!("Snapshot loaded: {:?}", summary);
        Ok(summary)
    }
}

fn write_collection<S, T>(storage: &S, path: &str, repo: &Repository<T>) -> Result<()>
where
    S: Storage,
    T: Identifiable + Serialize,
{
    let items: Vec<&T> = repo.all_values().map(|rc| &**rc).collect();
    let json = serde_json::to_vec_pretty(&items)?;
    storage.write_file(path, &json)
}

fn read_collection<S, T>(storage: &S, path: &str) -> Result<Vec<T>>
where
    S: Storage,
    T: DeserializeOwned,
{
    if !storage.exists(path) {
        tracing::debug!("No snapshot file {}, skipping", path);
        return Ok(Vec::new());
    }

    let items: Vec<T> = serde_json::from_slice(&storage.read_file(path)?).map_err(|e| {
        tracing::error!("Snapshot file {} is not readable: {}", path, e);
        e
    })?;
    Ok(items)
}

fn insert_new<T: Identifiable>(repo: &mut Repository<T>, items: Vec<T>) -> Result<(usize, usize)> {
    let (mut added, mut skipped) = (0, 0);
    for item in items {
        if repo.contains(item.identifier()) {
            tracing::warn!("{} {} already loaded, skipping", T::KIND, item.identifier());
            skipped += 1;
            continue;
        }
        repo.add(item)?;
        added += 1;
    }
    Ok((added, skipped))
}
