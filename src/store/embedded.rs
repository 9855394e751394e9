//! EmbeddedStore: in-process implementation of all three accessors
//!
//! Holds one [`AcademicWorld`] dataset and answers every relational, graph and
//! document operation from it, with the same grouping and ordering the
//! native queries ask their stores for. Ties are broken by name so results
//! are deterministic. Used by the test suite, by demos, and by the server
//! when it is started against a dataset file instead of live databases.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    DocumentAccess, GraphAccess, RelationalAccess, StoreError, StoreResult, TOP_RANKED,
};
use crate::models::{
    ContactField, ContactUpdate, FacultyContact, InterestFaculty, InterestUniversity,
    PublicationCitations, ResearchArea, UniversityCitations, UniversityPublications,
};

/// University row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityRecord {
    pub id: u64,
    pub name: String,
}

/// Faculty member: relational affiliation, graph contact attributes and
/// institute edge, and authored publication ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub university_id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub institute: Option<String>,
    #[serde(default)]
    pub publications: Vec<u64>,
}

/// Publication with its keyword names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub num_citations: i64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The whole academic dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicWorld {
    pub universities: Vec<UniversityRecord>,
    pub faculty: Vec<FacultyRecord>,
    pub publications: Vec<PublicationRecord>,
    /// Keywords present in the keyword table without any publication
    pub keywords: Vec<String>,
}

impl AcademicWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dataset serialized as JSON
    pub fn from_json_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            StoreError::Connection(format!("{}: {}", path.as_ref().display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Decode(e.to_string()))
    }

    pub fn add_university(&mut self, name: &str) -> u64 {
        let id = self.universities.len() as u64 + 1;
        self.universities.push(UniversityRecord {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn add_faculty(&mut self, name: &str, university_id: Option<u64>) -> u64 {
        let id = self.faculty.len() as u64 + 1;
        self.faculty.push(FacultyRecord {
            id,
            name: name.to_string(),
            university_id,
            email: None,
            phone: None,
            institute: None,
            publications: Vec::new(),
        });
        id
    }

    pub fn add_publication(&mut self, title: &str, num_citations: i64, keywords: &[&str]) -> u64 {
        let id = self.publications.len() as u64 + 1;
        self.publications.push(PublicationRecord {
            id,
            title: title.to_string(),
            num_citations,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        });
        id
    }

    /// Record authorship of a publication
    pub fn author(&mut self, faculty_id: u64, publication_id: u64) {
        if let Some(f) = self.faculty_mut(faculty_id) {
            if !f.publications.contains(&publication_id) {
                f.publications.push(publication_id);
            }
        }
    }

    /// Add the AFFILIATION_WITH edge to an institute
    pub fn affiliate(&mut self, faculty_id: u64, institute: &str) {
        if let Some(f) = self.faculty_mut(faculty_id) {
            f.institute = Some(institute.to_string());
        }
    }

    pub fn set_contact(&mut self, faculty_id: u64, email: Option<&str>, phone: Option<&str>) {
        if let Some(f) = self.faculty_mut(faculty_id) {
            f.email = email.map(str::to_string);
            f.phone = phone.map(str::to_string);
        }
    }

    fn faculty_mut(&mut self, id: u64) -> Option<&mut FacultyRecord> {
        self.faculty.iter_mut().find(|f| f.id == id)
    }

    fn publication(&self, id: u64) -> Option<&PublicationRecord> {
        self.publications.iter().find(|p| p.id == id)
    }

    fn university_name(&self, id: Option<u64>) -> Option<&str> {
        let id = id?;
        self.universities
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.name.as_str())
    }

    /// (faculty, publication) authorship rows, the join every ranking starts from
    fn authorships(&self) -> impl Iterator<Item = (&FacultyRecord, &PublicationRecord)> + '_ {
        self.faculty.iter().flat_map(move |f| {
            f.publications
                .iter()
                .filter_map(move |pid| self.publication(*pid).map(|p| (f, p)))
        })
    }

    /// Distinct values in first-seen order
    fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut seen = HashSet::new();
        values
            .filter(|v| seen.insert(*v))
            .map(str::to_string)
            .collect()
    }

    pub fn university_names(&self) -> Vec<String> {
        Self::distinct(self.universities.iter().map(|u| u.name.as_str()))
    }

    pub fn keyword_names(&self) -> Vec<String> {
        Self::distinct(
            self.keywords
                .iter()
                .map(String::as_str)
                .chain(
                    self.publications
                        .iter()
                        .flat_map(|p| p.keywords.iter().map(String::as_str)),
                ),
        )
    }

    pub fn university_count(&self) -> i64 {
        self.university_names().len() as i64
    }

    pub fn publications_by_university(&self) -> Vec<UniversityPublications> {
        let mut groups: HashMap<&str, HashSet<u64>> = HashMap::new();
        for (f, p) in self.authorships() {
            if let Some(name) = self.university_name(f.university_id) {
                groups.entry(name).or_default().insert(p.id);
            }
        }

        let mut rows: Vec<UniversityPublications> = groups
            .into_iter()
            .map(|(name, pubs)| UniversityPublications {
                university_name: name.to_string(),
                total_publications: pubs.len() as i64,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_publications
                .cmp(&a.total_publications)
                .then_with(|| a.university_name.cmp(&b.university_name))
        });
        rows
    }

    pub fn citations_by_university(&self) -> Vec<UniversityCitations> {
        let mut groups: HashMap<&str, i64> = HashMap::new();
        for (f, p) in self.authorships() {
            if let Some(name) = self.university_name(f.university_id) {
                *groups.entry(name).or_default() += p.num_citations;
            }
        }

        let mut rows: Vec<UniversityCitations> = groups
            .into_iter()
            .map(|(name, total)| UniversityCitations {
                university_name: name.to_string(),
                total_citations: total,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_citations
                .cmp(&a.total_citations)
                .then_with(|| a.university_name.cmp(&b.university_name))
        });
        rows
    }

    pub fn research_areas(&self, university: &str) -> Vec<ResearchArea> {
        let mut groups: HashMap<&str, HashSet<u64>> = HashMap::new();
        for (f, p) in self.authorships() {
            if self.university_name(f.university_id) != Some(university) {
                continue;
            }
            for keyword in &p.keywords {
                groups.entry(keyword.as_str()).or_default().insert(p.id);
            }
        }

        let mut rows: Vec<ResearchArea> = groups
            .into_iter()
            .map(|(keyword, pubs)| ResearchArea {
                research_area: keyword.to_string(),
                publication_count: pubs.len() as i64,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.publication_count
                .cmp(&a.publication_count)
                .then_with(|| a.research_area.cmp(&b.research_area))
        });
        rows.truncate(TOP_RANKED);
        rows
    }

    pub fn universities_for_keyword(&self, keyword: &str) -> Vec<InterestUniversity> {
        let mut groups: HashMap<&str, (HashSet<u64>, HashSet<u64>)> = HashMap::new();
        for (f, p) in self.authorships() {
            if !p.keywords.iter().any(|k| k == keyword) {
                continue;
            }
            if let Some(name) = self.university_name(f.university_id) {
                let (faculty, pubs) = groups.entry(name).or_default();
                faculty.insert(f.id);
                pubs.insert(p.id);
            }
        }

        let mut rows: Vec<InterestUniversity> = groups
            .into_iter()
            .map(|(name, (faculty, pubs))| InterestUniversity {
                name: name.to_string(),
                num_faculty: faculty.len() as i64,
                num_publications: pubs.len() as i64,
            })
            .collect();
        rows.sort_by_key(|r| (Reverse(r.num_publications), Reverse(r.num_faculty), r.name.clone()));
        rows.truncate(TOP_RANKED);
        rows
    }

    pub fn faculty_for_keyword(&self, keyword: &str) -> Vec<InterestFaculty> {
        let mut groups: HashMap<&str, (HashSet<u64>, i64)> = HashMap::new();
        for (f, p) in self.authorships() {
            if !p.keywords.iter().any(|k| k == keyword) {
                continue;
            }
            let (pubs, citations) = groups.entry(f.name.as_str()).or_default();
            pubs.insert(p.id);
            *citations += p.num_citations;
        }

        let mut rows: Vec<InterestFaculty> = groups
            .into_iter()
            .map(|(name, (pubs, citations))| InterestFaculty {
                name: name.to_string(),
                num_publications: pubs.len() as i64,
                num_citations: citations,
            })
            .collect();
        rows.sort_by_key(|r| {
            (
                Reverse(r.num_publications),
                Reverse(r.num_citations),
                r.name.clone(),
            )
        });
        rows.truncate(TOP_RANKED);
        rows
    }

    pub fn faculty_interests(&self, faculty: &str) -> Vec<String> {
        Self::distinct(
            self.authorships()
                .filter(|(f, _)| f.name == faculty)
                .flat_map(|(_, p)| p.keywords.iter().map(String::as_str)),
        )
    }

    pub fn faculty_names(&self) -> Vec<String> {
        self.faculty.iter().map(|f| f.name.clone()).collect()
    }

    /// First faculty member with this name that has an institute edge
    pub fn faculty_contact(&self, name: &str) -> Option<FacultyContact> {
        self.faculty.iter().find_map(|f| {
            let institute = f.institute.as_ref()?;
            (f.name == name).then(|| FacultyContact {
                name: f.name.clone(),
                email: f.email.clone(),
                phone: f.phone.clone(),
                institute: institute.clone(),
            })
        })
    }

    /// Set a contact attribute on every faculty member with this name
    pub fn update_contact(
        &mut self,
        name: &str,
        field: ContactField,
        value: &str,
    ) -> Option<ContactUpdate> {
        let mut updated = None;
        for f in self.faculty.iter_mut().filter(|f| f.name == name) {
            match field {
                ContactField::Email => f.email = Some(value.to_string()),
                ContactField::Phone => f.phone = Some(value.to_string()),
            }
            updated.get_or_insert_with(|| ContactUpdate {
                name: f.name.clone(),
                value: value.to_string(),
            });
        }
        updated
    }

    pub fn publication_titles(&self) -> Vec<String> {
        self.publications.iter().map(|p| p.title.clone()).collect()
    }

    pub fn document_keyword_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .publications
            .iter()
            .flat_map(|p| p.keywords.iter().map(String::as_str))
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    pub fn top_publications(&self, keyword: &str, limit: usize) -> Vec<PublicationCitations> {
        let mut rows: Vec<PublicationCitations> = self
            .publications
            .iter()
            .filter(|p| p.keywords.iter().any(|k| k == keyword))
            .map(|p| PublicationCitations {
                title: p.title.clone(),
                num_citations: p.num_citations,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.num_citations
                .cmp(&a.num_citations)
                .then_with(|| a.title.cmp(&b.title))
        });
        rows.truncate(limit);
        rows
    }
}

/// In-process client over a shared [`AcademicWorld`]
#[derive(Clone, Default)]
pub struct EmbeddedStore {
    world: Arc<RwLock<AcademicWorld>>,
}

impl EmbeddedStore {
    pub fn new(world: AcademicWorld) -> Self {
        Self {
            world: Arc::new(RwLock::new(world)),
        }
    }

    /// Load a JSON dataset file
    pub fn from_json_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(AcademicWorld::from_json_file(path)?))
    }

    /// Acquire a read lock on the dataset
    pub async fn world_read(&self) -> tokio::sync::RwLockReadGuard<'_, AcademicWorld> {
        self.world.read().await
    }

    /// Acquire a write lock on the dataset
    pub async fn world_write(&self) -> tokio::sync::RwLockWriteGuard<'_, AcademicWorld> {
        self.world.write().await
    }
}

fn slice<T>(rows: Vec<T>, limit: u32, offset: u32) -> Vec<T> {
    rows.into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl RelationalAccess for EmbeddedStore {
    async fn university_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.world_read().await.university_names())
    }

    async fn keyword_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.world_read().await.keyword_names())
    }

    async fn university_count(&self) -> StoreResult<i64> {
        Ok(self.world_read().await.university_count())
    }

    async fn top_universities_by_publications(
        &self,
        limit: u32,
        offset: u32,
    ) -> StoreResult<Vec<UniversityPublications>> {
        let rows = self.world_read().await.publications_by_university();
        Ok(slice(rows, limit, offset))
    }

    async fn top_universities_by_citations(
        &self,
        limit: u32,
        offset: u32,
    ) -> StoreResult<Vec<UniversityCitations>> {
        let rows = self.world_read().await.citations_by_university();
        Ok(slice(rows, limit, offset))
    }

    async fn top_research_areas(&self, university: &str) -> StoreResult<Vec<ResearchArea>> {
        Ok(self.world_read().await.research_areas(university))
    }

    async fn top_universities_for_keyword(
        &self,
        keyword: &str,
    ) -> StoreResult<Vec<InterestUniversity>> {
        Ok(self.world_read().await.universities_for_keyword(keyword))
    }

    async fn top_faculty_for_keyword(&self, keyword: &str) -> StoreResult<Vec<InterestFaculty>> {
        Ok(self.world_read().await.faculty_for_keyword(keyword))
    }

    async fn faculty_interests(&self, faculty: &str) -> StoreResult<Vec<String>> {
        Ok(self.world_read().await.faculty_interests(faculty))
    }
}

#[async_trait]
impl GraphAccess for EmbeddedStore {
    async fn faculty_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.world_read().await.faculty_names())
    }

    async fn faculty_contact(&self, name: &str) -> StoreResult<Option<FacultyContact>> {
        Ok(self.world_read().await.faculty_contact(name))
    }

    async fn update_contact(
        &self,
        name: &str,
        field: ContactField,
        value: &str,
    ) -> StoreResult<Option<ContactUpdate>> {
        Ok(self.world_write().await.update_contact(name, field, value))
    }
}

#[async_trait]
impl DocumentAccess for EmbeddedStore {
    async fn publication_titles(&self) -> StoreResult<Vec<String>> {
        Ok(self.world_read().await.publication_titles())
    }

    async fn faculty_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.world_read().await.faculty_names())
    }

    async fn keyword_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.world_read().await.document_keyword_names())
    }

    async fn top_publications_for_keyword(
        &self,
        keyword: &str,
        limit: usize,
    ) -> StoreResult<Vec<PublicationCitations>> {
        Ok(self.world_read().await.top_publications(keyword, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> AcademicWorld {
        let mut w = AcademicWorld::new();
        let mit = w.add_university("MIT");
        let cmu = w.add_university("CMU");

        let alice = w.add_faculty("Alice", Some(mit));
        let bob = w.add_faculty("Bob", Some(mit));
        let carol = w.add_faculty("Carol", Some(cmu));
        w.affiliate(alice, "CSAIL");
        w.set_contact(alice, Some("alice@mit.edu"), None);

        let p1 = w.add_publication("Learning to Rank", 100, &["Machine Learning"]);
        let p2 = w.add_publication("Query Planning", 30, &["Databases"]);
        let p3 = w.add_publication("Neural Indexes", 50, &["Machine Learning", "Databases"]);

        w.author(alice, p1);
        w.author(bob, p1);
        w.author(bob, p3);
        w.author(carol, p2);
        w
    }

    #[test]
    fn test_publications_count_distinct_per_university() {
        let rows = world().publications_by_university();
        assert_eq!(rows[0].university_name, "MIT");
        // p1 is co-authored by two MIT faculty but counted once
        assert_eq!(rows[0].total_publications, 2);
        assert_eq!(rows[1].total_publications, 1);
    }

    #[test]
    fn test_citations_sum_over_authorships() {
        let rows = world().citations_by_university();
        assert_eq!(rows[0].university_name, "MIT");
        assert_eq!(rows[0].total_citations, 250);
        assert_eq!(rows[1].total_citations, 30);
    }

    #[test]
    fn test_research_areas_for_one_university() {
        let rows = world().research_areas("MIT");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].research_area, "Machine Learning");
        assert_eq!(rows[0].publication_count, 2);
        assert!(world().research_areas("Nowhere").is_empty());
    }

    #[test]
    fn test_keyword_rankings() {
        let w = world();
        let unis = w.universities_for_keyword("Databases");
        assert_eq!(unis.len(), 2);
        // tied on publications and faculty, so the name decides
        assert_eq!(unis[0].name, "CMU");

        let faculty = w.faculty_for_keyword("Machine Learning");
        assert_eq!(faculty[0].name, "Bob");
        assert_eq!(faculty[0].num_publications, 2);
        assert_eq!(faculty[0].num_citations, 150);
    }

    #[test]
    fn test_contact_requires_institute_edge() {
        let w = world();
        let alice = w.faculty_contact("Alice").unwrap();
        assert_eq!(alice.institute, "CSAIL");
        assert_eq!(alice.email.as_deref(), Some("alice@mit.edu"));
        assert_eq!(alice.phone, None);
        assert!(w.faculty_contact("Bob").is_none());
        assert!(w.faculty_contact("Nobody").is_none());
    }

    #[test]
    fn test_update_contact_touches_every_namesake() {
        let mut w = world();
        let other = w.add_university("Other");
        w.add_faculty("Alice", Some(other));

        let update = w
            .update_contact("Alice", ContactField::Phone, "555-0100")
            .unwrap();
        assert_eq!(update.value, "555-0100");
        assert!(w
            .faculty
            .iter()
            .filter(|f| f.name == "Alice")
            .all(|f| f.phone.as_deref() == Some("555-0100")));
        assert!(w.update_contact("Nobody", ContactField::Email, "x@y").is_none());
    }

    #[test]
    fn test_keyword_lists() {
        let mut w = world();
        w.keywords.push("Robotics".to_string());
        assert_eq!(
            w.keyword_names(),
            vec!["Robotics", "Machine Learning", "Databases"]
        );
        assert_eq!(w.document_keyword_names(), vec!["Databases", "Machine Learning"]);
        assert_eq!(w.faculty_interests("Bob"), vec!["Machine Learning", "Databases"]);
    }

    #[test]
    fn test_dataset_json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        std::fs::write(&path, serde_json::to_string(&world()).unwrap()).unwrap();

        let loaded = AcademicWorld::from_json_file(&path).unwrap();
        assert_eq!(loaded, world());
        assert!(matches!(
            AcademicWorld::from_json_file(dir.path().join("missing.json")),
            Err(StoreError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_store_slices_rankings() {
        let store = EmbeddedStore::new(world());
        let first = store.top_universities_by_publications(1, 0).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].university_name, "MIT");

        let second = store.top_universities_by_citations(5, 1).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].university_name, "CMU");
    }
}
