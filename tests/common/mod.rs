//! Fixtures shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use scholarboard::*;
use std::sync::Arc;

/// Fifteen universities; university `i` (1-based) has `i` publications with `i * 10` citations each
pub fn ranked_world() -> AcademicWorld {
    let mut world = AcademicWorld::new();
    for i in 1..=15_i64 {
        let uni = world.add_university(&format!("University {:02}", i));
        let author = world.add_faculty(&format!("Professor {:02}", i), Some(uni));
        for n in 0..i {
            let p = world.add_publication(&format!("Paper {}-{}", i, n), i * 10, &["Robotics"]);
            world.author(author, p);
        }
    }
    world
}

/// Small dataset with contact details, keywords and an idle keyword
pub fn academic_world() -> AcademicWorld {
    let mut world = AcademicWorld::new();
    world.keywords.push("Machine Learning".to_string());

    let mit = world.add_university("MIT");
    let cmu = world.add_university("CMU");

    let alice = world.add_faculty("Alice Smith", Some(mit));
    world.affiliate(alice, "CSAIL");
    world.set_contact(alice, Some("alice@mit.edu"), None);

    let bob = world.add_faculty("Bob Jones", Some(mit));
    world.affiliate(bob, "LIDS");
    world.set_contact(bob, Some("bob@mit.edu"), Some("617-555-0100"));

    let carol = world.add_faculty("Carol White", Some(cmu));
    world.affiliate(carol, "Robotics Institute");

    let p1 = world.add_publication("Cost-Based Optimizers", 50, &["Databases"]);
    let p2 = world.add_publication("Log-Structured Storage", 10, &["Databases"]);
    let p3 = world.add_publication("Learned Indexes", 30, &["Databases", "Indexing"]);
    let p4 = world.add_publication("Grasp Planning", 80, &["Robotics"]);

    world.author(alice, p1);
    world.author(bob, p1);
    world.author(bob, p2);
    world.author(carol, p3);
    world.author(carol, p4);
    world
}

pub fn dashboard(world: AcademicWorld) -> Dashboard {
    Dashboard::embedded(EmbeddedStore::new(world))
}

/// Store whose every operation fails to connect
pub struct FailingStore;

fn refused<T>() -> StoreResult<T> {
    Err(StoreError::Connection("connection refused".to_string()))
}

#[async_trait]
impl RelationalAccess for FailingStore {
    async fn university_names(&self) -> StoreResult<Vec<String>> {
        refused()
    }
    async fn keyword_names(&self) -> StoreResult<Vec<String>> {
        refused()
    }
    async fn university_count(&self) -> StoreResult<i64> {
        refused()
    }
    async fn top_universities_by_publications(
        &self,
        _limit: u32,
        _offset: u32,
    ) -> StoreResult<Vec<UniversityPublications>> {
        refused()
    }
    async fn top_universities_by_citations(
        &self,
        _limit: u32,
        _offset: u32,
    ) -> StoreResult<Vec<UniversityCitations>> {
        refused()
    }
    async fn top_research_areas(&self, _university: &str) -> StoreResult<Vec<ResearchArea>> {
        refused()
    }
    async fn top_universities_for_keyword(
        &self,
        _keyword: &str,
    ) -> StoreResult<Vec<InterestUniversity>> {
        refused()
    }
    async fn top_faculty_for_keyword(&self, _keyword: &str) -> StoreResult<Vec<InterestFaculty>> {
        refused()
    }
    async fn faculty_interests(&self, _faculty: &str) -> StoreResult<Vec<String>> {
        refused()
    }
}

#[async_trait]
impl GraphAccess for FailingStore {
    async fn faculty_names(&self) -> StoreResult<Vec<String>> {
        refused()
    }
    async fn faculty_contact(&self, _name: &str) -> StoreResult<Option<FacultyContact>> {
        refused()
    }
    async fn update_contact(
        &self,
        _name: &str,
        _field: ContactField,
        _value: &str,
    ) -> StoreResult<Option<ContactUpdate>> {
        refused()
    }
}

#[async_trait]
impl DocumentAccess for FailingStore {
    async fn publication_titles(&self) -> StoreResult<Vec<String>> {
        refused()
    }
    async fn faculty_names(&self) -> StoreResult<Vec<String>> {
        refused()
    }
    async fn keyword_names(&self) -> StoreResult<Vec<String>> {
        refused()
    }
    async fn top_publications_for_keyword(
        &self,
        _keyword: &str,
        _limit: usize,
    ) -> StoreResult<Vec<PublicationCitations>> {
        refused()
    }
}

pub fn failing_dashboard() -> Dashboard {
    let store = Arc::new(FailingStore);
    Dashboard::new(store.clone(), store.clone(), store)
}
