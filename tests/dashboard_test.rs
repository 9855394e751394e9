//! End-to-end view tests over the embedded store

mod common;

use common::{academic_world, dashboard, failing_dashboard, ranked_world};
use scholarboard::*;

#[tokio::test]
async fn test_top_ten_of_fifteen_universities() {
    let dash = dashboard(ranked_world());
    let charts = dash.top_universities(RankRange::default()).await;

    let values = charts.publications.values();
    assert_eq!(values.len(), 10);
    assert_eq!(values, vec![15, 14, 13, 12, 11, 10, 9, 8, 7, 6]);
    assert_eq!(charts.publications.labels()[0], "University 15");
    assert_eq!(charts.citations.bars.len(), 10);
    assert_eq!(charts.citations.values()[0], 15 * 150);
}

#[tokio::test]
async fn test_rankings_respect_range_bounds() {
    let dash = dashboard(ranked_world());
    for (start, end) in [(1, 1), (3, 5), (10, 20), (14, 15), (16, 20)] {
        let range = RankRange::new(start, end).unwrap();
        let charts = dash.top_universities(range).await;
        let values = charts.publications.values();
        assert!(values.len() as u32 <= range.limit());
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    let middle = dash.top_universities(RankRange::new(3, 5).unwrap()).await;
    assert_eq!(
        middle.citations.labels(),
        vec!["University 13", "University 12", "University 11"]
    );
    let past_the_end = dash.top_universities(RankRange::new(16, 20).unwrap()).await;
    assert!(past_the_end.publications.is_empty());
}

#[tokio::test]
async fn test_research_area_pie() {
    let dash = dashboard(academic_world());
    let pie = dash.research_areas("CMU").await;
    assert_eq!(pie.title, "Top Research Areas for CMU");
    let labels: Vec<&str> = pie.slices.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Databases", "Indexing", "Robotics"]);

    let mit = dash.research_areas("MIT").await;
    assert_eq!(mit.slices.len(), 1);
    assert_eq!(mit.slices[0].value, 2);

    assert!(dash.research_areas("mit").await.is_empty());
}

#[tokio::test]
async fn test_research_area_pie_defaults_to_first_university() {
    let dash = dashboard(academic_world());
    let pie = dash.research_areas("").await;
    assert_eq!(pie.title, "Top Research Areas for MIT");
    assert_eq!(pie, dash.research_areas("MIT").await);

    let empty = failing_dashboard().research_areas("").await;
    assert_eq!(empty.title, "Top Research Areas for ");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_research_interest_tables() {
    let dash = dashboard(academic_world());
    let tables = dash.research_interest(1, "Databases").await;

    let universities: Vec<(&str, i64, i64)> = tables
        .universities
        .iter()
        .map(|u| (u.name.as_str(), u.num_faculty, u.num_publications))
        .collect();
    assert_eq!(universities, vec![("MIT", 2, 2), ("CMU", 1, 1)]);

    let faculty: Vec<(&str, i64, i64)> = tables
        .faculty
        .iter()
        .map(|f| (f.name.as_str(), f.num_publications, f.num_citations))
        .collect();
    assert_eq!(
        faculty,
        vec![("Bob Jones", 2, 60), ("Alice Smith", 1, 50), ("Carol White", 1, 30)]
    );
}

#[tokio::test]
async fn test_interest_without_faculty_gives_two_empty_tables() {
    let dash = dashboard(academic_world());
    assert!(dash
        .research_interests()
        .await
        .contains(&"Machine Learning".to_string()));

    let tables = dash.research_interest(1, "Machine Learning").await;
    assert!(tables.universities.is_empty());
    assert!(tables.faculty.is_empty());
}

#[tokio::test]
async fn test_top_publications_ordered_by_citations() {
    let dash = dashboard(academic_world());
    match dash.top_publications(1, "Databases").await.unwrap() {
        PublicationsView::Found { rows } => {
            let citations: Vec<i64> = rows.iter().map(|r| r.num_citations).collect();
            assert_eq!(citations, vec![50, 30, 10]);
            assert_eq!(rows[0].title, "Cost-Based Optimizers");
        }
        other => panic!("expected rows, got {:?}", other),
    }
}

#[tokio::test]
async fn test_top_publications_capped_at_five() {
    let mut world = academic_world();
    for i in 0..8 {
        world.add_publication(&format!("Survey {}", i), 100 + i, &["Databases"]);
    }
    let dash = dashboard(world);
    match dash.top_publications(2, "Databases").await.unwrap() {
        PublicationsView::Found { rows } => {
            assert_eq!(rows.len(), 5);
            assert_eq!(rows[0].num_citations, 107);
        }
        other => panic!("expected rows, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unmatched_keyword_reports_none_found() {
    let dash = dashboard(academic_world());
    let view = dash.top_publications(1, "Quantum Chemistry").await.unwrap();
    assert_eq!(
        view,
        PublicationsView::NoneFound {
            message: "No publications found for the selected keyword.".to_string()
        }
    );
}

#[tokio::test]
async fn test_unknown_faculty_is_not_found() {
    let dash = dashboard(academic_world());
    for name in ["Nobody Here", "alice smith", "Alice Smith "] {
        let view = dash.faculty_contact(1, name).await;
        assert_eq!(view, ContactView::not_found(), "lookup of {:?}", name);
    }
}

#[tokio::test]
async fn test_contact_lookup_shows_na_for_missing_phone() {
    let dash = dashboard(academic_world());
    let view = dash.faculty_contact(1, "Alice Smith").await;
    assert_eq!(
        view.lines(),
        vec![
            "Name: Alice Smith",
            "Email: alice@mit.edu",
            "Phone: N/A",
            "Institute: CSAIL"
        ]
    );
}

#[tokio::test]
async fn test_email_update_is_read_back() {
    let dash = dashboard(academic_world());
    let status = dash.update_email(1, "Alice Smith", "asmith@mit.edu").await;
    assert_eq!(
        status,
        UpdateStatus::Updated {
            message: "Updated email for Alice Smith: asmith@mit.edu".to_string()
        }
    );

    match dash.faculty_contact(2, "Alice Smith").await {
        ContactView::Found { contact } => {
            assert_eq!(contact.email.as_deref(), Some("asmith@mit.edu"))
        }
        other => panic!("expected contact, got {:?}", other),
    }
}

#[tokio::test]
async fn test_phone_update_for_unknown_faculty_fails() {
    let dash = dashboard(academic_world());
    let status = dash.update_phone(1, "Nobody Here", "555-0199").await;
    assert_eq!(
        status,
        UpdateStatus::Failed {
            message: "Failed to update phone.".to_string()
        }
    );
}

#[tokio::test]
async fn test_zero_trigger_is_neutral_regardless_of_inputs() {
    let dash = dashboard(academic_world());
    for input in ["", "Databases", "Alice Smith", "Nobody Here"] {
        assert!(dash.research_interest(0, input).await.is_empty());
        assert_eq!(dash.faculty_contact(0, input).await, ContactView::Hidden);
        assert_eq!(dash.update_email(0, input, "x@y.z").await, UpdateStatus::Hidden);
        assert_eq!(dash.update_phone(0, input, "555").await, UpdateStatus::Hidden);
        assert_eq!(
            dash.top_publications(0, input).await.unwrap(),
            PublicationsView::Hidden
        );
    }

    // a hidden update leaves the store untouched
    match dash.faculty_contact(1, "Bob Jones").await {
        ContactView::Found { contact } => assert_eq!(contact.email.as_deref(), Some("bob@mit.edu")),
        other => panic!("expected contact, got {:?}", other),
    }
}

#[tokio::test]
async fn test_selector_options() {
    let dash = dashboard(academic_world());
    assert_eq!(dash.universities().await, vec!["MIT", "CMU"]);
    assert_eq!(dash.university_count().await, 2);
    assert_eq!(dash.faculty_names().await.len(), 3);
    assert_eq!(dash.document_faculty_names().await.unwrap().len(), 3);
    assert_eq!(dash.publication_titles().await.unwrap().len(), 4);
    assert_eq!(
        dash.keywords().await.unwrap(),
        vec!["Databases", "Indexing", "Robotics"]
    );
    assert_eq!(
        dash.faculty_interests("Carol White").await,
        vec!["Databases", "Indexing", "Robotics"]
    );
    assert!(dash.faculty_interests("").await.is_empty());
}

#[tokio::test]
async fn test_relational_and_graph_failures_degrade() {
    let dash = failing_dashboard();

    assert!(dash.universities().await.is_empty());
    assert!(dash.research_interests().await.is_empty());
    assert_eq!(dash.university_count().await, 0);
    assert!(dash.faculty_names().await.is_empty());

    let charts = dash.top_universities(RankRange::default()).await;
    assert!(charts.publications.is_empty() && charts.citations.is_empty());
    assert!(dash.research_areas("MIT").await.is_empty());
    assert!(dash.research_interest(1, "Databases").await.is_empty());

    assert_eq!(dash.faculty_contact(1, "Alice Smith").await, ContactView::not_found());
    assert_eq!(
        dash.update_email(1, "Alice Smith", "a@b.c").await,
        UpdateStatus::Failed {
            message: "Failed to update email.".to_string()
        }
    );
}

#[tokio::test]
async fn test_document_failures_propagate() {
    let dash = failing_dashboard();

    let err = dash.top_publications(1, "Databases").await.unwrap_err();
    assert!(matches!(err, ViewError::Store(StoreError::Connection(_))));
    assert!(dash.keywords().await.is_err());
    assert!(dash.publication_titles().await.is_err());
    assert!(dash.document_faculty_names().await.is_err());

    // untriggered panels never reach the store
    assert_eq!(
        dash.top_publications(0, "Databases").await.unwrap(),
        PublicationsView::Hidden
    );
}

#[tokio::test]
async fn test_demo_dataset_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/academicworld.json");
    let dash = Dashboard::embedded(EmbeddedStore::from_json_file(path).unwrap());
    assert_eq!(dash.university_count().await, 3);

    let charts = dash.top_universities(RankRange::new(1, 1).unwrap()).await;
    assert_eq!(
        charts.citations.labels(),
        vec!["University of Illinois at Urbana Champaign"]
    );
    match dash.faculty_contact(1, "Jiawei Han").await {
        ContactView::Found { contact } => assert!(contact.email.is_none()),
        other => panic!("expected contact, got {:?}", other),
    }
}
