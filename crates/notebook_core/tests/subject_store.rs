use notebook_core::db::{open_db, open_db_in_memory};
use notebook_core::{
    Category, Detail, SqliteSubjectRepository, StoreError, SubCategory, SubjectInput,
    SubjectRepository, SubjectService, SubjectValidationError, Topic,
};
use rusqlite::Connection;
use serde_json::json;
use uuid::Uuid;

fn service(conn: &Connection) -> SubjectService<SqliteSubjectRepository<'_>> {
    SubjectService::new(SqliteSubjectRepository::try_new(conn).unwrap())
}

fn nested_input() -> SubjectInput {
    let mut sub_category = SubCategory::new("Matrices");
    sub_category.details.push(Detail {
        text: "rank".to_string(),
        created_at: Some(1_000),
        updated_at: Some(2_000),
    });
    let mut category = Category::new("Linear");
    category.sub_categories.push(sub_category);
    let mut topic = Topic::new("Algebra");
    topic.categories.push(category);

    SubjectInput {
        name: "Math".to_string(),
        topics: vec![topic, Topic::new("Geometry")],
    }
}

#[test]
fn create_then_list_contains_exactly_one_equal_document() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let input = nested_input();

    let created = service.create_subject(input.clone()).unwrap();
    let listed = service.list_subjects().unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
    assert_eq!(listed[0].name, input.name);
    assert_eq!(listed[0].topics, input.topics);
}

#[test]
fn create_assigns_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let first = service.create_subject(SubjectInput::new("Math")).unwrap();
    let second = service.create_subject(SubjectInput::new("Math")).unwrap();

    assert_ne!(first.id, second.id);
    assert!(first.topics.is_empty());
}

#[test]
fn create_stamps_missing_detail_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let mut input = nested_input();
    input.topics[1].categories.push(Category::new("Shapes"));
    input.topics[1].categories[0].details.push(Detail {
        text: "triangle".to_string(),
        created_at: None,
        updated_at: None,
    });

    let created = service.create_subject(input).unwrap();

    let stamped = &created.topics[1].categories[0].details[0];
    assert!(stamped.created_at.is_some());
    assert_eq!(stamped.created_at, stamped.updated_at);
    let kept = &created.topics[0].categories[0].sub_categories[0].details[0];
    assert_eq!(kept.created_at, Some(1_000));
    assert_eq!(kept.updated_at, Some(2_000));
}

#[test]
fn create_rejects_blank_name() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let err = service.create_subject(SubjectInput::new("  ")).unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(SubjectValidationError::BlankName)
    ));
    assert!(service.list_subjects().unwrap().is_empty());
}

#[test]
fn replace_overwrites_instead_of_merging() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service.create_subject(nested_input()).unwrap();

    let replacement = SubjectInput {
        name: "Mathematics".to_string(),
        topics: vec![Topic::new("Calculus")],
    };
    let replaced = service
        .replace_subject(created.id, replacement.clone())
        .unwrap();
    let fetched = service.get_subject(created.id).unwrap();

    assert_eq!(replaced, fetched);
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "Mathematics");
    assert_eq!(fetched.topics, replacement.topics);
}

#[test]
fn replace_keeps_storage_position() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let first = service.create_subject(SubjectInput::new("First")).unwrap();
    service.create_subject(SubjectInput::new("Second")).unwrap();

    service
        .replace_subject(first.id, SubjectInput::new("First, renamed"))
        .unwrap();

    let names: Vec<_> = service
        .list_subjects()
        .unwrap()
        .into_iter()
        .map(|subject| subject.name)
        .collect();
    assert_eq!(names, ["First, renamed", "Second"]);
}

#[test]
fn replace_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let missing = Uuid::new_v4();

    let err = service
        .replace_subject(missing, SubjectInput::new("Ghost"))
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn replace_with_malformed_payload_is_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service.create_subject(SubjectInput::new("Math")).unwrap();

    let err = service
        .replace_subject(created.id, SubjectInput::new(""))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let mut inverted = nested_input();
    inverted.topics[0].categories[0].sub_categories[0].details[0].updated_at = Some(1);
    let err = service.replace_subject(created.id, inverted).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(SubjectValidationError::DetailTimestampOrder(_))
    ));

    assert_eq!(service.get_subject(created.id).unwrap().name, "Math");
}

#[test]
fn delete_then_fetch_or_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service.create_subject(nested_input()).unwrap();

    service.delete_subject(created.id).unwrap();

    assert!(matches!(
        service.get_subject(created.id),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_subject(created.id),
        Err(StoreError::NotFound(_))
    ));
    assert!(service.list_subjects().unwrap().is_empty());
}

#[test]
fn topics_keep_insertion_order_across_replaces() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let mut subject = service.create_subject(SubjectInput::new("Letters")).unwrap();

    for title in ["A", "B", "C"] {
        subject.topics.push(Topic::new(title));
        subject = service
            .replace_subject(subject.id, SubjectInput::from(subject.clone()))
            .unwrap();
    }

    let listed = service.list_subjects().unwrap();
    let titles: Vec<_> = listed[0].topics.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["A", "B", "C"]);
}

#[test]
fn documents_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notebook.db");

    let created = {
        let conn = open_db(&path).unwrap();
        let created = service(&conn).create_subject(nested_input()).unwrap();
        created
    };

    let conn = open_db(&path).unwrap();
    let reloaded = service(&conn).get_subject(created.id).unwrap();
    assert_eq!(reloaded, created);
}

#[test]
fn undecodable_document_is_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let created = service.create_subject(SubjectInput::new("Math")).unwrap();
    conn.execute(
        "UPDATE subjects SET document = 'not json' WHERE uuid = ?1;",
        [created.id.to_string()],
    )
    .unwrap();

    let err = service.list_subjects().unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));
}

#[test]
fn stored_document_is_camel_case_json() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSubjectRepository::try_new(&conn).unwrap();
    let service = SubjectService::new(SqliteSubjectRepository::try_new(&conn).unwrap());
    let created = service.create_subject(nested_input()).unwrap();

    let document: String = conn
        .query_row(
            "SELECT document FROM subjects WHERE uuid = ?1;",
            [created.id.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert_eq!(
        value[0]["categories"][0]["subCategories"][0]["details"][0],
        json!({ "text": "rank", "createdAt": 1000, "updatedAt": 2000 })
    );
    assert!(repo.get_subject(created.id).unwrap().is_some());
}
