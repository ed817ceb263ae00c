use notebase_core::db::open_db_in_memory;
use notebase_core::{
    NewUser, Note, NoteService, NoteServiceError, OwnerFilter, SqliteNoteRepository,
    SqliteUserRepository, UserRepository,
};

#[test]
fn create_list_update_and_delete_notes_for_an_owner() {
    let mut conn = open_db_in_memory().unwrap();
    let owner = SqliteUserRepository::try_new(&mut conn)
        .unwrap()
        .create_user(&NewUser::new("ada", "ada@example.com", "digest"))
        .unwrap()
        .id;
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let first = service.create_note(Some(owner), "first").unwrap();
    let second = service.create_note(Some(owner), "second").unwrap();

    let listed = service.list_notes_for_user(owner).unwrap();
    assert_eq!(listed.len(), 2);
    // Same-second inserts fall back to id order, newest first.
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);

    let updated = service.update_note(first.id, "first, edited").unwrap();
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.content, "first, edited");

    service.delete_note(second.id).unwrap();
    assert!(service.get_note(second.id).unwrap().is_none());
    assert_eq!(service.list_notes_for_user(owner).unwrap().len(), 1);
}

#[test]
fn blank_content_is_rejected_on_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.create_note(None, "   "),
        Err(NoteServiceError::EmptyContent)
    ));

    let note = service.create_note(None, "kept").unwrap();
    assert!(matches!(
        service.update_note(note.id, "\n"),
        Err(NoteServiceError::EmptyContent)
    ));
    assert_eq!(service.get_note(note.id).unwrap().unwrap().content, "kept");
}

#[test]
fn unknown_owner_and_missing_note_map_to_service_errors() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());

    assert!(matches!(
        service.create_note(Some(7), "dangling"),
        Err(NoteServiceError::UnknownOwner(7))
    ));
    assert!(matches!(
        service.update_note(99, "text"),
        Err(NoteServiceError::NoteNotFound(99))
    ));
    assert!(matches!(
        service.delete_note(99),
        Err(NoteServiceError::NoteNotFound(99))
    ));
}

#[test]
fn clear_notes_only_touches_one_owner() {
    let mut conn = open_db_in_memory().unwrap();
    let (ada, grace) = {
        let repo = SqliteUserRepository::try_new(&mut conn).unwrap();
        let ada = repo
            .create_user(&NewUser::new("ada", "ada@example.com", "d"))
            .unwrap();
        let grace = repo
            .create_user(&NewUser::new("grace", "grace@example.com", "d"))
            .unwrap();
        (ada.id, grace.id)
    };
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    service.create_note(Some(ada), "a1").unwrap();
    service.create_note(Some(ada), "a2").unwrap();
    service.create_note(Some(grace), "g1").unwrap();

    assert_eq!(service.clear_notes(ada).unwrap(), 2);
    assert!(service.list_notes_for_user(ada).unwrap().is_empty());
    assert_eq!(service.list_notes_for_user(grace).unwrap().len(), 1);
}

#[test]
fn lookups_and_counts_report_service_errors() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let note = service.create_note(None, "counted").unwrap();

    let found: Result<Option<Note>, NoteServiceError> = service.get_note(note.id);
    assert_eq!(found.unwrap(), Some(note));
    let missing: Result<Option<Note>, NoteServiceError> = service.get_note(404);
    assert!(missing.unwrap().is_none());

    let unowned: Result<u64, NoteServiceError> = service.count_notes(OwnerFilter::Unowned);
    assert_eq!(unowned.unwrap(), 1);
    assert_eq!(service.count_notes(OwnerFilter::User(1)).unwrap(), 0);
}
