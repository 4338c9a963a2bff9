//! Tests for the session controller

use std::sync::Arc;

use version_manager::{
    CapturingObserver, ChatSession, ContentPart, EditOutcome, Message, Transcript, VersionEvent,
    Visibility, version_navigator_text,
};

fn message(id: &str, text: &str) -> Message {
    let mut message = Message::user(text);
    message.id = Some(id.to_string());
    message
}

fn four_message_transcript() -> Transcript {
    Transcript::from_messages(vec![
        message("m1", "one"),
        message("m2", "two"),
        message("m3", "three"),
        message("m4", "four"),
    ])
}

#[test]
fn test_edit_message_creates_version_and_hides_downstream() {
    let observer = Arc::new(CapturingObserver::new());
    let mut session = ChatSession::with_observer(four_message_transcript(), observer.clone());

    let outcome = session.edit_message("m2", vec![ContentPart::text("two edited")]);

    let EditOutcome::Edited { regenerate } = outcome else {
        panic!("edit should commit");
    };
    assert_eq!(regenerate.message_id, "m2");
    assert_eq!(regenerate.content, vec![ContentPart::text("two edited")]);

    let edited = session.transcript().get("m2").unwrap();
    let versions = edited.versions.as_ref().unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(
        versions[0].child_message_ids,
        vec!["m3".to_string(), "m4".to_string()]
    );
    assert_eq!(edited.current_version_index, Some(1));
    assert_eq!(edited.text(), "two edited");

    assert_eq!(
        session.transcript().get("m3").unwrap().display,
        Visibility::Hidden
    );
    assert_eq!(
        session.transcript().get("m4").unwrap().display,
        Visibility::Hidden
    );

    assert_eq!(session.active_path(), ["m1".to_string(), "m2".to_string()]);

    let events = observer.events();
    assert!(events.contains(&VersionEvent::VersionCreated {
        message_id: "m2".to_string(),
        version_number: 2,
    }));
    assert!(events.contains(&VersionEvent::RegenerationRequested {
        message_id: "m2".to_string(),
    }));
}

#[test]
fn test_edit_unknown_id_is_silent_noop() {
    let observer = Arc::new(CapturingObserver::new());
    let mut session = ChatSession::with_observer(four_message_transcript(), observer.clone());
    let before = session.transcript().clone();

    let outcome = session.edit_message("missing", vec![ContentPart::text("new")]);

    assert_eq!(outcome, EditOutcome::Ignored);
    assert_eq!(session.transcript(), &before);
    assert!(observer.events().is_empty());
}

#[test]
fn test_edit_with_unchanged_content_is_silent_noop() {
    let observer = Arc::new(CapturingObserver::new());
    let mut session = ChatSession::with_observer(four_message_transcript(), observer.clone());

    let outcome = session.edit_message("m2", vec![ContentPart::text("two")]);

    assert_eq!(outcome, EditOutcome::Ignored);
    assert!(session.transcript().get("m2").unwrap().versions.is_none());
    assert!(observer.events().is_empty());
}

#[test]
fn test_record_reply_joins_active_version_child_set() {
    let mut session = ChatSession::new(four_message_transcript());
    session.edit_message("m2", vec![ContentPart::text("two edited")]);

    let mut reply = Message::assistant("regenerated answer");
    reply.id = Some("m5".to_string());
    session.record_reply("m2", reply);

    let parent = session.transcript().get("m2").unwrap();
    let versions = parent.versions.as_ref().unwrap();
    assert_eq!(versions[1].child_message_ids, vec!["m5".to_string()]);

    let recorded = session.transcript().get("m5").unwrap();
    assert_eq!(recorded.parent_message_id.as_deref(), Some("m2"));

    assert_eq!(
        session.active_path(),
        ["m1".to_string(), "m2".to_string(), "m5".to_string()]
    );
}

#[test]
fn test_switch_version_restores_previous_branch() {
    let mut session = ChatSession::new(four_message_transcript());
    session.edit_message("m2", vec![ContentPart::text("two edited")]);

    let mut reply = Message::assistant("regenerated answer");
    reply.id = Some("m5".to_string());
    session.record_reply("m2", reply);

    session.switch_message_version("m2", 0);

    let switched = session.transcript().get("m2").unwrap();
    assert_eq!(switched.current_version_index, Some(0));
    assert_eq!(switched.text(), "two");

    assert_eq!(
        session.transcript().get("m3").unwrap().display,
        Visibility::Visible
    );
    assert_eq!(
        session.transcript().get("m4").unwrap().display,
        Visibility::Visible
    );
    assert_eq!(
        session.transcript().get("m5").unwrap().display,
        Visibility::Hidden
    );

    assert_eq!(
        session.active_path(),
        [
            "m1".to_string(),
            "m2".to_string(),
            "m3".to_string(),
            "m4".to_string(),
        ]
    );

    // And forward again to the edited branch.
    session.switch_message_version("m2", 1);
    assert_eq!(
        session.active_path(),
        ["m1".to_string(), "m2".to_string(), "m5".to_string()]
    );
}

#[test]
fn test_switch_with_invalid_index_leaves_everything_as_before() {
    let observer = Arc::new(CapturingObserver::new());
    let mut session = ChatSession::with_observer(four_message_transcript(), observer.clone());
    session.edit_message("m2", vec![ContentPart::text("two edited")]);

    let transcript_before = session.transcript().clone();
    let path_before = session.active_path().to_vec();

    session.switch_message_version("m2", 5);

    assert_eq!(session.transcript(), &transcript_before);
    assert_eq!(session.active_path(), path_before.as_slice());
    assert!(observer.events().contains(&VersionEvent::SwitchIgnored {
        message_id: "m2".to_string(),
        requested: 5,
        available: 2,
    }));
}

#[test]
fn test_switch_unknown_id_reports() {
    let observer = Arc::new(CapturingObserver::new());
    let mut session = ChatSession::with_observer(four_message_transcript(), observer.clone());

    session.switch_message_version("missing", 0);

    assert_eq!(
        observer.events(),
        vec![VersionEvent::RestoreTargetMissing {
            message_id: "missing".to_string(),
        }]
    );
}

#[test]
fn test_push_message_refreshes_path() {
    let mut session = ChatSession::new(Transcript::new());
    session.push_message(message("m1", "one"));
    session.push_message(message("m2", "two"));

    assert_eq!(session.active_path(), ["m1".to_string(), "m2".to_string()]);
}

#[test]
fn test_version_position_is_one_based() {
    let mut session = ChatSession::new(four_message_transcript());
    assert_eq!(session.version_position("m2"), None);

    session.edit_message("m2", vec![ContentPart::text("two edited")]);
    assert_eq!(session.version_position("m2"), Some((2, 2)));

    session.switch_message_version("m2", 0);
    assert_eq!(session.version_position("m2"), Some((1, 2)));
}

#[test]
fn test_version_navigator_text() {
    assert_eq!(version_navigator_text(2, 3), "< 2 / 3 >");
    assert_eq!(version_navigator_text(1, 2), "< 1 / 2 >");
}
