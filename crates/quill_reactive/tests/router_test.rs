//! Tests for event routing between live instances.

mod test_utils;

use quill_interface::{MessageId, PlatformEvent};
use quill_reactive::{EventRouter, Hoisted, ReactiveConfig};
use std::sync::Arc;
use test_utils::{Call, Menu, MockPlatform, USER, channel, reaction, user_message};

fn setup() -> (Arc<MockPlatform>, Arc<EventRouter>) {
    let platform = Arc::new(MockPlatform::permissive());
    let router = EventRouter::new(platform.clone(), ReactiveConfig::default());
    (platform, router)
}

#[tokio::test]
async fn test_message_deleted_removes_instance() {
    let (_platform, router) = setup();
    let message = router.instantiate(Menu::text("a"), channel()).await.unwrap();
    let id = message.bound_message().await.unwrap();

    router
        .dispatch(PlatformEvent::MessageDeleted {
            message: MessageId(1),
            channel: channel(),
        })
        .await;
    assert!(message.is_running());

    router
        .dispatch(PlatformEvent::MessageDeleted {
            message: id,
            channel: channel(),
        })
        .await;
    assert!(!message.is_running());
    assert!(router.is_empty());
    assert!(message.bound_message().await.is_none());
}

#[tokio::test]
async fn test_bulk_delete_removes_matching_instances() {
    let (_platform, router) = setup();
    let a = router.instantiate(Menu::text("a"), channel()).await.unwrap();
    let b = router.instantiate(Menu::text("b"), channel()).await.unwrap();
    let a_id = a.bound_message().await.unwrap();

    router
        .dispatch(PlatformEvent::MessagesBulkDeleted {
            messages: vec![MessageId(3), a_id],
            channel: channel(),
        })
        .await;

    assert!(!a.is_running());
    assert!(b.is_running());
    assert_eq!(router.len(), 1);
}

#[tokio::test]
async fn test_events_route_to_the_matching_instance() {
    let (platform, router) = setup();
    let a = router.instantiate(Menu::text("a"), channel()).await.unwrap();
    let b = router.instantiate(Menu::text("b"), channel()).await.unwrap();
    let b_id = b.bound_message().await.unwrap();

    router.dispatch(reaction(b_id, USER, "x")).await;

    let a_seen = a.mutate(|menu, _| menu.seen_reactions.len()).await.unwrap();
    let b_seen = b.mutate(|menu, _| menu.seen_reactions.len()).await.unwrap();
    assert_eq!((a_seen, b_seen), (0, 1));
    assert_eq!(
        platform.message(b_id).unwrap().content.as_deref(),
        Some("reacted with x")
    );
}

#[tokio::test]
async fn test_view_can_end_its_own_message() {
    let (platform, router) = setup();
    let message = router.instantiate(Menu::text("a"), channel()).await.unwrap();
    let id = message.bound_message().await.unwrap();

    message.mutate(|_, ctl| ctl.delete()).await.unwrap();

    assert!(!message.is_running());
    assert!(router.is_empty());
    assert!(platform.calls().contains(&Call::Delete(id)));
}

#[tokio::test]
async fn test_hoisted_message_resends_after_interval() {
    let (platform, router) = setup();
    let message = router
        .instantiate(
            Hoisted::new(Menu::text("hoisted").with_reactions(&["1"]), 3),
            channel(),
        )
        .await
        .unwrap();
    let first = message.bound_message().await.unwrap();

    router.dispatch(user_message("one")).await;
    router.dispatch(user_message("two")).await;
    assert_eq!(message.bound_message().await, Some(first));

    platform.clear_calls();
    router.dispatch(user_message("three")).await;

    let second = message.bound_message().await.unwrap();
    assert_ne!(first, second);
    assert_eq!(
        platform.calls(),
        vec![
            Call::Create {
                message: second,
                content: Some("hoisted".to_string()),
                embed: None,
            },
            Call::Delete(first),
            Call::AddReaction(second, "1".into()),
        ]
    );

    let remaining = message.mutate(|view, _| view.remaining()).await.unwrap();
    assert_eq!(remaining, 3);
    let seen = message
        .mutate(|view, _| view.inner().seen_messages.len())
        .await
        .unwrap();
    assert_eq!(seen, 3);
}
