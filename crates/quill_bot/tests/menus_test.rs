//! Tests for the demonstration menus.

mod test_utils;

use quill_bot::{KEYCAPS, MenuCommand, ToggleMenu, route_demo};
use quill_reactive::{EventRouter, ReactiveConfig};
use std::sync::Arc;
use strum::IntoEnumIterator;
use test_utils::{MockPlatform, channel, press, user_message};

fn setup(config: ReactiveConfig) -> (Arc<MockPlatform>, Arc<EventRouter>) {
    let platform = Arc::new(MockPlatform::new());
    let router = EventRouter::new(platform.clone(), config);
    (platform, router)
}

#[test]
fn test_menu_command_parse() {
    for command in MenuCommand::iter() {
        assert_eq!(
            MenuCommand::parse("!", &format!("!{}", command)),
            Some(command)
        );
    }
    assert_eq!(
        MenuCommand::parse("?", "  ?reactive-menu-route please "),
        Some(MenuCommand::ReactiveMenuRoute)
    );
    assert_eq!(MenuCommand::parse("!", "?reactive-menu"), None);
    assert_eq!(MenuCommand::parse("!", "!reactive-menus"), None);
    assert_eq!(MenuCommand::parse("!", "!"), None);
}

#[tokio::test]
async fn test_open_toggle_menu() {
    let (platform, router) = setup(ReactiveConfig::default());

    MenuCommand::ReactiveMenu
        .open(&router, channel())
        .await
        .unwrap();

    let created = platform.created();
    assert_eq!(created.len(), 1);
    let stored = platform.message(created[0]).unwrap();
    assert_eq!(stored.content.as_deref(), Some("reactions :p"));
    assert!(stored.embed.is_none());
    let shown: Vec<&str> = stored.reactions.iter().map(|r| r.as_str()).collect();
    assert_eq!(shown, KEYCAPS);
    assert_eq!(router.len(), 1);
}

#[tokio::test]
async fn test_toggle_menu_reactions_edit_in_place() {
    let (platform, router) = setup(ReactiveConfig::default());
    let menu = router.instantiate(ToggleMenu::new(), channel()).await.unwrap();
    let id = menu.bound_message().await.unwrap();

    router.dispatch(press(id, KEYCAPS[1])).await;
    assert!(platform.message(id).unwrap().embed.is_some());

    router.dispatch(press(id, KEYCAPS[2])).await;
    assert_eq!(platform.message(id).unwrap().content.as_deref(), Some("hey"));

    router.dispatch(press(id, KEYCAPS[0])).await;
    assert!(platform.message(id).unwrap().reactions.is_empty());

    // Keycaps four and five do nothing.
    router.dispatch(press(id, KEYCAPS[4])).await;
    let state = menu.mutate(|view, _| view.clone()).await.unwrap();
    assert!(!*state.show_reactions());
    assert!(*state.show_embed());
    assert!(*state.alternate_text());

    assert_eq!(platform.created(), vec![id]);
}

#[tokio::test]
async fn test_hoisted_menu_moves_down() {
    let config = ReactiveConfig::builder()
        .hoist_interval(2u32)
        .build()
        .unwrap();
    let (platform, router) = setup(config);

    MenuCommand::ReactiveMenuHoist
        .open(&router, channel())
        .await
        .unwrap();
    let first = platform.created()[0];

    router.dispatch(user_message("hello")).await;
    assert_eq!(platform.created().len(), 1);

    router.dispatch(user_message("again")).await;
    let created = platform.created();
    assert_eq!(created.len(), 2);
    assert_eq!(platform.deleted(), vec![first]);

    let moved = platform.message(created[1]).unwrap();
    assert_eq!(moved.reactions.len(), KEYCAPS.len());
    assert!(platform.message(first).is_none());
}

#[tokio::test]
async fn test_route_demo_navigation() {
    let (platform, router) = setup(ReactiveConfig::default());
    let menu = router.instantiate(route_demo().unwrap(), channel()).await.unwrap();
    let id = menu.bound_message().await.unwrap();
    let content = || platform.message(id).unwrap().content.unwrap_or_default();

    assert_eq!(content(), "Route page");
    assert!(platform.message(id).unwrap().embed.is_some());

    router.dispatch(user_message("a")).await;
    assert!(content().starts_with("Page A!"));
    assert!(platform.message(id).unwrap().embed.is_none());

    router.dispatch(user_message("back")).await;
    assert_eq!(content(), "Route page");

    router.dispatch(user_message("b")).await;
    assert!(content().starts_with("Page B!"));

    router.dispatch(user_message("hello.world, again")).await;
    assert_eq!(content(), "Page named helloworld");
    let route = menu.mutate(|view, _| view.route().to_string()).await.unwrap();
    assert_eq!(route, "b.helloworld");

    router.dispatch(user_message("back")).await;
    router.dispatch(user_message("ab")).await;
    assert_eq!(content(), "Route page");

    router.dispatch(user_message("z")).await;
    assert_eq!(content(), "Page named z");
    assert_eq!(platform.created(), vec![id]);
}
