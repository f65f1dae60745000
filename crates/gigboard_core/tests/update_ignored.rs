use gigboard_core::{update, AppState, LocationCategory, Msg};

fn assert_ignored(state: AppState, msg: Msg) {
    let (mut next, effects) = update(state.clone(), msg.clone());

    assert!(effects.is_empty(), "{msg:?} produced effects {effects:?}");
    assert!(!next.consume_dirty(), "{msg:?} requested a render");
    assert_eq!(state, next, "{msg:?} changed state");
}

#[test]
fn signed_out_paging_and_logout_are_ignored() {
    assert_ignored(AppState::new(), Msg::LoadMoreClicked);
    assert_ignored(AppState::new(), Msg::RefreshClicked);
    assert_ignored(AppState::new(), Msg::LogoutClicked);
}

#[test]
fn unchanged_filters_are_ignored() {
    assert_ignored(AppState::new(), Msg::PillRemoved("rust".to_string()));
    assert_ignored(AppState::new(), Msg::LocationSelected(LocationCategory::All));
    assert_ignored(AppState::new(), Msg::IdentityChanged(None));
}

#[test]
fn unrequested_page_is_ignored() {
    assert_ignored(
        AppState::new(),
        Msg::PageLoaded {
            epoch: 0,
            page_index: 0,
            result: Err("late".to_string()),
        },
    );
}
